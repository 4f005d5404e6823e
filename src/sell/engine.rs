//! The sell GUI engine: item-use and sweep entry points, the pending-form
//! state machine, and the effects handed back to the host adapter.
//!
//! Each entry point is one continuation: it runs to completion without
//! blocking, mutates the registry or permission list (write-through to the
//! store), and returns the host-facing side effects. A shown form parks
//! its context in the pending map under a fresh token; the host feeds the
//! player's answer back through [`SellGui::resolve_form`]. Registry state
//! captured when a form is shown may be stale by the time it resolves;
//! that window is part of the observable behavior.

use std::collections::HashMap;

use log::{debug, info, warn};
use uuid::Uuid;

use crate::host::WorldHost;
use crate::logutil::escape_log;
use crate::validation::parse_positive_integer;

use super::errors::SellGuiError;
use super::forms::{self, FieldValue, FormResponse, FormSpec};
use super::permissions::Permissions;
use super::registry::SellRegistry;
use super::storage::SellGuiStore;
use super::types::{OwnerState, PlayerId, PlayerInfo, SellEntry, SellId};

/// Prefix on configuration feedback messages.
const MSG_PREFIX: &str = "<Sell GUI BP>";

/// A host-facing side effect produced by one continuation. The adapter
/// applies these fire-and-forget; nothing here blocks the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Present a form and route the answer back with the token.
    ShowForm {
        player: PlayerId,
        token: Uuid,
        form: FormSpec,
    },
    /// Remove `amount` units of an item from the player's inventory.
    ClearItems {
        player: PlayerId,
        item_id: String,
        amount: u32,
    },
    /// Credit a scoreboard objective.
    AddScore {
        player: PlayerId,
        objective: String,
        amount: u64,
    },
    /// Chat feedback to one player.
    Message { player: PlayerId, text: String },
}

/// Engine-side half of an outstanding form, keyed by the token embedded
/// in the matching [`Effect::ShowForm`].
#[derive(Debug, Clone)]
struct Pending {
    player: PlayerId,
    stage: Stage,
}

/// Everything needed to interpret a form answer. Selector stages capture
/// the entries they listed so positional answers stay meaningful even if
/// the registry changes while the form is open.
#[derive(Debug, Clone)]
enum Stage {
    OwnerClaim,
    SettingsRoot,
    Create {
        channels: Vec<String>,
    },
    EditSelect {
        items: Vec<(SellId, SellEntry)>,
        channels: Vec<String>,
    },
    EditEntry {
        key: SellId,
        display_name: String,
        channels: Vec<String>,
    },
    DeleteSelect {
        items: Vec<(SellId, SellEntry)>,
    },
    DeleteConfirm {
        key: SellId,
        display_name: String,
    },
    PermissionsRoot,
    PermissionAdd {
        candidates: Vec<PlayerInfo>,
    },
    PermissionRemove {
        candidates: Vec<PlayerInfo>,
    },
    SellQuantity {
        entry: SellEntry,
    },
}

/// Registry, permission list, and the pending-form map, loaded once from
/// the store and persisted write-through after every mutation.
pub struct SellGui {
    registry: SellRegistry,
    permissions: Permissions,
    settings_item: String,
    signal_objective: String,
    pending: HashMap<Uuid, Pending>,
}

impl SellGui {
    /// Load durable state from the store. An empty store yields an empty
    /// registry and an unclaimed owner.
    pub fn load(
        store: &SellGuiStore,
        settings_item: impl Into<String>,
        signal_objective: impl Into<String>,
    ) -> Result<Self, SellGuiError> {
        let registry = store.load_registry()?;
        let permissions = store.load_permissions()?;
        Ok(Self {
            registry,
            permissions,
            settings_item: settings_item.into(),
            signal_objective: signal_objective.into(),
            pending: HashMap::new(),
        })
    }

    pub fn registry(&self) -> &SellRegistry {
        &self.registry
    }

    pub fn permissions(&self) -> &Permissions {
        &self.permissions
    }

    /// Number of forms shown but not yet resolved or cancelled.
    pub fn pending_forms(&self) -> usize {
        self.pending.len()
    }

    fn show(&mut self, player: &str, stage: Stage, form: FormSpec) -> Effect {
        let token = Uuid::new_v4();
        self.pending.insert(
            token,
            Pending {
                player: player.to_string(),
                stage,
            },
        );
        Effect::ShowForm {
            player: player.to_string(),
            token,
            form,
        }
    }

    fn message(player: &str, text: impl Into<String>) -> Effect {
        Effect::Message {
            player: player.to_string(),
            text: text.into(),
        }
    }

    fn prefixed(player: &str, text: impl std::fmt::Display) -> Effect {
        Self::message(player, format!("{} {}", MSG_PREFIX, text))
    }

    /// Entry point for item-use events. Only the settings item matters;
    /// anything else falls through with no effects.
    pub fn on_item_use(&mut self, player: &str, item_id: &str) -> Vec<Effect> {
        if item_id != self.settings_item {
            return Vec::new();
        }
        match self.permissions.owner_state() {
            OwnerState::Unclaimed => {
                debug!("owner unclaimed, offering claim to {}", player);
                vec![self.show(player, Stage::OwnerClaim, forms::owner_claim_form())]
            }
            OwnerState::Claimed(_) if self.permissions.is_authorized(player) => {
                let is_owner = self.permissions.is_owner(player);
                vec![self.show(
                    player,
                    Stage::SettingsRoot,
                    forms::settings_root_form(is_owner),
                )]
            }
            OwnerState::Claimed(_) => {
                // Unauthorized players are silently gated, not refused.
                debug!("{} lacks settings permission", player);
                Vec::new()
            }
        }
    }

    /// One sweep of the signal objective: read each player's score, clear
    /// the participation, then either report missing items or prompt for
    /// a quantity. Unknown ids are dropped without feedback.
    pub fn on_tick(&mut self, host: &mut dyn WorldHost) -> Vec<Effect> {
        host.ensure_objective(&self.signal_objective);
        let mut effects = Vec::new();
        for (player, score) in host.signal_entries(&self.signal_objective) {
            host.clear_signal(&self.signal_objective, &player);
            let entry = match u32::try_from(score).ok().and_then(|id| self.registry.get(id)) {
                Some(entry) => entry.clone(),
                None => {
                    debug!("discarding sell signal {} from {}: no such id", score, player);
                    continue;
                }
            };
            let held = host.count_items(&player, &entry.item_id);
            if held == 0 {
                effects.push(Self::message(
                    &player,
                    format!("You don't have any items of {}", entry.item_display_name),
                ));
                continue;
            }
            let form = forms::sell_quantity_form(&entry.item_display_name, held);
            effects.push(self.show(&player, Stage::SellQuantity { entry }, form));
        }
        effects
    }

    /// Entry point for form results. Unknown tokens (host replay, process
    /// restart) are dropped; cancellation abandons the interaction with
    /// no side effects.
    pub fn resolve_form(
        &mut self,
        store: &SellGuiStore,
        host: &dyn WorldHost,
        token: Uuid,
        response: FormResponse,
    ) -> Result<Vec<Effect>, SellGuiError> {
        let Some(pending) = self.pending.remove(&token) else {
            warn!("form result for unknown token {}", token);
            return Ok(Vec::new());
        };
        if response == FormResponse::Cancelled {
            return Ok(Vec::new());
        }
        let player = pending.player;
        match pending.stage {
            Stage::OwnerClaim => self.resolve_owner_claim(store, &player, response),
            Stage::SettingsRoot => self.resolve_settings_root(host, &player, response),
            Stage::Create { channels } => self.resolve_create(store, &player, channels, response),
            Stage::EditSelect { items, channels } => {
                Ok(self.resolve_edit_select(&player, items, channels, response))
            }
            Stage::EditEntry {
                key,
                display_name,
                channels,
            } => self.resolve_edit_entry(store, &player, key, display_name, channels, response),
            Stage::DeleteSelect { items } => Ok(self.resolve_delete_select(&player, items, response)),
            Stage::DeleteConfirm { key, display_name } => {
                self.resolve_delete_confirm(store, &player, key, display_name, response)
            }
            Stage::PermissionsRoot => Ok(self.resolve_permissions_root(host, &player, response)),
            Stage::PermissionAdd { candidates } => {
                self.resolve_permission_add(store, &player, candidates, response)
            }
            Stage::PermissionRemove { candidates } => {
                self.resolve_permission_remove(store, &player, candidates, response)
            }
            Stage::SellQuantity { entry } => {
                self.resolve_sell_quantity(store, host, &player, entry, response)
            }
        }
    }

    fn resolve_owner_claim(
        &mut self,
        store: &SellGuiStore,
        player: &str,
        response: FormResponse,
    ) -> Result<Vec<Effect>, SellGuiError> {
        if response != FormResponse::Button(0) {
            return Ok(Vec::new());
        }
        if !self.permissions.claim_owner(player) {
            // Someone else completed the claim while this form was open.
            debug!("{} lost the owner claim race", player);
            return Ok(Vec::new());
        }
        store.save_owner(player)?;
        store.save_players(self.permissions.players())?;
        store.append_audit(&format!("owner claimed by {}", player))?;
        info!("owner claimed by {}", player);
        Ok(Vec::new())
    }

    fn resolve_settings_root(
        &mut self,
        host: &dyn WorldHost,
        player: &str,
        response: FormResponse,
    ) -> Result<Vec<Effect>, SellGuiError> {
        let FormResponse::Button(selection) = response else {
            return Ok(Vec::new());
        };
        match selection {
            0 => Ok(self.open_create(host, player)),
            1 => Ok(self.open_edit(host, player)),
            2 => Ok(self.open_delete(player)),
            3 if self.permissions.is_owner(player) => Ok(vec![self.show(
                player,
                Stage::PermissionsRoot,
                forms::permissions_root_form(),
            )]),
            _ => Ok(Vec::new()),
        }
    }

    /// Currency channels are every objective except the signal counter.
    fn currency_channels(&self, host: &dyn WorldHost) -> Vec<String> {
        host.objective_ids()
            .into_iter()
            .filter(|id| id != &self.signal_objective)
            .collect()
    }

    fn open_create(&mut self, host: &dyn WorldHost, player: &str) -> Vec<Effect> {
        let channels = self.currency_channels(host);
        if channels.is_empty() {
            return vec![Self::prefixed(player, SellGuiError::NoCurrencyChannel)];
        }
        let form = forms::create_form(&channels);
        vec![self.show(player, Stage::Create { channels }, form)]
    }

    fn open_edit(&mut self, host: &dyn WorldHost, player: &str) -> Vec<Effect> {
        if self.registry.is_empty() {
            return vec![Self::prefixed(player, "Nothing exists to edit.")];
        }
        let channels = self.currency_channels(host);
        if channels.is_empty() {
            return vec![Self::prefixed(player, SellGuiError::NoCurrencyChannel)];
        }
        let items: Vec<(SellId, SellEntry)> = self
            .registry
            .iter()
            .map(|(id, entry)| (id, entry.clone()))
            .collect();
        let names = items
            .iter()
            .map(|(_, entry)| entry.item_display_name.clone())
            .collect();
        let form = forms::edit_select_form(names);
        vec![self.show(player, Stage::EditSelect { items, channels }, form)]
    }

    fn open_delete(&mut self, player: &str) -> Vec<Effect> {
        if self.registry.is_empty() {
            return vec![Self::prefixed(player, "Nothing exists to delete.")];
        }
        let items: Vec<(SellId, SellEntry)> = self
            .registry
            .iter()
            .map(|(id, entry)| (id, entry.clone()))
            .collect();
        let ids = items.iter().map(|(_, entry)| entry.item_id.clone()).collect();
        let form = forms::delete_select_form(ids);
        vec![self.show(player, Stage::DeleteSelect { items }, form)]
    }

    fn resolve_create(
        &mut self,
        store: &SellGuiStore,
        player: &str,
        channels: Vec<String>,
        response: FormResponse,
    ) -> Result<Vec<Effect>, SellGuiError> {
        let FormResponse::Submit(values) = response else {
            return Ok(Vec::new());
        };
        let (Some(raw_id), Some(item_id), Some(display_name), Some(raw_value), Some(channel_index)) = (
            text_value(&values, 0),
            text_value(&values, 1),
            text_value(&values, 2),
            text_value(&values, 3),
            index_value(&values, 4),
        ) else {
            warn!("malformed create submission from {}", player);
            return Ok(Vec::new());
        };

        let mut effects = Vec::new();
        let sell_id = check_field(raw_id, "Score ID", player, &mut effects);
        let value = check_field(raw_value, "Item Sell Value", player, &mut effects);
        let (Some(sell_id), Some(value)) = (sell_id, value) else {
            return Ok(effects);
        };
        let Some(scoreboard) = channels.get(channel_index) else {
            warn!("create dropdown index {} out of range", channel_index);
            return Ok(effects);
        };

        let entry = SellEntry {
            item_id: item_id.to_string(),
            item_display_name: display_name.to_string(),
            value,
            scoreboard: scoreboard.clone(),
        };
        if let Err(err) = self.registry.create(sell_id, entry) {
            effects.push(Self::prefixed(player, err));
            return Ok(effects);
        }
        store.save_registry(&self.registry)?;
        store.append_audit(&format!("{} created sell id {} -> {}", player, sell_id, item_id))?;
        info!("{} created sell id {} for {}", player, sell_id, escape_log(item_id));
        effects.push(Self::prefixed(
            player,
            format!("Successfully created Sell ID for: {}", item_id),
        ));
        Ok(effects)
    }

    fn resolve_edit_select(
        &mut self,
        player: &str,
        items: Vec<(SellId, SellEntry)>,
        channels: Vec<String>,
        response: FormResponse,
    ) -> Vec<Effect> {
        let FormResponse::Submit(values) = response else {
            return Vec::new();
        };
        let Some((key, entry)) = index_value(&values, 0).and_then(|i| items.into_iter().nth(i))
        else {
            return Vec::new();
        };
        // Prefill from the captured entry, as listed when the selector was
        // shown, even if the registry moved on in between.
        let form = forms::edit_form(key, &entry, &channels);
        let display_name = entry.item_display_name;
        vec![self.show(
            player,
            Stage::EditEntry {
                key,
                display_name,
                channels,
            },
            form,
        )]
    }

    #[allow(clippy::too_many_arguments)]
    fn resolve_edit_entry(
        &mut self,
        store: &SellGuiStore,
        player: &str,
        key: SellId,
        display_name: String,
        channels: Vec<String>,
        response: FormResponse,
    ) -> Result<Vec<Effect>, SellGuiError> {
        let FormResponse::Submit(values) = response else {
            return Ok(Vec::new());
        };
        let (Some(raw_id), Some(item_id), Some(new_display), Some(raw_value), Some(channel_index)) = (
            text_value(&values, 0),
            text_value(&values, 1),
            text_value(&values, 2),
            text_value(&values, 3),
            index_value(&values, 4),
        ) else {
            warn!("malformed edit submission from {}", player);
            return Ok(Vec::new());
        };

        let mut effects = Vec::new();
        let new_id = check_field(raw_id, "Score ID", player, &mut effects);
        let value = check_field(raw_value, "Item Sell Value", player, &mut effects);
        let (Some(new_id), Some(value)) = (new_id, value) else {
            return Ok(effects);
        };
        let Some(scoreboard) = channels.get(channel_index) else {
            warn!("edit dropdown index {} out of range", channel_index);
            return Ok(effects);
        };

        let entry = SellEntry {
            item_id: item_id.to_string(),
            item_display_name: new_display.to_string(),
            value,
            scoreboard: scoreboard.clone(),
        };
        if let Err(err) = self.registry.edit(key, new_id, entry) {
            effects.push(Self::prefixed(player, err));
            return Ok(effects);
        }
        store.save_registry(&self.registry)?;
        store.append_audit(&format!("{} edited sell id {} -> {}", player, key, new_id))?;
        info!("{} edited sell id {} into {}", player, key, new_id);
        // Success feedback names the entry as it was before the edit.
        effects.push(Self::prefixed(
            player,
            format!("Successfully edited Sell ID for: {}", display_name),
        ));
        Ok(effects)
    }

    fn resolve_delete_select(
        &mut self,
        player: &str,
        items: Vec<(SellId, SellEntry)>,
        response: FormResponse,
    ) -> Vec<Effect> {
        let FormResponse::Submit(values) = response else {
            return Vec::new();
        };
        let Some((key, entry)) = index_value(&values, 0).and_then(|i| items.into_iter().nth(i))
        else {
            return Vec::new();
        };
        vec![self.show(
            player,
            Stage::DeleteConfirm {
                key,
                display_name: entry.item_display_name,
            },
            forms::delete_confirm_form(),
        )]
    }

    fn resolve_delete_confirm(
        &mut self,
        store: &SellGuiStore,
        player: &str,
        key: SellId,
        display_name: String,
        response: FormResponse,
    ) -> Result<Vec<Effect>, SellGuiError> {
        if response != FormResponse::Button(0) {
            return Ok(Vec::new());
        }
        // Deleting a key that vanished in the meantime stays a no-op.
        let removed = self.registry.delete(key);
        store.save_registry(&self.registry)?;
        if removed {
            store.append_audit(&format!("{} deleted sell id {}", player, key))?;
            info!("{} deleted sell id {}", player, key);
        }
        Ok(vec![Self::prefixed(
            player,
            format!("Successfully deleted Sell ID for: {}", display_name),
        )])
    }

    fn resolve_permissions_root(
        &mut self,
        host: &dyn WorldHost,
        player: &str,
        response: FormResponse,
    ) -> Vec<Effect> {
        let FormResponse::Button(selection) = response else {
            return Vec::new();
        };
        match selection {
            0 => {
                let candidates: Vec<PlayerInfo> = host
                    .online_players()
                    .into_iter()
                    .filter(|p| !self.permissions.is_authorized(&p.id))
                    .collect();
                if candidates.is_empty() {
                    return vec![Self::prefixed(player, "All players in world have permission")];
                }
                let names = candidates.iter().map(|p| p.name.clone()).collect();
                vec![self.show(
                    player,
                    Stage::PermissionAdd { candidates },
                    forms::permission_add_form(names),
                )]
            }
            1 => {
                let candidates: Vec<PlayerInfo> = host
                    .online_players()
                    .into_iter()
                    .filter(|p| {
                        self.permissions.is_authorized(&p.id) && !self.permissions.is_owner(&p.id)
                    })
                    .collect();
                if candidates.is_empty() {
                    return vec![Self::prefixed(player, "No players in world have permission")];
                }
                let names = candidates.iter().map(|p| p.name.clone()).collect();
                vec![self.show(
                    player,
                    Stage::PermissionRemove { candidates },
                    forms::permission_remove_form(names),
                )]
            }
            _ => Vec::new(),
        }
    }

    fn resolve_permission_add(
        &mut self,
        store: &SellGuiStore,
        player: &str,
        candidates: Vec<PlayerInfo>,
        response: FormResponse,
    ) -> Result<Vec<Effect>, SellGuiError> {
        let FormResponse::Submit(values) = response else {
            return Ok(Vec::new());
        };
        let Some(target) = index_value(&values, 0).and_then(|i| candidates.into_iter().nth(i))
        else {
            return Ok(Vec::new());
        };
        match self.permissions.grant(&target.id) {
            Ok(()) => {
                store.save_players(self.permissions.players())?;
                store.append_audit(&format!("{} granted settings access to {}", player, target.id))?;
                info!("{} granted settings access to {}", player, target.id);
                Ok(Vec::new())
            }
            Err(err) => Ok(vec![Self::prefixed(player, err)]),
        }
    }

    fn resolve_permission_remove(
        &mut self,
        store: &SellGuiStore,
        player: &str,
        candidates: Vec<PlayerInfo>,
        response: FormResponse,
    ) -> Result<Vec<Effect>, SellGuiError> {
        let FormResponse::Submit(values) = response else {
            return Ok(Vec::new());
        };
        let Some(target) = index_value(&values, 0).and_then(|i| candidates.into_iter().nth(i))
        else {
            return Ok(Vec::new());
        };
        match self.permissions.revoke(&target.id) {
            Ok(()) => {
                store.save_players(self.permissions.players())?;
                store.append_audit(&format!("{} revoked settings access from {}", player, target.id))?;
                info!("{} revoked settings access from {}", player, target.id);
                Ok(Vec::new())
            }
            Err(err) => Ok(vec![Self::prefixed(player, err)]),
        }
    }

    fn resolve_sell_quantity(
        &mut self,
        store: &SellGuiStore,
        host: &dyn WorldHost,
        player: &str,
        entry: SellEntry,
        response: FormResponse,
    ) -> Result<Vec<Effect>, SellGuiError> {
        let FormResponse::Submit(values) = response else {
            return Ok(Vec::new());
        };
        let Some(amount) = amount_value(&values, 0) else {
            return Ok(Vec::new());
        };
        // The channel may have been removed while the prompt was open.
        if !host.objective_exists(&entry.scoreboard) {
            debug!(
                "currency channel {} gone, dropping sale by {}",
                entry.scoreboard, player
            );
            return Ok(Vec::new());
        }
        let total = u64::from(amount) * u64::from(entry.value);
        store.append_audit(&format!(
            "{} sold {} x {} for {} on {}",
            player, amount, entry.item_id, total, entry.scoreboard
        ))?;
        info!(
            "{} sold {} x {} for {}",
            player,
            amount,
            escape_log(&entry.item_id),
            total
        );
        Ok(vec![
            Effect::ClearItems {
                player: player.to_string(),
                item_id: entry.item_id.clone(),
                amount,
            },
            Effect::AddScore {
                player: player.to_string(),
                objective: entry.scoreboard.clone(),
                amount: total,
            },
            Self::message(
                player,
                format!(
                    "You sold {} item(s) of {}, for {}",
                    amount, entry.item_display_name, total
                ),
            ),
        ])
    }
}

/// Run the positive-integer rule on one field, turning a failure into the
/// player-facing message so both bad fields of one submission report.
fn check_field(
    raw: &str,
    field: &'static str,
    player: &str,
    effects: &mut Vec<Effect>,
) -> Option<u32> {
    match parse_positive_integer(raw, field) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            effects.push(SellGui::prefixed(player, err));
            None
        }
    }
}

fn text_value(values: &[FieldValue], index: usize) -> Option<&str> {
    match values.get(index) {
        Some(FieldValue::Text(s)) => Some(s),
        _ => None,
    }
}

fn index_value(values: &[FieldValue], index: usize) -> Option<usize> {
    match values.get(index) {
        Some(FieldValue::Index(i)) => Some(*i),
        _ => None,
    }
}

fn amount_value(values: &[FieldValue], index: usize) -> Option<u32> {
    match values.get(index) {
        Some(FieldValue::Amount(a)) => Some(*a),
        _ => None,
    }
}
