//! In-memory world used by the development server loop and the test
//! suite. Scoreboards, stacked inventories, and the online-player roster
//! behave like the real host's, minus everything the GUI never touches.

use std::collections::BTreeMap;

use crate::host::WorldHost;
use crate::sell::engine::Effect;
use crate::sell::types::{PlayerId, PlayerInfo};

#[derive(Debug, Default)]
pub struct SimWorld {
    objectives: BTreeMap<String, BTreeMap<PlayerId, i64>>,
    inventories: BTreeMap<PlayerId, Vec<(String, u32)>>,
    players: Vec<PlayerInfo>,
    messages: Vec<(PlayerId, String)>,
}

impl SimWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring a player online.
    pub fn join(&mut self, id: &str, name: &str) {
        if !self.players.iter().any(|p| p.id == id) {
            self.players.push(PlayerInfo {
                id: id.to_string(),
                name: name.to_string(),
            });
        }
    }

    pub fn add_objective(&mut self, id: &str) {
        self.objectives.entry(id.to_string()).or_default();
    }

    pub fn remove_objective(&mut self, id: &str) {
        self.objectives.remove(id);
    }

    pub fn set_score(&mut self, objective: &str, player: &str, score: i64) {
        self.objectives
            .entry(objective.to_string())
            .or_default()
            .insert(player.to_string(), score);
    }

    pub fn score(&self, objective: &str, player: &str) -> Option<i64> {
        self.objectives
            .get(objective)
            .and_then(|scores| scores.get(player))
            .copied()
    }

    /// Add a stack to the player's inventory. Repeated gives of the same
    /// item stay separate stacks, the way real inventories fragment.
    pub fn give(&mut self, player: &str, item_id: &str, amount: u32) {
        self.inventories
            .entry(player.to_string())
            .or_default()
            .push((item_id.to_string(), amount));
    }

    /// Apply a world-mutating effect. Chat messages are collected for
    /// inspection; form display is the caller's business.
    pub fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::ClearItems {
                player,
                item_id,
                amount,
            } => self.clear_items(player, item_id, *amount),
            Effect::AddScore {
                player,
                objective,
                amount,
            } => {
                let scores = self.objectives.entry(objective.clone()).or_default();
                *scores.entry(player.clone()).or_insert(0) += *amount as i64;
            }
            Effect::Message { player, text } => {
                self.messages.push((player.clone(), text.clone()));
            }
            Effect::ShowForm { .. } => {}
        }
    }

    fn clear_items(&mut self, player: &str, item_id: &str, mut amount: u32) {
        if let Some(stacks) = self.inventories.get_mut(player) {
            for stack in stacks.iter_mut() {
                if stack.0 == item_id && amount > 0 {
                    let take = amount.min(stack.1);
                    stack.1 -= take;
                    amount -= take;
                }
            }
            stacks.retain(|stack| stack.1 > 0);
        }
    }

    /// Human-readable snapshot for the simulator's `world` command.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.players.is_empty() {
            lines.push("no players online".to_string());
        }
        for player in &self.players {
            let inventory = self
                .inventories
                .get(&player.id)
                .map(|stacks| {
                    stacks
                        .iter()
                        .map(|(item, amount)| format!("{} x{}", item, amount))
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "empty".to_string());
            lines.push(format!("{} ({}): {}", player.name, player.id, inventory));
        }
        for (objective, scores) in &self.objectives {
            let entries = scores
                .iter()
                .map(|(player, score)| format!("{}={}", player, score))
                .collect::<Vec<_>>()
                .join(", ");
            if entries.is_empty() {
                lines.push(format!("objective {}: (empty)", objective));
            } else {
                lines.push(format!("objective {}: {}", objective, entries));
            }
        }
        lines
    }

    pub fn messages(&self) -> &[(PlayerId, String)] {
        &self.messages
    }

    pub fn drain_messages(&mut self) -> Vec<(PlayerId, String)> {
        std::mem::take(&mut self.messages)
    }
}

impl WorldHost for SimWorld {
    fn ensure_objective(&mut self, id: &str) {
        self.objectives.entry(id.to_string()).or_default();
    }

    fn objective_exists(&self, id: &str) -> bool {
        self.objectives.contains_key(id)
    }

    fn objective_ids(&self) -> Vec<String> {
        self.objectives.keys().cloned().collect()
    }

    fn signal_entries(&self, objective: &str) -> Vec<(PlayerId, i64)> {
        self.objectives
            .get(objective)
            .map(|scores| scores.iter().map(|(p, s)| (p.clone(), *s)).collect())
            .unwrap_or_default()
    }

    fn clear_signal(&mut self, objective: &str, player: &str) {
        if let Some(scores) = self.objectives.get_mut(objective) {
            scores.remove(player);
        }
    }

    fn count_items(&self, player: &str, item_id: &str) -> u32 {
        self.inventories
            .get(player)
            .map(|stacks| {
                stacks
                    .iter()
                    .filter(|stack| stack.0 == item_id)
                    .map(|stack| stack.1)
                    .sum()
            })
            .unwrap_or(0)
    }

    fn online_players(&self) -> Vec<PlayerInfo> {
        self.players.clone()
    }
}
