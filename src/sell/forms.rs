//! Host-neutral descriptions of the menus the GUI presents and the
//! responses that come back. The field order inside each form is part of
//! the contract with the host's form renderer; the engine indexes
//! submissions positionally.

use super::types::{SellEntry, SellId};

#[derive(Debug, Clone, PartialEq)]
pub enum FormSpec {
    Action(ActionForm),
    Modal(ModalForm),
}

/// A button menu: the response is the pressed button's position.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionForm {
    pub title: String,
    pub body: Option<String>,
    pub buttons: Vec<String>,
}

/// An input form: the response carries one value per field, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalForm {
    pub title: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Text {
        label: String,
        placeholder: String,
        default: Option<String>,
    },
    Dropdown {
        label: String,
        options: Vec<String>,
        default_index: usize,
    },
    Slider {
        label: String,
        min: u32,
        max: u32,
        step: u32,
    },
}

/// What the player did with a form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormResponse {
    /// Dismissed without answering; aborts the interaction.
    Cancelled,
    /// An action-form button, by position.
    Button(usize),
    /// Modal submission, one value per field in declaration order.
    Submit(Vec<FieldValue>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Index(usize),
    Amount(u32),
}

fn text(label: &str, placeholder: &str) -> Field {
    Field::Text {
        label: label.to_string(),
        placeholder: placeholder.to_string(),
        default: None,
    }
}

fn text_with_default(label: &str, placeholder: &str, default: &str) -> Field {
    Field::Text {
        label: label.to_string(),
        placeholder: placeholder.to_string(),
        default: Some(default.to_string()),
    }
}

pub fn owner_claim_form() -> FormSpec {
    FormSpec::Action(ActionForm {
        title: "Owner Initialization".to_string(),
        body: Some("Press this button to claim owner status".to_string()),
        buttons: vec!["Claim".to_string()],
    })
}

pub fn settings_root_form(is_owner: bool) -> FormSpec {
    let mut buttons = vec![
        "Create New Sell ID".to_string(),
        "Edit Existing Sell ID".to_string(),
        "Delete Existing Sell ID".to_string(),
    ];
    if is_owner {
        buttons.push("Sell Settings Permissions".to_string());
    }
    FormSpec::Action(ActionForm {
        title: "Sell GUI Settings".to_string(),
        body: None,
        buttons,
    })
}

pub fn create_form(channels: &[String]) -> FormSpec {
    FormSpec::Modal(ModalForm {
        title: "Create New ID".to_string(),
        fields: vec![
            text("Score ID", "Enter a positive integer"),
            text_with_default(
                "Item ID\nEx: minecraft:dirt, modpack:custom_item",
                "namespace:item",
                "minecraft:",
            ),
            text("Custom Display Name\nEx: Dirt, Custom Item", ""),
            text("Item Sell Value", "Enter a positive integer"),
            Field::Dropdown {
                label: "Currency Scoreboard".to_string(),
                options: channels.to_vec(),
                default_index: 0,
            },
        ],
    })
}

pub fn edit_select_form(display_names: Vec<String>) -> FormSpec {
    FormSpec::Modal(ModalForm {
        title: "(Edit) Select Entry".to_string(),
        fields: vec![Field::Dropdown {
            label: "Select From Item Display Name".to_string(),
            options: display_names,
            default_index: 0,
        }],
    })
}

pub fn edit_form(sell_id: SellId, entry: &SellEntry, channels: &[String]) -> FormSpec {
    // Fall back to the first channel when the stored one no longer exists.
    let channel_index = channels
        .iter()
        .position(|c| c == &entry.scoreboard)
        .unwrap_or(0);
    FormSpec::Modal(ModalForm {
        title: format!("Editing: {}", entry.item_display_name),
        fields: vec![
            text_with_default("Score ID", "Enter a positive integer", &sell_id.to_string()),
            text_with_default(
                "Item ID\nEx: minecraft:dirt, modpack:custom_item",
                "namespace:item",
                &entry.item_id,
            ),
            text_with_default(
                "Custom Display Name\nEx: Dirt, Custom Item",
                "",
                &entry.item_display_name,
            ),
            text_with_default("Item Sell Value", "Enter a positive integer", &entry.value.to_string()),
            Field::Dropdown {
                label: "Currency Scoreboard".to_string(),
                options: channels.to_vec(),
                default_index: channel_index,
            },
        ],
    })
}

pub fn delete_select_form(item_ids: Vec<String>) -> FormSpec {
    FormSpec::Modal(ModalForm {
        title: String::new(),
        fields: vec![Field::Dropdown {
            label: "Select From Item ID".to_string(),
            options: item_ids,
            default_index: 0,
        }],
    })
}

pub fn delete_confirm_form() -> FormSpec {
    FormSpec::Action(ActionForm {
        title: "Confirm Deletion".to_string(),
        body: None,
        buttons: vec!["Confirm".to_string()],
    })
}

pub fn permissions_root_form() -> FormSpec {
    FormSpec::Action(ActionForm {
        title: "Edit Sell Settings Permissions".to_string(),
        body: None,
        buttons: vec!["Add Permission".to_string(), "Remove Permission".to_string()],
    })
}

pub fn permission_add_form(names: Vec<String>) -> FormSpec {
    FormSpec::Modal(ModalForm {
        title: "Add Sell Gui Permission".to_string(),
        fields: vec![Field::Dropdown {
            label: "Select player to give permission".to_string(),
            options: names,
            default_index: 0,
        }],
    })
}

pub fn permission_remove_form(names: Vec<String>) -> FormSpec {
    FormSpec::Modal(ModalForm {
        title: "Remove Sell Gui Permission".to_string(),
        fields: vec![Field::Dropdown {
            label: "Select player to remove permission".to_string(),
            options: names,
            default_index: 0,
        }],
    })
}

pub fn sell_quantity_form(display_name: &str, max: u32) -> FormSpec {
    FormSpec::Modal(ModalForm {
        title: format!("Sell {}", display_name),
        fields: vec![Field::Slider {
            label: "Select Amount to Sell".to_string(),
            min: 1,
            max,
            step: 1,
        }],
    })
}
