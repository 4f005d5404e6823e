use serde::{Deserialize, Serialize};

/// Numeric key identifying one configured sale. Persisted as the
/// stringified integer inside the registry property.
pub type SellId = u32;

/// Opaque player identifier assigned by the host world.
pub type PlayerId = String;

/// One configured sale: which item, at what unit price, paid into which
/// currency scoreboard. Serde names match the persisted JSON property.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SellEntry {
    pub item_id: String,
    pub item_display_name: String,
    pub value: u32,
    pub scoreboard: String,
}

/// Ownership of the configuration menus. Claiming is permanent; there is
/// no transfer or re-claim path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerState {
    Unclaimed,
    Claimed(PlayerId),
}

/// An online player as reported by the host world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sell_entry_uses_property_field_names() {
        let entry = SellEntry {
            item_id: "minecraft:diamond".to_string(),
            item_display_name: "Diamond".to_string(),
            value: 10,
            scoreboard: "money".to_string(),
        };
        let json = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(json["itemId"], "minecraft:diamond");
        assert_eq!(json["itemDisplayName"], "Diamond");
        assert_eq!(json["value"], 10);
        assert_eq!(json["scoreboard"], "money");
    }
}
