//! Sled-backed persistence for the GUI's world properties and audit trail.
//!
//! All durable state lives in string-valued properties under fixed keys;
//! the registry and permission list are JSON-encoded, the owner claim is a
//! bare player id. A second tree keeps a timestamp-keyed audit log of
//! configuration changes and completed sales.

use std::path::Path;

use chrono::Utc;

use super::errors::SellGuiError;
use super::permissions::Permissions;
use super::registry::SellRegistry;
use super::types::PlayerId;

/// Property keys, fixed by the persisted-state contract.
pub const PROP_VALID_IDS: &str = "sellGui:validIds";
pub const PROP_VALID_PLAYERS: &str = "sellGui:validPlayers";
pub const PROP_OWNER: &str = "TheOlamicOrangePacks:owner";

const TREE_PROPERTIES: &str = "sellgui_properties";
const TREE_AUDIT: &str = "sellgui_audit";

fn next_timestamp_nanos() -> i64 {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros() * 1000)
}

/// Process-wide string property store plus the audit trail.
pub struct SellGuiStore {
    _db: sled::Db,
    properties: sled::Tree,
    audit: sled::Tree,
}

impl SellGuiStore {
    /// Open (or create) the store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SellGuiError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let properties = db.open_tree(TREE_PROPERTIES)?;
        let audit = db.open_tree(TREE_AUDIT)?;
        Ok(Self {
            _db: db,
            properties,
            audit,
        })
    }

    pub fn get_property(&self, key: &str) -> Result<Option<String>, SellGuiError> {
        let Some(bytes) = self.properties.get(key.as_bytes())? else {
            return Ok(None);
        };
        Ok(Some(std::str::from_utf8(&bytes)?.to_string()))
    }

    /// Write-through: every set is flushed before returning.
    pub fn set_property(&self, key: &str, value: &str) -> Result<(), SellGuiError> {
        self.properties.insert(key.as_bytes(), value.as_bytes())?;
        self.properties.flush()?;
        Ok(())
    }

    /// Load the registry property, defaulting to empty when absent.
    pub fn load_registry(&self) -> Result<SellRegistry, SellGuiError> {
        match self.get_property(PROP_VALID_IDS)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(SellRegistry::new()),
        }
    }

    pub fn save_registry(&self, registry: &SellRegistry) -> Result<(), SellGuiError> {
        self.set_property(PROP_VALID_IDS, &serde_json::to_string(registry)?)
    }

    /// Load the permission list and the owner claim together.
    pub fn load_permissions(&self) -> Result<Permissions, SellGuiError> {
        let players: Vec<PlayerId> = match self.get_property(PROP_VALID_PLAYERS)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        };
        let owner = self.get_property(PROP_OWNER)?;
        Ok(Permissions::new(owner, players))
    }

    pub fn save_players(&self, players: &[PlayerId]) -> Result<(), SellGuiError> {
        self.set_property(PROP_VALID_PLAYERS, &serde_json::to_string(players)?)
    }

    /// The owner property is the bare player id, not JSON.
    pub fn save_owner(&self, owner: &str) -> Result<(), SellGuiError> {
        self.set_property(PROP_OWNER, owner)
    }

    /// Append one line to the audit trail. Keys are nanosecond timestamps
    /// with a sequence suffix so same-instant appends never collide.
    pub fn append_audit(&self, line: &str) -> Result<(), SellGuiError> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static SEQ: AtomicU64 = AtomicU64::new(0);
        let seq = SEQ.fetch_add(1, Ordering::Relaxed);
        let key = format!("audit:{:020}:{:06}", next_timestamp_nanos(), seq).into_bytes();
        self.audit.insert(key, line.as_bytes())?;
        self.audit.flush()?;
        Ok(())
    }

    /// Most recent audit lines, newest first.
    pub fn recent_audit(&self, limit: usize) -> Result<Vec<String>, SellGuiError> {
        let mut lines = Vec::new();
        for entry in self.audit.iter().rev().take(limit) {
            let (_, value) = entry?;
            lines.push(String::from_utf8_lossy(&value).to_string());
        }
        Ok(lines)
    }
}
