//! Sell GUI data model, persistence, and the menu-driven engine.
//!
//! The registry and permission list are the durable configuration state;
//! the engine turns item-use events, sweep ticks, and form results into
//! host effects. Everything here is synchronous and lock-free: the host
//! scheduler runs one continuation at a time.

pub mod engine;
pub mod errors;
pub mod forms;
pub mod permissions;
pub mod registry;
pub mod storage;
pub mod types;

pub use engine::{Effect, SellGui};
pub use errors::SellGuiError;
pub use forms::{ActionForm, Field, FieldValue, FormResponse, FormSpec, ModalForm};
pub use permissions::Permissions;
pub use registry::SellRegistry;
pub use storage::{SellGuiStore, PROP_OWNER, PROP_VALID_IDS, PROP_VALID_PLAYERS};
pub use types::{OwnerState, PlayerId, PlayerInfo, SellEntry, SellId};
