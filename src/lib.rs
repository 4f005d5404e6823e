//! # Sellgui - configurable sell menus for game-world economies
//!
//! Sellgui lets a world owner configure sellable items (sell id → item,
//! unit price, currency scoreboard) and lets players sell inventory items
//! for scoreboard currency through modal menus.
//!
//! ## Features
//!
//! - **Settings Menus**: Create/edit/delete sale definitions through modal
//!   forms, gated by a permission list with a permanently-claimed owner.
//! - **Sell Sweep**: A periodic pass drains sell requests signalled on a
//!   shared scoreboard objective and prompts each player for a quantity.
//! - **Write-Through Persistence**: Registry, permission list, and owner
//!   claim live in string properties inside an embedded sled store and are
//!   flushed after every mutation.
//! - **Host-Neutral Core**: The engine consumes events and emits typed
//!   effects; the game host (or the bundled in-memory simulator) applies
//!   them, so the core never blocks and holds no locks.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sellgui::sell::{SellGui, SellGuiStore};
//! use sellgui::sim::SimWorld;
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = SellGuiStore::open("data/sellgui")?;
//!     let mut gui = SellGui::load(&store, "sellgui:sell_gui_settings", "sellGuiID")?;
//!     let mut world = SimWorld::new();
//!
//!     // One sweep: drain sell signals into prompts and messages.
//!     for effect in gui.on_tick(&mut world) {
//!         world.apply(&effect);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`sell`] - Registry, permissions, forms, storage, and the engine
//! - [`host`] - The trait the game world implements for the engine
//! - [`sim`] - In-memory world for development and tests
//! - [`config`] - Configuration management and validation
//! - [`validation`] - Form field validation
//! - [`logutil`] - Log sanitization helpers

pub mod config;
pub mod host;
pub mod logutil;
pub mod sell;
pub mod sim;
pub mod validation;
