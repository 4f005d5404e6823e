//! The host-world surface the sell GUI depends on.
//!
//! The engine never talks to the game world directly: scoreboard reads,
//! inventory counts, and the player roster come in through this trait, and
//! everything going the other way is an [`Effect`](crate::sell::Effect)
//! the adapter applies. The real game server implements this;
//! [`SimWorld`](crate::sim::SimWorld) is the in-memory stand-in used by
//! the development loop and the tests.

use crate::sell::types::{PlayerId, PlayerInfo};

pub trait WorldHost {
    /// Create the objective if the host does not know it yet.
    fn ensure_objective(&mut self, id: &str);

    fn objective_exists(&self, id: &str) -> bool;

    /// Identifiers of every objective, in stable order.
    fn objective_ids(&self) -> Vec<String>;

    /// Player-typed entries of an objective as (player, score) pairs.
    fn signal_entries(&self, objective: &str) -> Vec<(PlayerId, i64)>;

    /// Remove one player's participation in an objective.
    fn clear_signal(&mut self, objective: &str, player: &str);

    /// Total units of `item_id` held across all of the player's stacks.
    fn count_items(&self, player: &str, item_id: &str) -> u32;

    fn online_players(&self) -> Vec<PlayerInfo>;
}
