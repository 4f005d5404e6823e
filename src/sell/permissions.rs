//! Menu access control: the permission list and the one-shot owner claim.

use super::errors::SellGuiError;
use super::types::{OwnerState, PlayerId};

/// Players allowed to open the settings menus, plus the single owner with
/// elevated rights. The owner is always on the list and cannot be revoked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Permissions {
    owner: Option<PlayerId>,
    players: Vec<PlayerId>,
}

impl Permissions {
    pub fn new(owner: Option<PlayerId>, players: Vec<PlayerId>) -> Self {
        Self { owner, players }
    }

    pub fn owner_state(&self) -> OwnerState {
        match &self.owner {
            Some(id) => OwnerState::Claimed(id.clone()),
            None => OwnerState::Unclaimed,
        }
    }

    pub fn owner(&self) -> Option<&PlayerId> {
        self.owner.as_ref()
    }

    pub fn is_owner(&self, player: &str) -> bool {
        self.owner.as_deref() == Some(player)
    }

    /// Membership gate for the settings menus. Players outside the list
    /// are never shown a menu; there is no explicit denial.
    pub fn is_authorized(&self, player: &str) -> bool {
        self.players.iter().any(|p| p == player)
    }

    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// First use of the settings item claims ownership permanently and
    /// grants the claimant menu access. Returns false (and changes
    /// nothing) if an owner already exists.
    pub fn claim_owner(&mut self, player: &str) -> bool {
        if self.owner.is_some() {
            return false;
        }
        self.owner = Some(player.to_string());
        if !self.is_authorized(player) {
            self.players.push(player.to_string());
        }
        true
    }

    pub fn grant(&mut self, player: &str) -> Result<(), SellGuiError> {
        if self.is_authorized(player) {
            return Err(SellGuiError::AlreadyGranted(player.to_string()));
        }
        self.players.push(player.to_string());
        Ok(())
    }

    pub fn revoke(&mut self, player: &str) -> Result<(), SellGuiError> {
        if self.is_owner(player) {
            return Err(SellGuiError::OwnerProtected);
        }
        match self.players.iter().position(|p| p == player) {
            Some(index) => {
                self.players.remove(index);
                Ok(())
            }
            None => Err(SellGuiError::NotGranted(player.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_is_permanent_and_grants_access() {
        let mut perms = Permissions::default();
        assert_eq!(perms.owner_state(), OwnerState::Unclaimed);
        assert!(perms.claim_owner("alice"));
        assert!(perms.is_owner("alice"));
        assert!(perms.is_authorized("alice"));

        // A second claim changes nothing.
        assert!(!perms.claim_owner("bob"));
        assert!(perms.is_owner("alice"));
        assert!(!perms.is_authorized("bob"));
    }

    #[test]
    fn revoke_never_removes_the_owner() {
        let mut perms = Permissions::default();
        perms.claim_owner("alice");
        let err = perms.revoke("alice").unwrap_err();
        assert!(matches!(err, SellGuiError::OwnerProtected));
        assert!(perms.is_authorized("alice"));
    }

    #[test]
    fn grant_rejects_duplicates() {
        let mut perms = Permissions::default();
        perms.grant("bob").expect("grant");
        let err = perms.grant("bob").unwrap_err();
        assert!(matches!(err, SellGuiError::AlreadyGranted(_)));
        assert_eq!(perms.players().len(), 1);
    }

    #[test]
    fn revoke_requires_membership() {
        let mut perms = Permissions::default();
        let err = perms.revoke("bob").unwrap_err();
        assert!(matches!(err, SellGuiError::NotGranted(_)));

        perms.grant("bob").expect("grant");
        perms.revoke("bob").expect("revoke");
        assert!(!perms.is_authorized("bob"));
    }
}
