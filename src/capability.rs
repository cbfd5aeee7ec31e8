//! Role checks shared by the marker projection and the window chrome, so the
//! popup buttons and the header buttons can never disagree about who may do
//! what.

use crate::api::models::{Role, Session, Shop};

/// Providers and admins may add shops.
pub fn can_add_shop(session: Option<&Session>) -> bool {
    matches!(
        session,
        Some(s) if s.role == Role::Provider || s.role == Role::Admin
    )
}

/// Picking a location on the map follows the same gate as adding a shop;
/// the pick exists only to fill the add-shop form.
pub fn can_pick_location(session: Option<&Session>) -> bool {
    can_add_shop(session)
}

/// Only plain users request service from a shop.
pub fn can_request_service(session: Option<&Session>) -> bool {
    matches!(session, Some(s) if s.role == Role::User)
}

/// The owning account, or the account literally named "admin". The username
/// comparison (rather than the role) mirrors the backend's delete rule.
pub fn can_delete_shop(session: Option<&Session>, shop: &Shop) -> bool {
    match session {
        Some(s) => s.id == shop.owner_id || s.username == "admin",
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: i64, username: &str, role: Role) -> Session {
        Session {
            id,
            username: username.into(),
            role,
        }
    }

    fn shop(owner_id: i64) -> Shop {
        Shop {
            id: 5,
            owner_id,
            name: "Fix-It".into(),
            service: "Plumbing".into(),
            phone: "0300-1234567".into(),
            address: "12 Canal Rd".into(),
            description: "Taps and pipes".into(),
            lat: 31.52,
            lng: 74.35,
        }
    }

    #[test]
    fn provider_bob_may_add_shops() {
        let bob = session(1, "bob", Role::Provider);
        assert!(can_add_shop(Some(&bob)));
        assert!(can_pick_location(Some(&bob)));
    }

    #[test]
    fn anonymous_may_do_nothing() {
        assert!(!can_add_shop(None));
        assert!(!can_pick_location(None));
        assert!(!can_request_service(None));
        assert!(!can_delete_shop(None, &shop(1)));
    }

    #[test]
    fn plain_users_request_but_never_add() {
        let alice = session(2, "alice", Role::User);
        assert!(can_request_service(Some(&alice)));
        assert!(!can_add_shop(Some(&alice)));
        assert!(!can_pick_location(Some(&alice)));
    }

    #[test]
    fn providers_do_not_request_service() {
        let bob = session(1, "bob", Role::Provider);
        assert!(!can_request_service(Some(&bob)));
    }

    #[test]
    fn delete_is_owner_or_admin_account_only() {
        let owner = session(1, "bob", Role::Provider);
        let stranger = session(2, "eve", Role::Provider);
        let admin = session(3, "admin", Role::Admin);

        assert!(can_delete_shop(Some(&owner), &shop(1)));
        assert!(!can_delete_shop(Some(&stranger), &shop(1)));
        assert!(can_delete_shop(Some(&admin), &shop(1)));
    }

    #[test]
    fn admin_check_is_by_username_not_role() {
        // An account whose role is admin but whose name is not "admin" only
        // deletes its own shops; the backend keys on the name.
        let role_admin = session(4, "root", Role::Admin);
        assert!(!can_delete_shop(Some(&role_admin), &shop(1)));

        let name_admin = session(5, "admin", Role::User);
        assert!(can_delete_shop(Some(&name_admin), &shop(1)));
    }
}
