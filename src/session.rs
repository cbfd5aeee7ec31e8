use crate::api::models::Session;
use crate::storage::{self, StoreError};

/// Fixed local-store key for the persisted session.
pub const CURRENT_USER_KEY: &str = "serviceCurrentUser";

pub(crate) fn encode(session: &Session) -> Result<String, serde_json::Error> {
    serde_json::to_string(session)
}

// Trust-on-read: whatever parses is treated as authenticated, anything else
// means anonymous. There is no expiry and no server-side re-validation.
pub(crate) fn decode(raw: &str) -> Option<Session> {
    serde_json::from_str(raw).ok()
}

/// Rehydrate the session persisted by the last successful login/register,
/// if any.
pub fn restore() -> Option<Session> {
    match storage::get(CURRENT_USER_KEY) {
        Ok(Some(raw)) => decode(&raw),
        Ok(None) => None,
        Err(err) => {
            log::warn!("could not read stored session: {err}");
            None
        }
    }
}

pub fn save(session: &Session) -> Result<(), StoreError> {
    let raw = encode(session)?;
    storage::set(CURRENT_USER_KEY, &raw)
}

pub fn clear() -> Result<(), StoreError> {
    storage::remove(CURRENT_USER_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::Role;
    use rusqlite::Connection;

    fn bob() -> Session {
        Session {
            id: 1,
            username: "bob".into(),
            role: Role::Provider,
        }
    }

    #[test]
    fn encode_decode_round_trip() {
        let raw = encode(&bob()).unwrap();
        assert_eq!(decode(&raw), Some(bob()));
    }

    #[test]
    fn decode_garbage_is_anonymous() {
        assert_eq!(decode("not json"), None);
        assert_eq!(decode(r#"{"id":"one"}"#), None);
    }

    // The persisted-session invariant: what login writes under the fixed key
    // is exactly what a reload reads back.
    #[test]
    fn persisted_session_survives_reload() {
        let conn = Connection::open_in_memory().unwrap();
        storage::init_in(&conn).unwrap();

        let raw = encode(&bob()).unwrap();
        storage::set_in(&conn, CURRENT_USER_KEY, &raw).unwrap();

        let reloaded = storage::get_in(&conn, CURRENT_USER_KEY)
            .unwrap()
            .as_deref()
            .and_then(decode);
        assert_eq!(reloaded, Some(bob()));
    }

    #[test]
    fn logout_leaves_no_entry() {
        let conn = Connection::open_in_memory().unwrap();
        storage::init_in(&conn).unwrap();

        storage::set_in(&conn, CURRENT_USER_KEY, &encode(&bob()).unwrap()).unwrap();
        storage::remove_in(&conn, CURRENT_USER_KEY).unwrap();
        assert_eq!(storage::get_in(&conn, CURRENT_USER_KEY).unwrap(), None);
    }
}
