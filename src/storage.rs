use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no platform data directory available")]
    NoDataDir,
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn db_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("com", "example", "ServiceProGtk")?;
    Some(proj.data_dir().join("local.sqlite"))
}

fn ensure_dir(path: &PathBuf) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn open_conn() -> Result<Connection, StoreError> {
    let path = db_path().ok_or(StoreError::NoDataDir)?;
    ensure_dir(&path)?;
    Ok(Connection::open(path)?)
}

// One key/value table stands in for the browser's local storage: a single
// JSON-encoded value per fixed key.
pub fn init() -> Result<(), StoreError> {
    let conn = open_conn()?;
    init_in(&conn)
}

pub(crate) fn init_in(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS local_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

pub fn get(key: &str) -> Result<Option<String>, StoreError> {
    let conn = open_conn()?;
    get_in(&conn, key)
}

pub(crate) fn get_in(conn: &Connection, key: &str) -> Result<Option<String>, StoreError> {
    let mut stmt = conn.prepare("SELECT value FROM local_store WHERE key = ?1")?;
    let value: Option<String> = stmt.query_row(params![key], |row| row.get(0)).optional()?;
    Ok(value)
}

pub fn set(key: &str, value: &str) -> Result<(), StoreError> {
    let conn = open_conn()?;
    set_in(&conn, key, value)
}

pub(crate) fn set_in(conn: &Connection, key: &str, value: &str) -> Result<(), StoreError> {
    conn.execute(
        r#"
        INSERT INTO local_store (key, value)
        VALUES (?1, ?2)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        "#,
        params![key, value],
    )?;
    Ok(())
}

pub fn remove(key: &str) -> Result<(), StoreError> {
    let conn = open_conn()?;
    remove_in(&conn, key)
}

pub(crate) fn remove_in(conn: &Connection, key: &str) -> Result<(), StoreError> {
    conn.execute("DELETE FROM local_store WHERE key = ?1", params![key])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_in(&conn).unwrap();
        conn
    }

    #[test]
    fn set_then_get_returns_value() {
        let conn = test_conn();
        set_in(&conn, "k", "v1").unwrap();
        assert_eq!(get_in(&conn, "k").unwrap().as_deref(), Some("v1"));
    }

    #[test]
    fn set_overwrites_existing_key() {
        let conn = test_conn();
        set_in(&conn, "k", "v1").unwrap();
        set_in(&conn, "k", "v2").unwrap();
        assert_eq!(get_in(&conn, "k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn remove_clears_the_entry() {
        let conn = test_conn();
        set_in(&conn, "k", "v").unwrap();
        remove_in(&conn, "k").unwrap();
        assert_eq!(get_in(&conn, "k").unwrap(), None);
    }

    #[test]
    fn get_on_missing_key_is_none() {
        let conn = test_conn();
        assert_eq!(get_in(&conn, "missing").unwrap(), None);
    }
}
