use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Result};

pub fn get_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM preferences WHERE key = ?",
        [key],
        |row| row.get(0),
    )
    .optional()
}

pub fn put_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let updated_at = Utc::now().timestamp();
    conn.execute(
        "INSERT INTO preferences (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        rusqlite::params![key, value, updated_at],
    )?;
    Ok(())
}

/// Returns whether a row was actually removed.
pub fn remove_value(conn: &Connection, key: &str) -> Result<bool> {
    let removed = conn.execute("DELETE FROM preferences WHERE key = ?", [key])?;
    Ok(removed > 0)
}

pub fn clear(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM preferences", [])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_in_memory;

    #[test]
    fn test_put_and_get_value() {
        let conn = init_in_memory().unwrap();

        put_value(&conn, "pref_numberOfChoices", "4").unwrap();
        assert_eq!(
            get_value(&conn, "pref_numberOfChoices").unwrap(),
            Some("4".to_string())
        );
    }

    #[test]
    fn test_put_overwrites_existing_value() {
        let conn = init_in_memory().unwrap();

        put_value(&conn, "pref_numberOfChoices", "4").unwrap();
        put_value(&conn, "pref_numberOfChoices", "6").unwrap();
        assert_eq!(
            get_value(&conn, "pref_numberOfChoices").unwrap(),
            Some("6".to_string())
        );
    }

    #[test]
    fn test_get_missing_value() {
        let conn = init_in_memory().unwrap();
        assert!(get_value(&conn, "missing").unwrap().is_none());
    }

    #[test]
    fn test_remove_value() {
        let conn = init_in_memory().unwrap();

        put_value(&conn, "k", "v").unwrap();
        assert!(remove_value(&conn, "k").unwrap());
        assert!(!remove_value(&conn, "k").unwrap());
        assert!(get_value(&conn, "k").unwrap().is_none());
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");

        {
            let conn = crate::db::init_db(&db_path).unwrap();
            put_value(&conn, "pref_regionsToInclude", "[\"Asia\"]").unwrap();
        }

        let conn = crate::db::init_db(&db_path).unwrap();
        assert_eq!(
            get_value(&conn, "pref_regionsToInclude").unwrap(),
            Some("[\"Asia\"]".to_string())
        );
    }
}
