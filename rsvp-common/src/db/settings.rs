//! Settings database access
//!
//! Read/write settings from the settings table (key-value store).
//! Two keys are used by the reader: the saved reading speed and the
//! blacklist of deleted clipboard texts.

use crate::{Result, Wpm};
use sqlx::{Pool, Sqlite};
use tracing::warn;

/// Saved reading speed, stored as a plain number
pub const SAVED_WPM_KEY: &str = "saved_wpm";

/// Deleted clipboard texts, stored as a JSON array of strings
pub const DELETED_TEXTS_KEY: &str = "deleted_texts";

/// Load the saved reading speed
///
/// A missing or unrecognized value yields `fallback`; stored values are only
/// trusted when they are on the speed menu.
pub async fn load_speed(db: &Pool<Sqlite>, fallback: Wpm) -> Result<Wpm> {
    match get_setting(db, SAVED_WPM_KEY).await? {
        Some(raw) => match raw.parse::<Wpm>() {
            Ok(wpm) => Ok(wpm),
            Err(e) => {
                warn!("Ignoring saved speed: {}", e);
                Ok(fallback)
            }
        },
        None => Ok(fallback),
    }
}

/// Save the reading speed
pub async fn save_speed(db: &Pool<Sqlite>, wpm: Wpm) -> Result<()> {
    set_setting(db, SAVED_WPM_KEY, wpm.get().to_string()).await
}

/// Load the blacklist of deleted texts
///
/// Corrupt JSON is treated as an empty list.
pub async fn load_blacklist(db: &Pool<Sqlite>) -> Result<Vec<String>> {
    match get_setting(db, DELETED_TEXTS_KEY).await? {
        Some(json) => match serde_json::from_str::<Vec<String>>(&json) {
            Ok(texts) => Ok(texts),
            Err(e) => {
                warn!("Ignoring malformed blacklist: {}", e);
                Ok(Vec::new())
            }
        },
        None => Ok(Vec::new()),
    }
}

/// Replace the stored blacklist
pub async fn save_blacklist(db: &Pool<Sqlite>, texts: &[String]) -> Result<()> {
    let json = serde_json::to_string(texts)?;
    set_setting(db, DELETED_TEXTS_KEY, json).await
}

/// Generic setting getter
///
/// Returns None if the key doesn't exist (or holds NULL).
pub async fn get_setting(db: &Pool<Sqlite>, key: &str) -> Result<Option<String>> {
    let value: Option<Option<String>> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(db)
            .await?;

    Ok(value.flatten())
}

/// Generic setting setter
///
/// Inserts or updates setting in database.
pub async fn set_setting(db: &Pool<Sqlite>, key: &str, value: String) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value)
        VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(db)
    .await?;

    Ok(())
}
