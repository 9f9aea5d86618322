use std::{str::FromStr, sync::Arc};

pub use sqlx::Error;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Executor, Row, Sqlite,
};

use crate::types::MuteMinutes;

type Pool = sqlx::Pool<Sqlite>;

const MUTE_MINUTES_KEY: &str = "mute_minutes";

/// Tiny key-value store for settings that admins can change at runtime.
pub struct Database {
    pool: Pool,
}

impl Database {
    /// Open the database at `path`, like `sqlite:settings.sqlite` or `sqlite::memory:`,
    /// creating it if it doesn't exist.
    pub async fn new(path: &str) -> Result<Arc<Database>, Error> {
        // Writes are rare and tiny. One connection is plenty, and keeps `:memory:` working.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(
                SqliteConnectOptions::from_str(path)?
                    .create_if_missing(true)
                    .busy_timeout(std::time::Duration::from_secs(600)),
            )
            .await?;

        // SETTINGS:
        // key (unique primary key, string)
        // value (integer)
        pool.execute(sqlx::query(
            "
                CREATE TABLE IF NOT EXISTS settings (
                    key TEXT PRIMARY KEY NOT NULL,
                    value INTEGER NOT NULL
                ) STRICT;",
        ))
        .await?;

        Ok(Arc::new(Database { pool }))
    }

    /// Get a setting by its key. Returns [`None`] if it was never set.
    pub async fn get_setting(&self, key: &str) -> Result<Option<i64>, Error> {
        sqlx::query("SELECT value FROM settings WHERE key=?;")
            .bind(key)
            .map(|row: SqliteRow| row.get::<i64, _>("value"))
            .fetch_optional(&self.pool)
            .await
    }

    /// Set a setting, overwriting the old value if there is one.
    pub async fn set_setting(&self, key: &str, value: i64) -> Result<(), Error> {
        sqlx::query(
            "INSERT INTO settings(key, value)
            VALUES (?, ?)
        ON CONFLICT(key) DO
            UPDATE SET value=excluded.value;",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get the mute time, or `default` if it was never set.
    ///
    /// A stored value that is out of range is treated as never set.
    pub async fn get_mute_minutes(&self, default: MuteMinutes) -> Result<MuteMinutes, Error> {
        let stored = self.get_setting(MUTE_MINUTES_KEY).await?;

        Ok(stored
            .and_then(|x| u32::try_from(x).ok())
            .and_then(MuteMinutes::new)
            .unwrap_or(default))
    }

    pub async fn set_mute_minutes(&self, minutes: MuteMinutes) -> Result<(), Error> {
        self.set_setting(MUTE_MINUTES_KEY, minutes.get().into())
            .await
    }
}
