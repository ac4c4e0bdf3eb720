//! Preferences repository implementation

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::models::{language_display_name, Preferences};

const KEY_DARK_MODE: &str = "is_dark_mode";
const KEY_LANGUAGE: &str = "app_language";
const KEY_LANGUAGE_NAME: &str = "app_language_name";
const KEY_FONT_SIZE: &str = "font_size";
const KEY_APP_ICON: &str = "app_icon";

/// Trait for preference storage operations
pub trait SettingsRepository {
    /// Load preferences, falling back to defaults for missing values
    fn load(&self) -> Result<Preferences>;

    /// Save every preference
    fn save(&self, preferences: &Preferences) -> Result<()>;
}

/// `SQLite` implementation of `SettingsRepository`
pub struct SqliteSettingsRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteSettingsRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete_setting(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM settings WHERE key = ?", params![key])?;
        Ok(())
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn load(&self) -> Result<Preferences> {
        let mut preferences = Preferences::default();

        if let Some(value) = self.get_setting(KEY_DARK_MODE)? {
            preferences.is_dark_mode = matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        if let Some(code) = self.get_setting(KEY_LANGUAGE)? {
            if let Some(name) = language_display_name(&code) {
                preferences.app_language = code.trim().to_ascii_lowercase();
                preferences.app_language_display_name = self
                    .get_setting(KEY_LANGUAGE_NAME)?
                    .filter(|stored| !stored.trim().is_empty())
                    .unwrap_or_else(|| name.to_string());
            } else {
                tracing::warn!("Ignoring unsupported language setting: {code}");
            }
        }

        if let Some(value) = self.get_setting(KEY_FONT_SIZE)? {
            match value.trim().parse::<u32>() {
                Ok(size) if size > 0 => preferences.font_size = size,
                _ => tracing::warn!("Ignoring invalid font size setting: {value}"),
            }
        }

        preferences.app_icon = self
            .get_setting(KEY_APP_ICON)?
            .filter(|icon| !icon.trim().is_empty());

        Ok(preferences)
    }

    fn save(&self, preferences: &Preferences) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        let repo = SqliteSettingsRepository::new(&tx);

        repo.set_setting(
            KEY_DARK_MODE,
            if preferences.is_dark_mode { "true" } else { "false" },
        )?;
        repo.set_setting(KEY_LANGUAGE, &preferences.app_language)?;
        repo.set_setting(KEY_LANGUAGE_NAME, &preferences.app_language_display_name)?;
        repo.set_setting(KEY_FONT_SIZE, &preferences.font_size.to_string())?;
        match &preferences.app_icon {
            Some(icon) => repo.set_setting(KEY_APP_ICON, icon)?,
            None => repo.delete_setting(KEY_APP_ICON)?,
        }

        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_load_defaults() {
        let db = setup();
        let repo = SqliteSettingsRepository::new(db.connection());

        assert_eq!(repo.load().unwrap(), Preferences::default());
    }

    #[test]
    fn test_save_and_load() {
        let db = setup();
        let repo = SqliteSettingsRepository::new(db.connection());

        let preferences = Preferences {
            is_dark_mode: true,
            app_language: "ja".to_string(),
            app_language_display_name: "Japanese".to_string(),
            font_size: 16,
            app_icon: Some("AppIcon-Dark".to_string()),
        };
        repo.save(&preferences).unwrap();

        assert_eq!(repo.load().unwrap(), preferences);
    }

    #[test]
    fn test_clearing_icon_removes_row() {
        let db = setup();
        let repo = SqliteSettingsRepository::new(db.connection());

        repo.save(&Preferences {
            app_icon: Some("Retro".to_string()),
            ..Preferences::default()
        })
        .unwrap();
        repo.save(&Preferences::default()).unwrap();

        assert_eq!(repo.load().unwrap().app_icon, None);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let db = setup();
        let repo = SqliteSettingsRepository::new(db.connection());

        repo.set_setting(KEY_FONT_SIZE, "huge").unwrap();
        repo.set_setting(KEY_LANGUAGE, "klingon").unwrap();

        let preferences = repo.load().unwrap();
        assert_eq!(preferences.font_size, crate::models::DEFAULT_FONT_SIZE);
        assert_eq!(preferences.app_language, "en");
    }

    #[test]
    fn test_unsupported_language_keeps_default_name() {
        let db = setup();
        let repo = SqliteSettingsRepository::new(db.connection());

        repo.set_setting(KEY_LANGUAGE, "klingon").unwrap();
        repo.set_setting(KEY_LANGUAGE_NAME, "tlhIngan Hol").unwrap();

        let preferences = repo.load().unwrap();
        assert_eq!(preferences.app_language, "en");
        assert_eq!(preferences.app_language_display_name, "English");
    }

    #[test]
    fn test_language_name_defaults_from_catalog() {
        let db = setup();
        let repo = SqliteSettingsRepository::new(db.connection());

        repo.set_setting(KEY_LANGUAGE, "FR").unwrap();

        let preferences = repo.load().unwrap();
        assert_eq!(preferences.app_language, "fr");
        assert_eq!(preferences.app_language_display_name, "French");
    }
}
