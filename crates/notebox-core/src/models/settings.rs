//! User preferences model

use serde::{Deserialize, Serialize};

/// Default editor font size in points
pub const DEFAULT_FONT_SIZE: u32 = 12;

/// A selectable interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

/// Languages offered by the language picker
pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language { code: "en", name: "English" },
    Language { code: "fr", name: "French" },
    Language { code: "hi", name: "Hindi" },
    Language { code: "de", name: "German" },
    Language { code: "ja", name: "Japanese" },
    Language { code: "pt", name: "Portuguese" },
    Language { code: "ru", name: "Russian" },
    Language { code: "zh", name: "Mandarin" },
    Language { code: "ko", name: "Korean" },
    Language { code: "it", name: "Italian" },
    Language { code: "es", name: "Spanish" },
    Language { code: "ar", name: "Arabic" },
    Language { code: "sv", name: "Swedish" },
    Language { code: "no", name: "Norwegian" },
    Language { code: "nl", name: "Dutch" },
    Language { code: "tr", name: "Turkish" },
    Language { code: "af", name: "Afrikaans" },
    Language { code: "th", name: "Thai" },
    Language { code: "vi", name: "Vietnamese" },
    Language { code: "id", name: "Indonesian" },
    Language { code: "ur", name: "Urdu" },
    Language { code: "bn", name: "Bengali" },
    Language { code: "fil", name: "Filipino" },
    Language { code: "ms", name: "Malay" },
    Language { code: "fa", name: "Persian" },
    Language { code: "he", name: "Hebrew" },
    Language { code: "pl", name: "Polish" },
    Language { code: "cs", name: "Czech" },
    Language { code: "hu", name: "Hungarian" },
    Language { code: "ro", name: "Romanian" },
    Language { code: "uk", name: "Ukrainian" },
    Language { code: "el", name: "Greek" },
    Language { code: "sr", name: "Serbian" },
    Language { code: "da", name: "Danish" },
    Language { code: "fi", name: "Finnish" },
    Language { code: "is", name: "Icelandic" },
    Language { code: "et", name: "Estonian" },
    Language { code: "lv", name: "Latvian" },
    Language { code: "lt", name: "Lithuanian" },
    Language { code: "be", name: "Belarusian" },
    Language { code: "kk", name: "Kazakh" },
];

/// Look up the display name for a language code (case-insensitive)
#[must_use]
pub fn language_display_name(code: &str) -> Option<&'static str> {
    let code = code.trim();
    SUPPORTED_LANGUAGES
        .iter()
        .find(|language| language.code.eq_ignore_ascii_case(code))
        .map(|language| language.name)
}

/// Theme mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light theme
    #[default]
    Light,
    /// Dark theme
    Dark,
}

/// Durable user preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub is_dark_mode: bool,
    /// Language code, e.g. `en`
    pub app_language: String,
    /// Human-readable name shown next to the language setting
    pub app_language_display_name: String,
    /// Editor font size in points
    pub font_size: u32,
    /// Alternate app icon name; `None` means the primary icon
    pub app_icon: Option<String>,
}

impl Preferences {
    #[must_use]
    pub const fn theme(&self) -> ThemeMode {
        if self.is_dark_mode {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            is_dark_mode: false,
            app_language: "en".to_string(),
            app_language_display_name: "English".to_string(),
            font_size: DEFAULT_FONT_SIZE,
            app_icon: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_default() {
        let preferences = Preferences::default();
        assert!(!preferences.is_dark_mode);
        assert_eq!(preferences.app_language, "en");
        assert_eq!(preferences.app_language_display_name, "English");
        assert_eq!(preferences.theme(), ThemeMode::Light);
    }

    #[test]
    fn language_lookup_is_case_insensitive() {
        assert_eq!(language_display_name("JA"), Some("Japanese"));
        assert_eq!(language_display_name(" fil "), Some("Filipino"));
        assert_eq!(language_display_name("xx"), None);
    }

    #[test]
    fn language_codes_are_unique() {
        let mut codes: Vec<_> = SUPPORTED_LANGUAGES.iter().map(|l| l.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), SUPPORTED_LANGUAGES.len());
    }
}
