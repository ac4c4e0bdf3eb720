use notebox_core::config::AppConfig;
use notebox_core::models::{Preferences, ThemeMode, SUPPORTED_LANGUAGES};

use crate::cli::ThemeArg;
use crate::commands::common::open_database;
use crate::error::CliError;

pub async fn run_settings_show(json: bool, config: &AppConfig) -> Result<(), CliError> {
    let db = open_database(config).await?;
    let preferences = db.load_preferences().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&preferences)?);
    } else {
        print!("{}", render_preferences(&preferences));
    }
    Ok(())
}

pub fn render_preferences(preferences: &Preferences) -> String {
    let theme = match preferences.theme() {
        ThemeMode::Light => "light",
        ThemeMode::Dark => "dark",
    };
    format!(
        "theme: {theme}\nlanguage: {} ({})\nfont size: {}\nicon: {}\n",
        preferences.app_language_display_name,
        preferences.app_language,
        preferences.font_size,
        preferences.app_icon.as_deref().unwrap_or("default"),
    )
}

pub async fn run_settings_theme(mode: ThemeArg, config: &AppConfig) -> Result<(), CliError> {
    let db = open_database(config).await?;
    let preferences = db.set_dark_mode(mode == ThemeArg::Dark).await?;
    print!("{}", render_preferences(&preferences));
    Ok(())
}

pub async fn run_settings_language(code: &str, config: &AppConfig) -> Result<(), CliError> {
    let db = open_database(config).await?;
    let preferences = db.set_language(code).await?;
    print!("{}", render_preferences(&preferences));
    Ok(())
}

pub fn run_settings_languages() {
    for language in SUPPORTED_LANGUAGES {
        println!("{:<4} {}", language.code, language.name);
    }
}

pub async fn run_settings_font_size(size: u32, config: &AppConfig) -> Result<(), CliError> {
    let db = open_database(config).await?;
    let preferences = db.set_font_size(size).await?;
    print!("{}", render_preferences(&preferences));
    Ok(())
}

pub async fn run_settings_icon(
    name: Option<String>,
    reset: bool,
    config: &AppConfig,
) -> Result<(), CliError> {
    let db = open_database(config).await?;
    let icon = if reset { None } else { name };
    let preferences = db.set_app_icon(icon).await?;
    print!("{}", render_preferences(&preferences));
    Ok(())
}
