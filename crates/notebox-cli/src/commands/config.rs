use std::path::PathBuf;

use notebox_core::config::{save_config_to_path, AppConfig, CONFIG_FILE_NAME};
use serde::Serialize;

use crate::cli::ConfigCommands;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct ConfigSummary {
    config_path: PathBuf,
    data_dir: PathBuf,
    db_path: PathBuf,
    media_dir: PathBuf,
    image_max_dimension: u32,
    image_jpeg_quality: u8,
}

pub fn run_config(command: ConfigCommands, config: &AppConfig) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show { json } => run_config_show(json, config),
        ConfigCommands::Init {
            image_max_dimension,
            image_jpeg_quality,
            force,
        } => {
            let path = run_config_init(config, image_max_dimension, image_jpeg_quality, force)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

pub fn config_file_path(config: &AppConfig) -> PathBuf {
    config.data_dir().join(CONFIG_FILE_NAME)
}

fn run_config_show(json: bool, config: &AppConfig) -> Result<(), CliError> {
    let summary = ConfigSummary {
        config_path: config_file_path(config),
        data_dir: config.data_dir(),
        db_path: config.db_path(),
        media_dir: config.media_dir(),
        image_max_dimension: config.image_max_dimension,
        image_jpeg_quality: config.image_jpeg_quality,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("config: {}", summary.config_path.display());
        println!("data dir: {}", summary.data_dir.display());
        println!("database: {}", summary.db_path.display());
        println!("media: {}", summary.media_dir.display());
        println!(
            "images: max {}px, quality {}",
            summary.image_max_dimension, summary.image_jpeg_quality
        );
    }
    Ok(())
}

/// Write the resolved config, with any overrides, to `config.json`.
pub fn run_config_init(
    config: &AppConfig,
    image_max_dimension: Option<u32>,
    image_jpeg_quality: Option<u8>,
    force: bool,
) -> Result<PathBuf, CliError> {
    let path = config_file_path(config);
    if path.exists() && !force {
        return Err(CliError::ConfigExists(path.display().to_string()));
    }

    let mut written = config.clone();
    // The file lives inside the data dir, so it never names it.
    written.data_dir = None;
    if let Some(max_dimension) = image_max_dimension {
        written.image_max_dimension = max_dimension;
    }
    if let Some(quality) = image_jpeg_quality {
        written.image_jpeg_quality = quality;
    }

    save_config_to_path(&written, &path)?;
    tracing::info!("Wrote config to {}", path.display());
    Ok(path)
}
