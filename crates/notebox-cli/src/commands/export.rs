use std::path::{Path, PathBuf};

use chrono::Utc;
use notebox_core::config::AppConfig;
use notebox_core::export::{render_export, suggested_export_file_name};

use crate::cli::ExportFormat;
use crate::commands::common::open_database;
use crate::error::CliError;

pub async fn run_export(
    format: ExportFormat,
    output_path: Option<&Path>,
    config: &AppConfig,
) -> Result<(), CliError> {
    let db = open_database(config).await?;
    let notes = db.list_notes().await?;
    let todos = db.list_todos().await?;
    let rendered = render_export(&notes, &todos, format.into())?;

    if let Some(path) = output_path {
        let target = export_target(path, format);
        std::fs::write(&target, rendered)?;
        println!("{}", target.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}

/// A directory output gets a timestamped file name inside it.
pub fn export_target(path: &Path, format: ExportFormat) -> PathBuf {
    if path.is_dir() {
        path.join(suggested_export_file_name(
            format.into(),
            Utc::now().timestamp_millis(),
        ))
    } else {
        path.to_path_buf()
    }
}
