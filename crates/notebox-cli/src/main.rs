//! Notebox CLI - notes and todos from the terminal

mod cli;
mod commands;
mod error;

use clap::Parser;
use notebox_core::config::{AppConfig, ConfigOverrides};
use tracing_subscriber::filter::{Directive, EnvFilter};

use crate::cli::{Cli, Commands, NoteCommands, SettingsCommands, TodoCommands};
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::export::run_export;
use crate::commands::note::{
    run_note_add, run_note_check, run_note_delete, run_note_edit, run_note_list, run_note_pin,
    run_note_show, run_note_tags,
};
use crate::commands::settings::{
    run_settings_font_size, run_settings_icon, run_settings_language, run_settings_languages,
    run_settings_show, run_settings_theme,
};
use crate::commands::todo::{
    run_todo_add, run_todo_delete, run_todo_edit, run_todo_list, run_todo_toggle,
};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "notebox=info".parse::<Directive>() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::resolve(&ConfigOverrides {
        db_path: cli.db_path,
        data_dir: cli.data_dir,
    });

    match cli.command {
        Commands::Note(command) => run_note_command(command, &config).await?,
        Commands::Todo(command) => run_todo_command(command, &config).await?,
        Commands::Settings(command) => run_settings_command(command, &config).await?,
        Commands::Config(command) => run_config(command, &config)?,
        Commands::Export { format, output } => {
            run_export(format, output.as_deref(), &config).await?;
        }
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref())?,
    }

    Ok(())
}

async fn run_note_command(command: NoteCommands, config: &AppConfig) -> Result<(), CliError> {
    match command {
        NoteCommands::Add(args) => run_note_add(args, config).await,
        NoteCommands::List(args) => run_note_list(args, config).await,
        NoteCommands::Show { id, json } => run_note_show(&id, json, config).await,
        NoteCommands::Edit(args) => run_note_edit(args, config).await,
        NoteCommands::Pin { id } => run_note_pin(&id, config).await,
        NoteCommands::Delete { id } => run_note_delete(&id, config).await,
        NoteCommands::Check { id, item } => run_note_check(&id, item, config).await,
        NoteCommands::Tags => run_note_tags(config).await,
    }
}

async fn run_todo_command(command: TodoCommands, config: &AppConfig) -> Result<(), CliError> {
    match command {
        TodoCommands::Add { title, done } => run_todo_add(&title, done, config).await,
        TodoCommands::List {
            search,
            filter,
            sort,
            json,
        } => run_todo_list(search, filter, sort, json, config).await,
        TodoCommands::Toggle { id } => run_todo_toggle(&id, config).await,
        TodoCommands::Edit { id, title } => run_todo_edit(&id, &title, config).await,
        TodoCommands::Delete { id } => run_todo_delete(&id, config).await,
    }
}

async fn run_settings_command(
    command: SettingsCommands,
    config: &AppConfig,
) -> Result<(), CliError> {
    match command {
        SettingsCommands::Show { json } => run_settings_show(json, config).await,
        SettingsCommands::Theme { mode } => run_settings_theme(mode, config).await,
        SettingsCommands::Language { code } => run_settings_language(&code, config).await,
        SettingsCommands::Languages => {
            run_settings_languages();
            Ok(())
        }
        SettingsCommands::FontSize { size } => run_settings_font_size(size, config).await,
        SettingsCommands::Icon { name, reset } => run_settings_icon(name, reset, config).await,
    }
}
