use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use notebox_core::query::{NoteSortMode, TodoFilter, TodoSort};

#[derive(Parser)]
#[command(name = "notebox")]
#[command(about = "Notes and todos from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to the database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional data directory (database, media and config.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage notes
    #[command(subcommand)]
    Note(NoteCommands),
    /// Manage todos
    #[command(subcommand)]
    Todo(TodoCommands),
    /// Show or change preferences
    #[command(subcommand)]
    Settings(SettingsCommands),
    /// Show or write config.json
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Export notes and todos
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Output file, or a directory to get a timestamped file name (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum NoteCommands {
    /// Create a new note
    #[command(alias = "new")]
    Add(NoteAddArgs),
    /// List notes, pinned first
    List(NoteListArgs),
    /// Show one note
    Show {
        /// Note ID or unique ID prefix
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an existing note
    Edit(NoteEditArgs),
    /// Pin or unpin a note
    Pin {
        /// Note ID or unique ID prefix
        id: String,
    },
    /// Delete a note and its checklist
    Delete {
        /// Note ID or unique ID prefix
        id: String,
    },
    /// Toggle a checklist item
    Check {
        /// Note ID or unique ID prefix
        id: String,
        /// 1-based checklist position
        item: usize,
    },
    /// List every tag in use
    Tags,
}

#[derive(Args)]
pub struct NoteAddArgs {
    /// Note title
    #[arg(short, long)]
    pub title: String,
    /// Note description
    #[arg(short, long)]
    pub desc: Option<String>,
    /// Tag to attach (repeatable)
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,
    /// Checklist item (repeatable)
    #[arg(long = "check", value_name = "ITEM")]
    pub checklist: Vec<String>,
    /// Latitude in degrees
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,
    /// Longitude in degrees
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
    /// Pin the note
    #[arg(long)]
    pub pin: bool,
    /// Photo to attach (repeatable)
    #[arg(long = "image", value_name = "PATH")]
    pub images: Vec<PathBuf>,
    /// Video to copy into the media directory
    #[arg(long, value_name = "PATH")]
    pub video: Option<PathBuf>,
}

#[derive(Args)]
pub struct NoteListArgs {
    /// Case-insensitive text to look for in title, description and tags
    #[arg(short, long)]
    pub search: Option<String>,
    /// Only notes with this tag
    #[arg(long)]
    pub tag: Option<String>,
    /// Only notes with photos
    #[arg(long)]
    pub images: bool,
    /// Only notes with a video
    #[arg(long)]
    pub video: bool,
    /// Only notes with a location
    #[arg(long)]
    pub location: bool,
    /// Sort order
    #[arg(long, value_enum, default_value_t = NoteSortArg::Recent)]
    pub sort: NoteSortArg,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct NoteEditArgs {
    /// Note ID or unique ID prefix
    pub id: String,
    /// New title
    #[arg(short, long)]
    pub title: Option<String>,
    /// New description
    #[arg(short, long)]
    pub desc: Option<String>,
    /// Remove the stored location
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub clear_location: bool,
    /// New latitude in degrees
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,
    /// New longitude in degrees
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
    /// Tag to add (repeatable)
    #[arg(long, value_name = "TAG")]
    pub tag_add: Vec<String>,
    /// Tag to remove (repeatable)
    #[arg(long, value_name = "TAG")]
    pub tag_remove: Vec<String>,
}

#[derive(Subcommand)]
pub enum TodoCommands {
    /// Create a todo
    Add {
        /// Todo title
        title: Vec<String>,
        /// Create it already completed
        #[arg(long)]
        done: bool,
    },
    /// List todos
    List {
        /// Case-insensitive text to look for in titles
        #[arg(short, long)]
        search: Option<String>,
        /// Completion filter
        #[arg(long, value_enum, default_value_t = TodoFilterArg::All)]
        filter: TodoFilterArg,
        /// Sort order
        #[arg(long, value_enum, default_value_t = TodoSortArg::TitleAsc)]
        sort: TodoSortArg,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Flip a todo between active and completed
    Toggle {
        /// Todo ID or unique ID prefix
        id: String,
    },
    /// Rename a todo
    Edit {
        /// Todo ID or unique ID prefix
        id: String,
        /// New title
        #[arg(short, long)]
        title: String,
    },
    /// Delete a todo
    Delete {
        /// Todo ID or unique ID prefix
        id: String,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Print current preferences
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Switch between light and dark mode
    Theme {
        #[arg(value_enum)]
        mode: ThemeArg,
    },
    /// Set the app language by code
    Language {
        /// Language code, e.g. `fr`
        code: String,
    },
    /// List supported languages
    Languages,
    /// Set the editor font size
    FontSize {
        /// Size in points
        size: u32,
    },
    /// Choose an alternate app icon
    Icon {
        /// Icon name
        #[arg(required_unless_present = "reset")]
        name: Option<String>,
        /// Restore the primary icon
        #[arg(long, conflicts_with = "name")]
        reset: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the resolved configuration and derived paths
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write config.json into the data directory
    Init {
        /// Longest photo side in pixels after import
        #[arg(long, value_name = "PIXELS")]
        image_max_dimension: Option<u32>,
        /// JPEG quality for imported photos (1-100)
        #[arg(long, value_name = "QUALITY", value_parser = clap::value_parser!(u8).range(1..=100))]
        image_jpeg_quality: Option<u8>,
        /// Replace an existing config.json
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum NoteSortArg {
    Recent,
    Title,
}

impl From<NoteSortArg> for NoteSortMode {
    fn from(value: NoteSortArg) -> Self {
        match value {
            NoteSortArg::Recent => Self::Recent,
            NoteSortArg::Title => Self::Title,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum TodoFilterArg {
    All,
    Active,
    Completed,
}

impl From<TodoFilterArg> for TodoFilter {
    fn from(value: TodoFilterArg) -> Self {
        match value {
            TodoFilterArg::All => Self::All,
            TodoFilterArg::Active => Self::Active,
            TodoFilterArg::Completed => Self::Completed,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum TodoSortArg {
    TitleAsc,
    TitleDesc,
    Status,
}

impl From<TodoSortArg> for TodoSort {
    fn from(value: TodoSortArg) -> Self {
        match value {
            TodoSortArg::TitleAsc => Self::TitleAsc,
            TodoSortArg::TitleDesc => Self::TitleDesc,
            TodoSortArg::Status => Self::Status,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl From<ExportFormat> for notebox_core::export::ExportFormat {
    fn from(value: ExportFormat) -> Self {
        match value {
            ExportFormat::Json => Self::Json,
            ExportFormat::Markdown => Self::Markdown,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
