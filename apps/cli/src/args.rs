use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shoplist_core::items::ItemId;
use shoplist_core::presenter::Gesture;
use shoplist_remote_store::config::{ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};

#[derive(Debug, Parser)]
#[command(
    name = "shoplist",
    version,
    about = "Shopping list kept in sync with the product service"
)]
pub struct Cli {
    /// Base URL of the product service
    #[arg(long, env = "SHOPLIST_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Directory holding the local cache database
    #[arg(long, env = "SHOPLIST_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "SHOPLIST_HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Print the list as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// HTTP client settings, checked the same way as the environment defaults.
    pub fn client_config(&self) -> shoplist_remote_store::Result<ClientConfig> {
        ClientConfig::validated(&self.api_url, self.timeout_secs)
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the list (default)
    List,
    /// Add an item
    Add {
        name: String,
        #[arg(long, default_value = "")]
        note: String,
    },
    /// Flip the purchased flag of an item
    Toggle { id: ItemId },
    /// Delete an item
    Delete { id: ItemId },
    /// Replace the note of an item
    Note { id: ItemId, note: String },
    /// Show the note editor for an item
    Show { id: ItemId },
}

impl Command {
    pub fn into_gesture(self) -> Option<Gesture> {
        match self {
            Command::List => None,
            Command::Add { name, note } => Some(Gesture::TapAdd { name, note }),
            Command::Toggle { id } => Some(Gesture::ToggleCheckbox(id)),
            Command::Delete { id } => Some(Gesture::TapDelete(id)),
            Command::Note { id, note } => Some(Gesture::SubmitNote { id, note }),
            Command::Show { id } => Some(Gesture::TapRow(id)),
        }
    }
}
