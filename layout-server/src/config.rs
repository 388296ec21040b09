//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::Parser;
use layout_core::Category;

/// Default port for the layout server.
pub const DEFAULT_PORT: u16 = 8763; // "URNE" on phone keypad

/// Categories offered when none are configured.
pub const DEFAULT_CATEGORIES: &str = "parte:Parte,thanks:Poděkování,notice:Oznámení";

/// Errors in the supplied configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A category entry was not of the form `id:name`.
    #[error("Invalid category entry {0:?}, expected id:name")]
    InvalidCategory(String),
    /// Two categories share an ID.
    #[error("Duplicate category id: {0}")]
    DuplicateCategory(String),
}

/// Command-line arguments for the layout server.
#[derive(Debug, Clone, Parser)]
#[command(name = "urneo-layout")]
#[command(about = "Urneo document template server")]
#[command(version)]
pub struct CliArgs {
    /// Port to listen on (localhost only)
    #[arg(long, env = "URNEO_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory for JSON document files; in-memory only when omitted
    #[arg(long, env = "URNEO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Available categories as comma-separated `id:name` pairs
    #[arg(
        long,
        env = "URNEO_CATEGORIES",
        value_delimiter = ',',
        default_value = DEFAULT_CATEGORIES
    )]
    pub categories: Vec<String>,
}

/// Validated server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listening port.
    pub port: u16,
    /// Optional persistence directory.
    pub data_dir: Option<PathBuf>,
    /// Categories documents may be filed under.
    pub categories: Vec<Category>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: None,
            categories: parse_categories(DEFAULT_CATEGORIES.split(',')).unwrap_or_default(),
        }
    }
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            port: args.port,
            data_dir: args.data_dir,
            categories: parse_categories(args.categories.iter().map(String::as_str))?,
        })
    }
}

/// Parse `id:name` entries. Blank entries are skipped.
///
/// # Errors
///
/// Returns an error for entries without a colon, with an empty side, or
/// repeating an earlier ID.
pub fn parse_categories<'a>(
    entries: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<Category>, ConfigError> {
    let mut categories: Vec<Category> = Vec::new();
    for entry in entries.into_iter().map(str::trim).filter(|e| !e.is_empty()) {
        let (id, name) = entry
            .split_once(':')
            .map(|(id, name)| (id.trim(), name.trim()))
            .filter(|(id, name)| !id.is_empty() && !name.is_empty())
            .ok_or_else(|| ConfigError::InvalidCategory(entry.to_string()))?;
        if categories.iter().any(|c| c.id == id) {
            return Err(ConfigError::DuplicateCategory(id.to_string()));
        }
        categories.push(Category::new(id, name));
    }
    Ok(categories)
}
