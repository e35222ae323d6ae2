use crate::error::ConfigError;
use crate::session::EdgePolicy;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_image")]
    pub image: String,
    #[serde(default = "default_padding")]
    pub padding: u32,
    #[serde(default)]
    pub fixed: bool,
    #[serde(default = "default_search_height")]
    pub search_height: u32,
    #[serde(default)]
    pub edge_policy: EdgePolicy,
    #[serde(default = "default_show_in")]
    pub show_in: Vec<String>,
    #[serde(default = "default_icon_theme")]
    pub icon_theme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    #[serde(default, rename = "entry")]
    pub entries: Vec<BlockConfig>,
}

fn default_image() -> String { "start-here".to_string() }
fn default_padding() -> u32 { 4 }
fn default_search_height() -> u32 { 400 }
fn default_show_in() -> Vec<String> { vec!["LXDE".to_string()] }
fn default_icon_theme() -> String { "hicolor".to_string() }

/// One `[[entry]]` table as written in the file.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockConfig {
    pub block: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl BlockConfig {
    fn named(block: &str) -> Self {
        Self { block: block.to_string(), ..Self::default() }
    }

    fn command(command: &str, image: &str) -> Self {
        Self {
            command: Some(command.to_string()),
            image: Some(image.to_string()),
            ..Self::named("item")
        }
    }
}

/// Commands the panel host knows how to run itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinCommand {
    Run,
    Restart,
    Logout,
}

impl BuiltinCommand {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "run" => Some(Self::Run),
            "restart" => Some(Self::Restart),
            "logout" => Some(Self::Logout),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Run => "Run",
            Self::Restart => "Restart",
            Self::Logout => "Logout",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemAction {
    Builtin(BuiltinCommand),
    Spawn(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticItem {
    pub label: String,
    pub image: Option<String>,
    pub action: ItemAction,
}

/// Validated menu block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuBlock {
    Item(StaticItem),
    Separator,
    System,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image: default_image(),
            padding: default_padding(),
            fixed: false,
            search_height: default_search_height(),
            edge_policy: EdgePolicy::default(),
            show_in: default_show_in(),
            icon_theme: default_icon_theme(),
            terminal: None,
            entries: default_entries(),
        }
    }
}

pub fn default_entries() -> Vec<BlockConfig> {
    vec![
        BlockConfig::named("system"),
        BlockConfig::named("separator"),
        BlockConfig::command("run", "system-run"),
        BlockConfig::named("separator"),
        BlockConfig::command("logout", "system-shutdown"),
    ]
}

impl Config {
    /// Turns the raw entry list into menu blocks.
    pub fn blocks(&self) -> Result<Vec<MenuBlock>, ConfigError> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, raw)| parse_block(index, raw))
            .collect()
    }
}

fn parse_block(index: usize, raw: &BlockConfig) -> Result<MenuBlock, ConfigError> {
    match raw.block.to_ascii_lowercase().as_str() {
        "separator" => Ok(MenuBlock::Separator),
        "system" => Ok(MenuBlock::System),
        "item" => {
            // A known command wins over an action.
            let builtin = raw.command.as_deref().and_then(BuiltinCommand::parse);
            let (label, action) = match (builtin, &raw.action) {
                (Some(cmd), _) => (
                    raw.name.clone().unwrap_or_else(|| cmd.label().to_string()),
                    ItemAction::Builtin(cmd),
                ),
                (None, Some(action)) => (
                    raw.name.clone().unwrap_or_default(),
                    ItemAction::Spawn(action.clone()),
                ),
                (None, None) => return Err(ConfigError::InvalidItem { index }),
            };
            Ok(MenuBlock::Item(StaticItem {
                label,
                image: raw.image.clone(),
                action,
            }))
        }
        _ => Err(ConfigError::UnknownBlock(raw.block.clone())),
    }
}

pub fn default_config_path() -> PathBuf {
    let proj_dirs = ProjectDirs::from("org", "smenu", "smenu");
    if let Some(dirs) = &proj_dirs {
        dirs.config_dir().join("config.toml")
    } else {
        PathBuf::from("config.toml")
    }
}

/// Reads the config at `path`; a missing file or an empty entry list gives
/// the default menu.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        log::debug!("No config at {:?}, using defaults", path);
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)?;
    let mut config: Config = toml::from_str(&content)?;
    if config.entries.is_empty() {
        config.entries = default_entries();
    }
    Ok(config)
}

pub fn save_config(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
