use crew_bot::BotDifficulty;
use crew_core::game::Ruleset;
use crew_core::game::state::{MAX_PLAYERS, MIN_PLAYERS};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_PLAYERS: usize = 4;
const DEFAULT_DIFFICULTY: u32 = 4;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root self-play configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SimConfig {
    pub run_id: String,
    pub games: GamesConfig,
    #[serde(default = "default_agents")]
    pub agents: Vec<AgentConfig>,
    #[serde(default)]
    pub ruleset: Ruleset,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: SimConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.games.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        validate_agents(&self.agents)?;
        Ok(())
    }

    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
        }
    }
}

/// How many games to play and at what table.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GamesConfig {
    pub count: usize,
    #[serde(default = "default_players")]
    pub players: usize,
    /// Target task difficulty handed to the allocator.
    #[serde(default = "default_difficulty")]
    pub difficulty: u32,
    pub seed: Option<u64>,
}

impl GamesConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.count == 0 {
            return Err(ValidationError::InvalidField {
                field: "games.count".to_string(),
                message: "number of games must be greater than zero".to_string(),
            });
        }

        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.players) {
            return Err(ValidationError::InvalidField {
                field: "games.players".to_string(),
                message: format!("players must be between {MIN_PLAYERS} and {MAX_PLAYERS}"),
            });
        }

        if self.difficulty == 0 {
            return Err(ValidationError::InvalidField {
                field: "games.difficulty".to_string(),
                message: "difficulty must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

fn default_players() -> usize {
    DEFAULT_PLAYERS
}

fn default_difficulty() -> u32 {
    DEFAULT_DIFFICULTY
}

/// A bot seated at the table; seats cycle through the list.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AgentConfig {
    pub name: String,
    #[serde(default = "default_agent_difficulty")]
    pub difficulty: String,
}

impl AgentConfig {
    pub fn bot_difficulty(&self) -> Option<BotDifficulty> {
        BotDifficulty::from_name(&self.difficulty)
    }
}

fn default_agent_difficulty() -> String {
    "normal".to_string()
}

fn default_agents() -> Vec<AgentConfig> {
    vec![AgentConfig {
        name: "heuristic".to_string(),
        difficulty: default_agent_difficulty(),
    }]
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        if self.jsonl.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "outputs.jsonl".to_string(),
                message: "path must not be empty".to_string(),
            });
        }

        let resolved = resolve_template(run_id, &self.jsonl);
        if resolved.components().count() == 0 {
            return Err(ValidationError::InvalidField {
                field: "outputs.jsonl".to_string(),
                message: "resolved path is invalid".to_string(),
            });
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_agents(agents: &[AgentConfig]) -> Result<(), ValidationError> {
    if agents.is_empty() {
        return Err(ValidationError::InvalidField {
            field: "agents".to_string(),
            message: "at least one agent must be specified".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for agent in agents {
        if agent.name.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "agents.name".to_string(),
                message: "agent name must not be empty".to_string(),
            });
        }

        if !seen.insert(agent.name.clone()) {
            return Err(ValidationError::InvalidField {
                field: "agents".to_string(),
                message: format!("agent name '{}' defined more than once", agent.name),
            });
        }

        if agent.bot_difficulty().is_none() {
            return Err(ValidationError::InvalidField {
                field: format!("agents[{}].difficulty", agent.name),
                message: format!("unknown difficulty '{}'", agent.difficulty),
            });
        }
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{run_id}", run_id))
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
}

impl ResolvedOutputs {
    /// Structured logs land next to the outcome rows.
    pub fn telemetry_path(&self) -> PathBuf {
        self.jsonl
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("telemetry.jsonl")
    }
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
