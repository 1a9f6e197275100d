use crate::{ConnectOptions, DbErr};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Name of the config file looked up by [Config::find]
pub const CONFIG_FILE_NAME: &str = "entity-discovery.toml";

/// Contents of an `entity-discovery.toml` file
///
/// ```toml
/// [database]
/// url = "env:DATABASE_URL"
/// max_connections = 4
///
/// [discovery]
/// schemas = ["public", "audit"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub discovery: DiscoveryOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string, or `env:VAR_NAME` to read it from the environment
    pub url: String,
    #[serde(default)]
    pub max_connections: Option<u32>,
}

/// What a discovery run looks at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryOptions {
    /// Schemas whose base tables become entities
    #[serde(default = "default_schemas")]
    pub schemas: Vec<String>,
    /// Database name, used by existence checks
    #[serde(default)]
    pub database: Option<String>,
}

fn default_schemas() -> Vec<String> {
    vec!["public".to_owned()]
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            schemas: default_schemas(),
            database: None,
        }
    }
}

impl DiscoveryOptions {
    pub fn new<I, S>(schemas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            schemas: schemas.into_iter().map(Into::into).collect(),
            database: None,
        }
    }

    pub fn database<S: Into<String>>(mut self, name: S) -> Self {
        self.database = Some(name.into());
        self
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, DbErr> {
        let config: Config =
            toml::from_str(s).map_err(|e| DbErr::Config(format!("invalid config: {e}")))?;
        if config.discovery.schemas.is_empty() {
            return Err(DbErr::Config(
                "`discovery.schemas` must name at least one schema".to_owned(),
            ));
        }
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DbErr> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| DbErr::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Load the config file from the current directory or its parent
    pub fn find() -> Result<Self, DbErr> {
        Self::from_path(find_config_file()?)
    }

    /// Options for connecting to the configured database
    pub fn connect_options(&self) -> Result<ConnectOptions, DbErr> {
        let mut opt = ConnectOptions::new(self.database.resolve_url()?);
        if let Some(max) = self.database.max_connections {
            opt.max_connections(max);
        }
        Ok(opt)
    }

    /// Discovery options with `database` defaulted to the database named in the URL
    pub fn discovery_options(&self) -> Result<DiscoveryOptions, DbErr> {
        let mut options = self.discovery.clone();
        if options.database.is_none() {
            options.database = Some(database_name(&self.database.resolve_url()?)?);
        }
        Ok(options)
    }
}

impl DatabaseConfig {
    /// The connection string, with `env:` indirection applied
    pub fn resolve_url(&self) -> Result<String, DbErr> {
        let url = match self.url.strip_prefix("env:") {
            Some(var) => env::var(var).map_err(|e| {
                DbErr::Config(format!("cannot read database url from `{var}`: {e}"))
            })?,
            None => self.url.clone(),
        };
        database_name(&url)?;
        Ok(url)
    }
}

fn database_name(url: &str) -> Result<String, DbErr> {
    let parsed = url::Url::parse(url)
        .map_err(|e| DbErr::Config(format!("invalid database url: {e}")))?;
    parsed
        .path_segments()
        .and_then(|mut segments| segments.next())
        .filter(|name| !name.is_empty())
        .map(ToOwned::to_owned)
        .ok_or_else(|| DbErr::Config("database name not found in url".to_owned()))
}

fn find_config_file() -> Result<PathBuf, DbErr> {
    let current_dir = env::current_dir().map_err(|e| DbErr::Config(e.to_string()))?;
    let candidates = std::iter::once(current_dir.as_path()).chain(current_dir.parent());
    for dir in candidates {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            return Ok(path);
        }
    }
    Err(DbErr::Config(format!("{CONFIG_FILE_NAME} not found")))
}
