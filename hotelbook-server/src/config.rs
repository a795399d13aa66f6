//! Host configuration
//!
//! Loaded from an `appsettings.toml` file, an optional environment overlay
//! `appsettings.<Environment>.toml` next to it, then environment variables:
//!
//! - `HOTELBOOK_ENVIRONMENT` - Development | Staging | Production
//! - `DATABASE_URL` - database connection string
//! - `HOTELBOOK_BIND` - listen address
//!
//! A missing base file means defaults. Overlay tables are merged key by key,
//! so an overlay only has to name what it changes.

use std::collections::BTreeMap;
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default config file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "appsettings.toml";

pub const ENV_ENVIRONMENT: &str = "HOTELBOOK_ENVIRONMENT";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_BIND: &str = "HOTELBOOK_BIND";

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Hosting environment; Swagger is only mounted in `Development`.
///
/// Names are case-insensitive wherever they are read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Environment {
    Development,
    Staging,
    #[default]
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "Development",
            Self::Staging => "Staging",
            Self::Production => "Production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            _ => Err(ConfigError::Invalid {
                key: "environment",
                value: s.to_owned(),
                reason: "expected Development, Staging or Production".to_owned(),
            }),
        }
    }
}

/// Everything the host needs to start
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub request_timeout_secs: u64,
    /// Redirect plain-HTTP requests (per `X-Forwarded-Proto`) to HTTPS
    pub https_redirect: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub https_port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            request_timeout_secs: 30,
            https_redirect: false,
            https_port: None,
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub connection_string: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connection_string: "postgres://localhost/hotelbook".to_owned(),
            max_connections: 10,
            acquire_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default level directive
    pub level: String,
    pub show_targets: bool,
    /// Per-target levels, e.g. `sqlx = "warn"`
    pub overrides: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            show_targets: false,
            overrides: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    /// `EnvFilter` directive string: `info,sqlx=warn`
    pub fn directives(&self) -> String {
        let mut directives = self.level.clone();
        for (target, level) in &self.overrides {
            directives.push(',');
            directives.push_str(target);
            directives.push('=');
            directives.push_str(level);
        }
        directives
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Bearer keys accepted for writes; empty disables authorization
    pub api_keys: Vec<String>,
}

impl AuthConfig {
    pub fn enabled(&self) -> bool {
        !self.api_keys.is_empty()
    }

    pub fn accepts(&self, key: &str) -> bool {
        self.api_keys.iter().any(|k| k == key)
    }
}

impl HostConfig {
    /// Load from `path`, its environment overlay and the process environment.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Same as [`HostConfig::load`] with an explicit variable lookup.
    pub fn load_with<F>(path: &Path, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut merged = read_table(path)?.unwrap_or_default();

        let environment = match env(ENV_ENVIRONMENT) {
            Some(name) => Some(name.parse::<Environment>()?),
            None => merged
                .get("environment")
                .and_then(|v| v.as_str())
                .map(str::parse::<Environment>)
                .transpose()?,
        }
        .unwrap_or_default();

        let overlay_path = overlay_path(path, environment);
        if let Some(overlay) = read_table(&overlay_path)? {
            tracing::debug!(overlay = %overlay_path.display(), "merging config overlay");
            // Shape errors are reported against the file that has them
            decode(overlay.clone(), &overlay_path)?;
            merge_tables(&mut merged, overlay);
        }

        let mut config = decode(merged, path)?;
        config.environment = environment;
        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "server.request_timeout_secs",
                value: "0".to_owned(),
                reason: "must be at least 1 second".to_owned(),
            });
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "database.max_connections",
                value: "0".to_owned(),
                reason: "must be at least 1".to_owned(),
            });
        }
        Ok(())
    }

    fn apply_env<F>(&mut self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = env(ENV_DATABASE_URL) {
            self.database.connection_string = url;
        }
        if let Some(bind) = env(ENV_BIND) {
            self.server.bind = bind.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::Invalid {
                    key: ENV_BIND,
                    value: bind.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Copy safe to print: API keys and the connection password are masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.auth.api_keys = copy.auth.api_keys.iter().map(|_| "***".to_owned()).collect();
        copy.database.connection_string = mask_password(&copy.database.connection_string);
        copy
    }
}

/// `appsettings.toml` + Development -> `appsettings.Development.toml`
pub fn overlay_path(base: &Path, environment: Environment) -> PathBuf {
    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("appsettings");
    base.with_file_name(format!("{}.{}.toml", stem, environment.as_str()))
}

fn read_table(path: &Path) -> Result<Option<toml::Table>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    content
        .parse::<toml::Table>()
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn decode(table: toml::Table, path: &Path) -> Result<HostConfig, ConfigError> {
    toml::Value::Table(table)
        .try_into()
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Overlay wins; nested tables merge instead of being replaced.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(incoming) => match base.get_mut(&key) {
                Some(toml::Value::Table(existing)) => merge_tables(existing, incoming),
                _ => {
                    base.insert(key, toml::Value::Table(incoming));
                }
            },
            other => {
                base.insert(key, other);
            }
        }
    }
}

fn mask_password(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_owned();
    };
    let Some((credentials, host)) = rest.rsplit_once('@') else {
        return url.to_owned();
    };
    match credentials.split_once(':') {
        Some((user, _)) => format!("{}://{}:***@{}", scheme, user, host),
        None => url.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn missing_file_means_defaults() {
        let dir = TempDir::new().unwrap();
        let config = HostConfig::load_with(&dir.path().join(DEFAULT_CONFIG_FILE), no_env).unwrap();
        assert_eq!(config, HostConfig::default());
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.server.bind.port(), 5000);
    }

    #[test]
    fn overlay_wins_and_untouched_keys_survive() {
        let dir = TempDir::new().unwrap();
        let base = write(
            &dir,
            "appsettings.toml",
            r#"
            environment = "Development"

            [server]
            bind = "0.0.0.0:8080"
            request_timeout_secs = 10

            [logging.overrides]
            sqlx = "warn"
            "#,
        );
        write(
            &dir,
            "appsettings.Development.toml",
            r#"
            [server]
            request_timeout_secs = 60

            [logging.overrides]
            hotelbook_server = "debug"
            "#,
        );

        let config = HostConfig::load_with(&base, no_env).unwrap();
        assert_eq!(config.server.request_timeout_secs, 60);
        assert_eq!(config.server.bind.port(), 8080);
        assert_eq!(config.logging.overrides.len(), 2);
        assert_eq!(config.logging.directives(), "info,hotelbook_server=debug,sqlx=warn");
    }

    #[test]
    fn environment_variable_selects_overlay() {
        let dir = TempDir::new().unwrap();
        let base = write(&dir, "appsettings.toml", "environment = \"Development\"\n");
        write(&dir, "appsettings.Staging.toml", "[auth]\napi_keys = [\"k1\"]\n");

        let env: HashMap<&str, &str> = [(ENV_ENVIRONMENT, "staging")].into();
        let config =
            HostConfig::load_with(&base, |k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.environment, Environment::Staging);
        assert!(config.auth.accepts("k1"));
        assert!(!config.is_development());
    }

    #[test]
    fn env_overrides_apply_last() {
        let dir = TempDir::new().unwrap();
        let base = write(
            &dir,
            "appsettings.toml",
            "[database]\nconnection_string = \"postgres://file/db\"\n",
        );
        let env: HashMap<&str, &str> = [
            (ENV_DATABASE_URL, "postgres://env/db"),
            (ENV_BIND, "127.0.0.1:9999"),
        ]
        .into();

        let config =
            HostConfig::load_with(&base, |k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.database.connection_string, "postgres://env/db");
        assert_eq!(config.server.bind.port(), 9999);
    }

    #[test]
    fn bad_bind_address_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = HostConfig::load_with(&dir.path().join("none.toml"), |k| {
            (k == ENV_BIND).then(|| "not-an-address".to_owned())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_BIND, .. }));
    }

    #[test]
    fn invalid_toml_names_the_file() {
        let dir = TempDir::new().unwrap();
        let base = write(&dir, "appsettings.toml", "[server\nbind = ");
        let err = HostConfig::load_with(&base, no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("appsettings.toml"));
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let dir = TempDir::new().unwrap();
        let base = write(&dir, "appsettings.toml", "environment = \"Moon\"\n");
        assert!(HostConfig::load_with(&base, no_env).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        let base = write(&dir, "appsettings.toml", "[server]\nbnid = \"127.0.0.1:1\"\n");
        assert!(matches!(
            HostConfig::load_with(&base, no_env),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn environment_name_in_file_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let base = write(&dir, "appsettings.toml", "environment = \"development\"\n");
        write(&dir, "appsettings.Development.toml", "[server]\nrequest_timeout_secs = 5\n");

        let config = HostConfig::load_with(&base, no_env).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.request_timeout_secs, 5);
    }

    #[test]
    fn overlay_errors_name_the_overlay() {
        let dir = TempDir::new().unwrap();
        let base = write(&dir, "appsettings.toml", "environment = \"Staging\"\n");
        write(&dir, "appsettings.Staging.toml", "[server]\nbnid = \"127.0.0.1:1\"\n");

        let err = HostConfig::load_with(&base, no_env).unwrap_err();
        match &err {
            ConfigError::Parse { path, .. } => {
                assert!(path.ends_with("appsettings.Staging.toml"))
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let dir = TempDir::new().unwrap();
        let base = write(&dir, "appsettings.toml", "[server]\nrequest_timeout_secs = 0\n");
        assert!(matches!(
            HostConfig::load_with(&base, no_env),
            Err(ConfigError::Invalid {
                key: "server.request_timeout_secs",
                ..
            })
        ));
    }

    #[test]
    fn overlay_path_uses_file_stem() {
        assert_eq!(
            overlay_path(Path::new("/etc/hotel/custom.toml"), Environment::Production),
            PathBuf::from("/etc/hotel/custom.Production.toml")
        );
    }

    #[test]
    fn redacted_hides_secrets() {
        let mut config = HostConfig::default();
        config.auth.api_keys = vec!["secret".into()];
        config.database.connection_string = "postgres://app:hunter2@db:5432/hotel".into();

        let shown = config.redacted();
        assert_eq!(shown.auth.api_keys, vec!["***"]);
        assert_eq!(shown.database.connection_string, "postgres://app:***@db:5432/hotel");

        let rendered = toml::to_string_pretty(&shown).unwrap();
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("environment = \"Production\""));
    }
}
