use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use wikilinker_engine::LinkerConfig;

/// Database backends the wiki can run on.
pub const DATABASE_TYPES: &[&str] = &["mysql", "postgres", "sqlite", "mssql", "oracle"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid setting `{setting}` in {config_path}: {reason}")]
    ConfigValidationError {
        config_path: PathBuf,
        setting: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    #[serde(rename = "type")]
    pub db_type: String,
    pub server: String,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            db_type: "mysql".to_string(),
            server: "127.0.0.1".to_string(),
            name: "wikidb".to_string(),
            user: "wikiuser".to_string(),
            password: String::new(),
        }
    }
}

/// A backend service reached through the virtual REST layer, e.g. parsoid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestModule {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualRestSettings {
    pub modules: BTreeMap<String, RestModule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpSettings {
    pub host: String,
    #[serde(alias = "IDHost")]
    pub id_host: String,
    pub port: u16,
    pub auth: bool,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            id_host: "localhost".to_string(),
            port: 25,
            auth: false,
        }
    }
}

/// Per-host settings: where the wiki is served from, its database and
/// helper programs, and the rendering settings for its links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Server prefix, possibly protocol-relative. Overrides `linker.server`.
    pub server: String,
    pub squid_servers: Vec<String>,
    pub emergency_contact: String,
    pub password_sender: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_magick_convert_command: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_directory: Option<PathBuf>,
    pub secret_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff3: Option<PathBuf>,
    pub database: DatabaseSettings,
    pub virtual_rest: VirtualRestSettings,
    /// Outgoing mail relay; mail goes through the local mailer when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smtp: Option<SmtpSettings>,
    pub linker: LinkerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            server: "//localhost".to_string(),
            squid_servers: Vec::new(),
            emergency_contact: String::new(),
            password_sender: String::new(),
            image_magick_convert_command: None,
            upload_directory: None,
            secret_key: String::new(),
            diff3: None,
            database: DatabaseSettings::default(),
            virtual_rest: VirtualRestSettings::default(),
            smtp: None,
            linker: LinkerConfig::default(),
        }
    }
}

impl SiteConfig {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: SiteConfig =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in path settings
        for path in [
            &mut config.image_magick_convert_command,
            &mut config.upload_directory,
            &mut config.diff3,
        ]
        .into_iter()
        .flatten()
        {
            if let Some(expanded) = Self::expand_path(path) {
                *path = expanded;
            }
        }

        config.validate(config_path)?;
        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/wikilinker");
        PathBuf::from(config_dir.as_ref()).join("host-settings.toml")
    }

    /// Checks settings that parse but cannot work. `config_path` is only
    /// used in the error.
    pub fn validate(&self, config_path: &Path) -> Result<(), ConfigError> {
        let invalid = |setting: &str, reason: String| ConfigError::ConfigValidationError {
            config_path: config_path.to_path_buf(),
            setting: setting.to_string(),
            reason,
        };

        if self.server.trim().is_empty() {
            return Err(invalid("server", "must not be empty".to_string()));
        }
        if !DATABASE_TYPES.contains(&self.database.db_type.as_str()) {
            return Err(invalid(
                "database.type",
                format!(
                    "unknown database type {:?}, expected one of {}",
                    self.database.db_type,
                    DATABASE_TYPES.join(", ")
                ),
            ));
        }
        if let Some(smtp) = &self.smtp
            && smtp.port == 0
        {
            return Err(invalid("smtp.port", "must be between 1 and 65535".to_string()));
        }
        for (name, module) in &self.virtual_rest.modules {
            if !module.url.contains("://") {
                return Err(invalid(
                    &format!("virtual_rest.modules.{name}.url"),
                    format!("{:?} has no scheme", module.url),
                ));
            }
        }
        Ok(())
    }

    /// Rendering settings with the host's server applied.
    pub fn linker_config(&self) -> LinkerConfig {
        LinkerConfig {
            server: self.server.clone(),
            ..self.linker.clone()
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    const HOST_SETTINGS: &str = r#"
server = "//test.oshwiki.eu"
squid_servers = ["127.0.0.1:8090"]
emergency_contact = "webmaster@example.org"
password_sender = "webmaster@example.org"
image_magick_convert_command = "/usr/bin/convert"
upload_directory = "/srv/wiki/images"
secret_key = "KEY"
diff3 = "/usr/bin/diff3"

[database]
type = "mysql"
server = "127.0.0.1"
name = "wikidb"
user = "wikiuser"
password = "password"

[virtual_rest.modules.parsoid]
url = "http://localhost:8000"
domain = "test.oshwiki.eu"
prefix = "test.oshwiki.eu"

[smtp]
host = "some.smtp.host"
IDHost = "some.id.host"
port = 25
auth = false

[linker]
sitename = "OSHWiki"
"#;

    fn write_settings(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("host-settings.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_config_path() {
        let config_path = SiteConfig::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/wikilinker/host-settings.toml"));
    }

    #[test]
    fn test_load_host_settings() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_settings(&temp_dir, HOST_SETTINGS);

        let config = SiteConfig::load_from_path(&path).unwrap().unwrap();

        assert_eq!(config.server, "//test.oshwiki.eu");
        assert_eq!(config.squid_servers, vec!["127.0.0.1:8090".to_string()]);
        assert_eq!(config.database.db_type, "mysql");
        assert_eq!(config.database.password, "password");
        assert_eq!(config.upload_directory, Some(PathBuf::from("/srv/wiki/images")));

        let parsoid = &config.virtual_rest.modules["parsoid"];
        assert_eq!(parsoid.url, "http://localhost:8000");
        assert_eq!(parsoid.domain.as_deref(), Some("test.oshwiki.eu"));

        let smtp = config.smtp.as_ref().unwrap();
        assert_eq!(smtp.id_host, "some.id.host");
        assert_eq!(smtp.port, 25);
        assert!(!smtp.auth);
    }

    #[test]
    fn test_linker_settings_default_and_take_server() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_settings(&temp_dir, HOST_SETTINGS);

        let config = SiteConfig::load_from_path(&path).unwrap().unwrap();
        let linker = config.linker_config();

        assert_eq!(linker.sitename, "OSHWiki");
        assert_eq!(linker.server, "//test.oshwiki.eu");
        assert_eq!(linker.article_path, "/wiki/$1");
        assert_eq!(linker.thumb_limits, vec![120, 150, 180, 200, 250, 300]);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_settings(&temp_dir, "");

        let config = SiteConfig::load_from_path(&path).unwrap().unwrap();

        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = SiteConfig::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_settings(&temp_dir, "server = [");

        let err = SiteConfig::load_from_path(&path).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("host-settings.toml"));
    }

    #[test]
    fn test_path_settings_are_expanded() {
        unsafe {
            env::set_var("WIKILINKER_TEST_BLOBS", "/data/blobs");
        }

        let temp_dir = TempDir::new().unwrap();
        let path = write_settings(
            &temp_dir,
            r#"
upload_directory = "$WIKILINKER_TEST_BLOBS/images"
diff3 = "~/bin/diff3"
"#,
        );

        let config = SiteConfig::load_from_path(&path).unwrap().unwrap();

        assert_eq!(config.upload_directory, Some(PathBuf::from("/data/blobs/images")));
        let diff3 = config.diff3.unwrap();
        assert!(!diff3.to_string_lossy().starts_with('~'));
        assert!(diff3.to_string_lossy().ends_with("bin/diff3"));

        unsafe {
            env::remove_var("WIKILINKER_TEST_BLOBS");
        }
    }

    #[test]
    fn test_validation_rejects_empty_server() {
        let config = SiteConfig {
            server: "  ".to_string(),
            ..SiteConfig::default()
        };

        let err = config.validate(Path::new("host-settings.toml")).unwrap_err();

        assert!(err.to_string().contains("`server`"));
    }

    #[test]
    fn test_validation_rejects_unknown_database() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_settings(&temp_dir, "[database]\ntype = \"dbase\"\n");

        let err = SiteConfig::load_from_path(&path).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::ConfigValidationError { ref setting, .. } if setting == "database.type"
        ));
    }

    #[test]
    fn test_validation_rejects_smtp_port_zero() {
        let config = SiteConfig {
            smtp: Some(SmtpSettings {
                port: 0,
                ..SmtpSettings::default()
            }),
            ..SiteConfig::default()
        };

        assert!(config.validate(Path::new("host-settings.toml")).is_err());
    }

    #[test]
    fn test_validation_rejects_module_url_without_scheme() {
        let mut config = SiteConfig::default();
        config.virtual_rest.modules.insert(
            "parsoid".to_string(),
            RestModule {
                url: "localhost:8000".to_string(),
                domain: None,
                prefix: None,
            },
        );

        let err = config.validate(Path::new("host-settings.toml")).unwrap_err();

        assert!(err.to_string().contains("virtual_rest.modules.parsoid.url"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("host-settings.toml");
        let mut test_config = SiteConfig {
            server: "https://wiki.example.org".to_string(),
            secret_key: "s3cret".to_string(),
            smtp: Some(SmtpSettings::default()),
            ..SiteConfig::default()
        };
        test_config.virtual_rest.modules.insert(
            "parsoid".to_string(),
            RestModule {
                url: "http://localhost:8000".to_string(),
                domain: Some("wiki.example.org".to_string()),
                prefix: None,
            },
        );

        test_config.save_to_path(&config_file).unwrap();
        assert!(config_file.exists(), "Config file should exist");

        let loaded_config = SiteConfig::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_shipped_host_settings_are_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../etc/host-settings.toml");

        let config = SiteConfig::load_from_path(&path).unwrap().unwrap();

        assert_eq!(config.linker.sitename, "OSHWiki");
        assert!(config.virtual_rest.modules.contains_key("parsoid"));
    }
}
