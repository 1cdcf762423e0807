use std::path::{Path, PathBuf};

use anyhow::ensure;
use serde::Deserialize;
use tap::TapFallible;
use tokio::fs;
use tracing::{error, info, instrument};

#[derive(Debug, Deserialize, Clone, Eq, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory holding `stanza-01.txt` and friends.
    pub poem_dir: PathBuf,
    pub stanza_count: usize,
    /// 1-based stanza replaced by a misnamed path in problem D, random when unset.
    pub misnamed_stanza: Option<usize>,
    pub write_path: PathBuf,
    pub write_content: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poem_dir: PathBuf::from("poem-two"),
            stanza_count: 8,
            misnamed_stanza: None,
            write_path: PathBuf::from("message.txt"),
            write_content: "Hello".to_string(),
        }
    }
}

impl Config {
    /// Load the YAML config at `path`, or the defaults when no path is given.
    #[instrument(err)]
    pub async fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            None => {
                info!("no config file, use default config");

                return Ok(Self::default());
            }

            Some(path) => path,
        };

        let cfg = fs::read(path)
            .await
            .tap_err(|err| error!(%err, ?path, "read config failed"))?;
        let config = serde_yaml::from_slice::<Config>(&cfg)?;

        info!(?config, "load config done");

        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.stanza_count > 0, "stanza_count must be at least 1");

        if let Some(misnamed) = self.misnamed_stanza {
            ensure!(
                (1..=self.stanza_count).contains(&misnamed),
                "misnamed_stanza {misnamed} is out of range 1..={}",
                self.stanza_count
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config =
            serde_yaml::from_str::<Config>("poem_dir: poems\nmisnamed_stanza: 5\n").unwrap();

        assert_eq!(config.poem_dir, Path::new("poems"));
        assert_eq!(config.misnamed_stanza, Some(5));
        assert_eq!(config.stanza_count, 8);
        assert_eq!(config.write_content, "Hello");
    }

    #[test]
    fn test_validate_misnamed_range() {
        let mut config = Config::default();
        config.validate().unwrap();

        config.misnamed_stanza = Some(8);
        config.validate().unwrap();

        config.misnamed_stanza = Some(0);
        assert!(config.validate().is_err());

        config.misnamed_stanza = Some(9);
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "stanza_count: 3\nwrite_path: out.txt\n").unwrap();

        let config = Config::load(Some(path.as_path())).await.unwrap();

        assert_eq!(config.stanza_count, 3);
        assert_eq!(config.write_path, Path::new("out.txt"));
    }

    #[tokio::test]
    async fn test_load_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        assert!(Config::load(Some(path.as_path())).await.is_err());
    }
}
