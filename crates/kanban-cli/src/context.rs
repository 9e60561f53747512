use std::path::Path;

use kanban_client::{HttpClient, ReconcilePolicy};
use kanban_core::{AppConfig, KanbanResult};

/// Everything a command needs: the resolved configuration and an API client.
pub struct CliContext {
    pub config: AppConfig,
    pub client: HttpClient,
}

impl CliContext {
    /// Resolve configuration in order of precedence: command-line flags,
    /// environment, config file, defaults.
    pub fn load(config_path: Option<&Path>, api_url: Option<String>) -> KanbanResult<Self> {
        let mut config = match config_path {
            Some(path) => {
                let mut config = AppConfig::load_from(path)?;
                config.apply_env_overrides();
                config
            }
            None => AppConfig::load(),
        };
        if let Some(url) = api_url {
            config.client.api_url = url;
        }

        tracing::debug!(api_url = %config.client.api_url, "Resolved configuration");
        let client = HttpClient::new(config.client.api_url.clone());
        Ok(Self { config, client })
    }

    pub fn reconcile_policy(&self) -> ReconcilePolicy {
        ReconcilePolicy::RetryThenRevert {
            retries: self.config.client.persist_retries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_flag_overrides_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[client]\napi_url = \"http://from-file:1\"\npersist_retries = 4\n",
        )
        .unwrap();

        let ctx = CliContext::load(Some(&path), Some("http://from-flag:2".to_string())).unwrap();
        assert_eq!(ctx.client.base_url(), "http://from-flag:2");
        assert_eq!(
            ctx.reconcile_policy(),
            ReconcilePolicy::RetryThenRevert { retries: 4 }
        );
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(CliContext::load(Some(&dir.path().join("nope.toml")), None).is_err());
    }
}
