//! CLI execution context.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context as _, Result};
use edge_api::{EdgeFunctionsClient, EdgeServicesClient, ReqwestTransport};

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration was read from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file, then apply a token override.
    pub fn load(config_path: Option<&str>, token: Option<String>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (mut config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            config.auth.token = Some(token);
        }

        tracing::debug!(config = ?config_path, "loaded configuration");

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree, falling back to the user config.
    fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if let Some(found) = Self::try_load(config_path) {
                    return Some(found);
                }
            }

            if !current.pop() {
                break;
            }
        }

        user_config_path().and_then(Self::try_load)
    }

    fn try_load(path: PathBuf) -> Option<(CliConfig, PathBuf)> {
        if !path.exists() {
            return None;
        }
        match CliConfig::load(path.to_str()?) {
            Ok(config) => Some((config, path)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable config");
                None
            }
        }
    }

    /// The API token, or an error explaining how to provide one.
    pub fn token(&self) -> Result<&str> {
        match self.config.auth.token.as_deref() {
            Some(token) if !token.trim().is_empty() => Ok(token),
            _ => bail!(
                "No API token configured. Pass --token, set EDGE_TOKEN, or run `edge config set auth.token <TOKEN>`"
            ),
        }
    }

    fn transport(&self) -> Result<ReqwestTransport> {
        if self.config.api.timeout_secs == 0 {
            bail!("api.timeout_secs must be greater than 0. Run `edge config set api.timeout_secs <SECONDS>`");
        }
        let user_agent = format!("edge-cli/{}", env!("CARGO_PKG_VERSION"));
        ReqwestTransport::new(
            Duration::from_secs(self.config.api.timeout_secs),
            &user_agent,
        )
        .context("Failed to build HTTP client")
    }

    /// Client for the edge functions API.
    pub fn functions_client(&self) -> Result<EdgeFunctionsClient<ReqwestTransport>> {
        let token = self.token()?;
        Ok(EdgeFunctionsClient::new(
            self.transport()?,
            &self.config.api.functions_url,
            token,
        ))
    }

    /// Client for the edge services API.
    pub fn services_client(&self) -> Result<EdgeServicesClient<ReqwestTransport>> {
        let token = self.token()?;
        Ok(EdgeServicesClient::new(
            self.transport()?,
            &self.config.api.services_url,
            token,
        ))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

/// `$HOME/.config/edge/edge.toml`.
pub fn user_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("edge")
            .join("edge.toml")
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Context with defaults and no token, rooted at `cwd`.
    pub(crate) fn context_in(cwd: &Path) -> Context {
        Context {
            config: CliConfig::default(),
            config_path: None,
            output: Output::new(),
            cwd: cwd.to_path_buf(),
        }
    }

    #[test]
    fn test_missing_token_is_error() {
        let ctx = context_in(Path::new("/tmp"));
        let err = ctx.token().unwrap_err();
        assert!(err.to_string().contains("EDGE_TOKEN"));
        assert!(ctx.functions_client().is_err());
    }

    #[test]
    fn test_zero_timeout_fails_before_any_request() {
        let mut ctx = context_in(Path::new("/tmp"));
        ctx.config.auth.token = Some("token".into());
        ctx.config.api.timeout_secs = 0;

        let err = ctx.services_client().err().unwrap();
        assert!(err.to_string().contains("api.timeout_secs"));
        assert!(ctx.functions_client().is_err());

        ctx.config.api.timeout_secs = 5;
        assert!(ctx.functions_client().is_ok());
    }

    #[test]
    fn test_blank_token_is_error() {
        let mut ctx = context_in(Path::new("/tmp"));
        ctx.config.auth.token = Some("  ".into());
        assert!(ctx.token().is_err());
    }

    #[test]
    fn test_resolve_path() {
        let ctx = context_in(Path::new("/work"));
        assert_eq!(
            ctx.resolve_path(Path::new("code.js")),
            PathBuf::from("/work/code.js")
        );
        assert_eq!(
            ctx.resolve_path(Path::new("/abs/code.js")),
            PathBuf::from("/abs/code.js")
        );
    }

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            dir.path().join("edge.toml"),
            "[auth]\ntoken = \"from-file\"\n",
        )
        .unwrap();

        let (config, path) = Context::find_config(&nested).unwrap();
        assert_eq!(config.auth.token.as_deref(), Some("from-file"));
        assert_eq!(path, dir.path().join("edge.toml"));
    }
}
