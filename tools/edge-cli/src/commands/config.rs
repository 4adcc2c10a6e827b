//! Configuration management commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig, CONFIG_NAMES};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => get_config(&key, ctx),
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx),
        ConfigCommand::Init { force } => init_config(force, ctx).map(|_| ()),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Current Configuration");

    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("");
    ctx.output.info("[api]");
    ctx.output.kv("functions_url", &ctx.config.api.functions_url);
    ctx.output.kv("services_url", &ctx.config.api.services_url);
    ctx.output.kv("timeout_secs", &ctx.config.api.timeout_secs.to_string());

    ctx.output.info("");
    ctx.output.info("[auth]");
    let token = match ctx.config.auth.token.as_deref() {
        Some(token) => redact(token),
        None => "(not set)".to_string(),
    };
    ctx.output.kv("token", &token);

    Ok(())
}

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;
    ctx.output.info(&value);
    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let config_path = match &ctx.config_path {
        Some(path) => path.clone(),
        None => find_config_file(&ctx.cwd)?,
    };
    let path = config_path.to_string_lossy();

    // Re-read the file so flag and env overrides are not persisted.
    let mut config = CliConfig::load(&path)?;
    set_config_value(&mut config, key, value)?;
    config.save(&path)?;

    let shown = if key == "auth.token" {
        redact(value)
    } else {
        value.to_string()
    };
    ctx.output.success(&format!("Set {} = {}", key, shown));

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<PathBuf> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(config_path)
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check_config(&ctx.config);

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Collect errors and warnings for a configuration.
fn check_config(config: &CliConfig) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for (key, url) in [
        ("api.functions_url", &config.api.functions_url),
        ("api.services_url", &config.api.services_url),
    ] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(format!("{} must be an http(s) URL, got '{}'", key, url));
        } else if url.starts_with("http://") {
            warnings.push(format!("{} is not using https", key));
        }
    }

    if config.api.timeout_secs == 0 {
        errors.push("api.timeout_secs must be greater than 0".to_string());
    }

    if config.auth.token.as_deref().map_or(true, |t| t.trim().is_empty()) {
        warnings.push("auth.token is not set; pass --token or set EDGE_TOKEN".to_string());
    }

    (errors, warnings)
}

fn get_config_value(config: &CliConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["api", "functions_url"] => Ok(config.api.functions_url.clone()),
        ["api", "services_url"] => Ok(config.api.services_url.clone()),
        ["api", "timeout_secs"] => Ok(config.api.timeout_secs.to_string()),
        ["auth", "token"] => Ok(config
            .auth
            .token
            .as_deref()
            .map(redact)
            .unwrap_or_else(|| "null".to_string())),
        _ => bail!("Unknown config key: {}", key),
    }
}

fn set_config_value(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["api", "functions_url"] => config.api.functions_url = value.to_string(),
        ["api", "services_url"] => config.api.services_url = value.to_string(),
        ["api", "timeout_secs"] => {
            let secs: u64 = value
                .parse()
                .with_context(|| format!("api.timeout_secs must be a number, got '{}'", value))?;
            if secs == 0 {
                bail!("api.timeout_secs must be greater than 0");
            }
            config.api.timeout_secs = secs;
        }
        ["auth", "token"] => config.auth.token = Some(value.to_string()),
        _ => bail!("Unknown config key: {}", key),
    }

    Ok(())
}

fn find_config_file(cwd: &Path) -> Result<PathBuf> {
    for name in &CONFIG_NAMES {
        let path = cwd.join(name);
        if path.exists() {
            return Ok(path);
        }
    }
    bail!("No config file found. Run `edge config init` to create one.")
}

/// Keep the last four characters of a secret.
fn redact(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
