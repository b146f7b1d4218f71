//! Handler functions for config CLI commands.

use std::path::{Path, PathBuf};

use inkpost_core::{Error, InkpostConfig, Result};

use crate::cli::ConfigAction;

// ============================================================================
// Command dispatch
// ============================================================================

/// Handle a config subcommand.
pub fn handle_config_command(config_path: Option<&Path>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => cmd_config_path(config_path),
        ConfigAction::Show => {
            print!("{}", cmd_config_show(config_path)?);
            Ok(())
        }
        ConfigAction::Init { force } => {
            let path = cmd_config_init(config_path, force)?;
            println!("Config file created at {}", path.display());
            Ok(())
        }
    }
}

// ============================================================================
// Command handlers
// ============================================================================

fn resolve(config_path: Option<&Path>) -> Result<PathBuf> {
    InkpostConfig::resolve_config_path(config_path).ok_or_else(|| {
        Error::config("Could not determine config directory for this platform")
    })
}

/// Show the resolved config file path.
pub fn cmd_config_path(config_path: Option<&Path>) -> Result<()> {
    let path = resolve(config_path)?;
    println!("{}", path.display());
    if !path.exists() {
        eprintln!(
            "(file does not exist, run `{} config init` to create it)",
            InkpostConfig::project_name()
        );
    }
    Ok(())
}

/// Render the effective configuration, file plus environment, with
/// secrets hidden.
///
/// Validation problems are appended as TOML comments rather than failing,
/// so an incomplete configuration can still be inspected.
pub fn cmd_config_show(config_path: Option<&Path>) -> Result<String> {
    let config = InkpostConfig::load(config_path)?;
    let mut rendered =
        toml::to_string_pretty(&config.summary()).map_err(|e| Error::config(e.to_string()))?;

    if let Err(err) = config.validate() {
        log::warn!("{err}");
        rendered.push('\n');
        for line in err.to_string().lines() {
            rendered.push_str("# ");
            rendered.push_str(line);
            rendered.push('\n');
        }
    }
    Ok(rendered)
}

/// Write the default configuration and return where it went.
pub fn cmd_config_init(config_path: Option<&Path>, force: bool) -> Result<PathBuf> {
    let path = resolve(config_path)?;

    if path.exists() && !force {
        return Err(Error::config(format!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }

    let content = InkpostConfig::default().to_toml_string()?;
    std::fs::write(&path, content).map_err(|e| Error::io_with_path(e, &path))?;
    log::info!("Wrote default configuration to {}", path.display());
    Ok(path)
}

// ============================================================================
// Tests
// ============================================================================
