//! Config command - configuration management.

use anyhow::{Result, anyhow};
use clap::{Args, Subcommand};
use console::{Style, style};
use essspace_config::EssspaceConfig;

use super::{Context, print_json, print_success};
use crate::app;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show resolved configuration and where it came from
    Show,

    /// Show configuration file path
    Path,

    /// Initialize a config file with defaults
    Init {
        /// Create project-local config (./essspace.toml) instead of user config
        #[arg(long)]
        local: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::Path => cmd_path(ctx),
        ConfigCommand::Init { local, force } => cmd_init(ctx, local, force),
    }
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let loaded = app::load_config(ctx)?;
    let config = &loaded.config;

    let resolved = EssspaceConfig {
        storage: Some(config.storage()),
        capture: Some(config.capture()),
        ocr: Some(config.ocr()),
        summarizer: Some(config.summarizer()),
    };
    let key = essspace_config::resolve_api_key(config.summarizer().api_key.as_deref());
    let database = ctx
        .db_path
        .clone()
        .unwrap_or_else(|| config.storage().effective_database_path());

    if ctx.json_output {
        return print_json(&serde_json::json!({
            "sources": loaded.layers,
            "warnings": loaded.warnings,
            "database": database,
            "api_key_source": key.map(|k| k.source.to_string()),
            "config": resolved,
        }));
    }

    let dim = Style::new().dim();
    println!("{}", style("Essspace Configuration").bold());
    println!("{}", dim.apply_to("─".repeat(50)));
    println!();

    if loaded.layers.is_empty() {
        println!("No config files loaded (using defaults)");
    } else {
        println!("Config files (later overrides earlier):");
        for file in &loaded.layers {
            println!("  {:<8} {}", file.layer, file.path.display());
        }
    }
    println!();

    for warning in &loaded.warnings {
        let yellow = Style::new().yellow();
        println!("{} {}", yellow.apply_to("Warning:"), warning);
    }

    println!("Database:      {}", database.display());
    println!(
        "Screenshots:   {}",
        config.capture().effective_screenshot_dir().display()
    );
    let key_status = match &key {
        Some(secret) => format!("set ({})", secret.source),
        None => format!("not set (export {})", essspace_config::API_KEY_ENV),
    };
    println!("API key:       {}", key_status);
    println!();

    // Never echo the key itself.
    let mut redacted = resolved;
    if let Some(summarizer) = redacted.summarizer.as_mut()
        && summarizer.api_key.is_some()
    {
        summarizer.api_key = Some("********".to_string());
    }
    print!("{}", redacted.to_toml()?);

    Ok(())
}

fn cmd_path(ctx: &Context) -> Result<()> {
    let path = app::user_config_path(ctx)
        .ok_or_else(|| anyhow!("Could not determine config directory"))?;
    if ctx.json_output {
        print_json(&serde_json::json!({ "path": path, "exists": path.is_file() }))
    } else {
        println!("{}", path.display());
        Ok(())
    }
}

fn cmd_init(ctx: &Context, local: bool, force: bool) -> Result<()> {
    let path = if local {
        std::path::PathBuf::from(essspace_config::PROJECT_CONFIG_FILE)
    } else {
        app::user_config_path(ctx).ok_or_else(|| anyhow!("Could not determine config directory"))?
    };

    if path.exists() && !force {
        println!("Config file already exists: {}", path.display());
        println!("Use --force to overwrite it.");
        return Ok(());
    }

    essspace_config::save_config(&EssspaceConfig::with_all_defaults(), &path)?;
    print_success(format!("Created config file: {}", path.display()));
    Ok(())
}
