//! Configuration commands.

use anyhow::{bail, Context as _, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    let config = &ctx.config;
    ctx.output.header("Current Configuration");

    ctx.output.info("[pricing]");
    let rules = config.pricing.rules();
    ctx.output.kv("tax_rate", &rules.tax_rate.to_string());
    ctx.output
        .kv("free_shipping_threshold", &rules.free_shipping_threshold.display());
    ctx.output
        .kv("flat_shipping_fee", &rules.flat_shipping_fee.display());

    ctx.output.info("[storage]");
    ctx.output.kv("dir", &ctx.storage_dir().display().to_string());

    ctx.output.info("[catalog]");
    ctx.output.kv("path", &ctx.catalog_path().display().to_string());
    let limit = config
        .catalog
        .limit
        .map_or_else(|| "none".to_string(), |l| l.to_string());
    ctx.output.kv("limit", &limit);
    ctx.output
        .kv("timeout_ms", &config.catalog.timeout_ms.to_string());

    ctx.output.info("[retry]");
    ctx.output
        .kv("max_retries", &config.retry.max_retries.to_string());
    ctx.output
        .kv("base_delay_ms", &config.retry.base_delay_ms.to_string());
    ctx.output
        .kv("max_delay_ms", &config.retry.max_delay_ms.to_string());

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let config_path = cwd.join("storefront.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, generate_default_config())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    ctx.output
        .success(&format!("Created: {}", config_path.display()));
    Ok(())
}
