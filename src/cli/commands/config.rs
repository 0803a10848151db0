//! `stepform config` command - Configuration inspection
//!
//! Shows the effective configuration and where it is read from.

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::parse_document;
use crate::cli::output::render_serialized;
use crate::cli::GlobalOpts;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("mask_password", "Hide the password in the completion summary (default: true)"),
    ("default_format", "Default output format (text, yaml, json)"),
    ("summary_template", "Path to a Tera template for the text summary"),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

/// Look up one key of the effective config as display text
fn get_config_value(config: &Config, key: &str) -> Result<Option<String>> {
    match key {
        "mask_password" => Ok(Some(config.mask_password().to_string())),
        "default_format" => Ok(config.default_format.clone()),
        "summary_template" => Ok(config
            .summary_template
            .as_ref()
            .map(|p| p.display().to_string())),
        _ => Err(miette::miette!(
            help = "Run `stepform config keys` to list valid keys",
            "Unknown configuration key '{}'",
            key
        )),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();

    if let Some(key) = &args.key {
        return match get_config_value(&config, key)? {
            Some(v) => {
                println!("{}", v);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    let format = global.format.resolve(config.default_format.as_deref());
    if format.is_structured() {
        print!("{}", render_serialized(&config, format)?);
        return Ok(());
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    for (key, _) in VALID_KEYS {
        let value = get_config_value(&config, key)?;
        match value {
            Some(v) => println!("  {} = {}", style(key).cyan(), v),
            None => println!("  {} = {}", style(key).cyan(), style("(not set)").dim()),
        }
    }

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    for (rank, source) in config_sources().iter().enumerate() {
        println!("  {}. {}", rank + 1, source);
    }

    Ok(())
}

/// Config sources, highest priority first
fn config_sources() -> Vec<String> {
    let global = Config::global_config_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(unavailable)".to_string());
    vec![
        "Environment variables (STEPFORM_MASK_PASSWORD, STEPFORM_FORMAT, STEPFORM_TEMPLATE)".to_string(),
        format!("Working directory config ({})", Config::local_config_path().display()),
        format!("Global config ({})", global),
    ]
}

fn run_path() -> Result<()> {
    match Config::global_config_path() {
        Some(path) => print_path("global", &path),
        None => println!("  {}: {}", style("global").cyan(), style("(unavailable)").dim()),
    }
    print_path("local", &Config::local_config_path());
    Ok(())
}

fn print_path(scope: &str, path: &std::path::Path) {
    let status = if !path.exists() {
        style("(not found)").dim().to_string()
    } else {
        match std::fs::read_to_string(path)
            .map_err(|e| miette::miette!("{}", e))
            .and_then(|content| parse_document::<Config>(path, &content))
        {
            Ok(_) => style("(ok)").green().to_string(),
            Err(_) => style("(invalid, ignored)").red().to_string(),
        }
    };
    println!("  {}: {} {}", style(scope).cyan(), path.display(), status);
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();
    for (key, description) in VALID_KEYS {
        println!("  {:<18} {}", style(key).cyan(), description);
    }
    Ok(())
}
