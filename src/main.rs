//! Notemark - render tagged note text to markup.
//!
//! # Usage
//!
//! ```bash
//! notemark note.txt
//! notemark --colors "b03830 5d62f0" note.txt
//! notemark --escape-html --save
//! notemark --tags
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use notemark::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    save_config_flags,
};
use notemark::markup::parse_colors;

/// Render tagged note text to markup
#[derive(Parser, Debug)]
#[command(name = "notemark", version, about, long_about = None)]
struct Cli {
    /// Note file to render
    #[arg(value_name = "FILE", required_unless_present_any = ["tags", "save", "clear"])]
    file: Option<PathBuf>,

    /// Colors for the numbered tags, as hex values separated by spaces or commas
    #[arg(long, value_name = "COLORS")]
    colors: Option<String>,

    /// Escape HTML in literal note text
    #[arg(long)]
    escape_html: bool,

    /// Print the tag table as JSON instead of rendering
    #[arg(long)]
    tags: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = ConfigFlags {
        colors: cli
            .colors
            .as_deref()
            .map(parse_colors)
            .transpose()
            .context("Invalid --colors value")?,
        escape_html: cli.escape_html,
    };

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);
    tracing::debug!(?effective, "resolved flags");

    let converter = effective.converter();

    if cli.tags {
        let json = serde_json::to_string_pretty(converter.tags()).context("encode tag table")?;
        println!("{json}");
        return Ok(());
    }

    let Some(file) = cli.file else {
        return Ok(());
    };
    if !file.exists() {
        anyhow::bail!("File not found: {}", file.display());
    }
    let raw = fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    println!("{}", converter.convert(&raw));
    Ok(())
}
