//! # XML Pad
//!
//! A single-document XML editor: upload a file, edit it with highlighting
//! and auto-indent, download or copy the result.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run the editor
//! cargo run
//!
//! # Start with a file loaded
//! cargo run -- path/to/file.xml
//!
//! # Write the default config and exit
//! cargo run -- --init-config
//! ```

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use xmlpad_core::{Config, FontSize, Theme};
use xmlpad_ui::{Flags, run};

/// XML Pad - a single-document XML editor
#[derive(Parser, Debug)]
#[command(name = "xmlpad")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// XML file to load at startup
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Config file (defaults to the user config directory)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Editor theme: vs-dark, light or hc-black
    #[arg(short, long, value_name = "THEME")]
    theme: Option<Theme>,

    /// Editor font size in pixels (10, 12, 14, 16, 18 or 20)
    #[arg(short, long, value_name = "PX", value_parser = parse_font_size)]
    font_size: Option<FontSize>,

    /// Write a default config file (with any overrides) and exit
    #[arg(long)]
    init_config: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_font_size(s: &str) -> Result<FontSize, String> {
    let px: u16 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    FontSize::new(px).ok_or_else(|| {
        let supported: Vec<String> = FontSize::ALL.iter().map(|f| f.px().to_string()).collect();
        format!("unsupported size {}, expected one of {}", px, supported.join(", "))
    })
}

fn log_level(verbose: u8) -> tracing::Level {
    match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

/// Loads the config named on the command line, or the default one.
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load(),
    };

    apply_overrides(&mut config, args);
    Ok(config)
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(theme) = args.theme {
        config.editor.theme = theme;
    }
    if let Some(font_size) = args.font_size {
        config.editor.font_size = font_size;
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over -v
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(log_level(args.verbose)).into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true),
        )
        .with(filter)
        .init();

    tracing::info!("Starting XML Pad v{}", env!("CARGO_PKG_VERSION"));

    if args.init_config {
        let mut config = Config::default();
        apply_overrides(&mut config, &args);
        let path = match &args.config {
            Some(path) => path.clone(),
            None => Config::default_path()?,
        };
        config
            .save_to(&path)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let config = load_config(&args)?;
    let flags = Flags {
        config,
        file: args.file,
    };

    run(flags).map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["xmlpad"]);
        assert!(args.file.is_none());
        assert!(args.theme.is_none());
        assert!(!args.init_config);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_args_with_file_and_overrides() {
        let args = Args::parse_from([
            "xmlpad",
            "doc.xml",
            "--theme",
            "hc-black",
            "--font-size",
            "18",
            "-vv",
        ]);
        assert_eq!(args.file, Some(PathBuf::from("doc.xml")));
        assert_eq!(args.theme, Some(Theme::HighContrast));
        assert_eq!(args.font_size.map(FontSize::px), Some(18));
        assert_eq!(log_level(args.verbose), tracing::Level::DEBUG);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Args::try_parse_from(["xmlpad", "--font-size", "13"]).is_err());
        assert!(Args::try_parse_from(["xmlpad", "--font-size", "big"]).is_err());
        assert!(Args::try_parse_from(["xmlpad", "--theme", "solarized"]).is_err());
    }

    #[test]
    fn test_overrides_apply_to_loaded_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[editor]\ntheme = \"light\"\nfont_size = 12\n").unwrap();

        let args = Args::parse_from([
            "xmlpad",
            "--config",
            path.to_str().unwrap(),
            "--font-size",
            "20",
        ]);
        let config = load_config(&args).unwrap();

        assert_eq!(config.editor.theme, Theme::Light);
        assert_eq!(config.editor.font_size.px(), 20);
    }

    #[test]
    fn test_broken_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[editor\n").unwrap();

        let args = Args::parse_from(["xmlpad", "--config", path.to_str().unwrap()]);
        assert!(load_config(&args).is_err());
    }
}
