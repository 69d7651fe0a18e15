//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use booksy_core::config::MAX_EXPORT_FONT_SIZE;
use booksy_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "log_file": config.log_file,
                    "export_font": config.export_font,
                    "export_font_size": config.export_font_size,
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:         {}", config.data_dir.display());
            println!(
                "  log_file:         {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!("  export_font:      {}", config.export_font);
            println!("  export_font_size: {}", config.export_font_size);
            println!();
            println!("Config file: {}", effective_path.display());
            println!("Book store:  {}", config.books_path().display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply_setting(&mut config, &key, &value)?;

    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            if value.trim().is_empty() {
                bail!("data_dir cannot be empty");
            }
            config.data_dir = value.into();
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        "export_font" => {
            if value.trim().is_empty() {
                bail!("export_font cannot be empty");
            }
            config.export_font = value.trim().to_string();
        }
        "export_font_size" => {
            let size: u32 = value
                .trim()
                .parse()
                .context("Invalid value for export_font_size. Use a whole number of points.")?;
            if !(1..=MAX_EXPORT_FONT_SIZE).contains(&size) {
                bail!(
                    "export_font_size must be between 1 and {} points",
                    MAX_EXPORT_FONT_SIZE
                );
            }
            config.export_font_size = size;
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, log_file, export_font, export_font_size",
                key
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_apply_setting() {
        let mut config = Config::default();

        apply_setting(&mut config, "data_dir", "/tmp/books").unwrap();
        assert_eq!(config.data_dir, Path::new("/tmp/books"));

        apply_setting(&mut config, "log_file", "/tmp/booksy.log").unwrap();
        assert_eq!(config.log_file.as_deref(), Some(Path::new("/tmp/booksy.log")));
        apply_setting(&mut config, "log_file", "none").unwrap();
        assert!(config.log_file.is_none());

        apply_setting(&mut config, "export_font", "Garamond").unwrap();
        assert_eq!(config.export_font, "Garamond");

        apply_setting(&mut config, "export_font_size", "14").unwrap();
        assert_eq!(config.export_font_size, 14);
        apply_setting(&mut config, "export_font_size", "1638").unwrap();
        assert_eq!(config.export_font_size, MAX_EXPORT_FONT_SIZE);
    }

    #[test]
    fn test_apply_setting_rejects_bad_values() {
        let mut config = Config::default();
        assert!(apply_setting(&mut config, "export_font_size", "big").is_err());
        assert!(apply_setting(&mut config, "export_font_size", "0").is_err());
        assert!(apply_setting(&mut config, "export_font_size", "1639").is_err());
        assert!(apply_setting(&mut config, "export_font_size", "3000000000").is_err());
        assert!(apply_setting(&mut config, "export_font", " ").is_err());
        assert!(apply_setting(&mut config, "theme", "dark").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_set_writes_config_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let data_dir = temp_dir.path().join("data");
        std::fs::write(&path, format!("data_dir = {:?}\n", data_dir)).unwrap();
        let output = Output::new(OutputFormat::Quiet);

        set(
            "export_font".to_string(),
            "Baskerville".to_string(),
            Some(&path),
            &output,
        )
        .unwrap();

        let saved = Config::load_from_path(&path).unwrap();
        assert_eq!(saved.export_font, "Baskerville");
    }
}
