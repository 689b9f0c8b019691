use clap::{Args, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::OutputFormat;
use crate::config::{Config, Setting, DATA_DIR_VAR, STORAGE_KEY_VAR};

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show resolved settings and the files they point at
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Write a config file holding the current settings
    Init {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// What `config show` reports.
#[derive(Debug, Serialize)]
struct StorageReport<'a> {
    config_file: &'a Path,
    config_file_found: bool,
    data_dir: &'a Setting<PathBuf>,
    storage_key: &'a Setting<String>,
    snapshot_path: PathBuf,
    snapshot_exists: bool,
    session_path: PathBuf,
    session_exists: bool,
}

impl<'a> StorageReport<'a> {
    fn new(config: &'a Config) -> Self {
        let snapshot_path = config.repository().path();
        let session_path = config.session_storage().path();
        Self {
            config_file: &config.config_path,
            config_file_found: config.file_loaded,
            data_dir: &config.data_dir,
            storage_key: &config.storage_key,
            snapshot_exists: snapshot_path.exists(),
            snapshot_path,
            session_exists: session_path.exists(),
            session_path,
        }
    }
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                let report = StorageReport::new(config);
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                    OutputFormat::Text => print!("{}", render_report(&report)),
                }
                Ok(())
            }

            ConfigSubcommand::Init { force } => {
                if write_config_file(config, *force)? {
                    println!("Wrote {}", config.config_path.display());
                } else {
                    println!(
                        "{} already exists (use --force to replace it)",
                        config.config_path.display()
                    );
                }
                Ok(())
            }
        }
    }
}

fn render_report(report: &StorageReport<'_>) -> String {
    let presence = |exists: bool| if exists { "" } else { " (not created yet)" };

    let mut out = String::new();
    out.push_str(&format!(
        "Config file:  {}{}\n\n",
        report.config_file.display(),
        if report.config_file_found { "" } else { " (not found)" }
    ));
    out.push_str(&format!(
        "data_dir      {}  [{}]\n",
        report.data_dir.value.display(),
        report.data_dir.layer
    ));
    out.push_str(&format!(
        "storage_key   {}  [{}]\n\n",
        report.storage_key.value, report.storage_key.layer
    ));
    out.push_str(&format!(
        "Favorites:    {}{}\n",
        report.snapshot_path.display(),
        presence(report.snapshot_exists)
    ));
    out.push_str(&format!(
        "Session:      {}{}\n",
        report.session_path.display(),
        presence(report.session_exists)
    ));
    out
}

/// YAML for the config file, seeded with the values `config` resolved to.
fn config_template(config: &Config) -> Result<String, serde_json::Error> {
    // JSON strings are valid double-quoted YAML scalars.
    let data_dir = serde_json::to_string(&config.data_dir.value.display().to_string())?;
    let storage_key = serde_json::to_string(&config.storage_key.value)?;

    Ok(format!(
        "# FitMalta CLI settings\n\
         #\n\
         # Favorites are kept in <data_dir>/<storage_key>.json and the sign-in\n\
         # session in <data_dir>/session.json. {} and {}\n\
         # take precedence over this file.\n\
         \n\
         # Relative paths are taken from this file's directory.\n\
         data_dir: {}\n\
         \n\
         # Letters, digits, '-', '_' and '.', not starting with '.'.\n\
         storage_key: {}\n",
        DATA_DIR_VAR, STORAGE_KEY_VAR, data_dir, storage_key
    ))
}

/// Writes the template to `config.config_path`. Returns false if a file is
/// already there and `force` is not set.
fn write_config_file(config: &Config, force: bool) -> Result<bool, Box<dyn std::error::Error>> {
    let path = &config.config_path;
    if path.exists() && !force {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, config_template(config)?)?;
    tracing::info!("Wrote config file {}", path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Layer;
    use tempfile::TempDir;

    fn resolve(path: PathBuf, data_dir: &Path, key: &str) -> Config {
        let data_dir = data_dir.display().to_string();
        let key = key.to_string();
        Config::resolve(path, |name| match name {
            DATA_DIR_VAR => Some(data_dir.clone()),
            STORAGE_KEY_VAR => Some(key.clone()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn test_report_points_at_snapshot_and_session() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("data");
        let config = resolve(temp_dir.path().join("config.yaml"), &data_dir, "saved");

        let report = StorageReport::new(&config);
        assert_eq!(report.snapshot_path, data_dir.join("saved.json"));
        assert_eq!(report.session_path, data_dir.join("session.json"));
        assert!(!report.snapshot_exists);
        assert!(!report.config_file_found);

        let text = render_report(&report);
        assert!(text.contains("saved.json (not created yet)"));
        assert!(text.contains("storage_key   saved  [environment]"));
    }

    #[test]
    fn test_report_notices_existing_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("data");
        let config = resolve(temp_dir.path().join("config.yaml"), &data_dir, "saved");
        fs::create_dir_all(&data_dir).unwrap();
        fs::write(data_dir.join("saved.json"), "[]").unwrap();

        let report = StorageReport::new(&config);
        assert!(report.snapshot_exists);
        assert!(!report.session_exists);
    }

    #[test]
    fn test_written_template_loads_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.yaml");
        let data_dir = temp_dir.path().join("my data");
        let config = resolve(path.clone(), &data_dir, "saved.v2");

        assert!(write_config_file(&config, false).unwrap());

        let reloaded = Config::resolve(path, |_| None).unwrap();
        assert!(reloaded.file_loaded);
        assert_eq!(reloaded.data_dir.value, data_dir);
        assert_eq!(reloaded.data_dir.layer, Layer::File);
        assert_eq!(reloaded.storage_key.value, "saved.v2");
        assert_eq!(reloaded.storage_key.layer, Layer::File);
    }

    #[test]
    fn test_init_keeps_existing_file_unless_forced() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "# hand edited\n").unwrap();
        let config = resolve(path.clone(), temp_dir.path(), "saved");

        assert!(!write_config_file(&config, false).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "# hand edited\n");

        assert!(write_config_file(&config, true).unwrap());
        assert!(fs::read_to_string(&path).unwrap().contains("storage_key: \"saved\""));
    }
}
