//! First-run setup wizard
//!
//! Prompts for the settings an export cannot run without (database
//! connection, uploads directory, export directory) and saves them to the
//! config file. The export itself never prompts; it only reads validated
//! settings.

use crate::core::config::{get_config_path, Config, StoreDriver};
use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, Password, Select};
use log::info;
use std::path::{Path, PathBuf};

/// Answers collected by the wizard (or supplied programmatically)
#[derive(Debug, Clone, Default)]
pub struct SetupOptions {
    pub driver: StoreDriver,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub uploads_root: PathBuf,
    pub export_root: PathBuf,
}

/// Result of the setup process
#[derive(Debug)]
pub struct SetupResult {
    /// The updated configuration
    pub config: Config,
    /// Where the configuration was written, if it was
    pub saved_to: Option<PathBuf>,
}

/// Merge setup answers into a configuration
///
/// An explicit store URL is dropped so the entered fields take effect.
pub fn apply_setup(mut config: Config, options: &SetupOptions) -> Config {
    config.store.url = None;
    config.store.driver = options.driver;
    config.store.database = options.database.clone();
    if options.driver == StoreDriver::Mysql {
        config.store.host = options.host.clone();
        config.store.port = options.port;
        config.store.username = options.username.clone();
        config.store.password = options.password.clone();
    }
    config.paths.uploads_root = options.uploads_root.clone();
    config.paths.export_root = options.export_root.clone();
    config
}

/// Run the CLI setup wizard
///
/// Existing values are offered as defaults. The result is saved to
/// `save_path`, or to the standard config location when `None`.
pub fn run_setup_wizard(existing: Config, save_path: Option<&Path>) -> Result<SetupResult> {
    println!();
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║                Lychee Exporter - Configuration                   ║");
    println!("╠══════════════════════════════════════════════════════════════════╣");
    println!("║  Tell us where your Lychee library lives and where to export it. ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let options = prompt_for_options(&existing)?;
    let config = apply_setup(existing, &options);

    let save = Confirm::new()
        .with_prompt("Save these settings?")
        .default(true)
        .interact()?;

    if !save {
        println!("Settings will be used for this run only.");
        return Ok(SetupResult {
            config,
            saved_to: None,
        });
    }

    let path = match save_path {
        Some(path) => path.to_path_buf(),
        None => get_config_path().context("could not determine the configuration directory")?,
    };

    config
        .save(&path)
        .with_context(|| format!("failed to save configuration to {}", path.display()))?;
    info!("Configuration saved to {}", path.display());
    println!("✓ Configuration saved to: {}", path.display());

    Ok(SetupResult {
        config,
        saved_to: Some(path),
    })
}

fn prompt_for_options(existing: &Config) -> Result<SetupOptions> {
    let uploads_root: String = Input::new()
        .with_prompt("Lychee uploads directory")
        .with_initial_text(existing.paths.uploads_root.to_string_lossy().to_string())
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            if Path::new(input.trim()).is_dir() {
                Ok(())
            } else {
                Err(format!("'{}' is not an existing directory", input.trim()))
            }
        })
        .interact_text()?;

    let export_root: String = Input::new()
        .with_prompt("Export root directory (created if missing)")
        .with_initial_text(existing.paths.export_root.to_string_lossy().to_string())
        .interact_text()?;

    let drivers = ["MySQL / MariaDB", "SQLite"];
    let default_driver = match existing.store.driver {
        StoreDriver::Mysql => 0,
        StoreDriver::Sqlite => 1,
    };
    let driver = match Select::new()
        .with_prompt("Database type")
        .items(&drivers)
        .default(default_driver)
        .interact()?
    {
        1 => StoreDriver::Sqlite,
        _ => StoreDriver::Mysql,
    };

    let mut options = SetupOptions {
        driver,
        uploads_root: PathBuf::from(uploads_root.trim()),
        export_root: PathBuf::from(export_root.trim()),
        ..Default::default()
    };

    match driver {
        StoreDriver::Sqlite => {
            options.database = Input::new()
                .with_prompt("Database file")
                .with_initial_text(existing.store.database.clone())
                .interact_text()?;
        }
        StoreDriver::Mysql => {
            options.host = Input::new()
                .with_prompt("Database host")
                .default(existing.store.host.clone())
                .interact_text()?;
            options.port = Input::new()
                .with_prompt("Database port")
                .default(existing.store.port)
                .interact_text()?;
            options.database = Input::new()
                .with_prompt("Database name")
                .default(existing.store.database.clone())
                .interact_text()?;
            options.username = Input::new()
                .with_prompt("Database username")
                .with_initial_text(existing.store.username.clone())
                .interact_text()?;
            options.password = Password::new()
                .with_prompt("Database password")
                .allow_empty_password(true)
                .interact()?;
        }
    }

    Ok(options)
}
