//! Command handler implementations
//!
//! This module contains the implementation of all CLI commands.

use crate::cli::progress::{
    format_duration, print_error, print_header, print_info, print_success, print_warning,
    ExportSpinner,
};
use crate::cli::{Args, Commands};
use crate::core::config::{
    init_config, redact_url, Config, ConfigError, ExportSettings, MissingVariantPolicy,
};
use crate::core::exporter::{ExportOptions, TreeExporter};
use crate::core::report::RunReport;
use crate::core::setup::run_setup_wizard;
use crate::store::{AlbumStore, SqlAlbumStore};
use crate::testdb::{self, scenarios};
use crate::transfer::{FileTransferer, NativeCopyTransferer, RsyncTransferer, TransferMethod};
use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Load the configuration for this run
///
/// An explicit path that does not exist yet yields the defaults, so
/// `setup --config <new file>` can create it. A file that exists but cannot
/// be read or parsed is an error; the wizard must never save over it.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => match Config::load(path) {
            Ok(config) => Ok(config),
            Err(ConfigError::FileNotFound(_)) => {
                warn!("Config file {} not found, using defaults", path.display());
                Ok(Config::default())
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("failed to load config file {}", path.display()))),
        },
        None => Config::load_default().context("failed to load configuration"),
    }
}

/// Apply command-line overrides on top of the loaded configuration
pub fn apply_cli_overrides(args: &Args, config: &mut Config) -> Result<()> {
    if let Some(ref uploads_root) = args.uploads_root {
        config.paths.uploads_root = uploads_root.clone();
    }
    if let Some(ref export_root) = args.export_root {
        config.paths.export_root = export_root.clone();
    }
    if let Some(ref url) = args.db_url {
        config.store.url = Some(url.clone());
    }
    if let Some(ref method) = args.transfer {
        config.export.transfer_method = method.parse::<TransferMethod>().map_err(|e| anyhow!(e))?;
    }
    if let Some(ref policy) = args.on_missing_variant {
        config.export.on_missing_variant =
            policy.parse::<MissingVariantPolicy>().map_err(|e| anyhow!(e))?;
    }
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    Ok(())
}

/// Run the appropriate command based on CLI arguments
///
/// If the configuration is incomplete and a terminal is attached, the setup
/// wizard runs before commands that need the database.
pub fn run_command(args: &Args, config: &Config) -> Result<()> {
    let config = check_and_run_setup_if_needed(args, config)?;

    match &args.command {
        None | Some(Commands::Export) => {
            export_library(&config, args.report.as_deref())?;
        }
        Some(Commands::Setup) => {
            run_setup_wizard(config, args.config.as_deref())?;
        }
        Some(Commands::Check) => {
            check_connection(&config)?;
        }
        Some(Commands::ShowConfig) => {
            show_config(&config);
        }
        Some(Commands::GenerateConfig { output }) => {
            generate_config_file(output.clone())?;
        }
        Some(Commands::Simulate {
            scenario,
            output,
            list,
        }) => {
            if *list {
                testdb::print_available_scenarios();
                return Ok(());
            }
            let output = output
                .as_deref()
                .ok_or_else(|| anyhow!("simulate needs --output <DIR>"))?;
            simulate_export(
                scenario,
                output,
                config.export.on_missing_variant,
                args.report.as_deref(),
            )?;
        }
    }

    Ok(())
}

/// Check if setup is needed and run the wizard if necessary
///
/// Returns the (possibly updated) config to use for the command.
fn check_and_run_setup_if_needed(args: &Args, config: &Config) -> Result<Config> {
    let needs_store = matches!(
        &args.command,
        None | Some(Commands::Export) | Some(Commands::Check)
    );

    if !needs_store || !config.needs_setup() {
        return Ok(config.clone());
    }

    if !std::io::stdin().is_terminal() {
        debug!(
            "Configuration incomplete ({}), no terminal for setup",
            config.missing_fields().join(", ")
        );
        return Ok(config.clone());
    }

    info!("Initial setup required...");

    match run_setup_wizard(config.clone(), args.config.as_deref()) {
        Ok(result) => {
            info!("Setup completed successfully");
            Ok(result.config)
        }
        Err(e) => {
            error!("Setup failed: {}", e);
            Err(anyhow!(
                "Setup required but failed. Run 'lychee-export setup' or edit the config file."
            ))
        }
    }
}

// ============================================================================
// Export
// ============================================================================

/// Export the configured library
pub fn export_library(config: &Config, report_path: Option<&Path>) -> Result<RunReport> {
    let settings = config.validate().context("invalid configuration")?;
    debug!("Export settings: {:?}", settings);

    info!("Connecting to {}", redact_url(&settings.store_url));
    let store = SqlAlbumStore::connect(&settings.store_url)
        .context("failed to connect to the album database")?;

    let transferer = build_transferer(&settings);
    let options = ExportOptions::new(&settings.uploads_root, &settings.export_root)
        .on_missing_variant(settings.on_missing_variant);

    print_header("Lychee Export");
    print_info(&format!("Uploads: {}", settings.uploads_root.display()));
    print_info(&format!("Export:  {}", settings.export_root.display()));
    print_info(&format!("Transfer: {}", settings.transfer_method));

    run_export(store, transferer, options, report_path, true)
}

fn build_transferer(settings: &ExportSettings) -> Box<dyn FileTransferer> {
    match settings.transfer_method {
        TransferMethod::Rsync => Box::new(
            RsyncTransferer::new()
                .with_program(settings.rsync_program.clone())
                .with_args(settings.rsync_args.clone()),
        ),
        TransferMethod::Copy => Box::new(NativeCopyTransferer::new()),
    }
}

/// Drive one export run and print its summary
///
/// The report is printed (and written, when a path is given) whether or
/// not the run completed. An aborted run's report carries the cause and
/// its summary opens with an "Export ABORTED" line.
fn run_export<S, T>(
    store: S,
    transferer: T,
    options: ExportOptions,
    report_path: Option<&Path>,
    show_spinner: bool,
) -> Result<RunReport>
where
    S: AlbumStore,
    T: FileTransferer,
{
    let spinner = if show_spinner {
        ExportSpinner::new()
    } else {
        ExportSpinner::hidden()
    };
    let observer = spinner.clone();
    let options = options.with_progress(move |progress| observer.observe(&progress));

    let mut exporter = TreeExporter::new(store, transferer, options);
    let mut report = RunReport::new();
    let result = exporter.run(&mut report);
    spinner.finish();

    print_summary(&report);

    if let Some(path) = report_path {
        report
            .write_json(path)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    match result {
        Ok(()) => Ok(report),
        Err(err) => {
            error!("Export aborted: {}", err);
            info!("Partial results: {}", report.to_string().replace('\n', ", "));
            Err(anyhow::Error::new(err).context("export aborted"))
        }
    }
}

/// Print the end-of-run summary
pub fn print_summary(report: &RunReport) {
    println!();
    for line in report.to_string().lines() {
        println!("{}", line);
    }

    if let Some(cause) = &report.aborted_by {
        println!();
        print_error(&format!("Run stopped early, counts cover completed work only: {}", cause));
    }

    if report.has_failures() {
        println!();
        print_warning("Failed photos:");
        for failure in &report.failures {
            print_error(&format!(
                "{} (album {}): {}",
                failure.photo_id, failure.album_id, failure.reason
            ));
        }
    }

    println!();
    print_info(&format!(
        "Elapsed: {}",
        format_duration(Duration::from_millis(report.duration_ms))
    ));
}

// ============================================================================
// Other commands
// ============================================================================

/// Connect to the database and report how many root albums it holds
pub fn check_connection(config: &Config) -> Result<()> {
    let url = config.store.connection_url().context("invalid store settings")?;

    info!("Connecting to {}", redact_url(&url));
    let store = SqlAlbumStore::connect(&url).context("failed to connect to the album database")?;
    store.ping().context("database did not answer")?;

    let roots = store.root_albums().context("failed to list root albums")?;

    print_success(&format!("Connected to {}", redact_url(&url)));
    print_info(&format!("Root albums: {}", roots.len()));
    Ok(())
}

/// Write the commented default config file
pub fn generate_config_file(output: Option<PathBuf>) -> Result<()> {
    let output_path = match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(&path, Config::generate_default_config())
                .with_context(|| format!("failed to write {}", path.display()))?;
            path
        }
        None => init_config()?,
    };

    info!("Configuration file: {}", output_path.display());
    info!("Edit this file to set the database and directories.");
    info!("Quick tip: Run 'lychee-export setup' to fill in the required values interactively.");

    Ok(())
}

/// Show the current configuration settings
pub fn show_config(config: &Config) {
    let config_path = Config::get_active_config_path();
    info!("Configuration file: {}", config_path.display());
    if !config_path.exists() {
        info!("(Using default settings - no config file found)");
    }
    info!("");
    info!("Current Configuration:");
    info!("----------------------");
    info!("[store]");
    match config.store.url {
        Some(ref url) => info!("  url = \"{}\"", redact_url(url)),
        None => {
            info!("  driver = \"{:?}\"", config.store.driver);
            info!("  host = \"{}\"", config.store.host);
            info!("  port = {}", config.store.port);
            info!("  database = \"{}\"", config.store.database);
            info!("  username = \"{}\"", config.store.username);
            info!(
                "  password = \"{}\"",
                if config.store.password.is_empty() { "" } else { "****" }
            );
        }
    }
    info!("");
    info!("[paths]");
    info!("  uploads_root = \"{}\"", config.paths.uploads_root.display());
    info!("  export_root = \"{}\"", config.paths.export_root.display());
    info!("");
    info!("[export]");
    info!("  on_missing_variant = \"{}\"", config.export.on_missing_variant);
    info!("  transfer_method = \"{}\"", config.export.transfer_method);
    info!("  rsync_program = \"{}\"", config.export.rsync_program.display());
    info!("  rsync_args = {:?}", config.export.rsync_args);
    info!("");
    info!("[logging]");
    info!("  level = \"{}\"", config.logging.level);
    info!("  log_to_file = {}", config.logging.log_to_file);
    info!("  log_file = \"{}\"", config.logging.log_file.display());

    if config.needs_setup() {
        warn!(
            "Setup required, missing: {}",
            config.missing_fields().join(", ")
        );
    }
}

/// Export a built-in sample library into `output`
///
/// Upload files go to `output/uploads`, albums to `output/export`.
pub fn simulate_export(
    scenario_name: &str,
    output: &Path,
    policy: MissingVariantPolicy,
    report_path: Option<&Path>,
) -> Result<RunReport> {
    let scenario = scenarios::by_name(scenario_name).ok_or_else(|| {
        anyhow!(
            "unknown scenario '{}'; use 'simulate --list' to see the available ones",
            scenario_name
        )
    })?;

    let uploads_root = output.join("uploads");
    let export_root = output.join("export");

    scenario
        .write_uploads(&uploads_root)
        .with_context(|| format!("failed to write uploads to {}", uploads_root.display()))?;
    fs::create_dir_all(&uploads_root)?;
    fs::create_dir_all(&export_root)?;

    println!("\nSimulating export of: {}", scenario.name);
    println!("   {}", scenario.description);
    println!("   Output: {}", output.display());

    let options = ExportOptions::new(&uploads_root, &export_root).on_missing_variant(policy);
    run_export(
        scenario.store,
        NativeCopyTransferer::new(),
        options,
        report_path,
        false,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;
    use walkdir::WalkDir;

    #[test]
    fn test_cli_overrides() {
        let args = Args::parse_from([
            "lychee-export",
            "--uploads-root",
            "/srv/uploads",
            "--export-root",
            "/mnt/export",
            "--db-url",
            "sqlite://lychee.db",
            "--transfer",
            "copy",
            "--on-missing-variant",
            "skip",
            "--log-level",
            "debug",
        ]);

        let mut config = Config::default();
        apply_cli_overrides(&args, &mut config).unwrap();

        assert_eq!(config.paths.uploads_root, PathBuf::from("/srv/uploads"));
        assert_eq!(config.paths.export_root, PathBuf::from("/mnt/export"));
        assert_eq!(config.store.url.as_deref(), Some("sqlite://lychee.db"));
        assert_eq!(config.export.transfer_method, TransferMethod::Copy);
        assert_eq!(config.export.on_missing_variant, MissingVariantPolicy::Skip);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let args = Args::parse_from(["lychee-export"]);
        let mut config = Config::default();
        config.export.transfer_method = TransferMethod::Copy;

        apply_cli_overrides(&args, &mut config).unwrap();

        assert_eq!(config.export.transfer_method, TransferMethod::Copy);
        assert!(config.store.url.is_none());
    }

    #[test]
    fn test_simulate_trips() {
        let temp_dir = TempDir::new().unwrap();
        let report_path = temp_dir.path().join("report.json");

        let report = simulate_export(
            "trips",
            temp_dir.path(),
            MissingVariantPolicy::Abort,
            Some(&report_path),
        )
        .unwrap();

        assert_eq!(report.albums_visited, 2);
        assert_eq!(report.photos_transferred, 1);
        assert_eq!(report.photos_failed, 0);

        let copied = temp_dir.path().join("export/Trips/Trip-2019/beach.jpg");
        assert!(copied.is_file());

        let files: Vec<_> = WalkDir::new(temp_dir.path().join("export"))
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .collect();
        assert_eq!(files.len(), 1);

        let json = fs::read_to_string(&report_path).unwrap();
        let parsed: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.photos_transferred, 1);
        assert!(parsed.completed);
        assert!(parsed.aborted_by.is_none());
        assert!(!report.to_string().contains("ABORTED"));
    }

    #[test]
    fn test_simulate_abort_writes_partial_report() {
        let temp_dir = TempDir::new().unwrap();
        let report_path = temp_dir.path().join("report.json");

        let result = simulate_export(
            "beach_day",
            temp_dir.path(),
            MissingVariantPolicy::Abort,
            Some(&report_path),
        );
        assert!(result.is_err());

        let json = fs::read_to_string(&report_path).unwrap();
        let parsed: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.albums_visited, 1);
        assert!(!parsed.completed);
        assert!(parsed.is_aborted());
        assert!(parsed.aborted_by.as_deref().unwrap().contains("p-missing"));
        assert!(parsed.to_string().starts_with("Export ABORTED:"));
    }

    #[test]
    fn test_unparsable_explicit_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let original = "[store\ndriver = ";
        fs::write(&path, original).unwrap();

        let err = load_config(Some(&path)).unwrap_err();

        assert!(err.to_string().contains("failed to load config file"));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_missing_explicit_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("new.toml");

        let config = load_config(Some(&path)).unwrap();

        assert!(config.needs_setup());
        assert!(!path.exists());
    }

    #[test]
    fn test_explicit_config_is_loaded() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let mut config = Config::default();
        config.logging.level = "debug".to_string();
        config.save(&path).unwrap();

        let loaded = load_config(Some(&path)).unwrap();

        assert_eq!(loaded.logging.level, "debug");
    }

    #[test]
    fn test_simulate_skip_counts_failure() {
        let temp_dir = TempDir::new().unwrap();

        let report = simulate_export(
            "beach_day",
            temp_dir.path(),
            MissingVariantPolicy::Skip,
            None,
        )
        .unwrap();

        assert_eq!(report.photos_transferred, 1);
        assert_eq!(report.photos_failed, 1);
    }

    #[test]
    fn test_simulate_unknown_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let result = simulate_export(
            "nope",
            temp_dir.path(),
            MissingVariantPolicy::Abort,
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_generate_config_file_at_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/config.toml");

        generate_config_file(Some(path.clone())).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.export.on_missing_variant, MissingVariantPolicy::Abort);
        assert_eq!(loaded.export.transfer_method, TransferMethod::Rsync);
    }

    #[test]
    fn test_check_requires_store_settings() {
        let config = Config::default();
        assert!(check_connection(&config).is_err());
    }

    #[test]
    fn test_check_sqlite_store() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("lychee.db");

        let mut config = Config::default();
        config.store.url = Some(format!("sqlite://{}?mode=rwc", db_path.display()));

        // An empty database has no albums table.
        assert!(check_connection(&config).is_err());
    }
}
