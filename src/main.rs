mod cli;

use piratarr::{
    arr::ArrSourceProvider,
    config, processor,
    scanner::ScanService,
    server::{self, AppContext},
    settings,
};
use piratarr_common::SystemClock;
use piratarr_db::pool::init_pool;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    // Load config, then environment, then CLI flags
    let mut config = config::load_config_or_default(config_path)?;
    config::apply_env_overrides(&mut config)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config::validate_config(&config)?;

    tracing::info!("Starting Piratarr");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    config::check_data_dir(&config.storage.data_dir)?;

    // Initialize database
    let db_path = config.storage.db_path();
    let db_path_str = db_path.to_string_lossy();
    tracing::info!("Initializing database at {}", db_path_str);
    let db_pool = init_pool(&db_path_str)
        .with_context(|| format!("Failed to open database at {}", db_path_str))?;

    {
        let conn = piratarr_db::pool::get_conn(&db_pool)?;

        // Jobs left mid-translation by a previous run go back to the queue
        match piratarr_db::queries::jobs::reset_orphaned_jobs(&conn) {
            Ok(count) if count > 0 => {
                tracing::info!("Reset {} orphaned translation jobs from previous session", count);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Failed to reset orphaned translation jobs: {}", e);
            }
        }

        settings::seed_from_env(&conn, |key| std::env::var(key).ok())?;
    }

    let scanner = Arc::new(ScanService::new(
        db_pool.clone(),
        Arc::new(ArrSourceProvider),
        Arc::new(SystemClock),
    ));
    if config.scanner.enabled {
        scanner.start(Duration::from_secs(config.scanner.startup_delay_secs));
    } else {
        tracing::info!("Background scanner disabled");
    }

    let ctx = AppContext::new(db_pool, scanner.clone());
    let server_result = server::start_server(&config.server, ctx).await;

    // Cleanup
    tracing::info!("Shutting down...");
    scanner.stop().await;

    server_result
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "piratarr=trace,piratarr_db=debug,piratarr_subtitle=debug,tower_http=debug".to_string()
        } else {
            "piratarr=info,piratarr_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Translate { input, output, seed } => {
            translate_file(&input, output.as_deref(), seed)
        }
        Commands::Preview { text, seed } => {
            println!("{}", piratarr_subtitle::translate(&text, seed));
            Ok(())
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("piratarr {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn translate_file(input: &Path, output: Option<&Path>, seed: Option<u64>) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {:?}", input);
    }

    tracing::info!("Translating {:?}", input);
    let done = processor::translate_subtitle_file(input, output, seed)?;

    println!("{}", done.output_path.display());
    tracing::info!("Wrote {} subtitle entries", done.entry_count);
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Database: {}", config.storage.db_path().display());
            println!("  Scanner enabled: {}", config.scanner.enabled);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Database: {}", config.storage.db_path().display());
        }
    }

    Ok(())
}
