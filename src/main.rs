use anyhow::Result;
use clap::Parser;
use gifcam::config::DEFAULT_CONFIG_FILE;
use gifcam::{GifcamConfig, GifcamOrchestrator};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Parser, Debug)]
#[command(name = "gifcam")]
#[command(about = "Button-driven GIF camera for the Raspberry Pi")]
#[command(version)]
#[command(long_about = "Captures a burst of stills when the shutter button is pressed, \
assembles them into an animated GIF and uploads the GIF folder to Dropbox when the \
upload button is pressed and the network is reachable. Status is shown on four LEDs.")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, help = "Path to TOML configuration file (default: gifcam.toml)")]
    config: Option<String>,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit without starting the system")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in TOML format and exit")]
    print_config: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,

    /// Also log to the systemd journal
    #[arg(long, help = "Send logs to the systemd journal (needs the `journald` feature)")]
    journald: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print_default_config()?;
        return Ok(());
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
    let loaded = match &args.config {
        Some(path) => GifcamConfig::load_from_file(path),
        None => GifcamConfig::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration from {}: {}", config_path, e);
            return Err(e.into());
        }
    };

    let log_guard = init_logging(&args, &config)?;

    info!("Starting gifcam v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", config_path);

    if args.validate_config {
        match config.validate() {
            Ok(()) => {
                info!("Configuration validation successful");
                println!("✓ Configuration is valid");
                return Ok(());
            }
            Err(e) => {
                error!("Configuration validation failed: {}", e);
                eprintln!("✗ Configuration validation failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    let mut orchestrator = GifcamOrchestrator::new(config).await.map_err(|e| {
        error!("Failed to create orchestrator: {}", e);
        e
    })?;

    if let Err(e) = orchestrator.start().await {
        error!("Failed to start system: {}", e);
        orchestrator.shutdown().await?;
        return Err(e.into());
    }

    let exit_code = match orchestrator.run().await {
        Ok(code) => code,
        Err(e) => {
            error!("System error during execution: {}", e);
            orchestrator.shutdown().await?;
            1
        }
    };

    info!("Gifcam exited with code: {}", exit_code);

    // Flush the file writer before exiting
    drop(log_guard);
    std::process::exit(exit_code);
}

/// Console, rolling file and optionally journald. The returned guard must
/// live until exit so buffered file output is flushed.
fn init_logging(args: &Args, config: &GifcamConfig) -> Result<WorkerGuard> {
    use tracing_appender::rolling::{Builder, Rotation};
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    // The appliance logs at info by default; --verbose wins over --quiet
    let log_level = if args.debug {
        "debug"
    } else if args.quiet && !args.verbose {
        "error"
    } else {
        "info"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gifcam={}", log_level)));

    let console_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer()
                .with_target(true)
                .with_file(args.debug)
                .with_line_number(args.debug)
                .boxed()
        }
    };

    std::fs::create_dir_all(&config.logging.directory)?;
    let appender = Builder::new()
        .rotation(Rotation::DAILY)
        .filename_prefix(&config.logging.file_prefix)
        .max_log_files(config.logging.max_files)
        .build(&config.logging.directory)?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer)
        .boxed();

    let mut layers: Vec<BoxedLayer> = vec![console_layer, file_layer];
    if args.journald {
        if let Some(layer) = journald_layer() {
            layers.push(layer);
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .init();

    Ok(guard)
}

#[cfg(feature = "journald")]
fn journald_layer() -> Option<BoxedLayer> {
    match tracing_journald::layer() {
        Ok(layer) => Some(layer.with_syslog_identifier("gifcam".to_string()).boxed()),
        Err(e) => {
            eprintln!("Warning: journald unavailable: {}", e);
            None
        }
    }
}

#[cfg(not(feature = "journald"))]
fn journald_layer() -> Option<BoxedLayer> {
    eprintln!("Note: built without the `journald` feature; journal logging disabled");
    None
}

/// Print default configuration in TOML format
fn print_default_config() -> Result<()> {
    println!("# Gifcam Configuration File");
    println!("# This is the default configuration with all available options");
    println!();
    println!("{}", toml::to_string_pretty(&GifcamConfig::default())?);
    Ok(())
}
