//! CLI Adapter.

mod generate;
mod serve;
mod url;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::app::config::{DEFAULT_CONFIG_DIR, SettingsOverrides};
use crate::domain::AppError;

#[derive(Parser)]
#[command(name = "ansible-config-manager")]
#[command(version)]
#[command(about = "Serve host config files over HTTP", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Config dir path
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_DIR)]
    config_dir: PathBuf,

    /// Host to listen on [default: 0.0.0.0]
    #[arg(long, global = true)]
    host: Option<String>,

    /// Port to listen on [default: 80]
    #[arg(long, global = true)]
    port: Option<u16>,

    /// SSL certificate path
    #[arg(long, global = true)]
    ssl_cert: Option<PathBuf>,

    /// SSL certificate key path
    #[arg(long, global = true)]
    ssl_key: Option<PathBuf>,

    /// Dir where generated configs are stored [default: /var/lib/ansible-config-manager/]
    #[arg(long, global = true)]
    generated_config_dir: Option<PathBuf>,

    /// Prefix to use for generating URLs
    #[arg(long, global = true)]
    url_prefix: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

impl GlobalArgs {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            host: self.host.clone(),
            port: self.port,
            ssl_cert: self.ssl_cert.clone(),
            ssl_key: self.ssl_key.clone(),
            generated_config_dir: self.generated_config_dir.clone(),
            url_prefix: self.url_prefix.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve host config files over HTTP (default)
    Serve,
    /// Generate config archives for all or the given hosts
    Generate {
        /// Hosts to generate; all hosts when omitted
        hosts: Vec<String>,
    },
    /// Generate URLs for initializing hosts or downloading configs
    #[command(visible_alias = "urls")]
    Url {
        /// Hosts to list; all hosts when omitted
        hosts: Vec<String>,
    },
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    init_logging(&cli.global);

    let overrides = cli.global.overrides();
    let config_dir = cli.global.config_dir.as_path();

    let result: Result<(), AppError> = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_serve(config_dir, &overrides),
        Commands::Generate { hosts } => generate::run_generate(config_dir, &overrides, &hosts),
        Commands::Url { hosts } => url::run_url(config_dir, &overrides, &hosts),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(args: &GlobalArgs) {
    let default_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(args.debug)
        .with_writer(std::io::stderr)
        .try_init();
}
