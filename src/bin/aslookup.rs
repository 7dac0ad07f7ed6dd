use aslookup::lens::utils::OutputFormat;
use aslookup::AslookupConfig;
use clap::{Parser, Subcommand};
use tracing::{info, Level};

mod commands;

use commands::asn::AsArgs;
use commands::config::ConfigArgs;
use commands::ip::IpArgs;
use commands::lookup::LookupArgs;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.aslookup/aslookup.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    /// Output format: table, json, json-pretty, text
    #[clap(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up an IP address or AS number, detecting which one it is.
    Lookup(LookupArgs),

    /// Look up the announcing AS, covering prefix and location of an IP address.
    Ip(IpArgs),

    /// Look up the owner and announced prefixes of an AS number (e.g. AS13335).
    As(AsArgs),

    /// Show the effective configuration.
    Config(ConfigArgs),
}

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = match AslookupConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: unable to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!("using endpoint {}", config.endpoint);

    match cli.command {
        Commands::Lookup(args) => commands::lookup::run(&config, args, cli.format),
        Commands::Ip(args) => commands::ip::run(&config, args, cli.format),
        Commands::As(args) => commands::asn::run(&config, args, cli.format),
        Commands::Config(args) => commands::config::run(&config, args, cli.format),
    }
}
