use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "oci-translator")]
#[command(about = "HTTP translation service backed by OCI Generative AI")]
#[command(version)]
pub struct Args {
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Log at debug level (ignored when RUST_LOG is set)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Flags that override environment and config file settings.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Config file path (default: ~/.config/oci-translator/config.toml)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<String>,

    /// .env file to load before reading the environment (default: ./.env)
    #[arg(long, global = true)]
    pub env_file: Option<String>,

    /// Model id, e.g. cohere.command-r-plus
    #[arg(short = 'm', long, global = true)]
    pub model: Option<String>,

    /// OCI Generative AI inference endpoint URL
    #[arg(short = 'e', long, global = true)]
    pub endpoint: Option<String>,

    /// Compartment OCID
    #[arg(long, global = true)]
    pub compartment: Option<String>,

    /// Profile in the OCI config file used for API-key signing
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Timeout for each model call, in seconds
    #[arg(short = 't', long, global = true)]
    pub timeout: Option<u64>,

    /// Address to listen on
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short = 'p', long, global = true)]
    pub port: Option<u16>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// List supported languages
    Languages,
    /// Show the resolved configuration
    Config,
}
