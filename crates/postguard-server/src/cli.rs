use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "postguard-server")]
#[command(about = "PostGuard content moderation service", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    pub config: String,

    /// Listen address
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Bearer token for the model service
    #[arg(long, env = "MODERATION_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
