use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[cfg(test)]
mod testutil;

#[derive(Parser, Debug)]
#[command(name = "tollgate", version, about = "Tollgate CLI")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mint a signed access token for a resource path.
    Mint {
        /// Membership tier whose key signs the token
        #[arg(long)]
        tier: String,

        /// Resource path under the configured domain, e.g. /videos/1
        #[arg(long)]
        path: String,

        /// Token lifetime in seconds (defaults to the configured TTL)
        #[arg(long)]
        ttl: Option<u64>,

        /// Restrict the token to a single source IP
        #[arg(long)]
        ip: Option<String>,

        /// Path to the configuration file
        #[arg(long, default_value = "tollgate.yaml")]
        config: PathBuf,

        /// Print Set-Cookie-shaped lines instead of JSON
        #[arg(long, default_value_t = false)]
        cookies: bool,

        /// Write the JSON token to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Decode an encoded policy and show its contents.
    Inspect {
        /// The encoded policy component of a token
        encoded_policy: String,
    },

    /// Validate the configuration and probe every tier's key material.
    Check {
        /// Path to the configuration file
        #[arg(long, default_value = "tollgate.yaml")]
        config: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Mint {
            tier,
            path,
            ttl,
            ip,
            config,
            cookies,
            output,
        } => commands::mint::run(&config, &tier, &path, ttl, ip.as_deref(), cookies, output),

        Command::Inspect { encoded_policy } => commands::inspect::run(&encoded_policy),

        Command::Check { config } => commands::check::run(&config),
    }
}
