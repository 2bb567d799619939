mod cli;
mod migrate;

use clap::{Parser, Subcommand};

/// recipehub - recipe management services
#[derive(Parser)]
#[command(name = "recipehub")]
#[command(about = "Gateway, auth and ingredient services for recipehub", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the public gateway
    Gateway {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Start the auth service
    Auth {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
    /// Start the ingredient service
    Ingredient {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Probe the message broker and print a JSON report
    QueueDiagnose,
    /// Activate or deactivate a user account
    User {
        email: String,

        #[arg(long, value_enum)]
        status: cli::user::Status,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = recipehub::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let service_name = match &cli.command {
        Commands::Gateway { .. } => "recipehub-gateway",
        Commands::Auth { .. } => "recipehub-auth",
        Commands::Ingredient { .. } => "recipehub-ingredient",
        _ => "recipehub",
    };

    recipehub::observability::init_observability(
        service_name,
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Gateway { host, port } => cli::server::gateway(config, host, port).await,
        Commands::Auth { host, port } => cli::server::auth(config, host, port).await,
        Commands::Ingredient { host, port } => cli::server::ingredient(config, host, port).await,
        Commands::Migrate => migrate::migrate(&config).await,
        Commands::Reset => migrate::reset(&config).await,
        Commands::QueueDiagnose => cli::queue::diagnose(config).await,
        Commands::User { email, status } => cli::user::set_status(config, email, status).await,
    }
}
