//! Adminboard - command-line admin dashboard
//!
//! Every command prints a JSON `CommandResult` on stdout; logs go to stderr.

mod commands;
mod state;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use adminboard_core::Config;
use commands::users::UserFields;
use commands::CommandResult;
use state::AppState;

#[derive(Parser)]
#[command(name = "adminboard")]
#[command(about = "Sign in to the identity service and manage its users")]
#[command(version)]
struct Cli {
    /// Base URL of the identity service (overrides ADMINBOARD_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Credential database path (overrides ADMINBOARD_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Request timeout in seconds (overrides ADMINBOARD_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        username: String,
        #[arg(long, env = "ADMINBOARD_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Exchange the refresh token for a new access token
    Refresh,
    /// Show the session phase
    Status,
    /// Greeting and total user count
    Summary,
    /// Browse and edit users
    #[command(subcommand)]
    Users(UsersCommand),
    /// Edit your own record
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Subcommand)]
enum UsersCommand {
    List {
        /// Zero-based page number
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = adminboard_core::PageRequest::DEFAULT_PER_PAGE)]
        per_page: u32,
    },
    Add {
        #[command(flatten)]
        fields: UserFields,
    },
    Update {
        id: u64,
        #[command(flatten)]
        fields: UserFields,
    },
    Delete {
        id: u64,
    },
}

#[derive(Subcommand)]
enum ProfileCommand {
    Update {
        #[command(flatten)]
        fields: UserFields,
    },
}

impl Cli {
    fn config(&self) -> adminboard_core::Result<Config> {
        let mut config = Config::from_env()?;

        if let Some(url) = &self.api_url {
            config.api_base_url = url.clone();
        }
        if let Some(db) = &self.db {
            config.database_path = db.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout_secs = secs;
        }

        config.validate()?;
        Ok(config)
    }
}

async fn bootstrap(cli: &Cli) -> adminboard_core::Result<AppState> {
    let state = AppState::new(cli.config()?)?;
    state.initialize().await?;
    Ok(state)
}

fn emit<T: serde::Serialize>(result: CommandResult<T>) -> anyhow::Result<bool> {
    result.emit()
}

async fn run(state: &AppState, command: Commands) -> anyhow::Result<bool> {
    match command {
        Commands::Login { username, password } => {
            let password = password.unwrap_or_default();
            emit(commands::sessions::login(state, &username, &password).await)
        }
        Commands::Logout => emit(commands::sessions::logout(state)),
        Commands::Whoami => emit(commands::sessions::whoami(state)),
        Commands::Refresh => emit(commands::sessions::refresh(state).await),
        Commands::Status => emit(commands::sessions::status(state)),
        Commands::Summary => emit(commands::users::summary(state).await),
        Commands::Users(UsersCommand::List { page, per_page }) => {
            emit(commands::users::list(state, page, per_page).await)
        }
        Commands::Users(UsersCommand::Add { fields }) => {
            emit(commands::users::add(state, fields).await)
        }
        Commands::Users(UsersCommand::Update { id, fields }) => {
            emit(commands::users::update(state, id, fields).await)
        }
        Commands::Users(UsersCommand::Delete { id }) => {
            emit(commands::users::delete(state, id).await)
        }
        Commands::Profile(ProfileCommand::Update { fields }) => {
            emit(commands::profile::update(state, fields).await)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    adminboard_core::init_logging();

    let cli = Cli::parse();

    let success = match bootstrap(&cli).await {
        Ok(state) => run(&state, cli.command).await?,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start");
            emit(CommandResult::<()>::err(e.to_string()))?
        }
    };

    if !success {
        std::process::exit(1);
    }

    Ok(())
}
