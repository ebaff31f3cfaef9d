use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dealership::{
    application::user_service::ManagerAccount, build_router, config::AppConfig,
    infrastructure::InMemoryStore, seed::seed_catalog, state::AppState,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dealership")]
#[command(about = "Dealership catalog and sales back office", version)]
struct Cli {
    /// Overrides DEALERSHIP_BIND_ADDR.
    #[arg(long, global = true)]
    bind: Option<SocketAddr>,
    /// Overrides DEALERSHIP_DATA_FILE.
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API (default).
    Serve,
    /// Add a manager account to the data file.
    CreateManager {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        cpf: String,
    },
    /// Add a sample vehicle catalog to the data file.
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env().context("failed to load application configuration")?;
    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }
    if let Some(data_file) = cli.data_file {
        config.data_file = Some(data_file);
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::CreateManager {
            name,
            email,
            password,
            cpf,
        } => {
            let state = offline_state(&config)?;
            let created = state
                .user_service
                .ensure_manager(ManagerAccount {
                    name,
                    email: email.clone(),
                    password,
                    cpf,
                })
                .await
                .context("failed to create manager")?;
            if created {
                info!(%email, "manager created");
            } else {
                info!(%email, "manager already exists");
            }
            Ok(())
        }
        Command::Seed => {
            let state = offline_state(&config)?;
            let added = seed_catalog(&state.vehicle_service)
                .await
                .context("failed to seed catalog")?;
            info!(added, "seed finished");
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    let store = Arc::new(open_store(&config)?);
    let state = AppState::new(&config, store).context("failed to build application state")?;

    if let Some(manager) = config.manager.clone() {
        let email = manager.email.clone();
        if state
            .user_service
            .ensure_manager(manager)
            .await
            .context("failed to bootstrap manager account")?
        {
            info!(%email, "bootstrap manager created");
        }
    }

    let app = build_router(state, config.cors_origin.clone());

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(address = %config.bind_addr, "dealership api started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("dealership api stopped");
    Ok(())
}

/// State for one-shot commands, which only make sense against a data file.
fn offline_state(config: &AppConfig) -> Result<AppState> {
    if config.data_file.is_none() {
        bail!("this command needs --data-file or DEALERSHIP_DATA_FILE");
    }
    let store = Arc::new(open_store(config)?);
    AppState::new(config, store).context("failed to build application state")
}

fn open_store(config: &AppConfig) -> Result<InMemoryStore> {
    let Some(path) = config.data_file.as_deref() else {
        info!("no data file configured, data lives in memory only");
        return Ok(InMemoryStore::new());
    };

    InMemoryStore::open(path)
        .with_context(|| format!("failed to open data file '{}'", path.display()))
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dealership=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
