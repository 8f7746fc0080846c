use clap::{Parser, Subcommand};
use server::{AppResult, AppState, Config, MovieType};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(
    name = "filmdeck",
    version,
    about = "Keep a local catalog of Douban's curated movie lists"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sync curated lists once (every list when no type is given)
    Sync { movie_type: Option<MovieType> },
    /// Sync on a timer until interrupted
    Serve,
    /// Print stored films as JSON
    List { movie_type: Option<MovieType> },
    /// Print films by Douban ID, fetching any that are missing
    Get {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    tracing::info!(
        "filmdeck {} ({:?}) using {}",
        env!("CARGO_PKG_VERSION"),
        config.env,
        config.data_path.display()
    );

    let state = server::bootstrap(config).await?;
    run(cli.command, state).await?;

    Ok(())
}

async fn run(command: Command, state: AppState) -> AppResult<()> {
    match command {
        Command::Sync {
            movie_type: Some(movie_type),
        } => {
            state.movies.sync(movie_type).await?;
        }
        Command::Sync { movie_type: None } => {
            state.movies.sync_curated().await?;
        }
        Command::Serve => {
            let scheduler = state.scheduler();
            let handles = scheduler.start();
            tracing::info!("Scheduler started with {} jobs", scheduler.job_count());

            tokio::signal::ctrl_c().await?;
            tracing::info!("Shutting down");
            for handle in handles {
                handle.abort();
            }
        }
        Command::List { movie_type } => {
            let films = match movie_type {
                Some(movie_type) => state.movies.get_by_type(movie_type).await?,
                None => state.movies.get_all().await?,
            };
            println!("{}", serde_json::to_string_pretty(&films)?);
        }
        Command::Get { ids } => {
            let ids: Vec<Option<i64>> = ids.into_iter().map(Some).collect();
            let films = state.movies.get_by_ids(&ids).await?;
            println!("{}", serde_json::to_string_pretty(&films)?);
        }
    }

    Ok(())
}
