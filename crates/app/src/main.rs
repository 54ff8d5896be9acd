//! Movie quiz terminal app.

mod cli;
mod db_url;
mod terminal;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use services::{
    ChannelView, Clock, JsonFileMovieLoader, MovieLoader, QuizServices, StaticMovieLoader,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never interleave with the quiz on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = cli.settings().context("invalid quiz settings")?;
    let clock = Clock::default();

    let movies: Arc<dyn MovieLoader> = match &cli.catalog {
        Some(path) => Arc::new(JsonFileMovieLoader::new(path.clone())),
        None => Arc::new(StaticMovieLoader::demo()),
    };

    let services = if cli.in_memory {
        info!("keeping statistics in memory");
        QuizServices::in_memory(clock, settings, movies)
    } else {
        let db_url = db_url::normalize_sqlite_url(&cli.db_url);
        db_url::prepare_sqlite_file(&db_url)?;
        info!(%db_url, "opening statistics database");
        QuizServices::new_sqlite(&db_url, clock, settings, movies)
            .await
            .with_context(|| format!("opening {db_url}"))?
    };

    let (view, updates) = ChannelView::new();
    let runtime = services.spawn_quiz(Arc::new(view));
    let handle = runtime.handle();
    handle.start()?;

    terminal::run(handle, updates).await?;

    // Pending reveal timers or statistics writes still report back before this resolves.
    if let Err(err) = runtime.shutdown().await {
        warn!(error = %err, "quiz runtime did not stop cleanly");
    }
    Ok(())
}
