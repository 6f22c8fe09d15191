#![warn(clippy::all)]

use anyhow::{Context, Result};
use recipes::{
    api::{self, AppState},
    config::Config,
    database::open_repository,
    logging::init_tracing,
    service::recipe_service::RecipeService,
};
use tokio::runtime::Runtime;
use tracing::{info, trace_span};

fn main() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    init_tracing(&config.log_level).context("Unable to set global subscriber")?;

    let span = trace_span!("starting main");
    let _guard = span.enter();

    let repository = open_repository(&config.storage).context("Failed to open recipe storage")?;
    let state = AppState::new(RecipeService::new(repository));

    let rt = Runtime::new().context("Unable to create Runtime")?;

    info!("Starting server...");
    rt.block_on(api::serve(config.bind_address, state))
        .context("Server failed")
}
