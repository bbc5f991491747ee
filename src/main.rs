use crate::config::Config;
use crate::db::{init_db, Database};
use crate::responses::{error_to_response, with_cors};
use crate::router::handle;
use crate::state::AppState;
use crate::store::{spawn_reloader, ShiftStore};
use astra::Server;
use std::sync::Arc;

mod assets;
mod config;
mod db;
mod domain;
mod errors;
mod filter;
mod geo;
mod logging;
mod ranking;
mod responses;
mod router;
mod service;
mod state;
mod store;

#[cfg(test)]
mod tests;

fn main() {
    logging::init_logging();

    let config = match Config::init() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };

    // A store that fails to open or load still lets the server start;
    // queries answer 503 until a reload succeeds.
    let db = Database::new(&config.database_path);
    if let Err(e) = init_db(&db) {
        tracing::error!(error = %e, "database initialization failed");
    }

    let store = Arc::new(ShiftStore::new(config.grid_cell_deg));
    if let Err(e) = store.reload(&db) {
        tracing::warn!(error = %e, "initial load failed; serving 503 until a reload succeeds");
    }

    if let Some(every) = config.reload_interval {
        if let Err(e) = spawn_reloader(Arc::clone(&store), db.clone(), every) {
            tracing::error!(error = %e, "could not start reload thread");
        }
    }

    let state = match AppState::build(&config, store) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!(error = %e, "invalid query settings");
            std::process::exit(2);
        }
    };

    tracing::info!(
        addr = %config.bind_addr,
        radius_m = config.catchment_radius_m,
        workers = config.max_workers,
        "starting server"
    );

    let server = Server::bind(&config.bind_addr).max_workers(config.max_workers);

    let result = server.serve(move |req, _info| {
        let resp = match handle(req, &state) {
            Ok(resp) => resp,
            Err(err) => error_to_response(err),
        };
        with_cors(resp)
    });

    if let Err(e) = result {
        tracing::error!(error = %e, "server ended with error");
        std::process::exit(1);
    }

    tracing::info!("server shut down cleanly");
}
