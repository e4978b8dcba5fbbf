mod config;
mod db;
mod error;
mod logging;
mod models;
mod run;
mod store;
mod summary;
mod tracker;
mod transfer;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::db::SqliteBlobStore;
use crate::store::RecordStore;
use crate::tracker::{RandomIds, Tracker};

fn main() -> Result<()> {
    logging::init_tracing();

    let config = Config::from_args(std::env::args().collect())?;
    let db_path = config.resolve_db_path()?;
    let blobs = SqliteBlobStore::open(&db_path)
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;
    let store = RecordStore::load(Box::new(blobs))?;
    let mut tracker = Tracker::new(store, Box::new(RandomIds), config.month_or_current());

    run::as_cli(&config.args, &mut tracker)
}
