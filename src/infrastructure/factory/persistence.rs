//! Persistence factory for the planner journal.

use std::sync::Arc;

use tracing::debug;

use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations};
use crate::adapter::outbound::sqlite::SqliteJournal;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::journal::PlannerJournal;

/// Open the SQLite database, apply migrations and return a journal over it.
pub fn build_journal(config: &Config) -> Result<Arc<dyn PlannerJournal>> {
    let db_url = format!("sqlite://{}", config.database);
    let db_pool = create_pool(&db_url)?;
    run_migrations(&db_pool)?;
    debug!(database = %config.database, "Journal ready");
    Ok(Arc::new(SqliteJournal::new(db_pool)))
}
