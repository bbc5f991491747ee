use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::db::Database;

use super::ShiftStore;

/// Periodically rebuild the index from the database.
///
/// Errors are logged and the previous snapshot keeps serving.
pub fn spawn_reloader(
    store: Arc<ShiftStore>,
    db: Database,
    every: Duration,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("shift-reloader".into())
        .spawn(move || loop {
            thread::sleep(every);
            if let Err(e) = store.reload(&db) {
                tracing::warn!(error = %e, "periodic reload failed; keeping previous index");
            }
        })
}
