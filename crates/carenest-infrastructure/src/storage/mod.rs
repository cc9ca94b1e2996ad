//! Storage primitives shared by the file-backed repositories.

mod atomic_json;

pub use atomic_json::AtomicJsonFile;

use carenest_core::{CareNestError, Result};

/// Runs blocking file work off the async executor.
pub(crate) async fn run_blocking<R, F>(f: F) -> Result<R>
where
    F: FnOnce() -> Result<R> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CareNestError::internal(format!("storage task failed: {}", e)))?
}
