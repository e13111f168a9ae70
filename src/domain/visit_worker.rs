//! Background worker that applies visit events to the link store.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

use crate::domain::repositories::LinkRepository;
use crate::domain::visit_event::VisitEvent;

/// Write attempts per event, the first included, before it is dropped.
pub const MAX_VISIT_ATTEMPTS: usize = 3;

/// Consumes visit events until every sender is dropped.
///
/// Each event is written with exponential backoff. Events for unknown codes
/// are ignored; events that still fail after retries are logged and dropped.
pub async fn run_visit_worker<L>(mut rx: mpsc::Receiver<VisitEvent>, repository: Arc<L>)
where
    L: LinkRepository + ?Sized + 'static,
{
    while let Some(event) = rx.recv().await {
        let strategy = ExponentialBackoff::from_millis(10)
            .map(jitter)
            .take(MAX_VISIT_ATTEMPTS - 1);

        let result = Retry::spawn(strategy, || {
            let repository = repository.clone();
            let code = event.short_code.clone();
            let at = event.visited_at;
            async move { repository.record_visit(&code, at).await }
        })
        .await;

        match result {
            Ok(true) => debug!(code = %event.short_code, "Visit recorded"),
            Ok(false) => debug!(code = %event.short_code, "Visit for unknown code ignored"),
            Err(e) => warn!(code = %event.short_code, "Dropping visit after retries: {}", e),
        }
    }

    debug!("Visit worker stopped");
}
