use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, instrument};

use courier_core::{BatchReport, BatchSummary, OutboundMessage};

use crate::dispatcher::RetryingDispatcher;

/// Default number of in-flight sends within one chunk.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Cooperative pause between chunks, applied when a batch spans more than
/// one chunk.
pub const INTER_CHUNK_DELAY: Duration = Duration::from_millis(100);

/// Plan the chunk sizes for a batch: full chunks of `concurrency` followed
/// by one remainder chunk.
pub(crate) fn chunk_sizes(total: usize, concurrency: usize) -> Vec<usize> {
    let concurrency = concurrency.max(1);
    let mut sizes = vec![concurrency; total / concurrency];
    if total % concurrency > 0 {
        sizes.push(total % concurrency);
    }
    sizes
}

/// Fan a list of messages out as sequential chunks of concurrent sends.
///
/// Members of a chunk are dispatched concurrently (at most `concurrency`
/// in flight); chunks run one after another with [`INTER_CHUNK_DELAY`]
/// between them. This caps instantaneous concurrency and spreads a large
/// batch over time instead of bursting straight into the rate ceilings,
/// trading total batch latency for smoother sending.
#[instrument(skip(dispatcher, messages), fields(total = messages.len(), concurrency))]
pub async fn dispatch_batch(
    dispatcher: &RetryingDispatcher,
    mut messages: Vec<OutboundMessage>,
    concurrency: usize,
    inter_chunk_delay: Duration,
) -> BatchReport {
    let total = messages.len();
    let plan = chunk_sizes(total, concurrency);
    let chunks = plan.len();
    let mut outcomes = Vec::with_capacity(total);

    for (index, size) in plan.into_iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(inter_chunk_delay).await;
        }
        debug!(chunk = index + 1, chunks, size, "dispatching chunk");

        let sends: Vec<_> = messages
            .drain(..size)
            .map(|message| dispatcher.send(message))
            .collect();
        outcomes.extend(join_all(sends).await);
    }

    let summary = BatchSummary::from_outcomes(&outcomes);
    debug!(
        successful = summary.successful,
        failed = summary.failed,
        "batch complete"
    );
    BatchReport { outcomes, summary }
}
