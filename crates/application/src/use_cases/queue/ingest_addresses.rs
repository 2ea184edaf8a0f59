use crate::services::{decode_batch, WorkQueue};
use rdns_cache_domain::DomainError;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestOutcome {
    pub accepted: u64,
    pub rejected: u64,
}

/// Use case: append every address in a whitespace-separated payload to the
/// work queue, in payload order.
pub struct IngestAddressesUseCase {
    queue: Arc<WorkQueue>,
}

impl IngestAddressesUseCase {
    pub fn new(queue: Arc<WorkQueue>) -> Self {
        Self { queue }
    }

    pub async fn execute(&self, payload: &[u8]) -> Result<IngestOutcome, DomainError> {
        let decoded = decode_batch(payload)?;

        for token in &decoded.rejected {
            warn!(token = %token, "Ignoring token that is not an IP address");
        }

        let mut outcome = IngestOutcome {
            accepted: 0,
            rejected: decoded.rejected.len() as u64,
        };
        for ip in decoded.addresses {
            let id = self.queue.enqueue(ip).await?;
            debug!(ip = %ip, id, "Address enqueued");
            outcome.accepted += 1;
        }

        Ok(outcome)
    }
}
