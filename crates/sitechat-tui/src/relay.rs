//! Background dispatch of Dialogue Service requests.
//!
//! Requests run as tokio tasks; their results come back over a channel so the
//! event loop is the only place widget state is mutated.

use std::sync::Arc;

use sitechat_engine::{Completed, DialogueService, PendingRequest};
use tokio::sync::mpsc;
use tracing::debug;

/// Spawns relay requests and collects their results.
pub struct RelayTasks {
    service: Arc<dyn DialogueService>,
    tx: mpsc::UnboundedSender<Completed>,
    rx: mpsc::UnboundedReceiver<Completed>,
}

impl RelayTasks {
    /// Create a relay over `service`.
    pub fn new(service: Arc<dyn DialogueService>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { service, tx, rx }
    }

    /// Send `pending` in the background.
    pub fn spawn(&self, pending: PendingRequest) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        debug!(seq = pending.seq, "dispatching request");
        tokio::spawn(async move {
            let completed = pending.dispatch(service.as_ref()).await;
            // Receiver gone means the UI has shut down.
            let _ = tx.send(completed);
        });
    }

    /// Wait for the next finished request.
    pub async fn next(&mut self) -> Option<Completed> {
        self.rx.recv().await
    }
}
