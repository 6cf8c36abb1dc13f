pub mod templates;
pub mod worker;

use tokio::sync::mpsc;
use tracing::warn;

use crate::observability::metrics::Metrics;

/// A rendered email waiting for delivery.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Sending half of the mail queue. Enqueueing never blocks and never
/// fails the caller; when the queue is full the message is dropped with
/// a warning.
#[derive(Clone)]
pub struct Mailer {
    tx: mpsc::Sender<EmailMessage>,
    metrics: Metrics,
}

impl Mailer {
    pub fn new(queue_size: usize, metrics: Metrics) -> (Self, mpsc::Receiver<EmailMessage>) {
        let (tx, rx) = mpsc::channel(queue_size);
        (Self { tx, metrics }, rx)
    }

    pub fn send(&self, message: EmailMessage) {
        match self.tx.try_send(message) {
            Ok(()) => self.metrics.emails_in_queue.inc(),
            Err(mpsc::error::TrySendError::Full(dropped)) => {
                warn!(
                    to = %dropped.to,
                    subject = %dropped.subject,
                    "mail queue full; dropping email"
                );
            }
            Err(mpsc::error::TrySendError::Closed(dropped)) => {
                warn!(
                    to = %dropped.to,
                    subject = %dropped.subject,
                    "mail worker gone; dropping email"
                );
            }
        }
    }
}
