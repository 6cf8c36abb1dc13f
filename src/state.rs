use tokio::sync::mpsc;

use crate::config::Config;
use crate::lifecycle::coordinator::Coordinator;
use crate::notify::{EmailMessage, Mailer};
use crate::observability::metrics::Metrics;
use crate::store::OrderStore;

pub struct AppState {
    pub store: OrderStore,
    pub coordinator: Coordinator,
    pub metrics: Metrics,
    pub config: Config,
}

impl AppState {
    /// Wires store, mailer, metrics and coordinator together. The
    /// returned receiver is the mail worker's end of the queue.
    pub fn new(config: Config) -> (Self, mpsc::Receiver<EmailMessage>) {
        let metrics = Metrics::new();
        let store = OrderStore::new();
        let (mailer, mail_rx) = Mailer::new(config.mail_queue_size, metrics.clone());
        let coordinator = Coordinator::new(
            store.clone(),
            mailer,
            metrics.clone(),
            config.frontend_url.clone(),
            config.token_ttl_hours,
        );

        (
            Self {
                store,
                coordinator,
                metrics,
                config,
            },
            mail_rx,
        )
    }
}
