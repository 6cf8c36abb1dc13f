use prometheus::{
    Encoder, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub orders_created_total: IntCounter,
    pub claims_total: IntCounterVec,
    pub status_updates_total: IntCounterVec,
    pub orders_expired_total: IntCounter,
    pub emails_in_queue: IntGauge,
    pub email_delivery_seconds: HistogramVec,
    pub menu_options: IntGauge,
    pub scrape_runs_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let orders_created_total =
            IntCounter::new("orders_created_total", "Total orders accepted for delivery")
                .expect("valid orders_created_total metric");

        let claims_total = IntCounterVec::new(
            Opts::new("claims_total", "Total claim attempts by outcome"),
            &["outcome"],
        )
        .expect("valid claims_total metric");

        let status_updates_total = IntCounterVec::new(
            Opts::new("status_updates_total", "Total status updates by new status"),
            &["status"],
        )
        .expect("valid status_updates_total metric");

        let orders_expired_total =
            IntCounter::new("orders_expired_total", "Total orders expired unclaimed")
                .expect("valid orders_expired_total metric");

        let emails_in_queue = IntGauge::new("emails_in_queue", "Current number of queued emails")
            .expect("valid emails_in_queue metric");

        let email_delivery_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "email_delivery_seconds",
                "Latency of email delivery in seconds",
            ),
            &["outcome"],
        )
        .expect("valid email_delivery_seconds metric");

        let menu_options = IntGauge::new("menu_options", "Current number of catalog rows")
            .expect("valid menu_options metric");

        let scrape_runs_total = IntCounterVec::new(
            Opts::new("scrape_runs_total", "Total scraper runs per hall by outcome"),
            &["outcome"],
        )
        .expect("valid scrape_runs_total metric");

        registry
            .register(Box::new(orders_created_total.clone()))
            .expect("register orders_created_total");
        registry
            .register(Box::new(claims_total.clone()))
            .expect("register claims_total");
        registry
            .register(Box::new(status_updates_total.clone()))
            .expect("register status_updates_total");
        registry
            .register(Box::new(orders_expired_total.clone()))
            .expect("register orders_expired_total");
        registry
            .register(Box::new(emails_in_queue.clone()))
            .expect("register emails_in_queue");
        registry
            .register(Box::new(email_delivery_seconds.clone()))
            .expect("register email_delivery_seconds");
        registry
            .register(Box::new(menu_options.clone()))
            .expect("register menu_options");
        registry
            .register(Box::new(scrape_runs_total.clone()))
            .expect("register scrape_runs_total");

        Self {
            registry,
            orders_created_total,
            claims_total,
            status_updates_total,
            orders_expired_total,
            emails_in_queue,
            email_delivery_seconds,
            menu_options,
            scrape_runs_total,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
