use std::time::{Duration, Instant};

use reqwest::Client;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::notify::EmailMessage;
use crate::observability::metrics::Metrics;

/// Drains the mail queue one message at a time. With a relay URL
/// configured each message is POSTed as JSON; without one, delivery is a
/// structured log line so local development works offline.
pub async fn run_mailer(
    config: Config,
    metrics: Metrics,
    mut mail_rx: mpsc::Receiver<EmailMessage>,
) {
    info!("mail worker started");

    let client = match Client::builder()
        .timeout(Duration::from_secs(config.mail_timeout_secs))
        .build()
    {
        Ok(client) => client,
        Err(err) => {
            error!(error = %err, "failed to build mail http client");
            return;
        }
    };

    while let Some(message) = mail_rx.recv().await {
        metrics.emails_in_queue.dec();

        let start = Instant::now();
        let outcome = deliver(&client, &config, &message).await;
        let elapsed = start.elapsed().as_secs_f64();

        match outcome {
            Ok(label) => {
                metrics
                    .email_delivery_seconds
                    .with_label_values(&[label])
                    .observe(elapsed);
            }
            Err(err) => {
                metrics
                    .email_delivery_seconds
                    .with_label_values(&["failed"])
                    .observe(elapsed);
                warn!(
                    to = %message.to,
                    subject = %message.subject,
                    error = %err,
                    "email delivery failed"
                );
            }
        }
    }

    warn!("mail worker stopped: queue channel closed");
}

async fn deliver(
    client: &Client,
    config: &Config,
    message: &EmailMessage,
) -> Result<&'static str, reqwest::Error> {
    let Some(mail_api_url) = &config.mail_api_url else {
        info!(
            to = %message.to,
            subject = %message.subject,
            "mail relay not configured; logging email instead"
        );
        return Ok("skipped");
    };

    let response = client
        .post(mail_api_url)
        .json(&json!({
            "from": config.mail_from,
            "to": message.to,
            "subject": message.subject,
            "html": message.body,
        }))
        .send()
        .await?;
    response.error_for_status_ref()?;

    info!(to = %message.to, subject = %message.subject, "email sent");
    Ok("sent")
}
