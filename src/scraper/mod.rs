pub mod nutrislice;

use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use reqwest::Client;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::models::menu::MenuOption;
use crate::observability::metrics::Metrics;
use crate::scraper::nutrislice::WeekMenu;
use crate::store::OrderStore;

const FETCH_TIMEOUT_SECS: u64 = 30;

/// Refreshes the catalog for every configured hall and meal period. Each
/// hall is replaced wholesale from its fresh rows; a hall whose fetches
/// all failed keeps its previous rows.
pub async fn run_scrape(store: OrderStore, metrics: Metrics, config: Config) {
    info!("menu scrape started");

    let client = match Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
    {
        Ok(client) => client,
        Err(err) => {
            error!(error = %err, "failed to build scraper http client");
            return;
        }
    };

    let today = Utc::now().format("%Y-%m-%d").to_string();

    for hall_id in &config.dining_halls {
        let fetches = config
            .meal_types
            .iter()
            .map(|meal_type| fetch_hall_meal(&client, &config, hall_id, meal_type, &today));
        let results = join_all(fetches).await;

        let mut rows: Vec<MenuOption> = Vec::new();
        let mut failures = 0;
        for result in results {
            match result {
                Ok(mut fetched) => rows.append(&mut fetched),
                Err(err) => {
                    failures += 1;
                    warn!(hall = %hall_id, error = %err, "menu fetch failed");
                }
            }
        }

        if rows.is_empty() && failures > 0 {
            metrics.scrape_runs_total.with_label_values(&["error"]).inc();
            warn!(hall = %hall_id, "keeping previous menu rows for hall");
            continue;
        }

        let count = store.replace_hall_menu(hall_id, rows);
        metrics
            .scrape_runs_total
            .with_label_values(&["success"])
            .inc();
        info!(hall = %hall_id, rows = count, "hall menu refreshed");
    }

    let total = store.menu_count();
    metrics.menu_options.set(total as i64);
    info!(total, "menu scrape finished");
}

async fn fetch_hall_meal(
    client: &Client,
    config: &Config,
    hall_id: &str,
    meal_type: &str,
    date: &str,
) -> Result<Vec<MenuOption>, reqwest::Error> {
    let url = format!(
        "{base}/menu/api/weeks/school-{school}/menu-type-{meal_type}/{hall_id}/{date}/",
        base = config.nutrislice_base_url,
        school = config.nutrislice_school,
    );

    let week: WeekMenu = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(nutrislice::normalize(
        hall_id,
        &display_name(hall_id),
        meal_type,
        date,
        week,
    ))
}

fn display_name(hall_id: &str) -> String {
    let mut chars = hall_id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
