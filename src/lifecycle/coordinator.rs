use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::idgen;
use crate::models::dasher::Dasher;
use crate::models::order::{Order, OrderItem, OrderStatus, OrderSummary};
use crate::models::token::AcceptanceToken;
use crate::notify::{templates, Mailer};
use crate::observability::metrics::Metrics;
use crate::store::{OrderStore, StoreError};

/// Attempts against a unique index before giving up on id generation.
const UNIQUE_RETRY_LIMIT: usize = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct NewOrderItem {
    pub name: String,
    pub category: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub price: f64,
    pub special_instructions: Option<String>,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub delivery_address: String,
    pub pickup_location: String,
    pub items: Vec<NewOrderItem>,
    pub special_instructions: Option<String>,
}

/// Outcome of a winning claim.
#[derive(Debug, Clone)]
pub struct ClaimedOrder {
    pub order: Order,
    pub dasher: Dasher,
}

/// What a dasher sees on the acceptance landing page before committing.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPreview {
    pub order: Order,
    pub dasher_email: String,
}

/// Drives every order through its lifecycle: intake, the claim race,
/// progress reporting and expiry. All mutation goes through the store's
/// conditional updates; emails are queued fire-and-forget.
pub struct Coordinator {
    store: OrderStore,
    mailer: Mailer,
    metrics: Metrics,
    frontend_url: String,
    token_ttl: Duration,
}

impl Coordinator {
    pub fn new(
        store: OrderStore,
        mailer: Mailer,
        metrics: Metrics,
        frontend_url: String,
        token_ttl_hours: i64,
    ) -> Self {
        Self {
            store,
            mailer,
            metrics,
            frontend_url,
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }

    /// Validates and records a new order, queues the customer's
    /// confirmation email, and offers the order to every active dasher.
    pub fn create_order(&self, request: NewOrder) -> Result<Order, AppError> {
        validate(&request)?;

        let now = Utc::now();
        let items: Vec<OrderItem> = request
            .items
            .iter()
            .map(|item| OrderItem {
                name: item.name.trim().to_string(),
                category: item.category.clone(),
                quantity: item.quantity,
                price: item.price,
                special_instructions: item.special_instructions.clone(),
            })
            .collect();
        let total_amount = items
            .iter()
            .map(|item| f64::from(item.quantity) * item.price)
            .sum();

        let mut order = Order {
            id: Uuid::new_v4(),
            order_number: idgen::order_number(now),
            customer_name: request.customer_name.trim().to_string(),
            customer_email: request.customer_email.trim().to_string(),
            customer_phone: request.customer_phone.trim().to_string(),
            delivery_address: request.delivery_address.trim().to_string(),
            pickup_location: request.pickup_location.trim().to_string(),
            items,
            total_amount,
            special_instructions: request.special_instructions,
            status: OrderStatus::Pending,
            dasher_id: None,
            created_at: now,
            updated_at: now,
            accepted_at: None,
            delivered_at: None,
        };

        let mut attempts = 0;
        loop {
            match self.store.insert_order(order.clone()) {
                Ok(()) => break,
                Err(StoreError::DuplicateOrderNumber) => {
                    attempts += 1;
                    if attempts >= UNIQUE_RETRY_LIMIT {
                        return Err(AppError::Dependency(
                            "could not allocate a unique order number".to_string(),
                        ));
                    }
                    order.order_number = idgen::order_number(Utc::now());
                }
                Err(err) => return Err(err.into()),
            }
        }

        self.metrics.orders_created_total.inc();
        info!(
            order_number = %order.order_number,
            total = order.total_amount,
            "order created"
        );

        self.mailer
            .send(templates::order_confirmation(&order, &self.frontend_url));
        self.offer_to_active_dashers(&order, now);

        Ok(order)
    }

    /// Claim addressed by acceptance token. The winning token is stamped
    /// used; a token that lost the race is left untouched.
    pub fn claim_with_token(&self, token: &str) -> Result<ClaimedOrder, AppError> {
        let now = Utc::now();
        let resolved = self.store.get_valid_token(token, now).and_then(|acceptance| {
            let dasher = self.store.get_dasher(acceptance.dasher_id)?;
            Ok((acceptance, dasher))
        });
        let (acceptance, dasher) = match resolved {
            Ok(pair) => pair,
            Err(err) => {
                self.metrics
                    .claims_total
                    .with_label_values(&["not_found"])
                    .inc();
                return Err(err.into());
            }
        };

        let claimed = self.claim(acceptance.order_id, &dasher, now)?;
        self.store.mark_token_used(token, now);
        Ok(claimed)
    }

    /// Claim addressed by dasher identity and order number.
    pub fn claim_for_dasher(
        &self,
        dasher_email: &str,
        order_number: &str,
    ) -> Result<ClaimedOrder, AppError> {
        let now = Utc::now();
        let resolved = self
            .store
            .dasher_by_email(dasher_email)
            .ok_or(StoreError::DasherNotFound)
            .and_then(|dasher| {
                let order = self.store.get_order_by_number(order_number)?;
                Ok((dasher, order))
            });
        let (dasher, order) = match resolved {
            Ok(pair) => pair,
            Err(err) => {
                self.metrics
                    .claims_total
                    .with_label_values(&["not_found"])
                    .inc();
                return Err(err.into());
            }
        };

        self.claim(order.id, &dasher, now)
    }

    fn claim(
        &self,
        order_id: Uuid,
        dasher: &Dasher,
        now: DateTime<Utc>,
    ) -> Result<ClaimedOrder, AppError> {
        match self.store.conditional_update_status(
            order_id,
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            Some(dasher.id),
            now,
        ) {
            Ok(order) => {
                self.metrics.claims_total.with_label_values(&["won"]).inc();
                info!(
                    order_number = %order.order_number,
                    dasher = %dasher.email,
                    "order claimed"
                );
                self.mailer
                    .send(templates::dasher_assigned(&order, dasher, &self.frontend_url));
                Ok(ClaimedOrder {
                    order,
                    dasher: dasher.clone(),
                })
            }
            Err(StoreError::StaleStatus { .. }) => {
                self.metrics
                    .claims_total
                    .with_label_values(&["already_accepted"])
                    .inc();
                Err(AppError::Conflict(
                    "order already accepted by another dasher".to_string(),
                ))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Progress report addressed by a token that already won its claim.
    pub fn update_status_with_token(
        &self,
        token: &str,
        new_status: &str,
    ) -> Result<Order, AppError> {
        let new_status = parse_reportable_status(new_status)?;
        let acceptance = self.store.get_used_token(token)?;
        let order = self.store.advance_status(
            acceptance.order_id,
            acceptance.dasher_id,
            new_status,
            Utc::now(),
        )?;

        self.after_status_update(&order);
        Ok(order)
    }

    /// Progress report addressed by dasher identity and order number.
    pub fn update_status_for_dasher(
        &self,
        dasher_email: &str,
        order_number: &str,
        new_status: &str,
    ) -> Result<Order, AppError> {
        let new_status = parse_reportable_status(new_status)?;
        let dasher = self
            .store
            .dasher_by_email(dasher_email)
            .ok_or(StoreError::DasherNotFound)?;
        let order = self.store.get_order_by_number(order_number)?;
        let order = self
            .store
            .advance_status(order.id, dasher.id, new_status, Utc::now())?;

        self.after_status_update(&order);
        Ok(order)
    }

    fn after_status_update(&self, order: &Order) {
        self.metrics
            .status_updates_total
            .with_label_values(&[order.status.as_str()])
            .inc();
        info!(
            order_number = %order.order_number,
            status = %order.status,
            "order status updated"
        );
        self.mailer
            .send(templates::status_update(order, &self.frontend_url));
    }

    /// Resolves a valid token to the order it offers, for the acceptance
    /// landing page.
    pub fn verify_token(&self, token: &str) -> Result<TokenPreview, AppError> {
        let acceptance = self.store.get_valid_token(token, Utc::now())?;
        let order = self.store.get_order(acceptance.order_id)?;
        let dasher = self.store.get_dasher(acceptance.dasher_id)?;

        Ok(TokenPreview {
            order,
            dasher_email: dasher.email,
        })
    }

    /// Orders ever assigned to the dasher, newest first. An unknown email
    /// simply has no orders.
    pub fn orders_for_dasher(&self, dasher_email: &str) -> Vec<OrderSummary> {
        let Some(dasher) = self.store.dasher_by_email(dasher_email) else {
            return Vec::new();
        };

        self.store
            .orders_for_dasher(dasher.id)
            .iter()
            .map(OrderSummary::from)
            .collect()
    }

    /// Expires orders that sat unclaimed past the token TTL and tells
    /// their customers. Returns how many expired.
    pub fn expire_stale_orders(&self) -> usize {
        let now = Utc::now();
        let expired = self.store.expire_pending_before(now - self.token_ttl, now);

        for order in &expired {
            self.metrics.orders_expired_total.inc();
            info!(order_number = %order.order_number, "order expired unclaimed");
            self.mailer
                .send(templates::order_expired(order, &self.frontend_url));
        }
        expired.len()
    }

    fn offer_to_active_dashers(&self, order: &Order, now: DateTime<Utc>) {
        for dasher in self.store.active_dashers() {
            match self.issue_token(order.id, dasher.id, now) {
                Ok(acceptance) => {
                    self.mailer.send(templates::dasher_offer(
                        &dasher,
                        order,
                        &acceptance.token,
                        &self.frontend_url,
                    ));
                }
                Err(err) => {
                    warn!(
                        order_number = %order.order_number,
                        dasher = %dasher.email,
                        error = %err,
                        "failed to issue acceptance token"
                    );
                }
            }
        }
    }

    fn issue_token(
        &self,
        order_id: Uuid,
        dasher_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<AcceptanceToken, AppError> {
        let mut attempts = 0;
        loop {
            let acceptance = AcceptanceToken {
                token: idgen::acceptance_token(),
                order_id,
                dasher_id,
                created_at: now,
                expires_at: now + self.token_ttl,
                used_at: None,
            };
            match self.store.insert_token(acceptance.clone()) {
                Ok(()) => return Ok(acceptance),
                Err(StoreError::DuplicateToken) => {
                    attempts += 1;
                    if attempts >= UNIQUE_RETRY_LIMIT {
                        return Err(AppError::Dependency(
                            "could not allocate a unique acceptance token".to_string(),
                        ));
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

fn validate(request: &NewOrder) -> Result<(), AppError> {
    let required = [
        ("customer_name", &request.customer_name),
        ("customer_email", &request.customer_email),
        ("customer_phone", &request.customer_phone),
        ("delivery_address", &request.delivery_address),
        ("pickup_location", &request.pickup_location),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} is required")));
        }
    }

    if request.items.is_empty() {
        return Err(AppError::Validation(
            "order must contain at least one item".to_string(),
        ));
    }
    for item in &request.items {
        if item.name.trim().is_empty() {
            return Err(AppError::Validation("item name is required".to_string()));
        }
        if item.quantity == 0 {
            return Err(AppError::Validation(
                "item quantity must be at least 1".to_string(),
            ));
        }
        if !item.price.is_finite() || item.price < 0.0 {
            return Err(AppError::Validation(
                "item price must be a non-negative number".to_string(),
            ));
        }
    }

    Ok(())
}

fn parse_reportable_status(raw: &str) -> Result<OrderStatus, AppError> {
    let status = OrderStatus::parse(raw)
        .filter(OrderStatus::dasher_reportable)
        .ok_or_else(|| AppError::Validation(format!("invalid status: {raw}")))?;
    Ok(status)
}
