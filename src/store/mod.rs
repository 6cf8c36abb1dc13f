pub mod dashers;
pub mod menu;
pub mod orders;
pub mod tokens;

use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::models::dasher::Dasher;
use crate::models::menu::MenuOption;
use crate::models::order::{Order, OrderStatus};
use crate::models::token::AcceptanceToken;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("order not found")]
    OrderNotFound,

    #[error("dasher not found")]
    DasherNotFound,

    #[error("token invalid")]
    TokenInvalid,

    #[error("order is no longer {expected}")]
    StaleStatus { expected: OrderStatus },

    #[error("order is assigned to a different dasher")]
    NotAssignee,

    #[error("cannot move order from {from} to {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    #[error("order number already exists")]
    DuplicateOrderNumber,

    #[error("dasher email already registered")]
    DuplicateDasherEmail,

    #[error("acceptance token already exists")]
    DuplicateToken,
}

/// In-memory home of all order, dasher, token and menu state. Clones are
/// cheap handles onto the same maps.
#[derive(Clone)]
pub struct OrderStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    orders: DashMap<Uuid, Order>,
    /// Unique index: order number -> order id.
    order_numbers: DashMap<String, Uuid>,
    dashers: DashMap<Uuid, Dasher>,
    /// Unique index: dasher email -> dasher id.
    dasher_emails: DashMap<String, Uuid>,
    /// Keyed by the token string itself.
    tokens: DashMap<String, AcceptanceToken>,
    menu: DashMap<Uuid, MenuOption>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                orders: DashMap::new(),
                order_numbers: DashMap::new(),
                dashers: DashMap::new(),
                dasher_emails: DashMap::new(),
                tokens: DashMap::new(),
                menu: DashMap::new(),
            }),
        }
    }

    pub fn order_count(&self) -> usize {
        self.inner.orders.len()
    }

    pub fn dasher_count(&self) -> usize {
        self.inner.dashers.len()
    }

    pub fn menu_count(&self) -> usize {
        self.inner.menu.len()
    }
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new()
    }
}
