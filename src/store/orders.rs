use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use crate::models::order::{Order, OrderStatus};

use super::{OrderStore, StoreError};

impl OrderStore {
    /// Inserts a fully-formed order, enforcing order-number uniqueness.
    pub fn insert_order(&self, order: Order) -> Result<(), StoreError> {
        match self.inner.order_numbers.entry(order.order_number.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateOrderNumber),
            Entry::Vacant(slot) => {
                slot.insert(order.id);
                self.inner.orders.insert(order.id, order);
                Ok(())
            }
        }
    }

    pub fn get_order(&self, order_id: Uuid) -> Result<Order, StoreError> {
        self.inner
            .orders
            .get(&order_id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::OrderNotFound)
    }

    pub fn get_order_by_number(&self, order_number: &str) -> Result<Order, StoreError> {
        let order_id = self
            .inner
            .order_numbers
            .get(order_number)
            .map(|entry| *entry.value())
            .ok_or(StoreError::OrderNotFound)?;
        self.get_order(order_id)
    }

    /// All orders, optionally filtered by status, newest first.
    pub fn list_orders(&self, status: Option<OrderStatus>) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .inner
            .orders
            .iter()
            .filter(|entry| status.is_none_or(|wanted| entry.value().status == wanted))
            .map(|entry| entry.value().clone())
            .collect();

        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    /// Orders assigned to one dasher, newest first.
    pub fn orders_for_dasher(&self, dasher_id: Uuid) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .inner
            .orders
            .iter()
            .filter(|entry| entry.value().dasher_id == Some(dasher_id))
            .map(|entry| entry.value().clone())
            .collect();

        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    /// Compare-and-set on order status. The check and the write happen
    /// under the order's entry lock, so of any number of racing callers
    /// expecting the same prior status, exactly one observes `Ok`; the
    /// rest get `StaleStatus` and must not touch the order.
    pub fn conditional_update_status(
        &self,
        order_id: Uuid,
        expected: OrderStatus,
        new_status: OrderStatus,
        assignee: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<Order, StoreError> {
        let mut entry = self
            .inner
            .orders
            .get_mut(&order_id)
            .ok_or(StoreError::OrderNotFound)?;
        let order = entry.value_mut();

        if order.status != expected {
            return Err(StoreError::StaleStatus { expected });
        }

        order.status = new_status;
        order.updated_at = now;
        if let Some(dasher_id) = assignee {
            order.dasher_id = Some(dasher_id);
        }
        if expected == OrderStatus::Pending && new_status == OrderStatus::Confirmed {
            order.accepted_at = Some(now);
        }

        Ok(order.clone())
    }

    /// Status advance by the assigned dasher. Rejects callers who are not
    /// the assignee and any transition that does not move the delivery
    /// chain strictly forward.
    pub fn advance_status(
        &self,
        order_id: Uuid,
        dasher_id: Uuid,
        new_status: OrderStatus,
        now: DateTime<Utc>,
    ) -> Result<Order, StoreError> {
        let mut entry = self
            .inner
            .orders
            .get_mut(&order_id)
            .ok_or(StoreError::OrderNotFound)?;
        let order = entry.value_mut();

        if order.dasher_id != Some(dasher_id) {
            return Err(StoreError::NotAssignee);
        }
        if !order.status.can_advance_to(new_status) {
            return Err(StoreError::IllegalTransition {
                from: order.status,
                to: new_status,
            });
        }

        order.status = new_status;
        order.updated_at = now;
        if new_status == OrderStatus::Delivered {
            order.delivered_at = Some(now);
        }

        Ok(order.clone())
    }

    /// Expires every pending order created before `cutoff`. Candidates are
    /// collected first, then each is re-checked under its own entry lock,
    /// so an order claimed between the scan and the write is left alone.
    /// Returns the orders that actually expired.
    pub fn expire_pending_before(
        &self,
        cutoff: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Vec<Order> {
        let stale: Vec<Uuid> = self
            .inner
            .orders
            .iter()
            .filter(|entry| {
                let order = entry.value();
                order.status == OrderStatus::Pending && order.created_at < cutoff
            })
            .map(|entry| *entry.key())
            .collect();

        let mut expired = Vec::with_capacity(stale.len());
        for order_id in stale {
            if let Ok(order) = self.conditional_update_status(
                order_id,
                OrderStatus::Pending,
                OrderStatus::Expired,
                None,
                now,
            ) {
                expired.push(order);
            }
        }
        expired
    }
}
