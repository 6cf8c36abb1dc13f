use crate::models::dasher::Dasher;
use crate::models::order::{Order, OrderStatus};

use super::EmailMessage;

/// Customer-facing one-liner for a status change.
pub fn status_message(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "Your order is waiting for a dasher",
        OrderStatus::Confirmed => "Your order has been confirmed by the dasher",
        OrderStatus::PickedUp => "Your order has been picked up and is on the way",
        OrderStatus::Delivered => "Your order has been delivered!",
        OrderStatus::Expired => "Your order expired before a dasher could accept it",
    }
}

fn order_link(frontend_url: &str, order_number: &str) -> String {
    format!("{frontend_url}/order/{order_number}")
}

/// Sent to the customer as soon as their order is recorded.
pub fn order_confirmation(order: &Order, frontend_url: &str) -> EmailMessage {
    let body = format!(
        r#"<html>
<body>
    <h2>Order Confirmation</h2>
    <p>Thank you for your order, {name}!</p>
    <p><strong>Order Number:</strong> {number}</p>
    <p><strong>Pickup Location:</strong> {pickup}</p>
    <p><strong>Delivery Address:</strong> {delivery}</p>
    <p><strong>Total:</strong> ${total:.2}</p>
    <p>You will receive an email when a dasher accepts your order.</p>
    <p>Track your order at: <a href="{link}">View Order Status</a></p>
</body>
</html>"#,
        name = order.customer_name,
        number = order.order_number,
        pickup = order.pickup_location,
        delivery = order.delivery_address,
        total = order.total_amount,
        link = order_link(frontend_url, &order.order_number),
    );

    EmailMessage {
        to: order.customer_email.clone(),
        subject: format!("Order Confirmation - {}", order.order_number),
        body,
    }
}

/// Sent to each active dasher when a new order arrives, carrying that
/// dasher's personal acceptance link.
pub fn dasher_offer(dasher: &Dasher, order: &Order, token: &str, frontend_url: &str) -> EmailMessage {
    let body = format!(
        r#"<html>
<body>
    <h2>New Delivery Available</h2>
    <p>Hi {dasher_name},</p>
    <p>A new delivery order is available:</p>
    <p><strong>Order Number:</strong> {number}</p>
    <p><strong>Pickup:</strong> {pickup}</p>
    <p><strong>Deliver to:</strong> {delivery}</p>
    <p><strong>Order Total:</strong> ${total:.2}</p>
    <p><a href="{frontend_url}/dasher/confirm/{token}" style="background-color: #10b981; color: white; padding: 12px 24px; text-decoration: none; border-radius: 6px; display: inline-block;">View &amp; Accept Order</a></p>
    <p style="color: #666; font-size: 12px;">This link expires in 24 hours</p>
</body>
</html>"#,
        dasher_name = dasher.name,
        number = order.order_number,
        pickup = order.pickup_location,
        delivery = order.delivery_address,
        total = order.total_amount,
    );

    EmailMessage {
        to: dasher.email.clone(),
        subject: format!("New Delivery - {}", order.order_number),
        body,
    }
}

/// Sent to the customer when a dasher wins the claim.
pub fn dasher_assigned(order: &Order, dasher: &Dasher, frontend_url: &str) -> EmailMessage {
    let body = format!(
        r#"<html>
<body>
    <h2>Dasher Assigned!</h2>
    <p>Hi {name},</p>
    <p>Great news! Your order {number} has been accepted by a dasher.</p>
    <p><strong>Dasher:</strong> {dasher_name}</p>
    <p><strong>Dasher Phone:</strong> {dasher_phone}</p>
    <p>Your order will be picked up from {pickup} and delivered to {delivery}.</p>
    <p>Track your order: <a href="{link}">View Order Status</a></p>
</body>
</html>"#,
        name = order.customer_name,
        number = order.order_number,
        dasher_name = dasher.name,
        dasher_phone = dasher.phone.as_deref().unwrap_or("not provided"),
        pickup = order.pickup_location,
        delivery = order.delivery_address,
        link = order_link(frontend_url, &order.order_number),
    );

    EmailMessage {
        to: order.customer_email.clone(),
        subject: format!("Dasher Assigned - {}", order.order_number),
        body,
    }
}

/// Sent to the customer after the dasher reports progress.
pub fn status_update(order: &Order, frontend_url: &str) -> EmailMessage {
    let body = format!(
        r#"<html>
<body>
    <h2>Order Update</h2>
    <p>Hi {name},</p>
    <p><strong>Order:</strong> {number}</p>
    <p><strong>Status:</strong> {message}</p>
    <p>Track your order: <a href="{link}">View Order Status</a></p>
</body>
</html>"#,
        name = order.customer_name,
        number = order.order_number,
        message = status_message(order.status),
        link = order_link(frontend_url, &order.order_number),
    );

    EmailMessage {
        to: order.customer_email.clone(),
        subject: format!("Order Update - {}", order.order_number),
        body,
    }
}

/// Sent to the customer when no dasher claimed their order in time.
pub fn order_expired(order: &Order, frontend_url: &str) -> EmailMessage {
    let body = format!(
        r#"<html>
<body>
    <h2>Order Expired</h2>
    <p>Hi {name},</p>
    <p>We're sorry - no dasher was able to accept your order {number} in time, so it has been cancelled.</p>
    <p>You have not been charged. Feel free to place a new order at: <a href="{link}">Order Status</a></p>
</body>
</html>"#,
        name = order.customer_name,
        number = order.order_number,
        link = order_link(frontend_url, &order.order_number),
    );

    EmailMessage {
        to: order.customer_email.clone(),
        subject: format!("Order Expired - {}", order.order_number),
        body,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::models::dasher::Dasher;
    use crate::models::order::{Order, OrderItem, OrderStatus};

    use super::*;

    fn sample_order() -> Order {
        let now = Utc::now();
        Order {
            id: Uuid::new_v4(),
            order_number: "ORD-20250314092653-K7Q2".to_string(),
            customer_name: "Jordan Blake".to_string(),
            customer_email: "jordan@example.edu".to_string(),
            customer_phone: "413-555-0101".to_string(),
            delivery_address: "Kennedy Hall Room 412".to_string(),
            pickup_location: "worcester".to_string(),
            items: vec![OrderItem {
                name: "Buffalo Chicken Wrap".to_string(),
                category: Some("Entrees".to_string()),
                quantity: 1,
                price: 13.5,
                special_instructions: None,
            }],
            total_amount: 13.5,
            special_instructions: None,
            status: OrderStatus::PickedUp,
            dasher_id: None,
            created_at: now,
            updated_at: now,
            accepted_at: None,
            delivered_at: None,
        }
    }

    fn sample_dasher(phone: Option<&str>) -> Dasher {
        Dasher {
            id: Uuid::new_v4(),
            name: "Avery Chen".to_string(),
            email: "avery@example.edu".to_string(),
            phone: phone.map(str::to_string),
            active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn status_messages_match_customer_copy() {
        assert_eq!(
            status_message(OrderStatus::Confirmed),
            "Your order has been confirmed by the dasher"
        );
        assert_eq!(
            status_message(OrderStatus::PickedUp),
            "Your order has been picked up and is on the way"
        );
        assert_eq!(
            status_message(OrderStatus::Delivered),
            "Your order has been delivered!"
        );
    }

    #[test]
    fn confirmation_formats_total_and_tracking_link() {
        let email = order_confirmation(&sample_order(), "http://localhost:5173");

        assert_eq!(email.to, "jordan@example.edu");
        assert_eq!(email.subject, "Order Confirmation - ORD-20250314092653-K7Q2");
        assert!(email.body.contains("$13.50"));
        assert!(email
            .body
            .contains("http://localhost:5173/order/ORD-20250314092653-K7Q2"));
    }

    #[test]
    fn offer_embeds_the_dashers_personal_link() {
        let dasher = sample_dasher(Some("413-555-0199"));
        let email = dasher_offer(&dasher, &sample_order(), "tok-abc", "http://localhost:5173");

        assert_eq!(email.to, "avery@example.edu");
        assert_eq!(email.subject, "New Delivery - ORD-20250314092653-K7Q2");
        assert!(email.body.contains("http://localhost:5173/dasher/confirm/tok-abc"));
    }

    #[test]
    fn assigned_copes_with_missing_phone() {
        let email = dasher_assigned(&sample_order(), &sample_dasher(None), "http://localhost:5173");
        assert!(email.body.contains("<strong>Dasher Phone:</strong> not provided"));
    }

    #[test]
    fn update_uses_the_orders_current_status() {
        let email = status_update(&sample_order(), "http://localhost:5173");
        assert_eq!(email.subject, "Order Update - ORD-20250314092653-K7Q2");
        assert!(email
            .body
            .contains("Your order has been picked up and is on the way"));
    }
}
