//! Order, coupon, and customer conversion functions.

use wicker_core::{CouponId, CurrencyCode, CustomerId, OrderId, ProductId, VariationId};

use crate::woo::WooError;
use crate::woo::rest::wire::{WireAddress, WireCoupon, WireCustomer, WireOrder, WireOrderLine};
use crate::woo::types::{Address, Coupon, Customer, Order, OrderLine};

use super::{parse_gmt, parse_order_status, parse_total};

/// Convert a wire address. Empty email/phone become `None`.
pub fn convert_address(address: WireAddress) -> Address {
    Address {
        first_name: address.first_name,
        last_name: address.last_name,
        company: address.company,
        address_1: address.address_1,
        address_2: address.address_2,
        city: address.city,
        state: address.state,
        postcode: address.postcode,
        country: address.country,
        email: address.email.filter(|e| !e.is_empty()),
        phone: address.phone.filter(|p| !p.is_empty()),
    }
}

fn convert_order_line(line: WireOrderLine, currency: CurrencyCode) -> Result<OrderLine, WooError> {
    Ok(OrderLine {
        id: line.id,
        product_id: ProductId::new(line.product_id),
        variation_id: (line.variation_id != 0).then(|| VariationId::new(line.variation_id)),
        name: line.name,
        sku: line.sku.unwrap_or_default(),
        quantity: line.quantity,
        subtotal: parse_total(&line.subtotal, currency)?,
        total: parse_total(&line.total, currency)?,
    })
}

/// Convert a wire order into the storefront shape.
///
/// The order's own currency field wins over the configured store currency
/// when it parses; multi-currency plugins rewrite it per order.
///
/// # Errors
///
/// Returns an error if a monetary field fails to parse.
pub fn convert_order(order: WireOrder, store_currency: CurrencyCode) -> Result<Order, WooError> {
    let currency = order
        .currency
        .parse::<CurrencyCode>()
        .unwrap_or(store_currency);

    Ok(Order {
        id: OrderId::new(order.id),
        number: order.number,
        order_key: order.order_key,
        status: parse_order_status(&order.status),
        customer_id: (order.customer_id != 0).then(|| CustomerId::new(order.customer_id)),
        date_created: parse_gmt(order.date_created_gmt.as_deref()),
        total: parse_total(&order.total, currency)?,
        total_tax: parse_total(&order.total_tax, currency)?,
        shipping_total: parse_total(&order.shipping_total, currency)?,
        discount_total: parse_total(&order.discount_total, currency)?,
        line_items: order
            .line_items
            .into_iter()
            .map(|line| convert_order_line(line, currency))
            .collect::<Result<_, _>>()?,
        billing: convert_address(order.billing),
        shipping: convert_address(order.shipping),
        payment_method: order.payment_method,
        payment_method_title: order.payment_method_title,
        customer_note: order.customer_note,
        payment_url: order.payment_url.filter(|u| !u.is_empty()),
    })
}

/// Convert a wire coupon.
pub fn convert_coupon(coupon: WireCoupon) -> Coupon {
    Coupon {
        id: CouponId::new(coupon.id),
        code: coupon.code,
        amount: coupon.amount,
        discount_type: coupon.discount_type,
        date_expires: parse_gmt(coupon.date_expires_gmt.as_deref()),
        usage_count: coupon.usage_count,
        usage_limit: coupon.usage_limit,
    }
}

/// Convert a wire customer.
pub fn convert_customer(customer: WireCustomer) -> Customer {
    Customer {
        id: CustomerId::new(customer.id),
        email: customer.email,
        first_name: customer.first_name,
        last_name: customer.last_name,
        username: customer.username,
        billing: convert_address(customer.billing),
        shipping: convert_address(customer.shipping),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wicker_core::OrderStatus;

    fn wire_order() -> WireOrder {
        serde_json::from_value(serde_json::json!({
            "id": 5001,
            "number": "5001",
            "order_key": "wc_order_a1b2c3",
            "status": "pending",
            "currency": "USD",
            "date_created_gmt": "2025-03-10T14:22:05",
            "total": "23.50",
            "total_tax": "1.50",
            "shipping_total": "4.00",
            "discount_total": "2.00",
            "line_items": [{
                "id": 1,
                "name": "Fig Jam",
                "product_id": 101,
                "variation_id": 0,
                "quantity": 2,
                "sku": "JAM-FIG",
                "subtotal": "18.00",
                "total": "16.00"
            }],
            "billing": {
                "first_name": "Ada",
                "last_name": "Byron",
                "address_1": "12 Analytical Way",
                "city": "London",
                "postcode": "N1 9GU",
                "country": "GB",
                "email": "ada@example.com",
                "phone": ""
            },
            "shipping": {},
            "payment_method": "stripe",
            "payment_method_title": "Card",
            "customer_note": "",
            "payment_url": "https://shop.test/checkout/order-pay/5001/?key=wc_order_a1b2c3"
        }))
        .unwrap()
    }

    #[test]
    fn test_convert_order() {
        let order = convert_order(wire_order(), CurrencyCode::USD).unwrap();

        assert_eq!(order.id, OrderId::new(5001));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total.display(), "$23.50");
        assert_eq!(order.date_created.unwrap().to_rfc3339(), "2025-03-10T14:22:05+00:00");

        let line = order.line_items.first().unwrap();
        assert_eq!(line.product_id, ProductId::new(101));
        assert!(line.variation_id.is_none());
        assert_eq!(line.subtotal.display(), "$18.00");
        assert_eq!(line.total.display(), "$16.00");

        // Empty phone string becomes None, email survives
        assert!(order.billing.phone.is_none());
        assert_eq!(order.billing.email.as_deref(), Some("ada@example.com"));
        assert!(order.payment_url.is_some());
    }

    #[test]
    fn test_convert_order_unknown_currency_falls_back() {
        let mut wire = wire_order();
        wire.currency = "XTS".to_string();
        let order = convert_order(wire, CurrencyCode::EUR).unwrap();
        assert_eq!(order.total.display(), "\u{20ac}23.50");
    }

    #[test]
    fn test_convert_coupon() {
        let wire: WireCoupon = serde_json::from_value(serde_json::json!({
            "id": 31,
            "code": "welcome10",
            "amount": "10.00",
            "discount_type": "percent",
            "date_expires_gmt": "2026-01-01T00:00:00",
            "usage_count": 2,
            "usage_limit": 100
        }))
        .unwrap();

        let coupon = convert_coupon(wire);
        assert_eq!(coupon.id, CouponId::new(31));
        assert_eq!(coupon.code, "welcome10");
        assert!(coupon.date_expires.is_some());
    }
}
