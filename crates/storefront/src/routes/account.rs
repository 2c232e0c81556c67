//! Account route handlers.
//!
//! These routes require authentication. Orders and addresses are owned by
//! the upstream; the gateway adds only the ownership check (a customer can
//! see exactly their own orders) and the JSON reshape.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use wicker_core::OrderId;

use crate::error::{AppError, Result};
use crate::middleware::RequireCustomer;
use crate::state::AppState;
use crate::woo::UpdateCustomerPayload;
use crate::woo::types::{Address, Order, Page};

/// Order history query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct OrderListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// The customer's address book.
#[derive(Debug, Serialize)]
pub struct AddressBook {
    pub billing: Address,
    pub shipping: Address,
}

/// Address book update body; either side may be omitted.
#[derive(Debug, Deserialize)]
pub struct UpdateAddressesBody {
    pub billing: Option<Address>,
    pub shipping: Option<Address>,
}

/// Order history, newest first.
#[instrument(skip(state, customer))]
pub async fn orders(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
    Query(params): Query<OrderListParams>,
) -> Result<Json<Page<Order>>> {
    let page = state
        .woo()
        .list_orders(
            customer.id,
            params.page.unwrap_or(1),
            params.per_page.unwrap_or(0),
        )
        .await?;
    Ok(Json(page))
}

/// Single order, only if it belongs to the logged-in customer.
#[instrument(skip(state, customer))]
pub async fn order_detail(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
    Path(id): Path<i64>,
) -> Result<Json<Order>> {
    let order = state.woo().get_order(OrderId::new(id)).await?;

    // A foreign order is indistinguishable from a missing one
    if order.customer_id != Some(customer.id) {
        return Err(AppError::NotFound(format!("Order not found: {id}")));
    }

    Ok(Json(order))
}

/// The customer's billing and shipping addresses.
#[instrument(skip(state, customer))]
pub async fn addresses(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
) -> Result<Json<AddressBook>> {
    let profile = state.woo().get_customer(customer.id).await?;
    Ok(Json(AddressBook {
        billing: profile.billing,
        shipping: profile.shipping,
    }))
}

/// Update billing and/or shipping addresses.
#[instrument(skip(state, customer, body))]
pub async fn update_addresses(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
    Json(body): Json<UpdateAddressesBody>,
) -> Result<Json<AddressBook>> {
    if body.billing.is_none() && body.shipping.is_none() {
        return Err(AppError::BadRequest(
            "Provide a billing and/or shipping address".to_string(),
        ));
    }

    let payload = UpdateCustomerPayload {
        billing: body.billing,
        shipping: body.shipping,
    };
    let updated = state.woo().update_customer(customer.id, &payload).await?;

    Ok(Json(AddressBook {
        billing: updated.billing,
        shipping: updated.shipping,
    }))
}
