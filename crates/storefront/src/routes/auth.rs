//! Authentication route handlers.
//!
//! Login proxies the upstream JWT endpoint; registration creates the
//! customer through the management API and then logs in. No credentials or
//! tokens are ever returned to the browser - the session cookie is the only
//! client-side artifact.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use wicker_core::Email;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireCustomer, clear_current_customer, set_current_customer};
use crate::models::CurrentCustomer;
use crate::state::AppState;
use crate::woo::CreateCustomerPayload;
use crate::woo::types::Customer;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Log a customer in by proxying the upstream JWT check.
#[instrument(skip(state, session, body), fields(email = %body.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginBody>,
) -> Result<Json<Customer>> {
    let email =
        Email::parse(body.email.trim()).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let token = state
        .woo()
        .login(email.as_str(), &body.password)
        .await
        .map_err(|e| {
            // The JWT endpoint answers 403 for bad credentials; don't leak
            // which part was wrong
            if matches!(&e, crate::woo::WooError::Api { status, .. } if *status < 500) {
                AppError::Unauthorized("Invalid credentials".to_string())
            } else {
                AppError::Upstream(e)
            }
        })?;

    // Resolve the customer record behind the WordPress user
    let customer = state
        .woo()
        .find_customer_by_email(&token.email)
        .await?
        .ok_or_else(|| {
            AppError::Unauthorized("No customer account for this login".to_string())
        })?;

    let current = CurrentCustomer {
        id: customer.id,
        email: email.clone(),
        display_name: token.display_name,
        token: token.token,
    };
    set_current_customer(&session, &current).await?;
    set_sentry_user(&customer.id, Some(email.as_str()));

    tracing::info!(customer_id = %customer.id, "Customer logged in");
    Ok(Json(customer))
}

/// Register a new customer and log them in.
#[instrument(skip(state, session, body), fields(email = %body.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<Customer>)> {
    let email =
        Email::parse(body.email.trim()).map_err(|e| AppError::BadRequest(e.to_string()))?;

    if body.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let payload = CreateCustomerPayload {
        email: email.to_string(),
        password: body.password.clone(),
        first_name: body.first_name,
        last_name: body.last_name,
    };
    let customer = state.woo().create_customer(&payload).await?;

    // Log the fresh account in so the session is usable immediately
    let token = state.woo().login(email.as_str(), &body.password).await?;

    let current = CurrentCustomer {
        id: customer.id,
        email: email.clone(),
        display_name: token.display_name,
        token: token.token,
    };
    set_current_customer(&session, &current).await?;
    set_sentry_user(&customer.id, Some(email.as_str()));

    tracing::info!(customer_id = %customer.id, "Customer registered");
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Log the current customer out.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_customer(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// Current customer profile.
///
/// Revalidates the stored JWT against the upstream; a revoked or expired
/// token ends the session.
#[instrument(skip(state, session, customer))]
pub async fn me(
    State(state): State<AppState>,
    session: Session,
    RequireCustomer(customer): RequireCustomer,
) -> Result<Json<Customer>> {
    if state.woo().validate_token(&customer.token).await.is_err() {
        clear_current_customer(&session).await?;
        clear_sentry_user();
        return Err(AppError::Unauthorized("Session expired".to_string()));
    }

    let profile = state.woo().get_customer(customer.id).await?;
    Ok(Json(profile))
}
