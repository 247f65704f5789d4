//! Router, state, and handlers for the invoice endpoint.
//!
//! Implements the storefront's invoice-generation contract: bearer auth
//! resolved by the external auth collaborator, a single `(order, user)`
//! keyed read, and a JSON response. CORS is permissive (`*`) on this
//! endpoint, matching what the order-history client is deployed against.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use storefront::store::OrderStore;
use storefront::types::OrderId;

use crate::auth::TokenVerifier;

const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Order storage collaborator
    pub store: Arc<dyn OrderStore>,
    /// Auth collaborator resolving bearer tokens
    pub verifier: Arc<dyn TokenVerifier>,
}

/// Request body for invoice generation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInvoiceRequest {
    /// The order to invoice
    #[serde(default)]
    pub order_id: Option<String>,
}

/// Error payload returned on every non-success status.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Client-safe message
    pub error: String,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/generate-invoice",
            post(generate_invoice).options(preflight),
        )
        .with_state(state)
}

fn with_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    response
}

fn json_error(status: StatusCode, message: &str) -> Response {
    with_cors(
        (
            status,
            Json(ErrorResponse {
                error: message.to_owned(),
            }),
        )
            .into_response(),
    )
}

/// Answer a CORS preflight request.
async fn preflight() -> Response {
    with_cors(StatusCode::OK.into_response())
}

/// `POST /generate-invoice`
///
/// Resolves the caller, loads the order keyed by `(order_id, user_id)`, and
/// returns the sealed invoice envelope. The keyed read is the authorization
/// check: an order owned by someone else is indistinguishable from a
/// missing one.
async fn generate_invoice(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<GenerateInvoiceRequest>, JsonRejection>,
) -> Response {
    let token = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    let Some(token) = token else {
        return json_error(StatusCode::UNAUTHORIZED, "Unauthorized");
    };
    let user_id = match state.verifier.verify(token).await {
        Ok(user_id) => user_id,
        Err(err) => {
            tracing::debug!(error = %err, "bearer token rejected");
            return json_error(StatusCode::UNAUTHORIZED, "Unauthorized");
        }
    };

    let Json(request) = match body {
        Ok(json) => json,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "invalid request body");
            return json_error(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };
    let Some(raw_order_id) = request
        .order_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
    else {
        return json_error(StatusCode::BAD_REQUEST, "Order ID is required");
    };

    // A non-UUID id can never match a stored order; same outcome as a miss.
    let Ok(order_id) = raw_order_id.parse::<OrderId>() else {
        return json_error(StatusCode::NOT_FOUND, "Order not found");
    };

    match state.store.load_order(order_id, user_id).await {
        Ok(Some(aggregate)) => {
            let envelope = storefront::invoice::generate_invoice(&aggregate);
            tracing::info!(
                order_number = %aggregate.order.order_number,
                "generated invoice"
            );
            with_cors((StatusCode::OK, Json(envelope)).into_response())
        }
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Order not found"),
        Err(err) => {
            tracing::error!(error = %err, "failed to fetch order");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch order")
        }
    }
}
