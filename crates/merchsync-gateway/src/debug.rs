// SPDX-FileCopyrightText: 2026 Merchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Developer-only debug action surface.
//!
//! `POST /v1/debug/{action}` maps directly onto remote client operations so
//! an operator can inspect or repair the remote state without touching the
//! settings workflow. Not a production surface; it sits behind the same
//! bearer auth as the rest of the admin API.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use merchsync_core::CommerceApi;
use merchsync_core::types::SyncJob;
use merchsync_settings::StateAccess;

use crate::handlers::ErrorResponse;
use crate::server::GatewayState;

/// Query parameters accepted by the debug actions.
#[derive(Debug, Default, Deserialize)]
pub struct DebugParams {
    pub list_id: Option<String>,
    pub order_id: Option<String>,
    pub cart_id: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

fn upstream_error(e: impl std::fmt::Display) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

fn ok_json(value: serde_json::Value) -> Response {
    (StatusCode::OK, Json(value)).into_response()
}

/// POST /v1/debug/{action}
pub async fn run_debug_action(
    State(state): State<GatewayState>,
    Path(action): Path<String>,
    Query(params): Query<DebugParams>,
) -> Response {
    // restart_sync works without a remote client.
    if action == "restart_sync" {
        return restart_sync(&state).await;
    }

    let api = match state.orchestrator.stored_api().await {
        Ok(Some(api)) => api,
        Ok(None) => return bad_request("no valid API key configured"),
        Err(e) => return upstream_error(e),
    };

    let store_id = &state.orchestrator.site().url;
    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or(10);

    match action.as_str() {
        "lists" => match api.get_lists().await {
            Ok(lists) => ok_json(serde_json::json!({ "lists": lists })),
            Err(e) => upstream_error(e),
        },
        "list_delete" => {
            let Some(list_id) = params.list_id else {
                return bad_request("list_id is required");
            };
            match api.delete_list(&list_id).await {
                Ok(()) => ok_json(serde_json::json!({ "deleted_list": list_id })),
                Err(e) => upstream_error(e),
            }
        }
        "store_get" => match api.get_store(store_id).await {
            Ok(store) => ok_json(serde_json::json!({ "store": store })),
            Err(e) => upstream_error(e),
        },
        "store_delete" => match api.delete_store(store_id).await {
            Ok(()) => ok_json(serde_json::json!({ "deleted_store": store_id })),
            Err(e) => upstream_error(e),
        },
        "orders" => match api.orders(store_id, page, limit).await {
            Ok(orders) => ok_json(serde_json::json!({ "orders": orders })),
            Err(e) => upstream_error(e),
        },
        "products" => match api.products(store_id, page, limit).await {
            Ok(products) => ok_json(serde_json::json!({ "products": products })),
            Err(e) => upstream_error(e),
        },
        "carts" => match api.carts(store_id, page, limit).await {
            Ok(carts) => ok_json(serde_json::json!({ "carts": carts })),
            Err(e) => upstream_error(e),
        },
        "order_delete" => {
            let Some(order_id) = params.order_id else {
                return bad_request("order_id is required");
            };
            match api.delete_store_order(store_id, &order_id).await {
                Ok(()) => ok_json(serde_json::json!({ "deleted_order": order_id })),
                Err(e) => upstream_error(e),
            }
        }
        "cart_delete" => {
            let Some(cart_id) = params.cart_id else {
                return bad_request("cart_id is required");
            };
            match api.delete_cart(store_id, &cart_id).await {
                Ok(()) => ok_json(serde_json::json!({ "deleted_cart": cart_id })),
                Err(e) => upstream_error(e),
            }
        }
        _ => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("unknown debug action `{action}`"),
            }),
        )
            .into_response(),
    }
}

/// Forget sync history and enqueue a fresh product sync.
async fn restart_sync(state: &GatewayState) -> Response {
    use merchsync_core::JobQueue;

    let access = StateAccess::new(state.orchestrator.options());
    if let Err(e) = access.reset_sync_started().await {
        return upstream_error(e);
    }
    let claimed = match access.flag_sync_started(unix_now()).await {
        Ok(claimed) => claimed,
        Err(e) => return upstream_error(e),
    };
    match state.db.enqueue(&SyncJob::Products).await {
        Ok(job_id) => ok_json(serde_json::json!({
            "restarted": true,
            "claimed": claimed,
            "job_id": job_id,
        })),
        Err(e) => upstream_error(e),
    }
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_params_deserialize_from_query_shape() {
        let params: DebugParams =
            serde_json::from_str(r#"{"list_id": "abc123", "page": 2}"#).unwrap();
        assert_eq!(params.list_id.as_deref(), Some("abc123"));
        assert_eq!(params.page, Some(2));
        assert!(params.order_id.is_none());
    }
}
