//! Order status API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use keepsake_common::{Error, Pagination, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::OrdersState;
use crate::domain::entities::{Actor, Order, TransitionRecord};
use crate::domain::state::{ActorRole, OrderStatus};
use crate::repository::StatusChange;

/// Order response DTO
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub status: OrderStatus,
    pub version: u64,
    pub is_terminal: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        Self {
            is_terminal: o.is_terminal(),
            id: o.id,
            status: o.status,
            version: o.version,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

/// Request for creating an order
#[derive(Debug, Default, Deserialize)]
pub struct CreateOrderRequest {
    /// Starting status, `PENDING` when omitted
    pub status: Option<OrderStatus>,
}

/// Query parameters for listing allowed transitions
#[derive(Debug, Deserialize)]
pub struct TransitionsParams {
    pub role: ActorRole,
}

/// What a role may do with an order right now
#[derive(Debug, Serialize)]
pub struct TransitionsResponse {
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub role: ActorRole,
    pub allowed: Vec<OrderStatus>,
    pub can_remove_items: bool,
}

/// Request for changing an order's status
#[derive(Debug, Deserialize, Validate)]
pub struct ChangeStatusRequest {
    pub new_status: OrderStatus,
    pub actor_role: ActorRole,
    pub actor_id: Uuid,
    pub expected_version: Option<u64>,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// Accepted status change
#[derive(Debug, Serialize)]
pub struct StatusChangeResponse {
    pub order: OrderResponse,
    pub transition: TransitionRecord,
}

async fn find_order(state: &OrdersState, id: Uuid) -> Result<Order> {
    state
        .store
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound("Order not found".to_string()))
}

/// Create an order
pub async fn create_order(
    State(state): State<OrdersState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>)> {
    let order = Order::with_status(req.status.unwrap_or(OrderStatus::Pending));
    let created = state.store.insert(order).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Get a single order by ID
pub async fn get_order(
    State(state): State<OrdersState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderResponse>> {
    let order = find_order(&state, id).await?;
    Ok(Json(order.into()))
}

/// List the statuses a role may move the order to
pub async fn get_transitions(
    State(state): State<OrdersState>,
    Path(id): Path<Uuid>,
    Query(params): Query<TransitionsParams>,
) -> Result<Json<TransitionsResponse>> {
    let order = find_order(&state, id).await?;
    let allowed = state
        .machine
        .allowed_transitions(order.status, params.role)
        .into_iter()
        .collect();

    Ok(Json(TransitionsResponse {
        order_id: order.id,
        status: order.status,
        role: params.role,
        allowed,
        can_remove_items: params.role.can_remove_items(order.status),
    }))
}

/// Change an order's status
pub async fn change_status(
    State(state): State<OrdersState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<ChangeStatusRequest>,
) -> Result<Json<StatusChangeResponse>> {
    let note = req
        .note
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let (order, transition) = state
        .store
        .change_status(StatusChange {
            order_id: id,
            new_status: req.new_status,
            actor: Actor::new(req.actor_id, req.actor_role),
            expected_version: req.expected_version,
            note,
        })
        .await?;

    Ok(Json(StatusChangeResponse {
        order: order.into(),
        transition,
    }))
}

/// Get an order's transition history, oldest first
pub async fn get_history(
    State(state): State<OrdersState>,
    Path(id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<TransitionRecord>>> {
    let history = state.store.history(id).await?;
    Ok(Json(page.page(&history)))
}
