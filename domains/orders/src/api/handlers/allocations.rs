//! Allocation preview handler
//!
//! Runs a line through the same reconciler the cart uses, so the preview and
//! the submitted line can never disagree.

use axum::{extract::State, Json};
use keepsake_allocation::{AllocationMode, CartLine, ProjectQuantity, QuantitySource};
use keepsake_common::{Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::OrdersState;

/// A quantity field as a form sends it: text, or a bare JSON number
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    Number(u64),
    Text(String),
}

impl QuantityInput {
    fn into_text(self) -> String {
        match self {
            QuantityInput::Number(n) => n.to_string(),
            QuantityInput::Text(s) => s,
        }
    }
}

/// Request body for previewing an order line allocation
#[derive(Debug, Deserialize, Validate)]
pub struct PreviewAllocationRequest {
    #[validate(length(max = 1000))]
    pub projects: String,
    pub total: Option<QuantityInput>,
    #[validate(length(max = 2000))]
    pub per_project: Option<String>,
}

/// Resolved allocation for an order line
#[derive(Debug, Serialize)]
pub struct AllocationResponse {
    pub projects: Vec<u32>,
    /// Compact form, e.g. `1-3,7`
    pub projects_display: String,
    pub total: u64,
    pub mode: AllocationMode,
    pub source: QuantitySource,
    pub per_project: Vec<ProjectQuantity>,
    /// `po N` when uniform, otherwise the comma list
    pub per_project_display: String,
    pub preview: String,
}

/// Preview how quantities will be distributed over a line's projects
pub async fn preview_allocation(
    State(state): State<OrdersState>,
    ValidatedJson(req): ValidatedJson<PreviewAllocationRequest>,
) -> Result<Json<AllocationResponse>> {
    let total = req.total.map(QuantityInput::into_text).unwrap_or_default();
    let per_project = req.per_project.unwrap_or_default();

    let line = CartLine::with_policy(state.options, Some(state.limits)).load(
        req.projects,
        total,
        per_project,
    );
    let submitted = line.submit()?;

    tracing::debug!(
        projects = %submitted.projects,
        total = submitted.allocation.total(),
        mode = ?submitted.allocation.mode(),
        "Allocation previewed"
    );

    let allocation = &submitted.allocation;
    Ok(Json(AllocationResponse {
        projects: submitted.projects.as_slice().to_vec(),
        projects_display: submitted.projects.to_string(),
        total: allocation.total(),
        mode: allocation.mode(),
        source: submitted.source,
        per_project: allocation.per_project().to_vec(),
        per_project_display: allocation.per_project_display(),
        preview: allocation.preview(),
    }))
}
