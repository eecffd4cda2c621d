//! Per-line policy applied on top of parsing and allocation

use keepsake_common::LineLimitsConfig;
use serde::{Deserialize, Serialize};

use super::allocator::Allocation;
use super::error::AllocationError;

/// Caps an order line must respect to be accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineLimits {
    pub max_projects_per_line: usize,
    /// Widest single `start-end` token, counted in projects
    pub max_range_span: u32,
    pub max_quantity_per_project: u64,
    pub max_line_total: u64,
}

impl Default for LineLimits {
    #[mutants::skip] // Delegates to LineLimitsConfig::default()
    fn default() -> Self {
        LineLimitsConfig::default().into()
    }
}

impl From<LineLimitsConfig> for LineLimits {
    fn from(config: LineLimitsConfig) -> Self {
        Self {
            max_projects_per_line: config.max_projects_per_line,
            max_range_span: config.max_range_span,
            max_quantity_per_project: config.max_quantity_per_project,
            max_line_total: config.max_line_total,
        }
    }
}

impl LineLimits {
    /// Checked while a range is expanded, so an oversized line fails
    /// before the whole set is built
    pub fn check_project_count(&self, count: usize) -> Result<(), AllocationError> {
        if count > self.max_projects_per_line {
            return Err(AllocationError::too_many_projects(
                count,
                self.max_projects_per_line,
            ));
        }
        Ok(())
    }

    pub fn check_allocation(&self, allocation: &Allocation) -> Result<(), AllocationError> {
        if allocation.total() > self.max_line_total {
            return Err(AllocationError::quantity_limit(format!(
                "Line total {} exceeds the maximum of {}",
                allocation.total(),
                self.max_line_total
            )));
        }
        if let Some(over) = allocation
            .per_project()
            .iter()
            .find(|p| p.quantity > self.max_quantity_per_project)
        {
            return Err(AllocationError::quantity_limit(format!(
                "Project {} has {} units, the maximum per project is {}",
                over.project_no, over.quantity, self.max_quantity_per_project
            )));
        }
        Ok(())
    }
}
