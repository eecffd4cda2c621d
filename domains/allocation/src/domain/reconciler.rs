//! Cart line reconciliation
//!
//! A [`CartLine`] owns the three operator-facing fields of one order line and
//! keeps them consistent. Editing the total blanks the per-project field and
//! vice versa, so a stale value can never come back in a later validation
//! pass. The field edited last is the quantity source; project-set edits
//! under a total source go through [`rebalance`] so retained projects keep
//! their quantities.
//!
//! A line is session-local state: one instance per line being edited, not
//! shared between editors.

use serde::{Deserialize, Serialize};

use super::allocator::{allocate_with, rebalance, Allocation, AllocationMode, AllocationOptions};
use super::error::AllocationError;
use super::limits::LineLimits;
use super::projects::{parse_projects, parse_projects_with_limits, ProjectSet};
use super::quantity::parse_total;

/// Field the operator edited last
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantitySource {
    #[default]
    Unset,
    Total,
    PerProject,
}

/// Validated quantities of a line ready to become an order line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineQuantities {
    pub projects: ProjectSet,
    pub allocation: Allocation,
    pub source: QuantitySource,
}

#[derive(Debug, Clone, Default)]
pub struct CartLine {
    projects_text: String,
    total_text: String,
    per_project_text: String,
    source: QuantitySource,
    options: AllocationOptions,
    limits: Option<LineLimits>,
    projects: ProjectSet,
    allocation: Option<Allocation>,
    error: Option<AllocationError>,
}

impl CartLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Line that applies the given allocation options and, if set, line limits
    pub fn with_policy(options: AllocationOptions, limits: Option<LineLimits>) -> Self {
        Self {
            options,
            limits,
            ..Self::default()
        }
    }

    /// Restore a line from stored fields and validate all of them together.
    ///
    /// A non-blank per-project field is the source of truth; otherwise the
    /// total is. Both present must agree.
    pub fn load(
        mut self,
        projects_text: impl Into<String>,
        total_text: impl Into<String>,
        per_project_text: impl Into<String>,
    ) -> Self {
        self.projects_text = projects_text.into();
        self.total_text = total_text.into();
        self.per_project_text = per_project_text.into();
        self.source = if !self.per_project_text.trim().is_empty() {
            QuantitySource::PerProject
        } else if !self.total_text.trim().is_empty() {
            QuantitySource::Total
        } else {
            QuantitySource::Unset
        };
        let _ = self.recompute_fresh();
        self
    }

    pub fn projects_text(&self) -> &str {
        &self.projects_text
    }

    pub fn total_text(&self) -> &str {
        &self.total_text
    }

    pub fn per_project_text(&self) -> &str {
        &self.per_project_text
    }

    pub fn source(&self) -> QuantitySource {
        self.source
    }

    /// Last successfully computed allocation; may be stale when the line is invalid
    pub fn allocation(&self) -> Option<&Allocation> {
        self.allocation.as_ref()
    }

    /// Why the latest recompute failed, if it did
    pub fn error(&self) -> Option<&AllocationError> {
        self.error.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none() && self.allocation.is_some()
    }

    pub fn mode(&self) -> AllocationMode {
        self.allocation
            .as_ref()
            .map(Allocation::mode)
            .unwrap_or_default()
    }

    /// Edit the project expression.
    ///
    /// Under a total source the last allocation is carried over to the new
    /// set, as long as it still reflects the current total.
    pub fn set_projects(&mut self, text: impl Into<String>) -> Result<(), AllocationError> {
        self.projects_text = text.into();

        let carried = match (self.source, &self.allocation) {
            (QuantitySource::Total, Some(previous))
                if parse_total(&self.total_text) == Ok(Some(previous.total())) =>
            {
                Some(previous.clone())
            }
            _ => None,
        };

        let result = self.parse_projects().and_then(|projects| {
            let allocation = match &carried {
                Some(previous) => rebalance(previous, &projects)?,
                None => self.allocate(&projects)?,
            };
            Ok((projects, allocation))
        });
        self.settle(result)
    }

    /// Edit the total; blanks the per-project field
    pub fn set_total(&mut self, text: impl Into<String>) -> Result<(), AllocationError> {
        self.total_text = text.into();
        self.per_project_text.clear();
        self.source = QuantitySource::Total;
        self.recompute_fresh()
    }

    /// Edit the per-project field; blanks the total
    pub fn set_per_project(&mut self, text: impl Into<String>) -> Result<(), AllocationError> {
        self.per_project_text = text.into();
        self.total_text.clear();
        self.source = QuantitySource::PerProject;
        self.recompute_fresh()
    }

    /// Freeze the line for submission. Invalid lines are refused with their
    /// current error.
    pub fn submit(&self) -> Result<OrderLineQuantities, AllocationError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        let allocation = self
            .allocation
            .clone()
            .ok_or_else(AllocationError::missing_quantity)?;
        Ok(OrderLineQuantities {
            projects: self.projects.clone(),
            allocation,
            source: self.source,
        })
    }

    fn recompute_fresh(&mut self) -> Result<(), AllocationError> {
        let result = self.parse_projects().and_then(|projects| {
            let allocation = self.allocate(&projects)?;
            Ok((projects, allocation))
        });
        self.settle(result)
    }

    fn parse_projects(&self) -> Result<ProjectSet, AllocationError> {
        match &self.limits {
            Some(limits) => parse_projects_with_limits(&self.projects_text, limits),
            None => parse_projects(&self.projects_text),
        }
    }

    fn allocate(&self, projects: &ProjectSet) -> Result<Allocation, AllocationError> {
        allocate_with(
            projects,
            &self.total_text,
            &self.per_project_text,
            self.options,
        )
    }

    fn settle(
        &mut self,
        result: Result<(ProjectSet, Allocation), AllocationError>,
    ) -> Result<(), AllocationError> {
        let result = result.and_then(|(projects, allocation)| {
            if let Some(limits) = &self.limits {
                limits.check_allocation(&allocation)?;
            }
            Ok((projects, allocation))
        });

        match result {
            Ok((projects, allocation)) => {
                tracing::debug!(
                    projects = %projects,
                    total = allocation.total(),
                    mode = ?allocation.mode(),
                    "Cart line recomputed"
                );
                self.projects = projects;
                self.allocation = Some(allocation);
                self.error = None;
                Ok(())
            }
            Err(err) => {
                tracing::debug!(kind = %err.kind, "Cart line recompute rejected");
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }
}
