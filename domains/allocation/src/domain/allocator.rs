//! Quantity allocation
//!
//! Resolves a project set plus the total and per-project fields into exactly
//! one distribution, or a diagnostic. Decision order:
//!
//! 1. no projects: `NoProjects`
//! 2. both fields blank: `MissingQuantity`
//! 3. total only: even split, remainder to the lowest project numbers
//! 4. per-project `po N` / `N`: uniform
//! 5. per-project comma list: one value per project
//! 6. per-project unreadable: `UnrecognizedFormat`
//! 7. both fields: per-project wins only if it adds up to the total,
//!    otherwise `InconsistentTotals`

use serde::{Deserialize, Serialize};

use super::error::{AllocationError, AllocationErrorKind};
use super::projects::ProjectSet;
use super::quantity::{parse_total, QuantitySpec};

/// Which input the allocation was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMode {
    /// Derived from the total field. A fresh split differs by at most one
    /// unit between projects; after [`rebalance`] retained projects keep
    /// their old quantities, so the spread can be wider.
    Total,
    PerProjectUniform,
    PerProjectList,
    #[default]
    Unset,
}

/// Quantity assigned to one project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectQuantity {
    pub project_no: u32,
    pub quantity: u64,
}

/// A resolved distribution. Quantities always sum to `total` and there is
/// exactly one entry per project, in ascending project order. Deserializing
/// checks both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "AllocationRecord")]
pub struct Allocation {
    mode: AllocationMode,
    total: u64,
    per_project: Vec<ProjectQuantity>,
}

/// Wire form of [`Allocation`] before its invariants are checked
#[derive(Deserialize)]
struct AllocationRecord {
    mode: AllocationMode,
    total: u64,
    per_project: Vec<ProjectQuantity>,
}

impl TryFrom<AllocationRecord> for Allocation {
    type Error = AllocationError;

    fn try_from(record: AllocationRecord) -> Result<Self, Self::Error> {
        let ascending = record
            .per_project
            .windows(2)
            .all(|w| w[0].project_no < w[1].project_no);
        if !ascending || record.per_project.iter().any(|p| p.project_no == 0) {
            return Err(AllocationError::new(
                AllocationErrorKind::MalformedRange,
                "Projects must be positive and strictly ascending",
            ));
        }
        let sum = record
            .per_project
            .iter()
            .try_fold(0u64, |acc, p| acc.checked_add(p.quantity))
            .ok_or_else(|| AllocationError::quantity_limit("Quantities add up to too much"))?;
        if sum != record.total {
            return Err(AllocationError::inconsistent_totals(sum, record.total));
        }
        Ok(Self {
            mode: record.mode,
            total: record.total,
            per_project: record.per_project,
        })
    }
}

impl Allocation {
    fn from_quantities(mode: AllocationMode, projects: &ProjectSet, quantities: &[u64]) -> Self {
        debug_assert_eq!(projects.len(), quantities.len());
        let per_project: Vec<ProjectQuantity> = projects
            .iter()
            .zip(quantities.iter().copied())
            .map(|(project_no, quantity)| ProjectQuantity {
                project_no,
                quantity,
            })
            .collect();
        let total = per_project.iter().map(|p| p.quantity).sum();
        Self {
            mode,
            total,
            per_project,
        }
    }

    pub fn mode(&self) -> AllocationMode {
        self.mode
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn per_project(&self) -> &[ProjectQuantity] {
        &self.per_project
    }

    pub fn quantities(&self) -> Vec<u64> {
        self.per_project.iter().map(|p| p.quantity).collect()
    }

    pub fn quantity_of(&self, project_no: u32) -> Option<u64> {
        self.per_project
            .binary_search_by_key(&project_no, |p| p.project_no)
            .ok()
            .map(|i| self.per_project[i].quantity)
    }

    pub fn projects(&self) -> Vec<u32> {
        self.per_project.iter().map(|p| p.project_no).collect()
    }

    /// Text an operator would type into the per-project field:
    /// `po N` when uniform, otherwise the comma list
    pub fn per_project_display(&self) -> String {
        match self.per_project.split_first() {
            None => String::new(),
            Some((first, rest)) if rest.iter().all(|p| p.quantity == first.quantity) => {
                format!("po {}", first.quantity)
            }
            Some(_) => self
                .per_project
                .iter()
                .map(|p| p.quantity.to_string())
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// One-line breakdown, e.g. `Proj. 1: 4 | Proj. 2: 3`
    pub fn preview(&self) -> String {
        self.per_project
            .iter()
            .map(|p| format!("Proj. {}: {}", p.project_no, p.quantity))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Caller-controlled allocation switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AllocationOptions {
    /// Accept an explicit total of 0 in total mode instead of treating it
    /// as a missing quantity
    pub allow_zero_total: bool,
}

/// Split `total` over `count` slots: the first `total % count` slots get one
/// extra unit. Returns an empty vector for `count == 0`.
pub fn split_evenly(total: u64, count: usize) -> Vec<u64> {
    if count == 0 {
        return Vec::new();
    }
    let n = count as u64;
    let base = total / n;
    let remainder = (total - base * n) as usize;
    (0..count)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Allocate with default options
pub fn allocate(
    projects: &ProjectSet,
    total_raw: &str,
    per_project_raw: &str,
) -> Result<Allocation, AllocationError> {
    allocate_with(projects, total_raw, per_project_raw, AllocationOptions::default())
}

/// Resolve one authoritative distribution from the raw fields
pub fn allocate_with(
    projects: &ProjectSet,
    total_raw: &str,
    per_project_raw: &str,
    options: AllocationOptions,
) -> Result<Allocation, AllocationError> {
    if projects.is_empty() {
        return Err(AllocationError::no_projects());
    }
    if total_raw.trim().is_empty() && per_project_raw.trim().is_empty() {
        return Err(AllocationError::missing_quantity());
    }

    let total = match parse_total(total_raw)? {
        Some(0) if !options.allow_zero_total => None,
        other => other,
    };
    let spec = QuantitySpec::parse(per_project_raw);

    match (total, spec) {
        (None, None) => Err(AllocationError::missing_quantity()),
        (Some(total), None) => Ok(Allocation::from_quantities(
            AllocationMode::Total,
            projects,
            &split_evenly(total, projects.len()),
        )),
        (None, Some(spec)) => from_spec(projects, &spec),
        (Some(total), Some(spec)) => {
            let allocation = from_spec(projects, &spec)?;
            if allocation.total() != total {
                return Err(AllocationError::inconsistent_totals(
                    allocation.total(),
                    total,
                ));
            }
            Ok(allocation)
        }
    }
}

fn from_spec(projects: &ProjectSet, spec: &QuantitySpec) -> Result<Allocation, AllocationError> {
    match spec {
        QuantitySpec::Uniform(0) => Err(AllocationError::non_positive(0)),
        QuantitySpec::Uniform(each) => {
            each.checked_mul(projects.len() as u64).ok_or_else(|| {
                AllocationError::quantity_limit(format!(
                    "po {} over {} projects is too large",
                    each,
                    projects.len()
                ))
            })?;
            Ok(Allocation::from_quantities(
                AllocationMode::PerProjectUniform,
                projects,
                &vec![*each; projects.len()],
            ))
        }
        QuantitySpec::List(values) => {
            if values.len() != projects.len() {
                return Err(AllocationError::count_mismatch(
                    values.len(),
                    projects.len(),
                ));
            }
            if let Some(bad) = values.iter().find(|v| **v <= 0) {
                return Err(AllocationError::non_positive(bad));
            }
            let quantities: Vec<u64> = values.iter().map(|v| *v as u64).collect();
            quantities
                .iter()
                .try_fold(0u64, |acc, q| acc.checked_add(*q))
                .ok_or_else(|| AllocationError::quantity_limit("Quantities add up to too much"))?;
            Ok(Allocation::from_quantities(
                AllocationMode::PerProjectList,
                projects,
                &quantities,
            ))
        }
        QuantitySpec::Unknown(text) => Err(AllocationError::unrecognized_format(text)),
    }
}

/// Carry a total-mode allocation over to a new project set.
///
/// Retained projects keep their quantity. Units released by removed projects
/// plus any previous slack form the balance, which is split evenly over the
/// added projects, or over the retained ones when nothing was added. Falls
/// back to a fresh even split when nothing is retained or the balance cannot
/// give every added project at least one unit. The total never changes, but
/// the even-spread guarantee of a fresh split does not carry over.
pub fn rebalance(
    previous: &Allocation,
    projects: &ProjectSet,
) -> Result<Allocation, AllocationError> {
    if projects.is_empty() {
        return Err(AllocationError::no_projects());
    }
    let total = previous.total();

    let retained: Vec<u64> = projects
        .iter()
        .filter_map(|p| previous.quantity_of(p))
        .collect();
    let added = projects.len() - retained.len();
    let retained_sum: u64 = retained.iter().sum();
    let balance = total
        .checked_sub(retained_sum)
        .ok_or_else(|| AllocationError::inconsistent_totals(retained_sum, total))?;

    if retained.is_empty() || (added > 0 && balance < added as u64) {
        return Ok(Allocation::from_quantities(
            AllocationMode::Total,
            projects,
            &split_evenly(total, projects.len()),
        ));
    }

    let mut shares = if added > 0 {
        split_evenly(balance, added).into_iter()
    } else {
        split_evenly(balance, retained.len()).into_iter()
    };

    let quantities: Vec<u64> = projects
        .iter()
        .map(|p| match previous.quantity_of(p) {
            Some(kept) if added > 0 => kept,
            Some(kept) => kept + shares.next().unwrap_or(0),
            None => shares.next().unwrap_or(0),
        })
        .collect();

    Ok(Allocation::from_quantities(
        AllocationMode::Total,
        projects,
        &quantities,
    ))
}
