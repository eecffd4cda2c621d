//! Order status state machine
//!
//! Legal status changes depend on who asks. The rules live in one explicit
//! role × status table; every pair is listed, even when nothing is allowed,
//! and the table is validated before use:
//! - every (role, status) pair appears exactly once
//! - terminal states have no outgoing transitions
//! - no status transitions to itself
//! - no wildcard rows: the broadest role still lists its targets

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;
use thiserror::Error;

pub use keepsake_common::StateError;

// ============================================================================
// Order Status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Approved,
    InProduction,
    Ready,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        Self::Pending,
        Self::Approved,
        Self::InProduction,
        Self::Ready,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::InProduction => "IN_PRODUCTION",
            Self::Ready => "READY",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown order status '{}'", s))
    }
}

// ============================================================================
// Actor Role
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorRole {
    Admin,
    SalesDept,
    SalesRep,
    ProductionManager,
    Production,
    Warehouse,
    Graphics,
    Client,
}

impl ActorRole {
    pub const ALL: [ActorRole; 8] = [
        Self::Admin,
        Self::SalesDept,
        Self::SalesRep,
        Self::ProductionManager,
        Self::Production,
        Self::Warehouse,
        Self::Graphics,
        Self::Client,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::SalesDept => "SALES_DEPT",
            Self::SalesRep => "SALES_REP",
            Self::ProductionManager => "PRODUCTION_MANAGER",
            Self::Production => "PRODUCTION",
            Self::Warehouse => "WAREHOUSE",
            Self::Graphics => "GRAPHICS",
            Self::Client => "CLIENT",
        }
    }

    /// Order lines may only be removed by sales staff and admins, and only
    /// before production starts
    pub fn can_remove_items(&self, status: OrderStatus) -> bool {
        matches!(self, Self::SalesDept | Self::Admin)
            && matches!(status, OrderStatus::Pending | OrderStatus::Approved)
    }
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown actor role '{}'", s))
    }
}

// ============================================================================
// Transition Table
// ============================================================================

/// One table row: what `role` may move an order in `status` to
pub type TransitionRow = (ActorRole, OrderStatus, &'static [OrderStatus]);

use ActorRole as R;
use OrderStatus as S;

/// Production transition rules
pub const STANDARD_TRANSITIONS: &[TransitionRow] = &[
    // Admin: the full forward lifecycle plus cancellation before shipping
    (R::Admin, S::Pending, &[S::Approved, S::Cancelled]),
    (R::Admin, S::Approved, &[S::InProduction, S::Cancelled]),
    (R::Admin, S::InProduction, &[S::Ready, S::Cancelled]),
    (R::Admin, S::Ready, &[S::Shipped, S::Cancelled]),
    (R::Admin, S::Shipped, &[S::Delivered]),
    (R::Admin, S::Delivered, &[]),
    (R::Admin, S::Cancelled, &[]),
    // Sales department
    (R::SalesDept, S::Pending, &[S::Approved]),
    (R::SalesDept, S::Approved, &[S::InProduction, S::Cancelled]),
    (R::SalesDept, S::InProduction, &[S::Cancelled]),
    (R::SalesDept, S::Ready, &[S::Cancelled]),
    (R::SalesDept, S::Shipped, &[S::Delivered]),
    (R::SalesDept, S::Delivered, &[]),
    (R::SalesDept, S::Cancelled, &[]),
    // Sales rep: may only withdraw an order nobody has approved yet
    (R::SalesRep, S::Pending, &[S::Cancelled]),
    (R::SalesRep, S::Approved, &[]),
    (R::SalesRep, S::InProduction, &[]),
    (R::SalesRep, S::Ready, &[]),
    (R::SalesRep, S::Shipped, &[]),
    (R::SalesRep, S::Delivered, &[]),
    (R::SalesRep, S::Cancelled, &[]),
    // Production manager
    (R::ProductionManager, S::Pending, &[]),
    (R::ProductionManager, S::Approved, &[S::InProduction]),
    (R::ProductionManager, S::InProduction, &[S::Ready]),
    (R::ProductionManager, S::Ready, &[]),
    (R::ProductionManager, S::Shipped, &[]),
    (R::ProductionManager, S::Delivered, &[]),
    (R::ProductionManager, S::Cancelled, &[]),
    // Production floor
    (R::Production, S::Pending, &[]),
    (R::Production, S::Approved, &[S::InProduction]),
    (R::Production, S::InProduction, &[S::Ready]),
    (R::Production, S::Ready, &[]),
    (R::Production, S::Shipped, &[]),
    (R::Production, S::Delivered, &[]),
    (R::Production, S::Cancelled, &[]),
    // Warehouse
    (R::Warehouse, S::Pending, &[]),
    (R::Warehouse, S::Approved, &[]),
    (R::Warehouse, S::InProduction, &[]),
    (R::Warehouse, S::Ready, &[S::Shipped]),
    (R::Warehouse, S::Shipped, &[]),
    (R::Warehouse, S::Delivered, &[]),
    (R::Warehouse, S::Cancelled, &[]),
    // Graphics
    (R::Graphics, S::Pending, &[]),
    (R::Graphics, S::Approved, &[]),
    (R::Graphics, S::InProduction, &[]),
    (R::Graphics, S::Ready, &[]),
    (R::Graphics, S::Shipped, &[]),
    (R::Graphics, S::Delivered, &[]),
    (R::Graphics, S::Cancelled, &[]),
    // Client
    (R::Client, S::Pending, &[]),
    (R::Client, S::Approved, &[]),
    (R::Client, S::InProduction, &[]),
    (R::Client, S::Ready, &[]),
    (R::Client, S::Shipped, &[]),
    (R::Client, S::Delivered, &[]),
    (R::Client, S::Cancelled, &[]),
];

/// Problems found while validating a transition table
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Transition table has no row for {role} in {status}")]
    MissingRow { role: ActorRole, status: OrderStatus },

    #[error("Transition table lists {role} in {status} more than once")]
    DuplicateRow { role: ActorRole, status: OrderStatus },

    #[error("Terminal status {status} has outgoing transitions for {role}")]
    TerminalHasTargets { role: ActorRole, status: OrderStatus },

    #[error("{role} in {status} lists {status} as its own target")]
    SelfTransition { role: ActorRole, status: OrderStatus },
}

/// Validated role × status → allowed targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    rows: HashMap<(ActorRole, OrderStatus), BTreeSet<OrderStatus>>,
}

impl TransitionTable {
    /// The production rules, validated
    pub fn standard() -> Result<Self, TableError> {
        Self::from_rows(STANDARD_TRANSITIONS)
    }

    pub fn from_rows(rows: &[TransitionRow]) -> Result<Self, TableError> {
        let mut table = HashMap::with_capacity(rows.len());
        for (role, status, targets) in rows.iter().copied() {
            if status.is_terminal() && !targets.is_empty() {
                return Err(TableError::TerminalHasTargets { role, status });
            }
            if targets.contains(&status) {
                return Err(TableError::SelfTransition { role, status });
            }
            let targets: BTreeSet<OrderStatus> = targets.iter().copied().collect();
            if table.insert((role, status), targets).is_some() {
                return Err(TableError::DuplicateRow { role, status });
            }
        }

        for role in ActorRole::ALL {
            for status in OrderStatus::ALL {
                if !table.contains_key(&(role, status)) {
                    return Err(TableError::MissingRow { role, status });
                }
            }
        }

        Ok(Self { rows: table })
    }

    /// Allowed next statuses; empty for terminal states
    pub fn allowed(&self, status: OrderStatus, role: ActorRole) -> BTreeSet<OrderStatus> {
        self.rows.get(&(role, status)).cloned().unwrap_or_default()
    }
}

// ============================================================================
// Order State Machine
// ============================================================================

/// Order state machine over a validated table
#[derive(Debug, Clone)]
pub struct OrderStateMachine {
    table: TransitionTable,
}

impl OrderStateMachine {
    pub fn new(table: TransitionTable) -> Self {
        Self { table }
    }

    /// Machine over the production rules
    #[mutants::skip] // Delegates to TransitionTable::standard()
    pub fn standard() -> Result<Self, TableError> {
        TransitionTable::standard().map(Self::new)
    }

    /// Statuses `role` may move an order in `current` to
    pub fn allowed_transitions(
        &self,
        current: OrderStatus,
        role: ActorRole,
    ) -> BTreeSet<OrderStatus> {
        self.table.allowed(current, role)
    }

    /// Attempt a state transition
    ///
    /// Returns the new state if `role` may perform it, or an error otherwise.
    pub fn transition(
        &self,
        current: OrderStatus,
        target: OrderStatus,
        role: ActorRole,
    ) -> Result<OrderStatus, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }
        if !self.allowed_transitions(current, role).contains(&target) {
            return Err(StateError::IllegalTransition {
                from: current.to_string(),
                to: target.to_string(),
                actor: role.to_string(),
            });
        }
        Ok(target)
    }
}

// ============================================================================
// Tests
// ============================================================================
