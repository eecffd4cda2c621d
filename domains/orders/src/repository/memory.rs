//! In-memory order store

use async_trait::async_trait;
use keepsake_common::{Result, StoreError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{OrderStore, StatusChange};
use crate::domain::entities::{Order, TransitionRecord};
use crate::domain::state::OrderStateMachine;

#[derive(Debug)]
struct Entry {
    order: Order,
    history: Vec<TransitionRecord>,
}

/// Order store backed by a map behind one async lock
///
/// A status change holds the write lock from validation to commit, so the
/// status it checks is the status it replaces.
#[derive(Debug, Clone)]
pub struct InMemoryOrderStore {
    machine: Arc<OrderStateMachine>,
    entries: Arc<RwLock<HashMap<Uuid, Entry>>>,
}

impl InMemoryOrderStore {
    pub fn new(machine: Arc<OrderStateMachine>) -> Self {
        Self {
            machine,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: Order) -> Result<Order> {
        let mut entries = self.entries.write().await;
        if entries.contains_key(&order.id) {
            return Err(StoreError::AlreadyExists.into());
        }
        entries.insert(
            order.id,
            Entry {
                order: order.clone(),
                history: Vec::new(),
            },
        );
        tracing::info!(order_id = %order.id, status = %order.status, "Order created");
        Ok(order)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Order>> {
        let entries = self.entries.read().await;
        Ok(entries.get(&id).map(|entry| entry.order.clone()))
    }

    async fn history(&self, id: Uuid) -> Result<Vec<TransitionRecord>> {
        let entries = self.entries.read().await;
        entries
            .get(&id)
            .map(|entry| entry.history.clone())
            .ok_or_else(|| StoreError::NotFound.into())
    }

    async fn change_status(&self, change: StatusChange) -> Result<(Order, TransitionRecord)> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(&change.order_id)
            .ok_or(StoreError::NotFound)?;

        if let Some(expected) = change.expected_version {
            if expected != entry.order.version {
                tracing::warn!(
                    order_id = %change.order_id,
                    expected,
                    actual = entry.order.version,
                    "Stale status change rejected"
                );
                return Err(StoreError::VersionConflict {
                    expected,
                    actual: entry.order.version,
                }
                .into());
            }
        }

        // Work on a copy so a rejected change leaves the stored order as it was
        let mut order = entry.order.clone();
        let sequence = entry.history.len() as u64 + 1;
        let record = match order.apply_transition(
            &self.machine,
            change.new_status,
            &change.actor,
            change.note,
            sequence,
        ) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(
                    order_id = %change.order_id,
                    from = %entry.order.status,
                    to = %change.new_status,
                    role = %change.actor.role,
                    error = %e,
                    "Status change rejected"
                );
                return Err(e.into());
            }
        };

        entry.order = order.clone();
        entry.history.push(record.clone());

        tracing::info!(
            order_id = %order.id,
            from = %record.old_status,
            to = %record.new_status,
            role = %record.actor_role,
            actor_id = %record.actor_id,
            version = order.version,
            "Order status changed"
        );

        Ok((order, record))
    }
}
