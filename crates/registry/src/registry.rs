//! Hand-off between implementor table producers and a single consumer.

use std::collections::VecDeque;

use implreg_types::ImplementorTable;
use tracing::{debug, info, warn};

use crate::config::PendingPolicy;

/// Receives implementor tables from a [`Registry`].
///
/// Any `FnMut(ImplementorTable) -> Result<(), E>` closure is a consumer.
pub trait Consumer {
    type Error;

    fn consume(&mut self, table: ImplementorTable) -> Result<(), Self::Error>;
}

impl<F, E> Consumer for F
where
    F: FnMut(ImplementorTable) -> Result<(), E>,
{
    type Error = E;

    fn consume(&mut self, table: ImplementorTable) -> Result<(), E> {
        self(table)
    }
}

/// Externally observable registry state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    Idle,
    /// Tables are waiting for a consumer to bind.
    Pending { tables: usize },
    Bound,
}

/// Delivers each table to the bound consumer, or holds it until one binds.
///
/// Tables are handed over by value and never modified. All calls run to
/// completion before returning, so the registry needs no internal locking;
/// see [`crate::global`] for a process-wide instance.
pub struct Registry<C> {
    policy: PendingPolicy,
    pending: VecDeque<ImplementorTable>,
    consumer: Option<C>,
}

impl<C> Default for Registry<C> {
    fn default() -> Self {
        Self::with_policy(PendingPolicy::default())
    }
}

impl<C> Registry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: PendingPolicy) -> Self {
        Self {
            policy,
            pending: VecDeque::new(),
            consumer: None,
        }
    }

    pub fn policy(&self) -> PendingPolicy {
        self.policy
    }

    /// Changes the pending policy.
    ///
    /// Switching to [`PendingPolicy::LastWriteWins`] while several tables are
    /// pending keeps only the newest one.
    pub fn set_policy(&mut self, policy: PendingPolicy) {
        self.policy = policy;
        if policy == PendingPolicy::LastWriteWins && self.consumer.is_none() {
            self.truncate_to_newest();
        }
    }

    pub fn state(&self) -> RegistryState {
        if self.consumer.is_some() {
            RegistryState::Bound
        } else if !self.pending.is_empty() {
            RegistryState::Pending {
                tables: self.pending.len(),
            }
        } else {
            RegistryState::Idle
        }
    }

    pub fn is_bound(&self) -> bool {
        self.consumer.is_some()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Tables waiting for a consumer, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = &ImplementorTable> {
        self.pending.iter()
    }

    /// Removes the bound consumer. Later deliveries are buffered again.
    pub fn unbind(&mut self) -> Option<C> {
        let consumer = self.consumer.take();
        if consumer.is_some() {
            info!("Implementor consumer unbound");
        }
        consumer
    }

    fn buffer(&mut self, table: ImplementorTable) {
        if self.policy == PendingPolicy::LastWriteWins && !self.pending.is_empty() {
            for superseded in self.pending.drain(..) {
                warn!(
                    trait_path = superseded.trait_path.as_deref().unwrap_or("<unknown>"),
                    libraries = superseded.len(),
                    "Undelivered implementor table superseded before a consumer was bound"
                );
            }
        }

        debug!(
            trait_path = table.trait_path.as_deref().unwrap_or("<unknown>"),
            libraries = table.len(),
            "No consumer bound, holding implementor table"
        );
        self.pending.push_back(table);
    }

    fn truncate_to_newest(&mut self) {
        while self.pending.len() > 1 {
            if let Some(superseded) = self.pending.pop_front() {
                warn!(
                    trait_path = superseded.trait_path.as_deref().unwrap_or("<unknown>"),
                    "Dropping older pending implementor table"
                );
            }
        }
    }
}

impl<C: Consumer> Registry<C> {
    /// Hands `table` to the bound consumer, or holds it if none is bound.
    ///
    /// The only error is the consumer's own, returned unchanged.
    pub fn deliver(&mut self, table: ImplementorTable) -> Result<(), C::Error> {
        if self.consumer.is_none() {
            self.buffer(table);
            return Ok(());
        }

        self.pending.push_back(table);
        self.flush()
    }

    /// Binds `consumer`, replacing any previously bound one, and flushes
    /// pending tables to it in arrival order.
    pub fn bind_consumer(&mut self, consumer: C) -> Result<(), C::Error> {
        if self.consumer.replace(consumer).is_some() {
            debug!("Replacing bound implementor consumer");
        }
        info!(pending = self.pending.len(), "Implementor consumer bound");
        self.flush()
    }

    /// Invokes the bound consumer with every pending table.
    ///
    /// Stops at the first consumer error; tables after the failing one stay
    /// pending and go out ahead of the next delivery.
    fn flush(&mut self) -> Result<(), C::Error> {
        let Some(consumer) = self.consumer.as_mut() else {
            return Ok(());
        };

        while let Some(table) = self.pending.pop_front() {
            debug!(
                trait_path = table.trait_path.as_deref().unwrap_or("<unknown>"),
                libraries = table.len(),
                "Delivering implementor table"
            );
            consumer.consume(table)?;
        }

        Ok(())
    }
}
