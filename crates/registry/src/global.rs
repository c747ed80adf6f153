//! Process-wide registry instance.
//!
//! Generated data files and the rendering code usually have no way to share
//! a [`Registry`] value, so this module keeps one behind a lock. Consumers
//! run while the lock is held and must not call back into this module.

use std::sync::{Mutex, MutexGuard, PoisonError};

use implreg_types::ImplementorTable;
use once_cell::sync::Lazy;

use crate::config::RegistryConfig;
use crate::registry::{Registry, RegistryState};

pub type BoxedConsumer = Box<dyn FnMut(ImplementorTable) -> eyre::Result<()> + Send>;

static REGISTRY: Lazy<Mutex<Registry<BoxedConsumer>>> = Lazy::new(|| Mutex::new(Registry::new()));

// A consumer that panicked leaves the lock poisoned, but every registry step
// completes before the consumer is called, so the state is still consistent.
fn registry() -> MutexGuard<'static, Registry<BoxedConsumer>> {
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Applies `config` to the process-wide registry.
pub fn configure(config: &RegistryConfig) {
    registry().set_policy(config.pending_policy);
}

pub fn deliver(table: ImplementorTable) -> eyre::Result<()> {
    registry().deliver(table)
}

pub fn bind_consumer<F>(consumer: F) -> eyre::Result<()>
where
    F: FnMut(ImplementorTable) -> eyre::Result<()> + Send + 'static,
{
    registry().bind_consumer(Box::new(consumer))
}

/// Removes the bound consumer. Returns `false` if none was bound.
pub fn unbind() -> bool {
    registry().unbind().is_some()
}

pub fn state() -> RegistryState {
    registry().state()
}
