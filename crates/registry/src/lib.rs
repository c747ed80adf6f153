//! Implementor-table registry.
//!
//! Generated documentation data files each carry one trait's implementor
//! table. They may load before the page code that renders them is ready, so
//! every table goes through a [`Registry`]: it is handed to the bound
//! [`Consumer`] right away, or held until one binds.
//!
//! ```
//! use std::convert::Infallible;
//! use std::sync::mpsc;
//! use implreg_registry::{Loader, Registry};
//! use implreg_types::ImplementorTable;
//!
//! type Render = Box<dyn FnMut(ImplementorTable) -> Result<(), Infallible>>;
//!
//! let (tx, rx) = mpsc::channel();
//! let mut registry: Registry<Render> = Registry::new();
//!
//! // Delivered before anyone listens: held as pending.
//! Loader::from_entries([("bitflags", ["impl Hash for Flags"])])
//!     .deliver(&mut registry)
//!     .unwrap();
//!
//! registry
//!     .bind_consumer(Box::new(move |table: ImplementorTable| {
//!         tx.send(table).ok();
//!         Ok::<(), Infallible>(())
//!     }))
//!     .unwrap();
//!
//! assert!(rx.try_recv().unwrap().contains_library("bitflags"));
//! ```

pub mod config;
pub mod error;
pub mod global;
pub mod loader;
pub mod markup;
pub mod registry;
pub mod source;

pub use config::{PendingPolicy, RegistryConfig};
pub use error::{Error, Result};
pub use loader::Loader;
pub use markup::{DescribedLibrary, describe_table, parse_markup};
pub use registry::{Consumer, Registry, RegistryState};
