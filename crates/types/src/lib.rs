//! Shared data model for implementor tables.
//!
//! An [`ImplementorTable`] is what a generated data file hands to the registry:
//! for one trait, the list of implementors contributed by each library. The
//! markup strings inside are opaque and travel through the registry untouched.
//! [`ImplementorDescriptor`] is the structured view a presentation layer can
//! derive from a single markup string.

mod descriptor;
mod table;

pub use descriptor::{ImplementorDescriptor, TypeKind};
pub use table::{Implementor, ImplementorTable, LibraryImplementors};
