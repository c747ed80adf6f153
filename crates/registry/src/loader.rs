use std::path::{Path, PathBuf};

use implreg_types::{Implementor, ImplementorTable};
use tracing::debug;

use crate::error::{Error, Result};
use crate::global;
use crate::registry::{Consumer, Registry};
use crate::source::{parse_source, trait_path_from_path};

/// One-shot producer of a single implementor table.
///
/// Delivering consumes the loader, so each table is handed to a registry
/// exactly once. A loader cannot be copied:
///
/// ```compile_fail
/// use implreg_registry::Loader;
///
/// let loader = Loader::from_entries([("clap", ["impl StdError for Error"])]);
/// let _copy = loader.clone();
/// ```
#[derive(Debug)]
pub struct Loader {
    table: ImplementorTable,
    origin: Option<PathBuf>,
}

impl Loader {
    pub fn new(table: ImplementorTable) -> Self {
        Self {
            table,
            origin: None,
        }
    }

    /// Builds a loader from literal `(library, [markup, ...])` data.
    pub fn from_entries<L, I, M>(entries: impl IntoIterator<Item = (L, I)>) -> Self
    where
        L: Into<String>,
        I: IntoIterator<Item = M>,
        M: Into<Implementor>,
    {
        Self::new(entries.into_iter().collect())
    }

    /// Parses the contents of a generated data file.
    pub fn from_source(source: &str) -> Result<Self> {
        Ok(Self::new(parse_source(source)?))
    }

    /// Parses `source` as the contents of the data file at `path`.
    ///
    /// The trait path is taken from the file's location.
    pub fn from_source_at(path: impl AsRef<Path>, source: &str) -> Result<Self> {
        let path = path.as_ref();
        let mut table = parse_source(source)?;
        table.trait_path = trait_path_from_path(path);

        Ok(Self {
            table,
            origin: Some(path.to_path_buf()),
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_source_at(path, &source)
    }

    pub fn table(&self) -> &ImplementorTable {
        &self.table
    }

    /// Data file the table was read from, if any.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    pub fn deliver<C: Consumer>(self, registry: &mut Registry<C>) -> std::result::Result<(), C::Error> {
        self.log_delivery();
        registry.deliver(self.table)
    }

    /// Delivers to the process-wide registry.
    pub fn deliver_global(self) -> eyre::Result<()> {
        self.log_delivery();
        global::deliver(self.table)
    }

    fn log_delivery(&self) {
        debug!(
            origin = ?self.origin,
            trait_path = self.table.trait_path.as_deref().unwrap_or("<unknown>"),
            implementors = self.table.implementor_count(),
            "Loader delivering implementor table"
        );
    }
}
