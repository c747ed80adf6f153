use std::fmt;

use serde::{Deserialize, Serialize};

/// A single pre-rendered implementor entry.
///
/// The contents are generated markup and are never inspected or rewritten
/// while the table is in transit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Implementor(String);

impl Implementor {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Implementor {
    fn from(markup: String) -> Self {
        Self(markup)
    }
}

impl From<&str> for Implementor {
    fn from(markup: &str) -> Self {
        Self(markup.to_string())
    }
}

impl AsRef<str> for Implementor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Implementor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Implementors contributed by one library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryImplementors {
    pub library: String,
    pub implementors: Vec<Implementor>,
}

/// Mapping from library name to its implementors, for a single trait.
///
/// Library keys are unique. Key order follows first insertion so that output
/// built from a table is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementorTable {
    /// Fully qualified path of the trait, e.g. `core::hash::Hash`, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trait_path: Option<String>,
    #[serde(default)]
    libraries: Vec<LibraryImplementors>,
}

impl ImplementorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trait_path(mut self, trait_path: impl Into<String>) -> Self {
        self.trait_path = Some(trait_path.into());
        self
    }

    /// Inserts the implementors of `library`.
    ///
    /// An existing entry for the same library is replaced in place and its
    /// previous list is returned.
    pub fn insert<I, M>(&mut self, library: impl Into<String>, implementors: I) -> Option<Vec<Implementor>>
    where
        I: IntoIterator<Item = M>,
        M: Into<Implementor>,
    {
        let library = library.into();
        let implementors: Vec<Implementor> = implementors.into_iter().map(Into::into).collect();

        match self.libraries.iter_mut().find(|entry| entry.library == library) {
            Some(entry) => Some(std::mem::replace(&mut entry.implementors, implementors)),
            None => {
                self.libraries.push(LibraryImplementors {
                    library,
                    implementors,
                });
                None
            }
        }
    }

    pub fn get(&self, library: &str) -> Option<&[Implementor]> {
        self.libraries
            .iter()
            .find(|entry| entry.library == library)
            .map(|entry| entry.implementors.as_slice())
    }

    pub fn contains_library(&self, library: &str) -> bool {
        self.get(library).is_some()
    }

    /// Iterates over `(library, implementors)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Implementor])> {
        self.libraries
            .iter()
            .map(|entry| (entry.library.as_str(), entry.implementors.as_slice()))
    }

    pub fn library_names(&self) -> impl Iterator<Item = &str> {
        self.libraries.iter().map(|entry| entry.library.as_str())
    }

    /// Number of libraries in the table.
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// Total number of implementor entries across all libraries.
    pub fn implementor_count(&self) -> usize {
        self.libraries
            .iter()
            .map(|entry| entry.implementors.len())
            .sum()
    }
}

impl<L, I, M> FromIterator<(L, I)> for ImplementorTable
where
    L: Into<String>,
    I: IntoIterator<Item = M>,
    M: Into<Implementor>,
{
    fn from_iter<T: IntoIterator<Item = (L, I)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (library, implementors) in iter {
            table.insert(library, implementors);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_first_insertion_order() {
        let mut table = ImplementorTable::new();
        table.insert("vec_map", ["impl Hash for VecMap"]);
        table.insert("bitflags", ["impl Hash for Flags"]);
        let replaced = table.insert("vec_map", ["impl Hash for VecMap<V>"]);

        assert_eq!(
            replaced,
            Some(vec![Implementor::from("impl Hash for VecMap")])
        );
        assert_eq!(
            table.library_names().collect::<Vec<_>>(),
            vec!["vec_map", "bitflags"]
        );
        assert_eq!(
            table.get("vec_map").unwrap()[0].as_str(),
            "impl Hash for VecMap<V>"
        );
    }

    #[test]
    fn test_counts() {
        let table: ImplementorTable = [
            ("time", vec!["impl Error for OutOfRangeError", "impl Error for ParseError"]),
            ("clap", vec!["impl StdError for Error"]),
        ]
        .into_iter()
        .collect();

        assert_eq!(table.len(), 2);
        assert_eq!(table.implementor_count(), 3);
        assert!(table.contains_library("clap"));
        assert!(!table.contains_library("failure"));
    }

    #[test]
    fn test_json_shape() {
        let table = ImplementorTable::from_iter([("bitflags", ["impl Hash for Flags"])])
            .with_trait_path("core::hash::Hash");

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["trait_path"], "core::hash::Hash");
        assert_eq!(json["libraries"][0]["library"], "bitflags");
        assert_eq!(json["libraries"][0]["implementors"][0], "impl Hash for Flags");
    }
}
