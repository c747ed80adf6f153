//! Reader for generated implementor data files.
//!
//! Each file registers one trait's table and contains one line per library:
//!
//! ```text
//! implementors["clap"] = ["impl <a ...>StdError</a> for <a ...>Error</a>",];
//! ```
//!
//! Keys and items are double-quoted literals using JSON escapes. Everything
//! else in the file (the wrapper function, the registration call) is ignored.

use std::path::{Component, Path};

use implreg_types::ImplementorTable;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};

const ENTRY_PREFIX: &str = "implementors[";
const DATA_DIR: &str = "implementors";

static ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^implementors\[\s*("(?:[^"\\]|\\.)*")\s*\]\s*=\s*(\[.*\])\s*;?$"#)
        .expect("entry pattern is valid")
});

/// Parses the contents of a data file into a table.
pub fn parse_source(source: &str) -> Result<ImplementorTable> {
    let mut table = ImplementorTable::new();

    for (index, raw_line) in source.lines().enumerate() {
        let line = raw_line.trim();
        if !line.starts_with(ENTRY_PREFIX) {
            continue;
        }

        let line_number = index + 1;
        let captures = ENTRY.captures(line).ok_or_else(|| Error::MalformedEntry {
            line: line_number,
            reason: "expected `implementors[\"<library>\"] = [...];`".to_string(),
        })?;

        let library: String = serde_json::from_str(&captures[1]).map_err(|source| {
            Error::InvalidLiteral {
                line: line_number,
                source,
            }
        })?;
        let implementors: Vec<String> =
            serde_json::from_str(&strip_trailing_comma(&captures[2])).map_err(|source| {
                Error::InvalidLiteral {
                    line: line_number,
                    source,
                }
            })?;

        debug!(
            library = %library,
            implementors = implementors.len(),
            line = line_number,
            "Parsed implementor entry"
        );
        table.insert(library, implementors);
    }

    Ok(table)
}

/// Drops a trailing `,` before the closing bracket, which JSON rejects.
fn strip_trailing_comma(array: &str) -> String {
    let inner = &array[1..array.len() - 1];
    let inner = inner.trim_end();
    let inner = inner.strip_suffix(',').unwrap_or(inner);
    format!("[{inner}]")
}

/// Returns the trait name of a `trait.<Name>.js` file name.
pub fn trait_name_from_file_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix("trait.")?
        .strip_suffix(".js")
        .filter(|name| !name.is_empty() && !name.contains('.'))
}

/// Derives the trait path from a data file's location.
///
/// `<root>/implementors/core/hash/trait.Hash.js` maps to `core::hash::Hash`.
/// Without an `implementors` ancestor, only the trait name is returned.
pub fn trait_path_from_path(path: &Path) -> Option<String> {
    let name = trait_name_from_file_name(path.file_name()?.to_str()?)?;

    let dirs: Vec<&str> = path
        .parent()
        .map(|parent| {
            parent
                .components()
                .filter_map(|component| match component {
                    Component::Normal(part) => part.to_str(),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    let module = match dirs.iter().rposition(|dir| *dir == DATA_DIR) {
        Some(index) => &dirs[index + 1..],
        None => &[][..],
    };

    let mut segments: Vec<&str> = module.to_vec();
    segments.push(name);
    Some(segments.join("::"))
}

/// Whether `path` looks like a generated implementor data file.
pub fn is_data_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(trait_name_from_file_name)
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH_SOURCE: &str = r#"(function() {var implementors = {};
implementors["bitflags"] = ["impl <a class=\"trait\" href=\"https://doc.rust-lang.org/nightly/core/hash/trait.Hash.html\" title=\"trait core::hash::Hash\">Hash</a> for <a class=\"struct\" href=\"bitflags/example_generated/struct.Flags.html\" title=\"struct bitflags::example_generated::Flags\">Flags</a>",];
implementors["vec_map"] = ["impl&lt;V:&nbsp;<a class=\"trait\" href=\"https://doc.rust-lang.org/nightly/core/hash/trait.Hash.html\" title=\"trait core::hash::Hash\">Hash</a>&gt; <a class=\"trait\" href=\"https://doc.rust-lang.org/nightly/core/hash/trait.Hash.html\" title=\"trait core::hash::Hash\">Hash</a> for <a class=\"struct\" href=\"vec_map/struct.VecMap.html\" title=\"struct vec_map::VecMap\">VecMap</a>&lt;V&gt;",];

            if (window.register_implementors) {
                window.register_implementors(implementors);
            } else {
                window.pending_implementors = implementors;
            }

})()"#;

    #[test]
    fn test_parse_source() {
        let table = parse_source(HASH_SOURCE).unwrap();

        assert_eq!(
            table.library_names().collect::<Vec<_>>(),
            vec!["bitflags", "vec_map"]
        );
        assert_eq!(table.implementor_count(), 2);
        assert!(table.get("bitflags").unwrap()[0]
            .as_str()
            .starts_with("impl <a class=\"trait\" href="));
        assert!(table.get("vec_map").unwrap()[0]
            .as_str()
            .ends_with("VecMap</a>&lt;V&gt;"));
    }

    #[test]
    fn test_parse_source_without_entries() {
        let table = parse_source("(function() {var implementors = {};\n})()").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_brackets_inside_markup() {
        let source = r#"implementors["core"] = ["impl Hash for [T]","impl Hash for (A,)"];"#;
        let table = parse_source(source).unwrap();
        let items: Vec<_> = table.get("core").unwrap().iter().map(|i| i.as_str()).collect();
        assert_eq!(items, vec!["impl Hash for [T]", "impl Hash for (A,)"]);
    }

    #[test]
    fn test_duplicate_library_last_wins() {
        let source = "implementors[\"a\"] = [\"one\",];\nimplementors[\"b\"] = [];\nimplementors[\"a\"] = [\"two\",];";
        let table = parse_source(source).unwrap();
        assert_eq!(table.library_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(table.get("a").unwrap()[0].as_str(), "two");
    }

    #[test]
    fn test_malformed_entry_reports_line() {
        let source = "(function() {\nimplementors[\"clap\"] = oops;\n})()";
        match parse_source(source) {
            Err(Error::MalformedEntry { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed entry, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_literal_reports_line() {
        let source = "implementors[\"clap\"] = [\"unterminated\\\"];";
        assert!(matches!(
            parse_source(source),
            Err(Error::InvalidLiteral { line: 1, .. })
        ));
    }

    #[test]
    fn test_trait_path_from_path() {
        assert_eq!(
            trait_path_from_path(Path::new("doc/implementors/core/hash/trait.Hash.js")),
            Some("core::hash::Hash".to_string())
        );
        assert_eq!(
            trait_path_from_path(Path::new("/srv/implementors/std/error/trait.Error.js")),
            Some("std::error::Error".to_string())
        );
        assert_eq!(
            trait_path_from_path(Path::new("trait.Hash.js")),
            Some("Hash".to_string())
        );
        assert_eq!(trait_path_from_path(Path::new("implementors/core/search.js")), None);
    }

    #[test]
    fn test_is_data_file() {
        assert!(is_data_file(Path::new("implementors/core/hash/trait.Hash.js")));
        assert!(!is_data_file(Path::new("implementors/core/hash/trait.Hash.js.bak")));
        assert!(!is_data_file(Path::new("trait..js")));
    }
}
