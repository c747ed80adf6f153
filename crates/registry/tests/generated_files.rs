//! Loading the generated implementor data files end to end.

use std::cell::RefCell;
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use implreg_registry::{
    Loader, PendingPolicy, Registry, RegistryState, describe_table, source::is_data_file,
};
use implreg_types::{ImplementorTable, TypeKind};

fn fixture(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/implementors")
        .join(relative)
}

fn hash_loader() -> Loader {
    Loader::from_path(fixture("core/hash/trait.Hash.js")).unwrap()
}

fn error_loader() -> Loader {
    Loader::from_path(fixture("std/error/trait.Error.js")).unwrap()
}

type Seen = Rc<RefCell<Vec<ImplementorTable>>>;

fn recording_registry(
    policy: PendingPolicy,
) -> (Registry<impl FnMut(ImplementorTable) -> Result<(), Infallible>>, Seen) {
    let seen: Seen = Rc::default();
    let sink = seen.clone();
    let mut registry = Registry::with_policy(policy);
    registry
        .bind_consumer(move |table: ImplementorTable| {
            sink.borrow_mut().push(table);
            Ok::<(), Infallible>(())
        })
        .unwrap();
    (registry, seen)
}

#[test]
fn test_hash_file_contents() {
    let loader = hash_loader();
    let table = loader.table();

    assert_eq!(table.trait_path.as_deref(), Some("core::hash::Hash"));
    assert_eq!(
        table.library_names().collect::<Vec<_>>(),
        vec!["bitflags", "libmodbus_rs", "libmodbus_sys", "vec_map"]
    );
    assert_eq!(table.get("libmodbus_sys").unwrap().len(), 11);
    assert_eq!(table.implementor_count(), 14);
}

#[test]
fn test_error_file_contents() {
    let loader = error_loader();
    let table = loader.table();

    assert_eq!(table.trait_path.as_deref(), Some("std::error::Error"));
    assert_eq!(
        table.library_names().collect::<Vec<_>>(),
        vec!["clap", "failure", "time"]
    );
    assert_eq!(table.get("time").unwrap().len(), 2);
}

#[test]
fn test_every_generated_entry_describes() {
    for loader in [hash_loader(), error_loader()] {
        let described = describe_table(loader.table(), None).unwrap();
        for library in &described {
            for descriptor in &library.implementors {
                assert!(descriptor.trait_path.is_some(), "{}", descriptor.text);
                assert!(descriptor.self_path.is_some(), "{}", descriptor.text);
            }
        }
    }

    let described = describe_table(error_loader().table(), None).unwrap();
    let time = described.iter().find(|l| l.library == "time").unwrap();
    assert_eq!(time.implementors[1].text, "impl Error for ParseError");
    assert_eq!(time.implementors[1].self_kind, Some(TypeKind::Enum));
    assert_eq!(time.implementors[1].self_path.as_deref(), Some("time::ParseError"));
}

#[test]
fn test_late_consumer_sees_only_last_table() {
    let (mut registry, seen) = recording_registry(PendingPolicy::LastWriteWins);
    let render = registry.unbind().unwrap();

    Loader::from_entries([("bitflags", ["Hash for Flags"])])
        .deliver(&mut registry)
        .unwrap();
    Loader::from_entries([("clap", ["Error for Error"])])
        .deliver(&mut registry)
        .unwrap();
    assert_eq!(registry.state(), RegistryState::Pending { tables: 1 });

    registry.bind_consumer(render).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].library_names().collect::<Vec<_>>(), vec!["clap"]);
    assert_eq!(seen[0].get("clap").unwrap()[0].as_str(), "Error for Error");
}

#[test]
fn test_bound_consumer_receives_every_file_in_order() {
    let (mut registry, seen) = recording_registry(PendingPolicy::LastWriteWins);

    hash_loader().deliver(&mut registry).unwrap();
    error_loader().deliver(&mut registry).unwrap();

    let seen = seen.borrow();
    let traits: Vec<_> = seen.iter().map(|t| t.trait_path.clone().unwrap()).collect();
    assert_eq!(traits, vec!["core::hash::Hash", "std::error::Error"]);
}

#[test]
fn test_markup_reaches_consumer_unmodified() {
    let raw = std::fs::read_to_string(fixture("std/error/trait.Error.js")).unwrap();
    let (mut registry, seen) = recording_registry(PendingPolicy::Queue);

    error_loader().deliver(&mut registry).unwrap();

    let seen = seen.borrow();
    for (_, implementors) in seen[0].iter() {
        for implementor in implementors {
            let literal = serde_json::to_string(implementor.as_str()).unwrap();
            assert!(raw.contains(&literal), "markup changed in transit: {implementor}");
        }
    }
}

#[test]
fn test_fixture_files_are_detected() {
    assert!(is_data_file(&fixture("core/hash/trait.Hash.js")));
    assert!(is_data_file(&fixture("std/error/trait.Error.js")));
}
