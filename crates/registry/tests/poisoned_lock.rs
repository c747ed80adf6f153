//! A consumer that panics poisons the process-wide lock. Lives in its own
//! binary so the poisoned state stays away from the other global tests.

use std::panic;
use std::sync::{Arc, Mutex};

use implreg_registry::{Loader, RegistryState, global};
use implreg_types::ImplementorTable;

#[test]
fn test_registry_survives_panicking_consumer() {
    global::bind_consumer(|_| panic!("renderer crashed")).unwrap();

    let outcome = panic::catch_unwind(|| {
        Loader::from_entries([("bitflags", ["impl Hash for Flags"])]).deliver_global()
    });
    assert!(outcome.is_err());

    // The lock is poisoned now, yet every entry point keeps working.
    assert_eq!(global::state(), RegistryState::Bound);
    assert!(global::unbind());
    assert_eq!(global::state(), RegistryState::Idle);

    Loader::from_entries([("clap", ["impl StdError for Error"])])
        .deliver_global()
        .unwrap();
    assert_eq!(global::state(), RegistryState::Pending { tables: 1 });

    let seen: Arc<Mutex<Vec<ImplementorTable>>> = Arc::default();
    let sink = seen.clone();
    global::bind_consumer(move |table| {
        sink.lock().unwrap().push(table);
        Ok(())
    })
    .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].contains_library("clap"));
    assert_eq!(global::state(), RegistryState::Bound);
}
