//! Integration tests for forge isolation.
//!
//! Forges are plain values owned by the composition root. Two forges never see each
//! other's slots, and a forge shared through `Arc` is visible from every thread holding it.

use anvil_forge::{EmptyResponse, Factory, Forge, ForgeApi, Slot, SlotHandler};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_forges_do_not_share_slots() {
    let admin = Forge::new();
    let public = Forge::new();

    admin.set_transaction_start_closure(|| Ok("admin-tx"));

    assert!(admin.contains(Slot::TransactionStart));
    assert!(!public.contains(Slot::TransactionStart));
    assert!(public.start_transaction().is_err());
}

#[test]
fn test_same_slot_different_forges() {
    let a = Forge::new();
    let b = Forge::new();

    a.set_transaction_start_closure(|| Ok("A"));
    b.set_transaction_start_closure(|| Ok("B"));

    assert_eq!(a.start_transaction().unwrap(), "A");
    assert_eq!(b.start_transaction().unwrap(), "B");
}

#[test]
fn test_factory_and_forge_are_independent() {
    let factory = Factory::new().with(SlotHandler::response(|| Ok(EmptyResponse)));
    let forge = Forge::new();

    assert_eq!(factory.registered_slots(), vec![Slot::Response]);
    assert!(forge.registered_slots().is_empty());
}

#[test]
fn test_shared_forge_across_threads() {
    let forge = Arc::new(Forge::new());
    let barrier = Arc::new(Barrier::new(2));

    let worker_forge = forge.clone();
    let worker_barrier = barrier.clone();
    let handle = thread::spawn(move || {
        worker_forge.set_transaction_start_closure(|| Ok("from-worker"));

        // Both threads have registered once the barrier opens
        worker_barrier.wait();

        worker_forge.contains(Slot::TransactionCommit)
    });

    forge.set_transaction_commit_closure(|| Ok(()));
    barrier.wait();

    assert!(handle.join().unwrap());
    assert_eq!(forge.start_transaction().unwrap(), "from-worker");
}
