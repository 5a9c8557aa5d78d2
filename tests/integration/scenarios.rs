//! End-to-end cart flows through a full session with a live worker thread.

use std::sync::Arc;
use std::time::Duration;

use trolley::{
    CartSession, Config, Direction, FetchError, MemoryCredentialStore, NoticeLog, Severity,
};

use crate::fixtures::{ScriptedClient, ScriptedFetcher, id, line, product, rejected};

const SETTLE: Duration = Duration::from_secs(5);

struct World {
    session: CartSession,
    client: Arc<ScriptedClient>,
    fetcher: Arc<ScriptedFetcher>,
    store: Arc<MemoryCredentialStore>,
    notices: Arc<NoticeLog>,
}

fn world_with(items: Vec<trolley::LineItem>) -> World {
    let client = ScriptedClient::new();
    let fetcher = ScriptedFetcher::new(items);
    let store = Arc::new(MemoryCredentialStore::new());
    let notices = Arc::new(NoticeLog::new());
    let session = CartSession::new(
        client.clone(),
        fetcher.clone(),
        store.clone(),
        notices.clone(),
        &Config::default(),
    );
    World {
        session,
        client,
        fetcher,
        store,
        notices,
    }
}

/// Empty cart; add one item; remote succeeds; the refetched canonical
/// snapshot confirms the same contents.
#[test]
fn add_item_confirmed_by_canonical_snapshot() {
    let mut w = world_with(vec![]);
    assert!(w.session.settle(SETTLE), "initial load should settle");
    assert!(w.session.cart().is_empty());

    w.session.add_item(product("A", 10, 5), 1);
    assert_eq!(w.session.cart().quantity_of(&id("A")), Some(1));

    w.fetcher.set(vec![line("A", 1)]);
    assert!(w.session.settle(SETTLE), "commit and refetch should settle");

    assert_eq!(w.session.cart().quantity_of(&id("A")), Some(1));
    assert_eq!(w.session.cart().len(), 1);
    assert!(w.notices.is_empty());
}

/// Update fails remotely: the optimistic increment is visible immediately,
/// then reverts, with exactly one failure notice.
#[test]
fn failed_update_reverts_with_one_notice() {
    let mut w = world_with(vec![line("A", 2)]);
    assert!(w.session.settle(SETTLE));
    assert_eq!(w.session.cart().quantity_of(&id("A")), Some(2));

    w.client.push(Err(rejected("stock changed")));
    w.session.update_item(Direction::Increase, id("A"));
    assert_eq!(w.session.cart().quantity_of(&id("A")), Some(3));

    assert!(w.session.settle(SETTLE));
    assert_eq!(w.session.cart().quantity_of(&id("A")), Some(2));

    let notices = w.notices.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Error);
}

/// Remove succeeds: instant removal, cache invalidated, canonical snapshot
/// agrees, nothing else changes.
#[test]
fn successful_remove_is_confirmed_unchanged() {
    let mut w = world_with(vec![line("A", 1), line("B", 2)]);
    assert!(w.session.settle(SETTLE));

    w.session.remove_item(id("B"));
    assert_eq!(w.session.cart().len(), 1);
    assert!(w.session.cart().get(&id("B")).is_none());

    w.fetcher.set(vec![line("A", 1)]);
    assert!(w.session.settle(SETTLE));

    assert_eq!(w.session.cart().len(), 1);
    assert_eq!(w.session.cart().quantity_of(&id("A")), Some(1));
    assert!(w.notices.is_empty());
}

/// Login while an anonymous cart is populated: the saved cart replaces the
/// local one wholesale.
#[test]
fn login_replaces_anonymous_cart() {
    let mut w = world_with(vec![line("A", 1)]);
    assert!(w.session.settle(SETTLE));
    assert_eq!(w.session.cart().quantity_of(&id("A")), Some(1));

    w.store.set(crate::fixtures::long_lived_token("carol"));
    w.fetcher.set(vec![line("C", 4)]);
    w.session.refresh_identity();
    assert!(w.session.settle(SETTLE));

    assert_eq!(w.session.cart().len(), 1);
    assert_eq!(w.session.cart().quantity_of(&id("C")), Some(4));
    assert!(w.session.cart().get(&id("A")).is_none());
}

/// Two rapid increases to the same product; only the second fails. The
/// revert lands on the snapshot captured after the first increment.
#[test]
fn racing_edits_revert_to_per_edit_snapshots() {
    let mut w = world_with(vec![line("A", 2)]);
    assert!(w.session.settle(SETTLE));

    w.client.push(Ok(()));
    w.client.push(Err(rejected("limit reached")));

    w.session.update_item(Direction::Increase, id("A"));
    w.session.update_item(Direction::Increase, id("A"));
    assert_eq!(w.session.cart().quantity_of(&id("A")), Some(4));

    // Server applied only the first increase.
    w.fetcher.set(vec![line("A", 3)]);
    assert!(w.session.settle(SETTLE));

    assert_eq!(w.session.cart().quantity_of(&id("A")), Some(3));
    assert_eq!(w.notices.drain().len(), 1);
}

/// Checkout empties the cart optimistically and confirms with a success
/// notice; the canonical snapshot comes back empty.
#[test]
fn checkout_clears_cart_and_notifies() {
    let mut w = world_with(vec![line("A", 2), line("B", 1)]);
    assert!(w.session.settle(SETTLE));
    assert_eq!(w.session.cart().subtotal(), 3000);

    w.session.checkout();
    assert!(w.session.cart().is_empty());

    w.fetcher.set(vec![]);
    assert!(w.session.settle(SETTLE));

    assert!(w.session.cart().is_empty());
    let notices = w.notices.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Info);
}

/// Failed checkout restores the pre-checkout cart exactly.
#[test]
fn failed_checkout_restores_cart() {
    let mut w = world_with(vec![line("A", 2), line("B", 1)]);
    assert!(w.session.settle(SETTLE));
    let before = w.session.cart().clone();

    w.client.push(Err(rejected("payment declined")));
    w.session.checkout();
    assert!(w.session.cart().is_empty());

    assert!(w.session.settle(SETTLE));
    assert_eq!(w.session.cart(), &before);
    assert_eq!(w.notices.drain().len(), 1);
}

/// A fetch failure surfaces as a cache error flag; the cart itself is
/// untouched.
#[test]
fn fetch_failure_sets_error_flag_without_cart_change() {
    let mut w = world_with(vec![line("A", 1)]);
    assert!(w.session.settle(SETTLE));

    w.fetcher.fail(FetchError::Unavailable {
        reason: "gateway timeout".into(),
    });
    w.client.push(Ok(()));
    w.session.update_item(Direction::Increase, id("A"));
    assert!(w.session.settle(SETTLE));

    // Commit confirmed, refetch failed: optimistic state stands, error
    // flag raised for the view.
    assert_eq!(w.session.cart().quantity_of(&id("A")), Some(2));
    assert!(w.session.cache().error().is_some());
    assert!(w.notices.is_empty());
}
