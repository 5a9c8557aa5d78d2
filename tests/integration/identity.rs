//! Identity-change reconciliation through the session.

use std::sync::Arc;
use std::time::Duration;

use trolley::{CartSession, Config, MemoryCredentialStore, NoticeLog};

use crate::fixtures::{ScriptedClient, ScriptedFetcher, id, line, long_lived_token, token};

const SETTLE: Duration = Duration::from_secs(5);

fn session_with(
    fetcher: &Arc<ScriptedFetcher>,
    store: &Arc<MemoryCredentialStore>,
) -> CartSession {
    CartSession::new(
        ScriptedClient::new(),
        fetcher.clone(),
        store.clone(),
        Arc::new(NoticeLog::new()),
        &Config::default(),
    )
}

#[test]
fn stored_credential_loads_saved_cart_at_start() {
    let fetcher = ScriptedFetcher::new(vec![line("S", 2)]);
    let store = Arc::new(MemoryCredentialStore::new());
    store.set(long_lived_token("dana"));

    let mut session = session_with(&fetcher, &store);
    assert!(session.settle(SETTLE));
    assert_eq!(session.cart().quantity_of(&id("S")), Some(2));
}

#[test]
fn expired_credential_is_logged_out_silently() {
    let fetcher = ScriptedFetcher::new(vec![]);
    let store = Arc::new(MemoryCredentialStore::new());
    store.set(token("dana", 1)); // expired long ago

    let mut session = session_with(&fetcher, &store);
    assert!(session.settle(SETTLE));
    assert!(session.cart().is_empty());
}

#[test]
fn logout_keeps_local_cart_and_relogin_refetches() {
    let fetcher = ScriptedFetcher::new(vec![line("A", 1)]);
    let store = Arc::new(MemoryCredentialStore::new());
    store.set(long_lived_token("dana"));

    let mut session = session_with(&fetcher, &store);
    assert!(session.settle(SETTLE));
    assert_eq!(session.cart().len(), 1);

    // Logout: the local cart survives.
    store.clear();
    session.refresh_identity();
    assert!(session.settle(SETTLE));
    assert_eq!(session.cart().quantity_of(&id("A")), Some(1));

    // Logging back in (even as the same shopper) forces a refetch.
    fetcher.set(vec![line("A", 1), line("B", 3)]);
    store.set(long_lived_token("dana"));
    session.refresh_identity();
    assert!(session.settle(SETTLE));
    assert_eq!(session.cart().len(), 2);
    assert_eq!(session.cart().quantity_of(&id("B")), Some(3));
}
