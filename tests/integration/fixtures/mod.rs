//! Shared fixtures: scripted remote collaborators and credential builders.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use trolley::{
    CartFetcher, Direction, FetchError, LineItem, MutationError, ProductId, ProductRef,
    RemoteCartClient,
};

/// Remote client whose outcomes are scripted per call, in call order.
///
/// An empty script means every commit succeeds.
pub struct ScriptedClient {
    outcomes: Mutex<VecDeque<Result<(), MutationError>>>,
}

impl ScriptedClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(VecDeque::new()),
        })
    }

    /// Queue the outcome for the next commit call.
    pub fn push(&self, outcome: Result<(), MutationError>) {
        self.outcomes.lock().expect("script lock").push_back(outcome);
    }

    fn next(&self) -> Result<(), MutationError> {
        self.outcomes
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

impl RemoteCartClient for ScriptedClient {
    fn commit_add(&self, _id: &ProductId, _quantity: u32) -> Result<(), MutationError> {
        self.next()
    }

    fn commit_remove(&self, _id: &ProductId) -> Result<(), MutationError> {
        self.next()
    }

    fn commit_update(&self, _id: &ProductId, _direction: Direction) -> Result<(), MutationError> {
        self.next()
    }

    fn commit_checkout(&self) -> Result<(), MutationError> {
        self.next()
    }
}

/// Fetcher that serves whatever the test last programmed.
pub struct ScriptedFetcher {
    result: Mutex<Result<Vec<LineItem>, FetchError>>,
}

impl ScriptedFetcher {
    pub fn new(items: Vec<LineItem>) -> Arc<Self> {
        Arc::new(Self {
            result: Mutex::new(Ok(items)),
        })
    }

    /// Program the canonical snapshot the next fetch returns.
    pub fn set(&self, items: Vec<LineItem>) {
        *self.result.lock().expect("fetcher lock") = Ok(items);
    }

    pub fn fail(&self, error: FetchError) {
        *self.result.lock().expect("fetcher lock") = Err(error);
    }
}

impl CartFetcher for ScriptedFetcher {
    fn fetch(&self) -> Result<Vec<LineItem>, FetchError> {
        self.result.lock().expect("fetcher lock").clone()
    }
}

pub fn product(id: &str, price: u64, stock: u32) -> ProductRef {
    ProductRef {
        id: ProductId::new(id).expect("product id"),
        title: id.to_string(),
        price,
        stock,
    }
}

pub fn line(id: &str, quantity: u32) -> LineItem {
    LineItem::new(product(id, 1000, 10), quantity)
}

pub fn id(s: &str) -> ProductId {
    ProductId::new(s).expect("product id")
}

pub fn rejected(reason: &str) -> MutationError {
    MutationError::Rejected {
        reason: reason.to_string(),
    }
}

/// Build a JWT-shaped credential with the given subject and expiry.
pub fn token(sub: &str, exp_secs: u64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = format!(
        r#"{{"sub":"{sub}","name":"{sub}","email":"{sub}@example.com","exp":{exp_secs}}}"#
    );
    let payload = URL_SAFE_NO_PAD.encode(claims.as_bytes());
    format!("{header}.{payload}.signature")
}

/// A token that stays valid for the lifetime of any test run.
pub fn long_lived_token(sub: &str) -> String {
    token(sub, u64::from(u32::MAX))
}
