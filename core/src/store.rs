//! Store slice, recursive merge and the receive reducer.
//!
//! # Design
//! `reduce` is a pure function of the prior slice and one `ReceiveMessage`.
//! `Store` is the single writer: it applies receive messages one at a time
//! from a channel, so any number of loops can emit concurrently without
//! racing on state. Snapshots are published through a `watch` channel for
//! whoever consumes the store.

use serde_json::{Map, Value};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::trace;

use crate::types::ReceiveMessage;

/// Application state: resource key to entity data.
pub type StoreSlice = Map<String, Value>;

/// Recursive map union. Objects merge key by key; any other pair is replaced
/// by `incoming`. Keys only present in `prior` are kept.
pub fn merge(prior: &Value, incoming: &Value) -> Value {
    match (prior, incoming) {
        (Value::Object(prior), Value::Object(incoming)) => Value::Object(merge_maps(prior, incoming)),
        (_, incoming) => incoming.clone(),
    }
}

fn merge_maps(prior: &Map<String, Value>, incoming: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = prior.clone();
    for (key, value) in incoming {
        let next = match merged.get(key) {
            Some(existing) => merge(existing, value),
            None => value.clone(),
        };
        merged.insert(key.clone(), next);
    }
    merged
}

/// Merge `message.data` into `prior` under the message's resource key.
pub fn reduce(prior: &StoreSlice, message: &ReceiveMessage) -> StoreSlice {
    let key = message.request.store_key();
    let mut next = prior.clone();
    let merged = match prior.get(key) {
        Some(existing) => merge(existing, &message.data),
        None => message.data.clone(),
    };
    next.insert(key.to_string(), merged);
    next
}

/// Serialized owner of the store slice.
#[derive(Debug)]
pub struct Store {
    state: watch::Sender<StoreSlice>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self::with_state(StoreSlice::new())
    }

    pub fn with_state(state: StoreSlice) -> Self {
        let (tx, _) = watch::channel(state);
        Self { state: tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreSlice> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> StoreSlice {
        self.state.borrow().clone()
    }

    pub fn apply(&self, message: &ReceiveMessage) {
        trace!(request = %message.request, "applying receive message");
        self.state.send_modify(|state| *state = reduce(state, message));
    }

    /// Apply messages from `rx` in arrival order until every sender is
    /// dropped, then return the final slice.
    pub fn spawn(self, mut rx: mpsc::Receiver<ReceiveMessage>) -> JoinHandle<StoreSlice> {
        tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                self.apply(&message);
            }
            self.snapshot()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResourceKind;
    use serde_json::json;

    fn slice(value: Value) -> StoreSlice {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn receive(kind: &str, data: Value) -> ReceiveMessage {
        ReceiveMessage::new(ResourceKind::new(kind), data, None)
    }

    #[test]
    fn merge_unions_nested_maps() {
        let prior = json!({"terms": {"2": {"name": "b"}}});
        let incoming = json!({"terms": {"1": {"name": "a"}}});
        assert_eq!(
            merge(&prior, &incoming),
            json!({"terms": {"1": {"name": "a"}, "2": {"name": "b"}}})
        );
    }

    #[test]
    fn merge_replaces_scalars_and_lists() {
        let prior = json!({"title": "old", "tags": [1, 2, 3], "meta": {"a": 1}});
        let incoming = json!({"title": "new", "tags": [4], "meta": 5});
        assert_eq!(merge(&prior, &incoming), json!({"title": "new", "tags": [4], "meta": 5}));
    }

    #[test]
    fn reduce_merges_under_resource_key() {
        let prior = slice(json!({"terms": {"2": {"name": "b"}}}));
        let next = reduce(&prior, &receive("terms", json!({"1": {"name": "a"}})));
        assert_eq!(
            Value::Object(next),
            json!({"terms": {"1": {"name": "a"}, "2": {"name": "b"}}})
        );
    }

    #[test]
    fn reduce_keeps_other_resources() {
        let prior = slice(json!({"posts": {"1": {}}}));
        let next = reduce(&prior, &receive("terms", json!({"3": {}})));
        assert_eq!(Value::Object(next), json!({"posts": {"1": {}}, "terms": {"3": {}}}));
    }

    #[test]
    fn reduce_does_not_mutate_prior() {
        let prior = slice(json!({"terms": {}}));
        let _ = reduce(&prior, &receive("terms", json!({"1": {}})));
        assert_eq!(Value::Object(prior), json!({"terms": {}}));
    }

    #[test]
    fn reduce_is_idempotent() {
        let prior = slice(json!({"terms": {"2": {"name": "b", "tags": [1]}}}));
        let message = receive("terms", json!({"2": {"tags": [9]}, "1": {"name": "a"}}));
        let once = reduce(&prior, &message);
        let twice = reduce(&once, &message);
        assert_eq!(once, twice);
    }

    #[test]
    fn store_publishes_snapshots() {
        let store = Store::new();
        let rx = store.subscribe();
        store.apply(&receive("terms", json!({"1": {"name": "a"}})));
        assert_eq!(Value::Object(rx.borrow().clone()), json!({"terms": {"1": {"name": "a"}}}));
    }

    #[tokio::test]
    async fn spawned_store_applies_messages_in_order() {
        let (tx, rx) = mpsc::channel(8);
        let handle = Store::new().spawn(rx);
        tx.send(receive("posts", json!({"title": "first"}))).await.unwrap();
        tx.send(receive("posts", json!({"title": "second"}))).await.unwrap();
        drop(tx);
        let state = handle.await.unwrap();
        assert_eq!(Value::Object(state), json!({"posts": {"title": "second"}}));
    }
}
