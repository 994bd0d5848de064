//! Per-resource fetch loops and trigger dispatch.
//!
//! # Design
//! A `ResourceLoop` is a dedicated task that receives `TriggerMessage`s from
//! its own unbounded channel and fully processes each one (fetch, then emit)
//! before receiving the next. Triggers that arrive during a slow fetch queue in
//! the channel; they are never interleaved or dropped, and the `Dispatcher`
//! never waits on a busy loop. The loop owns its fetcher,
//! which is configured at construction and never mutated afterwards.
//!
//! Fetch failures are logged and absorbed: no `ReceiveMessage` is emitted and
//! the loop waits for the next trigger. A validation failure ends the loop
//! with `Err`, since the trigger itself was malformed.

use std::ops::ControlFlow;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, trace, warn};

use crate::error::ValidationError;
use crate::executor::Fetch;
use crate::types::{ReceiveMessage, ResourceKind, TriggerMessage};

/// Serves one `ResourceKind`: each matching trigger is fetched with `F` and the
/// result emitted as a `ReceiveMessage`.
pub struct ResourceLoop<F> {
    kind: ResourceKind,
    fetcher: F,
}

impl<F: Fetch> ResourceLoop<F> {
    pub fn new(kind: ResourceKind, fetcher: F) -> Self {
        Self { kind, fetcher }
    }

    pub fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    pub fn matches(&self, trigger: &TriggerMessage) -> bool {
        trigger.kind == self.kind.request_type()
    }

    /// Run one fetch-and-emit cycle without waiting for a trigger.
    pub async fn preload(&self, out: &mpsc::Sender<ReceiveMessage>) -> Result<(), ValidationError> {
        debug!(resource = %self.kind, "preloading resource");
        let trigger = TriggerMessage::request(&self.kind);
        self.cycle(&trigger, out).await.map(|_| ())
    }

    /// Process matching triggers in arrival order until the trigger channel
    /// closes or the receive side is dropped.
    pub async fn run(
        self,
        mut triggers: mpsc::UnboundedReceiver<TriggerMessage>,
        out: mpsc::Sender<ReceiveMessage>,
    ) -> Result<(), ValidationError> {
        debug!(resource = %self.kind, "resource loop waiting for triggers");

        while let Some(trigger) = triggers.recv().await {
            if !self.matches(&trigger) {
                trace!(resource = %self.kind, kind = %trigger.kind, "ignoring trigger");
                continue;
            }
            if self.cycle(&trigger, &out).await?.is_break() {
                break;
            }
        }

        debug!(resource = %self.kind, "resource loop stopped");
        Ok(())
    }

    /// `preload` once, then `run`.
    pub async fn run_with_preload(
        self,
        triggers: mpsc::UnboundedReceiver<TriggerMessage>,
        out: mpsc::Sender<ReceiveMessage>,
    ) -> Result<(), ValidationError> {
        self.preload(&out).await?;
        self.run(triggers, out).await
    }

    async fn cycle(
        &self,
        trigger: &TriggerMessage,
        out: &mpsc::Sender<ReceiveMessage>,
    ) -> Result<ControlFlow<()>, ValidationError> {
        let result = self.fetcher.fetch(trigger).await.inspect_err(|e| {
            error!(resource = %self.kind, error = %e, "invalid trigger, stopping resource loop");
        })?;

        let data = match result {
            Ok(data) => data,
            Err(e) => {
                warn!(resource = %self.kind, error = %e, "fetch failed, nothing emitted");
                return Ok(ControlFlow::Continue(()));
            }
        };

        let message = ReceiveMessage::new(self.kind.clone(), data, trigger.id.clone());
        if out.send(message).await.is_err() {
            debug!(resource = %self.kind, "receive channel closed");
            return Ok(ControlFlow::Break(()));
        }
        Ok(ControlFlow::Continue(()))
    }
}

impl<F: Fetch + 'static> ResourceLoop<F> {
    /// Spawn `run` (optionally preceded by `preload`) on the current runtime.
    pub fn spawn(
        self,
        triggers: mpsc::UnboundedReceiver<TriggerMessage>,
        out: mpsc::Sender<ReceiveMessage>,
        preload: bool,
    ) -> JoinHandle<Result<(), ValidationError>> {
        tokio::spawn(async move {
            if preload {
                self.run_with_preload(triggers, out).await
            } else {
                self.run(triggers, out).await
            }
        })
    }
}

/// Routes triggers to the loops registered for their message type.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    routes: Vec<(String, mpsc::UnboundedSender<TriggerMessage>)>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a trigger channel for `kind`. Pass the receiver to its loop.
    pub fn register(&mut self, kind: &ResourceKind) -> mpsc::UnboundedReceiver<TriggerMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.routes.push((kind.request_type(), tx));
        rx
    }

    /// Queue `trigger` for every loop listening for its type. Never waits on
    /// a busy loop. Returns how many loops received it.
    pub fn dispatch(&self, trigger: TriggerMessage) -> usize {
        let mut delivered = 0;
        for (kind, tx) in self.routes.iter().filter(|(kind, _)| *kind == trigger.kind) {
            match tx.send(trigger.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => warn!(kind = %kind, "resource loop is gone, trigger dropped"),
            }
        }
        if delivered == 0 {
            trace!(kind = %trigger.kind, "no resource loop for trigger");
        }
        delivered
    }
}
