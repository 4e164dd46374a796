//! Effect pipelines.
//!
//! A pipeline listens to the action stream, picks out its trigger, runs an
//! asynchronous service call and dispatches exactly one terminal action per
//! trigger that is not superseded.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Error;
use taskmgr_core::{Action, AppState};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::store::{Applied, StoreHandle};

/// How overlapping triggers of one pipeline are flattened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flatten {
    /// Only the most recent trigger's result is dispatched.
    Switch,
    /// Every trigger's result is dispatched.
    Merge,
}

/// Running effect listeners bound to one store.
#[derive(Debug)]
pub struct Effects {
    store: StoreHandle,
    listeners: Vec<JoinHandle<()>>,
}

impl Effects {
    /// Empty set bound to `store`.
    #[must_use]
    pub const fn new(store: StoreHandle) -> Self {
        Self {
            store,
            listeners: Vec::new(),
        }
    }

    /// Store the effects dispatch into.
    #[must_use]
    pub const fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// Number of registered pipelines.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Register an asynchronous pipeline.
    ///
    /// `select` picks the trigger payload out of an action. `run` receives the
    /// service, the payload and the state the trigger produced, and must
    /// resolve to the terminal action.
    pub fn on_request<S, P, F, Fut>(
        &mut self,
        name: &'static str,
        flatten: Flatten,
        select: fn(&Action) -> Option<P>,
        service: Arc<S>,
        run: F,
    ) where
        S: Send + Sync + 'static,
        P: Send + 'static,
        F: Fn(Arc<S>, P, Arc<AppState>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Action> + Send + 'static,
    {
        let mut actions = self.store.subscribe(name);
        let store = self.store.clone();
        let latest = Arc::new(AtomicU64::new(0));
        let listener = tokio::spawn(async move {
            while let Some(Applied { action, state }) = actions.recv().await {
                let Some(payload) = select(&action) else {
                    continue;
                };
                let generation = latest.fetch_add(1, Ordering::SeqCst) + 1;
                debug!(effect = name, generation, trigger = action.tag(), "Starting request");

                let pending = run(Arc::clone(&service), payload, state);
                let store = store.clone();
                let latest = Arc::clone(&latest);
                tokio::spawn(async move {
                    let outcome = pending.await;
                    if flatten == Flatten::Switch && latest.load(Ordering::SeqCst) != generation {
                        debug!(effect = name, generation, outcome = outcome.tag(), "Discarding superseded result");
                        return;
                    }
                    if store.dispatch(outcome).is_err() {
                        debug!(effect = name, generation, "Store closed before result arrived");
                    }
                });
            }
        });
        self.listeners.push(listener);
    }

    /// Register a synchronous derived-action pipeline.
    ///
    /// `derive` sees the state the trigger produced.
    pub fn on_map<F>(&mut self, name: &'static str, derive: F)
    where
        F: Fn(&Action, &AppState) -> Option<Action> + Send + 'static,
    {
        let mut actions = self.store.subscribe(name);
        let store = self.store.clone();
        let listener = tokio::spawn(async move {
            while let Some(Applied { action, state }) = actions.recv().await {
                let Some(derived) = derive(&action, &state) else {
                    continue;
                };
                debug!(effect = name, trigger = action.tag(), derived = derived.tag(), "Deriving action");
                if store.dispatch(derived).is_err() {
                    break;
                }
            }
        });
        self.listeners.push(listener);
    }
}

impl Drop for Effects {
    fn drop(&mut self) {
        for listener in &self.listeners {
            listener.abort();
        }
    }
}

/// Turn a service result into its success or failure action.
///
/// Failures carry the full error chain.
pub fn settle<T, E, A>(
    effect: &'static str,
    result: Result<T, E>,
    success: impl FnOnce(T) -> A,
    failure: impl FnOnce(String) -> A,
) -> Action
where
    E: Into<Error>,
    A: Into<Action>,
{
    match result {
        Ok(value) => success(value).into(),
        Err(err) => {
            let message = format!("{:#}", err.into());
            warn!(effect, error = %message, "Request failed");
            failure(message).into()
        }
    }
}
