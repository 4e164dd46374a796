//! Single-writer store.
//!
//! One tokio task owns [`AppState`]. Dispatches queue on an unbounded
//! channel; for each action the task runs the reducer, publishes the new
//! state, then hands every subscriber the action together with the state it
//! produced. Subscribers have their own unbounded queue, so a slow listener
//! falls behind but never loses an action.

use std::sync::Arc;

use taskmgr_core::{Action, AppState};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Errors surfaced by [`StoreHandle`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The store task has stopped.
    #[error("store is closed")]
    Closed,
}

/// An action and the state right after the reducer applied it.
#[derive(Debug, Clone)]
pub struct Applied {
    /// The dispatched action.
    pub action: Action,
    /// State including `action`.
    pub state: Arc<AppState>,
}

enum Command {
    Dispatch(Action),
    Subscribe(mpsc::UnboundedSender<Applied>),
    Shutdown,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dispatch(action) => write!(f, "Dispatch({})", action.tag()),
            Self::Subscribe(_) => f.write_str("Subscribe"),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}

/// Cloneable handle to the store task.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<Arc<AppState>>,
    backlog_warning: usize,
}

/// Ordered, lossless feed of applied actions for one listener.
#[derive(Debug)]
pub struct Subscription {
    listener: &'static str,
    inbox: mpsc::UnboundedReceiver<Applied>,
    backlog_warning: usize,
    behind: bool,
}

impl Subscription {
    /// Next applied action with its state. `None` once the store stops.
    pub async fn recv(&mut self) -> Option<Applied> {
        let applied = self.inbox.recv().await?;
        let pending = self.inbox.len();
        if pending > self.backlog_warning && !self.behind {
            warn!(listener = self.listener, pending, "Listener is falling behind the action stream");
        }
        self.behind = pending > self.backlog_warning;
        Some(applied)
    }

    /// Next applied action, without its state.
    pub async fn recv_action(&mut self) -> Option<Action> {
        self.recv().await.map(|applied| applied.action)
    }
}

impl StoreHandle {
    /// Spawn the store task on the current runtime.
    ///
    /// A subscriber with more than `backlog_warning` undelivered actions logs
    /// a warning.
    #[must_use]
    pub fn spawn(initial: AppState, backlog_warning: usize) -> (Self, JoinHandle<()>) {
        let (commands, inbox) = mpsc::unbounded_channel();
        let (state_tx, state) = watch::channel(Arc::new(initial));
        let task = tokio::spawn(run(inbox, state_tx));
        (
            Self {
                commands,
                state,
                backlog_warning,
            },
            task,
        )
    }

    /// Queue an action.
    ///
    /// # Errors
    /// Returns [`StoreError::Closed`] after shutdown.
    pub fn dispatch(&self, action: impl Into<Action>) -> Result<(), StoreError> {
        self.commands
            .send(Command::Dispatch(action.into()))
            .map_err(|_| StoreError::Closed)
    }

    /// Point-in-time view of the state.
    #[must_use]
    pub fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(&self.state.borrow())
    }

    /// Receiver for every state change.
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<Arc<AppState>> {
        self.state.clone()
    }

    /// Feed of every action dispatched after this call.
    ///
    /// Registration is queued with dispatches, so nothing dispatched later
    /// is missed. After shutdown the feed is closed immediately.
    #[must_use]
    pub fn subscribe(&self, listener: &'static str) -> Subscription {
        let (feed, inbox) = mpsc::unbounded_channel();
        let _ = self.commands.send(Command::Subscribe(feed));
        Subscription {
            listener,
            inbox,
            backlog_warning: self.backlog_warning,
            behind: false,
        }
    }

    /// Dispatch `action` and wait for the first applied action accepted by `done`.
    ///
    /// # Errors
    /// Returns [`StoreError::Closed`] if the store stops first.
    pub async fn dispatch_until(
        &self,
        action: impl Into<Action>,
        mut done: impl FnMut(&Action) -> bool,
    ) -> Result<Action, StoreError> {
        let mut actions = self.subscribe("dispatch_until");
        self.dispatch(action)?;
        while let Some(action) = actions.recv_action().await {
            if done(&action) {
                return Ok(action);
            }
        }
        Err(StoreError::Closed)
    }

    /// Stop the store task. Subscribers see their feed close.
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }
}

async fn run(mut inbox: mpsc::UnboundedReceiver<Command>, state_tx: watch::Sender<Arc<AppState>>) {
    let mut state = Arc::clone(&state_tx.borrow());
    let mut subscribers: Vec<mpsc::UnboundedSender<Applied>> = Vec::new();
    while let Some(command) = inbox.recv().await {
        let action = match command {
            Command::Dispatch(action) => action,
            Command::Subscribe(feed) => {
                subscribers.push(feed);
                continue;
            }
            Command::Shutdown => break,
        };
        debug!(action = action.tag(), "Applying action");
        Arc::make_mut(&mut state).reduce(&action);
        state_tx.send_replace(Arc::clone(&state));
        let applied = Applied {
            action,
            state: Arc::clone(&state),
        };
        // Dropped subscriptions fall out here.
        subscribers.retain(|feed| feed.send(applied.clone()).is_ok());
    }
    debug!("Store stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmgr_core::{Project, ProjectAction, ProjectId, RouterAction};

    fn project(id: &str) -> Project {
        Project {
            id: Some(ProjectId::new(id)),
            name: id.into(),
            ..Project::default()
        }
    }

    #[tokio::test]
    async fn state_is_updated_before_action_is_delivered() -> Result<(), StoreError> {
        let (store, _task) = StoreHandle::spawn(AppState::default(), 16);
        let mut actions = store.subscribe("test");
        let watcher = store.watch_state();

        store.dispatch(ProjectAction::AddSuccess(project("1")))?;
        let seen = actions.recv().await.ok_or(StoreError::Closed)?;

        assert_eq!(seen.action.tag(), "[Project] Add Success");
        assert_eq!(seen.state.projects.len(), 1);
        assert_eq!(watcher.borrow().projects.len(), 1);
        assert_eq!(store.snapshot().projects.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn actions_are_applied_in_dispatch_order() -> Result<(), StoreError> {
        let (store, _task) = StoreHandle::spawn(AppState::default(), 16);
        store.dispatch(RouterAction::Go("/a".into()))?;
        let last = store
            .dispatch_until(RouterAction::Go("/b".into()), |a| {
                matches!(a, Action::Router(RouterAction::Go(path)) if path == "/b")
            })
            .await?;

        assert_eq!(last.tag(), "[Router] Go");
        assert_eq!(store.snapshot().route.as_deref(), Some("/b"));
        Ok(())
    }

    #[tokio::test]
    async fn dispatch_fails_after_shutdown() {
        let (store, task) = StoreHandle::spawn(AppState::default(), 16);
        store.shutdown();
        let _ = task.await;
        assert_eq!(store.dispatch(ProjectAction::Load), Err(StoreError::Closed));
    }

    #[tokio::test]
    async fn snapshots_are_point_in_time() -> Result<(), StoreError> {
        let (store, _task) = StoreHandle::spawn(AppState::default(), 16);
        let before = store.snapshot();
        store
            .dispatch_until(ProjectAction::AddSuccess(project("1")), |_| true)
            .await?;

        assert!(before.projects.is_empty());
        assert_eq!(store.snapshot().projects.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn each_action_carries_the_state_it_produced() -> Result<(), StoreError> {
        let (store, _task) = StoreHandle::spawn(AppState::default(), 16);
        let mut actions = store.subscribe("test");
        store.dispatch(ProjectAction::AddSuccess(project("1")))?;
        store.dispatch(ProjectAction::AddSuccess(project("2")))?;
        store.dispatch(RouterAction::Go("/projects".into()))?;

        let first = actions.recv().await.ok_or(StoreError::Closed)?;
        let second = actions.recv().await.ok_or(StoreError::Closed)?;
        let third = actions.recv().await.ok_or(StoreError::Closed)?;

        assert_eq!(first.state.projects.len(), 1);
        assert_eq!(first.state.route, None);
        assert_eq!(second.state.projects.len(), 2);
        assert_eq!(third.state.route.as_deref(), Some("/projects"));
        Ok(())
    }

    #[tokio::test]
    async fn slow_subscriber_receives_every_action() -> Result<(), StoreError> {
        let (store, _task) = StoreHandle::spawn(AppState::default(), 4);
        let mut actions = store.subscribe("slow");
        for n in 0..50 {
            store.dispatch(RouterAction::Go(format!("/{n}")))?;
        }
        store
            .dispatch_until(RouterAction::Go("/done".into()), |a| {
                matches!(a, Action::Router(RouterAction::Go(path)) if path == "/done")
            })
            .await?;

        let mut paths = Vec::new();
        while let Some(action) = actions.recv_action().await {
            match action {
                Action::Router(RouterAction::Go(path)) if path == "/done" => break,
                Action::Router(RouterAction::Go(path)) => paths.push(path),
                _ => {}
            }
        }
        assert_eq!(paths, (0..50).map(|n| format!("/{n}")).collect::<Vec<_>>());
        Ok(())
    }

    #[tokio::test]
    async fn subscription_closes_on_shutdown() {
        let (store, task) = StoreHandle::spawn(AppState::default(), 16);
        let mut actions = store.subscribe("test");
        store.shutdown();
        let _ = task.await;
        assert!(actions.recv().await.is_none());
        assert!(store.subscribe("late").recv().await.is_none());
    }
}
