//! Task-id keyed registry of live sessions.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::StreamConfig;
use crate::error::StreamError;
use crate::model::EngineEvent;
use crate::store::ResultStore;

use super::task::{SessionSnapshot, TaskSession};

/// Handle to a running session task.
pub struct SessionHandle {
    sender: mpsc::Sender<EngineEvent>,
    snapshots: watch::Receiver<SessionSnapshot>,
    join: JoinHandle<SessionSnapshot>,
}

impl SessionHandle {
    /// Whether the session task has returned.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    async fn finish(self) -> Result<SessionSnapshot, StreamError> {
        drop(self.sender);
        self.join
            .await
            .map_err(|e| StreamError::SessionAborted(e.to_string()))
    }
}

/// One session per task id, spawned on the current tokio runtime.
pub struct SessionRegistry {
    sessions: HashMap<String, SessionHandle>,
    config: StreamConfig,
    store: Option<Arc<dyn ResultStore>>,
}

impl SessionRegistry {
    /// Fails with [`StreamError::ConfigError`] if `config` does not validate.
    pub fn new(config: StreamConfig) -> Result<Self, StreamError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: StreamConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            config,
            store: None,
        }
    }

    /// Sessions started from now on persist completed results to `store`.
    pub fn with_store(mut self, store: Arc<dyn ResultStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.sessions.contains_key(task_id)
    }

    /// Ids of all registered sessions, sorted.
    pub fn task_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Spawn a session for `task_id` and return a subscription to it.
    ///
    /// A finished session under the same id is replaced; a live one is an error.
    pub fn start(
        &mut self,
        task_id: &str,
    ) -> Result<watch::Receiver<SessionSnapshot>, StreamError> {
        if let Some(existing) = self.sessions.get(task_id) {
            if !existing.is_finished() {
                return Err(StreamError::DuplicateTask(task_id.to_string()));
            }
            debug!("Replacing finished session for task {}", task_id);
        }

        let (session, snapshots) = TaskSession::new(task_id, &self.config);
        let session = match &self.store {
            Some(store) => session.with_store(Arc::clone(store)),
            None => session,
        };
        let (sender, events) = mpsc::channel(self.config.event_channel_capacity);
        let join = tokio::spawn(session.run(events));

        self.sessions.insert(
            task_id.to_string(),
            SessionHandle {
                sender,
                snapshots: snapshots.clone(),
                join,
            },
        );
        info!("Registered session for task {}", task_id);
        Ok(snapshots)
    }

    /// Route an event to its task's session.
    ///
    /// A terminal event also tears the session down; its final snapshot is
    /// returned.
    pub async fn dispatch(
        &mut self,
        event: EngineEvent,
    ) -> Result<Option<SessionSnapshot>, StreamError> {
        let task_id = event.task_id().to_string();
        let terminal = event.is_terminal();

        let handle = self
            .sessions
            .get(&task_id)
            .ok_or_else(|| StreamError::UnknownTask(task_id.clone()))?;
        handle
            .sender
            .send(event)
            .await
            .map_err(|_| StreamError::ChannelClosed)?;

        if !terminal {
            return Ok(None);
        }

        match self.sessions.remove(&task_id) {
            Some(handle) => handle.finish().await.map(Some),
            None => Ok(None),
        }
    }

    pub fn subscribe(
        &self,
        task_id: &str,
    ) -> Result<watch::Receiver<SessionSnapshot>, StreamError> {
        self.sessions
            .get(task_id)
            .map(SessionHandle::subscribe)
            .ok_or_else(|| StreamError::UnknownTask(task_id.to_string()))
    }

    /// Detach from a task: its session force-flushes pending work once and
    /// stops. Returns the final snapshot.
    pub async fn unsubscribe(&mut self, task_id: &str) -> Result<SessionSnapshot, StreamError> {
        let handle = self
            .sessions
            .remove(task_id)
            .ok_or_else(|| StreamError::UnknownTask(task_id.to_string()))?;
        info!("Unsubscribing from task {}", task_id);
        handle.finish().await
    }

    /// Drop sessions whose task has ended. Returns their task ids.
    pub fn reap(&mut self) -> Vec<String> {
        let finished: Vec<String> = self
            .sessions
            .iter()
            .filter(|(_, handle)| handle.is_finished())
            .map(|(task_id, _)| task_id.clone())
            .collect();

        for task_id in &finished {
            self.sessions.remove(task_id);
        }
        if !finished.is_empty() {
            debug!("Reaped {} finished sessions", finished.len());
        }
        finished
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_config(StreamConfig::default())
    }
}
