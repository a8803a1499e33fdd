use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use super::ResumeSession;

/// How often the idle sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// A session held in memory, plus the bookkeeping eviction needs.
#[derive(Debug)]
pub struct OpenSession {
    pub session: ResumeSession,
    /// The latest snapshot write failed. Such sessions are never evicted.
    pub unsaved: bool,
    last_used: Instant,
}

impl OpenSession {
    fn new(session: ResumeSession) -> Self {
        OpenSession {
            session,
            unsaved: false,
            last_used: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_used = Instant::now();
    }
}

/// Per-session lock. Mutations of one session are serialized on it; the
/// registry map itself is only locked for lookups and inserts.
pub type SessionHandle = Arc<Mutex<OpenSession>>;

/// In-process map of sessions that have been mutated recently. Cheap to
/// clone; all clones share state.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionRegistry {
    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Registers `session` unless one with the same id is already open, and
    /// returns whichever handle is registered afterwards.
    pub async fn insert_if_absent(&self, session: ResumeSession) -> SessionHandle {
        self.sessions
            .write()
            .await
            .entry(session.id)
            .or_insert_with(|| Arc::new(Mutex::new(OpenSession::new(session))))
            .clone()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn open_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions idle for at least `max_idle`. Sessions that are locked
    /// right now or have unsaved changes stay. Returns how many were dropped.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(open) => open.unsaved || open.last_used.elapsed() < max_idle,
            Err(_) => true,
        });
        before - sessions.len()
    }

    /// Runs [`evict_idle`](Self::evict_idle) periodically until the runtime
    /// shuts down.
    pub fn spawn_idle_sweeper(&self, max_idle: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL.min(max_idle));
            loop {
                interval.tick().await;
                let evicted = registry.evict_idle(max_idle).await;
                if evicted > 0 {
                    let open = registry.open_count().await;
                    info!(evicted, open, "Evicted idle sessions");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_if_absent_keeps_first() {
        let registry = SessionRegistry::default();
        let id = Uuid::new_v4();

        let mut first = ResumeSession::new(id);
        first.record.summary = "first".into();
        let mut second = ResumeSession::new(id);
        second.record.summary = "second".into();

        registry.insert_if_absent(first).await;
        let kept = registry.insert_if_absent(second).await;
        assert_eq!(kept.lock().await.session.record.summary, "first");
        assert_eq!(registry.open_count().await, 1);
    }

    #[tokio::test]
    async fn test_clones_share_sessions() {
        let registry = SessionRegistry::default();
        let other = registry.clone();
        let id = Uuid::new_v4();
        registry.insert_if_absent(ResumeSession::new(id)).await;
        assert!(other.get(id).await.is_some());
        assert!(other.get(Uuid::new_v4()).await.is_none());

        assert!(other.remove(id).await);
        assert!(registry.get(id).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_evicts_only_idle_saved_sessions() {
        let registry = SessionRegistry::default();
        let (idle, unsaved, recent) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        registry.insert_if_absent(ResumeSession::new(idle)).await;
        let handle = registry.insert_if_absent(ResumeSession::new(unsaved)).await;
        handle.lock().await.unsaved = true;

        tokio::time::advance(Duration::from_secs(50)).await;
        registry.insert_if_absent(ResumeSession::new(recent)).await;
        tokio::time::advance(Duration::from_secs(20)).await;

        assert_eq!(registry.evict_idle(Duration::from_secs(60)).await, 1);
        assert!(registry.get(idle).await.is_none());
        assert!(registry.get(unsaved).await.is_some());
        assert!(registry.get(recent).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_locked_session_is_not_evicted() {
        let registry = SessionRegistry::default();
        let handle = registry.insert_if_absent(ResumeSession::new(Uuid::new_v4())).await;
        let guard = handle.lock().await;

        tokio::time::advance(Duration::from_secs(3600)).await;
        assert_eq!(registry.evict_idle(Duration::from_secs(60)).await, 0);
        drop(guard);
        assert_eq!(registry.evict_idle(Duration::from_secs(60)).await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_runs_in_background() {
        let registry = SessionRegistry::default();
        registry.insert_if_absent(ResumeSession::new(Uuid::new_v4())).await;
        let sweeper = registry.spawn_idle_sweeper(Duration::from_secs(5));

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(registry.open_count().await, 0);
        sweeper.abort();
    }
}
