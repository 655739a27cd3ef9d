//! Per-session form state and the store that isolates sessions from each
//! other.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::predict::{report_failure, PredictionView, Predictor, MIN_SELECTION};

/// Where a session is in the select → predict → clear cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    AwaitingSelection,
    Ready,
    Predicting,
    Result,
    Error,
}

/// One user's selection and latest outcome.
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    selection: Vec<String>,
    outcome: Option<PredictionView>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable snapshot of a session, mirroring the form fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub state: SessionState,
    pub selected: Vec<String>,
    pub selected_display: String,
    pub result: String,
    pub confidence: String,
    pub risk_explanation: String,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            selection: Vec::new(),
            outcome: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn outcome(&self) -> Option<&PredictionView> {
        self.outcome.as_ref()
    }

    /// Comma separated echo of the current selection.
    pub fn selection_display(&self) -> String {
        self.selection.join(", ")
    }

    /// Replace the selection. Two or more drugs land on `Ready` in one step,
    /// fewer leave the session awaiting selection. The previous outcome stays
    /// visible until the next submit or clear.
    pub fn select(&mut self, drugs: Vec<String>) {
        self.selection = drugs;
        self.state = if self.selection.len() >= MIN_SELECTION {
            SessionState::Ready
        } else {
            SessionState::AwaitingSelection
        };
        debug!(state = ?self.state, selected = self.selection.len(), "selection changed");
    }

    /// Run a prediction for the current selection.
    pub fn submit(&mut self, predictor: &Predictor) -> &PredictionView {
        let ready = self.selection.len() >= MIN_SELECTION;
        if ready {
            self.state = SessionState::Predicting;
        }
        let outcome = predictor.predict(self.selection.as_slice());
        if let Err(err) = &outcome {
            report_failure(err);
        }
        self.state = match (&outcome, ready) {
            (Ok(_), _) => SessionState::Result,
            (Err(_), false) => SessionState::AwaitingSelection,
            (Err(_), true) => SessionState::Error,
        };
        self.outcome.insert(PredictionView::from_outcome(&outcome))
    }

    /// Reset every field and return to idle.
    pub fn clear(&mut self) {
        self.selection.clear();
        self.outcome = None;
        self.state = SessionState::Idle;
    }

    pub fn view(&self) -> SessionView {
        let (result, confidence, risk_explanation) = match &self.outcome {
            Some(view) => (
                view.result.clone(),
                view.confidence.clone(),
                view.risk_explanation.clone(),
            ),
            None => Default::default(),
        };
        SessionView {
            state: self.state,
            selected: self.selection.clone(),
            selected_display: self.selection_display(),
            result,
            confidence,
            risk_explanation,
        }
    }
}

/// Opaque handle naming one session.
pub type SessionId = String;

/// Default idle time after which a session is dropped.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);
/// Default upper bound on live sessions.
pub const DEFAULT_SESSION_CAPACITY: usize = 1024;

/// How long sessions live and how many may exist at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    /// Idle time after which a session expires.
    pub ttl: Duration,
    /// Live sessions kept before the least recently used one is evicted.
    pub capacity: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_SESSION_TTL,
            capacity: DEFAULT_SESSION_CAPACITY,
        }
    }
}

#[derive(Debug)]
struct Entry {
    session: Arc<Mutex<Session>>,
    touched: Instant,
    // Recency order for eviction.
    tick: u64,
}

impl Entry {
    fn expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.touched) >= ttl
    }
}

/// Sessions keyed by random ids. Each session has its own lock so a slow
/// prediction in one session never blocks another. Idle sessions expire
/// after [`SessionLimits::ttl`] and the least recently used session is
/// evicted once [`SessionLimits::capacity`] is reached.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Entry>>,
    limits: SessionLimits,
    clock: AtomicU64,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_limits(SessionLimits::default())
    }

    pub fn with_limits(limits: SessionLimits) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            limits: SessionLimits {
                capacity: limits.capacity.max(1),
                ..limits
            },
            clock: AtomicU64::new(0),
        }
    }

    pub fn limits(&self) -> SessionLimits {
        self.limits
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    /// Open a fresh idle session, making room first if the store is full.
    pub async fn create(&self) -> (SessionId, SessionView) {
        let id = format!("{:032x}", rand::random::<u128>());
        let session = Session::new();
        let view = session.view();
        let now = Instant::now();

        let mut sessions = self.sessions.write().await;
        let expired = purge(&mut sessions, now, self.limits.ttl);
        if expired > 0 {
            debug!(expired, "dropped idle sessions");
        }
        while sessions.len() >= self.limits.capacity {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.tick)
                .map(|(key, _)| key.clone())
            else {
                break;
            };
            sessions.remove(&oldest);
            info!(session = %oldest, "session evicted at capacity");
        }
        sessions.insert(
            id.clone(),
            Entry {
                session: Arc::new(Mutex::new(session)),
                touched: now,
                tick: self.tick(),
            },
        );
        info!(session = %id, live = sessions.len(), "session opened");
        (id, view)
    }

    /// Look up a live session and mark it as used. Expired sessions are
    /// dropped on the way.
    pub async fn get(&self, id: &str) -> Option<Arc<Mutex<Session>>> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let expired = sessions.get(id)?.expired(now, self.limits.ttl);
        if expired {
            sessions.remove(id);
            info!(session = %id, "session expired");
            return None;
        }
        let tick = self.tick();
        let entry = sessions.get_mut(id)?;
        entry.touched = now;
        entry.tick = tick;
        Some(entry.session.clone())
    }

    /// Drop a session; returns whether it existed.
    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            info!(session = %id, "session closed");
        }
        removed
    }

    /// Drop every session idle for longer than the ttl; returns how many went.
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let expired = purge(&mut sessions, Instant::now(), self.limits.ttl);
        if expired > 0 {
            info!(expired, live = sessions.len(), "dropped idle sessions");
        }
        expired
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

fn purge(sessions: &mut HashMap<SessionId, Entry>, now: Instant, ttl: Duration) -> usize {
    let before = sessions.len();
    sessions.retain(|_, entry| !entry.expired(now, ttl));
    before - sessions.len()
}
