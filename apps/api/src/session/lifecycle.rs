//! Loading, persisting and mutating sessions against the snapshot store.
//!
//! Reads never register a session: an unknown or unmutated id is served
//! straight from the store. The first mutation registers the session, after
//! which the registry copy is authoritative until it is evicted as idle or
//! reset. Each mutation writes its snapshot while holding that session's own
//! lock, so snapshots of one session land in mutation order without blocking
//! any other session.

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::ExportInput;
use crate::models::snapshot::PersistedSnapshot;
use crate::persistence::StoreError;
use crate::state::AppState;

use super::registry::{OpenSession, SessionHandle};
use super::{Notice, ResumeSession, SessionError};

pub const LOAD_ERROR_NOTICE: &str = "Data loading error";
pub const SAVE_ERROR_NOTICE: &str = "Save error";

/// Creates a fresh session and persists its initial snapshot.
pub async fn create_session(state: &AppState) -> (ResumeSession, Vec<Notice>) {
    let handle = state
        .sessions
        .insert_if_absent(ResumeSession::new(Uuid::new_v4()))
        .await;
    let mut open = handle.lock().await;
    let mut notices = Vec::new();
    autosave(state, &mut open, &mut notices).await;

    info!(session_id = %open.session.id, "Session created");
    (open.session.clone(), notices)
}

/// Reads the persisted snapshot for `id`.
///
/// A missing snapshot gives an empty session. An unreadable snapshot gives
/// an empty session with a "Data loading error" notice. Store failures are
/// returned as errors.
async fn load_session(
    state: &AppState,
    id: Uuid,
) -> Result<(ResumeSession, Vec<Notice>), AppError> {
    let key = state.config.snapshot_key_for(id);
    let mut notices = Vec::new();
    let session = match state.store.read(&key).await? {
        None => {
            info!(session_id = %id, "No snapshot found, starting empty");
            ResumeSession::new(id)
        }
        Some(payload) => match serde_json::from_str::<PersistedSnapshot>(&payload) {
            Ok(snapshot) => {
                info!(session_id = %id, bytes = payload.len(), "Snapshot loaded");
                ResumeSession::from_snapshot(id, snapshot)
            }
            Err(e) => {
                warn!(session_id = %id, error = %e, "Snapshot is unreadable, using defaults");
                notices.push(Notice::error(LOAD_ERROR_NOTICE));
                ResumeSession::new(id)
            }
        },
    };
    Ok((session, notices))
}

/// Returns the current state of a session without registering it.
pub async fn open_session(
    state: &AppState,
    id: Uuid,
) -> Result<(ResumeSession, Vec<Notice>), AppError> {
    match state.sessions.get(id).await {
        Some(handle) => {
            let mut open = handle.lock().await;
            open.touch();
            Ok((open.session.clone(), Vec::new()))
        }
        None => load_session(state, id).await,
    }
}

/// The registered handle for `id`, loading and registering it if needed.
async fn acquire(state: &AppState, id: Uuid) -> Result<(SessionHandle, Vec<Notice>), AppError> {
    if let Some(handle) = state.sessions.get(id).await {
        return Ok((handle, Vec::new()));
    }
    let (session, notices) = load_session(state, id).await?;
    // A concurrent request may have registered it first; keep its copy.
    Ok((state.sessions.insert_if_absent(session).await, notices))
}

/// Serializes the session and writes it under its key.
pub async fn save_snapshot(state: &AppState, session: &ResumeSession) -> Result<(), StoreError> {
    let payload = serde_json::to_string(&session.to_snapshot())?;
    state
        .store
        .write(&state.config.snapshot_key_for(session.id), &payload)
        .await
}

/// Saves and turns a failure into a notice instead of an error.
async fn autosave(state: &AppState, open: &mut OpenSession, notices: &mut Vec<Notice>) -> bool {
    match save_snapshot(state, &open.session).await {
        Ok(()) => {
            open.unsaved = false;
            true
        }
        Err(e) => {
            error!(session_id = %open.session.id, error = %e, "Snapshot write failed");
            notices.push(Notice::error(SAVE_ERROR_NOTICE));
            open.unsaved = true;
            false
        }
    }
}

/// Outcome of [`mutate`].
pub struct Mutation<R> {
    pub value: R,
    pub session: ResumeSession,
    pub notices: Vec<Notice>,
    pub saved: bool,
}

/// Applies `f` under the session's lock and autosaves before releasing it.
///
/// When `f` fails nothing is written and the error is returned.
pub async fn mutate<R, F>(state: &AppState, id: Uuid, f: F) -> Result<Mutation<R>, AppError>
where
    F: FnOnce(&mut ResumeSession) -> Result<R, SessionError>,
{
    let (handle, mut notices) = acquire(state, id).await?;
    let mut open = handle.lock().await;
    open.touch();

    let value = f(&mut open.session)?;
    let saved = autosave(state, &mut open, &mut notices).await;

    Ok(Mutation {
        value,
        session: open.session.clone(),
        notices,
        saved,
    })
}

/// Writes the current snapshot on request. Failure is reported as a notice.
pub async fn save_session(
    state: &AppState,
    id: Uuid,
) -> Result<(ResumeSession, Vec<Notice>), AppError> {
    let saved = mutate(state, id, |_| Ok(())).await?;
    let mut notices = saved.notices;
    if saved.saved {
        notices.push(Notice::success("Resume saved successfully"));
    }
    Ok((saved.session, notices))
}

/// Deletes the persisted snapshot and unregisters the session. The reset
/// state is not written back.
pub async fn reset_session(
    state: &AppState,
    id: Uuid,
) -> Result<(ResumeSession, Vec<Notice>), AppError> {
    let handle = state.sessions.get(id).await;
    let mut open = match &handle {
        Some(handle) => Some(handle.lock().await),
        None => None,
    };

    state
        .store
        .remove(&state.config.snapshot_key_for(id))
        .await?;

    let session = match open.as_mut() {
        Some(open) => {
            open.session.reset();
            open.session.clone()
        }
        None => ResumeSession::new(id),
    };
    state.sessions.remove(id).await;
    info!(session_id = %id, "Session reset");

    Ok((session, vec![Notice::success("Resume reset successfully")]))
}

/// Copies what an export needs; the export never sees later edits.
pub async fn export_input(state: &AppState, id: Uuid) -> Result<ExportInput, AppError> {
    let (session, _) = open_session(state, id).await?;
    Ok(ExportInput {
        session_id: id,
        record: session.record,
        document: session.document,
    })
}
