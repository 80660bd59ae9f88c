//! Reader controller
//!
//! Runs the session on tokio. The session and the single outstanding timer
//! handle live behind one async mutex, so a firing tick observes exactly the
//! state left by the last command. Effects are executed while the lock is
//! held:
//! - timers are single-shot tasks; scheduling aborts the previous one
//! - persistence goes to an ordered background worker and never blocks a tick
//! - notifications and state changes are broadcast on [`SharedState`]

use crate::document::{Blacklist, DocumentSummary};
use crate::error::{Error, Result};
use crate::playback::{Effect, PlaybackSnapshot, TickToken, Transition};
use crate::render::{render_snapshot, Frame};
use crate::session::Session;
use crate::state::SharedState;
use rsvp_common::clipboard::ClipboardSource;
use rsvp_common::config::ReaderSettings;
use rsvp_common::db::settings;
use rsvp_common::events::{NotificationStyle, ReaderEvent};
use rsvp_common::Wpm;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Writes handed to the persistence worker
#[derive(Debug)]
enum PersistRequest {
    Speed(Wpm),
    Blacklist(Vec<String>),
    /// Acknowledged once every earlier request is done
    Flush(oneshot::Sender<()>),
}

struct Inner {
    session: Session,
    timer: Option<JoinHandle<()>>,
}

/// Handle to the running reader; cheap to clone
#[derive(Clone)]
pub struct ReaderController {
    inner: Arc<Mutex<Inner>>,
    state: Arc<SharedState>,
    clipboard: Arc<dyn ClipboardSource>,
    persist_tx: mpsc::UnboundedSender<PersistRequest>,
}

impl ReaderController {
    /// Load persisted settings and clipboard history, then start the session
    ///
    /// Never fails: unreadable storage or clipboard degrade to defaults and an
    /// empty document set, reported as a failure notification.
    pub async fn start(
        db: SqlitePool,
        clipboard: Arc<dyn ClipboardSource>,
        state: Arc<SharedState>,
        reader_settings: &ReaderSettings,
    ) -> Self {
        info!("Starting reader session");

        let blacklist = match settings::load_blacklist(&db).await {
            Ok(texts) => Blacklist::new(texts),
            Err(e) => {
                warn!("Failed to load blacklist: {}", e);
                Blacklist::default()
            }
        };

        let wpm = match settings::load_speed(&db, reader_settings.default_wpm).await {
            Ok(wpm) => wpm,
            Err(e) => {
                warn!("Failed to load saved speed: {}", e);
                reader_settings.default_wpm
            }
        };

        let source = Arc::clone(&clipboard);
        let depth = reader_settings.clipboard_scan_depth;
        let read = tokio::task::spawn_blocking(move || source.read_entries(depth))
            .await
            .unwrap_or_else(|e| Err(clipboard_task_failed(e)));
        let entries = match read {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to read clipboard: {}", e);
                state.broadcast_event(ReaderEvent::notification(
                    NotificationStyle::Failure,
                    "Failed to read clipboard",
                    Some(e.to_string()),
                ));
                Vec::new()
            }
        };

        let (session, transition) =
            Session::start(entries, blacklist, wpm, reader_settings.min_words);
        let count = session.documents().len();

        let persist_tx = spawn_persistence_worker(db, Arc::clone(&state));
        let controller = Self {
            inner: Arc::new(Mutex::new(Inner {
                session,
                timer: None,
            })),
            state,
            clipboard,
            persist_tx,
        };

        {
            let mut inner = controller.inner.lock().await;
            controller.apply(&mut inner, transition);
        }

        controller.state.broadcast_event(ReaderEvent::DocumentsLoaded {
            count,
            timestamp: chrono::Utc::now(),
        });
        info!("Reader session started at {} with {} documents", wpm, count);

        controller
    }

    pub fn shared_state(&self) -> Arc<SharedState> {
        Arc::clone(&self.state)
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.state.current_snapshot()
    }

    /// Frame for the latest snapshot
    pub fn frame(&self) -> Frame {
        render_snapshot(&self.state.current_snapshot())
    }

    /// Rows for the document list, in session order
    pub async fn documents(&self) -> Vec<DocumentSummary> {
        let inner = self.inner.lock().await;
        let selected = inner.session.selected_id();
        inner
            .session
            .documents()
            .iter()
            .map(|d| DocumentSummary::new(d, Some(d.id()) == selected))
            .collect()
    }

    pub async fn toggle(&self) -> PlaybackSnapshot {
        self.run(|session| session.toggle()).await
    }

    pub async fn play(&self) -> PlaybackSnapshot {
        self.run(|session| session.play()).await
    }

    pub async fn pause(&self) -> PlaybackSnapshot {
        self.run(|session| session.pause()).await
    }

    pub async fn restart(&self) -> PlaybackSnapshot {
        self.run(|session| session.restart()).await
    }

    /// Select a document; unknown ids change nothing
    pub async fn select(&self, id: Uuid) -> Result<PlaybackSnapshot> {
        let mut inner = self.inner.lock().await;
        match inner.session.select(id) {
            Some(transition) => Ok(self.apply(&mut inner, transition)),
            None => Err(Error::DocumentNotFound(id)),
        }
    }

    /// Change speed; `wpm` must be on the speed menu
    pub async fn set_speed(&self, wpm: u32) -> Result<PlaybackSnapshot> {
        let wpm = Wpm::new(wpm).map_err(|_| Error::InvalidSpeed(wpm))?;
        Ok(self.run(|session| session.set_speed(wpm)).await)
    }

    /// Delete a document and blacklist its text
    pub async fn delete(&self, id: Uuid) -> Result<PlaybackSnapshot> {
        let mut inner = self.inner.lock().await;
        let transition = inner.session.delete(id)?;
        self.state.broadcast_event(ReaderEvent::DocumentDeleted {
            document_id: id,
            timestamp: chrono::Utc::now(),
        });
        Ok(self.apply(&mut inner, transition))
    }

    /// Put a document's text back on the clipboard
    pub async fn copy(&self, id: Uuid) -> Result<()> {
        let text = {
            let inner = self.inner.lock().await;
            inner.session.document_text(id)?.to_string()
        };

        let target = Arc::clone(&self.clipboard);
        let written = tokio::task::spawn_blocking(move || target.write_text(&text))
            .await
            .unwrap_or_else(|e| Err(clipboard_task_failed(e)));
        match written {
            Ok(()) => {
                self.state.broadcast_event(ReaderEvent::notification(
                    NotificationStyle::Success,
                    "Copied to Clipboard",
                    None,
                ));
                Ok(())
            }
            Err(e) => {
                warn!("Failed to copy document {}: {}", id, e);
                self.state.broadcast_event(ReaderEvent::notification(
                    NotificationStyle::Failure,
                    "Failed to copy",
                    Some(e.to_string()),
                ));
                Err(e.into())
            }
        }
    }

    /// Wait until every queued settings write has been attempted
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.persist_tx.send(PersistRequest::Flush(tx)).is_ok() {
            let _ = rx.await;
        }
    }

    /// Stop the timer and drain pending writes
    pub async fn shutdown(&self) {
        {
            let mut inner = self.inner.lock().await;
            if let Some(timer) = inner.timer.take() {
                timer.abort();
            }
        }
        self.flush().await;
        info!("Reader controller stopped");
    }

    async fn run<F>(&self, command: F) -> PlaybackSnapshot
    where
        F: FnOnce(&mut Session) -> Transition,
    {
        let mut inner = self.inner.lock().await;
        let transition = command(&mut inner.session);
        self.apply(&mut inner, transition)
    }

    async fn fire_tick(&self, token: TickToken) {
        let mut inner = self.inner.lock().await;
        let Some(transition) = inner.session.tick(token) else {
            return;
        };
        // This task is the current timer; release its own handle
        inner.timer = None;
        self.apply(&mut inner, transition);
    }

    /// Execute a transition's effects and publish its snapshot
    fn apply(&self, inner: &mut Inner, transition: Transition) -> PlaybackSnapshot {
        for effect in transition.effects {
            match effect {
                Effect::CancelTick => {
                    if let Some(timer) = inner.timer.take() {
                        timer.abort();
                    }
                }
                Effect::ScheduleTick { token, delay } => {
                    if let Some(timer) = inner.timer.take() {
                        timer.abort();
                    }
                    let controller = self.clone();
                    inner.timer = Some(tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        controller.fire_tick(token).await;
                    }));
                }
                Effect::PersistSpeed(wpm) => self.persist(PersistRequest::Speed(wpm)),
                Effect::PersistBlacklist(texts) => {
                    self.persist(PersistRequest::Blacklist(texts))
                }
                Effect::Notify {
                    style,
                    title,
                    message,
                } => self
                    .state
                    .broadcast_event(ReaderEvent::notification(style, title, message)),
            }
        }

        self.publish(transition.snapshot)
    }

    fn persist(&self, request: PersistRequest) {
        if self.persist_tx.send(request).is_err() {
            warn!("Persistence worker is gone; settings change not saved");
        }
    }

    fn publish(&self, snapshot: PlaybackSnapshot) -> PlaybackSnapshot {
        let previous = self.state.publish_snapshot(snapshot.clone());
        let now = chrono::Utc::now();

        if previous.document_id != snapshot.document_id {
            self.state.broadcast_event(ReaderEvent::DocumentSelected {
                document_id: snapshot.document_id,
                timestamp: now,
            });
        }
        if previous.state != snapshot.state {
            debug!("Playback state: {} -> {}", previous.state, snapshot.state);
            self.state.broadcast_event(ReaderEvent::PlaybackStateChanged {
                old_state: previous.state,
                new_state: snapshot.state,
                timestamp: now,
            });
        }
        if previous.wpm != snapshot.wpm {
            self.state.broadcast_event(ReaderEvent::SpeedChanged {
                wpm: snapshot.wpm,
                timestamp: now,
            });
        }

        snapshot
    }
}

/// Background task applying settings writes in order
///
/// Failures are reported as notifications; the in-memory state is never
/// rolled back.
fn spawn_persistence_worker(
    db: SqlitePool,
    state: Arc<SharedState>,
) -> mpsc::UnboundedSender<PersistRequest> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Some(request) = rx.recv().await {
            let result = match request {
                PersistRequest::Speed(wpm) => settings::save_speed(&db, wpm).await,
                PersistRequest::Blacklist(texts) => settings::save_blacklist(&db, &texts).await,
                PersistRequest::Flush(ack) => {
                    let _ = ack.send(());
                    continue;
                }
            };

            if let Err(e) = result {
                warn!("Failed to save settings: {}", e);
                state.broadcast_event(ReaderEvent::notification(
                    NotificationStyle::Failure,
                    "Failed to save",
                    Some(e.to_string()),
                ));
            }
        }
        debug!("Persistence worker stopped");
    });

    tx
}

fn clipboard_task_failed(e: tokio::task::JoinError) -> rsvp_common::Error {
    rsvp_common::Error::Clipboard(format!("Clipboard task failed: {}", e))
}
