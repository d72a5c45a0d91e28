//! Hand-off of an in-flight drag from the task list to the timeline.
//!
//! [`DragCoordinator`] owns the single drag session and broadcasts typed
//! [`DragEvent`]s to subscribers over channels. Only one session exists at
//! a time and every terminal event clears it.

use std::sync::mpsc::{Receiver, Sender, channel};

use super::Point;

/// What is being dragged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub todo_id: String,
    pub subject_id: String,
    pub color: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    Started { payload: DragPayload, at: Point },
    Moved { at: Point },
    Dropped { payload: DragPayload, at: Point },
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub payload: DragPayload,
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DragError {
    #[error("a drag session is already active")]
    SessionActive,
    #[error("no drag session is active")]
    NoSession,
}

#[derive(Debug, Default)]
pub struct DragCoordinator {
    session: Option<DragSession>,
    subscribers: Vec<Sender<DragEvent>>,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive every event published from now on
    pub fn subscribe(&mut self) -> Receiver<DragEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn start(&mut self, payload: DragPayload, at: Point) -> Result<(), DragError> {
        if self.session.is_some() {
            return Err(DragError::SessionActive);
        }
        tracing::debug!(todo = %payload.todo_id, "drag started");
        self.session = Some(DragSession {
            payload: payload.clone(),
            position: at,
        });
        self.publish(DragEvent::Started { payload, at });
        Ok(())
    }

    pub fn move_to(&mut self, at: Point) -> Result<(), DragError> {
        let session = self.session.as_mut().ok_or(DragError::NoSession)?;
        session.position = at;
        self.publish(DragEvent::Moved { at });
        Ok(())
    }

    /// Finish the session at `at`. The session is cleared before subscribers
    /// see the drop.
    pub fn drop_at(&mut self, at: Point) -> Result<DragPayload, DragError> {
        let session = self.session.take().ok_or(DragError::NoSession)?;
        tracing::debug!(todo = %session.payload.todo_id, x = at.x, y = at.y, "drag dropped");
        self.publish(DragEvent::Dropped {
            payload: session.payload.clone(),
            at,
        });
        Ok(session.payload)
    }

    /// Abandon any active session. No-op when idle.
    pub fn cancel(&mut self) {
        if self.session.take().is_some() {
            tracing::debug!("drag cancelled");
            self.publish(DragEvent::Cancelled);
        }
    }

    fn publish(&mut self, event: DragEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl Drop for DragCoordinator {
    fn drop(&mut self) {
        self.cancel();
    }
}
