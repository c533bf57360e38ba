//! # Scripting Types
//!
//! Handle types for Rhai scripting integration.

use crate::editor::EditorSession;
use std::sync::{Arc, Mutex, MutexGuard};

/// Wrapper around `EditorSession` for Rhai scripting.
#[derive(Clone)]
pub struct EditorHandle {
    pub session: Arc<Mutex<EditorSession>>,
}

impl EditorHandle {
    pub fn new(session: EditorSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Locks the session. A panic inside an earlier binding doesn't lock scripts out.
    pub fn lock(&self) -> MutexGuard<'_, EditorSession> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
