use std::sync::atomic::{AtomicBool, Ordering};

/// Whether a signed-in session currently exists
///
/// Consulted by the boundary functions before any mutation reaches the
/// engine; the engine itself performs no authentication.
pub trait SessionGate: Send + Sync {
    fn is_active(&self) -> bool;
}

/// A session flag toggled explicitly by the host
#[derive(Debug, Default)]
pub struct StaticSession {
    active: AtomicBool,
}

impl StaticSession {
    pub fn new(active: bool) -> Self {
        Self {
            active: AtomicBool::new(active),
        }
    }

    pub fn sign_in(&self) {
        self.active.store(true, Ordering::SeqCst);
    }

    pub fn sign_out(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

impl SessionGate for StaticSession {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}
