//! Application state management
use parking_lot::RwLock;
use std::sync::Arc;
use wordlog_core::{Config, CoreError, Result, Tracker};

/// Thread-safe application state wrapper
pub struct AppState {
    tracker: Arc<RwLock<Option<Tracker>>>,
}

impl AppState {
    pub fn new() -> Result<Self> {
        let config = Config::load(&Config::data_dir())?;
        Ok(Self::from_tracker(Tracker::new(config)?))
    }

    pub fn from_tracker(tracker: Tracker) -> Self {
        Self {
            tracker: Arc::new(RwLock::new(Some(tracker))),
        }
    }

    pub fn with_tracker<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Tracker) -> Result<T>,
    {
        let guard = self.tracker.read();
        match guard.as_ref() {
            Some(tracker) => f(tracker),
            None => Err(CoreError::NotInitialized),
        }
    }

    /// Owned handle for async commands, which must not hold the lock across
    /// an await point.
    pub fn tracker(&self) -> Result<Tracker> {
        self.with_tracker(|tracker| Ok(tracker.clone()))
    }
}
