use std::sync::Arc;

use super::{
    clock::{Clock, SystemClock},
    config::Config,
    presence::PresenceStore,
};

/// Built once at startup and shared with every handler.
pub struct State {
    pub config: Config,
    pub presence: PresenceStore,
    pub clock: Arc<dyn Clock>,
}

impl State {
    pub fn new(config: Config) -> Arc<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Arc<Self> {
        Arc::new(Self {
            config,
            presence: PresenceStore::new(),
            clock,
        })
    }

    pub fn now(&self) -> i64 {
        self.clock.now_millis()
    }
}
