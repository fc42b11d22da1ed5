use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// Hands out one token per navigation. Only the newest one is current.
#[derive(Debug, Clone, Default)]
pub struct NavigationTokens {
    generation: Arc<AtomicU64>,
}

impl NavigationTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a navigation, superseding every token handed out before
    pub fn begin(&self) -> NavigationToken {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        NavigationToken {
            generation,
            current: self.generation.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NavigationToken {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl NavigationToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }
}
