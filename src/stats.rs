//! Best-score persistence bridge
//!
//! Two scalar counters in LocalStorage, stored as plain integer strings
//! under the keys the original web build used. Storage being unavailable or
//! corrupt is never fatal: the game just plays without history.

/// Lifetime stats persisted across sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameStats {
    pub best_score: u32,
    /// Number of times a new best was set
    pub total_cleaned: u32,
}

impl GameStats {
    #[allow(dead_code)]
    const KEY_BEST_SCORE: &'static str = "cosmicCleanerBestScore";
    #[allow(dead_code)]
    const KEY_TOTAL_CLEANED: &'static str = "cosmicCleanerTotalCleaned";

    /// Compare-and-set write-through
    ///
    /// If `score` beats the stored best, store it, bump the session counter,
    /// and save. Returns whether a new best was set.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.best_score {
            return false;
        }
        self.best_score = score;
        self.total_cleaned += 1;
        self.save();
        true
    }

    /// Load stats from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let Some(storage) = storage else {
            log::warn!("LocalStorage unavailable, playing without history");
            return Self::default();
        };

        let read = |key: &str| {
            storage
                .get_item(key)
                .ok()
                .flatten()
                .and_then(|s| s.parse::<u32>().ok())
                .unwrap_or(0)
        };
        let stats = Self {
            best_score: read(Self::KEY_BEST_SCORE),
            total_cleaned: read(Self::KEY_TOTAL_CLEANED),
        };
        log::info!(
            "loaded stats: best {} over {} cleaned sessions",
            stats.best_score,
            stats.total_cleaned
        );
        stats
    }

    /// Save stats to LocalStorage (WASM only); failures are logged and dropped
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let best = self.best_score.to_string();
            let cleaned = self.total_cleaned.to_string();
            if storage.set_item(Self::KEY_BEST_SCORE, &best).is_err()
                || storage.set_item(Self::KEY_TOTAL_CLEANED, &cleaned).is_err()
            {
                log::warn!("failed to save stats");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
