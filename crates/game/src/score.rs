//! Score keeping.
//!
//! The score rewards track progress and survival time:
//! `(segments - offset) * multiplier + whole alive-time units`. Alive time
//! starts counting after a short delay and stops for good once the runner falls.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// No score is shown until more than this many segments exist.
    pub segment_offset: u32,
    pub segment_multiplier: u32,
    /// Alive time starts counting this long after the run begins.
    pub alive_time_delay: f32,
    /// Seconds per alive-time point.
    pub alive_time_unit: f32,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            segment_offset: 6,
            segment_multiplier: 100,
            alive_time_delay: 1.4,
            alive_time_unit: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScoreKeeper {
    config: ScoreConfig,
    since_start: f32,
    frozen: bool,
}

impl ScoreKeeper {
    pub fn new(config: ScoreConfig) -> Self {
        Self {
            config,
            since_start: 0.0,
            frozen: false,
        }
    }

    pub fn tick(&mut self, delta_time: f32) {
        if !self.frozen {
            self.since_start += delta_time;
        }
    }

    /// Stop the alive clock. Stays stopped until [`reset`](Self::reset).
    pub fn freeze(&mut self) {
        if !self.frozen {
            log::debug!("score frozen at {:.1}s alive", self.alive_time());
        }
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Seconds counted towards the score.
    pub fn alive_time(&self) -> f32 {
        (self.since_start - self.config.alive_time_delay).max(0.0)
    }

    /// Current score for a track of `path_count` created segments, if shown yet.
    pub fn score(&self, path_count: u32) -> Option<u32> {
        let progress = path_count.checked_sub(self.config.segment_offset)?;
        if progress == 0 {
            return None;
        }

        let alive_points = (self.alive_time() / self.config.alive_time_unit).floor() as u32;
        Some(progress * self.config.segment_multiplier + alive_points)
    }

    pub fn reset(&mut self) {
        self.since_start = 0.0;
        self.frozen = false;
    }
}

impl Default for ScoreKeeper {
    fn default() -> Self {
        Self::new(ScoreConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_during_warmup() {
        let keeper = ScoreKeeper::default();
        assert_eq!(keeper.score(1), None);
        assert_eq!(keeper.score(6), None);
        assert_eq!(keeper.score(7), Some(100));
    }

    #[test]
    fn test_alive_time_after_delay() {
        let mut keeper = ScoreKeeper::default();
        keeper.tick(1.0);
        assert_eq!(keeper.alive_time(), 0.0);

        keeper.tick(1.0);
        assert_eq!(keeper.score(8), Some(206));
    }

    #[test]
    fn test_frozen_on_fall() {
        let mut keeper = ScoreKeeper::default();
        keeper.tick(2.4);
        keeper.freeze();
        let frozen = keeper.score(10);

        keeper.tick(5.0);
        assert_eq!(keeper.score(10), frozen);

        keeper.reset();
        assert!(!keeper.is_frozen());
        assert_eq!(keeper.score(10), Some(400));
    }
}
