//! Clock-driven stand-in for a skeletal animation mixer.
//!
//! Advances clip times from the frame delta and reports which subscribed
//! clips finished, so the locomotion machine sees the same events a real
//! mixer would raise.

use std::collections::{HashMap, HashSet};

use skyrunner_game::{AnimationPlayer, ClipHandle, LoopMode};

#[derive(Debug, Clone)]
struct ClipTrack {
    duration: f32,
    time: f32,
    loop_mode: LoopMode,
    loops_done: u32,
    playing: bool,
}

impl ClipTrack {
    fn new(duration: f32) -> Self {
        Self {
            duration,
            time: 0.0,
            loop_mode: LoopMode::Forever,
            loops_done: 0,
            playing: false,
        }
    }

    /// Advance by `delta` seconds. Returns `true` when the clip ran out.
    fn advance(&mut self, delta: f32) -> bool {
        if !self.playing || self.duration <= 0.0 {
            return false;
        }

        self.time += delta;
        while self.time >= self.duration {
            match self.loop_mode {
                LoopMode::Forever => self.time -= self.duration,
                LoopMode::Once => return self.finish(),
                LoopMode::Repeat(count) => {
                    self.loops_done += 1;
                    if self.loops_done >= count {
                        return self.finish();
                    }
                    self.time -= self.duration;
                }
            }
        }
        false
    }

    fn finish(&mut self) -> bool {
        self.time = self.duration;
        self.playing = false;
        true
    }
}

#[derive(Debug)]
pub struct ClockAnimator {
    tracks: HashMap<ClipHandle, ClipTrack>,
    subscribed: HashSet<ClipHandle>,
    rate: f32,
}

impl ClockAnimator {
    pub fn new(durations: impl IntoIterator<Item = (ClipHandle, f32)>) -> Self {
        Self {
            tracks: durations
                .into_iter()
                .map(|(clip, duration)| (clip, ClipTrack::new(duration)))
                .collect(),
            subscribed: HashSet::new(),
            rate: 1.0,
        }
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Advance all playing clips and collect finished events for subscribers.
    pub fn advance(&mut self, delta_time: f32) -> Vec<ClipHandle> {
        let scaled = delta_time * self.rate;
        let mut finished: Vec<ClipHandle> = self
            .tracks
            .iter_mut()
            .filter_map(|(clip, track)| track.advance(scaled).then_some(*clip))
            .filter(|clip| self.subscribed.contains(clip))
            .collect();
        finished.sort_by_key(|clip| clip.0);
        finished
    }

    fn track(&mut self, clip: ClipHandle) -> Option<&mut ClipTrack> {
        let track = self.tracks.get_mut(&clip);
        if track.is_none() {
            log::warn!("no clip loaded for handle {}", clip.0);
        }
        track
    }
}

impl Default for ClockAnimator {
    fn default() -> Self {
        Self::new(std::iter::empty())
    }
}

impl AnimationPlayer for ClockAnimator {
    fn play(&mut self, clip: ClipHandle) {
        if let Some(track) = self.track(clip) {
            if !track.playing && track.time >= track.duration {
                track.time = 0.0;
                track.loops_done = 0;
            }
            track.playing = true;
        }
    }

    fn crossfade(&mut self, from: ClipHandle, to: ClipHandle, duration: f32) {
        log::trace!("crossfade {} -> {} over {duration}s", from.0, to.0);
        if from != to {
            if let Some(track) = self.track(from) {
                track.playing = false;
            }
        }
    }

    fn set_loop(&mut self, clip: ClipHandle, mode: LoopMode) {
        if let Some(track) = self.track(clip) {
            track.loop_mode = mode;
            track.loops_done = 0;
        }
    }

    fn time(&self, clip: ClipHandle) -> f32 {
        self.tracks.get(&clip).map_or(0.0, |track| track.time)
    }

    fn set_time(&mut self, clip: ClipHandle, time: f32) {
        if let Some(track) = self.track(clip) {
            track.time = time.clamp(0.0, track.duration);
        }
    }

    fn duration(&self, clip: ClipHandle) -> f32 {
        self.tracks.get(&clip).map_or(0.0, |track| track.duration)
    }

    fn set_playback_rate(&mut self, rate: f32) {
        self.rate = rate;
    }

    fn subscribe_finished(&mut self, clip: ClipHandle) {
        self.subscribed.insert(clip);
    }

    fn unsubscribe_finished(&mut self, clip: ClipHandle) {
        self.subscribed.remove(&clip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animator() -> ClockAnimator {
        ClockAnimator::new([(ClipHandle(0), 1.0), (ClipHandle(1), 0.5)])
    }

    #[test]
    fn test_default_plays_at_normal_rate() {
        let animator = ClockAnimator::default();
        assert_eq!(animator.rate(), 1.0);
    }

    #[test]
    fn test_once_clip_finishes() {
        let mut animator = animator();
        animator.set_loop(ClipHandle(1), LoopMode::Once);
        animator.subscribe_finished(ClipHandle(1));
        animator.play(ClipHandle(1));

        assert!(animator.advance(0.3).is_empty());
        assert_eq!(animator.advance(0.3), vec![ClipHandle(1)]);
        assert!(animator.advance(0.3).is_empty());
    }

    #[test]
    fn test_unsubscribed_clip_is_silent() {
        let mut animator = animator();
        animator.set_loop(ClipHandle(1), LoopMode::Once);
        animator.play(ClipHandle(1));

        assert!(animator.advance(1.0).is_empty());
    }

    #[test]
    fn test_repeat_counts_loops() {
        let mut animator = animator();
        animator.set_loop(ClipHandle(0), LoopMode::Repeat(3));
        animator.subscribe_finished(ClipHandle(0));
        animator.play(ClipHandle(0));

        assert!(animator.advance(2.5).is_empty());
        assert_eq!(animator.advance(0.5), vec![ClipHandle(0)]);
    }

    #[test]
    fn test_forever_wraps() {
        let mut animator = animator();
        animator.subscribe_finished(ClipHandle(0));
        animator.play(ClipHandle(0));

        assert!(animator.advance(3.25).is_empty());
        assert!((animator.time(ClipHandle(0)) - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_playback_rate_scales_time() {
        let mut animator = animator();
        animator.set_loop(ClipHandle(1), LoopMode::Once);
        animator.subscribe_finished(ClipHandle(1));
        animator.play(ClipHandle(1));
        animator.set_playback_rate(0.5);

        assert!(animator.advance(0.8).is_empty());
        assert_eq!(animator.advance(0.3), vec![ClipHandle(1)]);
    }

    #[test]
    fn test_play_keeps_synced_time() {
        let mut animator = animator();
        animator.set_time(ClipHandle(0), 0.4);
        animator.play(ClipHandle(0));
        assert_eq!(animator.time(ClipHandle(0)), 0.4);
    }

    #[test]
    fn test_replay_after_finish_restarts() {
        let mut animator = animator();
        animator.set_loop(ClipHandle(1), LoopMode::Once);
        animator.subscribe_finished(ClipHandle(1));
        animator.play(ClipHandle(1));
        assert_eq!(animator.advance(1.0), vec![ClipHandle(1)]);

        animator.play(ClipHandle(1));
        assert_eq!(animator.time(ClipHandle(1)), 0.0);
        assert_eq!(animator.advance(0.6), vec![ClipHandle(1)]);
    }
}
