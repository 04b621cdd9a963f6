//! Animation playback collaborator.
//!
//! The state machine never blends weights itself. It asks an
//! [`AnimationPlayer`] to start, crossfade and loop clips, and is told when a
//! play-once clip finishes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::StateName;

/// Opaque handle to a clip owned by the animation player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipHandle(pub u32);

/// How a clip repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopMode {
    /// Play once, hold the last frame, then emit "finished".
    Once,
    /// Repeat a fixed number of times, hold the last frame, then emit "finished".
    Repeat(u32),
    /// Loop until stopped.
    Forever,
}

/// Errors raised while attaching animations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnimationError {
    #[error("no animation clip bound for state `{0}`")]
    MissingBinding(StateName),
}

/// Playback operations the locomotion machine needs from the host.
pub trait AnimationPlayer {
    /// Start a clip at full weight.
    fn play(&mut self, clip: ClipHandle);

    /// Blend from one clip into another over `duration` seconds.
    fn crossfade(&mut self, from: ClipHandle, to: ClipHandle, duration: f32);

    fn set_loop(&mut self, clip: ClipHandle, mode: LoopMode);

    /// Current playback position of a clip in seconds.
    fn time(&self, clip: ClipHandle) -> f32;

    fn set_time(&mut self, clip: ClipHandle, time: f32);

    /// Length of a clip in seconds.
    fn duration(&self, clip: ClipHandle) -> f32;

    /// Global playback rate multiplier.
    fn set_playback_rate(&mut self, rate: f32);

    /// Start delivering "finished" for `clip`.
    fn subscribe_finished(&mut self, clip: ClipHandle);

    fn unsubscribe_finished(&mut self, clip: ClipHandle);
}

/// One clip per locomotion state. Always complete once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationSet {
    clips: [ClipHandle; StateName::COUNT],
}

impl AnimationSet {
    /// Build a set from `(state, clip)` pairs.
    ///
    /// Later pairs for the same state replace earlier ones. Every state must
    /// be bound.
    pub fn from_bindings<I>(bindings: I) -> Result<Self, AnimationError>
    where
        I: IntoIterator<Item = (StateName, ClipHandle)>,
    {
        let mut slots: [Option<ClipHandle>; StateName::COUNT] = [None; StateName::COUNT];
        for (state, clip) in bindings {
            slots[state.index()] = Some(clip);
        }

        let mut clips = [ClipHandle(0); StateName::COUNT];
        for state in StateName::ALL {
            clips[state.index()] = slots[state.index()].ok_or(AnimationError::MissingBinding(state))?;
        }

        Ok(Self { clips })
    }

    /// Clip bound to a state.
    #[inline]
    pub fn clip(&self, state: StateName) -> ClipHandle {
        self.clips[state.index()]
    }

    /// State a clip is bound to, if any.
    pub fn state_for(&self, clip: ClipHandle) -> Option<StateName> {
        StateName::ALL.into_iter().find(|state| self.clip(*state) == clip)
    }
}
