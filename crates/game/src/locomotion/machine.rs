//! The locomotion state machine container.

use serde::{Deserialize, Serialize};

use super::animation::{AnimationPlayer, AnimationSet, ClipHandle, LoopMode};
use super::state::{LocomotionState, StateContext, StateName};
use super::LocomotionConfig;

/// A completed state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: Option<StateName>,
    pub to: StateName,
}

impl Transition {
    #[inline]
    pub fn left(&self, state: StateName) -> bool {
        self.from == Some(state)
    }

    #[inline]
    pub fn entered(&self, state: StateName) -> bool {
        self.to == state
    }
}

/// Holds the single active [`LocomotionState`] and drives clip playback.
///
/// There is no current state until the first [`set_state`](Self::set_state);
/// until then [`update`](Self::update) does nothing.
#[derive(Debug, Clone)]
pub struct LocomotionMachine {
    config: LocomotionConfig,
    animations: AnimationSet,
    current: Option<LocomotionState>,

    /// Clip whose "finished" event we are listening for.
    subscription: Option<ClipHandle>,
}

impl LocomotionMachine {
    pub fn new(config: LocomotionConfig, animations: AnimationSet) -> Self {
        Self {
            config,
            animations,
            current: None,
            subscription: None,
        }
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn current(&self) -> Option<&LocomotionState> {
        self.current.as_ref()
    }

    pub fn current_name(&self) -> Option<StateName> {
        self.current.as_ref().map(LocomotionState::name)
    }

    #[inline]
    pub fn is_in(&self, state: StateName) -> bool {
        self.current_name() == Some(state)
    }

    pub fn subscription(&self) -> Option<ClipHandle> {
        self.subscription
    }

    /// Global animation rate the active state asks for.
    pub fn playback_rate(&self) -> f32 {
        if self.is_in(StateName::Dance) {
            self.config.dance_playback_rate
        } else {
            1.0
        }
    }

    /// Switch to `name`.
    ///
    /// Re-entering the active state is a no-op and returns `None`. Otherwise
    /// the old state exits before the new one is built and entered.
    pub fn set_state(
        &mut self,
        name: StateName,
        player: &mut dyn AnimationPlayer,
    ) -> Option<Transition> {
        let previous = self.current_name();
        if previous == Some(name) {
            return None;
        }

        if previous.is_some() {
            self.exit(player);
        }

        let state = LocomotionState::fresh(name, previous, &self.config);
        self.enter(name, previous, player);
        self.current = Some(state);

        log::debug!(
            "locomotion {} -> {}",
            previous.map_or("none", StateName::as_str),
            name
        );
        Some(Transition { from: previous, to: name })
    }

    /// Enter `name` with fresh sub-state timers, even if it is already active.
    ///
    /// Used when a run starts over. Returns the transition only when the
    /// state actually changed.
    pub fn restart(
        &mut self,
        name: StateName,
        player: &mut dyn AnimationPlayer,
    ) -> Option<Transition> {
        if self.current_name() != Some(name) {
            return self.set_state(name, player);
        }

        self.current = Some(LocomotionState::fresh(name, None, &self.config));
        log::debug!("locomotion {} restarted", name);
        None
    }

    /// Advance the active state.
    pub fn update(
        &mut self,
        delta_time: f32,
        context: &StateContext,
        player: &mut dyn AnimationPlayer,
    ) -> Option<Transition> {
        let state = self.current.as_mut()?;
        let next = state.update(delta_time, context, &self.config)?;
        self.set_state(next, player)
    }

    /// Honor a pending jump request if the active state allows it.
    ///
    /// `cooldown_ready` is the caller's jump cooldown check. Returns the
    /// transition when the jump was taken; the caller then consumes the request.
    pub fn try_jump(
        &mut self,
        cooldown_ready: bool,
        player: &mut dyn AnimationPlayer,
    ) -> Option<Transition> {
        if !cooldown_ready || !self.current.as_ref()?.accepts_jump() {
            return None;
        }
        self.set_state(StateName::Jump, player)
    }

    /// Deliver a "finished" event from the player.
    pub fn on_animation_finished(
        &mut self,
        clip: ClipHandle,
        player: &mut dyn AnimationPlayer,
    ) -> Option<Transition> {
        if self.subscription != Some(clip) {
            log::warn!("ignoring finished event for unsubscribed clip {:?}", clip);
            return None;
        }

        match self.current_name()? {
            StateName::Jump | StateName::Dance => self.set_state(StateName::Walk, player),
            _ => None,
        }
    }

    // ========================================================================
    // Enter / exit
    // ========================================================================

    fn exit(&mut self, player: &mut dyn AnimationPlayer) {
        if let Some(clip) = self.subscription.take() {
            player.unsubscribe_finished(clip);
        }
    }

    fn enter(
        &mut self,
        name: StateName,
        previous: Option<StateName>,
        player: &mut dyn AnimationPlayer,
    ) {
        let clip = self.animations.clip(name);

        match name {
            StateName::Jump | StateName::Dance => {
                self.subscription = Some(clip);
                player.subscribe_finished(clip);
            }
            StateName::Fall => player.set_loop(clip, LoopMode::Repeat(self.config.fall_loop_repeat)),
            _ => {}
        }

        if matches!(name, StateName::Jump | StateName::Dance) {
            player.set_time(clip, 0.0);
            player.set_loop(clip, LoopMode::Once);
        }

        let Some(previous) = previous else {
            player.play(clip);
            return;
        };
        let previous_clip = self.animations.clip(previous);

        match (previous, name) {
            (StateName::Walk, StateName::Run) | (StateName::Run, StateName::Walk) => {
                // Keep gait phase across the blend
                let previous_duration = player.duration(previous_clip);
                let time = if previous_duration > 0.0 {
                    player.time(previous_clip) * player.duration(clip) / previous_duration
                } else {
                    0.0
                };
                player.set_time(clip, time);
            }
            (_, StateName::Jump | StateName::Dance | StateName::Fall) => {}
            _ => player.set_time(clip, 0.0),
        }

        player.crossfade(previous_clip, clip, self.config.crossfade.for_state(name));
        player.play(clip);
    }
}

// ============================================================================
// Tests
// ============================================================================
