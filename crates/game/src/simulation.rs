//! Game simulation - the per-frame step.
//!
//! One [`Simulation::step`] runs per rendered frame, in a fixed order:
//! timers, locomotion update, jump handling, physics integration, ground
//! resolution, path update, camera update, then observer notifications.
//! Until the animation set has been attached the step does nothing.

use serde::{Deserialize, Serialize};
use skyrunner_physics::{
    GroundContext, GroundReport, GroundResolver, Integrator, MotionCommand, MovementConfig,
    SlowMotionEvent,
};

use crate::camera::{CameraConfig, CameraPolicy, CameraRig};
use crate::character::Character;
use crate::hud::{HudSink, SceneSink};
use crate::input::{InputConfig, InputRouter};
use crate::level::{Level, SpawnPlatform};
use crate::locomotion::{
    AnimationPlayer, AnimationSet, ClipHandle, LocomotionConfig, LocomotionMachine,
    StateContext, StateName, Transition,
};
use crate::path::{PathConfig, PathEvent, PathGenerator};
use crate::random::{SeededRandom, TurnSource};
use crate::score::{ScoreConfig, ScoreKeeper};

/// Game configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Movement physics configuration.
    pub movement: MovementConfig,
    pub input: InputConfig,
    pub locomotion: LocomotionConfig,
    pub path: PathConfig,
    pub camera: CameraConfig,
    pub score: ScoreConfig,
    pub platform: SpawnPlatform,

    /// Seed for track turns. `None` seeds from entropy.
    pub seed: Option<u32>,
}

impl GameConfig {
    /// Keyboard play with a locked chase camera.
    pub fn desktop() -> Self {
        Self::default()
    }

    /// Touch play: smoothed camera, quicker turns and no start-of-run jump delay.
    pub fn mobile_friendly() -> Self {
        let mut config = Self::default();
        config.movement.mobile_turn_rate = 0.7;
        config.input.jump_grace_delay = None;
        config.camera.policy = CameraPolicy::Follow;
        config
    }
}

/// Proof that a load was started for a particular run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// What happened during one step.
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    /// Clamped time step actually simulated.
    pub delta_time: f32,
    pub transitions: Vec<Transition>,
    pub ground: GroundReport,
    pub path_events: Vec<PathEvent>,
    pub slow_motion_started: bool,
}

/// The runner simulation.
#[derive(Debug)]
pub struct Simulation {
    /// Current frame/tick number.
    pub frame: u64,

    pub config: GameConfig,
    pub character: Character,
    pub input: InputRouter,
    pub level: Level,
    pub path: PathGenerator,
    pub camera: CameraRig,
    pub score: ScoreKeeper,

    /// Present once the animation set has loaded.
    locomotion: Option<LocomotionMachine>,
    integrator: Integrator,
    ground: GroundResolver,
    turns: Box<dyn TurnSource>,

    /// Bumped by every restart; stale load completions are dropped.
    generation: u64,

    /// Seconds simulated since the run started.
    elapsed: f32,

    /// Path events not yet announced to the scene.
    pending_scene: Vec<PathEvent>,

    applied_rate: f32,
    shown_score: Option<Option<u32>>,
    shown_charge: Option<f32>,
}

impl Simulation {
    /// Create a new simulation with the given configuration.
    pub fn new(config: GameConfig) -> Self {
        let turns: Box<dyn TurnSource> = match config.seed {
            Some(seed) => Box::new(SeededRandom::new(seed)),
            None => Box::new(SeededRandom::from_entropy()),
        };
        Self::with_turn_source(config, turns)
    }

    /// Create a simulation drawing track turns from `turns`.
    pub fn with_turn_source(config: GameConfig, turns: Box<dyn TurnSource>) -> Self {
        let spawn = glam::Vec3::new(0.0, config.movement.spawn_height, 0.0);

        let mut simulation = Self {
            frame: 0,
            character: Character::new(spawn),
            input: InputRouter::new(config.input.clone()),
            level: Level::new(config.platform.clone()),
            path: PathGenerator::new(config.path.clone()),
            camera: CameraRig::new(config.camera.clone()),
            score: ScoreKeeper::new(config.score.clone()),
            locomotion: None,
            integrator: Integrator::new(config.movement.clone()),
            ground: GroundResolver::new(config.movement.clone()),
            turns,
            generation: 0,
            elapsed: 0.0,
            pending_scene: Vec::new(),
            applied_rate: 1.0,
            shown_score: None,
            shown_charge: None,
            config,
        };

        let events = simulation.path.reset();
        apply_path_events(&mut simulation.level, &simulation.config.path, &events);
        simulation.pending_scene = events;

        simulation
    }

    pub fn is_loaded(&self) -> bool {
        self.locomotion.is_some()
    }

    pub fn locomotion(&self) -> Option<&LocomotionMachine> {
        self.locomotion.as_ref()
    }

    pub fn state(&self) -> Option<StateName> {
        self.locomotion.as_ref().and_then(LocomotionMachine::current_name)
    }

    /// Seconds simulated since the run started.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Current score, if shown.
    pub fn current_score(&self) -> Option<u32> {
        self.score.score(self.path.path_count())
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Start an asynchronous animation load for the current run.
    pub fn begin_load(&self) -> LoadTicket {
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Attach the loaded animation set and enter Walk.
    ///
    /// Returns `false` (and changes nothing) if a restart happened since the
    /// ticket was issued.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        animations: AnimationSet,
        player: &mut dyn AnimationPlayer,
    ) -> bool {
        if ticket.generation != self.generation {
            log::warn!(
                "dropping animation load for run {} (current run {})",
                ticket.generation,
                self.generation
            );
            return false;
        }

        let mut machine = LocomotionMachine::new(self.config.locomotion.clone(), animations);
        machine.set_state(StateName::Walk, player);
        self.locomotion = Some(machine);
        true
    }

    // ========================================================================
    // Step
    // ========================================================================

    /// Advance the simulation by one frame of `raw_delta` seconds.
    ///
    /// Returns `None` while animations are still loading.
    pub fn step(
        &mut self,
        raw_delta: f32,
        player: &mut dyn AnimationPlayer,
        hud: &mut dyn HudSink,
        scene: &mut dyn SceneSink,
    ) -> Option<StepReport> {
        let machine = self.locomotion.as_mut()?;
        let delta_time = self.config.movement.clamp_delta(raw_delta);
        let mut report = StepReport {
            delta_time,
            ..Default::default()
        };

        for event in self.pending_scene.drain(..) {
            announce_path_event(scene, &event);
        }

        self.input.tick(delta_time);
        self.score.tick(delta_time);

        // Automatic jump into the initial drop and dance after landing
        let locomotion_config = machine.config();
        let (auto_jump_delay, auto_dance_delay) =
            (locomotion_config.auto_jump_delay, locomotion_config.auto_dance_delay);
        if self.character.tick_auto_jump(delta_time, auto_jump_delay) {
            self.input.inject_jump();
        }
        let on_ground = machine.current().is_some_and(|state| state.is_on_ground());
        if self.character.tick_auto_dance(delta_time, auto_dance_delay, on_ground) {
            report.transitions.extend(machine.set_state(StateName::Dance, player));
        }

        let movement = &self.config.movement;
        if let Some(SlowMotionEvent::Ended) =
            self.character.slow_motion.tick(delta_time, movement.slow_motion_recharge)
        {
            log::debug!("slow motion ended");
        }
        self.character.tick_jump_cooldown(delta_time);

        // Locomotion
        let intent = self.input.intent();
        let context = StateContext {
            forward: intent.forward,
            backward: intent.backward,
            device: intent.device,
            grounded: self.character.grounded(),
        };
        report.transitions.extend(machine.update(delta_time, &context, player));

        if intent.jump_requested {
            if let Some(transition) = machine.try_jump(self.character.jump_ready(), player) {
                self.input.consume_jump();
                self.character.start_jump_cooldown(movement.jump_cooldown);
                report.transitions.push(transition);
            }
        }

        // Physics
        let state = machine.current().copied();
        let command = MotionCommand {
            gait: state.map(|s| s.gait()).unwrap_or_default(),
            slow: intent.backward,
            turn_left: intent.left,
            turn_right: intent.right,
            device: intent.device,
            gravity_disabled: state.is_some_and(|s| s.gravity_disabled()),
            hold_heading: state.is_some_and(|s| s.holds_heading()),
        };
        let outcome = self.integrator.step(
            &mut self.character.motion,
            &mut self.character.slow_motion,
            &command,
            delta_time,
        );
        report.slow_motion_started = outcome.slow_motion_started;

        // Ground
        let ground_context = GroundContext {
            elapsed_since_start: self.elapsed,
            spawn_platform_top: Some(self.level.platform.top()),
        };
        report.ground =
            self.ground
                .resolve(&mut self.character.motion, &self.level.collision, &ground_context);
        if report.ground.below_fall_line && !machine.is_in(StateName::Fall) {
            report.transitions.extend(machine.set_state(StateName::Fall, player));
        }
        if machine.is_in(StateName::Fall) {
            self.score.freeze();
        }

        // Track
        report.path_events = self.path.update(self.character.position(), self.turns.as_mut());
        apply_path_events(&mut self.level, &self.config.path, &report.path_events);
        for event in &report.path_events {
            announce_path_event(scene, event);
        }

        // Camera and observers
        let dancing = machine.is_in(StateName::Dance);
        let pose = self.camera.update(
            self.character.position(),
            self.character.orientation(),
            dancing,
            delta_time,
        );
        scene.camera_moved(&pose);
        if let Some(name) = machine.current_name() {
            scene.character_moved(self.character.position(), self.character.orientation(), name);
        }

        for transition in &report.transitions {
            announce_transition(hud, transition);
        }
        self.sync_playback_rate(player);
        self.sync_hud(hud);

        self.elapsed += delta_time;
        self.frame += 1;
        Some(report)
    }

    /// Deliver a "finished" event from the animation player.
    pub fn on_animation_finished(
        &mut self,
        clip: ClipHandle,
        player: &mut dyn AnimationPlayer,
        hud: &mut dyn HudSink,
    ) -> Option<Transition> {
        let transition = self.locomotion.as_mut()?.on_animation_finished(clip, player)?;
        announce_transition(hud, &transition);
        self.sync_playback_rate(player);
        Some(transition)
    }

    // ========================================================================
    // Restart
    // ========================================================================

    /// Put everything back to the start of a run.
    ///
    /// Loads begun before the restart are invalidated.
    pub fn restart(
        &mut self,
        player: &mut dyn AnimationPlayer,
        hud: &mut dyn HudSink,
        scene: &mut dyn SceneSink,
    ) {
        self.generation += 1;
        log::info!("restarting run {}", self.generation);

        self.character.reset();
        self.input.reset();
        self.score.reset();
        self.camera.reset();
        self.elapsed = 0.0;

        let mut events: Vec<PathEvent> = self.pending_scene.drain(..).collect();
        let reset_events = self.path.reset();
        apply_path_events(&mut self.level, &self.config.path, &reset_events);
        events.extend(reset_events);
        for event in &events {
            announce_path_event(scene, event);
        }

        if let Some(machine) = self.locomotion.as_mut() {
            machine.restart(StateName::Walk, player);
        }
        hud.restart_prompt(false);
        self.shown_score = None;
        self.shown_charge = None;
        self.sync_playback_rate(player);
        self.sync_hud(hud);
    }

    // ========================================================================
    // Observers
    // ========================================================================

    fn sync_playback_rate(&mut self, player: &mut dyn AnimationPlayer) {
        let state_rate = self
            .locomotion
            .as_ref()
            .map_or(1.0, LocomotionMachine::playback_rate);
        let slow_rate = if self.character.slow_motion.is_active() {
            self.config.movement.slow_motion_playback_rate
        } else {
            1.0
        };

        let rate = state_rate.min(slow_rate);
        if rate != self.applied_rate {
            player.set_playback_rate(rate);
            self.applied_rate = rate;
        }
    }

    fn sync_hud(&mut self, hud: &mut dyn HudSink) {
        let score = self.current_score();
        if self.shown_score != Some(score) {
            hud.score_changed(score);
            self.shown_score = Some(score);
        }

        let charge = self.character.slow_motion.charge();
        if self.shown_charge != Some(charge) {
            hud.slow_motion_charge(charge, self.character.slow_motion.is_full());
            self.shown_charge = Some(charge);
        }
    }
}

fn apply_path_events(level: &mut Level, config: &PathConfig, events: &[PathEvent]) {
    for event in events {
        match event {
            PathEvent::Created(segment) => level.add_segment(segment, config),
            PathEvent::Evicted(segment) => level.remove_segment(segment),
        }
    }
}

fn announce_path_event(scene: &mut dyn SceneSink, event: &PathEvent) {
    match event {
        PathEvent::Created(segment) => scene.segment_created(segment),
        PathEvent::Evicted(segment) => scene.segment_released(segment),
    }
}

fn announce_transition(hud: &mut dyn HudSink, transition: &Transition) {
    if transition.entered(StateName::Fall) {
        hud.restart_prompt(true);
    } else if transition.left(StateName::Fall) {
        hud.restart_prompt(false);
    }
}

// ============================================================================
// Tests
// ============================================================================
