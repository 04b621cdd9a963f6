//! Skyrunner - Main Entry Point
//!
//! Runs a scripted headless session of the endless-runner simulation and
//! prints a JSON summary of where the run ended up.
//!
//! Usage: `skyrunner [--mobile] [config.json]`

mod animator;
mod config;

use std::path::PathBuf;

use glam::{Quat, Vec3};
use serde::Serialize;
use skyrunner_game::{
    AnimationSet, CameraPose, ClipHandle, GameConfig, HudSink, Key, PathSegment, SceneSink, Simulation,
    StateName,
};

use crate::animator::ClockAnimator;
use crate::config::{load_config, ConfigError};

const FRAME_TIME: f32 = 1.0 / 60.0;
const SESSION_FRAMES: u64 = 1800;

/// Frames the animation set takes to "load".
const LOAD_FRAMES: u64 = 3;

#[derive(Debug, Clone, Copy)]
enum ScriptAction {
    Press(Key),
    Release(Key),
    Restart,
}

/// Scripted desktop session: run, jump, slow motion, a turn, then a restart.
const SCRIPT: &[(u64, ScriptAction)] = &[
    (420, ScriptAction::Press(Key::Forward)),
    (540, ScriptAction::Release(Key::Forward)),
    (600, ScriptAction::Press(Key::Jump)),
    (610, ScriptAction::Release(Key::Jump)),
    (720, ScriptAction::Press(Key::Backward)),
    (780, ScriptAction::Release(Key::Backward)),
    (900, ScriptAction::Press(Key::Left)),
    (930, ScriptAction::Release(Key::Left)),
    (1500, ScriptAction::Restart),
];

fn clip_duration(state: StateName) -> f32 {
    match state {
        StateName::Idle => 2.0,
        StateName::Walk => 1.0,
        StateName::Run => 0.7,
        StateName::Jump => 1.2,
        StateName::Dance => 4.0,
        StateName::Fall => 1.5,
    }
}

/// HUD that writes to the log.
#[derive(Debug, Default)]
struct LogHud {
    restart_visible: bool,
}

impl HudSink for LogHud {
    fn score_changed(&mut self, score: Option<u32>) {
        match score {
            Some(score) => log::info!("score: {score}"),
            None => log::debug!("score hidden"),
        }
    }

    fn slow_motion_charge(&mut self, charge: f32, full: bool) {
        if full {
            log::info!("slow motion ready");
        } else {
            log::trace!("slow motion charge {:.0}%", charge * 100.0);
        }
    }

    fn restart_prompt(&mut self, visible: bool) {
        if visible != self.restart_visible {
            log::info!("restart prompt {}", if visible { "shown" } else { "hidden" });
        }
        self.restart_visible = visible;
    }
}

/// Scene that counts live track segments and logs character movement.
#[derive(Debug, Default)]
struct LogScene {
    live_segments: usize,
    last_state: Option<StateName>,
}

impl SceneSink for LogScene {
    fn character_moved(&mut self, position: Vec3, _orientation: Quat, state: StateName) {
        if self.last_state != Some(state) {
            log::info!("{state} at ({:.1}, {:.1}, {:.1})", position.x, position.y, position.z);
            self.last_state = Some(state);
        }
    }

    fn camera_moved(&mut self, pose: &CameraPose) {
        log::trace!("camera at {:?} looking at {:?}", pose.position, pose.look_at);
    }

    fn segment_created(&mut self, segment: &PathSegment) {
        self.live_segments += 1;
        log::debug!("segment {} at {:?} heading {:?}", segment.order, segment.position, segment.heading);
    }

    fn segment_released(&mut self, segment: &PathSegment) {
        self.live_segments = self.live_segments.saturating_sub(1);
        log::debug!("segment {} released", segment.order);
    }
}

#[derive(Debug, Serialize)]
struct RunSummary {
    frames: u64,
    state: Option<String>,
    position: Vec3,
    score: Option<u32>,
    path_count: u32,
    live_segments: usize,
    slow_motion_charge: f32,
    playback_rate: f32,
}

fn parse_args() -> Result<GameConfig, ConfigError> {
    let mut mobile = false;
    let mut path: Option<PathBuf> = None;
    for arg in std::env::args().skip(1) {
        if arg == "--mobile" {
            mobile = true;
        } else {
            path = Some(PathBuf::from(arg));
        }
    }

    match path {
        Some(path) => load_config(&path),
        None if mobile => Ok(GameConfig::mobile_friendly()),
        None => Ok(GameConfig::desktop()),
    }
}

fn main() -> Result<(), ConfigError> {
    env_logger::init();

    let config = parse_args()?;
    let mut simulation = Simulation::new(config);

    let bindings: Vec<(StateName, ClipHandle)> = StateName::ALL
        .into_iter()
        .map(|state| (state, ClipHandle(state.index() as u32)))
        .collect();
    let mut animator = ClockAnimator::new(
        bindings
            .iter()
            .map(|(state, clip)| (*clip, clip_duration(*state))),
    );
    let mut hud = LogHud::default();
    let mut scene = LogScene::default();

    let ticket = simulation.begin_load();
    let mut pending_load = Some(ticket);

    for frame in 0..SESSION_FRAMES {
        if frame == LOAD_FRAMES {
            if let Some(ticket) = pending_load.take() {
                match AnimationSet::from_bindings(bindings.iter().copied()) {
                    Ok(animations) => {
                        simulation.finish_load(ticket, animations, &mut animator);
                        log::info!("animations loaded after {frame} frames");
                    }
                    Err(err) => log::error!("{err}"),
                }
            }
        }

        for (_, action) in SCRIPT.iter().filter(|(at, _)| *at == frame) {
            match *action {
                ScriptAction::Press(key) => simulation.input.key_down(key),
                ScriptAction::Release(key) => simulation.input.key_up(key),
                ScriptAction::Restart => simulation.restart(&mut animator, &mut hud, &mut scene),
            }
        }

        if simulation
            .step(FRAME_TIME, &mut animator, &mut hud, &mut scene)
            .is_none()
        {
            continue;
        }

        for clip in animator.advance(FRAME_TIME) {
            simulation.on_animation_finished(clip, &mut animator, &mut hud);
        }
    }

    let summary = RunSummary {
        frames: simulation.frame,
        state: simulation.state().map(|state| state.to_string()),
        position: simulation.character.position(),
        score: simulation.current_score(),
        path_count: simulation.path.path_count(),
        live_segments: scene.live_segments,
        slow_motion_charge: simulation.character.slow_motion.charge(),
        playback_rate: animator.rate(),
    };
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("failed to encode summary: {err}"),
    }

    Ok(())
}
