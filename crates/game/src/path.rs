//! Procedural track generation.
//!
//! The track is a ribbon of flat segments laid down ahead of the runner. The
//! head only ever advances along +Z or sideways, so the track never doubles
//! back behind the spawn platform.

use std::collections::VecDeque;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::random::TurnSource;

/// Path generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Segment extent along its travel axis.
    pub segment_length: f32,

    /// Segment extent across its travel axis.
    pub segment_width: f32,

    /// Oldest segments are evicted beyond this count.
    pub max_segments: usize,

    /// No turns until more than this many segments have been created.
    pub warmup_segments: u32,

    /// Position of the first segment.
    pub head_start: Vec3,

    /// Draws below this turn left.
    pub left_turn_below: f32,

    /// Draws above this turn right.
    pub right_turn_above: f32,

    /// Collider width relative to the visible segment.
    pub collider_width_factor: f32,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            segment_length: 50.0,
            segment_width: 10.0,
            max_segments: 20,
            warmup_segments: 7,
            head_start: Vec3::new(0.0, 0.0, 60.0),
            left_turn_below: 0.3,
            right_turn_above: 0.7,
            collider_width_factor: 1.05,
        }
    }
}

impl PathConfig {
    pub fn collider_width(&self) -> f32 {
        self.segment_width * self.collider_width_factor
    }
}

/// Travel axis of the head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Heading {
    /// +Z
    #[default]
    Forward,
    /// -X
    Left,
    /// +X
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Straight,
    Left,
    Right,
}

impl Heading {
    /// Heading after a turn. Any turn out of a sideways heading returns to Forward.
    pub fn after(self, turn: Turn) -> Self {
        match (self, turn) {
            (heading, Turn::Straight) => heading,
            (Self::Forward, Turn::Left) => Self::Left,
            (Self::Forward, Turn::Right) => Self::Right,
            (Self::Left | Self::Right, _) => Self::Forward,
        }
    }

    /// Sign of the lateral axis this heading involves, or zero for Forward.
    fn lateral_sign(self) -> f32 {
        match self {
            Self::Forward => 0.0,
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// One piece of track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    /// Creation order, starting at 0 for the first segment of a run.
    pub order: u64,
    /// Center of the segment's top surface.
    pub position: Vec3,
    pub heading: Heading,
}

/// Something the generator did that collaborators need to hear about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathEvent {
    Created(PathSegment),
    Evicted(PathSegment),
}

/// Extends and prunes the track.
#[derive(Debug, Clone)]
pub struct PathGenerator {
    config: PathConfig,
    segments: VecDeque<PathSegment>,
    head: Vec3,
    heading: Heading,
    /// Segments created this run, evicted ones included.
    created: u32,
}

impl PathGenerator {
    /// An empty generator. Call [`reset`](Self::reset) to lay the first segment.
    pub fn new(config: PathConfig) -> Self {
        let head = config.head_start;
        Self {
            config,
            segments: VecDeque::new(),
            head,
            heading: Heading::Forward,
            created: 0,
        }
    }

    pub fn config(&self) -> &PathConfig {
        &self.config
    }

    pub fn head(&self) -> Vec3 {
        self.head
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// Segments created this run.
    pub fn path_count(&self) -> u32 {
        self.created
    }

    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Discard the track and lay the first segment at the start position.
    pub fn reset(&mut self) -> Vec<PathEvent> {
        let mut events: Vec<PathEvent> = self.segments.drain(..).map(PathEvent::Evicted).collect();

        self.head = self.config.head_start;
        self.heading = Heading::Forward;
        self.created = 0;
        events.push(self.push_segment(self.head));

        events
    }

    /// Extend the track if the runner is close to the head, then prune.
    pub fn update(&mut self, runner: Vec3, turns: &mut dyn TurnSource) -> Vec<PathEvent> {
        let mut events = Vec::new();

        if runner.distance(self.head) < self.config.segment_length * 2.0 {
            events.extend(self.extend(turns));
        }
        self.evict_excess(&mut events);

        events
    }

    /// Lay one segment past the head.
    ///
    /// Returns `None` when the candidate would sit behind the spawn (z < 0);
    /// nothing changes in that case.
    pub fn extend(&mut self, turns: &mut dyn TurnSource) -> Option<PathEvent> {
        let turn = self.decide_turn(turns);
        let heading = self.heading.after(turn);
        let candidate = self.next_head(heading);

        if candidate.z < 0.0 {
            log::warn!("rejected segment behind spawn at {:?}", candidate);
            return None;
        }

        self.heading = heading;
        self.head = candidate;
        Some(self.push_segment(candidate))
    }

    fn decide_turn(&self, turns: &mut dyn TurnSource) -> Turn {
        if self.created <= self.config.warmup_segments {
            return Turn::Straight;
        }

        let draw = turns.next_unit();
        if draw < self.config.left_turn_below {
            Turn::Left
        } else if draw > self.config.right_turn_above {
            Turn::Right
        } else {
            Turn::Straight
        }
    }

    fn next_head(&self, heading: Heading) -> Vec3 {
        let length = self.config.segment_length;
        let width = self.config.segment_width;
        let mut head = self.head;

        if heading == self.heading {
            match heading {
                Heading::Forward => head.z += length,
                Heading::Left | Heading::Right => head.x += heading.lateral_sign() * width,
            }
        } else {
            // Corner: half a segment on both axes keeps the pieces touching
            let sign = heading.lateral_sign() + self.heading.lateral_sign();
            head.x += sign * width / 2.0;
            head.z += length / 2.0;
        }

        head
    }

    fn push_segment(&mut self, position: Vec3) -> PathEvent {
        let segment = PathSegment {
            order: u64::from(self.created),
            position,
            heading: self.heading,
        };
        self.segments.push_back(segment);
        self.created += 1;

        log::debug!("segment {} at {:?} heading {:?}", segment.order, position, self.heading);
        PathEvent::Created(segment)
    }

    fn evict_excess(&mut self, events: &mut Vec<PathEvent>) {
        while self.segments.len() > self.config.max_segments {
            if let Some(oldest) = self.segments.pop_front() {
                log::debug!("evicted segment {}", oldest.order);
                events.push(PathEvent::Evicted(oldest));
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
