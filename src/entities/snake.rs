//! Snakes crawling over the terrain.
//!
//! One track of snakes travels along `x`, another along `y`. Even instances
//! move: their head slides along the travel axis as a sawtooth of time and the
//! body tilts to follow the slope. Odd instances lie still at their spawn
//! position. Every moving snake keeps a [`TiltTracker`], so unlike the other
//! species this controller carries state from frame to frame.

use std::{f32::consts::FRAC_PI_2, sync::Arc};

use cgmath::Vector3;
use rand::Rng;

use crate::{
    data_structures::{
        composite::snake_body,
        drawable::{Drawable, Material},
        primitives::sphere,
        scene_graph::Hierarchy,
        terrain::{Placement, Terrain},
        transform::Transform,
    },
    entities::{FrameContext, Spawn, sample},
    error::HierarchyError,
    render::{RenderPass, Renderer},
};

/// Snakes per travel axis.
pub const QUANTITY: usize = 25;
pub const EXTENT_RATIO: f32 = 0.9;
pub const HEAD_RADIUS: f32 = 0.2;
pub const MOVING_SCALE: f32 = 1.6;
pub const RESTING_SCALE: f32 = 1.1;

/// Vertical change needed before the tilt is recomputed.
pub const MIN_RISE: f32 = 0.07;
/// Change along the travel axis needed before the tilt is recomputed.
pub const MIN_RUN: f32 = 0.001;
const WRAP_RATIO: f32 = 0.45;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TravelAxis {
    X,
    Y,
}

impl TravelAxis {
    pub fn along(self, p: Vector3<f32>) -> f32 {
        match self {
            TravelAxis::X => p.x,
            TravelAxis::Y => p.y,
        }
    }

    fn head_lift(self) -> f32 {
        match self {
            TravelAxis::X => HEAD_RADIUS,
            TravelAxis::Y => HEAD_RADIUS / 2.0,
        }
    }

    fn name(self) -> &'static str {
        match self {
            TravelAxis::X => "x",
            TravelAxis::Y => "y",
        }
    }
}

/// Slope following state of one moving snake.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltTracker {
    pub previous: Vector3<f32>,
    pub angle: f32,
}

impl TiltTracker {
    pub fn new(start: Vector3<f32>) -> Self {
        Self {
            previous: start,
            angle: 0.0,
        }
    }

    /// Recomputes the tilt when the head moved enough, returns whether it did.
    ///
    /// The new angle is the slope angle since the last update minus the
    /// previous angle.
    pub fn update(&mut self, head: Vector3<f32>, axis: TravelAxis) -> bool {
        let rise = head.z - self.previous.z;
        let run = axis.along(head) - axis.along(self.previous);
        if rise.abs() > MIN_RISE && run.abs() > MIN_RUN {
            self.angle = (rise / run).atan() - self.angle;
            self.previous = head;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.angle = 0.0;
    }
}

/**
 * Coordinate along `axis` of a moving snake spawned at `spawn`, at `time`.
 *
 * Snakes on the x track start at `-0.45 L` and move towards `+x`; snakes on
 * the y track start at `0.45 L` and move towards `-y`. The second value is
 * true when the head left the window and was put back at the start.
 */
pub fn head_coordinate(axis: TravelAxis, spawn: Vector3<f32>, time: f32, length: f32) -> (f32, bool) {
    let start = WRAP_RATIO * length;
    let phase = (time / length + axis.along(spawn).abs()).fract() * length;
    match axis {
        TravelAxis::X => {
            let x = -start + phase;
            if x.abs() > start || spawn.y.abs() > start {
                (-start, true)
            } else {
                (x, false)
            }
        }
        TravelAxis::Y => {
            let half = length / 2.0;
            let y = start - phase;
            if spawn.x.abs() > half || y.abs() > half {
                (start, true)
            } else {
                (y, false)
            }
        }
    }
}

fn hierarchy(axis: TravelAxis) -> anyhow::Result<Hierarchy> {
    let (turn, body_offset, texture) = match axis {
        TravelAxis::X => (FRAC_PI_2, Vector3::new(-HEAD_RADIUS, 0.0, 0.0), "snake_2.jpg"),
        TravelAxis::Y => (0.0, Vector3::new(0.0, HEAD_RADIUS, 0.0), "snake.jpeg"),
    };
    let name = axis.name();

    let mut head = sphere(HEAD_RADIUS, Vector3::new(0.0, 0.0, 0.0))?;
    head.scale(Vector3::new(1.0, 2.0, 1.0))
        .rotate(Vector3::unit_z(), turn);
    let mut body = snake_body()?;
    body.rotate(Vector3::unit_z(), turn);

    let mut hierarchy = Hierarchy::new();
    hierarchy.add(
        Drawable::new(format!("snake_{}_head", name), head, Material::textured(texture))?,
        "head",
        None,
        Transform::new(),
    )?;
    hierarchy.add(
        Drawable::new(
            format!("snake_{}_body", name),
            body,
            Material::textured(texture).with_shader(format!("snake_{}", name)),
        )?,
        "body",
        Some("head"),
        Transform::from_translation(body_offset),
    )?;
    Ok(hierarchy)
}

/// All snakes travelling along one axis.
pub struct SnakeTrack {
    axis: TravelAxis,
    hierarchy: Hierarchy,
    positions: Vec<Vector3<f32>>,
    trackers: Vec<TiltTracker>,
}

impl SnakeTrack {
    pub fn new(axis: TravelAxis, positions: Vec<Vector3<f32>>) -> anyhow::Result<Self> {
        let trackers = positions.iter().map(|p| TiltTracker::new(*p)).collect();
        Ok(Self {
            axis,
            hierarchy: hierarchy(axis)?,
            positions,
            trackers,
        })
    }

    pub fn axis(&self) -> TravelAxis {
        self.axis
    }

    pub fn positions(&self) -> &[Vector3<f32>] {
        &self.positions
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn trackers(&self) -> &[TiltTracker] {
        &self.trackers
    }

    /// Where snake `index` is and how it is posed at `time`.
    fn pose(&mut self, index: usize, terrain: &Terrain, time: f32) -> Transform {
        let spawn = self.positions[index];
        let lift = self.axis.head_lift();

        if index % 2 == 1 {
            let z = terrain.height(spawn.x, spawn.y) + lift;
            return Transform {
                translation: Vector3::new(spawn.x, spawn.y, z),
                ..Transform::from_axis_angle(
                    Vector3::unit_z(),
                    2.0 * spawn.x - 6.0 * spawn.y + spawn.z,
                )
            }
            .with_uniform_scale(RESTING_SCALE);
        }

        let tracker = &mut self.trackers[index];
        let (along, wrapped) = head_coordinate(self.axis, spawn, time, terrain.length());
        if wrapped {
            tracker.reset();
        }
        let (x, y) = match self.axis {
            TravelAxis::X => (along, spawn.y),
            TravelAxis::Y => (spawn.x, along),
        };
        let head = Vector3::new(x, y, terrain.height(x, y) + lift);
        tracker.update(head, self.axis);

        // x snakes pitch about y, where a positive slope is a negative turn
        let tilt = match self.axis {
            TravelAxis::X => Transform::from_axis_angle(Vector3::unit_y(), -tracker.angle),
            TravelAxis::Y => Transform::from_axis_angle(Vector3::unit_x(), tracker.angle),
        };
        Transform {
            translation: head,
            ..tilt
        }
        .with_uniform_scale(MOVING_SCALE)
    }

    pub fn display<R: Renderer + ?Sized>(
        &mut self,
        frame: &FrameContext,
        terrain: &Terrain,
        renderer: &mut R,
    ) -> Result<(), HierarchyError> {
        for index in 0..self.positions.len() {
            let pose = self.pose(index, terrain, frame.time);
            *self.hierarchy.local_mut("head")? = pose;
            self.hierarchy.recompute_global_transforms();
            self.hierarchy.draw_all(renderer, RenderPass::Opaque)?;
        }
        Ok(())
    }
}

pub struct Snakes {
    terrain: Arc<Terrain>,
    tracks: [SnakeTrack; 2],
}

impl Snakes {
    /// Spawns `spawn.quantity` snakes on each travel axis.
    pub fn new<R: Rng + ?Sized>(terrain: Arc<Terrain>, spawn: Spawn, rng: &mut R) -> anyhow::Result<Self> {
        let placement = Placement::new(spawn.quantity, terrain.length() * EXTENT_RATIO).spaced();
        let along_y = sample("snakes", &terrain, placement, spawn.budget, rng)?;
        let along_x = sample("snakes", &terrain, placement, spawn.budget, rng)?;
        Ok(Self {
            tracks: [
                SnakeTrack::new(TravelAxis::X, along_x)?,
                SnakeTrack::new(TravelAxis::Y, along_y)?,
            ],
            terrain,
        })
    }

    pub fn tracks(&self) -> &[SnakeTrack] {
        &self.tracks
    }

    pub fn display<R: Renderer + ?Sized>(
        &mut self,
        frame: &FrameContext,
        renderer: &mut R,
    ) -> Result<(), HierarchyError> {
        for track in &mut self.tracks {
            track.display(frame, &self.terrain, renderer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::terrain::Bump;
    use crate::render::DrawRecorder;
    use cgmath::{InnerSpace, Vector2};
    use rand::{SeedableRng, rngs::StdRng};

    fn frame(time: f32) -> FrameContext {
        FrameContext::looking_at(time, Vector3::new(15.0, 6.0, 6.0), Vector3::new(0.0, 0.0, 0.0))
    }

    #[test]
    fn tilt_follows_a_large_enough_rise() {
        let mut tracker = TiltTracker::new(Vector3::new(0.0, 0.0, 1.0));
        assert!(tracker.update(Vector3::new(1.0, 0.0, 1.2), TravelAxis::X));
        assert!((tracker.angle - 0.2f32.atan()).abs() < 1e-6);
        assert!((tracker.angle - 0.197).abs() < 1e-3);
        assert_eq!(tracker.previous, Vector3::new(1.0, 0.0, 1.2));

        let before = tracker;
        assert!(!tracker.update(Vector3::new(2.0, 0.0, 1.21), TravelAxis::X));
        assert_eq!(tracker, before);
    }

    #[test]
    fn tilt_ignores_tiny_runs() {
        let mut tracker = TiltTracker::new(Vector3::new(0.0, 0.0, 0.0));
        assert!(!tracker.update(Vector3::new(0.0005, 0.0, 1.0), TravelAxis::X));
        assert!(!tracker.update(Vector3::new(5.0, 0.0005, 1.0), TravelAxis::Y));
        assert!(tracker.update(Vector3::new(0.0, -1.0, 1.0), TravelAxis::Y));
        assert!((tracker.angle + std::f32::consts::FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn x_sawtooth_wraps_to_the_start_edge() {
        let spawn = Vector3::new(0.3, 0.0, 0.0);
        let (x, wrapped) = head_coordinate(TravelAxis::X, spawn, 0.0, 100.0);
        assert!(!wrapped);
        assert!((x + 15.0).abs() < 1e-3);
        let (x, wrapped) = head_coordinate(TravelAxis::X, spawn, 65.0, 100.0);
        assert!(wrapped);
        assert!((x + 45.0).abs() < 1e-4);
    }

    #[test]
    fn y_sawtooth_moves_towards_negative_y() {
        let spawn = Vector3::new(0.0, 0.1, 0.0);
        let (y0, _) = head_coordinate(TravelAxis::Y, spawn, 0.0, 100.0);
        let (y1, _) = head_coordinate(TravelAxis::Y, spawn, 10.0, 100.0);
        assert!((y0 - 35.0).abs() < 1e-3);
        assert!((y1 - 25.0).abs() < 1e-3);
        let (y, wrapped) = head_coordinate(TravelAxis::Y, spawn, 88.0, 100.0);
        assert!(wrapped);
        assert!((y - 45.0).abs() < 1e-4);
    }

    #[test]
    fn wrap_resets_the_tilt() {
        let terrain = Terrain::flat(100.0).unwrap();
        let mut track = SnakeTrack::new(TravelAxis::X, vec![Vector3::new(0.3, 0.0, 0.0)]).unwrap();
        track.trackers[0].angle = 0.5;
        track.trackers[0].previous = Vector3::new(10.0, 0.0, HEAD_RADIUS);
        let mut recorder = DrawRecorder::default();
        track.display(&frame(65.0), &terrain, &mut recorder).unwrap();
        assert_eq!(track.trackers()[0].angle, 0.0);
        let head = &recorder.calls()[0];
        assert_eq!(head.label, "snake_x_head");
        let expected = Vector3::new(-45.0, 0.0, HEAD_RADIUS);
        assert!((head.world.translation - expected).magnitude() < 1e-4);
    }

    #[test]
    fn moving_and_resting_snakes() {
        let terrain = Arc::new(
            Terrain::from_bumps(
                120.0,
                vec![Bump {
                    center: Vector2::new(0.0, 0.0),
                    height: 4.0,
                    sigma: 8,
                }],
            )
            .unwrap(),
        );
        let mut rng = StdRng::seed_from_u64(12);
        let mut snakes = Snakes::new(terrain.clone(), Spawn::new(2), &mut rng).unwrap();
        let mut recorder = DrawRecorder::default();
        for step in 0..50 {
            snakes.display(&frame(step as f32 * 0.7), &mut recorder).unwrap();
        }
        snakes.display(&frame(40.0), &mut recorder).unwrap();

        let calls = &recorder.calls()[recorder.calls().len() - 8..];
        let labels: Vec<_> = calls.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "snake_x_head",
                "snake_x_body",
                "snake_x_head",
                "snake_x_body",
                "snake_y_head",
                "snake_y_body",
                "snake_y_head",
                "snake_y_body",
            ]
        );
        assert_eq!(calls[0].world.scale.x, MOVING_SCALE);
        assert_eq!(calls[2].world.scale.x, RESTING_SCALE);

        let resting = snakes.tracks()[1].positions()[1];
        let head = calls[6].world.translation;
        assert_eq!((head.x, head.y), (resting.x, resting.y));
        assert!((head.z - terrain.height(resting.x, resting.y) - HEAD_RADIUS / 2.0).abs() < 1e-5);
        for track in snakes.tracks() {
            assert!(track.trackers().iter().all(|t| t.angle.is_finite()));
        }
    }
}
