//! Segment-stepped projectile flight
//!
//! A stylized model, not physics: the projectile advances along the aim
//! axis in fixed segments, losing a fixed amount of velocity per segment,
//! dropping under gravity and drifting sideways once it has traveled far
//! enough to destabilize. The stepper never draws randomness; it reports
//! the destabilization angle for the spread resolver to apply.
//!
//! Positions use a local frame with `z` along the aim axis, `y` up and
//! `x` to the side.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_4;

use crate::core::config::{config, ArmoryConfig};
use crate::weapons::definition::BallisticsProfile;

/// Destabilization never tilts the path past this angle
pub const MAX_DRIFT_ANGLE: f32 = FRAC_PI_4;

/// Summary of one traced flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceResult {
    /// Path length to the target; the clamped target for straight paths
    pub effective_distance: f32,
    /// Destabilization at the end of the path (radians)
    pub destabilization_angle: f32,
    pub terminal_velocity: f32,
    /// Accumulated vertical drop
    pub drop: f32,
    pub lateral_drift: f32,
    pub flight_time: f32,
    pub segments: u32,
}

/// Projectile state at a segment boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TracePoint {
    pub position: Vec3,
    pub velocity: f32,
    pub time: f32,
    pub destabilization_angle: f32,
}

/// Destabilization after `traveled` units of path length
///
/// Grows linearly past `destabilize_distance` and is capped at
/// [`MAX_DRIFT_ANGLE`].
pub fn destabilization_at(profile: &BallisticsProfile, traveled: f32) -> f32 {
    let past = traveled - profile.destabilize_distance;
    if past > 0.0 {
        (profile.destabilize_amount * past).min(MAX_DRIFT_ANGLE)
    } else {
        0.0
    }
}

/// Trace a flight to `target_distance` with the global config
pub fn trace(profile: &BallisticsProfile, target_distance: f32) -> TraceResult {
    trace_with(profile, target_distance, config())
}

pub fn trace_with(
    profile: &BallisticsProfile,
    target_distance: f32,
    cfg: &ArmoryConfig,
) -> TraceResult {
    step(profile, target_distance, cfg, |_| {})
}

/// Segment boundary positions for trajectory arcs, starting at the muzzle
pub fn trace_path(profile: &BallisticsProfile, target_distance: f32) -> Vec<TracePoint> {
    trace_path_with(profile, target_distance, config())
}

pub fn trace_path_with(
    profile: &BallisticsProfile,
    target_distance: f32,
    cfg: &ArmoryConfig,
) -> Vec<TracePoint> {
    let mut points = Vec::new();
    step(profile, target_distance, cfg, |point| points.push(point));
    points
}

fn clamp_target(profile: &BallisticsProfile, target_distance: f32) -> f32 {
    if target_distance.is_nan() {
        return 0.0;
    }
    target_distance.clamp(0.0, profile.max_range.max(0.0))
}

/// Length a segment gains from its off-axis displacement
///
/// `sqrt(step² + d²) - step`, written so it does not cancel for small `d`.
fn arc_excess(step: f32, off_axis_sq: f32) -> f32 {
    if off_axis_sq <= 0.0 {
        return 0.0;
    }
    off_axis_sq / ((step * step + off_axis_sq).sqrt() + step)
}

fn step(
    profile: &BallisticsProfile,
    target_distance: f32,
    cfg: &ArmoryConfig,
    mut visit: impl FnMut(TracePoint),
) -> TraceResult {
    let target = clamp_target(profile, target_distance);
    let muzzle = TracePoint {
        position: Vec3::ZERO,
        velocity: profile.muzzle_velocity,
        time: 0.0,
        destabilization_angle: 0.0,
    };
    visit(muzzle);

    if profile.is_degenerate() {
        let flight_time = if profile.muzzle_velocity > 0.0 {
            target / profile.muzzle_velocity
        } else {
            0.0
        };
        visit(TracePoint {
            position: Vec3::new(0.0, 0.0, target),
            time: flight_time,
            ..muzzle
        });
        return TraceResult {
            effective_distance: target,
            destabilization_angle: 0.0,
            terminal_velocity: profile.muzzle_velocity,
            drop: 0.0,
            lateral_drift: 0.0,
            flight_time,
            segments: 0,
        };
    }

    let segment_length = profile.segment_length.max(cfg.min_segment_length);
    let mut position = Vec3::ZERO;
    let mut velocity = profile.muzzle_velocity.max(cfg.min_velocity);
    let mut vertical_speed = 0.0_f32;
    let mut time = 0.0_f32;
    let mut angle = 0.0_f32;
    let mut extra = 0.0_f32;
    let mut segments = 0_u32;

    while position.z < target && segments < cfg.max_trace_segments {
        // Computed from the index so the last boundary lands exactly on target
        let end = ((segments + 1) as f32 * segment_length).min(target);
        let step = end - position.z;
        let dt = step / velocity;

        let fall = vertical_speed * dt + 0.5 * profile.gravity * dt * dt;
        vertical_speed += profile.gravity * dt;
        // Path length so far, this segment counted along the axis
        angle = destabilization_at(profile, end + extra);
        let side = step * angle.tan();

        let delta = Vec3::new(side, -fall, step);
        extra += arc_excess(step, delta.x * delta.x + delta.y * delta.y);
        position += delta;
        position.z = end;

        time += dt;
        velocity = (velocity - profile.drag_per_segment * (step / segment_length))
            .max(cfg.min_velocity);
        segments += 1;

        visit(TracePoint {
            position,
            velocity,
            time,
            destabilization_angle: angle,
        });
    }

    if position.z < target {
        tracing::debug!(
            "Trace stopped after {} segments at {:.1} of {:.1}",
            segments,
            position.z,
            target
        );
    }

    TraceResult {
        effective_distance: target + extra,
        destabilization_angle: angle,
        terminal_velocity: velocity,
        drop: -position.y,
        lateral_drift: position.x,
        flight_time: time,
        segments,
    }
}
