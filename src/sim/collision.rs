//! Collision detection and response against the screen and host regions
//!
//! Screen edges are resolved first: the sides and the top bounce with energy
//! loss, the bottom is ground. Regions (foreign windows, system bars) only
//! collide along their top strip and only ever resolve vertically.

use glam::Vec2;

use super::geometry::{Bounds, Position, Rect, Region, Velocity};
use crate::settings::PhysicsParams;

/// How close the companion's feet must be to a region top to count as standing on it
pub const CONTACT_EPSILON: f32 = 0.5;

/// Output of a resolution pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub position: Position,
    pub velocity: Velocity,
    pub grounded: bool,
    /// Index of the region the companion stands on, if any
    pub support: Option<usize>,
}

/// Which end of an axis was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisContact {
    None,
    Min,
    Max,
}

/// Clamp one axis into `[half, extent - half]`, reflecting velocity away from
/// the edge that was penetrated with magnitude `|v| * bounce`.
pub fn clamp_axis(pos: f32, vel: f32, half: f32, extent: f32, bounce: f32) -> (f32, f32, AxisContact) {
    if extent < half * 2.0 {
        // Screen smaller than the companion: pin to the middle
        return (extent / 2.0, 0.0, AxisContact::None);
    }
    if pos - half < 0.0 {
        (half, vel.abs() * bounce, AxisContact::Min)
    } else if pos + half > extent {
        (extent - half, -vel.abs() * bounce, AxisContact::Max)
    } else {
        (pos, vel, AxisContact::None)
    }
}

/// Pull a box centre fully onto the screen without touching any velocity
pub fn clamp_to_screen(position: Position, half_extents: Vec2, bounds: Bounds) -> Position {
    let (x, _, _) = clamp_axis(position.x, 0.0, half_extents.x, bounds.width, 0.0);
    let (y, _, _) = clamp_axis(position.y, 0.0, half_extents.y, bounds.height, 0.0);
    Vec2::new(x, y)
}

/// Resolve the companion box against screen edges, then against regions.
pub fn resolve(
    position: Position,
    velocity: Velocity,
    half_extents: Vec2,
    bounds: Bounds,
    regions: &[Region],
    params: &PhysicsParams,
) -> Resolution {
    let mut res = resolve_screen_edges(position, velocity, half_extents, bounds, params.bounce_dampening);
    land_on_regions(&mut res, half_extents, bounds, regions, params.title_bar_height);
    res
}

/// Screen edges only. The floor zeroes vertical velocity instead of bouncing.
pub fn resolve_screen_edges(
    position: Position,
    velocity: Velocity,
    half_extents: Vec2,
    bounds: Bounds,
    bounce: f32,
) -> Resolution {
    let (x, vx, _) = clamp_axis(position.x, velocity.x, half_extents.x, bounds.width, bounce);

    let half_h = half_extents.y;
    let (mut y, mut vy) = (position.y, velocity.y);
    if bounds.height < half_h * 2.0 {
        y = bounds.height / 2.0;
        vy = 0.0;
    } else if y - half_h < 0.0 {
        y = half_h;
        vy = vy.abs() * bounce;
    }

    let grounded = y + half_h >= bounds.height;
    if grounded {
        y = bounds.height - half_h;
        vy = 0.0;
    }

    Resolution {
        position: Vec2::new(x, y),
        velocity: Vec2::new(vx, vy),
        grounded,
        support: None,
    }
}

/// Land on the first region (in list order) whose top strip the companion
/// overlaps while descending, or keep standing on one it is resting on.
///
/// Regions whose landing spot would push the box off-screen are skipped.
pub fn land_on_regions(
    res: &mut Resolution,
    half_extents: Vec2,
    bounds: Bounds,
    regions: &[Region],
    title_bar_height: f32,
) {
    let body = Rect::centered(res.position, half_extents);

    for (index, region) in regions.iter().enumerate() {
        if region.is_degenerate() || region.y > bounds.height {
            continue;
        }
        let rest_y = region.y - half_extents.y;
        if rest_y - half_extents.y < 0.0 {
            continue;
        }

        let strip = region.top_strip(title_bar_height);
        let landing = res.velocity.y > 0.0 && body.overlaps(&strip);
        let resting = res.velocity.y >= 0.0
            && body.overlaps_horizontally(&strip)
            && (body.bottom - region.y).abs() <= CONTACT_EPSILON;

        if landing || resting {
            res.position.y = rest_y;
            res.velocity.y = 0.0;
            res.grounded = true;
            res.support = Some(index);
            return;
        }
    }
}
