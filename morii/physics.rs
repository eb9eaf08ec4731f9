//! Per-frame integration of a single stain

use crate::entity::{Entity, Viewport};
use crate::rng::StainRng;
use crate::settings::Settings;

/// Advance one stain by one frame.
///
/// Step order: move, drag, jitter, speed cap, wall bounce, spin, size
/// recovery, then fading when `fading` is set. Drag and jitter must land
/// before the speed cap so the cap is the last word on velocity.
pub fn integrate(
    entity: &mut Entity,
    settings: &Settings,
    viewport: Viewport,
    rng: &mut StainRng,
    fading: bool,
) {
    entity.x += entity.vx;
    entity.y += entity.vy;

    entity.vx *= settings.drag;
    entity.vy *= settings.drag;

    entity.vx += rng.range(-settings.jitter, settings.jitter);
    entity.vy += rng.range(-settings.jitter, settings.jitter);

    let speed = entity.speed();
    if speed > settings.max_speed {
        entity.vx = entity.vx / speed * settings.max_speed;
        entity.vy = entity.vy / speed * settings.max_speed;
    }

    bounce(&mut entity.x, &mut entity.vx, entity.size, viewport.width, settings.wall_damping);
    bounce(&mut entity.y, &mut entity.vy, entity.size, viewport.height, settings.wall_damping);

    entity.rotation += entity.rotation_speed;

    if entity.size > entity.base_size {
        entity.size += (entity.base_size - entity.size) * settings.size_decay;
    }

    if fading {
        entity.opacity = (entity.opacity - entity.fade_rate).max(0.0);
    }
}

// Reflect and damp when outside [size, extent - size]; pin to the middle
// when the axis is narrower than the stain
fn bounce(pos: &mut f32, vel: &mut f32, size: f32, extent: f32, damping: f32) {
    let lo = size;
    let hi = extent - size;
    if *pos < lo || *pos > hi {
        *vel *= -damping;
        *pos = if hi < lo { extent / 2.0 } else { pos.clamp(lo, hi) };
    }
}
