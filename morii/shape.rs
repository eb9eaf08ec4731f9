//! Irregular stain outlines

use crate::field::SmoothField;
use crate::rng::StainRng;
use crate::settings::Settings;

/// Points per outline
pub const STAIN_POINTS: usize = 20;

/// Offset from a stain's centre
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

/// Closed outline; the last point connects back to the first
pub type StainShape = [Offset; STAIN_POINTS];

/// Build an outline for a stain of diameter `size`.
///
/// Point `i` sits at angle `i / STAIN_POINTS * 2π`. Its radius is half the
/// size scaled by an independent factor in the radius jitter range, plus the
/// field sampled at `i * noise_step` times `noise_amount * size`.
pub fn stain_shape<F: SmoothField>(
    size: f32,
    settings: &Settings,
    rng: &mut StainRng,
    field: &F,
) -> StainShape {
    let mut points = [Offset::default(); STAIN_POINTS];
    for (i, point) in points.iter_mut().enumerate() {
        let angle = i as f32 / STAIN_POINTS as f32 * core::f32::consts::TAU;
        let variation = rng.range(settings.radius_jitter_min, settings.radius_jitter_max);
        let wobble = field.sample(i as f32 * settings.noise_step) * settings.noise_amount;
        let radius = size / 2.0 * variation + wobble * size;
        point.x = libm::cosf(angle) * radius;
        point.y = libm::sinf(angle) * radius;
    }
    points
}
