//! Stains and the factory that spawns them

use crate::dataset::{Category, DayRecord};
use crate::field::SmoothField;
use crate::rng::StainRng;
use crate::settings::Settings;
use crate::shape::{stain_shape, StainShape};

/// One café visitor drawn as a coffee stain
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Current radius used for collisions, inflated briefly after a hit
    pub size: f32,
    pub base_size: f32,
    pub category: Category,
    pub opacity: f32,
    pub fade_rate: f32,
    pub shape: StainShape,
    pub rotation: f32,
    pub rotation_speed: f32,
}

impl Entity {
    pub fn speed(&self) -> f32 {
        libm::sqrtf(self.vx * self.vx + self.vy * self.vy)
    }

    pub fn distance_to(&self, other: &Entity) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        libm::sqrtf(dx * dx + dy * dy)
    }

    /// Centre distance at which two stains start touching
    pub fn contact_distance(&self, other: &Entity) -> f32 {
        (self.size + other.size) / 2.0
    }
}

/// Viewport the stains live in
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

/// Spawns stains with random placement, drift and outline
pub struct EntityFactory<'a, F: SmoothField> {
    pub settings: &'a Settings,
    pub viewport: Viewport,
    pub field: &'a F,
}

impl<'a, F: SmoothField> EntityFactory<'a, F> {
    pub fn new(settings: &'a Settings, viewport: Viewport, field: &'a F) -> Self {
        Self {
            settings,
            viewport,
            field,
        }
    }

    /// Create one stain for a day with `population` visitors in total
    pub fn spawn(&self, category: Category, population: u32, rng: &mut StainRng) -> Entity {
        let s = self.settings;
        let base_size = s.base_size(population);
        let x = spawn_coordinate(self.viewport.width, s.spawn_margin, rng);
        let y = spawn_coordinate(self.viewport.height, s.spawn_margin, rng);
        let vx = rng.range(-s.initial_speed, s.initial_speed);
        let vy = rng.range(-s.initial_speed, s.initial_speed);
        let fade_rate = rng.range(s.fade_rate_min, s.fade_rate_max);
        let shape = stain_shape(base_size, s, rng, self.field);
        let rotation = rng.range(0.0, core::f32::consts::TAU);
        let rotation_speed = rng.range(-s.max_rotation_speed, s.max_rotation_speed);

        Entity {
            x,
            y,
            vx,
            vy,
            size: base_size,
            base_size,
            category,
            opacity: 1.0,
            fade_rate,
            shape,
            rotation,
            rotation_speed,
        }
    }

    /// Fill `out` with a day's stains: young first, then middle, then older.
    ///
    /// Returns how many were created. Stops early once `out` is full.
    pub fn populate<const N: usize>(
        &self,
        day: &DayRecord,
        rng: &mut StainRng,
        out: &mut heapless::Vec<Entity, N>,
    ) -> usize {
        out.clear();
        let population = day.population();
        for category in Category::ALL {
            for _ in 0..day.count(category) {
                if out.push(self.spawn(category, population, rng)).is_err() {
                    log::warn!(
                        "day {} wants {} stains, capacity is {}",
                        day.day,
                        population,
                        N
                    );
                    return out.len();
                }
            }
        }
        out.len()
    }
}

// Uniform inside the margin, or the centre when the axis is too small for it
fn spawn_coordinate(extent: f32, margin: f32, rng: &mut StainRng) -> f32 {
    if extent - margin > margin {
        rng.range(margin, extent - margin)
    } else {
        extent / 2.0
    }
}
