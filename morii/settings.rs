//! Tunables for the café simulation

/// Playback mode supplied by the host
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PlaybackMode {
    /// Host picks the day; the scene never auto-advances or fades
    #[default]
    Interactive,
    /// Days cycle on a timer, stains fade over time
    Cinematic,
}

/// Every physics, layout and timing constant in one place
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    // Viewport
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub spawn_margin: f32,

    // Motion
    pub max_speed: f32,
    pub drag: f32,
    pub jitter: f32,
    pub wall_damping: f32,
    pub initial_speed: f32,
    pub max_rotation_speed: f32,

    // Collisions
    pub restitution: f32,
    pub pop_scale: f32,
    pub size_decay: f32,
    pub link_radius: f32,
    pub link_alpha: f32,
    pub isolation_radius: f32,

    // Population -> stain size mapping
    pub population_min: f32,
    pub population_max: f32,
    pub size_min: f32,
    pub size_max: f32,

    // Stain outline
    pub radius_jitter_min: f32,
    pub radius_jitter_max: f32,
    pub noise_step: f32,
    pub noise_amount: f32,

    // Fading
    pub fade_rate_min: f32,
    pub fade_rate_max: f32,
    pub fade_start_phase: u32,

    // Timing (frames)
    pub interactive_day_duration: u32,
    pub cinematic_day_duration: u32,
    pub caption_frames: u32,

    // RNG seed
    pub rng_seed: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 720.0,
            spawn_margin: 100.0,
            max_speed: 2.0,
            drag: 0.995,
            jitter: 0.05,
            wall_damping: 0.8,
            initial_speed: 1.5,
            max_rotation_speed: 0.01,
            restitution: 1.5,
            pop_scale: 1.2,
            size_decay: 0.1,
            link_radius: 120.0,
            link_alpha: 0.15,
            isolation_radius: 200.0,
            population_min: 10.0,
            population_max: 40.0,
            size_min: 25.0,
            size_max: 50.0,
            radius_jitter_min: 0.7,
            radius_jitter_max: 1.3,
            noise_step: 0.5,
            noise_amount: 0.3,
            fade_rate_min: 0.001,
            fade_rate_max: 0.003,
            fade_start_phase: 2,
            interactive_day_duration: 600,
            cinematic_day_duration: 400,
            caption_frames: 100,
            rng_seed: 0x4D4F_5249,
        }
    }
}

impl Settings {
    /// Frames spent on one day before the cinematic loop moves on
    pub fn day_duration(&self, mode: PlaybackMode) -> u32 {
        let frames = match mode {
            PlaybackMode::Interactive => self.interactive_day_duration,
            PlaybackMode::Cinematic => self.cinematic_day_duration,
        };
        frames.max(1)
    }

    /// Base stain size for a day's head count.
    ///
    /// Linear over `[population_min, population_max]`, clamped at both ends.
    pub fn base_size(&self, population: u32) -> f32 {
        let span = self.population_max - self.population_min;
        if span <= 0.0 {
            return self.size_min.max(f32::EPSILON);
        }
        let t = ((population as f32 - self.population_min) / span).clamp(0.0, 1.0);
        let size = self.size_min + (self.size_max - self.size_min) * t;
        size.max(f32::EPSILON)
    }
}
