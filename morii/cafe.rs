//! Frame orchestration: scene lifecycle and the per-frame pipeline

use heapless::Vec;

use crate::audio::{AudioBridge, Synth, TriggerOutcome};
use crate::collision::{self, CollisionEvent, Link};
use crate::dataset::{DayRecord, MAX_CAPACITY};
use crate::entity::{Entity, EntityFactory, Viewport};
use crate::field::SmoothField;
use crate::overlay::{self, Caption};
use crate::physics;
use crate::proximity;
use crate::rng::StainRng;
use crate::settings::{PlaybackMode, Settings};

/// Default stain capacity, comfortably above the café's 50 seats
pub const MAX_ENTITIES: usize = 64;

const _: () = assert!(MAX_ENTITIES >= MAX_CAPACITY);

/// Collision events kept per frame for the audio pass
pub const MAX_EVENTS: usize = 128;

/// Callbacks into whatever is hosting the simulation
pub trait HostUi {
    fn on_entity_count_change(&mut self, count: usize);
    fn on_connection_count_change(&mut self, count: usize);
}

impl HostUi for () {
    fn on_entity_count_change(&mut self, _count: usize) {}
    fn on_connection_count_change(&mut self, _count: usize) {}
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SceneState {
    /// No day to show yet
    Uninitialized,
    /// Stains spawned, no frame stepped since
    Ready,
    Running,
    /// Torn down; `step` does nothing
    Stopped,
}

/// What happened during one `step`
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: u32,
    pub day_index: usize,
    pub day_changed: bool,
    pub entities: usize,
    pub connections: usize,
    pub tones_played: usize,
    pub tones_dropped: usize,
}

/// The café scene and everything that drives it frame to frame
pub struct Cafe<S: Synth, F: SmoothField, const N: usize = MAX_ENTITIES> {
    settings: Settings,
    days: &'static [DayRecord],
    mode: PlaybackMode,
    day_index: usize,
    frame: u32,
    viewport: Viewport,
    entities: Vec<Entity, N>,
    events: Vec<CollisionEvent, MAX_EVENTS>,
    connections: usize,
    state: SceneState,
    audio: AudioBridge<S>,
    field: F,
    rng: StainRng,
}

impl<S: Synth, F: SmoothField, const N: usize> Cafe<S, F, N> {
    pub fn new(settings: Settings, days: &'static [DayRecord], synth: S, field: F) -> Self {
        let mut cafe = Self {
            settings,
            days,
            mode: PlaybackMode::Interactive,
            day_index: 0,
            frame: 0,
            viewport: Viewport::new(settings.viewport_width, settings.viewport_height),
            entities: Vec::new(),
            events: Vec::new(),
            connections: 0,
            state: SceneState::Uninitialized,
            audio: AudioBridge::new(synth),
            field,
            rng: StainRng::new(settings.rng_seed),
        };
        cafe.rebuild();
        cafe
    }

    // Accessors

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn day_index(&self) -> usize {
        self.day_index
    }

    pub fn current_day(&self) -> Option<&DayRecord> {
        self.days.get(self.day_index)
    }

    pub fn days(&self) -> &'static [DayRecord] {
        self.days
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[cfg(test)]
    pub(crate) fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    /// Overlapping pairs found by the last step
    pub fn connection_count(&self) -> usize {
        self.connections
    }

    /// Collisions resolved during the last step
    pub fn last_collisions(&self) -> &[CollisionEvent] {
        &self.events
    }

    pub fn audio(&self) -> &AudioBridge<S> {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioBridge<S> {
        &mut self.audio
    }

    pub fn day_duration(&self) -> u32 {
        self.settings.day_duration(self.mode)
    }

    /// Completed day cycles since the mode was entered
    pub fn phase(&self) -> u32 {
        self.frame / self.day_duration()
    }

    /// How far through the current day cycle playback is, in [0, 1)
    pub fn day_progress(&self) -> f32 {
        let duration = self.day_duration();
        (self.frame % duration) as f32 / duration as f32
    }

    /// Caption to draw this frame; cinematic mode only
    pub fn caption(&self) -> Option<Caption> {
        match self.mode {
            PlaybackMode::Cinematic => {
                overlay::caption(self.frame, self.day_duration(), self.settings.caption_frames)
            }
            PlaybackMode::Interactive => None,
        }
    }

    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        collision::links(&self.entities, &self.settings)
    }

    pub fn isolation_flags(&self) -> impl Iterator<Item = bool> + '_ {
        proximity::isolation_flags(&self.entities, self.settings.isolation_radius)
    }

    // Host inputs

    /// Replace the dataset and rebuild on its first valid day
    pub fn set_days(&mut self, days: &'static [DayRecord]) {
        if self.state == SceneState::Stopped {
            return;
        }
        self.days = days;
        self.day_index = wrap(self.day_index, days.len());
        self.rebuild();
    }

    /// Switch playback mode; restarts the frame counter and the scene
    pub fn set_mode(&mut self, mode: PlaybackMode) {
        if self.state == SceneState::Stopped || mode == self.mode {
            return;
        }
        log::info!("mode: {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.frame = 0;
        self.rebuild();
    }

    /// Show another day. Out-of-range indices wrap around the dataset.
    /// A new day starts its own clock.
    pub fn set_day_index(&mut self, index: usize) {
        if self.state == SceneState::Stopped {
            return;
        }
        let index = wrap(index, self.days.len());
        if index == self.day_index && self.state != SceneState::Uninitialized {
            return;
        }
        self.day_index = index;
        self.frame = 0;
        self.rebuild();
    }

    /// Canvas resized; stains keep their state and bounce off the new walls
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
    }

    /// Start the synth handshake (first user interaction)
    pub fn unlock_audio(&mut self) {
        self.audio.unlock();
    }

    /// Release audio and stop stepping. Idempotent.
    pub fn shutdown(&mut self) {
        if self.state != SceneState::Stopped {
            log::info!("cafe: shutting down after {} frames", self.frame);
        }
        self.audio.shutdown();
        self.state = SceneState::Stopped;
    }

    /// Run one frame: advance the clock, maybe roll the day, integrate,
    /// collide, play tones, then report counts to the host.
    pub fn step<H: HostUi>(&mut self, host: &mut H) -> FrameReport {
        match self.state {
            SceneState::Stopped => {
                return FrameReport {
                    frame: self.frame,
                    day_index: self.day_index,
                    ..FrameReport::default()
                };
            }
            SceneState::Uninitialized => {
                host.on_entity_count_change(0);
                host.on_connection_count_change(0);
                return FrameReport {
                    frame: self.frame,
                    day_index: self.day_index,
                    ..FrameReport::default()
                };
            }
            SceneState::Ready | SceneState::Running => {}
        }

        self.frame = self.frame.wrapping_add(1);

        let mut day_changed = false;
        if self.mode == PlaybackMode::Cinematic && self.frame % self.day_duration() == 0 {
            self.day_index = wrap(self.day_index + 1, self.days.len());
            self.rebuild();
            day_changed = true;
        }

        let fading =
            self.mode == PlaybackMode::Cinematic && self.phase() >= self.settings.fade_start_phase;
        for entity in self.entities.iter_mut() {
            physics::integrate(entity, &self.settings, self.viewport, &mut self.rng, fading);
        }

        self.events.clear();
        let events = &mut self.events;
        let stats = collision::collide_all(&mut self.entities, &self.settings, |event| {
            // PERF: overflow only loses the tone, the physics already ran
            if events.push(event).is_err() {
                log::warn!("more than {} collisions this frame, tone skipped", MAX_EVENTS);
            }
        });
        self.connections = stats.overlapping;

        self.audio.poll();
        let mut tones_played = 0;
        let mut tones_dropped = 0;
        for event in self.events.iter() {
            match self.audio.on_collision(event, &mut self.rng) {
                TriggerOutcome::Played { .. } => tones_played += 1,
                TriggerOutcome::Dropped(_) => tones_dropped += 1,
            }
        }

        self.state = SceneState::Running;
        host.on_entity_count_change(self.entities.len());
        host.on_connection_count_change(self.connections);

        FrameReport {
            frame: self.frame,
            day_index: self.day_index,
            day_changed,
            entities: self.entities.len(),
            connections: self.connections,
            tones_played,
            tones_dropped,
        }
    }

    fn rebuild(&mut self) {
        let days = self.days;
        let Some(day) = days.get(self.day_index) else {
            self.entities.clear();
            self.events.clear();
            self.connections = 0;
            self.state = SceneState::Uninitialized;
            return;
        };

        let factory = EntityFactory::new(&self.settings, self.viewport, &self.field);
        let count = factory.populate(day, &mut self.rng, &mut self.entities);
        self.events.clear();
        self.connections = 0;
        self.state = SceneState::Ready;
        log::info!(
            "scene: day {} ({}) with {} stains",
            day.day,
            day.time_range,
            count
        );
    }
}

fn wrap(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        index % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioState, Note, Silent, Voice};
    use crate::dataset::{Category, DAYS};
    use crate::field::ValueNoise;

    type TestCafe = Cafe<Silent, ValueNoise>;

    fn cafe() -> TestCafe {
        Cafe::new(Settings::default(), &DAYS, Silent, ValueNoise::new(1))
    }

    #[derive(Default)]
    struct RecordingHost {
        entity_counts: std::vec::Vec<usize>,
        connection_counts: std::vec::Vec<usize>,
    }

    impl HostUi for RecordingHost {
        fn on_entity_count_change(&mut self, count: usize) {
            self.entity_counts.push(count);
        }

        fn on_connection_count_change(&mut self, count: usize) {
            self.connection_counts.push(count);
        }
    }

    #[derive(Default)]
    struct CountingSynth {
        played: std::vec::Vec<(Note, Voice)>,
    }

    impl Synth for CountingSynth {
        fn start(&mut self) {}

        fn poll_ready(&mut self) -> bool {
            true
        }

        fn trigger(&mut self, note: Note, voice: Voice, _seconds: f32) {
            self.played.push((note, voice));
        }

        fn release(&mut self) {}
    }

    #[test]
    fn starts_ready_with_day_one() {
        let cafe = cafe();
        assert_eq!(cafe.state(), SceneState::Ready);
        assert_eq!(cafe.entities().len(), 33);
        assert_eq!(cafe.current_day().map(|d| d.day), Some(1));
    }

    #[test]
    fn empty_dataset_waits_uninitialized() {
        static NONE: [DayRecord; 0] = [];
        let mut cafe: TestCafe = Cafe::new(Settings::default(), &NONE, Silent, ValueNoise::new(1));
        let mut host = RecordingHost::default();
        assert_eq!(cafe.state(), SceneState::Uninitialized);
        let report = cafe.step(&mut host);
        assert_eq!(report.entities, 0);
        assert_eq!(host.entity_counts, [0]);
        assert_eq!(cafe.frame(), 0);

        cafe.set_days(&DAYS);
        assert_eq!(cafe.state(), SceneState::Ready);
        assert_eq!(cafe.entities().len(), 33);
        cafe.step(&mut host);
        assert_eq!(cafe.state(), SceneState::Running);
    }

    #[test]
    fn invariants_hold_every_frame() {
        let mut cafe = cafe();
        cafe.set_mode(PlaybackMode::Cinematic);
        for _ in 0..1_500 {
            cafe.step(&mut ());
            for e in cafe.entities() {
                assert!(e.size > 0.0);
                assert!((0.0..=1.0).contains(&e.opacity));
            }
        }
    }

    #[test]
    fn host_hears_counts_once_per_frame() {
        let mut cafe = cafe();
        let mut host = RecordingHost::default();
        for _ in 0..10 {
            let report = cafe.step(&mut host);
            assert_eq!(report.connections, *host.connection_counts.last().unwrap());
        }
        assert_eq!(host.entity_counts, [33; 10]);
        assert_eq!(host.connection_counts.len(), 10);
    }

    #[test]
    fn cinematic_advances_every_day_duration() {
        let mut cafe = cafe();
        cafe.set_mode(PlaybackMode::Cinematic);
        let mut changes = std::vec::Vec::new();
        for _ in 0..1_600 {
            let report = cafe.step(&mut ());
            if report.day_changed {
                changes.push((report.frame, report.day_index));
            }
        }
        assert_eq!(changes, [(400, 1), (800, 2), (1200, 3), (1600, 0)]);
        assert_eq!(cafe.day_index(), 0);
        assert_eq!(cafe.entities().len(), DAYS[0].population() as usize);
    }

    #[test]
    fn interactive_never_advances_or_fades() {
        let mut cafe = cafe();
        for _ in 0..1_300 {
            assert!(!cafe.step(&mut ()).day_changed);
        }
        assert_eq!(cafe.day_index(), 0);
        assert!(cafe.entities().iter().all(|e| e.opacity == 1.0));
        assert!(cafe.caption().is_none());
    }

    #[test]
    fn cinematic_fades_from_third_cycle() {
        let mut cafe = cafe();
        cafe.set_mode(PlaybackMode::Cinematic);
        for _ in 0..799 {
            cafe.step(&mut ());
        }
        assert!(cafe.entities().iter().all(|e| e.opacity == 1.0));
        // Frame 800 rolls the day and starts fading the fresh stains
        cafe.step(&mut ());
        cafe.step(&mut ());
        assert!(cafe.entities().iter().all(|e| e.opacity < 1.0));
    }

    #[test]
    fn day_change_replaces_scene() {
        let mut cafe = cafe();
        cafe.step(&mut ());
        cafe.set_day_index(2);
        assert_eq!(cafe.state(), SceneState::Ready);
        assert_eq!(cafe.entities().len(), 25);
        assert_eq!(cafe.entities().iter().filter(|e| e.category == Category::Older).count(), 4);

        cafe.set_day_index(7); // wraps to 3
        assert_eq!(cafe.day_index(), 3);
        assert_eq!(cafe.entities().len(), 17);
    }

    #[test]
    fn day_change_restarts_the_clock() {
        let mut cafe = cafe();
        for _ in 0..300 {
            cafe.step(&mut ());
        }
        assert!((cafe.day_progress() - 0.5).abs() < 1e-6);

        cafe.set_day_index(1);
        assert_eq!(cafe.state(), SceneState::Ready);
        assert_eq!(cafe.frame(), 0);
        assert_eq!(cafe.day_progress(), 0.0);

        // same day again is not a change
        cafe.step(&mut ());
        cafe.set_day_index(1);
        assert_eq!(cafe.frame(), 1);
    }

    #[test]
    fn day_progress_follows_the_cycle() {
        let mut cafe = cafe();
        cafe.set_mode(PlaybackMode::Cinematic);
        for _ in 0..200 {
            cafe.step(&mut ());
        }
        assert!((cafe.day_progress() - 0.5).abs() < 1e-6);
        for _ in 0..200 {
            cafe.step(&mut ());
        }
        // rolled onto the next day
        assert_eq!(cafe.day_progress(), 0.0);
        assert_eq!(cafe.day_index(), 1);
    }

    #[test]
    fn mode_change_restarts_the_clock() {
        let mut cafe = cafe();
        for _ in 0..50 {
            cafe.step(&mut ());
        }
        cafe.set_mode(PlaybackMode::Cinematic);
        assert_eq!(cafe.frame(), 0);
        assert_eq!(cafe.state(), SceneState::Ready);
        assert_eq!(cafe.day_duration(), 400);
        cafe.step(&mut ());
        assert_eq!(cafe.caption().map(|c| c.text), Some(overlay::CAPTIONS[0]));
    }

    #[test]
    fn resize_keeps_stains() {
        let mut cafe = cafe();
        cafe.step(&mut ());
        let before: std::vec::Vec<Entity> = cafe.entities().to_vec();
        cafe.resize(640.0, 480.0);
        assert_eq!(cafe.viewport(), Viewport::new(640.0, 480.0));
        assert_eq!(cafe.entities(), &before[..]);
        assert_eq!(cafe.state(), SceneState::Running);
        cafe.step(&mut ());
        assert_eq!(cafe.entities().len(), before.len());
    }

    fn stage_head_on(entities: &mut [Entity]) {
        // Park everyone far apart on a grid, then stage one collision
        for (i, e) in entities.iter_mut().enumerate() {
            e.x = 60.0 + (i % 8) as f32 * 150.0;
            e.y = 60.0 + (i / 8) as f32 * 150.0;
            e.vx = 0.0;
            e.vy = 0.0;
        }
        entities[0].x = 400.0;
        entities[0].y = 700.0;
        entities[0].vx = 1.0;
        entities[1].x = 410.0;
        entities[1].y = 700.0;
        entities[1].vx = -1.0;
    }

    #[test]
    fn collisions_drop_tones_until_audio_ready() {
        let mut settings = Settings::default();
        settings.viewport_height = 1400.0;
        let mut cafe: Cafe<CountingSynth, ValueNoise> =
            Cafe::new(settings, &DAYS, CountingSynth::default(), ValueNoise::new(2));
        stage_head_on(cafe.entities_mut());
        let report = cafe.step(&mut ());
        assert!(report.connections >= 1);
        assert_eq!(report.tones_played, 0);
        assert_eq!(report.tones_dropped, cafe.last_collisions().len());
        assert!(report.tones_dropped >= 1);
        assert_eq!(cafe.audio().state(), AudioState::NotStarted);

        cafe.unlock_audio();
        stage_head_on(cafe.entities_mut());
        let report = cafe.step(&mut ());
        assert!(report.tones_played >= 1);
        let played = &cafe.audio().synth().played;
        assert_eq!(played.len(), report.tones_played);
        // Entities 0 and 1 are both young
        assert_eq!(played[0].1, Voice::Consonant);
    }

    #[test]
    fn shutdown_is_idempotent_and_stops_stepping() {
        let mut cafe = cafe();
        cafe.shutdown();
        cafe.shutdown();
        assert_eq!(cafe.state(), SceneState::Stopped);
        assert_eq!(cafe.audio().state(), AudioState::Released);
        let report = cafe.step(&mut ());
        assert_eq!(report.frame, 0);
        cafe.set_day_index(1);
        assert_eq!(cafe.day_index(), 0);
    }
}
