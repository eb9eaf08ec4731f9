//! Collision tones.
//!
//! The bridge turns [`CollisionEvent`]s into tone requests for an external
//! [`Synth`]. Synths start asynchronously; until the start-up handshake
//! completes every request is dropped on the floor (no queue, no retry), so
//! the first tones after unlocking may be silent.

use crate::collision::CollisionEvent;
use crate::rng::StainRng;

/// Tones the café can play
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Note {
    C4,
    D4,
    E4,
    FSharp4,
    G4,
    A4,
    B4,
    C5,
    D5,
}

impl Note {
    pub const ALL: [Note; 9] = [
        Note::C4,
        Note::D4,
        Note::E4,
        Note::FSharp4,
        Note::G4,
        Note::A4,
        Note::B4,
        Note::C5,
        Note::D5,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Note::C4 => "C4",
            Note::D4 => "D4",
            Note::E4 => "E4",
            Note::FSharp4 => "F#4",
            Note::G4 => "G4",
            Note::A4 => "A4",
            Note::B4 => "B4",
            Note::C5 => "C5",
            Note::D5 => "D5",
        }
    }

    /// Semitones above A4
    fn semitones(self) -> i32 {
        match self {
            Note::C4 => -9,
            Note::D4 => -7,
            Note::E4 => -5,
            Note::FSharp4 => -3,
            Note::G4 => -2,
            Note::A4 => 0,
            Note::B4 => 2,
            Note::C5 => 3,
            Note::D5 => 5,
        }
    }

    /// Equal-tempered frequency in Hz, A4 = 440
    pub fn frequency(self) -> f32 {
        440.0 * libm::powf(2.0, self.semitones() as f32 / 12.0)
    }
}

/// C major triad plus the octave
pub const CONSONANT_NOTES: [Note; 4] = [Note::C4, Note::E4, Note::G4, Note::C5];

/// D major with added sixth, more tension against the consonant set
pub const DISSONANT_NOTES: [Note; 5] = [Note::D4, Note::FSharp4, Note::A4, Note::B4, Note::D5];

/// Eighth note at 120 bpm
pub const NOTE_SECONDS: f32 = 0.25;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

/// ADSR times in seconds, sustain as a level in [0, 1]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Envelope {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VoiceSettings {
    pub waveform: Waveform,
    pub envelope: Envelope,
    pub volume_db: f32,
}

/// Timbre chosen by whether the colliding stains share a category
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Voice {
    Consonant,
    Dissonant,
}

impl Voice {
    pub fn for_event(event: &CollisionEvent) -> Self {
        if event.same_category() {
            Voice::Consonant
        } else {
            Voice::Dissonant
        }
    }

    pub fn notes(self) -> &'static [Note] {
        match self {
            Voice::Consonant => &CONSONANT_NOTES,
            Voice::Dissonant => &DISSONANT_NOTES,
        }
    }

    pub fn settings(self) -> VoiceSettings {
        match self {
            Voice::Consonant => VoiceSettings {
                waveform: Waveform::Sine,
                envelope: Envelope {
                    attack: 0.05,
                    decay: 0.3,
                    sustain: 0.1,
                    release: 0.5,
                },
                volume_db: -15.0,
            },
            Voice::Dissonant => VoiceSettings {
                waveform: Waveform::Triangle,
                envelope: Envelope {
                    attack: 0.08,
                    decay: 0.4,
                    sustain: 0.15,
                    release: 0.7,
                },
                volume_db: -12.0,
            },
        }
    }
}

/// An external tone generator.
///
/// None of these calls may block the frame loop.
pub trait Synth {
    /// Kick off the start-up handshake
    fn start(&mut self);

    /// True once the handshake has finished and tones can be played
    fn poll_ready(&mut self) -> bool;

    /// Fire-and-forget playback of `note` on `voice` for `seconds`
    fn trigger(&mut self, note: Note, voice: Voice, seconds: f32);

    /// Free voices and devices. Only called after `start`.
    fn release(&mut self);
}

/// Synth that is ready immediately and makes no sound
#[derive(Debug, Default)]
pub struct Silent;

impl Synth for Silent {
    fn start(&mut self) {}

    fn poll_ready(&mut self) -> bool {
        true
    }

    fn trigger(&mut self, _note: Note, _voice: Voice, _seconds: f32) {}

    fn release(&mut self) {}
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AudioState {
    NotStarted,
    Starting,
    Ready,
    Released,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TriggerOutcome {
    Played { note: Note, voice: Voice },
    Dropped(AudioState),
}

/// Owns the synth and its start-up state
pub struct AudioBridge<S: Synth> {
    synth: S,
    state: AudioState,
    played: u32,
    dropped: u32,
}

impl<S: Synth> AudioBridge<S> {
    pub fn new(synth: S) -> Self {
        Self {
            synth,
            state: AudioState::NotStarted,
            played: 0,
            dropped: 0,
        }
    }

    pub fn state(&self) -> AudioState {
        self.state
    }

    pub fn synth(&self) -> &S {
        &self.synth
    }

    /// Tones played and dropped so far
    pub fn counters(&self) -> (u32, u32) {
        (self.played, self.dropped)
    }

    /// Begin starting the synth. Repeated calls are no-ops.
    pub fn unlock(&mut self) {
        match self.state {
            AudioState::NotStarted => {
                log::debug!("audio: starting synth");
                self.synth.start();
                self.state = AudioState::Starting;
                self.poll();
            }
            AudioState::Released => log::debug!("audio: unlock after release ignored"),
            AudioState::Starting | AudioState::Ready => {}
        }
    }

    /// Advance Starting -> Ready once the synth reports in
    pub fn poll(&mut self) -> AudioState {
        if self.state == AudioState::Starting && self.synth.poll_ready() {
            log::info!("audio: synth ready");
            self.state = AudioState::Ready;
        }
        self.state
    }

    /// Play a tone for a collision, or drop it if the synth is not ready
    pub fn on_collision(&mut self, event: &CollisionEvent, rng: &mut StainRng) -> TriggerOutcome {
        if self.state != AudioState::Ready {
            self.dropped = self.dropped.saturating_add(1);
            log::debug!("audio: tone dropped, synth is {:?}", self.state);
            return TriggerOutcome::Dropped(self.state);
        }

        let voice = Voice::for_event(event);
        let notes = voice.notes();
        let note = notes[rng.index(notes.len())];
        self.synth.trigger(note, voice, NOTE_SECONDS);
        self.played = self.played.saturating_add(1);
        TriggerOutcome::Played { note, voice }
    }

    /// Release the synth. Safe to call repeatedly and before `unlock`.
    pub fn shutdown(&mut self) {
        match self.state {
            AudioState::Starting | AudioState::Ready => {
                self.synth.release();
                log::info!(
                    "audio: released ({} played, {} dropped)",
                    self.played,
                    self.dropped
                );
            }
            AudioState::NotStarted | AudioState::Released => {}
        }
        self.state = AudioState::Released;
    }
}
