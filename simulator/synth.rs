//! Tone synthesis on top of kira
//!
//! Each voice/note pair is rendered once into a short PCM buffer on a
//! background thread, which then opens the output device. Until both finish
//! the synth reports not-ready and the scene drops its tones. The frame
//! thread only ever polls the channel.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use kira::sound::static_sound::{StaticSoundData, StaticSoundSettings};
use kira::{AudioManager, AudioManagerSettings, Decibels, DefaultBackend, Frame};
use morii::audio::{Envelope, Waveform, NOTE_SECONDS};
use morii::{Note, Synth, Voice};

use crate::error::{Result, SimulatorError};

pub const SAMPLE_RATE: u32 = 44_100;

type ToneBank = HashMap<(Voice, Note), StaticSoundData>;

/// What the start-up worker hands back
struct Loaded {
    bank: ToneBank,
    manager: Result<AudioManager<DefaultBackend>>,
}

pub struct KiraSynth {
    master_db: f32,
    pending: Option<Receiver<Loaded>>,
    manager: Option<AudioManager<DefaultBackend>>,
    bank: ToneBank,
    /// No device; stay ready but silent
    silent: bool,
}

impl KiraSynth {
    pub fn new(master_db: f32) -> Self {
        Self {
            master_db,
            pending: None,
            manager: None,
            bank: HashMap::new(),
            silent: false,
        }
    }

    pub fn is_audible(&self) -> bool {
        self.manager.is_some()
    }

    fn accept(&mut self, loaded: Loaded) {
        self.bank = loaded.bank;
        match loaded.manager {
            Ok(manager) => {
                log::info!("audio: output device open, {} tones cached", self.bank.len());
                self.manager = Some(manager);
            }
            Err(e) => {
                log::warn!("audio: {e}, running silent");
                self.silent = true;
            }
        }
    }

    fn play(&mut self, note: Note, voice: Voice, seconds: f32) -> Result<()> {
        let Some(manager) = self.manager.as_mut() else {
            return Ok(());
        };
        let sound = if seconds == NOTE_SECONDS {
            match self.bank.get(&(voice, note)) {
                Some(sound) => sound.clone(),
                None => render_tone(note, voice, seconds, self.master_db),
            }
        } else {
            render_tone(note, voice, seconds, self.master_db)
        };
        manager
            .play(sound)
            .map_err(|e| SimulatorError::Audio(format!("failed to play {}: {e}", note.name())))?;
        Ok(())
    }
}

impl Synth for KiraSynth {
    fn start(&mut self) {
        let (tx, rx) = mpsc::channel();
        let master_db = self.master_db;
        thread::spawn(move || {
            let mut bank = ToneBank::new();
            for voice in [Voice::Consonant, Voice::Dissonant] {
                for &note in voice.notes() {
                    bank.insert((voice, note), render_tone(note, voice, NOTE_SECONDS, master_db));
                }
            }
            let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
                .map_err(|e| SimulatorError::Audio(format!("no device available ({e})")));
            // Receiver gone means we were released mid-start
            let _ = tx.send(Loaded { bank, manager });
        });
        self.pending = Some(rx);
    }

    fn poll_ready(&mut self) -> bool {
        if self.manager.is_some() || self.silent {
            return true;
        }
        let Some(rx) = self.pending.as_ref() else {
            return false;
        };
        match rx.try_recv() {
            Ok(loaded) => {
                self.pending = None;
                self.accept(loaded);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                log::warn!("audio: tone renderer died, running silent");
                self.pending = None;
                self.silent = true;
                true
            }
        }
    }

    fn trigger(&mut self, note: Note, voice: Voice, seconds: f32) {
        if let Err(e) = self.play(note, voice, seconds) {
            log::warn!("audio: {e}");
        }
    }

    fn release(&mut self) {
        self.pending = None;
        self.manager = None;
        self.bank.clear();
    }
}

/// ADSR level at `t` seconds for a note held for `gate` seconds
pub fn envelope_level(env: &Envelope, gate: f32, t: f32) -> f32 {
    let held = |t: f32| {
        if t < env.attack {
            t / env.attack.max(f32::EPSILON)
        } else if t < env.attack + env.decay {
            let k = (t - env.attack) / env.decay.max(f32::EPSILON);
            1.0 + (env.sustain - 1.0) * k
        } else {
            env.sustain
        }
    };

    if t < gate {
        held(t)
    } else {
        let k = (t - gate) / env.release.max(f32::EPSILON);
        (held(gate) * (1.0 - k)).max(0.0)
    }
}

/// One sample of `waveform` at `phase` cycles
pub fn oscillator(waveform: Waveform, phase: f32) -> f32 {
    let frac = phase.fract();
    match waveform {
        Waveform::Sine => (frac * std::f32::consts::TAU).sin(),
        Waveform::Triangle => 1.0 - 4.0 * (frac - 0.5).abs(),
    }
}

/// Render `note` on `voice`, release tail included
pub fn render_tone(note: Note, voice: Voice, seconds: f32, master_db: f32) -> StaticSoundData {
    let settings = voice.settings();
    let freq = note.frequency();
    let total = seconds + settings.envelope.release;
    let len = (total * SAMPLE_RATE as f32).ceil() as usize;

    let frames: Arc<[Frame]> = (0..len)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let level = envelope_level(&settings.envelope, seconds, t);
            Frame::from_mono(oscillator(settings.waveform, freq * t) * level)
        })
        .collect();

    StaticSoundData {
        sample_rate: SAMPLE_RATE,
        frames,
        settings: StaticSoundSettings::default(),
        slice: None,
    }
    .volume(Decibels(settings.volume_db + master_db))
}
