//! morii - café visitors as drifting coffee stains
//! No heap allocation, no_std compatible
//!
//! Each day's head count becomes a scene of stains that drift, bump and
//! bounce. Every resolved bump asks a [`Synth`] for a tone: consonant when
//! both stains share an age group, dissonant otherwise. The host drives
//! [`Cafe::step`] once per display frame and draws from the accessors.

#![cfg_attr(not(test), no_std)]

pub mod audio;
pub mod cafe;
pub mod collision;
pub mod dataset;
pub mod entity;
pub mod field;
pub mod overlay;
pub mod physics;
pub mod proximity;
pub mod rng;
pub mod settings;
pub mod shape;

pub use audio::{AudioBridge, AudioState, Note, Silent, Synth, TriggerOutcome, Voice, VoiceSettings};
pub use cafe::{Cafe, FrameReport, HostUi, SceneState, MAX_ENTITIES};
pub use collision::{CollisionEvent, Link};
pub use dataset::{Category, DayRecord, Hsb, DAYS, MAX_CAPACITY};
pub use entity::{Entity, EntityFactory, Viewport};
pub use field::{SmoothField, ValueNoise};
pub use overlay::Caption;
pub use rng::StainRng;
pub use settings::{PlaybackMode, Settings};
pub use shape::{Offset, StainShape, STAIN_POINTS};
