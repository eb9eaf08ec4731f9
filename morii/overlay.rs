//! Cinematic captions

pub const CAPTIONS: [&str; 4] = [
    "Morii \u{2014} the desire to capture\na fleeting moment",
    "Collisions create harmony",
    "Stains fade, memories remain",
    "Every encounter leaves a mark",
];

/// Caption text and its opacity for this frame
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Caption {
    pub text: &'static str,
    pub alpha: f32,
}

/// Which caption to show `frame` frames into cinematic playback.
///
/// Each day cycle opens with `caption_frames` of text: fade in over the first
/// half, out over the second. Phases past the last caption stay blank.
pub fn caption(frame: u32, day_duration: u32, caption_frames: u32) -> Option<Caption> {
    let day_duration = day_duration.max(1);
    let phase = (frame / day_duration) as usize;
    let phase_time = frame % day_duration;
    if phase_time >= caption_frames {
        return None;
    }
    let text = CAPTIONS.get(phase)?;
    let half = (caption_frames as f32 / 2.0).max(1.0);
    let t = phase_time as f32;
    let alpha = if t < half { t / half } else { 1.0 - (t - half) / half };
    Some(Caption {
        text,
        alpha: alpha.clamp(0.0, 1.0),
    })
}
