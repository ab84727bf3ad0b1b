/// Sound engine: procedural chiptune cues via rodio.
///
/// All cues are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink; nothing
/// flows back to the game.
///
/// Compile with `--no-default-features` or without "sound" feature
/// to disable audio entirely (the stub SoundEngine does nothing).

use crate::sim::event::GameEvent;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cue {
    Blip,
    Found,
    Alarm,
    Buzz,
    Reveal,
    Hint,
    Success,
    Failure,
}

const CUE_COUNT: usize = 8;

/// Which cue, if any, an event should make.
pub fn cue_for(event: &GameEvent) -> Option<Cue> {
    let cue = match event {
        GameEvent::DialogueAdvanced | GameEvent::LoginOpened => Cue::Blip,
        GameEvent::ItemFound { .. }
        | GameEvent::ElementSpotted { .. }
        | GameEvent::VerdictCorrect { .. }
        | GameEvent::QuizCorrect => Cue::Found,
        GameEvent::DecoyFound { .. } | GameEvent::PasswordRejected { .. } => Cue::Alarm,
        GameEvent::MissClick { .. }
        | GameEvent::VerdictWrong { .. }
        | GameEvent::QuizWrong
        | GameEvent::HintsExhausted => Cue::Buzz,
        GameEvent::NoteRevealed => Cue::Reveal,
        GameEvent::HintGiven { .. } => Cue::Hint,
        GameEvent::LevelCleared { .. } => Cue::Success,
        GameEvent::MissionFailed { .. } => Cue::Failure,
    };
    Some(cue)
}

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::{Cue, CUE_COUNT};

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = std::f32::consts::TAU;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        /// Indexed by `Cue as usize`.
        buffers: [Arc<Vec<u8>>; CUE_COUNT],
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;
            let buffers = [
                Cue::Blip, Cue::Found, Cue::Alarm, Cue::Buzz,
                Cue::Reveal, Cue::Hint, Cue::Success, Cue::Failure,
            ]
            .map(|cue| Arc::new(make_wav(&generate(cue))));
            Some(SoundEngine { _stream: stream, handle, buffers })
        }

        pub fn play(&self, cue: Cue) {
            let buf = &self.buffers[cue as usize];
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    pub(super) fn generate(cue: Cue) -> Vec<f32> {
        match cue {
            Cue::Blip => notes(&[(880.0, 0.03)], 0.2),
            Cue::Found => notes(&[(1047.0, 0.05), (1568.0, 0.07)], 0.25), // C6, G6
            Cue::Alarm => notes(&[(880.0, 0.08), (660.0, 0.08), (880.0, 0.08), (660.0, 0.08)], 0.3),
            Cue::Buzz => buzz(0.14),
            Cue::Reveal => sweep(400.0, 1400.0, 0.25),
            Cue::Hint => notes(&[(659.0, 0.06), (784.0, 0.06), (988.0, 0.1)], 0.2), // E5 G5 B5
            Cue::Success => notes(&[(523.0, 0.1), (659.0, 0.1), (784.0, 0.1), (1047.0, 0.3)], 0.3),
            Cue::Failure => notes(&[(392.0, 0.15), (330.0, 0.15), (262.0, 0.35)], 0.3),
        }
    }

    /// Note sequence with a sine + 3rd harmonic voice and a per-note decay.
    fn notes(seq: &[(f32, f32)], volume: f32) -> Vec<f32> {
        let mut samples = Vec::new();
        for &(freq, dur) in seq {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.7);
                let wave = (t * freq * TAU).sin() * 0.75 + (t * freq * 3.0 * TAU).sin() * 0.25;
                samples.push(wave * env * volume);
            }
        }
        samples
    }

    /// Rising whistle.
    fn sweep(from: f32, to: f32, duration: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let p = i as f32 / n as f32;
                let freq = from + (to - from) * p;
                phase += freq / SAMPLE_RATE as f32;
                (phase * TAU).sin() * (1.0 - p) * 0.25
            })
            .collect()
    }

    /// Low square-wave buzz for mistakes.
    fn buzz(duration: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let square = if (t * 110.0 * TAU).sin() >= 0.0 { 1.0 } else { -1.0 };
                square * (1.0 - i as f32 / n as f32) * 0.15
            })
            .collect()
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: 16-bit mono PCM
    // ════════════════════════════════════════════════════════════

    pub(super) fn make_wav(samples: &[f32]) -> Vec<u8> {
        let bits_per_sample: u16 = 16;
        let block_align: u16 = bits_per_sample / 8;
        let byte_rate = SAMPLE_RATE * block_align as u32;
        let data_size = samples.len() as u32 * block_align as u32;

        let mut buf = Vec::with_capacity(44 + data_size as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVEfmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes());  // PCM
        buf.extend_from_slice(&1u16.to_le_bytes());  // mono
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }
        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _cue: Cue) {}
}

impl SoundEngine {
    pub fn play_events(&self, events: &[GameEvent]) {
        for cue in events.iter().filter_map(cue_for) {
            self.play(cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_have_distinct_cues() {
        assert_eq!(cue_for(&GameEvent::LevelCleared { level: 1 }), Some(Cue::Success));
        assert_eq!(cue_for(&GameEvent::MissionFailed { level: 2 }), Some(Cue::Failure));
        assert_eq!(cue_for(&GameEvent::NoteRevealed), Some(Cue::Reveal));
        assert_ne!(
            cue_for(&GameEvent::VerdictCorrect { email: 0 }),
            cue_for(&GameEvent::VerdictWrong { email: 0 }),
        );
    }

    #[cfg(feature = "sound")]
    #[test]
    fn wav_header_matches_payload() {
        let samples = inner::generate(Cue::Found);
        let wav = inner::make_wav(&samples);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..16], b"WAVEfmt ");
        let data_size = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]) as usize;
        assert_eq!(data_size, samples.len() * 2);
        assert_eq!(wav.len(), 44 + data_size);
    }
}
