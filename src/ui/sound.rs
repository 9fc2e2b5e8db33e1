/// Sound effects, synthesised at start-up and played through rodio.
///
/// Every effect is rendered once into an in-memory WAV buffer; playback is
/// fire-and-forget on a detached Sink. Without the "sound" feature the
/// engine is a stub that does nothing.

use crate::sim::event::GameEvent;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sfx {
    Strawberry,
    Jump,
    Land,
    HealthUp,
    Hurt,
    Clear,
    GameOver,
}

impl Sfx {
    pub const ALL: [Sfx; 7] = [
        Sfx::Strawberry, Sfx::Jump, Sfx::Land, Sfx::HealthUp,
        Sfx::Hurt, Sfx::Clear, Sfx::GameOver,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// The effect that goes with a simulation event.
pub fn sfx_for(event: &GameEvent) -> Option<Sfx> {
    match event {
        GameEvent::StrawberryCollected { .. } => Some(Sfx::Strawberry),
        GameEvent::Jumped => Some(Sfx::Jump),
        GameEvent::Landed => Some(Sfx::Land),
        GameEvent::HealthGained => Some(Sfx::HealthUp),
        GameEvent::FellOffScreen => Some(Sfx::Hurt),
        GameEvent::LevelCompleted => Some(Sfx::Clear),
        GameEvent::GameOver => Some(Sfx::GameOver),
    }
}

#[cfg(feature = "sound")]
mod inner {
    use std::f32::consts::TAU;
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use tracing::{debug, warn};

    use super::Sfx;

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        buffers: Vec<Arc<Vec<u8>>>,
        volume: f32,
    }

    impl SoundEngine {
        /// `None` when no audio device is available.
        pub fn new(volume: u8) -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(error = %e, "no audio output, sound disabled");
                    return None;
                }
            };
            let buffers = Sfx::ALL.iter()
                .map(|&s| Arc::new(make_wav(&synth(s))))
                .collect();
            debug!("sound effects generated");
            Some(SoundEngine {
                _stream: stream,
                handle,
                buffers,
                volume: volume_scale(volume),
            })
        }

        pub fn set_volume(&mut self, volume: u8) {
            self.volume = volume_scale(volume);
        }

        pub fn play(&self, sfx: Sfx) {
            if self.volume <= 0.0 {
                return;
            }
            let buf = &self.buffers[sfx.index()];
            if let Ok(sink) = Sink::try_new(&self.handle) {
                if let Ok(src) = Decoder::new(Cursor::new(buf.as_ref().clone())) {
                    sink.set_volume(self.volume);
                    sink.append(src);
                    sink.detach();
                }
            }
        }
    }

    fn volume_scale(volume: u8) -> f32 {
        volume.min(100) as f32 / 100.0
    }

    // ── Synthesis ──

    #[derive(Clone, Copy)]
    enum Wave {
        Sine,
        /// Sine plus a third harmonic: a soft square.
        Retro,
    }

    /// One note: start and end frequency (a glide when they differ), length.
    struct Note(f32, f32, f32);

    fn render(notes: &[Note], wave: Wave, gain: f32) -> Vec<f32> {
        let mut out = Vec::new();
        for &Note(f0, f1, secs) in notes {
            let n = (SAMPLE_RATE as f32 * secs) as usize;
            let mut phase = 0.0_f32;
            for i in 0..n {
                let t = i as f32 / n as f32;
                let freq = f0 + (f1 - f0) * t;
                phase += freq / SAMPLE_RATE as f32;
                let s = match wave {
                    Wave::Sine => (phase * TAU).sin(),
                    Wave::Retro => (phase * TAU).sin() * 0.7 + (phase * 3.0 * TAU).sin() * 0.3,
                };
                out.push(s * (1.0 - t).sqrt() * gain);
            }
        }
        out
    }

    pub(super) fn synth(sfx: Sfx) -> Vec<f32> {
        match sfx {
            // C6 E6 G6
            Sfx::Strawberry => render(
                &[Note(1047.0, 1047.0, 0.04), Note(1319.0, 1319.0, 0.04), Note(1568.0, 1568.0, 0.06)],
                Wave::Retro, 0.25,
            ),
            Sfx::Jump => render(&[Note(300.0, 700.0, 0.10)], Wave::Retro, 0.2),
            Sfx::Land => render(&[Note(140.0, 90.0, 0.05)], Wave::Sine, 0.3),
            // G5 C6 E6
            Sfx::HealthUp => render(
                &[Note(784.0, 784.0, 0.07), Note(1047.0, 1047.0, 0.07), Note(1319.0, 1319.0, 0.15)],
                Wave::Sine, 0.3,
            ),
            Sfx::Hurt => render(&[Note(600.0, 150.0, 0.30)], Wave::Retro, 0.3),
            // C5 E5 G5 C6, last one held
            Sfx::Clear => render(
                &[
                    Note(523.0, 523.0, 0.1), Note(659.0, 659.0, 0.1),
                    Note(784.0, 784.0, 0.1), Note(1047.0, 1047.0, 0.35),
                ],
                Wave::Retro, 0.3,
            ),
            // A4 F#4 Eb4 C4
            Sfx::GameOver => render(
                &[
                    Note(440.0, 440.0, 0.15), Note(370.0, 370.0, 0.15),
                    Note(311.0, 311.0, 0.15), Note(261.0, 200.0, 0.45),
                ],
                Wave::Sine, 0.3,
            ),
        }
    }

    /// 16-bit mono PCM WAV.
    pub(super) fn make_wav(samples: &[f32]) -> Vec<u8> {
        let data_len = samples.len() as u32 * 2;
        let mut wav = Vec::with_capacity(44 + data_len as usize);

        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVE");

        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
        wav.extend_from_slice(&1u16.to_le_bytes()); // mono
        wav.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        wav.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());

        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        for &s in samples {
            let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            wav.extend_from_slice(&v.to_le_bytes());
        }
        wav
    }
}

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new(_volume: u8) -> Option<Self> { Some(SoundEngine) }
    pub fn set_volume(&mut self, _volume: u8) {}
    pub fn play(&self, _sfx: Sfx) {}
}
