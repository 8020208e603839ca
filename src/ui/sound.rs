/// Sound engine: procedural 8-bit style sound effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile with `--no-default-features` or without "sound" feature
/// to disable audio entirely (the stub SoundEngine does nothing).

use crate::domain::combat::AttackPhase;
use crate::sim::event::GameEvent;

/// Map a tick's worth of simulation events onto cues. `None` engine
/// (audio device missing, feature off at the call site's discretion)
/// drops them silently.
pub fn process_events(engine: Option<&SoundEngine>, events: &[GameEvent]) {
    let engine = match engine {
        Some(e) => e,
        None => return,
    };
    for ev in events {
        match ev {
            GameEvent::PlayerSwing { phase: AttackPhase::One } => engine.play_swing(),
            GameEvent::PlayerSwing { phase: AttackPhase::Two } => engine.play_swing_heavy(),
            GameEvent::EnemySwing { .. } => engine.play_enemy_swing(),
            GameEvent::EnemyHit { .. } | GameEvent::PlayerHit { .. } => engine.play_hit(),
            GameEvent::GuardBlock => engine.play_block(),
            GameEvent::EnemyDied { .. } => engine.play_enemy_die(),
            GameEvent::PlayerDied => engine.play_player_die(),
            GameEvent::EncounterCleared => engine.play_cleared(),
            GameEvent::GameOver => engine.play_game_over(),
        }
    }
}

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_swing: Arc<Vec<u8>>,
        sfx_swing_heavy: Arc<Vec<u8>>,
        sfx_enemy_swing: Arc<Vec<u8>>,
        sfx_hit: Arc<Vec<u8>>,
        sfx_block: Arc<Vec<u8>>,
        sfx_enemy_die: Arc<Vec<u8>>,
        sfx_player_die: Arc<Vec<u8>>,
        sfx_cleared: Arc<Vec<u8>>,
        sfx_game_over: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;

            // ── Generate all sound buffers ──
            let sfx_swing = Arc::new(make_wav(&gen_whoosh(520.0, 260.0, 0.09, 0.28)));
            let sfx_swing_heavy = Arc::new(make_wav(&gen_whoosh(380.0, 150.0, 0.14, 0.34)));
            let sfx_enemy_swing = Arc::new(make_wav(&gen_whoosh(300.0, 130.0, 0.12, 0.26)));
            let sfx_hit = Arc::new(make_wav(&gen_thud()));
            let sfx_block = Arc::new(make_wav(&gen_clink()));
            let sfx_enemy_die = Arc::new(make_wav(&gen_enemy_die()));
            let sfx_player_die = Arc::new(make_wav(&gen_player_die()));
            let sfx_cleared = Arc::new(make_wav(&gen_cleared()));
            let sfx_game_over = Arc::new(make_wav(&gen_game_over()));

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_swing,
                sfx_swing_heavy,
                sfx_enemy_swing,
                sfx_hit,
                sfx_block,
                sfx_enemy_die,
                sfx_player_die,
                sfx_cleared,
                sfx_game_over,
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        pub fn play_swing(&self) { self.play(&self.sfx_swing); }
        pub fn play_swing_heavy(&self) { self.play(&self.sfx_swing_heavy); }
        pub fn play_enemy_swing(&self) { self.play(&self.sfx_enemy_swing); }
        pub fn play_hit(&self) { self.play(&self.sfx_hit); }
        pub fn play_block(&self) { self.play(&self.sfx_block); }
        pub fn play_enemy_die(&self) { self.play(&self.sfx_enemy_die); }
        pub fn play_player_die(&self) { self.play(&self.sfx_player_die); }
        pub fn play_cleared(&self) { self.play(&self.sfx_cleared); }
        pub fn play_game_over(&self) { self.play(&self.sfx_game_over); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators — all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    /// Air-cutting whoosh: noise mixed with a tone sliding down from
    /// `f0` to `f1`. Swings at both weights and the enemy's chop are
    /// all this shape at different pitches.
    fn gen_whoosh(f0: f32, f1: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 12345;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = f0 + (f1 - f0) * t;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let tone = (ti * freq * 2.0 * std::f32::consts::PI).sin();
                // Simple LCG noise
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let env = (1.0 - t).powf(0.7);
                (tone * 0.35 + noise * 0.65) * env * volume
            })
            .collect()
    }

    /// Landed hit: low sine thump under a sharp noise burst.
    fn gen_thud() -> Vec<f32> {
        let duration = 0.1;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 777;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let tone = (ti * 140.0 * 2.0 * std::f32::consts::PI).sin();
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let env = (1.0 - t).powf(2.0);
                (tone * 0.7 + noise * 0.3) * env * 0.35
            })
            .collect()
    }

    /// Guarded hit: short metallic clink, two high partials ringing out.
    fn gen_clink() -> Vec<f32> {
        let duration = 0.08;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let wave = (ti * 1244.0 * 2.0 * std::f32::consts::PI).sin() * 0.6
                    + (ti * 1866.0 * 2.0 * std::f32::consts::PI).sin() * 0.4;
                let env = (1.0 - t).powf(3.0);
                wave * env * 0.3
            })
            .collect()
    }

    /// Enemy death: three quick descending notes G4→Eb4→C4
    fn gen_enemy_die() -> Vec<f32> {
        let notes = [392.0_f32, 311.0, 262.0];
        let note_dur = 0.07;
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.4;
                let wave = (t * freq * 2.0 * std::f32::consts::PI).sin();
                samples.push(wave * env * 0.28);
            }
        }
        samples
    }

    /// Player death: slow sad descent G4→E4→C#4→A#3 with a final fade
    fn gen_player_die() -> Vec<f32> {
        let notes = [392.0_f32, 330.0, 277.0, 233.0];
        let note_dur = 0.13;
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.3;
                let wave = (t * freq * 2.0 * std::f32::consts::PI).sin();
                samples.push(wave * env * 0.3);
            }
        }
        // Final fade
        let fade_len = samples.len() / 4;
        let total = samples.len();
        for i in (total - fade_len)..total {
            let ratio = (total - i) as f32 / fade_len as f32;
            samples[i] *= ratio;
        }
        samples
    }

    /// Arena cleared: victory ascending fanfare C5→E5→G5→C6
    fn gen_cleared() -> Vec<f32> {
        let notes = [523.0_f32, 659.0, 784.0, 1047.0];
        let note_dur = 0.1;
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = (SAMPLE_RATE as f32 * note_dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.3;
                let wave = (t * freq * 2.0 * std::f32::consts::PI).sin() * 0.6
                    + (t * freq * 2.0 * 2.0 * std::f32::consts::PI).sin() * 0.3
                    + (t * freq * 3.0 * 2.0 * std::f32::consts::PI).sin() * 0.1;
                samples.push(wave * env * 0.3);
            }
        }
        // Sustain the last note
        let last_freq = 1047.0_f32;
        let n = (SAMPLE_RATE as f32 * 0.25) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32);
            let wave = (t * last_freq * 2.0 * std::f32::consts::PI).sin();
            samples.push(wave * env * 0.3);
        }
        samples
    }

    /// Session over: two heavy low notes G3→D3
    fn gen_game_over() -> Vec<f32> {
        let pairs = [(196.0_f32, 0.22), (147.0, 0.38)];
        let mut samples = Vec::new();
        for &(freq, dur) in &pairs {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                let wave = (t * freq * 2.0 * std::f32::consts::PI).sin() * 0.8
                    + (t * freq * 2.0 * 2.0 * std::f32::consts::PI).sin() * 0.2;
                samples.push(wave * env * 0.32);
            }
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder — wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2; // 16-bit = 2 bytes per sample
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes());  // PCM format
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let clamped = s.max(-1.0).min(1.0);
            let val = (clamped * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API — compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_swing(&self) {}
    pub fn play_swing_heavy(&self) {}
    pub fn play_enemy_swing(&self) {}
    pub fn play_hit(&self) {}
    pub fn play_block(&self) {}
    pub fn play_enemy_die(&self) {}
    pub fn play_player_die(&self) {}
    pub fn play_cleared(&self) {}
    pub fn play_game_over(&self) {}
}
