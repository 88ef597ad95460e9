//! Android audio host backed by Oboe output streams.
//!
//! Each realized player owns one output stream whose callback renders the
//! clip's PCM frames. The realtime thread shares state with the engine
//! thread exclusively through atomics: gain, play flag, loop flag and the
//! finished marker that backs the stopped-event contract. Clips are i16
//! little-endian mono PCM; decode happens upstream of the sound core.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use log::warn;
use oboe::{
    AudioOutputCallback, AudioOutputStreamSafe, AudioStream, AudioStreamAsync, AudioStreamBuilder,
    DataCallbackResult, Output, PerformanceMode, SharingMode,
};

use crate::assets::AssetClip;
use crate::platform::{
    AudioHost, EventMask, HostError, HostPlayState, HostResult, Interface, ObjectState, PlayerId,
    DEFAULT_MAX_LEVEL,
};

/// State shared between the engine thread and the realtime callback.
struct ClipState {
    samples: Arc<Vec<f32>>,
    position: AtomicUsize,
    gain_bits: AtomicU32,
    playing: AtomicBool,
    looping: AtomicBool,
    finished: AtomicBool,
}

impl ClipState {
    fn new(samples: Vec<f32>) -> Self {
        Self {
            samples: Arc::new(samples),
            position: AtomicUsize::new(0),
            gain_bits: AtomicU32::new(1.0f32.to_bits()),
            playing: AtomicBool::new(false),
            looping: AtomicBool::new(false),
            finished: AtomicBool::new(false),
        }
    }
}

/// Output callback rendering one clip.
struct ClipCallback {
    state: Arc<ClipState>,
}

impl AudioOutputCallback for ClipCallback {
    type FrameType = (f32, oboe::Mono);

    fn on_audio_ready(
        &mut self,
        _stream: &mut dyn AudioOutputStreamSafe,
        frames: &mut [f32],
    ) -> DataCallbackResult {
        // Realtime thread: atomics only, no allocation, no locks.
        let gain = f32::from_bits(self.state.gain_bits.load(Ordering::Relaxed));
        let looping = self.state.looping.load(Ordering::Relaxed);
        let samples = &self.state.samples;
        let mut pos = self.state.position.load(Ordering::Relaxed);

        for frame in frames.iter_mut() {
            if !self.state.playing.load(Ordering::Relaxed) || samples.is_empty() {
                *frame = 0.0;
                continue;
            }
            if pos >= samples.len() {
                if looping {
                    pos = 0;
                } else {
                    self.state.finished.store(true, Ordering::Relaxed);
                    self.state.playing.store(false, Ordering::Relaxed);
                    *frame = 0.0;
                    continue;
                }
            }
            *frame = samples[pos] * gain;
            pos += 1;
        }

        self.state.position.store(pos, Ordering::Relaxed);
        DataCallbackResult::Continue
    }
}

struct OboePlayer {
    state: Arc<ClipState>,
    stream: Option<AudioStreamAsync<Output, ClipCallback>>,
    level: i32,
    commanded: HostPlayState,
}

/// Oboe-backed [AudioHost] for Android.
pub struct OboeHost {
    players: HashMap<u64, OboePlayer>,
    next_id: u64,
    sample_rate: u32,
}

impl OboeHost {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            players: HashMap::new(),
            next_id: 1,
            sample_rate,
        }
    }

    fn player(&self, id: PlayerId) -> HostResult<&OboePlayer> {
        self.players.get(&id.0).ok_or(HostError::InvalidHandle)
    }

    fn player_mut(&mut self, id: PlayerId) -> HostResult<&mut OboePlayer> {
        self.players.get_mut(&id.0).ok_or(HostError::InvalidHandle)
    }
}

impl AudioHost for OboeHost {
    fn create_player(
        &mut self,
        clip: &AssetClip,
        _interfaces: &[Interface],
    ) -> HostResult<PlayerId> {
        let samples: Vec<f32> = clip
            .bytes()
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 / 32768.0)
            .collect();
        let id = self.next_id;
        self.next_id += 1;
        self.players.insert(
            id,
            OboePlayer {
                state: Arc::new(ClipState::new(samples)),
                stream: None,
                level: DEFAULT_MAX_LEVEL,
                commanded: HostPlayState::Stopped,
            },
        );
        Ok(PlayerId(id))
    }

    fn realize(&mut self, player: PlayerId) -> HostResult<()> {
        let sample_rate = self.sample_rate;
        let p = self.player_mut(player)?;
        if p.stream.is_some() {
            return Ok(());
        }
        let callback = ClipCallback {
            state: Arc::clone(&p.state),
        };
        match AudioStreamBuilder::default()
            .set_performance_mode(PerformanceMode::LowLatency)
            .set_sharing_mode(SharingMode::Shared)
            .set_direction::<Output>()
            .set_sample_rate(sample_rate as i32)
            .set_channel_count::<oboe::Mono>()
            .set_format::<f32>()
            .set_callback(callback)
            .open_stream()
        {
            Ok(stream) => {
                p.stream = Some(stream);
                Ok(())
            }
            Err(e) => {
                warn!("OboeHost: output stream open failed: {:?}", e);
                Err(HostError::Failed)
            }
        }
    }

    fn object_state(&mut self, player: PlayerId) -> HostResult<ObjectState> {
        Ok(if self.player(player)?.stream.is_some() {
            ObjectState::Realized
        } else {
            ObjectState::Unrealized
        })
    }

    fn interface(&mut self, player: PlayerId, _which: Interface) -> HostResult<()> {
        if self.player(player)?.stream.is_none() {
            return Err(HostError::Failed);
        }
        Ok(())
    }

    fn set_callback_mask(&mut self, player: PlayerId, _mask: EventMask) -> HostResult<()> {
        // The finished marker set by the callback backs the stopped event.
        self.player(player)?;
        Ok(())
    }

    fn set_play_state(&mut self, player: PlayerId, state: HostPlayState) -> HostResult<()> {
        let p = self.player_mut(player)?;
        let Some(stream) = p.stream.as_mut() else {
            return Err(HostError::Failed);
        };
        match state {
            HostPlayState::Playing => {
                if p.state.finished.swap(false, Ordering::Relaxed) {
                    p.state.position.store(0, Ordering::Relaxed);
                }
                p.state.playing.store(true, Ordering::Relaxed);
                if stream.start().is_err() {
                    return Err(HostError::Failed);
                }
            }
            HostPlayState::Paused => {
                p.state.playing.store(false, Ordering::Relaxed);
                if stream.pause().is_err() {
                    return Err(HostError::Failed);
                }
            }
            HostPlayState::Stopped => {
                p.state.playing.store(false, Ordering::Relaxed);
                p.state.position.store(0, Ordering::Relaxed);
                p.state.finished.store(false, Ordering::Relaxed);
                if stream.stop().is_err() {
                    return Err(HostError::Failed);
                }
            }
        }
        p.commanded = state;
        Ok(())
    }

    fn play_state(&mut self, player: PlayerId) -> HostResult<HostPlayState> {
        let p = self.player(player)?;
        if p.commanded == HostPlayState::Playing && p.state.finished.load(Ordering::Relaxed) {
            return Ok(HostPlayState::Stopped);
        }
        Ok(p.commanded)
    }

    fn set_looping(&mut self, player: PlayerId, looping: bool) -> HostResult<()> {
        self.player(player)?
            .state
            .looping
            .store(looping, Ordering::Relaxed);
        Ok(())
    }

    fn max_volume_level(&mut self, player: PlayerId) -> HostResult<i32> {
        self.player(player)?;
        Ok(DEFAULT_MAX_LEVEL)
    }

    fn set_volume_level(&mut self, player: PlayerId, level: i32) -> HostResult<()> {
        let p = self.player_mut(player)?;
        p.level = level;
        // Millibels are hundredths of a decibel; amplitude = 10^(dB / 20).
        let gain = 10f32.powf(level as f32 / 2000.0);
        p.state.gain_bits.store(gain.to_bits(), Ordering::Relaxed);
        Ok(())
    }

    fn volume_level(&mut self, player: PlayerId) -> HostResult<i32> {
        Ok(self.player(player)?.level)
    }

    fn set_muted(&mut self, _player: PlayerId, _muted: bool) -> HostResult<()> {
        // AAudio exposes no per-stream mute switch; callers emulate.
        Err(HostError::Unsupported)
    }

    fn muted(&mut self, _player: PlayerId) -> HostResult<bool> {
        Err(HostError::Unsupported)
    }

    fn destroy(&mut self, player: PlayerId) {
        if let Some(mut p) = self.players.remove(&player.0) {
            p.state.playing.store(false, Ordering::Relaxed);
            if let Some(mut stream) = p.stream.take() {
                let _ = stream.stop();
            }
        }
    }
}
