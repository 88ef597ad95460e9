//! Sound facade.
//!
//! [Sound] composes the playback tracker, the volume stack, the channel slot
//! and the platform player lifecycle into the object scene code talks to.
//! All platform access goes through the guarded [PlayerSlot], so every
//! operation stays a safe no-op while the sound is unloaded.

mod channel;
mod state;
mod volume;

pub use channel::ChannelSlot;
pub use state::{PlaybackState, PlaybackTracker, LOOP_INFINITE};
pub use volume::VolumeStack;

use crate::assets::AssetSource;
use crate::error::{log_sound_error, SoundError};
use crate::platform::{AudioHost, HostError, HostPlayState, PlayerId, PlayerSlot};

/// One sound instance: a clip path, its playback state, its volume factors
/// and the platform player it exclusively owns.
///
/// The platform player is created lazily by [Sound::load] and must be
/// released with [Sound::unload] before the sound is discarded.
pub struct Sound {
    path: String,
    tracker: PlaybackTracker,
    volume: VolumeStack,
    channel: ChannelSlot,
    player: PlayerSlot,
    muted: bool,
}

impl Sound {
    /// Create an unloaded sound for the given asset path. Volume factors
    /// default to 1.0, channel 0 unassigned, state stopped.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            tracker: PlaybackTracker::new(),
            volume: VolumeStack::new(),
            channel: ChannelSlot::new(),
            player: PlayerSlot::new(),
            muted: false,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Open the asset and run the platform creation sequence.
    ///
    /// A resource failure leaves the sound untouched; a creation-path
    /// failure transitions it to stopped. Either way the error has already
    /// been logged when this returns.
    pub fn load<H: AudioHost>(
        &mut self,
        host: &mut H,
        assets: &dyn AssetSource,
    ) -> Result<(), SoundError> {
        let clip = match assets.open(&self.path) {
            Ok(clip) => clip,
            Err(err) => {
                log_sound_error(&err, "load");
                return Err(err);
            }
        };
        if let Err(err) = self.player.create(host, &clip) {
            self.tracker.stop();
            return Err(err);
        }
        Ok(())
    }

    /// Release the platform player. The playback state is untouched; the
    /// sound can be loaded again later.
    pub fn unload<H: AudioHost>(&mut self, host: &mut H) {
        self.player.destroy(host);
    }

    pub fn is_loaded(&self) -> bool {
        self.player.is_bound()
    }

    /// Host-side player handle, while loaded.
    pub fn player(&self) -> Option<PlayerId> {
        self.player.player()
    }

    /// Start playback. [LOOP_INFINITE] loops until stopped.
    pub fn play<H: AudioHost>(&mut self, host: &mut H, loop_count: i32) {
        self.tracker.play(loop_count);
        self.player.set_looping(host, self.tracker.is_looping());
        self.player.command(host, HostPlayState::Playing);
    }

    pub fn stop<H: AudioHost>(&mut self, host: &mut H) {
        self.tracker.stop();
        self.player.command(host, HostPlayState::Stopped);
    }

    pub fn pause<H: AudioHost>(&mut self, host: &mut H) {
        self.tracker.pause();
        self.player.command(host, HostPlayState::Paused);
    }

    /// Resume playback. The host command is only issued when the platform
    /// actually reports the player paused.
    pub fn resume<H: AudioHost>(&mut self, host: &mut H) {
        self.tracker.resume();
        if self.player.play_state(host) == Some(HostPlayState::Paused) {
            self.player.command(host, HostPlayState::Playing);
        }
    }

    /// Poll the host for end-of-clip: a playing sound whose platform player
    /// ran out transitions back to stopped.
    pub fn refresh<H: AudioHost>(&mut self, host: &mut H) {
        if self.tracker.is_playing()
            && self.player.play_state(host) == Some(HostPlayState::Stopped)
        {
            self.tracker.stop();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.tracker.is_stopped()
    }

    pub fn is_playing(&self) -> bool {
        self.tracker.is_playing()
    }

    pub fn is_paused(&self) -> bool {
        self.tracker.is_paused()
    }

    pub fn is_looping(&self) -> bool {
        self.tracker.is_looping()
    }

    pub fn state(&self) -> PlaybackState {
        self.tracker.state()
    }

    /// Set all three volume factors and push the recomputed effective
    /// volume to the platform.
    pub fn set_complete_volume<H: AudioHost>(
        &mut self,
        host: &mut H,
        base: f32,
        channel: f32,
        master: f32,
    ) {
        self.volume.set_all(base, channel, master);
        self.push_volume(host);
    }

    pub fn set_base_volume<H: AudioHost>(&mut self, host: &mut H, volume: f32) {
        self.volume.set_base(volume);
        self.push_volume(host);
    }

    pub fn set_channel_volume<H: AudioHost>(&mut self, host: &mut H, volume: f32) {
        self.volume.set_channel(volume);
        self.push_volume(host);
    }

    pub fn set_master_volume<H: AudioHost>(&mut self, host: &mut H, volume: f32) {
        self.volume.set_master(volume);
        self.push_volume(host);
    }

    pub fn raise_volume<H: AudioHost>(&mut self, host: &mut H, delta: f32) {
        self.volume.raise(delta);
        self.push_volume(host);
    }

    pub fn lower_volume<H: AudioHost>(&mut self, host: &mut H, delta: f32) {
        self.volume.lower(delta);
        self.push_volume(host);
    }

    pub fn base_volume(&self) -> f32 {
        self.volume.base()
    }

    pub fn effective_volume(&self) -> f32 {
        self.volume.effective()
    }

    /// Volume as the platform reports it, 0.0 when unavailable.
    pub fn platform_volume<H: AudioHost>(&self, host: &mut H) -> f32 {
        self.player.volume(host)
    }

    /// Mute or unmute. Platforms with a native mute interface are driven
    /// directly; everywhere else muting is emulated by forcing the pushed
    /// volume to zero, and unmuting recomputes the effective volume, so the
    /// operation is idempotent.
    pub fn set_muted<H: AudioHost>(&mut self, host: &mut H, muted: bool) {
        self.muted = muted;
        let _ = self.player.set_muted(host, muted);
        self.push_volume(host);
    }

    pub fn is_muted<H: AudioHost>(&self, host: &mut H) -> bool {
        match self.player.muted(host) {
            Ok(muted) => muted,
            Err(_) => self.muted,
        }
    }

    /// Assign the sound to a mixing-group channel, returning the channel
    /// that was released if it already had one.
    pub fn set_channel(&mut self, channel: u8) -> Option<u8> {
        self.channel.assign(channel)
    }

    pub fn release_channel(&mut self) {
        self.channel.release();
    }

    /// Stored channel id; meaningful only while `is_channel_assigned()`.
    pub fn channel(&self) -> u8 {
        self.channel.channel()
    }

    pub fn is_channel_assigned(&self) -> bool {
        self.channel.is_assigned()
    }

    fn push_volume<H: AudioHost>(&self, host: &mut H) {
        let volume = if self.muted && !self.native_mute(host) {
            0.0
        } else {
            self.volume.effective()
        };
        self.player.apply_volume(host, volume);
    }

    /// Whether the platform drives muting itself.
    fn native_mute<H: AudioHost>(&self, host: &mut H) -> bool {
        !matches!(self.player.muted(host), Err(HostError::Unsupported))
    }
}
