//! Platform player object lifecycle.
//!
//! [PlayerSlot] walks one player object through the host's object model:
//! create → realize → bind the play interface → install the completion mask.
//! Creation-path failures are fatal to the sound (logged, setup aborted, no
//! retry); volume-path failures degrade to defaults. The volume interface is
//! never cached: every volume or mute operation re-acquires it behind a
//! realized-state guard.

use log::{debug, warn};

use crate::assets::AssetClip;
use crate::error::{log_sound_error, SoundError};
use crate::platform::{
    AudioHost, EventMask, HostError, HostPlayState, HostResult, Interface, ObjectState, PlayerId,
    PLAYER_INTERFACES,
};

/// Floor of the platform volume scale, in millibels.
pub const MIN_VOLUME_LEVEL: i32 = -32768;

/// Ceiling assumed when the host cannot report its own maximum.
pub const DEFAULT_MAX_LEVEL: i32 = 0;

/// Map a linear [0, 1] volume onto the platform's logarithmic level scale.
///
/// This encodes the perceptual-to-linear conversion contract shared with the
/// platform mixers; the inverse is [linear_from_level].
pub fn level_from_linear(volume: f32, max_level: i32) -> i32 {
    ((1.0 - volume) * (MIN_VOLUME_LEVEL - max_level) as f32) as i32 + max_level
}

/// Inverse of [level_from_linear].
pub fn linear_from_level(level: i32, max_level: i32) -> f32 {
    (level - MIN_VOLUME_LEVEL) as f32 / (max_level - MIN_VOLUME_LEVEL) as f32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    /// No platform object exists.
    Vacant,
    /// Object realized and play interface bound.
    Bound(PlayerId),
}

/// Exclusively-owned handle to one platform player object.
///
/// The slot is the only owner of the object it creates; it must be destroyed
/// through [PlayerSlot::destroy] before the slot is discarded or reloaded.
/// Operations on a vacant slot are guarded no-ops, not errors.
#[derive(Debug)]
pub struct PlayerSlot {
    binding: Binding,
}

impl Default for PlayerSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerSlot {
    pub fn new() -> Self {
        Self {
            binding: Binding::Vacant,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.binding, Binding::Bound(_))
    }

    pub fn player(&self) -> Option<PlayerId> {
        match self.binding {
            Binding::Bound(id) => Some(id),
            Binding::Vacant => None,
        }
    }

    /// Run the creation sequence against the host.
    ///
    /// Any failure before the play interface is bound aborts the remaining
    /// steps, tears down whatever was allocated, and reports the categorized
    /// error. A callback-mask failure is logged but does not abort.
    pub fn create<H: AudioHost>(
        &mut self,
        host: &mut H,
        clip: &AssetClip,
    ) -> Result<(), SoundError> {
        // Release any previous object before taking a new one.
        self.destroy(host);

        let id = match host.create_player(clip, &PLAYER_INTERFACES) {
            Ok(id) => id,
            Err(_) => {
                let err = SoundError::PlayerCreateFailed;
                log_sound_error(&err, "create_player");
                return Err(err);
            }
        };

        if host.realize(id).is_err() {
            host.destroy(id);
            let err = SoundError::PlayerRealizeFailed;
            log_sound_error(&err, "create_player");
            return Err(err);
        }

        if host.interface(id, Interface::Play).is_err() {
            host.destroy(id);
            let err = SoundError::PlayInterfaceFailed;
            log_sound_error(&err, "create_player");
            return Err(err);
        }

        if host.set_callback_mask(id, EventMask::STOPPED).is_err() {
            log_sound_error(&SoundError::CallbackMaskFailed, "create_player");
        }

        self.binding = Binding::Bound(id);
        Ok(())
    }

    /// Tear the player object down.
    ///
    /// Only an object the host reports as realized is destroyed; it is
    /// forced to the paused play state first. A handle the host no longer
    /// recognizes is simply forgotten.
    pub fn destroy<H: AudioHost>(&mut self, host: &mut H) {
        let Binding::Bound(id) = self.binding else {
            return;
        };
        match host.object_state(id) {
            Ok(ObjectState::Realized) => {
                let _ = host.set_play_state(id, HostPlayState::Paused);
                host.destroy(id);
                self.binding = Binding::Vacant;
                debug!("Sound: player destroyed");
            }
            Ok(ObjectState::Unrealized) => {
                // Guarded no-op; the object is not safe to control yet.
            }
            Err(_) => {
                self.binding = Binding::Vacant;
            }
        }
    }

    /// Command a play-state transition through the bound play interface.
    pub fn command<H: AudioHost>(&mut self, host: &mut H, state: HostPlayState) {
        let Binding::Bound(id) = self.binding else {
            return;
        };
        if host.set_play_state(id, state).is_err() {
            warn!("Sound: play state change rejected by host");
        }
    }

    /// Current host play state, or None when the slot is vacant or the host
    /// refuses the query.
    pub fn play_state<H: AudioHost>(&self, host: &mut H) -> Option<HostPlayState> {
        let Binding::Bound(id) = self.binding else {
            return None;
        };
        host.play_state(id).ok()
    }

    /// Toggle whole-clip looping on the player.
    pub fn set_looping<H: AudioHost>(&mut self, host: &mut H, looping: bool) {
        let Binding::Bound(id) = self.binding else {
            return;
        };
        if host.set_looping(id, looping).is_err() {
            warn!("Sound: loop flag rejected by host");
        }
    }

    /// Guarded volume-interface acquisition.
    ///
    /// The interface is only queried when the slot is bound AND the host
    /// reports the object realized; otherwise the volume path degrades
    /// without touching the host.
    fn volume_control<H: AudioHost>(&self, host: &mut H) -> Option<PlayerId> {
        let Binding::Bound(id) = self.binding else {
            return None;
        };
        if host.object_state(id) != Ok(ObjectState::Realized) {
            return None;
        }
        match host.interface(id, Interface::Volume) {
            Ok(()) => Some(id),
            Err(_) => {
                log_sound_error(&SoundError::VolumeInterfaceFailed, "volume_control");
                None
            }
        }
    }

    /// Push a linear [0, 1] volume to the player, mapping it onto the
    /// platform level scale. Degrades to a no-op when the volume interface
    /// is unavailable.
    pub fn apply_volume<H: AudioHost>(&self, host: &mut H, volume: f32) {
        let Some(id) = self.volume_control(host) else {
            return;
        };
        let volume = volume.clamp(0.0, 1.0);
        let max_level = match host.max_volume_level(id) {
            Ok(level) => level,
            Err(_) => {
                log_sound_error(&SoundError::MaxVolumeLevelFailed, "apply_volume");
                DEFAULT_MAX_LEVEL
            }
        };
        let level = level_from_linear(volume, max_level);
        if host.set_volume_level(id, level).is_err() {
            log_sound_error(&SoundError::VolumeSetFailed, "apply_volume");
        }
    }

    /// Read the player's volume back as a linear [0, 1] value, or 0.0 when
    /// the volume interface is unavailable.
    pub fn volume<H: AudioHost>(&self, host: &mut H) -> f32 {
        let Some(id) = self.volume_control(host) else {
            return 0.0;
        };
        let level = match host.volume_level(id) {
            Ok(level) => level,
            Err(_) => {
                log_sound_error(&SoundError::VolumeGetFailed, "volume");
                return 0.0;
            }
        };
        let max_level = match host.max_volume_level(id) {
            Ok(level) => level,
            Err(_) => {
                log_sound_error(&SoundError::MaxVolumeLevelFailed, "volume");
                DEFAULT_MAX_LEVEL
            }
        };
        linear_from_level(level, max_level)
    }

    /// Engage the host's native mute switch.
    ///
    /// `Err(HostError::Unsupported)` means the platform has no mute
    /// interface and the caller must emulate.
    pub fn set_muted<H: AudioHost>(&self, host: &mut H, muted: bool) -> HostResult<()> {
        let Some(id) = self.volume_control(host) else {
            return Err(HostError::InvalidHandle);
        };
        host.set_muted(id, muted).map_err(|err| {
            if err != HostError::Unsupported {
                log_sound_error(&SoundError::MuteSetFailed, "set_muted");
            }
            err
        })
    }

    /// Read back the host's native mute switch.
    pub fn muted<H: AudioHost>(&self, host: &mut H) -> HostResult<bool> {
        let Some(id) = self.volume_control(host) else {
            return Err(HostError::InvalidHandle);
        };
        host.muted(id).map_err(|err| {
            if err != HostError::Unsupported {
                log_sound_error(&SoundError::MuteGetFailed, "muted");
            }
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::StubHost;

    fn clip() -> AssetClip {
        AssetClip::from_bytes(vec![0u8; 64])
    }

    #[test]
    fn create_binds_after_full_sequence() {
        let mut host = StubHost::new();
        let mut slot = PlayerSlot::new();

        assert!(slot.create(&mut host, &clip()).is_ok());
        assert!(slot.is_bound());
        assert_eq!(host.create_calls(), 1);
        assert_eq!(host.realize_calls(), 1);
        // Play interface bound during create.
        assert!(host.interface_calls() >= 1);
        assert_eq!(host.callback_mask_calls(), 1);
        // Completion interest was registered.
        let id = slot.player().unwrap();
        assert_eq!(host.callback_mask(id), Some(EventMask::STOPPED));
    }

    #[test]
    fn create_failure_aborts_before_realize() {
        let mut host = StubHost::new();
        host.set_fail_create(true);
        let mut slot = PlayerSlot::new();

        assert_eq!(
            slot.create(&mut host, &clip()),
            Err(SoundError::PlayerCreateFailed)
        );
        assert!(!slot.is_bound());
        assert_eq!(host.realize_calls(), 0);
        assert_eq!(host.interface_calls(), 0);
        assert_eq!(host.callback_mask_calls(), 0);
    }

    #[test]
    fn realize_failure_destroys_the_half_made_object() {
        let mut host = StubHost::new();
        host.set_fail_realize(true);
        let mut slot = PlayerSlot::new();

        assert_eq!(
            slot.create(&mut host, &clip()),
            Err(SoundError::PlayerRealizeFailed)
        );
        assert!(!slot.is_bound());
        assert_eq!(host.live_players(), 0);
        assert_eq!(host.interface_calls(), 0);
    }

    #[test]
    fn play_interface_failure_aborts_setup() {
        let mut host = StubHost::new();
        host.set_deny_play_interface(true);
        let mut slot = PlayerSlot::new();

        assert_eq!(
            slot.create(&mut host, &clip()),
            Err(SoundError::PlayInterfaceFailed)
        );
        assert!(!slot.is_bound());
        assert_eq!(host.callback_mask_calls(), 0);
        assert_eq!(host.live_players(), 0);
    }

    #[test]
    fn callback_mask_failure_does_not_abort() {
        let mut host = StubHost::new();
        host.set_fail_callback_mask(true);
        let mut slot = PlayerSlot::new();

        assert!(slot.create(&mut host, &clip()).is_ok());
        assert!(slot.is_bound());
    }

    #[test]
    fn destroy_pauses_then_tears_down() {
        let mut host = StubHost::new();
        let mut slot = PlayerSlot::new();
        slot.create(&mut host, &clip()).unwrap();
        slot.command(&mut host, HostPlayState::Playing);

        slot.destroy(&mut host);
        assert!(!slot.is_bound());
        assert_eq!(host.live_players(), 0);
        assert_eq!(host.destroy_calls(), 1);
        // Pause was forced before the object went away.
        assert_eq!(host.last_destroyed_play_state(), Some(HostPlayState::Paused));
    }

    #[test]
    fn reload_releases_the_previous_object() {
        let mut host = StubHost::new();
        let mut slot = PlayerSlot::new();
        slot.create(&mut host, &clip()).unwrap();
        let first = slot.player().unwrap();

        slot.create(&mut host, &clip()).unwrap();
        let second = slot.player().unwrap();
        assert_ne!(first, second);
        assert_eq!(host.live_players(), 1);
    }

    #[test]
    fn vacant_slot_operations_are_no_ops() {
        let mut host = StubHost::new();
        let slot = PlayerSlot::new();

        slot.apply_volume(&mut host, 0.5);
        assert_eq!(slot.volume(&mut host), 0.0);
        assert_eq!(slot.set_muted(&mut host, true), Err(HostError::InvalidHandle));
        assert_eq!(host.interface_calls(), 0);
    }

    #[test]
    fn volume_round_trips_through_the_level_scale() {
        let mut host = StubHost::new();
        let mut slot = PlayerSlot::new();
        slot.create(&mut host, &clip()).unwrap();

        for &v in &[0.0f32, 0.25, 0.5, 0.75, 1.0] {
            slot.apply_volume(&mut host, v);
            assert!(
                (slot.volume(&mut host) - v).abs() < 1e-3,
                "round trip failed for {}",
                v
            );
        }
    }

    #[test]
    fn denied_volume_interface_degrades_to_defaults() {
        let mut host = StubHost::new();
        host.set_deny_volume_interface(true);
        let mut slot = PlayerSlot::new();
        slot.create(&mut host, &clip()).unwrap();

        slot.apply_volume(&mut host, 0.8);
        assert_eq!(slot.volume(&mut host), 0.0);
        assert_eq!(slot.muted(&mut host), Err(HostError::InvalidHandle));
    }

    #[test]
    fn level_mapping_matches_the_platform_contract() {
        // level = (1 - v) * (MIN - max) + max
        assert_eq!(level_from_linear(1.0, 0), 0);
        assert_eq!(level_from_linear(0.0, 0), MIN_VOLUME_LEVEL);
        assert_eq!(level_from_linear(0.5, 0), MIN_VOLUME_LEVEL / 2);

        for &v in &[0.0f32, 0.25, 0.5, 0.75, 1.0] {
            let level = level_from_linear(v, 0);
            assert!((linear_from_level(level, 0) - v).abs() < 1e-3);
        }
    }
}
