// Sound error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Sound error code constants shared with the engine shell
///
/// These constants provide a single source of truth for error codes
/// reported by the sound core. Scripting layers embed them instead of
/// matching on message text.
///
/// Error code range: 1001-1012
pub struct SoundErrorCodes {}

impl SoundErrorCodes {
    /// Resource collaborator could not open the requested asset
    pub const RESOURCE_OPEN_FAILED: i32 = 1001;

    /// Platform audio engine could not be brought up
    pub const ENGINE_CREATE_FAILED: i32 = 1002;

    /// Platform audio player object could not be created
    pub const PLAYER_CREATE_FAILED: i32 = 1003;

    /// Platform audio player object could not be realized
    pub const PLAYER_REALIZE_FAILED: i32 = 1004;

    /// Play interface could not be acquired from the player object
    pub const PLAY_INTERFACE_FAILED: i32 = 1005;

    /// Player completion callback mask could not be installed
    pub const CALLBACK_MASK_FAILED: i32 = 1006;

    /// Volume interface could not be acquired from the player object
    pub const VOLUME_INTERFACE_FAILED: i32 = 1007;

    /// Maximum volume level query failed
    pub const MAX_VOLUME_LEVEL_FAILED: i32 = 1008;

    /// Volume level could not be written to the player
    pub const VOLUME_SET_FAILED: i32 = 1009;

    /// Volume level could not be read back from the player
    pub const VOLUME_GET_FAILED: i32 = 1010;

    /// Mute state could not be written to the player
    pub const MUTE_SET_FAILED: i32 = 1011;

    /// Mute state could not be read back from the player
    pub const MUTE_GET_FAILED: i32 = 1012;
}

/// Log a sound error with structured context
///
/// Logs the numeric code alongside the categorized message so existing
/// log scrapers keep matching the diagnostics the platform backends
/// have always emitted. The logging is non-blocking and will not panic
/// on failure.
pub fn log_sound_error(err: &SoundError, context: &str) {
    error!(
        "Sound error in {}: code={}, component=SoundCore, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Sound-core errors
///
/// These errors cover the platform audio object lifecycle (create,
/// realize, interface binding, destruction) and the volume/mute control
/// paths. Creation-path failures are fatal to the affected sound;
/// volume-path failures degrade to defaults.
///
/// Error code range: 1001-1012
#[derive(Debug, Clone, PartialEq)]
pub enum SoundError {
    /// Resource collaborator could not open the requested asset
    ResourceOpenFailed { path: String },

    /// Platform audio engine could not be brought up
    EngineCreateFailed { reason: String },

    /// Platform audio player object could not be created
    PlayerCreateFailed,

    /// Platform audio player object could not be realized
    PlayerRealizeFailed,

    /// Play interface could not be acquired from the player object
    PlayInterfaceFailed,

    /// Player completion callback mask could not be installed
    CallbackMaskFailed,

    /// Volume interface could not be acquired from the player object
    VolumeInterfaceFailed,

    /// Maximum volume level query failed
    MaxVolumeLevelFailed,

    /// Volume level could not be written to the player
    VolumeSetFailed,

    /// Volume level could not be read back from the player
    VolumeGetFailed,

    /// Mute state could not be written to the player
    MuteSetFailed,

    /// Mute state could not be read back from the player
    MuteGetFailed,
}

impl ErrorCode for SoundError {
    fn code(&self) -> i32 {
        match self {
            SoundError::ResourceOpenFailed { .. } => SoundErrorCodes::RESOURCE_OPEN_FAILED,
            SoundError::EngineCreateFailed { .. } => SoundErrorCodes::ENGINE_CREATE_FAILED,
            SoundError::PlayerCreateFailed => SoundErrorCodes::PLAYER_CREATE_FAILED,
            SoundError::PlayerRealizeFailed => SoundErrorCodes::PLAYER_REALIZE_FAILED,
            SoundError::PlayInterfaceFailed => SoundErrorCodes::PLAY_INTERFACE_FAILED,
            SoundError::CallbackMaskFailed => SoundErrorCodes::CALLBACK_MASK_FAILED,
            SoundError::VolumeInterfaceFailed => SoundErrorCodes::VOLUME_INTERFACE_FAILED,
            SoundError::MaxVolumeLevelFailed => SoundErrorCodes::MAX_VOLUME_LEVEL_FAILED,
            SoundError::VolumeSetFailed => SoundErrorCodes::VOLUME_SET_FAILED,
            SoundError::VolumeGetFailed => SoundErrorCodes::VOLUME_GET_FAILED,
            SoundError::MuteSetFailed => SoundErrorCodes::MUTE_SET_FAILED,
            SoundError::MuteGetFailed => SoundErrorCodes::MUTE_GET_FAILED,
        }
    }

    fn message(&self) -> String {
        match self {
            SoundError::ResourceOpenFailed { path } => {
                format!("Sound: Could not open file ({})", path)
            }
            SoundError::EngineCreateFailed { reason } => {
                format!("Sound: Can't create audio engine: {}", reason)
            }
            SoundError::PlayerCreateFailed => "Sound: Can't create audio player".to_string(),
            SoundError::PlayerRealizeFailed => "Sound: Can't realise audio player".to_string(),
            SoundError::PlayInterfaceFailed => {
                "Sound: Can't get audio play interface".to_string()
            }
            SoundError::CallbackMaskFailed => "Sound: Can't set callback flags".to_string(),
            SoundError::VolumeInterfaceFailed => {
                "Sound: Couldn't get the volume interface!".to_string()
            }
            SoundError::MaxVolumeLevelFailed => {
                "Sound: Couldn't get the maximum volume level!".to_string()
            }
            SoundError::VolumeSetFailed => "Sound: Couldn't set the volume!".to_string(),
            SoundError::VolumeGetFailed => "Sound: Couldn't get the volume!".to_string(),
            SoundError::MuteSetFailed => "Sound: Couldn't set muted state!".to_string(),
            SoundError::MuteGetFailed => "Sound: Couldn't get muted state!".to_string(),
        }
    }
}

impl fmt::Display for SoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SoundError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SoundError {}
