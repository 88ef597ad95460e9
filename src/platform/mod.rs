//! Platform audio host abstractions.
//!
//! The engine talks to platform audio through the [AudioHost] trait: an
//! object-model collaborator exposing create/realize/interface/play-state/
//! volume operations that each return a platform result code. One interface,
//! variant implementations selected once at startup:
//!
//! - [OboeHost] on Android (Oboe streams),
//! - [MixerHost] on desktop (kira mixer),
//! - [StubHost] everywhere, for deterministic tests and CLI tooling.

mod player;
mod stub;

#[cfg(not(target_os = "android"))]
mod mixer;
#[cfg(target_os = "android")]
mod oboe;

pub use player::{
    level_from_linear, linear_from_level, PlayerSlot, DEFAULT_MAX_LEVEL, MIN_VOLUME_LEVEL,
};
pub use stub::StubHost;

#[cfg(not(target_os = "android"))]
pub use mixer::MixerHost;
#[cfg(target_os = "android")]
pub use oboe::OboeHost;

/// Identifier of a player object living inside an [AudioHost].
///
/// Ids are host-scoped and never reused within one host instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerId(pub u64);

/// Platform result code for a failed host operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostError {
    /// The operation failed inside the platform engine.
    Failed,
    /// The host does not implement this capability.
    Unsupported,
    /// The player id does not refer to a live object.
    InvalidHandle,
}

pub type HostResult<T> = Result<T, HostError>;

/// Lifecycle state of a player object as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectState {
    /// Created but not yet committed; unsafe to control.
    Unrealized,
    /// Fully allocated; safe to query and control.
    Realized,
}

/// Play state of a realized player object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlayState {
    Stopped,
    Paused,
    Playing,
}

/// Interfaces a player object can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interface {
    Play,
    Seek,
    Volume,
}

/// Interface set requested for every player at creation time.
pub const PLAYER_INTERFACES: [Interface; 3] =
    [Interface::Play, Interface::Seek, Interface::Volume];

/// Player event mask for completion callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventMask(pub u32);

impl EventMask {
    pub const NONE: EventMask = EventMask(0);
    /// Player transitioned to the stopped state (clip ran out).
    pub const STOPPED: EventMask = EventMask(1);

    pub fn contains(self, other: EventMask) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Trait implemented by platform audio hosts.
///
/// Hosts own the opaque player objects; callers hold [PlayerId] handles and
/// are responsible for destroying every player they create. All operations
/// are synchronous calls from the owning engine thread.
pub trait AudioHost {
    /// Allocate a player for the given clip, requesting an interface set.
    fn create_player(&mut self, clip: &crate::assets::AssetClip, interfaces: &[Interface])
        -> HostResult<PlayerId>;

    /// Commit the allocation. A player must be realized before it can be
    /// controlled or queried for interfaces.
    fn realize(&mut self, player: PlayerId) -> HostResult<()>;

    /// Report the lifecycle state of the player object.
    fn object_state(&mut self, player: PlayerId) -> HostResult<ObjectState>;

    /// Acquire an interface from a realized player object.
    fn interface(&mut self, player: PlayerId, which: Interface) -> HostResult<()>;

    /// Install the completion event mask on the play interface.
    fn set_callback_mask(&mut self, player: PlayerId, mask: EventMask) -> HostResult<()>;

    /// Command a play-state transition.
    fn set_play_state(&mut self, player: PlayerId, state: HostPlayState) -> HostResult<()>;

    /// Report the current play state.
    fn play_state(&mut self, player: PlayerId) -> HostResult<HostPlayState>;

    /// Toggle whole-clip looping.
    fn set_looping(&mut self, player: PlayerId, looping: bool) -> HostResult<()>;

    /// Maximum supported volume level in millibels.
    fn max_volume_level(&mut self, player: PlayerId) -> HostResult<i32>;

    /// Set the volume level in millibels.
    fn set_volume_level(&mut self, player: PlayerId, level: i32) -> HostResult<()>;

    /// Read back the volume level in millibels.
    fn volume_level(&mut self, player: PlayerId) -> HostResult<i32>;

    /// Engage the native mute switch, where the platform has one.
    fn set_muted(&mut self, player: PlayerId, muted: bool) -> HostResult<()>;

    /// Read back the native mute switch.
    fn muted(&mut self, player: PlayerId) -> HostResult<bool>;

    /// Tear down the player object. Destroying an unknown id is a no-op.
    fn destroy(&mut self, player: PlayerId);
}
