//! Deterministic in-memory audio host.
//!
//! Implements the full player object model without any audio I/O, for
//! hardware-free tests and CLI smoke runs. Every failure path of the real
//! hosts can be forced through the `set_fail_*`/`set_deny_*` switches, and
//! [StubHost::finish] simulates a clip running out.

use std::collections::HashMap;

use crate::assets::AssetClip;
use crate::platform::{
    AudioHost, EventMask, HostError, HostPlayState, HostResult, Interface, ObjectState, PlayerId,
    DEFAULT_MAX_LEVEL,
};

#[derive(Debug)]
struct StubPlayer {
    realized: bool,
    play_state: HostPlayState,
    level: i32,
    muted: bool,
    looping: bool,
    mask: EventMask,
}

/// In-memory [AudioHost] with scriptable failures.
pub struct StubHost {
    players: HashMap<u64, StubPlayer>,
    next_id: u64,
    fail_create: bool,
    fail_realize: bool,
    deny_play_interface: bool,
    deny_volume_interface: bool,
    fail_callback_mask: bool,
    native_mute: bool,
    create_calls: u32,
    realize_calls: u32,
    interface_calls: u32,
    callback_mask_calls: u32,
    destroy_calls: u32,
    last_destroyed_play_state: Option<HostPlayState>,
}

impl Default for StubHost {
    fn default() -> Self {
        Self::new()
    }
}

impl StubHost {
    pub fn new() -> Self {
        Self {
            players: HashMap::new(),
            next_id: 1,
            fail_create: false,
            fail_realize: false,
            deny_play_interface: false,
            deny_volume_interface: false,
            fail_callback_mask: false,
            // Models a platform with a native mute switch.
            native_mute: true,
            create_calls: 0,
            realize_calls: 0,
            interface_calls: 0,
            callback_mask_calls: 0,
            destroy_calls: 0,
            last_destroyed_play_state: None,
        }
    }

    pub fn set_fail_create(&mut self, fail: bool) {
        self.fail_create = fail;
    }

    pub fn set_fail_realize(&mut self, fail: bool) {
        self.fail_realize = fail;
    }

    pub fn set_deny_play_interface(&mut self, deny: bool) {
        self.deny_play_interface = deny;
    }

    pub fn set_deny_volume_interface(&mut self, deny: bool) {
        self.deny_volume_interface = deny;
    }

    pub fn set_fail_callback_mask(&mut self, fail: bool) {
        self.fail_callback_mask = fail;
    }

    /// Switch between a platform with a native mute interface and one where
    /// callers must emulate muting.
    pub fn set_native_mute(&mut self, native: bool) {
        self.native_mute = native;
    }

    /// Simulate the clip running out on the platform side. Looping players
    /// wrap around and keep playing.
    pub fn finish(&mut self, player: PlayerId) {
        if let Some(p) = self.players.get_mut(&player.0) {
            if p.play_state == HostPlayState::Playing && !p.looping {
                p.play_state = HostPlayState::Stopped;
            }
        }
    }

    pub fn live_players(&self) -> usize {
        self.players.len()
    }

    pub fn create_calls(&self) -> u32 {
        self.create_calls
    }

    pub fn realize_calls(&self) -> u32 {
        self.realize_calls
    }

    pub fn interface_calls(&self) -> u32 {
        self.interface_calls
    }

    pub fn callback_mask_calls(&self) -> u32 {
        self.callback_mask_calls
    }

    pub fn destroy_calls(&self) -> u32 {
        self.destroy_calls
    }

    /// Play state the most recently destroyed player was left in.
    pub fn last_destroyed_play_state(&self) -> Option<HostPlayState> {
        self.last_destroyed_play_state
    }

    /// Event mask installed on a player, if it exists.
    pub fn callback_mask(&self, player: PlayerId) -> Option<EventMask> {
        self.players.get(&player.0).map(|p| p.mask)
    }

    fn player(&self, id: PlayerId) -> HostResult<&StubPlayer> {
        self.players.get(&id.0).ok_or(HostError::InvalidHandle)
    }

    fn player_mut(&mut self, id: PlayerId) -> HostResult<&mut StubPlayer> {
        self.players.get_mut(&id.0).ok_or(HostError::InvalidHandle)
    }
}

impl AudioHost for StubHost {
    fn create_player(
        &mut self,
        _clip: &AssetClip,
        _interfaces: &[Interface],
    ) -> HostResult<PlayerId> {
        self.create_calls += 1;
        if self.fail_create {
            return Err(HostError::Failed);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.players.insert(
            id,
            StubPlayer {
                realized: false,
                play_state: HostPlayState::Stopped,
                level: DEFAULT_MAX_LEVEL,
                muted: false,
                looping: false,
                mask: EventMask::NONE,
            },
        );
        Ok(PlayerId(id))
    }

    fn realize(&mut self, player: PlayerId) -> HostResult<()> {
        self.realize_calls += 1;
        if self.fail_realize {
            return Err(HostError::Failed);
        }
        self.player_mut(player)?.realized = true;
        Ok(())
    }

    fn object_state(&mut self, player: PlayerId) -> HostResult<ObjectState> {
        Ok(if self.player(player)?.realized {
            ObjectState::Realized
        } else {
            ObjectState::Unrealized
        })
    }

    fn interface(&mut self, player: PlayerId, which: Interface) -> HostResult<()> {
        self.interface_calls += 1;
        let denied = match which {
            Interface::Play => self.deny_play_interface,
            Interface::Volume => self.deny_volume_interface,
            Interface::Seek => false,
        };
        if !self.player(player)?.realized || denied {
            return Err(HostError::Failed);
        }
        Ok(())
    }

    fn set_callback_mask(&mut self, player: PlayerId, mask: EventMask) -> HostResult<()> {
        self.callback_mask_calls += 1;
        if self.fail_callback_mask {
            return Err(HostError::Failed);
        }
        self.player_mut(player)?.mask = mask;
        Ok(())
    }

    fn set_play_state(&mut self, player: PlayerId, state: HostPlayState) -> HostResult<()> {
        let p = self.player_mut(player)?;
        if !p.realized {
            return Err(HostError::Failed);
        }
        p.play_state = state;
        Ok(())
    }

    fn play_state(&mut self, player: PlayerId) -> HostResult<HostPlayState> {
        Ok(self.player(player)?.play_state)
    }

    fn set_looping(&mut self, player: PlayerId, looping: bool) -> HostResult<()> {
        self.player_mut(player)?.looping = looping;
        Ok(())
    }

    fn max_volume_level(&mut self, player: PlayerId) -> HostResult<i32> {
        self.player(player)?;
        Ok(DEFAULT_MAX_LEVEL)
    }

    fn set_volume_level(&mut self, player: PlayerId, level: i32) -> HostResult<()> {
        self.player_mut(player)?.level = level;
        Ok(())
    }

    fn volume_level(&mut self, player: PlayerId) -> HostResult<i32> {
        Ok(self.player(player)?.level)
    }

    fn set_muted(&mut self, player: PlayerId, muted: bool) -> HostResult<()> {
        if !self.native_mute {
            return Err(HostError::Unsupported);
        }
        self.player_mut(player)?.muted = muted;
        Ok(())
    }

    fn muted(&mut self, player: PlayerId) -> HostResult<bool> {
        if !self.native_mute {
            return Err(HostError::Unsupported);
        }
        Ok(self.player(player)?.muted)
    }

    fn destroy(&mut self, player: PlayerId) {
        self.destroy_calls += 1;
        if let Some(p) = self.players.remove(&player.0) {
            self.last_destroyed_play_state = Some(p.play_state);
        }
    }
}
