//! Named-sound registry with channel groups.
//!
//! The [Soundboard] owns the engine's [Sound] instances and fans the
//! channel-group and master volume factors out to them, so individual sounds
//! only ever see their own base factor. One board per host.

use std::collections::HashMap;

use log::warn;

use crate::assets::AssetSource;
use crate::config::PlaybackConfig;
use crate::error::SoundError;
use crate::platform::AudioHost;
use crate::sound::Sound;

pub struct Soundboard {
    sounds: HashMap<String, Sound>,
    channel_volumes: Vec<f32>,
    master_volume: f32,
}

impl Soundboard {
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            sounds: HashMap::new(),
            channel_volumes: vec![config.channel_volume; config.channel_count as usize],
            master_volume: config.master_volume,
        }
    }

    /// Load a sound and register it under `name` on the given channel.
    ///
    /// Registering over an existing name releases the old sound's player
    /// first. The new sound starts at full base volume with its channel and
    /// master factors already applied.
    pub fn register<H: AudioHost>(
        &mut self,
        host: &mut H,
        assets: &dyn AssetSource,
        name: &str,
        path: &str,
        channel: u8,
    ) -> Result<(), SoundError> {
        if let Some(mut old) = self.sounds.remove(name) {
            old.unload(host);
        }

        let mut sound = Sound::new(path);
        sound.load(host, assets)?;
        sound.set_channel(channel);
        sound.set_complete_volume(host, 1.0, self.channel_volume(channel), self.master_volume);
        self.sounds.insert(name.to_string(), sound);
        Ok(())
    }

    /// Unload and drop a registered sound.
    pub fn remove<H: AudioHost>(&mut self, host: &mut H, name: &str) {
        if let Some(mut sound) = self.sounds.remove(name) {
            sound.unload(host);
        }
    }

    pub fn sound(&self, name: &str) -> Option<&Sound> {
        self.sounds.get(name)
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    pub fn play<H: AudioHost>(&mut self, host: &mut H, name: &str, loop_count: i32) {
        self.with_sound(name, |sound| sound.play(host, loop_count));
    }

    pub fn stop<H: AudioHost>(&mut self, host: &mut H, name: &str) {
        self.with_sound(name, |sound| sound.stop(host));
    }

    pub fn pause<H: AudioHost>(&mut self, host: &mut H, name: &str) {
        self.with_sound(name, |sound| sound.pause(host));
    }

    pub fn resume<H: AudioHost>(&mut self, host: &mut H, name: &str) {
        self.with_sound(name, |sound| sound.resume(host));
    }

    /// Set one sound's base volume factor.
    pub fn set_sound_volume<H: AudioHost>(&mut self, host: &mut H, name: &str, volume: f32) {
        self.with_sound(name, |sound| sound.set_base_volume(host, volume));
    }

    pub fn set_sound_muted<H: AudioHost>(&mut self, host: &mut H, name: &str, muted: bool) {
        self.with_sound(name, |sound| sound.set_muted(host, muted));
    }

    /// Set a channel group's volume and fan it out to every sound assigned
    /// to that channel.
    pub fn set_channel_volume<H: AudioHost>(&mut self, host: &mut H, channel: u8, volume: f32) {
        let Some(slot) = self.channel_volumes.get_mut(channel as usize) else {
            warn!("Soundboard: channel {} out of range", channel);
            return;
        };
        *slot = volume;
        for sound in self.sounds.values_mut() {
            if sound.is_channel_assigned() && sound.channel() == channel {
                sound.set_channel_volume(host, volume);
            }
        }
    }

    /// Set the global master factor on every registered sound.
    pub fn set_master_volume<H: AudioHost>(&mut self, host: &mut H, volume: f32) {
        self.master_volume = volume;
        for sound in self.sounds.values_mut() {
            sound.set_master_volume(host, volume);
        }
    }

    /// Move a sound to another channel group and re-apply that group's
    /// volume factor.
    pub fn move_to_channel<H: AudioHost>(&mut self, host: &mut H, name: &str, channel: u8) {
        let group_volume = self.channel_volume(channel);
        let Some(sound) = self.sounds.get_mut(name) else {
            warn!("Soundboard: no sound named {}", name);
            return;
        };
        sound.set_channel(channel);
        sound.set_channel_volume(host, group_volume);
    }

    pub fn pause_all<H: AudioHost>(&mut self, host: &mut H) {
        for sound in self.sounds.values_mut() {
            if sound.is_playing() {
                sound.pause(host);
            }
        }
    }

    pub fn resume_all<H: AudioHost>(&mut self, host: &mut H) {
        for sound in self.sounds.values_mut() {
            if sound.is_paused() {
                sound.resume(host);
            }
        }
    }

    pub fn stop_all<H: AudioHost>(&mut self, host: &mut H) {
        for sound in self.sounds.values_mut() {
            sound.stop(host);
        }
    }

    /// Poll every sound for end-of-clip.
    pub fn update<H: AudioHost>(&mut self, host: &mut H) {
        for sound in self.sounds.values_mut() {
            sound.refresh(host);
        }
    }

    /// Release every platform player. The board stays usable; sounds must
    /// be registered again.
    pub fn shutdown<H: AudioHost>(&mut self, host: &mut H) {
        for (_, mut sound) in self.sounds.drain() {
            sound.stop(host);
            sound.unload(host);
        }
    }

    fn channel_volume(&self, channel: u8) -> f32 {
        self.channel_volumes
            .get(channel as usize)
            .copied()
            .unwrap_or(1.0)
    }

    fn with_sound<F: FnOnce(&mut Sound)>(&mut self, name: &str, f: F) {
        match self.sounds.get_mut(name) {
            Some(sound) => f(sound),
            None => warn!("Soundboard: no sound named {}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetClip;
    use crate::platform::{level_from_linear, StubHost, DEFAULT_MAX_LEVEL};

    struct MemAssets;

    impl AssetSource for MemAssets {
        fn open(&self, _path: &str) -> Result<AssetClip, SoundError> {
            Ok(AssetClip::from_bytes(vec![0u8; 32]))
        }
    }

    fn config() -> PlaybackConfig {
        PlaybackConfig::default()
    }

    fn board_with(host: &mut StubHost, names: &[(&str, u8)]) -> Soundboard {
        let mut board = Soundboard::new(&config());
        for (name, channel) in names {
            board
                .register(host, &MemAssets, name, "clip.ogg", *channel)
                .unwrap();
        }
        board
    }

    #[test]
    fn register_loads_and_assigns() {
        let mut host = StubHost::new();
        let board = board_with(&mut host, &[("jump", 2)]);

        let sound = board.sound("jump").unwrap();
        assert!(sound.is_loaded());
        assert_eq!(sound.channel(), 2);
        assert!(sound.is_channel_assigned());
        assert_eq!(host.live_players(), 1);
    }

    #[test]
    fn reregistering_a_name_releases_the_old_player() {
        let mut host = StubHost::new();
        let mut board = board_with(&mut host, &[("jump", 0)]);
        board
            .register(&mut host, &MemAssets, "jump", "other.ogg", 1)
            .unwrap();

        assert_eq!(board.len(), 1);
        assert_eq!(host.live_players(), 1);
        assert_eq!(board.sound("jump").unwrap().path(), "other.ogg");
    }

    #[test]
    fn channel_volume_reaches_only_that_group() {
        let mut host = StubHost::new();
        let mut board = board_with(&mut host, &[("jump", 2), ("music", 3)]);

        board.set_channel_volume(&mut host, 2, 0.5);

        let jump = board.sound("jump").unwrap().player().unwrap();
        let music = board.sound("music").unwrap().player().unwrap();
        assert_eq!(
            host.volume_level(jump),
            Ok(level_from_linear(0.5, DEFAULT_MAX_LEVEL))
        );
        assert_eq!(
            host.volume_level(music),
            Ok(level_from_linear(1.0, DEFAULT_MAX_LEVEL))
        );
    }

    #[test]
    fn master_volume_reaches_everyone() {
        let mut host = StubHost::new();
        let mut board = board_with(&mut host, &[("jump", 2), ("music", 3)]);

        board.set_channel_volume(&mut host, 2, 0.5);
        board.set_master_volume(&mut host, 0.5);

        let jump = board.sound("jump").unwrap().player().unwrap();
        let music = board.sound("music").unwrap().player().unwrap();
        assert_eq!(
            host.volume_level(jump),
            Ok(level_from_linear(0.25, DEFAULT_MAX_LEVEL))
        );
        assert_eq!(
            host.volume_level(music),
            Ok(level_from_linear(0.5, DEFAULT_MAX_LEVEL))
        );
    }

    #[test]
    fn move_to_channel_applies_the_new_group_volume() {
        let mut host = StubHost::new();
        let mut board = board_with(&mut host, &[("jump", 2)]);
        board.set_channel_volume(&mut host, 3, 0.25);

        board.move_to_channel(&mut host, "jump", 3);

        let sound = board.sound("jump").unwrap();
        assert_eq!(sound.channel(), 3);
        let id = sound.player().unwrap();
        assert_eq!(
            host.volume_level(id),
            Ok(level_from_linear(0.25, DEFAULT_MAX_LEVEL))
        );
    }

    #[test]
    fn out_of_range_channel_is_ignored() {
        let mut host = StubHost::new();
        let mut board = board_with(&mut host, &[("jump", 2)]);

        board.set_channel_volume(&mut host, 200, 0.1);

        let id = board.sound("jump").unwrap().player().unwrap();
        assert_eq!(
            host.volume_level(id),
            Ok(level_from_linear(1.0, DEFAULT_MAX_LEVEL))
        );
    }

    #[test]
    fn bulk_pause_and_resume_only_touch_active_sounds() {
        let mut host = StubHost::new();
        let mut board = board_with(&mut host, &[("a", 0), ("b", 0), ("c", 0)]);

        board.play(&mut host, "a", 0);
        board.play(&mut host, "b", crate::sound::LOOP_INFINITE);

        board.pause_all(&mut host);
        assert!(board.sound("a").unwrap().is_paused());
        assert!(board.sound("b").unwrap().is_paused());
        assert!(board.sound("c").unwrap().is_stopped());

        board.resume_all(&mut host);
        assert!(board.sound("a").unwrap().is_playing());
        assert!(board.sound("b").unwrap().is_looping());
        assert!(board.sound("c").unwrap().is_stopped());
    }

    #[test]
    fn update_reaps_finished_sounds() {
        let mut host = StubHost::new();
        let mut board = board_with(&mut host, &[("a", 0)]);
        board.play(&mut host, "a", 0);

        let id = board.sound("a").unwrap().player().unwrap();
        host.finish(id);
        board.update(&mut host);
        assert!(board.sound("a").unwrap().is_stopped());
    }

    #[test]
    fn shutdown_releases_every_player() {
        let mut host = StubHost::new();
        let mut board = board_with(&mut host, &[("a", 0), ("b", 1)]);

        board.shutdown(&mut host);
        assert!(board.is_empty());
        assert_eq!(host.live_players(), 0);
    }

    #[test]
    fn unknown_names_are_tolerated() {
        let mut host = StubHost::new();
        let mut board = Soundboard::new(&config());
        board.play(&mut host, "ghost", 0);
        board.stop(&mut host, "ghost");
        board.set_sound_volume(&mut host, "ghost", 0.5);
    }
}
