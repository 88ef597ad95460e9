//! Integration tests for the sound core public surface.
//!
//! These tests validate the full sound lifecycle over the deterministic
//! stub host, including:
//! - load/play/pause/resume/stop against the platform object model
//! - creation-path fail-fast behavior
//! - volume composition fan-out and the platform level mapping
//! - mute round-trips on platforms with and without a native mute switch
//!
//! No audio hardware is required.

use nova_sound::platform::{
    level_from_linear, AudioHost, HostPlayState, StubHost, DEFAULT_MAX_LEVEL,
};
use nova_sound::{
    AssetClip, AssetSource, PlaybackConfig, Sound, SoundError, Soundboard, LOOP_INFINITE,
};

struct MemAssets;

impl AssetSource for MemAssets {
    fn open(&self, _path: &str) -> Result<AssetClip, SoundError> {
        Ok(AssetClip::from_bytes(vec![0u8; 128]))
    }
}

#[test]
fn full_lifecycle_over_the_board() {
    let mut host = StubHost::new();
    let mut board = Soundboard::new(&PlaybackConfig::default());

    board
        .register(&mut host, &MemAssets, "music", "bgm/title.ogg", 1)
        .expect("register should succeed on the stub host");
    board
        .register(&mut host, &MemAssets, "jump", "sfx/jump.ogg", 2)
        .expect("register should succeed on the stub host");
    assert_eq!(host.live_players(), 2);

    board.play(&mut host, "music", LOOP_INFINITE);
    board.play(&mut host, "jump", 0);
    assert!(board.sound("music").unwrap().is_looping());
    assert!(board.sound("jump").unwrap().is_playing());

    board.pause_all(&mut host);
    assert!(board.sound("music").unwrap().is_paused());
    assert!(board.sound("jump").unwrap().is_paused());

    board.resume_all(&mut host);
    assert!(board.sound("music").unwrap().is_looping());

    // The jump clip runs out; the looping music survives the sweep.
    let jump = board.sound("jump").unwrap().player().unwrap();
    let music = board.sound("music").unwrap().player().unwrap();
    host.finish(jump);
    host.finish(music);
    board.update(&mut host);
    assert!(board.sound("jump").unwrap().is_stopped());
    assert!(board.sound("music").unwrap().is_playing());

    board.shutdown(&mut host);
    assert_eq!(host.live_players(), 0);
}

#[test]
fn creation_failure_is_fatal_to_the_sound_only() {
    let mut host = StubHost::new();
    host.set_fail_create(true);

    let mut sound = Sound::new("sfx/broken.ogg");
    let err = sound.load(&mut host, &MemAssets).unwrap_err();
    assert_eq!(err, SoundError::PlayerCreateFailed);
    assert!(sound.is_stopped());
    // No further setup reached the host.
    assert_eq!(host.realize_calls(), 0);
    assert_eq!(host.interface_calls(), 0);

    // The host recovers for the next sound.
    host.set_fail_create(false);
    let mut ok = Sound::new("sfx/ok.ogg");
    assert!(ok.load(&mut host, &MemAssets).is_ok());
    ok.unload(&mut host);
}

#[test]
fn volume_composition_reaches_the_platform_level_scale() {
    let mut host = StubHost::new();
    let mut sound = Sound::new("sfx/jump.ogg");
    sound.load(&mut host, &MemAssets).unwrap();
    let id = sound.player().unwrap();

    sound.set_complete_volume(&mut host, 0.5, 0.5, 0.8);
    let expected = level_from_linear(0.5 * 0.5 * 0.8, DEFAULT_MAX_LEVEL);
    assert_eq!(host.volume_level(id), Ok(expected));

    // Out-of-range base input clamps before composing.
    sound.set_base_volume(&mut host, 1.5);
    let expected = level_from_linear(0.5 * 0.8, DEFAULT_MAX_LEVEL);
    assert_eq!(host.volume_level(id), Ok(expected));

    assert!((sound.platform_volume(&mut host) - 0.4).abs() < 1e-3);

    sound.unload(&mut host);
}

#[test]
fn mute_round_trip_with_and_without_native_support() {
    for native in [true, false] {
        let mut host = StubHost::new();
        host.set_native_mute(native);

        let mut sound = Sound::new("bgm/title.ogg");
        sound.load(&mut host, &MemAssets).unwrap();
        sound.set_complete_volume(&mut host, 0.6, 1.0, 1.0);

        sound.set_muted(&mut host, true);
        sound.set_muted(&mut host, true);
        assert!(sound.is_muted(&mut host), "native={native}");

        sound.set_muted(&mut host, false);
        assert!(!sound.is_muted(&mut host), "native={native}");
        assert!(
            (sound.platform_volume(&mut host) - 0.6).abs() < 1e-3,
            "volume lost after mute round-trip, native={native}"
        );

        sound.unload(&mut host);
    }
}

#[test]
fn degraded_volume_path_never_aborts_playback() {
    let mut host = StubHost::new();
    host.set_deny_volume_interface(true);

    let mut sound = Sound::new("sfx/jump.ogg");
    sound.load(&mut host, &MemAssets).unwrap();

    // Volume operations are no-ops returning defaults, playback still runs.
    sound.set_complete_volume(&mut host, 0.5, 0.5, 0.5);
    assert_eq!(sound.platform_volume(&mut host), 0.0);

    sound.play(&mut host, 0);
    assert!(sound.is_playing());
    let id = sound.player().unwrap();
    assert_eq!(host.play_state(id), Ok(HostPlayState::Playing));

    sound.unload(&mut host);
}

#[test]
fn channel_groups_scale_independently() {
    let mut host = StubHost::new();
    let mut board = Soundboard::new(&PlaybackConfig::default());
    board
        .register(&mut host, &MemAssets, "music", "bgm.ogg", 1)
        .unwrap();
    board
        .register(&mut host, &MemAssets, "voice", "vo.ogg", 2)
        .unwrap();

    board.set_channel_volume(&mut host, 1, 0.25);
    board.set_master_volume(&mut host, 0.5);

    let music = board.sound("music").unwrap();
    let voice = board.sound("voice").unwrap();
    assert!((music.effective_volume() - 0.125).abs() < 1e-6);
    assert!((voice.effective_volume() - 0.5).abs() < 1e-6);

    board.shutdown(&mut host);
}
