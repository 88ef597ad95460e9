//! Smoke tool for the sound core.
//!
//! Drives one sound through the full lifecycle (load, play, pause, resume,
//! mute round-trip, channel volume, stop) against a platform host and prints
//! the observed states. With `--stub` the deterministic host is used, so the
//! run needs no audio hardware.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

#[cfg(not(target_os = "android"))]
use nova_sound::platform::MixerHost;
use nova_sound::platform::{AudioHost, StubHost};
use nova_sound::{
    AssetClip, AssetSource, FsAssets, SoundConfig, SoundError, Soundboard, LOOP_INFINITE,
};

#[derive(Parser)]
#[command(name = "nova-probe", about = "Drive a sound through a platform audio host")]
struct Args {
    /// Audio file to play; a synthesized tone is used when omitted
    #[arg(long)]
    clip: Option<PathBuf>,

    /// Approximate length of the probe run in seconds
    #[arg(long, default_value_t = 3)]
    seconds: u64,

    /// Run against the deterministic stub host instead of the mixer
    #[arg(long)]
    stub: bool,

    /// Base volume factor for the probe sound
    #[arg(long, default_value_t = 0.8)]
    volume: f32,

    /// Loop the clip until the probe stops it
    #[arg(long)]
    looped: bool,
}

/// In-memory asset source serving one synthesized WAV tone.
struct ToneAssets {
    bytes: Vec<u8>,
}

impl ToneAssets {
    /// Half a second of 440 Hz sine, 16-bit mono.
    fn new(sample_rate: u32) -> Result<Self> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = std::io::Cursor::new(Vec::new());
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for n in 0..sample_rate / 2 {
            let t = n as f32 / sample_rate as f32;
            let sample = ((2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.4
                * i16::MAX as f32) as i16;
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(Self {
            bytes: cursor.into_inner(),
        })
    }
}

impl AssetSource for ToneAssets {
    fn open(&self, _path: &str) -> Result<AssetClip, SoundError> {
        Ok(AssetClip::from_bytes(self.bytes.clone()))
    }
}

fn main() -> Result<()> {
    nova_sound::init_logging();
    let args = Args::parse();
    let config = SoundConfig::load();

    if args.stub {
        let mut host = StubHost::new();
        return run(&mut host, Duration::ZERO, &args, &config);
    }
    run_platform(&args, &config)
}

#[cfg(not(target_os = "android"))]
fn run_platform(args: &Args, config: &SoundConfig) -> Result<()> {
    let mut host = MixerHost::new()?;
    let pace = Duration::from_millis(args.seconds * 1000 / 6);
    run(&mut host, pace, args, config)
}

#[cfg(target_os = "android")]
fn run_platform(args: &Args, config: &SoundConfig) -> Result<()> {
    // Device builds drive audio through the engine shell; probe the stub.
    let mut host = StubHost::new();
    run(&mut host, Duration::ZERO, args, config)
}

fn run<H: AudioHost>(
    host: &mut H,
    pace: Duration,
    args: &Args,
    config: &SoundConfig,
) -> Result<()> {
    let (assets, clip_name): (Box<dyn AssetSource>, String) = match &args.clip {
        Some(path) => {
            let parent = path.parent().unwrap_or(Path::new(".")).to_path_buf();
            let name = path
                .file_name()
                .context("clip path has no file name")?
                .to_string_lossy()
                .into_owned();
            (Box::new(FsAssets::new(parent)), name)
        }
        None => (
            Box::new(ToneAssets::new(config.host.sample_rate)?),
            "tone".to_string(),
        ),
    };

    let mut board = Soundboard::new(&config.playback);
    board
        .register(host, assets.as_ref(), "probe", &clip_name, 0)
        .with_context(|| format!("loading {clip_name}"))?;
    board.set_sound_volume(host, "probe", args.volume);

    let loop_count = if args.looped { LOOP_INFINITE } else { 0 };
    board.play(host, "probe", loop_count);
    report(&board, "play");
    thread::sleep(pace);

    board.pause(host, "probe");
    report(&board, "pause");
    thread::sleep(pace);

    board.resume(host, "probe");
    report(&board, "resume");
    thread::sleep(pace);

    board.set_sound_muted(host, "probe", true);
    board.set_sound_muted(host, "probe", false);
    board.set_channel_volume(host, 0, 0.5);
    report(&board, "mute round-trip + channel volume");
    thread::sleep(pace);

    board.update(host);
    board.stop(host, "probe");
    report(&board, "stop");
    board.shutdown(host);

    Ok(())
}

fn report(board: &Soundboard, step: &str) {
    if let Some(sound) = board.sound("probe") {
        println!(
            "[{step}] state={:?} loaded={} effective_volume={:.2}",
            sound.state(),
            sound.is_loaded(),
            sound.effective_volume()
        );
    }
}
