// Nova Sound - sound playback and volume composition core
// Manages per-sound state, hierarchical volume and platform player lifecycle

// Module declarations
pub mod assets;
pub mod config;
pub mod error;
pub mod platform;
pub mod sound;
pub mod soundboard;

// Re-exports for convenience
pub use assets::{AssetClip, AssetSource, FsAssets};
pub use config::{HostConfig, PlaybackConfig, SoundConfig};
pub use error::{ErrorCode, SoundError};
pub use sound::{PlaybackState, Sound, LOOP_INFINITE};
pub use soundboard::Soundboard;

use log::info;
use once_cell::sync::OnceCell;

static LOGGING: OnceCell<()> = OnceCell::new();

/// Install the process-wide logging backend.
///
/// Idempotent: the first call installs the platform logger (android_logger
/// with the fixed `NovaSound` tag on Android, env_logger elsewhere) and
/// every later call is a no-op. There is no teardown; the installed logger
/// lives for the process lifetime.
pub fn init_logging() {
    LOGGING.get_or_init(|| {
        install_logger();
        info!("Sound core logging initialized");
    });
}

#[cfg(target_os = "android")]
fn install_logger() {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag("NovaSound"),
    );
}

#[cfg(not(target_os = "android"))]
fn install_logger() {
    // Tests and embedding applications may have installed a logger already.
    let _ = env_logger::Builder::from_default_env().try_init();
}

/// JNI_OnLoad is called when the native library is loaded by Android.
/// This function initializes the Android context required by oboe.
#[cfg(target_os = "android")]
#[no_mangle]
pub extern "system" fn JNI_OnLoad(
    vm: jni::JavaVM,
    _reserved: *mut std::ffi::c_void,
) -> jni::sys::jint {
    init_logging();

    info!("JNI_OnLoad called - initializing Android context");

    // SAFETY: the JavaVM pointer is guaranteed valid by the Android runtime,
    // and this runs before any Oboe operation can touch the context.
    unsafe {
        ndk_context::initialize_android_context(
            vm.get_java_vm_pointer() as *mut std::ffi::c_void,
            std::ptr::null_mut(),
        );
    }

    info!("Android context initialized successfully");

    jni::sys::JNI_VERSION_1_6
}
