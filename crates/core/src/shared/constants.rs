use std::time::Duration;

/// Pinned release of the static ffmpeg build the engine is loaded from.
pub const CORE_VERSION: &str = "b6.0";
pub const CORE_BASE_URL: &str =
    "https://github.com/eugeneware/ffmpeg-static/releases/download/{version}";

pub const CORE_URL_ENV: &str = "SOUNDLIFT_CORE_URL";
pub const CORE_VERSION_ENV: &str = "SOUNDLIFT_CORE_VERSION";

/// The glue resource reads stream durations so engine progress can be scaled.
pub const GLUE_RESOURCE_STEM: &str = "ffprobe";
/// The payload resource performs the transcode.
pub const PAYLOAD_RESOURCE_STEM: &str = "ffmpeg";
pub const RESOURCE_MEDIA_TYPE: &str = "application/octet-stream";

pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(60);

pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "m4v", "mov", "mkv", "webm", "avi", "wmv", "flv", "mpeg", "mpg", "3gp", "ogv", "ts",
];

pub const MP3_EXTENSION: &str = "mp3";
pub const MP3_MEDIA_TYPE: &str = "audio/mpeg";
/// libmp3lame VBR quality (0 = best, 9 = worst).
pub const MP3_VBR_QUALITY: u8 = 2;

pub const DEFAULT_INPUT_EXTENSION: &str = "mp4";
pub const OUTPUT_FILE_NAME: &str = "output.mp3";
