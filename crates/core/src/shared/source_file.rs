use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::constants::VIDEO_EXTENSIONS;

/// A user-selected input file.
///
/// Only the path is stored; bytes are read when a conversion starts so a
/// long queue does not keep every video in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    name: String,
    media_type: Option<String>,
}

impl SourceFile {
    /// Build a handle from a path, guessing the media type from its extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        let media_type = guess_media_type(&name).map(str::to_string);
        Self {
            path,
            name,
            media_type,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    /// Lowercased extension of the file name, if it has one.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }

    pub fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        fs::read(&self.path)
    }
}

/// Whether the file looks like video input, by media type prefix or extension.
///
/// This is advisory: the content itself is never inspected, so a mislabelled
/// file is accepted here and fails later inside the engine.
pub fn is_compatible_video(file: &SourceFile) -> bool {
    if file
        .media_type()
        .is_some_and(|t| t.to_ascii_lowercase().starts_with("video/"))
    {
        return true;
    }
    file.extension()
        .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
}

fn extension_of(name: &str) -> Option<String> {
    let idx = name.rfind('.')?;
    let ext = &name[idx + 1..];
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_ascii_lowercase())
    }
}

fn guess_media_type(name: &str) -> Option<&'static str> {
    let media_type = match extension_of(name)?.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        "mpeg" | "mpg" => "video/mpeg",
        "3gp" => "video/3gpp",
        "ogv" => "video/ogg",
        "ts" => "video/mp2t",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => return None,
    };
    Some(media_type)
}
