use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::media_blob::MediaBlob;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine a downloads directory")]
    NoDownloadDir,
}

/// Default folder for saved results: the user's Downloads, else home.
pub fn default_download_dir() -> Result<PathBuf, SaveError> {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .ok_or(SaveError::NoDownloadDir)
}

/// Write a blob to `dest`, replacing any existing file.
///
/// Bytes go to a `.part` sibling first and are renamed into place, so a
/// failed write never leaves a truncated file under the final name.
pub fn save(blob: &MediaBlob, dest: &Path) -> Result<(), SaveError> {
    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| SaveError::Write { path, source }
    };

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err(parent))?;
    }

    let temp_path = part_path(dest);
    let result = (|| -> Result<(), SaveError> {
        let mut file = fs::File::create(&temp_path).map_err(write_err(&temp_path))?;
        file.write_all(blob.bytes()).map_err(write_err(&temp_path))?;
        file.flush().map_err(write_err(&temp_path))?;
        drop(file);
        fs::rename(&temp_path, dest).map_err(write_err(dest))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

/// Save into `dir` under `name`, adding ` (n)` before the extension when the
/// name is taken. Returns the path written.
pub fn save_unique(blob: &MediaBlob, dir: &Path, name: &str) -> Result<PathBuf, SaveError> {
    let dest = unique_path(dir, name);
    save(blob, &dest)?;
    log::info!("Saved {} bytes to {}", blob.len(), dest.display());
    Ok(dest)
}

fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }
    let (stem, ext) = match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], &name[idx..]),
        _ => (name, ""),
    };
    (1..)
        .map(|n| dir.join(format!("{stem} ({n}){ext}")))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_writes_bytes_without_leftovers() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("clip.mp3");
        save(&MediaBlob::mp3(b"ID3data".to_vec()), &dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"ID3data");
        assert!(!tmp.path().join("clip.mp3.part").exists());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("nested").join("deeper").join("a.mp3");
        save(&MediaBlob::mp3(vec![1]), &dest).unwrap();
        assert!(dest.exists());
    }

    #[test]
    fn test_save_failure_leaves_nothing_behind() {
        let tmp = TempDir::new().unwrap();
        // A directory occupying the destination name makes the rename fail
        let dest = tmp.path().join("taken.mp3");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("keep"), b"x").unwrap();

        let result = save(&MediaBlob::mp3(vec![1, 2]), &dest);
        assert!(matches!(result, Err(SaveError::Write { .. })));
        assert!(!tmp.path().join("taken.mp3.part").exists());
    }

    #[test]
    fn test_save_unique_avoids_overwriting() {
        let tmp = TempDir::new().unwrap();
        let first = save_unique(&MediaBlob::mp3(vec![1]), tmp.path(), "clip.mp3").unwrap();
        let second = save_unique(&MediaBlob::mp3(vec![2]), tmp.path(), "clip.mp3").unwrap();
        let third = save_unique(&MediaBlob::mp3(vec![3]), tmp.path(), "clip.mp3").unwrap();

        assert_eq!(first, tmp.path().join("clip.mp3"));
        assert_eq!(second, tmp.path().join("clip (1).mp3"));
        assert_eq!(third, tmp.path().join("clip (2).mp3"));
        assert_eq!(fs::read(&first).unwrap(), vec![1]);
        assert_eq!(fs::read(&second).unwrap(), vec![2]);
    }

    #[test]
    fn test_unique_path_without_extension() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("audio"), b"x").unwrap();
        assert_eq!(unique_path(tmp.path(), "audio"), tmp.path().join("audio (1)"));
    }

    #[test]
    fn test_default_download_dir_resolves() {
        // Headless CI runners may have neither folder configured
        if std::env::var("CI").is_ok() {
            return;
        }
        assert!(default_download_dir().is_ok());
    }
}
