use std::collections::VecDeque;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempDir;

use crate::engine::domain::media_engine::{EngineError, MediaEngine};
use crate::engine::domain::resource_fetcher::EngineResource;

use super::progress_parser::{is_progress_line, parse_duration, ProgressParser};

/// Number of ffmpeg log lines kept for error messages.
const ERROR_TAIL_LINES: usize = 6;

/// Runs a downloaded static ffmpeg build as a child process.
///
/// On load the glue (`ffprobe`) and payload (`ffmpeg`) are written into a
/// private scratch directory. A `fs/` subdirectory acts as the engine's
/// virtual filesystem: every command runs with it as the working directory,
/// and the whole tree is removed when the engine is dropped.
pub struct ProcessEngine {
    state: Option<LoadedState>,
}

struct LoadedState {
    scratch: TempDir,
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl LoadedState {
    fn fs_dir(&self) -> PathBuf {
        self.scratch.path().join("fs")
    }
}

impl ProcessEngine {
    pub fn new() -> Self {
        Self { state: None }
    }

    fn loaded(&self) -> Result<&LoadedState, EngineError> {
        self.state.as_ref().ok_or(EngineError::NotLoaded)
    }

    fn virtual_path(&self, name: &str) -> Result<PathBuf, EngineError> {
        let state = self.loaded()?;
        validate_name(name)?;
        Ok(state.fs_dir().join(name))
    }

    /// Duration of the `-i` input, via the glue binary. `None` if unknown.
    fn probe_input_duration(&self, args: &[String]) -> Option<f64> {
        let state = self.state.as_ref()?;
        let input = args
            .windows(2)
            .find(|pair| pair[0] == "-i")
            .map(|pair| pair[1].clone())?;

        let output = Command::new(&state.ffprobe)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(&input)
            .current_dir(state.fs_dir())
            .stdin(Stdio::null())
            .output()
            .map_err(|e| log::debug!("ffprobe failed to start: {e}"))
            .ok()?;

        if !output.status.success() {
            log::debug!("ffprobe could not read duration of {input}");
            return None;
        }
        parse_duration(&String::from_utf8_lossy(&output.stdout))
    }
}

impl Default for ProcessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaEngine for ProcessEngine {
    fn load(
        &mut self,
        glue: &EngineResource,
        payload: &EngineResource,
    ) -> Result<(), EngineError> {
        let scratch = tempfile::Builder::new()
            .prefix("soundlift-engine-")
            .tempdir()
            .map_err(|e| EngineError::Load(format!("cannot create scratch directory: {e}")))?;

        let bin_dir = scratch.path().join("bin");
        for dir in [&bin_dir, &scratch.path().join("fs")] {
            fs::create_dir_all(dir)
                .map_err(|e| EngineError::Load(format!("cannot create {}: {e}", dir.display())))?;
        }

        let ffprobe = install_executable(&bin_dir, "ffprobe", &glue.bytes)?;
        let ffmpeg = install_executable(&bin_dir, "ffmpeg", &payload.bytes)?;

        let status = Command::new(&ffmpeg)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| EngineError::Load(format!("{} does not run: {e}", payload.name)))?;
        if !status.success() {
            return Err(EngineError::Load(format!(
                "{} exited with {status} on startup",
                payload.name
            )));
        }

        log::info!(
            "Engine loaded: {} ({} bytes) + {} ({} bytes) in {}",
            payload.name,
            payload.bytes.len(),
            glue.name,
            glue.bytes.len(),
            scratch.path().display()
        );

        self.state = Some(LoadedState {
            scratch,
            ffmpeg,
            ffprobe,
        });
        Ok(())
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), EngineError> {
        let path = self.virtual_path(name)?;
        fs::write(&path, data).map_err(|source| EngineError::Io {
            name: name.to_string(),
            source,
        })
    }

    fn exec(
        &mut self,
        args: &[String],
        on_progress: &mut dyn FnMut(f64),
    ) -> Result<(), EngineError> {
        let duration = self.probe_input_duration(args);
        let state = self.loaded()?;

        log::debug!("ffmpeg {}", args.join(" "));
        let mut child = Command::new(&state.ffmpeg)
            .args(["-y", "-nostats", "-progress", "pipe:2"])
            .args(args)
            .current_dir(state.fs_dir())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| EngineError::Exec(format!("failed to spawn ffmpeg: {e}")))?;

        let mut parser = ProgressParser::new(duration);
        let mut tail: VecDeque<String> = VecDeque::with_capacity(ERROR_TAIL_LINES);

        if let Some(stderr) = child.stderr.take() {
            for line in BufReader::new(stderr).lines() {
                let line = match line {
                    Ok(l) => l,
                    Err(e) => {
                        log::debug!("ffmpeg stderr: {e}");
                        break;
                    }
                };
                if is_progress_line(&line) {
                    if let Some(ratio) = parser.feed(&line) {
                        on_progress(ratio);
                    }
                } else if !line.trim().is_empty() {
                    if tail.len() == ERROR_TAIL_LINES {
                        tail.pop_front();
                    }
                    tail.push_back(line.trim().to_string());
                }
            }
        }

        let status = child
            .wait()
            .map_err(|e| EngineError::Exec(format!("failed to wait for ffmpeg: {e}")))?;
        if !status.success() {
            let detail = tail.into_iter().collect::<Vec<_>>().join("\n");
            return Err(EngineError::Exec(if detail.is_empty() {
                format!("ffmpeg exited with {status}")
            } else {
                format!("ffmpeg exited with {status}: {detail}")
            }));
        }
        Ok(())
    }

    fn read_file(&mut self, name: &str) -> Result<Vec<u8>, EngineError> {
        let path = self.virtual_path(name)?;
        fs::read(&path).map_err(|source| EngineError::Io {
            name: name.to_string(),
            source,
        })
    }

    fn delete_file(&mut self, name: &str) -> Result<(), EngineError> {
        let path = self.virtual_path(name)?;
        fs::remove_file(&path).map_err(|source| EngineError::Io {
            name: name.to_string(),
            source,
        })
    }
}

/// Virtual names are flat: no separators, no parent references.
fn validate_name(name: &str) -> Result<(), EngineError> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains("..")
    {
        return Err(EngineError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn install_executable(dir: &Path, stem: &str, bytes: &[u8]) -> Result<PathBuf, EngineError> {
    if bytes.is_empty() {
        return Err(EngineError::Load(format!("{stem} resource is empty")));
    }
    let path = dir.join(format!("{stem}{}", std::env::consts::EXE_SUFFIX));
    fs::write(&path, bytes)
        .map_err(|e| EngineError::Load(format!("cannot write {}: {e}", path.display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .map_err(|e| EngineError::Load(format!("cannot mark {stem} executable: {e}")))?;
    }

    Ok(path)
}
