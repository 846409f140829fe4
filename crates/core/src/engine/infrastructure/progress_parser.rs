/// Incremental parser for ffmpeg's `-progress` key/value stream.
///
/// ffmpeg emits blocks of `key=value` lines terminated by `progress=continue`
/// or `progress=end`. Each completed block yields a ratio of encoded time to
/// the source duration.
pub struct ProgressParser {
    duration_secs: Option<f64>,
    out_time_us: Option<i64>,
}

impl ProgressParser {
    pub fn new(duration_secs: Option<f64>) -> Self {
        Self {
            duration_secs: duration_secs.filter(|d| d.is_finite() && *d > 0.0),
            out_time_us: None,
        }
    }

    /// Feed one line. Returns the progress ratio in `[0.0, 1.0]` when the
    /// line closes a progress block and a ratio can be computed.
    pub fn feed(&mut self, line: &str) -> Option<f64> {
        let (key, value) = split_progress_line(line)?;
        match key {
            "out_time_us" | "out_time_ms" => {
                // out_time_ms is misnamed upstream and also carries microseconds.
                if let Ok(us) = value.parse::<i64>() {
                    self.out_time_us = Some(us);
                }
                None
            }
            "progress" if value == "end" => Some(1.0),
            "progress" => {
                let duration = self.duration_secs?;
                let elapsed = self.out_time_us? as f64 / 1_000_000.0;
                Some((elapsed / duration).clamp(0.0, 1.0))
            }
            _ => None,
        }
    }
}

/// Whether a stderr line belongs to the `-progress` stream rather than the log.
pub fn is_progress_line(line: &str) -> bool {
    split_progress_line(line).is_some()
}

fn split_progress_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.trim().split_once('=')?;
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some((key, value.trim()))
}

/// Parse the duration printed by
/// `ffprobe -show_entries format=duration -of default=noprint_wrappers=1:nokey=1`.
pub fn parse_duration(output: &str) -> Option<f64> {
    output
        .lines()
        .filter_map(|l| l.trim().parse::<f64>().ok())
        .find(|d| d.is_finite() && *d > 0.0)
}
