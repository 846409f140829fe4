use std::collections::HashMap;
use std::time::Instant;

use crate::conversion::domain::conversion_event::ConversionEvent;
use crate::conversion::domain::conversion_item::ItemId;

/// Cross-cutting observer for batch events.
///
/// Decouples the batch driver from how progress is reported (log output,
/// nothing at all) so each caller can observe a run without changing the
/// conversion code.
pub trait ConversionLogger: Send {
    /// Observe one event, in emission order.
    fn record(&mut self, event: &ConversionEvent);

    /// Emit an end-of-batch summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullConversionLogger;

impl ConversionLogger for NullConversionLogger {
    fn record(&mut self, _event: &ConversionEvent) {}
}

/// Logger backed by the `log` crate that tracks per-item timing.
///
/// Progress lines are throttled to every `throttle_percent` points.
pub struct LogConversionLogger {
    throttle_percent: u8,
    started: HashMap<ItemId, Instant>,
    last_reported: HashMap<ItemId, u8>,
    durations_ms: Vec<f64>,
    completed: usize,
    failed: usize,
    bytes_out: usize,
    start_time: Instant,
}

impl LogConversionLogger {
    pub fn new(throttle_percent: u8) -> Self {
        Self {
            throttle_percent: throttle_percent.max(1),
            started: HashMap::new(),
            last_reported: HashMap::new(),
            durations_ms: Vec::new(),
            completed: 0,
            failed: 0,
            bytes_out: 0,
            start_time: Instant::now(),
        }
    }

    /// Returns the formatted summary string, or `None` if nothing finished.
    pub fn summary_string(&self) -> Option<String> {
        let finished = self.completed + self.failed;
        if finished == 0 {
            return None;
        }

        let elapsed = self.start_time.elapsed().as_secs_f64();
        let mut lines = vec![format!(
            "Batch summary ({finished} items, {elapsed:.1}s total):"
        )];
        lines.push(format!(
            "  completed: {}  failed: {}",
            self.completed, self.failed
        ));
        if !self.durations_ms.is_empty() {
            let total: f64 = self.durations_ms.iter().sum();
            let avg = total / self.durations_ms.len() as f64;
            lines.push(format!("  per item: avg {avg:.0}ms"));
        }
        if self.bytes_out > 0 {
            lines.push(format!(
                "  audio written: {:.1} MiB",
                self.bytes_out as f64 / (1024.0 * 1024.0)
            ));
        }
        Some(lines.join("\n"))
    }

    fn finish(&mut self, id: ItemId) -> f64 {
        self.last_reported.remove(&id);
        let ms = self
            .started
            .remove(&id)
            .map(|t| t.elapsed().as_secs_f64() * 1000.0)
            .unwrap_or(0.0);
        self.durations_ms.push(ms);
        ms
    }
}

impl Default for LogConversionLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ConversionLogger for LogConversionLogger {
    fn record(&mut self, event: &ConversionEvent) {
        match event {
            ConversionEvent::Started { id } => {
                self.started.insert(*id, Instant::now());
                self.last_reported.insert(*id, 0);
                log::info!("Converting item {id}");
            }
            ConversionEvent::Progress { id, percent } => {
                let last = self.last_reported.get(id).copied().unwrap_or(0);
                if *percent >= last.saturating_add(self.throttle_percent) || *percent == 100 {
                    self.last_reported.insert(*id, *percent);
                    log::info!("Item {id}: {percent}%");
                }
            }
            ConversionEvent::Completed { id, result } => {
                let ms = self.finish(*id);
                self.completed += 1;
                self.bytes_out += result.len();
                log::info!("Item {id} done: {} bytes in {ms:.0}ms", result.len());
            }
            ConversionEvent::Failed { id, message } => {
                let ms = self.finish(*id);
                self.failed += 1;
                log::warn!("Item {id} failed after {ms:.0}ms: {message}");
            }
        }
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
