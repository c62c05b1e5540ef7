//! Prediction progress reporting.
//!
//! Batched prediction is the one long-running operation in the pipeline, so
//! it reports fractional progress after every chunk. Progress is emitted on
//! **stderr** so stdout remains parseable for scripts.

use std::io::Write;

/// Receives progress updates from the batched predictor. Implementations
/// write to stderr (human or JSON).
pub trait ProgressReporter {
    /// Called after each chunk with rows processed so far and the total.
    fn report(&self, processed: usize, total: usize);
}

/// Human-friendly progress: "processed 1,500 of 3,000 rows (50%)".
pub struct StderrProgress;

impl ProgressReporter for StderrProgress {
    fn report(&self, processed: usize, total: usize) {
        let percent = if total == 0 {
            100.0
        } else {
            processed as f64 / total as f64 * 100.0
        };
        let line = format!(
            "processed {} of {} rows ({:.0}%)\n",
            format_number(processed as u64),
            format_number(total as u64),
            percent
        );
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl ProgressReporter for JsonProgress {
    fn report(&self, processed: usize, total: usize) {
        let obj = serde_json::json!({
            "event": "progress",
            "processed": processed,
            "total": total,
        });
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _processed: usize, _total: usize) {}
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut grouped = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    /// Build a reporter for this mode. The caller hands it to the predictor.
    pub fn reporter(&self) -> Box<dyn ProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
