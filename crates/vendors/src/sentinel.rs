//! Vendor status sentinels as data.
//!
//! Vendors signal task state with their own magic values (`2`, `9`, `"done"`,
//! `"COMPLETED"` ...). Each adapter declares its values here instead of the
//! orchestrators guessing shared meaning. Values outside the declared sets are
//! reported as [`Progress::Unknown`] and treated as non-terminal.

/// Classified task state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Succeeded,
    Failed,
    Running,
    Unknown,
}

impl Progress {
    pub fn is_terminal(self) -> bool {
        matches!(self, Progress::Succeeded | Progress::Failed)
    }
}

/// Numeric status codes of one vendor endpoint.
#[derive(Debug, Clone, Copy)]
pub struct NumericCodes {
    pub success: &'static [i64],
    pub failure: &'static [i64],
    pub running: &'static [i64],
}

impl NumericCodes {
    pub fn classify(&self, code: i64) -> Progress {
        if self.success.contains(&code) {
            Progress::Succeeded
        } else if self.failure.contains(&code) {
            Progress::Failed
        } else if self.running.contains(&code) {
            Progress::Running
        } else {
            Progress::Unknown
        }
    }
}

/// Textual statuses of one vendor endpoint, compared case-insensitively.
#[derive(Debug, Clone, Copy)]
pub struct TextCodes {
    pub success: &'static [&'static str],
    pub failure: &'static [&'static str],
    pub running: &'static [&'static str],
}

impl TextCodes {
    pub fn classify(&self, status: &str) -> Progress {
        let status = status.trim();
        let hit = |set: &[&str]| set.iter().any(|s| s.eq_ignore_ascii_case(status));
        if hit(self.success) {
            Progress::Succeeded
        } else if hit(self.failure) {
            Progress::Failed
        } else if hit(self.running) {
            Progress::Running
        } else {
            Progress::Unknown
        }
    }
}
