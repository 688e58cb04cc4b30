use std::time::Duration;

use studio_core::poller::PollPolicy;

/// Polling policies for every job kind, loaded from the environment.
#[derive(Debug, Clone)]
pub struct PollingConfig {
    /// Customised avatar training.
    pub avatar: PollPolicy,
    /// Customised voice training (`create-audio`).
    pub voice: PollPolicy,
    /// Text-to-speech tasks (`gen-chanjing-audio`).
    pub speech: PollPolicy,
    pub hedra: PollPolicy,
    pub omnihuman: PollPolicy,
    pub stable_avatar: PollPolicy,
    pub topview: PollPolicy,
    /// Per-check retry budget of the voice clone scheduler. Its ceiling is unused.
    pub voice_clone: PollPolicy,
    /// Tick period of the voice clone scheduler.
    pub voice_clone_period: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            avatar: policy(5_000, 120, 19),
            voice: policy(3_000, 100, 1),
            speech: policy(1_000, 60, 2),
            hedra: policy(5_000, 120, 2),
            omnihuman: policy(5_000, 120, 1),
            stable_avatar: policy(5_000, 120, 1),
            topview: policy(5_000, 120, 1),
            voice_clone: policy(1_000, 1, 2),
            voice_clone_period: Duration::from_secs(10),
        }
    }
}

fn policy(interval_ms: u64, max_attempts: u32, retries: u32) -> PollPolicy {
    PollPolicy::new(Duration::from_millis(interval_ms), max_attempts).with_transient_retries(retries)
}

impl PollingConfig {
    /// Load polling configuration from environment variables with defaults.
    ///
    /// Each kind reads `POLL_<KIND>_INTERVAL_MS`, `POLL_<KIND>_MAX_ATTEMPTS`
    /// and `POLL_<KIND>_RETRIES`, where `<KIND>` is one of `AVATAR`, `VOICE`,
    /// `SPEECH`, `HEDRA`, `OMNIHUMAN`, `STABLE_AVATAR`, `TOPVIEW`,
    /// `VOICE_CLONE`.
    ///
    /// | Kind            | Interval | Max attempts | Retries |
    /// |-----------------|----------|--------------|---------|
    /// | `AVATAR`        | 5000 ms  | 120          | 19      |
    /// | `VOICE`         | 3000 ms  | 100          | 1       |
    /// | `SPEECH`        | 1000 ms  | 60           | 2       |
    /// | `HEDRA`         | 5000 ms  | 120          | 2       |
    /// | `OMNIHUMAN`     | 5000 ms  | 120          | 1       |
    /// | `STABLE_AVATAR` | 5000 ms  | 120          | 1       |
    /// | `TOPVIEW`       | 5000 ms  | 120          | 1       |
    /// | `VOICE_CLONE`   | 1000 ms  | 1            | 2       |
    ///
    /// `VOICE_CLONE_POLL_SECS` (default `10`) sets the scheduler period and
    /// `POLL_CALL_TIMEOUT_SECS` (default `30`) bounds every status call.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let call_timeout = Duration::from_secs(env_number("POLL_CALL_TIMEOUT_SECS", 30));

        let load = |kind: &str, default: PollPolicy| {
            let interval = env_number(
                &format!("POLL_{kind}_INTERVAL_MS"),
                default.interval.as_millis() as u64,
            );
            let max_attempts = env_number(
                &format!("POLL_{kind}_MAX_ATTEMPTS"),
                u64::from(default.max_attempts),
            );
            let retries = env_number(
                &format!("POLL_{kind}_RETRIES"),
                u64::from(default.transient_retries),
            );
            PollPolicy::new(
                Duration::from_millis(interval),
                u32::try_from(max_attempts).unwrap_or(u32::MAX),
            )
            .with_transient_retries(u32::try_from(retries).unwrap_or(u32::MAX))
            .with_call_timeout(call_timeout)
        };

        Self {
            avatar: load("AVATAR", defaults.avatar),
            voice: load("VOICE", defaults.voice),
            speech: load("SPEECH", defaults.speech),
            hedra: load("HEDRA", defaults.hedra),
            omnihuman: load("OMNIHUMAN", defaults.omnihuman),
            stable_avatar: load("STABLE_AVATAR", defaults.stable_avatar),
            topview: load("TOPVIEW", defaults.topview),
            voice_clone: load("VOICE_CLONE", defaults.voice_clone),
            voice_clone_period: Duration::from_secs(env_number(
                "VOICE_CLONE_POLL_SECS",
                defaults.voice_clone_period.as_secs(),
            )),
        }
    }
}

fn env_number(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a valid unsigned integer")),
        Err(_) => default,
    }
}
