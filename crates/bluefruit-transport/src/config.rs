use std::time::Duration;

/// Default read timeout applied to socket links.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Default upper bound on a single `read_line` result.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 1024;

/// Configuration applied when a link is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkConfig {
    /// Read timeout for blocking operations. `None` blocks indefinitely.
    pub read_timeout: Option<Duration>,
    /// Maximum bytes returned by one `read_line` call, newline included.
    pub max_line_length: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            read_timeout: Some(DEFAULT_READ_TIMEOUT),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}
