use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Paging, timeout and retry tuning for the browse engine ⏱️
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowseConfig {
    /// Bounded wait on every catalog call before the timeout hook runs
    #[serde(default = "default_loading_timeout_ms")]
    pub loading_timeout_ms: u64,
    /// Pause before a timed out directory listing is issued again
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Re-issues of a timed out search before giving up with "No results"
    #[serde(default = "default_search_max_retries")]
    pub search_max_retries: u32,
    #[serde(default = "default_search_min_chars")]
    pub search_min_chars: usize,
    #[serde(default = "default_filter_max_results")]
    pub filter_max_results: usize,
    /// Display rows only fit this many characters before rolling over
    #[serde(default = "default_row_line_max_length")]
    pub row_line_max_length: usize,
    #[serde(default = "default_initial_window_rows")]
    pub initial_window_rows: usize,
    #[serde(default = "default_redraw_window_rows")]
    pub redraw_window_rows: usize,
}

fn default_loading_timeout_ms() -> u64 {
    2000
}

fn default_retry_delay_ms() -> u64 {
    100
}

fn default_search_max_retries() -> u32 {
    2
}

fn default_search_min_chars() -> usize {
    2
}

fn default_filter_max_results() -> usize {
    15
}

fn default_row_line_max_length() -> usize {
    22
}

fn default_initial_window_rows() -> usize {
    20
}

fn default_redraw_window_rows() -> usize {
    8
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            loading_timeout_ms: default_loading_timeout_ms(),
            retry_delay_ms: default_retry_delay_ms(),
            search_max_retries: default_search_max_retries(),
            search_min_chars: default_search_min_chars(),
            filter_max_results: default_filter_max_results(),
            row_line_max_length: default_row_line_max_length(),
            initial_window_rows: default_initial_window_rows(),
            redraw_window_rows: default_redraw_window_rows(),
        }
    }
}

impl BrowseConfig {
    pub fn loading_timeout(&self) -> Duration {
        Duration::from_millis(self.loading_timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}
