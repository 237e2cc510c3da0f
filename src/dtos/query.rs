//! Query DTOs - query string parameters

use serde::{Deserialize, Serialize};

/// Query parameters for message pagination. `cursor` is a message id; the
/// page contains messages strictly older than it.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct MessagesQuery {
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Hard cap on a single page of messages.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Page size used when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

impl MessagesQuery {
    /// The effective page size: requested, clamped to [1, MAX_PAGE_SIZE],
    /// defaulting to DEFAULT_PAGE_SIZE.
    pub fn page_size(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_defaults_and_clamps() {
        assert_eq!(MessagesQuery::default().page_size(), 50);
        let big = MessagesQuery { cursor: None, limit: Some(1000) };
        assert_eq!(big.page_size(), 100);
        let small = MessagesQuery { cursor: None, limit: Some(0) };
        assert_eq!(small.page_size(), 1);
        let normal = MessagesQuery { cursor: None, limit: Some(25) };
        assert_eq!(normal.page_size(), 25);
    }
}
