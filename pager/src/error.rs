use alloc::string::String;

use thiserror::Error;

/// An item source could not produce a page.
///
/// Failures are retryable: the pager leaves its items, page index and `has_more` untouched.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("failed to fetch page {page}: {reason}")]
    Failed { page: u64, reason: String },
}

impl FetchError {
    pub fn failed(page: u64, reason: impl Into<String>) -> Self {
        Self::Failed {
            page,
            reason: reason.into(),
        }
    }

    pub fn page(&self) -> u64 {
        match self {
            Self::Failed { page, .. } => *page,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SensorError {
    /// The host has no viewport intersection primitive.
    #[error("viewport intersection is unavailable on this host")]
    Unavailable,
}
