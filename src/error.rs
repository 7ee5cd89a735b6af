use thiserror::Error;

/// Maximum length for upstream error text carried in error messages
const MAX_ERROR_DETAIL_LENGTH: usize = 500;

/// Failure of a single network fetch.
///
/// A fetch that completed with a non-success status is only an error where
/// the caller required success (install); the intercept path passes such
/// responses through unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("unexpected status {status} fetching {url}")]
    Status { status: u16, url: String },
}

impl FetchError {
    /// Truncate upstream error text to avoid logging excessive data
    fn truncate_detail(detail: &str) -> String {
        if detail.len() <= MAX_ERROR_DETAIL_LENGTH {
            return detail.to_string();
        }
        // The limit may land mid-character; back off to a char boundary
        let mut cut = MAX_ERROR_DETAIL_LENGTH;
        while !detail.is_char_boundary(cut) {
            cut -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &detail[..cut],
            detail.len()
        )
    }

    pub fn network(url: &str, detail: &str) -> Self {
        FetchError::Network {
            url: url.to_string(),
            message: Self::truncate_detail(detail),
        }
    }

    pub fn status(status: u16, url: &str) -> Self {
        FetchError::Status {
            status,
            url: url.to_string(),
        }
    }
}

/// Failure reported by a [`CacheStorage`](crate::storage::CacheStorage) backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("storage error on partition {partition}: {message}")]
pub struct StorageError {
    pub partition: String,
    pub message: String,
}

impl StorageError {
    pub fn new(partition: &str, message: impl Into<String>) -> Self {
        Self {
            partition: partition.to_string(),
            message: message.into(),
        }
    }
}

/// Lifecycle-level failures surfaced to the host.
#[derive(Error, Debug)]
pub enum CacheError {
    /// One manifest entry could not be retrieved; the whole install is
    /// aborted and the generation never becomes servable.
    #[error("install of generation {generation} aborted: {source}")]
    InstallFetch {
        generation: String,
        #[source]
        source: FetchError,
    },

    /// One or more stale partitions could not be removed during activation.
    /// The remaining deletions and the client claim still ran.
    #[error("failed to delete {} stale partition(s): {partitions:?}", .partitions.len())]
    PartitionDeletion { partitions: Vec<String> },

    /// Live fetch on a cache miss failed; surfaced verbatim to the requester.
    #[error("live fetch failed: {0}")]
    InterceptNetwork(#[source] FetchError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Activation was attempted for a generation whose install has not
    /// completed successfully.
    #[error("generation {generation} is not ready to activate")]
    NotReady { generation: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_long_error_detail() {
        let long = "x".repeat(600);
        let err = FetchError::network("/app.css", &long);
        match err {
            FetchError::Network { message, .. } => {
                assert!(message.len() < 600);
                assert!(message.contains("truncated, 600 total bytes"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // 1 ASCII byte followed by 300 two-byte chars puts the cut limit
        // mid-character; truncation must back off instead of slicing there
        let detail = format!("x{}", "é".repeat(300));
        assert!(!detail.is_char_boundary(500));

        let err = FetchError::network("/app.css", &detail);
        match err {
            FetchError::Network { message, .. } => {
                assert!(message.contains("truncated, 601 total bytes"));
                assert!(message.starts_with("xé"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_short_detail_unchanged() {
        let err = FetchError::network("/", "connection refused");
        assert_eq!(
            err,
            FetchError::Network {
                url: "/".to_string(),
                message: "connection refused".to_string()
            }
        );
    }

    #[test]
    fn test_deletion_error_names_partitions() {
        let err = CacheError::PartitionDeletion {
            partitions: vec!["v0".to_string(), "v1".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("2 stale partition(s)"));
        assert!(msg.contains("v0"));
    }
}
