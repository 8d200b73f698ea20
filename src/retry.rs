//! Retry policies for download requests that answer with an error status.

use reqwest::StatusCode;

/// Decides whether a download request is sent again after a non-success
/// status.
pub trait RetryPolicy: Send + Sync {
    /// Called after attempt number `attempt` (starting at 1) was answered
    /// with `status`.
    fn should_retry(&self, attempt: u32, status: StatusCode) -> bool;
}

/// Retries immediately and without limit until the server answers with a
/// success status.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryForever;

impl RetryPolicy for RetryForever {
    fn should_retry(&self, _attempt: u32, _status: StatusCode) -> bool {
        true
    }
}

/// Gives up after a fixed number of attempts.
#[derive(Debug, Clone, Copy)]
pub struct MaxAttempts(pub u32);

impl RetryPolicy for MaxAttempts {
    fn should_retry(&self, attempt: u32, _status: StatusCode) -> bool {
        attempt < self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn max_attempts_counts_the_first_try() {
        let policy = MaxAttempts(3);
        assert!(policy.should_retry(1, StatusCode::BAD_GATEWAY));
        assert!(policy.should_retry(2, StatusCode::BAD_GATEWAY));
        assert!(!policy.should_retry(3, StatusCode::BAD_GATEWAY));
    }

    #[test]
    fn single_attempt_never_retries() {
        assert!(!MaxAttempts(1).should_retry(1, StatusCode::INTERNAL_SERVER_ERROR));
    }

    proptest! {
        #[test]
        fn retry_forever_always_retries(attempt in 1u32..u32::MAX, code in 300u16..600) {
            let status = StatusCode::from_u16(code).unwrap();
            prop_assert!(RetryForever.should_retry(attempt, status));
        }
    }
}
