//! Per-call cancellation and deadline handle.
//!
//! Every catalog handler receives a [`CallContext`] and polls it at fixed
//! points: once before the store write for unary calls, and before every
//! receive and every unit of work inside streaming loops. Suspensions on
//! inbound messages are wrapped with [`CallContext::guard`] so that a
//! cancelled or expired call wakes up instead of waiting for the peer.
//!
//! Cancellation never rolls back work already committed to a store.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{PcbookError, Result};

/// Metadata header carrying the caller's time budget.
pub const GRPC_TIMEOUT_HEADER: &str = "grpc-timeout";

/// Cancellation token plus optional deadline for one inbound call.
///
/// Cloning yields a handle to the same call: cancelling any clone cancels
/// them all.
#[derive(Debug, Clone)]
pub struct CallContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context with no deadline that is not cancelled.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Attach an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Attach a deadline `timeout` from now. A timeout too large to
    /// represent leaves the call without a deadline.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Use an existing token, e.g. a child of a server-wide shutdown token.
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Mark the call as cancelled by the caller.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Fail with [`PcbookError::Canceled`] or [`PcbookError::DeadlineExceeded`]
    /// if the call should stop. Cancellation wins when both hold.
    pub fn check(&self) -> Result<()> {
        if self.token.is_cancelled() {
            return Err(PcbookError::Canceled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(PcbookError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Drive `fut` to completion unless the call is cancelled or its
    /// deadline passes first.
    pub async fn guard<F: Future>(&self, fut: F) -> Result<F::Output> {
        self.check()?;
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(PcbookError::Canceled),
            _ = expired => Err(PcbookError::DeadlineExceeded),
            out = fut => Ok(out),
        }
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a `grpc-timeout` header value (`<1-8 digits><unit>`, unit one of
/// `H M S m u n`).
pub fn parse_grpc_timeout(value: &str) -> Option<Duration> {
    if !value.is_ascii() || value.len() < 2 || value.len() > 9 {
        return None;
    }
    let (digits, unit) = value.split_at(value.len() - 1);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let amount: u64 = digits.parse().ok()?;
    let timeout = match unit {
        "H" => Duration::from_secs(amount.checked_mul(3600)?),
        "M" => Duration::from_secs(amount.checked_mul(60)?),
        "S" => Duration::from_secs(amount),
        "m" => Duration::from_millis(amount),
        "u" => Duration::from_micros(amount),
        "n" => Duration::from_nanos(amount),
        _ => return None,
    };
    Some(timeout)
}
