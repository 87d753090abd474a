//! Execution context threaded through every evaluation.
//!
//! The context carries the caller's policy for one invocation: a
//! cancellation token, an optional deadline and an optional limit on
//! closure-call depth. It is checked at every closure call, so a long or
//! runaway evaluation stops at the next call boundary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};

use crate::errors::EvalError;

/// Shareable cancellation flag.
///
/// Tokens form a tree: a child reports cancelled when it or any ancestor
/// has been cancelled, while cancelling a child leaves the parent alone.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: AtomicBool,
    parent: Option<CancelToken>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that is also cancelled when `self` is.
    #[must_use]
    pub fn child(&self) -> Self {
        CancelToken {
            inner: Arc::new(CancelInner {
                cancelled: AtomicBool::new(false),
                parent: Some(self.clone()),
            }),
        }
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        let mut token = Some(self);
        while let Some(t) = token {
            if t.inner.cancelled.load(Ordering::Acquire) {
                return true;
            }
            token = t.inner.parent.as_ref();
        }
        false
    }
}

#[derive(Clone, Copy, Debug)]
struct Deadline {
    at: Instant,
    timeout: StdDuration,
}

/// Per-invocation evaluation policy.
#[derive(Clone, Debug, Default)]
pub struct EvalContext {
    cancel: CancelToken,
    deadline: Option<Deadline>,
    max_call_depth: Option<usize>,
    depth: usize,
}

impl EvalContext {
    /// A context that is never cancelled and has no limits.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> EvalContextBuilder {
        EvalContextBuilder::default()
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Number of closure calls currently on the evaluation stack.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn max_call_depth(&self) -> Option<usize> {
        self.max_call_depth
    }

    /// Fail if the invocation has been cancelled or has run out of time.
    pub fn check(&self) -> Result<(), EvalError> {
        if self.cancel.is_cancelled() {
            tracing::trace!(depth = self.depth, "evaluation cancelled");
            return Err(EvalError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline.at {
                tracing::trace!(depth = self.depth, "evaluation deadline exceeded");
                return Err(EvalError::DeadlineExceeded {
                    timeout: deadline.timeout,
                });
            }
        }
        Ok(())
    }

    /// Context for the body of a closure call one level deeper.
    ///
    /// Runs [`check`](Self::check) and enforces the call-depth limit.
    pub fn descend(&self) -> Result<EvalContext, EvalError> {
        self.check()?;
        if let Some(limit) = self.max_call_depth {
            if self.depth >= limit {
                return Err(EvalError::RecursionLimit { limit });
            }
        }
        Ok(EvalContext {
            cancel: self.cancel.clone(),
            deadline: self.deadline,
            max_call_depth: self.max_call_depth,
            depth: self.depth + 1,
        })
    }
}

/// Builder for [`EvalContext`].
#[derive(Debug, Default)]
pub struct EvalContextBuilder {
    cancel: Option<CancelToken>,
    timeout: Option<StdDuration>,
    max_call_depth: Option<usize>,
}

impl EvalContextBuilder {
    /// Observe an existing token instead of a fresh one.
    #[must_use]
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Fail evaluation once `timeout` has elapsed, measured from `build`.
    #[must_use]
    pub fn timeout(mut self, timeout: StdDuration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Limit nested closure calls.
    #[must_use]
    pub fn max_call_depth(mut self, limit: usize) -> Self {
        self.max_call_depth = Some(limit);
        self
    }

    pub fn build(self) -> EvalContext {
        let deadline = self.timeout.map(|timeout| Deadline {
            at: Instant::now() + timeout,
            timeout,
        });
        EvalContext {
            cancel: self.cancel.unwrap_or_default(),
            deadline,
            max_call_depth: self.max_call_depth,
            depth: 0,
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_propagates_to_children() {
        let parent = CancelToken::new();
        let child = parent.child();
        let grandchild = child.child();

        assert!(!grandchild.is_cancelled());
        parent.cancel();
        assert!(child.is_cancelled());
        assert!(grandchild.is_cancelled());
    }

    #[test]
    fn test_cancel_child_leaves_parent() {
        let parent = CancelToken::new();
        let child = parent.child();
        child.cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[test]
    fn test_check_reports_cancellation() {
        let token = CancelToken::new();
        let ctx = EvalContext::builder().cancel_token(token.clone()).build();
        assert_eq!(ctx.check(), Ok(()));
        token.cancel();
        assert_eq!(ctx.check(), Err(EvalError::Cancelled));
        assert_eq!(ctx.descend().unwrap_err(), EvalError::Cancelled);
    }

    #[test]
    fn test_expired_deadline() {
        let ctx = EvalContext::builder().timeout(StdDuration::ZERO).build();
        assert!(matches!(
            ctx.check(),
            Err(EvalError::DeadlineExceeded { .. })
        ));
    }

    #[test]
    fn test_descend_enforces_depth() {
        let ctx = EvalContext::builder().max_call_depth(2).build();
        let one = ctx.descend().unwrap();
        let two = one.descend().unwrap();
        assert_eq!(two.depth(), 2);
        assert_eq!(
            two.descend().unwrap_err(),
            EvalError::RecursionLimit { limit: 2 }
        );
    }
}
