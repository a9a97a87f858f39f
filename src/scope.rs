//! # Cancellation scopes with a latched cause.
//!
//! [`CancelScope`] wraps a [`CancellationToken`] and adds what the token lacks: the
//! *reason* a scope was cancelled. Every [`Task`](crate::Task) owns one scope, derived
//! from the caller's scope (or a fresh root); when the task's producer fails, the scope
//! fires with that error as its cause so dependents learn *why* they were cancelled.
//!
//! ## Architecture
//! ```text
//! root (CancelScope::new)
//!   ├─► child A (task A)  ── cancel_with(err) ──► A.cause() == Some(err)
//!   │     └─► child B (task B derived from A) ──► B.cause() == Some(err) (via A)
//!   └─► child C           (unaffected)
//! ```
//!
//! ## Rules
//! - Firing is **idempotent** and **record-once**: the first firing latches, later
//!   firings return `false` and never overwrite the latched cause
//! - Firing a child never affects its parent; firing a parent reaches every descendant
//! - `cancelled()` has broadcast semantics: any number of listeners, nothing is consumed
//! - A scope fired through an ancestor reports the ancestor's cause

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

use crate::error::TaskError;

/// Latch state of a single scope.
#[derive(Debug)]
enum Latch {
    /// Not fired directly (may still be cancelled through an ancestor).
    Open,
    /// Fired directly, with an optional cause.
    Fired(Option<TaskError>),
}

#[derive(Debug)]
struct Inner {
    token: CancellationToken,
    latch: Mutex<Latch>,
    parent: Option<CancelScope>,
}

/// # Derivable cancellation signal carrying an optional cause.
///
/// Cheap to clone: clones share the same underlying state.
///
/// # Example
/// ```
/// use taskpromise::{CancelScope, TaskError};
///
/// let parent = CancelScope::new();
/// let child = parent.child();
///
/// assert!(parent.cancel_with(TaskError::fail("boom")));
/// assert!(child.is_cancelled());
/// assert_eq!(child.cause(), Some(TaskError::fail("boom")));
///
/// // the first cause wins
/// assert!(!parent.cancel_with(TaskError::NilValue));
/// assert_eq!(parent.cause(), Some(TaskError::fail("boom")));
/// ```
#[derive(Clone, Debug)]
pub struct CancelScope {
    inner: Arc<Inner>,
}

impl CancelScope {
    /// Creates an unbounded root scope.
    pub fn new() -> Self {
        Self::from_token(CancellationToken::new(), None)
    }

    /// Derives a child scope. Cancelling the child does not affect `self`.
    pub fn child(&self) -> Self {
        Self::from_token(self.inner.token.child_token(), Some(self.clone()))
    }

    fn from_token(token: CancellationToken, parent: Option<CancelScope>) -> Self {
        Self {
            inner: Arc::new(Inner {
                token,
                latch: Mutex::new(Latch::Open),
                parent,
            }),
        }
    }

    /// Fires the scope without a cause.
    ///
    /// Returns `false` if the scope was already cancelled.
    pub fn cancel(&self) -> bool {
        self.fire(None)
    }

    /// Fires the scope and latches `cause`.
    ///
    /// Returns `false` (and drops `cause`) if the scope was already cancelled,
    /// whether directly or through an ancestor.
    pub fn cancel_with(&self, cause: TaskError) -> bool {
        self.fire(Some(cause))
    }

    fn fire(&self, cause: Option<TaskError>) -> bool {
        let mut latch = self.latch();
        if matches!(*latch, Latch::Fired(_)) || self.inner.token.is_cancelled() {
            return false;
        }
        *latch = Latch::Fired(cause);
        self.inner.token.cancel();
        true
    }

    /// Returns `true` once the scope or any ancestor has fired.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.token.is_cancelled()
    }

    /// Completes when the scope is cancelled. Can be awaited by any number of listeners.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.inner.token.cancelled()
    }

    /// Returns the cause the scope was cancelled with.
    ///
    /// - `None` while the scope is live, or when it fired without a cause
    /// - the scope's own latched cause if it was fired directly
    /// - otherwise the cause of the ancestor that fired
    pub fn cause(&self) -> Option<TaskError> {
        if !self.is_cancelled() {
            return None;
        }
        if let Latch::Fired(cause) = &*self.latch() {
            return cause.clone();
        }
        self.inner.parent.as_ref().and_then(CancelScope::cause)
    }

    /// Returns the underlying token, e.g. to hand it to `tokio_util`-aware code.
    pub fn token(&self) -> CancellationToken {
        self.inner.token.clone()
    }

    fn latch(&self) -> MutexGuard<'_, Latch> {
        self.inner
            .latch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CancelScope {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives a child of `parent`, or a fresh root when there is none.
pub(crate) fn derive(parent: Option<&CancelScope>) -> CancelScope {
    parent.map_or_else(CancelScope::new, CancelScope::child)
}
