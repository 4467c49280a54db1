//! Synchronous outcome container.
//!
//! [`Context`] is what [`crate::Node::process`] returns: a fully resolved
//! [`Outcome`] paired with the [`DiagnosticLog`] accumulated while producing it.

use crate::{DiagnosticLog, LogRecord, NodeError};

/// The three ways a chain traversal can end. Exactly one is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The chain produced a value.
    Value(T),
    /// A node failed; the error is passed through unchanged from where it
    /// was raised.
    Error(NodeError),
    /// The traversal was cancelled before it produced a value.
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn map<U, F: FnOnce(T) -> U>(self, op: F) -> Outcome<U> {
        match self {
            Outcome::Value(v) => Outcome::Value(op(v)),
            Outcome::Error(e) => Outcome::Error(e),
            Outcome::Cancelled => Outcome::Cancelled,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Outcome::Value(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }
}

// ---------------------------------------------------------------------------

/// A resolved outcome together with its diagnostic log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context<T> {
    outcome: Outcome<T>,
    log: DiagnosticLog,
}

impl<T> Context<T> {
    /// A successful outcome with an empty log.
    pub fn value(value: T) -> Self {
        Self::from_outcome(Outcome::Value(value))
    }

    /// A failed outcome with an empty log.
    pub fn error(error: impl Into<NodeError>) -> Self {
        Self::from_outcome(Outcome::Error(error.into()))
    }

    /// A cancelled outcome with an empty log.
    pub fn cancelled() -> Self {
        Self::from_outcome(Outcome::Cancelled)
    }

    pub fn from_outcome(outcome: Outcome<T>) -> Self {
        Self {
            outcome,
            log: DiagnosticLog::new(),
        }
    }

    /// Puts `record` ahead of the log already attached.
    ///
    /// A node calls this on the context its successor returned, so its own
    /// record lands before the successor's.
    pub fn log(mut self, record: LogRecord) -> Self {
        self.log.prepend(DiagnosticLog::from(record));
        self
    }

    /// Puts every record of `earlier` ahead of the log already attached.
    pub fn with_log(mut self, earlier: DiagnosticLog) -> Self {
        self.log.prepend(earlier);
        self
    }

    pub fn outcome(&self) -> &Outcome<T> {
        &self.outcome
    }

    pub fn diagnostic_log(&self) -> &DiagnosticLog {
        &self.log
    }

    pub fn into_parts(self) -> (Outcome<T>, DiagnosticLog) {
        (self.outcome, self.log)
    }

    /// Drops the log. `Ok(None)` stands for a cancelled traversal.
    pub fn into_result(self) -> Result<Option<T>, NodeError> {
        match self.outcome {
            Outcome::Value(v) => Ok(Some(v)),
            Outcome::Error(e) => Err(e),
            Outcome::Cancelled => Ok(None),
        }
    }

    /// Transforms the success value, keeping the log.
    pub fn map<U, F: FnOnce(T) -> U>(self, op: F) -> Context<U> {
        Context {
            outcome: self.outcome.map(op),
            log: self.log,
        }
    }

    /// Chains a fallible step on the success value. The log of the step's
    /// context is appended after the current log.
    pub fn and_then<U, F: FnOnce(T) -> Context<U>>(self, op: F) -> Context<U> {
        match self.outcome {
            Outcome::Value(v) => op(v).with_log(self.log),
            Outcome::Error(e) => Context {
                outcome: Outcome::Error(e),
                log: self.log,
            },
            Outcome::Cancelled => Context {
                outcome: Outcome::Cancelled,
                log: self.log,
            },
        }
    }

    // -----------------------------------------------------------------------
    // Callback dispatch
    // -----------------------------------------------------------------------

    /// Calls `f` with the value if the outcome is a success.
    pub fn on_completed<F: FnOnce(&T)>(&self, f: F) -> &Self {
        if let Outcome::Value(v) = &self.outcome {
            f(v);
        }
        self
    }

    /// Calls `f` with the error if the outcome is a failure.
    pub fn on_error<F: FnOnce(&NodeError)>(&self, f: F) -> &Self {
        if let Outcome::Error(e) = &self.outcome {
            f(e);
        }
        self
    }

    /// Calls `f` if the outcome is cancelled.
    pub fn on_cancelled<F: FnOnce()>(&self, f: F) -> &Self {
        if self.outcome.is_cancelled() {
            f();
        }
        self
    }

    /// Calls `f` with the log whatever the outcome.
    pub fn on_log<F: FnOnce(&DiagnosticLog)>(&self, f: F) -> &Self {
        f(&self.log);
        self
    }
}
