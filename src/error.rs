// Copyright 2016 Vincent Vigneron. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at.your option.
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Error types for graph construction.
//!
//! The engine has exactly one recoverable construction error: attempting to
//! originate a transition from the `Final` sentinel. Everything else a caller
//! can do to the builder is infallible by construction (handles returned by
//! `add_state` are always valid for the lifetime of the graph that produced
//! them).

use std::fmt;

/// The kind of transition list a `Final`-originating edge was attempted on.
///
/// Carried by [`NfaError`] purely for diagnostics; it does not change how the
/// error is handled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    /// An ordinary (symbol-consuming or empty) transition.
    Ordinary,
    /// An on-nested-exit transition.
    OnNestedExit,
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionKind::Ordinary => write!(f, "ordinary transition"),
            TransitionKind::OnNestedExit => write!(f, "on-nested-exit transition"),
        }
    }
}

/// Errors produced while growing an [`Nfa`](crate::graph::Nfa).
#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum NfaError {
    /// A transition was about to be added with `Final` as its origin. `Final`
    /// is a sentinel, not a stored state, and can never have outbound edges.
    #[error("cannot add {kind} from the Final state")]
    TransitionFromFinal {
        /// Which list the caller tried to prepend to.
        kind: TransitionKind,
    },
}

/// Alias for `std::result::Result<T, NfaError>`.
pub type Result<T> = std::result::Result<T, NfaError>;
