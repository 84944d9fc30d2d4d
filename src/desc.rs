//! The plain-text automaton description format.
//!
//! A description is line-oriented: the state count, the alphabet in braces,
//! one transition line per state (`q0 = {0:[q1,q2], 1:[q0]}` for an NFA,
//! `q0 = {0:q1, 1:q0}` for a DFA, `q0 = {}` for a state without outgoing
//! transitions), the start state, and the accept states in braces. Parsing and
//! serialization round-trip every invariant-bearing field.

use thiserror::Error;

/// Reading descriptions.
pub mod input;
/// Writing descriptions.
pub mod output;

pub use input::{dfa_from_path, dfa_from_str, nfa_from_path, nfa_from_str};
pub use output::{dfa_to_string, nfa_to_string};

/// A structurally invalid automaton description. The core never sees a
/// partially built automaton; parsing fails before anything is constructed.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum MalformedDescription {
    /// The description ended before the named part.
    #[error("description ends early, missing the {0}")]
    MissingLine(&'static str),
    /// The first line is not a state count.
    #[error("`{0}` is not a state count")]
    InvalidStateCount(String),
    /// The alphabet line is not a braced symbol list.
    #[error("`{0}` is not a braced alphabet")]
    MalformedAlphabet(String),
    /// The accept-states line is not a braced state list.
    #[error("`{0}` is not a braced state list")]
    MalformedAcceptList(String),
    /// A transition line that does not follow the `state = {…}` shape.
    #[error("cannot parse transition line `{0}`")]
    MalformedTransitionLine(String),
    /// A transition on a symbol the alphabet line does not declare.
    #[error("state `{state}` moves on `{symbol}` which is not in the alphabet")]
    UnknownSymbol {
        /// The state whose line used the symbol.
        state: String,
        /// The undeclared symbol.
        symbol: String,
    },
    /// ε in a DFA description, either in the alphabet or on a transition.
    #[error("a DFA description cannot use ε")]
    EpsilonInDfa,
    /// The same state was given two transition lines.
    #[error("state `{0}` is described twice")]
    DuplicateState(String),
    /// A DFA state line listing the same symbol twice.
    #[error("state `{state}` has more than one transition on `{symbol}`")]
    DuplicateTransition {
        /// The state whose line repeated the symbol.
        state: String,
        /// The repeated symbol.
        symbol: String,
    },
    /// A start state that is neither described nor referenced.
    #[error("start state `{0}` does not occur in the description")]
    UnknownStartState(String),
    /// An accept state that is neither described nor referenced.
    #[error("accept state `{0}` does not occur in the description")]
    UnknownAcceptState(String),
    /// The description file could not be read at all.
    #[error("cannot read `{path}`: {reason}")]
    Unreadable {
        /// The offending path.
        path: String,
        /// The underlying I/O error, rendered.
        reason: String,
    },
}
