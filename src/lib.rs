//! Library for the classical pipeline between regular expressions and finite
//! automata.
//!
//! Four constructions make up the core, each a pure function from one
//! automaton value (or a pattern string) to a fresh one:
//! - [`thompson::build`] turns a regular expression over `+` (union), `.`/
//!   adjacency (concatenation), `*` (Kleene star) and parentheses into an
//!   ε-NFA by the Thompson construction.
//! - [`determinize::determinize`] resolves ε-closures and runs the subset
//!   construction, producing an equivalent [`Dfa`] whose states are canonical
//!   composites of NFA states.
//! - [`minimize::minimize`] collapses equivalent DFA states by Myhill–Nerode
//!   table filling, signalling [`minimize::Minimization::AlreadyMinimal`] when
//!   there is nothing to do.
//! - [`extract::extract_regex`] goes back from a [`Dfa`] to a regular
//!   expression by state elimination.
//!
//! Around the core sit thin adapters: the [`desc`] module reads and writes the
//! plain-text description format, [`display`] renders transition tables, and
//! the `relang` binary chains the stages. Automata are small, pedagogical
//! instances; everything favors clarity over asymptotic cleverness.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including
/// everything, i.e. `use relang::prelude::*;` should be enough to work with
/// the whole pipeline.
pub mod prelude {
    pub use super::{
        alphabet::{Alphabet, Symbol, EPSILON},
        automaton::{Dfa, DfaBuilder, Nfa, NfaBuilder, StateName, DEAD},
        desc::{
            dfa_from_path, dfa_from_str, dfa_to_string, nfa_from_path, nfa_from_str,
            nfa_to_string, MalformedDescription,
        },
        determinize::determinize,
        display::{dfa_table, epsilon_closure_listing, nfa_table},
        extract::extract_regex,
        math,
        minimize::{minimize, rename_states, Minimization},
        thompson::{self, MalformedPattern},
    };
}

/// Mathematical helper types used throughout the crate.
pub mod math;

/// Alphabets and the reserved ε symbol.
pub mod alphabet;

/// The NFA and DFA value types with their builders.
pub mod automaton;

/// Thompson construction of ε-NFAs from regular expressions.
pub mod thompson;

/// Subset-construction determinization.
pub mod determinize;

/// Myhill–Nerode minimization and state renaming.
pub mod minimize;

/// State-elimination regex extraction.
pub mod extract;

/// Tabular rendering of automata.
pub mod display;

/// The plain-text description format.
pub mod desc;

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use itertools::Itertools;

    fn words(alphabet: &[&str], max_len: usize) -> Vec<Vec<String>> {
        let mut all: Vec<Vec<String>> = vec![Vec::new()];
        let mut frontier = all.clone();
        for _ in 0..max_len {
            frontier = frontier
                .iter()
                .cartesian_product(alphabet)
                .map(|(word, symbol)| {
                    let mut next = word.clone();
                    next.push(symbol.to_string());
                    next
                })
                .collect();
            all.extend(frontier.iter().cloned());
        }
        all
    }

    fn sample_dfa() -> Dfa {
        // an even number of 1s, with a redundant pair of states that
        // minimization folds away
        Dfa::builder()
            .name("even-ones")
            .with_transition("a", "0", "a")
            .with_transition("a", "1", "b")
            .with_transition("b", "0", "c")
            .with_transition("b", "1", "a")
            .with_transition("c", "0", "b")
            .with_transition("c", "1", "d")
            .with_transition("d", "0", "d")
            .with_transition("d", "1", "c")
            .with_start("a")
            .with_accept_states(["a", "d"])
            .build()
    }

    #[test_log::test]
    fn the_full_pipeline_round_trips() {
        let minimal = minimize(&sample_dfa()).unwrap_or(sample_dfa());
        let regex = extract_regex(&minimal);
        let rebuilt = thompson::build(&regex, "roundtrip").unwrap();
        let redet = determinize(&rebuilt);
        let reminimal = minimize(&redet).unwrap_or(redet);

        for word in words(&["0", "1"], 6) {
            assert_eq!(
                minimal.accepts(&word),
                reminimal.accepts(&word),
                "disagreement on {word:?} (regex `{regex}`)"
            );
        }
    }

    #[test]
    fn scenario_pattern_through_determinize_and_minimize() {
        let nfa = thompson::build("00(0+1)*", "A").unwrap();
        let dfa = minimize(&determinize(&nfa)).unwrap_or(determinize(&nfa));
        assert!(dfa.accepts_chars("00"));
        assert!(dfa.accepts_chars("0011"));
        assert!(!dfa.accepts_chars("0"));
        assert!(!dfa.accepts_chars(""));
    }

    #[test]
    fn descriptions_survive_the_pipeline() {
        let input = "2\n{0, 1}\nq0 = {0:q1, 1:q0}\nq1 = {0:q1, 1:q1}\nq0\n{q1}\n";
        let dfa = dfa_from_str(input, "B").unwrap();
        let regex = extract_regex(&dfa);
        assert_eq!(regex, "1*0(0+1)*");

        let back = determinize(&thompson::build(&regex, "B").unwrap());
        assert!(back.accepts_chars("1110"));
        assert!(!back.accepts_chars("111"));
        assert_eq!(dfa_from_str(&dfa_to_string(&dfa), "B").unwrap(), dfa);
    }
}
