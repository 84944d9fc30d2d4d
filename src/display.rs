//! Human-readable, tabular rendering of automata. Read-only: everything here
//! works off the public accessors.

use itertools::Itertools;

use crate::automaton::{Dfa, Nfa, DEAD};

fn decorate(state: &str, is_accept: bool, is_start: bool) -> String {
    let mut prefix = String::new();
    if is_accept {
        prefix.push('*');
    }
    if is_start {
        prefix.push_str("->");
    }
    format!("{prefix}{state}")
}

/// Renders the transition table of `dfa`. Missing entries show the dead state
/// `∅`, and if any exist the implicit dead state gets a row of its own.
pub fn dfa_table(dfa: &Dfa) -> String {
    let mut builder = tabled::builder::Builder::default();
    builder.push_record(
        std::iter::once("".to_string()).chain(dfa.alphabet().iter().cloned()),
    );

    let mut has_dead = false;
    for (state, row) in dfa.states() {
        let mut record = vec![decorate(
            state,
            dfa.accept_states().contains(state),
            state == dfa.start_state(),
        )];
        for symbol in dfa.alphabet().iter() {
            match row.get(symbol) {
                Some(dest) => record.push(dest.clone()),
                None => {
                    has_dead = true;
                    record.push(DEAD.to_string());
                }
            }
        }
        builder.push_record(record);
    }
    if has_dead && !dfa.states().contains_key(DEAD) {
        builder.push_record(
            std::iter::once(DEAD.to_string())
                .chain(dfa.alphabet().iter().map(|_| DEAD.to_string())),
        );
    }

    builder
        .build()
        .with(tabled::settings::Style::rounded())
        .to_string()
}

/// Renders the transition table of `nfa`, one column per alphabet symbol
/// (including ε when present); cells are destination sets.
pub fn nfa_table(nfa: &Nfa) -> String {
    let mut builder = tabled::builder::Builder::default();
    builder.push_record(
        std::iter::once("".to_string()).chain(nfa.alphabet().iter().cloned()),
    );

    for (state, row) in nfa.states() {
        let mut record = vec![decorate(
            state,
            nfa.accept_states().contains(state),
            state == nfa.start_state(),
        )];
        for symbol in nfa.alphabet().iter() {
            match row.get(symbol) {
                Some(dests) if !dests.is_empty() => {
                    record.push(format!("{{{}}}", dests.iter().join(", ")))
                }
                _ => record.push("-".to_string()),
            }
        }
        builder.push_record(record);
    }

    builder
        .build()
        .with(tabled::settings::Style::rounded())
        .to_string()
}

/// Lists the ε-closure of every state of `nfa`, one line per state.
pub fn epsilon_closure_listing(nfa: &Nfa) -> String {
    nfa.epsilon_closures()
        .iter()
        .map(|(state, closure)| format!("{state}: {{{}}}", closure.iter().join(", ")))
        .join("\n")
}

impl std::fmt::Display for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.name().is_empty() {
            writeln!(f, "DFA: {}", self.name())?;
        }
        writeln!(f, "Alphabet: {}", self.alphabet())?;
        writeln!(f, "{}", dfa_table(self))?;
        writeln!(f, "Accept states: {}", self.accept_states().iter().join(", "))?;
        write!(f, "Start state: {}", self.start_state())
    }
}

impl std::fmt::Display for Nfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.name().is_empty() {
            writeln!(f, "NFA: {}", self.name())?;
        }
        writeln!(f, "Alphabet: {}", self.alphabet())?;
        writeln!(f, "{}", nfa_table(self))?;
        writeln!(f, "Accept states: {}", self.accept_states().iter().join(", "))?;
        write!(f, "Start state: {}", self.start_state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::EPSILON;

    #[test]
    fn dfa_table_marks_start_accept_and_dead() {
        let dfa = Dfa::builder()
            .with_alphabet(["0", "1"])
            .with_transition("q0", "0", "q1")
            .with_transition("q1", "1", "q1")
            .with_start("q0")
            .with_accept_states(["q1"])
            .build();
        let table = dfa_table(&dfa);
        assert!(table.contains("->q0"));
        assert!(table.contains("*q1"));
        assert!(table.contains(DEAD));
    }

    #[test]
    fn nfa_table_shows_destination_sets() {
        let nfa = Nfa::builder()
            .with_transition("q0", "0", ["q0", "q1"])
            .with_transition("q0", EPSILON, ["q1"])
            .with_start("q0")
            .with_accept_states(["q1"])
            .build();
        let table = nfa_table(&nfa);
        assert!(table.contains("{q0, q1}"));
        assert!(table.contains(EPSILON));
    }

    #[test]
    fn closure_listing_contains_every_state() {
        let nfa = Nfa::builder()
            .with_transition("a", EPSILON, ["b"])
            .with_start("a")
            .build();
        let listing = epsilon_closure_listing(&nfa);
        assert_eq!(listing, "a: {a, b}\nb: {b}");
    }
}
