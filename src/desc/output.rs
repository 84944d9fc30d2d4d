use itertools::Itertools;

use crate::automaton::{Dfa, Nfa};

/// Serializes `nfa` into the description format, such that
/// [`super::nfa_from_str`] parses it back into an equal automaton.
pub fn nfa_to_string(nfa: &Nfa) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", nfa.size()));
    out.push_str(&format!("{{{}}}\n", nfa.alphabet().iter().join(", ")));
    for (state, row) in nfa.states() {
        let entries = row
            .iter()
            .filter(|(_, dests)| !dests.is_empty())
            .map(|(symbol, dests)| format!("{symbol}:[{}]", dests.iter().join(", ")))
            .join(", ");
        out.push_str(&format!("{state} = {{{entries}}}\n"));
    }
    out.push_str(&format!("{}\n", nfa.start_state()));
    out.push_str(&format!("{{{}}}\n", nfa.accept_states().iter().join(", ")));
    out
}

/// Serializes `dfa` into the description format, such that
/// [`super::dfa_from_str`] parses it back into an equal automaton.
pub fn dfa_to_string(dfa: &Dfa) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", dfa.size()));
    out.push_str(&format!("{{{}}}\n", dfa.alphabet().iter().join(", ")));
    for (state, row) in dfa.states() {
        let entries = row
            .iter()
            .map(|(symbol, dest)| format!("{symbol}:{dest}"))
            .join(", ");
        out.push_str(&format!("{state} = {{{entries}}}\n"));
    }
    out.push_str(&format!("{}\n", dfa.start_state()));
    out.push_str(&format!("{{{}}}\n", dfa.accept_states().iter().join(", ")));
    out
}

#[cfg(test)]
mod tests {
    use super::super::{dfa_from_str, nfa_from_str};
    use super::*;
    use crate::alphabet::EPSILON;

    #[test]
    fn nfa_round_trips() {
        let nfa = Nfa::builder()
            .name("rt")
            .with_alphabet(["0", "1", EPSILON])
            .with_transition("q0", "0", ["q0", "q1"])
            .with_transition("q0", EPSILON, ["q2"])
            .with_transition("q1", "1", ["q2"])
            .with_start("q0")
            .with_accept_states(["q2"])
            .build();
        let serialized = nfa_to_string(&nfa);
        let reparsed = nfa_from_str(&serialized, "rt").unwrap();
        assert_eq!(nfa, reparsed);
    }

    #[test]
    fn dfa_round_trips_through_a_transform() {
        let dfa = dfa_from_str(
            "3\n{0, 1}\nq0 = {0:q1, 1:q0}\nq1 = {0:q2, 1:q0}\nq2 = {0:q2, 1:q2}\nq0\n{q2}\n",
            "rt",
        )
        .unwrap();
        let minimized = crate::minimize::minimize(&dfa)
            .unwrap_or(dfa.clone());
        let reparsed = dfa_from_str(&dfa_to_string(&minimized), "rt").unwrap();
        assert_eq!(minimized, reparsed);
    }

    #[test]
    fn states_without_transitions_serialize_as_empty_braces() {
        let dfa = Dfa::builder()
            .with_alphabet(["0"])
            .with_transition("q0", "0", "q1")
            .with_start("q0")
            .with_accept_states(["q1"])
            .build();
        assert!(dfa_to_string(&dfa).contains("q1 = {}"));
    }
}
