//! Determinization of NFAs by the subset construction.

use std::collections::VecDeque;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::alphabet::EPSILON;
use crate::automaton::dfa::DfaTable;
use crate::automaton::{composite_name, Dfa, Nfa, StateName};
use crate::math::{OrderedMap, OrderedSet, Set};

/// Determinizes `nfa` into an equivalent DFA.
///
/// Each DFA state is the set of NFA states reachable simultaneously, named
/// canonically by joining the member names in sorted order, so the same set
/// discovered through different worklist orders always collapses into one
/// state. Transitions resolve ε-closures; the ε symbol is dropped from the
/// resulting alphabet. Entries are emitted only for symbols with at least one
/// destination, so the result may be partial (missing entries lead into the
/// implicit dead state).
pub fn determinize(nfa: &Nfa) -> Dfa {
    let closures = nfa.epsilon_closures();
    for (state, closure) in &closures {
        trace!("ε-closure of {state}: {{{}}}", closure.iter().join(", "));
    }

    let start_set = closures[nfa.start_state()].clone();
    let mut seen: Set<OrderedSet<StateName>> = Set::default();
    seen.insert(start_set.clone());
    let mut queue = VecDeque::from([start_set.clone()]);

    let mut table = DfaTable::new();
    let mut accept_states = OrderedSet::new();

    while let Some(subset) = queue.pop_front() {
        let name = composite_name(&subset);
        trace!("processing composite state {name}");

        let mut dest_sets: OrderedMap<&str, OrderedSet<StateName>> = OrderedMap::new();
        for member in &subset {
            for (symbol, dests) in &nfa.states()[member] {
                if symbol == EPSILON {
                    continue;
                }
                let entry = dest_sets.entry(symbol).or_default();
                for dest in dests {
                    entry.extend(closures[dest].iter().cloned());
                }
            }
        }

        let mut row = OrderedMap::new();
        for (symbol, dest_set) in dest_sets {
            if dest_set.is_empty() {
                continue;
            }
            row.insert(symbol.to_string(), composite_name(&dest_set));
            if seen.insert(dest_set.clone()) {
                queue.push_back(dest_set);
            }
        }

        if subset.iter().any(|q| nfa.accept_states().contains(q)) {
            accept_states.insert(name.clone());
        }
        table.insert(name, row);
    }

    debug!(
        "determinized `{}` from {} NFA states into {} DFA states",
        nfa.name(),
        nfa.size(),
        table.len()
    );

    let start = composite_name(&closures[nfa.start_state()]);
    Dfa::from_parts(
        nfa.name().to_string(),
        nfa.alphabet().without_epsilon(),
        table,
        start,
        accept_states,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::DEAD;
    use crate::thompson;

    /// Every word over `alphabet` of length at most `max_len`.
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

    #[test_log::test]
    fn agrees_with_the_nfa_on_all_short_words() {
        let nfa = thompson::build("(0+101)*1*", "").unwrap();
        let dfa = determinize(&nfa);
        for word in words(&["0", "1"], 5) {
            assert_eq!(
                nfa.accepts(&word),
                dfa.accepts(&word),
                "disagreement on {word:?}"
            );
        }
    }

    #[test]
    fn composite_states_are_canonical() {
        // both `a` and `b` lead into {s, t}, discovered through different
        // symbols and in different member order
        let nfa = Nfa::builder()
            .with_transition("q", "a", ["s", "t"])
            .with_transition("q", "b", ["t"])
            .with_transition("t", EPSILON, ["s"])
            .with_start("q")
            .with_accept_states(["s"])
            .build();
        let dfa = determinize(&nfa);
        assert_eq!(dfa.size(), 2);
        assert_eq!(dfa.successor("q", "a"), dfa.successor("q", "b"));
    }

    #[test]
    fn accepting_iff_intersecting() {
        let nfa = thompson::build("00", "").unwrap();
        let dfa = determinize(&nfa);
        assert_eq!(dfa.accept_states().len(), 1);
        assert!(dfa.accepts_chars("00"));
        assert!(!dfa.accepts_chars("000"));
    }

    #[test]
    fn epsilon_is_dropped_from_the_alphabet() {
        let nfa = thompson::build("0*", "").unwrap();
        let dfa = determinize(&nfa);
        assert!(!dfa.alphabet().has_epsilon());
        assert_eq!(dfa.alphabet().iter().collect::<Vec<_>>(), ["0"]);
        assert!(!dfa.states().contains_key(DEAD));
    }

    #[test]
    fn name_is_carried_over() {
        let nfa = thompson::build("1", "lab").unwrap();
        assert_eq!(determinize(&nfa).name(), "lab");
    }
}
