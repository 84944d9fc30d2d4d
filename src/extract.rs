//! Reconstruction of a regular expression from a DFA by state elimination.
//!
//! One elimination pass runs per accept state: every state that is neither the
//! start state nor the current target is removed, folding its incoming and
//! outgoing labels (and its starred self-loop) into new labels between the
//! remaining states. What is left is either the start state alone or the pair
//! of start and target, from which the expression is read off in closed form.
//! The per-target expressions are unioned and a final pass strips parentheses
//! that are provably redundant.

use itertools::Itertools;
use tracing::{debug, trace};

use crate::automaton::{Dfa, StateName};
use crate::math::{OrderedMap, OrderedSet};

/// Extracts a regular expression accepting exactly the language of `dfa`, over
/// the operator set of [`crate::thompson::build`].
///
/// # Panics
///
/// If `dfa` has no accept state.
pub fn extract_regex(dfa: &Dfa) -> String {
    assert!(
        !dfa.accept_states().is_empty(),
        "cannot extract a regex from a DFA without accept states"
    );

    let graph = Graph::of(dfa);
    let chains: Vec<String> = dfa
        .accept_states()
        .iter()
        .filter_map(|target| graph.clone().chain_to(dfa, target))
        .collect();
    debug!(
        "extracted {} chain(s) for `{}`: {}",
        chains.len(),
        dfa.name(),
        chains.iter().join(" + ")
    );

    let joined = match chains.len() {
        0 => return String::new(),
        1 => chains.into_iter().next().unwrap(),
        _ => format!("({})", chains.iter().join(")+(")),
    };
    strip_redundant_parens(&joined)
}

/// The elimination graph: forward edges labeled with union alternatives, and a
/// reverse parent index kept in sync with them. Two separate structures, so no
/// sentinel key can ever collide with a real alphabet symbol.
#[derive(Debug, Clone, Default)]
struct Graph {
    /// src → dst → labels; parallel labels are union alternatives.
    edges: OrderedMap<StateName, OrderedMap<StateName, Vec<String>>>,
    /// dst → set of states with an edge into it.
    parents: OrderedMap<StateName, OrderedSet<StateName>>,
}

impl Graph {
    fn of(dfa: &Dfa) -> Self {
        let mut graph = Graph::default();
        for (state, row) in dfa.states() {
            graph.edges.entry(state.clone()).or_default();
            for (symbol, dest) in row {
                graph
                    .edges
                    .entry(state.clone())
                    .or_default()
                    .entry(dest.clone())
                    .or_default()
                    .push(symbol.clone());
                graph
                    .parents
                    .entry(dest.clone())
                    .or_default()
                    .insert(state.clone());
            }
        }
        graph
    }

    fn label(&self, src: &str, dst: &str) -> Option<&Vec<String>> {
        self.edges.get(src)?.get(dst)
    }

    /// Removes `state`, rerouting every `parent → state → dest` path as a new
    /// labeled edge `parent → dest`.
    fn eliminate(&mut self, state: &str) {
        let self_loop = self
            .label(state, state)
            .map(|alts| format_label(alts, "*"))
            .unwrap_or_default();
        let parents: Vec<StateName> = self
            .parents
            .get(state)
            .map(|set| set.iter().filter(|p| *p != state).cloned().collect())
            .unwrap_or_default();
        let dests: Vec<(StateName, Vec<String>)> = self.edges[state]
            .iter()
            .filter(|(d, _)| d.as_str() != state)
            .map(|(d, alts)| (d.clone(), alts.clone()))
            .collect();
        trace!(
            "eliminating {state} ({} parent(s), {} destination(s))",
            parents.len(),
            dests.len()
        );

        for parent in &parents {
            let incoming = format_label(&self.edges[parent][state], "");
            for (dest, alts) in &dests {
                let outgoing = format_label(alts, "");
                let synthesized = format!("{incoming}{self_loop}{outgoing}");
                self.edges
                    .get_mut(parent)
                    .unwrap()
                    .entry(dest.clone())
                    .or_default()
                    .push(synthesized);
                self.parents
                    .entry(dest.clone())
                    .or_default()
                    .insert(parent.clone());
            }
            self.edges.get_mut(parent).unwrap().remove(state);
        }

        self.edges.remove(state);
        self.parents.remove(state);
        for (dest, _) in &dests {
            if let Some(set) = self.parents.get_mut(dest) {
                set.remove(state);
            }
        }
    }

    /// Consumes the graph, eliminating everything except the start state and
    /// `target`, and reads off the closed-form expression. `None` when the
    /// target is unreachable from the start state, in which case it
    /// contributes nothing to the union.
    fn chain_to(mut self, dfa: &Dfa, target: &str) -> Option<String> {
        let start = dfa.start_state();
        let others: Vec<StateName> = self
            .edges
            .keys()
            .filter(|q| q.as_str() != start && q.as_str() != target)
            .cloned()
            .collect();
        for state in others {
            self.eliminate(&state);
        }

        if start == target {
            let alts = self.label(start, start).cloned().unwrap_or_default();
            return Some(format!("({})*", alts.iter().join("+")));
        }

        // with two states left the language is (R + S U* T)* S U*, where R and
        // U are the self-loops of start and target, S leads start → target and
        // T back; absent parts simply drop out
        let s_label = format_label(self.label(start, target)?, "");
        let u_star = self
            .label(target, target)
            .map(|alts| format_label(alts, "*"))
            .unwrap_or_default();
        let mut loop_alts: Vec<String> = self
            .label(start, start)
            .cloned()
            .unwrap_or_default();
        if let Some(back) = self.label(target, start) {
            loop_alts.push(format!("{s_label}{u_star}{}", format_label(back, "")));
        }
        let prefix = if loop_alts.is_empty() {
            String::new()
        } else {
            format_label(&loop_alts, "*")
        };
        Some(format!("{prefix}{s_label}{u_star}"))
    }
}

/// Formats a union of alternatives, parenthesizing when it is a real union or
/// when a single multi-character label is about to receive a postfix such as
/// `*`. A bare single symbol is never parenthesized.
fn format_label(alts: &[String], postfix: &str) -> String {
    match alts {
        [] => String::new(),
        [single] if single.chars().count() <= 1 => format!("{single}{postfix}"),
        [single] => format!("({single}){postfix}"),
        _ => format!("({}){postfix}", alts.iter().join("+")),
    }
}

/// Removes parentheses that are not needed: a group keeps its parentheses only
/// when a `*` follows it, or when it contains a top-level union and sits
/// adjacent to concatenation context that would otherwise merge incorrectly.
fn strip_redundant_parens(input: &str) -> String {
    let mut chars: Vec<char> = input.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] != '(' {
            i += 1;
            continue;
        }
        let mut depth = 1;
        let mut has_union = false;
        let mut j = i;
        while depth > 0 {
            j += 1;
            if j >= chars.len() {
                return chars.into_iter().collect();
            }
            match chars[j] {
                '(' => depth += 1,
                ')' => depth -= 1,
                '+' if depth == 1 => has_union = true,
                _ => {}
            }
        }
        let starred = chars.get(j + 1) == Some(&'*');
        let glued_left = has_union && i > 0 && !matches!(chars[i - 1], '(' | '+');
        let glued_right =
            has_union && j + 1 < chars.len() && !matches!(chars[j + 1], ')' | '+');
        if starred || glued_left || glued_right {
            i += 1;
        } else {
            chars.remove(j);
            chars.remove(i);
        }
    }
    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::determinize::determinize;
    use crate::thompson;

    #[test]
    fn single_state_loop() {
        let dfa = Dfa::builder()
            .with_transition("q0", "0", "q0")
            .with_transition("q0", "1", "q0")
            .with_start("q0")
            .with_accept_states(["q0"])
            .build();
        assert_eq!(extract_regex(&dfa), "(0+1)*");
    }

    #[test]
    fn single_state_without_loop() {
        let dfa = Dfa::builder()
            .with_alphabet(["0"])
            .with_state("q0")
            .with_start("q0")
            .with_accept_states(["q0"])
            .build();
        // the language is {ε}; `()*` is the operator set's spelling of it
        assert_eq!(extract_regex(&dfa), "()*");
    }

    #[test_log::test]
    fn two_state_closed_form() {
        let dfa = Dfa::builder()
            .with_transition("q0", "1", "q0")
            .with_transition("q0", "0", "q1")
            .with_transition("q1", "0", "q1")
            .with_transition("q1", "1", "q1")
            .with_start("q0")
            .with_accept_states(["q1"])
            .build();
        let regex = extract_regex(&dfa);
        assert_eq!(regex, "1*0(0+1)*");

        let roundtrip = determinize(&thompson::build(&regex, "").unwrap());
        assert!(roundtrip.accepts_chars("1110"));
        assert!(roundtrip.accepts_chars("0"));
        assert!(!roundtrip.accepts_chars("111"));
        assert!(!roundtrip.accepts_chars(""));
    }

    #[test]
    fn elimination_folds_middle_states() {
        // accepts exactly 01
        let dfa = Dfa::builder()
            .with_transition("q0", "0", "q1")
            .with_transition("q1", "1", "q2")
            .with_start("q0")
            .with_accept_states(["q2"])
            .build();
        let regex = extract_regex(&dfa);
        let roundtrip = determinize(&thompson::build(&regex, "").unwrap());
        for (word, expected) in [("01", true), ("0", false), ("011", false), ("", false)] {
            assert_eq!(roundtrip.accepts_chars(word), expected, "on {word:?}");
        }
    }

    #[test]
    fn multiple_accept_states_union() {
        // accepts 0 and 11
        let dfa = Dfa::builder()
            .with_transition("q0", "0", "a")
            .with_transition("q0", "1", "b")
            .with_transition("b", "1", "c")
            .with_start("q0")
            .with_accept_states(["a", "c"])
            .build();
        let regex = extract_regex(&dfa);
        let roundtrip = determinize(&thompson::build(&regex, "").unwrap());
        for (word, expected) in [("0", true), ("11", true), ("1", false), ("01", false)] {
            assert_eq!(roundtrip.accepts_chars(word), expected, "on {word:?}");
        }
    }

    #[test]
    fn unreachable_accept_state_contributes_nothing() {
        let dfa = Dfa::builder()
            .with_transition("q0", "0", "a")
            .with_transition("lost", "1", "lost")
            .with_start("q0")
            .with_accept_states(["a", "lost"])
            .build();
        let regex = extract_regex(&dfa);
        let roundtrip = determinize(&thompson::build(&regex, "").unwrap());
        assert!(roundtrip.accepts_chars("0"));
        assert!(!roundtrip.accepts_chars("1"));
    }

    #[test]
    fn strips_parentheses_not_followed_by_star() {
        assert_eq!(strip_redundant_parens("(ab)"), "ab");
        assert_eq!(strip_redundant_parens("(ab)*"), "(ab)*");
        assert_eq!(strip_redundant_parens("((a))"), "a");
    }

    #[test]
    fn keeps_union_parentheses_in_concatenation_context() {
        assert_eq!(strip_redundant_parens("0(1+2)"), "0(1+2)");
        assert_eq!(strip_redundant_parens("(1+2)0"), "(1+2)0");
        assert_eq!(strip_redundant_parens("(1+2)+(3)"), "1+2+3");
        assert_eq!(strip_redundant_parens("(0+1)*"), "(0+1)*");
    }

    #[test]
    #[should_panic(expected = "accept")]
    fn requires_an_accept_state() {
        let dfa = Dfa::builder()
            .with_transition("q0", "0", "q0")
            .with_start("q0")
            .build();
        extract_regex(&dfa);
    }
}
