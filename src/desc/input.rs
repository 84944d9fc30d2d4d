use std::path::Path;

use crate::alphabet::{Symbol, EPSILON};
use crate::automaton::{Dfa, Nfa, StateName};
use crate::math::OrderedSet;

use super::MalformedDescription;

/// Parses an NFA description. The `name` is attached to the automaton.
pub fn nfa_from_str(input: &str, name: &str) -> Result<Nfa, MalformedDescription> {
    let mut lines = Lines::new(input);
    let count = lines.count_line()?;
    let alphabet = lines.alphabet_line()?;

    let mut builder = Nfa::builder().name(name).with_alphabet(alphabet.clone());
    let mut known = OrderedSet::new();
    let mut declared = OrderedSet::new();
    for _ in 0..count {
        let line = lines.next("transition line")?;
        let (state, body) = split_transition_line(line)?;
        if !declared.insert(state.to_string()) {
            return Err(MalformedDescription::DuplicateState(state.to_string()));
        }
        known.insert(state.to_string());
        builder = builder.with_state(state);
        for entry in split_entries(body) {
            let (symbol, dests) = entry
                .split_once(':')
                .ok_or_else(|| MalformedDescription::MalformedTransitionLine(line.to_string()))?;
            let symbol = symbol.trim();
            check_symbol(&alphabet, state, symbol)?;
            let dests = dests.trim();
            let dests = dests
                .strip_prefix('[')
                .and_then(|d| d.strip_suffix(']'))
                .ok_or_else(|| MalformedDescription::MalformedTransitionLine(line.to_string()))?;
            let dests: Vec<&str> = dests
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .collect();
            known.extend(dests.iter().map(|d| d.to_string()));
            builder = builder.with_transition(state, symbol, dests);
        }
    }

    let (start, accepts) = lines.trailer(&known)?;
    Ok(builder
        .with_start(start)
        .with_accept_states(accepts)
        .build())
}

/// Parses a DFA description. The `name` is attached to the automaton.
pub fn dfa_from_str(input: &str, name: &str) -> Result<Dfa, MalformedDescription> {
    let mut lines = Lines::new(input);
    let count = lines.count_line()?;
    let alphabet = lines.alphabet_line()?;
    if alphabet.iter().any(|s| s == EPSILON) {
        return Err(MalformedDescription::EpsilonInDfa);
    }

    let mut builder = Dfa::builder().name(name).with_alphabet(alphabet.clone());
    let mut known = OrderedSet::new();
    let mut declared = OrderedSet::new();
    for _ in 0..count {
        let line = lines.next("transition line")?;
        let (state, body) = split_transition_line(line)?;
        if !declared.insert(state.to_string()) {
            return Err(MalformedDescription::DuplicateState(state.to_string()));
        }
        known.insert(state.to_string());
        builder = builder.with_state(state);
        let mut seen_symbols = OrderedSet::new();
        for entry in split_entries(body) {
            let (symbol, dest) = entry
                .split_once(':')
                .ok_or_else(|| MalformedDescription::MalformedTransitionLine(line.to_string()))?;
            let (symbol, dest) = (symbol.trim(), dest.trim());
            if symbol == EPSILON {
                return Err(MalformedDescription::EpsilonInDfa);
            }
            check_symbol(&alphabet, state, symbol)?;
            if !seen_symbols.insert(symbol.to_string()) {
                return Err(MalformedDescription::DuplicateTransition {
                    state: state.to_string(),
                    symbol: symbol.to_string(),
                });
            }
            if dest.is_empty() {
                return Err(MalformedDescription::MalformedTransitionLine(line.to_string()));
            }
            known.insert(dest.to_string());
            builder = builder.with_transition(state, symbol, dest);
        }
    }

    let (start, accepts) = lines.trailer(&known)?;
    Ok(builder
        .with_start(start)
        .with_accept_states(accepts)
        .build())
}

/// Reads and parses an NFA description file.
pub fn nfa_from_path(path: impl AsRef<Path>, name: &str) -> Result<Nfa, MalformedDescription> {
    nfa_from_str(&read(path.as_ref())?, name)
}

/// Reads and parses a DFA description file.
pub fn dfa_from_path(path: impl AsRef<Path>, name: &str) -> Result<Dfa, MalformedDescription> {
    dfa_from_str(&read(path.as_ref())?, name)
}

fn read(path: &Path) -> Result<String, MalformedDescription> {
    std::fs::read_to_string(path).map_err(|e| MalformedDescription::Unreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Cursor over the trimmed, non-empty-aware lines of a description.
struct Lines<'a> {
    lines: std::str::Lines<'a>,
}

impl<'a> Lines<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines(),
        }
    }

    fn next(&mut self, part: &'static str) -> Result<&'a str, MalformedDescription> {
        match self.lines.next().map(str::trim) {
            Some(line) if !line.is_empty() => Ok(line),
            _ => Err(MalformedDescription::MissingLine(part)),
        }
    }

    fn count_line(&mut self) -> Result<usize, MalformedDescription> {
        let line = self.next("state count")?;
        line.parse()
            .map_err(|_| MalformedDescription::InvalidStateCount(line.to_string()))
    }

    fn alphabet_line(&mut self) -> Result<Vec<Symbol>, MalformedDescription> {
        let line = self.next("alphabet")?;
        let body = braced(line)
            .ok_or_else(|| MalformedDescription::MalformedAlphabet(line.to_string()))?;
        Ok(body
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect())
    }

    /// Parses the start-state and accept-states lines, checking both against
    /// the set of states the description mentioned.
    fn trailer(
        &mut self,
        known: &OrderedSet<StateName>,
    ) -> Result<(StateName, Vec<StateName>), MalformedDescription> {
        let start = self.next("start state")?;
        if !known.contains(start) {
            return Err(MalformedDescription::UnknownStartState(start.to_string()));
        }
        let line = self.next("accept states")?;
        let body = braced(line)
            .ok_or_else(|| MalformedDescription::MalformedAcceptList(line.to_string()))?;
        let accepts: Vec<StateName> = body
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
        for accept in &accepts {
            if !known.contains(accept) {
                return Err(MalformedDescription::UnknownAcceptState(accept.clone()));
            }
        }
        Ok((start.to_string(), accepts))
    }
}

fn braced(line: &str) -> Option<&str> {
    line.strip_prefix('{')?.strip_suffix('}')
}

fn split_transition_line(line: &str) -> Result<(&str, &str), MalformedDescription> {
    let (state, rhs) = line
        .split_once('=')
        .ok_or_else(|| MalformedDescription::MalformedTransitionLine(line.to_string()))?;
    let state = state.trim();
    let body = braced(rhs.trim())
        .ok_or_else(|| MalformedDescription::MalformedTransitionLine(line.to_string()))?;
    if state.is_empty() {
        return Err(MalformedDescription::MalformedTransitionLine(line.to_string()));
    }
    Ok((state, body))
}

/// Splits the body of a transition line on commas, ignoring commas inside the
/// bracketed destination lists of NFA entries.
fn split_entries(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(body[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(body[start..].trim());
    parts.into_iter().filter(|p| !p.is_empty()).collect()
}

fn check_symbol(
    alphabet: &[Symbol],
    state: &str,
    symbol: &str,
) -> Result<(), MalformedDescription> {
    if alphabet.iter().any(|s| s == symbol) {
        Ok(())
    } else {
        Err(MalformedDescription::UnknownSymbol {
            state: state.to_string(),
            symbol: symbol.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NFA_DESC: &str = "3\n{0, 1, ε}\nq0 = {0:[q0, q1], ε:[q2]}\nq1 = {1:[q2]}\nq2 = {}\nq0\n{q2}\n";

    #[test]
    fn parses_an_nfa_description() {
        let nfa = nfa_from_str(NFA_DESC, "t").unwrap();
        assert_eq!(nfa.size(), 3);
        assert_eq!(nfa.start_state(), "q0");
        assert!(nfa.has_epsilon());
        assert!(nfa.accepts_chars("01"));
        assert!(nfa.accepts_chars(""));
        assert!(!nfa.accepts_chars("1"));
    }

    #[test]
    fn parses_a_dfa_description() {
        let dfa = dfa_from_str("2\n{0, 1}\nq0 = {0:q1, 1:q0}\nq1 = {}\nq0\n{q1}\n", "t").unwrap();
        assert_eq!(dfa.size(), 2);
        assert!(dfa.accepts_chars("10"));
        assert!(!dfa.accepts_chars("01"));
    }

    #[test]
    fn destinations_are_registered_implicitly() {
        let dfa = dfa_from_str("1\n{0}\nq0 = {0:q1}\nq0\n{q1}\n", "t").unwrap();
        assert_eq!(dfa.size(), 2);
        assert!(dfa.accepts_chars("0"));
    }

    #[test]
    fn missing_lines_are_reported() {
        assert_eq!(
            dfa_from_str("2\n{0}\nq0 = {0:q0}\n", "t"),
            Err(MalformedDescription::MissingLine("transition line"))
        );
        assert_eq!(
            dfa_from_str("1\n{0}\nq0 = {0:q0}\nq0\n", "t"),
            Err(MalformedDescription::MissingLine("accept states"))
        );
    }

    #[test]
    fn bad_count_and_alphabet() {
        assert_eq!(
            dfa_from_str("two\n{0}\n", "t"),
            Err(MalformedDescription::InvalidStateCount("two".to_string()))
        );
        assert_eq!(
            dfa_from_str("1\n0, 1\nq0 = {}\nq0\n{}\n", "t"),
            Err(MalformedDescription::MalformedAlphabet("0, 1".to_string()))
        );
    }

    #[test]
    fn rejects_unknown_symbols_and_states() {
        assert_eq!(
            dfa_from_str("1\n{0}\nq0 = {1:q0}\nq0\n{}\n", "t"),
            Err(MalformedDescription::UnknownSymbol {
                state: "q0".to_string(),
                symbol: "1".to_string()
            })
        );
        assert_eq!(
            dfa_from_str("1\n{0}\nq0 = {0:q0}\nq9\n{}\n", "t"),
            Err(MalformedDescription::UnknownStartState("q9".to_string()))
        );
        assert_eq!(
            dfa_from_str("1\n{0}\nq0 = {0:q0}\nq0\n{qx}\n", "t"),
            Err(MalformedDescription::UnknownAcceptState("qx".to_string()))
        );
    }

    #[test]
    fn rejects_epsilon_in_dfa() {
        assert_eq!(
            dfa_from_str("1\n{0, ε}\nq0 = {0:q0}\nq0\n{}\n", "t"),
            Err(MalformedDescription::EpsilonInDfa)
        );
    }

    #[test]
    fn rejects_duplicates() {
        assert_eq!(
            dfa_from_str("2\n{0}\nq0 = {0:q0}\nq0 = {}\nq0\n{}\n", "t"),
            Err(MalformedDescription::DuplicateState("q0".to_string()))
        );
        assert_eq!(
            dfa_from_str("1\n{0}\nq0 = {0:q0, 0:q0}\nq0\n{}\n", "t"),
            Err(MalformedDescription::DuplicateTransition {
                state: "q0".to_string(),
                symbol: "0".to_string()
            })
        );
    }

    #[test]
    fn rejects_garbled_transition_lines() {
        assert!(matches!(
            dfa_from_str("1\n{0}\nq0 : {0:q0}\nq0\n{}\n", "t"),
            Err(MalformedDescription::MalformedTransitionLine(_))
        ));
        assert!(matches!(
            nfa_from_str("1\n{0}\nq0 = {0:q1}\nq0\n{}\n", "t"),
            Err(MalformedDescription::MalformedTransitionLine(_))
        ));
    }
}
