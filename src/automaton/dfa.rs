use crate::alphabet::{Alphabet, Symbol, EPSILON};
use crate::math::{OrderedMap, OrderedSet};

use super::StateName;

/// Name of the implicit dead state of a partial DFA. Transitions that are
/// absent from a transition table lead here; it self-loops on every symbol and
/// never accepts.
pub const DEAD: &str = "∅";

/// The transition table of a [`Dfa`]: per state, per symbol, at most one
/// destination. [`EPSILON`] never occurs here.
pub type DfaTable = OrderedMap<StateName, OrderedMap<Symbol, StateName>>;

/// A deterministic finite automaton.
///
/// The table may be partial: a missing `(state, symbol)` entry denotes a
/// transition into the implicit dead state [`DEAD`]. Like [`super::Nfa`],
/// values are immutable once built and the invariants of the data model (no
/// dangling destinations, start and accept states are members) hold by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    name: String,
    alphabet: Alphabet,
    states: DfaTable,
    start_state: StateName,
    accept_states: OrderedSet<StateName>,
}

impl Dfa {
    /// Creates a builder for incremental construction.
    pub fn builder() -> DfaBuilder {
        DfaBuilder::default()
    }

    pub(crate) fn from_parts(
        name: String,
        alphabet: Alphabet,
        states: DfaTable,
        start_state: StateName,
        accept_states: OrderedSet<StateName>,
    ) -> Self {
        debug_assert!(states.contains_key(&start_state));
        debug_assert!(accept_states.iter().all(|q| states.contains_key(q)));
        debug_assert!(!alphabet.has_epsilon());
        Self {
            name,
            alphabet,
            states,
            start_state,
            accept_states,
        }
    }

    /// The display name of this automaton. May be empty.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The alphabet. Never contains [`EPSILON`].
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The full transition table.
    pub fn states(&self) -> &DfaTable {
        &self.states
    }

    /// The outgoing transitions of `state`, if it exists.
    pub fn transitions(&self, state: &str) -> Option<&OrderedMap<Symbol, StateName>> {
        self.states.get(state)
    }

    /// The designated start state.
    pub fn start_state(&self) -> &str {
        &self.start_state
    }

    /// The set of accepting states.
    pub fn accept_states(&self) -> &OrderedSet<StateName> {
        &self.accept_states
    }

    /// The number of states, not counting the implicit dead state.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// The destination of `state` on `symbol`, or `None` when the transition
    /// leads into the implicit dead state.
    pub fn successor(&self, state: &str, symbol: &str) -> Option<&str> {
        self.states.get(state)?.get(symbol).map(String::as_str)
    }

    /// Like [`Self::successor`], but total: absent transitions resolve to
    /// [`DEAD`], which also absorbs every symbol.
    pub fn successor_or_dead(&self, state: &str, symbol: &str) -> &str {
        if state == DEAD && !self.states.contains_key(DEAD) {
            return DEAD;
        }
        self.successor(state, symbol).unwrap_or(DEAD)
    }

    /// Whether every state has an outgoing transition on every alphabet symbol.
    pub fn is_total(&self) -> bool {
        self.states
            .values()
            .all(|row| self.alphabet.iter().all(|s| row.contains_key(s)))
    }

    /// Runs the automaton on the given word, one symbol per item. Entering the
    /// implicit dead state rejects immediately.
    pub fn accepts<I, S>(&self, word: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut current = self.start_state.as_str();
        for symbol in word {
            match self.successor(current, symbol.as_ref()) {
                Some(next) => current = next,
                None => return false,
            }
        }
        self.accept_states.contains(current)
    }

    /// Convenience for single-character symbols: runs on each `char` of `word`.
    pub fn accepts_chars(&self, word: &str) -> bool {
        self.accepts(word.chars().map(|c| c.to_string()))
    }
}

/// Incrementally assembles a [`Dfa`], mirroring [`super::NfaBuilder`].
#[derive(Debug, Default)]
pub struct DfaBuilder {
    name: String,
    alphabet: Option<Alphabet>,
    states: DfaTable,
    start_state: Option<StateName>,
    accept_states: OrderedSet<StateName>,
}

impl DfaBuilder {
    /// Sets the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Fixes the alphabet explicitly. Without this, the alphabet is inferred as
    /// the sorted set of symbols occurring on transitions.
    pub fn with_alphabet<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.alphabet = Some(Alphabet::new(symbols));
        self
    }

    /// Registers `state`, with no outgoing transitions yet.
    pub fn with_state(mut self, state: impl Into<StateName>) -> Self {
        self.states.entry(state.into()).or_default();
        self
    }

    /// Adds a transition from `state` on `symbol` to `dest`.
    ///
    /// # Panics
    ///
    /// If `symbol` is [`EPSILON`], or if `state` already has a transition on
    /// `symbol` to a different destination.
    pub fn with_transition(
        mut self,
        state: impl Into<StateName>,
        symbol: impl Into<Symbol>,
        dest: impl Into<StateName>,
    ) -> Self {
        self.add_transition(state, symbol, dest);
        self
    }

    /// Like [`Self::with_transition`], but callable on a borrowed builder.
    pub fn add_transition(
        &mut self,
        state: impl Into<StateName>,
        symbol: impl Into<Symbol>,
        dest: impl Into<StateName>,
    ) {
        let (state, symbol, dest) = (state.into(), symbol.into(), dest.into());
        assert!(symbol != EPSILON, "a DFA cannot carry ε-transitions");
        self.states.entry(dest.clone()).or_default();
        let previous = self
            .states
            .entry(state.clone())
            .or_default()
            .insert(symbol.clone(), dest.clone());
        if let Some(previous) = previous {
            assert!(
                previous == dest,
                "state `{state}` already moves to `{previous}` on `{symbol}`"
            );
        }
    }

    /// Sets the start state, registering it if necessary.
    pub fn with_start(mut self, state: impl Into<StateName>) -> Self {
        let state = state.into();
        self.states.entry(state.clone()).or_default();
        self.start_state = Some(state);
        self
    }

    /// Adds accept states, registering them if necessary.
    pub fn with_accept_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StateName>,
    {
        for state in states {
            let state = state.into();
            self.states.entry(state.clone()).or_default();
            self.accept_states.insert(state);
        }
        self
    }

    /// Finishes construction.
    ///
    /// # Panics
    ///
    /// If no start state was set, if an explicit alphabet was given that is
    /// missing a symbol used on some transition, or if it contains ε.
    pub fn build(self) -> Dfa {
        let start_state = self.start_state.expect("a start state is required");
        let used: OrderedSet<&Symbol> = self
            .states
            .values()
            .flat_map(|row| row.keys())
            .collect();
        let alphabet = match self.alphabet {
            Some(alphabet) => {
                assert!(!alphabet.has_epsilon(), "a DFA alphabet cannot contain ε");
                for symbol in &used {
                    assert!(
                        alphabet.contains(symbol),
                        "transition symbol `{symbol}` is not in the alphabet"
                    );
                }
                alphabet
            }
            None => Alphabet::new(used.into_iter().cloned()),
        };
        Dfa::from_parts(self.name, alphabet, self.states, start_state, self.accept_states)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial() -> Dfa {
        // accepts exactly words of 0s with even length; `1` leads into ∅
        Dfa::builder()
            .with_alphabet(["0", "1"])
            .with_transition("even", "0", "odd")
            .with_transition("odd", "0", "even")
            .with_start("even")
            .with_accept_states(["even"])
            .build()
    }

    #[test]
    fn missing_transitions_reject() {
        let dfa = partial();
        assert!(dfa.accepts_chars(""));
        assert!(dfa.accepts_chars("00"));
        assert!(!dfa.accepts_chars("0"));
        assert!(!dfa.accepts_chars("001"));
        assert!(!dfa.is_total());
    }

    #[test]
    fn successor_or_dead_totalizes() {
        let dfa = partial();
        assert_eq!(dfa.successor_or_dead("even", "1"), DEAD);
        assert_eq!(dfa.successor_or_dead(DEAD, "0"), DEAD);
        assert_eq!(dfa.successor_or_dead("even", "0"), "odd");
    }

    #[test]
    #[should_panic(expected = "ε")]
    fn epsilon_is_rejected() {
        Dfa::builder().with_transition("a", EPSILON, "b");
    }
}
