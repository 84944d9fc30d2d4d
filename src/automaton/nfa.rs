use std::collections::VecDeque;

use itertools::Itertools;
use tracing::trace;

use crate::alphabet::{Alphabet, Symbol, EPSILON};
use crate::math::{OrderedMap, OrderedSet};

use super::StateName;

/// The transition table of an [`Nfa`]: per state, per symbol, a set of
/// destination states. Symbols may include [`EPSILON`].
pub type NfaTable = OrderedMap<StateName, OrderedMap<Symbol, OrderedSet<StateName>>>;

/// A nondeterministic finite automaton, possibly with ε-transitions.
///
/// Values of this type are immutable once built; the constructions in this
/// crate ([`crate::determinize::determinize`] and friends) read them and return
/// fresh automata. Every destination referenced by the transition table is
/// guaranteed to be a state, and the start state and all accept states are
/// members of the state set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfa {
    name: String,
    alphabet: Alphabet,
    states: NfaTable,
    start_state: StateName,
    accept_states: OrderedSet<StateName>,
}

impl Nfa {
    /// Creates a builder for incremental construction.
    pub fn builder() -> NfaBuilder {
        NfaBuilder::default()
    }

    pub(crate) fn from_parts(
        name: String,
        alphabet: Alphabet,
        states: NfaTable,
        start_state: StateName,
        accept_states: OrderedSet<StateName>,
    ) -> Self {
        debug_assert!(states.contains_key(&start_state));
        debug_assert!(accept_states.iter().all(|q| states.contains_key(q)));
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

    /// The alphabet, including [`EPSILON`] when the automaton carries
    /// ε-transitions.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The full transition table.
    pub fn states(&self) -> &NfaTable {
        &self.states
    }

    /// The outgoing transitions of `state`, if it exists.
    pub fn transitions(&self, state: &str) -> Option<&OrderedMap<Symbol, OrderedSet<StateName>>> {
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

    /// The number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Whether this automaton makes use of ε at all.
    pub fn has_epsilon(&self) -> bool {
        self.alphabet.has_epsilon()
            || self.states.values().any(|row| row.contains_key(EPSILON))
    }

    /// Computes the ε-closure of `state`: all states reachable via ε-transitions
    /// alone, including `state` itself.
    ///
    /// # Panics
    ///
    /// If `state` is not a state of this automaton.
    pub fn epsilon_closure(&self, state: &str) -> OrderedSet<StateName> {
        assert!(self.states.contains_key(state), "unknown state `{state}`");
        let mut closure = OrderedSet::from([state.to_string()]);
        let mut queue = VecDeque::from([state.to_string()]);
        while let Some(current) = queue.pop_front() {
            let Some(dests) = self.states[&current].get(EPSILON) else {
                continue;
            };
            for dest in dests {
                if closure.insert(dest.clone()) {
                    queue.push_back(dest.clone());
                }
            }
        }
        closure
    }

    /// Computes the ε-closure of every state at once.
    pub fn epsilon_closures(&self) -> OrderedMap<StateName, OrderedSet<StateName>> {
        self.states
            .keys()
            .map(|q| (q.clone(), self.epsilon_closure(q)))
            .collect()
    }

    /// Runs the automaton on the given word, one symbol per item, and reports
    /// whether it ends in a configuration containing an accept state.
    pub fn accepts<I, S>(&self, word: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut current = self.epsilon_closure(&self.start_state);
        for symbol in word {
            let symbol = symbol.as_ref();
            let mut next = OrderedSet::new();
            for state in &current {
                if let Some(dests) = self.states[state].get(symbol) {
                    for dest in dests {
                        next.extend(self.epsilon_closure(dest));
                    }
                }
            }
            trace!(
                "stepped on `{symbol}` into {{{}}}",
                next.iter().join(", ")
            );
            current = next;
            if current.is_empty() {
                return false;
            }
        }
        current.iter().any(|q| self.accept_states.contains(q))
    }

    /// Convenience for single-character symbols: runs on each `char` of `word`.
    pub fn accepts_chars(&self, word: &str) -> bool {
        self.accepts(word.chars().map(|c| c.to_string()))
    }
}

/// Incrementally assembles an [`Nfa`]. Destination states of added transitions
/// are registered automatically, as are the start state and accept states, so a
/// finished build cannot contain dangling references.
#[derive(Debug, Default)]
pub struct NfaBuilder {
    name: String,
    alphabet: Option<Alphabet>,
    states: NfaTable,
    start_state: Option<StateName>,
    accept_states: OrderedSet<StateName>,
}

impl NfaBuilder {
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

    /// Adds transitions from `state` on `symbol` to every state in `dests`.
    pub fn with_transition<I, S>(mut self, state: impl Into<StateName>, symbol: impl Into<Symbol>, dests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StateName>,
    {
        self.add_transition(state, symbol, dests);
        self
    }

    /// Like [`Self::with_transition`], but callable on a borrowed builder.
    pub fn add_transition<I, S>(&mut self, state: impl Into<StateName>, symbol: impl Into<Symbol>, dests: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<StateName>,
    {
        let dests: Vec<StateName> = dests.into_iter().map(|d| d.into()).collect();
        for dest in &dests {
            self.states.entry(dest.clone()).or_default();
        }
        self.states
            .entry(state.into())
            .or_default()
            .entry(symbol.into())
            .or_default()
            .extend(dests);
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
    /// If no start state was set, or if an explicit alphabet was given that is
    /// missing a symbol used on some transition.
    pub fn build(self) -> Nfa {
        let start_state = self.start_state.expect("a start state is required");
        let used: OrderedSet<&Symbol> = self
            .states
            .values()
            .flat_map(|row| row.keys())
            .collect();
        let alphabet = match self.alphabet {
            Some(alphabet) => {
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
        Nfa::from_parts(self.name, alphabet, self.states, start_state, self.accept_states)
    }
}
