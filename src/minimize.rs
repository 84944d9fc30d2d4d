//! DFA minimization by Myhill–Nerode table filling, plus the cosmetic
//! `q0, q1, …` renaming utility.

use itertools::Itertools;
use tracing::{debug, trace};

use crate::automaton::dfa::DfaTable;
use crate::automaton::{Dfa, StateName, DEAD};
use crate::math::{Map, OrderedMap, OrderedSet, Set};

/// Outcome of [`minimize`]. The `AlreadyMinimal` sentinel lets callers skip a
/// no-op rebuild when no two distinct states were equivalent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Minimization {
    /// No two distinct states were equivalent; the input is its own minimum.
    AlreadyMinimal,
    /// At least one merge happened; this is the minimized automaton.
    Minimized(Dfa),
}

impl Minimization {
    /// Whether the minimizer signalled that no change was made.
    pub fn is_already_minimal(&self) -> bool {
        matches!(self, Minimization::AlreadyMinimal)
    }

    /// The minimized automaton, or `None` when the input was already minimal.
    pub fn minimized(self) -> Option<Dfa> {
        match self {
            Minimization::AlreadyMinimal => None,
            Minimization::Minimized(dfa) => Some(dfa),
        }
    }

    /// The minimized automaton, falling back to `original` when the minimizer
    /// made no change.
    pub fn unwrap_or(self, original: Dfa) -> Dfa {
        self.minimized().unwrap_or(original)
    }
}

/// Minimizes `dfa` by collapsing equivalent states.
///
/// All unordered state pairs start unmarked; a pair is marked distinguishable
/// when exactly one of the two states accepts, and the marking is iterated to
/// a fixed point through the successor pairs. Unmarked pairs are merged into
/// composite states named by their sorted members. A partial table is
/// totalized for the comparison: the implicit dead state takes part as an
/// ordinary non-accepting state with self-loops on every symbol, and the
/// general algorithm decides which class it falls into. Unreachable states are
/// preserved.
pub fn minimize(dfa: &Dfa) -> Minimization {
    let mut names: Vec<StateName> = dfa.states().keys().cloned().collect();
    if !dfa.is_total() && !dfa.states().contains_key(DEAD) {
        names.push(DEAD.to_string());
        names.sort();
    }

    let marked = fill_table(dfa, &names);

    let mut used: Set<&str> = Set::default();
    let mut classes: Vec<Vec<&str>> = Vec::new();
    for (i, name) in names.iter().enumerate() {
        if used.contains(name.as_str()) {
            continue;
        }
        let mut class = vec![name.as_str()];
        for other in &names[i + 1..] {
            if !marked.contains(&pair(name, other)) {
                class.push(other.as_str());
            }
        }
        used.extend(class.iter().copied());
        classes.push(class);
    }

    if classes.len() == names.len() {
        debug!("`{}` is already minimal with {} states", dfa.name(), dfa.size());
        return Minimization::AlreadyMinimal;
    }

    let class_of: Map<&str, StateName> = classes
        .iter()
        .flat_map(|class| {
            let name: StateName = class.concat();
            class.iter().map(move |member| (*member, name.clone()))
        })
        .collect();
    for class in classes.iter().filter(|c| c.len() > 1) {
        trace!("merging {{{}}}", class.iter().join(", "));
    }

    let mut table = DfaTable::new();
    let mut accept_states = OrderedSet::new();
    for class in &classes {
        let row: OrderedMap<_, _> = dfa
            .alphabet()
            .iter()
            .map(|symbol| {
                let dest = dfa.successor_or_dead(class[0], symbol);
                (symbol.clone(), class_of[dest].clone())
            })
            .collect();
        let name = class_of[class[0]].clone();
        if class.iter().any(|q| dfa.accept_states().contains(*q)) {
            accept_states.insert(name.clone());
        }
        table.insert(name, row);
    }

    let start = class_of[dfa.start_state()].clone();
    Minimization::Minimized(Dfa::from_parts(
        dfa.name().to_string(),
        dfa.alphabet().clone(),
        table,
        start,
        accept_states,
    ))
}

fn pair(a: &str, b: &str) -> (StateName, StateName) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Runs the table-filling iteration and returns the set of distinguishable
/// pairs (order-normalized).
fn fill_table(dfa: &Dfa, names: &[StateName]) -> Set<(StateName, StateName)> {
    let mut marked: Set<(StateName, StateName)> = Set::default();
    let accepting = |q: &str| dfa.accept_states().contains(q);

    for (i, a) in names.iter().enumerate() {
        for b in &names[i + 1..] {
            if accepting(a) != accepting(b) {
                marked.insert(pair(a, b));
            }
        }
    }

    let mut changed = true;
    while changed {
        changed = false;
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                if marked.contains(&pair(a, b)) {
                    continue;
                }
                for symbol in dfa.alphabet().iter() {
                    let successors = pair(
                        dfa.successor_or_dead(a, symbol),
                        dfa.successor_or_dead(b, symbol),
                    );
                    if successors.0 != successors.1 && marked.contains(&successors) {
                        trace!("distinguished ({a}, {b}) through `{symbol}`");
                        marked.insert(pair(a, b));
                        changed = true;
                        break;
                    }
                }
            }
        }
    }
    marked
}

/// Relabels the states of `dfa` as `q0, q1, …` with the start state fixed to
/// `q0`; the dead-state name [`DEAD`] is preserved verbatim. Purely cosmetic.
pub fn rename_states(dfa: &Dfa) -> Dfa {
    let mut mapping: Map<&str, StateName> = Map::default();
    mapping.insert(dfa.start_state(), "q0".to_string());
    mapping.insert(DEAD, DEAD.to_string());
    let mut count = 1;
    for state in dfa.states().keys() {
        if state != dfa.start_state() && state != DEAD {
            mapping.insert(state, format!("q{count}"));
            count += 1;
        }
    }

    let table: DfaTable = dfa
        .states()
        .iter()
        .map(|(state, row)| {
            let row = row
                .iter()
                .map(|(symbol, dest)| (symbol.clone(), mapping[dest.as_str()].clone()))
                .collect();
            (mapping[state.as_str()].clone(), row)
        })
        .collect();
    let accept_states = dfa
        .accept_states()
        .iter()
        .map(|q| mapping[q.as_str()].clone())
        .collect();

    Dfa::from_parts(
        dfa.name().to_string(),
        dfa.alphabet().clone(),
        table,
        "q0".to_string(),
        accept_states,
    )
}
