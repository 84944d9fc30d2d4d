//! Thompson construction of ε-NFAs from regular expressions.
//!
//! Patterns are built from single-character symbols, `+` for union, `*` for
//! the Kleene star, parentheses for grouping and concatenation that is either
//! implicit (adjacent atoms) or written explicitly as `.`. The construction
//! walks the pattern with a cursor state, splicing in the canonical Thompson
//! fragments for starred atoms and groups and ε-joining union branches to the
//! continuation of the enclosing expression.

use itertools::Itertools;
use thiserror::Error;
use tracing::trace;

use crate::alphabet::{Alphabet, Symbol, EPSILON};
use crate::automaton::nfa::NfaTable;
use crate::automaton::{Nfa, StateName};
use crate::math::OrderedSet;

/// A syntactically invalid pattern. Offsets are in characters from the start
/// of the pattern.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum MalformedPattern {
    /// A parenthesis without a partner, in either direction.
    #[error("unbalanced parenthesis at offset {0}")]
    UnbalancedParenthesis(usize),
    /// A `*` with nothing to repeat in front of it.
    #[error("`*` at offset {0} is not preceded by a symbol or group")]
    DanglingStar(usize),
}

/// Builds an ε-NFA accepting the language of `pattern`, with `q0` as start
/// state and a single accept state `qf`. The alphabet is the sorted set of
/// symbols occurring in the pattern, plus [`EPSILON`].
pub fn build(pattern: &str, name: &str) -> Result<Nfa, MalformedPattern> {
    let mut fragments = Fragments::default();
    fragments.register("q0");
    fragments.register("qf");
    let chars: Vec<char> = pattern.chars().collect();
    fragments.parse_expr(&chars, 0, "q0", "qf")?;
    trace!(
        "built NFA for `{pattern}` with {} states over {{{}}}",
        fragments.states.len(),
        fragments.literals.iter().join(", ")
    );

    let alphabet: Vec<Symbol> = fragments
        .literals
        .into_iter()
        .chain([EPSILON.to_string()])
        .collect();
    let mut builder = Nfa::builder()
        .name(name)
        .with_alphabet(alphabet)
        .with_start("q0")
        .with_accept_states(["qf"]);
    for (state, row) in fragments.states {
        for (symbol, dests) in row {
            builder = builder.with_transition(state.clone(), symbol, dests);
        }
    }
    Ok(builder.build())
}

/// Working state of a single construction: the partially built transition
/// table together with the call-scoped freshness counter, so that repeated
/// constructions in one process stay independent and reproducible.
#[derive(Debug, Default)]
struct Fragments {
    states: NfaTable,
    literals: OrderedSet<Symbol>,
    counter: usize,
}

impl Fragments {
    fn register(&mut self, state: &str) {
        self.states.entry(state.to_string()).or_default();
    }

    fn fresh(&mut self) -> StateName {
        self.counter += 1;
        format!("q{}", self.counter)
    }

    fn link<const N: usize>(&mut self, src: &str, symbol: &str, dests: [&str; N]) {
        for dest in dests {
            self.register(dest);
        }
        self.states
            .entry(src.to_string())
            .or_default()
            .entry(symbol.to_string())
            .or_default()
            .extend(dests.iter().map(|d| d.to_string()));
    }

    /// Parses `expr` (a slice of the full pattern starting at `offset`),
    /// threading the machine from `start` to `end`.
    fn parse_expr(
        &mut self,
        expr: &[char],
        offset: usize,
        start: &str,
        end: &str,
    ) -> Result<(), MalformedPattern> {
        let mut current = start.to_string();
        let mut branch_ends: Vec<StateName> = Vec::new();
        // set while the previous token was a plain symbol, so that adjacent
        // symbols concatenate without an ε hop in between
        let mut after_symbol = false;

        let mut i = 0;
        while i < expr.len() {
            match expr[i] {
                ')' => return Err(MalformedPattern::UnbalancedParenthesis(offset + i)),
                '*' => return Err(MalformedPattern::DanglingStar(offset + i)),
                '.' => {
                    i += 1;
                }
                '+' => {
                    branch_ends.push(current);
                    current = start.to_string();
                    after_symbol = false;
                    i += 1;
                }
                '(' => {
                    let close = matching_paren(expr, i)
                        .ok_or(MalformedPattern::UnbalancedParenthesis(offset + i))?;
                    let inner = &expr[i + 1..close];
                    if expr.get(close + 1) == Some(&'*') {
                        let entry = self.fresh();
                        self.link(&current, EPSILON, [&entry]);
                        let body_in = self.fresh();
                        let body_out = self.fresh();
                        let exit = self.fresh();
                        self.link(&entry, EPSILON, [&body_in, &exit]);
                        self.link(&body_out, EPSILON, [&body_in, &exit]);
                        self.parse_expr(inner, offset + i + 1, &body_in, &body_out)?;
                        current = exit;
                        i = close + 2;
                    } else {
                        let inner_start = self.fresh();
                        self.link(&current, EPSILON, [&inner_start]);
                        let inner_end = self.fresh();
                        self.parse_expr(inner, offset + i + 1, &inner_start, &inner_end)?;
                        current = inner_end;
                        i = close + 1;
                    }
                    after_symbol = false;
                }
                symbol => {
                    self.literals.insert(symbol.to_string());
                    let symbol = symbol.to_string();
                    if expr.get(i + 1) == Some(&'*') {
                        let entry = self.fresh();
                        self.link(&current, EPSILON, [&entry]);
                        let body_in = self.fresh();
                        let body_out = self.fresh();
                        let exit = self.fresh();
                        self.link(&entry, EPSILON, [&body_in, &exit]);
                        self.link(&body_in, &symbol, [&body_out]);
                        self.link(&body_out, EPSILON, [&body_in, &exit]);
                        current = exit;
                        i += 2;
                    } else {
                        let src = if after_symbol {
                            current
                        } else {
                            let src = self.fresh();
                            self.link(&current, EPSILON, [&src]);
                            src
                        };
                        let dest = self.fresh();
                        self.link(&src, &symbol, [&dest]);
                        current = dest;
                        after_symbol = true;
                        i += 1;
                    }
                }
            }
        }

        branch_ends.push(current);
        for branch in branch_ends {
            self.link(&branch, EPSILON, [end]);
        }
        Ok(())
    }
}

/// Index of the `)` matching the `(` at `open`, if it exists.
fn matching_paren(expr: &[char], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &c) in expr.iter().enumerate().skip(open) {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
