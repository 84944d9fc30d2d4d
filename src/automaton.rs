/// Deterministic finite automata.
pub mod dfa;
/// Nondeterministic finite automata with epsilon transitions.
pub mod nfa;

pub use dfa::{Dfa, DfaBuilder, DEAD};
pub use nfa::{Nfa, NfaBuilder};

use crate::math::OrderedSet;

/// The name a state is referred to by. States are distinguished purely by
/// identity of their name, never by content.
pub type StateName = String;

/// Builds the canonical name of a composite state from its member states.
/// Members are joined in their sorted order, so two sets with equal members
/// always produce the same name regardless of how they were discovered.
pub(crate) fn composite_name(members: &OrderedSet<StateName>) -> StateName {
    members.iter().map(String::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_name_is_order_independent() {
        let mut left = OrderedSet::new();
        left.extend(["q2".to_string(), "q1".to_string()]);
        let mut right = OrderedSet::new();
        right.extend(["q1".to_string(), "q2".to_string()]);
        assert_eq!(composite_name(&left), composite_name(&right));
        assert_eq!(composite_name(&left), "q1q2");
    }
}
