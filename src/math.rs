/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// A set with deterministic, sorted iteration order. Used wherever the order of
/// elements is observable, for example in composite state names.
pub type OrderedSet<S> = std::collections::BTreeSet<S>;
/// A map with deterministic, sorted iteration order. Transition tables are stored
/// in these so that printing and renaming are reproducible.
pub type OrderedMap<K, V> = std::collections::BTreeMap<K, V>;
