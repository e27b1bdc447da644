use rustc_hash::{FxHashMap, FxHashSet};

/// Hands out pairwise-distinct display names within one namespace.
///
/// A candidate is used verbatim the first time it is seen. Repeats, and the empty candidate,
/// get a numeric suffix from a counter kept per candidate: `foo`, `foo_0`, `foo_1`, and for the
/// empty candidate `0`, `1`, ...
#[derive(Debug)]
pub struct NameScope {
    sigil: char,
    taken: FxHashSet<String>,
    duplicates: FxHashMap<String, usize>,
}

impl NameScope {
    pub fn new(sigil: char) -> Self {
        Self::with_capacity(sigil, 0)
    }

    pub fn with_capacity(sigil: char, capacity: usize) -> Self {
        let mut taken = FxHashSet::default();
        taken.reserve(capacity);
        Self {
            sigil,
            taken,
            duplicates: FxHashMap::default(),
        }
    }

    /// Assigns a name derived from `candidate` and returns it with the sigil prepended.
    pub fn map(&mut self, candidate: &str) -> String {
        if !candidate.is_empty() && self.taken.insert(candidate.to_owned()) {
            return format!("{}{candidate}", self.sigil);
        }

        let base = if candidate.is_empty() {
            String::new()
        } else {
            format!("{candidate}_")
        };
        let counter = self.duplicates.entry(candidate.to_owned()).or_insert(0);
        loop {
            let name = format!("{base}{counter}");
            *counter += 1;
            if self.taken.insert(name.clone()) {
                return format!("{}{name}", self.sigil);
            }
        }
    }
}
