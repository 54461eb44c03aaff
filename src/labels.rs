//! Display-label allocation for variables.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::ir::VarId;

const ALPHABET: u32 = 26;

/// Assigns short display labels (`a`..`z`, then `aa`, `bb`, ...) to
/// variables, keyed by variable identity rather than printed name.
///
/// The Nth previously-unseen key gets the letter `N mod 26` repeated
/// `N / 26 + 1` times; asking again for a known key returns the label it was
/// first given. One allocator is threaded through a whole traversal, so
/// labels are unique across the entire drawing graph and stable for a given
/// first-encounter order.
#[derive(Debug, Default)]
pub struct LabelMap {
    next: u32,
    map: HashMap<VarId, String>,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the label for `var`, allocating the next one in the sequence
    /// on first encounter.
    pub fn label_for(&mut self, var: VarId) -> &str {
        match self.map.entry(var) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let i = self.next % ALPHABET;
                let j = self.next / ALPHABET;
                self.next += 1;
                let letter = char::from(b'a' + i as u8);
                entry.insert(
                    std::iter::repeat(letter).take(j as usize + 1).collect(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_memoized() {
        let mut labels = LabelMap::new();
        assert_eq!(labels.label_for(VarId(10)), "a");
        assert_eq!(labels.label_for(VarId(20)), "b");
        assert_eq!(labels.label_for(VarId(10)), "a");
    }

    #[test]
    fn sequence_wraps_to_repeated_letters() {
        let mut labels = LabelMap::new();
        // Burn through the first 25 labels with fresh keys.
        for id in 0..25 {
            labels.label_for(VarId(id));
        }
        assert_eq!(labels.label_for(VarId(100)), "z");
        assert_eq!(labels.label_for(VarId(101)), "aa");
        assert_eq!(labels.label_for(VarId(102)), "bb");
    }

    #[test]
    fn keys_are_identity_not_names() {
        // Two vars with equal printed names but distinct ids get distinct
        // labels.
        let mut labels = LabelMap::new();
        let first = labels.label_for(VarId(1)).to_string();
        let second = labels.label_for(VarId(2)).to_string();
        assert_ne!(first, second);
    }
}
