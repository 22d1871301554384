//! Immutable prefix tree with longest-match lookups.
//!
//! Built once from a finite `key -> value` mapping and never mutated afterwards,
//! so a shared `&Trie` can be read from any number of threads without
//! synchronization.
//!
//! Invariants:
//! - `child_map` is strictly increasing, so child lookup is a binary search.
//! - Each indexed key ends at exactly one terminal node; the tree height equals
//!   the length (in chars) of the longest key.
//! - A node is terminal iff it carries a value.

use std::collections::BTreeMap;
use std::fmt;

/// Construction failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrieError {
    /// The mapping had no entries.
    EmptyInput,
}

impl fmt::Display for TrieError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrieError::EmptyInput => write!(f, "cannot build a trie from an empty mapping"),
        }
    }
}

impl std::error::Error for TrieError {}

/// A node in the trie. The root node is the trie.
#[derive(Clone, Debug)]
pub struct Trie<V> {
    child_map: Box<[char]>,
    children: Box<[Trie<V>]>,
    value: Option<V>,
}

impl<V: Clone> Trie<V> {
    /// Build a trie from `entries`.
    ///
    /// Duplicate keys are collapsed through a sorted map before construction; a
    /// later entry for the same key replaces an earlier one.
    pub fn build<K, I>(entries: I) -> Result<Self, TrieError>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let sorted: BTreeMap<String, V> = entries
            .into_iter()
            .map(|(key, value)| (key.as_ref().to_owned(), value))
            .collect();
        if sorted.is_empty() {
            return Err(TrieError::EmptyInput);
        }
        // Keys are compared char by char; `String` ordering is byte-wise over
        // UTF-8, which orders scalar values the same way.
        let entries: Vec<(Vec<char>, V)> = sorted
            .into_iter()
            .map(|(key, value)| (key.chars().collect(), value))
            .collect();
        Ok(Self::build_node(&entries, 0))
    }

    fn build_node(entries: &[(Vec<char>, V)], depth: usize) -> Self {
        debug_assert!(!entries.is_empty());
        let (first_key, first_value) = &entries[0];
        let mut rest = entries;
        let value = if first_key.len() == depth {
            rest = &entries[1..];
            Some(first_value.clone())
        } else {
            None
        };

        let mut child_map = Vec::new();
        let mut children = Vec::new();
        while let Some((key, _)) = rest.first() {
            let ch = key[depth];
            let run = rest
                .iter()
                .position(|(key, _)| key[depth] != ch)
                .unwrap_or(rest.len());
            child_map.push(ch);
            children.push(Self::build_node(&rest[..run], depth + 1));
            rest = &rest[run..];
        }

        Self {
            child_map: child_map.into_boxed_slice(),
            children: children.into_boxed_slice(),
            value,
        }
    }
}

impl<V> Trie<V> {
    /// Does this node correspond to a complete key?
    pub fn is_terminal(&self) -> bool {
        self.value.is_some()
    }

    /// The value of the key ending at this node, if it is terminal.
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// The child for `ch`, if any.
    pub fn child(&self, ch: char) -> Option<&Trie<V>> {
        self.child_map
            .binary_search(&ch)
            .ok()
            .map(|idx| &self.children[idx])
    }

    pub fn contains(&self, ch: char) -> bool {
        self.child_map.binary_search(&ch).is_ok()
    }

    /// The descendant reached by following every char of `s`.
    ///
    /// Stops at the first char without a matching child.
    pub fn descend(&self, s: &str) -> Option<&Trie<V>> {
        let mut node = self;
        for ch in s.chars() {
            node = node.child(ch)?;
        }
        Some(node)
    }

    /// Length of the longest path below this node.
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.height() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Every key reachable from this node, in lexical order.
    pub fn keys(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut prefix = String::new();
        self.collect_keys(&mut prefix, &mut out);
        out
    }

    fn collect_keys(&self, prefix: &mut String, out: &mut Vec<String>) {
        if self.is_terminal() {
            out.push(prefix.clone());
        }
        for (ch, child) in self.child_map.iter().zip(self.children.iter()) {
            prefix.push(*ch);
            child.collect_keys(prefix, out);
            prefix.pop();
        }
    }

    fn fmt_node(&self, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_terminal() {
            "terminal"
        } else {
            "nonterminal"
        })?;
        for (ch, child) in self.child_map.iter().zip(self.children.iter()) {
            f.write_str("\n")?;
            for _ in 0..=depth {
                f.write_str("\t")?;
            }
            write!(f, "'{ch}' ")?;
            child.fmt_node(depth + 1, f)?;
        }
        Ok(())
    }
}

impl<V> fmt::Display for Trie<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Trie<u32> {
        Trie::build([
            ("foo", 0),
            ("bar", 1),
            ("food", 2),
            ("foody", 3),
            ("bart", 4),
            ("bartender", 5),
            ("wombat", 6),
            ("wombats", 7),
            ("wombatant", 8),
        ])
        .expect("non-empty mapping")
    }

    #[test]
    fn build_rejects_empty_mapping() {
        let entries: Vec<(&str, u32)> = Vec::new();
        assert_eq!(Trie::build(entries).unwrap_err(), TrieError::EmptyInput);
    }

    #[test]
    fn every_key_descends_to_its_value() {
        let trie = sample();
        for (key, value) in [
            ("foo", 0),
            ("bar", 1),
            ("food", 2),
            ("foody", 3),
            ("bart", 4),
            ("bartender", 5),
            ("wombat", 6),
            ("wombats", 7),
            ("wombatant", 8),
        ] {
            let node = trie
                .descend(key)
                .unwrap_or_else(|| panic!("missing key {key}"));
            assert!(node.is_terminal(), "{key} should be terminal");
            assert_eq!(node.value(), Some(&value), "value for {key}");
        }
    }

    #[test]
    fn prefixes_are_non_terminal_and_misses_are_none() {
        let trie = sample();
        let node = trie.descend("fo").expect("prefix exists");
        assert!(!node.is_terminal());
        assert_eq!(node.value(), None);
        assert!(trie.descend("fox").is_none());
        assert!(trie.descend("bartenders").is_none());
        assert!(trie.descend("q").is_none());
        assert!(!trie.is_terminal());
    }

    #[test]
    fn descend_empty_string_is_identity() {
        let trie = sample();
        let node = trie.descend("").expect("root");
        assert!(std::ptr::eq(node, &trie));
    }

    #[test]
    fn child_and_contains_agree() {
        let trie = sample();
        for ch in ['b', 'f', 'w'] {
            assert!(trie.contains(ch));
            assert!(trie.child(ch).is_some());
        }
        assert!(!trie.contains('a'));
        assert!(trie.child('a').is_none());
    }

    #[test]
    fn height_is_longest_key_length() {
        assert_eq!(sample().height(), "bartender".len());
        let single = Trie::build([("x", 1u32)]).expect("non-empty");
        assert_eq!(single.height(), 1);
    }

    #[test]
    fn keys_are_sorted_and_deduplicated() {
        let trie = Trie::build([("b", 1u32), ("a", 2), ("b", 3), ("ab", 4)]).expect("non-empty");
        assert_eq!(trie.keys(), vec!["a", "ab", "b"]);
        assert_eq!(trie.descend("b").and_then(Trie::value), Some(&3));
    }

    #[test]
    fn empty_key_makes_root_terminal() {
        let trie = Trie::build([("", 9u32), ("a", 1)]).expect("non-empty");
        assert_eq!(trie.value(), Some(&9));
        assert_eq!(trie.keys(), vec!["", "a"]);
    }

    #[test]
    fn handles_non_ascii_keys() {
        let trie = Trie::build([("café", 1u32), ("caf", 2), ("ça", 3)]).expect("non-empty");
        assert_eq!(trie.descend("café").and_then(Trie::value), Some(&1));
        assert_eq!(trie.descend("caf").and_then(Trie::value), Some(&2));
        assert_eq!(trie.descend("ça").and_then(Trie::value), Some(&3));
        assert_eq!(trie.height(), 4);
    }

    #[test]
    fn display_dumps_tree_shape() {
        let trie = Trie::build([("a", 0u32), ("ab", 1), ("c", 2)]).expect("non-empty");
        assert_eq!(
            trie.to_string(),
            "nonterminal\n\t'a' terminal\n\t\t'b' terminal\n\t'c' terminal"
        );
    }

    #[test]
    fn child_maps_are_strictly_increasing() {
        fn check(node: &Trie<u32>) {
            assert!(node.child_map.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(node.child_map.len(), node.children.len());
            node.children.iter().for_each(check);
        }
        check(&sample());
    }

    #[test]
    fn trie_is_shareable_across_threads() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<Trie<u32>>();
    }
}
