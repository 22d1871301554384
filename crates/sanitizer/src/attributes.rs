//! Reassembly of attribute name/value tokens into a flat pair list.
//!
//! The lexer reports names and values as separate tokens and may omit a value
//! entirely (`<input disabled>`). [`AttributeAccumulator`] turns that stream into
//! `[name, value, name, value, ...]`.
//!
//! Invariant: after [`AttributeAccumulator::finish`] the list has even length and
//! every name is followed by exactly one value. A missing value is filled with a
//! copy of its name.

use crate::entities::decode;
use crate::names::canonical_name;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AttrState {
    ReadyForName,
    /// A name was pushed and is still waiting for its value.
    NameSeenNoValue,
}

/// Reusable working storage for one tag's attributes.
#[derive(Debug)]
pub struct AttributeAccumulator {
    pairs: Vec<String>,
    state: AttrState,
}

impl AttributeAccumulator {
    pub fn new() -> Self {
        Self {
            pairs: Vec::new(),
            state: AttrState::ReadyForName,
        }
    }

    /// Reset for the next tag, keeping the allocation.
    pub fn clear(&mut self) {
        self.pairs.clear();
        self.state = AttrState::ReadyForName;
    }

    /// Record an attribute name as it appears in the source.
    pub fn push_name(&mut self, raw: &str) {
        if self.state == AttrState::NameSeenNoValue {
            self.complete_valueless();
        }
        self.pairs.push(canonical_name(raw).into_owned());
        self.state = AttrState::NameSeenNoValue;
    }

    /// Record a raw (possibly quoted, still encoded) attribute value.
    pub fn push_value(&mut self, raw: &str) {
        if self.state == AttrState::ReadyForName {
            // A value with no name to attach to cannot be paired.
            log::debug!(target: "sanitizer", "dropping attribute value without a name");
            return;
        }
        self.pairs.push(decode(strip_quotes(raw)).into_owned());
        self.state = AttrState::ReadyForName;
    }

    /// Close the run and lend out the completed pair list.
    pub fn finish(&mut self) -> &mut Vec<String> {
        if self.state == AttrState::NameSeenNoValue {
            self.complete_valueless();
            self.state = AttrState::ReadyForName;
        }
        debug_assert!(self.pairs.len() % 2 == 0, "attribute pairs lost parity");
        &mut self.pairs
    }

    fn complete_valueless(&mut self) {
        if let Some(name) = self.pairs.last().cloned() {
            self.pairs.push(name);
        }
    }
}

impl Default for AttributeAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip one pair of surrounding quotes from a raw attribute value.
///
/// A trailing quote without a matching leading one is still stripped, since
/// browsers accept `<img src=foo.png">`. A leading quote without a trailing one
/// (`"foo`) is left alone.
pub fn strip_quotes(value: &str) -> &str {
    let Some(last) = value.chars().next_back() else {
        return value;
    };
    if last != '"' && last != '\'' {
        return value;
    }
    let without_last = &value[..value.len() - 1];
    if value.len() > 1 && value.starts_with(last) {
        &without_last[1..]
    } else {
        without_last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(ops: &[(&str, &str)]) -> Vec<String> {
        let mut acc = AttributeAccumulator::new();
        for (kind, text) in ops {
            match *kind {
                "name" => acc.push_name(text),
                "value" => acc.push_value(text),
                other => panic!("unknown op {other}"),
            }
        }
        acc.finish().clone()
    }

    #[test]
    fn strip_quotes_cases() {
        assert_eq!(strip_quotes("\"foo\""), "foo");
        assert_eq!(strip_quotes("'foo'"), "foo");
        assert_eq!(strip_quotes("foo\""), "foo");
        assert_eq!(strip_quotes("\"foo"), "\"foo");
        assert_eq!(strip_quotes("x"), "x");
        assert_eq!(strip_quotes(""), "");
        assert_eq!(strip_quotes("\""), "");
        assert_eq!(strip_quotes("''"), "");
        assert_eq!(strip_quotes("\"foo'"), "\"foo");
        assert_eq!(strip_quotes("'é'"), "é");
    }

    #[test]
    fn name_value_pairs() {
        assert_eq!(
            run(&[("name", "href"), ("value", "\"x&amp;y\"")]),
            vec!["href", "x&y"]
        );
    }

    #[test]
    fn valueless_attribute_pairs_with_itself() {
        assert_eq!(run(&[("name", "disabled")]), vec!["disabled", "disabled"]);
        assert_eq!(
            run(&[("name", "checked"), ("name", "id"), ("value", "a")]),
            vec!["checked", "checked", "id", "a"]
        );
        assert_eq!(
            run(&[("name", "a"), ("name", "b"), ("name", "c")]),
            vec!["a", "a", "b", "b", "c", "c"]
        );
    }

    #[test]
    fn names_are_canonicalized_values_are_not() {
        assert_eq!(
            run(&[("name", "CLASS"), ("value", "'Big'")]),
            vec!["class", "Big"]
        );
    }

    #[test]
    fn quotes_are_stripped_before_decoding() {
        assert_eq!(
            run(&[("name", "title"), ("value", "&quot;hi&quot;")]),
            vec!["title", "\"hi\""]
        );
    }

    #[test]
    fn orphan_value_is_dropped() {
        assert_eq!(run(&[("value", "x")]), Vec::<String>::new());
        assert_eq!(
            run(&[("name", "a"), ("value", "1"), ("value", "2")]),
            vec!["a", "1"]
        );
    }

    #[test]
    fn pair_list_is_always_even() {
        let names = ["name", "value"];
        // Every sequence of up to 6 operations.
        for len in 0..=6u32 {
            for mask in 0..(1u32 << len) {
                let ops: Vec<(&str, &str)> = (0..len)
                    .map(|bit| (names[((mask >> bit) & 1) as usize], "v"))
                    .collect();
                let pairs = run(&ops);
                assert_eq!(pairs.len() % 2, 0, "odd pair list for {ops:?}");
            }
        }
    }

    #[test]
    fn clear_resets_state_and_storage() {
        let mut acc = AttributeAccumulator::new();
        acc.push_name("a");
        acc.clear();
        acc.push_value("orphan");
        assert!(acc.finish().is_empty());
    }
}
