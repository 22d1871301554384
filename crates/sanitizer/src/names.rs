//! Element and attribute name canonicalization.

use std::borrow::Cow;

/// Canonical form of an element or attribute name.
///
/// Policy: names without a namespace prefix are ASCII-lowercased so that
/// `<SCRIPT>` and `<script>` reach the policy identically. Namespaced names
/// (`svg:rect`, `xlink:href`) are preserved as written. Non-ASCII characters are
/// never folded.
pub fn canonical_name(name: &str) -> Cow<'_, str> {
    if name.contains(':') || !name.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(name.to_ascii_lowercase())
    }
}
