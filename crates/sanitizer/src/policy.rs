//! The event interface consumed by sanitization policies.

/// Receives sanitized HTML events and decides what to keep.
///
/// Names are canonical (see [`crate::canonical_name`]); text and attribute values
/// are fully entity-decoded.
pub trait Policy {
    /// Called once before any other event.
    fn open_document(&mut self) {}

    /// Called once after the last event. Not called when sanitization fails.
    fn close_document(&mut self) {}

    /// An open tag such as `<a href="x">`.
    ///
    /// `attrs` alternates names and values and always has even length. It is
    /// lent for this call only: the policy may remove, reorder or add pairs in
    /// place (keeping the length even) before rendering it.
    fn open_tag(&mut self, name: &str, attrs: &mut Vec<String>);

    /// A close tag such as `</a>`.
    fn close_tag(&mut self, name: &str);

    /// Decoded character data.
    fn text(&mut self, chunk: &str);
}

impl<P: Policy + ?Sized> Policy for &mut P {
    fn open_document(&mut self) {
        (**self).open_document();
    }

    fn close_document(&mut self) {
        (**self).close_document();
    }

    fn open_tag(&mut self, name: &str, attrs: &mut Vec<String>) {
        (**self).open_tag(name, attrs);
    }

    fn close_tag(&mut self, name: &str) {
        (**self).close_tag(name);
    }

    fn text(&mut self, chunk: &str) {
        (**self).text(chunk);
    }
}
