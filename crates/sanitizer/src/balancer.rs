//! Tag balancing between the event loop and the policy.
//!
//! Guarantees to the wrapped policy:
//! - every `close_tag` matches an element it previously saw opened;
//! - every non-void element opened is closed by `close_document`;
//! - nesting never exceeds the configured depth.

use crate::policy::Policy;

/// Elements that never have content or a close tag.
pub fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// A [`Policy`] adapter that enforces well-formed nesting before forwarding.
#[derive(Debug)]
pub struct TagBalancer<P> {
    inner: P,
    open_elements: Vec<String>,
    /// Elements dropped for exceeding the depth limit, innermost last, with the
    /// `open_elements` depth they were dropped at.
    suppressed: Vec<(String, usize)>,
    max_nesting_depth: usize,
}

impl<P: Policy> TagBalancer<P> {
    pub fn new(inner: P, max_nesting_depth: usize) -> Self {
        Self {
            inner,
            open_elements: Vec::new(),
            suppressed: Vec::new(),
            max_nesting_depth,
        }
    }

    pub fn into_inner(self) -> P {
        self.inner
    }

    /// Number of elements currently open in the wrapped policy.
    pub fn depth(&self) -> usize {
        self.open_elements.len()
    }

    fn close_to(&mut self, idx: usize) {
        // Dropped elements nested inside the closed ones are gone with them.
        let kept = self
            .suppressed
            .iter()
            .position(|(_, depth)| *depth > idx)
            .unwrap_or(self.suppressed.len());
        self.suppressed.truncate(kept);
        while self.open_elements.len() > idx {
            if let Some(name) = self.open_elements.pop() {
                self.inner.close_tag(&name);
            }
        }
    }
}

impl<P: Policy> Policy for TagBalancer<P> {
    fn open_document(&mut self) {
        self.open_elements.clear();
        self.suppressed.clear();
        self.inner.open_document();
    }

    fn close_document(&mut self) {
        self.close_to(0);
        self.inner.close_document();
    }

    fn open_tag(&mut self, name: &str, attrs: &mut Vec<String>) {
        if is_void_element(name) {
            self.inner.open_tag(name, attrs);
            return;
        }
        if self.open_elements.len() >= self.max_nesting_depth {
            log::debug!(
                target: "sanitizer.balancer",
                "dropping <{name}> nested deeper than {}",
                self.max_nesting_depth
            );
            self.suppressed
                .push((name.to_owned(), self.open_elements.len()));
            return;
        }
        self.inner.open_tag(name, attrs);
        self.open_elements.push(name.to_owned());
    }

    fn close_tag(&mut self, name: &str) {
        if self.suppressed.last().is_some_and(|(top, _)| top == name) {
            self.suppressed.pop();
            return;
        }
        match self.open_elements.iter().rposition(|open| open == name) {
            Some(idx) => self.close_to(idx),
            None => {
                log::debug!(target: "sanitizer.balancer", "dropping unmatched </{name}>");
            }
        }
    }

    fn text(&mut self, chunk: &str) {
        self.inner.text(chunk);
    }
}
