#![no_main]

use libfuzzer_sys::fuzz_target;
use sanitizer::balancer::is_void_element;
use sanitizer::{Policy, sanitize};

#[derive(Default)]
struct Checker {
    open: Vec<String>,
    opened_document: bool,
    closed_document: bool,
}

impl Policy for Checker {
    fn open_document(&mut self) {
        assert!(!self.opened_document);
        self.opened_document = true;
    }

    fn close_document(&mut self) {
        assert!(self.open.is_empty(), "unclosed elements: {:?}", self.open);
        self.closed_document = true;
    }

    fn open_tag(&mut self, name: &str, attrs: &mut Vec<String>) {
        assert!(!name.is_empty());
        assert_eq!(attrs.len() % 2, 0, "odd attribute list for <{name}>");
        for pair in attrs.chunks(2) {
            assert!(!pair[0].is_empty());
        }
        if !is_void_element(name) {
            self.open.push(name.to_owned());
        }
    }

    fn close_tag(&mut self, name: &str) {
        assert_eq!(self.open.pop().as_deref(), Some(name));
    }

    fn text(&mut self, chunk: &str) {
        assert!(!chunk.is_empty());
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let mut checker = Checker::default();
    sanitize(input, &mut checker).expect("fuzz inputs are below the size limit");
    assert!(checker.opened_document && checker.closed_document);
});
