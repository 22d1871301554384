//! A [`Policy`] that accepts everything and records what it saw.

use sanitizer::Policy;

use crate::escape_text;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    OpenDocument,
    CloseDocument,
    OpenTag { name: String, attrs: Vec<String> },
    CloseTag(String),
    Text(String),
}

impl Event {
    /// Snapshot line used by golden fixtures.
    ///
    /// ```text
    /// #document
    /// <a href="x&y">
    /// "t<1"
    /// </a>
    /// #/document
    /// ```
    pub fn to_line(&self) -> String {
        match self {
            Event::OpenDocument => "#document".to_string(),
            Event::CloseDocument => "#/document".to_string(),
            Event::OpenTag { name, attrs } => {
                let mut line = format!("<{name}");
                for pair in attrs.chunks(2) {
                    let value = pair.get(1).map(String::as_str).unwrap_or("<unpaired>");
                    line.push_str(&format!(" {}=\"{}\"", pair[0], escape_text(value)));
                }
                line.push('>');
                line
            }
            Event::CloseTag(name) => format!("</{name}>"),
            Event::Text(text) => format!("\"{}\"", escape_text(text)),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct EventRecorder {
    pub events: Vec<Event>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(Event::to_line).collect()
    }

    /// Text chunks concatenated, in order.
    pub fn text(&self) -> String {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Policy for EventRecorder {
    fn open_document(&mut self) {
        self.events.push(Event::OpenDocument);
    }

    fn close_document(&mut self) {
        self.events.push(Event::CloseDocument);
    }

    fn open_tag(&mut self, name: &str, attrs: &mut Vec<String>) {
        self.events.push(Event::OpenTag {
            name: name.to_string(),
            attrs: attrs.clone(),
        });
    }

    fn close_tag(&mut self, name: &str) {
        self.events.push(Event::CloseTag(name.to_string()));
    }

    fn text(&mut self, chunk: &str) {
        self.events.push(Event::Text(chunk.to_string()));
    }
}
