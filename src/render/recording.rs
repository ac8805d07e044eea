use std::sync::Mutex;
use crate::render::{ChartSpec, Message, MessageKind, Renderer};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Text(String, String),
    List(String, Vec<Vec<String>>),
    Chart(String, ChartSpec),
    ReleaseChart(String),
    Message(Message),
    Visible(String, bool),
    Busy(bool),
    Focus(String),
}

/// Renderer that remembers every call, for controller tests
#[derive(Default)]
pub struct RecordingRenderer {
    events: Mutex<Vec<Event>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn text(&self, id: &str) -> Option<String> {
        self.events().into_iter().rev().find_map(|e| match e {
            Event::Text(i, t) if i == id => Some(t),
            _ => None,
        })
    }

    pub fn list(&self, id: &str) -> Option<Vec<Vec<String>>> {
        self.events().into_iter().rev().find_map(|e| match e {
            Event::List(i, rows) if i == id => Some(rows),
            _ => None,
        })
    }

    pub fn chart(&self, id: &str) -> Option<ChartSpec> {
        self.events().into_iter().rev().find_map(|e| match e {
            Event::Chart(i, c) if i == id => Some(c),
            _ => None,
        })
    }

    pub fn released(&self, id: &str) -> bool {
        self.events()
            .iter()
            .any(|e| matches!(e, Event::ReleaseChart(i) if i == id))
    }

    pub fn messages(&self) -> Vec<Message> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Message(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|m| m.kind == MessageKind::Error)
            .map(|m| m.text)
            .collect()
    }

    pub fn visible(&self, id: &str) -> Option<bool> {
        self.events().into_iter().rev().find_map(|e| match e {
            Event::Visible(i, v) if i == id => Some(v),
            _ => None,
        })
    }

    pub fn busy_changes(&self) -> Vec<bool> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Busy(b) => Some(b),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl Renderer for RecordingRenderer {
    fn set_text(&self, id: &str, text: &str) {
        self.push(Event::Text(id.to_string(), text.to_string()));
    }

    fn render_list(&self, id: &str, rows: &[Vec<String>]) {
        self.push(Event::List(id.to_string(), rows.to_vec()));
    }

    fn render_chart(&self, id: &str, chart: &ChartSpec) {
        self.push(Event::Chart(id.to_string(), chart.clone()));
    }

    fn release_chart(&self, id: &str) {
        self.push(Event::ReleaseChart(id.to_string()));
    }

    fn show_message(&self, message: &Message) {
        self.push(Event::Message(message.clone()));
    }

    fn set_visible(&self, id: &str, visible: bool) {
        self.push(Event::Visible(id.to_string(), visible));
    }

    fn set_busy(&self, busy: bool) {
        self.push(Event::Busy(busy));
    }

    fn focus(&self, id: &str) {
        self.push(Event::Focus(id.to_string()));
    }
}
