pub mod terminal;

#[cfg(test)]
pub mod recording;

use std::time::Duration;

pub use terminal::TerminalRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

/// Transient, dismissible notice; `lifetime` is how long it stays up
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
    pub lifetime: Duration,
}

impl Message {
    pub fn new(kind: MessageKind, text: impl Into<String>, lifetime: Duration) -> Self {
        Self {
            kind,
            text: text.into(),
            lifetime,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Doughnut,
    Line,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub series_label: Option<String>,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// What the controllers need from a view layer
pub trait Renderer: Send + Sync + 'static {
    fn set_text(&self, id: &str, text: &str);

    /// Replace the rows of a list or table; an empty slice clears it
    fn render_list(&self, id: &str, rows: &[Vec<String>]);

    /// Draw `chart` into `id`, replacing whatever chart was there
    fn render_chart(&self, id: &str, chart: &ChartSpec);

    fn release_chart(&self, id: &str);

    fn show_message(&self, message: &Message);

    fn set_visible(&self, _id: &str, _visible: bool) {}

    fn set_busy(&self, busy: bool);

    fn focus(&self, _id: &str) {}
}
