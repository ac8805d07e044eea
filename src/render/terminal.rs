use crossterm::style::Stylize;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, List, ListItem, Row,
    Table, Widget,
};
use std::collections::HashSet;
use std::io::{self, Write};
use crate::render::{ChartKind, ChartSpec, Message, MessageKind, Renderer};

const DEFAULT_WIDTH: u16 = 100;
const LINE_CHART_HEIGHT: u16 = 14;
const COLUMN_SPACING: u16 = 2;

/// Draws each update as ratatui widgets into an off-screen buffer and
/// prints the result, so output scrolls like a log
pub struct TerminalRenderer {
    muted: HashSet<String>,
    width: u16,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        let width = crossterm::terminal::size()
            .map(|(w, _)| w)
            .unwrap_or(DEFAULT_WIDTH)
            .max(40);

        Self {
            muted: HashSet::new(),
            width,
        }
    }

    /// Stop printing text updates for `id` (e.g. a ticking clock)
    pub fn mute(mut self, id: &str) -> Self {
        self.muted.insert(id.to_string());
        self
    }

    fn draw<W: Widget>(&self, widget: W, height: u16) -> Vec<String> {
        let area = Rect::new(0, 0, self.width, height);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        buffer_lines(&buf)
    }

    fn write_lines(&self, lines: &[String]) {
        let mut out = io::stdout().lock();
        for line in lines {
            if writeln!(out, "{}", line).is_err() {
                return;
            }
        }
        let _ = out.flush();
    }

    fn list_lines(&self, id: &str, rows: &[Vec<String>]) -> Vec<String> {
        let block = Block::default().borders(Borders::ALL).title(id.to_string());
        let height = rows.len().max(1) as u16 + 2;

        if rows.iter().all(|row| row.len() <= 1) {
            let items: Vec<ListItem> = rows
                .iter()
                .map(|row| ListItem::new(row.first().cloned().unwrap_or_default()))
                .collect();
            return self.draw(List::new(items).block(block), height);
        }

        let table = Table::new(
            rows.iter().map(|row| Row::new(row.iter().map(String::as_str))),
            column_widths(rows),
        )
        .column_spacing(COLUMN_SPACING)
        .block(block);
        self.draw(table, height)
    }

    fn chart_lines(&self, id: &str, chart: &ChartSpec) -> Vec<String> {
        let title = match &chart.series_label {
            Some(series) => format!("{} ({}) | {}", chart.title, id, series),
            None => format!("{} ({})", chart.title, id),
        };
        let block = Block::default().borders(Borders::ALL).title(title);

        match chart.kind {
            ChartKind::Doughnut => {
                let total: f64 = chart.values.iter().sum();
                let bars: Vec<Bar> = chart
                    .labels
                    .iter()
                    .zip(&chart.values)
                    .map(|(label, value)| {
                        Bar::default()
                            .label(Line::from(label.clone()))
                            .value(value.round() as u64)
                            .text_value(share_text(*value, total))
                    })
                    .collect();
                let height = bars.len().max(1) as u16 + 2;

                let widget = BarChart::default()
                    .block(block)
                    .data(BarGroup::default().bars(&bars))
                    .direction(Direction::Horizontal)
                    .bar_width(1)
                    .bar_gap(0)
                    .bar_style(Style::default().fg(Color::Cyan));
                self.draw(widget, height)
            }
            ChartKind::Line => {
                let points: Vec<(f64, f64)> = chart
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (i as f64, *v))
                    .collect();
                let max_x = (points.len().max(2) - 1) as f64;
                let max_y = chart.values.iter().copied().fold(0.0_f64, f64::max).max(1.0) * 1.2;

                let mut dataset = Dataset::default()
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(Color::Green))
                    .data(&points);
                if let Some(series) = &chart.series_label {
                    dataset = dataset.name(series.clone());
                }

                let x_labels = match (chart.labels.first(), chart.labels.last()) {
                    (Some(first), Some(last)) => vec![Span::raw(first.clone()), Span::raw(last.clone())],
                    _ => Vec::new(),
                };

                let widget = Chart::new(vec![dataset])
                    .block(block)
                    .x_axis(Axis::default().bounds([0.0, max_x]).labels(x_labels))
                    .y_axis(
                        Axis::default()
                            .bounds([0.0, max_y])
                            .labels(vec![Span::raw("0"), Span::raw(format!("{:.1}", max_y))]),
                    );
                self.draw(widget, LINE_CHART_HEIGHT)
            }
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for TerminalRenderer {
    fn set_text(&self, id: &str, text: &str) {
        if self.muted.contains(id) {
            return;
        }
        self.write_lines(&[format!("{:>16}: {}", id, text)]);
    }

    fn render_list(&self, id: &str, rows: &[Vec<String>]) {
        self.write_lines(&self.list_lines(id, rows));
    }

    fn render_chart(&self, id: &str, chart: &ChartSpec) {
        self.write_lines(&self.chart_lines(id, chart));
    }

    fn release_chart(&self, id: &str) {
        tracing::debug!("Chart {} released", id);
    }

    fn show_message(&self, message: &Message) {
        let prefix = match message.kind {
            MessageKind::Info => "[INFO]".blue(),
            MessageKind::Success => "[OK]".green(),
            MessageKind::Error => "[ERROR]".red(),
        };
        tracing::debug!("Message shown for {:?}", message.lifetime);
        self.write_lines(&[format!("{} {}", prefix, message.text)]);
    }

    fn set_busy(&self, busy: bool) {
        if busy {
            self.write_lines(&["... working".to_string()]);
        }
    }
}

/// `30 (75.0%)`, or just the value when there is nothing to share
fn share_text(value: f64, total: f64) -> String {
    if total > 0.0 {
        format!("{} ({:.1}%)", value, value / total * 100.0)
    } else {
        value.to_string()
    }
}

/// Widest cell per column
fn column_widths(rows: &[Vec<String>]) -> Vec<Constraint> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    (0..columns)
        .map(|col| {
            let width = rows
                .iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0);
            Constraint::Length(width as u16)
        })
        .collect()
}

fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let width = buf.area.width as usize;
    buf.content
        .chunks(width.max(1))
        .map(|row| {
            let line: String = row.iter().map(|cell| cell.symbol()).collect();
            line.trim_end().to_string()
        })
        .collect()
}
