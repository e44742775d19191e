//! Capture of log records and the window showing them.

use super::DebugApp;

use pxs_core::System;

use ::log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

use std::collections::VecDeque;
use std::sync::Arc;

/// Entries kept before the oldest are dropped.
pub const MAX_ENTRIES: usize = 10_000;

/// Entries shown at once.
const SHOWN_ENTRIES: usize = 1_000;

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// Log entries shared between the logger and the log window.
pub type LogBuffer = Arc<Mutex<VecDeque<LogEntry>>>;

pub fn push_entry(buffer: &LogBuffer, entry: LogEntry) {
    let mut entries = buffer.lock();
    while entries.len() >= MAX_ENTRIES {
        entries.pop_front();
    }
    entries.push_back(entry);
}

/// Forwards everything to 'env_logger' and keeps a copy of the records it lets through.
struct CaptureLogger {
    inner: env_logger::Logger,
    buffer: LogBuffer,
}

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.inner.matches(record) {
            return;
        }
        self.inner.log(record);
        push_entry(
            &self.buffer,
            LogEntry {
                level: record.level(),
                target: record.target().to_string(),
                message: record.args().to_string(),
            },
        );
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Install the global logger. Filtering is done with 'RUST_LOG' and defaults to 'info'.
pub fn init_logger() -> LogBuffer {
    let buffer = LogBuffer::default();
    let inner = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .build();
    let max_level = inner.filter();
    let logger = CaptureLogger {
        inner,
        buffer: buffer.clone(),
    };
    match ::log::set_boxed_logger(Box::new(logger)) {
        Ok(()) => ::log::set_max_level(max_level),
        Err(err) => eprintln!("failed to install logger: {err}"),
    }
    buffer
}

fn level_color(level: Level) -> egui::Color32 {
    match level {
        Level::Error => egui::Color32::from_rgb(223, 0, 36),
        Level::Warn => egui::Color32::from_rgb(243, 195, 0),
        Level::Info => egui::Color32::LIGHT_GRAY,
        Level::Debug => egui::Color32::from_rgb(46, 109, 180),
        Level::Trace => egui::Color32::GRAY,
    }
}

pub struct LogView {
    buffer: LogBuffer,
    /// The most verbose level shown.
    max_level: LevelFilter,
    filter: String,
    follow: bool,
    /// Entries seen last frame, used to know when to scroll.
    seen: usize,
}

impl LogView {
    pub fn new(buffer: LogBuffer) -> Self {
        Self {
            buffer,
            max_level: LevelFilter::Trace,
            filter: String::new(),
            follow: true,
            seen: 0,
        }
    }

    fn shows(&self, entry: &LogEntry) -> bool {
        entry.level <= self.max_level
            && (self.filter.is_empty()
                || entry.message.contains(&self.filter)
                || entry.target.contains(&self.filter))
    }
}

impl DebugApp for LogView {
    fn name(&self) -> &str {
        "Logs"
    }

    fn show(&mut self, _: &mut System, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            egui::ComboBox::from_id_source("log_level")
                .selected_text(self.max_level.as_str())
                .show_ui(ui, |ui| {
                    for level in LevelFilter::iter().skip(1) {
                        ui.selectable_value(&mut self.max_level, level, level.as_str());
                    }
                });
            ui.add(egui::TextEdit::singleline(&mut self.filter).desired_width(150.0));
            ui.checkbox(&mut self.follow, "Follow");
            if ui.button("Clear").clicked() {
                self.buffer.lock().clear();
            }
        });

        ui.separator();

        let entries = self.buffer.lock();
        let shown: Vec<&LogEntry> = entries.iter().filter(|e| self.shows(e)).collect();
        let skip = shown.len().saturating_sub(SHOWN_ENTRIES);

        let grew = entries.len() != self.seen;
        self.seen = entries.len();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for entry in &shown[skip..] {
                    ui.colored_label(
                        level_color(entry.level),
                        format!("[{}] {}: {}", entry.level, entry.target, entry.message),
                    );
                }
                if self.follow && grew {
                    ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                }
            });
    }

    fn show_window(&mut self, system: &mut System, ctx: &egui::Context, open: &mut bool) {
        egui::Window::new(self.name())
            .open(open)
            .resizable(true)
            .default_width(600.0)
            .default_height(300.0)
            .show(ctx, |ui| self.show(system, ui));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(level: Level, message: &str) -> LogEntry {
        LogEntry {
            level,
            target: "pxs_core::cdrom".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn buffer_is_bounded() {
        let buffer = LogBuffer::default();
        for i in 0..MAX_ENTRIES + 5 {
            push_entry(&buffer, entry(Level::Info, &i.to_string()));
        }
        let entries = buffer.lock();
        assert_eq!(entries.len(), MAX_ENTRIES);
        assert_eq!(entries.front().unwrap().message, "5");
    }

    #[test]
    fn view_filters() {
        let mut view = LogView::new(LogBuffer::default());
        view.max_level = LevelFilter::Warn;
        assert!(view.shows(&entry(Level::Error, "disc")));
        assert!(!view.shows(&entry(Level::Info, "disc")));

        view.filter = "cdrom".to_string();
        assert!(view.shows(&entry(Level::Warn, "lid opened")));

        view.filter = "bios".to_string();
        assert!(!view.shows(&entry(Level::Warn, "lid opened")));
    }
}
