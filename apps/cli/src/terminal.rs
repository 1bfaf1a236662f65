//! Terminal rendering and event logging for the CLI.

use std::fmt::Write as _;
use std::sync::Mutex;

use shoplist_core::presenter::{ListSurface, ListView, NoteEditor, Notice, NoticeKind};
use shoplist_core::sync::{RepositoryEvent, RepositoryEventSink, SnapshotSource};
use tracing::{debug, info, warn};

/// Keeps the latest view; notices go straight to stderr.
#[derive(Default)]
pub struct TerminalSurface {
    view: Mutex<Option<ListView>>,
    editor: Mutex<Option<NoteEditor>>,
}

impl TerminalSurface {
    pub fn latest_view(&self) -> Option<ListView> {
        self.view.lock().ok().and_then(|view| view.clone())
    }

    pub fn take_editor(&self) -> Option<NoteEditor> {
        self.editor.lock().ok().and_then(|mut editor| editor.take())
    }
}

impl ListSurface for TerminalSurface {
    fn render(&self, view: &ListView) {
        if let Ok(mut current) = self.view.lock() {
            *current = Some(view.clone());
        }
    }

    fn show_notice(&self, notice: &Notice) {
        let prefix = match notice.kind {
            NoticeKind::Info => "",
            NoticeKind::Validation => "invalid: ",
            NoticeKind::Rejected => "error: ",
            NoticeKind::Offline => "offline: ",
        };
        eprintln!("{}{}", prefix, notice.message);
    }

    fn open_note_editor(&self, editor: &NoteEditor) {
        if let Ok(mut current) = self.editor.lock() {
            *current = Some(editor.clone());
        }
    }

    fn clear_add_form(&self) {}
}

/// Mirrors repository events into the log.
pub struct LogEventSink;

impl RepositoryEventSink for LogEventSink {
    fn emit(&self, event: RepositoryEvent) {
        match event {
            RepositoryEvent::SnapshotReplaced(snapshot) => debug!(
                generation = snapshot.generation(),
                items = snapshot.len(),
                "snapshot replaced"
            ),
            RepositoryEvent::RefreshFailed(failure) => warn!(%failure, "refresh failed"),
            RepositoryEvent::MutationApplied { kind, item_id, .. } => {
                info!(kind = kind.as_str(), ?item_id, "mutation applied")
            }
            RepositoryEvent::MutationFailed {
                kind,
                item_id,
                failure,
            } => warn!(kind = kind.as_str(), ?item_id, %failure, "mutation failed"),
        }
    }
}

pub fn format_view(view: &ListView) -> String {
    let mut out = String::new();
    if view.rows.is_empty() {
        out.push_str("The list is empty.\n");
    }
    let name_width = view
        .rows
        .iter()
        .map(|row| row.name.chars().count())
        .max()
        .unwrap_or(0);

    for row in &view.rows {
        let mark = if row.purchased { "x" } else { " " };
        let _ = write!(
            out,
            "[{}] {:>4}  {:<width$}",
            mark,
            row.id,
            row.name,
            width = name_width
        );
        if let Some(label) = &row.date_label {
            let _ = write!(out, "  {}", label);
        }
        out.push('\n');
        if let Some(note) = &row.note {
            let _ = writeln!(out, "          {}", note);
        }
    }

    let origin = match view.source {
        SnapshotSource::Remote => "",
        SnapshotSource::Cache => " (cached)",
        SnapshotSource::Empty => " (not loaded)",
    };
    let _ = writeln!(
        out,
        "{} of {} purchased{}",
        view.purchased, view.total, origin
    );
    out
}
