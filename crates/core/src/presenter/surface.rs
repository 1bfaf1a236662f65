//! Rendering contract between the presenter and whatever draws the list.

use log::debug;
use std::sync::{Arc, Mutex};

use super::{ListView, Notice, NoteEditor};
use crate::sync::{MutationKind, RepositoryEvent, RepositoryEventSink, Snapshot};

/// A drawing target. Calls arrive on the task that completed the operation.
pub trait ListSurface: Send + Sync {
    /// Replaces everything on screen with `view`.
    fn render(&self, view: &ListView);

    fn show_notice(&self, notice: &Notice);

    fn open_note_editor(&self, editor: &NoteEditor);

    fn clear_add_form(&self);
}

/// Turns repository events into renders and notices on a surface.
///
/// Snapshots older than the last one drawn are ignored, so a refresh whose
/// event is delivered late cannot overwrite a newer list.
pub struct SurfaceEventSink {
    surface: Arc<dyn ListSurface>,
    drawn_generation: Mutex<Option<u64>>,
}

impl SurfaceEventSink {
    pub fn new(surface: Arc<dyn ListSurface>) -> Self {
        Self {
            surface,
            drawn_generation: Mutex::new(None),
        }
    }

    fn render_snapshot(&self, snapshot: &Snapshot) {
        // Held across the render so two deliveries cannot interleave.
        let mut drawn = self
            .drawn_generation
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if drawn.is_some_and(|generation| generation > snapshot.generation()) {
            debug!(
                "Skipping superseded snapshot generation {}",
                snapshot.generation()
            );
            return;
        }
        debug!("Rendering snapshot generation {}", snapshot.generation());
        self.surface.render(&ListView::from_snapshot(snapshot));
        *drawn = Some(snapshot.generation());
    }
}

impl RepositoryEventSink for SurfaceEventSink {
    fn emit(&self, event: RepositoryEvent) {
        match event {
            RepositoryEvent::SnapshotReplaced(snapshot) => self.render_snapshot(&snapshot),
            RepositoryEvent::RefreshFailed(failure) => {
                self.surface.show_notice(&Notice::refresh_failed(&failure));
            }
            RepositoryEvent::MutationApplied { kind, name, .. } => match kind {
                MutationKind::Add => {
                    let message = match name {
                        Some(name) => format!("Added: {}", name),
                        None => "Item added".to_string(),
                    };
                    self.surface.show_notice(&Notice::info(message));
                }
                MutationKind::Delete => {
                    self.surface.show_notice(&Notice::info("Item deleted"));
                }
                MutationKind::Toggle | MutationKind::EditNote => {}
            },
            RepositoryEvent::MutationFailed { kind, failure, .. } => {
                self.surface
                    .show_notice(&Notice::mutation_failed(kind, &failure));
            }
        }
    }
}
