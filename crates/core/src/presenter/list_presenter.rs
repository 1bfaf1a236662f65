//! Translates list gestures into repository calls.

use log::debug;
use std::sync::Arc;

use super::{ListSurface, ListView, Notice, NoteEditor};
use crate::errors::{Error, Result};
use crate::items::ItemId;
use crate::sync::{ItemRepository, MutationOutcome};

/// A user gesture on the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    /// The purchased checkbox of a row was tapped.
    ToggleCheckbox(ItemId),
    /// The delete control of a row was tapped.
    TapDelete(ItemId),
    /// A row body was tapped; opens the note editor.
    TapRow(ItemId),
    /// The note editor was confirmed.
    SubmitNote { id: ItemId, note: String },
    /// The add form was submitted.
    TapAdd { name: String, note: String },
}

/// Drives a [`ListSurface`] from an [`ItemRepository`].
///
/// Rendering of snapshots happens through [`super::SurfaceEventSink`]; the
/// presenter itself keeps no item state.
pub struct ListPresenter {
    repository: Arc<ItemRepository>,
    surface: Arc<dyn ListSurface>,
}

impl ListPresenter {
    pub fn new(repository: Arc<ItemRepository>, surface: Arc<dyn ListSurface>) -> Self {
        Self {
            repository,
            surface,
        }
    }

    /// Draws whatever snapshot is current right now.
    pub fn present(&self) {
        let snapshot = self.repository.snapshot();
        self.surface.render(&ListView::from_snapshot(&snapshot));
    }

    /// Handles one gesture.
    ///
    /// Returns the mutation outcome for gestures that reach the remote store
    /// and `None` for gestures that only open UI.
    pub async fn handle(&self, gesture: Gesture) -> Result<Option<MutationOutcome>> {
        debug!("Handling gesture {:?}", gesture);
        let result = match gesture {
            Gesture::ToggleCheckbox(id) => self.repository.toggle(id).await.map(Some),
            Gesture::TapDelete(id) => self.repository.delete(id).await.map(Some),
            Gesture::TapRow(id) => self.open_note_editor(id).map(|()| None),
            Gesture::SubmitNote { id, note } => {
                self.repository.edit_note(id, &note).await.map(Some)
            }
            Gesture::TapAdd { name, note } => {
                self.repository
                    .add(&name, Some(&note))
                    .await
                    .map(|outcome| {
                        if outcome.write.is_ok() {
                            self.surface.clear_add_form();
                        }
                        Some(outcome)
                    })
            }
        };

        if let Err(err) = &result {
            self.report_local_error(err);
        }
        result
    }

    fn open_note_editor(&self, id: ItemId) -> Result<()> {
        let snapshot = self.repository.snapshot();
        let item = snapshot.get(id).ok_or(Error::ItemNotFound(id))?;
        self.surface.open_note_editor(&NoteEditor::for_item(item));
        Ok(())
    }

    fn report_local_error(&self, err: &Error) {
        let notice = match err {
            Error::Validation(validation) => Notice::validation(validation),
            Error::ItemNotFound(_) => Notice::info("That item is no longer on the list"),
            // Remote failures were already reported through the event sink.
            Error::Remote(_) => return,
            Error::Storage(message) => {
                Notice::info(format!("Local storage problem: {}", message))
            }
        };
        self.surface.show_notice(&notice);
    }
}
