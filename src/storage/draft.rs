use std::rc::Rc;

use log::{error, warn};

use super::store::{read_json, write_json, KeyValueStore};
use crate::config::DRAFT_STORAGE_KEY;
use crate::forms::submission::FormValues;

/// Best-effort autosave of an unsent booking. Nothing here ever fails the form.
#[derive(Clone)]
pub struct DraftStore {
    store: Rc<dyn KeyValueStore>,
    key: &'static str,
}

impl DraftStore {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store, key: DRAFT_STORAGE_KEY }
    }

    /// Writes the draft, or drops it once every field has been emptied again.
    pub fn autosave(&self, values: &FormValues) {
        let result = if values.is_blank() {
            self.store.remove(self.key)
        } else {
            write_json(self.store.as_ref(), self.key, values)
        };
        if let Err(e) = result {
            warn!("Draft autosave skipped: {}", e);
        }
    }

    pub fn load(&self) -> Option<FormValues> {
        match read_json::<FormValues>(self.store.as_ref(), self.key) {
            Ok(draft) => draft,
            Err(e) => {
                error!("Error restoring saved data: {}", e);
                None
            }
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(self.key) {
            warn!("Failed to clear draft: {}", e);
        }
    }
}

/// The part of a draft that can pre-fill the current form: non-empty values
/// of fields the form actually renders.
pub fn restorable<'a>(draft: &FormValues, field_names: impl IntoIterator<Item = &'a str>) -> FormValues {
    field_names
        .into_iter()
        .filter_map(|name| {
            let value = draft.get(name);
            (!value.is_empty()).then(|| (name, value))
        })
        .collect()
}
