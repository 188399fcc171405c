//! Storable message records.
//!
//! A [`StoredMessage`] is decoded form fields plus a `date` stamp. It
//! serializes as one flat document: every field at top level, `date` beside
//! them.

use chrono::{DateTime, Local};
use mockable::Clock;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::codec::DecodedFields;

/// `DD/MM/YYYY HH:MM:SS:ffffff`, local time. Existing stored data and its
/// indices depend on this exact layout.
pub const DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S:%6f";

/// Name of the timestamp field in a stored document.
pub const DATE_FIELD: &str = "date";

/// One message ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    fields: DecodedFields,
    date: String,
}

impl StoredMessage {
    /// Submitted fields, without the timestamp.
    pub fn fields(&self) -> &DecodedFields {
        &self.fields
    }

    /// Formatted generation timestamp.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Value of a field; `date` resolves to the timestamp.
    pub fn get(&self, name: &str) -> Option<&str> {
        if name == DATE_FIELD {
            Some(&self.date)
        } else {
            self.fields.get(name).map(String::as_str)
        }
    }

    /// Number of top-level fields in the stored document.
    pub fn len(&self) -> usize {
        self.fields.len() + 1
    }

    /// Always false: a stored message carries at least its `date`.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Serialize for StoredMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        map.serialize_entry(DATE_FIELD, &self.date)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Attach a timestamp to decoded fields.
///
/// A submitted field named `date` is dropped in favour of the timestamp.
pub fn normalize(mut fields: DecodedFields, now: DateTime<Local>) -> StoredMessage {
    fields.remove(DATE_FIELD);
    StoredMessage {
        fields,
        date: now.format(DATE_FORMAT).to_string(),
    }
}

/// [`normalize`] with the current time from `clock`.
pub fn normalize_now(fields: DecodedFields, clock: &(impl Clock + ?Sized)) -> StoredMessage {
    normalize(fields, clock.local())
}
