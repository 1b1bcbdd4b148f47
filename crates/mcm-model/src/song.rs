//! Song records and typed field values.

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::{ModelError, Result};
use crate::schema::FieldKey;

/// One track in the collection.
///
/// `id` is synthetic: it is assigned on decode (row position) or on merge
/// (negative ids for added songs) and never written to CSV.
///
/// Equality treats NaN numbers as equal to each other so that a song read
/// back from disk compares equal to the one that was written.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Song {
    pub id: i64,
    pub active: bool,
    pub date: String,
    pub day: String,
    pub title: String,
    pub new_file_name: String,
    pub original_file_name: String,
    pub original_file_path: String,
    pub file_extension: String,
    pub artist: String,
    pub album: String,
    pub album_artist: String,
    pub track_number: f64,
    pub track_total: f64,
    pub duration: f64,
}

impl Song {
    /// Borrowed view of a field's value.
    pub fn field(&self, key: FieldKey) -> FieldRef<'_> {
        match key {
            FieldKey::Active => FieldRef::Boolean(self.active),
            FieldKey::Date => FieldRef::Text(&self.date),
            FieldKey::Day => FieldRef::Text(&self.day),
            FieldKey::Title => FieldRef::Text(&self.title),
            FieldKey::NewFileName => FieldRef::Text(&self.new_file_name),
            FieldKey::OriginalFileName => FieldRef::Text(&self.original_file_name),
            FieldKey::OriginalFilePath => FieldRef::Text(&self.original_file_path),
            FieldKey::FileExtension => FieldRef::Text(&self.file_extension),
            FieldKey::Artist => FieldRef::Text(&self.artist),
            FieldKey::Album => FieldRef::Text(&self.album),
            FieldKey::AlbumArtist => FieldRef::Text(&self.album_artist),
            FieldKey::TrackNumber => FieldRef::Number(self.track_number),
            FieldKey::TrackTotal => FieldRef::Number(self.track_total),
            FieldKey::Duration => FieldRef::Number(self.duration),
        }
    }

    /// Assigns a field, rejecting values of the wrong type.
    pub fn set_field(&mut self, key: FieldKey, value: FieldValue) -> Result<()> {
        let mismatch = || ModelError::TypeMismatch {
            field: key,
            expected: key.data_type(),
        };
        match (key, value) {
            (FieldKey::Active, FieldValue::Boolean(flag)) => self.active = flag,
            (FieldKey::TrackNumber, FieldValue::Number(n)) => self.track_number = n,
            (FieldKey::TrackTotal, FieldValue::Number(n)) => self.track_total = n,
            (FieldKey::Duration, FieldValue::Number(n)) => self.duration = n,
            (key, FieldValue::Text(text)) => {
                *self.text_slot(key).ok_or_else(mismatch)? = text;
            }
            _ => return Err(mismatch()),
        }
        Ok(())
    }

    /// Identity key used for edits and duplicate detection.
    pub fn identity(&self) -> &str {
        &self.new_file_name
    }

    fn text_slot(&mut self, key: FieldKey) -> Option<&mut String> {
        let slot = match key {
            FieldKey::Date => &mut self.date,
            FieldKey::Day => &mut self.day,
            FieldKey::Title => &mut self.title,
            FieldKey::NewFileName => &mut self.new_file_name,
            FieldKey::OriginalFileName => &mut self.original_file_name,
            FieldKey::OriginalFilePath => &mut self.original_file_path,
            FieldKey::FileExtension => &mut self.file_extension,
            FieldKey::Artist => &mut self.artist,
            FieldKey::Album => &mut self.album,
            FieldKey::AlbumArtist => &mut self.album_artist,
            FieldKey::Active
            | FieldKey::TrackNumber
            | FieldKey::TrackTotal
            | FieldKey::Duration => return None,
        };
        Some(slot)
    }
}

impl PartialEq for Song {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && FieldKey::ALL
                .iter()
                .all(|key| self.field(*key) == other.field(*key))
    }
}

/// Owned field value, used when assigning fields.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Boolean(bool),
}

impl FieldValue {
    /// Borrowed view of this value.
    pub fn as_field_ref(&self) -> FieldRef<'_> {
        match self {
            Self::Text(text) => FieldRef::Text(text),
            Self::Number(n) => FieldRef::Number(*n),
            Self::Boolean(flag) => FieldRef::Boolean(*flag),
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        self.as_field_ref() == other.as_field_ref()
    }
}

/// Borrowed field value.
#[derive(Debug, Clone, Copy)]
pub enum FieldRef<'a> {
    Text(&'a str),
    Number(f64),
    Boolean(bool),
}

impl FieldRef<'_> {
    /// Natural ordering of two values of the same field.
    ///
    /// Numbers compare numerically with NaN equal to NaN and after every
    /// other number; text compares lexicographically; `false < true`.
    /// Values of different kinds compare equal.
    pub fn compare(&self, other: &FieldRef<'_>) -> Ordering {
        match (self, other) {
            (Self::Text(a), FieldRef::Text(b)) => a.cmp(b),
            (Self::Number(a), FieldRef::Number(b)) => compare_numbers(*a, *b),
            (Self::Boolean(a), FieldRef::Boolean(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl PartialEq for FieldRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            _ => false,
        }
    }
}

fn compare_numbers(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}
