//! Domain types for the music collection manager.
//!
//! This crate holds the pieces every other crate agrees on:
//!
//! - **Field schema**: the ordered, typed set of song fields and their CSV
//!   header names ([`FieldSchema`], [`FieldDescriptor`], [`FieldKey`])
//! - **Song records**: one typed [`Song`] per track, with [`FieldKey`]
//!   accessors in place of reflective lookup
//! - **Sort rules**: ordered `(field, direction)` pairs and the three-state
//!   toggle used by column headers ([`SortRules`])
//!
//! # Example
//!
//! ```
//! use mcm_model::{FieldSchema, SortField, SortRules, FieldKey};
//!
//! let schema = FieldSchema::music_collection();
//! assert_eq!(schema.header_row()[0], "active");
//!
//! let rules = SortRules::new().toggled(SortField::Field(FieldKey::Artist));
//! assert_eq!(rules.len(), 1);
//! ```

mod error;
mod schema;
mod song;
mod sort;

pub use error::{ModelError, Result};
pub use schema::{DataType, FieldDescriptor, FieldKey, FieldSchema, ID_DISPLAY_NAME, ID_FIELD_NAME};
pub use song::{FieldRef, FieldValue, Song};
pub use sort::{SortDirection, SortField, SortRule, SortRules};
