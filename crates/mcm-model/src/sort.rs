//! Sort rules.
//!
//! A [`SortRules`] set is an ordered list of `(field, direction)` pairs. The
//! sorter applies them one stable pass at a time, in list order, so the
//! **last** rule is the primary key and earlier rules only break ties.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::schema::{FieldKey, ID_FIELD_NAME};
use crate::song::{FieldRef, Song};

/// Direction of a sort rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Short label used on the command line.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(ModelError::InvalidSortDirection(other.to_string())),
        }
    }
}

/// A sortable column: any schema field, or the synthetic id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SortField {
    Id,
    Field(FieldKey),
}

impl SortField {
    /// Internal field name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Id => ID_FIELD_NAME,
            Self::Field(key) => key.name(),
        }
    }

    /// Value of this column for a song.
    pub fn value<'a>(&self, song: &'a Song) -> FieldRef<'a> {
        match self {
            // Ids are small integers; f64 holds them exactly.
            Self::Id => FieldRef::Number(song.id as f64),
            Self::Field(key) => song.field(*key),
        }
    }
}

impl From<FieldKey> for SortField {
    fn from(key: FieldKey) -> Self {
        Self::Field(key)
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim() == ID_FIELD_NAME {
            return Ok(Self::Id);
        }
        s.parse::<FieldKey>().map(Self::Field)
    }
}

impl From<SortField> for String {
    fn from(field: SortField) -> Self {
        field.name().to_string()
    }
}

impl TryFrom<String> for SortField {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// One `(field, direction)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortRule {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortRule {
    pub fn ascending(field: impl Into<SortField>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: impl Into<SortField>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Rule applied when no rules are set: ascending by id.
    pub fn default_order() -> Self {
        Self::ascending(SortField::Id)
    }
}

impl fmt::Display for SortRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.direction)
    }
}

/// Parses `field` or `field:asc|desc`.
impl FromStr for SortRule {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        let (field, direction) = match s.split_once(':') {
            Some((field, direction)) => (field, direction.parse()?),
            None => (s, SortDirection::Ascending),
        };
        Ok(Self {
            field: field.parse()?,
            direction,
        })
    }
}

/// Ordered sort rule set.
///
/// Raw construction keeps rules as given; [`SortRules::toggle`] keeps field
/// names unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortRules(Vec<SortRule>);

impl SortRules {
    /// Empty rule set (sorts by id).
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn from_rules(rules: Vec<SortRule>) -> Self {
        Self(rules)
    }

    pub fn rules(&self) -> &[SortRule] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &SortRule> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rules the sorter should run: the set itself, or the id default.
    pub fn effective(&self) -> Vec<SortRule> {
        if self.0.is_empty() {
            vec![SortRule::default_order()]
        } else {
            self.0.clone()
        }
    }

    /// Current direction for a field, if it is part of the set.
    pub fn direction_of(&self, field: SortField) -> Option<SortDirection> {
        self.0
            .iter()
            .find(|rule| rule.field == field)
            .map(|rule| rule.direction)
    }

    /// Advances a field through absent → ascending → descending → absent.
    ///
    /// New fields are appended, so they become the primary key; flipping a
    /// field's direction keeps its position.
    pub fn toggle(&mut self, field: SortField) {
        match self.0.iter().position(|rule| rule.field == field) {
            None => self.0.push(SortRule::ascending(field)),
            Some(index) => match self.0[index].direction {
                SortDirection::Ascending => {
                    self.0[index].direction = SortDirection::Descending;
                }
                SortDirection::Descending => {
                    self.0.remove(index);
                }
            },
        }
    }

    /// Pure form of [`SortRules::toggle`].
    #[must_use]
    pub fn toggled(&self, field: SortField) -> Self {
        let mut next = self.clone();
        next.toggle(field);
        next
    }
}

impl FromIterator<SortRule> for SortRules {
    fn from_iter<I: IntoIterator<Item = SortRule>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SortRules {
    type Item = &'a SortRule;
    type IntoIter = std::slice::Iter<'a, SortRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
