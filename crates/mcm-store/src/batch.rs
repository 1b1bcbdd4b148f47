//! Validation of songs before they are added to a collection.

use std::collections::{HashMap, HashSet};

use mcm_model::Song;

use crate::error::BatchError;

/// Checks a batch of new songs against itself and the existing collection.
///
/// File names must be unique inside the batch and must not already exist.
/// Reported names keep first-seen batch order.
pub fn validate_batch(new_songs: &[Song], existing: &[Song]) -> Result<(), BatchError> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for song in new_songs {
        let count = counts.entry(song.identity()).or_insert(0);
        if *count == 0 {
            order.push(song.identity());
        }
        *count += 1;
    }

    let duplicates: Vec<(String, usize)> = order
        .iter()
        .filter_map(|name| {
            let count = counts[name];
            (count > 1).then(|| ((*name).to_string(), count))
        })
        .collect();
    if !duplicates.is_empty() {
        return Err(BatchError::DuplicateInBatch(duplicates));
    }

    let existing_names: HashSet<&str> = existing.iter().map(Song::identity).collect();
    let collisions: Vec<String> = order
        .into_iter()
        .filter(|name| existing_names.contains(name))
        .map(str::to_string)
        .collect();
    if !collisions.is_empty() {
        return Err(BatchError::AlreadyExists(collisions));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Song {
        Song {
            new_file_name: name.to_string(),
            ..Song::default()
        }
    }

    #[test]
    fn test_unique_batch_passes() {
        let batch = vec![named("a"), named("b")];
        assert!(validate_batch(&batch, &[named("c")]).is_ok());
    }

    #[test]
    fn test_duplicates_in_batch_are_counted() {
        let batch = vec![named("a"), named("b"), named("a"), named("b"), named("b")];
        assert_eq!(
            validate_batch(&batch, &[]),
            Err(BatchError::DuplicateInBatch(vec![
                ("a".to_string(), 2),
                ("b".to_string(), 3)
            ]))
        );
    }

    #[test]
    fn test_existing_names_are_rejected() {
        let batch = vec![named("new"), named("old")];
        assert_eq!(
            validate_batch(&batch, &[named("old")]),
            Err(BatchError::AlreadyExists(vec!["old".to_string()]))
        );
    }
}
