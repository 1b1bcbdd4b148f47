//! Multi-key stable sorting of songs.
//!
//! Rules run as successive stable passes in list order. Each pass keeps the
//! relative order left by the previous one among songs it considers equal,
//! so the last rule decides the primary order and earlier rules break ties.

use std::cmp::Ordering;

use mcm_model::{Song, SortDirection, SortRule, SortRules};

/// Sorts songs in place. An empty rule set sorts by ascending id.
pub fn apply(songs: &mut [Song], rules: &SortRules) {
    for rule in rules.effective() {
        songs.sort_by(|a, b| compare(a, b, &rule));
    }
}

/// Sorted copy of `songs`.
pub fn sorted(songs: &[Song], rules: &SortRules) -> Vec<Song> {
    let mut result = songs.to_vec();
    apply(&mut result, rules);
    result
}

/// Compares two songs under a single rule.
pub fn compare(a: &Song, b: &Song, rule: &SortRule) -> Ordering {
    let ordering = rule.field.value(a).compare(&rule.field.value(b));
    match rule.direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcm_model::{FieldKey, SortField};

    fn song(id: i64, artist: &str, date: &str) -> Song {
        Song {
            id,
            artist: artist.to_string(),
            date: date.to_string(),
            new_file_name: format!("{id}.mp3"),
            ..Song::default()
        }
    }

    fn ids(songs: &[Song]) -> Vec<i64> {
        songs.iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_last_rule_is_primary() {
        let songs = vec![
            song(1, "b", "2020-01-01"),
            song(2, "a", "2020-01-01"),
            song(3, "b", "2021-01-01"),
            song(4, "a", "2021-01-01"),
        ];
        let rules = SortRules::from_rules(vec![
            SortRule::ascending(FieldKey::Artist),
            SortRule::descending(FieldKey::Date),
        ]);
        assert_eq!(ids(&sorted(&songs, &rules)), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_empty_rules_sort_by_id() {
        let songs = vec![song(3, "", ""), song(-2, "", ""), song(1, "", "")];
        assert_eq!(ids(&sorted(&songs, &SortRules::new())), vec![-2, 1, 3]);
    }

    #[test]
    fn test_sort_is_stable() {
        let songs = vec![song(2, "x", ""), song(1, "x", ""), song(3, "a", "")];
        let rules = SortRules::from_rules(vec![SortRule::ascending(FieldKey::Artist)]);
        assert_eq!(ids(&sorted(&songs, &rules)), vec![3, 2, 1]);
    }

    #[test]
    fn test_numbers_compare_numerically() {
        let mut songs: Vec<Song> = [10.0, 9.0, f64::NAN, 100.0]
            .iter()
            .enumerate()
            .map(|(i, n)| Song {
                id: i as i64,
                track_number: *n,
                ..Song::default()
            })
            .collect();
        apply(
            &mut songs,
            &SortRules::from_rules(vec![SortRule::ascending(FieldKey::TrackNumber)]),
        );
        assert_eq!(ids(&songs), vec![1, 0, 3, 2]);
    }

    #[test]
    fn test_descending_id() {
        let songs = vec![song(1, "", ""), song(2, "", "")];
        let rules = SortRules::from_rules(vec![SortRule::descending(SortField::Id)]);
        assert_eq!(ids(&sorted(&songs, &rules)), vec![2, 1]);
    }

    #[test]
    fn test_input_is_unchanged() {
        let songs = vec![song(2, "", ""), song(1, "", "")];
        let _ = sorted(&songs, &SortRules::new());
        assert_eq!(ids(&songs), vec![2, 1]);
    }
}
