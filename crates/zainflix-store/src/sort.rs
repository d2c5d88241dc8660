use zainflix_models::WatchListEntry;

/// Presentation-layer orderings for a watch list. All sorts are stable, so
/// entries with equal keys keep their insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Case-insensitive title.
    Alphabetical,
    /// Descending score; missing scores sort last.
    Rating,
    /// Descending release year; missing years sort last.
    Year,
    /// Most recently added first.
    #[default]
    Recent,
}

pub fn sort_entries(entries: &mut [WatchListEntry], order: SortOrder) {
    match order {
        SortOrder::Alphabetical => {
            entries.sort_by_key(|e| e.movie.display_title().to_lowercase());
        }
        SortOrder::Rating => {
            entries.sort_by(|a, b| {
                b.movie
                    .score()
                    .partial_cmp(&a.movie.score())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        SortOrder::Year => {
            entries.sort_by_key(|e| std::cmp::Reverse(e.movie.release_year().unwrap_or(0)));
        }
        SortOrder::Recent => {
            entries.sort_by_key(|e| std::cmp::Reverse(e.added_at));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use zainflix_models::Movie;

    fn entry(id: u64, title: &str, rating: Option<f64>, year: Option<&str>) -> WatchListEntry {
        let mut movie = Movie::new(id);
        movie.title = Some(title.to_string());
        movie.vote_average = rating;
        movie.release_date = year.map(|y| format!("{y}-01-01"));
        WatchListEntry {
            movie,
            added_at: Utc.with_ymd_and_hms(2024, 1, id as u32, 0, 0, 0).unwrap(),
            added_from: "test".to_string(),
        }
    }

    #[test]
    fn test_alphabetical_is_case_insensitive() {
        let mut entries = vec![
            entry(1, "zebra", None, None),
            entry(2, "Apple", None, None),
            entry(3, "mango", None, None),
        ];
        sort_entries(&mut entries, SortOrder::Alphabetical);
        let titles: Vec<&str> = entries.iter().map(|e| e.movie.display_title()).collect();
        assert_eq!(titles, vec!["Apple", "mango", "zebra"]);
    }

    #[test]
    fn test_rating_descending_missing_is_zero() {
        let mut entries = vec![
            entry(1, "A", None, None),
            entry(2, "B", Some(8.2), None),
            entry(3, "C", Some(5.5), None),
        ];
        sort_entries(&mut entries, SortOrder::Rating);
        let ids: Vec<u64> = entries.iter().map(|e| e.movie.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_rating_sort_is_stable_for_equal_keys() {
        // Equal ratings keep insertion order
        let mut entries = vec![
            entry(1, "B", Some(5.0), None),
            entry(2, "A", Some(5.0), None),
        ];
        sort_entries(&mut entries, SortOrder::Rating);
        let titles: Vec<&str> = entries.iter().map(|e| e.movie.display_title()).collect();
        assert_eq!(titles, vec!["B", "A"]);
    }

    #[test]
    fn test_year_descending() {
        let mut entries = vec![
            entry(1, "A", None, Some("1999")),
            entry(2, "B", None, None),
            entry(3, "C", None, Some("2021")),
        ];
        sort_entries(&mut entries, SortOrder::Year);
        let ids: Vec<u64> = entries.iter().map(|e| e.movie.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_recent_most_recently_added_first() {
        let mut entries = vec![
            entry(1, "A", None, None),
            entry(3, "C", None, None),
            entry(2, "B", None, None),
        ];
        sort_entries(&mut entries, SortOrder::Recent);
        let ids: Vec<u64> = entries.iter().map(|e| e.movie.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
