// Ordering rules for the sorted todo view

use crate::models::{SortMode, Todo};
use feruca::{Collator, Locale, Tailoring};
use std::cmp::Ordering;

/// Return a freshly ordered copy of `todos`; the input slice is never reordered.
///
/// The sort is stable, so records that compare equal keep their stored order.
pub fn sorted(todos: &[Todo], mode: SortMode) -> Vec<Todo> {
    let mut collator = title_collator();
    let mut view = todos.to_vec();
    view.sort_by(|a, b| compare(&mut collator, a, b, mode));
    view
}

/// Compare two todos under the given sort mode
pub fn compare(collator: &mut Collator, a: &Todo, b: &Todo, mode: SortMode) -> Ordering {
    match mode {
        SortMode::Title => collator.collate(a.title.as_str(), b.title.as_str()),
        SortMode::StartTime => compare_start_times(a.start_time, b.start_time),
        SortMode::Status => a.status.rank().cmp(&b.status.rank()),
        SortMode::CreatedAt => b.created_at.cmp(&a.created_at),
    }
}

/// Collator for titles: CLDR root order, punctuation not ignored.
///
/// Identical strings compare `Equal`, which keeps the sort stable for duplicate titles.
pub fn title_collator() -> Collator {
    Collator::new(Tailoring::Cldr(Locale::Root), false, true)
}

/// Locale-aware title comparison
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    title_collator().collate(a, b)
}

/// Scheduled todos first in chronological order, unscheduled ones last
pub fn compare_start_times(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TodoStatus;
    use chrono::{TimeZone, Utc};

    fn todo(id: &str, title: &str) -> Todo {
        Todo {
            id: id.to_string(),
            title: title.to_string(),
            subtitle: None,
            description: None,
            start_time: None,
            end_time: None,
            status: TodoStatus::Waiting,
            created_at: 1000,
            updated_at: 1000,
        }
    }

    fn ids(view: &[Todo]) -> Vec<&str> {
        view.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_sort_by_title_ignores_case() {
        let todos = vec![todo("b", "Banana"), todo("a", "apple"), todo("c", "Cherry")];

        let view = sorted(&todos, SortMode::Title);
        let titles: Vec<&str> = view.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["apple", "Banana", "Cherry"]);
    }

    #[test]
    fn test_sort_by_title_is_stable_for_equal_titles() {
        let todos = vec![todo("1", "Same"), todo("2", "Other"), todo("3", "Same")];

        let view = sorted(&todos, SortMode::Title);
        assert_eq!(ids(&view), vec!["2", "1", "3"]);
    }

    #[test]
    fn test_compare_titles_lowercase_first_on_case_tie() {
        assert_eq!(compare_titles("apple", "Apple"), Ordering::Less);
        assert_eq!(compare_titles("Apple", "apple"), Ordering::Greater);
        assert_eq!(compare_titles("app", "apple"), Ordering::Less);
        assert_eq!(compare_titles("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_compare_titles_accents_and_punctuation() {
        assert_eq!(compare_titles("éclair", "fig"), Ordering::Less);
        assert_eq!(compare_titles("Émile", "Fred"), Ordering::Less);
        assert_eq!(compare_titles("eclair", "éclair"), Ordering::Less);
        assert_eq!(compare_titles("_x", "1x"), Ordering::Less);
        assert_eq!(compare_titles("1x", "apple"), Ordering::Less);
    }

    #[test]
    fn test_sort_by_title_with_accented_titles() {
        let todos = vec![
            todo("f", "fig"),
            todo("z", "Zebra"),
            todo("e", "éclair"),
            todo("a", "Apple"),
            todo("d", "date"),
        ];

        let view = sorted(&todos, SortMode::Title);
        assert_eq!(ids(&view), vec!["a", "d", "e", "f", "z"]);
    }

    #[test]
    fn test_sort_by_start_time_puts_unscheduled_last() {
        let jan1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap().timestamp_millis();
        let jan2 = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap().timestamp_millis();

        let mut none = todo("none", "A");
        none.start_time = None;
        let mut second = todo("jan2", "B");
        second.start_time = Some(jan2);
        let mut first = todo("jan1", "C");
        first.start_time = Some(jan1);

        let view = sorted(&[none, second, first], SortMode::StartTime);
        assert_eq!(ids(&view), vec!["jan1", "jan2", "none"]);
    }

    #[test]
    fn test_sort_by_status_groups_and_keeps_order() {
        let statuses = [
            ("d1", TodoStatus::Done),
            ("w1", TodoStatus::Waiting),
            ("p1", TodoStatus::Progress),
            ("w2", TodoStatus::Waiting),
            ("d2", TodoStatus::Done),
            ("p2", TodoStatus::Progress),
        ];
        let todos: Vec<Todo> = statuses
            .iter()
            .map(|(id, status)| {
                let mut t = todo(id, id);
                t.status = *status;
                t
            })
            .collect();

        let view = sorted(&todos, SortMode::Status);
        assert_eq!(ids(&view), vec!["w1", "w2", "p1", "p2", "d1", "d2"]);
    }

    #[test]
    fn test_sort_by_created_at_newest_first() {
        let mut old = todo("old", "x");
        old.created_at = 1000;
        let mut new = todo("new", "y");
        new.created_at = 3000;
        let mut mid = todo("mid", "z");
        mid.created_at = 2000;

        let view = sorted(&[old, new, mid], SortMode::CreatedAt);
        assert_eq!(ids(&view), vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_sorted_does_not_reorder_input() {
        let todos = vec![todo("b", "Banana"), todo("a", "apple")];
        let _ = sorted(&todos, SortMode::Title);
        assert_eq!(ids(&todos), vec!["b", "a"]);
    }
}
