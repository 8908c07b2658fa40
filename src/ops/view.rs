use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::model::{Task, TaskFilter, TaskSort};

/// Aggregate counts over a task list. `active + completed == total`
/// always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub overdue: usize,
}

/// Keep the tasks matching `filter`.
pub fn filter_tasks(tasks: &[Task], filter: TaskFilter) -> Vec<Task> {
    match filter {
        TaskFilter::All => tasks.to_vec(),
        TaskFilter::Active => tasks.iter().filter(|t| !t.completed).cloned().collect(),
        TaskFilter::Completed => tasks.iter().filter(|t| t.completed).cloned().collect(),
    }
}

/// Case-insensitive substring match over title or description. A blank
/// query passes every task through.
pub fn search_tasks(tasks: &[Task], query: &str) -> Vec<Task> {
    let query = query.trim();
    if query.is_empty() {
        return tasks.to_vec();
    }
    let query = query.to_lowercase();
    tasks
        .iter()
        .filter(|t| {
            t.title.to_lowercase().contains(&query)
                || t.description
                    .as_ref()
                    .is_some_and(|d| d.to_lowercase().contains(&query))
        })
        .cloned()
        .collect()
}

/// Order a task list without mutating the input. All sorts are stable:
/// ties keep their input order.
pub fn sort_tasks(tasks: &[Task], sort: TaskSort) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    match sort {
        TaskSort::Date => sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        TaskSort::DueDate => sorted.sort_by(|a, b| match (a.due_date, b.due_date) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
        TaskSort::Alphabetical => {
            sorted.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        }
    }
    sorted
}

/// The derived view in its fixed order: filter, then search, then sort.
pub fn visible_tasks(tasks: &[Task], filter: TaskFilter, query: &str, sort: TaskSort) -> Vec<Task> {
    sort_tasks(&search_tasks(&filter_tasks(tasks, filter), query), sort)
}

/// True iff the task has a due date, is not completed, and the due date
/// has passed. A completed task is never overdue.
pub fn is_overdue(task: &Task) -> bool {
    is_overdue_at(task, Utc::now())
}

pub fn is_overdue_at(task: &Task, now: DateTime<Utc>) -> bool {
    match task.due_date {
        Some(due) => !task.completed && due < now,
        None => false,
    }
}

pub fn task_stats(tasks: &[Task]) -> TaskStats {
    task_stats_at(tasks, Utc::now())
}

pub fn task_stats_at(tasks: &[Task], now: DateTime<Utc>) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.completed).count();
    let overdue = tasks.iter().filter(|t| is_overdue_at(t, now)).count();
    TaskStats {
        total,
        active: total - completed,
        completed,
        overdue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskDraft;
    use pretty_assertions::assert_eq;

    fn task(title: &str) -> Task {
        Task::from_draft(TaskDraft {
            title: title.into(),
            ..Default::default()
        })
    }

    fn done(title: &str) -> Task {
        let mut t = task(title);
        t.completed = true;
        t
    }

    fn due(title: &str, instant: &str) -> Task {
        let mut t = task(title);
        t.due_date = Some(instant.parse().unwrap());
        t
    }

    fn titles(tasks: &[Task]) -> Vec<String> {
        tasks.iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn filter_partitions_the_list() {
        let tasks = vec![task("a"), done("b"), task("c"), done("d")];

        let active = filter_tasks(&tasks, TaskFilter::Active);
        let completed = filter_tasks(&tasks, TaskFilter::Completed);
        assert_eq!(active.len() + completed.len(), tasks.len());
        assert_eq!(titles(&active), vec!["a", "c"]);
        assert_eq!(titles(&completed), vec!["b", "d"]);
        assert_eq!(filter_tasks(&tasks, TaskFilter::All).len(), tasks.len());
    }

    #[test]
    fn search_is_case_insensitive() {
        let tasks = vec![task("Buy Milk"), task("call mom")];
        assert_eq!(titles(&search_tasks(&tasks, "milk")), vec!["Buy Milk"]);
        assert_eq!(titles(&search_tasks(&tasks, "CALL")), vec!["call mom"]);
    }

    #[test]
    fn search_matches_descriptions_too() {
        let mut with_desc = task("errand");
        with_desc.description = Some("pick up the Dry Cleaning".into());
        let tasks = vec![with_desc, task("other")];
        assert_eq!(titles(&search_tasks(&tasks, "dry clean")), vec!["errand"]);
    }

    #[test]
    fn blank_query_passes_everything_through() {
        let tasks = vec![task("a"), task("b")];
        assert_eq!(search_tasks(&tasks, "").len(), 2);
        assert_eq!(search_tasks(&tasks, "   ").len(), 2);
    }

    #[test]
    fn sort_by_date_is_newest_first() {
        let mut old = task("old");
        old.created_at = "2025-01-01T00:00:00Z".parse().unwrap();
        let mut new = task("new");
        new.created_at = "2025-06-01T00:00:00Z".parse().unwrap();

        let sorted = sort_tasks(&[old, new], TaskSort::Date);
        assert_eq!(titles(&sorted), vec!["new", "old"]);
    }

    #[test]
    fn sort_by_due_date_puts_dateless_tasks_last() {
        let tasks = vec![
            task("no due 1"),
            due("later", "2025-07-01T00:00:00Z"),
            task("no due 2"),
            due("sooner", "2025-06-01T00:00:00Z"),
        ];

        let sorted = sort_tasks(&tasks, TaskSort::DueDate);
        assert_eq!(
            titles(&sorted),
            vec!["sooner", "later", "no due 1", "no due 2"]
        );
    }

    #[test]
    fn due_date_sort_is_stable_for_dateless_tasks() {
        let sorted = sort_tasks(&[task("B"), task("A")], TaskSort::DueDate);
        assert_eq!(titles(&sorted), vec!["B", "A"]);
    }

    #[test]
    fn alphabetical_sort_folds_case() {
        let sorted = sort_tasks(
            &[task("banana"), task("Apple"), task("cherry")],
            TaskSort::Alphabetical,
        );
        assert_eq!(titles(&sorted), vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn sort_does_not_mutate_its_input() {
        let tasks = vec![task("b"), task("a")];
        let _ = sort_tasks(&tasks, TaskSort::Alphabetical);
        assert_eq!(titles(&tasks), vec!["b", "a"]);
    }

    #[test]
    fn visible_tasks_filters_searches_then_sorts() {
        let tasks = vec![
            done("beta report"),
            task("alpha report"),
            task("gamma report"),
            task("unrelated"),
        ];

        let visible = visible_tasks(&tasks, TaskFilter::Active, "report", TaskSort::Alphabetical);
        assert_eq!(titles(&visible), vec!["alpha report", "gamma report"]);
    }

    #[test]
    fn overdue_needs_a_past_due_date_and_an_open_task() {
        let now: DateTime<Utc> = "2025-06-15T12:00:00Z".parse().unwrap();

        assert!(is_overdue_at(&due("past", "2025-06-01T00:00:00Z"), now));
        assert!(!is_overdue_at(&due("future", "2025-07-01T00:00:00Z"), now));
        assert!(!is_overdue_at(&task("no due date"), now));

        // Completed tasks are never overdue, however old the date
        let mut finished = due("finished", "2020-01-01T00:00:00Z");
        finished.completed = true;
        assert!(!is_overdue_at(&finished, now));
    }

    #[test]
    fn overdue_is_a_strict_comparison() {
        let now: DateTime<Utc> = "2025-06-15T12:00:00Z".parse().unwrap();
        assert!(!is_overdue_at(&due("exact", "2025-06-15T12:00:00Z"), now));
    }

    #[test]
    fn stats_counts_add_up() {
        let now: DateTime<Utc> = "2025-06-15T12:00:00Z".parse().unwrap();
        let tasks = vec![
            task("open"),
            done("closed"),
            due("late", "2025-06-01T00:00:00Z"),
        ];

        let stats = task_stats_at(&tasks, now);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.active + stats.completed, stats.total);
    }

    #[test]
    fn stats_on_empty_list_are_zero() {
        assert_eq!(task_stats(&[]), TaskStats::default());
    }
}
