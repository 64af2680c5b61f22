//! Property-based tests for mutation/undo inverses.
//!
//! Every undoable operation followed by one undo must restore the exact task
//! list it started from, and rejected operations must leave both the list and
//! the history untouched.

use proptest::prelude::*;

use super::list::{Outcome, Skip, TodoList};
use super::task::Task;

// ──────────────────── strategies ────────────────────

fn arb_task() -> impl Strategy<Value = Task> {
    ("[a-z ]{0,12}", any::<bool>()).prop_map(|(text, completed)| Task { text, completed })
}

fn arb_tasks() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(arb_task(), 0..16)
}

fn arb_nonempty_with_index() -> impl Strategy<Value = (Vec<Task>, usize)> {
    prop::collection::vec(arb_task(), 1..16).prop_flat_map(|tasks| {
        let len = tasks.len();
        (Just(tasks), 0..len)
    })
}

#[derive(Debug, Clone)]
enum Op {
    Add(String),
    Delete(usize),
    Edit(usize, String),
    Toggle(usize),
    MarkAll,
    UnmarkAll,
    Sort,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[a-z]{0,6}".prop_map(Op::Add),
        (0usize..20).prop_map(Op::Delete),
        (0usize..20, "[a-z]{0,6}").prop_map(|(i, t)| Op::Edit(i, t)),
        (0usize..20).prop_map(Op::Toggle),
        Just(Op::MarkAll),
        Just(Op::UnmarkAll),
        Just(Op::Sort),
    ]
}

fn apply(list: &mut TodoList, op: &Op) -> bool {
    match op {
        Op::Add(text) => list.add_task(text.clone()).changed(),
        Op::Delete(i) => list.delete_task(*i).is_ok_and(|o| o.changed()),
        Op::Edit(i, text) => list.edit_task(*i, text.clone()).is_ok_and(|o| o.changed()),
        Op::Toggle(i) => list.toggle_task(*i).is_ok_and(|o| o.changed()),
        Op::MarkAll => list.mark_all().changed(),
        Op::UnmarkAll => list.unmark_all().changed(),
        Op::Sort => list.sort_by_completed().changed(),
    }
}

// ──────────────────── properties ────────────────────

proptest! {
    #[test]
    fn add_then_undo_restores(tasks in arb_tasks(), text in "[a-z ]{0,12}") {
        let mut list = TodoList::from_tasks(tasks.clone());
        prop_assert!(list.add_task(text).changed());
        prop_assert!(list.undo().expect("undo add").changed());
        prop_assert_eq!(list.tasks(), tasks.as_slice());
    }

    #[test]
    fn delete_then_undo_restores((tasks, index) in arb_nonempty_with_index()) {
        let mut list = TodoList::from_tasks(tasks.clone());
        let removed = tasks[index].clone();
        prop_assert!(list.delete_task(index).expect("valid index").changed());
        prop_assert!(list.undo().expect("undo delete").changed());
        prop_assert_eq!(&list.tasks()[index], &removed);
        prop_assert_eq!(list.tasks(), tasks.as_slice());
    }

    #[test]
    fn edit_then_undo_restores(
        (tasks, index) in arb_nonempty_with_index(),
        text in "[a-z]{1,8}",
    ) {
        let mut list = TodoList::from_tasks(tasks.clone());
        prop_assert!(list.edit_task(index, text).expect("valid index").changed());
        prop_assert_eq!(list.tasks()[index].completed, tasks[index].completed);
        prop_assert!(list.undo().expect("undo edit").changed());
        prop_assert_eq!(list.tasks(), tasks.as_slice());
    }

    #[test]
    fn toggle_then_undo_restores((tasks, index) in arb_nonempty_with_index()) {
        let mut list = TodoList::from_tasks(tasks.clone());
        prop_assert!(list.toggle_task(index).expect("valid index").changed());
        prop_assert!(list.undo().expect("undo toggle").changed());
        prop_assert_eq!(list.tasks(), tasks.as_slice());
    }

    #[test]
    fn mark_all_is_one_atomic_action(tasks in arb_tasks()) {
        let pending = tasks.iter().filter(|t| !t.completed).count();
        let mut list = TodoList::from_tasks(tasks.clone());
        let outcome = list.mark_all();
        if pending == 0 {
            prop_assert_eq!(outcome, Outcome::Skipped(Skip::AllCompleted));
            prop_assert!(list.history().is_empty());
        } else {
            prop_assert_eq!(outcome, Outcome::Applied { affected: pending });
            prop_assert_eq!(list.history().len(), 1);
            prop_assert!(list.tasks().iter().all(|t| t.completed));
            prop_assert!(list.undo().expect("undo batch").changed());
            prop_assert_eq!(list.tasks(), tasks.as_slice());
        }
    }

    #[test]
    fn sort_is_idempotent_and_stable(tasks in arb_tasks()) {
        let mut list = TodoList::from_tasks(tasks.clone());
        let first = list.sort_by_completed();
        let recorded = list.history().len();
        prop_assert_eq!(recorded, usize::from(first.changed()));
        prop_assert_eq!(list.sort_by_completed(), Outcome::Skipped(Skip::AlreadySorted));
        prop_assert_eq!(list.history().len(), recorded);

        let expected: Vec<Task> = tasks
            .iter()
            .filter(|t| t.completed)
            .chain(tasks.iter().filter(|t| !t.completed))
            .cloned()
            .collect();
        prop_assert_eq!(list.tasks(), expected.as_slice());
    }

    #[test]
    fn out_of_range_is_rejected_without_side_effects(tasks in arb_tasks(), extra in 0usize..4) {
        let mut list = TodoList::from_tasks(tasks.clone());
        let index = tasks.len() + extra;
        prop_assert!(list.delete_task(index).is_err());
        prop_assert!(list.edit_task(index, "x").is_err());
        prop_assert!(list.toggle_task(index).is_err());
        prop_assert_eq!(list.tasks(), tasks.as_slice());
        prop_assert!(list.history().is_empty());
    }

    #[test]
    fn undoing_every_change_returns_to_start(
        tasks in arb_tasks(),
        ops in prop::collection::vec(arb_op(), 0..24),
    ) {
        let mut list = TodoList::from_tasks(tasks.clone());
        let mut changes = 0usize;
        for op in &ops {
            if apply(&mut list, op) {
                changes += 1;
            }
        }
        prop_assert_eq!(list.history().len(), changes);
        for _ in 0..changes {
            prop_assert!(list.undo().expect("consistent log").changed());
        }
        let nothing = list.undo().expect("empty log");
        prop_assert_eq!(nothing, Outcome::Skipped(Skip::NothingToUndo));
        prop_assert_eq!(list.tasks(), tasks.as_slice());
    }
}
