//! The planner store: the active date's aggregate plus write-through persistence.
//!
//! Entity logic lives in [`crate::ops::planner_ops`]; the store applies those
//! functions to its aggregate and then hands the result to a
//! [`PersistPolicy`]. Storage problems never reach the caller.

mod policy;

pub use policy::{Commit, PersistPolicy, WriteThrough};

use chrono::NaiveDate;

use crate::io::kv_store::KeyValueStore;
use crate::io::persist::{self, GLOBAL_SUBJECTS_KEY, planner_key};
use crate::model::planner::{
    BlockPatch, DailyInfoPatch, DailyPlannerData, NewTimelineBlock, Subject, SubjectPatch,
    TimelineBlock, Todo, TodoPatch,
};
use crate::ops::planner_ops::{self, PlannerError, new_id};

/// Load one date's aggregate, seeding an empty subject list from the
/// global list.
pub fn load_day<S: KeyValueStore + ?Sized>(kv: &S, date: NaiveDate) -> DailyPlannerData {
    let mut data = persist::load(kv, &planner_key(date), DailyPlannerData::empty(date));
    if data.daily_info.date != date {
        tracing::warn!(
            %date,
            stored = %data.daily_info.date,
            "stored aggregate carries another date, correcting"
        );
        data.daily_info.date = date;
    }
    if data.subjects.is_empty() {
        let global: Vec<Subject> = persist::load(kv, GLOBAL_SUBJECTS_KEY, Vec::new());
        if !global.is_empty() {
            tracing::debug!(%date, count = global.len(), "seeding subjects from global list");
            data.subjects = global;
        }
    }
    data
}

pub struct PlannerStore<S: KeyValueStore> {
    kv: S,
    policy: Box<dyn PersistPolicy>,
    data: DailyPlannerData,
    generation: u64,
}

impl<S: KeyValueStore> PlannerStore<S> {
    /// Open the store on `date` with write-through persistence
    pub fn open(kv: S, date: NaiveDate) -> Self {
        Self::with_policy(kv, date, Box::new(WriteThrough))
    }

    pub fn with_policy(kv: S, date: NaiveDate, policy: Box<dyn PersistPolicy>) -> Self {
        let data = load_day(&kv, date);
        PlannerStore {
            kv,
            policy,
            data,
            generation: 0,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.data.date()
    }

    pub fn data(&self) -> &DailyPlannerData {
        &self.data
    }

    /// Bumped on every date change; dependents drop editor state when it moves
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    pub fn into_kv(self) -> S {
        self.kv
    }

    /// Switch the active date and reload its aggregate.
    pub fn change_date(&mut self, date: NaiveDate) {
        tracing::debug!(from = %self.data.date(), to = %date, "changing date");
        self.data = load_day(&self.kv, date);
        self.generation += 1;
    }

    fn commit(&mut self, subjects_changed: bool) {
        let commit = Commit {
            date: self.data.date(),
            data: &self.data,
            subjects_changed,
        };
        self.policy.after_commit(&mut self.kv, &commit);
    }

    /// Log a rejected update/delete; these leave the aggregate untouched.
    fn skip(&self, op: &str, err: PlannerError) {
        tracing::debug!(op, error = %err, "ignored");
    }

    // -----------------------------------------------------------------------
    // Daily info
    // -----------------------------------------------------------------------

    pub fn update_daily_info(&mut self, patch: DailyInfoPatch) {
        planner_ops::update_daily_info(&mut self.data, patch);
        self.commit(false);
    }

    // -----------------------------------------------------------------------
    // Subjects
    // -----------------------------------------------------------------------

    /// Add a subject. Callers reject blank names before calling.
    pub fn add_subject(&mut self, name: &str) -> Subject {
        let subject = planner_ops::add_subject(&mut self.data, new_id(), name.to_string());
        tracing::info!(id = %subject.id, name = %subject.name, color = %subject.color, "subject added");
        self.commit(true);
        subject
    }

    pub fn update_subject(&mut self, id: &str, patch: SubjectPatch) {
        match planner_ops::update_subject(&mut self.data, id, patch) {
            Ok(()) => self.commit(true),
            Err(e) => self.skip("update_subject", e),
        }
    }

    pub fn delete_subject(&mut self, id: &str) {
        match planner_ops::delete_subject(&mut self.data, id) {
            Ok(removed) => {
                tracing::info!(id, todos = removed.len(), "subject deleted");
                self.commit(true);
            }
            Err(e) => self.skip("delete_subject", e),
        }
    }

    // -----------------------------------------------------------------------
    // Todos
    // -----------------------------------------------------------------------

    pub fn add_todo(&mut self, subject_id: &str, content: &str) -> Result<Todo, PlannerError> {
        let todo = planner_ops::add_todo(&mut self.data, new_id(), subject_id, content.to_string())?;
        tracing::info!(id = %todo.id, subject = subject_id, "todo added");
        self.commit(false);
        Ok(todo)
    }

    pub fn update_todo(&mut self, id: &str, patch: TodoPatch) {
        match planner_ops::update_todo(&mut self.data, id, patch) {
            Ok(()) => self.commit(false),
            Err(e) => self.skip("update_todo", e),
        }
    }

    pub fn toggle_todo_complete(&mut self, id: &str) {
        match planner_ops::toggle_todo_complete(&mut self.data, id) {
            Ok(done) => {
                tracing::debug!(id, done, "todo toggled");
                self.commit(false);
            }
            Err(e) => self.skip("toggle_todo_complete", e),
        }
    }

    pub fn delete_todo(&mut self, id: &str) {
        match planner_ops::delete_todo(&mut self.data, id) {
            Ok(()) => {
                tracing::info!(id, "todo deleted");
                self.commit(false);
            }
            Err(e) => self.skip("delete_todo", e),
        }
    }

    // -----------------------------------------------------------------------
    // Timeline blocks
    // -----------------------------------------------------------------------

    pub fn add_timeline_block(&mut self, new: NewTimelineBlock) -> TimelineBlock {
        let block = planner_ops::add_timeline_block(&mut self.data, new_id(), new);
        tracing::info!(
            id = %block.id,
            kind = block.kind.label(),
            start = block.start_time,
            end = block.end_time,
            "timeline block added"
        );
        self.commit(false);
        block
    }

    pub fn update_timeline_block(&mut self, id: &str, patch: BlockPatch) {
        match planner_ops::update_timeline_block(&mut self.data, id, patch) {
            Ok(()) => self.commit(false),
            Err(e) => self.skip("update_timeline_block", e),
        }
    }

    pub fn delete_timeline_block(&mut self, id: &str) {
        match planner_ops::delete_timeline_block(&mut self.data, id) {
            Ok(()) => {
                tracing::info!(id, "timeline block deleted");
                self.commit(false);
            }
            Err(e) => self.skip("delete_timeline_block", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::kv_store::{MemoryStore, StoreError};
    use crate::model::planner::BlockKind;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// Records every key written through it
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        writes: Vec<String>,
    }

    impl KeyValueStore for CountingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            self.writes.push(key.to_string());
            self.inner.set(key, value)
        }

        fn keys(&self) -> Result<Vec<String>, StoreError> {
            self.inner.keys()
        }
    }

    /// Writes nothing, remembers what it was handed
    struct Recording(Rc<RefCell<Vec<(NaiveDate, bool)>>>);

    impl PersistPolicy for Recording {
        fn after_commit(&mut self, _kv: &mut dyn KeyValueStore, commit: &Commit<'_>) {
            self.0.borrow_mut().push((commit.date, commit.subjects_changed));
        }
    }

    #[test]
    fn every_mutation_writes_the_date_key() {
        let mut store = PlannerStore::open(CountingStore::default(), date("2026-01-24"));
        let subject = store.add_subject("Math");
        let todo = store.add_todo(&subject.id, "Chapter 1").unwrap();
        store.toggle_todo_complete(&todo.id);
        store.update_daily_info(DailyInfoPatch {
            daily_quote: Some("hi".into()),
            ..Default::default()
        });

        let writes = &store.kv().writes;
        assert_eq!(
            writes,
            &vec![
                "daily-planner-2026-01-24".to_string(),
                "daily-planner-subjects".to_string(),
                "daily-planner-2026-01-24".to_string(),
                "daily-planner-2026-01-24".to_string(),
                "daily-planner-2026-01-24".to_string(),
            ]
        );
    }

    #[test]
    fn unknown_ids_do_not_write() {
        let mut store = PlannerStore::open(CountingStore::default(), date("2026-01-24"));
        store.delete_todo("nope");
        store.update_subject("nope", SubjectPatch::default());
        store.delete_timeline_block("nope");
        store.toggle_todo_complete("nope");
        assert!(store.kv().writes.is_empty());
    }

    #[test]
    fn policy_is_swappable() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut store = PlannerStore::with_policy(
            MemoryStore::new(),
            date("2026-01-24"),
            Box::new(Recording(log.clone())),
        );
        let s = store.add_subject("Math");
        store.add_todo(&s.id, "Ch 1").unwrap();
        assert_eq!(
            *log.borrow(),
            vec![(date("2026-01-24"), true), (date("2026-01-24"), false)]
        );
        assert!(store.kv().keys().unwrap().is_empty());
    }

    #[test]
    fn new_date_is_seeded_from_global_subjects() {
        let mut store = PlannerStore::open(MemoryStore::new(), date("2026-01-24"));
        let math = store.add_subject("Math");
        store.add_todo(&math.id, "Ch 1").unwrap();

        store.change_date(date("2026-01-25"));
        assert_eq!(store.generation(), 1);
        assert_eq!(store.data().subjects, vec![math.clone()]);
        assert!(store.data().todos.is_empty());

        // The seeded list is not persisted until something changes
        assert!(store.kv().get("daily-planner-2026-01-25").unwrap().is_none());
    }

    #[test]
    fn existing_subjects_are_not_overwritten_by_seeding() {
        let mut store = PlannerStore::open(MemoryStore::new(), date("2026-01-24"));
        store.add_subject("Math");
        store.change_date(date("2026-01-25"));
        store.add_subject("English");
        // The global list now holds Math + English; go back to the 24th
        store.change_date(date("2026-01-24"));
        let names: Vec<&str> = store.data().subjects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Math"]);
    }

    #[test]
    fn storage_failure_keeps_in_memory_state() {
        let mut store = PlannerStore::open(MemoryStore::with_quota(16), date("2026-01-24"));
        let s = store.add_subject("Math");
        store.add_todo(&s.id, "Ch 1").unwrap();
        assert_eq!(store.data().todos.len(), 1);
        assert!(store.kv().keys().unwrap().is_empty());
    }

    #[test]
    fn mismatched_stored_date_is_corrected() {
        let mut kv = MemoryStore::new();
        let other = DailyPlannerData::empty(date("2020-01-01"));
        persist::save(&mut kv, "daily-planner-2026-01-24", &other);
        let store = PlannerStore::open(kv, date("2026-01-24"));
        assert_eq!(store.date(), date("2026-01-24"));
    }

    #[test]
    fn block_lifecycle() {
        let mut store = PlannerStore::open(MemoryStore::new(), date("2026-01-24"));
        let block = store.add_timeline_block(NewTimelineBlock {
            todo_id: None,
            subject_id: None,
            start_time: 540,
            end_time: 600,
            kind: BlockKind::Done,
            label: Some("Reading".into()),
            color: None,
            cell_start: Some(1),
            cell_span: Some(4),
        });
        store.update_timeline_block(
            &block.id,
            BlockPatch {
                cell_span: Some(5),
                ..Default::default()
            },
        );
        assert_eq!(store.data().block(&block.id).unwrap().lanes(), (1, 5));
        store.delete_timeline_block(&block.id);
        assert!(store.data().timeline_blocks.is_empty());
    }
}
