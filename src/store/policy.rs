use chrono::NaiveDate;

use crate::io::kv_store::KeyValueStore;
use crate::io::persist::{self, GLOBAL_SUBJECTS_KEY, planner_key};
use crate::model::planner::DailyPlannerData;

/// A mutation that has been applied to the in-memory aggregate
#[derive(Debug, Clone, Copy)]
pub struct Commit<'a> {
    pub date: NaiveDate,
    pub data: &'a DailyPlannerData,
    /// The subject list changed, so the global subject list is stale
    pub subjects_changed: bool,
}

/// Runs after every committed mutation. Decides when and what to write.
pub trait PersistPolicy {
    fn after_commit(&mut self, kv: &mut dyn KeyValueStore, commit: &Commit<'_>);
}

/// Save the whole aggregate (and the global subjects when they changed)
/// synchronously on every commit.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteThrough;

impl PersistPolicy for WriteThrough {
    fn after_commit(&mut self, kv: &mut dyn KeyValueStore, commit: &Commit<'_>) {
        persist::save(kv, &planner_key(commit.date), commit.data);
        if commit.subjects_changed {
            persist::save(kv, GLOBAL_SUBJECTS_KEY, &commit.data.subjects);
        }
    }
}
