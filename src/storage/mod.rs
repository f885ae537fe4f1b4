pub mod json_backend;

use uuid::Uuid;

use crate::errors::ScheduleError;
use crate::schedule::{HistorySnapshot, PlanGroup};

pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Abstraction over persistence collaborators capable of storing plan
/// groups and their append-only audit history.
pub trait GroupStore: Send + Sync {
    fn load(&self, group_id: Uuid) -> Result<PlanGroup>;
    fn save(&self, group: &PlanGroup) -> Result<()>;

    /// Persists the group and, on the edit path, its preceding snapshot as
    /// one unit: a reader must never observe the new plan without its
    /// snapshot, or the snapshot applied to a stale plan.
    fn commit(&self, group: &PlanGroup, snapshot: Option<&HistorySnapshot>) -> Result<()>;

    /// All snapshots for the group, newest first.
    fn history(&self, group_id: Uuid) -> Result<Vec<HistorySnapshot>>;

    fn list_groups(&self) -> Result<Vec<Uuid>>;
}

pub use json_backend::JsonStorage;
