use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use uuid::Uuid;

use crate::errors::ScheduleError;
use crate::schedule::{sort_newest_first, HistorySnapshot, PlanGroup};
use crate::utils::paths;

use super::{GroupStore, Result};

const FILE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";
const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%6f";

/// File-per-group JSON persistence. Group writes go through a tmp file and
/// an atomic rename; history snapshots are append-only files under
/// `history/<group_id>/` and are never rewritten.
#[derive(Clone)]
pub struct JsonStorage {
    groups_dir: PathBuf,
    history_dir: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let base = root.unwrap_or_else(paths::app_data_dir);
        let groups_dir = paths::groups_dir_in(&base);
        let history_dir = paths::history_dir_in(&base);
        ensure_dir(&groups_dir)?;
        ensure_dir(&history_dir)?;
        Ok(Self {
            groups_dir,
            history_dir,
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn group_path(&self, group_id: Uuid) -> PathBuf {
        self.groups_dir
            .join(format!("{}.{}", group_id, FILE_EXTENSION))
    }

    fn group_history_dir(&self, group_id: Uuid) -> PathBuf {
        self.history_dir.join(group_id.to_string())
    }

    fn snapshot_path(&self, snapshot: &HistorySnapshot) -> PathBuf {
        let stamp = snapshot.recorded_at.format(SNAPSHOT_TIMESTAMP_FORMAT);
        self.group_history_dir(snapshot.group_id).join(format!(
            "{}_{}.{}",
            stamp,
            snapshot.kind.label(),
            FILE_EXTENSION
        ))
    }

    fn write_snapshot(&self, snapshot: &HistorySnapshot) -> Result<PathBuf> {
        let path = self.snapshot_path(snapshot);
        if path.exists() {
            return Err(ScheduleError::Storage(format!(
                "history snapshot `{}` already exists",
                path.display()
            )));
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        write_atomic(&path, &json)?;
        Ok(path)
    }
}

impl GroupStore for JsonStorage {
    fn load(&self, group_id: Uuid) -> Result<PlanGroup> {
        let path = self.group_path(group_id);
        if !path.exists() {
            return Err(ScheduleError::UnknownGroup(group_id));
        }
        let data = fs::read_to_string(&path)?;
        let group: PlanGroup = serde_json::from_str(&data)?;
        Ok(group)
    }

    fn save(&self, group: &PlanGroup) -> Result<()> {
        let json = serde_json::to_string_pretty(group)?;
        write_atomic(&self.group_path(group.id), &json)?;
        Ok(())
    }

    fn commit(&self, group: &PlanGroup, snapshot: Option<&HistorySnapshot>) -> Result<()> {
        // Snapshot lands before the group swap and is rolled back when the
        // swap fails, so readers never observe either half alone.
        let staged = match snapshot {
            Some(snapshot) => {
                if snapshot.group_id != group.id {
                    return Err(ScheduleError::Storage(format!(
                        "snapshot belongs to group {}, not {}",
                        snapshot.group_id, group.id
                    )));
                }
                Some(self.write_snapshot(snapshot)?)
            }
            None => None,
        };
        if let Err(err) = self.save(group) {
            if let Some(path) = staged {
                let _ = fs::remove_file(path);
            }
            return Err(err);
        }
        Ok(())
    }

    fn history(&self, group_id: Uuid) -> Result<Vec<HistorySnapshot>> {
        let dir = self.group_history_dir(group_id);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut snapshots = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            let contents = match fs::read_to_string(&path) {
                Ok(value) => value,
                Err(_) => continue,
            };
            let snapshot: HistorySnapshot = match serde_json::from_str(&contents) {
                Ok(snapshot) => snapshot,
                Err(_) => continue,
            };
            snapshots.push(snapshot);
        }
        sort_newest_first(&mut snapshots);
        Ok(snapshots)
    }

    fn list_groups(&self) -> Result<Vec<Uuid>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.groups_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            let stem = match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(stem) => stem,
                None => continue,
            };
            if let Ok(id) = stem.parse::<Uuid>() {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}

fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
