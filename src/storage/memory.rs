//! In-memory storage backend.

use crate::error::Result;
use crate::model::Project;
use crate::storage::{ProjectMutation, ProjectStore};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};

/// Ephemeral project store.
///
/// Each project sits behind its own `Mutex`, so mutations of different
/// projects run in parallel. Slots exist only for stored projects.
#[derive(Debug, Default)]
pub struct MemoryStore {
    projects: RwLock<HashMap<String, Arc<Mutex<Project>>>>,
    issued: Mutex<HashSet<String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, name: &str) -> Result<Option<Arc<Mutex<Project>>>> {
        Ok(self.projects.read()?.get(name).cloned())
    }

    fn register_ids(&self, project: &Project) -> Result<()> {
        let mut issued = self.issued.lock()?;
        for issue in &project.issues {
            issued.insert(issue.id.clone());
        }
        Ok(())
    }
}

impl ProjectStore for MemoryStore {
    fn load_project(&self, name: &str) -> Result<Option<Project>> {
        match self.slot(name)? {
            Some(slot) => Ok(Some(slot.lock()?.clone())),
            None => Ok(None),
        }
    }

    fn save_project(&self, project: &Project) -> Result<()> {
        tracing::trace!(
            project = %project.project_name,
            issues = project.issues.len(),
            "Saving project (memory)"
        );
        self.mutate_project(&project.project_name, &mut |_| Ok(Some(project.clone())))
    }

    fn mutate_project(&self, name: &str, mutation: &mut ProjectMutation<'_>) -> Result<()> {
        loop {
            if let Some(slot) = self.slot(name)? {
                let mut current = slot.lock()?;
                if let Some(updated) = mutation(Some(current.clone()))? {
                    self.register_ids(&updated)?;
                    *current = updated;
                }
                return Ok(());
            }

            let mut projects = self.projects.write()?;
            if projects.contains_key(name) {
                // Created between the read and the write lock.
                continue;
            }
            if let Some(created) = mutation(None)? {
                self.register_ids(&created)?;
                projects.insert(name.to_string(), Arc::new(Mutex::new(created)));
            }
            return Ok(());
        }
    }

    fn project_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.projects.read()?.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn reserve_id(&self, id: &str) -> Result<bool> {
        Ok(self.issued.lock()?.insert(id.to_string()))
    }

    fn id_issued(&self, id: &str) -> Result<bool> {
        Ok(self.issued.lock()?.contains(id))
    }
}
