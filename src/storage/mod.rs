//! Storage abstraction for `issue_tracker`.
//!
//! The issue store only needs a mapping from project name to [`Project`]
//! plus a registry of issued ids. Two backends implement it:
//!
//! - [`MemoryStore`]: `HashMap` behind an `RwLock`, for tests and ephemeral runs
//! - [`SqliteStore`]: `rusqlite`, durable, one transaction per save
//!
//! Backends synchronize their own state, so every method takes `&self`.
//! [`ProjectStore::mutate_project`] is the unit of atomicity: the backend
//! holds the project exclusively from the read to the write, across
//! threads and (for `SQLite`) across processes sharing one database file.

mod memory;
pub mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::model::Project;

/// Read-modify-write step over one project.
///
/// Receives the stored project (`None` if it does not exist) and returns the
/// project to store, or `None` to leave the store untouched.
pub type ProjectMutation<'a> = dyn FnMut(Option<Project>) -> Result<Option<Project>> + 'a;

/// Project-keyed persistence.
pub trait ProjectStore: Send + Sync {
    /// Load a project with its issues in stored order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    fn load_project(&self, name: &str) -> Result<Option<Project>>;

    /// Insert or fully replace a project and its issue sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails; nothing is written then.
    fn save_project(&self, project: &Project) -> Result<()>;

    /// Run `mutation` on one project as a single atomic step.
    ///
    /// No other mutation of the same project can interleave between the
    /// read and the write. The mutation runs exactly once and must not call
    /// back into the store.
    ///
    /// # Errors
    ///
    /// Returns the mutation's error or a backend error; nothing is written then.
    fn mutate_project(&self, name: &str, mutation: &mut ProjectMutation<'_>) -> Result<()>;

    /// Names of all stored projects, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    fn project_names(&self) -> Result<Vec<String>>;

    /// Atomically claim an id. Returns `false` if it was ever issued before.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    fn reserve_id(&self, id: &str) -> Result<bool>;

    /// Whether an id was ever issued (deleted issues included).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    fn id_issued(&self, id: &str) -> Result<bool>;
}

impl<S: ProjectStore + ?Sized> ProjectStore for Box<S> {
    fn load_project(&self, name: &str) -> Result<Option<Project>> {
        (**self).load_project(name)
    }

    fn save_project(&self, project: &Project) -> Result<()> {
        (**self).save_project(project)
    }

    fn mutate_project(&self, name: &str, mutation: &mut ProjectMutation<'_>) -> Result<()> {
        (**self).mutate_project(name, mutation)
    }

    fn project_names(&self) -> Result<Vec<String>> {
        (**self).project_names()
    }

    fn reserve_id(&self, id: &str) -> Result<bool> {
        (**self).reserve_id(id)
    }

    fn id_issued(&self, id: &str) -> Result<bool> {
        (**self).id_issued(id)
    }
}
