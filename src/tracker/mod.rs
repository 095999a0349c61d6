//! The issue store: create, list, update and delete issues per project.
//!
//! Every write runs its locate → mutate → persist sequence inside one
//! [`ProjectStore::mutate_project`] step, so two writers on the same
//! project never work from the same snapshot. Different projects never
//! wait on each other in the memory backend.

use crate::error::{Result, TrackerError};
use crate::filter::IssueFilter;
use crate::model::{Ack, Fields, Issue, IssueField, Project};
use crate::storage::ProjectStore;
use crate::update::resolve_update;
use crate::util::IdGenerator;
use crate::validation::IssueValidator;
use chrono::{DateTime, SubsecRound, Utc};

/// Issue store over a [`ProjectStore`] backend.
#[derive(Debug)]
pub struct IssueStore<S> {
    backend: S,
    id_generator: IdGenerator,
}

impl<S: ProjectStore> IssueStore<S> {
    #[must_use]
    pub const fn new(backend: S) -> Self {
        Self {
            backend,
            id_generator: IdGenerator::new(),
        }
    }

    /// The underlying backend.
    #[must_use]
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    /// Create an issue, creating the project first if it does not exist.
    ///
    /// # Errors
    ///
    /// - `MissingFields` if a required field is absent or empty; the issue
    ///   is not stored, but a newly created project remains
    /// - Storage errors from the backend
    pub fn create(&self, project_name: &str, fields: &Fields) -> Result<Issue> {
        tracing::debug!(project = project_name, "create");

        let new_issue = match IssueValidator::validate_create(fields) {
            Ok(new_issue) => new_issue,
            Err(err) => {
                self.ensure_project(project_name)?;
                return Err(err);
            }
        };

        let now = timestamp();
        let id = self.id_generator.generate(
            &new_issue.issue_title,
            &new_issue.issue_text,
            &new_issue.created_by,
            now,
            |candidate| Ok::<_, TrackerError>(!self.backend.reserve_id(candidate)?),
        )?;
        let issue = new_issue.into_issue(id, now);

        let mut created_project = false;
        self.backend.mutate_project(project_name, &mut |current| {
            let mut project = current.unwrap_or_else(|| {
                created_project = true;
                Project::new(project_name)
            });
            project.issues.push(issue.clone());
            Ok(Some(project))
        })?;

        if created_project {
            tracing::info!(project = project_name, "Created project");
        }
        tracing::info!(project = project_name, id = %issue.id, "Created issue");
        Ok(issue)
    }

    /// Issues of a project matching every constraint, in stored order.
    ///
    /// An unknown project yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns storage errors from the backend.
    pub fn list(&self, project_name: &str, filter: &IssueFilter) -> Result<Vec<Issue>> {
        let Some(project) = self.backend.load_project(project_name)? else {
            tracing::debug!(project = project_name, "list: unknown project");
            return Ok(Vec::new());
        };
        let issues = filter.apply(&project.issues);
        tracing::debug!(
            project = project_name,
            constraints = filter.constraints().len(),
            matched = issues.len(),
            total = project.issues.len(),
            "list"
        );
        Ok(issues)
    }

    /// Apply a partial update to the issue named by `fields["_id"]`.
    ///
    /// # Errors
    ///
    /// - `MissingId` if no non-empty `_id` was submitted
    /// - `UpdateFailed` if the project or issue does not exist
    /// - `NoUpdateFields` if nothing but blanks or read-only fields were sent
    /// - `InvalidField` if `open` is not a boolean
    /// - Storage errors from the backend
    pub fn update(&self, project_name: &str, fields: &Fields) -> Result<Ack> {
        let id = fields.id().ok_or(TrackerError::MissingId)?;
        tracing::debug!(project = project_name, %id, "update");

        let failed = || TrackerError::UpdateFailed { id: id.clone() };
        let mut changed: Vec<IssueField> = Vec::new();
        self.backend.mutate_project(project_name, &mut |current| {
            let mut project = current.ok_or_else(failed)?;
            let issue = project.find_mut(&id).ok_or_else(failed)?;

            let changes = resolve_update(issue, fields)?;
            changes.apply_to(issue);
            issue.updated_on = timestamp().max(issue.created_on);
            changed = changes.fields();
            Ok(Some(project))
        })?;

        tracing::info!(
            project = project_name,
            %id,
            fields = ?changed,
            "Updated issue"
        );
        Ok(Ack::updated(id))
    }

    /// Delete the issue named by `fields["_id"]`.
    ///
    /// # Errors
    ///
    /// - `MissingId` if no non-empty `_id` was submitted
    /// - `DeleteFailed` if the project or issue does not exist
    /// - Storage errors from the backend
    pub fn delete(&self, project_name: &str, fields: &Fields) -> Result<Ack> {
        let id = fields.id().ok_or(TrackerError::MissingId)?;
        self.delete_by_id(project_name, &id)
    }

    /// Delete an issue by id.
    ///
    /// # Errors
    ///
    /// Same as [`IssueStore::delete`].
    pub fn delete_by_id(&self, project_name: &str, id: &str) -> Result<Ack> {
        if id.is_empty() {
            return Err(TrackerError::MissingId);
        }
        tracing::debug!(project = project_name, id, "delete");

        let failed = || TrackerError::DeleteFailed { id: id.to_string() };
        self.backend.mutate_project(project_name, &mut |current| {
            let mut project = current.ok_or_else(failed)?;
            project.remove(id).ok_or_else(failed)?;
            Ok(Some(project))
        })?;

        tracing::info!(project = project_name, id, "Deleted issue");
        Ok(Ack::deleted(id))
    }

    /// Names of all known projects, sorted.
    ///
    /// # Errors
    ///
    /// Returns storage errors from the backend.
    pub fn projects(&self) -> Result<Vec<String>> {
        self.backend.project_names()
    }

    fn ensure_project(&self, project_name: &str) -> Result<()> {
        let mut created = false;
        self.backend.mutate_project(project_name, &mut |current| {
            if current.is_some() {
                return Ok(None);
            }
            created = true;
            Ok(Some(Project::new(project_name)))
        })?;
        if created {
            tracing::info!(project = project_name, "Created project");
        }
        Ok(())
    }
}

/// Current time at the precision timestamps are stored with.
fn timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
