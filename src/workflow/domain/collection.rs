//! Persisted root holding every project.

use super::{Project, ProjectId, WorkflowDomainError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Filter applied when listing projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectFilter {
    /// Projects not yet finalized.
    Open,
    /// Projects with at least one done task awaiting approval.
    PendingApproval,
    /// Finalized projects.
    Completed,
    /// Every project.
    #[default]
    All,
}

impl ProjectFilter {
    /// Returns whether `project` passes the filter.
    #[must_use]
    pub fn matches(self, project: &Project) -> bool {
        match self {
            Self::Open => !project.completed(),
            Self::PendingApproval => project.has_pending_approvals(),
            Self::Completed => project.completed(),
            Self::All => true,
        }
    }
}

/// Ordered collection of projects with unique identifiers.
///
/// The `version` counter increases by one on every save and lets store
/// adapters detect a write based on a stale snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectCollection {
    #[serde(default)]
    version: u64,
    #[serde(default)]
    projects: Vec<Project>,
}

impl ProjectCollection {
    /// Creates an empty collection at version zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from stored parts without checking invariants.
    ///
    /// Use [`Self::check_invariants`] before trusting the result.
    #[must_use]
    pub const fn from_parts(version: u64, projects: Vec<Project>) -> Self {
        Self { version, projects }
    }

    /// Returns the save counter this snapshot was loaded at.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns the projects in insertion order.
    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Returns the number of projects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Returns `true` when the collection holds no project.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Looks up a project by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::ProjectNotFound`] when absent.
    pub fn project(&self, project_id: &ProjectId) -> Result<&Project, WorkflowDomainError> {
        self.projects
            .iter()
            .find(|project| project.id() == project_id)
            .ok_or_else(|| WorkflowDomainError::ProjectNotFound(project_id.clone()))
    }

    /// Looks up a project for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::ProjectNotFound`] when absent.
    pub fn project_mut(
        &mut self,
        project_id: &ProjectId,
    ) -> Result<&mut Project, WorkflowDomainError> {
        self.projects
            .iter_mut()
            .find(|project| project.id() == project_id)
            .ok_or_else(|| WorkflowDomainError::ProjectNotFound(project_id.clone()))
    }

    /// Returns the projects that pass `filter`, in order.
    pub fn filtered(&self, filter: ProjectFilter) -> impl Iterator<Item = &Project> {
        self.projects
            .iter()
            .filter(move |project| filter.matches(project))
    }

    /// Mints a project identifier not used by any stored project.
    #[must_use]
    pub fn fresh_project_id(&self) -> ProjectId {
        loop {
            let candidate = ProjectId::generate();
            if !self.holds(&candidate) {
                return candidate;
            }
        }
    }

    /// Appends a project.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::DuplicateProject`] when the identifier
    /// is already taken.
    pub fn insert(&mut self, project: Project) -> Result<(), WorkflowDomainError> {
        if self.holds(project.id()) {
            return Err(WorkflowDomainError::DuplicateProject(project.id().clone()));
        }
        self.projects.push(project);
        Ok(())
    }

    fn holds(&self, project_id: &ProjectId) -> bool {
        self.projects
            .iter()
            .any(|project| project.id() == project_id)
    }

    /// Removes a project together with its tasks and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::ProjectNotFound`] when absent.
    pub fn remove(&mut self, project_id: &ProjectId) -> Result<Project, WorkflowDomainError> {
        let index = self
            .projects
            .iter()
            .position(|project| project.id() == project_id)
            .ok_or_else(|| WorkflowDomainError::ProjectNotFound(project_id.clone()))?;
        Ok(self.projects.remove(index))
    }

    /// Stamps this snapshot with the next save counter.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::VersionOverflow`] when the counter is
    /// already at its maximum.
    pub const fn advance_version(&mut self) -> Result<(), WorkflowDomainError> {
        match self.version.checked_add(1) {
            Some(next) => {
                self.version = next;
                Ok(())
            }
            None => Err(WorkflowDomainError::VersionOverflow(self.version)),
        }
    }

    /// Checks every structural invariant of a loaded collection.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::InvariantViolation`] describing the
    /// first broken invariant.
    pub fn check_invariants(&self) -> Result<(), WorkflowDomainError> {
        let mut seen = HashSet::new();
        for project in &self.projects {
            if !seen.insert(project.id()) {
                return Err(WorkflowDomainError::InvariantViolation(format!(
                    "duplicate project identifier {}",
                    project.id()
                )));
            }
            project.check_invariants()?;
        }
        Ok(())
    }
}
