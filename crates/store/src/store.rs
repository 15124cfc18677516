//! In-memory project repository.
//!
//! The single mutation primitive for shot state is
//! [`ProjectStore::update_shot`]: a read-modify-write performed under the
//! write lock and keyed by shot id, so concurrent updates to different
//! shots can never clobber each other. There is no global lock across
//! generation calls; callers hold the lock only for the duration of the
//! closure, never across an await point.

use std::collections::HashMap;

use shotflow_core::types::{EntityId, ProjectId};
use shotflow_events::RenderEvent;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::{Project, ProjectSummary, Shot};

/// Shared in-memory repository keyed by project id.
///
/// Designed to be held behind an `Arc` and cloned into handlers and
/// pipeline services.
#[derive(Default)]
pub struct ProjectStore {
    projects: RwLock<HashMap<ProjectId, Project>>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a project wholesale (create, or snapshot load).
    pub async fn insert(&self, project: Project) {
        let id = project.id;
        self.projects.write().await.insert(id, project);
        tracing::debug!(project_id = %id, "Project inserted");
    }

    /// Clone out a full project by id.
    pub async fn get(&self, project_id: ProjectId) -> Result<Project, StoreError> {
        self.projects
            .read()
            .await
            .get(&project_id)
            .cloned()
            .ok_or(StoreError::ProjectNotFound(project_id))
    }

    /// List summaries of all projects, newest first.
    pub async fn list(&self) -> Vec<ProjectSummary> {
        let mut summaries: Vec<ProjectSummary> = self
            .projects
            .read()
            .await
            .values()
            .map(Project::summary)
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        summaries
    }

    /// Remove a project. Returns whether it existed.
    pub async fn remove(&self, project_id: ProjectId) -> bool {
        self.projects.write().await.remove(&project_id).is_some()
    }

    /// Run a read-only closure against a project.
    pub async fn with_project<R>(
        &self,
        project_id: ProjectId,
        f: impl FnOnce(&Project) -> R,
    ) -> Result<R, StoreError> {
        let projects = self.projects.read().await;
        let project = projects
            .get(&project_id)
            .ok_or(StoreError::ProjectNotFound(project_id))?;
        Ok(f(project))
    }

    /// Atomically mutate a whole project.
    pub async fn update<R>(
        &self,
        project_id: ProjectId,
        f: impl FnOnce(&mut Project) -> R,
    ) -> Result<R, StoreError> {
        let mut projects = self.projects.write().await;
        let project = projects
            .get_mut(&project_id)
            .ok_or(StoreError::ProjectNotFound(project_id))?;
        Ok(f(project))
    }

    /// Atomically mutate one shot by id.
    ///
    /// This is the transaction boundary for all shot state transitions.
    pub async fn update_shot<R>(
        &self,
        project_id: ProjectId,
        shot_id: &str,
        f: impl FnOnce(&mut Shot) -> R,
    ) -> Result<R, StoreError> {
        let mut projects = self.projects.write().await;
        let project = projects
            .get_mut(&project_id)
            .ok_or(StoreError::ProjectNotFound(project_id))?;
        let shot = project
            .shot_mut(shot_id)
            .ok_or_else(|| StoreError::ShotNotFound {
                project_id,
                shot_id: shot_id.to_string(),
            })?;
        Ok(f(shot))
    }

    /// Append a render event to a project's audit log.
    pub async fn append_render_event(
        &self,
        project_id: ProjectId,
        event: RenderEvent,
    ) -> Result<(), StoreError> {
        self.update(project_id, |project| project.render_log.push(event))
            .await
    }

    /// Clone out one shot by id.
    pub async fn get_shot(
        &self,
        project_id: ProjectId,
        shot_id: &str,
    ) -> Result<Shot, StoreError> {
        self.with_project(project_id, |project| project.shot(shot_id).cloned())
            .await?
            .ok_or_else(|| StoreError::ShotNotFound {
                project_id,
                shot_id: shot_id.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
