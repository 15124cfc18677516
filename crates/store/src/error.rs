use shotflow_core::types::{EntityId, ProjectId};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Project {0} not found")]
    ProjectNotFound(ProjectId),

    #[error("Shot {shot_id} not found in project {project_id}")]
    ShotNotFound {
        project_id: ProjectId,
        shot_id: EntityId,
    },

    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
