use thiserror::Error;

use clinic_queue::{ClientId, ServerId, SyncError};

/// Errors that can occur while configuring or running the office pipeline.
#[derive(Debug, Error)]
pub enum OfficeError {
    #[error("synchronization error: {0}")]
    Sync(#[from] SyncError),

    #[error("{0}")]
    Config(String),

    #[error("patient {0} finished the nurse stage without a doctor assignment")]
    MissingAssignment(ClientId),

    #[error("doctor {doctor} was handed patient {patient}, who is assigned to {assigned:?}")]
    AssignmentMismatch {
        doctor: ServerId,
        patient: ClientId,
        assigned: Option<ServerId>,
    },

    #[error("failed to spawn actor thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("actor {actor} panicked: {message}")]
    ActorPanicked { actor: String, message: String },
}
