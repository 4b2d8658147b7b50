//! State transitions emitted by patients and staff.
//!
//! Every meaningful step of a client or server state machine is reported as
//! an [`Event`]. Events render as one line of human narration via `Display`;
//! the wording is free-form and not meant to be parsed.

use std::fmt;

use serde::{Deserialize, Serialize};

use clinic_queue::{ClientId, ServerId};

/// One phase of the pipeline, in the order every client visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Single-server registration.
    Intake,
    /// Pooled stage that binds each patient to a doctor.
    Assignment,
    /// Pooled paired-service stage.
    Service,
}

impl StageKind {
    pub const ALL: [StageKind; 3] = [StageKind::Intake, StageKind::Assignment, StageKind::Service];

    /// Name of the staff role serving this stage.
    pub fn role(self) -> &'static str {
        match self {
            StageKind::Intake => "Receptionist",
            StageKind::Assignment => "Nurse",
            StageKind::Service => "Doctor",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageKind::Intake => "intake",
            StageKind::Assignment => "assignment",
            StageKind::Service => "service",
        };
        f.write_str(name)
    }
}

/// A step of the client state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ClientStep {
    EnterIntake,
    IntakeDone,
    EnterAssignment,
    Assigned { doctor: ServerId },
    EnterService { doctor: ServerId },
    ServiceDone { doctor: ServerId },
    Departed,
}

/// A step of the pooled worker state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ServerStep {
    Ready,
    /// `doctor` is set when the claim also bound the client to a doctor.
    Claimed {
        client: ClientId,
        doctor: Option<ServerId>,
    },
    ProcessStarted { client: ClientId },
    ProcessFinished { client: ClientId },
    Released { client: ClientId },
    Retired,
}

/// A single state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "actor", rename_all = "snake_case")]
pub enum Event {
    Client {
        client: ClientId,
        #[serde(flatten)]
        step: ClientStep,
    },
    Server {
        stage: StageKind,
        server: ServerId,
        #[serde(flatten)]
        step: ServerStep,
    },
}

impl Event {
    pub fn client(client: ClientId, step: ClientStep) -> Self {
        Event::Client { client, step }
    }

    pub fn server(stage: StageKind, server: ServerId, step: ServerStep) -> Self {
        Event::Server {
            stage,
            server,
            step,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Event::Client { client, step } => match step {
                ClientStep::EnterIntake => {
                    write!(f, "Patient {client} enters waiting room, waits for receptionist")
                }
                ClientStep::IntakeDone => {
                    write!(f, "Patient {client} leaves receptionist and sits in waiting room")
                }
                ClientStep::EnterAssignment => write!(f, "Patient {client} waits for a nurse"),
                ClientStep::Assigned { doctor } => {
                    write!(f, "Patient {client} is assigned to doctor {doctor}")
                }
                ClientStep::EnterService { doctor } => {
                    write!(f, "Patient {client} enters doctor {doctor}'s office")
                }
                ClientStep::ServiceDone { doctor } => {
                    write!(f, "Patient {client} receives advice from doctor {doctor}")
                }
                ClientStep::Departed => write!(f, "Patient {client} leaves"),
            },
            Event::Server {
                stage,
                server,
                step,
            } => {
                let role = stage.role();
                match (stage, step) {
                    (_, ServerStep::Ready) => write!(f, "{role} {server} is ready for a patient"),
                    (StageKind::Assignment, ServerStep::Claimed { client, doctor: Some(doctor) }) => {
                        write!(f, "{role} {server} takes patient {client} to doctor {doctor}'s office")
                    }
                    (_, ServerStep::Claimed { client, .. }) => {
                        write!(f, "{role} {server} is assigned patient {client}")
                    }
                    (StageKind::Intake, ServerStep::ProcessStarted { client }) => {
                        write!(f, "{role} {server} registers patient {client}")
                    }
                    (StageKind::Assignment, ServerStep::ProcessStarted { client }) => {
                        write!(f, "{role} {server} escorts patient {client}")
                    }
                    (StageKind::Service, ServerStep::ProcessStarted { client }) => {
                        write!(f, "{role} {server} listens to symptoms from patient {client}")
                    }
                    (_, ServerStep::ProcessFinished { client }) => {
                        write!(f, "{role} {server} is done with patient {client}")
                    }
                    (_, ServerStep::Released { client }) => {
                        write!(f, "{role} {server} sees patient {client} off")
                    }
                    (_, ServerStep::Retired) => write!(f, "{role} {server} goes off shift"),
                }
            }
        }
    }
}
