//! The doctors office: a three-stage pipeline of patients and staff.
//!
//! Patients pass a single receptionist, then any free nurse, then the doctor
//! that nurse bound them to. Each actor runs on its own thread; staff pools
//! shrink on their own as the work runs out, and [`Pipeline::run`] returns
//! once every thread has exited.

pub mod assignment;
pub mod config;
pub mod error;
pub mod event;
pub mod office;
pub mod pipeline;
pub mod report;
pub mod roles;
pub mod sink;
pub mod stage;

pub use assignment::AssignmentTable;
pub use config::{OfficeConfig, MAX_CLIENTS, MAX_SERVERS, RECEPTIONISTS};
pub use error::OfficeError;
pub use event::{ClientStep, Event, ServerStep, StageKind};
pub use office::{HandoffStage, Office, ServiceChannels, ServiceStage};
pub use pipeline::Pipeline;
pub use report::{RunReport, ServerTally, StageReport};
pub use sink::{EventLog, EventSink, Narrator, Silent};
pub use stage::{Stage, StageWorker};

pub use clinic_queue::{ClientId, ServerId};
