//! Shared state for one run: every stage, channel and table, built once and
//! handed to each actor behind an `Arc`.

use std::sync::Arc;

use clinic_queue::{ClientId, HandoffQueue, RendezvousChannel, ServerId, WaitQueue};

use crate::assignment::AssignmentTable;
use crate::config::{OfficeConfig, RECEPTIONISTS};
use crate::event::{Event, StageKind};
use crate::sink::EventSink;
use crate::stage::Stage;

/// A stage whose clients meet an anonymous pool through a [`HandoffQueue`].
pub type HandoffStage = Stage<HandoffQueue<ClientId>>;

/// The paired-service stage, where each patient meets one specific doctor.
pub type ServiceStage = Stage<ServiceChannels>;

/// Channels of the paired-service handshake.
///
/// Per pairing the edges are, in order: doctor pushes its id on `ready`;
/// a nurse pops it and hands the patient over on `assigned[doctor]`; the
/// patient raises `arrived[doctor]`; the doctor raises `done[doctor]`; the
/// patient raises `left[patient]`.
pub struct ServiceChannels {
    pub ready: WaitQueue<ServerId>,
    pub assigned: RendezvousChannel<ServerId, ClientId>,
    pub arrived: RendezvousChannel<ServerId>,
    pub done: RendezvousChannel<ServerId>,
    pub left: RendezvousChannel<ClientId>,
}

impl ServiceChannels {
    fn new(doctors: usize, patients: usize) -> Self {
        Self {
            ready: WaitQueue::with_capacity("doctor.ready", doctors),
            assigned: RendezvousChannel::new("doctor.assigned", doctors),
            arrived: RendezvousChannel::new("doctor.arrived", doctors),
            done: RendezvousChannel::new("doctor.done", doctors),
            left: RendezvousChannel::new("patient.left", patients),
        }
    }
}

pub struct Office {
    config: OfficeConfig,
    intake: HandoffStage,
    assignment: HandoffStage,
    service: ServiceStage,
    assignments: AssignmentTable,
    sink: Arc<dyn EventSink>,
}

impl Office {
    pub fn new(config: OfficeConfig, sink: Arc<dyn EventSink>) -> Self {
        let patients = config.patients;
        Self {
            intake: Stage::new(
                StageKind::Intake,
                RECEPTIONISTS,
                patients,
                HandoffQueue::new("receptionist.queue", patients),
            ),
            assignment: Stage::new(
                StageKind::Assignment,
                config.nurses,
                patients,
                HandoffQueue::new("nurse.queue", patients),
            ),
            service: Stage::new(
                StageKind::Service,
                config.doctors,
                patients,
                ServiceChannels::new(config.doctors, patients),
            ),
            assignments: AssignmentTable::new(patients),
            config,
            sink,
        }
    }

    pub fn config(&self) -> OfficeConfig {
        self.config
    }

    pub fn intake(&self) -> &HandoffStage {
        &self.intake
    }

    pub fn assignment(&self) -> &HandoffStage {
        &self.assignment
    }

    pub fn service(&self) -> &ServiceStage {
        &self.service
    }

    pub fn assignments(&self) -> &AssignmentTable {
        &self.assignments
    }

    pub fn sink(&self) -> &dyn EventSink {
        &*self.sink
    }

    pub(crate) fn emit(&self, event: Event) {
        self.sink.record(&event);
    }
}
