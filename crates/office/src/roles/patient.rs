use std::sync::Arc;

use tracing::debug;

use clinic_queue::ClientId;

use crate::error::OfficeError;
use crate::event::{ClientStep, Event};
use crate::office::Office;

/// A client. Passes through intake, assignment and paired service exactly
/// once each, in that order.
pub struct Patient {
    id: ClientId,
    office: Arc<Office>,
}

impl Patient {
    pub fn new(id: ClientId, office: Arc<Office>) -> Self {
        Self { id, office }
    }

    fn emit(&self, step: ClientStep) {
        self.office.emit(Event::client(self.id, step));
    }

    /// Run the patient to its terminal state.
    pub fn run(self) -> Result<ClientId, OfficeError> {
        let id = self.id;

        // Intake
        self.emit(ClientStep::EnterIntake);
        let intake = self.office.intake().channels();
        intake.enqueue(id)?;
        intake.wait_for_completion(id)?;
        self.emit(ClientStep::IntakeDone);

        // Assignment: a nurse binds us to a doctor before releasing us.
        self.emit(ClientStep::EnterAssignment);
        let assignment = self.office.assignment().channels();
        assignment.enqueue(id)?;
        assignment.wait_for_completion(id)?;
        let doctor = self
            .office
            .assignments()
            .get(id)?
            .ok_or(OfficeError::MissingAssignment(id))?;
        self.emit(ClientStep::Assigned { doctor });

        // Paired service with the assigned doctor.
        let service = self.office.service().channels();
        self.emit(ClientStep::EnterService { doctor });
        service.arrived.notify(doctor)?;
        service.done.wait(doctor)?;
        self.emit(ClientStep::ServiceDone { doctor });

        self.emit(ClientStep::Departed);
        service.left.notify(id)?;
        debug!(patient = %id, "done");
        Ok(id)
    }
}
