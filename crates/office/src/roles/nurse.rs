use std::sync::Arc;

use tracing::debug;

use clinic_queue::{ClientId, ServerId};

use crate::error::OfficeError;
use crate::office::Office;
use crate::stage::StageWorker;

/// A member of the assignment pool.
///
/// Takes any waiting patient, claims the next free doctor for them and
/// records the binding in the assignment table. The nurse is the only writer
/// of a patient's assignment cell.
pub struct Nurse {
    id: ServerId,
    office: Arc<Office>,
}

impl Nurse {
    pub fn new(id: ServerId, office: Arc<Office>) -> Self {
        Self { id, office }
    }
}

impl StageWorker for Nurse {
    fn id(&self) -> ServerId {
        self.id
    }

    fn wait_for_work(&mut self) -> Result<ClientId, OfficeError> {
        Ok(self.office.assignment().channels().wait_and_dequeue()?)
    }

    fn claim(&mut self, client: ClientId) -> Result<Option<ServerId>, OfficeError> {
        let service = self.office.service().channels();
        let doctor = service.ready.wait_pop()?;
        self.office.assignments().assign(client, doctor)?;
        service.assigned.signal(doctor, client)?;
        Ok(Some(doctor))
    }

    fn process(&mut self, client: ClientId) -> Result<(), OfficeError> {
        debug!(nurse = %self.id, patient = %client, "escorting");
        Ok(())
    }

    fn signal_done(&mut self, client: ClientId) -> Result<(), OfficeError> {
        Ok(self.office.assignment().channels().signal_completion(client)?)
    }
}
