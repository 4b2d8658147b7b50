use std::sync::Arc;

use tracing::debug;

use clinic_queue::{ClientId, ServerId};

use crate::error::OfficeError;
use crate::office::Office;
use crate::stage::StageWorker;

/// A member of the paired-service pool.
///
/// Serves exactly the patient a nurse bound to it, through a strict
/// handshake keyed by its own id and the patient's.
pub struct Doctor {
    id: ServerId,
    office: Arc<Office>,
}

impl Doctor {
    pub fn new(id: ServerId, office: Arc<Office>) -> Self {
        Self { id, office }
    }
}

impl StageWorker for Doctor {
    fn id(&self) -> ServerId {
        self.id
    }

    fn announce_ready(&mut self) -> Result<(), OfficeError> {
        Ok(self.office.service().channels().ready.push(self.id)?)
    }

    fn wait_for_work(&mut self) -> Result<ClientId, OfficeError> {
        let patient = self.office.service().channels().assigned.wait(self.id)?;
        let assigned = self.office.assignments().get(patient)?;
        if assigned != Some(self.id) {
            return Err(OfficeError::AssignmentMismatch {
                doctor: self.id,
                patient,
                assigned,
            });
        }
        Ok(patient)
    }

    /// The pairing is confirmed once the assigned patient walks in.
    fn claim(&mut self, client: ClientId) -> Result<Option<ServerId>, OfficeError> {
        self.office.service().channels().arrived.wait(self.id)?;
        debug!(doctor = %self.id, patient = %client, "patient arrived");
        Ok(None)
    }

    fn process(&mut self, client: ClientId) -> Result<(), OfficeError> {
        debug!(doctor = %self.id, patient = %client, "consulting");
        Ok(())
    }

    fn signal_done(&mut self, _client: ClientId) -> Result<(), OfficeError> {
        Ok(self.office.service().channels().done.notify(self.id)?)
    }

    fn wait_for_departure(&mut self, client: ClientId) -> Result<(), OfficeError> {
        Ok(self.office.service().channels().left.wait(client)?)
    }
}
