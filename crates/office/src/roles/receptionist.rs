use std::sync::Arc;

use tracing::debug;

use clinic_queue::{ClientId, ServerId};

use crate::error::OfficeError;
use crate::office::Office;
use crate::stage::StageWorker;

/// The single intake server. Registers patients in whatever order they queue.
pub struct Receptionist {
    id: ServerId,
    office: Arc<Office>,
}

impl Receptionist {
    pub fn new(id: ServerId, office: Arc<Office>) -> Self {
        Self { id, office }
    }
}

impl StageWorker for Receptionist {
    fn id(&self) -> ServerId {
        self.id
    }

    fn wait_for_work(&mut self) -> Result<ClientId, OfficeError> {
        Ok(self.office.intake().channels().wait_and_dequeue()?)
    }

    fn process(&mut self, client: ClientId) -> Result<(), OfficeError> {
        debug!(receptionist = %self.id, patient = %client, "registering");
        Ok(())
    }

    fn signal_done(&mut self, client: ClientId) -> Result<(), OfficeError> {
        Ok(self.office.intake().channels().signal_completion(client)?)
    }
}
