//! Per-patient record of the doctor that will serve them.

use std::sync::OnceLock;

use tracing::debug;

use clinic_queue::{ClientId, IdSlots, Identity, ServerId, SyncError};

/// Write-once map from patient to assigned doctor.
///
/// Each cell is written by the nurse that claimed the patient and read by
/// that patient only after the nurse's completion signal has been observed.
/// The signal orders the write before the read; the cell itself rejects a
/// second write.
#[derive(Debug)]
pub struct AssignmentTable {
    cells: IdSlots<ClientId, OnceLock<ServerId>>,
}

impl AssignmentTable {
    pub fn new(patients: usize) -> Self {
        Self {
            cells: IdSlots::new(patients, |_| OnceLock::new()),
        }
    }

    /// Bind `patient` to `doctor`. Fails if the patient is already bound.
    pub fn assign(&self, patient: ClientId, doctor: ServerId) -> Result<(), SyncError> {
        self.cells
            .get(patient)?
            .set(doctor)
            .map_err(|_| SyncError::AlreadyAssigned {
                kind: ClientId::KIND,
                index: patient.index(),
            })?;
        debug!(%patient, %doctor, "assignment recorded");
        Ok(())
    }

    /// The doctor bound to `patient`, or `None` if the cell is unwritten.
    pub fn get(&self, patient: ClientId) -> Result<Option<ServerId>, SyncError> {
        Ok(self.cells.get(patient)?.get().copied())
    }

    /// Every written cell, by patient.
    pub fn assignments(&self) -> Vec<(ClientId, ServerId)> {
        self.cells
            .iter()
            .filter_map(|(patient, cell)| cell.get().map(|doctor| (patient, *doctor)))
            .collect()
    }
}
