use serde::{Deserialize, Serialize};

mod validation;

#[cfg(test)]
mod tests;

/// Largest pool any server stage may be staffed with.
pub const MAX_SERVERS: usize = 3;

/// Largest client population the office admits.
pub const MAX_CLIENTS: usize = 15;

/// The intake stage is always staffed by exactly one receptionist.
pub const RECEPTIONISTS: usize = 1;

// ── OfficeConfig ────────────────────────────────────────────────────

/// Population sizes for one run of the office pipeline.
///
/// Pool sizes are fixed at startup and known to every participant. The
/// nurse and doctor pools default to the same size but need not match:
/// doctors are bound to patients through the assignment table, not by
/// sharing an index with a nurse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeConfig {
    /// Servers in the pooled assignment stage.
    pub nurses: usize,

    /// Servers in the pooled paired-service stage.
    pub doctors: usize,

    /// Clients that pass through every stage.
    pub patients: usize,
}

impl OfficeConfig {
    /// Equal nurse and doctor pools of `servers` each.
    pub fn new(servers: usize, patients: usize) -> Self {
        Self {
            nurses: servers,
            doctors: servers,
            patients,
        }
    }

    /// Size the doctor pool independently of the nurse pool.
    pub fn with_doctors(mut self, doctors: usize) -> Self {
        self.doctors = doctors;
        self
    }

    pub fn receptionists(&self) -> usize {
        RECEPTIONISTS
    }
}

impl std::fmt::Display for OfficeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} patients, {} nurses, {} doctors",
            self.patients, self.nurses, self.doctors
        )
    }
}
