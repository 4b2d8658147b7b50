//! Summary of a finished run.

use std::fmt;

use serde::{Deserialize, Serialize};

use clinic_queue::{ClientId, ServerId, TrackerSnapshot};

use crate::config::OfficeConfig;
use crate::event::StageKind;

/// Clients one server served, in the order it served them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerTally {
    pub server: ServerId,
    pub served: Vec<ClientId>,
}

/// Final state of one stage after every actor has exited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: StageKind,
    pub tracker: TrackerSnapshot,
    /// One tally per server, ordered by server id.
    pub servers: Vec<ServerTally>,
}

impl StageReport {
    /// Total clients served across the stage's pool.
    pub fn served(&self) -> usize {
        self.servers.iter().map(|t| t.served.len()).sum()
    }

    pub fn tally(&self, server: ServerId) -> Option<&ServerTally> {
        self.servers.iter().find(|t| t.server == server)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub config: OfficeConfig,
    /// Reports in pipeline order: intake, assignment, service.
    pub stages: Vec<StageReport>,
    /// Clients that reached their terminal state.
    pub completed_clients: usize,
    /// The doctor each patient was bound to, by patient.
    pub assignments: Vec<(ClientId, ServerId)>,
}

impl RunReport {
    pub fn stage(&self, kind: StageKind) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.stage == kind)
    }

    /// Completed paired-service handshakes across the doctor pool.
    pub fn handshakes(&self) -> usize {
        self.stage(StageKind::Service).map_or(0, StageReport::served)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Completed {} of {} patients",
            self.completed_clients, self.config.patients
        )?;
        for stage in &self.stages {
            writeln!(
                f,
                "{} stage: {} served, {} of {} staff retired",
                stage.stage,
                stage.served(),
                stage.tracker.retired,
                stage.servers.len()
            )?;
            for tally in &stage.servers {
                let served: Vec<String> = tally.served.iter().map(ToString::to_string).collect();
                writeln!(
                    f,
                    "  {} {}: [{}]",
                    stage.stage.role(),
                    tally.server,
                    served.join(", ")
                )?;
            }
        }
        Ok(())
    }
}
