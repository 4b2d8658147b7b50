//! Wires the stages together and runs one thread per actor to completion.
//!
//! Stages run in fixed order: a single receptionist (intake), the nurse pool
//! (assignment), the doctor pool (paired service). There is no supervisor
//! deciding when staff leave: every server retires on its own through its
//! stage's retirement tracker, and the run ends when every thread has
//! returned.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::process;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{error, info};

use clinic_queue::{population, ClientId, ServerId};

use crate::config::{OfficeConfig, RECEPTIONISTS};
use crate::error::OfficeError;
use crate::office::Office;
use crate::report::{RunReport, ServerTally, StageReport};
use crate::roles::{Doctor, Nurse, Patient, Receptionist};
use crate::sink::EventSink;
use crate::stage::{Stage, StageWorker};

/// A spawned actor thread and the name it was spawned under.
struct Actor<T> {
    name: String,
    handle: JoinHandle<T>,
}

impl<T> Actor<T> {
    fn join(self) -> Result<T, OfficeError> {
        self.handle
            .join()
            .map_err(|payload| OfficeError::ActorPanicked {
                actor: self.name,
                message: panic_message(payload.as_ref()),
            })
    }
}

/// Spawn a named actor. An error or a panic in `body` is fatal to the whole
/// process: the other actors would otherwise block forever on a partner that
/// is gone.
fn spawn_actor<T, F>(name: String, body: F) -> Result<Actor<T>, OfficeError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, OfficeError> + Send + 'static,
{
    let actor = name.clone();
    let handle = thread::Builder::new().name(name.clone()).spawn(move || {
        match panic::catch_unwind(AssertUnwindSafe(body)) {
            Ok(Ok(value)) => value,
            Ok(Err(err)) => abort(&actor, &err),
            Err(payload) => abort(
                &actor,
                &OfficeError::ActorPanicked {
                    actor: actor.clone(),
                    message: panic_message(payload.as_ref()),
                },
            ),
        }
    })?;
    Ok(Actor { name, handle })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn abort(actor: &str, err: &OfficeError) -> ! {
    error!(actor, error = %err, "fatal error, terminating");
    eprintln!("{actor}: {err}");
    process::exit(1)
}

/// One validated run of the office.
pub struct Pipeline {
    office: Arc<Office>,
}

impl Pipeline {
    /// Validate `config` and build the shared office state. No thread is
    /// created until [`Pipeline::run`].
    pub fn new(config: OfficeConfig, sink: Arc<dyn EventSink>) -> Result<Self, OfficeError> {
        config.validate()?;
        Ok(Self {
            office: Arc::new(Office::new(config, sink)),
        })
    }

    /// Start every actor, wait for all of them, and report the outcome.
    pub fn run(self) -> Result<RunReport, OfficeError> {
        let office = self.office;
        let config = office.config();
        info!(%config, "starting office");

        let receptionists = spawn_staff(
            &office,
            "receptionist",
            RECEPTIONISTS,
            Office::intake,
            Receptionist::new,
        )?;
        let nurses = spawn_staff(&office, "nurse", config.nurses, Office::assignment, Nurse::new)?;
        let doctors = spawn_staff(&office, "doctor", config.doctors, Office::service, Doctor::new)?;

        let patients = population::<ClientId>(config.patients)
            .map(|id| {
                let office = office.clone();
                spawn_actor(format!("patient-{id}"), move || Patient::new(id, office).run())
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut completed_clients = 0;
        for patient in patients {
            patient.join()?;
            completed_clients += 1;
        }

        let stages = vec![
            stage_report(office.intake(), receptionists)?,
            stage_report(office.assignment(), nurses)?,
            stage_report(office.service(), doctors)?,
        ];
        let report = RunReport {
            config,
            stages,
            completed_clients,
            assignments: office.assignments().assignments(),
        };
        info!(
            completed = report.completed_clients,
            handshakes = report.handshakes(),
            "office closed"
        );
        Ok(report)
    }
}

/// Spawn `count` servers for the stage selected by `stage`.
fn spawn_staff<C, W>(
    office: &Arc<Office>,
    role: &str,
    count: usize,
    stage: fn(&Office) -> &Stage<C>,
    worker: fn(ServerId, Arc<Office>) -> W,
) -> Result<Vec<Actor<ServerTally>>, OfficeError>
where
    C: 'static,
    W: StageWorker + 'static,
{
    population::<ServerId>(count)
        .map(|id| {
            let office = office.clone();
            spawn_actor(format!("{role}-{id}"), move || {
                stage(&office).run_worker(worker(id, office.clone()), office.sink())
            })
        })
        .collect()
}

fn stage_report<C>(
    stage: &Stage<C>,
    staff: Vec<Actor<ServerTally>>,
) -> Result<StageReport, OfficeError> {
    let mut servers = staff
        .into_iter()
        .map(Actor::join)
        .collect::<Result<Vec<_>, _>>()?;
    servers.sort_by_key(|tally| tally.server);
    Ok(StageReport {
        stage: stage.kind(),
        tracker: stage.snapshot()?,
        servers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panicked_actor_is_reported_by_name_on_join() {
        let actor = Actor::<()> {
            name: "doctor-0".to_string(),
            handle: thread::spawn(|| panic!("consultation failed")),
        };
        match actor.join() {
            Err(OfficeError::ActorPanicked { actor, message }) => {
                assert_eq!(actor, "doctor-0");
                assert_eq!(message, "consultation failed");
            }
            other => panic!("expected a panic report, got {other:?}"),
        }
    }

    #[test]
    fn formatted_panic_payloads_keep_their_text() {
        let payload: Box<dyn Any + Send> = Box::new(format!("patient {} left early", 3));
        assert_eq!(panic_message(payload.as_ref()), "patient 3 left early");
        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
