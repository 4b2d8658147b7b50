//! Stage orchestration: the pooled worker state machine.
//!
//! Every server of every stage runs the same loop:
//!
//! ```text
//! CHECK_RETIRE ─▶ ANNOUNCE_READY ─▶ WAIT_FOR_WORK ─▶ CLAIM ─▶ PROCESS
//!      ▲                                                         │
//!      └── DECREMENT_COUNT ◀── WAIT_FOR_DEPARTURE ◀── SIGNAL_DONE ◀┘
//! ```
//!
//! [`Stage::run_worker`] owns the transitions and the retirement accounting;
//! a [`StageWorker`] supplies what each state means for its stage.

use tracing::{debug, info};

use clinic_queue::{ClientId, RetirementTracker, ServerId, SyncError, TrackerSnapshot};

use crate::error::OfficeError;
use crate::event::{Event, ServerStep, StageKind};
use crate::report::ServerTally;
use crate::sink::EventSink;

/// What one server does in each state of the pooled worker loop.
pub trait StageWorker {
    fn id(&self) -> ServerId;

    /// Make this server discoverable as free for new work.
    fn announce_ready(&mut self) -> Result<(), OfficeError> {
        Ok(())
    }

    /// Block until a client is available to this server.
    fn wait_for_work(&mut self) -> Result<ClientId, OfficeError>;

    /// Bind `client` to this server. Returns the downstream server the
    /// client was bound to, if the claim made such a binding.
    fn claim(&mut self, client: ClientId) -> Result<Option<ServerId>, OfficeError> {
        let _ = client;
        Ok(None)
    }

    /// Service `client`.
    fn process(&mut self, client: ClientId) -> Result<(), OfficeError>;

    /// Tell `client` its service is finished.
    fn signal_done(&mut self, client: ClientId) -> Result<(), OfficeError>;

    /// Block until `client` has left this server.
    fn wait_for_departure(&mut self, client: ClientId) -> Result<(), OfficeError> {
        let _ = client;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerState {
    CheckRetire,
    AnnounceReady,
    WaitForWork,
    Claim(ClientId),
    Process(ClientId),
    SignalDone(ClientId),
    WaitForDeparture(ClientId),
    DecrementCount(ClientId),
}

/// One pipeline phase: the channels its clients and servers meet on, plus
/// the retirement tracker shared by its pool.
pub struct Stage<C> {
    kind: StageKind,
    tracker: RetirementTracker,
    channels: C,
}

impl<C> Stage<C> {
    pub fn new(kind: StageKind, servers: usize, clients: usize, channels: C) -> Self {
        Self {
            kind,
            tracker: RetirementTracker::new(kind.to_string(), clients, servers),
            channels,
        }
    }

    pub fn channels(&self) -> &C {
        &self.channels
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn snapshot(&self) -> Result<TrackerSnapshot, SyncError> {
        self.tracker.snapshot()
    }

    /// Drive `worker` until it retires. Returns the clients it served, in order.
    pub fn run_worker<W: StageWorker>(
        &self,
        mut worker: W,
        sink: &dyn EventSink,
    ) -> Result<ServerTally, OfficeError> {
        let server = worker.id();
        let emit = |step| sink.record(&Event::server(self.kind, server, step));
        let mut served = Vec::new();
        let mut state = WorkerState::CheckRetire;

        loop {
            debug!(stage = %self.kind, %server, ?state, "worker state");
            state = match state {
                WorkerState::CheckRetire => {
                    if self.tracker.attempt_to_retire()? {
                        emit(ServerStep::Retired);
                        info!(stage = %self.kind, %server, served = served.len(), "worker retired");
                        return Ok(ServerTally { server, served });
                    }
                    WorkerState::AnnounceReady
                }
                WorkerState::AnnounceReady => {
                    worker.announce_ready()?;
                    emit(ServerStep::Ready);
                    WorkerState::WaitForWork
                }
                WorkerState::WaitForWork => WorkerState::Claim(worker.wait_for_work()?),
                WorkerState::Claim(client) => {
                    let doctor = worker.claim(client)?;
                    emit(ServerStep::Claimed { client, doctor });
                    WorkerState::Process(client)
                }
                WorkerState::Process(client) => {
                    emit(ServerStep::ProcessStarted { client });
                    worker.process(client)?;
                    emit(ServerStep::ProcessFinished { client });
                    WorkerState::SignalDone(client)
                }
                WorkerState::SignalDone(client) => {
                    worker.signal_done(client)?;
                    WorkerState::WaitForDeparture(client)
                }
                WorkerState::WaitForDeparture(client) => {
                    worker.wait_for_departure(client)?;
                    emit(ServerStep::Released { client });
                    WorkerState::DecrementCount(client)
                }
                WorkerState::DecrementCount(client) => {
                    self.tracker.decrement_remaining_items()?;
                    served.push(client);
                    WorkerState::CheckRetire
                }
            };
        }
    }
}
