use std::sync::{Arc, Mutex, PoisonError};

use clinic_queue::{ClientId, ServerId};

use crate::event::{ClientStep, Event, ServerStep, StageKind};

/// Receives every state transition of every actor.
///
/// Called from many threads at once; implementations must not block on
/// anything owned by the pipeline.
pub trait EventSink: Send + Sync {
    fn record(&self, event: &Event);
}

/// Blanket implementation so `Arc<dyn EventSink>` can be used directly.
impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn record(&self, event: &Event) {
        (**self).record(event)
    }
}

/// Prints one line of narration per event to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Narrator;

impl EventSink for Narrator {
    fn record(&self, event: &Event) {
        println!("{event}");
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl EventSink for Silent {
    fn record(&self, _event: &Event) {}
}

/// Records events in the order they were observed.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<Event>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event recorded so far.
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Steps taken by `client`, in order.
    pub fn client_steps(&self, client: ClientId) -> Vec<ClientStep> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Client { client: c, step } if c == client => Some(step),
                _ => None,
            })
            .collect()
    }

    /// Steps taken by `server` of `stage`, in order.
    pub fn server_steps(&self, stage: StageKind, server: ServerId) -> Vec<ServerStep> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Server {
                    stage: s,
                    server: id,
                    step,
                } if s == stage && id == server => Some(step),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for EventLog {
    fn record(&self, event: &Event) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*event);
    }
}
