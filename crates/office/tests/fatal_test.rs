//! A failing actor must take the whole process down instead of stranding its
//! partners.
//!
//! The fatal path exits the process, so each case runs the office in a child
//! copy of this test binary and checks how the child ended.

use std::env;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clinic_office::{Event, EventSink, OfficeConfig, Pipeline, ServerStep, StageKind};

const CHILD_ENV: &str = "CLINIC_FATAL_CHILD";
const TIMEOUT: Duration = Duration::from_secs(10);

/// Panics as soon as a doctor starts a consultation.
struct PanicOnConsult;

impl EventSink for PanicOnConsult {
    fn record(&self, event: &Event) {
        if let Event::Server {
            stage: StageKind::Service,
            step: ServerStep::ProcessStarted { client },
            ..
        } = event
        {
            panic!("sink failed while recording consultation of patient {client}");
        }
    }
}

/// Re-run this binary restricted to the test `name`, with the child marker set.
fn run_child(name: &str) -> ExitStatus {
    let mut child = Command::new(env::current_exe().unwrap())
        .args([name, "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, "1")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let deadline = Instant::now() + TIMEOUT;
    loop {
        if let Some(status) = child.try_wait().unwrap() {
            return status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            panic!("child running {name} did not exit within {TIMEOUT:?}");
        }
        thread::sleep(Duration::from_millis(20));
    }
}

#[test]
fn panicking_actor_terminates_the_process() {
    let status = run_child("doctor_panic_during_consultation");
    assert_eq!(status.code(), Some(1), "child ended with {status}");
}

/// Child side of `panicking_actor_terminates_the_process`; a no-op in a normal run.
#[test]
fn doctor_panic_during_consultation() {
    if env::var_os(CHILD_ENV).is_none() {
        return;
    }
    let pipeline = Pipeline::new(OfficeConfig::new(1, 2), Arc::new(PanicOnConsult)).unwrap();
    let _ = pipeline.run();
    // Reaching this point means the panic was swallowed.
    std::process::exit(0);
}
