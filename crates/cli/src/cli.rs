use clap::{Parser, ValueEnum};

/// Printed in place of clap's own error output when the arguments are missing
/// or unparseable.
pub const USAGE: &str = "Usage: clinic <doctor count> <patient count>";

/// Doctors-office simulation.
///
/// Patients pass a receptionist, a nurse and a doctor in turn; every actor
/// runs on its own thread and the run ends once every patient has left.
#[derive(Parser, Debug)]
#[command(name = "clinic", version, about = "Doctors-office concurrency simulation")]
pub struct CliArgs {
    /// Nurses and doctors on shift (1 to 3)
    pub servers: usize,

    /// Patients to see (1 to 15)
    pub clients: usize,

    /// Doctors on shift, when different from the nurse count
    #[arg(long, env = "CLINIC_DOCTORS")]
    pub doctors: Option<usize>,

    /// Summary printed after the run completes
    #[arg(long, value_enum, env = "CLINIC_REPORT", default_value_t = ReportFormat::Off)]
    pub report: ReportFormat,

    /// Suppress per-step narration
    #[arg(long, short)]
    pub quiet: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
    #[value(name = "none")]
    Off,
}
