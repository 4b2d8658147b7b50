mod cli;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::{debug, info};

use clinic_office::{EventSink, Narrator, OfficeConfig, OfficeError, Pipeline, RunReport, Silent};

use crate::cli::{CliArgs, ReportFormat, USAGE};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            debug!(error = %err, "rejected arguments");
            println!("{USAGE}");
            return Ok(());
        }
    };

    match run(&args, &mut io::stdout())? {
        Outcome::Rejected(message) => debug!(%message, "nothing to run"),
        Outcome::Completed(report) => info!(
            completed = report.completed_clients,
            handshakes = report.handshakes(),
            "simulation finished"
        ),
    }
    Ok(())
}

/// How a run ended.
#[derive(Debug)]
enum Outcome {
    /// The population was out of range; the message was printed instead.
    Rejected(String),
    Completed(Box<RunReport>),
}

fn run(args: &CliArgs, out: &mut impl Write) -> Result<Outcome> {
    let mut config = OfficeConfig::new(args.servers, args.clients);
    if let Some(doctors) = args.doctors {
        config = config.with_doctors(doctors);
    }

    let sink: Arc<dyn EventSink> = if args.quiet {
        Arc::new(Silent)
    } else {
        Arc::new(Narrator)
    };

    let pipeline = match Pipeline::new(config, sink) {
        Ok(pipeline) => pipeline,
        Err(OfficeError::Config(message)) => {
            info!(%config, "population rejected");
            writeln!(out, "{message}")?;
            return Ok(Outcome::Rejected(message));
        }
        Err(err) => return Err(err).context("failed to set up the office"),
    };

    writeln!(out, "Run with {config}")?;
    out.flush()?;
    let report = pipeline.run().context("office run failed")?;
    writeln!(out, "Simulation complete")?;

    match args.report {
        ReportFormat::Text => write!(out, "{report}")?,
        ReportFormat::Json => writeln!(
            out,
            "{}",
            serde_json::to_string_pretty(&report).context("failed to serialize run report")?
        )?,
        ReportFormat::Off => {}
    }
    Ok(Outcome::Completed(Box::new(report)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("clinic").chain(argv.iter().copied())).unwrap()
    }

    fn run_to_string(argv: &[&str]) -> (Outcome, String) {
        let mut out = Vec::new();
        let outcome = run(&args(argv), &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn too_many_doctors_prints_the_bound() {
        let (outcome, out) = run_to_string(&["4", "5"]);
        assert!(matches!(outcome, Outcome::Rejected(_)));
        assert_eq!(out, "Doctor count is invalid. Max of 3, min of 1\n");
    }

    #[test]
    fn too_few_patients_prints_the_bound() {
        let (outcome, out) = run_to_string(&["2", "0"]);
        assert!(matches!(outcome, Outcome::Rejected(_)));
        assert_eq!(out, "Patient count is invalid. Max of 15, min of 1\n");
    }

    #[test]
    fn doctor_override_is_validated() {
        let (outcome, _) = run_to_string(&["2", "3", "--doctors", "0"]);
        assert!(matches!(outcome, Outcome::Rejected(_)));
    }

    #[test]
    fn quiet_run_brackets_the_report() {
        let (outcome, out) = run_to_string(&["2", "4", "--doctors", "3", "--quiet", "--report", "text"]);
        let Outcome::Completed(report) = outcome else {
            panic!("run was rejected: {out}");
        };
        assert_eq!(report.completed_clients, 4);

        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("Run with 4 patients, 2 nurses, 3 doctors"));
        assert_eq!(lines.next(), Some("Simulation complete"));
        assert_eq!(lines.next(), Some("Completed 4 of 4 patients"));
    }

    #[test]
    fn json_report_parses_back() {
        let (_, out) = run_to_string(&["1", "2", "--quiet", "--report", "json"]);
        let json_start = out.find('{').unwrap();
        let value: serde_json::Value = serde_json::from_str(&out[json_start..]).unwrap();
        assert_eq!(value["completed_clients"], 2);
        assert_eq!(value["stages"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn missing_or_malformed_arguments_fail_to_parse() {
        for argv in [&[][..], &["2"][..], &["two", "3"][..], &["2", "3", "4"][..]] {
            let parsed = CliArgs::try_parse_from(std::iter::once("clinic").chain(argv.iter().copied()));
            assert!(parsed.is_err(), "{argv:?} should be rejected");
        }
    }
}
