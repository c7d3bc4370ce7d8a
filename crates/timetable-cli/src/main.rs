//! `timetable` CLI — validate candidate schedules and derive teacher
//! workloads from a JSON dataset.
//!
//! ## Usage
//!
//! ```sh
//! # Validate a candidate schedule against a dataset
//! timetable check -d campus.json -s candidate.json
//!
//! # One teacher's workload breakdown
//! timetable workload -d campus.json --year 2024-2025 --semester 1 --teacher t1
//!
//! # Every assigned teacher
//! timetable workload -d campus.json --year 2024-2025 --semester 1 --all
//!
//! # Pre-assignment unit-limit check
//! timetable limit -d campus.json --teacher t1 --subject cs102 \
//!     --year 2024-2025 --semester 1
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::process;

use timetable_engine::model::Schedule;
use timetable_engine::store::{Dataset, MemoryStore};
use timetable_engine::{unit_limit, validate, workload};

#[derive(Parser)]
#[command(
    name = "timetable",
    version,
    about = "Academic timetable validation and workload CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a candidate schedule against the dataset
    Check {
        /// Dataset JSON file (subjects, courses, teachers, offerings, schedules)
        #[arg(short, long)]
        dataset: String,
        /// Candidate schedule JSON file
        #[arg(short, long)]
        schedule: String,
    },
    /// Derive teacher workload views for one term
    Workload {
        /// Dataset JSON file
        #[arg(short, long)]
        dataset: String,
        /// Academic year, e.g. "2024-2025"
        #[arg(long)]
        year: String,
        /// Semester number
        #[arg(long)]
        semester: u32,
        /// Teacher id to compute (mutually exclusive with --all)
        #[arg(long, conflicts_with = "all")]
        teacher: Option<String>,
        /// Recompute every teacher referenced by an active offering
        #[arg(long)]
        all: bool,
    },
    /// Check whether a subject assignment keeps a teacher within the unit cap
    Limit {
        /// Dataset JSON file
        #[arg(short, long)]
        dataset: String,
        #[arg(long)]
        teacher: String,
        #[arg(long)]
        subject: String,
        /// Academic year, e.g. "2024-2025"
        #[arg(long)]
        year: String,
        /// Semester number
        #[arg(long)]
        semester: u32,
    },
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Commands::Check { dataset, schedule } => {
            let store = load_store(&dataset)?;
            let candidate: Schedule = load_json(&schedule)?;
            let validation = validate::validate_schedule_write(&store, &candidate)
                .context("Failed to validate schedule")?;

            if validation.is_clean() {
                println!("Schedule {} is valid: no conflicts, hours within requirements", candidate.id);
            } else {
                for message in validation.messages() {
                    println!("{}", message);
                }
                let findings = validation.internal_conflicts.len()
                    + validation.cross_conflicts.len()
                    + validation.hours_violations.len();
                println!("{} finding(s); schedule rejected", findings);
                process::exit(1);
            }
        }
        Commands::Workload {
            dataset,
            year,
            semester,
            teacher,
            all,
        } => {
            let mut store = load_store(&dataset)?;
            let workloads = if all {
                workload::recalculate_all_workloads(&mut store, &year, semester)
                    .context("Failed to recalculate workloads")?
            } else {
                let teacher = teacher
                    .context("Pass --teacher <id> or --all")?;
                vec![workload::calculate_teacher_workload(
                    &mut store, &teacher, &year, semester,
                )
                .context("Failed to calculate workload")?]
            };
            for w in &workloads {
                print!("{}", workload::render_breakdown(w));
            }
        }
        Commands::Limit {
            dataset,
            teacher,
            subject,
            year,
            semester,
        } => {
            let store = load_store(&dataset)?;
            let decision =
                unit_limit::check_unit_limit(&store, &teacher, &subject, &year, semester)
                    .context("Failed to check unit limit")?;

            let verdict = match (decision.valid, decision.requires_overload) {
                (true, _) => "valid",
                (false, true) => "invalid (overload approval required)",
                (false, false) => "invalid",
            };
            println!("{}: {}", verdict, decision.reason);
            println!(
                "current {} unit(s), projected {} of cap {}",
                decision.current_units, decision.projected_units, decision.unit_cap
            );
            if !decision.valid {
                process::exit(1);
            }
        }
    }
    Ok(())
}

fn load_store(path: &str) -> Result<MemoryStore> {
    let dataset: Dataset = load_json(path)?;
    Ok(MemoryStore::from_dataset(dataset))
}

fn load_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse JSON: {}", path))
}
