use crate::infra::{load_dataset, DatasetSources};
use crate::output::{write_envelope, Operation};
use clap::{Args, Parser, Subcommand};
use obe_attainment::attainment::{AcademicPeriod, AttainmentEngine, CourseId, DepartmentId};
use obe_attainment::config::AppConfig;
use obe_attainment::error::AppError;
use obe_attainment::telemetry;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "obe-attainment",
    about = "Compute CLO, PO and PSO attainment from a curriculum dataset",
    version
)]
struct Cli {
    /// Dataset JSON file (defaults to OBE_DATASET)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,
    /// CSV of cohort counts to merge into the dataset
    #[arg(long, global = true)]
    records_csv: Option<PathBuf>,
    /// CSV of indirect survey responses to merge into the dataset
    #[arg(long, global = true)]
    surveys_csv: Option<PathBuf>,
    /// CSV articulation matrix of CLO to PO/PSO correlations
    #[arg(long, global = true)]
    mappings_csv: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Leveled attainment for each active CLO of a course
    Direct(CourseArgs),
    /// Mean survey level for each PO and PSO of a department
    Indirect(DepartmentArgs),
    /// Blended PO/PSO attainment for a course
    Final(CourseArgs),
}

#[derive(Args, Debug)]
struct PeriodArgs {
    /// Academic year, e.g. 2024-25
    #[arg(long)]
    year: String,
    /// Semester number within the academic year
    #[arg(long)]
    semester: u8,
}

impl PeriodArgs {
    fn period(&self) -> AcademicPeriod {
        AcademicPeriod::new(self.year.clone(), self.semester)
    }
}

#[derive(Args, Debug)]
struct CourseArgs {
    #[arg(long)]
    course: String,
    #[command(flatten)]
    period: PeriodArgs,
}

#[derive(Args, Debug)]
struct DepartmentArgs {
    #[arg(long)]
    department: String,
    #[command(flatten)]
    period: PeriodArgs,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let sources = DatasetSources {
        dataset: cli.dataset.or(config.dataset.path),
        records_csv: cli.records_csv,
        surveys_csv: cli.surveys_csv,
        mappings_csv: cli.mappings_csv,
    };
    let dataset = load_dataset(&sources)?;
    let engine = AttainmentEngine::new(Arc::new(dataset), config.engine);
    let stdout = io::stdout();

    match cli.command {
        Command::Direct(args) => {
            let course_id = CourseId(args.course);
            let period = args.period.period();
            info!(course = %course_id, %period, "running direct attainment");
            let result = engine.compute_direct_attainment(&course_id, &period)?;
            write_envelope(stdout.lock(), Operation::Direct, &period, &result)
        }
        Command::Indirect(args) => {
            let department_id = DepartmentId(args.department);
            let period = args.period.period();
            info!(department = %department_id, %period, "running indirect attainment");
            let result = engine.compute_indirect_attainment(&department_id, &period)?;
            write_envelope(stdout.lock(), Operation::Indirect, &period, &result)
        }
        Command::Final(args) => {
            let course_id = CourseId(args.course);
            let period = args.period.period();
            info!(course = %course_id, %period, "running final attainment");
            let result = engine.compute_final_attainment(&course_id, &period)?;
            write_envelope(stdout.lock(), Operation::Final, &period, &result)
        }
    }
}
