#![forbid(unsafe_code)]
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use examplan::{
    io,
    model::Period,
    scheduler::{improvement_suggestions, schedule_metrics, ScheduleOptions, Scheduler},
    Conflict,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification d'examens (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    #[cfg_attr(not(feature = "logging"), allow(dead_code))]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Générer un planning
    Generate {
        /// Cours : CSV d'inscriptions (student_id,course_code) ou JSON
        #[arg(long)]
        courses: String,
        /// Salles : CSV (classroom_id,capacity) ou JSON
        #[arg(long)]
        rooms: String,
        /// AAAA-MM-JJ
        #[arg(long)]
        start: NaiveDate,
        /// AAAA-MM-JJ (inclus)
        #[arg(long)]
        end: NaiveDate,
        #[arg(long, default_value_t = 1)]
        min_slot: i32,
        #[arg(long, default_value_t = 4)]
        max_slot: i32,
        #[arg(long, default_value_t = 2)]
        max_per_day: u32,
        #[arg(long, default_value_t = 1)]
        min_gap: u32,
        #[arg(long, default_value_t = 3)]
        attempts: usize,
        #[arg(long, default_value_t = 2)]
        duration_hours: u32,
        /// Graine des mélanges (reproductible)
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "Exam schedule")]
        name: String,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Auditer un planning JSON existant
    Audit {
        #[arg(long)]
        schedule: String,
        #[arg(long)]
        courses: String,
        /// Export CSV des conflits (optionnel)
        #[arg(long)]
        report: Option<String>,
    },

    /// Indicateurs et suggestions pour un planning JSON
    Metrics {
        #[arg(long)]
        schedule: String,
        #[arg(long)]
        courses: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Generate {
            courses,
            rooms,
            start,
            end,
            min_slot,
            max_slot,
            max_per_day,
            min_gap,
            attempts,
            duration_hours,
            seed,
            name,
            out_json,
            out_csv,
        } => {
            let courses = io::import_courses(courses)?;
            let rooms = io::import_classrooms(rooms)?;
            let period = Period::new(start, end, min_slot, max_slot)
                .with_max_exams_per_day(max_per_day)
                .with_min_gap(min_gap);
            let opts = ScheduleOptions {
                max_attempts: attempts,
                exam_duration_hours: duration_hours,
            };
            let rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let mut scheduler = Scheduler::with_rng(opts, rng);
            let schedule = scheduler.generate_schedule(&name, &courses, &rooms, period)?;

            if let Some(path) = out_json {
                io::export_schedule_json(path, &schedule)?;
            }
            if let Some(path) = out_csv {
                io::export_schedule_csv(path, &schedule)?;
            }
            for e in &schedule.exams {
                println!(
                    "{} | slot {} | {} | {} ({} seats)",
                    e.date, e.slot, e.course_code, e.classroom_id, e.capacity
                );
            }
            report_conflicts(&schedule.conflicts)
        }
        Commands::Audit {
            schedule,
            courses,
            report,
        } => {
            let schedule = io::load_schedule_json(schedule)?;
            let courses = io::import_courses(courses)?;
            let conflicts = examplan::audit_conflicts(&schedule, &courses);
            if let Some(path) = report {
                io::export_conflicts_csv(path, &conflicts)?;
            }
            report_conflicts(&conflicts)
        }
        Commands::Metrics { schedule, courses } => {
            let schedule = io::load_schedule_json(schedule)?;
            let courses = io::import_courses(courses)?;
            let m = schedule_metrics(&schedule, &courses);
            println!("exams: {}", m.total_exams);
            println!("classrooms used: {}", m.classrooms_used);
            println!("average exams per student: {:.2}", m.average_exams_per_student);
            for s in improvement_suggestions(&schedule) {
                println!("- {s}");
            }
            0
        }
    };

    std::process::exit(code);
}

/// Code 2 = WARNING (conflits consultatifs)
fn report_conflicts(conflicts: &[Conflict]) -> i32 {
    if conflicts.is_empty() {
        println!("OK: no conflicts");
        return 0;
    }
    eprintln!("Found {} conflict(s)", conflicts.len());
    for c in conflicts {
        eprintln!("[{}] {}", c.kind.as_str(), c.message);
    }
    2
}
