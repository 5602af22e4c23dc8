use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod error;
mod gpa;
mod grading;
mod models;
mod record;
mod report;
mod requests;
mod store;
mod summary;

use models::{AcademicRecord, DeliveryMethod, TranscriptKind};

#[derive(Parser)]
#[command(name = "portal-academics")]
#[command(about = "Grades, GPA projections and academic requests for the student portal", long_about = None)]
struct Cli {
    /// Academic record JSON file (overrides PORTAL_RECORD_PATH)
    #[arg(long, global = true)]
    record: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the built-in demo record to the record file
    Seed,
    /// Import courses from a CSV file into the record
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Show cumulative or per-semester GPA
    Gpa {
        #[arg(long)]
        semester: Option<String>,
    },
    /// Project the CGPA with hypothetical grades (CODE=GRADE)
    WhatIf {
        #[arg(long = "set", value_parser = parse_grade_change)]
        changes: Vec<gpa::GradeChange>,
        /// Courses still to be taken (CREDITS:GRADE)
        #[arg(long = "plan", value_parser = parse_custom_course)]
        planned: Vec<gpa::CustomCourse>,
    },
    /// GPA of an ad hoc list of courses (CREDITS:GRADE)
    Custom {
        #[arg(required = true, value_parser = parse_custom_course)]
        courses: Vec<gpa::CustomCourse>,
    },
    /// Show CGPA, classification and warning status
    Standing,
    /// Count grades by letter
    Distribution,
    /// GPA per semester in chronological order
    Progress,
    /// Look up the grading scale by grade or score
    #[command(group(
        ArgGroup::new("key")
            .args(["grade", "score"])
            .multiple(false)
    ))]
    Lookup {
        #[arg(long)]
        grade: Option<String>,
        #[arg(long)]
        score: Option<f64>,
    },
    /// Generate a markdown standing report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Request a transcript
    RequestTranscript {
        #[arg(long, value_enum, default_value_t = TranscriptKind::Official)]
        kind: TranscriptKind,
        #[arg(long)]
        purpose: String,
        #[arg(long)]
        destination: String,
        #[arg(long, default_value_t = 1)]
        copies: u32,
        #[arg(long, value_enum, default_value_t = DeliveryMethod::Electronic)]
        delivery: DeliveryMethod,
    },
    /// Appeal a published grade
    Appeal {
        #[arg(long)]
        course: String,
        #[arg(long)]
        requested_grade: Option<String>,
        #[arg(long)]
        reason: String,
    },
}

fn parse_grade_change(raw: &str) -> Result<gpa::GradeChange, String> {
    let (code, grade) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=GRADE, got {raw}"))?;
    Ok(gpa::GradeChange {
        course_code: code.trim().to_uppercase(),
        grade: grade.trim().to_uppercase(),
    })
}

fn parse_custom_course(raw: &str) -> Result<gpa::CustomCourse, String> {
    let (credits, grade) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected CREDITS:GRADE, got {raw}"))?;
    let credits = credits
        .trim()
        .parse::<u32>()
        .map_err(|err| format!("invalid credits in {raw}: {err}"))?;
    Ok(gpa::CustomCourse {
        credits,
        grade: grade.trim().to_uppercase(),
    })
}

fn load_or_mock(path: &Path) -> anyhow::Result<AcademicRecord> {
    if path.exists() {
        store::load_record(path)
    } else {
        info!(path = %path.display(), "record file not found, using demo record");
        store::mock_record()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = config::AppConfig::load().context("failed to load configuration")?;
    let record_path = cli
        .record
        .clone()
        .unwrap_or_else(|| PathBuf::from(cfg.record_path_or_default()));

    match cli.command {
        Commands::Seed => {
            store::save_record(&record_path, &store::mock_record()?)?;
            println!("Demo record written to {}.", record_path.display());
        }
        Commands::Import { csv } => {
            let mut record = load_or_mock(&record_path)?;
            let inserted = store::import_courses_csv(&mut record, &csv)?;
            store::save_record(&record_path, &record)?;
            println!("Inserted {inserted} courses from {}.", csv.display());
        }
        Commands::Gpa { semester } => {
            let record = load_or_mock(&record_path)?;
            match semester {
                Some(id) => {
                    let semester = record
                        .semesters
                        .iter()
                        .find(|s| s.id == id || s.name == id)
                        .with_context(|| format!("no semester named {id}"))?;
                    println!(
                        "{} ({}): GPA {:.2} over {} credits",
                        semester.name,
                        semester.status.as_str(),
                        semester.gpa(),
                        semester.total_credits()
                    );
                }
                None => {
                    println!(
                        "CGPA {:.2} over {} credit hours",
                        record::cumulative_gpa(&record),
                        record::total_credit_hours(&record)
                    );
                }
            }
        }
        Commands::WhatIf { changes, planned } => {
            let record = load_or_mock(&record_path)?;
            let courses = record::all_courses(&record);
            let baseline = gpa::calculate_gpa(&courses);
            let projected = if planned.is_empty() {
                gpa::project_what_if(&courses, &changes)
            } else {
                gpa::project_with_planned(&gpa::apply_changes(&courses, &changes), &planned)
            };
            println!("Current CGPA {baseline:.2}, projected CGPA {projected:.2}");
            println!("Projected classification: {}", record::honors_classification(projected));
        }
        Commands::Custom { courses } => {
            let result = gpa::custom_gpa(&courses);
            println!("GPA {result:.2} ({})", record::honors_classification(result));
        }
        Commands::Standing => {
            let record = load_or_mock(&record_path)?;
            let standing = record::standing(&record);
            println!("{} ({})", record.student_name, record.student_id);
            println!(
                "CGPA {:.2} over {} credit hours: {}",
                standing.cumulative_gpa, standing.total_credit_hours, standing.classification
            );
            if let Some(current) = standing.current_semester {
                println!("Current semester: {current}");
            }
            if standing.academic_warning {
                println!("Academic warning: a recent semester GPA fell below 2.00.");
            }
        }
        Commands::Distribution => {
            let record = load_or_mock(&record_path)?;
            let distribution = summary::grade_distribution(&record::all_courses(&record));
            if distribution.is_empty() {
                println!("No graded courses.");
                return Ok(());
            }
            for (letter, pct) in summary::distribution_percentages(&distribution) {
                let count = distribution.get(&letter).copied().unwrap_or(0);
                println!("- {letter}: {count} ({pct:.1}%)");
            }
        }
        Commands::Progress => {
            let record = load_or_mock(&record_path)?;
            let series = summary::progress_series(&record.semesters);
            println!("{}", serde_json::to_string_pretty(&series)?);
        }
        Commands::Lookup { grade, score } => match (grade, score) {
            (Some(grade), _) => {
                let grade = grade.trim().to_uppercase();
                println!(
                    "{grade}: {:.1} points, {}",
                    grading::grade_points(&grade),
                    grading::grade_description(&grade)
                );
            }
            (None, Some(score)) => {
                let grade = grading::grade_for_score(score);
                println!("{score}: {grade} ({})", grading::grade_description(grade));
            }
            (None, None) => {
                for entry in grading::GRADING_SYSTEM.iter() {
                    println!(
                        "- {:<2} {:>3}-{:<3} {:.1} {}",
                        entry.grade, entry.min, entry.max, entry.points, entry.description
                    );
                }
            }
        },
        Commands::Report { out } => {
            let record = load_or_mock(&record_path)?;
            let report = report::build_report(&record, chrono::Utc::now().date_naive());
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::RequestTranscript {
            kind,
            purpose,
            destination,
            copies,
            delivery,
        } => {
            let desk = requests::RequestDesk::new(
                Duration::from_millis(cfg.submission_delay_ms_or_default()),
                cfg.official_fee_or_default(),
            );
            let request = desk
                .submit_transcript(requests::TranscriptDraft {
                    kind,
                    purpose,
                    destination,
                    copies,
                    delivery,
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
        Commands::Appeal {
            course,
            requested_grade,
            reason,
        } => {
            let record = load_or_mock(&record_path)?;
            let desk = requests::RequestDesk::new(
                Duration::from_millis(cfg.submission_delay_ms_or_default()),
                cfg.official_fee_or_default(),
            );
            let appeal = desk
                .submit_appeal(
                    &record,
                    requests::AppealDraft {
                        course_code: course,
                        requested_grade: requested_grade.map(|g| g.trim().to_uppercase()),
                        reason,
                    },
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&appeal)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_changes_parse_code_and_grade() {
        let change = parse_grade_change("cs201 = b+").unwrap();
        assert_eq!(change.course_code, "CS201");
        assert_eq!(change.grade, "B+");
        assert!(parse_grade_change("CS201").is_err());
    }

    #[test]
    fn custom_courses_parse_credits() {
        let course = parse_custom_course("3:a").unwrap();
        assert_eq!(course.credits, 3);
        assert_eq!(course.grade, "A");
        assert!(parse_custom_course("x:A").is_err());
        assert!(parse_custom_course("3A").is_err());
    }

    #[test]
    fn cli_accepts_repeated_changes() {
        let cli = Cli::try_parse_from([
            "portal-academics",
            "what-if",
            "--set",
            "CS201=A",
            "--set",
            "MATH201=B",
            "--plan",
            "3:A",
        ])
        .unwrap();
        match cli.command {
            Commands::WhatIf { changes, planned } => {
                assert_eq!(changes.len(), 2);
                assert_eq!(planned.len(), 1);
            }
            _ => panic!("expected what-if"),
        }
    }

    #[test]
    fn lookup_rejects_grade_and_score_together() {
        assert!(Cli::try_parse_from([
            "portal-academics",
            "lookup",
            "--grade",
            "A",
            "--score",
            "80"
        ])
        .is_err());
    }
}
