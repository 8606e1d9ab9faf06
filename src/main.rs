use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;

mod aggregate;
mod charts;
mod dashboard;
mod db;
mod geometry;
mod models;

#[derive(Parser)]
#[command(name = "attendance-dashboard")]
#[command(about = "Single-employee attendance risk dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Import employee attendance rows from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Build the dashboard render plan for one employee
    Dashboard {
        #[arg(long)]
        employee: String,
        #[arg(long, default_value = "render_plan.json")]
        out: PathBuf,
        /// Office-hours compliance bar for the quadrant chart
        #[arg(long, default_value_t = 8.45)]
        office_threshold: f64,
        /// Bay-hours compliance bar for the quadrant chart
        #[arg(long, default_value_t = 7.0)]
        bay_threshold: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a production Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let imported = db::import_csv(&pool, &csv).await?;
            println!("Imported {imported} employees from {}.", csv.display());
        }
        Commands::Dashboard {
            employee,
            out,
            office_threshold,
            bay_threshold,
        } => {
            // A miss and a transport failure read the same to the person
            // searching; details stay in the log.
            let payload = match db::fetch_payload(&pool, &employee).await {
                Ok(Some(payload)) => payload,
                Ok(None) => {
                    println!("Employee {employee} not found.");
                    return Ok(());
                }
                Err(err) => {
                    log::warn!("lookup for {employee} failed: {err:#}");
                    println!("Employee {employee} not found.");
                    return Ok(());
                }
            };

            let thresholds = geometry::ComplianceThresholds {
                office_hours: office_threshold,
                bay_hours: bay_threshold,
            };
            let plan = dashboard::build_render_plan(&payload, &thresholds);

            std::fs::write(&out, serde_json::to_string_pretty(&plan)?)?;

            println!(
                "Employee {} ({}, account {}, billed {})",
                plan.profile.employee_id,
                plan.profile.designation,
                plan.profile.account_code,
                plan.profile.billed
            );
            println!(
                "Hours: in {} / out {}, bay {}, break {}, office {}",
                plan.working_hours.avg_in_time,
                plan.working_hours.avg_out_time,
                plan.working_hours.avg_bay_hours,
                plan.working_hours.avg_break_hours,
                plan.working_hours.avg_office_hours
            );
            println!("Risk: {} (score {})", plan.risk.label, plan.risk.score);
            for reason in &plan.risk.reasons {
                println!("  - {reason}");
            }
            println!(
                "Recommendation [{} / {}]: {}",
                plan.recommendation.classification,
                plan.recommendation.color,
                plan.recommendation.action
            );
            match (&plan.quadrant_chart, &plan.leave_chart) {
                (Some(_), Some(_)) => println!("Charts: compliance quadrant, leave analysis."),
                (Some(_), None) => {
                    println!("Charts: compliance quadrant only (employee absent from peer dataset).")
                }
                _ => println!("Charts: none (no peer dataset)."),
            }
            println!("Render plan written to {}.", out.display());
        }
    }

    Ok(())
}
