use anyhow::Context;
use chrono::NaiveTime;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{
    hours_to_hms, EmployeePayload, EmployeeRecord, PeerRecord, RecommendationPayload,
    RiskAssessment,
};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

struct SeedEmployee {
    employee_id: &'static str,
    designation: &'static str,
    account_code: &'static str,
    billed: bool,
    avg_in_time: NaiveTime,
    avg_out_time: NaiveTime,
    avg_bay_hours: f64,
    avg_break_hours: f64,
    avg_office_hours: f64,
    half_day_leaves: i32,
    full_day_leaves: i32,
    risk_label: &'static str,
    risk_score: i32,
    risk_reasons: Vec<String>,
    recommended_action: &'static str,
    classification: &'static str,
    justification: &'static str,
}

fn hms(h: u32, m: u32) -> anyhow::Result<NaiveTime> {
    NaiveTime::from_hms_opt(h, m, 0).context("invalid time")
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let employees = vec![
        SeedEmployee {
            employee_id: "EMP001",
            designation: "Software Engineer",
            account_code: "ACC1",
            billed: true,
            avg_in_time: hms(9, 12)?,
            avg_out_time: hms(18, 5)?,
            avg_bay_hours: 7.40,
            avg_break_hours: 1.05,
            avg_office_hours: 8.60,
            half_day_leaves: 1,
            full_day_leaves: 0,
            risk_label: "Low",
            risk_score: 15,
            risk_reasons: vec!["Break hours slightly high (1.1h > 1h).".to_string()],
            recommended_action:
                "Acknowledge & Retain: Send a positive note and consider for high-priority roles.",
            classification: "Punctual & Compliant",
            justification: "Employee's Average Bay Hours (7.40) meet or exceed the required 7 hours, and the Over-Break Ratio is 12.4% (benchmark: ≤20%).",
        },
        SeedEmployee {
            employee_id: "EMP002",
            designation: "Senior Analyst",
            account_code: "ACC1",
            billed: true,
            avg_in_time: hms(9, 48)?,
            avg_out_time: hms(17, 42)?,
            avg_bay_hours: 6.10,
            avg_break_hours: 1.60,
            avg_office_hours: 7.90,
            half_day_leaves: 3,
            full_day_leaves: 1,
            risk_label: "Medium",
            risk_score: 55,
            risk_reasons: vec![
                "Office hours slightly low (7.9h < 8h).".to_string(),
                "Break hours high (1.6h > 1.5h).".to_string(),
            ],
            recommended_action:
                "Focused Discussion: Time management coaching and 30-day monitoring period.",
            classification: "Office-Time Deficient",
            justification: "Employee's Average Bay Hours (6.10) are 12.9% below the required 7 hours, and the Over-Break Ratio is 20.8% (benchmark: ≤20%).",
        },
        SeedEmployee {
            employee_id: "EMP003",
            designation: "Support Specialist",
            account_code: "ACC2",
            billed: false,
            avg_in_time: hms(10, 21)?,
            avg_out_time: hms(17, 10)?,
            avg_bay_hours: 4.80,
            avg_break_hours: 2.10,
            avg_office_hours: 6.90,
            half_day_leaves: 2,
            full_day_leaves: 4,
            risk_label: "High",
            risk_score: 75,
            risk_reasons: vec![
                "Office hours slightly low (6.9h < 8h).".to_string(),
                "Break hours high (2.1h > 1.5h).".to_string(),
                "Bay ratio low (0.70 < 0.75).".to_string(),
            ],
            recommended_action:
                "Formal Review: Escalate to manager & HR for potential role change or transition.",
            classification: "Critically Deficient",
            justification: "Employee's Average Bay Hours (4.80) are 31.4% below the required 7 hours, and the Over-Break Ratio is 30.4% (benchmark: ≤20%).",
        },
        SeedEmployee {
            employee_id: "EMP004",
            designation: "Project Manager",
            account_code: "ACC2",
            billed: true,
            avg_in_time: hms(8, 55)?,
            avg_out_time: hms(18, 20)?,
            avg_bay_hours: 7.90,
            avg_break_hours: 0.80,
            avg_office_hours: 8.80,
            half_day_leaves: 0,
            full_day_leaves: 2,
            risk_label: "Low",
            risk_score: 0,
            risk_reasons: vec!["No major issues detected.".to_string()],
            recommended_action:
                "Acknowledge & Retain: Send a positive note and consider for high-priority roles.",
            classification: "Punctual & Compliant",
            justification: "Employee's Average Bay Hours (7.90) meet or exceed the required 7 hours, and the Over-Break Ratio is 9.2% (benchmark: ≤20%).",
        },
    ];

    for employee in employees {
        upsert_employee(
            pool,
            &UpsertEmployee {
                employee_id: employee.employee_id.to_string(),
                designation: Some(employee.designation.to_string()),
                account_code: Some(employee.account_code.to_string()),
                billed: Some(employee.billed),
                avg_in_time: Some(employee.avg_in_time),
                avg_out_time: Some(employee.avg_out_time),
                avg_bay_hours: employee.avg_bay_hours,
                avg_break_hours: employee.avg_break_hours,
                avg_office_hours: employee.avg_office_hours,
                half_day_leaves: Some(employee.half_day_leaves),
                full_day_leaves: Some(employee.full_day_leaves),
                risk_label: employee.risk_label.to_string(),
                risk_score: employee.risk_score,
                risk_reasons: employee.risk_reasons,
                recommended_action: employee.recommended_action.to_string(),
                classification: employee.classification.to_string(),
                justification: employee.justification.to_string(),
            },
        )
        .await?;
    }

    Ok(())
}

struct UpsertEmployee {
    employee_id: String,
    designation: Option<String>,
    account_code: Option<String>,
    billed: Option<bool>,
    avg_in_time: Option<NaiveTime>,
    avg_out_time: Option<NaiveTime>,
    avg_bay_hours: f64,
    avg_break_hours: f64,
    avg_office_hours: f64,
    half_day_leaves: Option<i32>,
    full_day_leaves: Option<i32>,
    risk_label: String,
    risk_score: i32,
    risk_reasons: Vec<String>,
    recommended_action: String,
    classification: String,
    justification: String,
}

async fn upsert_employee(pool: &PgPool, employee: &UpsertEmployee) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO attendance_dashboard.employees
        (id, employee_id, designation, account_code, billed,
         avg_in_time, avg_out_time, avg_bay_hours, avg_break_hours, avg_office_hours,
         half_day_leaves, full_day_leaves,
         risk_label, risk_score, risk_reasons,
         recommended_action, classification, justification)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
        ON CONFLICT (employee_id) DO UPDATE
        SET designation = EXCLUDED.designation,
            account_code = EXCLUDED.account_code,
            billed = EXCLUDED.billed,
            avg_in_time = EXCLUDED.avg_in_time,
            avg_out_time = EXCLUDED.avg_out_time,
            avg_bay_hours = EXCLUDED.avg_bay_hours,
            avg_break_hours = EXCLUDED.avg_break_hours,
            avg_office_hours = EXCLUDED.avg_office_hours,
            half_day_leaves = EXCLUDED.half_day_leaves,
            full_day_leaves = EXCLUDED.full_day_leaves,
            risk_label = EXCLUDED.risk_label,
            risk_score = EXCLUDED.risk_score,
            risk_reasons = EXCLUDED.risk_reasons,
            recommended_action = EXCLUDED.recommended_action,
            classification = EXCLUDED.classification,
            justification = EXCLUDED.justification
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(normalize_employee_id(&employee.employee_id))
    .bind(&employee.designation)
    .bind(&employee.account_code)
    .bind(employee.billed)
    .bind(employee.avg_in_time)
    .bind(employee.avg_out_time)
    .bind(employee.avg_bay_hours)
    .bind(employee.avg_break_hours)
    .bind(employee.avg_office_hours)
    .bind(employee.half_day_leaves)
    .bind(employee.full_day_leaves)
    .bind(&employee.risk_label)
    .bind(employee.risk_score)
    .bind(&employee.risk_reasons)
    .bind(&employee.recommended_action)
    .bind(&employee.classification)
    .bind(&employee.justification)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        employee_id: String,
        designation: Option<String>,
        account_code: Option<String>,
        billed: Option<bool>,
        avg_in_time: Option<NaiveTime>,
        avg_out_time: Option<NaiveTime>,
        avg_bay_hours: f64,
        avg_break_hours: f64,
        avg_office_hours: f64,
        half_day_leaves: Option<i32>,
        full_day_leaves: Option<i32>,
        risk_label: String,
        risk_score: i32,
        risk_reasons: Option<String>,
        recommended_action: String,
        classification: String,
        justification: String,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut imported = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        // reasons arrive as one semicolon-separated cell
        let reasons: Vec<String> = row
            .risk_reasons
            .as_deref()
            .unwrap_or("")
            .split(';')
            .map(str::trim)
            .filter(|reason| !reason.is_empty())
            .map(String::from)
            .collect();

        upsert_employee(
            pool,
            &UpsertEmployee {
                employee_id: row.employee_id,
                designation: row.designation,
                account_code: row.account_code,
                billed: row.billed,
                avg_in_time: row.avg_in_time,
                avg_out_time: row.avg_out_time,
                avg_bay_hours: row.avg_bay_hours,
                avg_break_hours: row.avg_break_hours,
                avg_office_hours: row.avg_office_hours,
                half_day_leaves: row.half_day_leaves,
                full_day_leaves: row.full_day_leaves,
                risk_label: row.risk_label,
                risk_score: row.risk_score,
                risk_reasons: reasons,
                recommended_action: row.recommended_action,
                classification: row.classification,
                justification: row.justification,
            },
        )
        .await?;

        imported += 1;
    }

    Ok(imported)
}

/// Looks up one employee and assembles the full dashboard payload. A miss
/// returns `Ok(None)`; the peer dataset always covers every stored row.
pub async fn fetch_payload(
    pool: &PgPool,
    employee_id: &str,
) -> anyhow::Result<Option<EmployeePayload>> {
    let normalized = normalize_employee_id(employee_id);
    log::debug!("looking up employee {normalized}");

    let row = sqlx::query(
        "SELECT employee_id, designation, account_code, billed, \
         avg_in_time, avg_out_time, avg_bay_hours, avg_break_hours, avg_office_hours, \
         half_day_leaves, full_day_leaves, \
         risk_label, risk_score, risk_reasons, \
         recommended_action, classification, justification \
         FROM attendance_dashboard.employees WHERE employee_id = $1",
    )
    .bind(&normalized)
    .fetch_optional(pool)
    .await
    .context("employee lookup failed")?;

    let Some(row) = row else {
        return Ok(None);
    };

    let employee = EmployeeRecord {
        employee_id: row.get("employee_id"),
        designation: row.get("designation"),
        account_code: row.get("account_code"),
        billed: row
            .get::<Option<bool>, _>("billed")
            .map(|billed| if billed { "Yes" } else { "No" }.to_string()),
        avg_in_time: row
            .get::<Option<NaiveTime>, _>("avg_in_time")
            .map(|t| t.format("%H:%M:%S").to_string()),
        avg_out_time: row
            .get::<Option<NaiveTime>, _>("avg_out_time")
            .map(|t| t.format("%H:%M:%S").to_string()),
        avg_bay_hours: Some(hours_to_hms(row.get("avg_bay_hours"))),
        avg_break_hours: Some(hours_to_hms(row.get("avg_break_hours"))),
        avg_office_hours: Some(hours_to_hms(row.get("avg_office_hours"))),
        half_day_leaves: row.get::<Option<i32>, _>("half_day_leaves").map(f64::from),
        full_day_leaves: row.get::<Option<i32>, _>("full_day_leaves").map(f64::from),
    };

    let risk = RiskAssessment {
        label: row.get("risk_label"),
        score: row.get("risk_score"),
        reasons: row.get("risk_reasons"),
    };

    let recommendation = RecommendationPayload {
        action: row.get("recommended_action"),
        classification: row.get("classification"),
        justification: row.get("justification"),
    };

    let peers = fetch_peers(pool).await?;
    log::debug!("peer dataset holds {} records", peers.len());

    Ok(Some(EmployeePayload {
        employee,
        risk,
        recommendation,
        graph_data: Some(peers),
    }))
}

async fn fetch_peers(pool: &PgPool) -> anyhow::Result<Vec<PeerRecord>> {
    let rows = sqlx::query(
        "SELECT employee_id, account_code, avg_office_hours, avg_bay_hours, avg_break_hours, \
         half_day_leaves, full_day_leaves \
         FROM attendance_dashboard.employees ORDER BY employee_id",
    )
    .fetch_all(pool)
    .await
    .context("peer dataset fetch failed")?;

    let mut peers = Vec::with_capacity(rows.len());

    for row in rows {
        let office: f64 = row.get("avg_office_hours");
        let bay: f64 = row.get("avg_bay_hours");
        let brk: f64 = row.get("avg_break_hours");
        let office_total = office + brk;
        let over_break_ratio = if office_total > 0.0 {
            brk / office_total * 100.0
        } else {
            0.0
        };

        peers.push(PeerRecord {
            employee_id: row.get("employee_id"),
            account_code: row
                .get::<Option<String>, _>("account_code")
                .unwrap_or_default()
                .trim()
                .to_lowercase(),
            avg_office_hours: round2(office),
            avg_bay_hours: round2(bay),
            avg_break_hours: round2(brk),
            over_break_ratio: round2(over_break_ratio),
            half_day_leaves: row.get::<Option<i32>, _>("half_day_leaves").map(f64::from),
            full_day_leaves: row.get::<Option<i32>, _>("full_day_leaves").map(f64::from),
        });
    }

    Ok(peers)
}

fn normalize_employee_id(employee_id: &str) -> String {
    employee_id.trim().to_uppercase()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employee_ids_are_trimmed_and_uppercased() {
        assert_eq!(normalize_employee_id(" emp001 "), "EMP001");
        assert_eq!(normalize_employee_id("EMP001"), "EMP001");
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round2(8.456), 8.46);
        assert_eq!(round2(7.0), 7.0);
        // over-break ratio example: 1.05 / (8.6 + 1.05)
        assert_eq!(round2(1.05 / 9.65 * 100.0), 10.88);
    }
}
