use serde::{Deserialize, Serialize};

/// One employee's display fields, named exactly as the upstream payload
/// names them. Duration fields are pre-formatted `HH:MM:SS` strings;
/// optional fields may be absent and get a placeholder at render time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRecord {
    #[serde(rename = "Employee ID")]
    pub employee_id: String,
    #[serde(rename = "Designation", default)]
    pub designation: Option<String>,
    #[serde(rename = "Account code", default)]
    pub account_code: Option<String>,
    #[serde(rename = "Billed", default)]
    pub billed: Option<String>,
    #[serde(rename = "Avg. In Time", default)]
    pub avg_in_time: Option<String>,
    #[serde(rename = "Avg. Out Time", default)]
    pub avg_out_time: Option<String>,
    #[serde(rename = "Avg. Bay hrs", default)]
    pub avg_bay_hours: Option<String>,
    #[serde(rename = "Avg. Break hrs", default)]
    pub avg_break_hours: Option<String>,
    #[serde(rename = "Avg. Office hrs", default)]
    pub avg_office_hours: Option<String>,
    #[serde(rename = "Half-Day leave", default)]
    pub half_day_leaves: Option<f64>,
    #[serde(rename = "Full-Day leave", default)]
    pub full_day_leaves: Option<f64>,
}

/// Severity classification computed upstream; consumed verbatim. Reasons
/// travel with the label so the badge can expose them as a tooltip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub label: String,
    pub score: i32,
    #[serde(default)]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationPayload {
    #[serde(rename = "RecommendedAction")]
    pub action: String,
    #[serde(rename = "Classification")]
    pub classification: String,
    #[serde(rename = "Justification")]
    pub justification: String,
}

/// One row of the peer dataset used for the comparison charts. Hour
/// columns are numeric here (unlike the display strings above) and the
/// account code arrives trimmed and lowercased.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerRecord {
    #[serde(rename = "Employee ID")]
    pub employee_id: String,
    #[serde(rename = "Account code", default)]
    pub account_code: String,
    #[serde(rename = "Avg. Office hrs")]
    pub avg_office_hours: f64,
    #[serde(rename = "Avg. Bay hrs")]
    pub avg_bay_hours: f64,
    #[serde(rename = "Avg. Break hrs")]
    pub avg_break_hours: f64,
    #[serde(rename = "Over-Break Ratio (%)", default)]
    pub over_break_ratio: f64,
    #[serde(rename = "Half-Day leave", default)]
    pub half_day_leaves: Option<f64>,
    #[serde(rename = "Full-Day leave", default)]
    pub full_day_leaves: Option<f64>,
}

/// The full lookup response: profile fields, upstream risk assessment and
/// recommendation, and the optional peer dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeePayload {
    #[serde(flatten)]
    pub employee: EmployeeRecord,
    #[serde(rename = "Risk")]
    pub risk: RiskAssessment,
    #[serde(flatten)]
    pub recommendation: RecommendationPayload,
    #[serde(rename = "GraphData", default)]
    pub graph_data: Option<Vec<PeerRecord>>,
}

pub fn hours_to_hms(hours: f64) -> String {
    let total_seconds = (hours * 3600.0).round() as i64;
    let h = total_seconds / 3600;
    let m = (total_seconds % 3600) / 60;
    let s = total_seconds % 60;
    format!("{h:02}:{m:02}:{s:02}")
}
