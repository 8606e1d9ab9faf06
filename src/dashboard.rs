use serde::Serialize;

use crate::aggregate::{self, LeaveType};
use crate::charts::{self, ChartSpec};
use crate::geometry::ComplianceThresholds;
use crate::models::EmployeePayload;

/// Shown for any profile field the payload does not carry.
pub const MISSING_FIELD_PLACEHOLDER: &str = "—";

/// Classification keywords checked top-down; first substring match wins,
/// anything unmatched renders neutral.
const CLASSIFICATION_COLORS: [(&str, &str); 4] = [
    ("Punctual", "green"),
    ("Bay", "orange"),
    ("Office", "orange"),
    ("Critical", "red"),
];

const NEUTRAL_COLOR: &str = "gray";

pub fn classification_color(classification: &str) -> &'static str {
    CLASSIFICATION_COLORS
        .iter()
        .find(|(keyword, _)| classification.contains(keyword))
        .map(|&(_, color)| color)
        .unwrap_or(NEUTRAL_COLOR)
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfilePanel {
    pub employee_id: String,
    pub designation: String,
    pub account_code: String,
    pub billed: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkingHoursPanel {
    pub avg_in_time: String,
    pub avg_out_time: String,
    pub avg_bay_hours: String,
    pub avg_break_hours: String,
    pub avg_office_hours: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskPanel {
    pub label: String,
    pub score: i32,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationPanel {
    pub action: String,
    pub classification: String,
    pub justification: String,
    pub color: &'static str,
}

/// Everything the presentation layer needs to draw one dashboard. Panels
/// are always populated; the chart slots are `None` whenever their inputs
/// are not available.
#[derive(Debug, Clone, Serialize)]
pub struct RenderPlan {
    pub profile: ProfilePanel,
    pub working_hours: WorkingHoursPanel,
    pub risk: RiskPanel,
    pub recommendation: RecommendationPanel,
    pub quadrant_chart: Option<ChartSpec>,
    pub leave_chart: Option<ChartSpec>,
}

pub fn build_render_plan(payload: &EmployeePayload, thresholds: &ComplianceThresholds) -> RenderPlan {
    let employee = &payload.employee;
    let display = |field: &Option<String>| {
        field
            .clone()
            .unwrap_or_else(|| MISSING_FIELD_PLACEHOLDER.to_string())
    };

    let peers = payload.graph_data.as_deref().unwrap_or(&[]);

    // An absent or empty peer dataset suppresses both charts; the panels
    // below render regardless.
    let (quadrant_chart, leave_chart) = if peers.is_empty() {
        (None, None)
    } else {
        let quadrant = charts::build_quadrant_chart(peers, &employee.employee_id, thresholds);
        let leave = peers
            .iter()
            .find(|peer| peer.employee_id == employee.employee_id)
            .map(|selected| {
                let org_avg = aggregate::compute_averages(peers, &LeaveType::ALL);
                let account_avg = aggregate::compute_averages(
                    aggregate::account_group(peers, &selected.account_code),
                    &LeaveType::ALL,
                );
                charts::build_leave_chart(selected, &account_avg, &org_avg)
            });
        (quadrant, leave)
    };

    RenderPlan {
        profile: ProfilePanel {
            employee_id: employee.employee_id.clone(),
            designation: display(&employee.designation),
            account_code: display(&employee.account_code),
            billed: display(&employee.billed),
        },
        working_hours: WorkingHoursPanel {
            avg_in_time: display(&employee.avg_in_time),
            avg_out_time: display(&employee.avg_out_time),
            avg_bay_hours: display(&employee.avg_bay_hours),
            avg_break_hours: display(&employee.avg_break_hours),
            avg_office_hours: display(&employee.avg_office_hours),
        },
        risk: RiskPanel {
            label: payload.risk.label.clone(),
            score: payload.risk.score,
            reasons: payload.risk.reasons.clone(),
        },
        recommendation: RecommendationPanel {
            action: payload.recommendation.action.clone(),
            classification: payload.recommendation.classification.clone(),
            justification: payload.recommendation.justification.clone(),
            color: classification_color(&payload.recommendation.classification),
        },
        quadrant_chart,
        leave_chart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmployeeRecord, PeerRecord, RecommendationPayload, RiskAssessment};

    fn peer(id: &str, account: &str, office: f64, bay: f64, half_day: f64, full_day: f64) -> PeerRecord {
        PeerRecord {
            employee_id: id.to_string(),
            account_code: account.to_string(),
            avg_office_hours: office,
            avg_bay_hours: bay,
            avg_break_hours: 1.0,
            over_break_ratio: 10.0,
            half_day_leaves: Some(half_day),
            full_day_leaves: Some(full_day),
        }
    }

    fn payload(employee_id: &str, peers: Option<Vec<PeerRecord>>) -> EmployeePayload {
        EmployeePayload {
            employee: EmployeeRecord {
                employee_id: employee_id.to_string(),
                designation: Some("Software Engineer".to_string()),
                account_code: Some("ACC1".to_string()),
                billed: Some("Yes".to_string()),
                avg_in_time: Some("09:12:00".to_string()),
                avg_out_time: Some("18:05:00".to_string()),
                avg_bay_hours: Some("07:24:00".to_string()),
                avg_break_hours: Some("01:03:00".to_string()),
                avg_office_hours: Some("08:36:00".to_string()),
                half_day_leaves: Some(1.0),
                full_day_leaves: Some(0.0),
            },
            risk: RiskAssessment {
                label: "Low".to_string(),
                score: 15,
                reasons: vec!["Break hours slightly high (1.1h > 1h).".to_string()],
            },
            recommendation: RecommendationPayload {
                action: "Acknowledge & Retain".to_string(),
                classification: "Punctual & Compliant".to_string(),
                justification: "Bay hours meet the bar.".to_string(),
            },
            graph_data: peers,
        }
    }

    #[test]
    fn classification_colors_follow_declared_priority() {
        assert_eq!(classification_color("Punctual & Compliant"), "green");
        assert_eq!(classification_color("Bay-Time Deficient"), "orange");
        assert_eq!(classification_color("Office-Time Deficient"), "orange");
        assert_eq!(classification_color("Critically Deficient"), "red");
        assert_eq!(classification_color("Critical staffing issue"), "red");
        assert_eq!(classification_color("Unclassified"), "gray");
        // first keyword in the table wins when several match
        assert_eq!(classification_color("Punctual but Critical"), "green");
    }

    #[test]
    fn two_peer_scenario_produces_both_charts() {
        let peers = vec![
            peer("1", "A", 9.0, 8.0, 1.0, 0.0),
            peer("2", "A", 6.0, 5.0, 0.0, 1.0),
        ];
        let plan = payload_plan("1", Some(peers));

        let quadrant = plan.quadrant_chart.expect("quadrant chart present");
        assert_eq!(quadrant.series.len(), 2);
        match &quadrant.series[1].x {
            crate::charts::AxisValues::Numbers(x) => assert_eq!(x, &vec![9.0]),
            _ => panic!("highlight x must be numeric"),
        }
        assert_eq!(quadrant.series[1].y, vec![8.0]);

        let leave = plan.leave_chart.expect("leave chart present");
        assert_eq!(leave.series.len(), 3);
        // org mean of (1,0) and (0,1) rounds to 1 per field; the account
        // group is the same two records here
        assert_eq!(leave.series[2].name, "Organization Avg: 1 HD / 1 FD");
        assert_eq!(leave.series[1].y, vec![1.0, 1.0]);
    }

    #[test]
    fn selected_employee_absent_from_peers_omits_leave_chart() {
        let peers = vec![
            peer("2", "A", 6.0, 5.0, 0.0, 1.0),
            peer("3", "B", 7.0, 6.0, 2.0, 2.0),
        ];
        let plan = payload_plan("1", Some(peers));

        let quadrant = plan.quadrant_chart.expect("quadrant chart present");
        assert_eq!(quadrant.series.len(), 1);
        assert!(plan.leave_chart.is_none());
    }

    #[test]
    fn empty_or_absent_peer_dataset_suppresses_all_charts() {
        let with_empty = payload_plan("1", Some(Vec::new()));
        assert!(with_empty.quadrant_chart.is_none());
        assert!(with_empty.leave_chart.is_none());

        let with_absent = payload_plan("1", None);
        assert!(with_absent.quadrant_chart.is_none());
        assert!(with_absent.leave_chart.is_none());
        assert_eq!(with_absent.profile.employee_id, "1");
        assert_eq!(with_absent.risk.label, "Low");
    }

    #[test]
    fn missing_display_fields_fall_back_to_placeholder() {
        let mut p = payload("1", None);
        p.employee.designation = None;
        p.employee.billed = None;
        p.employee.avg_in_time = None;

        let plan = build_render_plan(&p, &ComplianceThresholds::default());
        assert_eq!(plan.profile.designation, MISSING_FIELD_PLACEHOLDER);
        assert_eq!(plan.profile.billed, MISSING_FIELD_PLACEHOLDER);
        assert_eq!(plan.working_hours.avg_in_time, MISSING_FIELD_PLACEHOLDER);
        assert_eq!(plan.profile.account_code, "ACC1");
    }

    #[test]
    fn risk_reasons_survive_into_the_plan() {
        let plan = payload_plan("1", None);
        assert_eq!(plan.risk.score, 15);
        assert_eq!(plan.risk.reasons.len(), 1);
        assert_eq!(plan.recommendation.color, "green");
    }

    fn payload_plan(employee_id: &str, peers: Option<Vec<PeerRecord>>) -> RenderPlan {
        build_render_plan(&payload(employee_id, peers), &ComplianceThresholds::default())
    }
}
