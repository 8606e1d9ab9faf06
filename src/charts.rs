use std::collections::BTreeMap;

use serde::Serialize;

use crate::aggregate::LeaveType;
use crate::geometry::{self, ComplianceThresholds, Point, QuadrantGeometry, QuadrantLabel};
use crate::models::PeerRecord;

/// Declarative description of one chart. Built fresh per lookup, never
/// mutated afterwards; drawing is entirely the presentation layer's job.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub series: Vec<Series>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Scatter,
    Bar,
}

/// Scatter series carry numeric x values, bar series category names.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AxisValues {
    Numbers(Vec<f64>),
    Categories(Vec<String>),
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Series {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SeriesKind,
    pub x: AxisValues,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(rename = "textposition", skip_serializing_if = "Option::is_none")]
    pub text_position: Option<String>,
    pub marker: Marker,
}

#[derive(Debug, Clone, Serialize)]
pub struct AxisSpec {
    pub title: String,
    #[serde(rename = "zeroline", skip_serializing_if = "Option::is_none")]
    pub zero_line: Option<bool>,
    #[serde(rename = "tickvals", skip_serializing_if = "Option::is_none")]
    pub tick_vals: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineStyle {
    pub dash: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Shape {
    #[serde(rename = "type")]
    pub kind: String,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    pub line: LineStyle,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnotationFont {
    pub size: u32,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
    #[serde(rename = "showarrow")]
    pub show_arrow: bool,
    pub font: AnnotationFont,
    #[serde(rename = "xanchor")]
    pub x_anchor: String,
    #[serde(rename = "yanchor")]
    pub y_anchor: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub orientation: String,
    pub x: f64,
    #[serde(rename = "xanchor")]
    pub x_anchor: String,
    pub y: f64,
    #[serde(rename = "yanchor")]
    pub y_anchor: String,
}

impl Legend {
    fn horizontal_top() -> Self {
        Self {
            orientation: "h".to_string(),
            x: 0.5,
            x_anchor: "center".to_string(),
            y: 1.15,
            y_anchor: "bottom".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Margin {
    pub t: u32,
    pub l: u32,
    pub r: u32,
    pub b: u32,
}

impl Margin {
    fn uniform(size: u32) -> Self {
        Self {
            t: size,
            l: size,
            r: size,
            b: size,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    #[serde(rename = "xaxis")]
    pub x_axis: AxisSpec,
    #[serde(rename = "yaxis")]
    pub y_axis: AxisSpec,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shapes: Vec<Shape>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(rename = "barmode", skip_serializing_if = "Option::is_none")]
    pub bar_mode: Option<String>,
    pub legend: Legend,
    pub margin: Margin,
    #[serde(rename = "hovermode", skip_serializing_if = "Option::is_none")]
    pub hover_mode: Option<String>,
}

/// Scatter of every peer's (office-hours, bay-hours) point, with the
/// selected employee highlighted when present. Returns `None` on an empty
/// peer set; a missing selected id just omits the highlight series.
pub fn build_quadrant_chart(
    peers: &[PeerRecord],
    selected_id: &str,
    thresholds: &ComplianceThresholds,
) -> Option<ChartSpec> {
    let points: Vec<Point> = peers
        .iter()
        .map(|peer| Point {
            x: peer.avg_office_hours,
            y: peer.avg_bay_hours,
        })
        .collect();
    let geometry = geometry::compute_geometry(&points, thresholds).ok()?;

    let mut series = vec![Series {
        name: "All Employees".to_string(),
        kind: SeriesKind::Scatter,
        x: AxisValues::Numbers(points.iter().map(|p| p.x).collect()),
        y: points.iter().map(|p| p.y).collect(),
        mode: Some("markers".to_string()),
        text: Some(peers.iter().map(|peer| peer.employee_id.clone()).collect()),
        text_position: None,
        marker: Marker {
            color: "rgba(0,123,255,0.6)".to_string(),
            size: Some(10),
            symbol: None,
        },
    }];

    if let Some(selected) = peers.iter().find(|peer| peer.employee_id == selected_id) {
        series.push(Series {
            name: "Selected Employee".to_string(),
            kind: SeriesKind::Scatter,
            x: AxisValues::Numbers(vec![selected.avg_office_hours]),
            y: vec![selected.avg_bay_hours],
            mode: Some("markers+text".to_string()),
            text: Some(vec![format!("Employee {selected_id}")]),
            text_position: Some("top center".to_string()),
            marker: Marker {
                color: "red".to_string(),
                size: Some(14),
                symbol: Some("star".to_string()),
            },
        });
    }

    let layout = Layout {
        x_axis: AxisSpec {
            title: "Avg. Office Hours".to_string(),
            zero_line: Some(false),
            tick_vals: None,
        },
        y_axis: AxisSpec {
            title: "Avg. Bay Hours".to_string(),
            zero_line: Some(false),
            tick_vals: Some(vec![0.0, 5.0, 10.0]),
        },
        shapes: threshold_lines(&geometry),
        annotations: geometry.labels().into_iter().map(annotation).collect(),
        bar_mode: None,
        legend: Legend::horizontal_top(),
        margin: Margin::uniform(50),
        hover_mode: Some("closest".to_string()),
    };

    Some(ChartSpec { series, layout })
}

/// Grouped bars per leave category: the employee's own counts against the
/// account-group and organization averages. The caller only invokes this
/// once the selected employee was found in the peer dataset.
pub fn build_leave_chart(
    selected: &PeerRecord,
    account_avg: &BTreeMap<LeaveType, i64>,
    org_avg: &BTreeMap<LeaveType, i64>,
) -> ChartSpec {
    let categories: Vec<String> = LeaveType::ALL.iter().map(|t| t.label().to_string()).collect();
    let averages = |map: &BTreeMap<LeaveType, i64>| -> Vec<f64> {
        LeaveType::ALL
            .iter()
            .map(|t| map.get(t).copied().unwrap_or(0) as f64)
            .collect()
    };

    let own_counts = vec![
        selected.half_day_leaves.unwrap_or(0.0),
        selected.full_day_leaves.unwrap_or(0.0),
    ];

    let org_half = org_avg.get(&LeaveType::HalfDay).copied().unwrap_or(0);
    let org_full = org_avg.get(&LeaveType::FullDay).copied().unwrap_or(0);

    let series = vec![
        Series {
            name: format!("Employee ID: {}", selected.employee_id),
            kind: SeriesKind::Bar,
            x: AxisValues::Categories(categories.clone()),
            y: own_counts,
            mode: None,
            text: None,
            text_position: None,
            marker: Marker {
                color: "red".to_string(),
                size: None,
                symbol: None,
            },
        },
        Series {
            name: format!("Account: {}", selected.account_code),
            kind: SeriesKind::Bar,
            x: AxisValues::Categories(categories.clone()),
            y: averages(account_avg),
            mode: None,
            text: None,
            text_position: None,
            marker: Marker {
                color: "steelblue".to_string(),
                size: None,
                symbol: None,
            },
        },
        Series {
            name: format!("Organization Avg: {org_half} HD / {org_full} FD"),
            kind: SeriesKind::Bar,
            x: AxisValues::Categories(categories),
            y: averages(org_avg),
            mode: None,
            text: None,
            text_position: None,
            marker: Marker {
                color: "orange".to_string(),
                size: None,
                symbol: None,
            },
        },
    ];

    let layout = Layout {
        x_axis: AxisSpec {
            title: "Leave Type".to_string(),
            zero_line: None,
            tick_vals: None,
        },
        y_axis: AxisSpec {
            title: "Number of Leaves".to_string(),
            zero_line: None,
            tick_vals: None,
        },
        shapes: Vec::new(),
        annotations: Vec::new(),
        bar_mode: Some("group".to_string()),
        legend: Legend::horizontal_top(),
        margin: Margin::uniform(50),
        hover_mode: None,
    };

    ChartSpec { series, layout }
}

fn threshold_lines(geometry: &QuadrantGeometry) -> Vec<Shape> {
    let dotted = LineStyle {
        dash: "dot".to_string(),
        color: "gray".to_string(),
    };
    vec![
        Shape {
            kind: "line".to_string(),
            x0: geometry.threshold_x,
            x1: geometry.threshold_x,
            y0: 0.0,
            y1: geometry.y_max,
            line: dotted.clone(),
        },
        Shape {
            kind: "line".to_string(),
            x0: 0.0,
            x1: geometry.x_max,
            y0: geometry.threshold_y,
            y1: geometry.threshold_y,
            line: dotted,
        },
    ]
}

fn annotation(label: QuadrantLabel) -> Annotation {
    Annotation {
        x: label.x,
        y: label.y,
        text: label.text.to_string(),
        show_arrow: false,
        font: AnnotationFont {
            size: 12,
            color: label.color.to_string(),
        },
        x_anchor: label.x_anchor.to_string(),
        y_anchor: label.y_anchor.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{self, LeaveType};

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

    #[test]
    fn quadrant_chart_highlights_present_employee() {
        let peers = vec![peer("1", "a", 9.0, 8.0, 1.0, 0.0), peer("2", "a", 6.0, 5.0, 0.0, 1.0)];
        let spec = build_quadrant_chart(&peers, "1", &ComplianceThresholds::default())
            .expect("non-empty peers");

        assert_eq!(spec.series.len(), 2);
        let highlight = &spec.series[1];
        assert_eq!(highlight.name, "Selected Employee");
        assert_eq!(highlight.y, vec![8.0]);
        assert_eq!(highlight.marker.symbol.as_deref(), Some("star"));
        match &highlight.x {
            AxisValues::Numbers(x) => assert_eq!(x, &vec![9.0]),
            AxisValues::Categories(_) => panic!("scatter x must be numeric"),
        }
    }

    #[test]
    fn quadrant_chart_without_match_keeps_population_cloud() {
        let peers = vec![peer("1", "a", 9.0, 8.0, 1.0, 0.0), peer("2", "a", 6.0, 5.0, 0.0, 1.0)];
        let spec = build_quadrant_chart(&peers, "999", &ComplianceThresholds::default())
            .expect("non-empty peers");

        assert_eq!(spec.series.len(), 1);
        assert_eq!(spec.series[0].name, "All Employees");
    }

    #[test]
    fn quadrant_chart_needs_at_least_one_peer() {
        assert!(build_quadrant_chart(&[], "1", &ComplianceThresholds::default()).is_none());
    }

    #[test]
    fn quadrant_layout_carries_thresholds_and_labels() {
        let peers = vec![peer("1", "a", 5.0, 3.0, 0.0, 0.0), peer("2", "a", 9.0, 8.0, 0.0, 0.0)];
        let spec = build_quadrant_chart(&peers, "1", &ComplianceThresholds::default())
            .expect("non-empty peers");

        assert_eq!(spec.layout.shapes.len(), 2);
        let vertical = &spec.layout.shapes[0];
        assert_eq!(vertical.x0, 8.45);
        assert_eq!(vertical.y1, 9.0);
        let horizontal = &spec.layout.shapes[1];
        assert_eq!(horizontal.y0, 7.0);
        assert_eq!(horizontal.x1, 10.0);
        assert_eq!(spec.layout.annotations.len(), 4);
        assert_eq!(spec.layout.hover_mode.as_deref(), Some("closest"));
    }

    #[test]
    fn leave_chart_has_three_self_describing_series() {
        let peers = vec![peer("1", "acc1", 9.0, 8.0, 1.0, 0.0), peer("2", "acc1", 6.0, 5.0, 0.0, 1.0)];
        let org_avg = aggregate::compute_averages(&peers, &LeaveType::ALL);
        let account_avg =
            aggregate::compute_averages(aggregate::account_group(&peers, "acc1"), &LeaveType::ALL);

        let spec = build_leave_chart(&peers[0], &account_avg, &org_avg);

        assert_eq!(spec.series.len(), 3);
        assert_eq!(spec.series[0].name, "Employee ID: 1");
        assert_eq!(spec.series[1].name, "Account: acc1");
        assert_eq!(spec.series[2].name, "Organization Avg: 1 HD / 1 FD");
        assert_eq!(spec.series[0].y, vec![1.0, 0.0]);
        assert_eq!(spec.series[2].y, vec![1.0, 1.0]);
        assert_eq!(spec.layout.bar_mode.as_deref(), Some("group"));
        match &spec.series[0].x {
            AxisValues::Categories(labels) => {
                assert_eq!(labels, &vec!["Half-Day".to_string(), "Full-Day".to_string()]);
            }
            AxisValues::Numbers(_) => panic!("bar x must be categories"),
        }
    }

    #[test]
    fn chart_spec_serializes_to_plot_ready_json() {
        let peers = vec![peer("1", "a", 9.0, 8.0, 1.0, 0.0)];
        let spec = build_quadrant_chart(&peers, "1", &ComplianceThresholds::default())
            .expect("non-empty peers");

        let value = serde_json::to_value(&spec).expect("spec serializes");
        assert_eq!(value["series"][0]["type"], "scatter");
        assert_eq!(value["series"][1]["mode"], "markers+text");
        assert_eq!(value["layout"]["xaxis"]["title"], "Avg. Office Hours");
        assert_eq!(value["layout"]["yaxis"]["tickvals"][1], 5.0);
        assert_eq!(value["layout"]["shapes"][0]["line"]["dash"], "dot");
        assert!(value["series"][0].get("textposition").is_none());
    }
}
