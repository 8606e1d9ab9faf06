use anyhow::bail;

/// Compliance bars for the quadrant chart, in hours. These are policy
/// constants, not values derived from the data.
#[derive(Debug, Clone, Copy)]
pub struct ComplianceThresholds {
    pub office_hours: f64,
    pub bay_hours: f64,
}

impl Default for ComplianceThresholds {
    fn default() -> Self {
        Self {
            office_hours: 8.45,
            bay_hours: 7.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct QuadrantGeometry {
    pub x_max: f64,
    pub y_max: f64,
    pub threshold_x: f64,
    pub threshold_y: f64,
}

#[derive(Debug, Clone)]
pub struct QuadrantLabel {
    pub x: f64,
    pub y: f64,
    pub text: &'static str,
    pub color: &'static str,
    pub x_anchor: &'static str,
    pub y_anchor: &'static str,
}

const FAVORABLE: &str = "green";
const CAUTIONARY: &str = "orange";
const UNFAVORABLE: &str = "red";

/// Axis bounds and threshold lines for the compliance quadrant.
///
/// Requires at least one point: a max over an empty set has no meaning,
/// so empty input is an error rather than a silently defaulted bound.
pub fn compute_geometry(
    points: &[Point],
    thresholds: &ComplianceThresholds,
) -> anyhow::Result<QuadrantGeometry> {
    if points.is_empty() {
        bail!("quadrant geometry requires at least one data point");
    }

    let x_max = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max) + 1.0;
    let y_max = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max) + 1.0;

    Ok(QuadrantGeometry {
        x_max,
        y_max,
        threshold_x: thresholds.office_hours,
        threshold_y: thresholds.bay_hours,
    })
}

impl QuadrantGeometry {
    /// One label per quadrant, anchored into the plot corners. Both axes
    /// above their bars is favorable, one above is cautionary, neither is
    /// unfavorable.
    pub fn labels(&self) -> [QuadrantLabel; 4] {
        [
            QuadrantLabel {
                x: self.x_max,
                y: self.y_max,
                text: "Office ↑ / Bay ↑",
                color: FAVORABLE,
                x_anchor: "right",
                y_anchor: "bottom",
            },
            QuadrantLabel {
                x: 0.0,
                y: self.y_max,
                text: "Office ↓ / Bay ↑",
                color: CAUTIONARY,
                x_anchor: "left",
                y_anchor: "bottom",
            },
            QuadrantLabel {
                x: self.x_max,
                y: 0.0,
                text: "Office ↑ / Bay ↓",
                color: CAUTIONARY,
                x_anchor: "right",
                y_anchor: "top",
            },
            QuadrantLabel {
                x: 0.0,
                y: 0.0,
                text: "Office ↓ / Bay ↓",
                color: UNFAVORABLE,
                x_anchor: "left",
                y_anchor: "top",
            },
        ]
    }
}
