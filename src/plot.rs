//! Depth-vs-unique-k-mer line plot.
//!
//! The plot is drawn without text so no system fonts are needed: a white
//! canvas, a light grid, a frame and the histogram as a line clipped to the
//! configured axis bounds.

use crate::{config::PlotSettings, error::PipelineError, histogram::HistogramTable};
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Number of grid divisions along each axis.
const GRID_DIVISIONS: u32 = 8;

/// Visible data range of the plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AxisBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl AxisBounds {
    /// Whole-lane view: depth 0..80000, unique k-mers 0..1000.
    pub const DEFAULT: Self = Self {
        x_min: 0.0,
        x_max: 80_000.0,
        y_min: 0.0,
        y_max: 1_000.0,
    };

    /// Closer view for low-coverage samples: depth 0..10000, unique k-mers 0..3000.
    pub const ZOOMED: Self = Self {
        x_min: 0.0,
        x_max: 10_000.0,
        y_min: 0.0,
        y_max: 3_000.0,
    };

    /// # Errors
    ///
    /// Returns [`PipelineError::Configuration`] for empty or non-finite ranges.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let ranges = [(self.x_min, self.x_max, "x"), (self.y_min, self.y_max, "y")];
        for (min, max, axis) in ranges {
            if !(min.is_finite() && max.is_finite() && min < max) {
                return Err(PipelineError::configuration(format!(
                    "{axis} axis bounds must be finite with min < max, got [{min}, {max}]"
                )));
            }
        }
        Ok(())
    }

    fn contains(&self, (x, y): (f64, f64)) -> bool {
        (self.x_min..=self.x_max).contains(&x) && (self.y_min..=self.y_max).contains(&y)
    }
}

impl Default for AxisBounds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Clips a line segment to `bounds` (Liang-Barsky).
///
/// Returns `None` when no part of the segment is visible.
#[must_use]
pub fn clip_segment(
    bounds: &AxisBounds,
    a: (f64, f64),
    b: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    let edges = [
        (-dx, a.0 - bounds.x_min),
        (dx, bounds.x_max - a.0),
        (-dy, a.1 - bounds.y_min),
        (dy, bounds.y_max - a.1),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ))
}

/// Splits the polyline through `points` into the visible runs inside `bounds`.
#[must_use]
pub fn visible_runs(bounds: &AxisBounds, points: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    let mut runs: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();

    if let [only] = points {
        if bounds.contains(*only) {
            runs.push(vec![*only]);
        }
        return runs;
    }

    for pair in points.windows(2) {
        match clip_segment(bounds, pair[0], pair[1]) {
            Some((start, end)) => {
                if current.last() != Some(&start) {
                    close_run(&mut runs, &mut current);
                    current.push(start);
                }
                current.push(end);
            }
            None => close_run(&mut runs, &mut current),
        }
    }
    close_run(&mut runs, &mut current);
    runs
}

fn close_run(runs: &mut Vec<Vec<(f64, f64)>>, current: &mut Vec<(f64, f64)>) {
    if current.len() > 1 {
        runs.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

/// Renders `table` as a PNG at `path`, overwriting any existing file.
///
/// # Errors
///
/// Returns [`PipelineError::Plot`] if drawing or encoding fails.
pub fn render(
    table: &HistogramTable,
    settings: &PlotSettings,
    path: &Path,
) -> Result<(), PipelineError> {
    let plot_error = |e: &dyn std::fmt::Display| PipelineError::Plot {
        path: path.to_path_buf(),
        details: e.to_string(),
    };

    let bounds = settings.bounds;
    let (width, height) = settings.pixel_size();
    let margin = (height / 20).max(1);
    debug!(width, height, path = ?path, "Rendering k-mer histogram");

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| plot_error(&e))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(margin)
        .build_cartesian_2d(bounds.x_min..bounds.x_max, bounds.y_min..bounds.y_max)
        .map_err(|e| plot_error(&e))?;

    let grid = RGBColor(220, 220, 220).stroke_width(1);
    let x_step = (bounds.x_max - bounds.x_min) / f64::from(GRID_DIVISIONS);
    let y_step = (bounds.y_max - bounds.y_min) / f64::from(GRID_DIVISIONS);
    let vertical = (1..GRID_DIVISIONS).map(|i| {
        let x = bounds.x_min + f64::from(i) * x_step;
        PathElement::new(vec![(x, bounds.y_min), (x, bounds.y_max)], grid)
    });
    let horizontal = (1..GRID_DIVISIONS).map(|i| {
        let y = bounds.y_min + f64::from(i) * y_step;
        PathElement::new(vec![(bounds.x_min, y), (bounds.x_max, y)], grid)
    });
    chart
        .draw_series(vertical.chain(horizontal))
        .map_err(|e| plot_error(&e))?;

    let line_width = (height / 480).max(1);
    let line_style = RGBColor(31, 119, 180).stroke_width(line_width);
    for run in visible_runs(&bounds, &table.points()) {
        if let [single] = run.as_slice() {
            chart
                .draw_series(std::iter::once(Circle::new(*single, line_width, line_style.filled())))
                .map_err(|e| plot_error(&e))?;
        } else {
            chart
                .draw_series(LineSeries::new(run, line_style))
                .map_err(|e| plot_error(&e))?;
        }
    }

    chart
        .plotting_area()
        .draw(&Rectangle::new(
            [(bounds.x_min, bounds.y_min), (bounds.x_max, bounds.y_max)],
            BLACK.stroke_width(line_width),
        ))
        .map_err(|e| plot_error(&e))?;

    root.present().map_err(|e| plot_error(&e))?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const UNIT: AxisBounds = AxisBounds {
        x_min: 0.0,
        x_max: 10.0,
        y_min: 0.0,
        y_max: 10.0,
    };

    #[test]
    fn segment_inside_is_unchanged() {
        assert_eq!(
            clip_segment(&UNIT, (1.0, 1.0), (2.0, 3.0)),
            Some(((1.0, 1.0), (2.0, 3.0)))
        );
    }

    #[test]
    fn segment_leaving_top_is_cut_at_edge() {
        let (start, end) = clip_segment(&UNIT, (0.0, 0.0), (5.0, 20.0)).unwrap();
        assert_eq!(start, (0.0, 0.0));
        assert!((end.0 - 2.5).abs() < 1e-9);
        assert!((end.1 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn segment_outside_is_dropped() {
        assert_eq!(clip_segment(&UNIT, (11.0, 1.0), (12.0, 5.0)), None);
        assert_eq!(clip_segment(&UNIT, (1.0, 11.0), (5.0, 11.0)), None);
    }

    #[test]
    fn error_peak_above_range_splits_runs() {
        // Depth 1 towers above the y range, then the curve re-enters.
        let points = [(1.0, 50.0), (2.0, 5.0), (3.0, 4.0), (4.0, 30.0), (5.0, 2.0)];
        let runs = visible_runs(&UNIT, &points);
        assert_eq!(runs.len(), 2);
        let exit = runs[0].last().unwrap();
        assert!((exit.0 - (3.0 + 6.0 / 26.0)).abs() < 1e-9);
        assert!((exit.1 - 10.0).abs() < 1e-9);
        assert_eq!(runs[1].last(), Some(&(5.0, 2.0)));
    }

    #[test]
    fn single_point_inside_is_one_run() {
        assert_eq!(visible_runs(&UNIT, &[(1.0, 1.0)]), vec![vec![(1.0, 1.0)]]);
        assert!(visible_runs(&UNIT, &[(11.0, 1.0)]).is_empty());
    }

    #[test]
    fn bounds_validation() {
        AxisBounds::DEFAULT.validate().unwrap();
        AxisBounds::ZOOMED.validate().unwrap();
        let inverted = AxisBounds {
            x_max: -1.0,
            ..AxisBounds::DEFAULT
        };
        assert!(inverted.validate().is_err());
    }
}
