//! Line charts of statement tables
//!
//! Geometry is computed here and drawn as inline SVG by the page template.
//! Each chart plots one line per line item, periods left to right from
//! oldest to newest, with every line sharing one value axis.

use insights_finance::FinancialTable;
use serde::Serialize;

pub const CHART_WIDTH: f64 = 760.0;
pub const CHART_HEIGHT: f64 = 340.0;

const MARGIN_LEFT: f64 = 72.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 36.0;
const MARGIN_BOTTOM: f64 = 44.0;
const Y_TICKS: usize = 5;

const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Inner plotting area in SVG coordinates
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Default for PlotArea {
    fn default() -> Self {
        let width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width,
            height,
            right: MARGIN_LEFT + width,
            bottom: MARGIN_TOP + height,
        }
    }
}

/// An axis tick
#[derive(Debug, Clone, Serialize)]
pub struct Tick {
    /// Position along the axis in SVG coordinates
    pub pos: f64,
    pub label: String,
}

/// One line of the chart
#[derive(Debug, Clone, Serialize)]
pub struct Series {
    pub label: String,
    pub color: &'static str,
    /// SVG path data; gaps in the data start a new subpath
    pub path: String,
    pub points: Vec<(f64, f64)>,
}

/// A rendered line chart
#[derive(Debug, Clone, Serialize)]
pub struct LineChart {
    pub title: &'static str,
    pub slug: &'static str,
    pub width: f64,
    pub height: f64,
    pub area: PlotArea,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub series: Vec<Series>,
}

impl LineChart {
    /// Lay out a chart for `table`
    ///
    /// A table without data yields a chart with a frame and title only.
    pub fn from_table(table: &FinancialTable) -> Self {
        let area = PlotArea::default();
        let mut chart = Self {
            title: table.kind.title(),
            slug: table.kind.slug(),
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
            area,
            x_ticks: Vec::new(),
            y_ticks: Vec::new(),
            series: Vec::new(),
        };

        let Some((min, max)) = value_range(table) else {
            return chart;
        };

        // Table periods are newest first; charts read oldest to newest.
        let n = table.periods.len();
        let x_at = |col: usize| {
            let slot = n - 1 - col;
            if n == 1 {
                area.left + area.width / 2.0
            } else {
                area.left + area.width * slot as f64 / (n - 1) as f64
            }
        };
        let y_at = |value: f64| area.bottom - (value - min) / (max - min) * area.height;

        chart.x_ticks = table
            .periods
            .iter()
            .enumerate()
            .rev()
            .map(|(col, period)| Tick {
                pos: round(x_at(col)),
                label: period.to_string(),
            })
            .collect();

        chart.y_ticks = (0..Y_TICKS)
            .map(|i| {
                let value = min + (max - min) * i as f64 / (Y_TICKS - 1) as f64;
                Tick {
                    pos: round(y_at(value)),
                    label: compact_amount(value),
                }
            })
            .collect();

        chart.series = table
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let points: Vec<Option<(f64, f64)>> = (0..n)
                    .rev()
                    .map(|col| {
                        row.values
                            .get(col)
                            .copied()
                            .flatten()
                            .map(|v| (round(x_at(col)), round(y_at(v))))
                    })
                    .collect();

                Series {
                    label: row.label.clone(),
                    color: PALETTE[i % PALETTE.len()],
                    path: svg_path(&points),
                    points: points.into_iter().flatten().collect(),
                }
            })
            .collect();

        chart
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Smallest and largest value in the table, widened when they coincide
fn value_range(table: &FinancialTable) -> Option<(f64, f64)> {
    let mut values = table
        .rows
        .iter()
        .flat_map(|r| r.values.iter().flatten().copied())
        .filter(|v| v.is_finite());

    let first = values.next()?;
    let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if (max - min).abs() < f64::EPSILON {
        let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.1 };
        Some((min - pad, max + pad))
    } else {
        Some((min, max))
    }
}

fn svg_path(points: &[Option<(f64, f64)>]) -> String {
    let mut path = String::new();
    let mut pen_down = false;

    for point in points {
        match point {
            Some((x, y)) => {
                if !path.is_empty() {
                    path.push(' ');
                }
                path.push(if pen_down { 'L' } else { 'M' });
                path.push_str(&format!("{x} {y}"));
                pen_down = true;
            }
            None => pen_down = false,
        }
    }

    path
}

fn round(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Format an axis value with K/M/B/T suffixes
pub fn compact_amount(value: f64) -> String {
    const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

    let abs = value.abs();
    for (scale, suffix) in UNITS {
        if abs >= scale {
            let scaled = format!("{:.1}", value / scale);
            let scaled = scaled.strip_suffix(".0").unwrap_or(&scaled);
            return format!("{scaled}{suffix}");
        }
    }

    if abs == 0.0 {
        "0".to_string()
    } else if abs < 10.0 {
        format!("{value:.2}")
    } else {
        format!("{value:.0}")
    }
}
