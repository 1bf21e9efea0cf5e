//! Grouped bar chart rendering.
//!
//! Produces a self-contained SVG: one group per section along the x axis,
//! one bar per model inside each group, percentages on a 0–105 y axis and a
//! legend keyed by display name.

use std::path::Path;

use anyhow::{Context, Result};

use quizbench_core::scoring::ChartData;

/// Text shown around the chart.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub title: String,
    pub y_label: String,
    pub legend_title: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: "LLM quiz performance".into(),
            y_label: "Correct answers (%)".into(),
            legend_title: "Models".into(),
        }
    }
}

const Y_MAX: f64 = 105.0;
const PLOT_HEIGHT: f64 = 360.0;
const GROUP_WIDTH: f64 = 120.0;
const MIN_PLOT_WIDTH: f64 = 600.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 110.0;
const LEGEND_WIDTH: f64 = 240.0;

const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Escape a string for safe insertion into SVG text.
fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Render chart data as an SVG document.
pub fn render_svg(data: &ChartData, options: &ChartOptions) -> String {
    let sections = data.sections.len().max(1) as f64;
    let group_width = (MIN_PLOT_WIDTH / sections).max(GROUP_WIDTH);
    let plot_width = group_width * sections;
    let width = MARGIN_LEFT + plot_width + LEGEND_WIDTH;
    let height = MARGIN_TOP + PLOT_HEIGHT + MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + PLOT_HEIGHT;
    let y_of = |v: f64| baseline - v.clamp(0.0, Y_MAX) / Y_MAX * PLOT_HEIGHT;

    let mut svg = format!(
        "<svg width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.0} {height:.0}\" xmlns=\"http://www.w3.org/2000/svg\" font-family=\"sans-serif\">\n"
    );
    svg.push_str(&format!(
        "  <rect x=\"0\" y=\"0\" width=\"{width:.0}\" height=\"{height:.0}\" fill=\"#ffffff\"/>\n"
    ));
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"28\" font-size=\"18\" text-anchor=\"middle\">{}</text>\n",
        MARGIN_LEFT + plot_width / 2.0,
        xml_escape(&options.title)
    ));

    // Gridlines and y ticks
    for tick in (0..=100).step_by(20) {
        let y = y_of(tick as f64);
        svg.push_str(&format!(
            "  <line x1=\"{MARGIN_LEFT:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#cccccc\" stroke-dasharray=\"4 3\"/>\n",
            MARGIN_LEFT + plot_width
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{y:.1}\" font-size=\"12\" text-anchor=\"end\" dominant-baseline=\"middle\">{tick}</text>\n",
            MARGIN_LEFT - 8.0
        ));
    }
    svg.push_str(&format!(
        "  <text x=\"18\" y=\"{:.1}\" font-size=\"14\" text-anchor=\"middle\" transform=\"rotate(-90 18 {:.1})\">{}</text>\n",
        MARGIN_TOP + PLOT_HEIGHT / 2.0,
        MARGIN_TOP + PLOT_HEIGHT / 2.0,
        xml_escape(&options.y_label)
    ));

    // Bars
    let models = data.series.len().max(1) as f64;
    let bar_width = group_width * 0.8 / models;
    let group_offset = (1.0 - models) * bar_width / 2.0;
    for (g, section) in data.sections.iter().enumerate() {
        let center = MARGIN_LEFT + group_width * (g as f64 + 0.5);

        for (i, series) in data.series.iter().enumerate() {
            let value = series.values.get(g).copied().unwrap_or(0.0);
            let x = center + group_offset + i as f64 * bar_width - bar_width / 2.0;
            let y = y_of(value);
            svg.push_str(&format!(
                "  <rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"{bar_width:.1}\" height=\"{:.1}\" fill=\"{}\"><title>{}: {value:.1}%</title></rect>\n",
                baseline - y,
                PALETTE[i % PALETTE.len()],
                xml_escape(&series.display_name)
            ));
        }

        let label_y = baseline + 16.0;
        svg.push_str(&format!(
            "  <text x=\"{center:.1}\" y=\"{label_y:.1}\" font-size=\"12\" text-anchor=\"end\" transform=\"rotate(-45 {center:.1} {label_y:.1})\">{}</text>\n",
            xml_escape(section)
        ));
    }

    // Axes
    svg.push_str(&format!(
        "  <line x1=\"{MARGIN_LEFT:.1}\" y1=\"{MARGIN_TOP:.1}\" x2=\"{MARGIN_LEFT:.1}\" y2=\"{baseline:.1}\" stroke=\"#333333\"/>\n"
    ));
    svg.push_str(&format!(
        "  <line x1=\"{MARGIN_LEFT:.1}\" y1=\"{baseline:.1}\" x2=\"{:.1}\" y2=\"{baseline:.1}\" stroke=\"#333333\"/>\n",
        MARGIN_LEFT + plot_width
    ));

    // Legend
    let legend_x = MARGIN_LEFT + plot_width + 20.0;
    svg.push_str(&format!(
        "  <text x=\"{legend_x:.1}\" y=\"{MARGIN_TOP:.1}\" font-size=\"13\" font-weight=\"bold\">{}</text>\n",
        xml_escape(&options.legend_title)
    ));
    for (i, series) in data.series.iter().enumerate() {
        let y = MARGIN_TOP + 12.0 + i as f64 * 20.0;
        svg.push_str(&format!(
            "  <rect x=\"{legend_x:.1}\" y=\"{y:.1}\" width=\"12\" height=\"12\" fill=\"{}\"/>\n",
            PALETTE[i % PALETTE.len()]
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\" dominant-baseline=\"middle\">{}</text>\n",
            legend_x + 18.0,
            y + 6.0,
            xml_escape(&series.display_name)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Write the chart to a file.
pub fn write_chart(data: &ChartData, options: &ChartOptions, path: &Path) -> Result<()> {
    let svg = render_svg(data, options);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, svg)
        .with_context(|| format!("failed to write chart to {}", path.display()))?;
    Ok(())
}
