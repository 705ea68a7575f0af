//! Stacked bar chart of the hospitals-only summary.
//!
//! One bar per facility, one segment per rating category, stacked in
//! category order. Rendered to SVG so the browser can inline it.
//!
//! ```text
//! ┌──────────────── plot ────────────────┐┌── legend ──┐
//! │  Opiniones por Categoría ...          ││Valoraciones│
//! │   ▇▇                                  ││ ■ INSAT... │
//! │   ▇▇   ▇▇                             ││ ■ SATIS... │
//! │  HN A  HN B   (rotated labels)        ││            │
//! └───────────────────────────────────────┘└────────────┘
//! ```

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::api::logs::{log_info, log_success};
use crate::error::ChartError;
use crate::models::PivotTable;

pub const CHART_TITLE: &str = "Opiniones por Categoría de Satisfacción (Solo Hospitales)";
pub const X_LABEL: &str = "Establecimiento";
pub const Y_LABEL: &str = "Cantidad de Opiniones";
pub const LEGEND_TITLE: &str = "Valoraciones";

pub const CHART_WIDTH: u32 = 1600;
pub const CHART_HEIGHT: u32 = 1000;
const LEGEND_WIDTH: i32 = 260;

const FONT: &str = "sans-serif";
const BAR_PADDING: f64 = 0.15;

/// Fixed colors per rating category.
#[derive(Debug, Clone)]
pub struct ColorMap {
    entries: Vec<(String, RGBColor)>,
    fallback: RGBColor,
}

impl ColorMap {
    /// INSATISFECHO red, SATISFECHO yellow, MUY SATISFECHO lime green, gray otherwise.
    pub fn satisfaction() -> Self {
        Self {
            entries: vec![
                ("INSATISFECHO".to_string(), RGBColor(255, 0, 0)),
                ("SATISFECHO".to_string(), RGBColor(255, 255, 0)),
                ("MUY SATISFECHO".to_string(), RGBColor(50, 205, 50)),
            ],
            fallback: RGBColor(128, 128, 128),
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn color_for(&self, category: &str) -> RGBColor {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, color)| *color)
            .unwrap_or(self.fallback)
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::satisfaction()
    }
}

/// Render the table with the satisfaction colors.
pub fn render_svg(table: &PivotTable) -> Result<String, ChartError> {
    render_svg_with(table, &ColorMap::default())
}

/// Render the table as an SVG document.
pub fn render_svg_with(table: &PivotTable, colors: &ColorMap) -> Result<String, ChartError> {
    if table.is_empty() {
        return Err(ChartError::NoData);
    }

    log_info(format!(
        "📊 Drawing chart: {} bars, {} categories...",
        table.len(),
        table.categories.len()
    ));

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let (plot_area, legend_area) = root.split_horizontally(CHART_WIDTH as i32 - LEGEND_WIDTH);
        draw_bars(&plot_area, table, colors)?;
        draw_legend(&legend_area, &table.categories, colors)?;

        root.present()?;
    }

    log_success(format!("Chart rendered ({} bytes)", svg.len()));
    Ok(svg)
}

fn draw_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    table: &PivotTable,
    colors: &ColorMap,
) -> Result<(), ChartError> {
    let bar_count = table.len();
    let top = ((table.max_row_total() as f64) * 1.1).max(1.0);

    let longest = table
        .rows
        .iter()
        .map(|row| row.facility.chars().count())
        .max()
        .unwrap_or(0) as u32;
    let x_label_area = (longest * 8 + 60).clamp(80, 420);

    let mut chart = ChartBuilder::on(area)
        .caption(CHART_TITLE, (FONT, 28))
        .margin(20)
        .x_label_area_size(x_label_area)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..bar_count as f64, 0f64..top)?;

    let y_formatter = |v: &f64| {
        if v.fract() == 0.0 {
            format!("{:.0}", v)
        } else {
            String::new()
        }
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .y_label_formatter(&y_formatter)
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .axis_desc_style((FONT, 18))
        .label_style((FONT, 14))
        .draw()?;

    for (i, row) in table.rows.iter().enumerate() {
        let left = i as f64 + BAR_PADDING;
        let right = i as f64 + 1.0 - BAR_PADDING;

        for segment in stack_segments(&table.categories, &row.counts) {
            let end = segment.base + segment.count as f64;
            let color = colors.color_for(segment.category);

            chart.draw_series(std::iter::once(Rectangle::new(
                [(left, segment.base), (right, end)],
                color.filled(),
            )))?;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(left, segment.base), (right, end)],
                BLACK.stroke_width(1),
            )))?;
            chart.draw_series(std::iter::once(Text::new(
                segment.count.to_string(),
                (i as f64 + 0.5, segment.base + segment.count as f64 / 2.0),
                (FONT, 14)
                    .into_font()
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Center, VPos::Center)),
            )))?;
        }
    }

    // Facility names hang below the axis, reading downwards
    let label_style = (FONT, 14)
        .into_font()
        .transform(FontTransform::Rotate90)
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    let (base_x, base_y) = area.get_base_pixel();

    for (i, row) in table.rows.iter().enumerate() {
        let (x, y) = chart.backend_coord(&(i as f64 + 0.5, 0.0));
        area.draw(&Text::new(
            row.facility.clone(),
            (x - base_x, y - base_y + 8),
            label_style.clone(),
        ))?;
    }

    Ok(())
}

/// One drawn piece of a stacked bar.
#[derive(Debug, PartialEq)]
struct Segment<'a> {
    category: &'a str,
    base: f64,
    count: u64,
}

/// Segments stacked bottom-up in category order. Zero cells are skipped, so
/// they get neither a rectangle nor a label.
fn stack_segments<'a>(categories: &'a [String], counts: &[u64]) -> Vec<Segment<'a>> {
    let mut base = 0.0;
    categories
        .iter()
        .zip(counts)
        .filter(|(_, count)| **count > 0)
        .map(|(category, &count)| {
            let segment = Segment {
                category: category.as_str(),
                base,
                count,
            };
            base += count as f64;
            segment
        })
        .collect()
}

fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    categories: &[String],
    colors: &ColorMap,
) -> Result<(), ChartError> {
    const LEFT: i32 = 16;
    const TOP: i32 = 80;
    const SWATCH: i32 = 18;
    const LINE: i32 = 28;

    area.draw(&Text::new(
        LEGEND_TITLE,
        (LEFT, TOP),
        (FONT, 18).into_font().color(&BLACK),
    ))?;

    for (i, category) in categories.iter().enumerate() {
        let y = TOP + 32 + i as i32 * LINE;
        let color = colors.color_for(category);

        area.draw(&Rectangle::new(
            [(LEFT, y), (LEFT + SWATCH, y + SWATCH)],
            color.filled(),
        ))?;
        area.draw(&Rectangle::new(
            [(LEFT, y), (LEFT + SWATCH, y + SWATCH)],
            BLACK.stroke_width(1),
        ))?;
        area.draw(&Text::new(
            category.as_str(),
            (LEFT + SWATCH + 8, y + SWATCH / 2),
            (FONT, 15)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Left, VPos::Center)),
        ))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PivotRow;

    fn hospitals() -> PivotTable {
        PivotTable {
            index_name: "Establecimiento".into(),
            categories: vec![
                "INSATISFECHO".into(),
                "MUY SATISFECHO".into(),
                "OTRO".into(),
                "SATISFECHO".into(),
            ],
            rows: vec![
                PivotRow { facility: "HN ROOSEVELT".into(), counts: vec![2, 0, 0, 10] },
                PivotRow { facility: "HOSPITAL REGIONAL".into(), counts: vec![0, 7, 3, 0] },
            ],
        }
    }

    #[test]
    fn test_fixed_colors() {
        let colors = ColorMap::default();
        assert_eq!(colors.color_for("INSATISFECHO"), RGBColor(255, 0, 0));
        assert_eq!(colors.color_for("SATISFECHO"), RGBColor(255, 255, 0));
        assert_eq!(colors.color_for("MUY SATISFECHO"), RGBColor(50, 205, 50));
    }

    #[test]
    fn test_unknown_category_is_gray() {
        let colors = ColorMap::default();
        assert_eq!(colors.color_for("NEUTRAL"), RGBColor(128, 128, 128));
        assert_eq!(colors.color_for("satisfecho"), RGBColor(128, 128, 128));
    }

    #[test]
    fn test_render_contains_labels() {
        let svg = render_svg(&hospitals()).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(CHART_TITLE));
        assert!(svg.contains(X_LABEL));
        assert!(svg.contains(Y_LABEL));
        assert!(svg.contains(LEGEND_TITLE));
        assert!(svg.contains("HN ROOSEVELT"));
        assert!(svg.contains("HOSPITAL REGIONAL"));
        // Segment labels, text nodes sit on their own line
        assert!(svg.contains(">\n10\n</text>"));
        assert!(svg.contains(">\n7\n</text>"));
        assert!(svg.contains("rotate(90"));
    }

    #[test]
    fn test_zero_cells_not_drawn() {
        let table = hospitals();
        let segments = stack_segments(&table.categories, &table.rows[0].counts);

        assert_eq!(
            segments,
            vec![
                Segment { category: "INSATISFECHO", base: 0.0, count: 2 },
                Segment { category: "SATISFECHO", base: 2.0, count: 10 },
            ]
        );
        assert!(segments.iter().all(|s| s.count > 0));
        assert!(stack_segments(&table.categories, &[0, 0, 0, 0]).is_empty());
    }

    #[test]
    fn test_zero_cells_unlabelled_in_svg() {
        let table = PivotTable {
            index_name: "Establecimiento".into(),
            categories: vec!["INSATISFECHO".into(), "SATISFECHO".into()],
            rows: vec![PivotRow { facility: "HN ROOSEVELT".into(), counts: vec![0, 9] }],
        };
        let svg = render_svg(&table).unwrap();

        // One red swatch in the legend, no red segment
        assert_eq!(svg.matches("#FF0000").count(), 1);
        assert!(svg.contains(">\n9\n</text>"));
    }

    #[test]
    fn test_large_counts_render() {
        let table = PivotTable {
            index_name: "Establecimiento".into(),
            categories: vec!["INSATISFECHO".into(), "SATISFECHO".into()],
            rows: vec![PivotRow {
                facility: "HN A".into(),
                counts: vec![crate::models::MAX_COUNT, crate::models::MAX_COUNT],
            }],
        };
        assert!(render_svg(&table).is_ok());
    }

    #[test]
    fn test_render_uses_category_colors() {
        let svg = render_svg(&hospitals()).unwrap();
        assert!(svg.contains("#FF0000"));
        assert!(svg.contains("#FFFF00"));
        assert!(svg.contains("#32CD32"));
        assert!(svg.contains("#808080"));
    }

    #[test]
    fn test_empty_table_has_no_chart() {
        let empty = PivotTable::new("Establecimiento", vec!["SATISFECHO".into()]);
        assert!(matches!(render_svg(&empty), Err(ChartError::NoData)));
    }
}
