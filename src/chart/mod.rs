//! Stacked-bar figure construction and HTML export.
//!
//! One figure is built per response-cardinality class. The figure holds the
//! bar traces of every category in the class, concatenated in category
//! order; a dropdown selects which category's contiguous block of traces is
//! visible. Selecting a category also rewrites the title (label plus
//! insight annotation), the legend title and the pinned x-axis order.

use std::fs;
use std::path::Path;

use log::info;
use plotly::common::color::{NamedColor, Rgba};
use plotly::common::{Anchor, Font, Title, Visible};
use plotly::layout::update_menu::{Button, ButtonMethod, UpdateMenu};
use plotly::layout::{Axis, BarMode, CategoryOrder, Legend, Margin};
use plotly::{Bar, Layout, Plot};
use serde_json::json;

use crate::aggregate::CountTable;
use crate::config::{CategorySpec, SalaryOrder};
use crate::error::Result;
use crate::loader::InsightMap;

const HOVER_TEMPLATE: &str = "n=%{y}<br>%{fullData.name}<extra></extra>";
const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.27.1.min.js";

/// Number of traces each category contributes: one per distinct value.
#[must_use]
pub fn trace_counts(tables: &[CountTable]) -> Vec<usize> {
    tables.iter().map(|t| t.distinct_values().len()).collect()
}

/// Visibility masks for the dropdown, one per category.
///
/// Mask `k` is true exactly for the contiguous block of trace indices
/// belonging to category `k`, determined by the running offset of preceding
/// trace counts. The masks partition the full trace set.
#[must_use]
pub fn visibility_masks(trace_counts: &[usize]) -> Vec<Vec<bool>> {
    let total: usize = trace_counts.iter().sum();
    let mut masks = Vec::with_capacity(trace_counts.len());
    let mut offset = 0;
    for &count in trace_counts {
        let mut mask = vec![false; total];
        mask[offset..offset + count].fill(true);
        masks.push(mask);
        offset += count;
    }
    masks
}

fn figure_title(spec: &CategorySpec, insights: &InsightMap) -> String {
    let insight = insights.get(spec.name).map_or("", String::as_str);
    format!("Salary Distribution by {} - {}", spec.label, insight)
}

fn dropdown_button(
    spec: &CategorySpec,
    mask: &[bool],
    insights: &InsightMap,
    order: &SalaryOrder,
) -> Button {
    Button::new()
        .label(spec.label)
        .method(ButtonMethod::Update)
        .args(json!([
            { "visible": mask },
            {
                "title": { "text": figure_title(spec, insights) },
                "legend": { "title": { "text": spec.label }, "y": 0.85 },
                "xaxis": { "categoryorder": "array", "categoryarray": order.labels() }
            }
        ]))
}

fn initial_layout(
    categories: &[CategorySpec],
    insights: &InsightMap,
    order: &SalaryOrder,
    y_axis_title: &str,
    buttons: Vec<Button>,
) -> Layout {
    let first = categories.first();
    let title = first.map(|s| figure_title(s, insights)).unwrap_or_default();
    let legend_title = first.map_or("", |s| s.label);

    Layout::new()
        .title(Title::with_text(title))
        .bar_mode(BarMode::Stack)
        .paper_background_color(NamedColor::White)
        .plot_background_color(NamedColor::White)
        .x_axis(
            Axis::new()
                .title(Title::with_text("Salary Range"))
                .category_order(CategoryOrder::Array)
                .category_array(order.labels().to_vec()),
        )
        .y_axis(Axis::new().title(Title::with_text(y_axis_title)))
        .legend(
            Legend::new()
                .title(Title::with_text(legend_title))
                .y_anchor(Anchor::Top)
                .y(0.85)
                .x_anchor(Anchor::Left)
                .x(1.02)
                .background_color(Rgba::new(255, 255, 255, 0.5))
                .font(Font::new().size(10)),
        )
        .width(1100)
        .height(750)
        .margin(Margin::new().left(40).right(200).top(80).bottom(40))
        .update_menus(vec![
            UpdateMenu::new()
                .active(0)
                .buttons(buttons)
                .x(1.02)
                .y(1.0)
                .x_anchor(Anchor::Left)
                .y_anchor(Anchor::Top),
        ])
}

/// Build one interactive figure for a cardinality class.
///
/// `tables` must be parallel to `categories`. Only the first category's
/// traces are initially visible. An empty count table contributes zero
/// traces; its dropdown button then controls an empty visible set.
#[must_use]
pub fn build_figure(
    categories: &[CategorySpec],
    tables: &[CountTable],
    insights: &InsightMap,
    order: &SalaryOrder,
    y_axis_title: &str,
) -> Plot {
    let counts = trace_counts(tables);
    let masks = visibility_masks(&counts);

    let mut plot = Plot::new();
    for (i, table) in tables.iter().enumerate() {
        let visible = if i == 0 { Visible::True } else { Visible::False };
        // Stacking and legend order follow the lexicographic value order
        for value in table.distinct_values() {
            let (x, y) = table.series_for(value);
            plot.add_trace(
                Bar::new(x, y)
                    .name(value)
                    .visible(visible.clone())
                    .hover_template(HOVER_TEMPLATE),
            );
        }
    }

    let buttons = categories
        .iter()
        .zip(&masks)
        .map(|(spec, mask)| dropdown_button(spec, mask, insights, order))
        .collect();
    plot.set_layout(initial_layout(categories, insights, order, y_axis_title, buttons));
    plot
}

/// Wrap one rendered figure fragment into a standalone page.
#[must_use]
pub fn standalone_page(fragment: &str) -> String {
    format!(
        "<html>\n<head>\n  <meta charset=\"utf-8\" />\n  <script src=\"{PLOTLY_CDN}\"></script>\n\
         </head>\n<body>\n{fragment}\n</body>\n</html>\n"
    )
}

/// Combine the two figure fragments into one page sharing a single copy of
/// the charting runtime reference.
#[must_use]
pub fn combined_page(single_fragment: &str, multi_fragment: &str) -> String {
    format!(
        "<html>\n<head>\n  <meta charset=\"utf-8\" />\n  <script src=\"{PLOTLY_CDN}\"></script>\n\
         </head>\n<body>\n\
         <h4>Single-response Salary Chart - scroll down for multi-response breaks</h4>\n\
         {single_fragment}\n\
         <h4>Multi-response Salary Chart - scroll up for single-response breaks</h4>\n\
         {multi_fragment}\n\
         </body>\n</html>\n"
    )
}

/// Render both figures once and write the three output documents: one
/// standalone page per class and the combined page reusing the same
/// fragments.
pub fn write_outputs(
    single: &Plot,
    multi: &Plot,
    single_path: &Path,
    multi_path: &Path,
    combined_path: &Path,
) -> Result<()> {
    let single_fragment = single.to_inline_html(Some("salary-single"));
    let multi_fragment = multi.to_inline_html(Some("salary-multi"));

    fs::write(single_path, standalone_page(&single_fragment))?;
    info!("Wrote {}", single_path.display());
    fs::write(multi_path, standalone_page(&multi_fragment))?;
    info!("Wrote {}", multi_path.display());
    fs::write(combined_path, combined_page(&single_fragment, &multi_fragment))?;
    info!("Wrote {}", combined_path.display());
    Ok(())
}
