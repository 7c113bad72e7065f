use anyhow::Context;
use log::info;
use std::path::Path;
use std::time::Instant;

use survey_charts::chart::{build_figure, write_outputs};
use survey_charts::{ChartConfig, count_tables, join_tables, load_insights, read_csv};

/// Directory holding the three response tables
const INPUT_DIR: &str = "csv_outputs_dir";

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ChartConfig::default();
    let input_dir = Path::new(INPUT_DIR);

    // Load the primary table, the two multi-select side tables and the
    // insight annotations
    let start = Instant::now();
    let primary = read_csv(&input_dir.join("df_single.csv"))
        .context("Failed to load primary response table")?;
    let generaltools = read_csv(&input_dir.join("generaltools.csv"))
        .context("Failed to load generaltools table")?;
    let whatused =
        read_csv(&input_dir.join("whatused.csv")).context("Failed to load whatused table")?;
    let single_insights = load_insights(Path::new("salary_single_insights.csv"))
        .context("Failed to load single-response insights")?;
    let multi_insights = load_insights(Path::new("salary_multi_insights.csv"))
        .context("Failed to load multi-response insights")?;
    info!(
        "Loaded {} primary rows, {} generaltools rows, {} whatused rows in {:?}",
        primary.num_rows(),
        generaltools.num_rows(),
        whatused.num_rows(),
        start.elapsed()
    );

    // Join and aggregate
    let start = Instant::now();
    let sides = [
        (config.multi_categories[0], &generaltools),
        (config.multi_categories[1], &whatused),
    ];
    let respondents = join_tables(&primary, &sides, &config)?;
    let single_tables = count_tables(
        &respondents,
        &config.single_categories,
        &config.salary_order,
    );
    let multi_tables = count_tables(&respondents, &config.multi_categories, &config.salary_order);
    info!(
        "Aggregated {} categories over {} respondents in {:?}",
        single_tables.len() + multi_tables.len(),
        respondents.len(),
        start.elapsed()
    );

    // Build the two figures and write the output documents
    let start = Instant::now();
    let fig_single = build_figure(
        &config.single_categories,
        &single_tables,
        &single_insights,
        &config.salary_order,
        "Number of Respondents",
    );
    let fig_multi = build_figure(
        &config.multi_categories,
        &multi_tables,
        &multi_insights,
        &config.salary_order,
        "Number of Mentions",
    );
    write_outputs(
        &fig_single,
        &fig_multi,
        Path::new("salary_chart_single.html"),
        Path::new("salary_chart_multi.html"),
        Path::new("salary_charts_combined.html"),
    )
    .context("Failed to write chart documents")?;
    info!("Rendered and wrote charts in {:?}", start.elapsed());

    Ok(())
}
