//! Terminal score table.

use comfy_table::{Cell, Table};

use quizbench_core::scoring::ChartData;

/// Build a model × section table of percentages.
pub fn score_table(data: &ChartData) -> Table {
    let mut table = Table::new();

    let mut header = vec!["Model".to_string()];
    header.extend(data.sections.iter().cloned());
    table.set_header(header);

    for series in &data.series {
        let mut row = vec![Cell::new(&series.model)];
        row.extend(series.values.iter().map(|v| Cell::new(format!("{v:.1}%"))));
        table.add_row(row);
    }

    table
}
