use super::ui;
use crate::core::format::format_rupees;
use crate::core::heatmap::{Breadth, SliceBy, breadth, find_index, tiles};
use crate::core::market::{IndexProvider, IndexSnapshot};
use anyhow::{Context, Result, anyhow};
use comfy_table::Cell;
use console::style;

impl Breadth {
    pub fn display(&self) -> String {
        format!(
            "{} {}  {} {}  {} {}",
            style(self.advances).green().bold(),
            style("↑").green(),
            style(self.declines).red().bold(),
            style("↓").red(),
            style(self.unchanged).dim(),
            style("=").dim(),
        )
    }
}

pub fn display_snapshot(snapshot: &IndexSnapshot, slice: SliceBy) -> String {
    let mut table = ui::new_styled_table();
    let weight_header = match slice {
        SliceBy::MarketCap => "Free Float M.Cap",
        SliceBy::Gainers | SliceBy::Losers => "Size (|%|)",
    };
    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell("Last Price"),
        ui::header_cell("Change"),
        ui::header_cell(weight_header),
    ]);

    for tile in tiles(&snapshot.constituents, slice) {
        let weight = match slice {
            SliceBy::MarketCap => format_rupees(tile.weight * 1e7),
            SliceBy::Gainers | SliceBy::Losers => format!("{:.2}", tile.weight),
        };
        table.add_row(vec![
            Cell::new(&tile.symbol),
            ui::number_cell(format!("{:.2}", tile.last_price)),
            ui::change_cell(tile.p_change),
            ui::number_cell(weight),
        ]);
    }

    format!(
        "{} · {}\n{}\n\n{}",
        ui::style_text(&snapshot.index, ui::StyleType::Title),
        slice,
        breadth(&snapshot.constituents).display(),
        table
    )
}

pub async fn run(provider: &(dyn IndexProvider + Send + Sync), index: &str, slice: SliceBy) -> Result<()> {
    let index = find_index(index).ok_or_else(|| {
        anyhow!(
            "Unknown index: {}. Run `marketsage indices` to see the supported names",
            index
        )
    })?;

    let pb = ui::new_spinner(&format!("Fetching {index}..."));
    let result = provider.index_snapshot(index).await;
    pb.finish_and_clear();

    let snapshot = result.context("Error fetching data from NSE")?;
    if snapshot.constituents.is_empty() {
        ui::print_warning("No data returned. Please try another index or try again later.");
        return Ok(());
    }

    println!("{}", display_snapshot(&snapshot, slice));
    Ok(())
}

/// Prints the supported index names.
pub fn list_indices() {
    for name in crate::core::heatmap::INDEX_LIST {
        println!("{name}");
    }
}
