use super::ui;
use crate::core::format::format_value;
use crate::core::market::{HistoryRange, PriceHistory, PriceHistoryProvider};
use anyhow::{Context, Result};
use comfy_table::Cell;
use std::path::Path;
use tracing::info;

impl PriceHistory {
    /// Renders the last `rows` sessions, newest at the bottom.
    pub fn display_as_table(&self, rows: usize) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Date"),
            ui::header_cell("Open"),
            ui::header_cell("High"),
            ui::header_cell("Low"),
            ui::header_cell("Close"),
            ui::header_cell("Change"),
            ui::header_cell("Volume"),
        ]);

        let start = self.bars.len().saturating_sub(rows);
        for (i, bar) in self.bars.iter().enumerate().skip(start) {
            let change = i
                .checked_sub(1)
                .and_then(|p| self.bars.get(p))
                .filter(|prev| prev.close > 0.0)
                .map(|prev| (bar.close - prev.close) / prev.close * 100.0);

            table.add_row(vec![
                Cell::new(bar.date.format("%Y-%m-%d")),
                ui::number_cell(format!("{:.2}", bar.open)),
                ui::number_cell(format!("{:.2}", bar.high)),
                ui::number_cell(format!("{:.2}", bar.low)),
                ui::number_cell(format!("{:.2}", bar.close)),
                change.map_or_else(|| ui::number_cell("N/A"), ui::change_cell),
                ui::number_cell(format_value(bar.volume as f64)),
            ]);
        }

        let mut output = format!(
            "Price history: {}\n\n",
            ui::style_text(&self.symbol, ui::StyleType::Title)
        );
        output.push_str(&table.to_string());

        if let (Some(first), Some(last)) = (self.bars.first(), self.bars.last())
            && first.close > 0.0
        {
            let change = (last.close - first.close) / first.close * 100.0;
            let style = if change >= 0.0 {
                ui::StyleType::Positive
            } else {
                ui::StyleType::Negative
            };
            output.push_str(&format!(
                "\n\n{} {} → {} ({})",
                ui::style_text("Range:", ui::StyleType::Label),
                first.date.format("%Y-%m-%d"),
                last.date.format("%Y-%m-%d"),
                ui::style_text(&format!("{change:+.2}%"), style)
            ));
        }

        output
    }
}

/// Writes every bar of the history as CSV.
pub fn write_csv(history: &PriceHistory, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    for bar in &history.bars {
        writer
            .serialize(bar)
            .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    }
    writer.flush()?;
    Ok(())
}

pub async fn run(
    provider: &(dyn PriceHistoryProvider + Send + Sync),
    symbol: &str,
    range: HistoryRange,
    rows: usize,
    csv_path: Option<&Path>,
) -> Result<()> {
    let pb = ui::new_spinner(&format!("Fetching {range} history for {symbol}..."));
    let result = provider.price_history(symbol, range).await;
    pb.finish_and_clear();

    let history = result.with_context(|| format!("Failed to load price history for {symbol}"))?;
    if history.is_empty() {
        ui::print_warning(&format!(
            "No data available for the selected stock: {symbol}"
        ));
        return Ok(());
    }

    println!("{}", history.display_as_table(rows));

    if let Some(path) = csv_path {
        write_csv(&history, path)?;
        info!("Wrote {} bars to {}", history.bars.len(), path.display());
        println!(
            "\n{}",
            ui::style_text(
                &format!("Saved {} rows to {}", history.bars.len(), path.display()),
                ui::StyleType::Subtle
            )
        );
    }

    Ok(())
}
