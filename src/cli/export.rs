use super::ui;
use crate::core::market::{Dividend, FinancialsProvider, StatementTable};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

fn create_writer(path: &Path) -> Result<csv::Writer<std::fs::File>> {
    csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))
}

/// Line items as rows and periods as columns, newest period first.
pub fn write_statement_csv(table: &StatementTable, path: &Path) -> Result<()> {
    let mut writer = create_writer(path)?;

    let mut header = vec!["Breakdown".to_string()];
    header.extend(table.periods.iter().map(|d| d.format("%Y-%m-%d").to_string()));
    writer.write_record(&header)?;

    for (name, values) in &table.items {
        let mut record = vec![name.clone()];
        record.extend(values.iter().map(|v| v.map(|v| v.to_string()).unwrap_or_default()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_financials_csv(financials: &BTreeMap<String, f64>, path: &Path) -> Result<()> {
    let mut writer = create_writer(path)?;
    writer.write_record(["metric", "value"])?;
    for (name, value) in financials {
        writer.write_record([name.as_str(), value.to_string().as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_dividends_csv(dividends: &[Dividend], path: &Path) -> Result<()> {
    let mut writer = create_writer(path)?;
    if dividends.is_empty() {
        writer.write_record(["date", "amount"])?;
    }
    for dividend in dividends {
        writer.serialize(dividend)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the financials, the three annual statements and the dividend
/// history of `symbol` into `dir`, returning the files written.
pub async fn export_financials(
    provider: &(dyn FinancialsProvider + Send + Sync),
    symbol: &str,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    let (statements, dividends) =
        futures::join!(provider.statements(symbol), provider.dividends(symbol));
    let statements =
        statements.with_context(|| format!("Failed to load financial statements for {symbol}"))?;
    let dividends = dividends.with_context(|| format!("Failed to load dividends for {symbol}"))?;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let prefix = symbol.trim().to_uppercase();
    let file = |name: &str| dir.join(format!("{prefix}_{name}.csv"));

    let written = vec![
        file("financials"),
        file("income_stmt"),
        file("balance_sheet"),
        file("cash_flow"),
        file("dividends"),
    ];
    write_financials_csv(&statements.financials, &written[0])?;
    write_statement_csv(&statements.income_statement, &written[1])?;
    write_statement_csv(&statements.balance_sheet, &written[2])?;
    write_statement_csv(&statements.cash_flow, &written[3])?;
    write_dividends_csv(&dividends, &written[4])?;

    info!("Exported {} files for {} to {}", written.len(), prefix, dir.display());
    Ok(written)
}

pub async fn run(
    provider: &(dyn FinancialsProvider + Send + Sync),
    symbol: &str,
    dir: &Path,
) -> Result<()> {
    let pb = ui::new_spinner(&format!("Downloading financial data for {symbol}..."));
    let result = export_financials(provider, symbol, dir).await;
    pb.finish_and_clear();

    println!();
    for path in result? {
        println!(
            "{}",
            ui::style_text(&format!("Saved {}", path.display()), ui::StyleType::Subtle)
        );
    }
    Ok(())
}
