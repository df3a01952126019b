use super::ui;
use crate::core::market::{EquityListing, IndexMember, ReferenceDataProvider};
use anyhow::{Context, Result};
use comfy_table::Cell;
use std::fmt::Display;
use std::str::FromStr;

/// Reference lists that can be browsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Equity,
    Nifty50,
    Nifty50Industries,
}

impl Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ListKind::Equity => "Equity List",
                ListKind::Nifty50 => "Nifty 50 List",
                ListKind::Nifty50Industries => "Nifty 50 Industries",
            }
        )
    }
}

impl FromStr for ListKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "equity" | "equities" => Ok(ListKind::Equity),
            "nifty50" | "nifty-50" => Ok(ListKind::Nifty50),
            "industries" | "nifty50-industries" => Ok(ListKind::Nifty50Industries),
            _ => Err(anyhow::anyhow!(
                "Invalid list: {} (expected equity, nifty50 or industries)",
                s
            )),
        }
    }
}

pub fn equity_table(listings: &[EquityListing]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell("Company Name"),
        ui::header_cell("ISIN"),
    ]);
    for l in listings {
        table.add_row(vec![
            Cell::new(&l.symbol),
            Cell::new(&l.name),
            Cell::new(l.isin.as_deref().unwrap_or("")),
        ]);
    }
    table.to_string()
}

pub fn nifty50_table(members: &[IndexMember]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell("Company Name"),
        ui::header_cell("Industry"),
    ]);
    for m in members {
        table.add_row(vec![
            Cell::new(&m.symbol),
            Cell::new(&m.company_name),
            Cell::new(m.industry.as_deref().unwrap_or("")),
        ]);
    }
    table.to_string()
}

pub fn industries_table(industries: &[String]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Industries")]);
    for industry in industries {
        table.add_row(vec![Cell::new(industry)]);
    }
    table.to_string()
}

pub async fn run(provider: &(dyn ReferenceDataProvider + Send + Sync), kind: ListKind) -> Result<()> {
    let pb = ui::new_spinner(&format!("Fetching {kind}..."));
    let result = match kind {
        ListKind::Equity => provider
            .equity_list()
            .await
            .map(|l| (l.len(), equity_table(&l))),
        ListKind::Nifty50 => provider
            .nifty50_list()
            .await
            .map(|l| (l.len(), nifty50_table(&l))),
        ListKind::Nifty50Industries => provider
            .nifty50_industries()
            .await
            .map(|l| (l.len(), industries_table(&l))),
    };
    pb.finish_and_clear();

    let (count, table) = result.with_context(|| format!("Failed to load {kind}"))?;
    println!(
        "{} {}\n\n{}",
        ui::style_text(&kind.to_string(), ui::StyleType::Title),
        ui::style_text(&format!("({count} rows)"), ui::StyleType::Subtle),
        table
    );
    Ok(())
}
