use super::ui;
use crate::core::format::{format_price, format_rupees};
use crate::core::market::{
    CompanyProvider, EquityListing, NewsArticle, ReferenceDataProvider, StockProfile,
};
use crate::core::sentiment::{NEUTRAL_SCORE, SentimentAnalyzer, sentiment_score};
use anyhow::{Context, Result};
use comfy_table::Cell;
use tracing::{debug, warn};

/// Aggregate news sentiment on a 0-100 scale, 50 being neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentimentSummary {
    pub score: u8,
    pub articles: usize,
}

impl SentimentSummary {
    pub fn from_news(news: &[NewsArticle], analyzer: &dyn SentimentAnalyzer) -> Option<Self> {
        if news.is_empty() {
            return None;
        }
        let compounds: Vec<f64> = news.iter().map(|a| analyzer.compound(a.text())).collect();
        Some(Self {
            score: sentiment_score(&compounds),
            articles: news.len(),
        })
    }

    pub fn delta(&self) -> i16 {
        i16::from(self.score) - i16::from(NEUTRAL_SCORE)
    }
}

/// Everything shown for one stock.
#[derive(Debug, Clone)]
pub struct StockReport {
    pub profile: StockProfile,
    pub isin: Option<String>,
    pub listed: Option<bool>,
    pub news: Vec<NewsArticle>,
    pub sentiment: Option<SentimentSummary>,
}

fn find_listing<'a>(listings: &'a [EquityListing], symbol: &str) -> Option<&'a EquityListing> {
    let symbol = symbol.trim();
    listings
        .iter()
        .find(|l| l.symbol.eq_ignore_ascii_case(symbol))
}

fn optional_text(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "N/A".to_string())
}

/// Provider amounts can be negative, e.g. gross profit of a loss-making company.
fn rupees(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_nan() => "N/A".to_string(),
        Some(v) if v < 0.0 => format!("-{}", format_rupees(-v)),
        Some(v) => format_rupees(v),
        None => "N/A".to_string(),
    }
}

impl StockReport {
    pub fn display(&self) -> String {
        let p = &self.profile;
        let name = p.long_name.as_deref().unwrap_or("N/A");
        let mut output = format!(
            "{} ({})\n",
            ui::style_text(name, ui::StyleType::Title),
            p.symbol
        );

        if self.listed == Some(false) {
            output.push_str(&ui::style_text(
                "Symbol not found in the NSE equity list\n",
                ui::StyleType::Warning,
            ));
        }

        output.push('\n');
        for (label, value) in [
            ("ISIN", optional_text(&self.isin)),
            ("Sector", optional_text(&p.sector)),
            ("Industry", optional_text(&p.industry)),
            ("Market Cap", rupees(p.market_cap)),
        ] {
            output.push_str(&ui::metric_line(label, &value));
            output.push('\n');
        }

        output.push_str(&format!(
            "\n{}\n",
            ui::style_text("Technicals", ui::StyleType::Title)
        ));
        for (label, value) in [
            ("52 Week Low", format_price(p.fifty_two_week_low)),
            ("52 Week High", format_price(p.fifty_two_week_high)),
            ("50 Day Moving Average", format_price(p.fifty_day_average)),
            ("200 Day Moving Average", format_price(p.two_hundred_day_average)),
            (
                "Beta",
                p.beta.map_or_else(|| "N/A".to_string(), |b| format!("{b:.2}")),
            ),
        ] {
            output.push_str(&ui::metric_line(label, &value));
            output.push('\n');
        }

        output.push_str(&format!(
            "\n{}\n",
            ui::style_text("Fundamentals", ui::StyleType::Title)
        ));
        output.push_str(&ui::metric_line("Revenue", &rupees(p.total_revenue)));
        output.push('\n');
        output.push_str(&ui::metric_line("Gross Profit", &rupees(p.gross_profits)));
        output.push('\n');

        output.push_str(&format!(
            "\n{}\n",
            ui::style_text("News & Sentiment Analysis", ui::StyleType::Title)
        ));
        match &self.sentiment {
            Some(s) => {
                let delta = s.delta();
                let delta_style = match delta {
                    d if d > 0 => ui::StyleType::Positive,
                    d if d < 0 => ui::StyleType::Negative,
                    _ => ui::StyleType::Subtle,
                };
                output.push_str(&format!(
                    "{} ({}) {}\n",
                    ui::metric_line("News Sentiment Score", &format!("{}%", s.score)),
                    ui::style_text(&format!("{delta:+}"), delta_style),
                    ui::style_text(
                        &format!(
                            "based on {} article{}",
                            s.articles,
                            if s.articles == 1 { "" } else { "s" }
                        ),
                        ui::StyleType::Subtle
                    )
                ));

                let mut table = ui::new_styled_table();
                table.set_header(vec![ui::header_cell("Headline"), ui::header_cell("Publisher")]);
                for article in &self.news {
                    table.add_row(vec![
                        Cell::new(&article.title),
                        Cell::new(article.publisher.as_deref().unwrap_or("")),
                    ]);
                }
                output.push_str(&table.to_string());
            }
            None => output.push_str("No news available for this stock."),
        }

        output
    }
}

/// Gathers profile, listing and news for a symbol. Only the profile is
/// required; the listing and news degrade to "N/A" and "no news".
pub async fn build_report(
    company: &(dyn CompanyProvider + Send + Sync),
    reference: &(dyn ReferenceDataProvider + Send + Sync),
    analyzer: &dyn SentimentAnalyzer,
    symbol: &str,
    news_count: usize,
) -> Result<StockReport> {
    let (profile, news, listings) = futures::join!(
        company.profile(symbol),
        company.news(symbol, news_count),
        reference.equity_list()
    );

    let profile = profile.with_context(|| format!("Failed to load stock information for {symbol}"))?;

    let news = news.unwrap_or_else(|e| {
        warn!("Failed to fetch news for {}: {:#}", symbol, e);
        Vec::new()
    });

    let (isin, listed) = match &listings {
        Ok(listings) => {
            let listing = find_listing(listings, symbol);
            (listing.and_then(|l| l.isin.clone()), Some(listing.is_some()))
        }
        Err(e) => {
            warn!("Failed to fetch equity list: {:#}", e);
            (None, None)
        }
    };

    let sentiment = SentimentSummary::from_news(&news, analyzer);
    debug!(?sentiment, "Built report for {}", symbol);

    Ok(StockReport {
        profile,
        isin,
        listed,
        news,
        sentiment,
    })
}

pub async fn run(
    company: &(dyn CompanyProvider + Send + Sync),
    reference: &(dyn ReferenceDataProvider + Send + Sync),
    analyzer: &dyn SentimentAnalyzer,
    symbol: &str,
    news_count: usize,
) -> Result<()> {
    let pb = ui::new_spinner(&format!("Fetching information for {symbol}..."));
    let report = build_report(company, reference, analyzer, symbol, news_count).await;
    pb.finish_and_clear();

    println!("{}", report?.display());
    Ok(())
}
