//! News sentiment scoring.

use std::collections::HashMap;

/// Produces a compound polarity score in `[-1, 1]` for a piece of text.
pub trait SentimentAnalyzer: Send + Sync {
    fn compound(&self, text: &str) -> f64;
}

/// Neutral score reported when there is nothing to analyse.
pub const NEUTRAL_SCORE: u8 = 50;

/// Rescales the mean of compound scores from `[-1, 1]` to a `[0, 100]` score.
pub fn sentiment_score(compounds: &[f64]) -> u8 {
    if compounds.is_empty() {
        return NEUTRAL_SCORE;
    }
    let mean = compounds.iter().sum::<f64>() / compounds.len() as f64;
    ((mean + 1.0) * 50.0).round().clamp(0.0, 100.0) as u8
}

// Normalisation constant for mapping raw valence sums into (-1, 1).
const ALPHA: f64 = 15.0;

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "without", "isn't", "wasn't", "aren't", "don't",
    "doesn't", "didn't", "won't", "can't", "cannot",
];

const DEFAULT_LEXICON: &[(&str, f64)] = &[
    ("gain", 2.0),
    ("gains", 2.0),
    ("surge", 2.3),
    ("surges", 2.3),
    ("rally", 2.1),
    ("rallies", 2.1),
    ("jump", 1.6),
    ("jumps", 1.6),
    ("rise", 1.4),
    ("rises", 1.4),
    ("up", 0.8),
    ("high", 1.0),
    ("record", 1.5),
    ("strong", 2.3),
    ("growth", 2.0),
    ("profit", 1.9),
    ("profits", 1.9),
    ("beat", 1.5),
    ("beats", 1.5),
    ("upgrade", 1.9),
    ("bullish", 2.4),
    ("outperform", 2.0),
    ("positive", 2.6),
    ("good", 1.9),
    ("win", 2.8),
    ("wins", 2.8),
    ("boost", 1.7),
    ("dividend", 1.0),
    ("fall", -1.6),
    ("falls", -1.6),
    ("drop", -1.4),
    ("drops", -1.4),
    ("decline", -1.6),
    ("declines", -1.6),
    ("slump", -2.2),
    ("plunge", -2.5),
    ("plunges", -2.5),
    ("crash", -2.8),
    ("down", -0.9),
    ("low", -1.1),
    ("weak", -1.9),
    ("loss", -2.0),
    ("losses", -2.0),
    ("miss", -1.3),
    ("misses", -1.3),
    ("downgrade", -1.9),
    ("bearish", -2.2),
    ("underperform", -2.0),
    ("negative", -2.7),
    ("bad", -2.5),
    ("fraud", -3.0),
    ("probe", -1.2),
    ("penalty", -1.9),
    ("debt", -1.0),
    ("default", -2.2),
    ("risk", -1.1),
];

/// A word-list analyzer: sums word valences, flips the word after a negation,
/// then squashes the total into `(-1, 1)`.
#[derive(Debug, Clone)]
pub struct LexiconAnalyzer {
    lexicon: HashMap<String, f64>,
}

impl LexiconAnalyzer {
    pub fn new(overrides: &HashMap<String, f64>) -> Self {
        let mut lexicon: HashMap<String, f64> = DEFAULT_LEXICON
            .iter()
            .map(|(word, valence)| (word.to_string(), *valence))
            .collect();
        for (word, valence) in overrides {
            lexicon.insert(word.to_lowercase(), *valence);
        }
        Self { lexicon }
    }
}

impl Default for LexiconAnalyzer {
    fn default() -> Self {
        Self::new(&HashMap::new())
    }
}

impl SentimentAnalyzer for LexiconAnalyzer {
    fn compound(&self, text: &str) -> f64 {
        let mut total = 0.0;
        let mut negate = false;

        for token in text.split_whitespace() {
            let word = token
                .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase();
            if word.is_empty() {
                continue;
            }
            if NEGATIONS.contains(&word.as_str()) {
                negate = true;
                continue;
            }
            if let Some(valence) = self.lexicon.get(&word) {
                total += if negate { -valence } else { *valence };
            }
            negate = false;
        }

        if total == 0.0 {
            return 0.0;
        }
        total / (total * total + ALPHA).sqrt()
    }
}
