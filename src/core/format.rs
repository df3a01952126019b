//! Display formatting for rupee magnitudes using Indian numbering.

use std::fmt;

const LAKH: f64 = 1e5;
const CRORE: f64 = 1e7;

/// Unit suffix of a formatted magnitude, ordered by ascending size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MagnitudeUnit {
    None,
    Lakh,
    Crore,
}

impl MagnitudeUnit {
    pub fn threshold(self) -> f64 {
        match self {
            MagnitudeUnit::None => 1.0,
            MagnitudeUnit::Lakh => LAKH,
            MagnitudeUnit::Crore => CRORE,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            MagnitudeUnit::None => "",
            MagnitudeUnit::Lakh => "L",
            MagnitudeUnit::Crore => "Cr",
        }
    }

    /// Picks the largest unit whose threshold `quantity` meets or exceeds.
    pub fn for_quantity(quantity: f64) -> Self {
        if quantity >= CRORE {
            MagnitudeUnit::Crore
        } else if quantity >= LAKH {
            MagnitudeUnit::Lakh
        } else {
            MagnitudeUnit::None
        }
    }
}

/// A quantity paired with the unit it is displayed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormattedMagnitude {
    quantity: f64,
    unit: MagnitudeUnit,
}

impl FormattedMagnitude {
    pub fn new(quantity: f64) -> Self {
        debug_assert!(
            quantity >= 0.0,
            "magnitude must be non-negative, got {quantity}"
        );
        Self {
            quantity,
            unit: MagnitudeUnit::for_quantity(quantity),
        }
    }

    pub fn unit(&self) -> MagnitudeUnit {
        self.unit
    }

    /// The quantity scaled down to the chosen unit.
    pub fn scaled(&self) -> f64 {
        self.quantity / self.unit.threshold()
    }
}

impl fmt::Display for FormattedMagnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let threshold = self.unit.threshold();
        let suffix = self.unit.suffix();

        if self.unit == MagnitudeUnit::None {
            return if self.quantity.fract() == 0.0 {
                write!(f, "{:.0}", self.quantity)
            } else {
                write!(f, "{}", self.quantity)
            };
        }

        if self.quantity % threshold == 0.0 {
            write!(f, "{:.0}{suffix}", (self.quantity / threshold).trunc())
        } else {
            write!(f, "{:.1}{suffix}", self.quantity / threshold)
        }
    }
}

/// Formats a large amount into a short string, e.g. `70000000 -> "7Cr"` and
/// `230000 -> "2.3L"`.
pub fn format_value(quantity: f64) -> String {
    FormattedMagnitude::new(quantity).to_string()
}

/// `format_value` with a rupee sign.
pub fn format_rupees(quantity: f64) -> String {
    format!("₹{}", format_value(quantity))
}

/// Price rounded to paise, or "N/A" when the provider did not report one.
pub fn format_price(price: Option<f64>) -> String {
    price.map_or_else(|| "N/A".to_string(), |p| format!("₹{p:.2}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value_crore() {
        assert_eq!(format_value(70_000_000.0), "7Cr");
        assert_eq!(format_value(75_000_000.0), "7.5Cr");
        assert_eq!(format_value(10_000_000.0), "1Cr");
        assert_eq!(format_value(1_000_000_000.0), "100Cr");
    }

    #[test]
    fn test_format_value_lakh() {
        assert_eq!(format_value(230_000.0), "2.3L");
        assert_eq!(format_value(200_000.0), "2L");
        assert_eq!(format_value(100_000.0), "1L");
        assert_eq!(format_value(9_999_999.0), "100.0L");
    }

    #[test]
    fn test_format_value_below_lakh() {
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(99_999.0), "99999");
        assert_eq!(format_value(1234.5), "1234.5");
    }

    #[test]
    fn test_plain_length_is_monotonic_below_lakh() {
        let mut previous = 0;
        for q in [0.0, 7.0, 42.0, 999.0, 1000.0, 54_321.0, 99_999.0] {
            let len = format_value(q).len();
            assert!(len >= previous, "length dropped at {q}");
            previous = len;
        }
    }

    #[test]
    fn test_unit_selection() {
        assert_eq!(MagnitudeUnit::for_quantity(99_999.0), MagnitudeUnit::None);
        assert_eq!(MagnitudeUnit::for_quantity(100_000.0), MagnitudeUnit::Lakh);
        assert_eq!(
            MagnitudeUnit::for_quantity(10_000_000.0),
            MagnitudeUnit::Crore
        );
        assert!(MagnitudeUnit::Lakh < MagnitudeUnit::Crore);

        let m = FormattedMagnitude::new(75_000_000.0);
        assert_eq!(m.unit(), MagnitudeUnit::Crore);
        assert!((m.scaled() - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_format_rupees_and_price() {
        assert_eq!(format_rupees(230_000.0), "₹2.3L");
        assert_eq!(format_price(Some(1234.567)), "₹1234.57");
        assert_eq!(format_price(None), "N/A");
    }
}
