//! # Treasury Tick Notation
//!
//! US Treasury cash prices quote in 32nds with a 256th refinement:
//! `100-25+` means `100 + 25/32 + 4/256`. The trailing digit counts
//! 256ths beyond the 32nd (0..=7), with `4` conventionally written `+`.
//!
//! ## Grid
//! ```text
//! price = whole + xy/32 + z/256      xy in 0..=31, z in 0..=7
//! ```
//! Formatting is exact on this grid; values off the grid truncate to the
//! nearest lower 256th.

use thiserror::Error;

/// Failure to read a price string in decimal or fractional notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TickError {
    /// The string is neither a decimal number nor `I-XYZ` notation.
    #[error("malformed price: {0:?}")]
    Malformed(String),
    /// The 32nds field is out of its 0..=31 range.
    #[error("32nds field out of range in {0:?}")]
    ThirtySecondsRange(String),
    /// The 256ths field is out of its 0..=7 range.
    #[error("256ths field out of range in {0:?}")]
    TwoFiftySixthsRange(String),
}

/// Parse a treasury price in decimal (`99.96875`) or fractional
/// (`99-31`, `100-25+`) notation.
pub fn parse_price(text: &str) -> Result<f64, TickError> {
    let text = text.trim();
    let Some(dash) = text.find('-') else {
        return text
            .parse::<f64>()
            .map_err(|_| TickError::Malformed(text.to_string()));
    };

    // I-XYZ: two digits of 32nds, one digit (or '+') of 256ths.
    let (whole, frac) = text.split_at(dash);
    let frac = &frac[1..];
    if frac.len() != 3 {
        return Err(TickError::Malformed(text.to_string()));
    }
    let whole: f64 = whole
        .parse()
        .map_err(|_| TickError::Malformed(text.to_string()))?;
    let xy: u32 = frac[..2]
        .parse()
        .map_err(|_| TickError::Malformed(text.to_string()))?;
    if xy > 31 {
        return Err(TickError::ThirtySecondsRange(text.to_string()));
    }
    let z = match &frac[2..] {
        "+" => 4,
        d => d
            .parse::<u32>()
            .map_err(|_| TickError::Malformed(text.to_string()))?,
    };
    if z > 7 {
        return Err(TickError::TwoFiftySixthsRange(text.to_string()));
    }

    Ok(whole + xy as f64 / 32.0 + z as f64 / 256.0)
}

/// Render a price in fractional notation. Exact on the 256th grid;
/// `z = 4` is written `+`.
pub fn format_price(price: f64) -> String {
    let whole = price.floor();
    let fraction = price - whole;
    let xy = (fraction * 32.0).floor() as i64;
    let z = ((fraction * 256.0) as i64) % 8;
    let z = if z == 4 {
        "+".to_string()
    } else {
        z.to_string()
    };
    format!("{}-{:02}{}", whole as i64, xy, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_decimal() {
        assert_eq!(parse_price("100.5").unwrap(), 100.5);
        assert_eq!(parse_price("0.0078125").unwrap(), 0.0078125);
    }

    #[test]
    fn parses_fractional() {
        assert_eq!(parse_price("100-000").unwrap(), 100.0);
        assert_eq!(parse_price("99-316").unwrap(), 99.0 + 31.0 / 32.0 + 6.0 / 256.0);
        assert_eq!(parse_price("100-25+").unwrap(), 100.0 + 25.0 / 32.0 + 4.0 / 256.0);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_price("hello").is_err());
        assert!(parse_price("100-9").is_err());
        assert!(parse_price("100-418").is_err());
        assert!(parse_price("100-259").is_err());
    }

    #[test]
    fn formats_plus_convention() {
        assert_eq!(format_price(100.0 + 25.0 / 32.0 + 4.0 / 256.0), "100-25+");
        assert_eq!(format_price(99.0), "99-000");
    }

    proptest! {
        // format . parse is the identity on the 32nd/256th grid
        #[test]
        fn round_trip_on_grid(whole in 90i64..110, xy in 0u32..32, z in 0u32..8) {
            let z_txt = if z == 4 { "+".to_string() } else { z.to_string() };
            let text = format!("{}-{:02}{}", whole, xy, z_txt);
            let parsed = parse_price(&text).unwrap();
            prop_assert_eq!(format_price(parsed), text);
        }
    }
}
