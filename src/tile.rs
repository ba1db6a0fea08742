use crate::price::Quote;
use anyhow::{Result, bail};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextStyle {
    Primary,
    Subtle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileLine {
    pub text: String,
    pub style: TextStyle,
}

/// One notification payload rendered at four tile resolutions. Every variant
/// carries the same semantic content: a label/value line pair per quote, in
/// input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TilePayload {
    pub small: Vec<TileLine>,
    pub medium: Vec<TileLine>,
    pub large: Vec<TileLine>,
    pub wide: Vec<TileLine>,
}

fn render_lines(quotes: &[Quote]) -> Vec<TileLine> {
    let mut lines = Vec::with_capacity(quotes.len() * 2);
    for quote in quotes {
        lines.push(TileLine {
            text: format!("{} to {}", quote.symbol, quote.currency),
            style: TextStyle::Primary,
        });
        lines.push(TileLine {
            text: format!("${}", quote.amount),
            style: TextStyle::Subtle,
        });
    }
    lines
}

/// Builds the tile payload from the tick's successful quotes. Pure and
/// deterministic; the caller guarantees at least one quote.
pub fn build_payload(quotes: &[Quote]) -> Result<TilePayload> {
    if quotes.is_empty() {
        bail!("Cannot build a tile payload from zero quotes");
    }

    let lines = render_lines(quotes);
    Ok(TilePayload {
        small: lines.clone(),
        medium: lines.clone(),
        large: lines.clone(),
        wide: lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn quote(symbol: &str, amount: &str) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            amount: Decimal::from_str(amount).unwrap(),
            currency: "USD".to_string(),
        }
    }

    #[test]
    fn test_one_line_pair_per_quote_in_order() {
        let quotes = vec![quote("BTC", "50000.00"), quote("LTC", "150.00")];
        let payload = build_payload(&quotes).unwrap();

        for variant in [&payload.small, &payload.medium, &payload.large, &payload.wide] {
            assert_eq!(variant.len(), 4);
            assert_eq!(variant[0].text, "BTC to USD");
            assert_eq!(variant[0].style, TextStyle::Primary);
            assert_eq!(variant[1].text, "$50000.00");
            assert_eq!(variant[1].style, TextStyle::Subtle);
            assert_eq!(variant[2].text, "LTC to USD");
            assert_eq!(variant[3].text, "$150.00");
        }
    }

    #[test]
    fn test_amount_scale_is_preserved() {
        let payload = build_payload(&[quote("BTC", "50000.10")]).unwrap();
        assert_eq!(payload.wide[1].text, "$50000.10");
    }

    #[test]
    fn test_deterministic_for_identical_input() {
        let quotes = vec![quote("BTC", "50000.00"), quote("BCH", "300.25")];
        let first = build_payload(&quotes).unwrap();
        let second = build_payload(&quotes).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let result = build_payload(&[]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("zero quotes"));
    }

    #[test]
    fn test_serialized_shape() {
        let payload = build_payload(&[quote("ETH", "2000.00")]).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["small"][0]["text"], "ETH to USD");
        assert_eq!(json["small"][0]["style"], "primary");
        assert_eq!(json["wide"][1]["text"], "$2000.00");
        assert_eq!(json["wide"][1]["style"], "subtle");
    }
}
