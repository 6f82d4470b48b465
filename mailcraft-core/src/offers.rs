//! Additional Offers - Repeating Sub-Blocks of a Sales Offer
//!
//! On the wire the list is a JSON array stored as a string under
//! `additionalOffers`, and array position is display order. In memory every
//! entry gets a surrogate id so that deleting one entry never invalidates a
//! reference to another.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

use crate::attributes::{AttributeBag, Attrs, BagWriter, TextAlign, TextStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OfferId(Uuid);

impl OfferId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OfferId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The four text fields of an additional offer, in render order.
pub const OFFER_FIELDS: [&str; 4] = ["separator", "offer", "details", "disclaimer"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferLine {
    pub text: String,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionalOffer {
    pub id: OfferId,
    pub separator: OfferLine,
    pub offer: OfferLine,
    pub details: OfferLine,
    pub disclaimer: OfferLine,
}

impl Default for AdditionalOffer {
    fn default() -> Self {
        Self {
            id: OfferId::new(),
            separator: OfferLine {
                text: "PLUS".to_string(),
                style: TextStyle::new(14, "#999999", TextAlign::Center).with_padding(10, 5),
            },
            offer: OfferLine {
                text: "$500 Loyalty Bonus".to_string(),
                style: TextStyle::new(22, "#d32f2f", TextAlign::Center),
            },
            details: OfferLine {
                text: "For returning customers".to_string(),
                style: TextStyle::new(14, "#555555", TextAlign::Center),
            },
            disclaimer: OfferLine {
                text: String::new(),
                style: TextStyle::new(11, "#888888", TextAlign::Center),
            },
        }
    }
}

impl AdditionalOffer {
    /// Lines in storage/render order.
    pub fn lines(&self) -> [&OfferLine; 4] {
        [&self.separator, &self.offer, &self.details, &self.disclaimer]
    }

    pub fn line_mut(&mut self, field: &str) -> Option<&mut OfferLine> {
        match field {
            "separator" => Some(&mut self.separator),
            "offer" => Some(&mut self.offer),
            "details" => Some(&mut self.details),
            "disclaimer" => Some(&mut self.disclaimer),
            _ => None,
        }
    }

    fn from_bag(bag: &AttributeBag) -> Self {
        let attrs = Attrs::new(bag);
        let defaults = AdditionalOffer::default();
        let id = attrs
            .get("id")
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .map(OfferId)
            .unwrap_or(defaults.id);
        let line = |field: &str, fallback: &OfferLine| OfferLine {
            text: attrs.text(field, ""),
            style: TextStyle::read(&attrs, field, &fallback.style),
        };
        Self {
            id,
            separator: line("separator", &defaults.separator),
            offer: line("offer", &defaults.offer),
            details: line("details", &defaults.details),
            disclaimer: line("disclaimer", &defaults.disclaimer),
        }
    }

    fn to_bag(&self) -> AttributeBag {
        let mut out = BagWriter::new();
        out.put("id", self.id);
        for (field, line) in OFFER_FIELDS.iter().zip(self.lines()) {
            out.put(field, &line.text);
            line.style.write(field, &mut out);
        }
        out.finish()
    }
}

/// Decode the serialized `additionalOffers` value.
///
/// Anything that is not a JSON array of objects is an error; callers treat
/// the error as an empty list.
pub fn decode_offers(raw: &str) -> Result<Vec<AdditionalOffer>, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let entries: Vec<Map<String, Value>> = serde_json::from_str(raw)?;
    Ok(entries
        .into_iter()
        .map(|entry| {
            let bag: AttributeBag = entry
                .into_iter()
                .filter_map(|(k, v)| match v {
                    Value::String(s) => Some((k, s)),
                    Value::Number(n) => Some((k, n.to_string())),
                    Value::Bool(b) => Some((k, b.to_string())),
                    _ => None,
                })
                .collect();
            AdditionalOffer::from_bag(&bag)
        })
        .collect())
}

pub fn encode_offers(offers: &[AdditionalOffer]) -> String {
    let bags: Vec<AttributeBag> = offers.iter().map(AdditionalOffer::to_bag).collect();
    serde_json::to_string(&bags).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_preserves_order_and_styles() {
        let raw = r##"[
            {"offer": "First", "offerFontSize": "30", "offerColor": "#000000"},
            {"offer": "Second", "separator": "AND"}
        ]"##;
        let offers = decode_offers(raw).unwrap();
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].offer.text, "First");
        assert_eq!(offers[0].offer.style.font_size, 30);
        assert_eq!(offers[0].offer.style.color, "#000000");
        assert_eq!(offers[1].separator.text, "AND");
        assert_ne!(offers[0].id, offers[1].id);
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(decode_offers("{not json").is_err());
        assert!(decode_offers(r#"{"offer": "x"}"#).is_err());
        assert!(decode_offers("").unwrap().is_empty());
    }

    #[test]
    fn test_ids_survive_reencoding() {
        let offers = vec![AdditionalOffer::default(), AdditionalOffer::default()];
        let decoded = decode_offers(&encode_offers(&offers)).unwrap();
        let ids: Vec<_> = decoded.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![offers[0].id, offers[1].id]);
    }
}
