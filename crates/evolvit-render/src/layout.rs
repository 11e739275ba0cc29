//! Sprite layout decoding.
//!
//! A layout is a `|`-separated list of organ records, each record being
//! `type,x,y,size`. The simulation writes the body record without a size
//! (`body,x,y`), so a three-field record is accepted for the body only.
//!
//! Malformed records are dropped individually; the remaining records keep
//! their input order. A negative size is malformed.

use evolvit_core::{Organ, OrganKind, Point};
use thiserror::Error;
use tracing::warn;

pub const RECORD_DELIMITER: char = '|';
pub const FIELD_DELIMITER: char = ',';

/// Size given to a body record that omits it
pub const DEFAULT_BODY_SIZE: f64 = 8.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("record {index} has {found} fields, expected 4")]
    FieldCount { index: usize, found: usize },

    #[error("record {index} has an empty organ type")]
    EmptyType { index: usize },

    #[error("record {index}: invalid {field} value '{value}'")]
    InvalidNumber {
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("layout has no body organ")]
    MissingBodyOrgan,

    #[error("layout has {0} body organs, expected exactly one")]
    DuplicateBodyOrgan(usize),
}

/// Result of decoding a layout: the surviving organs plus what was rejected
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedLayout {
    pub organs: Vec<Organ>,
    pub rejected: Vec<LayoutError>,
}

/// Decode a raw layout string into its organs, skipping malformed records
pub fn decode(raw: &str) -> Vec<Organ> {
    decode_with_report(raw).organs
}

/// Decode a raw layout string, keeping the per-record errors
pub fn decode_with_report(raw: &str) -> DecodedLayout {
    let mut decoded = DecodedLayout::default();

    for (index, record) in raw.split(RECORD_DELIMITER).enumerate() {
        if record.trim().is_empty() {
            continue;
        }

        match parse_record(index, record) {
            Ok(organ) => decoded.organs.push(organ),
            Err(e) => {
                warn!(record = record, "Skipping malformed organ record: {}", e);
                decoded.rejected.push(e);
            }
        }
    }

    decoded
}

/// Parse a single `type,x,y[,size]` record
pub fn parse_record(index: usize, record: &str) -> Result<Organ, LayoutError> {
    let fields: Vec<&str> = record.split(FIELD_DELIMITER).collect();

    let label = fields[0];
    if label.is_empty() {
        return Err(LayoutError::EmptyType { index });
    }
    let kind = OrganKind::from_label(label);

    let size_field = match (fields.len(), kind) {
        (4, _) => Some(fields[3]),
        (3, OrganKind::Body) => None,
        (found, _) => return Err(LayoutError::FieldCount { index, found }),
    };

    let x = parse_number(index, "x", fields[1])?;
    let y = parse_number(index, "y", fields[2])?;
    let size = match size_field {
        Some(value) => parse_size(index, value)?,
        None => DEFAULT_BODY_SIZE,
    };

    Ok(Organ {
        kind,
        label: label.to_string(),
        offset: Point::new(x, y),
        size,
    })
}

fn parse_number(index: usize, field: &'static str, value: &str) -> Result<f64, LayoutError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LayoutError::InvalidNumber {
            index,
            field,
            value: value.to_string(),
        })
}

fn parse_size(index: usize, value: &str) -> Result<f64, LayoutError> {
    let size = parse_number(index, "size", value)?;
    if size < 0.0 {
        return Err(LayoutError::InvalidNumber {
            index,
            field: "size",
            value: value.to_string(),
        });
    }
    Ok(size)
}

/// A decoded layout with exactly one body organ
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteLayout {
    organs: Vec<Organ>,
    body_index: usize,
}

impl SpriteLayout {
    /// Decode and validate a raw layout string
    pub fn parse(raw: &str) -> Result<Self, LayoutError> {
        Self::from_organs(decode(raw))
    }

    pub fn from_organs(organs: Vec<Organ>) -> Result<Self, LayoutError> {
        let mut bodies = organs
            .iter()
            .enumerate()
            .filter(|(_, organ)| organ.is_body())
            .map(|(i, _)| i);

        let body_index = bodies.next().ok_or(LayoutError::MissingBodyOrgan)?;
        let extra = bodies.count();
        if extra > 0 {
            return Err(LayoutError::DuplicateBodyOrgan(extra + 1));
        }

        Ok(Self { organs, body_index })
    }

    /// All organs in layout order, body included
    pub fn organs(&self) -> &[Organ] {
        &self.organs
    }

    pub fn body(&self) -> &Organ {
        &self.organs[self.body_index]
    }

    /// Non-body organs in layout order
    pub fn appendages(&self) -> impl Iterator<Item = &Organ> + '_ {
        self.organs.iter().filter(|organ| !organ.is_body())
    }

    pub fn len(&self) -> usize {
        self.organs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_reference_layout() {
        let organs = decode("body,0,0,10|spike,5,0,4|eye,-3,2,2");

        assert_eq!(organs.len(), 3);
        assert_eq!(organs[0], Organ::new(OrganKind::Body, Point::new(0.0, 0.0), 10.0));
        assert_eq!(organs[1], Organ::new(OrganKind::Spike, Point::new(5.0, 0.0), 4.0));
        assert_eq!(organs[2], Organ::new(OrganKind::Eye, Point::new(-3.0, 2.0), 2.0));
    }

    #[test]
    fn test_decode_simulation_body_record() {
        // Layout exactly as the simulation serializes it
        let organs = decode("body,1.5,-2.25|eye,25,0,5|mouth,-25,0,5");

        assert_eq!(organs.len(), 3);
        assert_eq!(organs[0].kind, OrganKind::Body);
        assert_eq!(organs[0].offset, Point::new(1.5, -2.25));
        assert_eq!(organs[0].size, DEFAULT_BODY_SIZE);
        assert_eq!(organs[2].kind, OrganKind::Mouth);
    }

    #[test]
    fn test_empty_records_are_discarded() {
        let organs = decode("|body,0,0,10||flipper,0,30,10|");
        assert_eq!(organs.len(), 2);
        assert_eq!(organs[1].kind, OrganKind::Flipper);

        assert!(decode("").is_empty());
        assert!(decode("|||").is_empty());
    }

    #[test]
    fn test_unknown_types_are_retained() {
        let organs = decode("body,0,0,10|tentacle,1,1,3|Eye,2,2,2");

        assert_eq!(organs.len(), 3);
        assert_eq!(organs[1].kind, OrganKind::Unknown);
        assert_eq!(organs[1].label, "tentacle");
        assert_eq!(organs[2].kind, OrganKind::Unknown);
        assert_eq!(organs[2].label, "Eye");
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let decoded = decode_with_report(
            "body,0,0,10|spike,abc,0,4|eye,1,2|mouth,3,4,5,6|,1,1,1|flipper,1,1,NaN|spike,1,1,-4|eye,-3,2,2",
        );

        let kinds: Vec<OrganKind> = decoded.organs.iter().map(|o| o.kind).collect();
        assert_eq!(kinds, vec![OrganKind::Body, OrganKind::Eye]);
        assert_eq!(decoded.organs[1].offset, Point::new(-3.0, 2.0));

        assert_eq!(
            decoded.rejected,
            vec![
                LayoutError::InvalidNumber {
                    index: 1,
                    field: "x",
                    value: "abc".to_string()
                },
                LayoutError::FieldCount { index: 2, found: 3 },
                LayoutError::FieldCount { index: 3, found: 5 },
                LayoutError::EmptyType { index: 4 },
                LayoutError::InvalidNumber {
                    index: 5,
                    field: "size",
                    value: "NaN".to_string()
                },
                LayoutError::InvalidNumber {
                    index: 6,
                    field: "size",
                    value: "-4".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_zero_size_is_accepted() {
        let organ = parse_record(0, "eye,1,1,0").unwrap();
        assert_eq!(organ.size, 0.0);
        assert!(parse_record(0, "eye,1,1,-0.5").is_err());
    }

    #[test]
    fn test_numeric_whitespace_is_tolerated() {
        let organ = parse_record(0, "spike, 5 , 0,4").unwrap();
        assert_eq!(organ.offset, Point::new(5.0, 0.0));
    }

    #[test]
    fn test_sprite_layout_validation() {
        let layout = SpriteLayout::parse("spike,5,0,4|body,1,2,10|eye,-3,2,2").unwrap();
        assert_eq!(layout.body().offset, Point::new(1.0, 2.0));
        assert_eq!(layout.appendages().count(), 2);
        assert_eq!(layout.len(), 3);

        assert_eq!(
            SpriteLayout::parse("spike,5,0,4|eye,-3,2,2"),
            Err(LayoutError::MissingBodyOrgan)
        );
        assert_eq!(SpriteLayout::parse(""), Err(LayoutError::MissingBodyOrgan));
        assert_eq!(
            SpriteLayout::parse("body,0,0|body,1,1"),
            Err(LayoutError::DuplicateBodyOrgan(2))
        );
        // A malformed body record counts as missing
        assert_eq!(
            SpriteLayout::parse("body,x,0,10|eye,1,1,1"),
            Err(LayoutError::MissingBodyOrgan)
        );
    }

    fn organ_record() -> impl Strategy<Value = (String, f64, f64, f64)> {
        (
            prop::sample::select(vec!["spike", "mouth", "eye", "flipper", "fin"]),
            -100.0f64..100.0,
            -100.0f64..100.0,
            0.5f64..20.0,
        )
            .prop_map(|(t, x, y, s)| (t.to_string(), x, y, s))
    }

    proptest! {
        #[test]
        fn prop_decode_preserves_count_and_order(
            body_at in 0usize..8,
            records in prop::collection::vec(organ_record(), 0..8),
        ) {
            let mut parts: Vec<String> = records
                .iter()
                .map(|(t, x, y, s)| format!("{},{},{},{}", t, x, y, s))
                .collect();
            let body_at = body_at.min(parts.len());
            parts.insert(body_at, "body,0,0,10".to_string());
            let raw = parts.join("|");

            let organs = decode(&raw);
            prop_assert_eq!(organs.len(), records.len() + 1);
            prop_assert_eq!(organs.iter().filter(|o| o.is_body()).count(), 1);
            prop_assert!(organs[body_at].is_body());

            let appendages: Vec<&Organ> = organs.iter().filter(|o| !o.is_body()).collect();
            for (organ, (label, x, y, s)) in appendages.iter().zip(records.iter()) {
                prop_assert_eq!(&organ.label, label);
                prop_assert_eq!(organ.offset, Point::new(*x, *y));
                prop_assert_eq!(organ.size, *s);
            }

            // Deterministic
            prop_assert_eq!(decode(&raw), organs);
        }
    }
}
