//! Recovery of a structured record from untrusted model output.
//!
//! The model is asked for a single JSON object but frequently wraps it in
//! prose or code fences, breaks lines inside string values, or leaves quotes
//! unescaped. [`sanitize`] escalates through repair tiers, cheapest and most
//! faithful first, and only fails once all of them are exhausted.

pub mod salvage;
pub mod tiers;

use crate::error::SanitizeError;
use serde_json::{Map, Value};
use std::fmt;

const PREVIEW_CHARS: usize = 80;

/// The repair tier that produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Fences and surrounding whitespace stripped, then parsed.
    Direct,
    /// Sliced to the outermost `{ ... }` span.
    Boundary,
    /// String literals repaired character by character.
    CharacterRepair,
    /// Required fields pattern-matched out of the raw text.
    FieldSalvage,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Boundary => write!(f, "boundary"),
            Self::CharacterRepair => write!(f, "character-repair"),
            Self::FieldSalvage => write!(f, "field-salvage"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Bool,
}

/// A field the caller cannot do without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
        }
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Bool,
        }
    }
}

/// A recovered record plus the tier that recovered it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sanitized {
    pub record: Map<String, Value>,
    pub tier: Tier,
}

type Repair = fn(&str) -> Option<String>;

/// Text repairs in escalation order. Each one works on the previous tier's
/// output.
const REPAIRS: [(Tier, Repair); 3] = [
    (Tier::Direct, tiers::strip_fences),
    (Tier::Boundary, tiers::slice_to_braces),
    (Tier::CharacterRepair, tiers::repair_characters),
];

/// Recover a JSON object from `raw`.
///
/// `required` lists the fields the last-resort salvage tier must find; the
/// parsing tiers return whatever object they parse and leave shape checks to
/// the caller.
pub fn sanitize(raw: &str, required: &[FieldSpec]) -> Result<Sanitized, SanitizeError> {
    // Valid output is returned as is, before any repair touches it.
    if let Some(record) = tiers::parse_object(raw.trim()) {
        return Ok(Sanitized {
            record,
            tier: Tier::Direct,
        });
    }

    let mut candidate = raw.to_string();
    for (tier, repair) in REPAIRS {
        let changed = match repair(&candidate) {
            Some(repaired) => {
                candidate = repaired;
                true
            }
            None => false,
        };

        if changed && let Some(record) = tiers::parse_object(&candidate) {
            if tier != Tier::Direct {
                tracing::debug!(%tier, "model output recovered by repair tier");
            }
            return Ok(Sanitized { record, tier });
        }
    }

    if let Some(record) = salvage::salvage_fields(raw, required) {
        tracing::warn!(
            fields = required.len(),
            "model output recovered only by field salvage"
        );
        return Ok(Sanitized {
            record,
            tier: Tier::FieldSalvage,
        });
    }

    tracing::warn!(raw_len = raw.len(), "model output could not be repaired");
    Err(SanitizeError::Unparsable {
        preview: raw.chars().take(PREVIEW_CHARS).collect(),
    })
}
