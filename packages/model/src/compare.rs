//! Comparison of a submission against the previous one
//!
//! Only the factors in [`KEY_FACTORS`] are looked at, in table order.
//! Boolean factors report "Started ..." on a false to true change and stay
//! silent the other way round; numeric factors report any change.

use crate::error::Result;
use crate::feature::FeatureRecord;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorKind {
    Numeric,
    Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyFactor {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: FactorKind,
}

pub const KEY_FACTORS: [KeyFactor; 5] = [
    KeyFactor {
        name: "sleep_hours",
        description: "sleep",
        kind: FactorKind::Numeric,
    },
    KeyFactor {
        name: "water_liters",
        description: "water intake",
        kind: FactorKind::Numeric,
    },
    KeyFactor {
        name: "trained",
        description: "exercise",
        kind: FactorKind::Boolean,
    },
    KeyFactor {
        name: "meditated",
        description: "meditation",
        kind: FactorKind::Boolean,
    },
    KeyFactor {
        name: "social_interaction",
        description: "social interaction",
        kind: FactorKind::Boolean,
    },
];

/// Messages describing what changed between `previous` and `current`.
///
/// Factors missing from either record are skipped. A factor value that
/// cannot be read as the factor's type is an error.
pub fn compare_with_previous(
    current: &FeatureRecord,
    previous: &FeatureRecord,
) -> Result<Vec<String>> {
    let mut improvements = Vec::new();

    for factor in &KEY_FACTORS {
        let (Some(now), Some(before)) = (current.get(factor.name), previous.get(factor.name))
        else {
            continue;
        };

        match factor.kind {
            FactorKind::Boolean => {
                if now.to_bool(factor.name)? && !before.to_bool(factor.name)? {
                    improvements.push(format!("Started {}", factor.description));
                }
            }
            FactorKind::Numeric => {
                let now = now.to_f64(factor.name)?;
                let before = before.to_f64(factor.name)?;
                match now.partial_cmp(&before) {
                    Some(Ordering::Greater) => {
                        improvements.push(format!("Increased {}", factor.description))
                    }
                    Some(Ordering::Less) => {
                        improvements.push(format!("Decreased {}", factor.description))
                    }
                    _ => {}
                }
            }
        }
    }

    Ok(improvements)
}
