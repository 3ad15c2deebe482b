//! Feature model - optional project capabilities and their prerequisites.

use serde::{Deserialize, Serialize};

/// Project capability. Declaration order is importance order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Feature {
    Basic,
    Users,
    Emails,
    Sms,
    Push,
}

/// Integration configuration a project may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Integration {
    Email,
    Sms,
    Push,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureRule {
    pub feature: Feature,
    pub is_required: bool,
    /// Integrations that must all be configured; empty means always usable.
    pub prerequisites: &'static [Integration],
}

/// Indexed by `Feature as usize`; order must match the enum.
pub static FEATURE_RULES: [FeatureRule; 5] = [
    FeatureRule {
        feature: Feature::Basic,
        is_required: true,
        prerequisites: &[],
    },
    FeatureRule {
        feature: Feature::Users,
        is_required: true,
        prerequisites: &[],
    },
    FeatureRule {
        feature: Feature::Emails,
        is_required: false,
        prerequisites: &[Integration::Email],
    },
    FeatureRule {
        feature: Feature::Sms,
        is_required: false,
        prerequisites: &[Integration::Sms],
    },
    FeatureRule {
        feature: Feature::Push,
        is_required: false,
        prerequisites: &[Integration::Push],
    },
];

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::Basic,
        Feature::Users,
        Feature::Emails,
        Feature::Sms,
        Feature::Push,
    ];
}

pub fn feature_rule(feature: Feature) -> &'static FeatureRule {
    &FEATURE_RULES[feature as usize]
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Feature::Basic => "BASIC",
            Feature::Users => "USERS",
            Feature::Emails => "EMAILS",
            Feature::Sms => "SMS",
            Feature::Push => "PUSH",
        };
        f.write_str(name)
    }
}
