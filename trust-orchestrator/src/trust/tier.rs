use serde::{Deserialize, Serialize};
use std::fmt;

/// Reliability tier of a content source, ordered from least to most trusted.
///
/// Stored and serialized as its integer level (0..=3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum TrustTier {
    #[default]
    Untrusted = 0,
    MachineChecked = 1,
    AiAssisted = 2,
    HumanVerified = 3,
}

impl TrustTier {
    pub const ALL: [TrustTier; 4] = [
        TrustTier::Untrusted,
        TrustTier::MachineChecked,
        TrustTier::AiAssisted,
        TrustTier::HumanVerified,
    ];

    pub fn level(self) -> i32 {
        self as i32
    }

    pub fn from_level(level: i32) -> Option<Self> {
        match level {
            0 => Some(TrustTier::Untrusted),
            1 => Some(TrustTier::MachineChecked),
            2 => Some(TrustTier::AiAssisted),
            3 => Some(TrustTier::HumanVerified),
            _ => None,
        }
    }

    /// Tiers at or above this one can only be changed by a human.
    pub fn is_protected(self) -> bool {
        self >= TrustTier::AiAssisted
    }

    /// Heading used for this tier's section in a rendered context.
    pub fn section_heading(self) -> &'static str {
        match self {
            TrustTier::Untrusted => "UNKNOWN TRUST LEVEL SOURCES",
            TrustTier::MachineChecked => "MACHINE CHECKED SOURCES",
            TrustTier::AiAssisted => "AI ASSISTED SPOT CHECKED SOURCES",
            TrustTier::HumanVerified => "HUMAN VERIFIED SOURCES",
        }
    }

    /// Per-entry label used inside this tier's section.
    pub fn entry_label(self) -> &'static str {
        match self {
            TrustTier::Untrusted => "Unknown Trust Level Source",
            TrustTier::MachineChecked => "Machine Checked Source",
            TrustTier::AiAssisted => "AI Assisted Spot Checked Source",
            TrustTier::HumanVerified => "Human Verified Source",
        }
    }
}

impl TryFrom<i32> for TrustTier {
    type Error = String;

    fn try_from(level: i32) -> Result<Self, Self::Error> {
        TrustTier::from_level(level).ok_or_else(|| format!("trust tier out of range: {}", level))
    }
}

impl From<TrustTier> for i32 {
    fn from(tier: TrustTier) -> Self {
        tier.level()
    }
}

impl fmt::Display for TrustTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrustTier::Untrusted => "untrusted",
            TrustTier::MachineChecked => "machine_checked",
            TrustTier::AiAssisted => "ai_assisted",
            TrustTier::HumanVerified => "human_verified",
        };
        write!(f, "{}", name)
    }
}
