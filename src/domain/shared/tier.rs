use serde::{Deserialize, Serialize};
use std::fmt;

/// Billing tier of a caller. Callers without a key, or with the literal
/// `demo` key, are on the demo tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiTier {
    Demo,
    Paid,
}

impl ApiTier {
    pub fn from_key(api_key: Option<&str>) -> Self {
        match api_key {
            None | Some("demo") => Self::Demo,
            Some(_) => Self::Paid,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Demo => "demo",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for ApiTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request text limits by tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLimits {
    demo: usize,
    paid: usize,
}

impl TextLimits {
    /// The demo limit never exceeds the paid one
    pub fn new(demo: usize, paid: usize) -> Self {
        Self {
            demo: demo.min(paid),
            paid,
        }
    }

    pub fn for_tier(&self, tier: ApiTier) -> usize {
        match tier {
            ApiTier::Demo => self.demo,
            ApiTier::Paid => self.paid,
        }
    }
}

/// Limits reported to a caller in GET /stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierLimits {
    pub characters_per_request: usize,
}
