use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Qualitative recommendation for a promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Go,
    Optimize,
    NoGo,
}

impl Verdict {
    pub fn headline(&self) -> &'static str {
        match self {
            Verdict::Go => "Strong recommendation: GO",
            Verdict::Optimize => "Consider optimizing",
            Verdict::NoGo => "Not recommended",
        }
    }

    /// Planner-facing advice that accompanies the verdict.
    pub fn guidance(&self) -> &'static [&'static str] {
        match self {
            Verdict::Go => &[
                "High success probability",
                "Excellent ROI",
                "Good timing and parameters",
            ],
            Verdict::Optimize => &[
                "Try adjusting the discount percentage",
                "Consider different timing; holiday season typically performs better",
                "Add campaign support if possible",
                "Test in a smaller region first",
            ],
            Verdict::NoGo => &[
                "Low predicted success rate",
                "Poor ROI outlook",
                "Consider alternative marketing tactics",
                "Review the category and region selection",
            ],
        }
    }
}

/// Success outlook from the classifier probability alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SuccessOutlook {
    High,
    Moderate,
    Low,
}

impl SuccessOutlook {
    pub fn message(&self) -> &'static str {
        match self {
            SuccessOutlook::High => "High chance of success",
            SuccessOutlook::Moderate => "Moderate chance; consider adjustments",
            SuccessOutlook::Low => "Low chance; reconsider this promotion",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn verdict_wire_names() {
        assert_eq!(Verdict::NoGo.to_string(), "NO_GO");
        assert_eq!(Verdict::from_str("OPTIMIZE").unwrap(), Verdict::Optimize);
        assert_eq!(serde_json::to_string(&Verdict::Go).unwrap(), "\"GO\"");
    }

    #[test]
    fn every_verdict_has_guidance() {
        for verdict in [Verdict::Go, Verdict::Optimize, Verdict::NoGo] {
            assert!(!verdict.guidance().is_empty());
            assert!(!verdict.headline().is_empty());
        }
    }
}
