use crate::models::{SuccessOutlook, Verdict};

pub const GO_MIN_PROBABILITY: f64 = 0.70;
pub const GO_MIN_ROI: f64 = 2.0;
pub const OPTIMIZE_MIN_PROBABILITY: f64 = 0.50;
pub const OPTIMIZE_MIN_ROI: f64 = 1.5;

/// Maps success probability and ROI to a verdict. All bounds are inclusive.
pub fn classify(success_probability: f64, estimated_roi: f64) -> Verdict {
    if success_probability >= GO_MIN_PROBABILITY && estimated_roi >= GO_MIN_ROI {
        Verdict::Go
    } else if success_probability >= OPTIMIZE_MIN_PROBABILITY || estimated_roi >= OPTIMIZE_MIN_ROI {
        Verdict::Optimize
    } else {
        Verdict::NoGo
    }
}

/// Success outlook from probability alone, independent of ROI.
pub fn outlook(success_probability: f64) -> SuccessOutlook {
    if success_probability >= GO_MIN_PROBABILITY {
        SuccessOutlook::High
    } else if success_probability >= OPTIMIZE_MIN_PROBABILITY {
        SuccessOutlook::Moderate
    } else {
        SuccessOutlook::Low
    }
}
