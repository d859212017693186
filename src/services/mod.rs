// Promotion planning
pub mod baseline;
pub mod estimator;
pub mod projection;
pub mod recommendations;

pub use estimator::{PromotionEstimate, PromotionPlan, PromotionRoiEstimator};
