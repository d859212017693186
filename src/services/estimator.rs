/*!
 * # Promotion ROI Estimator
 *
 * Ties the feature encoder, baseline resolver, predictor adapter, financial
 * projector and recommendation rules together. Built once per process from
 * the model artifacts and the baseline table, then shared read-only.
 */

use metrics::counter;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::ml::{encode, FeatureVector, LabelEncoders, ModelArtifacts, PredictorAdapter};
use crate::models::{
    Baseline, BaselineMatch, BaselineTable, PredictionResult, Projection, PromotionRequest,
    SuccessOutlook, Verdict, WhatIfRow,
};
use crate::queries::{baseline_queries::LoadBaselineTableQuery, Query};
use crate::services::{baseline, projection, recommendations};

/// Everything computed for one submitted promotion.
#[derive(Debug, Clone, Serialize)]
pub struct PromotionEstimate {
    pub request: PromotionRequest,
    pub baseline: Baseline,
    pub baseline_match: BaselineMatch,
    pub features: FeatureVector,
    pub prediction: PredictionResult,
    pub projection: Projection,
    pub verdict: Verdict,
    pub outlook: SuccessOutlook,
}

/// An estimate together with its what-if comparison.
#[derive(Debug, Clone, Serialize)]
pub struct PromotionPlan {
    pub estimate: PromotionEstimate,
    pub what_if: Vec<WhatIfRow>,
}

struct PreparedRequest {
    baseline: Baseline,
    baseline_match: BaselineMatch,
    features: FeatureVector,
}

#[derive(Debug)]
pub struct PromotionRoiEstimator {
    predictor: PredictorAdapter,
    encoders: LabelEncoders,
    baselines: BaselineTable,
    what_if_discounts: Vec<u32>,
}

impl PromotionRoiEstimator {
    pub fn new(artifacts: ModelArtifacts, baselines: BaselineTable) -> Self {
        Self {
            predictor: artifacts.predictor,
            encoders: artifacts.encoders,
            baselines,
            what_if_discounts: projection::DEFAULT_WHAT_IF_DISCOUNTS.to_vec(),
        }
    }

    /// Replaces the discount grid used by [`Self::what_if`].
    pub fn with_what_if_discounts(mut self, discounts: Vec<u32>) -> Self {
        self.what_if_discounts = discounts;
        self
    }

    /// Loads the model artifacts and the baseline table described by `config`.
    ///
    /// Artifacts are loaded first so a missing model halts startup before any
    /// warehouse query runs.
    pub async fn bootstrap(
        config: &AppConfig,
        db: &DatabaseConnection,
    ) -> Result<Self, ServiceError> {
        let artifacts = ModelArtifacts::load(&config.model_dir)?;
        let baselines = LoadBaselineTableQuery::new(config.source_table.clone())
            .execute(db)
            .await?;

        info!(
            baseline_rows = baselines.len(),
            what_if_levels = config.what_if_discounts.len(),
            "Promotion ROI estimator ready"
        );

        Ok(Self::new(artifacts, baselines).with_what_if_discounts(config.what_if_discounts.clone()))
    }

    pub fn encoders(&self) -> &LabelEncoders {
        &self.encoders
    }

    pub fn baselines(&self) -> &BaselineTable {
        &self.baselines
    }

    pub fn what_if_discounts(&self) -> &[u32] {
        &self.what_if_discounts
    }

    /// Scores a promotion and derives its projection and verdict.
    #[instrument(skip(self, request), fields(region = %request.region, category = %request.product_category))]
    pub fn estimate(&self, request: &PromotionRequest) -> Result<PromotionEstimate, ServiceError> {
        let prepared = self.prepare(request)?;
        self.estimate_prepared(request, &prepared)
    }

    /// Re-scores the promotion at every configured discount level.
    #[instrument(skip(self, request), fields(region = %request.region, category = %request.product_category))]
    pub fn what_if(&self, request: &PromotionRequest) -> Result<Vec<WhatIfRow>, ServiceError> {
        let prepared = self.prepare(request)?;
        self.what_if_prepared(request, &prepared)
    }

    /// Estimate plus what-if sweep over a single encoding of the request.
    #[instrument(skip(self, request), fields(region = %request.region, category = %request.product_category))]
    pub fn plan(&self, request: &PromotionRequest) -> Result<PromotionPlan, ServiceError> {
        let prepared = self.prepare(request)?;
        let estimate = self.estimate_prepared(request, &prepared)?;
        let what_if = self.what_if_prepared(request, &prepared)?;
        Ok(PromotionPlan { estimate, what_if })
    }

    /// Validates the request, rejects unknown categories before any model
    /// runs, then resolves the baseline and encodes the features.
    fn prepare(&self, request: &PromotionRequest) -> Result<PreparedRequest, ServiceError> {
        request.validate()?;
        self.encoders.encode_request(request)?;

        let (baseline, baseline_match) =
            baseline::resolve_with_match(&request.region, &request.product_category, &self.baselines)?;
        let features = encode(request, &baseline, &self.encoders)?;

        debug!(?baseline_match, features = ?features.values(), "Encoded promotion request");

        Ok(PreparedRequest {
            baseline,
            baseline_match,
            features,
        })
    }

    fn estimate_prepared(
        &self,
        request: &PromotionRequest,
        prepared: &PreparedRequest,
    ) -> Result<PromotionEstimate, ServiceError> {
        let prediction = self.predictor.predict(&prepared.features)?;
        let projection = projection::project(
            &prepared.baseline,
            &prediction,
            request.discount_percent,
            request.duration_days,
        );
        let verdict = recommendations::classify(prediction.success_probability, projection.estimated_roi);
        let outlook = recommendations::outlook(prediction.success_probability);

        counter!("promo_planner.estimates", 1);
        info!(
            success_probability = prediction.success_probability,
            predicted_lift_ratio = prediction.predicted_lift_ratio,
            estimated_roi = projection.estimated_roi,
            %verdict,
            "Promotion estimated"
        );

        Ok(PromotionEstimate {
            request: request.clone(),
            baseline: prepared.baseline,
            baseline_match: prepared.baseline_match,
            features: prepared.features,
            prediction,
            projection,
            verdict,
            outlook,
        })
    }

    fn what_if_prepared(
        &self,
        request: &PromotionRequest,
        prepared: &PreparedRequest,
    ) -> Result<Vec<WhatIfRow>, ServiceError> {
        projection::what_if_sweep(
            &prepared.baseline,
            request.duration_days,
            &self.what_if_discounts,
            |discount_percent| {
                self.predictor
                    .predict(&prepared.features.with_discount(discount_percent))
            },
        )
    }
}
