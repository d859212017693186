use anyhow::{anyhow, Context, Result};
use chrono::{Days, Local, NaiveDate};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use strum::IntoEnumIterator;

use promo_planner::{
    config::{self, AppConfig},
    db::{self, DbPool},
    ml::ModelArtifacts,
    models::{BaselineMatch, CategoricalField, PromotionRequest},
    queries::{ModelPerformanceQuery, Query},
    PromotionPlan, PromotionRoiEstimator,
};

/// Days between today and the default promotion start.
const DEFAULT_START_OFFSET_DAYS: u64 = 7;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let context = CliContext::initialize()?;

    match cli.command {
        Commands::Estimate(args) => handle_estimate(&context, args, cli.json).await?,
        Commands::Stats => handle_stats(&context, cli.json).await?,
        Commands::Categories => handle_categories(&context, cli.json)?,
    }

    Ok(())
}

#[derive(Parser)]
#[command(
    name = "promo-planner",
    about = "Estimate promotion success, ROI and a go/no-go verdict",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a promotion and compare alternative discount levels
    Estimate(EstimateArgs),
    /// Summarize the historical promotions the models were trained on
    Stats,
    /// List the categories the trained encoders accept
    Categories,
}

#[derive(Args)]
struct EstimateArgs {
    #[arg(long, help = "Product category, as known to the trained encoders")]
    category: String,
    #[arg(long = "promo-type", help = "Promotion type, e.g. \"Percentage Off\"")]
    promo_type: String,
    #[arg(long, help = "Sales region")]
    region: String,
    #[arg(long, default_value_t = 15, help = "Discount in whole percent (5-50)")]
    discount: u32,
    #[arg(long, default_value_t = 7, help = "Promotion length in days (1-30)")]
    duration: u32,
    #[arg(
        long = "start-date",
        value_parser = parse_date,
        help = "Start date (YYYY-MM-DD); defaults to one week from today"
    )]
    start_date: Option<NaiveDate>,
    #[arg(
        long,
        action = ArgAction::SetTrue,
        help = "The promotion runs alongside a marketing campaign"
    )]
    campaign: bool,
    #[arg(
        long,
        help = "Number of overlapping campaigns; defaults to 1 with --campaign, else 0"
    )]
    campaigns: Option<u32>,
}

impl EstimateArgs {
    fn into_request(self) -> Result<PromotionRequest> {
        let start_date = match self.start_date {
            Some(date) => date,
            None => Local::now()
                .date_naive()
                .checked_add_days(Days::new(DEFAULT_START_OFFSET_DAYS))
                .ok_or_else(|| anyhow!("default start date is out of range"))?,
        };
        let num_overlapping_campaigns = self.campaigns.unwrap_or(u32::from(self.campaign));

        Ok(PromotionRequest {
            product_category: self.category,
            promotion_type: self.promo_type,
            region: self.region,
            discount_percent: self.discount,
            duration_days: self.duration,
            start_date,
            has_campaign: self.campaign,
            num_overlapping_campaigns,
        })
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("invalid date '{}': {}", raw, e))
}

struct CliContext {
    config: AppConfig,
}

impl CliContext {
    fn initialize() -> Result<Self> {
        let config = config::load_config().context("failed to load application config")?;
        config::init_tracing(config.log_level(), config.log_json);
        Ok(Self { config })
    }

    async fn connect(&self) -> Result<DbPool> {
        db::establish_connection_from_app_config(&self.config)
            .await
            .context("failed to connect to database")
    }

    async fn estimator(&self) -> Result<PromotionRoiEstimator> {
        let db = self.connect().await?;
        PromotionRoiEstimator::bootstrap(&self.config, &db)
            .await
            .context("failed to initialize promotion estimator")
    }
}

async fn handle_estimate(context: &CliContext, args: EstimateArgs, json: bool) -> Result<()> {
    let request = args.into_request()?;
    let estimator = context.estimator().await?;

    let plan = estimator.plan(&request).map_err(|e| {
        let remedy = e.remedy();
        anyhow!(e).context(format!("estimate failed (remedy: {})", remedy))
    })?;

    if json {
        print_json(&plan)?;
    } else {
        render_plan(&plan);
    }
    Ok(())
}

async fn handle_stats(context: &CliContext, json: bool) -> Result<()> {
    let db = context.connect().await?;
    let performance = ModelPerformanceQuery::new(context.config.source_table.clone())
        .execute(&db)
        .await
        .context("failed to load model performance summary")?;

    if json {
        print_json(&performance)?;
        return Ok(());
    }

    println!("Historical promotions: {}", performance.total_promos);
    match performance.success_rate() {
        Some(rate) => println!(
            "Successful: {} ({:.1}%)",
            performance.successful_promos,
            rate * 100.0
        ),
        None => println!("Successful: none recorded"),
    }
    if let Some(lift) = performance.avg_lift {
        println!("Average sales lift: {:.1}%", lift * 100.0);
    }
    if let Some(roi) = performance.avg_roi {
        println!("Average ROI: {:.2}x", roi);
    }
    Ok(())
}

#[derive(Serialize)]
struct CategoryListing<'a> {
    field: CategoricalField,
    classes: &'a [String],
}

fn handle_categories(context: &CliContext, json: bool) -> Result<()> {
    let artifacts = ModelArtifacts::load(&context.config.model_dir)
        .context("failed to load model artifacts")?;

    let listings: Vec<CategoryListing<'_>> = CategoricalField::iter()
        .map(|field| CategoryListing {
            field,
            classes: artifacts.encoders.encoder(field).classes(),
        })
        .collect();

    if json {
        print_json(&listings)?;
    } else {
        for listing in &listings {
            println!("{} ({}):", listing.field, listing.classes.len());
            for class in listing.classes {
                println!("  - {}", class);
            }
        }
    }
    Ok(())
}

fn render_plan(plan: &PromotionPlan) {
    let estimate = &plan.estimate;
    let request = &estimate.request;
    let prediction = &estimate.prediction;
    let projection = &estimate.projection;

    println!(
        "Promotion: {} • {} • {} • {}% off for {} days from {}",
        request.product_category,
        request.promotion_type,
        request.region,
        request.discount_percent,
        request.duration_days,
        request.start_date
    );
    if estimate.baseline_match == BaselineMatch::GlobalMean {
        println!("Note: no history for this region/category; using the overall average baseline");
    }
    println!();
    println!(
        "Success probability: {:.1}% ({})",
        prediction.success_probability * 100.0,
        estimate.outlook.message()
    );
    println!(
        "Predicted sales lift: {:+.1}%",
        prediction.predicted_lift_ratio * 100.0
    );
    println!("Estimated ROI: {:.2}x", projection.estimated_roi);
    println!();
    println!("Baseline sales:    ${:>12.2}", projection.baseline_total_sales);
    println!("Predicted sales:   ${:>12.2}", projection.predicted_total_sales);
    println!("Incremental sales: ${:>12.2}", projection.incremental_sales);
    println!("Promotion cost:    ${:>12.2}", projection.estimated_cost);
    println!("Net benefit:       ${:>12.2}", projection.net_benefit);
    println!();
    println!("{} ({})", estimate.verdict.headline(), estimate.verdict);
    for line in estimate.verdict.guidance() {
        println!("  - {}", line);
    }

    if plan.what_if.is_empty() {
        return;
    }
    println!();
    println!("What-if discount comparison:");
    println!(
        "  {:>8}  {:>10}  {:>8}  {:>14}  {:>6}",
        "Discount", "Success", "Lift", "Sales", "ROI"
    );
    for row in &plan.what_if {
        println!(
            "  {:>7}%  {:>9.1}%  {:>+7.1}%  {:>14.2}  {:>5.2}x",
            row.discount_percent,
            row.prediction.success_probability * 100.0,
            row.prediction.predicted_lift_ratio * 100.0,
            row.projection.predicted_total_sales,
            row.projection.estimated_roi
        );
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
