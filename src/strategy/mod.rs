pub mod decision;
pub mod pipeline;

pub use decision::{decide, AdmissionCriteria, Decision, DecisionPipeline, Evaluation, RejectReason};
pub use pipeline::{IterationReport, SignalPipeline};

use anyhow::Result;
use reqwest::Client;
use std::sync::Arc;

use crate::board::{create_fetcher_from_config, BoardLayout, TokenExtractor};
use crate::checks::{create_reputation_evaluator, create_security_evaluator};
use crate::config::Config;
use crate::db::CsvStore;
use crate::notify::create_dispatcher_from_config;
use crate::social::create_analyzer_from_config;
use crate::solana::Wallet;

/// Create the decision pipeline from the application configuration
pub fn create_decision_pipeline(config: &Config, http: Client, wallet: Option<Arc<Wallet>>) -> DecisionPipeline {
    DecisionPipeline::new(
        create_security_evaluator(config, http.clone(), wallet),
        create_reputation_evaluator(config, http),
        AdmissionCriteria {
            max_top_holder_percentage: config.max_top_holder_percentage,
        },
    )
}

/// Wire every component of a polling pass from the application configuration
pub fn create_pipeline_from_config(config: &Config, http: Client, wallet: Option<Arc<Wallet>>) -> Result<SignalPipeline> {
    let pipeline = SignalPipeline::new(
        create_fetcher_from_config(config, http.clone()),
        TokenExtractor::new(&BoardLayout::default())?,
        Box::new(create_analyzer_from_config(config, http.clone())),
        create_decision_pipeline(config, http.clone(), wallet),
        create_dispatcher_from_config(config, http),
        config.buy_amount_sol,
    );
    Ok(pipeline.with_store(CsvStore::new(&config.data_dir)?))
}
