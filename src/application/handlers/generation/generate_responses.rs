//! GenerateResponses command handler.
//!
//! Runs every pending data item through the model with at most one
//! corrective retry, then persists whatever answer the item ended with.
//!
//! Per item: `Init -> Queried -> {Accepted, RetryQueried} -> {Accepted, Exhausted}`.
//! A model error at any point abandons the item without writing anything;
//! the next run picks it up again.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::foundation::{ConfigurationError, ItemId};
use crate::domain::generation::{
    Classification, CostTracker, ModelPricing, PromptBuilder, ResponseClassifier,
};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, DataItem, DataSource, DataSourceError, SamplingParams,
};

/// Queries per item, counting the initial one.
pub const MAX_ITERATIONS: u32 = 2;

/// Command to generate responses for pending items.
#[derive(Debug, Clone, Default)]
pub struct GenerateResponsesCommand {
    /// Maximum number of pending items to process; `None` processes all.
    pub limit: Option<usize>,
    /// Whether to price token usage and log the running cost.
    pub track_cost: bool,
}

impl GenerateResponsesCommand {
    /// Creates a command that processes every pending item without cost tracking.
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of items processed.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Enables cost tracking.
    pub fn with_cost_tracking(mut self) -> Self {
        self.track_cost = true;
        self
    }
}

/// Errors that stop a run before or while loading items.
#[derive(Debug, Error)]
pub enum GenerateResponsesError {
    /// Run configuration is invalid (e.g., cost tracking for an unpriced model).
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Pending items could not be loaded.
    #[error("Data source error: {0}")]
    DataSource(#[from] DataSourceError),
}

/// How a single item ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Accepted on the first query.
    AcceptedFirstAttempt,
    /// Accepted after the corrective retry.
    AcceptedAfterRefinement,
    /// Rejected on every iteration; the last text was still persisted.
    Exhausted,
    /// A model call failed; nothing was persisted.
    Abandoned,
}

/// Summary of a generation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationReport {
    pub accepted_first_attempt: usize,
    pub accepted_after_refinement: usize,
    pub exhausted: usize,
    pub abandoned: usize,
    /// Final answers whose write failed and was dropped.
    pub dropped_writes: usize,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Cumulative cost in USD; `None` when cost tracking was off.
    pub total_cost: Option<f64>,
}

impl GenerationReport {
    /// Number of items that reached a final classification or were abandoned.
    pub fn processed(&self) -> usize {
        self.accepted_first_attempt + self.accepted_after_refinement + self.exhausted + self.abandoned
    }

    fn count(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::AcceptedFirstAttempt => self.accepted_first_attempt += 1,
            ItemOutcome::AcceptedAfterRefinement => self.accepted_after_refinement += 1,
            ItemOutcome::Exhausted => self.exhausted += 1,
            ItemOutcome::Abandoned => self.abandoned += 1,
        }
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Processed items:            {}", self.processed())?;
        writeln!(f, "  accepted (first attempt): {}", self.accepted_first_attempt)?;
        writeln!(f, "  accepted (after refine):  {}", self.accepted_after_refinement)?;
        writeln!(f, "  exhausted:                {}", self.exhausted)?;
        writeln!(f, "  abandoned:                {}", self.abandoned)?;
        write!(f, "Dropped writes:             {}", self.dropped_writes)?;
        if let Some(cost) = self.total_cost {
            write!(
                f,
                "\nTokens (input/output):      {}/{}\nTotal cost (USD):           {:.6}",
                self.input_tokens, self.output_tokens, cost
            )?;
        }
        Ok(())
    }
}

/// Final state of one item after the query loop.
#[derive(Debug)]
struct ItemRun {
    classification: Classification,
    iterations: u32,
    input_tokens: u64,
    output_tokens: u64,
}

impl ItemRun {
    fn outcome(&self) -> ItemOutcome {
        match (self.classification.is_accepted(), self.iterations) {
            (true, 1) => ItemOutcome::AcceptedFirstAttempt,
            (true, _) => ItemOutcome::AcceptedAfterRefinement,
            (false, _) => ItemOutcome::Exhausted,
        }
    }
}

/// Handler for GenerateResponses commands.
pub struct GenerateResponsesHandler<D, A>
where
    D: DataSource,
    A: AIProvider,
{
    data_source: Arc<D>,
    ai_provider: Arc<A>,
    prompt_builder: Arc<dyn PromptBuilder>,
    classifier: ResponseClassifier,
    sampling: SamplingParams,
}

impl<D, A> GenerateResponsesHandler<D, A>
where
    D: DataSource + 'static,
    A: AIProvider + 'static,
{
    /// Creates a new handler with the given dependencies and default sampling.
    pub fn new(
        data_source: Arc<D>,
        ai_provider: Arc<A>,
        prompt_builder: Arc<dyn PromptBuilder>,
        classifier: ResponseClassifier,
    ) -> Self {
        Self {
            data_source,
            ai_provider,
            prompt_builder,
            classifier,
            sampling: SamplingParams::default(),
        }
    }

    /// Sets the sampling parameters sent with every query.
    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    /// Handles a generate responses command.
    ///
    /// Items are processed strictly one after another. Per-item model and
    /// write failures are logged and counted; only configuration and source
    /// load failures end the run with an error.
    pub async fn handle(
        &self,
        cmd: GenerateResponsesCommand,
    ) -> Result<GenerationReport, GenerateResponsesError> {
        let info = self.ai_provider.provider_info();

        let mut cost_tracker = if cmd.track_cost {
            let pricing = ModelPricing::for_model(&info.model)?;
            if !info.metered {
                tracing::warn!(
                    provider = %info.name,
                    model = %info.model,
                    "Provider reports no token usage, cost will stay at zero"
                );
            }
            Some(CostTracker::new(pricing))
        } else {
            None
        };

        let items = self.data_source.pending_items(cmd.limit).await?;
        tracing::info!(
            provider = %info.name,
            model = %info.model,
            items = items.len(),
            "Starting generation run"
        );

        let mut report = GenerationReport::default();

        for item in &items {
            let run = match self.run_item(item).await {
                Ok(run) => run,
                Err(e) => {
                    tracing::error!(item_id = %item.id, error = %e, "Model call failed, skipping item");
                    report.count(ItemOutcome::Abandoned);
                    continue;
                }
            };

            if !self.save(&item.id, &run.classification).await {
                report.dropped_writes += 1;
            }
            report.count(run.outcome());

            if let Some(tracker) = cost_tracker.as_mut() {
                let cost = tracker.record(run.input_tokens, run.output_tokens);
                tracing::info!(
                    item_id = %item.id,
                    item_cost = cost.item_cost,
                    total_cost = cost.total_cost,
                    "Cost updated"
                );
            }
        }

        if let Some(tracker) = cost_tracker {
            report.input_tokens = tracker.total_input_tokens();
            report.output_tokens = tracker.total_output_tokens();
            report.total_cost = Some(tracker.total_cost());
        }

        tracing::info!(
            processed = report.processed(),
            exhausted = report.exhausted,
            abandoned = report.abandoned,
            "Generation run finished"
        );
        Ok(report)
    }

    /// Queries the model for one item until a response is accepted or the
    /// iteration budget is spent.
    async fn run_item(&self, item: &DataItem) -> Result<ItemRun, AIError> {
        let mut conversation = self.prompt_builder.build_initial(&item.prompt);
        let mut input_tokens = 0u64;
        let mut output_tokens = 0u64;
        let mut iteration = 0;

        loop {
            iteration += 1;

            let request = CompletionRequest::new(conversation.clone()).with_sampling(self.sampling);
            let response = self.ai_provider.complete(request).await?;

            if let Some(usage) = response.usage {
                input_tokens += u64::from(usage.input_tokens);
                output_tokens += u64::from(usage.output_tokens);
            }

            let classification = self.classifier.classify(&response.content);
            tracing::info!(
                item_id = %item.id,
                iteration,
                status = classification.status(),
                "Response classified"
            );

            if classification.is_accepted() || iteration >= MAX_ITERATIONS {
                return Ok(ItemRun {
                    classification,
                    iterations: iteration,
                    input_tokens,
                    output_tokens,
                });
            }

            conversation = self.prompt_builder.refine(conversation, &response.content);
        }
    }

    /// Persists the final text. Returns `false` when the write was dropped.
    async fn save(&self, id: &ItemId, classification: &Classification) -> bool {
        if !classification.is_accepted() {
            tracing::error!(
                item_id = %id,
                outcome = ?classification.outcome,
                response = %classification.text,
                "INCORRECT RESPONSE"
            );
        }

        match self.data_source.persist(id, &classification.text).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(item_id = %id, error = %e, "Failed to persist response");
                false
            }
        }
    }
}
