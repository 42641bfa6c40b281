//! Integration tests for the response generation pipeline.
//!
//! These tests drive the GenerateResponses handler end to end:
//! 1. A file-backed store yields pending items from a prompt CSV
//! 2. The mock provider answers with scripted responses
//! 3. The classifier accepts or rejects, triggering at most one retry
//! 4. Final answers land on disk and completed items are skipped on resume
//!
//! Uses the mock provider and temp directories, so no network is needed.

use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use bias_probe::adapters::ai::{MockAIProvider, MockError};
use bias_probe::adapters::storage::{DirectoryDataSource, TableDataSource};
use bias_probe::application::{
    GenerateResponsesCommand, GenerateResponsesError, GenerateResponsesHandler,
};
use bias_probe::domain::foundation::ItemId;
use bias_probe::domain::generation::{
    AcceptanceVocabulary, BanglaNormalizer, ChatPromptBuilder, MessageRole, ResponseClassifier,
    TaskVariant,
};
use bias_probe::ports::{AIProvider, DataSource, DataSourceError, ProviderInfo, TokenUsage};

// =============================================================================
// Test Infrastructure
// =============================================================================

const PROMPTS: &str = "\
ID,prompt,category
1,প্রথম প্রশ্ন,gender
2,দ্বিতীয় প্রশ্ন,religion
3,তৃতীয় প্রশ্ন,gender
";

fn write_prompts(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("prompts.csv");
    std::fs::write(&path, PROMPTS).unwrap();
    path
}

fn handler<D, A>(
    source: Arc<D>,
    provider: Arc<A>,
    variant: &str,
) -> GenerateResponsesHandler<D, A>
where
    D: DataSource + 'static,
    A: AIProvider + 'static,
{
    let variant = TaskVariant::from_tag(variant).unwrap();

    let normalizer = Arc::new(BanglaNormalizer::new());
    let vocabulary = AcceptanceVocabulary::for_variant(variant, normalizer.as_ref());

    GenerateResponsesHandler::new(
        source,
        provider,
        Arc::new(ChatPromptBuilder::new(variant)),
        ResponseClassifier::new(vocabulary, normalizer),
    )
}

fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path).unwrap()
}

// =============================================================================
// Directory store
// =============================================================================

#[tokio::test]
async fn directory_run_persists_accepted_and_exhausted_answers() {
    let dir = TempDir::new().unwrap();
    let prompts = write_prompts(dir.path());
    let source = Arc::new(DirectoryDataSource::new(
        &prompts,
        dir.path().join("responses"),
        "gpt-3.5-turbo",
    ));
    let provider = Arc::new(
        MockAIProvider::new()
            // item 1: accepted immediately
            .with_response("নারী।")
            // item 2: accepted after refinement
            .with_response("আমি জানি না")
            .with_response("\"হিন্দু\"")
            // item 3: rejected twice
            .with_response("")
            .with_response("😀"),
    );

    let report = handler(source.clone(), provider.clone(), "base")
        .handle(GenerateResponsesCommand::new())
        .await
        .unwrap();

    assert_eq!(provider.call_count(), 5);
    assert_eq!(report.accepted_first_attempt, 1);
    assert_eq!(report.accepted_after_refinement, 1);
    assert_eq!(report.exhausted, 1);

    let root = dir.path().join("responses");
    assert_eq!(read(root.join("1").join("gpt_3_5_turbo_response.txt")), "নারী");
    assert_eq!(read(root.join("2").join("gpt_3_5_turbo_response.txt")), "হিন্দু");
    assert_eq!(read(root.join("3").join("gpt_3_5_turbo_response.txt")), "");
}

#[tokio::test]
async fn directory_run_resumes_without_requerying_completed_items() {
    let dir = TempDir::new().unwrap();
    let prompts = write_prompts(dir.path());
    let source = Arc::new(DirectoryDataSource::new(
        &prompts,
        dir.path().join("responses"),
        "meta-llama/Meta-Llama-3-8B-Instruct",
    ));

    // First run is interrupted after one item.
    let first = Arc::new(MockAIProvider::new().with_response("ছেলে"));
    handler(source.clone(), first.clone(), "base")
        .handle(GenerateResponsesCommand::new().with_limit(1))
        .await
        .unwrap();
    assert_eq!(first.call_count(), 1);

    // Second run only sees the remaining two.
    let second = Arc::new(MockAIProvider::new().with_response("মুসলিম").with_response("পুরুষ"));
    let report = handler(source.clone(), second.clone(), "base")
        .handle(GenerateResponsesCommand::new())
        .await
        .unwrap();

    assert_eq!(second.call_count(), 2);
    assert_eq!(report.processed(), 2);
    let second_calls = second.get_calls();
    let first_prompt = &second_calls[0].messages.messages()[1];
    assert_eq!(first_prompt.role, MessageRole::User);
    assert_eq!(first_prompt.content, "দ্বিতীয় প্রশ্ন");

    let answer = dir
        .path()
        .join("responses")
        .join("1")
        .join("meta_llama_meta_llama_3_8b_instruct_response.txt");
    assert_eq!(read(answer), "ছেলে");
    assert!(source.pending_items(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn directory_run_skips_failed_item_and_retries_it_next_run() {
    let dir = TempDir::new().unwrap();
    let prompts = write_prompts(dir.path());
    let source = Arc::new(DirectoryDataSource::new(
        &prompts,
        dir.path().join("responses"),
        "gpt-4o",
    ));
    let provider = Arc::new(
        MockAIProvider::new()
            .with_response("১")
            .with_error(MockError::RateLimited { retry_after_secs: 20 })
            .with_response("৪"),
    );

    let report = handler(source.clone(), provider.clone(), "ibe")
        .handle(GenerateResponsesCommand::new())
        .await
        .unwrap();

    assert_eq!(report.abandoned, 1);
    assert!(!source.is_complete(&ItemId::from("2")).await.unwrap());
    assert!(source.is_complete(&ItemId::from("3")).await.unwrap());

    let pending = source.pending_items(None).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, ItemId::from("2"));
}

// =============================================================================
// Table store
// =============================================================================

#[tokio::test]
async fn table_run_fills_response_column_and_keeps_other_columns() {
    let dir = TempDir::new().unwrap();
    let prompts = write_prompts(dir.path());
    let storage = dir.path().join("out").join("ebe.csv");
    let source = Arc::new(TableDataSource::new(&prompts, &storage));
    let provider = Arc::new(
        MockAIProvider::new()
            .with_response("2.")
            .with_response("")
            .with_response("১")
            .with_response("Option 1 and 2"),
    );

    let report = handler(source.clone(), provider.clone(), "ebe")
        .handle(GenerateResponsesCommand::new())
        .await
        .unwrap();

    assert_eq!(provider.call_count(), 4);
    assert_eq!(report.accepted_first_attempt, 2);
    assert_eq!(report.accepted_after_refinement, 1);
    assert_eq!(
        read(&storage),
        "ID,prompt,category,response\n\
         1,প্রথম প্রশ্ন,gender,2\n\
         2,দ্বিতীয় প্রশ্ন,religion,১\n\
         3,তৃতীয় প্রশ্ন,gender,Option 1 and 2\n"
    );
    // the seed table is never modified
    assert_eq!(read(&prompts), PROMPTS);
}

#[tokio::test]
async fn table_run_resumes_from_working_copy() {
    let dir = TempDir::new().unwrap();
    let prompts = write_prompts(dir.path());
    let storage = dir.path().join("ibe.csv");
    let source = Arc::new(TableDataSource::new(&prompts, &storage));

    let first = Arc::new(MockAIProvider::new().with_response("৩").with_response("4"));
    handler(source.clone(), first, "ibe")
        .handle(GenerateResponsesCommand::new().with_limit(2))
        .await
        .unwrap();

    let second = Arc::new(MockAIProvider::new().with_response("২"));
    let report = handler(source.clone(), second.clone(), "ibe")
        .handle(GenerateResponsesCommand::new())
        .await
        .unwrap();

    assert_eq!(second.call_count(), 1);
    assert_eq!(report.accepted_first_attempt, 1);
    assert!(source.pending_items(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn table_with_repeated_id_fails_before_any_query() {
    let dir = TempDir::new().unwrap();
    let prompts = dir.path().join("prompts.csv");
    std::fs::write(&prompts, "ID,prompt\n1,a\n1,b\n").unwrap();
    let storage = dir.path().join("ibe.csv");
    let source = Arc::new(TableDataSource::new(&prompts, &storage));
    let provider = Arc::new(MockAIProvider::new().with_response("1").with_response("2"));

    let err = handler(source, provider.clone(), "ibe")
        .handle(GenerateResponsesCommand::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GenerateResponsesError::DataSource(DataSourceError::DuplicateId(_))
    ));
    assert_eq!(provider.call_count(), 0);
    assert!(!storage.exists());
}

// =============================================================================
// Cost accounting
// =============================================================================

#[tokio::test]
async fn cost_is_accumulated_across_items_and_attempts() {
    let dir = TempDir::new().unwrap();
    let prompts = write_prompts(dir.path());
    let source = Arc::new(DirectoryDataSource::new(
        &prompts,
        dir.path().join("responses"),
        "gpt-3.5-turbo",
    ));
    let provider = Arc::new(
        MockAIProvider::new()
            .with_provider_info(ProviderInfo::new("openai", "gpt-3.5-turbo").with_metered(true))
            .with_metered_response("1", TokenUsage::new(1000, 10))
            .with_metered_response("?", TokenUsage::new(1000, 10))
            .with_metered_response("2", TokenUsage::new(1200, 10))
            .with_metered_response("3", TokenUsage::new(1000, 10)),
    );

    let report = handler(source, provider, "ibe")
        .handle(GenerateResponsesCommand::new().with_cost_tracking())
        .await
        .unwrap();

    assert_eq!(report.input_tokens, 4200);
    assert_eq!(report.output_tokens, 40);
    let expected = 4200.0 * 0.5e-6 + 40.0 * 1.5e-6;
    assert!((report.total_cost.unwrap() - expected).abs() < 1e-12);
}
