//! End-to-end agent tests with both collaborators mocked.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use acemap_agent::config::Config;
use acemap_agent::formatters;
use acemap_agent::llm::ChatCompletionClient;
use acemap_agent::models::KeywordSource;
use acemap_agent::{
    AcemapClient, IntentExtractor, QueryPlanner, SearchAgent, TermGrounder, VocabularyStore,
    evaluation, session,
};

const SEARCH_PATH: &str = "/api/v1/work/search";

fn setup_agent(mock_server: &MockServer) -> SearchAgent {
    let config = Config::for_testing(&mock_server.uri());

    let vocabulary = Arc::new(VocabularyStore::from_terms([
        "Granite",
        "Basalt",
        "Plate tectonics",
        "Mid-ocean ridge",
    ]));
    let extractor = IntentExtractor::new(Arc::new(ChatCompletionClient::new(&config).unwrap()));
    let planner = QueryPlanner::new(extractor, TermGrounder::new(vocabulary));
    let search = Arc::new(AcemapClient::new(&config).unwrap());

    SearchAgent::new(planner, search)
}

async fn mount_completion(mock_server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })))
        .mount(mock_server)
        .await;
}

fn work(name: &str, year: Option<i32>, citations: i64) -> serde_json::Value {
    json!({"display_name": name, "publication_year": year, "cited_by_count": citations})
}

// =============================================================================
// SearchAgent::run
// =============================================================================

#[tokio::test]
async fn test_run_grounds_and_filters_by_year() {
    let mock_server = MockServer::start().await;
    mount_completion(
        &mock_server,
        r#"{"keywords": ["Grnite"], "institution": "Peking University", "year_start": 2020}"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("keyword", "Granite"))
        .and(query_param("size", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                work("Granite A", Some(2021), 10),
                work("Granite B", Some(2018), 99),
                work("Granite C", None, 5),
                work("Granite D", Some(2020), 1)
            ],
            "meta": {"count": 812}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = setup_agent(&mock_server).run("recent papers about Grnite from PKU").await;

    assert_eq!(outcome.plan.keywords_raw(), ["Grnite"]);
    assert_eq!(outcome.plan.keywords_grounded(), ["Granite"]);
    assert_eq!(outcome.choice.keyword, "Granite");
    assert_eq!(outcome.choice.source, KeywordSource::Grounded);
    assert_eq!(outcome.fetched_total, 812);
    assert_eq!(outcome.fetched, 4);
    assert_eq!(outcome.institution_note(), Some("Peking University"));

    let titles: Vec<_> = outcome.papers.iter().map(|p| p.title_or_default()).collect();
    assert_eq!(titles, vec!["Granite A", "Granite D"]);
}

#[tokio::test]
async fn test_run_without_keywords_searches_query() {
    let mock_server = MockServer::start().await;
    mount_completion(&mock_server, r#"{"author": "Zhang San"}"#).await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("keyword", "papers by Zhang San"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [work("Untitled survey", None, 0)]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = setup_agent(&mock_server).run("papers by Zhang San").await;

    assert!(outcome.plan.keywords_raw().is_empty());
    assert_eq!(outcome.choice.source, KeywordSource::OriginalQuery);
    assert_eq!(outcome.papers.len(), 1, "no year bound keeps every record");
}

#[tokio::test]
async fn test_run_completion_down_uses_query_as_keyword() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("keyword", "Granite"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [work("Granite weathering", Some(2015), 3)]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = setup_agent(&mock_server).run("Grnite").await;

    assert_eq!(outcome.plan.keywords_raw(), ["Grnite"]);
    assert_eq!(outcome.choice.keyword, "Granite");
    assert_eq!(outcome.papers.len(), 1);
}

#[tokio::test]
async fn test_run_search_down_returns_no_papers() {
    let mock_server = MockServer::start().await;
    mount_completion(&mock_server, r#"{"keywords": ["Bsalt"], "year_start": 2020}"#).await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let outcome = setup_agent(&mock_server).run("recent Bsalt").await;

    assert_eq!(outcome.choice.keyword, "Basalt");
    assert_eq!(outcome.fetched_total, 0);
    assert!(outcome.papers.is_empty());
}

// =============================================================================
// SearchAgent::compare
// =============================================================================

#[tokio::test]
async fn test_compare_baseline_and_report() {
    let mock_server = MockServer::start().await;
    mount_completion(
        &mock_server,
        "```json\n{\"keywords\": \"Plate Tctnics\", \"year_start\": 2020}\n```",
    )
    .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("keyword", "latest plate tctnics"))
        .and(query_param("size", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("keyword", "Plate tectonics"))
        .and(query_param("size", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                work("Subduction | slab rollback", Some(2022), 48),
                work("Old plates", Some(1999), 500)
            ],
            "meta": {"count": 2}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let comparison = setup_agent(&mock_server).compare("latest plate tctnics").await;

    assert_eq!(comparison.baseline.total, 0);
    assert_eq!(comparison.outcome.choice.keyword, "Plate tectonics");
    assert_eq!(comparison.outcome.papers.len(), 1);

    let report = formatters::format_report_markdown(&[comparison]);
    assert!(report.contains("## Query: `latest plate tctnics`"));
    assert!(report.contains("0 papers"));
    assert!(report.contains("`Plate Tctnics` -> `Plate tectonics`"));
    assert!(report.contains("Subduction \\| slab rollback"));
    assert!(!report.contains("Old plates"));
}

// =============================================================================
// Interactive session
// =============================================================================

#[tokio::test]
async fn test_session_skips_blanks_and_stops_at_quit() {
    let mock_server = MockServer::start().await;

    let reply = r#"{"keywords": ["Grnite"], "year_start": 2020}"#;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": reply}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("keyword", "Granite"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [work("Granite A", Some(2021), 10)],
            "meta": {"count": 1}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let agent = setup_agent(&mock_server);
    let input: &[u8] = b"\n   \nrecent papers about Grnite\nQUIT\nnever searched\n";
    let mut output = Vec::new();

    let answered = session::run_session(&agent, input, &mut output).await.unwrap();
    let text = String::from_utf8(output).unwrap();

    assert_eq!(answered, 1);
    assert_eq!(text.matches(session::PROMPT).count(), 4);
    assert!(text.contains("- **Strategy**: KG grounding"));
    assert!(text.contains("`recent papers about Grnite` -> `Granite`"));
    assert!(text.contains("- **Year filter**: >= 2020"));
    assert!(text.contains("Granite A"));
}

#[tokio::test]
async fn test_session_ends_at_end_of_input() {
    let mock_server = MockServer::start().await;
    let agent = setup_agent(&mock_server);

    let mut output = Vec::new();
    let answered = session::run_session(&agent, &b"\n"[..], &mut output).await.unwrap();

    assert_eq!(answered, 0);
    assert!(mock_server.received_requests().await.unwrap_or_default().is_empty());
}

// =============================================================================
// Evaluation
// =============================================================================

#[tokio::test]
async fn test_evaluate_writes_corrected_status() {
    let mock_server = MockServer::start().await;
    mount_completion(&mock_server, r#"{"keywords": ["Grnite", "MORB"]}"#).await;

    let agent = setup_agent(&mock_server);
    let rows = evaluation::evaluate_all(agent.planner(), &["Research on Grnite and MORB"]).await;

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].keywords_grounded, vec!["Granite", "MORB"]);
    assert!(rows[0].corrected());

    let mut csv = Vec::new();
    evaluation::write_csv(&rows, &mut csv).unwrap();
    let csv = String::from_utf8(csv).unwrap();
    assert!(csv.lines().nth(1).unwrap().starts_with(
        "corrected,Research on Grnite and MORB,Grnite; MORB,Granite; MORB,,,"
    ));

    let table = formatters::format_evaluation_markdown(&rows);
    assert!(table.contains("1 of 1 queries corrected by grounding"));
}
