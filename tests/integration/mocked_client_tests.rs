//! End-to-end client tests against mocked NCBI endpoints
//!
//! These tests verify the EGQuery/ESearch/EFetch pipeline without making
//! real API calls, using wiremock to simulate E-utilities responses.

use pubmed_records_rs::doi::resolve_doi_with;
use pubmed_records_rs::{ClientConfig, MedlineRecord, PubMedClient, PubMedError, RetryConfig};
use tracing_test::traced_test;
use wiremock::matchers::{method, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EGQUERY_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Result>
  <Term>diffusion kurtosis imaging</Term>
  <eGQueryResult>
    <ResultItem>
      <DbName>pubmed</DbName>
      <MenuName>PubMed</MenuName>
      <Count>3</Count>
      <Status>Ok</Status>
    </ResultItem>
    <ResultItem>
      <DbName>pmc</DbName>
      <MenuName>PMC</MenuName>
      <Count>99</Count>
      <Status>Ok</Status>
    </ResultItem>
  </eGQueryResult>
</Result>"#;

const MEDLINE_CHUNK_1: &str = "\
PMID- 23370058
DP  - 2013 Feb 1
TI  - Diffusion kurtosis imaging of the healthy human
      brain.
AU  - Engemann DA
AU  - Bzdok D
AB  - We measured diffusion kurtosis in healthy subjects.

PMID- 21492488
DP  - 2011 Apr
TI  - Standardized cardiovascular magnetic resonance imaging protocols.
AU  - Smith J
";

const MEDLINE_CHUNK_2: &str = "\
PMID- 25408440
DP  - 2015 Nov
TI  - Mapping white matter pathways in the living human brain.
AU  - Garcia M
";

/// Helper to create a client pointing at a mock server
fn create_mock_client(mock_server: &MockServer) -> PubMedClient {
    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_rate_limit(100.0); // High rate limit for tests

    PubMedClient::with_config(config)
}

fn esearch_body(ids: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "esearchresult": {
            "count": ids.len().to_string(),
            "idlist": ids,
        }
    })
}

#[tokio::test]
#[traced_test]
async fn test_query_records_pipeline_with_chunking() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"/egquery\.fcgi.*"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EGQUERY_XML))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"/esearch\.fcgi.*"))
        .and(query_param("retmax", "3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(esearch_body(&["23370058", "21492488", "25408440"])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    // Chunk size 2 splits three PMIDs into two EFetch requests
    Mock::given(method("GET"))
        .and(path_regex(r"/efetch\.fcgi.*"))
        .and(query_param("id", "23370058,21492488"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MEDLINE_CHUNK_1))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"/efetch\.fcgi.*"))
        .and(query_param("id", "25408440"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MEDLINE_CHUNK_2))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let records = client
        .search()
        .term("diffusion kurtosis imaging")
        .chunk_size(2)
        .run(&client)
        .await
        .expect("pipeline should succeed");

    assert_eq!(records.len(), 3);
    // PubMed result order is preserved across chunks
    let pmids: Vec<_> = records.iter().filter_map(MedlineRecord::pmid).collect();
    assert_eq!(pmids, vec!["23370058", "21492488", "25408440"]);
    assert_eq!(records[0].year(), Some(2013));
}

#[tokio::test]
#[traced_test]
async fn test_limit_skips_global_count() {
    let mock_server = MockServer::start().await;

    // With an explicit limit, EGQuery must not be called
    Mock::given(method("GET"))
        .and(path_regex(r"/egquery\.fcgi.*"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EGQUERY_XML))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"/esearch\.fcgi.*"))
        .and(query_param("retmax", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body(&["23370058"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"/efetch\.fcgi.*"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("PMID- 23370058\nTI  - A title.\n"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let records = client
        .search()
        .term("anything")
        .limit(1)
        .run(&client)
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
}

#[tokio::test]
#[traced_test]
async fn test_field_restriction() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"/esearch\.fcgi.*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body(&["23370058"])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"/efetch\.fcgi.*"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MEDLINE_CHUNK_1))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let records = client
        .search()
        .term("anything")
        .limit(1)
        .fields(["PMID", "TI"])
        .run(&client)
        .await
        .unwrap();

    assert!(records[0].contains("PMID"));
    assert!(records[0].contains("TI"));
    assert!(!records[0].contains("AU"));
    assert!(!records[0].contains("AB"));
}

#[tokio::test]
#[traced_test]
async fn test_empty_search_result_yields_empty_set() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"/esearch\.fcgi.*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body(&[])))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let records = client
        .search()
        .term("nonexistent gibberish")
        .limit(10)
        .run(&client)
        .await
        .unwrap();

    assert!(records.is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_api_params_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"/esearch\.fcgi.*"))
        .and(query_param("api_key", "key123"))
        .and(query_param("email", "researcher@university.edu"))
        .and(query_param("tool", "TestTool"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body(&[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_rate_limit(100.0)
        .with_api_key("key123")
        .with_email("researcher@university.edu")
        .with_tool("TestTool");

    let client = PubMedClient::with_config(config);
    client.search_pmids("asthma", 10).await.unwrap();
}

#[tokio::test]
#[traced_test]
async fn test_client_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"/esearch\.fcgi.*"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let result = client.search_pmids("asthma", 10).await;

    assert!(matches!(
        result,
        Err(PubMedError::ApiError { status: 404, .. })
    ));
}

#[tokio::test]
#[traced_test]
async fn test_server_error_is_retried() {
    let mock_server = MockServer::start().await;

    // First response fails, the retry succeeds
    Mock::given(method("GET"))
        .and(path_regex(r"/esearch\.fcgi.*"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"/esearch\.fcgi.*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(esearch_body(&["23370058"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_rate_limit(100.0)
        .with_retry(RetryConfig {
            max_retries: 2,
            initial_delay: std::time::Duration::from_millis(10),
            max_delay: std::time::Duration::from_millis(50),
        });

    let client = PubMedClient::with_config(config);
    let pmids = client.search_pmids("asthma", 10).await.unwrap();
    assert_eq!(pmids, vec!["23370058"]);
}

#[tokio::test]
#[traced_test]
async fn test_server_error_exhausts_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"/esearch\.fcgi.*"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_rate_limit(100.0)
        .with_retry(RetryConfig::none());

    let client = PubMedClient::with_config(config);
    let result = client.search_pmids("asthma", 10).await;

    assert!(matches!(
        result,
        Err(PubMedError::ApiError { status: 503, .. })
    ));
}

#[tokio::test]
#[traced_test]
async fn test_doi_resolution_follows_redirects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"/10\.1016/.*"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", format!("{}/article/landing", mock_server.uri())),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"/article/landing"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>article</html>"))
        .mount(&mock_server)
        .await;

    let mut record = MedlineRecord::new();
    record.set("PMID", "23370058");
    record.set("AID", "10.1016/j.neuroimage.2012.10.006 [doi]");

    let client = reqwest::Client::new();
    let url = resolve_doi_with(&client, &mock_server.uri(), &record)
        .await
        .unwrap();

    assert!(url.ends_with("/article/landing"));
}

#[tokio::test]
#[traced_test]
async fn test_doi_resolution_without_doi() {
    let mut record = MedlineRecord::new();
    record.set("PMID", "1");

    let client = reqwest::Client::new();
    let result = resolve_doi_with(&client, "http://localhost:1", &record).await;

    assert!(matches!(result, Err(PubMedError::DoiNotFound { .. })));
}
