mod common;

use common::read_fixture;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use statementkit::{ClientConfig, FilingOperations, SecClient, SecUrls, pick_10ks};

const SUBMISSION_FIXTURE: &str = "submissions/submission.json";

fn client_for(server: &MockServer) -> SecClient {
    let config = ClientConfig::new("test_agent example@example.com")
        .with_min_interval(Duration::from_millis(1))
        .with_base_urls(SecUrls {
            submissions: format!("{}/submissions", server.uri()),
            archives: format!("{}/archives", server.uri()),
        });
    SecClient::new(config).unwrap()
}

#[tokio::test]
async fn test_gather_and_select_10ks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/submissions/CIK0000320193.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(read_fixture(SUBMISSION_FIXTURE)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let records = client.gather_filings("0000320193").await.unwrap();
    assert_eq!(records.len(), 3);

    // Two 10-Ks survive (the 10-Q is filtered), newest first
    let filings = pick_10ks(&records, 5, 5, false);
    assert_eq!(filings.len(), 2);
    assert_eq!(filings[0].accession, "0000320193-24-000123");
    assert_eq!(filings[1].accession, "0000320193-23-000106");
    assert!(filings[0].filing_date > filings[1].filing_date);
    assert!(filings.iter().all(|f| f.form == "10-K"));
    assert!(filings.iter().all(|f| f.report_date.is_some()));
}

#[tokio::test]
async fn test_gather_walks_additional_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/submissions/CIK0000320193.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"filings":{"recent":{"accessionNumber":["0000320193-24-000123"],
                "filingDate":["2024-11-01"],"reportDate":["2024-09-28"],"form":["10-K"]},
                "files":[{"name":"CIK0000320193-submissions-001.json","filingCount":1}]}}"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/submissions/CIK0000320193-submissions-001.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"accessionNumber":["0000320193-19-000119"],
                "filingDate":["2019-10-31"],"reportDate":["2019-09-28"],"form":["10-K"]}"#,
        ))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let records = client.gather_filings("0000320193").await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].accession_number, "0000320193-19-000119");
}
