//! Proposal API candidate source.
//!
//! Fetches meeting candidates from a paginated REST API that returns
//! `{ "results": [...], "next": "..." }` pages. Requests are synchronous
//! and single-attempt; callers resolve the bearer token themselves
//! (flag over environment, never inline secrets).

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use proxyrecon_engine::model::{CandidateRecord, DateField};

const USER_AGENT: &str = concat!("proxyrecon/", env!("CARGO_PKG_VERSION"));
const TIMEOUT_SECS: u64 = 30;

/// Hard ceiling on followed `next` links. A server that keeps handing
/// out cursors past this is broken, not large.
const MAX_PAGES: usize = 1_000;

/// Proposals with these outcomes never reached a vote and carry no
/// usable meeting, so they are dropped at parse time.
const SKIPPED_OUTCOMES: [&str; 2] = ["Withdrawn", "Not Presented Properly"];

/// Payload columns copied from each proposal row when present.
const PAYLOAD_FIELDS: [&str; 5] = [
    "company_name",
    "country",
    "meeting_type",
    "proposal",
    "outcome",
];

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("authentication failed (HTTP {status}), check the API token")]
    Auth { status: u16 },

    #[error("server error (HTTP {status})")]
    Server { status: u16 },

    #[error("http error: {0}")]
    Http(String),

    #[error("unexpected response body: {0}")]
    Json(String),

    #[error("pagination exceeded {MAX_PAGES} pages, aborting")]
    TooManyPages,
}

/// Blocking client for the proposal API.
pub struct ProposalClient {
    http: reqwest::blocking::Client,
    base_url: String,
    token: String,
    page_size: u32,
}

impl ProposalClient {
    pub fn new(base_url: &str, token: &str, page_size: u32) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            page_size,
        })
    }

    /// Fetch every proposal page, following `next` links until the
    /// server stops returning one.
    pub fn fetch_all(&self) -> Result<Vec<CandidateRecord>, FetchError> {
        let mut candidates = Vec::new();
        let mut url = format!(
            "{}/proposals/?page_size={}",
            self.base_url, self.page_size
        );

        for page in 1.. {
            if page > MAX_PAGES {
                return Err(FetchError::TooManyPages);
            }

            let body = self.get_page(&url)?;
            let (mut records, next) = parse_page(&body);
            debug!(page, records = records.len(), "fetched proposal page");
            candidates.append(&mut records);

            match next {
                Some(next_url) => url = next_url,
                None => break,
            }
        }

        info!(count = candidates.len(), "fetched proposal candidates");
        Ok(candidates)
    }

    fn get_page(&self, url: &str) -> Result<Value, FetchError> {
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let status = resp.status().as_u16();
        if status == 401 || status == 403 {
            return Err(FetchError::Auth { status });
        }
        if status >= 500 {
            return Err(FetchError::Server { status });
        }
        if !(200..300).contains(&status) {
            return Err(FetchError::Http(format!("unexpected HTTP {status} from {url}")));
        }

        resp.json().map_err(|e| FetchError::Json(e.to_string()))
    }
}

/// Turn one response page into candidate records plus the next page URL.
///
/// Pure so the mapping is testable without a server. Rows with a skipped
/// outcome or no ticker are dropped; the meeting date falls back to the
/// filing date when absent.
pub fn parse_page(body: &Value) -> (Vec<CandidateRecord>, Option<String>) {
    let next = body
        .get("next")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let Some(results) = body.get("results").and_then(Value::as_array) else {
        return (Vec::new(), next);
    };

    let records = results
        .iter()
        .filter_map(|item| {
            let ticker = item.get("company_ticker").and_then(Value::as_str)?.trim();
            if ticker.is_empty() {
                return None;
            }
            if let Some(outcome) = item.get("outcome").and_then(Value::as_str) {
                if SKIPPED_OUTCOMES.contains(&outcome) {
                    return None;
                }
            }

            let date = item
                .get("meeting_date")
                .and_then(Value::as_str)
                .or_else(|| item.get("filing_date").and_then(Value::as_str));

            let mut fields = HashMap::new();
            for key in PAYLOAD_FIELDS {
                if let Some(value) = item.get(key).and_then(Value::as_str) {
                    fields.insert(key.to_string(), value.to_string());
                }
            }

            Some(CandidateRecord {
                ticker: ticker.to_string(),
                meeting_date: DateField::parse(date),
                fields,
            })
        })
        .collect();

    (records, next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn proposal(ticker: &str, date: Option<&str>, outcome: &str) -> Value {
        json!({
            "company_ticker": ticker,
            "company_name": format!("{ticker} Incorporated"),
            "meeting_date": date,
            "filing_date": "2025-01-02",
            "meeting_type": "annual",
            "proposal": "Elect directors",
            "outcome": outcome,
        })
    }

    fn page(results: Vec<Value>, next: Option<&str>) -> Value {
        json!({ "count": results.len(), "results": results, "next": next })
    }

    #[test]
    fn parse_page_maps_rows() {
        let body = page(vec![proposal("ABCD", Some("2025-03-10"), "Passed")], None);
        let (records, next) = parse_page(&body);
        assert!(next.is_none());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ticker, "ABCD");
        assert_eq!(
            records[0].meeting_date.as_parsed().unwrap().to_string(),
            "2025-03-10"
        );
        assert_eq!(records[0].fields["company_name"], "ABCD Incorporated");
        assert_eq!(records[0].fields["outcome"], "Passed");
    }

    #[test]
    fn parse_page_skips_dead_outcomes() {
        let body = page(
            vec![
                proposal("ABCD", Some("2025-03-10"), "Passed"),
                proposal("WXYZ", Some("2025-03-11"), "Withdrawn"),
                proposal("QRST", Some("2025-03-12"), "Not Presented Properly"),
            ],
            None,
        );
        let (records, _) = parse_page(&body);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ticker, "ABCD");
    }

    #[test]
    fn parse_page_falls_back_to_filing_date() {
        let body = page(vec![proposal("ABCD", None, "Passed")], None);
        let (records, _) = parse_page(&body);
        assert_eq!(
            records[0].meeting_date.as_parsed().unwrap().to_string(),
            "2025-01-02"
        );
    }

    #[test]
    fn parse_page_drops_blank_tickers_and_reads_next() {
        let body = page(
            vec![proposal("", Some("2025-03-10"), "Passed")],
            Some("https://api.example.com/proposals/?page=2"),
        );
        let (records, next) = parse_page(&body);
        assert!(records.is_empty());
        assert_eq!(next.as_deref(), Some("https://api.example.com/proposals/?page=2"));
    }

    #[test]
    fn fetch_all_follows_next_links() {
        let server = MockServer::start();

        let page2_url = server.url("/proposals/?page=2");
        let page1 = server.mock(|when, then| {
            when.method(GET)
                .path("/proposals/")
                .query_param("page_size", "2");
            then.status(200).json_body(page(
                vec![
                    proposal("ABCD", Some("2025-03-10"), "Passed"),
                    proposal("WXYZ", Some("2025-03-11"), "Passed"),
                ],
                Some(&page2_url),
            ));
        });
        let page2 = server.mock(|when, then| {
            when.method(GET).path("/proposals/").query_param("page", "2");
            then.status(200)
                .json_body(page(vec![proposal("QRST", Some("2025-03-12"), "Passed")], None));
        });

        let client = ProposalClient::new(&server.base_url(), "token", 2).unwrap();
        let candidates = client.fetch_all().unwrap();

        page1.assert();
        page2.assert();
        assert_eq!(candidates.len(), 3);
        let tickers: Vec<&str> = candidates.iter().map(|c| c.ticker.as_str()).collect();
        assert_eq!(tickers, ["ABCD", "WXYZ", "QRST"]);
    }

    #[test]
    fn fetch_all_sends_bearer_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/proposals/")
                .header("authorization", "Bearer sekrit");
            then.status(200).json_body(page(vec![], None));
        });

        let client = ProposalClient::new(&server.base_url(), "sekrit", 100).unwrap();
        let candidates = client.fetch_all().unwrap();
        mock.assert();
        assert!(candidates.is_empty());
    }

    #[test]
    fn auth_failure_is_classified() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/proposals/");
            then.status(401).json_body(json!({"detail": "invalid token"}));
        });

        let client = ProposalClient::new(&server.base_url(), "bad", 100).unwrap();
        match client.fetch_all() {
            Err(FetchError::Auth { status }) => assert_eq!(status, 401),
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[test]
    fn server_failure_is_classified() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/proposals/");
            then.status(503);
        });

        let client = ProposalClient::new(&server.base_url(), "token", 100).unwrap();
        assert!(matches!(
            client.fetch_all(),
            Err(FetchError::Server { status: 503 })
        ));
    }
}
