use crate::config::ClientConfig;
use crate::error::{PubMedError, Result};
use crate::medline::parser::parse_medline;
use crate::medline::records::RecordSet;
use crate::pubmed::query::RecordQuery;
use crate::pubmed::responses::ESearchResult;
use crate::rate_limit::RateLimiter;
use crate::retry::with_retry;
use quick_xml::Reader;
use quick_xml::events::Event;
use reqwest::{Client, Response};
use std::io::BufReader;
use tracing::{debug, info, instrument, warn};

/// Number of PMIDs requested per EFetch call by default
pub const DEFAULT_CHUNK_SIZE: usize = 50;

/// Client for downloading PubMed records through the NCBI E-utilities
#[derive(Clone)]
pub struct PubMedClient {
    client: Client,
    base_url: String,
    rate_limiter: RateLimiter,
    config: ClientConfig,
}

impl PubMedClient {
    /// Create a new client with default configuration
    ///
    /// Uses default NCBI rate limiting (3 requests/second) and no API key.
    /// For production use, consider `with_config()` to set an API key and a
    /// contact email.
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_records_rs::PubMedClient;
    ///
    /// let client = PubMedClient::new();
    /// ```
    pub fn new() -> Self {
        Self::with_config(ClientConfig::new())
    }

    /// Create a new client with custom configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_records_rs::{ClientConfig, PubMedClient};
    ///
    /// let config = ClientConfig::new()
    ///     .with_api_key("your_api_key_here")
    ///     .with_email("researcher@university.edu");
    ///
    /// let client = PubMedClient::with_config(config);
    /// ```
    pub fn with_config(config: ClientConfig) -> Self {
        let rate_limiter = config.create_rate_limiter();
        let base_url = config.effective_base_url().to_string();

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.effective_user_agent())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            rate_limiter,
            config,
        }
    }

    /// Create a new client around an existing reqwest client
    pub fn with_client(client: Client) -> Self {
        let config = ClientConfig::new();
        let rate_limiter = config.create_rate_limiter();
        let base_url = config.effective_base_url().to_string();

        Self {
            client,
            base_url,
            rate_limiter,
            config,
        }
    }

    /// Start building a record query for this client
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_records_rs::PubMedClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::new();
    ///     let records = client
    ///         .search()
    ///         .term("diffusion kurtosis imaging")
    ///         .limit(100)
    ///         .run(&client)
    ///         .await?;
    ///
    ///     println!("{records}");
    ///     Ok(())
    /// }
    /// ```
    pub fn search(&self) -> RecordQuery {
        RecordQuery::new()
    }

    /// Number of PubMed records matching a term, via the EGQuery API
    #[instrument(skip(self))]
    pub async fn global_count(&self, term: &str) -> Result<u64> {
        let term = term.trim();
        if term.is_empty() {
            return Err(PubMedError::InvalidQuery(
                "Search term cannot be empty".to_string(),
            ));
        }

        let url = format!(
            "{}/egquery.fcgi?term={}",
            self.base_url,
            urlencoding::encode(term)
        );

        debug!("Making EGQuery API request");
        let response = self.make_request(&url).await?;
        let xml_text = response.text().await?;

        let count = parse_egquery_pubmed_count(&xml_text)?;
        info!(count, "EGQuery completed");
        Ok(count)
    }

    /// Search PubMed and return matching PMIDs, via the ESearch API
    #[instrument(skip(self), fields(query = %term, retmax = retmax))]
    pub async fn search_pmids(&self, term: &str, retmax: usize) -> Result<Vec<String>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(PubMedError::InvalidQuery(
                "Search term cannot be empty".to_string(),
            ));
        }

        let url = format!(
            "{}/esearch.fcgi?db=pubmed&term={}&retmax={}&retmode=json",
            self.base_url,
            urlencoding::encode(term),
            retmax
        );

        debug!("Making ESearch API request");
        let response = self.make_request(&url).await?;
        let search_result: ESearchResult = response.json().await?;
        let pmids = search_result.esearchresult.idlist;

        info!(results_found = pmids.len(), "Search completed");
        Ok(pmids)
    }

    /// Fetch MEDLINE records for a list of PMIDs, via the EFetch API
    ///
    /// Large PMID lists are split into requests of `chunk_size` ids;
    /// PubMed's result order is preserved.
    #[instrument(skip(self, pmids), fields(pmid_count = pmids.len(), chunk_size = chunk_size))]
    pub async fn fetch_records(&self, pmids: &[String], chunk_size: usize) -> Result<RecordSet> {
        for pmid in pmids {
            if pmid.trim().is_empty() || !pmid.chars().all(|c| c.is_ascii_digit()) {
                warn!(pmid = %pmid, "Invalid PMID format provided");
                return Err(PubMedError::InvalidPmid { pmid: pmid.clone() });
            }
        }

        let chunk_size = chunk_size.max(1);
        let mut records = RecordSet::new();

        for chunk in pmids.chunks(chunk_size) {
            let url = format!(
                "{}/efetch.fcgi?db=pubmed&id={}&rettype=medline&retmode=text",
                self.base_url,
                chunk.join(",")
            );

            debug!(chunk_len = chunk.len(), "Making EFetch API request");
            let response = self.make_request(&url).await?;
            let text = response.text().await?;

            let parsed = parse_medline(&text)?;
            debug!(
                requested = chunk.len(),
                received = parsed.len(),
                "Parsed EFetch chunk"
            );
            records.extend(parsed);
        }

        info!(record_count = records.len(), "Fetched records");
        Ok(records)
    }

    /// Download all records matching a term
    ///
    /// Convenience for the full pipeline: a global count, an ESearch for
    /// that many PMIDs and chunked EFetch calls. Equivalent to
    /// `client.search().term(term).run(&client)`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_records_rs::PubMedClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::new();
    ///     let records = client.query_records("diffusion kurtosis imaging").await?;
    ///     records.save("records.json")?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn query_records(&self, term: &str) -> Result<RecordSet> {
        RecordQuery::new().term(term).run(self).await
    }

    /// Internal helper for HTTP requests with rate limiting and retry
    ///
    /// Appends the configured API parameters (api_key, email, tool) to the
    /// URL and converts transient server statuses into retryable errors.
    pub(crate) async fn make_request(&self, url: &str) -> Result<Response> {
        let mut final_url = url.to_string();
        let api_params = self.config.build_api_params();
        if !api_params.is_empty() {
            let separator = if url.contains('?') { '&' } else { '?' };
            final_url.push(separator);
            let param_strings: Vec<String> = api_params
                .into_iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
                .collect();
            final_url.push_str(&param_strings.join("&"));
        }

        let response = with_retry(
            || async {
                self.rate_limiter.acquire().await?;
                debug!(url = %final_url, "Making API request");
                let response = self
                    .client
                    .get(&final_url)
                    .send()
                    .await
                    .map_err(PubMedError::from)?;

                // Server errors and rate-limit rejections are retryable
                if response.status().is_server_error() || response.status().as_u16() == 429 {
                    return Err(PubMedError::ApiError {
                        status: response.status().as_u16(),
                        message: response
                            .status()
                            .canonical_reason()
                            .unwrap_or("Unknown error")
                            .to_string(),
                    });
                }

                Ok(response)
            },
            &self.config.retry,
            "NCBI API request",
        )
        .await?;

        if !response.status().is_success() {
            warn!("API request failed with status: {}", response.status());
            return Err(PubMedError::ApiError {
                status: response.status().as_u16(),
                message: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            });
        }

        Ok(response)
    }
}

impl Default for PubMedClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the `pubmed` database count from an EGQuery XML response
pub(crate) fn parse_egquery_pubmed_count(xml: &str) -> Result<u64> {
    let mut reader = Reader::from_reader(BufReader::new(xml.as_bytes()));
    reader.config_mut().trim_text(true);

    let mut in_result_item = false;
    let mut in_db_name = false;
    let mut in_count = false;
    let mut current_db = String::new();
    let mut current_count = String::new();
    let mut total: u64 = 0;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"ResultItem" => {
                    in_result_item = true;
                    current_db.clear();
                    current_count.clear();
                }
                b"DbName" if in_result_item => in_db_name = true,
                b"Count" if in_result_item => in_count = true,
                _ => {}
            },
            Ok(Event::Text(ref t)) => {
                let text = t.unescape().map_err(|e| PubMedError::XmlError(e.to_string()))?;
                if in_db_name {
                    current_db.push_str(&text);
                } else if in_count {
                    current_count.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"ResultItem" => {
                    if current_db == "pubmed" {
                        total += current_count.parse::<u64>().unwrap_or(0);
                    }
                    in_result_item = false;
                }
                b"DbName" => in_db_name = false,
                b"Count" => in_count = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(PubMedError::XmlError(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(total)
}
