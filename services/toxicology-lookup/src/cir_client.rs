//! CIR Report Client
//!
//! Resolves an ingredient's report PDF from its CIR status page and
//! downloads it.

use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use toxref_utils::{CirConfig, HttpConfig, ToxrefError, ToxrefResult};
use tracing::debug;

use crate::http::build_client;

#[derive(Clone)]
pub struct CirClient {
    client: Client,
    base_url: String,
    report_status_path: String,
}

impl CirClient {
    pub fn new(config: &CirConfig, http: &HttpConfig) -> ToxrefResult<Self> {
        Ok(Self {
            client: build_client(http)?,
            base_url: config.base_url.clone(),
            report_status_path: config.report_status_path.clone(),
        })
    }

    pub fn report_status_url(&self, identifier: &str) -> String {
        format!("{}{}{}", self.base_url, self.report_status_path, identifier)
    }

    /// Finds the report PDF linked from the ingredient's status page.
    pub async fn resolve_pdf_link(&self, identifier: &str) -> ToxrefResult<String> {
        let url = self.report_status_url(identifier);
        debug!(%url, "Fetching CIR status page");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ToxrefError::upstream_status(url, response.status().as_u16()));
        }
        let html = response.text().await?;

        parse_pdf_link(&html, &self.base_url)
    }

    /// Downloads the report. Anything but 200 OK is an error.
    pub async fn fetch_pdf(&self, url: &str) -> ToxrefResult<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(ToxrefError::upstream_status(url, response.status().as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Takes the first link inside the first table of a status page and
/// resolves it against `base_url`, dropping every `../` segment.
pub fn parse_pdf_link(html: &str, base_url: &str) -> ToxrefResult<String> {
    let document = Html::parse_document(html);
    let table_selector = selector("table")?;
    let link_selector = selector("a[href]")?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| ToxrefError::document_processing("Status page contains no report table"))?;
    let href = table
        .select(&link_selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .ok_or_else(|| ToxrefError::document_processing("Report table contains no link"))?;

    if href.starts_with("http://") || href.starts_with("https://") {
        return Ok(href.to_string());
    }
    Ok(format!("{}{}", base_url, href.replace("../", "")))
}

fn selector(css: &str) -> ToxrefResult<Selector> {
    Selector::parse(css).map_err(|e| ToxrefError::internal(format!("Invalid selector {}: {:?}", css, e)))
}
