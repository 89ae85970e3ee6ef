//! ECHA Dossier Client
//!
//! Fetches registration dossier pages and flattens them to visible text.

use reqwest::Client;
use scraper::Html;
use toxref_utils::{EchaConfig, HttpConfig, ToxrefResult};
use tracing::{debug, warn};

use crate::http::build_client;

/// Elements whose text never renders.
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

#[derive(Clone)]
pub struct EchaClient {
    client: Client,
    dossier_base_url: String,
    dossier_suffix: String,
}

impl EchaClient {
    pub fn new(config: &EchaConfig, http: &HttpConfig) -> ToxrefResult<Self> {
        Ok(Self {
            client: build_client(http)?,
            dossier_base_url: config.dossier_base_url.clone(),
            dossier_suffix: config.dossier_suffix.clone(),
        })
    }

    pub fn dossier_url(&self, identifier: &str) -> String {
        format!("{}{}{}", self.dossier_base_url, identifier, self.dossier_suffix)
    }

    /// Fetches a dossier page and flattens it to visible text.
    ///
    /// Error pages are scanned like any other page and carry their status;
    /// only transport failures are errors.
    pub async fn fetch_dossier_text(&self, url: &str) -> ToxrefResult<DossierPage> {
        debug!(%url, "Fetching ECHA dossier");
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            warn!(%url, status, "Dossier page returned non-success status");
        }
        let html = response.text().await?;
        Ok(DossierPage {
            status,
            text: visible_text(&html),
        })
    }
}

/// A fetched dossier page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DossierPage {
    pub status: u16,
    pub text: String,
}

impl DossierPage {
    /// The status code, when it was not a 2xx.
    pub fn failed_status(&self) -> Option<u16> {
        (!(200..300).contains(&self.status)).then_some(self.status)
    }
}

/// Concatenates every text node in document order, skipping script-like
/// elements. No separators are inserted between nodes.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::new();

    for node in document.tree.root().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map_or(false, |element| HIDDEN_ELEMENTS.contains(&element.name()))
        });
        if !hidden {
            text.push_str(fragment);
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_dossier_url_template() {
        let client = EchaClient::new(&EchaConfig::default(), &HttpConfig::default()).unwrap();
        assert_eq!(
            client.dossier_url("14481"),
            "https://echa.europa.eu/it/registration-dossier/-/registered-dossier/14481/7/1"
        );
    }

    #[test]
    fn test_visible_text_skips_scripts_and_styles() {
        let html = r#"<html><head><title>Glycerol</title>
            <style>.x { color: red }</style>
            <script>var noael = "NOAEL 5 mg/kg.";</script></head>
            <body><h1>Toxicity</h1><p>NOAEL: <b>10</b> mg/kg bw/day.</p></body></html>"#;

        let text = visible_text(html);
        assert!(text.contains("Glycerol"));
        assert!(text.contains("Toxicity"));
        assert!(text.contains("NOAEL: 10 mg/kg bw/day."));
        assert!(!text.contains("color"));
        assert!(!text.contains("var noael"));
    }

    #[tokio::test]
    async fn test_fetch_dossier_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dossier/14481/7/1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body><p>DNEL for workers: 5 mg/kg.</p></body></html>"),
            )
            .mount(&server)
            .await;

        let config = EchaConfig {
            dossier_base_url: format!("{}/dossier/", server.uri()),
            ..EchaConfig::default()
        };
        let client = EchaClient::new(&config, &HttpConfig::default()).unwrap();
        let url = client.dossier_url("14481");

        let page = client.fetch_dossier_text(&url).await.unwrap();
        assert_eq!(page.text, "DNEL for workers: 5 mg/kg.");
        assert_eq!(page.failed_status(), None);
    }

    #[tokio::test]
    async fn test_error_page_keeps_its_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string("<html><body><h1>Page not found</h1></body></html>"),
            )
            .mount(&server)
            .await;

        let config = EchaConfig {
            dossier_base_url: format!("{}/dossier/", server.uri()),
            ..EchaConfig::default()
        };
        let client = EchaClient::new(&config, &HttpConfig::default()).unwrap();

        let page = client.fetch_dossier_text(&client.dossier_url("1")).await.unwrap();
        assert_eq!(page.status, 404);
        assert_eq!(page.failed_status(), Some(404));
        assert_eq!(page.text, "Page not found");
    }
}
