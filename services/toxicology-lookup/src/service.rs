//! Lookup Service
//!
//! One method per user action: each resolves identifiers from the store,
//! fetches the remote document and runs the extractor. Failures stay local
//! to the action that raised them.

use serde::Serialize;
use std::sync::Arc;
use toxref_models::{DossierExtraction, Match, PdfExtraction};
use toxref_utils::{AppConfig, ToxrefError, ToxrefResult};
use tracing::{info, warn};

use crate::cir_client::CirClient;
use crate::echa_client::EchaClient;
use crate::extraction::{scan_pages, scan_text};
use crate::highlight::highlight;
use crate::pdf_processor::PdfProcessor;
use crate::similarity::{suggest_keys, RankedCandidate};
use crate::store::Store;

pub const REPORT_NOTICE: &str = "No NOAEL or LD50 values found.";
pub const DOSSIER_NOTICE: &str = "No NOAEL or LD50 values found for ECHA.";

#[derive(Debug, Clone, Serialize)]
pub struct ReportLink {
    pub ingredient: String,
    pub identifier: String,
    pub pdf_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DossierLink {
    pub key: String,
    pub identifier: String,
    pub dossier_url: String,
}

#[derive(Clone)]
pub struct LookupService {
    store: Arc<Store>,
    cir: CirClient,
    echa: EchaClient,
    pdf_processor: Arc<PdfProcessor>,
}

impl LookupService {
    pub fn new(store: Arc<Store>, cir: CirClient, echa: EchaClient) -> Self {
        Self {
            store,
            cir,
            echa,
            pdf_processor: Arc::new(PdfProcessor::new()),
        }
    }

    pub fn from_config(store: Arc<Store>, config: &AppConfig) -> ToxrefResult<Self> {
        let cir = CirClient::new(&config.cir, &config.http)?;
        let echa = EchaClient::new(&config.echa, &config.http)?;
        Ok(Self::new(store, cir, echa))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Ingredient names in index order, optionally filtered by a
    /// case-insensitive substring.
    pub fn list_ingredients(&self, query: Option<&str>) -> Vec<String> {
        let needle = query.map(str::to_lowercase).filter(|q| !q.is_empty());
        self.store
            .ingredients
            .names()
            .filter(|name| match &needle {
                Some(needle) => name.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .map(str::to_string)
            .collect()
    }

    pub async fn report_link(&self, ingredient: &str) -> ToxrefResult<ReportLink> {
        let identifier = self.store.ingredients.identifier(ingredient).ok_or_else(|| {
            warn!(ingredient, "Ingredient not found");
            ToxrefError::not_found(format!("ingredient '{}'", ingredient))
        })?;

        let pdf_url = self.cir.resolve_pdf_link(identifier).await?;
        Ok(ReportLink {
            ingredient: ingredient.to_string(),
            identifier: identifier.to_string(),
            pdf_url,
        })
    }

    /// Downloads the ingredient's CIR report and extracts NOAEL and LD50
    /// mentions from every page with text.
    pub async fn extract_report(&self, ingredient: &str) -> ToxrefResult<PdfExtraction> {
        let link = self.report_link(ingredient).await?;
        info!(ingredient, pdf_url = %link.pdf_url, "Extracting values from CIR report");

        let bytes = self.cir.fetch_pdf(&link.pdf_url).await?;
        let processor = Arc::clone(&self.pdf_processor);
        let pages = tokio::task::spawn_blocking(move || processor.extract_pages(&bytes))
            .await
            .map_err(|e| ToxrefError::internal(format!("PDF extraction task failed: {}", e)))??;

        let scan = scan_pages(&pages.pages);
        info!(
            ingredient,
            pages = pages.pages.len(),
            noael = scan.noael.len(),
            ld50 = scan.ld50.len(),
            "CIR report scanned"
        );

        let notice = scan.is_empty().then(|| REPORT_NOTICE.to_string());
        Ok(PdfExtraction {
            ingredient: link.ingredient,
            pdf_url: link.pdf_url,
            noael: scan.noael,
            ld50: scan.ld50,
            page_issues: pages.issues,
            notice,
        })
    }

    /// Cross-reference keys resembling the ingredient name, best first.
    pub fn echa_candidates(&self, ingredient: &str) -> Vec<RankedCandidate> {
        suggest_keys(self.store.cross_reference.tree(), ingredient)
    }

    pub fn dossier_link(&self, key: &str) -> ToxrefResult<DossierLink> {
        let identifier = self.store.cross_reference.identifier(key).ok_or_else(|| {
            warn!(key, "ECHA identifier not found");
            ToxrefError::not_found(format!("ECHA substance '{}'", key))
        })?;

        Ok(DossierLink {
            key: key.to_string(),
            dossier_url: self.echa.dossier_url(&identifier),
            identifier,
        })
    }

    /// Fetches the ECHA dossier for `key` and extracts NOAEL, LD50 and DNEL
    /// mentions from its text.
    pub async fn extract_dossier(&self, key: &str) -> ToxrefResult<DossierExtraction> {
        let link = self.dossier_link(key)?;
        info!(key, dossier_url = %link.dossier_url, "Extracting values from ECHA dossier");

        let page = self.echa.fetch_dossier_text(&link.dossier_url).await?;
        let upstream_status = page.failed_status();
        let scan = scan_text(&page.text);
        info!(
            key,
            status = page.status,
            noael = scan.noael.len(),
            ld50 = scan.ld50.len(),
            dnel = scan.dnel.len(),
            "ECHA dossier scanned"
        );

        let empty = scan.noael.is_empty() && scan.ld50.is_empty();
        let notice = match (upstream_status, empty) {
            (Some(status), true) => Some(format!(
                "ECHA dossier page returned status {}. {}",
                status, DOSSIER_NOTICE
            )),
            (Some(status), false) => Some(format!("ECHA dossier page returned status {}.", status)),
            (None, true) => Some(DOSSIER_NOTICE.to_string()),
            (None, false) => None,
        };
        Ok(DossierExtraction {
            key: link.key,
            dossier_url: link.dossier_url,
            noael: highlight_all(scan.noael),
            ld50: highlight_all(scan.ld50),
            dnel: highlight_all(scan.dnel),
            upstream_status,
            notice,
        })
    }
}

fn highlight_all(snippets: Vec<String>) -> Vec<Match> {
    snippets
        .iter()
        .map(|snippet| Match {
            snippet: highlight(snippet),
            page: None,
        })
        .collect()
}
