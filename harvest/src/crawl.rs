//! Category-tree crawling and page fetch fan-out.
//!
//! The documentation site exposes a JSON listing of products, each
//! with a category tree whose leaves are reference pages. Pages are
//! fetched concurrently; every failure is local to its page, so one
//! bad fetch never aborts the siblings.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use helpdoc_snippets_core::SnippetRecord;

use crate::extract::extract_page;
use crate::page::build_page_records;
use crate::report::PageReport;

/// The site serves reduced markup to unknown agents.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/78.0.3879.0 Safari/537.36";

/// Crawl configuration.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Site origin, e.g. `https://www.mathworks.com`.
    pub origin: String,
    /// Documentation release tag, e.g. `R2020a`.
    pub doc_version: String,
    /// Product ids to accept; ignored when `all_products` is set.
    pub products: Vec<String>,
    /// Accept every product in the listing.
    pub all_products: bool,
    /// Maximum concurrent page fetches.
    pub concurrency: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            origin: "https://www.mathworks.com".to_string(),
            doc_version: "R2020a".to_string(),
            products: Vec::new(),
            all_products: false,
            concurrency: 16,
            timeout_secs: 10,
        }
    }
}

/// Transport-level crawl failures.
///
/// Only listing-level problems surface here; per-page failures are
/// folded into the run report instead.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid crawl url: {0}")]
    Url(#[from] url::ParseError),
}

/// Aggregated output of a full harvest run.
#[derive(Debug, Default)]
pub struct HarvestOutcome {
    /// Records in completion order; keys may repeat across fetches.
    pub records: Vec<(String, SnippetRecord)>,
    pub reports: Vec<PageReport>,
}

/// Product catalog listing.
#[derive(Debug, Deserialize)]
struct RefListResponse {
    #[serde(rename = "siblingCategories", default)]
    sibling_categories: Vec<CategoryRef>,
}

#[derive(Debug, Deserialize)]
struct CategoryRef {
    helpdir: String,
}

/// Per-product category tree.
#[derive(Debug, Deserialize)]
struct ProductResponse {
    category: CategoryNode,
}

/// A tree node is an inner category, a leaf list, or a leaf carrying
/// a page path.
#[derive(Debug, Deserialize)]
pub(crate) struct CategoryNode {
    #[serde(rename = "child-categories", default)]
    child_categories: Vec<CategoryNode>,
    #[serde(rename = "leaf-items", default)]
    leaf_items: Vec<CategoryNode>,
    #[serde(default)]
    path: Option<String>,
}

/// Depth-first collection of leaf page paths.
pub(crate) fn collect_leaf_paths(node: &CategoryNode, out: &mut Vec<String>) {
    if !node.child_categories.is_empty() {
        for child in &node.child_categories {
            collect_leaf_paths(child, out);
        }
    } else if !node.leaf_items.is_empty() {
        for leaf in &node.leaf_items {
            collect_leaf_paths(leaf, out);
        }
    } else if let Some(path) = &node.path {
        out.push(path.clone());
    } else {
        debug!("category leaf without a page path");
    }
}

/// Product id from a listing `helpdir`, e.g. `/help/matlab/` → `matlab`.
pub(crate) fn product_id(helpdir: &str) -> Option<&str> {
    let mut segments = helpdir.split('/').rev();
    segments.next();
    segments.next().filter(|segment| !segment.is_empty())
}

/// Crawls the configured products and harvests snippet records.
pub async fn harvest(config: &CrawlConfig) -> Result<HarvestOutcome, CrawlError> {
    let origin = Url::parse(&config.origin)?;
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    let reflist = format!(
        "{}/help/search/reflist/doccenter/en/{}",
        config.origin.trim_end_matches('/'),
        config.doc_version
    );
    let listing: RefListResponse = client
        .get(format!("{reflist}?type=function"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let mut page_urls: Vec<(String, String)> = Vec::new();
    for category in &listing.sibling_categories {
        let Some(product) = product_id(&category.helpdir) else {
            continue;
        };
        if !config.all_products && !config.products.iter().any(|accepted| accepted == product) {
            continue;
        }

        let product_url = format!("{reflist}?type=function&product={product}");
        let tree = match fetch_product_tree(&client, &product_url).await {
            Ok(tree) => tree,
            Err(err) => {
                // A broken product listing drops that product only.
                error!(product, %err, "product listing fetch failed");
                continue;
            }
        };

        let mut paths = Vec::new();
        collect_leaf_paths(&tree.category, &mut paths);
        debug!(product, pages = paths.len(), "collected reference pages");

        for path in paths {
            match origin.join(&path) {
                Ok(url) => page_urls.push((product.to_string(), url.to_string())),
                Err(err) => error!(product, %path, %err, "unusable page path"),
            }
        }
    }

    let login_prefix = format!("{}/login?uri=", config.origin.trim_end_matches('/'));
    let outcomes: Vec<(Vec<(String, SnippetRecord)>, Option<PageReport>)> =
        stream::iter(page_urls.into_iter().map(|(product, url)| {
            let client = client.clone();
            let login_prefix = login_prefix.clone();
            async move { process_page(&client, &product, &url, &login_prefix).await }
        }))
        .buffer_unordered(config.concurrency.max(1))
        .collect()
        .await;

    let mut outcome = HarvestOutcome::default();
    for (records, report) in outcomes {
        outcome.records.extend(records);
        outcome.reports.extend(report);
    }
    Ok(outcome)
}

async fn fetch_product_tree(client: &Client, url: &str) -> Result<ProductResponse, CrawlError> {
    let tree = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(tree)
}

/// Fetches and processes one reference page.
///
/// Returns no report for authentication-redirected pages: those are
/// expected and skipped silently.
async fn process_page(
    client: &Client,
    product: &str,
    url: &str,
    login_prefix: &str,
) -> (Vec<(String, SnippetRecord)>, Option<PageReport>) {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(err) => {
            error!(url, %err, "page fetch failed");
            return (Vec::new(), Some(PageReport::fetch_failed(url, err.to_string())));
        }
    };

    if response.url().as_str().starts_with(login_prefix) {
        return (Vec::new(), None);
    }

    let html = match response.text().await {
        Ok(html) => html,
        Err(err) => {
            error!(url, %err, "page body read failed");
            return (Vec::new(), Some(PageReport::fetch_failed(url, err.to_string())));
        }
    };

    let page = extract_page(url, product, &html);
    match build_page_records(&page) {
        Ok(build) => {
            let report = PageReport::accepted(url, build.records.len(), build.warnings);
            (build.records, Some(report))
        }
        Err(rejection) => {
            error!(url, %rejection, "page rejected");
            (Vec::new(), Some(PageReport::rejected(url, rejection.into())))
        }
    }
}
