//! Documentation crawling and snippet harvesting.

pub mod crawl;
pub mod extract;
pub mod output;
pub mod page;
pub mod parser;
pub mod report;

use page::{PageBuild, PageRejection};

/// Parses one pre-fetched reference page into snippet records without
/// touching the network.
pub fn parse_page(url: &str, product: &str, html: &str) -> Result<PageBuild, PageRejection> {
    let document = extract::extract_page(url, product, html);
    page::build_page_records(&document)
}
