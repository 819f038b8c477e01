//! Category discovery from the catalogue root's navigation sidebar.
//!
//! ```html
//! <div class="side_categories">
//!   <ul class="nav nav-list">
//!     <li><a href="catalogue/category/books_1/index.html">Books</a>
//!       <ul>
//!         <li><a href="catalogue/category/books/travel_2/index.html">Travel</a></li>
//!         <li><a href="catalogue/category/books/mystery_3/index.html">Mystery</a></li>
//!       </ul>
//!     </li>
//!   </ul>
//! </div>
//! ```
//!
//! Only the nested links are categories; the outer "Books" entry is the
//! whole catalogue under another name.

use std::collections::HashSet;
use std::sync::LazyLock;

use reqwest::Url;
use scraper::{Html, Selector};

use crate::error::FetchError;
use crate::extract::canonical_url;
use crate::fetch::PageFetcher;

static CATEGORY_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.side_categories ul li ul li a[href]").expect("valid category selector")
});

/// Path of the first page of the unfiltered catalogue listing, relative to
/// the root.
pub const FULL_CATALOGUE_PATH: &str = "catalogue/page-1.html";

/// Fetches the root page and returns its category URLs in sidebar order.
///
/// # Errors
///
/// Returns [`FetchError`] if the root page cannot be fetched.
pub async fn discover_categories(
    fetcher: &PageFetcher,
    root: &Url,
) -> Result<Vec<Url>, FetchError> {
    let body = fetcher.fetch_html(root).await?;
    let categories = parse_category_links(&body, root);
    tracing::info!(root = %root, categories = categories.len(), "discovered categories");
    Ok(categories)
}

/// Extracts category links from the sidebar, resolved against `root`.
///
/// Links that resolve to the root itself and repeated links are dropped;
/// the first occurrence keeps its position.
#[must_use]
pub fn parse_category_links(body: &str, root: &Url) -> Vec<Url> {
    let document = Html::parse_document(body);
    let mut seen: HashSet<Url> = HashSet::new();

    document
        .select(&CATEGORY_LINK)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty() && !href.starts_with('#'))
        .filter_map(|href| canonical_url(root, href))
        .filter(|url| !is_root(url, root))
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Appends the full catalogue listing to the discovered categories when
/// `include_full_catalogue` is set.
///
/// The full listing re-visits every product already reached through its
/// category; the collector discards the repeats. It still guarantees
/// coverage when the sidebar is incomplete.
#[must_use]
pub fn crawl_targets(categories: Vec<Url>, root: &Url, include_full_catalogue: bool) -> Vec<Url> {
    let mut targets = categories;
    if include_full_catalogue {
        match root.join(FULL_CATALOGUE_PATH) {
            Ok(full) if !targets.contains(&full) => targets.push(full),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(root = %root, error = %e, "could not build full catalogue URL");
            }
        }
    }
    targets
}

/// `true` for the root URL and its `index.html` alias.
fn is_root(url: &Url, root: &Url) -> bool {
    if url == root {
        return true;
    }
    root.join("index.html").is_ok_and(|index| *url == index)
}
