//! # Cursor Pagination
//!
//! Sentry paginates list endpoints with a `Link` header:
//!
//! ```text
//! <https://sentry.io/api/0/organizations/acme/teams/?&cursor=100:-1:1>; rel="previous"; results="false"; cursor="100:-1:1",
//! <https://sentry.io/api/0/organizations/acme/teams/?&cursor=100:1:0>; rel="next"; results="true"; cursor="100:1:0"
//! ```
//!
//! A following page exists only when the `next` link reports `results="true"`.

use futures::stream::{self, Stream};
use std::future::Future;

/// One entry of a `Link` header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLink {
    pub url: String,
    pub cursor: String,
    pub results: bool,
}

/// Parsed `Link` header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub previous: Option<PageLink>,
    pub next: Option<PageLink>,
}

impl PageLinks {
    /// Parse a `Link` header value; malformed entries are skipped
    pub fn parse(header: &str) -> Self {
        let mut links = PageLinks::default();

        for entry in header.split(',') {
            let mut segments = entry.split(';').map(str::trim);
            let Some(url) = segments.next() else {
                continue;
            };
            let url = url.trim_start_matches('<').trim_end_matches('>').to_string();

            let mut rel = None;
            let mut link = PageLink {
                url,
                ..PageLink::default()
            };
            for segment in segments {
                let Some((key, value)) = segment.split_once('=') else {
                    continue;
                };
                let value = value.trim().trim_matches('"');
                match key.trim() {
                    "rel" => rel = Some(value.to_string()),
                    "results" => link.results = value.eq_ignore_ascii_case("true"),
                    "cursor" => link.cursor = value.to_string(),
                    _ => {}
                }
            }

            match rel.as_deref() {
                Some("next") => links.next = Some(link),
                Some("previous") => links.previous = Some(link),
                _ => {}
            }
        }

        links
    }

    /// Cursor of the next page, if there is one with results
    pub fn next_cursor(&self) -> Option<&str> {
        self.next
            .as_ref()
            .filter(|link| link.results && !link.cursor.is_empty())
            .map(|link| link.cursor.as_str())
    }
}

/// One page of a list call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor to fetch the following page with; `None` on the last page
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// A page with no following page
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }
}

/// Lazily walk a paginated collection
///
/// `fetch` is called with `None` for the first page and with the cursor of the
/// previous page afterwards. The stream ends after the first page without a
/// next cursor, or after the first error. Pages are only requested as the
/// stream is polled, so a consumer that stops early stops paging too.
pub fn pages<T, E, F, Fut>(mut fetch: F) -> impl Stream<Item = Result<Vec<T>, E>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    // Outer None: exhausted. Inner None: first page.
    stream::try_unfold(Some(None), move |cursor: Option<Option<String>>| {
        let request = cursor.map(&mut fetch);
        async move {
            match request {
                None => Ok(None),
                Some(request) => request
                    .await
                    .map(|page| Some((page.items, page.next_cursor.map(Some)))),
            }
        }
    })
}
