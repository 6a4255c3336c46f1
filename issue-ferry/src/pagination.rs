//! Lazy pagination over list endpoints.
//!
//! GitHub list endpoints hand back fixed-size pages. [`paged`] turns a
//! page-fetching closure into a flat stream of items, so callers iterate
//! issues or comments without tracking page numbers themselves.

use futures::stream::{self, Stream, TryStreamExt};
use std::future::Future;

/// First page number requested from the API.
const FIRST_PAGE: u32 = 1;

/// Streams every item from a paged endpoint, first page first.
///
/// Fetches page 1, 2, ... until `fetch_page` returns an empty page, and
/// yields the items of each page in order. The stream is single-pass;
/// every call starts fresh from page 1. Termination relies on the
/// endpoint eventually returning an empty page.
///
/// The first error from `fetch_page` ends the stream after being yielded.
pub fn paged<T, E, F, Fut>(mut fetch_page: F) -> impl Stream<Item = Result<T, E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    stream::try_unfold(FIRST_PAGE, move |page| {
        let fetched = fetch_page(page);
        async move {
            let items = fetched.await?;
            if items.is_empty() {
                Ok(None)
            } else {
                Ok(Some((stream::iter(items.into_iter().map(Ok)), page + 1)))
            }
        }
    })
    .try_flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::convert::Infallible;

    /// One page of `items` at the given page size; pages past the end are
    /// empty.
    fn chunk(items: &[u32], page_size: usize, page: u32) -> Vec<u32> {
        items
            .chunks(page_size)
            .nth((page - 1) as usize)
            .map(|c| c.to_vec())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn yields_items_in_order_across_pages() {
        let items: Vec<u32> = (1..=5).collect();

        let collected: Vec<u32> = paged(|page| {
            std::future::ready(Ok::<_, Infallible>(chunk(&items, 2, page)))
        })
        .try_collect()
        .await
        .unwrap();

        assert_eq!(collected, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn stops_after_first_empty_page() {
        // 5 items at page size 2 costs ceil(5/2) + 1 = 4 fetches.
        let items: Vec<u32> = (1..=5).collect();
        let fetches = Cell::new(0u32);

        let _: Vec<u32> = paged(|page| {
            fetches.set(fetches.get() + 1);
            std::future::ready(Ok::<_, Infallible>(chunk(&items, 2, page)))
        })
        .try_collect()
        .await
        .unwrap();

        assert_eq!(fetches.get(), 4);
    }

    #[tokio::test]
    async fn exact_page_boundary_costs_one_extra_fetch() {
        let items: Vec<u32> = (1..=4).collect();
        let fetches = Cell::new(0u32);

        let collected: Vec<u32> = paged(|page| {
            fetches.set(fetches.get() + 1);
            std::future::ready(Ok::<_, Infallible>(chunk(&items, 2, page)))
        })
        .try_collect()
        .await
        .unwrap();

        assert_eq!(collected.len(), 4);
        assert_eq!(fetches.get(), 3);
    }

    #[tokio::test]
    async fn empty_collection_is_a_single_fetch() {
        let fetches = Cell::new(0u32);

        let collected: Vec<u32> = paged(|page| {
            fetches.set(fetches.get() + 1);
            std::future::ready(Ok::<_, Infallible>(chunk(&[], 2, page)))
        })
        .try_collect()
        .await
        .unwrap();

        assert!(collected.is_empty());
        assert_eq!(fetches.get(), 1);
    }

    #[tokio::test]
    async fn fetch_errors_propagate() {
        let result: Result<Vec<u32>, &str> = paged(|page| {
            std::future::ready(if page == 1 { Ok(vec![1, 2]) } else { Err("boom") })
        })
        .try_collect()
        .await;

        assert_eq!(result, Err("boom"));
    }
}
