//! Lazy pagination over page-based listings.

use super::{ApiError, Page};
use futures::stream::{self, Stream, TryStreamExt};
use std::future::Future;

/// Turns a page fetcher into a stream of page contents.
///
/// Pages are requested on demand starting at page 1, and the stream ends
/// after the page whose `next_page` is `None`. Dropping the stream stops
/// fetching, which is how callers terminate early.
pub fn pages<'a, T, F, Fut>(fetch: F) -> impl Stream<Item = Result<Vec<T>, ApiError>> + 'a
where
    T: 'a,
    F: FnMut(u32) -> Fut + 'a,
    Fut: Future<Output = Result<Page<T>, ApiError>> + 'a,
{
    stream::try_unfold((fetch, Some(1u32)), |(mut fetch, next)| async move {
        let Some(number) = next else {
            return Ok(None);
        };
        let page = fetch(number).await?;
        Ok::<_, ApiError>(Some((page.items, (fetch, page.next_page))))
    })
}

/// Fetches every page and concatenates the items.
///
/// # Errors
///
/// Returns the first page error; items from earlier pages are discarded.
pub async fn collect_pages<'a, T, F, Fut>(fetch: F) -> Result<Vec<T>, ApiError>
where
    T: 'a,
    F: FnMut(u32) -> Fut + 'a,
    Fut: Future<Output = Result<Page<T>, ApiError>> + 'a,
{
    pages(fetch).try_concat().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::cell::RefCell;
    use std::pin::pin;

    fn numbered_pages(count: u32) -> impl FnMut(u32) -> std::future::Ready<Result<Page<u32>, ApiError>> {
        move |number| {
            let next_page = (number < count).then_some(number + 1);
            std::future::ready(Ok(Page {
                items: vec![number * 10, number * 10 + 1],
                next_page,
            }))
        }
    }

    #[tokio::test]
    async fn collects_all_pages_in_order() {
        let items = collect_pages(numbered_pages(3)).await.unwrap();
        assert_eq!(items, vec![10, 11, 20, 21, 30, 31]);
    }

    #[tokio::test]
    async fn fetches_pages_on_demand() {
        let requested = RefCell::new(Vec::new());
        let mut fetch = numbered_pages(5);
        let mut stream = pin!(pages(|number| {
            requested.borrow_mut().push(number);
            fetch(number)
        }));

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first, vec![10, 11]);
        assert_eq!(*requested.borrow(), vec![1]);
    }

    #[tokio::test]
    async fn surfaces_page_errors() {
        let result = collect_pages(|number| {
            std::future::ready(if number == 1 {
                Ok(Page {
                    items: vec![1],
                    next_page: Some(2),
                })
            } else {
                Err(ApiError::UnexpectedResponse {
                    route: "page 2".to_string(),
                    message: "boom".to_string(),
                })
            })
        })
        .await;

        assert!(result.is_err());
    }
}
