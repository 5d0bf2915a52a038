//! Page-by-page collection for list endpoints

use super::types::Page;
use crate::error::RcaResult;
use std::future::Future;
use tracing::debug;

/// Fetch pages starting at 1 until `total` items are collected.
///
/// An empty page also ends the walk so a store that under-reports `total`
/// cannot loop forever.
pub async fn collect_pages<T, F, Fut>(mut fetch: F) -> RcaResult<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = RcaResult<Page<T>>>,
{
    let mut items = Vec::new();
    let mut page = 1;

    loop {
        let data = fetch(page).await?;
        let fetched = data.items.len();
        items.extend(data.items);
        debug!(
            "fetched page {}, fetched items {}, total items {}",
            page,
            items.len(),
            data.total
        );
        if fetched == 0 || items.len() >= data.total {
            break;
        }
        page += 1;
    }

    Ok(items)
}
