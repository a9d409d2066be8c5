//! Pagination accumulator: drives the executor across pages and merges
//! the results.

use serde::de::DeserializeOwned;

use crate::endpoint::PagedAction;
use crate::Result;

use super::context::ExecutionContext;

/// Fetch a paginated action to completion, accumulating every page's
/// items in order.
///
/// With recursion enabled the cursor is reset first, so accumulation
/// always starts from page 1 regardless of state left by earlier calls,
/// and fetching continues while each response's continuation carries a
/// `next` relation. With recursion disabled exactly one fetch occurs at
/// the current cursor.
///
/// Any fetch error aborts the whole accumulation; items from earlier
/// pages are discarded, not returned.
pub(crate) async fn fetch_all<T: DeserializeOwned>(
    ctx: &mut ExecutionContext,
    action: &PagedAction<T>,
) -> Result<Vec<T>> {
    if ctx.recurse() {
        ctx.reset_pagination();
    }

    let mut items = Vec::new();

    loop {
        let page = ctx.current_page();
        let per_page = ctx.page_size();
        let (page_items, links) = ctx.execute_page(action, page, per_page).await?;

        tracing::debug!(
            page = ctx.current_page(),
            count = page_items.len(),
            has_next = links.as_ref().is_some_and(|l| l.has_next()),
            "accumulated page"
        );

        items.extend(page_items);

        let continue_fetching =
            ctx.recurse() && links.as_ref().is_some_and(|links| links.has_next());
        if !continue_fetching {
            break;
        }

        ctx.advance_page();
    }

    Ok(items)
}
