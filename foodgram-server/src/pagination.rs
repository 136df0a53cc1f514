use foodgram::basic_models::Page;
use serde::Deserialize;

use crate::errors::{WebError, WebResult};

/// Page-number pagination, with the page size overridable through `limit`.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Slice out the requested page and convert only the items on it.
///
/// `query` is the request's raw query string; `next` and `previous` keep every parameter in
/// it except `page`. Asking for a page past the end is a 404, except that an empty collection
/// still has a (blank) first page.
pub fn paginate<T, U>(
    items: Vec<T>,
    params: PageParams,
    default_size: usize,
    query: Option<&str>,
    convert: impl FnMut(T) -> WebResult<U>,
) -> WebResult<Page<U>> {
    let size = params.limit.filter(|l| *l > 0).unwrap_or(default_size).max(1);
    let page = params.page.unwrap_or(1);
    let count = items.len();
    let pages = count.div_ceil(size).max(1);
    if page == 0 || page > pages {
        return Err(WebError::NotFound);
    }
    let results = items
        .into_iter()
        .skip((page - 1) * size)
        .take(size)
        .map(convert)
        .collect::<WebResult<Vec<_>>>()?;
    let link = |target: usize| {
        let mut pairs = query
            .unwrap_or_default()
            .split('&')
            .filter(|pair| !pair.is_empty() && !pair.starts_with("page="))
            .map(str::to_string)
            .collect::<Vec<_>>();
        pairs.push(format!("page={target}"));
        format!("?{}", pairs.join("&"))
    };
    Ok(Page {
        count,
        next: (page < pages).then(|| link(page + 1)),
        previous: (page > 1).then(|| link(page - 1)),
        results,
    })
}
