//! Streaming helpers for walking the cabinet's paginated listings.

use async_stream::try_stream;
use futures_core::Stream;

use super::client::CabinetApi;
use super::types::{CabinetError, Document, DocumentsPage, Session};

/// Page size used when the configuration supplies no override.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Stream every document in a cabinet by following continuation links until exhausted.
///
/// The walk is an explicit loop over the `next` cursor rather than a recursive descent, so a
/// backend that keeps handing out continuation links cannot grow the call stack. Documents are
/// yielded in backend page order; any page failure terminates the stream with the error.
pub fn stream_documents<'a, C>(
    cabinet: &'a C,
    session: &'a Session,
    cabinet_id: &'a str,
    page_size: usize,
) -> impl Stream<Item = Result<Document, CabinetError>> + 'a
where
    C: CabinetApi + ?Sized,
{
    try_stream! {
        let mut page = cabinet.fetch_first_page(session, cabinet_id, page_size).await?;

        loop {
            let DocumentsPage { items, next } = page;
            for document in items {
                yield document;
            }

            match next {
                Some(link) => page = cabinet.fetch_next_page(session, &link).await?,
                None => break,
            }
        }
    }
}
