use futures::{Stream, StreamExt};
use tracing::{info, warn};

use crate::domain::{BatchError, Error, PostingError, PostingStore, WriteOffRequest};
use crate::poster::{PostingResult, WriteOffPoster};

/// Posts an ordered list of requests one after another.
///
/// Each item goes through the full single-posting pipeline, re-reading the
/// vendor when its turn comes, so later items see the debits of earlier ones.
/// Failures stay in their own slot. Successful items are never rolled back.
#[derive(Debug)]
pub struct BatchPoster<S: PostingStore> {
    poster: WriteOffPoster<S>,
}

impl<S: PostingStore> BatchPoster<S> {
    pub fn new(poster: WriteOffPoster<S>) -> Self {
        Self { poster }
    }

    pub fn poster(&self) -> &WriteOffPoster<S> {
        &self.poster
    }

    /// One result per request, in request order.
    pub async fn post_batch(
        &self,
        items: &[WriteOffRequest],
    ) -> Result<Vec<PostingResult>, BatchError> {
        if items.is_empty() {
            return Err(BatchError::EmptyBatch);
        }

        let mut results = Vec::with_capacity(items.len());
        for item in items {
            results.push(self.poster.post(item).await);
        }
        summarize(&results);
        Ok(results)
    }

    /// Like [`post_batch`](Self::post_batch) for requests that are still being
    /// read. An item the source failed to produce becomes a validation failure
    /// in its slot.
    pub async fn post_stream<St>(&self, mut items: St) -> Result<Vec<PostingResult>, BatchError>
    where
        St: Stream<Item = Result<WriteOffRequest, Error>> + Unpin,
    {
        let mut results = Vec::new();
        while let Some(item) = items.next().await {
            let result = match item {
                Ok(request) => self.poster.post(&request).await,
                Err(e) => {
                    warn!(item = results.len() + 1, error = %e, "unreadable batch item");
                    Err(PostingError::Validation(e.to_string()))
                }
            };
            results.push(result);
        }

        if results.is_empty() {
            return Err(BatchError::EmptyBatch);
        }
        summarize(&results);
        Ok(results)
    }
}

fn summarize(results: &[PostingResult]) {
    let posted = results.iter().filter(|r| r.is_ok()).count();
    info!(
        items = results.len(),
        posted,
        failed = results.len() - posted,
        "batch processed"
    );
}
