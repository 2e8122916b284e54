//! Container size calculation

use futures::TryStreamExt;

use crate::blob::listing::PageStream;
use crate::blob::models::BlobEntry;
use crate::error::Result;

/// Sum the content lengths of every blob across every page.
///
/// Pages are consumed in arrival order. If any page fails the running sum
/// is dropped and only the error is returned.
pub async fn container_size(mut pages: PageStream<BlobEntry>) -> Result<u64> {
    let mut total: u64 = 0;

    while let Some(page) = pages.try_next().await? {
        total += page
            .items
            .iter()
            .map(|blob| blob.content_length)
            .sum::<u64>();
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::models::Page;
    use crate::error::BlobsizeError;
    use futures::stream::{self, StreamExt};

    fn pages(lengths: Vec<Vec<u64>>) -> PageStream<BlobEntry> {
        let count = lengths.len();
        let pages: Vec<Result<Page<BlobEntry>>> = lengths
            .into_iter()
            .enumerate()
            .map(|(i, page)| {
                let entries = page
                    .into_iter()
                    .enumerate()
                    .map(|(j, len)| BlobEntry::new(format!("blob-{i}-{j}"), len))
                    .collect();
                Ok(Page::new(entries, i + 1 < count))
            })
            .collect();
        stream::iter(pages).boxed()
    }

    #[tokio::test]
    async fn test_sum_is_independent_of_page_boundaries() {
        let lengths = vec![5u64, 0, 17, 1024, 3, 99, 1];
        let expected: u64 = lengths.iter().sum();

        for page_size in 1..=lengths.len() {
            let split: Vec<Vec<u64>> = lengths.chunks(page_size).map(|c| c.to_vec()).collect();
            assert_eq!(container_size(pages(split)).await.unwrap(), expected);
        }
    }

    #[tokio::test]
    async fn test_empty_pages() {
        assert_eq!(container_size(pages(vec![])).await.unwrap(), 0);
        assert_eq!(container_size(pages(vec![vec![], vec![]])).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failure_discards_partial_sum() {
        let items: Vec<Result<Page<BlobEntry>>> = vec![
            Ok(Page::new(vec![BlobEntry::new("a", 100)], true)),
            Err(BlobsizeError::listing("connection reset")),
            Ok(Page::last(vec![BlobEntry::new("b", 1)])),
        ];

        let result = container_size(stream::iter(items).boxed()).await;
        assert!(matches!(result, Err(BlobsizeError::ListingError(_))));
    }
}
