//! Lazy single-pass sequences of API records.

use super::GitHubError;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Records buffered between a producer task and its consumer.
pub(crate) const CHANNEL_CAPACITY: usize = 100;

/// A lazy sequence of records fed by a producer task.
///
/// A failure is delivered as the final element; the producer stops after
/// sending it, so everything received before it is still usable.
pub struct Items<T> {
    rx: mpsc::Receiver<Result<T, GitHubError>>,
}

impl<T> Items<T> {
    pub(crate) fn new(rx: mpsc::Receiver<Result<T, GitHubError>>) -> Self {
        Self { rx }
    }

    /// Creates a finished sequence over `items`.
    #[must_use]
    pub fn from_vec(items: Vec<T>) -> Self {
        Self::prefilled(items.into_iter().map(Ok).collect())
    }

    /// Creates a sequence whose only element is `error`.
    #[must_use]
    pub fn from_error(error: GitHubError) -> Self {
        Self::prefilled(vec![Err(error)])
    }

    fn prefilled(elements: Vec<Result<T, GitHubError>>) -> Self {
        let (tx, rx) = mpsc::channel(elements.len().max(1));
        for element in elements {
            // Capacity matches the element count, so this never fails.
            let _ = tx.try_send(element);
        }
        Self { rx }
    }

    /// Waits for the next record.
    ///
    /// Returns `None` once the sequence is exhausted.
    pub async fn next(&mut self) -> Option<Result<T, GitHubError>> {
        self.rx.recv().await
    }

    /// Drains the sequence into a vector.
    ///
    /// # Errors
    ///
    /// Returns the terminal error if the producer failed.
    pub async fn collect_all(mut self) -> Result<Vec<T>, GitHubError> {
        let mut all = Vec::new();
        while let Some(item) = self.next().await {
            all.push(item?);
        }
        Ok(all)
    }
}

impl<T> Stream for Items<T> {
    type Item = Result<T, GitHubError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_from_vec_yields_in_order() {
        let items = Items::from_vec(vec![1, 2, 3]);

        assert_eq!(items.collect_all().await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_error_is_terminal_element() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(Ok(1)).await.unwrap();
        tx.send(Err(GitHubError::Transport("boom".to_string())))
            .await
            .unwrap();
        drop(tx);

        let mut items = Items::new(rx);
        assert_eq!(items.next().await.unwrap().unwrap(), 1);
        assert!(items.next().await.unwrap().is_err());
        assert!(items.next().await.is_none());
    }

    #[tokio::test]
    async fn test_stream_adapter() {
        let items = Items::from_vec(vec!["a", "b"]);

        let collected: Vec<_> = items.map(Result::unwrap).collect().await;
        assert_eq!(collected, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_collect_all_surfaces_error() {
        let items: Items<u32> = Items::from_error(GitHubError::Transport("down".to_string()));

        assert!(items.collect_all().await.is_err());
    }
}
