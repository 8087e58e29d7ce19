//! One-to-many and many-to-one message delivery.

use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::debug;

/// Delivers every sent value to each live subscriber.
///
/// Subscribers get bounded receivers; a slow subscriber applies
/// backpressure to the sender. Dropped receivers are pruned on the next
/// send.
#[derive(Clone)]
pub struct FanOut<T> {
    subscribers: Arc<RwLock<Vec<mpsc::Sender<T>>>>,
    capacity: usize,
}

impl<T: Clone + Send + 'static> FanOut<T> {
    pub fn new() -> Self {
        Self::with_capacity(1000)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(Vec::new())),
            capacity,
        }
    }

    pub async fn subscribe(&self) -> mpsc::Receiver<T> {
        let (tx, rx) = mpsc::channel(self.capacity);
        self.subscribers.write().await.push(tx);
        rx
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Send `value` to every subscriber and return how many received it.
    pub async fn send(&self, value: T) -> usize {
        let subscribers = self.subscribers.read().await.clone();
        let mut delivered = 0;
        let mut closed = false;
        for tx in &subscribers {
            match tx.send(value.clone()).await {
                Ok(()) => delivered += 1,
                Err(_) => closed = true,
            }
        }

        if closed {
            let mut subscribers = self.subscribers.write().await;
            subscribers.retain(|tx| !tx.is_closed());
            debug!(remaining = subscribers.len(), "pruned closed subscribers");
        }
        delivered
    }
}

impl<T: Clone + Send + 'static> Default for FanOut<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Merges many sources into one output receiver.
///
/// The output closes once the `FanIn` handle is dropped and every added
/// source has been drained.
pub struct FanIn<T> {
    output: mpsc::Sender<T>,
}

impl<T: Send + 'static> FanIn<T> {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<T>) {
        let (output, rx) = mpsc::channel(capacity);
        (Self { output }, rx)
    }

    /// Forward every value of `source` into the output.
    pub fn add(&self, mut source: mpsc::Receiver<T>) -> JoinHandle<()> {
        let output = self.output.clone();
        tokio::spawn(async move {
            while let Some(value) = source.recv().await {
                if output.send(value).await.is_err() {
                    debug!("fan-in output closed, stopping source");
                    break;
                }
            }
        })
    }

    /// Sender feeding the output directly.
    pub fn sender(&self) -> mpsc::Sender<T> {
        self.output.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fan_out_delivers_to_every_subscriber() {
        let fan = FanOut::with_capacity(4);
        let mut a = fan.subscribe().await;
        let mut b = fan.subscribe().await;

        assert_eq!(fan.send("hello".to_string()).await, 2);
        assert_eq!(a.recv().await.as_deref(), Some("hello"));
        assert_eq!(b.recv().await.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_fan_out_prunes_closed_subscribers() {
        let fan = FanOut::with_capacity(4);
        let mut kept = fan.subscribe().await;
        let dropped = fan.subscribe().await;
        drop(dropped);

        assert_eq!(fan.send(7u32).await, 1);
        assert_eq!(fan.subscriber_count().await, 1);
        assert_eq!(kept.recv().await, Some(7));
    }

    #[tokio::test]
    async fn test_fan_in_merges_and_closes() {
        let (fan, mut output) = FanIn::new(8);
        let (tx_a, rx_a) = mpsc::channel(4);
        let (tx_b, rx_b) = mpsc::channel(4);
        let a = fan.add(rx_a);
        let b = fan.add(rx_b);
        drop(fan);

        tx_a.send(1).await.unwrap();
        tx_b.send(2).await.unwrap();
        tx_a.send(3).await.unwrap();
        drop(tx_a);
        drop(tx_b);
        a.await.unwrap();
        b.await.unwrap();

        let mut received = Vec::new();
        while let Some(value) = output.recv().await {
            received.push(value);
        }
        received.sort();
        assert_eq!(received, vec![1, 2, 3]);
    }
}
