use asyncgen_runtime::{FanIn, FanOut, WorkerGroup};
use std::time::Duration;
use tokio::sync::mpsc;

/// Two producers feed a fan-in, a relay task republishes through a fan-out
/// and two consumers count what they see.
#[tokio::test]
async fn test_producers_relay_and_consumers() {
    let (merge, mut merged) = FanIn::new(16);
    let broadcast = FanOut::with_capacity(16);
    let mut first = broadcast.subscribe().await;
    let mut second = broadcast.subscribe().await;

    let mut group = WorkerGroup::new();
    for producer in 0..2u32 {
        let (tx, rx) = mpsc::channel(4);
        merge.add(rx);
        group.spawn(format!("producer-{}", producer), move |_| async move {
            for i in 0..3u32 {
                tx.send(producer * 10 + i).await?;
            }
            Ok::<_, anyhow::Error>(())
        });
    }
    drop(merge);

    let relay = broadcast.clone();
    group.spawn("relay", move |_| async move {
        while let Some(value) = merged.recv().await {
            relay.send(value).await;
        }
        Ok::<_, anyhow::Error>(())
    });

    tokio::time::timeout(Duration::from_secs(5), group.wait())
        .await
        .expect("pipeline should finish")
        .expect("no task should fail");
    drop(broadcast);

    let mut seen = Vec::new();
    while let Ok(value) = first.try_recv() {
        seen.push(value);
    }
    let mut other = Vec::new();
    while let Ok(value) = second.try_recv() {
        other.push(value);
    }
    seen.sort();
    other.sort();
    assert_eq!(seen, vec![0, 1, 2, 10, 11, 12]);
    assert_eq!(seen, other);
}
