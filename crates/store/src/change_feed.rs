// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Fan-out of [`ChangeNotification`]s to `GET /jobs/stream` subscribers.
//!
//! Delivery is at-least-once with per-job ordering preserved. A subscriber
//! that falls behind is bounded: once its outbound queue is full, further
//! updates for a job it has already buffered overwrite the buffered one
//! (latest wins) rather than growing the queue without limit.

use reelforge_core::{ChangeNotification, FileStem};
use std::collections::HashMap;
use tokio::sync::{broadcast, mpsc};

const DEFAULT_CAPACITY: usize = 1024;

#[derive(Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeNotification>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish one update. Never blocks: if there are no subscribers this
    /// is a no-op.
    pub fn publish(&self, notification: ChangeNotification) {
        let _ = self.tx.send(notification);
    }

    /// Subscribe with a bounded outbound queue of `queue_depth` entries.
    /// Once the queue is full, subsequent updates for an already-buffered
    /// `file_stem` replace the buffered entry instead of expanding the
    /// queue.
    pub fn subscribe(&self, queue_depth: usize) -> Subscription {
        let broadcast_rx = self.tx.subscribe();
        let (out_tx, out_rx) = mpsc::channel(queue_depth);
        let task = tokio::spawn(coalesce_loop(broadcast_rx, out_tx));
        Subscription { rx: out_rx, _task: task }
    }
}

async fn coalesce_loop(
    mut broadcast_rx: broadcast::Receiver<ChangeNotification>,
    out_tx: mpsc::Sender<ChangeNotification>,
) {
    // Insertion-ordered pending buffer: a HashMap plus a Vec of keys in
    // first-buffered order, so draining preserves per-job emission order.
    let mut pending: HashMap<FileStem, ChangeNotification> = HashMap::new();
    let mut order: Vec<FileStem> = Vec::new();

    loop {
        tokio::select! {
            biased;

            permit = out_tx.reserve(), if !pending.is_empty() => {
                let Ok(permit) = permit else { return };
                let key = order.remove(0);
                if let Some(notification) = pending.remove(&key) {
                    permit.send(notification);
                }
            }

            received = broadcast_rx.recv() => {
                match received {
                    Ok(notification) => {
                        if !pending.contains_key(&notification.file_stem) {
                            order.push(notification.file_stem.clone());
                        }
                        pending.insert(notification.file_stem.clone(), notification);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "change feed subscriber lagged, resuming from latest");
                    }
                    Err(broadcast::error::RecvError::Closed) => return,
                }
            }
        }
    }
}

pub struct Subscription {
    rx: mpsc::Receiver<ChangeNotification>,
    _task: tokio::task::JoinHandle<()>,
}

impl Subscription {
    pub async fn recv(&mut self) -> Option<ChangeNotification> {
        self.rx.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self._task.abort();
    }
}

#[cfg(test)]
#[path = "change_feed_tests.rs"]
mod tests;
