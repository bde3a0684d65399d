//! Durable write queue for slice payloads.
//!
//! # Responsibility
//! - Coalesce pending slice writes so the last write per key wins.
//! - Deliver pending writes with at-least-once semantics.
//! - Expose flush progress through sequence numbers.
//!
//! # Invariants
//! - Sequence numbers start at 1 and increase by one per enqueue.
//! - A write leaves the queue only after the backend acknowledged it.
//! - `last_flushed_seq` never decreases; every write with `seq <= it` is
//!   durable (directly or through a newer write for the same key).

use crate::persist::storage::{KeyValueStorage, StorageError};
use log::{debug, info, warn};
use std::collections::BTreeMap;

/// One queued write waiting for the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    pub key: String,
    pub payload: String,
    /// Sequence of the newest payload for this key.
    pub seq: u64,
    /// Sequence of the oldest write for this key not yet durable.
    first_seq: u64,
}

/// Write that the backend rejected during a flush.
#[derive(Debug)]
pub struct FlushFailure {
    pub key: String,
    pub error: StorageError,
}

/// Outcome of one flush pass.
#[derive(Debug, Default)]
pub struct FlushReport {
    /// Keys written in sequence order.
    pub written: Vec<String>,
    /// Keys that stayed queued.
    pub failed: Vec<FlushFailure>,
    /// Highest sequence known durable after this pass.
    pub flushed_through: u64,
}

impl FlushReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct WriteQueue {
    pending: BTreeMap<String, PendingWrite>,
    last_seq: u64,
    last_flushed_seq: u64,
}

impl WriteQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `payload` for `key`, replacing any older pending payload.
    ///
    /// Returns the sequence number assigned to this write.
    pub fn enqueue(&mut self, key: &str, payload: String) -> u64 {
        self.last_seq += 1;
        let seq = self.last_seq;
        match self.pending.get_mut(key) {
            Some(existing) => {
                existing.payload = payload;
                existing.seq = seq;
            }
            None => {
                self.pending.insert(
                    key.to_string(),
                    PendingWrite {
                        key: key.to_string(),
                        payload,
                        seq,
                        first_seq: seq,
                    },
                );
            }
        }
        debug!("event=queue_enqueue module=persist key={} seq={}", key, seq);
        seq
    }

    /// Writes every pending item to `storage`.
    ///
    /// Failed items stay queued and are retried by the next flush.
    pub fn flush<S: KeyValueStorage + ?Sized>(&mut self, storage: &mut S) -> FlushReport {
        let mut ordered = self.pending.values().cloned().collect::<Vec<_>>();
        ordered.sort_by_key(|write| write.seq);

        let mut report = FlushReport::default();
        for write in ordered {
            match storage.set_item(&write.key, &write.payload) {
                Ok(()) => {
                    self.pending.remove(&write.key);
                    report.written.push(write.key);
                }
                Err(error) => {
                    warn!(
                        "event=queue_flush_item module=persist status=error key={} seq={} error={}",
                        write.key, write.seq, error
                    );
                    report.failed.push(FlushFailure {
                        key: write.key,
                        error,
                    });
                }
            }
        }

        let durable_through = self
            .pending
            .values()
            .map(|write| write.first_seq - 1)
            .min()
            .unwrap_or(self.last_seq);
        self.last_flushed_seq = self.last_flushed_seq.max(durable_through);
        report.flushed_through = self.last_flushed_seq;

        if !report.written.is_empty() || !report.failed.is_empty() {
            info!(
                "event=queue_flush module=persist status={} written={} failed={} flushed_through={}",
                if report.is_complete() { "ok" } else { "partial" },
                report.written.len(),
                report.failed.len(),
                report.flushed_through
            );
        }
        report
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pending writes in sequence order.
    pub fn pending(&self) -> Vec<&PendingWrite> {
        let mut writes = self.pending.values().collect::<Vec<_>>();
        writes.sort_by_key(|write| write.seq);
        writes
    }

    pub fn last_seq(&self) -> u64 {
        self.last_seq
    }

    pub fn last_flushed_seq(&self) -> u64 {
        self.last_flushed_seq
    }

    /// Returns whether the write with sequence `seq` reached storage.
    pub fn is_durable(&self, seq: u64) -> bool {
        seq <= self.last_flushed_seq
    }
}

#[cfg(test)]
mod tests {
    use super::WriteQueue;
    use crate::persist::storage::{KeyValueStorage, MemoryStorage};

    #[test]
    fn enqueue_coalesces_by_key() {
        let mut queue = WriteQueue::new();
        queue.enqueue("persist:theme", "\"light\"".to_string());
        let second = queue.enqueue("persist:theme", "\"dark\"".to_string());

        assert_eq!(queue.pending_len(), 1);
        assert_eq!(queue.pending()[0].payload, "\"dark\"");
        assert_eq!(queue.pending()[0].seq, second);
    }

    #[test]
    fn flush_writes_latest_payload_and_advances_sequence() {
        let mut queue = WriteQueue::new();
        let mut storage = MemoryStorage::new();
        queue.enqueue("persist:theme", "\"light\"".to_string());
        queue.enqueue("persist:locale", "\"en\"".to_string());
        let last = queue.enqueue("persist:theme", "\"dark\"".to_string());

        let report = queue.flush(&mut storage);
        assert!(report.is_complete());
        assert_eq!(report.written, vec!["persist:locale", "persist:theme"]);
        assert_eq!(report.flushed_through, last);
        assert!(queue.is_idle());
        assert!(queue.is_durable(1));
        assert_eq!(
            storage.get_item("persist:theme").unwrap().as_deref(),
            Some("\"dark\"")
        );
    }

    #[test]
    fn flush_on_empty_queue_is_a_no_op() {
        let mut queue = WriteQueue::new();
        let mut storage = MemoryStorage::new();
        let report = queue.flush(&mut storage);
        assert!(report.written.is_empty());
        assert_eq!(report.flushed_through, 0);
        assert!(storage.is_empty());
    }
}
