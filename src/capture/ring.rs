//! Lock-free SPSC ring for event capture
//!
//! Connects the platform listener thread (producer) to the session consumer
//! thread. The producer never blocks: when the ring is full the incoming
//! event is dropped and counted. Drop-newest is the stated backpressure
//! policy: a stalled consumer costs recent events, never timestamp
//! accuracy for the events that do get through.
//!
//! Built on the `rtrb` crate for the core ring implementation.

use super::types::RawEvent;
use rtrb::{Consumer, Producer, RingBuffer};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Default ring capacity (must be a power of 2)
pub const DEFAULT_RING_CAPACITY: usize = 4096;

/// Ring statistics for monitoring
#[derive(Debug, Default)]
pub struct RingStats {
    /// Total events pushed
    pub events_pushed: AtomicU64,
    /// Events dropped because the ring was full
    pub events_dropped: AtomicU64,
    /// Events successfully consumed
    pub events_consumed: AtomicU64,
    /// Peak ring occupancy
    pub peak_occupancy: AtomicU64,
}

/// Bounded SPSC event ring
pub struct EventRing {
    producer: Option<Producer<RawEvent>>,
    consumer: Option<Consumer<RawEvent>>,
    stats: Arc<RingStats>,
    capacity: usize,
}

impl EventRing {
    /// Create a ring with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RING_CAPACITY)
    }

    /// Create a ring with the given capacity
    ///
    /// # Panics
    /// Panics if `capacity` is not a power of 2
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity.is_power_of_two(),
            "Ring capacity must be a power of 2"
        );
        let (producer, consumer) = RingBuffer::new(capacity);
        Self {
            producer: Some(producer),
            consumer: Some(consumer),
            stats: Arc::new(RingStats::default()),
            capacity,
        }
    }

    /// Split into producer and consumer halves. Call once.
    pub fn split(mut self) -> (EventProducer, EventConsumer) {
        let producer = self.producer.take().expect("Producer already taken");
        let consumer = self.consumer.take().expect("Consumer already taken");
        (
            EventProducer {
                inner: producer,
                stats: Arc::clone(&self.stats),
                capacity: self.capacity,
            },
            EventConsumer {
                inner: consumer,
                stats: Arc::clone(&self.stats),
            },
        )
    }

    /// Get the shared statistics handle
    pub fn stats(&self) -> Arc<RingStats> {
        Arc::clone(&self.stats)
    }
}

impl Default for EventRing {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer half (listener thread)
pub struct EventProducer {
    inner: Producer<RawEvent>,
    stats: Arc<RingStats>,
    capacity: usize,
}

impl EventProducer {
    /// Push an event. Lock-free, never blocks.
    ///
    /// Returns true if pushed, false if the ring was full and the event
    /// was dropped.
    #[inline]
    pub fn push(&mut self, event: RawEvent) -> bool {
        match self.inner.push(event) {
            Ok(()) => {
                self.stats.events_pushed.fetch_add(1, Ordering::Relaxed);

                // Update peak occupancy
                let occupied = (self.capacity - self.inner.slots()) as u64;
                let mut peak = self.stats.peak_occupancy.load(Ordering::Relaxed);
                while occupied > peak {
                    match self.stats.peak_occupancy.compare_exchange_weak(
                        peak,
                        occupied,
                        Ordering::Relaxed,
                        Ordering::Relaxed,
                    ) {
                        Ok(_) => break,
                        Err(p) => peak = p,
                    }
                }
                true
            }
            Err(_) => {
                self.stats.events_dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Check if the ring is full
    #[inline]
    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    /// Free slots remaining
    #[inline]
    pub fn available_slots(&self) -> usize {
        self.inner.slots()
    }
}

/// Consumer half (session consumer thread)
pub struct EventConsumer {
    inner: Consumer<RawEvent>,
    stats: Arc<RingStats>,
}

impl EventConsumer {
    /// Pop the next event, if any
    #[inline]
    pub fn pop(&mut self) -> Option<RawEvent> {
        match self.inner.pop() {
            Ok(event) => {
                self.stats.events_consumed.fetch_add(1, Ordering::Relaxed);
                Some(event)
            }
            Err(_) => None,
        }
    }

    /// Check if there are events available
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of events waiting
    #[inline]
    pub fn available(&self) -> usize {
        self.inner.slots()
    }

    /// Pop up to `max_count` events at once
    pub fn pop_batch(&mut self, max_count: usize) -> Vec<RawEvent> {
        let mut batch = Vec::with_capacity(max_count.min(self.available()));
        for _ in 0..max_count {
            match self.pop() {
                Some(event) => batch.push(event),
                None => break,
            }
        }
        batch
    }
}
