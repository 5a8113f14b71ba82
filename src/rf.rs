//! Lock-free handoff of decoded RF codes from interrupt to main loop.
//!
//! The receiver ISR does exactly two things: timestamp the decoded code and
//! push it here. Matching, holdoff and channel mutation all happen later on
//! the main loop, never in interrupt context.
//!
//! ```text
//! RF ISR ──────▶ RfEventQueue ──────▶ main loop
//!                (lock-free)          (dispatch)
//! ```

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

/// Default queue depth. Remote repeat bursts arrive ~10/s; sixteen slots is
/// far more than one loop iteration can fall behind.
pub const DEFAULT_QUEUE_SIZE: usize = 16;

/// One decoded RF transmission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RfEvent {
    /// Decoded integer code, as delivered by the receiver.
    pub code: u32,
    /// Millisecond timestamp taken in the ISR.
    pub timestamp_ms: u32,
}

impl RfEvent {
    const EMPTY: RfEvent = RfEvent {
        code: 0,
        timestamp_ms: 0,
    };
}

/// Single-producer single-consumer ring for RF events.
///
/// # Safety
///
/// Uses `UnsafeCell` internally but is safe under the firmware's execution
/// model:
/// - exactly one producer (the receiver ISR)
/// - exactly one consumer (the main loop)
/// - slot writes happen before the write index is published with `Release`,
///   so the consumer never observes a torn event
///
/// `push` never blocks and never allocates; a full ring drops the new event
/// and counts the drop.
pub struct RfEventQueue<const N: usize = DEFAULT_QUEUE_SIZE> {
    slots: UnsafeCell<[RfEvent; N]>,
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: single producer, single consumer, coordination through the atomic
// indices with Release/Acquire pairing.
unsafe impl<const N: usize> Sync for RfEventQueue<N> {}
unsafe impl<const N: usize> Send for RfEventQueue<N> {}

impl<const N: usize> RfEventQueue<N> {
    const MASK: usize = N - 1;

    /// Create an empty queue.
    ///
    /// # Panics
    ///
    /// Panics at compile time if N is not a power of 2.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "queue size must be power of 2");

        Self {
            slots: UnsafeCell::new([RfEvent::EMPTY; N]),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push an event from the ISR.
    ///
    /// Returns `false` (and counts the drop) when the ring is full. O(1),
    /// never blocks.
    #[inline]
    pub fn push(&self, event: RfEvent) -> bool {
        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        // SAFETY: single producer; this slot is outside the consumer's
        // visible range until the index store below.
        unsafe {
            (*self.slots.get())[(write as usize) & Self::MASK] = event;
        }

        // Publish after the slot write so the consumer sees a whole event.
        self.write_idx.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    /// Pop the oldest event on the main loop.
    #[inline]
    pub fn pop(&self) -> Option<RfEvent> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        // SAFETY: single consumer; the producer never rewrites a slot that
        // is still between read_idx and write_idx.
        let event = unsafe { (*self.slots.get())[(read as usize) & Self::MASK] };

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(event)
    }

    /// Events waiting to be consumed.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }

    /// Events dropped because the ring was full.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Queue capacity.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for RfEventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_fifo_order() {
        let queue = RfEventQueue::<8>::new();

        for code in 1..=3 {
            assert!(queue.push(RfEvent {
                code,
                timestamp_ms: code * 10,
            }));
        }

        assert_eq!(queue.pending(), 3);
        assert_eq!(queue.pop().unwrap().code, 1);
        assert_eq!(queue.pop().unwrap().code, 2);
        assert_eq!(queue.pop().unwrap().code, 3);
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_queue_full_drops_newest() {
        let queue = RfEventQueue::<4>::new();

        for code in 1..=4 {
            assert!(queue.push(RfEvent {
                code,
                timestamp_ms: 0,
            }));
        }

        assert!(!queue.push(RfEvent {
            code: 5,
            timestamp_ms: 0,
        }));
        assert_eq!(queue.dropped(), 1);

        // Oldest entries survive
        assert_eq!(queue.pop().unwrap().code, 1);

        // One slot free again
        assert!(queue.push(RfEvent {
            code: 6,
            timestamp_ms: 0,
        }));
    }

    #[test]
    fn test_queue_wraps_around() {
        let queue = RfEventQueue::<4>::new();

        for round in 0..10u32 {
            assert!(queue.push(RfEvent {
                code: round + 1,
                timestamp_ms: round,
            }));
            let event = queue.pop().unwrap();
            assert_eq!(event.code, round + 1);
            assert_eq!(event.timestamp_ms, round);
        }

        assert_eq!(queue.pending(), 0);
        assert_eq!(queue.dropped(), 0);
    }

    #[test]
    fn test_queue_concurrent_producer_consumer() {
        use std::sync::Arc;
        use std::thread;

        let queue = Arc::new(RfEventQueue::<64>::new());
        let producer_queue = Arc::clone(&queue);

        let producer = thread::spawn(move || {
            let mut sent = 0u32;
            for code in 1..=1000u32 {
                if producer_queue.push(RfEvent {
                    code,
                    timestamp_ms: code,
                }) {
                    sent += 1;
                }
            }
            sent
        });

        let mut received = 0u32;
        let mut last_code = 0u32;
        while received < 1000 {
            if let Some(event) = queue.pop() {
                // FIFO order must hold even if some pushes were dropped
                assert!(event.code > last_code);
                last_code = event.code;
                received += 1;
            }
            if producer.is_finished() && queue.pending() == 0 {
                break;
            }
        }

        let sent = producer.join().unwrap();
        assert_eq!(sent, received + queue.pending());
    }
}
