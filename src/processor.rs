//! The streaming pipeline driver.
//!
//! A [`FileProcessor`] drains a parser, hands every read to its consumer,
//! and publishes periodic [`TimeIntervalEvent`]s at three configurable
//! granularities. Everything runs on the calling thread: consumer calls
//! and event delivery are synchronous, and within one run they are
//! totally ordered by the parser's read order.

use crate::{
    consumers::SequenceConsumer,
    events::{EventListener, EventNotifier, IntervalLevel, TimeIntervalEvent},
    parsing::{PairedParser, SequenceParser},
    KmerStreamError, Result,
};

pub const DEFAULT_FINE_INTERVAL: u64 = 10_000;
pub const DEFAULT_MEDIUM_INTERVAL: u64 = 100_000;
pub const DEFAULT_COARSE_INTERVAL: u64 = 1_000_000;

/// A modular counter firing once every `interval` units.
///
/// `poll` fires on exact equality: an increment larger than the remaining
/// gap overshoots and the firing is skipped silently. Callers must keep
/// each increment at or below the remaining gap; the pipeline passes 1 or
/// 2 against intervals in the thousands.
#[derive(Debug, Clone)]
pub struct IntervalCounter {
    interval: u64,
    counter: u64,
}

impl IntervalCounter {
    pub fn new(interval: u64) -> Self {
        Self {
            interval,
            counter: 0,
        }
    }

    /// Add `incr`; on reaching the interval exactly, reset and report the
    /// tick.
    pub fn poll(&mut self, incr: u64) -> bool {
        self.counter += incr;
        if self.counter == self.interval {
            self.counter = 0;
            true
        } else {
            false
        }
    }
}

/// Which counters fired during one [`FileProcessor::advance`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntervalState {
    pub fine: bool,
    pub medium: bool,
    pub coarse: bool,
    pub end: bool,
}

impl IntervalState {
    fn at_end() -> Self {
        Self {
            end: true,
            ..Self::default()
        }
    }

    /// True if anything fired.
    pub fn ticked(&self) -> bool {
        self.fine || self.medium || self.coarse || self.end
    }
}

/// Drives a parser to completion, feeding each read to a consumer.
///
/// The read counter is a plain integer. The whole pipeline runs on the
/// calling thread; sharing a processor across threads is not supported.
pub struct FileProcessor<C> {
    consumer: C,
    counters: [IntervalCounter; 3],
    n_reads: u64,
    notifier: EventNotifier,
}

impl<C: SequenceConsumer> FileProcessor<C> {
    /// Processor with the default fine/medium/coarse intervals.
    pub fn new(consumer: C) -> Self {
        Self::with_intervals(
            consumer,
            DEFAULT_FINE_INTERVAL,
            DEFAULT_MEDIUM_INTERVAL,
            DEFAULT_COARSE_INTERVAL,
        )
    }

    /// Processor with explicit tick intervals, in reads.
    pub fn with_intervals(consumer: C, fine: u64, medium: u64, coarse: u64) -> Self {
        Self {
            consumer,
            counters: [
                IntervalCounter::new(fine),
                IntervalCounter::new(medium),
                IntervalCounter::new(coarse),
            ],
            n_reads: 0,
            notifier: EventNotifier::new(),
        }
    }

    /// Subscribe `listener` to this processor's tick events.
    pub fn register_listener(&mut self, listener: impl EventListener + 'static) {
        self.notifier.register_listener(listener);
    }

    /// Reads processed so far.
    pub fn n_reads(&self) -> u64 {
        self.n_reads
    }

    pub fn consumer(&self) -> &C {
        &self.consumer
    }

    pub fn consumer_mut(&mut self) -> &mut C {
        &mut self.consumer
    }

    pub fn into_consumer(self) -> C {
        self.consumer
    }

    /// Process reads until a counter ticks or the parser is exhausted.
    ///
    /// Returns the tick state so callers can checkpoint between bursts.
    /// Consumer errors propagate immediately; the failing read is not
    /// counted and no tick is emitted for it. Exhaustion emits the
    /// [`IntervalLevel::End`] event and returns a state with `end` set.
    pub fn advance<P: SequenceParser>(&mut self, parser: &mut P) -> Result<IntervalState> {
        while !parser.is_complete() {
            let read = match parser.get_next_read() {
                Ok(read) => read,
                Err(KmerStreamError::NoMoreReads) => break,
                Err(e) => return Err(e),
            };
            self.consumer.process_sequence(&read)?;
            self.n_reads += 1;
            let tick = self.notify_tick(1);
            if tick.ticked() {
                return Ok(tick);
            }
        }
        self.notify_stop();
        Ok(IntervalState::at_end())
    }

    /// Drive [`advance`](Self::advance) to the end of the parser; returns
    /// the total number of reads processed.
    pub fn process<P: SequenceParser>(&mut self, parser: &mut P) -> Result<u64> {
        loop {
            let state = self.advance(parser)?;
            if state.end {
                break;
            }
        }
        Ok(self.n_reads)
    }

    /// Paired-end variant of [`advance`](Self::advance): the consumer
    /// receives whichever halves are present, and the read counter
    /// advances by that many.
    pub fn advance_paired<P: PairedParser>(&mut self, parser: &mut P) -> Result<IntervalState> {
        while !parser.is_complete() {
            let bundle = match parser.next_bundle() {
                Ok(bundle) => bundle,
                Err(KmerStreamError::NoMoreReads) => break,
                Err(e) => return Err(e),
            };
            if let Some(read) = &bundle.left {
                self.consumer.process_sequence(read)?;
            }
            if let Some(read) = &bundle.right {
                self.consumer.process_sequence(read)?;
            }
            let halves = bundle.count();
            self.n_reads += halves;
            let tick = self.notify_tick(halves);
            if tick.ticked() {
                return Ok(tick);
            }
        }
        self.notify_stop();
        Ok(IntervalState::at_end())
    }

    /// Paired-end variant of [`process`](Self::process).
    pub fn process_paired<P: PairedParser>(&mut self, parser: &mut P) -> Result<u64> {
        loop {
            let state = self.advance_paired(parser)?;
            if state.end {
                break;
            }
        }
        Ok(self.n_reads)
    }

    /// Poll the three counters; on a fine tick the consumer reports
    /// before listeners hear about it.
    fn notify_tick(&mut self, incr: u64) -> IntervalState {
        let mut state = IntervalState::default();
        if self.counters[0].poll(incr) {
            self.consumer.report();
            self.notifier.notify(&TimeIntervalEvent {
                level: IntervalLevel::Fine,
                t: self.n_reads,
            });
            state.fine = true;
        }
        if self.counters[1].poll(incr) {
            self.notifier.notify(&TimeIntervalEvent {
                level: IntervalLevel::Medium,
                t: self.n_reads,
            });
            state.medium = true;
        }
        if self.counters[2].poll(incr) {
            self.notifier.notify(&TimeIntervalEvent {
                level: IntervalLevel::Coarse,
                t: self.n_reads,
            });
            state.coarse = true;
        }
        state
    }

    fn notify_stop(&mut self) {
        self.notifier.notify(&TimeIntervalEvent {
            level: IntervalLevel::End,
            t: self.n_reads,
        });
    }
}
