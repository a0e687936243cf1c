use crate::block::bio_core::Elevator;
use crate::block::bio_request::{BioReq, RequestId};
use crate::block::block_error::BlockError;
use crate::block::config::ElevatorConfig;
use crate::block::schedulers::clook_queue::PendingQueue;
use crate::block::trace::{TraceEvent, TraceOp};
use alloc::boxed::Box;
use core::fmt;
use iosched_shared::console_println;

/// A C-LOOK elevator.
///
/// Requests are dispatched in ascending order of their end sector. After the
/// highest pending request is dispatched, dispatching continues from the
/// lowest pending one instead of sweeping back down.
///
/// Every admitted and every dispatched request is reported on the console as
/// `[CLOOK] add <R|W> <sector>` or `[CLOOK] dsp <R|W> <sector>`.
pub struct ClookScheduler<C> {
    queue: PendingQueue,
    console: C,
    trace: bool,
}

impl<C: fmt::Write> ClookScheduler<C> {
    pub const NAME: &'static str = "clook";

    pub fn new(console: C) -> Self {
        Self {
            queue: PendingQueue::new(),
            console,
            trace: true,
        }
    }

    pub fn queue(&self) -> &PendingQueue {
        &self.queue
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    /// Tear down the elevator and hand back its console.
    ///
    /// Panics if requests are still pending.
    pub fn shutdown(self) -> C {
        self.queue.destroy();
        self.console
    }

    fn trace(&mut self, op: TraceOp, rq: &BioReq) {
        if self.trace {
            console_println!(self.console, "{}", TraceEvent::new(op, rq));
        }
    }
}

impl<C: fmt::Write> Elevator<C> for ClookScheduler<C> {
    fn init(config: &ElevatorConfig, console: C) -> Result<Self, BlockError> {
        Ok(Self {
            queue: PendingQueue::with_capacity(config.queue_depth)?,
            console,
            trace: config.trace,
        })
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn add_request(&mut self, rq: BioReq) {
        self.trace(TraceOp::Add, &rq);
        self.queue.insert(rq);
    }

    fn dispatch(&mut self, _force: bool) -> Option<BioReq> {
        let rq = self.queue.pop_smallest()?;
        self.trace(TraceOp::Dispatch, &rq);
        Some(rq)
    }

    fn merged_requests(&mut self, _survivor: RequestId, absorbed: RequestId) -> Option<BioReq> {
        self.queue.remove(absorbed)
    }

    fn former_request(&self, rq: RequestId) -> Option<&BioReq> {
        self.queue.predecessor(rq)
    }

    fn latter_request(&self, rq: RequestId) -> Option<&BioReq> {
        self.queue.successor(rq)
    }

    fn request_mut(&mut self, rq: RequestId) -> Option<&mut BioReq> {
        self.queue.get_mut(rq)
    }

    fn queued(&self) -> usize {
        self.queue.len()
    }

    fn exit(self: Box<Self>) {
        self.shutdown();
    }
}
