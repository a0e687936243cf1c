use crate::block::bio_core::Elevator;
use crate::block::bio_request::{BioReq, RequestId};
use crate::block::block_error::BlockError;
use crate::block::config::ElevatorConfig;
use alloc::boxed::Box;
use alloc::collections::VecDeque;
use core::marker::PhantomData;

/// A NOOP scheduler that contains no scheduling logic.
///
/// Requests are dispatched in the order they were added. It never writes to
/// the console it is handed.
pub struct NoopScheduler<C> {
    queue: VecDeque<BioReq>,
    _marker: PhantomData<fn(C)>,
}

impl<C> NoopScheduler<C> {
    pub const NAME: &'static str = "noop";

    fn position(&self, id: RequestId) -> Option<usize> {
        self.queue.iter().position(|r| r.id == id)
    }
}

impl<C> Elevator<C> for NoopScheduler<C> {
    fn init(config: &ElevatorConfig, _console: C) -> Result<Self, BlockError> {
        let mut queue = VecDeque::new();
        queue
            .try_reserve(config.queue_depth)
            .map_err(|_| BlockError::OutOfMemory)?;

        Ok(Self {
            queue,
            _marker: PhantomData,
        })
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn add_request(&mut self, rq: BioReq) {
        self.queue.push_back(rq);
    }

    fn dispatch(&mut self, _force: bool) -> Option<BioReq> {
        self.queue.pop_front()
    }

    fn merged_requests(&mut self, _survivor: RequestId, absorbed: RequestId) -> Option<BioReq> {
        let pos = self.position(absorbed)?;
        self.queue.remove(pos)
    }

    fn former_request(&self, rq: RequestId) -> Option<&BioReq> {
        let pos = self.position(rq)?;
        self.queue.get(pos.checked_sub(1)?)
    }

    fn latter_request(&self, rq: RequestId) -> Option<&BioReq> {
        let pos = self.position(rq)?;
        self.queue.get(pos + 1)
    }

    fn request_mut(&mut self, rq: RequestId) -> Option<&mut BioReq> {
        let pos = self.position(rq)?;
        self.queue.get_mut(pos)
    }

    fn queued(&self) -> usize {
        self.queue.len()
    }

    fn exit(self: Box<Self>) {
        assert!(
            self.queue.is_empty(),
            "elevator torn down with {} requests pending",
            self.queue.len()
        );
    }
}
