use crate::block::bio_request::{BioReq, RequestId};
use crate::block::block_error::BlockError;
use crate::block::config::ElevatorConfig;

/// An I/O scheduling policy for one block device.
///
/// The block layer drives an elevator through these hooks and serializes
/// every call against a given instance. `C` is the console the elevator
/// writes its diagnostics to.
pub trait Elevator<C> {
    /// Set up the elevator's private data for a device.
    fn init(config: &ElevatorConfig, console: C) -> Result<Self, BlockError>
    where
        Self: Sized;

    /// Name the elevator is registered under.
    fn name(&self) -> &'static str;

    /// Admit a new request.
    fn add_request(&mut self, rq: BioReq);

    /// Hand the next request to the device, or `None` if nothing is pending.
    ///
    /// `force` asks the elevator to drain everything it is holding back.
    fn dispatch(&mut self, force: bool) -> Option<BioReq>;

    /// The block layer merged `absorbed` into `survivor`; drop `absorbed`
    /// from the pending set and give it back.
    fn merged_requests(&mut self, survivor: RequestId, absorbed: RequestId) -> Option<BioReq>;

    /// The pending request queued right before `rq`.
    fn former_request(&self, rq: RequestId) -> Option<&BioReq>;

    /// The pending request queued right after `rq`.
    fn latter_request(&self, rq: RequestId) -> Option<&BioReq>;

    /// Mutable access to a pending request, for merge bookkeeping. Changing
    /// a request's sector range does not move it within the queue; requests
    /// added afterwards are ordered against the new range.
    fn request_mut(&mut self, rq: RequestId) -> Option<&mut BioReq>;

    /// Number of pending requests.
    fn queued(&self) -> usize;

    fn has_pending(&self) -> bool {
        self.queued() != 0
    }

    /// Tear the elevator down. Nothing may be pending.
    fn exit(self: alloc::boxed::Box<Self>);
}
