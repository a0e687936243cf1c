pub mod clook_queue;
pub mod clook_scheduler;
pub mod noop_scheduler;
