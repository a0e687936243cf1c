#![cfg_attr(target_os = "none", no_std)]

extern crate alloc;

pub mod block;

pub use block::bio_core::Elevator;
pub use block::bio_request::{BioOp, BioReq, RequestId};
pub use block::block_error::BlockError;
pub use block::config::ElevatorConfig;
pub use block::elevator::ElevatorRegistry;
