//! Diagnostic trace lines written by the C-LOOK elevator.
//!
//! Each admitted or dispatched request produces one line:
//!
//! ```text
//! [CLOOK] add R 2048
//! [CLOOK] dsp W 96
//! ```
//!
//! The last field is the request's start sector in decimal. Operators replay
//! these lines to audit the order in which requests reached the device, so
//! the format is fixed.

use crate::block::bio_request::{BioOp, BioReq};
use crate::block::block_core::BlockSector;
use crate::block::block_error::BlockError;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::fmt;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{anychar, char, u64};
use nom::combinator::{all_consuming, map_opt, opt, value};
use nom::sequence::{preceded, terminated, tuple};
use nom::IResult;

pub const TRACE_PREFIX: &str = "[CLOOK]";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceOp {
    Add,
    Dispatch,
}

impl TraceOp {
    pub const fn tag(self) -> &'static str {
        match self {
            TraceOp::Add => "add",
            TraceOp::Dispatch => "dsp",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceEvent {
    pub op: TraceOp,
    pub dir: BioOp,
    pub sector: BlockSector,
}

impl TraceEvent {
    pub fn new(op: TraceOp, rq: &BioReq) -> Self {
        Self {
            op,
            dir: rq.op(),
            sector: rq.sector(),
        }
    }

    /// Parse a single trace line. A trailing newline is accepted.
    pub fn parse(line: &str) -> Result<Self, BlockError> {
        all_consuming(terminated(event, opt(char('\n'))))(line)
            .map(|(_, event)| event)
            .map_err(|_| BlockError::InvalidTrace(line.to_string()))
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            TRACE_PREFIX,
            self.op.tag(),
            self.dir.as_char(),
            self.sector
        )
    }
}

fn event(input: &str) -> IResult<&str, TraceEvent> {
    let (input, (op, dir, sector)) = preceded(
        tag(TRACE_PREFIX),
        tuple((
            preceded(
                char(' '),
                alt((
                    value(TraceOp::Add, tag("add")),
                    value(TraceOp::Dispatch, tag("dsp")),
                )),
            ),
            preceded(char(' '), map_opt(anychar, BioOp::from_char)),
            preceded(char(' '), u64),
        )),
    )(input)?;

    Ok((input, TraceEvent { op, dir, sector }))
}

/// Parse every trace line in `text`, in order.
///
/// Lines that do not start with `[CLOOK]` belong to other console users and
/// are skipped. A line that does start with it but is malformed is an error.
pub fn parse_trace(text: &str) -> Result<Vec<TraceEvent>, BlockError> {
    text.lines()
        .filter(|line| line.starts_with(TRACE_PREFIX))
        .map(TraceEvent::parse)
        .collect()
}

/// Start sectors of the dispatched requests, in dispatch order.
pub fn dispatch_order(events: &[TraceEvent]) -> Vec<BlockSector> {
    events
        .iter()
        .filter(|e| e.op == TraceOp::Dispatch)
        .map(|e| e.sector)
        .collect()
}
