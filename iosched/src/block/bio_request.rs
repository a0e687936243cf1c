use crate::block::block_core::{BlockSector, BLOCK_SECTOR_SIZE};
use arbitrary_int::{u13, u3};
use bitbybit::bitfield;
use core::fmt;

/// Identity of a request, assigned by the block layer that owns it.
///
/// Elevators never inspect the value; it only names a queued request in
/// `merged_requests`, `former_request` and `latter_request`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BioOp {
    BioRead,
    BioWrite,
}

impl BioOp {
    /// Single-letter tag used in diagnostic output.
    pub const fn as_char(self) -> char {
        match self {
            BioOp::BioRead => 'R',
            BioOp::BioWrite => 'W',
        }
    }

    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'R' => Some(BioOp::BioRead),
            'W' => Some(BioOp::BioWrite),
            _ => None,
        }
    }
}

/// Command flags of a request, laid out like the low bits of the Linux
/// `cmd_flags` word. Bit 0 selects the data direction.
#[bitfield(u32, default = 0)]
pub struct RequestFlags {
    #[bit(0, rw)]
    write: bool,
    #[bit(4, rw)]
    sync: bool,
    #[bit(5, rw)]
    meta: bool,
    #[bit(6, rw)]
    prio: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IoPrioClass {
    None,
    RealTime,
    BestEffort,
    Idle,
}

/// I/O priority as carried by a request: a class in the top three bits and
/// a level within that class below it.
#[bitfield(u16, default = 0)]
pub struct IoPriority {
    #[bits(0..=12, rw)]
    level: u13,
    #[bits(13..=15, rw)]
    class: u3,
}

impl IoPriority {
    pub fn from_class(class: IoPrioClass, level: u16) -> Self {
        let class = match class {
            IoPrioClass::None => 0,
            IoPrioClass::RealTime => 1,
            IoPrioClass::BestEffort => 2,
            IoPrioClass::Idle => 3,
        };
        IoPriority::default()
            .with_class(u3::new(class))
            .with_level(u13::new(level & 0x1fff))
    }

    /// The priority class, or `None` if the class bits hold an unknown value.
    pub fn prio_class(&self) -> Option<IoPrioClass> {
        match self.class().value() {
            0 => Some(IoPrioClass::None),
            1 => Some(IoPrioClass::RealTime),
            2 => Some(IoPrioClass::BestEffort),
            3 => Some(IoPrioClass::Idle),
            _ => None,
        }
    }

    pub fn prio_level(&self) -> u16 {
        self.level().value()
    }
}

/// A block I/O request as seen by an elevator.
///
/// The request is a descriptor: it names a sector range and carries the
/// metadata the block layer attached to it. Data buffers stay with the block
/// layer.
#[derive(Clone)]
pub struct BioReq {
    pub(crate) id: RequestId,
    pub(crate) sector: BlockSector,
    pub(crate) sectors: u32,
    pub(crate) flags: RequestFlags,
    pub(crate) ioprio: IoPriority,
}

impl BioReq {
    pub fn new(id: RequestId, op: BioOp, sector: BlockSector, sectors: u32) -> Self {
        Self {
            id,
            sector,
            sectors,
            flags: RequestFlags::default().with_write(op == BioOp::BioWrite),
            ioprio: IoPriority::default(),
        }
    }

    /// Shorthand for a one-sector read.
    pub fn read(id: u64, sector: BlockSector) -> Self {
        Self::new(RequestId(id), BioOp::BioRead, sector, 1)
    }

    /// Shorthand for a one-sector write.
    pub fn write(id: u64, sector: BlockSector) -> Self {
        Self::new(RequestId(id), BioOp::BioWrite, sector, 1)
    }

    pub fn with_sync(mut self, sync: bool) -> Self {
        self.flags = self.flags.with_sync(sync);
        self
    }

    pub fn with_meta(mut self, meta: bool) -> Self {
        self.flags = self.flags.with_meta(meta);
        self
    }

    pub fn with_ioprio(mut self, ioprio: IoPriority) -> Self {
        self.flags = self.flags.with_prio(ioprio.prio_class() == Some(IoPrioClass::RealTime));
        self.ioprio = ioprio;
        self
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn op(&self) -> BioOp {
        if self.flags.write() {
            BioOp::BioWrite
        } else {
            BioOp::BioRead
        }
    }

    pub fn is_sync(&self) -> bool {
        self.flags.sync()
    }

    pub fn is_meta(&self) -> bool {
        self.flags.meta()
    }

    pub fn flags(&self) -> u32 {
        self.flags.raw_value()
    }

    pub fn ioprio(&self) -> IoPriority {
        self.ioprio
    }

    /// First sector covered by the request.
    pub fn sector(&self) -> BlockSector {
        self.sector
    }

    pub fn sectors(&self) -> u32 {
        self.sectors
    }

    /// Last sector covered by the request. A zero-length request covers its
    /// start sector only.
    pub fn end_sector(&self) -> BlockSector {
        self.sector
            .saturating_add(BlockSector::from(self.sectors.max(1)) - 1)
    }

    pub fn len_bytes(&self) -> u64 {
        u64::from(self.sectors) * BLOCK_SECTOR_SIZE as u64
    }

    /// Whether `next` starts right after this request ends.
    pub fn is_contiguous_with(&self, next: &BioReq) -> bool {
        self.end_sector().checked_add(1) == Some(next.sector)
    }

    /// Extends this request to also cover the sector range of `other`.
    ///
    /// This is the bookkeeping a block layer does on the surviving request
    /// when it merges two requests.
    pub fn absorb(&mut self, other: &BioReq) {
        let start = self.sector.min(other.sector);
        let end = self.end_sector().max(other.end_sector());
        self.sector = start;
        self.sectors = u32::try_from((end - start).saturating_add(1)).unwrap_or(u32::MAX);
        self.flags = self.flags.with_sync(self.is_sync() || other.is_sync());
    }
}

impl fmt::Debug for BioReq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BioReq")
            .field("id", &self.id)
            .field("op", &self.op())
            .field("sector", &self.sector)
            .field("sectors", &self.sectors)
            .field("flags", &format_args!("{:#x}", self.flags.raw_value()))
            .field("ioprio", &format_args!("{:#x}", self.ioprio.raw_value()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_flags() {
        let r = BioReq::read(1, 100);
        let w = BioReq::write(2, 100);

        assert_eq!(r.op(), BioOp::BioRead);
        assert_eq!(w.op(), BioOp::BioWrite);
        assert_eq!(r.flags() & 1, 0);
        assert_eq!(w.flags() & 1, 1);
        assert_eq!(w.op().as_char(), 'W');
        assert_eq!(BioOp::from_char('R'), Some(BioOp::BioRead));
        assert_eq!(BioOp::from_char('x'), None);
    }

    #[test]
    fn test_flag_bits() {
        let r = BioReq::read(1, 0).with_sync(true).with_meta(true);
        assert!(r.is_sync());
        assert!(r.is_meta());
        assert_eq!(r.flags(), (1 << 4) | (1 << 5));
        assert_eq!(r.op(), BioOp::BioRead);
    }

    #[test]
    fn test_end_sector() {
        assert_eq!(BioReq::new(RequestId(1), BioOp::BioRead, 10, 8).end_sector(), 17);
        assert_eq!(BioReq::new(RequestId(1), BioOp::BioRead, 10, 1).end_sector(), 10);
        assert_eq!(BioReq::new(RequestId(1), BioOp::BioRead, 10, 0).end_sector(), 10);
        assert_eq!(
            BioReq::new(RequestId(1), BioOp::BioRead, u64::MAX - 1, 8).end_sector(),
            u64::MAX
        );
        assert_eq!(BioReq::new(RequestId(1), BioOp::BioWrite, 0, 8).len_bytes(), 4096);
        assert_eq!(
            BioReq::new(RequestId(2), BioOp::BioRead, 0, u32::MAX).len_bytes(),
            u64::from(u32::MAX) * 512
        );
    }

    #[test]
    fn test_ioprio() {
        let prio = IoPriority::from_class(IoPrioClass::BestEffort, 4);
        assert_eq!(prio.raw_value(), (2 << 13) | 4);
        assert_eq!(prio.prio_class(), Some(IoPrioClass::BestEffort));
        assert_eq!(prio.prio_level(), 4);

        let unknown = IoPriority::new_with_raw_value(7 << 13);
        assert_eq!(unknown.prio_class(), None);

        let rt = BioReq::write(1, 0).with_ioprio(IoPriority::from_class(IoPrioClass::RealTime, 0));
        assert_eq!(rt.flags() & (1 << 6), 1 << 6);
    }

    #[test]
    fn test_absorb() {
        let mut a = BioReq::new(RequestId(1), BioOp::BioWrite, 10, 10);
        let b = BioReq::new(RequestId(2), BioOp::BioWrite, 20, 10).with_sync(true);

        assert!(a.is_contiguous_with(&b));
        assert!(!b.is_contiguous_with(&a));

        a.absorb(&b);
        assert_eq!(a.sector(), 10);
        assert_eq!(a.sectors(), 20);
        assert_eq!(a.end_sector(), 29);
        assert!(a.is_sync());
    }
}
