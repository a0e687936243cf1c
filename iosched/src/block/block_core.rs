/// Size of a block device sector in bytes.
///
/// All IDE disks use this sector size, as do most USB and SCSI disks.
pub const BLOCK_SECTOR_SIZE: usize = 512;

/// Index of a block device sector.
///
/// Matches the width of the host's `sector_t`, so every addressable sector of
/// a 64-bit LBA device fits.
pub type BlockSector = u64;
