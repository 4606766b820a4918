/// Size of one logical block: 256 bytes.
/// The emulator does block-aligned I/O only; every read and write moves
/// exactly this many bytes.
pub const BLOCK_SIZE: usize = 256;

/// One logical block (a fixed 256-byte array).
/// All device I/O is performed in units of `Block`.
pub type Block = [u8; BLOCK_SIZE];

/// Handle for a disk tracked by the registry.
/// Handles are 0-based indices into the registry's disk table and stay
/// stable for the lifetime of the registry, even after the disk is closed.
pub type DiskId = usize;
