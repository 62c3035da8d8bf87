//! Consensus constants shared with the network
//!
//! Every value here is consensus-observable: sigop accounting, block
//! weight, lock evaluation and reject codes all compare against these
//! numbers bit-for-bit.

/// Maximum money supply: 21,000,000 coins in base units
pub const MAX_MONEY: i64 = 21_000_000 * 100_000_000;

/// Maximum allowed size for a serialized block, in bytes
pub const MAX_BLOCK_SERIALIZED_SIZE: usize = 4_000_000;

/// Maximum allowed weight for a block (BIP 141)
pub const MAX_BLOCK_WEIGHT: usize = 4_000_000;

/// Maximum allowed number of signature check operations in a block
pub const MAX_BLOCK_SIGOPS_COST: i64 = 80_000;

/// Coinbase outputs can only be spent after this many new blocks
pub const COINBASE_MATURITY: i32 = 100;

/// Scale factor between weight units and non-witness bytes (BIP 141)
pub const WITNESS_SCALE_FACTOR: usize = 4;

/// 60 is the lower bound for the size of a valid serialized transaction
pub const MIN_TRANSACTION_WEIGHT: usize = WITNESS_SCALE_FACTOR * 60;

/// 10 is the lower bound for the size of a serialized transaction
pub const MIN_SERIALIZABLE_TRANSACTION_WEIGHT: usize = WITNESS_SCALE_FACTOR * 10;

/// Interpret sequence numbers as relative lock-time constraints (BIP 68)
pub const LOCKTIME_VERIFY_SEQUENCE: u32 = 1 << 0;

/// Use median time-past instead of block time as the lock endpoint (BIP 113)
pub const LOCKTIME_MEDIAN_TIME_PAST: u32 = 1 << 1;

/// Lock times below this threshold are block heights, above it Unix times
pub const LOCKTIME_THRESHOLD: i64 = 500_000_000;

/// Sequence value that disables nLockTime for the whole transaction
pub const SEQUENCE_FINAL: u32 = 0xffff_ffff;

/// If set, the input sequence carries no relative lock-time meaning
pub const SEQUENCE_LOCKTIME_DISABLE_FLAG: u32 = 1 << 31;

/// If set, the relative lock-time has units of 512 seconds, otherwise blocks
pub const SEQUENCE_LOCKTIME_TYPE_FLAG: u32 = 1 << 22;

/// Mask extracting the relative lock-time value from a sequence number
pub const SEQUENCE_LOCKTIME_MASK: u32 = 0x0000_ffff;

/// Shift converting masked sequence time units into seconds (2^9 = 512)
pub const SEQUENCE_LOCKTIME_GRANULARITY: u32 = 9;

/// Cap charged for an OP_CHECKMULTISIG without a preceding OP_N key count
pub const MAX_PUBKEYS_PER_MULTISIG: u32 = 20;

/// Highest opcode value accepted by `Script::has_valid_ops` (OP_NOP10)
pub const MAX_OPCODE: u8 = 0xb9;

/// Maximum size of a pushed script element, in bytes
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;

/// Evaluate P2SH (BIP 16) subscripts; gates the P2SH sigop term
pub const SCRIPT_VERIFY_P2SH: u32 = 1 << 0;

/// Peer-to-peer reject code attached to every consensus failure
pub const REJECT_INVALID: u8 = 0x10;
