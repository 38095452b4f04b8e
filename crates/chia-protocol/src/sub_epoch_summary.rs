use chia_streamable_macro::streamable;

use crate::Bytes32;

/// Recorded once per sub-epoch boundary on the [`crate::BlockRecord`] that is
/// the first sub-block after it. The store only threads this through
/// unchanged; it never inspects the difficulty/sub-slot-iters schedule
/// itself (that belongs to block validation and epoch accounting).
#[streamable]
pub struct SubEpochSummary {
    prev_subepoch_summary_hash: Bytes32,
    reward_chain_hash: Bytes32,
    num_blocks_overflow: u8,
    new_difficulty: Option<u64>,
    new_sub_slot_iters: Option<u64>,
}
