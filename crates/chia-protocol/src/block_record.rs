use chia_streamable_macro::streamable;

use crate::{Bytes32, ClassgroupElement, Coin, SubEpochSummary};

/// The full node's per-block bookkeeping record. This is not part of the
/// consensus-hashed block itself; it is the efficient in-memory shape the
/// chain keeps around so that later blocks, difficulty adjustments and the
/// staging store can be validated without holding the whole header block.
///
/// The staging store treats this type as read-only: it is supplied by
/// reference from the validator's canonical `sub_blocks` map and the store
/// never constructs or mutates one itself.
#[streamable]
pub struct BlockRecord {
    header_hash: Bytes32,
    /// Header hash of the previous block.
    prev_hash: Bytes32,
    height: u32,
    /// Total cumulative difficulty of all ancestor blocks since genesis.
    weight: u128,
    /// Total number of VDF iterations since genesis, including this block.
    total_iters: u128,
    signage_point_index: u8,
    /// The intermediary VDF output at ip_iters in the challenge chain.
    challenge_vdf_output: ClassgroupElement,
    /// The intermediary VDF output at ip_iters in the infused challenge
    /// chain, present iff `deficit <= 3`.
    infused_challenge_vdf_output: Option<ClassgroupElement>,
    /// The reward chain infusion output; input to the next VDF.
    reward_infusion_new_challenge: Bytes32,
    /// Hash of challenge chain data, used to validate end-of-slot bundles
    /// that finish against this block later.
    challenge_block_info_hash: Bytes32,
    /// The network's sub_slot_iters parameter in this block's epoch.
    sub_slot_iters: u64,
    pool_puzzle_hash: Bytes32,
    farmer_puzzle_hash: Bytes32,
    /// The number of iterations required for this proof of space.
    required_iters: u64,
    /// A deficit of `MIN_SUB_BLOCKS_PER_CHALLENGE_BLOCK` is an overflow
    /// block right after an infusion; one less than that is a challenge
    /// block.
    deficit: u8,
    overflow: bool,
    prev_transaction_block_height: u32,

    // Present iff this is a transaction block.
    timestamp: Option<u64>,
    prev_transaction_block_hash: Option<Bytes32>,
    fees: Option<u64>,
    reward_claims_incorporated: Option<Vec<Coin>>,

    // Present iff this is the first sub-block in its sub-slot.
    finished_challenge_slot_hashes: Option<Vec<Bytes32>>,
    finished_infused_challenge_slot_hashes: Option<Vec<Bytes32>>,
    finished_reward_slot_hashes: Option<Vec<Bytes32>>,

    // Present iff this is the first sub-block after a sub-epoch.
    sub_epoch_summary_included: Option<SubEpochSummary>,
}

impl BlockRecord {
    pub fn is_transaction_block(&self) -> bool {
        self.timestamp.is_some()
    }

    pub fn first_in_sub_slot(&self) -> bool {
        self.finished_challenge_slot_hashes.is_some()
    }

    pub fn is_challenge_sub_block(&self, min_blocks_per_challenge_block: u8) -> bool {
        self.deficit == min_blocks_per_challenge_block - 1
    }
}
