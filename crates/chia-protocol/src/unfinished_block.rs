use chia_streamable_macro::streamable;

use crate::Bytes32;
use crate::EndOfSubSlotBundle;
use crate::RewardChainBlockUnfinished;
use crate::VDFProof;
use chia_traits::Streamable;

/// A candidate block the farmer has assembled a proof-of-space and reward
/// chain trunk for, but that hasn't yet been signed or infused into the
/// chain with a full VDF proof.
///
/// Block-body fields (foliage, the transactions generator, additions and
/// removals) are out of scope for this store (it never executes or
/// validates a block's body) and are intentionally not modelled here; only
/// the header-identity and reward-chain-linkage fields the store inspects
/// are kept.
#[streamable]
pub struct UnfinishedBlock {
    finished_sub_slots: Vec<EndOfSubSlotBundle>,
    reward_chain_block: RewardChainBlockUnfinished,
    challenge_chain_sp_proof: Option<VDFProof>,
    reward_chain_sp_proof: Option<VDFProof>,
    height: u32,
}

impl UnfinishedBlock {
    pub fn reward_chain_sub_block_hash(&self) -> Bytes32 {
        self.reward_chain_block.hash().into()
    }
}
