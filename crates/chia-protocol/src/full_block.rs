use chia_streamable_macro::streamable;

use crate::Bytes32;
use crate::EndOfSubSlotBundle;
use crate::RewardChainBlock;

/// A fully signed, infused block as it arrives over the wire, trimmed to
/// the fields the staging store inspects. As with [`crate::UnfinishedBlock`],
/// block-body fields (foliage, transactions) are out of scope (block body
/// execution is a non-goal of this store) and are not modelled; `header_hash`
/// is instead carried as an explicit field the way [`crate::BlockRecord`]
/// already does, since it would otherwise only be derivable from the
/// omitted foliage.
#[streamable]
pub struct FullBlock {
    finished_sub_slots: Vec<EndOfSubSlotBundle>,
    reward_chain_block: RewardChainBlock,
    header_hash: Bytes32,
    prev_header_hash: Bytes32,
    height: u32,
}
