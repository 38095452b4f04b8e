mod block_record;
mod bytes;
mod classgroup;
mod coin;
mod end_of_sub_slot_bundle;
mod full_block;
mod proof_of_space;
mod reward_chain_block;
mod signage_point;
mod slots;
mod sub_epoch_summary;
mod timelord;
mod unfinished_block;
mod vdf;

pub use block_record::BlockRecord;
pub use bytes::{Bytes, Bytes32, Bytes48, Bytes96, Bytes100};
pub use classgroup::ClassgroupElement;
pub use coin::Coin;
pub use end_of_sub_slot_bundle::EndOfSubSlotBundle;
pub use full_block::FullBlock;
pub use proof_of_space::ProofOfSpace;
pub use reward_chain_block::{RewardChainBlock, RewardChainBlockUnfinished};
pub use signage_point::SignagePoint;
pub use slots::{
    ChallengeBlockInfo, ChallengeChainSubSlot, InfusedChallengeChainSubSlot, RewardChainSubSlot,
    SubSlotProofs,
};
pub use sub_epoch_summary::SubEpochSummary;
pub use timelord::NewInfusionPointVdf;
pub use unfinished_block::UnfinishedBlock;
pub use vdf::{VDFInfo, VDFProof};
