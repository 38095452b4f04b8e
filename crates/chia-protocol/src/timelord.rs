use chia_streamable_macro::streamable;

use crate::Bytes32;
use crate::VDFInfo;
use crate::VDFProof;

/// The message a timelord sends once it has infused a sub-block into the
/// reward chain. The store only inspects `reward_chain_ip_vdf.challenge`
/// (the key under which it is deferred in `future_ip_cache` when the
/// infused sub-block itself hasn't arrived yet); the remaining proofs are
/// opaque cargo the caller forwards to block validation.
#[streamable]
pub struct NewInfusionPointVdf {
    unfinished_reward_hash: Bytes32,
    challenge_chain_ip_vdf: VDFInfo,
    challenge_chain_ip_proof: VDFProof,
    reward_chain_ip_vdf: VDFInfo,
    reward_chain_ip_proof: VDFProof,
    infused_challenge_chain_ip_vdf: Option<VDFInfo>,
    infused_challenge_chain_ip_proof: Option<VDFProof>,
}
