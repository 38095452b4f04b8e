use crate::{VDFInfo, VDFProof};

/// A signage point as held in a slot ring entry's checkpoint table: the
/// challenge-chain and reward-chain VDF/proof pairs for one checkpoint
/// index. Index 0 of every slot is represented by the all-`None` sentinel
/// returned by [`SignagePoint::empty`], since the slot's start needs no VDF
/// of its own.
///
/// Unlike [`crate::VDFInfo`] or [`crate::VDFProof`], this type is never
/// streamed whole over the wire — it is an in-memory aggregate the store
/// hands back to its caller, so it carries no `Streamable` impl.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignagePoint {
    pub cc_vdf: Option<VDFInfo>,
    pub cc_proof: Option<VDFProof>,
    pub rc_vdf: Option<VDFInfo>,
    pub rc_proof: Option<VDFProof>,
}

impl SignagePoint {
    pub fn new(
        cc_vdf: Option<VDFInfo>,
        cc_proof: Option<VDFProof>,
        rc_vdf: Option<VDFInfo>,
        rc_proof: Option<VDFProof>,
    ) -> Self {
        Self {
            cc_vdf,
            cc_proof,
            rc_vdf,
            rc_proof,
        }
    }

    /// The sentinel signage point for checkpoint index 0.
    pub fn empty() -> Self {
        Self::default()
    }
}
