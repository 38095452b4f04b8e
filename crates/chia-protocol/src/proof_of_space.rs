use crate::bytes::{Bytes, Bytes32};
use chia_bls::G1Element;
use chia_streamable_macro::streamable;

/// A plot's eligibility proof for a given sub-slot challenge.
///
/// Pool protocol v2 and non-v1 plot formats are out of scope here; the store
/// only needs the challenge/size/proof bytes to decide eligibility and to
/// identify a candidate block by its proof-of-space hash.
#[streamable]
pub struct ProofOfSpace {
    challenge: Bytes32,
    pool_public_key: Option<G1Element>,
    pool_contract_puzzle_hash: Option<Bytes32>,
    plot_public_key: G1Element,
    size: u8,
    proof: Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chia_traits::Streamable;

    #[test]
    fn proof_of_space_roundtrip() {
        let pos = ProofOfSpace::new(
            Bytes32::from([7u8; 32]),
            None,
            None,
            G1Element::default(),
            32,
            Bytes::from(vec![1, 2, 3]),
        );

        let buf = pos.to_bytes().unwrap();
        let parsed = ProofOfSpace::from_bytes(&buf).unwrap();
        assert_eq!(parsed.size, 32);
        assert_eq!(parsed.challenge, pos.challenge);
    }
}
