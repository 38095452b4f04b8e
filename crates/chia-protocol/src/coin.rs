use crate::Bytes32;
use chia_sha2::Sha256;
use chia_streamable_macro::streamable;

/// A coin's identity is the hash of its parent, puzzle hash and amount, with
/// the amount encoded the same way CLVM encodes integers (no leading zero
/// bytes, and a leading zero only to disambiguate a high bit that would
/// otherwise read as negative). The store never spends or validates coins;
/// it only carries `reward_claims_incorporated` through [`crate::BlockRecord`]
/// unchanged.
#[streamable]
#[derive(Copy)]
pub struct Coin {
    parent_coin_info: Bytes32,
    puzzle_hash: Bytes32,
    amount: u64,
}

impl Coin {
    pub fn coin_id(&self) -> Bytes32 {
        let mut hasher = Sha256::new();
        hasher.update(self.parent_coin_info);
        hasher.update(self.puzzle_hash);

        let amount_bytes = self.amount.to_be_bytes();
        if self.amount >= 0x8000_0000_0000_0000_u64 {
            hasher.update([0_u8]);
            hasher.update(amount_bytes);
        } else {
            let start = match self.amount {
                n if n >= 0x0080_0000_0000_0000_u64 => 0,
                n if n >= 0x8000_0000_0000_u64 => 1,
                n if n >= 0x0080_0000_0000_u64 => 2,
                n if n >= 0x8000_0000_u64 => 3,
                n if n >= 0x0080_0000_u64 => 4,
                n if n >= 0x8000_u64 => 5,
                n if n >= 0x80_u64 => 6,
                n if n > 0 => 7,
                _ => 8,
            };
            hasher.update(&amount_bytes[start..]);
        }

        Bytes32::new(hasher.finalize())
    }
}
