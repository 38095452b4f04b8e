mod error;

pub use error::{Error, Result};

use chia_sha2::Sha256;
use chia_traits::{chia_error, read_bytes, Streamable};
use std::fmt;
use std::io::Cursor;

/// A compressed BLS12-381 G1 point: a plot or farmer public key.
///
/// This crate carries only the wire representation of BLS elements. The
/// store never verifies a plot or farmer signature itself (that happens
/// earlier, in full node block validation); it just needs to stream the
/// key bytes that travel with a [`crate::ProofOfSpace`] unchanged.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct G1Element([u8; 48]);

impl G1Element {
    pub const SIZE: usize = 48;

    pub const fn new(bytes: [u8; 48]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(self) -> [u8; 48] {
        self.0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl Default for G1Element {
    fn default() -> Self {
        Self([0; 48])
    }
}

impl fmt::Debug for G1Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl TryFrom<&[u8]> for G1Element {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        Ok(Self(value.try_into().map_err(|_| Error::WrongG1Length)?))
    }
}

impl Streamable for G1Element {
    fn update_digest(&self, digest: &mut Sha256) {
        digest.update(self.0);
    }

    fn stream(&self, out: &mut Vec<u8>) -> chia_error::Result<()> {
        out.extend_from_slice(&self.0);
        Ok(())
    }

    fn parse<const TRUSTED: bool>(input: &mut Cursor<&[u8]>) -> chia_error::Result<Self> {
        Ok(Self(read_bytes(input, 48)?.try_into().unwrap()))
    }
}

/// A compressed BLS12-381 G2 point: an aggregated signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct G2Element([u8; 96]);

impl G2Element {
    pub const SIZE: usize = 96;

    pub const fn new(bytes: [u8; 96]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(self) -> [u8; 96] {
        self.0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl Default for G2Element {
    fn default() -> Self {
        Self([0; 96])
    }
}

impl fmt::Debug for G2Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl TryFrom<&[u8]> for G2Element {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        Ok(Self(value.try_into().map_err(|_| Error::WrongG2Length)?))
    }
}

impl Streamable for G2Element {
    fn update_digest(&self, digest: &mut Sha256) {
        digest.update(self.0);
    }

    fn stream(&self, out: &mut Vec<u8>) -> chia_error::Result<()> {
        out.extend_from_slice(&self.0);
        Ok(())
    }

    fn parse<const TRUSTED: bool>(input: &mut Cursor<&[u8]>) -> chia_error::Result<Self> {
        Ok(Self(read_bytes(input, 96)?.try_into().unwrap()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn g1_roundtrip() {
        let bytes = [7u8; 48];
        let el = G1Element::new(bytes);
        let mut out = Vec::new();
        el.stream(&mut out).unwrap();
        assert_eq!(out, bytes);
    }

    #[test]
    fn g2_parse_rejects_short_buffer() {
        let buf = [0u8; 10];
        let mut cursor = Cursor::new(&buf[..]);
        assert!(G2Element::parse::<false>(&mut cursor).is_err());
    }
}
