use crate::chia_error::{Error, Result};
use chia_sha2::Sha256;
use std::io::Cursor;

/// Chia's binary serialization format: a fixed, self-describing encoding with
/// no type tags, used both on the wire and to compute a type's identity hash
/// (the hash of its streamed bytes, prefixed implicitly by field order).
///
/// `TRUSTED` selects between two parse modes: when `true` (data we produced
/// ourselves, or already validated), bounds and length checks that only
/// matter for hostile input are skipped; when `false` (anything received from
/// a peer) every length-prefixed field is checked against the remaining
/// buffer before it is read.
pub trait Streamable: Sized {
    fn update_digest(&self, digest: &mut Sha256);
    fn stream(&self, out: &mut Vec<u8>) -> Result<()>;
    fn parse<const TRUSTED: bool>(input: &mut Cursor<&[u8]>) -> Result<Self>;

    fn hash(&self) -> [u8; 32] {
        let mut digest = Sha256::new();
        self.update_digest(&mut digest);
        digest.finalize()
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.stream(&mut out)?;
        Ok(out)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        Self::parse::<false>(&mut cursor)
    }

    /// Like [`from_bytes`](Self::from_bytes), but skips hostile-input checks.
    /// Only use this on data this process produced or already validated.
    fn from_bytes_trusted(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        Self::parse::<true>(&mut cursor)
    }
}

pub(crate) fn read_bytes<'a>(input: &mut Cursor<&'a [u8]>, len: usize) -> Result<&'a [u8]> {
    let pos = input.position() as usize;
    let buf = *input.get_ref();
    if buf.len() < pos + len {
        return Err(Error::EndOfBuffer);
    }
    input.set_position((pos + len) as u64);
    Ok(&buf[pos..pos + len])
}

impl Streamable for bool {
    fn update_digest(&self, digest: &mut Sha256) {
        digest.update([u8::from(*self)]);
    }

    fn stream(&self, out: &mut Vec<u8>) -> Result<()> {
        out.push(u8::from(*self));
        Ok(())
    }

    fn parse<const TRUSTED: bool>(input: &mut Cursor<&[u8]>) -> Result<Self> {
        match read_bytes(input, 1)?[0] {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(Error::InvalidBool),
        }
    }
}

macro_rules! streamable_primitive {
    ($t:ty) => {
        impl Streamable for $t {
            fn update_digest(&self, digest: &mut Sha256) {
                digest.update(self.to_be_bytes());
            }

            fn stream(&self, out: &mut Vec<u8>) -> Result<()> {
                out.extend_from_slice(&self.to_be_bytes());
                Ok(())
            }

            fn parse<const TRUSTED: bool>(input: &mut Cursor<&[u8]>) -> Result<Self> {
                let buf = read_bytes(input, std::mem::size_of::<$t>())?;
                Ok(<$t>::from_be_bytes(buf.try_into().unwrap()))
            }
        }
    };
}

streamable_primitive!(u8);
streamable_primitive!(u16);
streamable_primitive!(u32);
streamable_primitive!(u64);
streamable_primitive!(u128);

impl<T: Streamable> Streamable for Option<T> {
    fn update_digest(&self, digest: &mut Sha256) {
        match self {
            None => false.update_digest(digest),
            Some(v) => {
                true.update_digest(digest);
                v.update_digest(digest);
            }
        }
    }

    fn stream(&self, out: &mut Vec<u8>) -> Result<()> {
        match self {
            None => false.stream(out),
            Some(v) => {
                true.stream(out)?;
                v.stream(out)
            }
        }
    }

    fn parse<const TRUSTED: bool>(input: &mut Cursor<&[u8]>) -> Result<Self> {
        match read_bytes(input, 1)?[0] {
            0 => Ok(None),
            1 => Ok(Some(T::parse::<TRUSTED>(input)?)),
            _ => Err(Error::InvalidOptional),
        }
    }
}

const MAX_SEQUENCE_LEN: u32 = 1024 * 1024 * 64;

impl<T: Streamable> Streamable for Vec<T> {
    fn update_digest(&self, digest: &mut Sha256) {
        (self.len() as u32).update_digest(digest);
        for item in self {
            item.update_digest(digest);
        }
    }

    fn stream(&self, out: &mut Vec<u8>) -> Result<()> {
        if self.len() as u64 > u32::MAX as u64 {
            return Err(Error::SequenceTooLarge);
        }
        (self.len() as u32).stream(out)?;
        for item in self {
            item.stream(out)?;
        }
        Ok(())
    }

    fn parse<const TRUSTED: bool>(input: &mut Cursor<&[u8]>) -> Result<Self> {
        let len = u32::parse::<TRUSTED>(input)?;
        if !TRUSTED && len > MAX_SEQUENCE_LEN {
            return Err(Error::SequenceTooLarge);
        }
        let mut out = Vec::with_capacity(len.min(MAX_SEQUENCE_LEN) as usize);
        for _ in 0..len {
            out.push(T::parse::<TRUSTED>(input)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_option() {
        let some: Option<u32> = Some(7);
        let bytes = some.to_bytes().unwrap();
        assert_eq!(Option::<u32>::from_bytes(&bytes).unwrap(), some);

        let none: Option<u32> = None;
        let bytes = none.to_bytes().unwrap();
        assert_eq!(Option::<u32>::from_bytes(&bytes).unwrap(), none);
    }

    #[test]
    fn roundtrip_vec() {
        let v = vec![1u64, 2, 3, 4];
        let bytes = v.to_bytes().unwrap();
        assert_eq!(Vec::<u64>::from_bytes(&bytes).unwrap(), v);
    }

    #[test]
    fn truncated_buffer_is_end_of_buffer() {
        let bytes = [0u8, 0, 0];
        assert_eq!(u32::from_bytes(&bytes), Err(Error::EndOfBuffer));
    }

    #[test]
    fn invalid_bool_byte_is_rejected() {
        let bytes = [2u8];
        assert_eq!(bool::from_bytes(&bytes), Err(Error::InvalidBool));
    }
}
