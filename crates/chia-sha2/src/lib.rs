use sha2::Digest;

/// Incremental SHA-256, used to compute the tree-hash identity of streamable
/// wire types. A thin wrapper so the rest of the workspace doesn't depend on
/// the `sha2` crate's `Digest` trait directly, and so an OpenSSL-backed
/// implementation could be swapped in behind the same API.
#[derive(Clone)]
pub struct Sha256(sha2::Sha256);

impl Sha256 {
    pub fn new() -> Self {
        Self(sha2::Sha256::new())
    }

    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        self.0.update(data.as_ref());
    }

    pub fn finalize(self) -> [u8; 32] {
        self.0.finalize().into()
    }
}

impl Default for Sha256 {
    fn default() -> Self {
        Self::new()
    }
}
