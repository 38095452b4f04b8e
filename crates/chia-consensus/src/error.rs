use chia_protocol::Bytes32;
use thiserror::Error;

use crate::pot_iterations::IterationsError;

/// Fatal errors from the staging store: conditions that indicate a
/// programmer error or a corrupted call sequence rather than a chain message
/// that simply arrived too early or doesn't apply. Those latter cases are
/// represented as `false`/`None` returns, not as `Err`; see the module-level
/// docs on [`crate::full_node_store::FullNodeStore`] for the reject/defer/fatal
/// split.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("sub slot {0} not found in the ring")]
    SubSlotNotFound(Bytes32),

    #[error("signage point index {index} out of range, limit {limit}")]
    SignagePointIndexOutOfRange { index: u8, limit: u32 },

    #[error("iteration count error: {0}")]
    Iterations(#[from] IterationsError),
}

pub type Result<T> = std::result::Result<T, Error>;
