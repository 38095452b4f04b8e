pub use chia_consensus as consensus;
pub use chia_protocol as protocol;

pub use chia_consensus::{ConsensusConstants, Error, FullNodeStore, Result};
