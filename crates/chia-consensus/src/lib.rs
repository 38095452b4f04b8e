//! Consensus-level types and the in-memory staging store for a full node's
//! most recent chain tip: finished sub-slots and their signage points,
//! unfinished/candidate/disconnected blocks, and the future caches that hold
//! messages that arrived before their prerequisite infusion.

pub mod consensus_constants;
pub mod error;
pub mod full_node_store;
pub mod pot_iterations;
pub mod vdf;

pub use consensus_constants::ConsensusConstants;
pub use error::{Error, Result};
pub use full_node_store::FullNodeStore;
