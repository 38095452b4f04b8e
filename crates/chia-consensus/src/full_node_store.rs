use std::collections::{HashMap, HashSet};

use chia_protocol::{
    BlockRecord, Bytes32, ClassgroupElement, EndOfSubSlotBundle, FullBlock, NewInfusionPointVdf,
    SignagePoint, UnfinishedBlock, VDFInfo, VDFProof,
};
use chia_traits::Streamable;
use log::{debug, trace};

use crate::consensus_constants::ConsensusConstants;
use crate::error::{Error, Result};
use crate::pot_iterations::calculate_ip_iters;
use crate::vdf::validate_vdf_proof;

/// One entry of the slot ring: a finished sub-slot, its per-checkpoint
/// signage point table, and the cumulative iteration count at its end.
///
/// `signage_points[i]` holds the signage point at checkpoint `i`, or `None`
/// if it hasn't arrived yet. Index 0 is never populated; it is represented by
/// [`SignagePoint::empty`] at lookup time instead, since the slot's start
/// needs no VDF of its own.
#[derive(Debug, Clone)]
struct SlotEntry {
    eos: EndOfSubSlotBundle,
    signage_points: Vec<Option<SignagePoint>>,
    total_iters: u128,
}

impl SlotEntry {
    fn new(constants: &ConsensusConstants, eos: EndOfSubSlotBundle, total_iters: u128) -> Self {
        Self {
            eos,
            signage_points: vec![None; constants.num_sps_sub_slot as usize],
            total_iters,
        }
    }

    fn challenge_chain_hash(&self) -> Bytes32 {
        self.eos.challenge_chain.hash().into()
    }
}

/// A slot/reward-chain VDF proof check, in the shape every call site in
/// [`FullNodeStore::new_finished_sub_slot`] needs. In production this is
/// always [`validate_vdf_proof`]; tests substitute a stub so the store's own
/// chaining/defer logic can be exercised without a real prover.
type VdfValidator = fn(&VDFProof, &ClassgroupElement, &VDFInfo, &ConsensusConstants) -> bool;

/// The in-memory consensus staging store: the slot ring, the
/// unfinished/candidate/disconnected block tables, the seen-unfinished dedup
/// set, and the four future caches that defer messages until their
/// prerequisite infusion arrives.
///
/// All methods take `&mut self`; there is no internal locking. A single
/// owner drives the store from one event loop, and the borrow checker
/// statically prevents two in-flight mutations, which is a stronger
/// guarantee than unsynchronized access would give.
pub struct FullNodeStore {
    constants: ConsensusConstants,
    validate_proof: VdfValidator,

    finished_sub_slots: Vec<SlotEntry>,

    future_eos_cache: HashMap<Bytes32, Vec<EndOfSubSlotBundle>>,
    future_sp_cache: HashMap<Bytes32, Vec<SignagePoint>>,
    future_ip_cache: HashMap<Bytes32, Vec<NewInfusionPointVdf>>,
    future_sb_cache: HashMap<Bytes32, Vec<FullBlock>>,

    unfinished_blocks: HashMap<Bytes32, UnfinishedBlock>,
    candidate_blocks: HashMap<Bytes32, UnfinishedBlock>,
    disconnected_blocks: HashMap<Bytes32, FullBlock>,
    seen_unfinished_blocks: HashSet<Bytes32>,
}

impl FullNodeStore {
    pub fn new(constants: ConsensusConstants) -> Self {
        Self::with_proof_validator(constants, validate_vdf_proof)
    }

    fn with_proof_validator(constants: ConsensusConstants, validate_proof: VdfValidator) -> Self {
        Self {
            constants,
            validate_proof,
            finished_sub_slots: Vec::new(),
            future_eos_cache: HashMap::new(),
            future_sp_cache: HashMap::new(),
            future_ip_cache: HashMap::new(),
            future_sb_cache: HashMap::new(),
            unfinished_blocks: HashMap::new(),
            candidate_blocks: HashMap::new(),
            disconnected_blocks: HashMap::new(),
            seen_unfinished_blocks: HashSet::new(),
        }
    }

    pub fn constants(&self) -> &ConsensusConstants {
        &self.constants
    }

    fn clear_slots(&mut self) {
        self.finished_sub_slots.clear();
    }

    // ---- Slot ring (4.1) ----------------------------------------------

    /// Accept a new finished sub-slot, chaining it onto the back of the
    /// ring. Returns `false` for both reject and defer outcomes; the caller
    /// cannot and should not distinguish them (§7).
    pub fn new_finished_sub_slot(
        &mut self,
        eos: EndOfSubSlotBundle,
        sub_blocks: &HashMap<Bytes32, BlockRecord>,
        peak: &BlockRecord,
    ) -> bool {
        let Some(last) = self.finished_sub_slots.last() else {
            trace!("new_finished_sub_slot: rejected, ring is empty");
            return false;
        };
        let last_hash = last.challenge_chain_hash();
        let last_total_iters = last.total_iters;

        if eos.challenge_chain.challenge_chain_end_of_slot_vdf.challenge != last_hash {
            trace!("new_finished_sub_slot: rejected, does not chain from the last slot");
            return false;
        }

        let identity = ClassgroupElement::default();
        if !(self.validate_proof)(
            &eos.proofs.challenge_chain_slot_proof,
            &identity,
            &eos.challenge_chain.challenge_chain_end_of_slot_vdf,
            &self.constants,
        ) {
            trace!("new_finished_sub_slot: rejected, invalid challenge chain slot proof");
            return false;
        }
        if !(self.validate_proof)(
            &eos.proofs.reward_chain_slot_proof,
            &identity,
            &eos.reward_chain.end_of_slot_vdf,
            &self.constants,
        ) {
            trace!("new_finished_sub_slot: rejected, invalid reward chain slot proof");
            return false;
        }
        if let Some(icc) = &eos.infused_challenge_chain {
            let Some(icc_proof) = &eos.proofs.infused_challenge_chain_slot_proof else {
                trace!("new_finished_sub_slot: rejected, missing infused challenge chain proof");
                return false;
            };
            if !(self.validate_proof)(
                icc_proof,
                &identity,
                &icc.infused_challenge_chain_end_of_slot_vdf,
                &self.constants,
            ) {
                trace!("new_finished_sub_slot: rejected, invalid infused challenge chain slot proof");
                return false;
            }
        }

        let total_iters =
            last_total_iters + u128::from(eos.challenge_chain.challenge_chain_end_of_slot_vdf.number_of_iterations);

        if peak.total_iters > last_total_iters {
            // Peak is in this slot.
            let rc_challenge = eos.reward_chain.end_of_slot_vdf.challenge;
            if peak.reward_infusion_new_challenge != rc_challenge {
                trace!("new_finished_sub_slot: deferred, awaiting infusion {rc_challenge}");
                self.future_eos_cache.entry(rc_challenge).or_default().push(eos);
                return false;
            }
            if peak.total_iters + u128::from(eos.reward_chain.end_of_slot_vdf.number_of_iterations)
                != total_iters
            {
                trace!("new_finished_sub_slot: rejected, reward chain iteration count mismatch");
                return false;
            }

            if peak.deficit < self.constants.min_blocks_per_challenge_block {
                let mut curr = peak;
                while !curr.first_in_sub_slot()
                    && !curr.is_challenge_sub_block(self.constants.min_blocks_per_challenge_block)
                {
                    let Some(next) = sub_blocks.get(&curr.prev_hash) else {
                        trace!("new_finished_sub_slot: rejected, ancestor lookup ran off the map");
                        return false;
                    };
                    curr = next;
                }

                let icc_start_challenge_hash = if curr.is_challenge_sub_block(self.constants.min_blocks_per_challenge_block)
                {
                    curr.challenge_block_info_hash
                } else {
                    let Some(hashes) = curr.finished_infused_challenge_slot_hashes.as_ref() else {
                        trace!("new_finished_sub_slot: rejected, ancestor has no finished icc slot hashes");
                        return false;
                    };
                    let Some(last_hash) = hashes.last() else {
                        trace!("new_finished_sub_slot: rejected, ancestor's icc slot hash list is empty");
                        return false;
                    };
                    *last_hash
                };

                let Some(icc) = &eos.infused_challenge_chain else {
                    trace!("new_finished_sub_slot: rejected, expected an infused challenge chain");
                    return false;
                };
                if icc.infused_challenge_chain_end_of_slot_vdf.challenge != icc_start_challenge_hash {
                    trace!("new_finished_sub_slot: rejected, infused challenge chain does not chain");
                    return false;
                }
            }
        } else {
            // Empty slot after the peak.
            if eos.reward_chain.end_of_slot_vdf.challenge != last.eos.reward_chain.hash().into() {
                trace!("new_finished_sub_slot: rejected, reward chain does not chain from the last slot");
                return false;
            }

            if last.eos.reward_chain.deficit < self.constants.min_blocks_per_challenge_block {
                let Some(icc) = &eos.infused_challenge_chain else {
                    trace!("new_finished_sub_slot: rejected, expected an infused challenge chain");
                    return false;
                };
                let Some(last_icc) = &last.eos.infused_challenge_chain else {
                    trace!("new_finished_sub_slot: rejected, last slot has no infused challenge chain");
                    return false;
                };
                if icc.infused_challenge_chain_end_of_slot_vdf.challenge
                    != last_icc.hash().into()
                {
                    trace!("new_finished_sub_slot: rejected, infused challenge chain does not chain");
                    return false;
                }
            }
        }

        debug!("new_finished_sub_slot: accepted at total_iters {total_iters}");
        self.finished_sub_slots
            .push(SlotEntry::new(&self.constants, eos, total_iters));
        true
    }

    /// Place a signage point at `index` in the slot identified by
    /// `challenge_hash`. Returns `Ok(false)` if the slot isn't found.
    ///
    /// # Errors
    /// Returns a fatal [`Error::SignagePointIndexOutOfRange`] if the caller
    /// violates the precondition `0 < index < num_sps_sub_slot`.
    #[allow(clippy::too_many_arguments)]
    pub fn new_signage_point(
        &mut self,
        challenge_hash: Bytes32,
        index: u8,
        cc_vdf: VDFInfo,
        cc_proof: VDFProof,
        rc_vdf: VDFInfo,
        rc_proof: VDFProof,
    ) -> Result<bool> {
        if index == 0 || u32::from(index) >= self.constants.num_sps_sub_slot {
            return Err(Error::SignagePointIndexOutOfRange {
                index,
                limit: self.constants.num_sps_sub_slot,
            });
        }

        for slot in &mut self.finished_sub_slots {
            if slot.challenge_chain_hash() == challenge_hash {
                slot.signage_points[index as usize] = Some(SignagePoint::new(
                    Some(cc_vdf),
                    Some(cc_proof),
                    Some(rc_vdf),
                    Some(rc_proof),
                ));
                debug!("new_signage_point: accepted at index {index}");
                return Ok(true);
            }
        }
        trace!("new_signage_point: rejected, slot {challenge_hash} not found");
        Ok(false)
    }

    pub fn get_sub_slot(&self, challenge_hash: Bytes32) -> Option<(&EndOfSubSlotBundle, usize, u128)> {
        self.finished_sub_slots
            .iter()
            .enumerate()
            .find(|(_, slot)| slot.challenge_chain_hash() == challenge_hash)
            .map(|(index, slot)| (&slot.eos, index, slot.total_iters))
    }

    pub fn get_signage_point(&self, cc_sp_hash: Bytes32) -> Option<SignagePoint> {
        for slot in &self.finished_sub_slots {
            if slot.challenge_chain_hash() == cc_sp_hash {
                return Some(SignagePoint::empty());
            }
            for sp in slot.signage_points.iter().flatten() {
                if let Some(cc_vdf) = &sp.cc_vdf {
                    if cc_vdf.hash() == <[u8; 32]>::from(cc_sp_hash) {
                        return Some(sp.clone());
                    }
                }
            }
        }
        None
    }

    pub fn get_signage_point_by_index(
        &self,
        challenge_hash: Bytes32,
        index: u8,
        last_rc_infusion: Bytes32,
    ) -> Option<SignagePoint> {
        for slot in &self.finished_sub_slots {
            if slot.challenge_chain_hash() != challenge_hash {
                continue;
            }
            if index == 0 {
                return Some(SignagePoint::empty());
            }
            let sp = slot.signage_points.get(index as usize)?.as_ref()?;
            return match &sp.rc_vdf {
                Some(rc_vdf) if rc_vdf.challenge == last_rc_infusion => Some(sp.clone()),
                _ => None,
            };
        }
        None
    }

    // ---- Peak transition (4.2) ----------------------------------------

    /// Adopt a new peak, pruning or resetting the ring, then replay the
    /// EOS future cache entry keyed by the peak's infusion challenge.
    ///
    /// # Errors
    /// Propagates iteration-count formula errors from malformed
    /// `peak`/constants combinations (see [`crate::pot_iterations`]).
    pub fn new_peak(
        &mut self,
        peak: &BlockRecord,
        peak_sub_slot: EndOfSubSlotBundle,
        total_iters: u128,
        prev_sub_slot: Option<EndOfSubSlotBundle>,
        prev_sub_slot_total_iters: Option<u128>,
        reorg: bool,
        sub_blocks: &HashMap<Bytes32, BlockRecord>,
    ) -> Result<Option<EndOfSubSlotBundle>> {
        let peak_sub_slot_hash = peak_sub_slot.challenge_chain.hash();
        let prev_sub_slot_hash = prev_sub_slot.as_ref().map(|s| s.challenge_chain.hash());

        let mut truncated = false;
        if !reorg {
            let sub_slot_iters = peak.sub_slot_iters;
            let checkpoint_size = sub_slot_iters / u64::from(self.constants.num_sps_sub_slot);
            let ip_iters = calculate_ip_iters(
                self.constants.num_sps_sub_slot,
                peak.signage_point_index,
                self.constants.num_sp_intervals_extra,
                sub_slot_iters,
                peak.required_iters,
            )?;
            let sps_to_keep = (ip_iters / checkpoint_size + 1) as usize;

            if self
                .finished_sub_slots
                .iter()
                .any(|s| s.challenge_chain_hash() == Bytes32::from(peak_sub_slot_hash))
            {
                for slot in &mut self.finished_sub_slots {
                    if slot.challenge_chain_hash() == Bytes32::from(peak_sub_slot_hash) {
                        for (i, sp) in slot.signage_points.iter_mut().enumerate() {
                            if i >= sps_to_keep {
                                *sp = None;
                            }
                        }
                    }
                }
                self.finished_sub_slots.retain(|s| {
                    let hash = s.challenge_chain_hash();
                    hash == Bytes32::from(peak_sub_slot_hash)
                        || prev_sub_slot_hash.is_some_and(|h| hash == Bytes32::from(h))
                });
                truncated = true;
            }
        }

        if !truncated {
            debug!("new_peak: resetting the slot ring");
            self.clear_slots();
            if let (Some(prev), Some(prev_total_iters)) = (prev_sub_slot, prev_sub_slot_total_iters) {
                self.finished_sub_slots
                    .push(SlotEntry::new(&self.constants, prev, prev_total_iters));
            }
            self.finished_sub_slots
                .push(SlotEntry::new(&self.constants, peak_sub_slot, total_iters));
        }

        let challenge = peak.reward_infusion_new_challenge;
        if let Some(deferred) = self.future_eos_cache.remove(&challenge) {
            for eos in deferred {
                if self.new_finished_sub_slot(eos.clone(), sub_blocks, peak) {
                    debug!("new_peak: replayed deferred EOS for {challenge}");
                    return Ok(Some(eos));
                }
            }
        }
        Ok(None)
    }

    /// Return the finished sub-slots strictly between `prev_sb`'s own
    /// last-persisted slot and `pos_challenge_hash`, inclusive of the
    /// positional slot when `extra_sub_slot` is set.
    ///
    /// # Errors
    /// Fatal if either endpoint cannot be located in the ring or the chain.
    pub fn get_finished_sub_slots(
        &self,
        prev_sb: Option<&BlockRecord>,
        sub_block_records: &HashMap<Bytes32, BlockRecord>,
        pos_challenge_hash: Bytes32,
        extra_sub_slot: bool,
    ) -> Result<Vec<EndOfSubSlotBundle>> {
        let final_sub_slot_in_chain = if let Some(prev_sb) = prev_sb {
            let mut curr = prev_sb;
            while !curr.first_in_sub_slot() {
                curr = sub_block_records
                    .get(&curr.prev_hash)
                    .ok_or_else(|| Error::SubSlotNotFound(curr.prev_hash))?;
            }
            *curr
                .finished_challenge_slot_hashes
                .as_ref()
                .and_then(|hashes| hashes.last())
                .ok_or(Error::SubSlotNotFound(curr.header_hash))?
        } else {
            self.constants.genesis_challenge
        };

        let mut pos_index = None;
        let mut final_index = None;
        for (index, slot) in self.finished_sub_slots.iter().enumerate() {
            let hash = slot.challenge_chain_hash();
            if hash == pos_challenge_hash {
                pos_index = Some(index);
            }
            if hash == final_sub_slot_in_chain {
                final_index = Some(index);
            }
        }

        let pos_index = pos_index.ok_or(Error::SubSlotNotFound(pos_challenge_hash))?;
        let final_index = final_index.ok_or(Error::SubSlotNotFound(final_sub_slot_in_chain))?;

        let new_final_index = if extra_sub_slot { pos_index + 1 } else { pos_index };
        let end = new_final_index.min(self.finished_sub_slots.len().saturating_sub(1));

        // `pos_index` can precede `final_index` in the ring (the positional
        // slot isn't necessarily ahead of the last-persisted one); the
        // Python original's equivalent slice with a start past its stop
        // yields an empty list rather than erroring, so mirror that instead
        // of indexing into an inverted range.
        if end < final_index + 1 {
            return Ok(Vec::new());
        }

        Ok(self.finished_sub_slots[final_index + 1..=end]
            .iter()
            .map(|s| s.eos.clone())
            .collect())
    }

    // ---- Future caches (4.3) -------------------------------------------

    pub fn add_to_future_sp(&mut self, sp: SignagePoint) {
        let Some(rc_vdf) = &sp.rc_vdf else {
            return;
        };
        self.future_sp_cache.entry(rc_vdf.challenge).or_default().push(sp);
    }

    /// Drain and return the signage points deferred on `rc_challenge_hash`.
    pub fn get_future_sp(&mut self, rc_challenge_hash: Bytes32) -> Vec<SignagePoint> {
        self.future_sp_cache.remove(&rc_challenge_hash).unwrap_or_default()
    }

    pub fn add_to_future_ip(&mut self, infusion_point: NewInfusionPointVdf) {
        let challenge = infusion_point.reward_chain_ip_vdf.challenge;
        self.future_ip_cache.entry(challenge).or_default().push(infusion_point);
    }

    /// Drain and return the infusion points deferred on `rc_challenge_hash`.
    pub fn get_future_ip(&mut self, rc_challenge_hash: Bytes32) -> Vec<NewInfusionPointVdf> {
        self.future_ip_cache.remove(&rc_challenge_hash).unwrap_or_default()
    }

    pub fn add_to_future_sb(&mut self, block: FullBlock) {
        let challenge = block.reward_chain_block.reward_chain_ip_vdf.challenge;
        self.future_sb_cache.entry(challenge).or_default().push(block);
    }

    /// Drain and return the full blocks deferred on `rc_challenge_hash`.
    pub fn get_future_sb(&mut self, rc_challenge_hash: Bytes32) -> Vec<FullBlock> {
        self.future_sb_cache.remove(&rc_challenge_hash).unwrap_or_default()
    }

    // ---- Unfinished / candidate / disconnected blocks (4.4) ------------

    pub fn add_unfinished_block(&mut self, block: UnfinishedBlock) {
        self.unfinished_blocks
            .insert(block.reward_chain_sub_block_hash(), block);
    }

    pub fn get_unfinished_block(&self, unfinished_reward_hash: Bytes32) -> Option<&UnfinishedBlock> {
        self.unfinished_blocks.get(&unfinished_reward_hash)
    }

    pub fn get_unfinished_blocks(&self) -> &HashMap<Bytes32, UnfinishedBlock> {
        &self.unfinished_blocks
    }

    pub fn remove_unfinished_block(&mut self, partial_reward_hash: Bytes32) {
        self.unfinished_blocks.remove(&partial_reward_hash);
    }

    pub fn clear_unfinished_blocks_below(&mut self, height: u32) {
        self.unfinished_blocks.retain(|_, block| block.height >= height);
    }

    pub fn add_candidate_block(&mut self, quality_string: Bytes32, unfinished_block: UnfinishedBlock) {
        self.candidate_blocks.insert(quality_string, unfinished_block);
    }

    pub fn get_candidate_block(&self, quality_string: Bytes32) -> Option<&UnfinishedBlock> {
        self.candidate_blocks.get(&quality_string)
    }

    pub fn clear_candidate_blocks_below(&mut self, height: u32) {
        self.candidate_blocks.retain(|_, block| block.height >= height);
    }

    pub fn add_disconnected_block(&mut self, block: FullBlock) {
        self.disconnected_blocks.insert(block.header_hash, block);
    }

    pub fn get_disconnected_block(&self, header_hash: Bytes32) -> Option<&FullBlock> {
        self.disconnected_blocks.get(&header_hash)
    }

    pub fn get_disconnected_block_by_prev(&self, prev_header_hash: Bytes32) -> Option<&FullBlock> {
        self.disconnected_blocks
            .values()
            .find(|block| block.prev_header_hash == prev_header_hash)
    }

    pub fn clear_disconnected_blocks_below(&mut self, height: u32) {
        self.disconnected_blocks.retain(|_, block| block.height >= height);
    }

    /// Returns whether `temp_header_hash` had already been seen, inserting
    /// it either way.
    pub fn seen_unfinished_block(&mut self, temp_header_hash: Bytes32) -> bool {
        !self.seen_unfinished_blocks.insert(temp_header_hash)
    }

    pub fn clear_seen_unfinished_blocks(&mut self) {
        self.seen_unfinished_blocks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus_constants::test_constants;
    use chia_protocol::{
        ChallengeChainSubSlot, InfusedChallengeChainSubSlot, RewardChainSubSlot, SubSlotProofs,
    };

    fn vdf(challenge: Bytes32, iters: u64) -> VDFInfo {
        VDFInfo::new(challenge, iters, ClassgroupElement::default())
    }

    fn proof() -> VDFProof {
        VDFProof::new(0, Default::default(), true)
    }

    fn eos(
        cc_challenge: Bytes32,
        rc_challenge: Bytes32,
        iters: u64,
        icc: Option<(Bytes32, u64)>,
    ) -> EndOfSubSlotBundle {
        let infused_challenge_chain = icc.map(|(challenge, icc_iters)| {
            InfusedChallengeChainSubSlot::new(vdf(challenge, icc_iters))
        });
        EndOfSubSlotBundle::new(
            ChallengeChainSubSlot::new(vdf(cc_challenge, iters), None, None, None, None),
            infused_challenge_chain.clone(),
            RewardChainSubSlot::new(vdf(rc_challenge, iters), Bytes32::from([0; 32]), None, 16),
            SubSlotProofs::new(proof(), infused_challenge_chain.map(|_| proof()), proof()),
        )
    }

    fn genesis_block_record(constants: &ConsensusConstants, total_iters: u128) -> BlockRecord {
        BlockRecord::new(
            Bytes32::from([0; 32]),
            Bytes32::from([0; 32]),
            0,
            0,
            total_iters,
            0,
            ClassgroupElement::default(),
            None,
            Bytes32::from([0xaa; 32]),
            Bytes32::from([0; 32]),
            constants.sub_slot_iters_starting,
            Bytes32::from([0; 32]),
            Bytes32::from([0; 32]),
            1,
            16,
            false,
            0,
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            None,
        )
    }

    fn seeded_store() -> (FullNodeStore, BlockRecord) {
        let constants = test_constants();
        let mut store = FullNodeStore::new(constants.clone());
        let peak = genesis_block_record(&constants, 1000);
        let seed = eos(Bytes32::from([1; 32]), Bytes32::from([0xaa; 32]), 1, None);
        store.finished_sub_slots.push(SlotEntry::new(&constants, seed, 1000));
        (store, peak)
    }

    fn accept_all(
        _proof: &VDFProof,
        _input: &ClassgroupElement,
        _info: &VDFInfo,
        _constants: &ConsensusConstants,
    ) -> bool {
        true
    }

    /// Like [`eos`], but lets the challenge and reward chain VDFs carry
    /// different iteration counts, which [`eos`] can't express.
    fn eos_with_iters(
        cc_challenge: Bytes32,
        cc_iters: u64,
        rc_challenge: Bytes32,
        rc_iters: u64,
    ) -> EndOfSubSlotBundle {
        EndOfSubSlotBundle::new(
            ChallengeChainSubSlot::new(vdf(cc_challenge, cc_iters), None, None, None, None),
            None,
            RewardChainSubSlot::new(vdf(rc_challenge, rc_iters), Bytes32::from([0; 32]), None, 16),
            SubSlotProofs::new(proof(), None, proof()),
        )
    }

    /// A slot with a fabricated (zero-witness) proof never validates against a
    /// real discriminant, so chaining is rejected at the proof check rather
    /// than accepted. This exercises the same call path the happy path would
    /// take, short of a real prover.
    #[test]
    fn fabricated_vdf_proof_is_rejected() {
        let (mut store, peak) = seeded_store();
        let sub_blocks = HashMap::new();

        let seed_hash: Bytes32 = store.finished_sub_slots[0].eos.challenge_chain.hash().into();
        let seed_rc_hash: Bytes32 = store.finished_sub_slots[0].eos.reward_chain.hash().into();
        let candidate = eos(seed_hash, seed_rc_hash, 100, None);
        assert!(!store.new_finished_sub_slot(candidate, &sub_blocks, &peak));
        assert_eq!(store.finished_sub_slots.len(), 1);
    }

    #[test]
    fn rejects_when_ring_is_empty() {
        let constants = test_constants();
        let mut store = FullNodeStore::new(constants.clone());
        let sub_blocks = HashMap::new();
        let peak = genesis_block_record(&constants, 0);

        let candidate = eos(Bytes32::from([1; 32]), Bytes32::from([2; 32]), 100, None);
        assert!(!store.new_finished_sub_slot(candidate, &sub_blocks, &peak));
    }

    #[test]
    fn non_chaining_eos_is_rejected() {
        let (mut store, peak) = seeded_store();
        let sub_blocks = HashMap::new();

        let bogus = eos(Bytes32::from([0xff; 32]), Bytes32::from([2; 32]), 100, None);
        assert!(!store.new_finished_sub_slot(bogus, &sub_blocks, &peak));
        assert_eq!(store.finished_sub_slots.len(), 1);
        assert!(store.future_eos_cache.is_empty());
    }

    /// Mirrors [`fabricated_vdf_proof_is_rejected`] for the "peak is in this
    /// slot" branch: proof validation runs before the defer check, so a
    /// fabricated proof is rejected rather than queued on the EOS future
    /// cache.
    #[test]
    fn proof_validation_happens_before_defer_check() {
        let constants = test_constants();
        let mut store = FullNodeStore::new(constants.clone());
        let sub_blocks = HashMap::new();

        let seed = eos(Bytes32::from([1; 32]), Bytes32::from([0xaa; 32]), 1, None);
        let seed_hash: Bytes32 = seed.challenge_chain.hash().into();
        store.finished_sub_slots.push(SlotEntry::new(&constants, seed, 1000));

        let peak = genesis_block_record(&constants, 1050);
        let r2 = Bytes32::from([0xbb; 32]);
        let candidate = eos(seed_hash, r2, 100, None);
        assert!(!store.new_finished_sub_slot(candidate, &sub_blocks, &peak));
        assert!(store.future_eos_cache.is_empty());
    }

    #[test]
    fn chaining_eos_with_valid_proof_grows_the_ring() {
        let constants = test_constants();
        let mut store = FullNodeStore::with_proof_validator(constants.clone(), accept_all);
        let seed = eos(Bytes32::from([1; 32]), Bytes32::from([0xaa; 32]), 1, None);
        let seed_hash: Bytes32 = seed.challenge_chain.hash().into();
        let seed_rc_hash: Bytes32 = seed.reward_chain.hash().into();
        store.finished_sub_slots.push(SlotEntry::new(&constants, seed, 1000));

        let peak = genesis_block_record(&constants, 1000);
        let sub_blocks = HashMap::new();
        let candidate = eos(seed_hash, seed_rc_hash, 100, None);
        assert!(store.new_finished_sub_slot(candidate, &sub_blocks, &peak));
        assert_eq!(store.finished_sub_slots.len(), 2);
    }

    #[test]
    fn deferred_eos_is_replayed_on_new_peak() {
        let constants = test_constants();
        let mut store = FullNodeStore::with_proof_validator(constants.clone(), accept_all);
        let seed = eos(Bytes32::from([1; 32]), Bytes32::from([0xaa; 32]), 1, None);
        let seed_hash: Bytes32 = seed.challenge_chain.hash().into();
        store.finished_sub_slots.push(SlotEntry::new(&constants, seed.clone(), 1000));

        let mut peak = genesis_block_record(&constants, 1050);
        let sub_blocks = HashMap::new();

        let deferred_challenge = Bytes32::from([0xbb; 32]);
        let candidate = eos_with_iters(seed_hash, 100, deferred_challenge, 50);
        assert!(!store.new_finished_sub_slot(candidate, &sub_blocks, &peak));
        assert_eq!(
            store.future_eos_cache.get(&deferred_challenge).map(Vec::len),
            Some(1)
        );

        peak.reward_infusion_new_challenge = deferred_challenge;
        let replayed = store
            .new_peak(&peak, seed, 1000, None, None, false, &sub_blocks)
            .unwrap();
        assert!(replayed.is_some());
        assert!(!store.future_eos_cache.contains_key(&deferred_challenge));
        assert_eq!(store.finished_sub_slots.len(), 2);
    }

    #[test]
    fn overflow_peak_truncates_signage_points() {
        let constants = test_constants();
        let mut store = FullNodeStore::new(constants.clone());
        let seed = eos(Bytes32::from([1; 32]), Bytes32::from([0xaa; 32]), 1, None);
        let mut slot = SlotEntry::new(&constants, seed.clone(), 1000);
        for i in 1..constants.num_sps_sub_slot as usize {
            slot.signage_points[i] = Some(SignagePoint::new(
                Some(vdf(Bytes32::from([i as u8; 32]), 1)),
                Some(proof()),
                Some(vdf(Bytes32::from([i as u8; 32]), 1)),
                Some(proof()),
            ));
        }
        store.finished_sub_slots.push(slot);

        let mut peak = genesis_block_record(&constants, 1000);
        peak.sub_slot_iters = constants.sub_slot_iters_starting;
        peak.signage_point_index = 1;
        peak.required_iters = 1;

        let sub_blocks = HashMap::new();
        store
            .new_peak(&peak, seed, 1000, None, None, false, &sub_blocks)
            .unwrap();

        let sps = &store.finished_sub_slots[0].signage_points;
        for (i, sp) in sps.iter().enumerate() {
            if i < 5 {
                assert!(i == 0 || sp.is_some(), "index {i} should be retained");
            } else {
                assert!(sp.is_none(), "index {i} should be cleared");
            }
        }
    }

    #[test]
    fn reorg_resets_ring_to_prev_and_peak() {
        let constants = test_constants();
        let mut store = FullNodeStore::new(constants.clone());
        let stale = eos(Bytes32::from([9; 32]), Bytes32::from([10; 32]), 1, None);
        store.finished_sub_slots.push(SlotEntry::new(&constants, stale, 1));

        let prev = eos(Bytes32::from([1; 32]), Bytes32::from([2; 32]), 1, None);
        let prev_hash = Bytes32::from(prev.challenge_chain.hash());
        let peak_slot = eos(prev_hash, Bytes32::from([3; 32]), 1, None);
        let peak_hash = Bytes32::from(peak_slot.challenge_chain.hash());

        let peak = genesis_block_record(&constants, 2000);
        let sub_blocks = HashMap::new();
        store
            .new_peak(&peak, peak_slot, 2000, Some(prev), Some(1000), true, &sub_blocks)
            .unwrap();

        assert_eq!(
            store
                .finished_sub_slots
                .iter()
                .map(SlotEntry::challenge_chain_hash)
                .collect::<Vec<_>>(),
            vec![prev_hash, peak_hash]
        );
    }

    #[test]
    fn signage_point_index_zero_is_sentinel() {
        let (store, _peak) = seeded_store();
        let hash = store.finished_sub_slots[0].challenge_chain_hash();
        let sp = store
            .get_signage_point_by_index(hash, 0, Bytes32::from([0xff; 32]))
            .unwrap();
        assert_eq!(sp, SignagePoint::empty());
    }

    #[test]
    fn finished_sub_slots_slice_math() {
        let constants = test_constants();
        let mut store = FullNodeStore::new(constants.clone());
        let mut hashes = Vec::new();
        for i in 0..5u8 {
            let seed = eos(Bytes32::from([i; 32]), Bytes32::from([0x10 + i; 32]), 1, None);
            hashes.push(Bytes32::from(seed.challenge_chain.hash()));
            store
                .finished_sub_slots
                .push(SlotEntry::new(&constants, seed, 1000 + u128::from(i)));
        }

        let mut prev_sb = genesis_block_record(&constants, 0);
        prev_sb.finished_challenge_slot_hashes = Some(vec![hashes[1]]);
        let sub_blocks = HashMap::new();

        let without_extra = store
            .get_finished_sub_slots(Some(&prev_sb), &sub_blocks, hashes[3], false)
            .unwrap();
        assert_eq!(
            without_extra
                .iter()
                .map(|e| Bytes32::from(e.challenge_chain.hash()))
                .collect::<Vec<_>>(),
            vec![hashes[2], hashes[3]]
        );

        let with_extra = store
            .get_finished_sub_slots(Some(&prev_sb), &sub_blocks, hashes[3], true)
            .unwrap();
        assert_eq!(
            with_extra
                .iter()
                .map(|e| Bytes32::from(e.challenge_chain.hash()))
                .collect::<Vec<_>>(),
            vec![hashes[2], hashes[3], hashes[4]]
        );
    }

    #[test]
    fn seen_unfinished_block_dedup() {
        let constants = test_constants();
        let mut store = FullNodeStore::new(constants);
        let h = Bytes32::from([9; 32]);
        assert!(!store.seen_unfinished_block(h));
        assert!(store.seen_unfinished_block(h));
        store.clear_seen_unfinished_blocks();
        assert!(!store.seen_unfinished_block(h));
    }

    #[test]
    fn new_signage_point_rejects_out_of_range_index() {
        let constants = test_constants();
        let limit = constants.num_sps_sub_slot;
        let mut store = FullNodeStore::new(constants);
        let err = store
            .new_signage_point(
                Bytes32::from([1; 32]),
                0,
                vdf(Bytes32::from([1; 32]), 1),
                proof(),
                vdf(Bytes32::from([1; 32]), 1),
                proof(),
            )
            .unwrap_err();
        assert_eq!(err, Error::SignagePointIndexOutOfRange { index: 0, limit });
    }

    #[test]
    fn unfinished_block_table_prunes_by_height() {
        let constants = test_constants();
        let mut store = FullNodeStore::new(constants);
        let low = UnfinishedBlock::new(
            vec![],
            chia_protocol::RewardChainBlockUnfinished::new(
                0,
                1,
                Bytes32::from([1; 32]),
                dummy_pos(),
                None,
                Default::default(),
                None,
                Default::default(),
            ),
            None,
            None,
            5,
        );
        let high = UnfinishedBlock::new(
            vec![],
            chia_protocol::RewardChainBlockUnfinished::new(
                0,
                1,
                Bytes32::from([2; 32]),
                dummy_pos(),
                None,
                Default::default(),
                None,
                Default::default(),
            ),
            None,
            None,
            20,
        );
        store.add_unfinished_block(low);
        store.add_unfinished_block(high);
        assert_eq!(store.get_unfinished_blocks().len(), 2);
        store.clear_unfinished_blocks_below(10);
        assert_eq!(store.get_unfinished_blocks().len(), 1);
    }

    fn dummy_pos() -> chia_protocol::ProofOfSpace {
        chia_protocol::ProofOfSpace::new(
            Bytes32::from([0; 32]),
            None,
            None,
            Default::default(),
            32,
            Default::default(),
        )
    }
}
