use thiserror::Error;

/// Errors raised by the proof-of-time iteration-count formulas. These are
/// caller errors: an out of range `signage_point_index` or a `sub_slot_iters`
/// that doesn't evenly divide into signage point intervals indicates a bug in
/// the caller, not a condition the chain itself can reach once `num_sps_sub_slot`
/// has been validated to divide `sub_slot_iters_starting`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IterationsError {
    #[error("SP index {0} too high, limit {1}")]
    SignagePointIndexTooHigh(u8, u32),
    #[error("sub_slot_iters {0} is not a multiple of num_sps_sub_slot {1}")]
    NotMultipleOfSpsSubSlot(u64, u32),
    #[error("invalid sp iters {sp_iters} for sub_slot_iters {sub_slot_iters}")]
    InvalidSpIters { sp_iters: u64, sub_slot_iters: u64 },
    #[error("required_iters {required_iters} not below sp_interval_iters {sp_interval_iters}")]
    RequiredItersTooHigh {
        required_iters: u64,
        sp_interval_iters: u64,
    },
}

/// Whether `signage_point_index` falls in the last `num_sp_intervals_extra`
/// checkpoints of the slot, meaning the signage and infusion point for the
/// block land in the following sub-slot (an "overflow" block).
pub fn is_overflow_block(
    num_sps_sub_slot: u32,
    num_sp_intervals_extra: u8,
    signage_point_index: u8,
) -> Result<bool, IterationsError> {
    if u32::from(signage_point_index) >= num_sps_sub_slot {
        return Err(IterationsError::SignagePointIndexTooHigh(
            signage_point_index,
            num_sps_sub_slot,
        ));
    }
    Ok(u32::from(signage_point_index) >= num_sps_sub_slot - u32::from(num_sp_intervals_extra))
}

/// The number of VDF iterations between two adjacent signage points.
pub fn calculate_sp_interval_iters(
    num_sps_sub_slot: u32,
    sub_slot_iters: u64,
) -> Result<u64, IterationsError> {
    if sub_slot_iters % u64::from(num_sps_sub_slot) != 0 {
        return Err(IterationsError::NotMultipleOfSpsSubSlot(
            sub_slot_iters,
            num_sps_sub_slot,
        ));
    }
    Ok(sub_slot_iters / u64::from(num_sps_sub_slot))
}

/// The number of VDF iterations from the start of the sub-slot to checkpoint
/// `signage_point_index`.
pub fn calculate_sp_iters(
    num_sps_sub_slot: u32,
    signage_point_index: u8,
    sub_slot_iters: u64,
) -> Result<u64, IterationsError> {
    if u32::from(signage_point_index) >= num_sps_sub_slot {
        return Err(IterationsError::SignagePointIndexTooHigh(
            signage_point_index,
            num_sps_sub_slot,
        ));
    }
    Ok(calculate_sp_interval_iters(num_sps_sub_slot, sub_slot_iters)? * u64::from(signage_point_index))
}

/// The number of VDF iterations from the start of the sub-slot to the
/// infusion point of a block with the given signage point and required
/// iterations, wrapping into the next sub-slot for overflow blocks.
pub fn calculate_ip_iters(
    num_sps_sub_slot: u32,
    signage_point_index: u8,
    num_sp_intervals_extra: u8,
    sub_slot_iters: u64,
    required_iters: u64,
) -> Result<u64, IterationsError> {
    let sp_interval_iters = calculate_sp_interval_iters(num_sps_sub_slot, sub_slot_iters)?;
    let sp_iters = calculate_sp_iters(num_sps_sub_slot, signage_point_index, sub_slot_iters)?;

    if sp_iters % sp_interval_iters != 0 || sp_iters > sub_slot_iters {
        return Err(IterationsError::InvalidSpIters {
            sp_iters,
            sub_slot_iters,
        });
    }
    if required_iters >= sp_interval_iters || required_iters == 0 {
        return Err(IterationsError::RequiredItersTooHigh {
            required_iters,
            sp_interval_iters,
        });
    }

    Ok((sp_iters + u64::from(num_sp_intervals_extra) * sp_interval_iters + required_iters)
        % sub_slot_iters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(32, 3, 0, Ok(false))]
    #[case(32, 3, 28, Ok(false))]
    #[case(32, 3, 29, Ok(true))]
    #[case(32, 3, 31, Ok(true))]
    fn overflow_block(
        #[case] num_sps_sub_slot: u32,
        #[case] num_sp_intervals_extra: u8,
        #[case] sp_index: u8,
        #[case] expected: Result<bool, IterationsError>,
    ) {
        assert_eq!(
            is_overflow_block(num_sps_sub_slot, num_sp_intervals_extra, sp_index),
            expected
        );
    }

    #[test]
    fn overflow_block_out_of_range() {
        assert!(is_overflow_block(32, 3, 32).is_err());
    }

    #[test]
    fn sp_interval_iters() {
        assert_eq!(calculate_sp_interval_iters(32, 32 * 1000).unwrap(), 1000);
        assert!(calculate_sp_interval_iters(32, 33).is_err());
    }

    #[test]
    fn sp_iters() {
        assert_eq!(calculate_sp_iters(32, 5, 32 * 1000).unwrap(), 5000);
        assert!(calculate_sp_iters(32, 32, 32 * 1000).is_err());
    }

    #[test]
    fn ip_iters() {
        let sub_slot_iters = 32 * 1000;
        let ip = calculate_ip_iters(32, 5, 3, sub_slot_iters, 10).unwrap();
        assert_eq!(ip, 5000 + 3 * 1000 + 10);
    }

    #[test]
    fn ip_iters_rejects_zero_required() {
        assert!(calculate_ip_iters(32, 5, 3, 32 * 1000, 0).is_err());
    }
}
