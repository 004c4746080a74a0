//! Presentation timestamp reconstruction.

use crate::error::{FrameError, Result};

/// Reconstruct a pts from its coded form.
///
/// With `window = 2^msb_pts_shift`, a coded value below `window` carries only
/// the low bits of the timestamp: the result is the value congruent to it
/// modulo `window` that lies nearest `last_pts`, i.e. inside
/// `[last_pts - mask/2, last_pts + mask/2 + 1]`. Coded values at or above
/// `window` are full timestamps offset by `window`.
pub fn reconstruct_pts(coded_pts: u64, msb_pts_shift: u8, last_pts: i64) -> Result<i64> {
    let window = 1u64 << msb_pts_shift;
    if coded_pts >= window {
        return i64::try_from(coded_pts - window)
            .map_err(|_| FrameError::malformed(format!("coded pts {coded_pts} out of range")));
    }

    // window <= 2^62, so both fit an i64
    let mask = (window - 1) as i64;
    let coded = coded_pts as i64;
    let overflow = || FrameError::malformed(format!("pts overflow near last pts {last_pts}"));

    let delta = last_pts.checked_sub(mask / 2).ok_or_else(overflow)?;
    (coded.wrapping_sub(delta) & mask)
        .checked_add(delta)
        .ok_or_else(overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_representative_forward() {
        // delta = 1000 - 127 = 873; (130 - 873) mod 256 = 25
        assert_eq!(reconstruct_pts(130, 8, 1000).unwrap(), 898);
    }

    #[test]
    fn small_forward_step() {
        // last 1000 = 0x3e8, low byte 0xe8; next frame codes 0xe9
        assert_eq!(reconstruct_pts(0xe9, 8, 1000).unwrap(), 1001);
    }

    #[test]
    fn wraps_across_window_boundary() {
        // last 1020 (low byte 0xfc), next coded 0x02 => 1026
        assert_eq!(reconstruct_pts(0x02, 8, 1020).unwrap(), 1026);
    }

    #[test]
    fn backward_drift() {
        // last 1026 (low byte 0x02), coded 0xfc => 1020
        assert_eq!(reconstruct_pts(0xfc, 8, 1026).unwrap(), 1020);
    }

    #[test]
    fn near_zero_last_pts() {
        assert_eq!(reconstruct_pts(5, 7, 0).unwrap(), 5);
        // 120 is closer to 0 as -8 within a 128 window
        assert_eq!(reconstruct_pts(120, 7, 0).unwrap(), -8);
    }

    #[test]
    fn full_timestamp_above_window() {
        assert_eq!(reconstruct_pts(256 + 5000, 8, 1000).unwrap(), 5000);
        assert_eq!(reconstruct_pts(256, 8, 99_999).unwrap(), 0);
    }

    #[test]
    fn zero_shift_is_always_full() {
        assert_eq!(reconstruct_pts(1, 0, 777).unwrap(), 0);
        assert_eq!(reconstruct_pts(42, 0, 777).unwrap(), 41);
    }

    #[test]
    fn oversized_full_timestamp_rejected() {
        assert!(reconstruct_pts(u64::MAX, 0, 0).is_err());
    }

    #[test]
    fn overflow_near_extremes_rejected() {
        assert!(reconstruct_pts(0, 8, i64::MIN).is_err());
    }
}
