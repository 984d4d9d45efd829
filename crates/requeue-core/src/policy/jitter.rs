//! Delay arithmetic for exponential backoff.
//!
//! For attempt `k` (0-based) with base delay `D`:
//! - nominal delay `N(k) = D * 2^k`, saturating at `u64::MAX`
//! - actual delay `N(k) + uniform[0, 2 * N(k)]`, so always within `[N(k), 3 * N(k)]`
//!
//! The lower bound grows monotonically with `k`; the spread keeps simultaneous failures from retrying in lockstep.
use rand::Rng;

/// Nominal (jitter-free) delay for the given attempt.
pub fn nominal_ms(delay_ms: u64, attempt: u32) -> u64 {
    let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
    delay_ms.saturating_mul(factor)
}

/// Nominal delay plus a random spread of up to twice the nominal value.
pub fn jittered_ms<R>(delay_ms: u64, attempt: u32, rng: &mut R) -> u64
where
    R: Rng,
{
    let nominal = nominal_ms(delay_ms, attempt);
    if nominal == 0 {
        return 0;
    }
    let spread = rng.gen_range(0..=nominal.saturating_mul(2));
    nominal.saturating_add(spread)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn nominal_doubles_per_attempt() {
        assert_eq!(nominal_ms(1_000, 0), 1_000);
        assert_eq!(nominal_ms(1_000, 1), 2_000);
        assert_eq!(nominal_ms(1_000, 4), 16_000);
    }

    #[test]
    fn nominal_saturates_instead_of_overflowing() {
        assert_eq!(nominal_ms(1_000, 64), u64::MAX);
        assert_eq!(nominal_ms(u64::MAX / 2, 3), u64::MAX);
    }

    #[test]
    fn jitter_stays_within_one_to_three_times_nominal() {
        let mut rng = StdRng::seed_from_u64(7);
        for attempt in 0..8 {
            let nominal = nominal_ms(250, attempt);
            for _ in 0..200 {
                let d = jittered_ms(250, attempt, &mut rng);
                assert!(
                    (nominal..=nominal * 3).contains(&d),
                    "attempt {attempt}: {d} outside [{nominal}, {}]",
                    nominal * 3
                );
            }
        }
    }

    #[test]
    fn zero_base_delay_means_immediate() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(jittered_ms(0, 5, &mut rng), 0);
    }
}
