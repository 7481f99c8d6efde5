//! Logarithmic bucket selection

/// Pick up to `count` bucket indices, logarithmically spaced between `min` and `max`
///
/// Index `i` is `min * 10^(i * step)` truncated to an integer, with
/// `step = (log10(max) - log10(min)) / (count - 1)`.  All indices are clamped to
/// `[ceil(min), floor(max)]`.
///
/// At the low end, neighboring indices collapse onto the same integer.  These duplicates are
/// removed, so **the result can be shorter than `count`**.  Size anything that depends on the
/// buckets from the returned length.
///
/// # Example
/// ```
/// # use vis_core::analyzer::log_buckets;
/// let buckets = log_buckets(1.0, 100.0, 10);
///
/// // 1.0 and 1.67 both truncate to 1
/// assert_eq!(buckets.len(), 9);
/// assert_eq!(&buckets[..8], &[1, 2, 4, 7, 12, 21, 35, 59]);
/// assert!(log_buckets(1.0, 20000.0, 100).len() < 100);
/// ```
pub fn log_buckets(min: f64, max: f64, count: usize) -> Vec<usize> {
    let low = min.ceil() as usize;
    let high = max.floor() as usize;

    if count == 0 || low > high {
        return Vec::new();
    }
    if count == 1 {
        return vec![low];
    }

    let step = (max.log10() - min.log10()) / (count - 1) as f64;

    let mut buckets = (0..count)
        .map(|i| {
            let idx = (min * 10f64.powf(i as f64 * step)) as usize;
            idx.max(low).min(high)
        })
        .collect::<Vec<_>>();

    buckets.dedup();
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_ordering(buckets: &[usize], min: f64, max: f64) {
        for w in buckets.windows(2) {
            assert!(w[0] < w[1], "{:?} not strictly increasing", w);
        }
        for b in buckets.iter() {
            assert!(*b as f64 >= min && *b as f64 <= max, "{} outside range", b);
        }
    }

    #[test]
    fn test_monotonic() {
        for (min, max) in [
            (20.0, 20000.0),
            (1.0, 20000.0),
            (1.0, 2.0),
            (100.0, 110.0),
            (20.5, 19999.5),
            (3.0, 22050.0),
        ]
        .iter()
        .cloned()
        {
            for count in [2, 3, 10, 100, 1000, 5000].iter().cloned() {
                println!("Parameters: {:7.1}-{:7.1}, count {:4}", min, max, count);
                let buckets = log_buckets(min, max, count);

                assert!(!buckets.is_empty());
                assert!(buckets.len() <= count);
                check_ordering(&buckets, min, max);
            }
        }
    }

    #[test]
    fn test_audible_range() {
        let buckets = log_buckets(20.0, 20000.0, 100);

        assert!(buckets.len() <= 100);
        assert_eq!(buckets[0], 20);
        assert!(*buckets.last().unwrap() >= 19999);
        check_ordering(&buckets, 20.0, 20000.0);

        // Deterministic
        assert_eq!(buckets, log_buckets(20.0, 20000.0, 100));
    }

    #[test]
    fn test_collapse() {
        // The low end of this range is denser than one integer per bucket
        let buckets = log_buckets(1.0, 20000.0, 100);

        assert!(buckets.len() < 100);
        assert_eq!(&buckets[..3], &[1, 2, 3]);
        check_ordering(&buckets, 1.0, 20000.0);
        assert_eq!(buckets, log_buckets(1.0, 20000.0, 100));
    }

    #[test]
    fn test_degenerate() {
        assert!(log_buckets(20.0, 200.0, 0).is_empty());
        assert_eq!(log_buckets(20.0, 200.0, 1), &[20]);
        assert!(log_buckets(20.2, 20.8, 10).is_empty());
    }
}
