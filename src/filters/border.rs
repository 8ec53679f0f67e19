//! Out-of-range index mapping for neighbourhood filters.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderMode {
    /// Repeat the edge pixel (`aaa|abc|ccc`).
    Replicate,
    /// Mirror around the edge pixel without repeating it (`cb|abc|ba`).
    Reflect101,
}

/// Map a possibly out-of-range index into `0..len`. `len` must be non-zero.
#[inline]
pub fn map_index(i: isize, len: usize, mode: BorderMode) -> usize {
    debug_assert!(len > 0);
    match mode {
        BorderMode::Replicate => i.clamp(0, len as isize - 1) as usize,
        BorderMode::Reflect101 => {
            if len == 1 {
                return 0;
            }
            let period = (2 * len - 2) as isize;
            let r = i.rem_euclid(period) as usize;
            if r < len {
                r
            } else {
                period as usize - r
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replicate_clamps() {
        assert_eq!(map_index(-3, 5, BorderMode::Replicate), 0);
        assert_eq!(map_index(4, 5, BorderMode::Replicate), 4);
        assert_eq!(map_index(9, 5, BorderMode::Replicate), 4);
    }

    #[test]
    fn reflect101_mirrors_without_repeating_edge() {
        let expected = [(-3, 3), (-2, 2), (-1, 1), (0, 0), (4, 4), (5, 3), (6, 2), (7, 1)];
        for (i, want) in expected {
            assert_eq!(map_index(i, 5, BorderMode::Reflect101), want, "i={i}");
        }
        for i in -4..=4 {
            assert_eq!(map_index(i, 1, BorderMode::Reflect101), 0);
        }
    }
}
