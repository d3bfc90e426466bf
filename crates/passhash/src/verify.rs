//! Constant-time comparison used by every `check` operation.

use std::hint::black_box;

/// Compares two byte strings in time that only depends on the length of the longer one.
///
/// Neither a length mismatch nor the position of the first differing byte ends the
/// comparison early. Missing bytes of the shorter input compare as zero, and the length
/// mismatch itself is folded into the accumulator, so inputs of different length never
/// compare equal.
pub fn equals(lhs: &[u8], rhs: &[u8]) -> bool {
    equals_visiting(lhs, rhs, |_| {})
}

fn equals_visiting(lhs: &[u8], rhs: &[u8], mut visit: impl FnMut(usize)) -> bool {
    let len = lhs.len().max(rhs.len());
    let mut diff = (lhs.len() ^ rhs.len()) as u64;
    for index in 0..len {
        visit(index);
        let l = lhs.get(index).copied().unwrap_or(0);
        let r = rhs.get(index).copied().unwrap_or(0);
        diff |= u64::from(l ^ r);
    }
    black_box(diff) == 0
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn equal_inputs() {
        assert!(equals(b"", b""));
        assert!(equals(b"abc", b"abc"));
    }

    #[test]
    fn different_inputs() {
        assert!(!equals(b"abc", b"abd"));
        assert!(!equals(b"abc", b"ab"));
        assert!(!equals(b"", b"a"));
    }

    #[test]
    fn trailing_zero_bytes_dont_match_shorter_input() {
        assert!(!equals(b"ab\0", b"ab"));
        assert!(!equals(b"ab", b"ab\0\0"));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(15)]
    #[case(31)]
    fn visits_every_byte_regardless_of_mismatch_position(#[case] mismatch_at: usize) {
        let lhs = [7u8; 32];
        let mut rhs = lhs;
        rhs[mismatch_at] ^= 1;

        let mut visited = 0;
        assert!(!equals_visiting(&lhs, &rhs, |_| visited += 1));
        assert_eq!(32, visited);
    }

    #[rstest]
    #[case(b"", b"abcdef")]
    #[case(b"abc", b"abcdef")]
    #[case(b"abcdef", b"x")]
    fn visits_every_byte_of_longer_input_on_length_mismatch(
        #[case] lhs: &[u8],
        #[case] rhs: &[u8],
    ) {
        let mut visited = Vec::new();
        assert!(!equals_visiting(lhs, rhs, |index| visited.push(index)));
        assert_eq!((0..lhs.len().max(rhs.len())).collect::<Vec<_>>(), visited);
    }

    #[test]
    fn visits_every_byte_when_equal() {
        let mut visited = 0;
        assert!(equals_visiting(b"password", b"password", |_| visited += 1));
        assert_eq!(8, visited);
    }
}
