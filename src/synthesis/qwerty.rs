//! QWERTY adjacency for typo injection
//!
//! A synthesized typo substitutes a physically adjacent key, which is
//! what real slips look like. Layout is US QWERTY, lowercase letters and
//! digits only; characters off the map never get typos.

/// Physically adjacent keys for a character, or an empty slice
pub fn neighbors(c: char) -> &'static [char] {
    match c {
        'q' => &['w', 'a', '1', '2'],
        'w' => &['q', 'e', 'a', 's', '2', '3'],
        'e' => &['w', 'r', 's', 'd', '3', '4'],
        'r' => &['e', 't', 'd', 'f', '4', '5'],
        't' => &['r', 'y', 'f', 'g', '5', '6'],
        'y' => &['t', 'u', 'g', 'h', '6', '7'],
        'u' => &['y', 'i', 'h', 'j', '7', '8'],
        'i' => &['u', 'o', 'j', 'k', '8', '9'],
        'o' => &['i', 'p', 'k', 'l', '9', '0'],
        'p' => &['o', 'l', '0'],
        'a' => &['q', 'w', 's', 'z'],
        's' => &['a', 'd', 'w', 'e', 'z', 'x'],
        'd' => &['s', 'f', 'e', 'r', 'x', 'c'],
        'f' => &['d', 'g', 'r', 't', 'c', 'v'],
        'g' => &['f', 'h', 't', 'y', 'v', 'b'],
        'h' => &['g', 'j', 'y', 'u', 'b', 'n'],
        'j' => &['h', 'k', 'u', 'i', 'n', 'm'],
        'k' => &['j', 'l', 'i', 'o', 'm'],
        'l' => &['k', 'o', 'p'],
        'z' => &['a', 's', 'x'],
        'x' => &['z', 'c', 's', 'd'],
        'c' => &['x', 'v', 'd', 'f'],
        'v' => &['c', 'b', 'f', 'g'],
        'b' => &['v', 'n', 'g', 'h'],
        'n' => &['b', 'm', 'h', 'j'],
        'm' => &['n', 'j', 'k'],
        '1' => &['2', 'q'],
        '2' => &['1', '3', 'q', 'w'],
        '3' => &['2', '4', 'w', 'e'],
        '4' => &['3', '5', 'e', 'r'],
        '5' => &['4', '6', 'r', 't'],
        '6' => &['5', '7', 't', 'y'],
        '7' => &['6', '8', 'y', 'u'],
        '8' => &['7', '9', 'u', 'i'],
        '9' => &['8', '0', 'i', 'o'],
        '0' => &['9', 'o', 'p'],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_have_neighbors() {
        for c in 'a'..='z' {
            assert!(!neighbors(c).is_empty(), "{c} has no neighbors");
        }
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        for c in ('a'..='z').chain('0'..='9') {
            for &n in neighbors(c) {
                assert!(
                    neighbors(n).contains(&c),
                    "{c} lists {n} but not vice versa"
                );
            }
        }
    }

    #[test]
    fn test_unmapped_chars_are_empty() {
        assert!(neighbors(' ').is_empty());
        assert!(neighbors('.').is_empty());
        assert!(neighbors('A').is_empty());
        assert!(neighbors('é').is_empty());
    }
}
