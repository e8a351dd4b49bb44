//! Edit distance and similarity scoring.

/// Unit-cost Levenshtein distance over Unicode scalar values.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Single-row DP: prev[j] is the distance between a[..i] and b[..j]
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j]
            } else {
                1 + prev[j].min(prev[j + 1]).min(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Similarity in [0, 100] between two strings, case-insensitive.
///
/// Containment scores at least 70, scaled by the length ratio. Otherwise the
/// score is the edit distance normalised by the longer string's length.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    let (longer, shorter) = if a.chars().count() >= b.chars().count() {
        (&a, &b)
    } else {
        (&b, &a)
    };
    let longer_len = longer.chars().count();
    let shorter_len = shorter.chars().count();

    if longer_len == 0 {
        return 100.0;
    }

    if longer.contains(shorter.as_str()) {
        return 70.0 + 30.0 * (shorter_len as f64 / longer_len as f64);
    }

    let distance = levenshtein(longer, shorter);
    100.0 * (1.0 - distance as f64 / longer_len as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_basics() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("加平教會", "加平教會"), 0);
        assert_eq!(levenshtein("加平教會", "佳會"), 3);
    }

    #[test]
    fn test_levenshtein_symmetric() {
        let pairs = [("flaw", "lawn"), ("加樂活動中心", "加平教會"), ("a", "")];
        for (a, b) in pairs {
            assert_eq!(levenshtein(a, b), levenshtein(b, a));
            assert_eq!(levenshtein(a, a), 0);
        }
    }

    #[test]
    fn test_containment_floor() {
        assert_eq!(similarity("加平教會", "教會"), 85.0);
        assert_eq!(similarity("教會", "加平教會"), 85.0);
        assert_eq!(similarity("Church", "church"), 100.0);
    }

    #[test]
    fn test_edit_distance_branch() {
        // 3 edits over 4 characters
        assert_eq!(similarity("加平教會", "佳會"), 25.0);
        assert_eq!(similarity("", ""), 100.0);
    }

    #[test]
    fn test_similarity_symmetric() {
        let pairs = [("加平", "加平教會"), ("abcd", "abxd"), ("Farm", "farmhouse")];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a));
        }
    }
}
