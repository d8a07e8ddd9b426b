//! "Did you mean?" suggestions for undefined names
//!
//! Uses Levenshtein edit distance with a length-dependent threshold so that
//! short names only match near-identical candidates.

/// Minimum number of single-character edits turning `a` into `b`.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row: Vec<usize> = vec![0; b_len + 1];

    for (i, a_char) in a.chars().enumerate() {
        curr_row[0] = i + 1;

        for (j, b_char) in b.chars().enumerate() {
            let cost = usize::from(a_char != b_char);

            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}

/// Largest edit distance still worth suggesting for a name of this length.
fn default_threshold(name_len: usize) -> usize {
    match name_len {
        0 => 0,
        1..=2 => 1,
        3..=5 => 2,
        6..=10 => 3,
        n => (n / 2).min(5),
    }
}

/// Closest candidate within the threshold for `name`, if any.
///
/// Ties keep the first candidate seen, so callers should yield the most
/// relevant candidates (innermost scope) first.
pub fn suggest_similar<'a>(
    name: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<&'a str> {
    if name.is_empty() {
        return None;
    }

    let threshold = default_threshold(name.chars().count());
    let mut best: Option<(&str, usize)> = None;

    for candidate in candidates {
        if candidate == name {
            continue;
        }
        let len_diff = name.chars().count().abs_diff(candidate.chars().count());
        if len_diff > threshold {
            continue;
        }

        let distance = edit_distance(name, candidate);
        if distance > threshold {
            continue;
        }

        match best {
            Some((_, best_distance)) if best_distance <= distance => {}
            _ => best = Some((candidate, distance)),
        }
    }

    best.map(|(candidate, _)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("same", "same"), 0);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("", "ab"), 2);
    }

    #[test]
    fn test_suggests_closest() {
        let names = ["print", "input", "len"];
        assert_eq!(suggest_similar("pritn", names), Some("print"));
        assert_eq!(suggest_similar("lne", names), Some("len"));
    }

    #[test]
    fn test_no_suggestion_when_too_far() {
        let names = ["print", "input"];
        assert_eq!(suggest_similar("zzzzzzz", names), None);
        assert_eq!(suggest_similar("", names), None);
    }

    #[test]
    fn test_first_candidate_wins_ties() {
        assert_eq!(suggest_similar("ab", ["ac", "ad"]), Some("ac"));
    }
}
