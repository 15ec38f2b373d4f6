// ==============================================================================
// "Did You Mean?" Suggestions for Unknown Type Names
// ==============================================================================
//
// When a field references a type that is not in the reflection graph, the
// error carries the closest known qualified name, if one is near enough.

/// Levenshtein edit distance between two strings, counted in chars.
pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b_chars.len();
    }

    // Two-row DP; `prev[j]` is the distance between the processed prefix of
    // `a` and the first `j` chars of `b`.
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != *cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b_chars.len()]
}

/// Maximum edit distance for a suggestion to count as close.
pub(crate) fn max_edit_distance(name_len: usize) -> usize {
    if name_len <= 4 { 1 } else { 2 }
}

fn simple_part(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Find the known qualified name closest to `unresolved`.
///
/// Compares both whole qualified names and their last segments, since typos
/// usually land in the type name rather than the package. Returns a ready-made
/// help line, or `None` when nothing is close enough.
pub(crate) fn suggest_similar_name<'a>(
    unresolved: &str,
    known: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    let unresolved = unresolved.trim_start_matches('.');
    let simple = simple_part(unresolved);

    let mut best: Option<(&str, usize)> = None;
    for candidate in known {
        let full = levenshtein(unresolved, candidate);
        let full_ok = full <= max_edit_distance(unresolved.len().min(candidate.len()));

        let candidate_simple = simple_part(candidate);
        let part = levenshtein(simple, candidate_simple);
        let part_ok = part <= max_edit_distance(simple.len().min(candidate_simple.len()));

        let dist = match (full_ok, part_ok) {
            (true, true) => full.min(part),
            (true, false) => full,
            (false, true) => part,
            (false, false) => continue,
        };
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((candidate, dist));
        }
    }

    best.map(|(name, _)| format!("did you mean `{name}`?"))
}
