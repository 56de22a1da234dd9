use ahash::{AHashMap, AHashSet};

/// Renames repeated column names by appending `_<n>`, where `n` is the 1-based
/// occurrence count of that name so far: `a, a, b, a` becomes `a, a_2, b, a_3`.
///
/// Names present in the input are never handed out as generated names, so a
/// suffix that would collide keeps counting up until it is free. Already
/// unique input is returned unchanged.
pub fn dedup_column_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut taken: AHashSet<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
    let mut occurrences: AHashMap<&str, usize> = AHashMap::new();

    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let count = occurrences.entry(name).or_insert(0);
            *count += 1;
            if *count == 1 {
                return name.to_string();
            }

            let mut suffix = *count;
            let mut candidate = format!("{name}_{suffix}");
            while taken.contains(&candidate) {
                suffix += 1;
                candidate = format!("{name}_{suffix}");
            }
            taken.insert(candidate.clone());
            candidate
        })
        .collect()
}
