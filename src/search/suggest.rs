//! Autocomplete: recent history first, then what the backend offers.

pub const MIN_QUERY_CHARS: usize = 2;
pub const HISTORY_SUGGESTIONS: usize = 3;
pub const BACKEND_SUGGESTIONS: usize = 5;

/// Drops blanks and repeats, keeping entries that contain `query` case-insensitively.
pub fn merge_suggestions(query: &str, history: &[String], backend: &[String]) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    let mut merged: Vec<String> = Vec::new();

    let candidates = history
        .iter()
        .take(HISTORY_SUGGESTIONS)
        .chain(backend.iter().take(BACKEND_SUGGESTIONS));
    for candidate in candidates {
        let candidate = candidate.trim();
        if candidate.is_empty() || merged.iter().any(|m| m == candidate) {
            continue;
        }
        if candidate.to_lowercase().contains(&needle) {
            merged.push(candidate.to_string());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn history_first_then_backend() {
        let history = strings(&["mesa roble", "sofá", "mesa baja", "mesa vidrio"]);
        let backend = strings(&["Mesa Nórdica", "mesa roble", "Mesa Auxiliar"]);
        assert_eq!(
            merge_suggestions("mesa", &history, &backend),
            strings(&["mesa roble", "mesa baja", "Mesa Nórdica", "Mesa Auxiliar"])
        );
    }

    #[test]
    fn limits_each_source() {
        let backend = strings(&["a1", "a2", "a3", "a4", "a5", "a6"]);
        assert_eq!(merge_suggestions("a", &[], &backend).len(), BACKEND_SUGGESTIONS);
    }

    #[test]
    fn drops_blank_entries() {
        let history = strings(&["  ", "", "lamp"]);
        assert_eq!(merge_suggestions("", &history, &strings(&["\t"])), strings(&["lamp"]));
    }
}
