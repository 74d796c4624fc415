/// Result of running a query against one buffer's text.
///
/// Recomputed from scratch on every query or buffer change. Offsets are
/// invalidated by any edit, so staleness is resolved by full recomputation,
/// never by patching.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    pub query: String,
    /// Strictly increasing 0-based character offsets of each match start.
    pub matches: Vec<usize>,
    /// Index into `matches`, or `None` when there are no matches.
    pub current: Option<usize>,
}

impl SearchState {
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Character offset of the current match, when one exists.
    #[must_use]
    pub fn current_offset(&self) -> Option<usize> {
        self.current.and_then(|i| self.matches.get(i).copied())
    }
}

/// Folds a character for case-insensitive comparison.
///
/// One char maps to exactly one char so match offsets stay aligned with the
/// original text; multi-char lowercase expansions keep their first char.
#[inline]
fn fold(ch: char) -> char {
    let mut lower = ch.to_lowercase();
    let first = lower.next().unwrap_or(ch);
    if lower.next().is_some() { ch } else { first }
}

/// Finds all matches of `query` in `text`: literal (no pattern syntax),
/// case-insensitive, non-overlapping, scanning strictly forward so an
/// occurrence can never start before the previous occurrence's end.
///
/// An empty query yields no matches.
#[must_use]
pub fn find_matches(text: &str, query: &str) -> Vec<usize> {
    if query.is_empty() {
        return Vec::new();
    }

    let haystack: Vec<char> = text.chars().map(fold).collect();
    let needle: Vec<char> = query.chars().map(fold).collect();

    let mut matches = Vec::new();
    let mut at = 0;

    while at + needle.len() <= haystack.len() {
        if haystack[at..at + needle.len()] == needle[..] {
            matches.push(at);
            at += needle.len();
        } else {
            at += 1;
        }
    }

    matches
}

/// Runs a fresh query: full recomputation with the current-match cursor
/// reset to the first hit.
#[must_use]
pub fn search(text: &str, query: &str) -> SearchState {
    let matches = find_matches(text, query);
    let current = if matches.is_empty() { None } else { Some(0) };

    SearchState {
        query: query.to_string(),
        matches,
        current,
    }
}

/// A (row, column) pair in character coordinates, for scroll targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

/// Translates a 0-based character offset into a (row, column) point.
/// Offsets past the end clamp to the end of the text.
#[must_use]
pub fn offset_to_point(text: &str, char_offset: usize) -> Point {
    // Resolve the character offset to a byte offset first; newline scanning
    // below works on bytes.
    let byte_offset = text
        .char_indices()
        .nth(char_offset)
        .map_or(text.len(), |(idx, _)| idx);
    let prefix = &text.as_bytes()[..byte_offset];

    let row = memchr::memchr_iter(b'\n', prefix).count();
    let line_start = memchr::memrchr(b'\n', prefix).map_or(0, |idx| idx + 1);
    let column = text[line_start..byte_offset].chars().count();

    Point { row, column }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_are_increasing_and_non_overlapping() {
        let matches = find_matches("aaaa", "aa");
        assert_eq!(matches, vec![0, 2]);

        let matches = find_matches("abababa", "aba");
        // The second potential hit at offset 2 overlaps the first and is
        // skipped by the forward scan.
        assert_eq!(matches, vec![0, 4]);

        for window in matches.windows(2) {
            assert!(window[0] + 3 <= window[1]);
        }
    }

    #[test]
    fn test_search_is_case_insensitive_and_literal() {
        let matches = find_matches("Hello hello HELLO", "hello");
        assert_eq!(matches, vec![0, 6, 12]);

        // Regex metacharacters are plain text.
        assert_eq!(find_matches("a.c abc", "a.c"), vec![0]);
        assert_eq!(find_matches("x(1) y(2)", "(1)"), vec![1]);
    }

    #[test]
    fn test_offsets_are_character_positions() {
        // 'é' is two bytes but one character.
        assert_eq!(find_matches("café bar", "bar"), vec![5]);
    }

    #[test]
    fn test_empty_query_yields_empty_state() {
        let state = search("any text at all", "");
        assert_eq!(state.matches, Vec::<usize>::new());
        assert_eq!(state.current, None);
    }

    #[test]
    fn test_fresh_query_resets_current_to_first_match() {
        let state = search("one two one", "one");
        assert_eq!(state.matches, vec![0, 8]);
        assert_eq!(state.current, Some(0));
        assert_eq!(state.current_offset(), Some(0));

        let state = search("one two one", "zzz");
        assert_eq!(state.current, None);
        assert_eq!(state.current_offset(), None);
    }

    #[test]
    fn test_offset_to_point_rows_and_columns() {
        let text = "first\nsecond\nthird";

        assert_eq!(offset_to_point(text, 0), Point { row: 0, column: 0 });
        assert_eq!(offset_to_point(text, 6), Point { row: 1, column: 0 });
        assert_eq!(offset_to_point(text, 8), Point { row: 1, column: 2 });
        // Clamped past the end.
        assert_eq!(offset_to_point(text, 999), Point { row: 2, column: 5 });
    }

    #[test]
    fn test_offset_to_point_counts_characters_not_bytes() {
        let text = "éé\néé";
        assert_eq!(offset_to_point(text, 4), Point { row: 1, column: 1 });
    }
}
