use nucleo_matcher::{Matcher, Utf32Str};

/// Case-insensitive substring test backed by nucleo.
///
/// Both sides are compared char by char. Combining marks are kept as their
/// own chars, so decomposed names match decomposed queries.
pub struct SubstringMatcher {
    matcher: Matcher,
    needle: String,
    needle_chars: Vec<char>,
    buf: Vec<char>,
}

impl Default for SubstringMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl SubstringMatcher {
    pub fn new() -> Self {
        let mut config = nucleo_matcher::Config::DEFAULT;
        config.ignore_case = true;
        config.normalize = false;
        Self {
            matcher: Matcher::new(config),
            needle: String::new(),
            needle_chars: Vec::new(),
            buf: Vec::new(),
        }
    }

    pub fn set_query(&mut self, query: &str) {
        // The matcher folds the haystack only; the needle must come in folded.
        self.needle = query.to_lowercase();
        self.needle_chars = self.needle.chars().collect();
    }

    pub fn matches(&mut self, haystack: &str) -> bool {
        // An empty needle matches everything.
        if self.needle.is_empty() {
            return true;
        }

        let needle = if self.needle.is_ascii() {
            Utf32Str::Ascii(self.needle.as_bytes())
        } else {
            Utf32Str::Unicode(&self.needle_chars)
        };
        let haystack = if haystack.is_ascii() {
            Utf32Str::Ascii(haystack.as_bytes())
        } else {
            self.buf.clear();
            self.buf.extend(haystack.chars());
            Utf32Str::Unicode(&self.buf)
        };
        self.matcher.substring_match(haystack, needle).is_some()
    }
}
