//! Client-side filtering and free-text search over past-question records.
//!
//! The same semantics back both the admin list (server-side params with a
//! local fallback) and the public catalog: exact match on each set
//! categorical dimension, case-insensitive substring match for the free-text
//! query. Matching is per-record, so the dimensions commute.

use crate::models::PastQuestion;

/// One filter set: empty string means "dimension not filtered".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub level: String,
    pub semester: String,
    pub doc_type: String,
    pub q: String,
}

impl Filters {
    pub fn matches(&self, item: &PastQuestion) -> bool {
        if !self.level.is_empty() && item.level != self.level {
            return false;
        }
        if !self.semester.is_empty() && item.semester != self.semester {
            return false;
        }
        if !self.doc_type.is_empty() && item.doc_type != self.doc_type {
            return false;
        }
        if !self.q.is_empty() {
            let blob = item.search_blob().to_ascii_lowercase();
            if !blob.contains(&self.q.trim().to_ascii_lowercase()) {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, items: &'a [PastQuestion]) -> Vec<&'a PastQuestion> {
        items.iter().filter(|it| self.matches(it)).collect()
    }

    /// Query-string parameters for the list endpoint; unset dimensions are
    /// omitted entirely.
    pub fn query_params(&self, limit: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![("limit", limit.to_string())];
        if !self.q.trim().is_empty() {
            params.push(("q", self.q.trim().to_string()));
        }
        if !self.level.is_empty() {
            params.push(("level", self.level.clone()));
        }
        if !self.semester.is_empty() {
            params.push(("semester", self.semester.clone()));
        }
        if !self.doc_type.is_empty() {
            params.push(("type", self.doc_type.clone()));
        }
        params
    }
}

/// Byte range of one query occurrence inside a rendered string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub start: usize,
    pub end: usize,
}

/// Every case-insensitive occurrence of `query` in `text`, as byte ranges.
///
/// Matching is ASCII case-insensitive so that ranges always index the
/// original string safely.
pub fn highlight_spans(text: &str, query: &str) -> Vec<Highlight> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let haystack = text.to_ascii_lowercase();
    let needle = query.to_ascii_lowercase();

    let mut spans = Vec::new();
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(&needle) {
        let start = from + pos;
        let end = start + needle.len();
        spans.push(Highlight { start, end });
        from = end;
    }
    spans
}

/// Rebuild `text` with each query occurrence passed through `mark`.
pub fn render_highlighted(text: &str, query: &str, mark: impl Fn(&str) -> String) -> String {
    let spans = highlight_spans(text, query);
    if spans.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in spans {
        out.push_str(&text[cursor..span.start]);
        out.push_str(&mark(&text[span.start..span.end]));
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Admin list count pill.
pub fn admin_stats(count: usize) -> String {
    format!("{} item(s)", count)
}

/// Public catalog stats line.
pub fn browse_stats(shown: usize, total: usize) -> String {
    format!("{} of {}", shown, total)
}
