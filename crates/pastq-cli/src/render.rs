//! Terminal rendering for the admin table and the public catalog cards.

use pastq_core::filter::{admin_stats, browse_stats, render_highlighted};
use pastq_core::{PastQuestion, UNKNOWN, UNSORTED};

use crate::truncate_string;

fn mark(text: &str) -> String {
    console::style(text).yellow().bold().to_string()
}

fn tag(value: &str) -> String {
    let v = if value.trim().is_empty() { UNSORTED } else { value.trim() };
    if v == UNSORTED || v == UNKNOWN {
        format!("[{}]", console::style(v).red())
    } else {
        format!("[{}]", console::style(v).green())
    }
}

/// Admin list: one block per record, count line at the end.
pub fn admin_table(items: &[PastQuestion]) -> String {
    if items.is_empty() {
        return "No items found.\n0 items".to_string();
    }

    let mut out = String::new();
    for it in items {
        let id = it
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "draft".to_string());

        let course = [it.course_code.trim(), it.course_title.trim()]
            .iter()
            .filter(|s| !s.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(" • ");

        let meta = [
            it.level.as_str(),
            it.semester.as_str(),
            it.doc_type.as_str(),
            it.session.as_str(),
            it.year.as_str(),
        ]
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" • ");

        out.push_str(&format!("#{}  {}\n", id, it.display_title()));
        if !course.is_empty() {
            out.push_str(&format!("     {}\n", course));
        }
        out.push_str(&format!("     {}\n", if meta.is_empty() { "—" } else { meta.as_str() }));
        if it.file_url.is_empty() {
            out.push_str("     (no file)\n");
        } else {
            out.push_str(&format!("     {}\n", it.file_url));
        }
    }
    out.push_str(&admin_stats(items.len()));
    out
}

/// Draft cache listing with unsaved/unsorted counters.
pub fn draft_list(items: &[PastQuestion], unsaved: usize, unsorted: usize) -> String {
    if items.is_empty() {
        return "Draft is empty.".to_string();
    }

    let mut out = String::new();
    for (index, it) in items.iter().enumerate() {
        let state = if it.is_draft() { "unsaved" } else { "live" };
        out.push_str(&format!(
            "{:>3}. {} ({})  {} {}\n",
            index,
            truncate_string(&it.display_title(), 48),
            state,
            tag(&it.level),
            tag(&it.semester),
        ));
    }
    out.push_str(&format!(
        "{} record(s), {} unsaved, {} unsorted",
        items.len(),
        unsaved,
        unsorted
    ));
    out
}

/// Public catalog: one card per record, query matches highlighted.
pub fn browse_cards(shown: &[&PastQuestion], total: usize, q: &str) -> String {
    let mut out = String::new();

    if shown.is_empty() {
        out.push_str("No results. Try removing filters, or search by session like 2024/2025.\n");
        out.push_str(&browse_stats(0, total));
        return out;
    }

    for it in shown {
        out.push_str(&render_highlighted(&it.display_title(), q, mark));
        out.push('\n');
        out.push_str(&format!("  {}\n", render_highlighted(&it.meta_line(), q, mark)));
        out.push_str(&format!(
            "  {} {} {}\n",
            tag(&it.level),
            tag(&it.semester),
            tag(if it.doc_type.trim().is_empty() { UNKNOWN } else { it.doc_type.trim() }),
        ));
        if !it.notes.trim().is_empty() {
            out.push_str(&format!("  {}\n", render_highlighted(it.notes.trim(), q, mark)));
        }
        if !it.file_url.is_empty() {
            out.push_str(&format!("  Download: {}\n", it.file_url));
        }
        out.push('\n');
    }
    out.push_str(&browse_stats(shown.len(), total));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pastq_core::Filters;

    fn record(title: &str, session: &str) -> PastQuestion {
        PastQuestion {
            id: Some(1),
            title: title.to_string(),
            level: "400".to_string(),
            semester: "First".to_string(),
            doc_type: "Exam".to_string(),
            session: session.to_string(),
            file_url: "https://x/a.pdf".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_admin_table_counts_items() {
        let items = vec![record("Land Law", "2024/2025")];
        let out = admin_table(&items);
        assert!(out.contains("Land Law"));
        assert!(out.ends_with("1 item(s)"));

        assert!(admin_table(&[]).contains("No items found."));
    }

    #[test]
    fn test_browse_stats_reflect_filtering() {
        let all = vec![record("With session", "2024/2025"), record("Without", "")];
        let filters = Filters {
            q: "2024/2025".to_string(),
            ..Default::default()
        };
        let shown = filters.apply(&all);
        let out = browse_cards(&shown, all.len(), &filters.q);
        assert!(out.contains("With session"));
        assert!(!out.contains("Without\n"));
        assert!(out.ends_with("1 of 2"));
    }

    #[test]
    fn test_browse_empty_state() {
        let out = browse_cards(&[], 7, "zzz");
        assert!(out.contains("No results."));
        assert!(out.ends_with("0 of 7"));
    }

    #[test]
    fn test_draft_list_counters() {
        let mut unsorted = record("Scan", "");
        unsorted.id = None;
        unsorted.level = "UNSORTED".to_string();
        let items = vec![record("Land Law", "2024/2025"), unsorted];
        let out = draft_list(&items, 1, 1);
        assert!(out.contains("(live)"));
        assert!(out.contains("(unsaved)"));
        assert!(out.ends_with("2 record(s), 1 unsaved, 1 unsorted"));
    }
}
