//! Terminal and JSON presentation of result pages and intake state

use serde_json::Value;

use crate::intake::{IntakeView, VoiceState};
use crate::search::{AnnotatedResult, ResultSet};

/// Markdown rendering of the current page
pub fn format_page_markdown(set: &ResultSet) -> String {
    let mut md = String::new();

    if set.is_empty() {
        md.push_str(&format!("No results for \"{}\"\n", set.query()));
        return md;
    }

    md.push_str(&format!(
        "# Search Results · {} papers for \"{}\"\n\n",
        set.len(),
        set.query()
    ));

    let first_number = set.paginator().page_range().start + 1;
    for (offset, result) in set.current_page().iter().enumerate() {
        format_result(&mut md, first_number + offset, result);
    }

    let pages = set.paginator();
    if pages.show_controls() {
        md.push_str(&format!(
            "Page {} of {}",
            pages.current_page(),
            pages.total_pages()
        ));
        if pages.has_previous() {
            md.push_str(" · /prev");
        }
        if pages.has_next() {
            md.push_str(" · /next");
        }
        md.push('\n');

        let links: Vec<String> = pages
            .page_numbers()
            .map(|n| {
                if n == pages.current_page() {
                    format!("[{}]", n)
                } else {
                    n.to_string()
                }
            })
            .collect();
        md.push_str(&format!("Pages: {}\n", links.join(" ")));
    }

    md
}

fn format_result(md: &mut String, number: usize, result: &AnnotatedResult) {
    let title = if result.title_highlight.text.is_empty() {
        "(untitled)".to_string()
    } else {
        result.title_highlight.to_markdown()
    };
    md.push_str(&format!("## {}. {}\n\n", number, title));

    if !result.authors_highlight.text.is_empty() {
        md.push_str(&format!("{}\n\n", result.authors_highlight.to_markdown()));
    }

    if !result.snippet.text().is_empty() {
        md.push_str(&format!("> {}\n\n", result.snippet.to_markdown()));
    }

    let metadata = format_metadata(result);
    if !metadata.is_empty() {
        md.push_str(&format!("{}\n\n", metadata));
    }

    md.push_str(&format!(
        "id: {} · relevance: {}\n\n---\n\n",
        result.id(),
        result.relevance()
    ));
}

/// Scalar passthrough fields as `key: value` pairs
fn format_metadata(result: &AnnotatedResult) -> String {
    result
        .ranked
        .candidate
        .extra
        .iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) if !s.is_empty() => Some(format!("{}: {}", key, s)),
            Value::Number(n) => Some(format!("{}: {}", key, n)),
            Value::Bool(b) => Some(format!("{}: {}", key, b)),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" · ")
}

/// JSON rendering of the current page, spans included
pub fn format_page_json(set: &ResultSet) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&set.page_view())
}

/// Overlay shown under the input box: suggestions, or recent searches
pub fn format_overlay(view: &IntakeView) -> Option<String> {
    if !view.suggestions.is_empty() {
        let mut out = String::from("Suggestions:\n");
        for suggestion in &view.suggestions {
            out.push_str(&format!("  {}\n", suggestion));
        }
        return Some(out);
    }

    if view.recent_overlay_visible && !view.recent.is_empty() {
        return Some(format_recent(view));
    }

    None
}

pub fn format_recent(view: &IntakeView) -> String {
    if view.recent.is_empty() {
        return "No recent searches.\n".to_string();
    }

    let mut out = String::from("Recent searches:\n");
    for (i, query) in view.recent.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, query));
    }
    out
}

/// One-line status summary
pub fn format_status(view: &IntakeView) -> String {
    let mut parts = vec![format!("[{:?}]", view.state)];
    if view.is_loading {
        parts.push("searching...".to_string());
    }
    match view.voice {
        VoiceState::Idle => {}
        VoiceState::Listening => parts.push("listening...".to_string()),
        VoiceState::Transcribing => parts.push(format!("dictating: {}", view.buffer)),
    }
    if let Some(error) = &view.error_message {
        parts.push(error.clone());
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::controller::IntakeState;
    use crate::search::{Candidate, PipelineOptions};
    use serde_json::json;

    fn view() -> IntakeView {
        IntakeView {
            state: IntakeState::Idle,
            voice: VoiceState::Idle,
            buffer: String::new(),
            is_loading: false,
            error_message: None,
            recent: vec!["graph".to_string(), "trees".to_string()],
            suggestions: Vec::new(),
            recent_overlay_visible: false,
        }
    }

    #[test]
    fn test_markdown_highlights_and_metadata() {
        let candidates = vec![Candidate::new(
            "p1",
            "Graph Theory",
            "Ada Graphwright",
            "An introduction to graph colouring.",
        )
        .with_field("category", json!("Mathematics"))
        .with_field("year", json!(2021))];
        let set = ResultSet::build("graph", 1, &candidates, PipelineOptions::default());

        let md = format_page_markdown(&set);
        assert!(md.contains("# Search Results · 1 papers for \"graph\""));
        assert!(md.contains("## 1. **Graph** Theory"));
        assert!(md.contains("Ada **Graph**wright"));
        assert!(md.contains("> An introduction to **graph** colouring."));
        assert!(md.contains("category: Mathematics · year: 2021"));
        assert!(md.contains("id: p1 · relevance: 3"));
        assert!(!md.contains("Page 1 of"));
        assert!(!md.contains("Pages:"));
    }

    #[test]
    fn test_markdown_numbers_continue_across_pages() {
        let candidates: Vec<Candidate> = (1..=12)
            .map(|i| Candidate::new(format!("p{}", i), "graph", "", ""))
            .collect();
        let mut set = ResultSet::build("graph", 1, &candidates, PipelineOptions::default());
        set.paginator_mut().next();

        let md = format_page_markdown(&set);
        assert!(md.contains("## 11. **graph**"));
        assert!(md.contains("## 12. **graph**"));
        assert!(md.contains("Page 2 of 2 · /prev\n"));
        assert!(md.contains("Pages: 1 [2]\n"));
        assert!(!md.contains("/next"));
    }

    #[test]
    fn test_markdown_empty() {
        let set = ResultSet::build("graph", 1, &[], PipelineOptions::default());
        assert_eq!(format_page_markdown(&set), "No results for \"graph\"\n");
    }

    #[test]
    fn test_json_page() {
        let candidates = vec![Candidate::new("p1", "Graph", "", "")];
        let set = ResultSet::build("graph", 1, &candidates, PipelineOptions::default());

        let value: Value = serde_json::from_str(&format_page_json(&set).unwrap()).unwrap();
        assert_eq!(value["query"], "graph");
        assert_eq!(value["results"][0]["title_highlight"]["spans"][0]["end"], 5);
    }

    #[test]
    fn test_overlay_prefers_suggestions() {
        let mut v = view();
        v.recent_overlay_visible = true;
        assert!(format_overlay(&v).unwrap().starts_with("Recent searches:"));

        v.suggestions = vec!["Graph theory".to_string()];
        assert_eq!(format_overlay(&v).unwrap(), "Suggestions:\n  Graph theory\n");

        v.suggestions.clear();
        v.recent_overlay_visible = false;
        assert!(format_overlay(&v).is_none());
    }

    #[test]
    fn test_status_line() {
        let mut v = view();
        v.state = IntakeState::Failed;
        v.error_message = Some("Search failed: down".to_string());
        assert_eq!(format_status(&v), "[Failed] Search failed: down");

        v.voice = VoiceState::Transcribing;
        v.buffer = "gra".to_string();
        assert!(format_status(&v).contains("dictating: gra"));
    }
}
