//! Offline classification: verb keywords pick the intent, substring
//! scoring over title/url/content picks the tab. Used when no language
//! model is configured.

use crate::action::{Action, ACTIVE_TAB};
use crate::registry::TabRegistry;

const RECALL_VERBS: [&str; 4] = ["reopen", "recall", "restore", "bring back"];
const CLOSE_VERBS: [&str; 3] = ["close", "shut", "get rid of"];
const SUMMARY_VERBS: [&str; 3] = ["summarize", "summary", "tl;dr"];
const SWITCH_VERBS: [&str; 5] = ["switch", "go to", "find", "show me", "take me"];

// Ignored when scoring tabs against the query.
const STOP_WORDS: [&str; 16] = [
    "the", "tab", "tabs", "about", "please", "to", "a", "an", "my", "for", "of", "on", "in",
    "it", "with", "id",
];

pub(crate) const HELP_REPLY: &str =
    "I can find, close, summarize, or reopen tabs for you. Try \"find the tab about ...\".";

pub(crate) fn classify(text: &str, registry: &TabRegistry) -> Action {
    let query = text.to_lowercase();

    if let Some(topic) = topic_after_verb(&query, &RECALL_VERBS) {
        return Action::RecallTabs { topic };
    }

    if contains_any(&query, &CLOSE_VERBS) {
        return match target_tab(&query, registry) {
            Some(tab_id) => Action::CloseTab { tab_id },
            None => Action::Unknown,
        };
    }

    if contains_any(&query, &SUMMARY_VERBS) {
        let tab_id = target_tab(&query, registry).unwrap_or_else(|| ACTIVE_TAB.to_string());
        return Action::SummarizeTab { tab_id };
    }

    if contains_any(&query, &SWITCH_VERBS) {
        return match target_tab(&query, registry) {
            Some(tab_id) => Action::SwitchTab { tab_id },
            None => Action::Unknown,
        };
    }

    Action::Chat {
        text: HELP_REPLY.to_string(),
    }
}

fn contains_any(query: &str, verbs: &[&str]) -> bool {
    verbs.iter().any(|v| query.contains(v))
}

/// Everything after the first recall verb becomes the topic.
fn topic_after_verb(query: &str, verbs: &[&str]) -> Option<String> {
    for verb in verbs {
        if let Some(index) = query.find(verb) {
            let topic = query[index + verb.len()..].trim();
            if !topic.is_empty() {
                return Some(topic.to_string());
            }
        }
    }
    None
}

/// An explicit "tab with ID x" reference (the grounding substitution
/// produces these), or the best-scoring open tab.
fn target_tab(query: &str, registry: &TabRegistry) -> Option<String> {
    explicit_tab_id(query).or_else(|| best_match(query, registry))
}

fn explicit_tab_id(query: &str) -> Option<String> {
    const MARKER: &str = "tab with id ";
    let index = query.find(MARKER)?;
    let id: String = query[index + MARKER.len()..]
        .chars()
        .take_while(|c| !c.is_whitespace() && !matches!(c, '.' | ',' | '?' | '!' | '"'))
        .collect();
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

fn best_match(query: &str, registry: &TabRegistry) -> Option<String> {
    let mut best: Option<(String, usize)> = None;

    for tab in registry.tabs() {
        let haystack = format!(
            "{} {} {}",
            tab.title,
            tab.url,
            tab.content.as_deref().unwrap_or("")
        )
        .to_lowercase();

        let mut score = 0;
        if haystack.contains(query) {
            score += 10;
        }
        for word in query
            .split_whitespace()
            .filter(|w| w.len() > 2 && !STOP_WORDS.contains(w))
        {
            if haystack.contains(word) {
                score += 1;
            }
        }

        if score > best.as_ref().map(|(_, s)| *s).unwrap_or(0) {
            best = Some((tab.id.clone(), score));
        }
    }

    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tab;

    fn tab(id: &str, title: &str, content: &str) -> Tab {
        Tab {
            id: id.to_string(),
            title: title.to_string(),
            url: format!("example.com/{}", id),
            favicon: "📄".to_string(),
            content: Some(content.to_string()),
            last_accessed: 0,
            is_idle: false,
        }
    }

    fn registry() -> TabRegistry {
        TabRegistry::from_tabs(
            vec![
                tab("1", "React Hooks Documentation", "state and effects"),
                tab("2", "Gemini API Overview", "large language models"),
                tab("3", "Tailwind CSS for modern UI", "utility-first framework"),
            ],
            Some("1".to_string()),
        )
    }

    #[test]
    fn finds_tab_by_content_words() {
        let action = classify("find the tab about gemini", &registry());
        assert_eq!(
            action,
            Action::SwitchTab {
                tab_id: "2".to_string()
            }
        );
    }

    #[test]
    fn close_targets_best_match() {
        let action = classify("close the tailwind tab", &registry());
        assert_eq!(
            action,
            Action::CloseTab {
                tab_id: "3".to_string()
            }
        );
    }

    #[test]
    fn summarize_prefers_explicit_id_and_falls_back_to_active() {
        assert_eq!(
            classify("summarize tab with ID 2", &registry()),
            Action::SummarizeTab {
                tab_id: "2".to_string()
            }
        );
        assert_eq!(
            classify("give me a summary", &registry()),
            Action::SummarizeTab {
                tab_id: ACTIVE_TAB.to_string()
            }
        );
    }

    #[test]
    fn recall_takes_the_trailing_topic() {
        assert_eq!(
            classify("reopen my design research from yesterday", &registry()),
            Action::RecallTabs {
                topic: "my design research from yesterday".to_string()
            }
        );
    }

    #[test]
    fn unmatched_text_falls_back_to_chat() {
        assert!(matches!(
            classify("hello there", &registry()),
            Action::Chat { .. }
        ));
    }

    #[test]
    fn switch_without_a_scoring_tab_is_unknown() {
        assert_eq!(
            classify("find the tab about quantum chromodynamics", &registry()),
            Action::Unknown
        );
    }
}
