use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use timeline_common::{Event, IngestError, IngestResult};
use tracing::info;

/// A narrative story and the events it cites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryIndex {
    pub id: String,
    #[serde(default)]
    pub events: Vec<StoryRef>,
}

/// Reference to an ingested event. Stories may override display text, which
/// is ignored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryRef {
    pub id: String,
}

/// Check that every event a story cites exists in the ingested set.
///
/// Fails on the first story with dangling references, listing all of its
/// missing ids in citation order.
pub fn verify_references(events: &[Event], stories: &[StoryIndex]) -> IngestResult<()> {
    let known: HashSet<&str> = events.iter().map(|e| e.id.as_str()).collect();

    for story in stories {
        let mut missing: Vec<String> = Vec::new();
        for reference in &story.events {
            if !known.contains(reference.id.as_str()) && !missing.contains(&reference.id) {
                missing.push(reference.id.clone());
            }
        }
        if !missing.is_empty() {
            return Err(IngestError::ReferentialIntegrity {
                story: story.id.clone(),
                missing,
            });
        }
    }

    info!(stories = stories.len(), events = known.len(), "Story references verified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(id: &str) -> Event {
        Event {
            id: id.into(),
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            area: vec![],
            campaign: vec![],
            headline: String::new(),
            summary: String::new(),
            city: String::new(),
            country: vec![],
            region: vec![],
            target: vec![],
            sources: vec![],
            x: 0,
            y: 0,
        }
    }

    fn story(id: &str, refs: &[&str]) -> StoryIndex {
        StoryIndex {
            id: id.into(),
            events: refs.iter().map(|r| StoryRef { id: r.to_string() }).collect(),
        }
    }

    #[test]
    fn test_all_references_known() {
        let events = vec![event("001"), event("002")];
        let stories = vec![story("student-movement", &["002", "001"])];
        assert!(verify_references(&events, &stories).is_ok());
    }

    #[test]
    fn test_missing_reference_named() {
        let events = vec![event("001")];
        let stories = vec![
            story("ok", &["001"]),
            story("student-movement", &["001", "015", "099", "015"]),
        ];
        match verify_references(&events, &stories).unwrap_err() {
            IngestError::ReferentialIntegrity { story, missing } => {
                assert_eq!(story, "student-movement");
                assert_eq!(missing, ["015", "099"]);
            }
            other => panic!("expected referential integrity error, got {other:?}"),
        }
    }

    #[test]
    fn test_story_json_ignores_extra_fields() {
        let json = r#"[{"id": "s", "title": "Growth", "events": [{"id": "001", "headline": "x"}]}]"#;
        let stories: Vec<StoryIndex> = serde_json::from_str(json).unwrap();
        assert_eq!(stories[0].events[0].id, "001");
    }
}
