//! Strongly typed course metadata, decoded from page-state blobs.
//!
//! A course is described by one page-state document for the landing page
//! (titles and the ordered list of step slugs) plus one document per step
//! (the content items of that step). Each document is decoded in a single
//! pass; a missing or mistyped key is reported as [`Error::Schema`].

mod schema;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// MIME type of the video renditions the downloader accepts.
pub const MP4_MIME: &str = "video/mp4";

/// Course-level metadata from the landing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseMetadata {
    /// Title of the course (learning path entry) the module belongs to.
    pub course_title: String,
    /// Title of the module being downloaded.
    pub module_title: String,
    /// Step slugs in course order.
    pub step_slugs: Vec<String>,
}

impl CourseMetadata {
    /// Decodes the landing page state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] if a required key is missing or has the
    /// wrong type, or if the module is not part of any course.
    pub fn from_state(state: Value) -> Result<Self> {
        let page: schema::CoursePage = serde_json::from_value(state)
            .map_err(|e| Error::Schema(format!("course page: {e}")))?;
        let course = page.course;

        let course_title = course
            .included_in
            .into_iter()
            .next()
            .map(|c| c.title)
            .ok_or_else(|| Error::Schema("course page: `includedIn` is empty".to_string()))?;

        Ok(Self {
            course_title,
            module_title: course.entity.title,
            step_slugs: course.entity.steps.into_iter().map(|s| s.slug).collect(),
        })
    }
}

/// One step of a module with its content items in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Zero-based position of the step in the module.
    pub index: usize,
    /// Slug used to build the step page URL.
    pub slug: String,
    /// Content items keyed by their opaque id.
    pub items: Vec<(String, ContentItem)>,
}

impl Step {
    /// Decodes a step page state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] if a required key is missing or has the
    /// wrong type.
    pub fn from_state(index: usize, slug: &str, state: Value) -> Result<Self> {
        let page: schema::StepPage = serde_json::from_value(state)
            .map_err(|e| Error::Schema(format!("step `{slug}`: {e}")))?;

        Ok(Self {
            index,
            slug: slug.to_string(),
            items: page
                .course
                .step_map
                .into_iter()
                .map(|(id, entry)| (id, entry.data.into()))
                .collect(),
        })
    }

    /// Directory prefix for this step: `01_` .. `09_`, then `10_`, `11_`, ...
    #[must_use]
    pub fn prefix(&self) -> String {
        step_prefix(self.index)
    }
}

/// Numeric prefix for the step at zero-based `index`.
///
/// Only two digits are padded, so step 100 sorts before step 11 in a
/// directory listing.
#[must_use]
pub fn step_prefix(index: usize) -> String {
    format!("{:02}_", index + 1)
}

/// A lecture inside a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    /// Lecture title.
    pub title: String,
    /// Available video renditions.
    pub sources: Vec<VideoSource>,
    /// Available subtitle tracks.
    pub subtitles: Vec<SubtitleTrack>,
}

impl ContentItem {
    /// First MP4 rendition whose quality label matches exactly.
    ///
    /// Later duplicates of the same rendition are ignored rather than downloaded over it.
    #[must_use]
    pub fn select_source(&self, quality: &str) -> Option<&VideoSource> {
        self.sources
            .iter()
            .find(|s| s.quality == quality && s.mime_type == MP4_MIME)
    }

    /// The subtitle track, if the item has exactly one.
    #[must_use]
    pub fn single_subtitle(&self) -> Option<&SubtitleTrack> {
        match self.subtitles.as_slice() {
            [track] => Some(track),
            _ => None,
        }
    }
}

/// One encoded rendition of a lecture video.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VideoSource {
    /// Quality label such as `"1080p"`.
    pub quality: String,
    /// MIME type of the rendition.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Download URL.
    pub src: String,
}

/// A subtitle track of a lecture.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubtitleTrack {
    /// Download URL of the WebVTT file.
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source(quality: &str, mime: &str, src: &str) -> VideoSource {
        VideoSource {
            quality: quality.into(),
            mime_type: mime.into(),
            src: src.into(),
        }
    }

    fn item(sources: Vec<VideoSource>, subtitles: usize) -> ContentItem {
        ContentItem {
            title: "Lecture".into(),
            sources,
            subtitles: (0..subtitles)
                .map(|i| SubtitleTrack {
                    url: format!("https://cdn/sub{i}.vtt"),
                })
                .collect(),
        }
    }

    #[test]
    fn step_prefix_pads_to_two_digits_only() {
        assert_eq!(step_prefix(0), "01_");
        assert_eq!(step_prefix(8), "09_");
        assert_eq!(step_prefix(9), "10_");
        assert_eq!(step_prefix(10), "11_");
        assert_eq!(step_prefix(99), "100_");
    }

    #[test]
    fn selects_exact_quality_mp4() {
        let item = item(
            vec![
                source("720p", MP4_MIME, "U1"),
                source("1080p", MP4_MIME, "U2"),
            ],
            0,
        );
        assert_eq!(item.select_source("1080p").unwrap().src, "U2");
        assert_eq!(item.select_source("720p").unwrap().src, "U1");
        assert!(item.select_source("360p").is_none());
    }

    #[test]
    fn ignores_non_mp4_renditions() {
        let item = item(
            vec![
                source("1080p", "application/x-mpegURL", "HLS"),
                source("1080p", MP4_MIME, "MP4"),
            ],
            0,
        );
        assert_eq!(item.select_source("1080p").unwrap().src, "MP4");
    }

    #[test]
    fn first_duplicate_rendition_wins() {
        let item = item(
            vec![
                source("1080p", MP4_MIME, "FIRST"),
                source("1080p", MP4_MIME, "SECOND"),
            ],
            0,
        );
        assert_eq!(item.select_source("1080p").unwrap().src, "FIRST");
    }

    #[test]
    fn subtitle_only_when_exactly_one() {
        assert!(item(vec![], 0).single_subtitle().is_none());
        assert_eq!(
            item(vec![], 1).single_subtitle().unwrap().url,
            "https://cdn/sub0.vtt"
        );
        assert!(item(vec![], 2).single_subtitle().is_none());
    }

    #[test]
    fn decodes_course_page() {
        let state = json!({
            "user": {"id": 7},
            "course": {
                "includedIn": [{"title": "AWS Fundamentals"}, {"title": "Other"}],
                "entity": {
                    "title": "Compute",
                    "steps": [{"slug": "intro", "id": 1}, {"slug": "ec2"}]
                }
            }
        });
        let course = CourseMetadata::from_state(state).unwrap();
        assert_eq!(course.course_title, "AWS Fundamentals");
        assert_eq!(course.module_title, "Compute");
        assert_eq!(course.step_slugs, vec!["intro", "ec2"]);
    }

    #[test]
    fn course_page_without_course_is_schema_error() {
        let state = json!({
            "course": {"includedIn": [], "entity": {"title": "M", "steps": []}}
        });
        assert!(matches!(
            CourseMetadata::from_state(state),
            Err(Error::Schema(_))
        ));
    }

    #[test]
    fn course_page_missing_key_is_schema_error() {
        let state = json!({"course": {"includedIn": [{"title": "C"}]}});
        let err = CourseMetadata::from_state(state).unwrap_err();
        assert!(matches!(err, Error::Schema(ref msg) if msg.contains("entity")));
    }

    #[test]
    fn decodes_step_page_in_document_order() {
        let state = json!({
            "course": {
                "stepMap": {
                    "zz-9": {"data": {"title": "Second?", "player": {
                        "sources": [], "subtitles": []
                    }}},
                    "aa-1": {"data": {"title": "Then this", "player": {
                        "sources": [{"quality": "720p", "type": "video/mp4", "src": "U"}],
                        "subtitles": [{"url": "S", "lang": "en"}]
                    }}}
                }
            }
        });
        let step = Step::from_state(3, "ec2", state).unwrap();
        assert_eq!(step.index, 3);
        assert_eq!(step.prefix(), "04_");
        let ids: Vec<_> = step.items.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["zz-9", "aa-1"]);
        assert_eq!(step.items[1].1.sources[0].src, "U");
        assert_eq!(step.items[1].1.subtitles[0].url, "S");
    }

    #[test]
    fn step_item_without_player_is_schema_error() {
        let state = json!({
            "course": {"stepMap": {"a": {"data": {"title": "Quiz"}}}}
        });
        let err = Step::from_state(0, "quiz", state).unwrap_err();
        assert!(matches!(err, Error::Schema(ref msg) if msg.contains("player")));
    }
}
