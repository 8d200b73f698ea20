//! Wire shape of the `window.__INITIAL_STATE__` blob.
//!
//! Only the keys the downloader reads are modelled; everything else in the
//! page state is ignored.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use super::{ContentItem, SubtitleTrack, VideoSource};

/// Page state of the course landing page.
#[derive(Debug, Deserialize)]
pub(super) struct CoursePage {
    pub course: CourseState,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CourseState {
    pub included_in: Vec<Titled>,
    pub entity: Entity,
}

#[derive(Debug, Deserialize)]
pub(super) struct Titled {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct Entity {
    pub title: String,
    pub steps: Vec<StepRef>,
}

#[derive(Debug, Deserialize)]
pub(super) struct StepRef {
    pub slug: String,
}

/// Page state of a single step page.
#[derive(Debug, Deserialize)]
pub(super) struct StepPage {
    pub course: StepState,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StepState {
    #[serde(deserialize_with = "ordered_entries")]
    pub step_map: Vec<(String, StepEntry)>,
}

#[derive(Debug, Deserialize)]
pub(super) struct StepEntry {
    pub data: ItemData,
}

#[derive(Debug, Deserialize)]
pub(super) struct ItemData {
    pub title: String,
    pub player: Player,
}

#[derive(Debug, Deserialize)]
pub(super) struct Player {
    pub sources: Vec<VideoSource>,
    pub subtitles: Vec<SubtitleTrack>,
}

impl From<ItemData> for ContentItem {
    fn from(data: ItemData) -> Self {
        Self {
            title: data.title,
            sources: data.player.sources,
            subtitles: data.player.subtitles,
        }
    }
}

/// Deserializes a JSON object into its entries, keeping document order.
fn ordered_entries<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct EntriesVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object keyed by step item id")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor(PhantomData))
}
