//! Walks two single-step modules over mock pages and downloads them into a temp dir.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, TryStreamExt};
use reqwest::StatusCode;
use serde_json::{Value, json};

use cloud_academy_dl::{
    AssetKind, CourseUrl, CourseWalker, DownloadConfig, DownloadJob, DownloadOutcome, Error,
    Materializer, NamingStyle, NoProgress, PageSource, RemoteBody, Resolution, Result,
    SessionStatsBuilder, Transport,
};

struct MockPages(HashMap<String, Value>);

#[async_trait]
impl PageSource for MockPages {
    async fn fetch_state(&self, url: &str) -> Result<Value> {
        self.0.get(url).cloned().ok_or_else(|| Error::Fetch {
            url: url.to_string(),
            status: StatusCode::NOT_FOUND,
        })
    }
}

/// Serves fixed bodies by URL.
struct MockCdn(HashMap<String, Vec<u8>>);

#[async_trait]
impl Transport for MockCdn {
    async fn get(&self, url: &str) -> Result<RemoteBody> {
        let body = self
            .0
            .get(url)
            .cloned()
            .ok_or_else(|| Error::Transfer(format!("unknown asset {url}")))?;
        Ok(RemoteBody {
            status: StatusCode::OK,
            content_length: Some(body.len() as u64),
            body: futures::stream::iter(vec![Ok(Bytes::from(body))]).boxed(),
        })
    }
}

fn module_url(module: &str) -> String {
    format!("https://cloudacademy.com/course/{module}/start/?context_id=1")
}

fn step_url(module: &str, slug: &str) -> String {
    format!("https://cloudacademy.com/course/{module}/{slug}/?context_id=1")
}

/// Course page plus one step page with one lecture and one subtitle track.
fn module_pages(module: &str, title: &str, lecture: &str) -> Vec<(String, Value)> {
    let slug = format!("{module}-lecture");
    vec![
        (
            module_url(module),
            json!({"course": {
                "includedIn": [{"title": "AWS Fundamentals"}],
                "entity": {"title": title, "steps": [{"slug": slug}]}
            }}),
        ),
        (
            step_url(module, &slug),
            json!({"course": {"stepMap": {"1": {"data": {
                "title": lecture,
                "player": {
                    "sources": [
                        {"quality": "720p", "type": "video/mp4", "src": format!("https://cdn/{module}-720.mp4")},
                        {"quality": "1080p", "type": "video/mp4", "src": format!("https://cdn/{module}-1080.mp4")}
                    ],
                    "subtitles": [{"url": format!("https://cdn/{module}.vtt")}]
                }
            }}}}}),
        ),
    ]
}

fn cdn() -> MockCdn {
    MockCdn(
        [
            ("https://cdn/compute-1080.mp4", b"compute video".to_vec()),
            ("https://cdn/compute.vtt", b"WEBVTT compute".to_vec()),
            ("https://cdn/storage-1080.mp4", b"storage video!".to_vec()),
            ("https://cdn/storage.vtt", b"WEBVTT storage".to_vec()),
        ]
        .into_iter()
        .map(|(url, body)| (url.to_string(), body))
        .collect(),
    )
}

async fn walk(module: &str, pages: &HashMap<String, Value>, root: &Path) -> Vec<DownloadJob> {
    let config = DownloadConfig::new()
        .with_output_dir(root)
        .with_resolution(Resolution::R1080)
        .with_naming(NamingStyle::Posix);
    let walker = CourseWalker::open(
        MockPages(pages.clone()),
        CourseUrl::parse(&module_url(module)).unwrap(),
        config,
    )
    .await
    .unwrap();
    walker.jobs().try_collect().await.unwrap()
}

fn all_pages() -> HashMap<String, Value> {
    module_pages("compute", "Compute", "EC2 Basics")
        .into_iter()
        .chain(module_pages("storage", "Storage", "S3 / Glacier"))
        .collect()
}

#[tokio::test]
async fn two_modules_yield_two_videos_and_two_subtitles() {
    let dir = tempfile::tempdir().unwrap();
    let pages = all_pages();

    let mut jobs = walk("compute", &pages, dir.path()).await;
    jobs.extend(walk("storage", &pages, dir.path()).await);

    let videos = jobs.iter().filter(|j| j.kind == AssetKind::Video).count();
    let subtitles = jobs.iter().filter(|j| j.kind == AssetKind::Subtitle).count();
    assert_eq!((videos, subtitles), (2, 2));

    let course = dir.path().join("AWS Fundamentals");
    assert_eq!(jobs[0].dir, course.join("Compute").join("01_EC2 Basics"));
    assert_eq!(jobs[0].file_name, "EC2 Basics.mp4");
    assert_eq!(jobs[1].file_name, "EC2 Basics.vtt");
    assert_eq!(jobs[2].dir, course.join("Storage").join("01_S3 - Glacier"));
    assert_eq!(jobs[2].url, "https://cdn/storage-1080.mp4");
}

#[tokio::test]
async fn second_run_skips_every_file() {
    let dir = tempfile::tempdir().unwrap();
    let pages = all_pages();
    let mut jobs = walk("compute", &pages, dir.path()).await;
    jobs.extend(walk("storage", &pages, dir.path()).await);

    let materializer = Materializer::new(cdn());

    let mut first = SessionStatsBuilder::new();
    for job in &jobs {
        first.record(&materializer.materialize(job, &NoProgress).await);
    }
    let first = first.build();
    assert_eq!(first.files_downloaded, 4);
    assert_eq!(first.total_bytes, 13 + 14 + 14 + 14);
    assert_eq!(
        std::fs::read(jobs[0].path()).unwrap(),
        b"compute video".to_vec()
    );

    for job in &jobs {
        let outcome = materializer.materialize(job, &NoProgress).await;
        assert_eq!(outcome, DownloadOutcome::SkippedComplete);
    }
}

#[tokio::test]
async fn truncated_file_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let jobs = walk("compute", &all_pages(), dir.path()).await;
    let video = &jobs[0];
    std::fs::create_dir_all(&video.dir).unwrap();
    std::fs::write(video.path(), b"comp").unwrap();

    let outcome = Materializer::new(cdn())
        .materialize(video, &NoProgress)
        .await;

    assert_eq!(outcome, DownloadOutcome::Redownloaded { bytes: 13 });
    assert_eq!(std::fs::read(video.path()).unwrap(), b"compute video");
}
