//! Walks a course module step by step and turns its lectures into jobs.

use std::collections::VecDeque;
use std::path::PathBuf;

use futures::Stream;
use futures::stream;

use crate::config::DownloadConfig;
use crate::course_url::CourseUrl;
use crate::download::{AssetKind, DownloadJob};
use crate::error::Result;
use crate::metadata::{CourseMetadata, Step};
use crate::resolver::PageSource;

/// A course whose landing page has been resolved.
///
/// Step pages are fetched lazily by [`CourseWalker::jobs`].
pub struct CourseWalker<P: PageSource> {
    source: P,
    url: CourseUrl,
    config: DownloadConfig,
    course: CourseMetadata,
}

impl<P: PageSource> CourseWalker<P> {
    /// Fetches and decodes the course landing page.
    ///
    /// # Errors
    ///
    /// Propagates fetch, parse and schema errors from the landing page.
    pub async fn open(source: P, url: CourseUrl, config: DownloadConfig) -> Result<Self> {
        let state = source.fetch_state(url.as_str()).await?;
        let course = CourseMetadata::from_state(state)?;
        log::info!(
            "Course {:?}, module {:?}: {} step(s)",
            course.course_title,
            course.module_title,
            course.step_slugs.len()
        );
        Ok(Self {
            source,
            url,
            config,
            course,
        })
    }

    /// Course-level metadata.
    #[must_use]
    pub const fn course(&self) -> &CourseMetadata {
        &self.course
    }

    /// Fetches and decodes the step at `index`.
    ///
    /// # Errors
    ///
    /// Propagates fetch, parse and schema errors from the step page.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub async fn step(&self, index: usize) -> Result<Step> {
        let slug = &self.course.step_slugs[index];
        let url = self.url.step(slug);
        log::debug!("Resolving step {} ({slug})", index + 1);
        let state = self.source.fetch_state(&url).await?;
        Step::from_state(index, slug, state)
    }

    /// Directory that holds the lectures of `step` titled `title`.
    fn item_dir(&self, step: &Step, title: &str) -> PathBuf {
        let naming = self.config.naming;
        self.config
            .output_dir
            .join(naming.sanitize(&self.course.course_title))
            .join(naming.sanitize(&self.course.module_title))
            .join(format!("{}{title}", step.prefix()))
    }

    /// Jobs for every lecture of `step` that has the requested rendition.
    #[must_use]
    pub fn step_jobs(&self, step: &Step) -> Vec<DownloadJob> {
        let quality = self.config.resolution.quality_label();
        let mut jobs = Vec::new();

        for (id, item) in &step.items {
            let Some(source) = item.select_source(&quality) else {
                log::debug!("No {quality} MP4 for item {id} ({:?}), skipping", item.title);
                continue;
            };

            let title = self.config.naming.sanitize(&item.title);
            let dir = self.item_dir(step, &title);
            jobs.push(DownloadJob::new(&source.src, &dir, &title, AssetKind::Video));
            if let Some(track) = item.single_subtitle() {
                jobs.push(DownloadJob::new(&track.url, dir, &title, AssetKind::Subtitle));
            }
        }

        jobs
    }

    /// Lazily walks every step in order and yields its jobs.
    ///
    /// Each step page is fetched only once the jobs of the previous step have
    /// been consumed. The first error ends the stream. Walking again means
    /// fetching every page again.
    pub fn jobs(self) -> impl Stream<Item = Result<DownloadJob>> {
        let state = WalkState {
            walker: self,
            next_step: 0,
            pending: VecDeque::new(),
        };
        stream::try_unfold(state, advance)
    }
}

struct WalkState<P: PageSource> {
    walker: CourseWalker<P>,
    next_step: usize,
    pending: VecDeque<DownloadJob>,
}

async fn advance<P: PageSource>(
    mut state: WalkState<P>,
) -> Result<Option<(DownloadJob, WalkState<P>)>> {
    loop {
        if let Some(job) = state.pending.pop_front() {
            return Ok(Some((job, state)));
        }
        if state.next_step >= state.walker.course.step_slugs.len() {
            return Ok(None);
        }
        let step = state.walker.step(state.next_step).await?;
        state.pending.extend(state.walker.step_jobs(&step));
        state.next_step += 1;
    }
}
