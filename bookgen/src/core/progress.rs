//! Progress reporting for pipeline runs

use shared::logging::log_progress;

use crate::traits::ProgressSink;

/// Where each pipeline step sits on the 0-100 scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressPlan {
    pub copyright: f32,
    pub dedication: f32,
    pub pages_start: f32,
    pub pages_span: f32,
    pub last_word: f32,
    pub back_cover: f32,
}

impl ProgressPlan {
    /// Full book: front matter first, pages in 30-70, closing pages after
    pub const FULL_BOOK: ProgressPlan = ProgressPlan {
        copyright: 10.0,
        dedication: 20.0,
        pages_start: 30.0,
        pages_span: 40.0,
        last_word: 75.0,
        back_cover: 85.0,
    };

    /// Story pages only: pages fill 10-100
    pub const STORY_PAGES_ONLY: ProgressPlan = ProgressPlan {
        copyright: 10.0,
        dedication: 10.0,
        pages_start: 10.0,
        pages_span: 90.0,
        last_word: 100.0,
        back_cover: 100.0,
    };

    pub fn for_mode(story_pages_only: bool) -> Self {
        if story_pages_only {
            Self::STORY_PAGES_ONLY
        } else {
            Self::FULL_BOOK
        }
    }

    /// Percentage reported before the page at `index` of `total`
    pub fn story_page(&self, index: usize, total: usize) -> f32 {
        if total == 0 {
            return self.pages_start;
        }
        self.pages_start + (index + 1) as f32 * self.pages_span / total as f32
    }
}

/// Forwards progress to an optional sink, never going backwards or out of range
pub struct ProgressReporter<'a> {
    sink: Option<&'a dyn ProgressSink>,
    last: f32,
}

impl<'a> ProgressReporter<'a> {
    pub fn new(sink: Option<&'a dyn ProgressSink>) -> Self {
        Self { sink, last: 0.0 }
    }

    pub fn report(&mut self, label: &str, percent: f32) {
        let percent = percent.clamp(0.0, 100.0).max(self.last);
        self.last = percent;
        if let Some(sink) = self.sink {
            sink.on_progress(label, percent);
        }
    }

    pub fn last(&self) -> f32 {
        self.last
    }
}

/// Progress sink that writes each step to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingProgress;

impl ProgressSink for LoggingProgress {
    fn on_progress(&self, label: &str, percent: f32) {
        log_progress(label, &format!("{percent:.0}%"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_story_page_interpolation() {
        let plan = ProgressPlan::FULL_BOOK;
        assert_eq!(plan.story_page(0, 4), 40.0);
        assert_eq!(plan.story_page(3, 4), 70.0);

        let pages_only = ProgressPlan::for_mode(true);
        assert_eq!(pages_only.story_page(0, 3), 40.0);
        assert_eq!(pages_only.story_page(2, 3), 100.0);
        assert_eq!(pages_only.story_page(0, 0), 10.0);
    }

    #[test]
    fn test_reporter_is_monotonic_and_bounded() {
        let seen = Mutex::new(Vec::new());
        let sink = |label: &str, percent: f32| seen.lock().unwrap().push((label.to_string(), percent));

        {
            let mut reporter = ProgressReporter::new(Some(&sink));
            reporter.report("a", 20.0);
            reporter.report("b", 10.0);
            reporter.report("c", 140.0);
            reporter.report("d", -5.0);
            assert_eq!(reporter.last(), 100.0);
        }

        let percents: Vec<f32> = seen.lock().unwrap().iter().map(|(_, p)| *p).collect();
        assert_eq!(percents, vec![20.0, 20.0, 100.0, 100.0]);
    }

    #[test]
    fn test_reporter_without_sink() {
        let mut reporter = ProgressReporter::new(None);
        reporter.report("quiet", 50.0);
        assert_eq!(reporter.last(), 50.0);
        LoggingProgress.on_progress("logged", 50.0);
    }
}
