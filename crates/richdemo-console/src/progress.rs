//! Progress bars drawn as live regions.
//!
//! A [`ProgressTracker`] owns one live region on the console. Every update
//! replaces the bar in place; [`finish`](ProgressTracker::finish) leaves the
//! final state on screen as ordinary output.
//!
//! ```text
//! Processing ━━━━━━━━━━━━━━━━━╸━━━━━━━━━━━━━━━━━━━━━━  42% 21/50 0:00:01
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::console::DemoConsole;
use crate::content::{Line, Span, StyleSpec};
use crate::coordinator::RegionId;
use crate::error::{ConsoleError, ConsoleResult};

const MAX_BAR_WIDTH: usize = 40;

/// Completed and total step counts. `current` never exceeds `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressState {
    current: u64,
    total: u64,
}

impl ProgressState {
    #[must_use]
    pub fn new(total: u64) -> Self {
        Self { current: 0, total }
    }

    #[must_use]
    pub fn current(&self) -> u64 {
        self.current
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Move forward by `steps`, stopping at `total`.
    pub fn advance(&mut self, steps: u64) {
        self.current = self.current.saturating_add(steps).min(self.total);
    }

    /// Jump to `current`, clamped to `total`.
    pub fn set(&mut self, current: u64) {
        self.current = current.min(self.total);
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current >= self.total
    }

    /// Completed fraction in `0.0..=1.0`. An empty task counts as done.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f64 / self.total as f64
        }
    }

    #[must_use]
    pub fn percent(&self) -> u64 {
        (self.fraction() * 100.0).floor() as u64
    }
}

static NEXT_REGION: AtomicU64 = AtomicU64::new(0);

/// A progress bar bound to a console.
pub struct ProgressTracker {
    console: DemoConsole,
    region: RegionId,
    description: String,
    state: ProgressState,
    started: Instant,
    finished: bool,
}

impl ProgressTracker {
    /// Create a tracker and draw it at 0/`total`.
    pub fn new(console: &DemoConsole, description: impl Into<String>, total: u64) -> ConsoleResult<Self> {
        let id = NEXT_REGION.fetch_add(1, Ordering::Relaxed);
        let tracker = Self {
            console: console.clone(),
            region: RegionId::new(format!("progress-{id}")),
            description: description.into(),
            state: ProgressState::new(total),
            started: Instant::now(),
            finished: false,
        };
        tracker.refresh()?;
        Ok(tracker)
    }

    #[must_use]
    pub fn state(&self) -> ProgressState {
        self.state
    }

    #[must_use]
    pub fn region(&self) -> &RegionId {
        &self.region
    }

    pub fn advance(&mut self, steps: u64) -> ConsoleResult<()> {
        self.state.advance(steps);
        self.refresh()
    }

    pub fn set(&mut self, current: u64) -> ConsoleResult<()> {
        self.state.set(current);
        self.refresh()
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> ConsoleResult<()> {
        self.description = description.into();
        self.refresh()
    }

    /// Redraw one last time and leave the bar on screen.
    pub fn finish(mut self) -> ConsoleResult<()> {
        self.finished = true;
        self.refresh()?;
        self.console.coordinator().remove_live(&self.region, true)
    }

    fn refresh(&self) -> ConsoleResult<()> {
        let line = render_bar(
            &self.description,
            self.state,
            self.started.elapsed(),
            self.console.width(),
        );
        self.console.coordinator().refresh_live(&self.region, line)
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.console.coordinator().remove_live(&self.region, true);
        }
    }
}

/// One progress line, fitted to `width`.
#[must_use]
pub fn render_bar(description: &str, state: ProgressState, elapsed: Duration, width: usize) -> Line {
    let theme = crate::theme::theme();
    let percent = format!("{:>3}%", state.percent());
    let count = format!("{}/{}", state.current(), state.total());
    let time = format_elapsed(elapsed);

    let fixed = console::measure_text_width(description) + percent.len() + count.len() + time.len() + 4;
    let bar_width = width.saturating_sub(fixed).min(MAX_BAR_WIDTH);

    let mut line = Line::new();
    if !description.is_empty() {
        line.push(Span::plain(description));
        line.push_str(" ");
    }
    if bar_width > 0 {
        let done_style = if state.is_complete() {
            theme.success.clone()
        } else {
            theme.secondary.clone()
        };
        line.extend(bar(state.fraction(), bar_width, done_style, theme.muted.clone()));
        line.push_str(" ");
    }
    line.push(Span::styled(percent, theme.secondary.clone()));
    line.push_str(" ");
    line.push(Span::styled(count, theme.success.clone()));
    line.push_str(" ");
    line.push(Span::styled(time, theme.warning.clone()));
    line
}

fn bar(fraction: f64, width: usize, done: StyleSpec, remaining: StyleSpec) -> Line {
    let halves = (fraction.clamp(0.0, 1.0) * width as f64 * 2.0).floor() as usize;
    let full = halves / 2;
    let half = halves % 2 == 1;
    let rest = width - full - usize::from(half);

    let mut line = Line::new();
    if full > 0 {
        line.push(Span::styled("━".repeat(full), done.clone()));
    }
    if half {
        line.push(Span::styled("╸", done));
    }
    if rest > 0 {
        line.push(Span::styled("━".repeat(rest), remaining));
    }
    line
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// Iterator adapter that advances a progress bar once per item.
pub struct Track<I> {
    inner: I,
    tracker: Option<ProgressTracker>,
    yielded: bool,
    error: Option<ConsoleError>,
}

/// Wrap `iter` with a progress bar sized by its length.
///
/// Drawing errors do not interrupt iteration; the first one is kept and
/// can be collected with [`Track::finish`].
pub fn track<I>(iter: I, description: impl Into<String>, console: &DemoConsole) -> Track<I::IntoIter>
where
    I: IntoIterator,
    I::IntoIter: ExactSizeIterator,
{
    let inner = iter.into_iter();
    let (tracker, error) = match ProgressTracker::new(console, description, inner.len() as u64) {
        Ok(tracker) => (Some(tracker), None),
        Err(err) => (None, Some(err)),
    };
    Track {
        inner,
        tracker,
        yielded: false,
        error,
    }
}

impl<I> Track<I> {
    fn record(&mut self, result: ConsoleResult<()>) {
        if let Err(err) = result {
            self.error.get_or_insert(err);
        }
    }

    /// Finish the bar if iteration stopped early and report the first
    /// drawing error, if any.
    pub fn finish(mut self) -> ConsoleResult<()> {
        if let Some(tracker) = self.tracker.take() {
            let result = tracker.finish();
            self.record(result);
        }
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<I: Iterator> Iterator for Track<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.yielded {
            if let Some(tracker) = self.tracker.as_mut() {
                let result = tracker.advance(1);
                self.record(result);
            }
        }
        let item = self.inner.next();
        self.yielded = item.is_some();
        if item.is_none() {
            if let Some(tracker) = self.tracker.take() {
                let result = tracker.finish();
                self.record(result);
            }
        }
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
