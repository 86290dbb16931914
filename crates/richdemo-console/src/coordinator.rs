//! Serialized access to the shared terminal output.
//!
//! Every producer (logger, progress tracker, table renderer, worker thread)
//! holds an `Arc<OutputCoordinator>` and writes through it. One producer at
//! a time holds the [`OutputGuard`]; the rest block in
//! [`acquire`](OutputCoordinator::acquire).
//!
//! Live regions stay pinned below ordinary output. Appending content erases
//! the live block, writes the content, then redraws the block, so a progress
//! bar is never duplicated and log lines never land inside it.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

use crate::content::{Content, Line, RenderRequest};
use crate::error::{ConsoleError, ConsoleResult};
use crate::render::{PlainRenderer, Renderer};

/// Move the cursor up `n` lines.
fn cursor_up(n: usize) -> String {
    format!("\x1b[{n}A")
}

/// Carriage return plus erase from cursor to end of screen.
const ERASE_DOWN: &str = "\r\x1b[J";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Name of an in-place updatable area of the output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionId(String);

impl RegionId {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

struct LiveRegion {
    id: RegionId,
    lines: Vec<String>,
}

struct OutputState {
    sink: Option<Box<dyn Write + Send>>,
    renderer: Box<dyn Renderer>,
    regions: Vec<LiveRegion>,
    /// Lines of the live block currently drawn below the cursor's row.
    drawn: usize,
    redraw_live: bool,
}

impl OutputState {
    fn sink(&mut self) -> ConsoleResult<&mut Box<dyn Write + Send>> {
        self.sink.as_mut().ok_or(ConsoleError::OutputClosed)
    }

    fn render(&self, content: &Content, width: Option<usize>) -> ConsoleResult<Vec<String>> {
        // One entry per terminal row, so the live block height is exact.
        content
            .lines()
            .iter()
            .flat_map(Line::rows)
            .map(|row| match width {
                Some(w) => self.renderer.render_line(&row.truncate(w)),
                None => self.renderer.render_line(&row),
            })
            .collect()
    }

    /// Write a chunk, closing the sink for good if the reader went away.
    fn emit(&mut self, bytes: &str) -> ConsoleResult<()> {
        let result = self.sink()?.write_all(bytes.as_bytes());
        self.check(result)
    }

    fn flush(&mut self) -> ConsoleResult<()> {
        let result = self.sink()?.flush();
        self.check(result)
    }

    fn check(&mut self, result: io::Result<()>) -> ConsoleResult<()> {
        result.map_err(|err| {
            let err = ConsoleError::from(err);
            if err.is_closed() {
                self.sink = None;
            }
            err
        })
    }

    fn erase_live(&mut self) -> ConsoleResult<()> {
        if self.drawn > 0 {
            let seq = format!("{}{ERASE_DOWN}", cursor_up(self.drawn));
            self.emit(&seq)?;
            self.drawn = 0;
        }
        Ok(())
    }

    fn draw_live(&mut self) -> ConsoleResult<()> {
        if !self.redraw_live {
            return Ok(());
        }
        let mut block = String::new();
        let mut count = 0;
        for region in &self.regions {
            for line in &region.lines {
                block.push_str(line);
                block.push('\n');
                count += 1;
            }
        }
        if count > 0 {
            self.emit(&block)?;
        }
        self.drawn = count;
        Ok(())
    }

    fn append_lines(&mut self, lines: &[String]) -> ConsoleResult<()> {
        self.sink()?;
        self.erase_live()?;
        let mut out = String::new();
        for line in lines {
            out.push_str(line);
            out.push('\n');
        }
        self.emit(&out)?;
        self.draw_live()?;
        self.flush()
    }
}

/// Exclusive owner of the terminal output.
pub struct OutputCoordinator {
    state: Mutex<OutputState>,
    width: usize,
    rich: bool,
}

impl OutputCoordinator {
    /// Start building a coordinator around `sink`.
    #[must_use]
    pub fn builder<W: Write + Send + 'static>(sink: W) -> CoordinatorBuilder {
        CoordinatorBuilder::new(Box::new(sink))
    }

    /// Block until this producer has exclusive access to the output.
    ///
    /// The returned guard releases access when dropped.
    pub fn acquire(&self) -> OutputGuard<'_> {
        OutputGuard {
            state: self.state.lock().unwrap_or_else(PoisonError::into_inner),
            width: self.width,
        }
    }

    /// Exclusive access if nobody holds it right now, without blocking.
    ///
    /// For callers that may already hold a guard on this thread, such as a
    /// panic hook.
    pub fn try_acquire(&self) -> Option<OutputGuard<'_>> {
        let state = match self.state.try_lock() {
            Ok(state) => state,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return None,
        };
        Some(OutputGuard {
            state,
            width: self.width,
        })
    }

    /// Acquire, write, release.
    pub fn write(&self, content: impl Into<Content>) -> ConsoleResult<()> {
        self.acquire().write(content)
    }

    /// Acquire, submit, release.
    pub fn submit(&self, request: RenderRequest) -> ConsoleResult<()> {
        self.acquire().submit(request)
    }

    /// Replace the rendering of a live region in place, registering the
    /// region on first use.
    pub fn refresh_live(&self, region: &RegionId, content: impl Into<Content>) -> ConsoleResult<()> {
        let content = content.into();
        let mut guard = self.acquire();
        let state = &mut *guard.state;
        state.sink()?;
        let lines = state.render(&content, Some(self.width))?;

        state.erase_live()?;
        match state.regions.iter_mut().find(|r| &r.id == region) {
            Some(existing) => existing.lines = lines,
            None => state.regions.push(LiveRegion {
                id: region.clone(),
                lines,
            }),
        }
        state.draw_live()?;
        state.flush()
    }

    /// Stop tracking a live region. With `keep`, its last rendering stays on
    /// screen as ordinary output; otherwise it is erased.
    pub fn remove_live(&self, region: &RegionId, keep: bool) -> ConsoleResult<()> {
        let mut guard = self.acquire();
        let state = &mut *guard.state;
        let Some(pos) = state.regions.iter().position(|r| &r.id == region) else {
            return Ok(());
        };
        if state.sink.is_none() {
            state.regions.remove(pos);
            return Err(ConsoleError::OutputClosed);
        }

        state.erase_live()?;
        let removed = state.regions.remove(pos);
        if keep && !removed.lines.is_empty() {
            let mut out = String::new();
            for line in &removed.lines {
                out.push_str(line);
                out.push('\n');
            }
            state.emit(&out)?;
        }
        state.draw_live()?;
        state.flush()
    }

    /// Whether the region is currently registered.
    ///
    /// Takes the lock, so must not be called while holding a guard.
    #[must_use]
    pub fn has_live(&self, region: &RegionId) -> bool {
        self.acquire().state.regions.iter().any(|r| &r.id == region)
    }

    /// Flush and drop the sink. Later writes fail with `OutputClosed`.
    pub fn close(&self) -> ConsoleResult<()> {
        let mut guard = self.acquire();
        let state = &mut *guard.state;
        state.regions.clear();
        state.drawn = 0;
        match state.sink.take() {
            Some(mut sink) => sink.flush().map_err(ConsoleError::from),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.acquire().state.sink.is_none()
    }

    /// Render width in terminal cells.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether the renderer emits ANSI styling.
    #[must_use]
    pub fn is_rich(&self) -> bool {
        self.rich
    }
}

impl fmt::Debug for OutputCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputCoordinator")
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}

/// Scoped exclusive access to the output.
///
/// Dropping the guard (or calling [`release`](Self::release)) gives access
/// back, so release happens exactly once even on error paths.
pub struct OutputGuard<'a> {
    state: MutexGuard<'a, OutputState>,
    width: usize,
}

impl OutputGuard<'_> {
    /// Render and write `content` as ordinary (appended) output.
    ///
    /// The whole block is rendered before anything is written, so a
    /// `RenderFailure` leaves the output untouched.
    pub fn write(&mut self, content: impl Into<Content>) -> ConsoleResult<()> {
        let content = content.into();
        self.state.sink()?;
        let lines = self.state.render(&content, None)?;
        self.state.append_lines(&lines)
    }

    pub fn submit(&mut self, request: RenderRequest) -> ConsoleResult<()> {
        self.write(request.into_content())
    }

    /// Write text that is already rendered (for example by a syntax
    /// highlighter). Each `\n` separated line is appended verbatim.
    pub fn write_raw(&mut self, text: &str) -> ConsoleResult<()> {
        let lines: Vec<String> = text.lines().map(String::from).collect();
        self.state.append_lines(&lines)
    }

    /// Clear the screen. Only emitted when live redraw is enabled, since
    /// that is the only mode where the output is known to be a terminal.
    pub fn clear_screen(&mut self) -> ConsoleResult<()> {
        self.state.sink()?;
        if self.state.redraw_live {
            self.state.drawn = 0;
            self.state.emit(CLEAR_SCREEN)?;
            self.state.draw_live()?;
        }
        self.state.flush()
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Give up exclusive access.
    pub fn release(self) {
        drop(self);
    }
}

/// Builder for [`OutputCoordinator`].
pub struct CoordinatorBuilder {
    sink: Box<dyn Write + Send>,
    renderer: Box<dyn Renderer>,
    width: usize,
    redraw_live: bool,
}

impl CoordinatorBuilder {
    fn new(sink: Box<dyn Write + Send>) -> Self {
        Self {
            sink,
            renderer: Box::new(PlainRenderer),
            width: 80,
            redraw_live: false,
        }
    }

    #[must_use]
    pub fn renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    /// Redraw live regions with cursor movement. When off, a live region is
    /// only printed once, when it is removed with `keep`.
    #[must_use]
    pub fn redraw_live(mut self, enabled: bool) -> Self {
        self.redraw_live = enabled;
        self
    }

    #[must_use]
    pub fn build(self) -> OutputCoordinator {
        let rich = self.renderer.color_enabled();
        OutputCoordinator {
            state: Mutex::new(OutputState {
                sink: Some(self.sink),
                renderer: self.renderer,
                regions: Vec::new(),
                drawn: 0,
                redraw_live: self.redraw_live,
            }),
            width: self.width,
            rich,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::AnsiRenderer;
    use std::sync::{Arc, Mutex as StdMutex};

    #[derive(Clone, Default)]
    struct Shared(Arc<StdMutex<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Shared {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sequential_producers_do_not_interleave() {
        let sink = Shared::default();
        let coordinator = OutputCoordinator::builder(sink.clone()).build();

        let mut a = coordinator.acquire();
        a.write("X").unwrap();
        a.release();
        let mut b = coordinator.acquire();
        b.write("Y").unwrap();
        b.release();

        assert_eq!(sink.text(), "X\nY\n");
    }

    #[test]
    fn test_write_after_close_is_output_closed() {
        let coordinator = OutputCoordinator::builder(Shared::default()).build();
        coordinator.close().unwrap();
        for _ in 0..3 {
            let err = coordinator.write("late").unwrap_err();
            assert!(err.is_closed());
        }
        assert!(coordinator.is_closed());
    }

    #[test]
    fn test_broken_pipe_closes_the_sink() {
        let coordinator = OutputCoordinator::builder(BrokenPipe).build();
        assert!(coordinator.write("a").unwrap_err().is_closed());
        assert!(coordinator.is_closed());
    }

    #[test]
    fn test_render_failure_writes_nothing() {
        let sink = Shared::default();
        let coordinator = OutputCoordinator::builder(sink.clone()).build();
        let mut content = Content::plain("fine");
        content.push(crate::content::Line::styled("bad", "notacolour"));

        let err = coordinator.write(content).unwrap_err();
        assert!(matches!(err, ConsoleError::RenderFailure { .. }));
        assert_eq!(sink.text(), "");
    }

    #[test]
    fn test_refresh_live_without_redraw_prints_on_keep() {
        let sink = Shared::default();
        let coordinator = OutputCoordinator::builder(sink.clone()).build();
        let region = RegionId::new("bar");

        for i in 0..5 {
            coordinator.refresh_live(&region, format!("step {i}")).unwrap();
        }
        assert_eq!(sink.text(), "");

        coordinator.remove_live(&region, true).unwrap();
        assert_eq!(sink.text(), "step 4\n");
        assert!(!coordinator.has_live(&region));
    }

    #[test]
    fn test_refresh_live_with_redraw_moves_cursor() {
        let sink = Shared::default();
        let coordinator = OutputCoordinator::builder(sink.clone())
            .renderer(Box::new(AnsiRenderer))
            .redraw_live(true)
            .build();
        let region = RegionId::new("bar");

        coordinator.refresh_live(&region, "one").unwrap();
        coordinator.refresh_live(&region, "two").unwrap();

        assert_eq!(sink.text(), "one\n\x1b[1A\r\x1b[Jtwo\n");
    }

    #[test]
    fn test_live_block_stays_below_appended_output() {
        let sink = Shared::default();
        let coordinator = OutputCoordinator::builder(sink.clone())
            .redraw_live(true)
            .build();
        let region = RegionId::new("bar");

        coordinator.refresh_live(&region, "bar 1").unwrap();
        coordinator.write("log line").unwrap();

        assert_eq!(sink.text(), "bar 1\n\x1b[1A\r\x1b[Jlog line\nbar 1\n");
    }

    #[test]
    fn test_remove_unknown_region_is_noop() {
        let coordinator = OutputCoordinator::builder(Shared::default()).build();
        assert!(coordinator.remove_live(&RegionId::new("nope"), true).is_ok());
    }

    #[test]
    fn test_live_lines_truncated_to_width() {
        let sink = Shared::default();
        let coordinator = OutputCoordinator::builder(sink.clone())
            .width(5)
            .redraw_live(true)
            .build();
        coordinator
            .refresh_live(&RegionId::new("r"), "0123456789")
            .unwrap();
        assert_eq!(sink.text(), "0123…\n");
    }

    #[test]
    fn test_multi_row_line_counts_every_row() {
        let sink = Shared::default();
        let coordinator = OutputCoordinator::builder(sink.clone())
            .redraw_live(true)
            .build();
        let region = RegionId::new("r");

        coordinator
            .refresh_live(&region, crate::content::Line::plain("head 0\ntail 0"))
            .unwrap();
        coordinator
            .refresh_live(&region, crate::content::Line::plain("head 1\ntail 1"))
            .unwrap();

        assert_eq!(
            sink.text(),
            "head 0\ntail 0\n\x1b[2A\r\x1b[Jhead 1\ntail 1\n"
        );
    }

    #[test]
    fn test_try_acquire_while_held() {
        let sink = Shared::default();
        let coordinator = OutputCoordinator::builder(sink.clone()).build();

        let held = coordinator.acquire();
        assert!(coordinator.try_acquire().is_none());
        held.release();

        let mut guard = coordinator.try_acquire().unwrap();
        guard.write("free").unwrap();
        guard.release();
        assert_eq!(sink.text(), "free\n");
    }
}
