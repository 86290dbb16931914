//! Live display of any renderable, redrawn in place.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::console::DemoConsole;
use crate::content::{Content, Line};
use crate::coordinator::RegionId;
use crate::error::ConsoleResult;
use crate::widgets::Renderable;

static NEXT_REGION: AtomicU64 = AtomicU64::new(0);

/// Re-renders a renderable into one live region.
///
/// The final frame stays on screen when the display is stopped or dropped.
pub struct LiveDisplay {
    console: DemoConsole,
    region: RegionId,
    max_height: Option<usize>,
    stopped: bool,
}

impl LiveDisplay {
    #[must_use]
    pub fn new(console: &DemoConsole) -> Self {
        let id = NEXT_REGION.fetch_add(1, Ordering::Relaxed);
        Self {
            console: console.clone(),
            region: RegionId::new(format!("live-{id}")),
            max_height: None,
            stopped: false,
        }
    }

    /// Cap each frame at `lines` rows. A cursor cannot move above the top
    /// of the terminal, so frames taller than the screen cannot be redrawn.
    #[must_use]
    pub fn max_height(mut self, lines: usize) -> Self {
        self.max_height = Some(lines.max(1));
        self
    }

    #[must_use]
    pub fn region(&self) -> &RegionId {
        &self.region
    }

    /// Replace the displayed frame.
    pub fn update(&mut self, renderable: &dyn Renderable) -> ConsoleResult<()> {
        let content = renderable.render(self.console.width())?;
        let content = match self.max_height {
            Some(max) if content.len() > max => crop(content, max),
            _ => content,
        };
        self.console.coordinator().refresh_live(&self.region, content)
    }

    /// Stop updating and leave the last frame as ordinary output.
    pub fn stop(mut self) -> ConsoleResult<()> {
        self.stopped = true;
        self.console.coordinator().remove_live(&self.region, true)
    }
}

impl Drop for LiveDisplay {
    fn drop(&mut self) {
        if !self.stopped {
            let _ = self.console.coordinator().remove_live(&self.region, true);
        }
    }
}

fn crop(content: Content, max: usize) -> Content {
    let mut lines = content.into_lines();
    lines.truncate(max - 1);
    lines.push(Line::styled("…", crate::theme::theme().muted.clone()));
    Content::from_lines(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestConsole;
    use crate::widgets::Panel;

    #[test]
    fn test_updates_replace_previous_frame() {
        let tc = TestConsole::rich_with_width(30);
        let mut live = LiveDisplay::new(tc.console());
        for i in 0..5 {
            live.update(&Panel::fit(format!("frame {i}"))).unwrap();
        }
        live.stop().unwrap();
        let screen = tc.screen();
        assert_eq!(screen.count_containing("frame"), 1);
        assert_eq!(screen.count_containing("frame 4"), 1);
    }

    #[test]
    fn test_plain_mode_prints_last_frame() {
        let tc = TestConsole::new();
        let mut live = LiveDisplay::new(tc.console());
        live.update(&"first").unwrap();
        live.update(&"second").unwrap();
        drop(live);
        assert_eq!(tc.output(), vec!["second".to_string()]);
    }

    #[test]
    fn test_max_height_crops() {
        let tc = TestConsole::new();
        let mut live = LiveDisplay::new(tc.console()).max_height(3);
        live.update(&"1\n2\n3\n4\n5").unwrap();
        live.stop().unwrap();
        assert_eq!(tc.output(), vec!["1", "2", "…"]);
    }

    #[test]
    fn test_render_failure_leaves_frame() {
        let tc = TestConsole::new();
        let mut live = LiveDisplay::new(tc.console());
        live.update(&"good").unwrap();
        let bad = Content::styled("bad", "not-a-style");
        assert!(live.update(&bad).is_err());
        live.stop().unwrap();
        assert_eq!(tc.output(), vec!["good".to_string()]);
    }
}
