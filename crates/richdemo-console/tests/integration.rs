//! Integration tests for richdemo-console component interoperability.
//!
//! These tests verify that components work correctly together at their boundaries:
//! - Many producers sharing one coordinator
//! - Live regions (progress, live display) mixed with appended output
//! - Logger + progress interaction
//! - Config driving the console

use std::sync::{Arc, Barrier};
use std::thread;

use log::{Level, LevelFilter, Log, Record};
use richdemo_console::logging::RichLogger;
use richdemo_console::testing::TestConsole;
use richdemo_console::widgets::{Column, Panel, Table};
use richdemo_console::{
    ConsoleConfig, ConsoleError, Content, DemoConsole, ErrorBoundary, Line, LiveDisplay,
    ProgressTracker, RegionId, Span, track,
};

fn log_line(logger: &RichLogger, target: &str, message: &str) {
    logger.log(
        &Record::builder()
            .level(Level::Info)
            .target(target)
            .args(format_args!("{message}"))
            .build(),
    );
}

// ============================================================================
// Mutual Exclusion
// ============================================================================

#[test]
fn test_concurrent_producers_never_interleave() {
    const THREADS: usize = 8;
    const LINES: usize = 200;

    let tc = TestConsole::with_width(200);
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let console = tc.console().clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..LINES {
                    let text = format!("thread-{t} line-{i:03} {}", "x".repeat(t * 10));
                    console.print(&text).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let lines = tc.output();
    assert_eq!(lines.len(), THREADS * LINES);
    for t in 0..THREADS {
        let own: Vec<&String> = lines
            .iter()
            .filter(|l| l.starts_with(&format!("thread-{t} ")))
            .collect();
        assert_eq!(own.len(), LINES);
        for (i, line) in own.iter().enumerate() {
            // whole, and in the order the thread wrote them
            assert_eq!(**line, format!("thread-{t} line-{i:03} {}", "x".repeat(t * 10)));
        }
    }
}

#[test]
fn test_guard_holds_multi_write_blocks_together() {
    let tc = TestConsole::new();
    let coordinator = Arc::clone(tc.console().coordinator());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let coordinator = Arc::clone(&coordinator);
            thread::spawn(move || {
                for _ in 0..25 {
                    let mut guard = coordinator.acquire();
                    guard.write(format!("begin {t}")).unwrap();
                    guard.write(format!("end {t}")).unwrap();
                    guard.release();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let lines = tc.output();
    for pair in lines.chunks(2) {
        let t = pair[0].strip_prefix("begin ").unwrap();
        assert_eq!(pair[1], format!("end {t}"));
    }
}

#[test]
fn test_sequential_producers_appear_in_order() {
    let tc = TestConsole::new();
    let coordinator = tc.console().coordinator();

    let mut a = coordinator.acquire();
    a.write("X").unwrap();
    a.release();

    let mut b = coordinator.acquire();
    b.write("Y").unwrap();
    b.release();

    assert_eq!(tc.raw_output(), "X\nY\n");
    tc.assert_line_count(2);
}

#[test]
fn test_write_after_close_is_output_closed() {
    let tc = TestConsole::new();
    let console = tc.console();
    console.print("before").unwrap();
    console.coordinator().close().unwrap();

    for _ in 0..3 {
        assert!(matches!(console.print("after"), Err(ConsoleError::OutputClosed)));
    }
    assert!(matches!(
        console.coordinator().refresh_live(&RegionId::new("bar"), "x"),
        Err(ConsoleError::OutputClosed)
    ));
    assert_eq!(tc.output(), vec!["before".to_string()]);
}

#[test]
fn test_render_failure_writes_nothing() {
    let tc = TestConsole::new_rich();
    let mut content = Content::plain("fine");
    content.push(Span::styled("broken", "sparkly"));

    let err = tc.console().print_content(content).unwrap_err();
    assert!(matches!(err, ConsoleError::RenderFailure { .. }));
    assert!(tc.raw_output().is_empty());
}

// ============================================================================
// Live Regions
// ============================================================================

#[test]
fn test_repeated_refresh_leaves_one_rendering() {
    let tc = TestConsole::new_rich();
    let region = RegionId::new("status");
    for i in 0..20 {
        tc.console()
            .coordinator()
            .refresh_live(&region, format!("status {i}"))
            .unwrap();
    }
    let screen = tc.screen();
    assert_eq!(screen.count_containing("status"), 1);
    assert_eq!(screen.lines(), vec!["status 19".to_string()]);
}

#[test]
fn test_multi_row_region_refresh_leaves_one_rendering() {
    let tc = TestConsole::new_rich();
    let region = RegionId::new("two-rows");
    for i in 0..3 {
        tc.console()
            .coordinator()
            .refresh_live(&region, Line::plain(format!("head {i}\ntail {i}")))
            .unwrap();
    }
    let screen = tc.screen();
    assert_eq!(screen.lines(), vec!["head 2".to_string(), "tail 2".to_string()]);
}

#[test]
fn test_progress_zero_to_ten_leaves_one_final_line() {
    let tc = TestConsole::new_rich();
    let mut progress = ProgressTracker::new(tc.console(), "Steps", 10).unwrap();
    assert_eq!(progress.state().current(), 0);
    for _ in 0..10 {
        progress.advance(1).unwrap();
    }
    progress.finish().unwrap();

    let lines = tc.screen().lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("10/10"));
    assert!(lines[0].contains("100%"));
}

#[test]
fn test_logging_above_live_progress() {
    let tc = TestConsole::new_rich();
    let logger = RichLogger::builder(tc.console())
        .level(LevelFilter::Info)
        .with_timestamps(false)
        .build();

    let mut progress = ProgressTracker::new(tc.console(), "Loading", 5).unwrap();
    for i in 0..5 {
        log_line(&logger, "demo.worker", &format!("processed item {i}"));
        progress.advance(1).unwrap();
    }
    progress.finish().unwrap();

    let lines = tc.screen().lines();
    assert_eq!(lines.len(), 6);
    for (i, line) in lines[..5].iter().enumerate() {
        assert!(line.contains(&format!("processed item {i}")), "{line}");
    }
    assert!(lines[5].starts_with("Loading"));
    assert!(lines[5].contains("5/5"));
}

#[test]
fn test_worker_threads_log_while_progress_runs() {
    let tc = TestConsole::new_rich();
    let logger = Arc::new(
        RichLogger::builder(tc.console())
            .with_timestamps(false)
            .build(),
    );

    let workers: Vec<_> = ["system", "network", "database", "auth"]
        .into_iter()
        .map(|name| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..10 {
                    log_line(&logger, &format!("demo.{name}"), &format!("{name} event {i}"));
                }
            })
        })
        .collect();

    let tracked: Vec<u32> = track(0..20_u32, "Working", tc.console()).collect();
    for worker in workers {
        worker.join().unwrap();
    }
    assert_eq!(tracked.len(), 20);

    let screen = tc.screen();
    assert_eq!(screen.count_containing("Working"), 1);
    assert_eq!(screen.count_containing(" event "), 40);
    assert!(screen.lines().iter().all(|l| !(l.contains("event") && l.contains("Working"))));
}

#[test]
fn test_live_display_of_table() {
    let tc = TestConsole::rich_with_width(60);
    let mut live = LiveDisplay::new(tc.console());
    for round in 0..3 {
        let mut table = Table::new();
        table.add_column(Column::new("Round"));
        table.add_row_cells([format!("round {round}")]);
        live.update(&Panel::new(table).title("Live")).unwrap();
    }
    live.stop().unwrap();

    let screen = tc.screen();
    assert_eq!(screen.count_containing("Live"), 1);
    assert_eq!(screen.count_containing("round 2"), 1);
    assert_eq!(screen.count_containing("round 0"), 0);
}

// ============================================================================
// Config-Console Integration
// ============================================================================

#[test]
fn test_plain_config_builds_plain_console() {
    let config = ConsoleConfig::new().plain_mode().with_width(42);
    let console = DemoConsole::from_config(&config);
    assert!(!console.is_rich());
    assert_eq!(console.width(), 42);
}

#[test]
fn test_forced_color_config_builds_rich_console() {
    let config = ConsoleConfig::new().force_color(true).with_width(100);
    let console = DemoConsole::from_config(&config);
    assert!(console.is_rich());
    assert_eq!(console.width(), 100);
}

#[test]
fn test_config_file_then_env_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "plain = true\nwidth = 64\nspeed = 0.5\n\n[grid]\ncycles = 3\npeople = 2\n",
    )
    .unwrap();

    let config = ConsoleConfig::new()
        .with_file(&path)
        .unwrap()
        .with_env(|key| (key == "RICHDEMO_GRID_CYCLES").then(|| "5".to_string()));
    assert_eq!(config.grid_cycles, 5);
    assert_eq!(config.grid_people, 2);
    assert!((config.speed - 0.5).abs() < f64::EPSILON);

    let console = DemoConsole::from_config(&config);
    assert!(!console.is_rich());
    assert_eq!(console.width(), 64);
}

#[test]
fn test_bad_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "log_level = \"loud\"\n").unwrap();

    let err = ConsoleConfig::new().with_file(&path).unwrap_err();
    assert!(err.to_string().contains("loud"), "{err}");
}

// ============================================================================
// Error Display
// ============================================================================

#[test]
fn test_boundary_renders_through_shared_console() {
    let tc = TestConsole::new();
    let boundary = ErrorBoundary::new(tc.console());
    let parsed = boundary.wrap_with_context("abc".parse::<u32>(), "Parsing port");
    assert_eq!(parsed, None);
    tc.assert_contains("Context: Parsing port");
    tc.assert_contains("invalid digit found in string");
}
