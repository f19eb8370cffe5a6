//! End-to-end: lifecycle notifications in, trace file out.

use std::sync::Arc;

use build_trace::{BUILD_TASK_GRAPH, TraceConfig, TracingSession};
use chrono::{Duration, Utc};

use crate::common::host::SimulatedBuild;
use crate::common::{assert_viewer_constants, find_events, init_logging, read_trace, trace_events};

fn attach(output_dir: &std::path::Path) -> (TracingSession, SimulatedBuild) {
    init_logging();
    let session = TracingSession::start(
        Utc::now() - Duration::milliseconds(250),
        output_dir,
        TraceConfig::default(),
    );
    let mut build = SimulatedBuild::new();
    build.add_listener(Arc::new(session.listener()));
    (session, build)
}

#[test]
fn test_task_and_resolve_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let (session, build) = attach(dir.path());

    build.run_task("a:build", || {});
    build.resolve("a:compileClasspath");
    let path = session.build_finished().expect("trace should be written");

    assert_eq!(path, dir.path().join("trace").join("task-trace.json"));
    let trace = read_trace(&path);
    assert_viewer_constants(&trace);
    // Four lifecycle events plus the build-duration bracket
    assert_eq!(trace_events(&trace).len(), 6);

    let begin = find_events(&trace, "a:build", "TASK", "B");
    let end = find_events(&trace, "a:build", "TASK", "E");
    assert_eq!(begin.len(), 1);
    assert_eq!(end.len(), 1);
    assert!(begin[0]["ts"].as_u64().unwrap() <= end[0]["ts"].as_u64().unwrap());
    assert_eq!(begin[0]["tid"], end[0]["tid"]);
    assert_eq!(begin[0]["pid"], 0);

    assert_eq!(find_events(&trace, "a:compileClasspath", "RESOLVE", "B").len(), 1);
    assert_eq!(find_events(&trace, "a:compileClasspath", "RESOLVE", "E").len(), 1);
}

#[test]
fn test_full_build_phases() {
    let dir = tempfile::tempdir().unwrap();
    let (session, build) = attach(dir.path());

    build.evaluate_project(":");
    build.evaluate_project(":app");
    build.build_task_graph();
    build.run_operation("Snapshot task inputs");
    build.run_task(":app:compileJava", || {});
    let trace = read_trace(&session.build_finished().unwrap());

    assert_eq!(trace_events(&trace).len(), 12);
    assert_eq!(find_events(&trace, ":app", "EVALUATE", "B").len(), 1);
    assert_eq!(find_events(&trace, BUILD_TASK_GRAPH, "PHASE", "B").len(), 1);
    assert_eq!(find_events(&trace, BUILD_TASK_GRAPH, "PHASE", "E").len(), 1);
    assert_eq!(
        find_events(&trace, "Snapshot task inputs", "BUILD_OPERATION", "E").len(),
        1
    );
}

#[test]
fn test_build_duration_spans_the_build() {
    let dir = tempfile::tempdir().unwrap();
    let (session, build) = attach(dir.path());

    build.run_task(":slow", || std::thread::sleep(std::time::Duration::from_millis(5)));
    let trace = read_trace(&session.build_finished().unwrap());

    let begin = find_events(&trace, "build duration", "PHASE", "B");
    let end = find_events(&trace, "build duration", "PHASE", "E");
    assert_eq!(begin.len(), 1);
    assert_eq!(end.len(), 1);

    // The bracket starts at the true build start, before tracing attached
    let build_start = begin[0]["ts"].as_u64().unwrap();
    let build_end = end[0]["ts"].as_u64().unwrap();
    assert_eq!(build_start, 0);
    assert!(build_end >= 250_000);

    for event in trace_events(&trace) {
        let ts = event["ts"].as_u64().unwrap();
        assert!((build_start..=build_end).contains(&ts), "{event} outside build");
    }
}

#[test]
fn test_empty_build_has_only_bracket() {
    let dir = tempfile::tempdir().unwrap();
    let (session, _build) = attach(dir.path());

    let trace = read_trace(&session.build_finished().unwrap());
    assert_viewer_constants(&trace);

    let events = trace_events(&trace);
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e["name"] == "build duration"));
}

#[test]
fn test_aborted_build_keeps_unmatched_begin() {
    let dir = tempfile::tempdir().unwrap();
    let (session, build) = attach(dir.path());

    build.run_task(":ok", || {});
    build.start_task(":interrupted");
    let trace = read_trace(&session.build_finished().unwrap());

    assert_eq!(find_events(&trace, ":interrupted", "TASK", "B").len(), 1);
    assert!(find_events(&trace, ":interrupted", "TASK", "E").is_empty());
}

#[test]
fn test_unwritable_output_leaves_build_running() {
    let dir = tempfile::tempdir().unwrap();
    let blocked = dir.path().join("build");
    std::fs::write(&blocked, "a file, not a directory").unwrap();
    let (session, build) = attach(&blocked);

    build.run_task(":a", || {});
    assert!(session.build_finished().is_none());

    // Notifications after a failed write are still accepted
    build.run_task(":b", || {});
}
