//! Recording event streams to NDJSON and monitoring them back.

#![cfg(feature = "ndjson")]

use std::path::PathBuf;

use hypermon::{Event, EventRecorder, Monitor, MonitorConfig, NdjsonInputs};

const ADDR: u64 = 0x2000;

fn record(dir: &std::path::Path, name: &str, events: &[Event]) -> PathBuf {
    let path = dir.join(name);
    let mut recorder = EventRecorder::create(&path).unwrap();
    for event in events {
        recorder.record(event).unwrap();
    }
    assert_eq!(recorder.finish().unwrap(), events.len());
    path
}

#[test]
fn recorded_streams_monitor_clean() {
    let dir = tempfile::tempdir().unwrap();
    let events = [
        Event::low_input(1, ADDR, 1),
        Event::low_input(2, ADDR, 2),
        Event::low_output(3, ADDR, 1),
    ];
    let a = record(dir.path(), "a.ndjson", &events);
    let b = record(dir.path(), "b.ndjson", &events);

    let mut inputs = NdjsonInputs::open([a, b]).unwrap();
    let verdict = Monitor::new(MonitorConfig::default()).run(&mut inputs);
    assert_eq!(verdict.exit_code(), 0);
}

#[test]
fn recorded_streams_monitor_violation() {
    let dir = tempfile::tempdir().unwrap();
    let a = record(
        dir.path(),
        "a.ndjson",
        &[Event::low_input(1, ADDR, 1), Event::low_output(2, ADDR, 7)],
    );
    let b = record(
        dir.path(),
        "b.ndjson",
        &[Event::low_input(1, ADDR, 1), Event::low_output(2, ADDR, 8)],
    );

    let mut inputs = NdjsonInputs::open([a, b]).unwrap();
    let verdict = Monitor::new(MonitorConfig::default()).run(&mut inputs);
    assert_ne!(verdict.exit_code(), 0);
}

#[test]
fn line_format_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let path = record(dir.path(), "one.ndjson", &[Event::low_input(1, 16, 2)]);

    let content = std::fs::read_to_string(&path).unwrap();
    let line: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
    assert_eq!(line["kind"], "low_input");
    assert_eq!(line["id"], 1);
    assert_eq!(line["addr"], 16);
    assert_eq!(line["value"], 2);
}

#[test]
fn open_fails_on_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.ndjson");
    let err = NdjsonInputs::open([missing]).unwrap_err();
    assert!(err.to_string().contains("Cannot read"), "got: {err}");
}

#[test]
fn empty_recorded_file_monitors_clean() {
    let dir = tempfile::tempdir().unwrap();
    let a = record(dir.path(), "a.ndjson", &[]);
    let b = record(dir.path(), "b.ndjson", &[]);

    let mut inputs = NdjsonInputs::open([a, b]).unwrap();
    let mut monitor = Monitor::new(MonitorConfig::default());
    let verdict = monitor.run(&mut inputs);
    assert_eq!(verdict.exit_code(), 0);
    assert_eq!(monitor.traces().len(), 2);
}
