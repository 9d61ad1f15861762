//! End-to-end monitoring scenarios.

use hypermon::{Event, EventKind, Monitor, MonitorConfig, StaticInputs, Verdict};

const ADDR: u64 = 0x1000;

/// InputL 1..=n followed by OutputL with the given values.
fn in_out_stream(inputs: &[u64], outputs: &[u64]) -> Vec<Event> {
    let mut events = Vec::new();
    let mut id = 0;
    for &v in inputs {
        id += 1;
        events.push(Event::low_input(id, ADDR, v));
    }
    for &v in outputs {
        id += 1;
        events.push(Event::low_output(id, ADDR, v));
    }
    events
}

fn run(streams: Vec<Vec<Event>>) -> (Verdict, Monitor) {
    let mut monitor = Monitor::new(MonitorConfig::default());
    let verdict = monitor.run(&mut StaticInputs::new(streams));
    (verdict, monitor)
}

#[test]
fn identical_streams_hold() {
    let stream = in_out_stream(&[1, 2, 3], &[1, 2, 3]);
    let (verdict, _) = run(vec![stream.clone(), stream]);
    assert_eq!(verdict.exit_code(), 0);
    assert!(!verdict.is_violation());
}

#[test]
fn diverging_output_value_is_a_violation() {
    // same public inputs, different third public output
    let left = in_out_stream(&[1, 2, 3], &[1, 2, 4]);
    let right = in_out_stream(&[1, 2, 3], &[1, 2, 3]);
    let (verdict, _) = run(vec![left, right]);
    assert_ne!(verdict.exit_code(), 0);

    let Verdict::Violation { left, right, report } = verdict else {
        panic!("expected a violation");
    };
    assert_ne!(left, right);
    assert!(report.contains("-OutputL"), "report:\n{report}");
    assert!(report.contains("+OutputL"), "report:\n{report}");
}

#[test]
fn extra_output_after_shared_prefix_is_a_violation() {
    // one trace keeps emitting after the other finished: its next public
    // output diverges from the other side's end marker
    let mut left = in_out_stream(&[1, 2, 3], &[1, 2, 3]);
    left.push(Event::low_output(7, ADDR, 4));
    left.push(Event::write(8, ADDR, 4));
    let right = in_out_stream(&[1, 2, 3], &[1, 2, 3]);

    let (verdict, _) = run(vec![left, right]);
    assert_ne!(verdict.exit_code(), 0);
}

#[test]
fn diverging_inputs_are_not_a_violation() {
    // different public inputs: there is nothing to compare downstream, the
    // property holds vacuously for the pair
    let left = in_out_stream(&[1, 2, 4], &[1, 2, 3]);
    let right = in_out_stream(&[1, 2, 3], &[1, 2, 3]);
    let (verdict, _) = run(vec![left, right]);
    assert_eq!(verdict.exit_code(), 0);
}

#[test]
fn secret_inputs_and_writes_are_ignored() {
    // streams differ only in high-confidentiality inputs and memory writes
    let mut left = vec![Event::high_input(1, ADDR, 11), Event::write(2, ADDR, 5)];
    left.extend(in_out_stream(&[1], &[1]));
    let mut right = vec![Event::high_input(1, ADDR, 99)];
    right.extend(in_out_stream(&[1], &[1]));

    let (verdict, _) = run(vec![left, right]);
    assert_eq!(verdict.exit_code(), 0);
}

#[test]
fn empty_stream_is_finalized_with_one_terminal_event() {
    let (verdict, monitor) = run(vec![vec![], vec![]]);
    assert_eq!(verdict.exit_code(), 0);

    let traces = monitor.traces();
    assert_eq!(traces.len(), 2);
    for id in traces.ids() {
        let trace = traces.get(id);
        assert!(trace.is_done());
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.get(0).kind, EventKind::End);
    }
}

#[test]
fn no_streams_at_all_is_a_clean_run() {
    let (verdict, monitor) = run(vec![]);
    assert_eq!(verdict.exit_code(), 0);
    assert_eq!(monitor.traces().len(), 0);
    assert_eq!(monitor.stats().sets_spawned, 0);
}

#[test]
fn violation_still_reported_when_running_to_exhaustion() {
    let left = in_out_stream(&[1], &[1]);
    let right = in_out_stream(&[1], &[2]);

    let config = MonitorConfig::builder().exit_on_violation(false).build();
    let mut monitor = Monitor::new(config);
    let verdict = monitor.run(&mut StaticInputs::new(vec![left, right]));

    assert_ne!(verdict.exit_code(), 0);
    assert!(monitor.stats().violations >= 1);
}

#[test]
fn pairing_options_control_spawned_sets() {
    // empty streams never match, so no continuations are spawned and the
    // counter reflects the fresh pairings alone
    let streams = || vec![vec![], vec![]];

    let (_, monitor) = run(streams());
    // (t0,t0), (t0,t1), (t1,t1)
    assert_eq!(monitor.stats().sets_spawned, 3);

    let config = MonitorConfig::builder().skip_self_pairs(true).build();
    let mut monitor = Monitor::new(config);
    let _ = monitor.run(&mut StaticInputs::new(streams()));
    // (t0,t1) only
    assert_eq!(monitor.stats().sets_spawned, 1);

    let config = MonitorConfig::builder().mirrored_pairs(true).build();
    let mut monitor = Monitor::new(config);
    let _ = monitor.run(&mut StaticInputs::new(streams()));
    // (t0,t0), (t0,t1), (t1,t0), (t1,t1)
    assert_eq!(monitor.stats().sets_spawned, 4);
}

#[test]
fn three_streams_are_pairwise_checked() {
    let ok = in_out_stream(&[1, 2], &[1, 2]);
    let bad = in_out_stream(&[1, 2], &[1, 9]);
    let (verdict, _) = run(vec![ok.clone(), ok, bad]);
    assert_ne!(verdict.exit_code(), 0);
}

#[test]
fn stats_track_progress() {
    let stream = in_out_stream(&[1, 2, 3], &[1, 2, 3]);
    let (_, monitor) = run(vec![stream.clone(), stream]);
    let stats = monitor.stats();
    assert_eq!(stats.traces, 2);
    assert!(stats.rounds > 0);
    assert!(stats.max_workbag > 0);
    assert!(stats.sets_spawned > 3, "continuations should have spawned");
    assert_eq!(stats.violations, 0);
}
