//! End-to-end playback runs against a trace target.

use std::time::Duration;

use framecast::{Canvas, ClockConfig, Mode, Phase, Player, TickOutcome, TraceLog, TraceTarget};

fn configured(mode: Mode, rate: f64) -> (Player, TraceLog) {
    let target = TraceTarget::new(100, 100);
    let log = target.log();
    let mut player = Player::new(mode, target);
    player
        .configure(ClockConfig::new(100, 100, rate).unwrap())
        .unwrap();
    (player, log)
}

fn push_labeled(player: &mut Player, label: &str, repetition: u32) {
    let mut sketch = player.begin_frame().unwrap();
    sketch.clear().unwrap();
    sketch.text(label, 10.0, 20.0).unwrap();
    player.finish_frame(sketch, repetition).unwrap();
}

fn texts(log: &TraceLog) -> Vec<String> {
    log.lines()
        .iter()
        .filter(|line| line.starts_with("text"))
        .cloned()
        .collect()
}

#[test]
fn ten_frames_at_ten_fps_complete_in_a_second() {
    let (mut player, log) = configured(Mode::AutoRun, 10.0);
    assert_eq!(player.tick_interval(), Some(Duration::from_millis(100)));

    for id in 1..=10 {
        push_labeled(&mut player, &format!("frame {id}"), 1);
    }
    player.mark_fully_loaded().unwrap();
    assert_eq!(player.phase(), Phase::Playing);

    // ten periods of 100 ms apply every frame exactly once
    for _ in 0..10 {
        assert!(matches!(player.tick().unwrap(), TickOutcome::Applied(_)));
    }
    // the next period finds nothing pending
    assert_eq!(player.tick().unwrap(), TickOutcome::Exhausted);
    assert_eq!(player.phase(), Phase::Finished);
    assert!(!player.is_running());
    assert_eq!(player.pending_frames(), 0);

    let shown = texts(&log);
    assert_eq!(shown.len(), 11);
    // the head shows once while loading completes, then the run proper
    assert_eq!(shown[0], "text \"frame 1\" 10 20");
    for (i, line) in shown[1..].iter().enumerate() {
        assert_eq!(line, &format!("text \"frame {}\" 10 20", i + 1));
    }
}

#[test]
fn repetition_holds_a_frame_across_ticks() {
    let (mut player, log) = configured(Mode::AutoRun, 10.0);
    push_labeled(&mut player, "held", 3);
    push_labeled(&mut player, "after", 1);
    player.mark_fully_loaded().unwrap();

    assert!(matches!(player.tick().unwrap(), TickOutcome::Applied(_)));
    assert_eq!(player.tick().unwrap(), TickOutcome::Held);
    assert_eq!(player.tick().unwrap(), TickOutcome::Held);
    assert!(matches!(player.tick().unwrap(), TickOutcome::Applied(_)));
    assert_eq!(player.tick().unwrap(), TickOutcome::Exhausted);

    // "held" renders once despite occupying three periods
    assert_eq!(
        texts(&log),
        vec![
            "text \"held\" 10 20",
            "text \"held\" 10 20",
            "text \"after\" 10 20",
        ]
    );
}

#[test]
fn zero_repetition_frames_pass_unseen() {
    let (mut player, log) = configured(Mode::AutoRun, 10.0);
    push_labeled(&mut player, "one", 1);
    push_labeled(&mut player, "silent", 0);
    push_labeled(&mut player, "two", 1);
    player.mark_fully_loaded().unwrap();

    assert!(matches!(player.tick().unwrap(), TickOutcome::Applied(_)));
    assert_eq!(player.tick().unwrap(), TickOutcome::Skipped);
    assert!(matches!(player.tick().unwrap(), TickOutcome::Applied(_)));
    assert_eq!(player.tick().unwrap(), TickOutcome::Exhausted);

    assert!(texts(&log).iter().all(|line| !line.contains("silent")));
}

#[test]
fn a_failing_frame_is_skipped_and_playback_continues() {
    let target = TraceTarget::new(100, 100);
    let log = target.log();
    // render 1 is the loading head, render 2 the first played frame
    log.fail_on_frame(3);
    let mut player = Player::new(Mode::AutoRun, target);
    player
        .configure(ClockConfig::new(100, 100, 10.0).unwrap())
        .unwrap();
    for id in 1..=3 {
        push_labeled(&mut player, &format!("frame {id}"), 1);
    }
    player.mark_fully_loaded().unwrap();

    assert!(matches!(player.tick().unwrap(), TickOutcome::Applied(_)));
    assert_eq!(player.tick().unwrap(), TickOutcome::Skipped);
    assert!(matches!(player.tick().unwrap(), TickOutcome::Applied(_)));
    assert_eq!(player.tick().unwrap(), TickOutcome::Exhausted);
    assert_eq!(player.phase(), Phase::Finished);

    assert_eq!(
        texts(&log),
        vec![
            "text \"frame 1\" 10 20",
            "text \"frame 1\" 10 20",
            "text \"frame 3\" 10 20",
        ]
    );
}

#[test]
fn start_paused_shows_one_frame_without_playing() {
    let (mut player, log) = configured(Mode::StartPaused, 10.0);
    push_labeled(&mut player, "cover", 1);
    push_labeled(&mut player, "rest", 1);
    player.mark_fully_loaded().unwrap();

    assert_eq!(player.phase(), Phase::ReadyPaused);
    assert_eq!(player.tick().unwrap(), TickOutcome::Idle);
    assert_eq!(texts(&log), vec!["text \"cover\" 10 20"]);
    assert_eq!(player.pending_frames(), 2);
}

#[test]
fn abandoned_sketches_produce_no_frames() {
    let (mut player, _log) = configured(Mode::AutoRun, 10.0);
    let mut sketch = player.begin_frame().unwrap();
    sketch.text("discarded", 0.0, 0.0).unwrap();
    player.abandon_frame(sketch).unwrap();

    push_labeled(&mut player, "real", 1);
    player.mark_fully_loaded().unwrap();
    assert_eq!(player.pending_frames(), 1);
}
