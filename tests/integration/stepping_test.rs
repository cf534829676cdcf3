//! Frame stepping and seeking through a selectable player.

use framecast::{
    Canvas, ClockConfig, Mode, Phase, Player, TickOutcome, TraceCanvas, TraceLog, TraceTarget,
};

fn configured(mode: Mode) -> (Player, TraceLog) {
    let target = TraceTarget::new(100, 100);
    let log = target.log();
    let mut player = Player::new(mode, target);
    player
        .configure(ClockConfig::new(100, 100, 10.0).unwrap())
        .unwrap();
    (player, log)
}

fn push(player: &mut Player, id: u32) {
    push_rep(player, id, 1);
}

fn push_rep(player: &mut Player, id: u32, repetition: u32) {
    let mut sketch = player.begin_frame().unwrap();
    sketch.text(&format!("f{id}"), 0.0, 0.0).unwrap();
    player.finish_frame(sketch, repetition).unwrap();
}

fn last_shown(log: &TraceLog) -> String {
    log.lines()
        .iter()
        .filter(|line| line.starts_with("text"))
        .next_back()
        .cloned()
        .unwrap_or_default()
}

fn run_until_stopped(player: &mut Player) {
    while player.is_running() {
        player.tick().unwrap();
    }
}

#[test]
fn walk_backward_and_forward_through_a_run() {
    let (mut player, log) = configured(Mode::StartPausedSelectable);
    for id in 1..=5 {
        push(&mut player, id);
    }
    player.mark_fully_loaded().unwrap();
    player.play().unwrap();
    run_until_stopped(&mut player);
    assert_eq!(player.phase(), Phase::ReplayReady);

    assert!(player.step_back(2).unwrap());
    assert_eq!(player.phase(), Phase::ReadyPaused);
    assert_eq!(player.played_frames(), 3);
    assert_eq!(last_shown(&log), "text \"f4\" 0 0");

    assert!(player.step_forward(1).unwrap());
    assert_eq!(player.played_frames(), 4);
    assert_eq!(last_shown(&log), "text \"f4\" 0 0");

    assert!(player.step_forward(1).unwrap());
    assert_eq!(last_shown(&log), "text \"f5\" 0 0");
    assert_eq!(player.position_percent(), 100);
}

#[test]
fn interleaved_stepping_preserves_playback_order() {
    let (mut player, log) = configured(Mode::StartPausedSelectable);
    for id in 1..=4 {
        push(&mut player, id);
    }
    player.mark_fully_loaded().unwrap();

    assert!(player.step_forward(3).unwrap());
    assert!(player.step_back(2).unwrap());
    player.play().unwrap();
    run_until_stopped(&mut player);

    // the resume point was frame 2; the tail plays out in order
    let shown: Vec<String> = log
        .lines()
        .iter()
        .filter(|line| line.starts_with("text"))
        .cloned()
        .collect();
    let tail = &shown[shown.len() - 3..];
    assert_eq!(
        tail,
        &["text \"f2\" 0 0", "text \"f3\" 0 0", "text \"f4\" 0 0"]
    );
}

#[test]
fn seek_lands_on_the_requested_fraction() {
    let (mut player, log) = configured(Mode::StartPausedSelectable);
    for id in 1..=10 {
        push(&mut player, id);
    }
    player.mark_fully_loaded().unwrap();

    assert!(player.seek_to_percent(70).unwrap());
    assert_eq!(player.played_frames(), 7);
    assert_eq!(player.position_percent(), 70);
    assert_eq!(last_shown(&log), "text \"f7\" 0 0");

    assert!(player.seek_to_percent(0).unwrap());
    assert_eq!(player.played_frames(), 0);
    assert_eq!(player.position_percent(), 0);
    assert_eq!(last_shown(&log), "text \"f1\" 0 0");

    // already there, nothing moves
    assert!(!player.seek_to_percent(0).unwrap());

    // overshooting clamps to the end
    assert!(player.seek_to_percent(150).unwrap());
    assert_eq!(player.position_percent(), 100);
}

#[test]
fn steps_with_nothing_to_move_are_no_ops() {
    let (mut player, _log) = configured(Mode::StartPausedSelectable);
    push(&mut player, 1);
    player.mark_fully_loaded().unwrap();

    assert!(!player.step_back(1).unwrap());
    assert!(player.step_forward(1).unwrap());
    assert!(!player.step_forward(1).unwrap());
    assert_eq!(player.position_percent(), 100);
}

#[test]
fn stepping_is_ignored_while_playing() {
    let (mut player, _log) = configured(Mode::StartPausedSelectable);
    for id in 1..=3 {
        push(&mut player, id);
    }
    player.mark_fully_loaded().unwrap();
    player.play().unwrap();

    assert!(!player.step_forward(1).unwrap());
    assert!(!player.step_back(1).unwrap());
    assert!(!player.seek_to_percent(50).unwrap());
    assert_eq!(player.phase(), Phase::Playing);
    assert_eq!(player.played_frames(), 0);
}

#[test]
fn stepping_cancels_a_hold_in_progress() {
    let (mut player, log) = configured(Mode::StartPausedSelectable);
    push_rep(&mut player, 1, 3);
    push(&mut player, 2);
    player.mark_fully_loaded().unwrap();
    player.play().unwrap();

    assert!(matches!(player.tick().unwrap(), TickOutcome::Applied(_)));
    player.stop().unwrap();
    assert!(player.step_forward(1).unwrap());
    assert_eq!(last_shown(&log), "text \"f2\" 0 0");

    // the abandoned hold does not resume; the queue is simply spent
    player.play().unwrap();
    assert_eq!(player.tick().unwrap(), TickOutcome::Exhausted);
    assert_eq!(player.phase(), Phase::ReplayReady);
}

#[test]
fn position_accounts_for_repetition_weight() {
    let (mut player, _log) = configured(Mode::StartPausedSelectable);
    push_rep(&mut player, 1, 1);
    push_rep(&mut player, 2, 3);
    push_rep(&mut player, 3, 1);
    player.mark_fully_loaded().unwrap();

    // five display periods in total
    player.step_forward(1).unwrap();
    assert_eq!(player.position_percent(), 20);
    player.step_forward(1).unwrap();
    assert_eq!(player.position_percent(), 40);
    player.step_forward(1).unwrap();
    assert_eq!(player.position_percent(), 100);
}

#[test]
fn controls_track_phase_and_queue_shape() {
    let (mut player, _log) = configured(Mode::StartPausedSelectable);
    for id in 1..=2 {
        push(&mut player, id);
    }

    let controls = player.controls();
    assert!(!controls.play);
    assert!(!controls.step_forward);

    player.mark_fully_loaded().unwrap();
    let controls = player.controls();
    assert!(controls.play);
    assert!(controls.step_forward);
    assert!(!controls.step_back);
    assert!(controls.seek);
    assert!(controls.snapshot);

    player.play().unwrap();
    let controls = player.controls();
    assert!(controls.play);
    assert!(!controls.seek);
    assert!(!controls.snapshot);
}

#[test]
fn snapshot_clones_the_displayed_frame() {
    let (mut player, _log) = configured(Mode::StartPausedSelectable);
    push(&mut player, 1);
    push(&mut player, 2);
    player.mark_fully_loaded().unwrap();

    let frame = player.snapshot().expect("paused selectable player");
    let mut canvas = TraceCanvas::new(100, 100);
    frame.replay(&mut canvas).unwrap();
    assert_eq!(canvas.lines(), vec!["text \"f1\" 0 0"]);

    player.play().unwrap();
    assert!(player.snapshot().is_none());
}

#[test]
fn snapshot_unavailable_outside_selectable_mode() {
    let (mut player, _log) = configured(Mode::StartPaused);
    push(&mut player, 1);
    player.mark_fully_loaded().unwrap();
    assert!(player.snapshot().is_none());
}
