//! Replay purity and trace snapshots.

use framecast::{Canvas, ClockConfig, Color, DrawOp, Mode, Player, TraceCanvas, TraceTarget};

#[test]
fn replay_is_identical_on_fresh_targets() {
    let mut player = Player::new(Mode::StartPausedSelectable, TraceTarget::new(80, 60));
    player
        .configure(ClockConfig::new(80, 60, 10.0).unwrap())
        .unwrap();

    let mut sketch = player.begin_frame().unwrap();
    sketch.set_background(Color::new(16, 16, 16, 255)).unwrap();
    sketch.clear().unwrap();
    sketch.set_color(Color::new(255, 0, 0, 255)).unwrap();
    sketch.fill_rect(4.0, 4.0, 32.0, 32.0).unwrap();
    sketch.save().unwrap();
    sketch.translate(10.0, 10.0).unwrap();
    sketch.rotate(std::f64::consts::FRAC_PI_4).unwrap();
    sketch.stroke_rect(0.0, 0.0, 8.0, 8.0).unwrap();
    sketch.restore().unwrap();
    sketch.text("caption", 8.0, 50.0).unwrap();
    player.finish_frame(sketch, 1).unwrap();
    player.mark_fully_loaded().unwrap();

    let frame = player.snapshot().expect("paused selectable player");

    let mut first = TraceCanvas::new(80, 60);
    let mut second = TraceCanvas::new(80, 60);
    frame.replay(&mut first).unwrap();
    frame.replay(&mut second).unwrap();

    assert!(!first.lines().is_empty());
    assert_eq!(first.lines(), second.lines());
}

#[test]
fn recorded_ops_round_trip_through_json() -> anyhow::Result<()> {
    let mut player = Player::new(Mode::StartPausedSelectable, TraceTarget::new(80, 60));
    player.configure(ClockConfig::new(80, 60, 10.0)?)?;

    let mut sketch = player.begin_frame()?;
    sketch.set_color(Color::new(0, 255, 0, 255))?;
    sketch.polyline(&[(0.0, 0.0), (10.0, 5.0), (20.0, 0.0)])?;
    sketch.fill_oval(30.0, 30.0, 12.0, 8.0)?;
    player.finish_frame(sketch, 2)?;
    player.mark_fully_loaded()?;

    let frame = player.snapshot().expect("paused selectable player");
    let json = serde_json::to_string(frame.ops())?;
    let back: Vec<DrawOp> = serde_json::from_str(&json)?;
    assert_eq!(back.as_slice(), frame.ops());
    assert_eq!(frame.repetition_count(), 2);
    Ok(())
}

#[test]
fn trace_snapshot_of_a_short_run() {
    let target = TraceTarget::new(40, 30);
    let log = target.log();
    let mut player = Player::new(Mode::AutoRun, target);
    player
        .configure(ClockConfig::new(40, 30, 10.0).unwrap())
        .unwrap();

    let mut sketch = player.begin_frame().unwrap();
    sketch.clear().unwrap();
    sketch.set_color(Color::new(0, 128, 255, 255)).unwrap();
    sketch.line(0.0, 0.0, 40.0, 30.0).unwrap();
    player.finish_frame(sketch, 1).unwrap();

    let mut sketch = player.begin_frame().unwrap();
    sketch.text("done", 2.0, 28.0).unwrap();
    player.finish_frame(sketch, 1).unwrap();

    player.mark_fully_loaded().unwrap();
    while player.is_running() {
        player.tick().unwrap();
    }

    insta::assert_snapshot!(log.joined(), @r###"
    --- frame 1
    clear
    set_color #0080ffff
    line 0 0 40 30
    --- frame 2
    clear
    set_color #0080ffff
    line 0 0 40 30
    --- frame 3
    text "done" 2 28
    "###);
}
