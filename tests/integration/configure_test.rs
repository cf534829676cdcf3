//! The set-once configuration contract.

use std::time::Duration;

use framecast::{ClockConfig, Error, Mode, Player, TraceTarget};

fn player(mode: Mode) -> Player {
    Player::new(mode, TraceTarget::new(100, 100))
}

#[test]
fn identical_reconfiguration_is_a_no_op() {
    let mut player = player(Mode::AutoRun);
    player
        .configure(ClockConfig::new(100, 100, 30.0).unwrap())
        .unwrap();
    player
        .configure(ClockConfig::new(100, 100, 30.0).unwrap())
        .unwrap();
    assert!(player.is_configured());

    let err = player
        .configure(ClockConfig::new(100, 100, 25.0).unwrap())
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
    assert!(err.to_string().contains("100x100 at 30 fps"));
}

#[test]
fn invalid_dimensions_and_rates_are_rejected() {
    assert!(ClockConfig::new(0, 100, 30.0).is_err());
    assert!(ClockConfig::new(100, 0, 30.0).is_err());
    assert!(ClockConfig::new(100, 100, 0.0).is_err());
    assert!(ClockConfig::new(100, 100, -24.0).is_err());
    assert!(ClockConfig::new(100, 100, f64::NAN).is_err());
    assert!(ClockConfig::new(100, 100, f64::INFINITY).is_err());
}

#[test]
fn tick_interval_follows_the_frame_rate() {
    let mut player = player(Mode::AutoRun);
    assert_eq!(player.tick_interval(), None);

    player
        .configure(ClockConfig::new(100, 100, 25.0).unwrap())
        .unwrap();
    assert_eq!(player.tick_interval(), Some(Duration::from_millis(40)));
}

#[test]
fn production_requires_configuration() {
    let mut player = player(Mode::AutoRun);
    assert!(matches!(player.begin_frame(), Err(Error::State { .. })));
    assert!(matches!(player.mark_fully_loaded(), Err(Error::State { .. })));
}

#[test]
fn one_open_sketch_at_a_time() {
    let mut player = player(Mode::AutoRun);
    player
        .configure(ClockConfig::new(100, 100, 30.0).unwrap())
        .unwrap();

    let first = player.begin_frame().unwrap();
    assert!(matches!(player.begin_frame(), Err(Error::State { .. })));

    player.abandon_frame(first).unwrap();
    assert!(player.begin_frame().is_ok());
}

#[test]
fn enqueue_is_rejected_once_loading_completed() {
    let mut player = player(Mode::StartPaused);
    player
        .configure(ClockConfig::new(100, 100, 30.0).unwrap())
        .unwrap();

    let sketch = player.begin_frame().unwrap();
    player.finish_frame(sketch, 1).unwrap();
    player.mark_fully_loaded().unwrap();

    let late = player.begin_frame().unwrap();
    assert!(matches!(
        player.finish_frame(late, 1),
        Err(Error::State { .. })
    ));
}

#[test]
fn validation_errors_name_the_violation() {
    let err = ClockConfig::new(0, 10, 30.0).unwrap_err();
    assert!(err.to_string().starts_with("Invalid clock configuration:"));

    let err = Player::new(Mode::AutoRun, TraceTarget::new(10, 10))
        .begin_frame()
        .unwrap_err();
    assert!(err.to_string().starts_with("Invalid player state:"));
}
