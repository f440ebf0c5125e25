//! Press loop integration tests.
//!
//! These drive the controller through its public API with a recording
//! injector and a paused tokio clock, so timing assertions are deterministic.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tokio_test::{assert_err, assert_ok};

use keypulse::{
    Controller, KeyInjector, KeySpec, KeypulseError, LoopSettings, RunPhase, StopReason,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Down(KeySpec),
    Up(KeySpec),
}

/// Shared log of injected events, readable while the controller owns the
/// injector.
#[derive(Clone, Default)]
struct Recorder {
    events: Arc<Mutex<Vec<(Instant, Event)>>>,
    deny: Arc<Mutex<bool>>,
}

impl Recorder {
    fn events(&self) -> Vec<(Instant, Event)> {
        self.events.lock().unwrap().clone()
    }

    /// Instants at which each chord began.
    fn chord_starts(&self, modifier: KeySpec) -> Vec<Instant> {
        self.events()
            .into_iter()
            .filter(|(_, e)| *e == Event::Down(modifier))
            .map(|(at, _)| at)
            .collect()
    }

    fn set_deny(&self, deny: bool) {
        *self.deny.lock().unwrap() = deny;
    }
}

impl KeyInjector for Recorder {
    fn key_down(&mut self, key: KeySpec) -> keypulse::Result<()> {
        if *self.deny.lock().unwrap() {
            return Err(KeypulseError::Injection {
                key,
                reason: "permission denied".into(),
            });
        }
        self.events
            .lock()
            .unwrap()
            .push((Instant::now(), Event::Down(key)));
        Ok(())
    }

    fn key_up(&mut self, key: KeySpec) -> keypulse::Result<()> {
        self.events
            .lock()
            .unwrap()
            .push((Instant::now(), Event::Up(key)));
        Ok(())
    }
}

fn settings(interval: Duration, max: Option<u64>) -> LoopSettings {
    LoopSettings::new(interval, max)
}

#[tokio::test(start_paused = true)]
async fn test_bounded_run_presses_exactly_max() {
    // interval=0.1, maxPresses=3, delay=0
    let recorder = Recorder::default();
    let mut controller = Controller::new(
        settings(Duration::from_millis(100), Some(3)),
        recorder.clone(),
    );

    let summary = controller.start(Duration::ZERO).await;

    assert_eq!(summary.press_count, 3);
    assert_eq!(summary.failed_count, 0);
    assert_eq!(summary.reason, Some(StopReason::MaxPressesReached));
    assert_eq!(recorder.chord_starts(KeySpec::Meta).len(), 3);
    assert_eq!(recorder.events().len(), 12);
}

#[tokio::test(start_paused = true)]
async fn test_bounded_run_for_several_limits() {
    for max in 1..=5 {
        let recorder = Recorder::default();
        let mut controller = Controller::new(
            settings(Duration::from_millis(250), Some(max)),
            recorder.clone(),
        );

        let summary = controller.start(Duration::ZERO).await;

        assert_eq!(summary.press_count, max);
        assert_eq!(recorder.chord_starts(KeySpec::Meta).len() as u64, max);
    }
}

#[tokio::test(start_paused = true)]
async fn test_unbounded_run_stops_on_interrupt() {
    let interval = Duration::from_millis(100);
    let recorder = Recorder::default();
    let mut controller = Controller::new(settings(interval, None), recorder.clone());
    let handle = controller.stop_handle();

    let (summary, _) = tokio::join!(controller.start(Duration::ZERO), async {
        sleep(interval * 5 / 2).await;
        handle.stop();
    });

    assert_eq!(summary.reason, Some(StopReason::Interrupted));
    assert!((1..=3).contains(&summary.press_count));
    assert_eq!(controller.session().phase(), RunPhase::Stopped);
    assert!(!controller.session().is_running());

    // Every pressed key was released
    let events = recorder.events();
    let downs = events
        .iter()
        .filter(|(_, e)| matches!(e, Event::Down(_)))
        .count();
    let ups = events
        .iter()
        .filter(|(_, e)| matches!(e, Event::Up(_)))
        .count();
    assert_eq!(downs, ups);
}

#[tokio::test(start_paused = true)]
async fn test_unbounded_run_does_not_self_terminate() {
    let recorder = Recorder::default();
    let mut controller = Controller::new(
        settings(Duration::from_millis(10), None),
        recorder.clone(),
    );

    let run = tokio::time::timeout(Duration::from_secs(60), controller.start(Duration::ZERO));
    assert_err!(run.await);

    assert!(recorder.chord_starts(KeySpec::Meta).len() > 100);
}

#[tokio::test(start_paused = true)]
async fn test_zero_max_presses_ends_after_delay() {
    let recorder = Recorder::default();
    let mut controller = Controller::new(
        settings(Duration::from_millis(100), Some(0)),
        recorder.clone(),
    );
    let began = Instant::now();

    let summary = controller.start(Duration::from_millis(500)).await;

    assert_eq!(summary.press_count, 0);
    assert_eq!(summary.reason, Some(StopReason::MaxPressesReached));
    assert!(recorder.events().is_empty());
    assert!(began.elapsed() >= Duration::from_millis(500));
    assert!(began.elapsed() < Duration::from_millis(600));
}

#[tokio::test(start_paused = true)]
async fn test_delay_and_interval_are_lower_bounds() {
    let delay = Duration::from_millis(700);
    let interval = Duration::from_millis(300);
    let recorder = Recorder::default();
    let mut controller = Controller::new(settings(interval, Some(4)), recorder.clone());
    let began = Instant::now();

    controller.start(delay).await;

    let starts = recorder.chord_starts(KeySpec::Meta);
    assert_eq!(starts.len(), 4);
    assert!(starts[0] - began >= delay);
    for pair in starts.windows(2) {
        assert!(pair[1] - pair[0] >= interval);
    }
}

#[tokio::test(start_paused = true)]
async fn test_failed_presses_are_not_counted_and_loop_continues() {
    let recorder = Recorder::default();
    recorder.set_deny(true);
    let mut controller = Controller::new(
        settings(Duration::from_millis(100), Some(2)),
        recorder.clone(),
    );
    let handle = controller.stop_handle();

    let deny = recorder.clone();
    let (summary, _) = tokio::join!(controller.start(Duration::ZERO), async move {
        // Let a few attempts fail, then restore permission
        sleep(Duration::from_millis(350)).await;
        deny.set_deny(false);
        sleep(Duration::from_secs(10)).await;
        handle.stop();
    });

    assert_eq!(summary.reason, Some(StopReason::MaxPressesReached));
    assert_eq!(summary.press_count, 2);
    assert!(summary.failed_count >= 3);
}

#[tokio::test(start_paused = true)]
async fn test_stop_after_termination_is_idempotent() {
    let mut controller = Controller::new(
        settings(Duration::from_millis(100), Some(2)),
        Recorder::default(),
    );
    let finished = controller.start(Duration::ZERO).await;

    for _ in 0..3 {
        let summary = controller.stop();
        assert_eq!(summary, finished);
    }
    assert_eq!(controller.session().press_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_custom_chord_is_pressed_in_order() {
    let chord = keypulse::Chord::new(KeySpec::Control, KeySpec::Char('s'))
        .with_hold(Duration::from_millis(20));
    let recorder = Recorder::default();
    let mut controller = Controller::new(
        settings(Duration::from_millis(100), None).with_chord(chord),
        recorder.clone(),
    );

    assert!(controller.press_chord().await);

    let events: Vec<Event> = recorder.events().into_iter().map(|(_, e)| e).collect();
    assert_eq!(
        events,
        vec![
            Event::Down(KeySpec::Control),
            Event::Down(KeySpec::Char('s')),
            Event::Up(KeySpec::Char('s')),
            Event::Up(KeySpec::Control),
        ]
    );

    let timed = recorder.events();
    assert!(timed[2].0 - timed[1].0 >= Duration::from_millis(20));
}

#[test]
fn test_injection_error_surfaces_key() {
    let mut recorder = Recorder::default();
    recorder.set_deny(true);

    let err = recorder.key_down(KeySpec::Return).unwrap_err();
    assert!(err.to_string().contains("return"));

    recorder.set_deny(false);
    assert_ok!(recorder.key_down(KeySpec::Return));
}
