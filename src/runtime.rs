use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// How long a resting step waits for input before waking for a redraw.
const IDLE_TIMEOUT: Duration = Duration::from_millis(250);

/// Unified event type consumed by the clock controller.
#[derive(Clone, Debug)]
pub enum ClockEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<ClockEvent, RecvTimeoutError>;
}

/// Production event source: a reader thread forwards crossterm events over
/// a channel, so the UI thread stays the single writer of app state.
pub struct CrosstermEventSource {
    rx: Receiver<ClockEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            while let Ok(ev) = event::read() {
                let forwarded = match ev {
                    CtEvent::Key(key) => ClockEvent::Key(key),
                    CtEvent::Resize(_, _) => ClockEvent::Resize,
                    _ => continue,
                };
                if tx.send(forwarded).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<ClockEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit and headless integration tests.
pub struct TestEventSource {
    rx: Receiver<ClockEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<ClockEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<ClockEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Paces the controller loop. While the hands are moving, the tick interval
/// doubles as the animation delay: a quiet step times out into a `Tick` that
/// advances the sweep one minute. At rest the dial only changes on input,
/// so the loop sleeps on the longer idle timeout instead of spinning.
pub struct Runner<E: EventSource> {
    source: E,
    tick: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(source: E, tick: Duration) -> Self {
        Self { source, tick }
    }

    /// Blocks for the next event. Input always wins; a timeout becomes a
    /// `Tick`, which the controller ignores unless the hands are moving.
    pub fn step(&self, animating: bool) -> ClockEvent {
        let timeout = if animating { self.tick } else { IDLE_TIMEOUT };
        match self.source.recv_timeout(timeout) {
            Ok(ev) => ev,
            Err(_) => ClockEvent::Tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ClockState, TimeOfDay};
    use std::sync::mpsc;

    #[test]
    fn quiet_animating_step_becomes_a_tick() {
        let (_tx, rx) = mpsc::channel();
        let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(1));

        assert!(matches!(runner.step(true), ClockEvent::Tick));
    }

    #[test]
    fn queued_input_wins_over_the_animation_delay() {
        let (tx, rx) = mpsc::channel();
        tx.send(ClockEvent::Resize).unwrap();
        let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(50));

        assert!(matches!(runner.step(true), ClockEvent::Resize));
    }

    #[test]
    fn timeout_ticks_sweep_the_minute_hand_to_its_target() {
        let target = TimeOfDay::new(6, 30);
        let mut clock = ClockState::new(target.hour, 0, 0);

        let (_tx, rx) = mpsc::channel();
        let runner = Runner::new(TestEventSource::new(rx), Duration::from_millis(1));

        let mut steps = 0u32;
        while clock.time() != target {
            if let ClockEvent::Tick = runner.step(true) {
                clock.tick();
            }
            steps += 1;
            assert!(steps <= 60, "sweep must reach the target within an hour");
        }

        assert_eq!(steps, 30);
    }
}
