use chrono::{Local, Timelike};
use rand::Rng;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Hand lengths as fractions of the unit radius.
pub const HOUR_HAND_LEN: f64 = 0.70;
pub const MINUTE_HAND_LEN: f64 = 0.90;

/// Minute step used when generating random quiz times.
pub const DEFAULT_GRANULARITY: u8 = 15;

/// A 12-hour time as the quiz deals in: hour 0..=11, minute 0..=59.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Self {
        Self {
            hour: hour % 12,
            minute: minute % 60,
        }
    }

    /// Hour on a clock dial, where 0 reads as 12.
    pub fn display_hour(&self) -> u8 {
        if self.hour == 0 {
            12
        } else {
            self.hour
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.display_hour(), self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| format!("expected H:MM, got '{s}'"))?;
        let hour: u8 = h.parse().map_err(|_| format!("bad hour in '{s}'"))?;
        let minute: u8 = m.parse().map_err(|_| format!("bad minute in '{s}'"))?;
        if hour > 23 || minute > 59 {
            return Err(format!("'{s}' is not a valid time"));
        }
        Ok(TimeOfDay::new(hour % 12, minute))
    }
}

/// Whether hand angles creep fractionally between whole units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum HandMode {
    /// Hour hand drifts by minute/60, minute hand by second/60.
    Smooth,
    /// Hands snap to whole hours/minutes.
    Easy,
}

/// The time currently shown on the dial.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClockState {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl ClockState {
    pub fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour: hour % 12,
            minute: minute % 60,
            second: second % 60,
        }
    }

    /// Seed from the local wall clock.
    pub fn from_local() -> Self {
        let now = Local::now();
        Self::new(
            (now.hour() % 12) as u8,
            now.minute() as u8,
            now.second() as u8,
        )
    }

    pub fn time(&self) -> TimeOfDay {
        TimeOfDay::new(self.hour, self.minute)
    }

    pub fn set(&mut self, t: TimeOfDay) {
        self.hour = t.hour;
        self.minute = t.minute;
        self.second = 0;
    }

    /// Advance one minute, carrying into the hour and wrapping at 12.
    pub fn tick(&mut self) {
        self.minute += 1;
        if self.minute == 60 {
            self.minute = 0;
            self.hour = (self.hour + 1) % 12;
        }
    }

    /// Hour hand angle in radians, 12 o'clock at pi/2, clockwise dial.
    pub fn hour_hand_angle(&self, mode: HandMode) -> f64 {
        let creep = match mode {
            HandMode::Smooth => self.minute as f64,
            HandMode::Easy => 0.0,
        };
        PI / 2.0 - PI / 6.0 * (self.hour as f64 + creep / 60.0)
    }

    /// Minute hand angle in radians, same convention as the hour hand.
    pub fn minute_hand_angle(&self, mode: HandMode) -> f64 {
        let creep = match mode {
            HandMode::Smooth => self.second as f64,
            HandMode::Easy => 0.0,
        };
        PI / 2.0 - PI / 30.0 * (self.minute as f64 + creep / 60.0)
    }
}

/// Pick a uniformly random quiz time: hour in [0,11], minute a multiple of
/// `granularity` in [0,60).
pub fn random_time<R: Rng>(rng: &mut R, granularity: u8) -> TimeOfDay {
    let g = granularity.clamp(1, 60) as u32;
    let hour = rng.gen_range(0..12u8);
    let minute = (rng.gen_range(0..60 / g) * g) as u8;
    TimeOfDay::new(hour, minute)
}
