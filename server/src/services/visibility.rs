//! Daily hide windows.
//!
//! DESIGN
//! ======
//! An advertiser may hide an ad for part of every day by giving `HH:MM`
//! bounds. Both bounds are inclusive and compared at minute resolution. When
//! `from` is not before `to` the window wraps past midnight, so `22:00`-`06:00`
//! hides the ad overnight. Equal bounds therefore hide it all day.
//!
//! An ad missing either bound is always shown.

#[cfg(test)]
#[path = "visibility_test.rs"]
mod visibility_test;

use time::{OffsetDateTime, Time, UtcOffset};

/// Minutes since midnight, `0..1440`.
pub type MinuteOfDay = u16;

/// Parse a zero-padded `HH:MM` clock time.
#[must_use]
pub fn parse_hhmm(raw: &str) -> Option<MinuteOfDay> {
    let (hh, mm) = raw.split_once(':')?;
    let two_digits = |s: &str| s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(hh) || !two_digits(mm) {
        return None;
    }
    let hours: u16 = hh.parse().ok()?;
    let minutes: u16 = mm.parse().ok()?;
    (hours < 24 && minutes < 60).then_some(hours * 60 + minutes)
}

/// Truncate a wall-clock time to its minute.
#[must_use]
pub fn minute_of_day(time: Time) -> MinuteOfDay {
    u16::from(time.hour()) * 60 + u16::from(time.minute())
}

/// The current minute of the day on the configured clock.
#[must_use]
pub fn current_minute(offset: UtcOffset) -> MinuteOfDay {
    minute_of_day(OffsetDateTime::now_utc().to_offset(offset).time())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HideWindow {
    pub from: MinuteOfDay,
    pub to: MinuteOfDay,
}

impl HideWindow {
    /// Build a window from stored bounds. `None` when either is absent or
    /// malformed, meaning the ad is never hidden.
    #[must_use]
    pub fn from_bounds(from: Option<&str>, to: Option<&str>) -> Option<Self> {
        Some(Self { from: parse_hhmm(from?)?, to: parse_hhmm(to?)? })
    }

    /// Whether the ad is hidden at `now`.
    #[must_use]
    pub fn hides(&self, now: MinuteOfDay) -> bool {
        if self.from < self.to {
            self.from <= now && now <= self.to
        } else {
            now >= self.from || now <= self.to
        }
    }
}

/// Whether an ad with the given stored bounds is shown at `now`.
#[must_use]
pub fn is_visible(from: Option<&str>, to: Option<&str>, now: MinuteOfDay) -> bool {
    HideWindow::from_bounds(from, to).is_none_or(|window| !window.hides(now))
}
