//! Idle-driven auto-scroll for the board view, as a clock-injected state machine.
//!
//! The host feeds elapsed time, the scrollable extent and user interactions; [`AutoScroll::tick`]
//! returns the scroll position to apply. No timers are owned here.

use std::time::Duration;

use crate::animation::ease::Ease;
use crate::foundation::error::{GreetcardError, GreetcardResult};

/// Tuning knobs; defaults match the board view.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AutoScrollConfig {
    /// Fewer notes than this and auto-scroll stays off.
    pub min_notes: usize,
    pub start_delay: Duration,
    /// Debounce after the last user interaction.
    pub interaction_pause: Duration,
    /// Rest at the top or bottom before reversing.
    pub end_delay: Duration,
    /// Seconds of travel per pixel.
    pub secs_per_px: f64,
    pub min_duration: Duration,
    pub ease: Ease,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            min_notes: 4,
            start_delay: Duration::from_millis(500),
            interaction_pause: Duration::from_millis(7000),
            end_delay: Duration::from_millis(3000),
            secs_per_px: 0.02,
            min_duration: Duration::from_secs(5),
            ease: Ease::InOutQuad,
        }
    }
}

impl AutoScrollConfig {
    pub fn validate(&self) -> GreetcardResult<()> {
        if !self.secs_per_px.is_finite() || self.secs_per_px < 0.0 {
            return Err(GreetcardError::validation("secs_per_px must be finite and >= 0"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PauseReason {
    StartDelay,
    AtEnd,
    Interaction,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollState {
    Idle,
    Scrolling {
        from: f64,
        to: f64,
        started_at: Duration,
        duration: Duration,
    },
    Paused {
        resume_at: Duration,
        reason: PauseReason,
    },
}

#[derive(Clone, Debug)]
pub struct AutoScroll {
    config: AutoScrollConfig,
    state: ScrollState,
    position: f64,
    max_scroll: f64,
}

impl Default for AutoScroll {
    fn default() -> Self {
        Self::new(AutoScrollConfig::default())
    }
}

impl AutoScroll {
    pub fn new(config: AutoScrollConfig) -> Self {
        Self {
            config,
            state: ScrollState::Idle,
            position: 0.0,
            max_scroll: 0.0,
        }
    }

    /// Like [`AutoScroll::new`], rejecting an invalid config.
    pub fn try_new(config: AutoScrollConfig) -> GreetcardResult<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Turn auto-scroll on or off for the current note count.
    ///
    /// Enabling from `Idle` arms the start delay; disabling always returns to `Idle`.
    pub fn set_enabled(&mut self, enabled: bool, note_count: usize, now: Duration) {
        let active = enabled && note_count >= self.config.min_notes;
        match (active, self.state) {
            (false, _) => self.state = ScrollState::Idle,
            (true, ScrollState::Idle) => {
                self.state = ScrollState::Paused {
                    resume_at: now + self.config.start_delay,
                    reason: PauseReason::StartDelay,
                };
            }
            (true, _) => {}
        }
    }

    /// Update the scrollable extent (content height minus viewport height).
    /// Non-finite extents are ignored.
    pub fn set_extent(&mut self, max_scroll: f64) {
        if !max_scroll.is_finite() {
            return;
        }
        self.max_scroll = max_scroll.max(0.0);
        self.position = self.position.clamp(0.0, self.max_scroll);
    }

    /// User scrolled, wheeled, touched or clicked; `position` is where the view is now.
    ///
    /// Each interaction re-arms the resume debounce. Ignored while `Idle`; a non-finite
    /// `position` keeps the current one.
    pub fn interact(&mut self, now: Duration, position: f64) {
        if self.state == ScrollState::Idle {
            return;
        }
        if position.is_finite() {
            self.position = position.clamp(0.0, self.max_scroll);
        }
        self.state = ScrollState::Paused {
            resume_at: now + self.config.interaction_pause,
            reason: PauseReason::Interaction,
        };
    }

    /// Advance to `now` and return the position to apply.
    pub fn tick(&mut self, now: Duration) -> f64 {
        match self.state {
            ScrollState::Idle => {}
            ScrollState::Paused { resume_at, .. } => {
                if now >= resume_at {
                    self.start_leg(now);
                }
            }
            ScrollState::Scrolling {
                from,
                to,
                started_at,
                duration,
            } => {
                let elapsed = now.saturating_sub(started_at);
                if elapsed >= duration {
                    self.position = to;
                    self.state = ScrollState::Paused {
                        resume_at: now + self.config.end_delay,
                        reason: PauseReason::AtEnd,
                    };
                } else {
                    let t = elapsed.as_secs_f64() / duration.as_secs_f64();
                    self.position = self.config.ease.lerp(from, to, t);
                }
            }
        }
        self.position
    }

    fn start_leg(&mut self, now: Duration) {
        if self.max_scroll <= 0.0 {
            // Nothing to scroll yet; look again after the end delay.
            self.state = ScrollState::Paused {
                resume_at: now + self.config.end_delay,
                reason: PauseReason::AtEnd,
            };
            return;
        }

        let at_bottom = self.position >= self.max_scroll - 1.0;
        let to = if at_bottom { 0.0 } else { self.max_scroll };
        let min = self.config.min_duration;
        let travel =
            Duration::try_from_secs_f64((to - self.position).abs() * self.config.secs_per_px)
                .unwrap_or(min);
        self.state = ScrollState::Scrolling {
            from: self.position,
            to,
            started_at: now,
            duration: travel.max(min),
        };
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/auto.rs"]
mod tests;
