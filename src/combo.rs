//! Kill-streak tracking with decay and milestone callouts.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::core::constants::{COMBO_DECAY_MS, COMBO_DISPLAY_THRESHOLD};
use crate::core::events::{EventSink, GameEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComboTier {
    pub min: u32,
    pub label: &'static str,
    pub color: &'static str,
}

/// Highest first.
pub static COMBO_TIERS: [ComboTier; 5] = [
    ComboTier { min: 100, label: "GODLIKE", color: "#ff00ff" },
    ComboTier { min: 50, label: "UNSTOPPABLE", color: "#ff4444" },
    ComboTier { min: 25, label: "RAMPAGE", color: "#ffaa00" },
    ComboTier { min: 10, label: "ON FIRE", color: "#ffff00" },
    ComboTier { min: 5, label: "COMBO", color: "#00ffff" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComboMilestone {
    pub threshold: u32,
    pub label: &'static str,
    pub color: &'static str,
}

pub static COMBO_MILESTONES: [ComboMilestone; 4] = [
    ComboMilestone { threshold: 10, label: "KILL STREAK!", color: "#00ff88" },
    ComboMilestone { threshold: 25, label: "RAMPAGE!", color: "#ffaa00" },
    ComboMilestone { threshold: 50, label: "UNSTOPPABLE!", color: "#ff4444" },
    ComboMilestone { threshold: 100, label: "G O D L I K E", color: "#ff00ff" },
];

/// What the HUD counter should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComboDisplay {
    pub count: u32,
    pub label: &'static str,
    pub color: &'static str,
}

/// Per-run kill streak state.
#[derive(Debug, Clone, PartialEq)]
pub struct ComboTracker {
    kill_streak: u32,
    best_streak: u32,
    last_kill_ms: u64,
    decay_window_ms: u64,
    shown_milestones: BTreeSet<u32>,
}

impl Default for ComboTracker {
    fn default() -> Self {
        Self::new(COMBO_DECAY_MS)
    }
}

impl ComboTracker {
    pub fn new(decay_window_ms: u64) -> Self {
        Self {
            kill_streak: 0,
            best_streak: 0,
            last_kill_ms: 0,
            decay_window_ms,
            shown_milestones: BTreeSet::new(),
        }
    }

    pub fn kill_streak(&self) -> u32 {
        self.kill_streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    pub fn decay_window_ms(&self) -> u64 {
        self.decay_window_ms
    }

    /// Counts a kill at `now_ms`. Returns the milestone crossed, if this kill
    /// reached one not yet shown during the current streak.
    pub fn register_kill(&mut self, now_ms: u64) -> Option<ComboMilestone> {
        self.kill_streak += 1;
        self.last_kill_ms = now_ms;
        self.best_streak = self.best_streak.max(self.kill_streak);

        let milestone = COMBO_MILESTONES
            .iter()
            .find(|m| m.threshold == self.kill_streak)?;
        if self.shown_milestones.insert(milestone.threshold) {
            Some(*milestone)
        } else {
            None
        }
    }

    /// Like [`register_kill`](Self::register_kill) but reports the milestone
    /// to `sink`.
    pub fn register_kill_with(&mut self, now_ms: u64, sink: &mut dyn EventSink) {
        if let Some(m) = self.register_kill(now_ms) {
            sink.emit(GameEvent::ComboMilestone {
                threshold: m.threshold,
                label: m.label,
            });
        }
    }

    /// Drops the streak once `decay_window_ms` has passed without a kill.
    ///
    /// Returns the streak that was lost, if any. The best streak survives.
    pub fn check_decay(&mut self, now_ms: u64) -> Option<u32> {
        if self.kill_streak > 0 && now_ms.saturating_sub(self.last_kill_ms) > self.decay_window_ms
        {
            let lost = self.kill_streak;
            self.kill_streak = 0;
            self.shown_milestones.clear();
            Some(lost)
        } else {
            None
        }
    }

    /// Run end or player death.
    pub fn reset(&mut self) {
        self.kill_streak = 0;
        self.last_kill_ms = 0;
        self.shown_milestones.clear();
    }

    pub fn tier(&self) -> Option<&'static ComboTier> {
        COMBO_TIERS.iter().find(|t| self.kill_streak >= t.min)
    }

    pub fn is_displayed(&self) -> bool {
        self.kill_streak >= COMBO_DISPLAY_THRESHOLD
    }

    /// Counter text for the HUD; streaks of 3 and 4 show as a plain white combo.
    pub fn display(&self) -> Option<ComboDisplay> {
        if !self.is_displayed() {
            return None;
        }
        let (label, color) = self
            .tier()
            .map(|t| (t.label, t.color))
            .unwrap_or(("COMBO", "#ffffff"));
        Some(ComboDisplay {
            count: self.kill_streak,
            label,
            color,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hundred_kills_is_godlike() {
        let mut combo = ComboTracker::default();
        for i in 0..100 {
            combo.register_kill(1_000 + i * 100);
        }
        assert_eq!(combo.tier().unwrap().label, "GODLIKE");
        assert_eq!(combo.best_streak(), 100);
    }

    #[test]
    fn test_gap_resets_but_keeps_best() {
        let mut combo = ComboTracker::default();
        for i in 0..12 {
            combo.register_kill(i * 100);
        }
        assert_eq!(combo.check_decay(1_100 + 3_000), None);
        assert_eq!(combo.check_decay(1_100 + 3_001), Some(12));
        assert_eq!(combo.kill_streak(), 0);
        assert_eq!(combo.best_streak(), 12);
        assert_eq!(combo.check_decay(99_999), None);
    }

    #[test]
    fn test_milestones_once_per_streak() {
        let mut combo = ComboTracker::default();
        let mut fired = Vec::new();
        for i in 0..30 {
            if let Some(m) = combo.register_kill(i * 10) {
                fired.push(m.threshold);
            }
        }
        assert_eq!(fired, vec![10, 25]);

        combo.check_decay(100_000);
        let mut again = Vec::new();
        for i in 0..10 {
            if let Some(m) = combo.register_kill(200_000 + i) {
                again.push(m.label);
            }
        }
        assert_eq!(again, vec!["KILL STREAK!"]);
    }

    #[test]
    fn test_tier_and_display_thresholds() {
        let mut combo = ComboTracker::default();
        combo.register_kill(0);
        combo.register_kill(1);
        assert!(!combo.is_displayed());
        assert!(combo.display().is_none());

        combo.register_kill(2);
        assert!(combo.is_displayed());
        assert!(combo.tier().is_none());
        assert_eq!(combo.display().unwrap().color, "#ffffff");

        combo.register_kill(3);
        combo.register_kill(4);
        assert_eq!(combo.tier().unwrap().label, "COMBO");
        for i in 5..10 {
            combo.register_kill(i);
        }
        assert_eq!(combo.display().unwrap().label, "ON FIRE");
    }

    #[test]
    fn test_reset_clears_streak() {
        let mut combo = ComboTracker::new(500);
        for i in 0..10 {
            combo.register_kill(i);
        }
        combo.reset();
        assert_eq!(combo.kill_streak(), 0);
        assert_eq!(combo.best_streak(), 10);
        assert_eq!(combo.register_kill(20).map(|_| ()), None);
    }

    #[test]
    fn test_milestone_event_emitted() {
        let mut combo = ComboTracker::default();
        let mut events: Vec<GameEvent> = Vec::new();
        for i in 0..10 {
            combo.register_kill_with(i, &mut events);
        }
        assert_eq!(
            events,
            vec![GameEvent::ComboMilestone {
                threshold: 10,
                label: "KILL STREAK!"
            }]
        );
    }
}
