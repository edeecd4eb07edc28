//! Rebirth milestones, eligibility and the bonuses a rebirth level grants.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::constants::*;

/// A wave milestone that unlocks a rebirth level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RebirthMilestone {
    pub wave: u32,
    pub rebirth: u32,
    pub name: &'static str,
}

pub static REBIRTH_MILESTONES: [RebirthMilestone; 5] = [
    RebirthMilestone { wave: 50, rebirth: 1, name: "JUNIOR DEV" },
    RebirthMilestone { wave: 100, rebirth: 2, name: "MID-LEVEL" },
    RebirthMilestone { wave: 150, rebirth: 3, name: "SENIOR DEV" },
    RebirthMilestone { wave: 200, rebirth: 4, name: "TECH LEAD" },
    RebirthMilestone { wave: 250, rebirth: 5, name: "ARCHITECT" },
];

/// Title shown before the first rebirth.
pub const UNRANKED_TITLE: &str = "INTERN";

/// Weapons a rebirth may hand out at run start.
pub static STARTING_WEAPON_POOL: [&str; 7] =
    ["spread", "pierce", "rapid", "homing", "bounce", "aoe", "freeze"];

/// Persistent prestige record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RebirthState {
    pub rebirth_level: u32,
    pub highest_wave: u32,
    pub total_rebirths: u32,
    pub lifetime_kills: u64,
}

impl RebirthState {
    pub fn all_stats_multiplier(&self) -> f64 {
        1.0 + self.rebirth_level as f64 * REBIRTH_ALL_STATS_BONUS
    }

    pub fn xp_multiplier(&self) -> f64 {
        1.0 + self.rebirth_level as f64 * REBIRTH_XP_BONUS
    }

    pub fn starting_weapon_count(&self) -> u32 {
        (self.rebirth_level * REBIRTH_STARTING_WEAPONS_PER_LEVEL).min(MAX_STARTING_WEAPONS)
    }
}

/// Highest milestone reached by `current_wave` that would raise the rebirth level.
///
/// # Returns
/// `None` at max level or when no threshold is met.
pub fn can_rebirth(current_wave: u32, state: &RebirthState) -> Option<&'static RebirthMilestone> {
    REBIRTH_MILESTONES
        .iter()
        .rev()
        .find(|m| current_wave >= m.wave && m.rebirth > state.rebirth_level)
}

/// Applies a rebirth at `current_wave`, returning the new state.
///
/// Returns `state` unchanged when no milestone qualifies. `highest_wave` is
/// only ever raised.
pub fn perform_rebirth(
    current_wave: u32,
    kills_this_run: u64,
    state: &RebirthState,
) -> RebirthState {
    let Some(milestone) = can_rebirth(current_wave, state) else {
        return *state;
    };

    RebirthState {
        rebirth_level: milestone.rebirth,
        highest_wave: state.highest_wave.max(current_wave),
        total_rebirths: state.total_rebirths + 1,
        lifetime_kills: state.lifetime_kills.saturating_add(kills_this_run),
    }
}

/// Display summary for the title screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RebirthInfo {
    pub level: u32,
    pub name: &'static str,
    pub next_milestone: Option<RebirthMilestone>,
    /// Whole percent.
    pub all_stats_bonus: u32,
    /// Whole percent.
    pub xp_bonus: u32,
    pub starting_weapons: u32,
    pub total_rebirths: u32,
    pub lifetime_kills: u64,
    pub highest_wave: u32,
}

pub fn rebirth_info(state: &RebirthState) -> RebirthInfo {
    let name = REBIRTH_MILESTONES
        .iter()
        .find(|m| m.rebirth == state.rebirth_level)
        .map(|m| m.name)
        .unwrap_or(UNRANKED_TITLE);
    let next_milestone = REBIRTH_MILESTONES
        .iter()
        .find(|m| m.rebirth == state.rebirth_level + 1)
        .copied();

    RebirthInfo {
        level: state.rebirth_level,
        name,
        next_milestone,
        all_stats_bonus: (state.rebirth_level as f64 * REBIRTH_ALL_STATS_BONUS * 100.0).round()
            as u32,
        xp_bonus: (state.rebirth_level as f64 * REBIRTH_XP_BONUS * 100.0).round() as u32,
        starting_weapons: state.starting_weapon_count(),
        total_rebirths: state.total_rebirths,
        lifetime_kills: state.lifetime_kills,
        highest_wave: state.highest_wave,
    }
}

/// Distinct weapons drawn from the starting pool, one per unlocked slot.
pub fn starting_weapons(state: &RebirthState, rng: &mut impl Rng) -> Vec<&'static str> {
    STARTING_WEAPON_POOL
        .choose_multiple(rng, state.starting_weapon_count() as usize)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn at_level(rebirth_level: u32) -> RebirthState {
        RebirthState {
            rebirth_level,
            ..RebirthState::default()
        }
    }

    #[test]
    fn test_can_rebirth_thresholds() {
        let fresh = RebirthState::default();
        assert!(can_rebirth(49, &fresh).is_none());
        assert_eq!(can_rebirth(50, &fresh).unwrap().rebirth, 1);
        assert_eq!(can_rebirth(120, &fresh).unwrap().name, "MID-LEVEL");
        assert!(can_rebirth(120, &at_level(2)).is_none());
        assert_eq!(can_rebirth(150, &at_level(2)).unwrap().rebirth, 3);
        assert!(can_rebirth(10_000, &at_level(5)).is_none());
    }

    #[test]
    fn test_perform_rebirth_updates_state() {
        let state = RebirthState {
            rebirth_level: 0,
            highest_wave: 70,
            total_rebirths: 0,
            lifetime_kills: 100,
        };
        let next = perform_rebirth(55, 40, &state);
        assert_eq!(next.rebirth_level, 1);
        assert_eq!(next.total_rebirths, 1);
        assert_eq!(next.lifetime_kills, 140);
        assert_eq!(next.highest_wave, 70);

        let later = perform_rebirth(101, 10, &next);
        assert_eq!(later.rebirth_level, 2);
        assert_eq!(later.highest_wave, 101);
    }

    #[test]
    fn test_perform_rebirth_without_milestone_is_noop() {
        let state = at_level(1);
        assert_eq!(perform_rebirth(60, 500, &state), state);
    }

    #[test]
    fn test_multipliers() {
        let s = at_level(3);
        assert!((s.all_stats_multiplier() - 1.15).abs() < 1e-9);
        assert!((s.xp_multiplier() - 1.3).abs() < 1e-9);
        assert_eq!(s.starting_weapon_count(), 3);
        assert_eq!(at_level(5).starting_weapon_count(), 3);
        assert_eq!(at_level(0).all_stats_multiplier(), 1.0);
    }

    #[test]
    fn test_rebirth_info() {
        let info = rebirth_info(&RebirthState::default());
        assert_eq!(info.name, "INTERN");
        assert_eq!(info.next_milestone.unwrap().wave, 50);
        assert_eq!(info.all_stats_bonus, 0);

        let info = rebirth_info(&at_level(3));
        assert_eq!(info.name, "SENIOR DEV");
        assert_eq!(info.all_stats_bonus, 15);
        assert_eq!(info.xp_bonus, 30);

        assert!(rebirth_info(&at_level(5)).next_milestone.is_none());
    }

    #[test]
    fn test_starting_weapons_distinct() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert!(starting_weapons(&at_level(0), &mut rng).is_empty());
        for _ in 0..20 {
            let picked = starting_weapons(&at_level(4), &mut rng);
            assert_eq!(picked.len(), 3);
            let unique: HashSet<_> = picked.iter().collect();
            assert_eq!(unique.len(), 3);
            assert!(picked.iter().all(|w| STARTING_WEAPON_POOL.contains(w)));
        }
    }
}
