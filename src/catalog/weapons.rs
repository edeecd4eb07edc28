//! Weapon types and evolution recipes.

use serde::Serialize;

/// Special behaviour attached to a weapon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeaponSpecial {
    Homing,
    Bounce { bounces: u32 },
    Aoe { radius: f64 },
    Freeze { slow_ms: u32 },
    /// Wipes every enemy on screen.
    ClearAll,
    GodMode,
    /// Projectiles fork into decayed children on hit.
    Fork,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeaponSpec {
    pub type_id: &'static str,
    pub attack_rate_mult: f64,
    pub damage_mult: f64,
    pub projectile_count: u32,
    pub pierce: bool,
    pub special: Option<WeaponSpecial>,
    pub melee: bool,
}

impl WeaponSpec {
    pub fn is_fork_bomb(&self) -> bool {
        self.special == Some(WeaponSpecial::Fork)
    }
}

const fn weapon(
    type_id: &'static str,
    attack_rate_mult: f64,
    damage_mult: f64,
    projectile_count: u32,
    pierce: bool,
    special: Option<WeaponSpecial>,
) -> WeaponSpec {
    WeaponSpec {
        type_id,
        attack_rate_mult,
        damage_mult,
        projectile_count,
        pierce,
        special,
        melee: false,
    }
}

const fn melee(
    type_id: &'static str,
    attack_rate_mult: f64,
    damage_mult: f64,
    projectile_count: u32,
    pierce: bool,
) -> WeaponSpec {
    WeaponSpec {
        type_id,
        attack_rate_mult,
        damage_mult,
        projectile_count,
        pierce,
        special: None,
        melee: true,
    }
}

use WeaponSpecial::*;

pub static WEAPON_TYPES: &[WeaponSpec] = &[
    weapon("basic", 1.0, 1.0, 1, false, None),
    weapon("spread", 1.0, 0.7, 5, false, None),
    weapon("pierce", 0.8, 1.5, 1, true, None),
    weapon("orbital", 0.0, 2.0, 0, true, None),
    weapon("rapid", 3.0, 0.5, 1, false, None),
    weapon("homing", 0.7, 1.2, 1, false, Some(Homing)),
    weapon("bounce", 1.0, 0.8, 2, false, Some(Bounce { bounces: 3 })),
    weapon("aoe", 0.5, 0.6, 0, true, Some(Aoe { radius: 100.0 })),
    weapon("freeze", 0.8, 0.9, 1, false, Some(Freeze { slow_ms: 2000 })),
    weapon("rmrf", 0.0, 0.0, 0, false, Some(ClearAll)),
    weapon("sudo", 2.0, 3.0, 1, true, Some(GodMode)),
    weapon("forkbomb", 1.5, 0.6, 3, false, Some(Fork)),
    melee("sword", 1.2, 1.5, 0, false),
    melee("spear", 0.8, 1.2, 0, true),
    melee("boomerang", 0.6, 1.0, 1, false),
    melee("kunai", 2.0, 0.8, 3, false),
];

pub fn get_weapon(type_id: &str) -> Option<&'static WeaponSpec> {
    WEAPON_TYPES.iter().find(|w| w.type_id == type_id)
}

/// Result of combining two base weapons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvolutionRecipe {
    /// Ingredient ids, stored alphabetically.
    pub ingredients: (&'static str, &'static str),
    pub result: &'static str,
    pub damage_mult: f64,
    pub pierce: bool,
}

const fn recipe(
    a: &'static str,
    b: &'static str,
    result: &'static str,
    damage_mult: f64,
    pierce: bool,
) -> EvolutionRecipe {
    EvolutionRecipe {
        ingredients: (a, b),
        result,
        damage_mult,
        pierce,
    }
}

pub static EVOLUTION_RECIPES: &[EvolutionRecipe] = &[
    recipe("pierce", "spread", "laserbeam", 2.5, true),
    recipe("orbital", "rapid", "plasmaorb", 3.0, true),
    recipe("pierce", "rapid", "chainlightning", 1.8, false),
    recipe("rapid", "spread", "bullethell", 0.9, false),
    recipe("orbital", "spread", "ringoffire", 2.2, true),
    recipe("homing", "pierce", "seekingmissile", 4.0, true),
    recipe("bounce", "spread", "chaosbounce", 1.2, false),
    recipe("aoe", "orbital", "deathaura", 1.5, true),
    recipe("freeze", "pierce", "icelance", 2.0, true),
    recipe("homing", "rapid", "swarm", 0.8, false),
    recipe("aoe", "freeze", "blizzard", 0.8, true),
];

/// Looks up the evolution for an unordered pair of weapons.
/// A weapon never evolves with itself.
pub fn evolve(a: &str, b: &str) -> Option<&'static EvolutionRecipe> {
    if a == b {
        return None;
    }
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    EVOLUTION_RECIPES
        .iter()
        .find(|r| r.ingredients.0 == lo && r.ingredients.1 == hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_weapon_count() {
        assert_eq!(WEAPON_TYPES.len(), 16);
    }

    #[test]
    fn test_basic_is_baseline() {
        let basic = get_weapon("basic").unwrap();
        assert_eq!(basic.attack_rate_mult, 1.0);
        assert_eq!(basic.damage_mult, 1.0);
        assert_eq!(basic.projectile_count, 1);
    }

    #[test]
    fn test_weapon_tradeoffs() {
        let basic = get_weapon("basic").unwrap();
        assert!(get_weapon("rapid").unwrap().attack_rate_mult > basic.attack_rate_mult);
        assert!(get_weapon("pierce").unwrap().damage_mult > basic.damage_mult);

        let spread = get_weapon("spread").unwrap();
        assert!(spread.projectile_count > 1);
        assert!(spread.damage_mult < 1.0);

        for w in WEAPON_TYPES {
            assert!(w.damage_mult >= 0.0);
        }
    }

    #[test]
    fn test_only_forkbomb_forks() {
        let forkers: Vec<_> = WEAPON_TYPES
            .iter()
            .filter(|w| w.is_fork_bomb())
            .map(|w| w.type_id)
            .collect();
        assert_eq!(forkers, vec!["forkbomb"]);
    }

    #[test]
    fn test_recipes_use_distinct_base_weapons() {
        assert_eq!(EVOLUTION_RECIPES.len(), 11);
        for r in EVOLUTION_RECIPES {
            let (a, b) = r.ingredients;
            assert_ne!(a, b);
            assert!(a < b, "ingredients of {} not sorted", r.result);
            assert!(get_weapon(a).is_some());
            assert!(get_weapon(b).is_some());
        }
    }

    #[test]
    fn test_recipe_results_unique() {
        let results: HashSet<_> = EVOLUTION_RECIPES.iter().map(|r| r.result).collect();
        assert_eq!(results.len(), EVOLUTION_RECIPES.len());
    }

    #[test]
    fn test_evolved_outdamages_weaker_ingredient() {
        for r in EVOLUTION_RECIPES {
            let a = get_weapon(r.ingredients.0).unwrap().damage_mult;
            let b = get_weapon(r.ingredients.1).unwrap().damage_mult;
            assert!(r.damage_mult > a.min(b), "{} is weaker than its parts", r.result);
        }
    }

    #[test]
    fn test_evolve_is_order_independent() {
        assert_eq!(evolve("spread", "pierce").unwrap().result, "laserbeam");
        assert_eq!(evolve("pierce", "spread").unwrap().result, "laserbeam");
        assert!(evolve("pierce", "pierce").is_none());
        assert!(evolve("basic", "sword").is_none());
    }
}
