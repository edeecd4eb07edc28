//! Hit and contact resolution.
//!
//! Pure functions over explicit state; every multiplicative result is
//! floored where it is applied so no fractional health or XP survives.

use rand::Rng;

use super::types::*;
use crate::catalog::EnemyBehavior;
use crate::core::constants::*;

/// Roll for a critical hit; `chance` is a probability in `[0, 1]`.
pub fn roll_crit(chance: f64, rng: &mut impl Rng) -> bool {
    rng.gen::<f64>() < chance
}

/// Damage after the crit multiplier.
pub fn crit_damage(base: i64, is_crit: bool) -> i64 {
    if is_crit {
        base * CRIT_MULTIPLIER
    } else {
        base
    }
}

/// Damage carried by each fork-bomb child.
pub fn fork_child_damage(parent_damage: i64) -> i64 {
    (parent_damage as f64 * FORK_DAMAGE_DECAY).floor() as i64
}

/// A projectile forks only if it is a root fork bomb below the depth cap.
pub fn can_fork(projectile: &Projectile) -> bool {
    projectile.is_fork_bomb && !projectile.is_child && projectile.fork_depth < FORK_MAX_DEPTH
}

/// Children spawned when `projectile` hits; empty when it may not fork.
pub fn fork_children(projectile: &Projectile) -> Vec<Projectile> {
    if !can_fork(projectile) {
        return Vec::new();
    }
    let child = Projectile {
        damage: fork_child_damage(projectile.damage),
        pierce: projectile.pierce,
        is_fork_bomb: true,
        is_child: true,
        fork_depth: projectile.fork_depth + 1,
    };
    vec![child; FORK_CHILD_COUNT]
}

/// One child of a dying split enemy.
///
/// `floor(max_health * 0.4) + 10` keeps children alive even for 1 HP parents,
/// and `floor(xp * 0.3)` keeps two children worth less than their parent.
pub fn split_child(parent: &EnemyInstance) -> EnemyInstance {
    let health =
        (parent.max_health as f64 * SPLIT_HEALTH_FACTOR).floor() as i64 + SPLIT_HEALTH_FLOOR;
    EnemyInstance {
        id: 0,
        type_id: parent.type_id,
        health,
        max_health: health,
        speed: parent.speed * SPLIT_SPEED_FACTOR,
        contact_damage: (parent.contact_damage as f64 * SPLIT_DAMAGE_FACTOR).floor() as i64,
        xp_value: (parent.xp_value as f64 * SPLIT_XP_FACTOR).floor() as u64,
        behavior: parent.behavior,
        can_split: false,
        active: true,
        is_boss: false,
    }
}

/// Applies one projectile hit to `enemy`.
///
/// Death is acted upon exactly once: the first hit that takes health to zero
/// deactivates the enemy and carries the XP and split children; any later
/// hit on the inactive enemy deals nothing.
pub fn resolve_hit(
    projectile: &Projectile,
    enemy: &mut EnemyInstance,
    crit_chance: f64,
    xp: XpMultipliers,
    rng: &mut impl Rng,
) -> HitOutcome {
    if !enemy.active {
        return HitOutcome::default();
    }

    let is_crit = roll_crit(crit_chance, rng);
    let damage_dealt = crit_damage(projectile.damage, is_crit);
    enemy.health -= damage_dealt;

    let mut outcome = HitOutcome {
        damage_dealt,
        is_crit,
        projectile_consumed: !projectile.pierce,
        ..HitOutcome::default()
    };

    if enemy.health <= 0 {
        outcome.killed = true;
        outcome.xp_awarded = xp.apply(enemy.xp_value as f64);

        if enemy.behavior == EnemyBehavior::Split && enemy.can_split {
            let child = split_child(enemy);
            outcome.split_children = vec![child; SPLIT_CHILD_COUNT];
        }

        enemy.active = false;
    }

    outcome.fork_children = fork_children(projectile);
    outcome
}

/// Applies an enemy touching the player.
///
/// Vampiric enemies heal `floor(contact_damage * 0.1)`, capped at their max
/// health; dead enemies never heal.
pub fn resolve_player_contact(
    player: &mut PlayerVitals,
    enemy: &mut EnemyInstance,
    invincible: bool,
    vampiric: bool,
) -> ContactOutcome {
    if invincible {
        return ContactOutcome::default();
    }

    player.health -= enemy.contact_damage;

    let mut enemy_healed = 0;
    if vampiric && enemy.health > 0 {
        let heal = (enemy.contact_damage as f64 * VAMPIRIC_HEAL_FACTOR).floor() as i64;
        let before = enemy.health;
        enemy.health = (enemy.health + heal).min(enemy.max_health);
        enemy_healed = enemy.health - before;
    }

    ContactOutcome {
        damage_taken: enemy.contact_damage,
        player_died: player.health <= 0,
        enemy_healed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_enemy;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn enemy(type_id: &str, health: i64) -> EnemyInstance {
        let mut e = EnemyInstance::from_spec(get_enemy(type_id).unwrap(), 1.0);
        e.health = health;
        e
    }

    #[test]
    fn test_crit_damage() {
        assert_eq!(crit_damage(50, false), 50);
        assert_eq!(crit_damage(50, true), 100);
        assert_eq!(crit_damage(0, true), 0);
        assert_eq!(crit_damage(1, true), 2);
    }

    #[test]
    fn test_roll_crit_extremes() {
        let mut rng = rng();
        for _ in 0..100 {
            assert!(!roll_crit(0.0, &mut rng));
            assert!(roll_crit(1.0, &mut rng));
        }
    }

    #[test]
    fn test_fork_child_damage_decay() {
        assert_eq!(fork_child_damage(100), 70);
        assert_eq!(fork_child_damage(70), 49);
        assert_eq!(fork_child_damage(49), 34);
        assert_eq!(fork_child_damage(33), 23);
        assert_eq!(fork_child_damage(1), 0);
        assert_eq!(fork_child_damage(0), 0);
    }

    #[test]
    fn test_fork_depth_cap() {
        let mut p = Projectile::fork_bomb(100);
        assert!(can_fork(&p));
        p.fork_depth = 1;
        assert!(can_fork(&p));
        p.fork_depth = 2;
        assert!(!can_fork(&p));
        assert!(fork_children(&p).is_empty());
    }

    #[test]
    fn test_fork_children_are_children() {
        let children = fork_children(&Projectile::fork_bomb(20));
        assert_eq!(children.len(), 2);
        for c in &children {
            assert_eq!(c.damage, 14);
            assert_eq!(c.fork_depth, 1);
            assert!(c.is_child);
            assert!(!can_fork(c));
        }
    }

    #[test]
    fn test_kill_awards_multiplied_xp() {
        let mut target = enemy("bug", 1);
        let outcome = resolve_hit(
            &Projectile::new(999, false),
            &mut target,
            0.0,
            XpMultipliers::new(2.0, 1.25),
            &mut rng(),
        );
        assert!(outcome.killed);
        assert_eq!(outcome.xp_awarded, 12);
        assert!(outcome.projectile_consumed);
        assert!(!target.active);
    }

    #[test]
    fn test_pierce_survives_hit() {
        let mut target = enemy("bug", 100);
        let outcome = resolve_hit(
            &Projectile::new(10, true),
            &mut target,
            0.0,
            XpMultipliers::default(),
            &mut rng(),
        );
        assert!(!outcome.projectile_consumed);
        assert!(!outcome.killed);
        assert_eq!(target.health, 90);
        assert!(target.active);
    }

    #[test]
    fn test_guaranteed_crit_doubles() {
        let mut target = enemy("memory-leak", 200);
        let outcome = resolve_hit(
            &Projectile::new(25, false),
            &mut target,
            1.0,
            XpMultipliers::default(),
            &mut rng(),
        );
        assert!(outcome.is_crit);
        assert_eq!(outcome.damage_dealt, 50);
        assert_eq!(target.health, 150);
    }

    #[test]
    fn test_split_enemy_releases_two_children() {
        let mut target = enemy("git-conflict", 1);
        assert_eq!(target.max_health, 45);

        let outcome = resolve_hit(
            &Projectile::new(999, false),
            &mut target,
            0.0,
            XpMultipliers::default(),
            &mut rng(),
        );

        assert!(outcome.killed);
        assert_eq!(outcome.split_children.len(), 2);
        for child in &outcome.split_children {
            assert!(!child.can_split);
            assert_eq!(child.health, 28);
            assert_eq!(child.speed, 48.0);
            assert_eq!(child.contact_damage, 2);
            assert_eq!(child.xp_value, 10);
        }
        let child_xp: u64 = outcome.split_children.iter().map(|c| c.xp_value).sum();
        assert!(child_xp < target.xp_value);
    }

    #[test]
    fn test_split_children_never_resplit() {
        let mut parent = enemy("git-conflict", 1);
        let first = resolve_hit(
            &Projectile::new(999, false),
            &mut parent,
            0.0,
            XpMultipliers::default(),
            &mut rng(),
        );
        let mut child = first.split_children[0].clone();
        child.health = 1;
        let second = resolve_hit(
            &Projectile::new(999, false),
            &mut child,
            0.0,
            XpMultipliers::default(),
            &mut rng(),
        );
        assert!(second.killed);
        assert!(second.split_children.is_empty());
    }

    #[test]
    fn test_split_child_of_one_hp_parent_survives() {
        let mut parent = enemy("git-conflict", 1);
        parent.max_health = 1;
        parent.xp_value = 1;
        let child = split_child(&parent);
        assert_eq!(child.health, 10);
        assert_eq!(child.xp_value, 0);
    }

    #[test]
    fn test_fork_independent_of_kill() {
        let mut target = enemy("bug", 100);
        let outcome = resolve_hit(
            &Projectile::fork_bomb(20),
            &mut target,
            0.0,
            XpMultipliers::default(),
            &mut rng(),
        );
        assert!(!outcome.killed);
        assert_eq!(outcome.fork_children.len(), 2);
    }

    #[test]
    fn test_dead_enemy_not_killed_twice() {
        let mut target = enemy("bug", 1);
        let first = resolve_hit(
            &Projectile::new(5, false),
            &mut target,
            0.0,
            XpMultipliers::default(),
            &mut rng(),
        );
        let second = resolve_hit(
            &Projectile::new(5, false),
            &mut target,
            0.0,
            XpMultipliers::default(),
            &mut rng(),
        );
        assert!(first.killed);
        assert!(!second.killed);
        assert_eq!(second.xp_awarded, 0);
        assert_eq!(target.health, -4);
    }

    #[test]
    fn test_invincible_takes_nothing() {
        let mut player = PlayerVitals::new(100);
        let mut target = enemy("bug", 15);
        let outcome = resolve_player_contact(&mut player, &mut target, true, true);
        assert_eq!(outcome, ContactOutcome::default());
        assert_eq!(player.health, 100);
    }

    #[test]
    fn test_vampiric_heal() {
        let mut player = PlayerVitals::new(100);
        let mut target = enemy("bug", 50);
        target.max_health = 100;
        target.contact_damage = 20;

        let outcome = resolve_player_contact(&mut player, &mut target, false, true);

        assert_eq!(outcome.damage_taken, 20);
        assert_eq!(player.health, 80);
        assert_eq!(outcome.enemy_healed, 2);
        assert_eq!(target.health, 52);
    }

    #[test]
    fn test_vampiric_heal_capped() {
        let mut player = PlayerVitals::new(100);
        let mut target = enemy("bug", 99);
        target.max_health = 100;
        target.contact_damage = 50;

        let outcome = resolve_player_contact(&mut player, &mut target, false, true);

        assert_eq!(target.health, 100);
        assert_eq!(outcome.enemy_healed, 1);
    }

    #[test]
    fn test_dead_enemy_never_heals() {
        let mut player = PlayerVitals::new(100);
        let mut target = enemy("bug", 0);
        target.contact_damage = 10;
        let outcome = resolve_player_contact(&mut player, &mut target, false, true);
        assert_eq!(outcome.enemy_healed, 0);
        assert_eq!(target.health, 0);
    }

    #[test]
    fn test_segfault_one_shots() {
        let mut player = PlayerVitals::new(100);
        let mut target = enemy("segfault", 10);
        let outcome = resolve_player_contact(&mut player, &mut target, false, false);
        assert!(outcome.player_died);
    }

    #[test]
    fn test_hallucination_is_harmless() {
        let mut player = PlayerVitals::new(100);
        let mut target = enemy("hallucination", 1);
        let outcome = resolve_player_contact(&mut player, &mut target, false, false);
        assert_eq!(outcome.damage_taken, 0);
        assert!(!outcome.player_died);
        assert_eq!(player.health, 100);
    }
}
