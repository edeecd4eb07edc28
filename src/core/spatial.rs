//! Uniform grid for proximity queries over active entities.
//!
//! Rebuilt once per tick (`clear` + `insert`), then queried read-only.

use super::constants::DEFAULT_CELL_SIZE;
use std::collections::HashMap;

/// Position snapshot of an entity handed in by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySnapshot {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub active: bool,
}

impl EntitySnapshot {
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            active: true,
        }
    }

    fn distance_to(&self, x: f64, y: f64) -> f64 {
        ((self.x - x).powi(2) + (self.y - y).powi(2)).sqrt()
    }
}

pub type CellKey = (i64, i64);

#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cell_size: f64,
    grid: HashMap<CellKey, Vec<EntitySnapshot>>,
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl SpatialIndex {
    /// Non-positive or non-finite cell sizes fall back to the default.
    pub fn new(cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            DEFAULT_CELL_SIZE
        };
        Self {
            cell_size,
            grid: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn cell_key(&self, x: f64, y: f64) -> CellKey {
        (
            (x / self.cell_size).floor() as i64,
            (y / self.cell_size).floor() as i64,
        )
    }

    pub fn clear(&mut self) {
        self.grid.clear();
    }

    /// Number of occupied cells.
    pub fn occupied_cells(&self) -> usize {
        self.grid.len()
    }

    pub fn insert(&mut self, entity: EntitySnapshot) {
        if !entity.active {
            return;
        }
        let key = self.cell_key(entity.x, entity.y);
        self.grid.entry(key).or_default().push(entity);
    }

    pub fn insert_all<I>(&mut self, entities: I)
    where
        I: IntoIterator<Item = EntitySnapshot>,
    {
        for entity in entities {
            self.insert(entity);
        }
    }

    /// Active entities within `radius` of `(x, y)`.
    pub fn nearby(&self, x: f64, y: f64, radius: f64) -> Vec<EntitySnapshot> {
        let mut found = Vec::new();
        if radius.is_nan() || radius < 0.0 {
            return found;
        }

        let cell_radius = (radius / self.cell_size).ceil() as i64;
        let (cx, cy) = self.cell_key(x, y);

        for dx in -cell_radius..=cell_radius {
            for dy in -cell_radius..=cell_radius {
                let Some(cell) = self.grid.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                found.extend(
                    cell.iter()
                        .filter(|e| e.active && e.distance_to(x, y) <= radius)
                        .copied(),
                );
            }
        }

        found
    }

    /// Entities stored in the cell containing `(x, y)`.
    pub fn cell(&self, x: f64, y: f64) -> &[EntitySnapshot] {
        self.grid
            .get(&self.cell_key(x, y))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Rebuilds the index from `targets` and reports every `(source, target)`
    /// pair within `radius`.
    pub fn check_collisions<A, B, F>(&mut self, sources: A, targets: B, radius: f64, mut on_hit: F)
    where
        A: IntoIterator<Item = EntitySnapshot>,
        B: IntoIterator<Item = EntitySnapshot>,
        F: FnMut(&EntitySnapshot, &EntitySnapshot),
    {
        self.clear();
        self.insert_all(targets);

        for source in sources.into_iter().filter(|s| s.active) {
            for target in self.nearby(source.x, source.y, radius) {
                on_hit(&source, &target);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cell_size() {
        assert_eq!(SpatialIndex::default().cell_size(), 100.0);
        assert_eq!(SpatialIndex::new(50.0).cell_size(), 50.0);
        assert_eq!(SpatialIndex::new(0.0).cell_size(), 100.0);
    }

    #[test]
    fn test_cell_key() {
        let index = SpatialIndex::default();
        assert_eq!(index.cell_key(150.0, 250.0), (1, 2));
        assert_eq!(index.cell_key(0.0, 0.0), (0, 0));
        assert_eq!(index.cell_key(-50.0, -150.0), (-1, -2));
        assert_eq!(index.cell_key(10.0, 10.0), index.cell_key(99.0, 99.0));
        assert_ne!(index.cell_key(50.0, 50.0), index.cell_key(150.0, 150.0));
    }

    #[test]
    fn test_insert_ignores_inactive() {
        let mut index = SpatialIndex::default();
        index.insert(EntitySnapshot {
            active: false,
            ..EntitySnapshot::new(1, 0.0, 0.0)
        });
        assert_eq!(index.occupied_cells(), 0);

        index.insert(EntitySnapshot::new(2, 150.0, 250.0));
        assert_eq!(index.cell(150.0, 250.0).len(), 1);
        assert_eq!(index.cell(150.0, 250.0)[0].id, 2);
    }

    #[test]
    fn test_nearby_precise_distance() {
        let mut index = SpatialIndex::default();
        index.insert_all([
            EntitySnapshot::new(1, 10.0, 10.0),
            EntitySnapshot::new(2, 60.0, 10.0),
            EntitySnapshot::new(3, 500.0, 500.0),
        ]);

        let ids: Vec<u64> = index.nearby(0.0, 0.0, 20.0).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1]);

        let mut ids: Vec<u64> = index.nearby(0.0, 0.0, 100.0).iter().map(|e| e.id).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_nearby_crosses_cell_boundaries() {
        let mut index = SpatialIndex::default();
        index.insert(EntitySnapshot::new(7, 101.0, 0.0));
        assert_eq!(index.nearby(99.0, 0.0, 5.0).len(), 1);
    }

    #[test]
    fn test_clear_empties_grid() {
        let mut index = SpatialIndex::default();
        index.insert(EntitySnapshot::new(1, 0.0, 0.0));
        index.clear();
        assert!(index.nearby(0.0, 0.0, 1000.0).is_empty());
    }

    #[test]
    fn test_check_collisions() {
        let mut index = SpatialIndex::default();
        let bullets = [
            EntitySnapshot::new(100, 0.0, 0.0),
            EntitySnapshot::new(101, 300.0, 300.0),
        ];
        let enemies = [
            EntitySnapshot::new(1, 5.0, 5.0),
            EntitySnapshot::new(2, 900.0, 900.0),
        ];

        let mut hits = Vec::new();
        index.check_collisions(bullets, enemies, 16.0, |a, b| hits.push((a.id, b.id)));

        assert_eq!(hits, vec![(100, 1)]);
    }
}
