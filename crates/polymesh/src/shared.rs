//! Shared-vertex bookkeeping.
//!
//! Raw vertex indices that occupy the same point in space are grouped under
//! one canonical group id, so a seam stays editable as a single point. The
//! table is a partition: every raw index belongs to exactly one group.

use std::collections::HashMap;

use glam::Vec3;
use tracing::debug;

use crate::error::MeshError;

/// Mapping between canonical group ids and the raw vertex indices that
/// occupy the same point in space.
#[derive(Debug, Clone, Default)]
pub struct SharedVertexTable {
    groups: Vec<Vec<u32>>,
    /// Reverse lookup: raw index -> group id.
    lookup: HashMap<u32, u32>,
}

impl SharedVertexTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from explicit groups.
    ///
    /// Fails if any raw index appears in more than one group (or twice in
    /// the same group) — the table must stay a partition.
    pub fn from_groups(groups: Vec<Vec<u32>>) -> Result<Self, MeshError> {
        let mut lookup = HashMap::new();
        for (gid, group) in groups.iter().enumerate() {
            for &raw in group {
                if lookup.insert(raw, gid as u32).is_some() {
                    return Err(MeshError::InvalidSharedTable(format!(
                        "raw index {raw} appears in more than one group"
                    )));
                }
            }
        }
        Ok(Self { groups, lookup })
    }

    /// Build a table by welding positionally-coincident vertices.
    ///
    /// Positions are quantized to `tolerance` and indices landing in the
    /// same cell share a group. Group ids are assigned in order of first
    /// occurrence.
    pub fn from_positions(positions: &[Vec3], tolerance: f32) -> Self {
        let quantize = |p: Vec3| -> [i64; 3] {
            [
                (p.x / tolerance).round() as i64,
                (p.y / tolerance).round() as i64,
                (p.z / tolerance).round() as i64,
            ]
        };

        let mut cell_to_group: HashMap<[i64; 3], u32> = HashMap::new();
        let mut groups: Vec<Vec<u32>> = Vec::new();
        let mut lookup = HashMap::with_capacity(positions.len());

        for (i, &p) in positions.iter().enumerate() {
            let gid = *cell_to_group.entry(quantize(p)).or_insert_with(|| {
                groups.push(Vec::new());
                (groups.len() - 1) as u32
            });
            groups[gid as usize].push(i as u32);
            lookup.insert(i as u32, gid);
        }

        let welded = positions.len() - groups.len();
        if welded > 0 {
            debug!(
                "from_positions: welded {} coincident vertices ({} groups of {} raw)",
                welded,
                groups.len(),
                positions.len()
            );
        }

        Self { groups, lookup }
    }

    /// Group id of a raw vertex index.
    pub fn group_of(&self, raw: u32) -> Option<u32> {
        self.lookup.get(&raw).copied()
    }

    /// Raw indices belonging to a group.
    pub fn group(&self, id: u32) -> Option<&[u32]> {
        self.groups.get(id as usize).map(|g| g.as_slice())
    }

    /// Number of groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate over groups in id order.
    pub fn groups(&self) -> impl Iterator<Item = &[u32]> {
        self.groups.iter().map(|g| g.as_slice())
    }

    /// Add a raw index to an existing group.
    pub fn add_to_group(&mut self, group: u32, raw: u32) -> Result<(), MeshError> {
        if group as usize >= self.groups.len() {
            return Err(MeshError::InvalidSharedTable(format!(
                "group id {group} out of range for {} groups",
                self.groups.len()
            )));
        }
        if self.lookup.contains_key(&raw) {
            return Err(MeshError::InvalidSharedTable(format!(
                "raw index {raw} is already assigned to a group"
            )));
        }
        self.groups[group as usize].push(raw);
        self.lookup.insert(raw, group);
        Ok(())
    }

    /// Append a new group of raw indices, returning its id.
    pub fn push_group(&mut self, raws: Vec<u32>) -> Result<u32, MeshError> {
        for &raw in &raws {
            if self.lookup.contains_key(&raw) {
                return Err(MeshError::InvalidSharedTable(format!(
                    "raw index {raw} is already assigned to a group"
                )));
            }
        }
        let gid = self.groups.len() as u32;
        for &raw in &raws {
            self.lookup.insert(raw, gid);
        }
        self.groups.push(raws);
        Ok(gid)
    }

    /// Rewrite the table after a vertex compaction.
    ///
    /// `map` takes old raw indices to new ones; indices missing from the
    /// map were deleted. Groups that end up empty are dropped and group ids
    /// are renumbered contiguously.
    pub fn remap(&mut self, map: &HashMap<u32, u32>) {
        let old_groups = std::mem::take(&mut self.groups);
        self.lookup.clear();

        for group in old_groups {
            let remapped: Vec<u32> = group
                .into_iter()
                .filter_map(|raw| map.get(&raw).copied())
                .collect();
            if remapped.is_empty() {
                continue;
            }
            let gid = self.groups.len() as u32;
            for &raw in &remapped {
                self.lookup.insert(raw, gid);
            }
            self.groups.push(remapped);
        }
    }

    /// Check the partition invariant against a vertex count: every raw
    /// index below `vertex_count` resolves to exactly one group, and the
    /// reverse lookup agrees with the group arrays.
    pub fn validate(&self, vertex_count: usize) -> Result<(), MeshError> {
        for raw in 0..vertex_count as u32 {
            let gid = self.lookup.get(&raw).ok_or_else(|| {
                MeshError::InvalidSharedTable(format!("raw index {raw} has no group"))
            })?;
            let group = self.groups.get(*gid as usize).ok_or_else(|| {
                MeshError::InvalidSharedTable(format!("raw index {raw} maps to missing group {gid}"))
            })?;
            if !group.contains(&raw) {
                return Err(MeshError::InvalidSharedTable(format!(
                    "group {gid} does not list raw index {raw}"
                )));
            }
        }

        let listed: usize = self.groups.iter().map(|g| g.len()).sum();
        if listed != self.lookup.len() {
            return Err(MeshError::InvalidSharedTable(format!(
                "groups list {listed} raw indices but lookup has {}",
                self.lookup.len()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_positions_welds_coincident() {
        let positions = vec![
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::ZERO, // coincident with index 0
            Vec3::new(0.0, 0.00001, 0.0), // within tolerance of index 0
        ];
        let table = SharedVertexTable::from_positions(&positions, 1e-4);

        assert_eq!(table.group_count(), 2);
        assert_eq!(table.group_of(0), table.group_of(2));
        assert_eq!(table.group_of(0), table.group_of(3));
        assert_ne!(table.group_of(0), table.group_of(1));
        assert!(table.validate(positions.len()).is_ok());
    }

    #[test]
    fn test_lookup_is_total() {
        let positions: Vec<Vec3> = (0..16)
            .map(|i| Vec3::new((i % 4) as f32, (i / 4) as f32, 0.0))
            .collect();
        let table = SharedVertexTable::from_positions(&positions, 1e-4);

        for raw in 0..positions.len() as u32 {
            assert!(table.group_of(raw).is_some(), "raw {raw} has no group");
        }
    }

    #[test]
    fn test_from_groups_rejects_duplicates() {
        let result = SharedVertexTable::from_groups(vec![vec![0, 1], vec![1, 2]]);
        assert!(matches!(result, Err(MeshError::InvalidSharedTable(_))));
    }

    #[test]
    fn test_add_to_group_rejects_assigned_index() {
        let mut table = SharedVertexTable::from_groups(vec![vec![0], vec![1]]).unwrap();
        assert!(table.add_to_group(0, 2).is_ok());
        assert!(table.add_to_group(1, 2).is_err());
        assert!(table.add_to_group(9, 3).is_err());
    }

    #[test]
    fn test_remap_drops_deleted_and_renumbers() {
        let mut table =
            SharedVertexTable::from_groups(vec![vec![0, 3], vec![1], vec![2, 4]]).unwrap();

        // Delete raw indices 1 and 3; compact the rest.
        let map = HashMap::from([(0u32, 0u32), (2, 1), (4, 2)]);
        table.remap(&map);

        assert_eq!(table.group_count(), 2);
        assert_eq!(table.group_of(0), Some(0));
        assert_eq!(table.group_of(1), table.group_of(2));
        assert!(table.validate(3).is_ok());
    }
}
