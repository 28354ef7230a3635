//! The committed project: plates, socket groups and the editing focus.
//!
//! A [`Project`] is an immutable snapshot. Every mutation takes `&self` and
//! returns a fresh snapshot, or a [`PlacementError`] that leaves the caller's
//! snapshot as it was. All group placements pass through
//! [`validate_group`] before they are committed.

use crate::constants::{INITIAL_PLATES, NEW_PLATE_SIZE};
use crate::drag::DragCommit;
use crate::error::{Dimension, PlacementError, Result};
use crate::geometry::{group_extent, is_plate_eligible, snap_inside_plate, validate_group};
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Socket count and price for one plate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateSummary {
    /// Zero-based position of the plate in the plate list
    pub index: usize,
    pub plate: Plate,
    pub socket_count: u32,
    pub price_eur: f64,
}

/// The single owned application state.
///
/// Deserialization goes through [`ProjectRecord`], so a restored project
/// always satisfies the same invariants as one built by the operations below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "ProjectRecord")]
pub struct Project {
    /// All plates, in canvas order. Never empty.
    pub plates: Vec<Plate>,
    /// All committed socket groups
    pub groups: Vec<SocketGroup>,
    /// Whether socket cut-outs are being planned at all
    pub sockets_enabled: bool,
    /// The one group that can be edited and dragged
    pub editing_id: Option<GroupId>,
    /// Plate explicitly chosen in the socket editor
    pub selected_plate_id: Option<PlateId>,
    /// Placement policy applied to every check
    pub rules: PlacementRules,
}

/// Project as found in saved JSON, before it is checked.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProjectRecord {
    plates: Vec<Plate>,
    groups: Vec<SocketGroup>,
    sockets_enabled: bool,
    editing_id: Option<GroupId>,
    selected_plate_id: Option<PlateId>,
    rules: PlacementRules,
}

impl From<ProjectRecord> for Project {
    fn from(record: ProjectRecord) -> Self {
        Project::restore(record)
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::with_plates(&INITIAL_PLATES)
    }
}

impl Project {
    /// Creates the initial project with the reference plates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a project holding plates of the given `(width, height)` sizes.
    pub fn with_plates(sizes: &[(f64, f64)]) -> Self {
        Self {
            plates: sizes.iter().map(|&(w, h)| Plate::new(w, h)).collect(),
            groups: Vec::new(),
            sockets_enabled: false,
            editing_id: None,
            selected_plate_id: None,
            rules: PlacementRules::default(),
        }
    }

    /// Serialize the project to a JSON string
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a project from a JSON string
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Rebuilds a saved project, dropping whatever breaks the placement rules.
    ///
    /// Plates with out-of-range dimensions are dropped, and an empty plate list
    /// falls back to the initial plates. Groups are replayed in order through
    /// [`validate_group`]; orphaned, duplicated or illegal ones are dropped, as
    /// are all groups while sockets are disabled. Dangling editing and
    /// selection references are cleared.
    fn restore(record: ProjectRecord) -> Self {
        let ProjectRecord {
            plates,
            groups,
            sockets_enabled,
            editing_id,
            selected_plate_id,
            rules,
        } = record;
        let limits = rules.limits;

        let saved_plates = plates.len();
        let mut plates: Vec<Plate> = plates
            .into_iter()
            .filter(|p| {
                check_range(Dimension::Width, p.width, limits.width_min, limits.width_max).is_ok()
                    && check_range(Dimension::Height, p.height, limits.height_min, limits.height_max)
                        .is_ok()
            })
            .collect();
        if plates.len() < saved_plates {
            log::warn!(
                "dropped {} saved plate(s) with out-of-range dimensions",
                saved_plates - plates.len()
            );
        }
        if plates.is_empty() {
            log::warn!("saved project has no usable plates, restoring the initial plates");
            plates = INITIAL_PLATES.iter().map(|&(w, h)| Plate::new(w, h)).collect();
        }

        let mut project = Project {
            plates,
            groups: Vec::new(),
            sockets_enabled,
            editing_id: None,
            selected_plate_id: None,
            rules,
        };

        let saved_groups = groups.len();
        if sockets_enabled {
            for group in groups {
                let Some(plate) = project.plate(group.plate_id).copied() else {
                    continue;
                };
                let legal = project.group(group.id).is_none()
                    && rules.check_count(group.count).is_ok()
                    && validate_group(&group, &plate, &project.groups, &rules).is_ok();
                if legal {
                    project.groups.push(group);
                }
            }
        }
        if project.groups.len() < saved_groups {
            log::warn!(
                "dropped {} saved socket group(s) that break the placement rules",
                saved_groups - project.groups.len()
            );
        }

        project.editing_id = editing_id.filter(|id| project.group(*id).is_some());
        project.selected_plate_id = selected_plate_id
            .filter(|id| project.plate(*id).is_some_and(|p| project.is_eligible(p)));
        if project.editing_id != editing_id || project.selected_plate_id != selected_plate_id {
            log::warn!("cleared a dangling editing or selection reference in the saved project");
        }
        project
    }

    // ---------------------------------------------------------------------
    // Lookups
    // ---------------------------------------------------------------------

    pub fn plate(&self, id: PlateId) -> Option<&Plate> {
        self.plates.iter().find(|p| p.id == id)
    }

    pub fn group(&self, id: GroupId) -> Option<&SocketGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    fn plate_or_err(&self, id: PlateId) -> Result<&Plate> {
        self.plate(id).ok_or(PlacementError::UnknownPlate(id))
    }

    fn group_or_err(&self, id: GroupId) -> Result<&SocketGroup> {
        self.group(id).ok_or(PlacementError::UnknownGroup(id))
    }

    pub fn is_eligible(&self, plate: &Plate) -> bool {
        is_plate_eligible(plate, &self.rules)
    }

    /// Plates large enough to host sockets, in canvas order.
    pub fn eligible_plates(&self) -> impl Iterator<Item = &Plate> + '_ {
        self.plates.iter().filter(|p| self.is_eligible(p))
    }

    fn first_eligible_or_err(&self) -> Result<&Plate> {
        self.eligible_plates()
            .next()
            .ok_or(PlacementError::NoEligiblePlate {
                min: self.rules.limits.min_socket_plate,
            })
    }

    /// Groups on `plate_id`, in creation order.
    pub fn groups_on(&self, plate_id: PlateId) -> impl Iterator<Item = &SocketGroup> + '_ {
        self.groups.iter().filter(move |g| g.plate_id == plate_id)
    }

    /// Committed groups sharing `group`'s plate, excluding `group` itself.
    pub fn siblings_of(&self, group: &SocketGroup) -> Vec<SocketGroup> {
        self.groups_on(group.plate_id)
            .filter(|g| g.id != group.id)
            .copied()
            .collect()
    }

    // ---------------------------------------------------------------------
    // Focus
    // ---------------------------------------------------------------------

    /// The plate the canvas zooms to: the selected plate, else the plate of
    /// the editing group.
    pub fn focused_plate_id(&self) -> Option<PlateId> {
        self.selected_plate_id.or_else(|| {
            self.editing_id
                .and_then(|id| self.group(id))
                .map(|g| g.plate_id)
        })
    }

    /// Plates drawn on the canvas: only the focused plate, or all of them.
    pub fn visible_plates(&self) -> Vec<Plate> {
        match self.focused_plate_id().and_then(|id| self.plate(id)) {
            Some(plate) => vec![*plate],
            None => self.plates.clone(),
        }
    }

    /// Groups drawn on the canvas: those on the focused plate while sockets
    /// are enabled.
    pub fn groups_to_show(&self) -> Vec<SocketGroup> {
        match self.focused_plate_id() {
            Some(plate_id) if self.sockets_enabled => {
                self.groups_on(plate_id).copied().collect()
            }
            _ => Vec::new(),
        }
    }

    /// The plate whose groups the socket editor shows: the selected plate,
    /// else the first eligible plate, else the first plate.
    pub fn open_plate_id(&self) -> Option<PlateId> {
        self.selected_plate_id
            .or_else(|| self.eligible_plates().next().map(|p| p.id))
            .or_else(|| self.plates.first().map(|p| p.id))
    }

    /// The group being edited on the open plate: the editing group when it
    /// lives there, otherwise the first group on that plate.
    pub fn active_group(&self) -> Option<&SocketGroup> {
        let plate_id = self.open_plate_id()?;
        self.groups_on(plate_id)
            .find(|g| Some(g.id) == self.editing_id)
            .or_else(|| self.groups_on(plate_id).next())
    }

    /// Socket count and price for one plate.
    pub fn plate_summary(&self, plate_id: PlateId) -> Option<PlateSummary> {
        let index = self.plates.iter().position(|p| p.id == plate_id)?;
        let socket_count: u32 = self.groups_on(plate_id).map(|g| u32::from(g.count)).sum();
        Some(PlateSummary {
            index,
            plate: self.plates[index],
            socket_count,
            price_eur: f64::from(socket_count) * self.rules.socket.price_eur,
        })
    }

    // ---------------------------------------------------------------------
    // Plate operations
    // ---------------------------------------------------------------------

    /// Appends a plate of the default size.
    pub fn add_plate(&self) -> Project {
        let (width, height) = NEW_PLATE_SIZE;
        let plate = Plate::new(width, height);
        log::info!("added plate {} ({width} × {height} cm)", plate.id);
        let mut next = self.clone();
        next.plates.push(plate);
        next
    }

    /// Changes a plate's dimensions.
    ///
    /// # Arguments
    ///
    /// * `id` - The plate to edit
    /// * `edit` - New width and/or height; unset fields are kept
    ///
    /// # Returns
    ///
    /// The new snapshot. When a dimension actually changed, every group on the
    /// plate is removed and references to them are cleared.
    pub fn set_plate(&self, id: PlateId, edit: PlateEdit) -> Result<Project> {
        let before = *self.plate_or_err(id)?;
        let limits = &self.rules.limits;
        let width = edit.width.unwrap_or(before.width);
        let height = edit.height.unwrap_or(before.height);
        check_range(Dimension::Width, width, limits.width_min, limits.width_max)?;
        check_range(Dimension::Height, height, limits.height_min, limits.height_max)?;

        let mut next = self.clone();
        let after = Plate { width, height, ..before };
        if let Some(slot) = next.plates.iter_mut().find(|p| p.id == id) {
            *slot = after;
        }
        if after == before {
            return Ok(next);
        }

        let dropped = next.drop_groups_on(id);
        if next.selected_plate_id == Some(id) && !next.is_eligible(&after) {
            next.selected_plate_id = None;
        }
        log::debug!(
            "plate {id} resized to {width} × {height} cm, {dropped} group(s) removed"
        );
        Ok(next)
    }

    /// Removes a plate along with its groups. The last plate cannot be removed.
    pub fn remove_plate(&self, id: PlateId) -> Result<Project> {
        self.plate_or_err(id)?;
        if self.plates.len() <= 1 {
            return Err(PlacementError::LastPlate);
        }
        let mut next = self.clone();
        next.plates.retain(|p| p.id != id);
        next.drop_groups_on(id);
        if next.selected_plate_id == Some(id) {
            next.selected_plate_id = None;
        }
        log::info!("removed plate {id}");
        Ok(next)
    }

    /// Removes all groups on `plate_id`, clearing a dangling editing
    /// reference. Returns how many were removed.
    fn drop_groups_on(&mut self, plate_id: PlateId) -> usize {
        let before = self.groups.len();
        self.groups.retain(|g| g.plate_id != plate_id);
        if self.editing_id.is_some_and(|id| self.group(id).is_none()) {
            self.editing_id = None;
        }
        before - self.groups.len()
    }

    // ---------------------------------------------------------------------
    // Socket toggle and focus changes
    // ---------------------------------------------------------------------

    /// Switches socket planning on or off.
    ///
    /// Switching off discards all groups and the editing focus. Switching on
    /// with no groups selects the first eligible plate and places a default
    /// group there when it fits.
    pub fn set_sockets_enabled(&self, enabled: bool) -> Project {
        let mut next = self.clone();
        next.sockets_enabled = enabled;
        if !enabled {
            next.groups.clear();
            next.editing_id = None;
            next.selected_plate_id = None;
            return next;
        }
        if !next.groups.is_empty() {
            return next;
        }
        let Some(first) = next.eligible_plates().next().map(|p| p.id) else {
            log::warn!("sockets enabled but no plate can host them");
            return next;
        };
        next.selected_plate_id = Some(first);
        match next.create_default_group(first) {
            Ok((mut created, group_id)) => {
                created.editing_id = Some(group_id);
                created
            }
            Err(err) => {
                log::warn!("could not place the default socket group: {err}");
                next
            }
        }
    }

    /// Selects a plate in the socket editor and focuses its first group.
    ///
    /// An ineligible plate falls back to the first eligible plate.
    pub fn select_plate(&self, plate_id: PlateId) -> Result<Project> {
        let requested = self.plate_or_err(plate_id)?;
        let plate = if self.is_eligible(requested) {
            requested
        } else {
            self.first_eligible_or_err()?
        };
        let mut next = self.clone();
        next.selected_plate_id = Some(plate.id);
        next.editing_id = self.groups_on(plate.id).next().map(|g| g.id);
        Ok(next)
    }

    /// Makes `group_id` the active group, or clears the focus with `None`.
    pub fn set_editing(&self, group_id: Option<GroupId>) -> Result<Project> {
        if let Some(id) = group_id {
            self.group_or_err(id)?;
        }
        let mut next = self.clone();
        next.editing_id = group_id;
        Ok(next)
    }

    // ---------------------------------------------------------------------
    // Group operations
    // ---------------------------------------------------------------------

    /// Places a one-socket horizontal group in the bottom-left corner of a
    /// plate. The group is appended but not focused.
    pub fn create_default_group(&self, plate_id: PlateId) -> Result<(Project, GroupId)> {
        if !self.sockets_enabled {
            return Err(PlacementError::SocketsDisabled);
        }
        let plate = self.plate_or_err(plate_id)?;
        let edge = self.rules.limits.edge_min;
        let candidate = SocketGroup::new(plate.id, Position::new(edge, edge));
        self.commit_new_group(candidate, plate)
    }

    /// Adds a group to the right of the existing groups on the target plate
    /// and focuses it.
    ///
    /// The target is the selected plate when eligible, otherwise the first
    /// eligible plate, which becomes selected.
    pub fn add_next_group(&self) -> Result<(Project, GroupId)> {
        if !self.sockets_enabled {
            return Err(PlacementError::SocketsDisabled);
        }
        let plate = match self.selected_plate_id.and_then(|id| self.plate(id)) {
            Some(p) if self.is_eligible(p) => p,
            _ => self.first_eligible_or_err()?,
        };

        let limits = &self.rules.limits;
        let mut candidate =
            SocketGroup::new(plate.id, Position::new(limits.edge_min, limits.edge_min));
        let right_most = self
            .groups_on(plate.id)
            .map(|g| g.left + group_extent(g, &self.rules).width)
            .reduce(f64::max);
        if let Some(right_most) = right_most {
            let right_most = right_most.max(limits.edge_min);
            let width = group_extent(&candidate, &self.rules).width;
            let proposed = right_most + limits.group_gap;
            let max_left = plate.width - limits.edge_min - width;
            candidate.left = if proposed <= max_left {
                proposed
            } else {
                max_left.max(limits.edge_min)
            };
        }

        let (mut next, group_id) = self.commit_new_group(candidate, plate)?;
        next.selected_plate_id = Some(plate.id);
        next.editing_id = Some(group_id);
        Ok((next, group_id))
    }

    /// Snaps, validates and appends a freshly created group. A collision with
    /// a sibling is reported as [`PlacementError::InsufficientSpace`] since
    /// the user did not choose the position.
    fn commit_new_group(
        &self,
        candidate: SocketGroup,
        plate: &Plate,
    ) -> Result<(Project, GroupId)> {
        let fixed = snap_inside_plate(&candidate, plate, &self.rules);
        let siblings: Vec<SocketGroup> = self.groups_on(plate.id).copied().collect();
        validate_group(&fixed, plate, &siblings, &self.rules).map_err(|err| match err {
            PlacementError::SiblingSpacing { .. } => PlacementError::InsufficientSpace,
            other => other,
        })?;
        let mut next = self.clone();
        next.groups.push(fixed);
        log::debug!(
            "created group {} on plate {} at ({}, {})",
            fixed.id,
            plate.id,
            fixed.left,
            fixed.bottom
        );
        Ok((next, fixed.id))
    }

    /// Moves a group onto another plate, keeping its position where the
    /// target plate allows it. The group becomes the active group and the
    /// target plate becomes selected.
    pub fn move_group_to_plate(&self, group_id: GroupId, plate_id: PlateId) -> Result<Project> {
        let group = self.group_or_err(group_id)?;
        if group.plate_id == plate_id {
            return Ok(self.clone());
        }
        let target = self.plate_or_err(plate_id)?;
        if !self.is_eligible(target) {
            return Err(PlacementError::PlateTooSmall {
                min: self.rules.limits.min_socket_plate,
            });
        }
        let moved = SocketGroup {
            plate_id,
            ..*group
        };
        let candidate = snap_inside_plate(&moved, target, &self.rules);
        let mut next = self.commit_group(candidate, target)?;
        next.editing_id = Some(group_id);
        next.selected_plate_id = Some(plate_id);
        Ok(next)
    }

    /// Applies a count, orientation or position edit to a group.
    pub fn update_group(&self, group_id: GroupId, edit: GroupEdit) -> Result<Project> {
        let group = self.group_or_err(group_id)?;
        if let Some(count) = edit.count {
            self.rules.check_count(count)?;
        }
        let candidate = edit.apply(group);
        let plate = self.plate_or_err(candidate.plate_id)?;
        self.commit_group(candidate, plate)
    }

    /// Commits the final position of a drag. The position is re-validated
    /// against the current snapshot.
    pub fn commit_drag(&self, commit: DragCommit) -> Result<Project> {
        self.update_group(commit.group_id, GroupEdit::position(commit.position))
    }

    /// Deletes a group, clearing the editing focus if it pointed at it.
    pub fn remove_group(&self, group_id: GroupId) -> Result<Project> {
        self.group_or_err(group_id)?;
        let mut next = self.clone();
        next.groups.retain(|g| g.id != group_id);
        if next.editing_id == Some(group_id) {
            next.editing_id = None;
        }
        log::debug!("removed group {group_id}");
        Ok(next)
    }

    /// Validates `candidate` on `plate` and replaces the committed group with
    /// the same id.
    fn commit_group(&self, candidate: SocketGroup, plate: &Plate) -> Result<Project> {
        let siblings = self.siblings_of(&candidate);
        validate_group(&candidate, plate, &siblings, &self.rules)?;
        let mut next = self.clone();
        if let Some(slot) = next.groups.iter_mut().find(|g| g.id == candidate.id) {
            *slot = candidate;
        }
        log::debug!(
            "group {} committed on plate {} at ({}, {}), {} × {:?}",
            candidate.id,
            plate.id,
            candidate.left,
            candidate.bottom,
            candidate.count,
            candidate.dir
        );
        Ok(next)
    }
}

fn check_range(dimension: Dimension, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(PlacementError::DimensionOutOfRange {
            dimension,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Edge;

    fn enabled(sizes: &[(f64, f64)]) -> Project {
        Project::with_plates(sizes).set_sockets_enabled(true)
    }

    #[test]
    fn test_initial_project() {
        let project = Project::new();
        assert_eq!(project.plates.len(), 2);
        assert_eq!((project.plates[0].width, project.plates[0].height), (151.5, 36.8));
        assert_eq!((project.plates[1].width, project.plates[1].height), (200.0, 100.0));
        assert!(!project.sockets_enabled);
        assert!(project.groups.is_empty());
        assert_eq!(project.focused_plate_id(), None);
        assert_eq!(project.visible_plates().len(), 2);
    }

    #[test]
    fn test_end_to_end_placement() {
        let project = enabled(&[(100.0, 50.0)]);
        let plate_id = project.plates[0].id;
        assert_eq!(project.groups.len(), 1);
        let first = project.groups[0];
        assert_eq!(first.position(), Position::new(3.0, 3.0));
        assert_eq!(project.editing_id, Some(first.id));
        assert_eq!(project.selected_plate_id, Some(plate_id));

        let (project, second_id) = project.add_next_group().unwrap();
        let second = *project.group(second_id).unwrap();
        assert_eq!(second.position(), Position::new(14.0, 3.0));
        assert_eq!(project.editing_id, Some(second_id));

        let err = project
            .update_group(second_id, GroupEdit::position(Position::new(3.0, 3.0)))
            .unwrap_err();
        assert_eq!(
            err,
            PlacementError::SiblingSpacing {
                sibling: first.id,
                gap: 4.0
            }
        );
        assert_eq!(project.group(second_id).unwrap().left, 14.0);
    }

    #[test]
    fn test_resize_cascade() {
        let project = enabled(&[(100.0, 50.0), (120.0, 60.0)]);
        let (project, _) = project.add_next_group().unwrap();
        let plate_a = project.plates[0].id;
        let plate_b = project.plates[1].id;
        let project = project.select_plate(plate_b).unwrap();
        let (project, on_b) = project.add_next_group().unwrap();
        assert_eq!(project.groups.len(), 3);

        let resized = project
            .set_plate(plate_a, PlateEdit { width: Some(110.0), height: None })
            .unwrap();
        assert_eq!(resized.groups.len(), 1);
        assert_eq!(resized.groups[0].id, on_b);
        assert_eq!(resized.editing_id, Some(on_b));
    }

    #[test]
    fn test_resize_other_plate_keeps_groups() {
        let project = enabled(&[(100.0, 50.0), (120.0, 60.0)]);
        let (project, _) = project.add_next_group().unwrap();
        let other = project.plates[1].id;
        let resized = project
            .set_plate(other, PlateEdit { width: None, height: Some(70.0) })
            .unwrap();
        assert_eq!(resized.groups, project.groups);
        assert_eq!(resized.editing_id, project.editing_id);
        assert_eq!(resized.plate(other).unwrap().height, 70.0);
    }

    #[test]
    fn test_resize_clears_editing_on_that_plate() {
        let project = enabled(&[(100.0, 50.0)]);
        let plate_id = project.plates[0].id;
        let resized = project
            .set_plate(plate_id, PlateEdit { width: None, height: Some(60.0) })
            .unwrap();
        assert!(resized.groups.is_empty());
        assert_eq!(resized.editing_id, None);
        // Still eligible, so the selection stays.
        assert_eq!(resized.selected_plate_id, Some(plate_id));

        let shrunk = project
            .set_plate(plate_id, PlateEdit { width: None, height: Some(35.0) })
            .unwrap();
        assert_eq!(shrunk.selected_plate_id, None);
    }

    #[test]
    fn test_set_plate_same_size_keeps_groups() {
        let project = enabled(&[(100.0, 50.0)]);
        let plate_id = project.plates[0].id;
        let same = project
            .set_plate(plate_id, PlateEdit { width: Some(100.0), height: Some(50.0) })
            .unwrap();
        assert_eq!(same.groups, project.groups);
    }

    #[test]
    fn test_set_plate_rejects_out_of_range() {
        let project = Project::new();
        let id = project.plates[0].id;
        let err = project
            .set_plate(id, PlateEdit { width: Some(301.0), height: None })
            .unwrap_err();
        assert!(matches!(
            err,
            PlacementError::DimensionOutOfRange { dimension: Dimension::Width, .. }
        ));
        let err = project
            .set_plate(id, PlateEdit { width: None, height: Some(f64::NAN) })
            .unwrap_err();
        assert!(matches!(
            err,
            PlacementError::DimensionOutOfRange { dimension: Dimension::Height, .. }
        ));
        assert!(project
            .set_plate(id, PlateEdit { width: Some(20.0), height: Some(128.0) })
            .is_ok());
    }

    #[test]
    fn test_add_and_remove_plate() {
        let project = Project::with_plates(&[(100.0, 50.0)]);
        let only = project.plates[0].id;
        assert_eq!(project.remove_plate(only), Err(PlacementError::LastPlate));

        let project = project.add_plate();
        assert_eq!(project.plates.len(), 2);
        let added = project.plates[1];
        assert_eq!((added.width, added.height), NEW_PLATE_SIZE);

        let project = project.remove_plate(only).unwrap();
        assert_eq!(project.plates.len(), 1);
        assert_eq!(project.plates[0].id, added.id);
    }

    #[test]
    fn test_remove_plate_cascades() {
        let project = enabled(&[(100.0, 50.0), (60.0, 60.0)]);
        let first = project.plates[0].id;
        let removed = project.remove_plate(first).unwrap();
        assert!(removed.groups.is_empty());
        assert_eq!(removed.editing_id, None);
        assert_eq!(removed.selected_plate_id, None);
    }

    #[test]
    fn test_toggle_sockets() {
        let project = Project::new();
        let on = project.set_sockets_enabled(true);
        // The 151.5 × 36.8 plate is too low, so the second plate is used.
        let target = project.plates[1].id;
        assert_eq!(on.selected_plate_id, Some(target));
        assert_eq!(on.groups.len(), 1);
        assert_eq!(on.groups[0].plate_id, target);
        assert_eq!(on.active_group().map(|g| g.id), on.editing_id);

        let off = on.set_sockets_enabled(false);
        assert!(!off.sockets_enabled);
        assert!(off.groups.is_empty());
        assert_eq!(off.editing_id, None);
        assert_eq!(off.selected_plate_id, None);
    }

    #[test]
    fn test_toggle_without_eligible_plate() {
        let project = Project::with_plates(&[(100.0, 30.0)]).set_sockets_enabled(true);
        assert!(project.sockets_enabled);
        assert!(project.groups.is_empty());
        assert_eq!(
            project.add_next_group().unwrap_err(),
            PlacementError::NoEligiblePlate { min: 40.0 }
        );
    }

    #[test]
    fn test_group_operations_require_sockets() {
        let project = Project::with_plates(&[(100.0, 50.0)]);
        let id = project.plates[0].id;
        assert_eq!(
            project.create_default_group(id).unwrap_err(),
            PlacementError::SocketsDisabled
        );
        assert_eq!(project.add_next_group().unwrap_err(), PlacementError::SocketsDisabled);
    }

    #[test]
    fn test_add_next_fills_row_then_reports_no_space() {
        let mut project = enabled(&[(40.0, 40.0)]);
        for expected_left in [14.0, 25.0] {
            let (next, id) = project.add_next_group().unwrap();
            assert_eq!(next.group(id).unwrap().left, expected_left);
            project = next;
        }
        // 36 would overflow; the clamped left of 30 collides with the group at 25.
        assert_eq!(
            project.add_next_group().unwrap_err(),
            PlacementError::InsufficientSpace
        );
        assert_eq!(project.groups.len(), 3);
    }

    #[test]
    fn test_add_next_falls_back_to_first_eligible() {
        let mut project = enabled(&[(100.0, 30.0), (100.0, 50.0)]);
        project.selected_plate_id = Some(project.plates[0].id);
        let (next, id) = project.add_next_group().unwrap();
        let target = next.plates[1].id;
        assert_eq!(next.group(id).unwrap().plate_id, target);
        assert_eq!(next.selected_plate_id, Some(target));
    }

    #[test]
    fn test_move_group_to_plate() {
        let project = enabled(&[(100.0, 50.0), (45.0, 45.0), (100.0, 35.0)]);
        let group_id = project.groups[0].id;
        let project = project
            .update_group(group_id, GroupEdit::position(Position::new(80.0, 30.0)))
            .unwrap();

        let small = project.plates[2].id;
        assert_eq!(
            project.move_group_to_plate(group_id, small).unwrap_err(),
            PlacementError::PlateTooSmall { min: 40.0 }
        );

        let target = project.plates[1].id;
        let moved = project.move_group_to_plate(group_id, target).unwrap();
        let group = moved.group(group_id).unwrap();
        assert_eq!(group.plate_id, target);
        // Snapped inside 45 × 45: max left and bottom are 45 - 3 - 7.
        assert_eq!(group.position(), Position::new(35.0, 30.0));
        assert_eq!(moved.selected_plate_id, Some(target));
        assert_eq!(moved.editing_id, Some(group_id));
    }

    #[test]
    fn test_move_group_rejected_by_target_siblings() {
        let project = enabled(&[(100.0, 50.0), (100.0, 50.0)]);
        let group_id = project.groups[0].id;
        let target = project.plates[1].id;
        let (project, _) = project
            .select_plate(target)
            .unwrap()
            .add_next_group()
            .unwrap();
        let err = project.move_group_to_plate(group_id, target).unwrap_err();
        assert!(matches!(err, PlacementError::SiblingSpacing { .. }));
        assert_eq!(project.group(group_id).unwrap().plate_id, project.plates[0].id);
    }

    #[test]
    fn test_update_group_count_and_direction() {
        let project = enabled(&[(40.0, 40.0)]);
        let id = project.groups[0].id;
        let project = project
            .update_group(id, GroupEdit::position(Position::new(20.0, 3.0)))
            .unwrap();

        // 3 sockets span 21.4 cm: 20 + 21.4 > 37
        let err = project.update_group(id, GroupEdit::count(3)).unwrap_err();
        assert_eq!(
            err,
            PlacementError::EdgeClearance { edge: Edge::Right, min: 3.0 }
        );
        // Vertical fits: 3 + 21.4 <= 37
        let vertical = project
            .update_group(
                id,
                GroupEdit {
                    count: Some(3),
                    dir: Some(Direction::Vertical),
                    ..GroupEdit::default()
                },
            )
            .unwrap();
        let group = vertical.group(id).unwrap();
        assert_eq!((group.count, group.dir), (3, Direction::Vertical));

        assert_eq!(
            project.update_group(id, GroupEdit::count(6)).unwrap_err(),
            PlacementError::InvalidCount { count: 6, max: 5 }
        );
    }

    #[test]
    fn test_commit_drag_revalidates() {
        let project = enabled(&[(100.0, 50.0)]);
        let id = project.groups[0].id;
        let moved = project
            .commit_drag(DragCommit { group_id: id, position: Position::new(40.0, 20.0) })
            .unwrap();
        assert_eq!(moved.group(id).unwrap().position(), Position::new(40.0, 20.0));
        assert!(project
            .commit_drag(DragCommit { group_id: id, position: Position::new(95.0, 20.0) })
            .is_err());
    }

    #[test]
    fn test_non_finite_position_is_never_committed() {
        let project = enabled(&[(100.0, 50.0)]);
        let id = project.groups[0].id;
        for position in [
            Position::new(f64::NAN, 3.0),
            Position::new(3.0, f64::INFINITY),
            Position::new(f64::NEG_INFINITY, f64::NAN),
        ] {
            let err = project.update_group(id, GroupEdit::position(position)).unwrap_err();
            assert!(matches!(err, PlacementError::EdgeClearance { .. }));
            assert!(project
                .commit_drag(DragCommit { group_id: id, position })
                .is_err());
        }
        assert_eq!(project.group(id).unwrap().position(), Position::new(3.0, 3.0));
    }

    #[test]
    fn test_select_plate_and_focus() {
        let project = enabled(&[(100.0, 50.0), (100.0, 30.0), (80.0, 80.0)]);
        let first_group = project.groups[0].id;
        let third = project.plates[2].id;

        let selected = project.select_plate(third).unwrap();
        assert_eq!(selected.selected_plate_id, Some(third));
        assert_eq!(selected.editing_id, None);
        assert_eq!(selected.visible_plates().len(), 1);
        assert!(selected.groups_to_show().is_empty());
        assert!(selected.active_group().is_none());

        // Ineligible plate falls back to the first eligible one.
        let fallback = selected.select_plate(selected.plates[1].id).unwrap();
        assert_eq!(fallback.selected_plate_id, Some(fallback.plates[0].id));
        assert_eq!(fallback.editing_id, Some(first_group));
        assert_eq!(fallback.groups_to_show().len(), 1);
    }

    #[test]
    fn test_focus_follows_editing_group() {
        let mut project = enabled(&[(100.0, 50.0), (80.0, 80.0)]);
        project.selected_plate_id = None;
        let group = project.groups[0];
        assert_eq!(project.focused_plate_id(), Some(group.plate_id));
        assert_eq!(project.visible_plates()[0].id, group.plate_id);

        let cleared = project.set_editing(None).unwrap();
        assert_eq!(cleared.focused_plate_id(), None);
        assert_eq!(cleared.visible_plates().len(), 2);
        assert!(cleared.groups_to_show().is_empty());
        assert_eq!(cleared.open_plate_id(), Some(cleared.plates[0].id));
        // The first group on the open plate is active even without focus.
        assert_eq!(cleared.active_group().map(|g| g.id), Some(group.id));
    }

    #[test]
    fn test_set_editing_and_remove_group() {
        let project = enabled(&[(100.0, 50.0)]);
        let (project, second) = project.add_next_group().unwrap();
        let first = project.groups[0].id;

        let project = project.set_editing(Some(first)).unwrap();
        assert_eq!(project.active_group().map(|g| g.id), Some(first));
        assert!(project.set_editing(Some(uuid::Uuid::new_v4())).is_err());

        let project = project.remove_group(first).unwrap();
        assert_eq!(project.editing_id, None);
        assert_eq!(project.active_group().map(|g| g.id), Some(second));
        assert_eq!(
            project.remove_group(first).unwrap_err(),
            PlacementError::UnknownGroup(first)
        );
    }

    #[test]
    fn test_plate_summary() {
        let project = enabled(&[(100.0, 50.0)]);
        let (project, second) = project.add_next_group().unwrap();
        let project = project.update_group(second, GroupEdit::count(3)).unwrap();
        let summary = project.plate_summary(project.plates[0].id).unwrap();
        assert_eq!(summary.index, 0);
        assert_eq!(summary.socket_count, 4);
        assert_eq!(summary.price_eur, 80.0);
        assert!(project.plate_summary(uuid::Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_failed_operation_leaves_snapshot_untouched() {
        let project = enabled(&[(100.0, 50.0)]);
        let before = project.clone();
        let id = project.groups[0].id;
        let _ = project.update_group(id, GroupEdit::position(Position::new(0.0, 0.0)));
        let _ = project.remove_plate(project.plates[0].id);
        assert_eq!(project, before);
    }

    #[test]
    fn test_json_persistence() {
        let project = enabled(&[(100.0, 50.0)]);
        let json = project.to_json().unwrap();
        assert!(json.contains("\"sockets_enabled\": true"));
        let restored = Project::from_json(&json).unwrap();
        assert_eq!(restored, project);

        // Missing fields fall back to defaults.
        let partial = Project::from_json(r#"{"sockets_enabled": true}"#).unwrap();
        assert_eq!(partial.plates.len(), 2);
        assert_eq!(partial.rules, PlacementRules::default());
    }

    #[test]
    fn test_empty_plate_list_restores_initial_plates() {
        let restored = Project::from_json(r#"{"plates": []}"#).unwrap();
        let sizes: Vec<(f64, f64)> = restored.plates.iter().map(|p| (p.width, p.height)).collect();
        assert_eq!(sizes, INITIAL_PLATES.to_vec());
    }

    #[test]
    fn test_restore_drops_out_of_range_plates() {
        let mut project = Project::with_plates(&[(100.0, 50.0), (60.0, 60.0)]);
        project.plates[1].width = 1000.0;
        let restored = Project::from_json(&project.to_json().unwrap()).unwrap();
        assert_eq!(restored.plates, vec![project.plates[0]]);
    }

    #[test]
    fn test_restore_drops_orphaned_and_illegal_groups() {
        let project = enabled(&[(100.0, 50.0)]);
        let kept = project.groups[0];
        let plate_id = project.plates[0].id;

        let mut saved = project.clone();
        saved.groups.push(SocketGroup::new(PlateId::new_v4(), Position::new(3.0, 3.0)));
        // Overlaps the first group's gap.
        saved.groups.push(SocketGroup::new(plate_id, Position::new(5.0, 3.0)));
        saved.groups.push(kept);
        let mut bad_count = SocketGroup::new(plate_id, Position::new(40.0, 20.0));
        bad_count.count = 9;
        saved.groups.push(bad_count);

        let restored = Project::from_json(&saved.to_json().unwrap()).unwrap();
        assert_eq!(restored.groups, vec![kept]);
        assert_eq!(restored.editing_id, Some(kept.id));
    }

    #[test]
    fn test_restore_drops_groups_while_sockets_disabled() {
        let mut saved = enabled(&[(100.0, 50.0)]);
        saved.sockets_enabled = false;
        let restored = Project::from_json(&saved.to_json().unwrap()).unwrap();
        assert!(restored.groups.is_empty());
        assert_eq!(restored.editing_id, None);
    }

    #[test]
    fn test_restore_clears_dangling_references() {
        let mut saved = enabled(&[(100.0, 50.0), (30.0, 30.0)]);
        saved.editing_id = Some(GroupId::new_v4());
        saved.selected_plate_id = Some(PlateId::new_v4());
        let restored = Project::from_json(&saved.to_json().unwrap()).unwrap();
        assert_eq!(restored.editing_id, None);
        assert_eq!(restored.selected_plate_id, None);
        assert_eq!(restored.groups, saved.groups);

        // An ineligible plate cannot stay selected either.
        saved.selected_plate_id = Some(saved.plates[1].id);
        let restored = Project::from_json(&saved.to_json().unwrap()).unwrap();
        assert_eq!(restored.selected_plate_id, None);
    }
}
