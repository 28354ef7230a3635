//! Drag interaction state machine for the active socket group.
//!
//! A press on the active group starts a drag session; every pointer move
//! converts the pixel delta since the press into centimeters, builds a
//! candidate position and runs it through [`validate_group`]. Valid
//! candidates become the live preview and the last valid position; invalid
//! ones leave the preview parked on the last valid position and surface the
//! rejection reason. Releasing emits a [`DragCommit`] only when the last
//! valid position differs from where the drag began.
//!
//! Invariants:
//! 1. At most one session exists, and it belongs to exactly one group.
//! 2. The preview never shows a position that failed validation.
//! 3. Samples from a pointer other than the one that pressed are ignored.
//! 4. Cancellation (Escape, lost capture) returns to Idle without a commit.

use crate::constants::MIN_DRAG_SCALE;
use crate::error::PlacementError;
use crate::geometry::validate_group;
use crate::types::{GroupId, Plate, PlacementRules, Position, SocketGroup};

/// Identity of the pointer (mouse, finger, pen) driving a drag.
pub type PointerId = u64;

/// A pointer sample in screen pixels (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPos {
    pub x: f64,
    pub y: f64,
}

impl PointerPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Everything tracked while one group is being dragged.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub group_id: GroupId,
    pub pointer: PointerId,
    /// Pointer position at press time
    pub start_pointer: PointerPos,
    /// The group's committed position when the drag began
    pub start: Position,
    /// Latest candidate that passed validation
    pub last_valid: Position,
    /// Position shown to the user right now
    pub live: Position,
    /// Why the most recent candidate was refused, if it was
    pub invalid_reason: Option<PlacementError>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Outcome of a single pointer-move sample.
#[derive(Debug, Clone, PartialEq)]
pub enum DragFeedback {
    /// No drag in progress, or the sample came from another pointer/group
    Ignored,
    /// The candidate is legal and is now the live position
    Accepted(Position),
    /// The candidate was refused; the preview holds at `held`
    Rejected {
        held: Position,
        reason: PlacementError,
    },
}

/// Final placement emitted on release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragCommit {
    pub group_id: GroupId,
    pub position: Position,
}

/// Drag controller for the single active group.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    /// Starts a drag when `group` is the active group and no drag is running.
    ///
    /// Returns whether a session was started.
    pub fn press(
        &mut self,
        pointer: PointerId,
        at: PointerPos,
        group: &SocketGroup,
        active: Option<GroupId>,
    ) -> bool {
        if active != Some(group.id) || self.is_dragging() {
            return false;
        }
        let start = group.position();
        self.state = DragState::Dragging(DragSession {
            group_id: group.id,
            pointer,
            start_pointer: at,
            start,
            last_valid: start,
            live: start,
            invalid_reason: None,
        });
        log::trace!("drag started on group {} at {:?}", group.id, start);
        true
    }

    /// Feeds one pointer-move sample.
    ///
    /// `group` is the committed group being dragged and `siblings` the
    /// committed groups on its plate (the group itself may be included).
    /// `scale` is the current px-per-cm factor of the layout.
    #[allow(clippy::too_many_arguments)]
    pub fn pointer_move(
        &mut self,
        pointer: PointerId,
        at: PointerPos,
        scale: f64,
        group: &SocketGroup,
        plate: &Plate,
        siblings: &[SocketGroup],
        rules: &PlacementRules,
    ) -> DragFeedback {
        let DragState::Dragging(session) = &mut self.state else {
            return DragFeedback::Ignored;
        };
        if session.pointer != pointer || session.group_id != group.id {
            return DragFeedback::Ignored;
        }

        let scale = scale.max(MIN_DRAG_SCALE);
        let dx = (at.x - session.start_pointer.x) / scale;
        let dy = (at.y - session.start_pointer.y) / scale;
        // Screen y grows downward, bottom distance grows upward.
        let candidate = group.at(Position::new(
            session.start.left + dx,
            session.start.bottom - dy,
        ));

        match validate_group(&candidate, plate, siblings, rules) {
            Ok(()) => {
                let position = candidate.position();
                session.last_valid = position;
                session.live = position;
                session.invalid_reason = None;
                DragFeedback::Accepted(position)
            }
            Err(reason) => {
                log::trace!("drag candidate {:?} refused: {reason}", candidate.position());
                session.live = session.last_valid;
                session.invalid_reason = Some(reason.clone());
                DragFeedback::Rejected {
                    held: session.last_valid,
                    reason,
                }
            }
        }
    }

    /// Ends the drag. Returns a commit when the group actually moved.
    pub fn release(&mut self, pointer: PointerId) -> Option<DragCommit> {
        match &self.state {
            DragState::Dragging(session) if session.pointer == pointer => {}
            _ => return None,
        }
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        (session.last_valid != session.start).then(|| DragCommit {
            group_id: session.group_id,
            position: session.last_valid,
        })
    }

    /// Abandons any drag without committing. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        if was_dragging {
            log::trace!("drag cancelled");
        }
        self.state = DragState::Idle;
        was_dragging
    }

    /// The position to draw for `group`: the live preview while it is being
    /// dragged, otherwise its committed position.
    pub fn display_position(&self, group: &SocketGroup) -> Position {
        match self.session() {
            Some(session) if session.group_id == group.id => session.live,
            _ => group.position(),
        }
    }

    /// Reason the latest candidate was refused, while dragging.
    pub fn invalid_reason(&self) -> Option<&PlacementError> {
        self.session().and_then(|s| s.invalid_reason.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Edge;

    const MOUSE: PointerId = 0;

    struct Fixture {
        plate: Plate,
        group: SocketGroup,
        rules: PlacementRules,
    }

    fn fixture() -> Fixture {
        let plate = Plate::new(100.0, 50.0);
        let group = SocketGroup::new(plate.id, Position::new(10.0, 10.0));
        Fixture {
            plate,
            group,
            rules: PlacementRules::default(),
        }
    }

    impl Fixture {
        fn drag_to(&self, ctl: &mut DragController, x: f64, y: f64, siblings: &[SocketGroup]) -> DragFeedback {
            ctl.pointer_move(
                MOUSE,
                PointerPos::new(x, y),
                2.0,
                &self.group,
                &self.plate,
                siblings,
                &self.rules,
            )
        }
    }

    #[test]
    fn press_requires_active_group() {
        let f = fixture();
        let mut ctl = DragController::new();
        assert!(!ctl.press(MOUSE, PointerPos::default(), &f.group, None));
        assert!(!ctl.is_dragging());
        assert!(ctl.press(MOUSE, PointerPos::default(), &f.group, Some(f.group.id)));
        assert!(ctl.is_dragging());
        // A second press while dragging is ignored.
        assert!(!ctl.press(7, PointerPos::default(), &f.group, Some(f.group.id)));
        assert_eq!(ctl.session().unwrap().pointer, MOUSE);
    }

    #[test]
    fn move_converts_pixels_to_centimeters() {
        let f = fixture();
        let mut ctl = DragController::new();
        ctl.press(MOUSE, PointerPos::new(100.0, 100.0), &f.group, Some(f.group.id));
        // 20 px right and 10 px down at 2 px/cm
        let feedback = f.drag_to(&mut ctl, 120.0, 110.0, &[]);
        assert_eq!(feedback, DragFeedback::Accepted(Position::new(20.0, 5.0)));
        assert_eq!(ctl.display_position(&f.group), Position::new(20.0, 5.0));
        assert!(ctl.invalid_reason().is_none());
    }

    #[test]
    fn invalid_candidate_holds_last_valid_position() {
        let f = fixture();
        let mut ctl = DragController::new();
        ctl.press(MOUSE, PointerPos::new(0.0, 0.0), &f.group, Some(f.group.id));
        f.drag_to(&mut ctl, 10.0, 0.0, &[]);
        // 40 px left puts the group at left = -5
        let feedback = f.drag_to(&mut ctl, -30.0, 0.0, &[]);
        let DragFeedback::Rejected { held, reason } = feedback else {
            panic!("expected a rejection, got {feedback:?}");
        };
        assert_eq!(held, Position::new(15.0, 10.0));
        assert_eq!(
            reason,
            PlacementError::EdgeClearance {
                edge: Edge::Left,
                min: 3.0
            }
        );
        assert_eq!(ctl.display_position(&f.group), Position::new(15.0, 10.0));
        assert!(ctl.invalid_reason().is_some());
    }

    #[test]
    fn commit_uses_last_valid_not_invalid_intermediate() {
        let f = fixture();
        let mut ctl = DragController::new();
        ctl.press(MOUSE, PointerPos::new(0.0, 0.0), &f.group, Some(f.group.id));
        f.drag_to(&mut ctl, 20.0, 0.0, &[]);
        f.drag_to(&mut ctl, 1000.0, 0.0, &[]);
        f.drag_to(&mut ctl, 40.0, -20.0, &[]);
        let commit = ctl.release(MOUSE).unwrap();
        assert_eq!(commit.group_id, f.group.id);
        assert_eq!(commit.position, Position::new(30.0, 20.0));
        assert!(!ctl.is_dragging());
        assert!(ctl.invalid_reason().is_none());
    }

    #[test]
    fn release_without_change_emits_nothing() {
        let f = fixture();
        let mut ctl = DragController::new();
        ctl.press(MOUSE, PointerPos::new(0.0, 0.0), &f.group, Some(f.group.id));
        // Every sample rejected from the first movement on
        let feedback = f.drag_to(&mut ctl, -100.0, 0.0, &[]);
        assert!(matches!(feedback, DragFeedback::Rejected { .. }));
        assert_eq!(ctl.release(MOUSE), None);
        assert!(!ctl.is_dragging());
    }

    #[test]
    fn sibling_blocks_drag_into_its_gap() {
        let f = fixture();
        let sibling = SocketGroup::new(f.plate.id, Position::new(30.0, 10.0));
        let mut ctl = DragController::new();
        ctl.press(MOUSE, PointerPos::new(0.0, 0.0), &f.group, Some(f.group.id));
        // left = 19 leaves exactly the 4 cm gap to the sibling at 30
        assert!(matches!(
            f.drag_to(&mut ctl, 18.0, 0.0, &[f.group, sibling]),
            DragFeedback::Accepted(_)
        ));
        assert!(matches!(
            f.drag_to(&mut ctl, 20.0, 0.0, &[f.group, sibling]),
            DragFeedback::Rejected {
                reason: PlacementError::SiblingSpacing { .. },
                ..
            }
        ));
        assert_eq!(ctl.release(MOUSE).unwrap().position, Position::new(19.0, 10.0));
    }

    #[test]
    fn foreign_pointer_samples_are_ignored() {
        let f = fixture();
        let mut ctl = DragController::new();
        ctl.press(MOUSE, PointerPos::new(0.0, 0.0), &f.group, Some(f.group.id));
        let feedback = ctl.pointer_move(
            9,
            PointerPos::new(20.0, 0.0),
            2.0,
            &f.group,
            &f.plate,
            &[],
            &f.rules,
        );
        assert_eq!(feedback, DragFeedback::Ignored);
        assert_eq!(ctl.release(9), None);
        assert!(ctl.is_dragging());
    }

    #[test]
    fn cancel_returns_to_idle_without_commit() {
        let f = fixture();
        let mut ctl = DragController::new();
        ctl.press(MOUSE, PointerPos::new(0.0, 0.0), &f.group, Some(f.group.id));
        f.drag_to(&mut ctl, 20.0, 0.0, &[]);
        assert!(ctl.cancel());
        assert!(!ctl.is_dragging());
        assert_eq!(ctl.release(MOUSE), None);
        assert_eq!(ctl.display_position(&f.group), f.group.position());
        assert!(!ctl.cancel());
    }

    #[test]
    fn idle_move_is_ignored() {
        let f = fixture();
        let mut ctl = DragController::new();
        assert_eq!(f.drag_to(&mut ctl, 5.0, 5.0, &[]), DragFeedback::Ignored);
    }

    #[test]
    fn zero_scale_does_not_produce_nan() {
        let f = fixture();
        let mut ctl = DragController::new();
        ctl.press(MOUSE, PointerPos::new(0.0, 0.0), &f.group, Some(f.group.id));
        let feedback = ctl.pointer_move(
            MOUSE,
            PointerPos::new(0.0, 0.0),
            0.0,
            &f.group,
            &f.plate,
            &[],
            &f.rules,
        );
        assert_eq!(feedback, DragFeedback::Accepted(Position::new(10.0, 10.0)));
    }
}
