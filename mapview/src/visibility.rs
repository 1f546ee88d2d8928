//! Front to back walk of the BSP tree with a coarse field of view cull on the
//! far side of every partition.

use glam::Vec2;
use log::trace;
use math::{cross, point_to_angle};
use wad::{BBox, BspNode, Partition, WadError, WadResult};

use crate::viewer::Viewer;

/// Subsectors found by a walk, in the order they were reached.
///
/// `near` holds everything found under the root's child on the viewer's side
/// and `far` everything under the other child. Below the root the two lists
/// of each sub-walk are folded together, in order, so the split only says
/// which half of the root a subsector is in.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VisibleSubsectors {
    pub near: Vec<u16>,
    pub far:  Vec<u16>,
}

impl VisibleSubsectors {
    /// `near` then `far`
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.near.iter().chain(self.far.iter()).copied()
    }

    pub fn len(&self) -> usize {
        self.near.len() + self.far.len()
    }

    pub fn is_empty(&self) -> bool {
        self.near.is_empty() && self.far.is_empty()
    }

    fn fold_into(self, out: &mut Vec<u16>) {
        out.extend(self.near);
        out.extend(self.far);
    }
}

/// True if `point` is on the back (left) side of the line through
/// `split_start` heading along `split_delta`. A point on the line counts as
/// back.
#[inline]
pub fn point_on_back_side(split_start: Vec2, split_delta: Vec2, point: Vec2) -> bool {
    cross(point - split_start, split_delta) <= 0.0
}

/// Could any of `bbox` be inside the viewer's cone? Errs towards yes.
///
/// The corners facing the viewer are picked by which of the eight regions
/// around the box the viewer is in. Each pair of facing corners is tested as
/// an angular span against the cone.
pub fn box_in_fov(bbox: &BBox, viewer: &Viewer) -> bool {
    let pos = viewer.position;
    let (left, top) = bbox.top_left();
    let (right, bottom) = bbox.bottom_right();
    let (left, top, right, bottom) = (left as f32, top as f32, right as f32, bottom as f32);

    let a = Vec2::new(left, bottom);
    let b = Vec2::new(left, top);
    let c = Vec2::new(right, top);
    let d = Vec2::new(right, bottom);

    let mut pairs = [(Vec2::ZERO, Vec2::ZERO); 2];
    let count = if pos.x < left {
        if pos.y > top {
            pairs = [(b, a), (c, b)];
            2
        } else if pos.y < bottom {
            pairs = [(b, a), (a, d)];
            2
        } else {
            pairs[0] = (b, a);
            1
        }
    } else if pos.x > right {
        if pos.y > top {
            pairs = [(c, b), (d, c)];
            2
        } else if pos.y < bottom {
            pairs = [(a, d), (d, c)];
            2
        } else {
            pairs[0] = (d, c);
            1
        }
    } else if pos.y > top {
        pairs[0] = (c, b);
        1
    } else if pos.y < bottom {
        pairs[0] = (a, d);
        1
    } else {
        // Standing in it
        return true;
    };

    let fov = viewer.fov;
    let half_fov = viewer.half_fov();
    let facing = viewer.angle.deg();
    pairs[..count].iter().any(|&(v1, v2)| {
        let a1 = point_to_angle(pos, v1);
        let a2 = point_to_angle(pos, v2);
        let span = (a1 - a2).rem_euclid(360.0);
        let check = (a1 - facing + half_fov).rem_euclid(360.0);
        !(check > fov && check > span + fov)
    })
}

#[derive(Debug, Default, Clone, Copy)]
struct WalkStats {
    nodes_visited: usize,
    boxes_culled:  usize,
}

struct Walker<'a> {
    viewer: &'a Viewer,
    stats:  WalkStats,
}

impl Walker<'_> {
    fn walk(&mut self, node: &Partition) -> VisibleSubsectors {
        self.stats.nodes_visited += 1;

        let start = Vec2::new(node.split_start.x as f32, node.split_start.y as f32);
        let delta = Vec2::new(node.split_delta.x as f32, node.split_delta.y as f32);
        let (near, far, far_box) = if point_on_back_side(start, delta, self.viewer.position) {
            (&node.left, &node.right, &node.right_box)
        } else {
            (&node.right, &node.left, &node.left_box)
        };

        let mut out = VisibleSubsectors::default();
        match near.as_ref() {
            BspNode::Leaf { subsector } => out.near.push(*subsector),
            BspNode::Internal(child) => self.walk(child).fold_into(&mut out.near),
        }

        if box_in_fov(far_box, self.viewer) {
            match far.as_ref() {
                BspNode::Leaf { subsector } => out.far.push(*subsector),
                BspNode::Internal(child) => self.walk(child).fold_into(&mut out.far),
            }
        } else {
            self.stats.boxes_culled += 1;
        }
        out
    }
}

/// Walk the tree from `root`, nearest side first, skipping any far side whose
/// box is out of view. `root` must be an internal node.
pub fn visible_subsectors(root: &BspNode, viewer: &Viewer) -> WadResult<VisibleSubsectors> {
    let BspNode::Internal(node) = root else {
        return Err(WadError::ContractViolation(
            "visibility walk started on a leaf",
        ));
    };
    let mut walker = Walker {
        viewer,
        stats: WalkStats::default(),
    };
    let found = walker.walk(node);
    trace!(
        "BSP walk: {} nodes visited, {} boxes culled, {} subsectors",
        walker.stats.nodes_visited,
        walker.stats.boxes_culled,
        found.len()
    );
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wad::{WadNode, build_tree};

    fn viewer(x: f32, y: f32, angle: f32) -> Viewer {
        Viewer::new(Vec2::new(x, y), angle, 90.0)
    }

    #[test]
    fn side_on_the_line_start() {
        let p = Vec2::new(10.0, 10.0);
        assert!(point_on_back_side(p, Vec2::new(0.0, 64.0), p));
        assert!(point_on_back_side(p, Vec2::new(-5.0, 3.0), p));
    }

    #[test]
    fn side_ignores_distance_along_line() {
        let start = Vec2::new(0.0, 0.0);
        let delta = Vec2::new(0.0, 100.0);
        for along in [-500.0, 0.0, 1.0, 100.0, 5000.0] {
            // east of a northward line is its right, front side
            assert!(!point_on_back_side(start, delta, Vec2::new(3.0, along)));
            assert!(point_on_back_side(start, delta, Vec2::new(-3.0, along)));
            // on the line itself
            assert!(point_on_back_side(start, delta, start + delta * (along / 100.0)));
        }
    }

    #[test]
    fn inside_box_is_always_visible() {
        let bbox = BBox::new(100, 0, 0, 100);
        for angle in (0..360).step_by(15) {
            assert!(box_in_fov(&bbox, &viewer(50.0, 50.0, angle as f32)));
            // on an edge counts as inside
            assert!(box_in_fov(&bbox, &viewer(0.0, 100.0, angle as f32)));
        }
    }

    #[test]
    fn box_in_front_and_behind() {
        let bbox = BBox::new(50, -50, 100, 200);
        assert!(box_in_fov(&bbox, &viewer(0.0, 0.0, 0.0)));
        assert!(!box_in_fov(&bbox, &viewer(0.0, 0.0, 180.0)));
        // facing straight up, box is 90 degrees off to the right
        assert!(!box_in_fov(&bbox, &viewer(0.0, 0.0, 90.0)));
    }

    #[test]
    fn corner_region_uses_both_faces() {
        // viewer below and left of the box
        let bbox = BBox::new(200, 100, 100, 200);
        assert!(box_in_fov(&bbox, &viewer(0.0, 0.0, 45.0)));
        assert!(!box_in_fov(&bbox, &viewer(0.0, 0.0, 225.0)));
    }

    #[test]
    fn every_outside_region_faces_and_turns_away() {
        let bbox = BBox::new(100, 0, 0, 100);
        let centre = Vec2::new(50.0, 50.0);
        let regions = [
            ("left", -200.0, 50.0),
            ("right", 300.0, 50.0),
            ("above", 50.0, 300.0),
            ("below", 50.0, -200.0),
            ("above left", -200.0, 300.0),
            ("above right", 300.0, 300.0),
            ("below left", -200.0, -200.0),
            ("below right", 300.0, -200.0),
        ];
        for (name, x, y) in regions {
            let pos = Vec2::new(x, y);
            let towards = point_to_angle(pos, centre);
            assert!(
                box_in_fov(&bbox, &viewer(x, y, towards)),
                "{} facing the box",
                name
            );
            assert!(
                !box_in_fov(&bbox, &viewer(x, y, towards + 180.0)),
                "{} facing away",
                name
            );
        }
    }

    #[test]
    fn wide_box_edge_in_view_is_kept() {
        // the near edge spans well past the cone on both sides
        let bbox = BBox::new(1000, 100, -1000, 1000);
        for angle in [60.0, 90.0, 120.0] {
            assert!(box_in_fov(&bbox, &viewer(0.0, 0.0, angle)));
        }
    }

    #[test]
    fn walk_on_leaf_is_contract_violation() {
        let leaf = BspNode::Leaf { subsector: 3 };
        assert!(matches!(
            visible_subsectors(&leaf, &viewer(0.0, 0.0, 0.0)),
            Err(WadError::ContractViolation(_))
        ));
    }

    #[test]
    fn near_child_first() {
        // vertical split at x = 0 heading north, east is the right side
        let root = build_tree(&[WadNode {
            x:           0,
            y:           0,
            dx:          0,
            dy:          100,
            right_box:   BBox::new(100, 0, 0, 100),
            left_box:    BBox::new(100, 0, -100, 0),
            right_child: 0x8000,
            left_child:  0x8001,
        }])
        .unwrap();

        let east = visible_subsectors(&root, &viewer(50.0, 50.0, 180.0)).unwrap();
        assert_eq!(east.near, vec![0]);
        assert_eq!(east.far, vec![1]);

        let west = visible_subsectors(&root, &viewer(-50.0, 50.0, 0.0)).unwrap();
        assert_eq!(west.near, vec![1]);
        assert_eq!(west.far, vec![0]);
        assert_eq!(west.iter().collect::<Vec<_>>(), vec![1, 0]);

        // looking away from the split, the far half is dropped
        let away = visible_subsectors(&root, &viewer(50.0, 50.0, 0.0)).unwrap();
        assert_eq!(away.near, vec![0]);
        assert!(away.far.is_empty());
        assert_eq!(away.len(), 1);
    }
}
