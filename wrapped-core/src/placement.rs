//! Where each slide sits on screen, as a pure function of its index and the
//! current index.
//!
//! Offsets are fractions of the viewport (x to the right, y downwards).
//! Higher `stack_order` paints on top.

use crate::navigation::NavigationState;
use crate::slides::{SlideId, SlideRegistry};

/// How many unseen slides are drawn behind the active one.
pub const LOOKAHEAD: usize = 4;

const TOP_STACK: i32 = 100;
const PAST_OFFSET_X: f64 = -1.2;
const PAST_ROTATION_DEG: f64 = -8.0;
const STACK_STEP_X: f64 = 0.03;
const STACK_STEP_Y: f64 = 0.025;
const STACK_STEP_SCALE: f64 = 0.05;
const STACK_STEP_OPACITY: f64 = 0.2;
const STACK_STEP_ROTATION_DEG: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub offset_x: f64,
    pub offset_y: f64,
    pub rotation_deg: f64,
    pub scale: f64,
    pub opacity: f64,
    pub stack_order: i32,
    pub interactive: bool,
    /// False means the slide is not drawn at all.
    pub rendered: bool,
}

pub fn placement_for(index: usize, current_index: usize) -> Placement {
    if index < current_index {
        let behind = (current_index - index) as i32;
        return Placement {
            offset_x: PAST_OFFSET_X,
            offset_y: 0.0,
            rotation_deg: PAST_ROTATION_DEG,
            scale: 1.0,
            opacity: 0.0,
            stack_order: -behind,
            interactive: false,
            rendered: false,
        };
    }

    let diff = index - current_index;
    if diff == 0 {
        return Placement {
            offset_x: 0.0,
            offset_y: 0.0,
            rotation_deg: 0.0,
            scale: 1.0,
            opacity: 1.0,
            stack_order: TOP_STACK,
            interactive: true,
            rendered: true,
        };
    }

    let step = diff as f64;
    let stack_order = TOP_STACK - diff.min(TOP_STACK as usize) as i32;
    if diff > LOOKAHEAD {
        return Placement {
            offset_x: STACK_STEP_X * LOOKAHEAD as f64,
            offset_y: STACK_STEP_Y * LOOKAHEAD as f64,
            rotation_deg: 0.0,
            scale: 1.0 - STACK_STEP_SCALE * LOOKAHEAD as f64,
            opacity: 0.0,
            stack_order,
            interactive: false,
            rendered: false,
        };
    }

    Placement {
        offset_x: STACK_STEP_X * step,
        offset_y: STACK_STEP_Y * step,
        rotation_deg: STACK_STEP_ROTATION_DEG * step,
        scale: 1.0 - STACK_STEP_SCALE * step,
        opacity: 1.0 - STACK_STEP_OPACITY * step,
        stack_order,
        interactive: false,
        rendered: true,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlidePlacement {
    pub index: usize,
    pub id: SlideId,
    pub placement: Placement,
}

/// Placements for every registered slide, in registry order.
pub fn placements(state: &NavigationState, registry: &SlideRegistry) -> Vec<SlidePlacement> {
    registry
        .iter()
        .enumerate()
        .map(|(index, def)| SlidePlacement {
            index,
            id: def.id,
            placement: placement_for(index, state.current_index),
        })
        .collect()
}

/// Only the drawn slides, back to front.
pub fn render_order(state: &NavigationState, registry: &SlideRegistry) -> Vec<SlidePlacement> {
    let mut out: Vec<SlidePlacement> = placements(state, registry)
        .into_iter()
        .filter(|p| p.placement.rendered)
        .collect();
    out.sort_by_key(|p| p.placement.stack_order);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::Direction;

    fn state_at(current_index: usize) -> NavigationState {
        NavigationState {
            current_index,
            direction: Direction::Forward,
            locked: false,
        }
    }

    #[test]
    fn test_active_slide() {
        let p = placement_for(3, 3);
        assert_eq!(p.opacity, 1.0);
        assert_eq!(p.scale, 1.0);
        assert_eq!(p.offset_x, 0.0);
        assert!(p.interactive);
        assert!(p.rendered);
    }

    #[test]
    fn test_viewed_slides_are_hidden_beneath() {
        let active = placement_for(5, 5);
        for index in 0..5 {
            let p = placement_for(index, 5);
            assert_eq!(p.opacity, 0.0);
            assert!(p.offset_x < -1.0);
            assert!(!p.interactive);
            assert!(!p.rendered);
            assert!(p.stack_order < active.stack_order);
        }
    }

    #[test]
    fn test_lookahead_recedes() {
        let mut prev = placement_for(0, 0);
        for diff in 1..=LOOKAHEAD {
            let p = placement_for(diff, 0);
            assert!(p.rendered);
            assert!(!p.interactive);
            assert!(p.opacity < prev.opacity && p.opacity > 0.0);
            assert!(p.scale < prev.scale);
            assert!(p.offset_x > prev.offset_x);
            assert!(p.stack_order < prev.stack_order);
            prev = p;
        }
    }

    #[test]
    fn test_beyond_lookahead_not_rendered() {
        let p = placement_for(LOOKAHEAD + 1, 0);
        assert_eq!(p.opacity, 0.0);
        assert!(!p.rendered);
    }

    #[test]
    fn test_render_order_is_bounded_and_back_to_front() {
        let order = render_order(&state_at(0), &SlideRegistry);
        assert_eq!(order.len(), LOOKAHEAD + 1);
        assert_eq!(order.last().unwrap().index, 0);
        assert_eq!(order.first().unwrap().index, LOOKAHEAD);

        let near_end = render_order(&state_at(7), &SlideRegistry);
        let indices: Vec<usize> = near_end.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![8, 7]);
    }

    #[test]
    fn test_placements_cover_registry() {
        let all = placements(&state_at(2), &SlideRegistry);
        assert_eq!(all.len(), SlideRegistry.slide_count());
        assert_eq!(all.iter().filter(|p| p.placement.interactive).count(), 1);
    }
}
