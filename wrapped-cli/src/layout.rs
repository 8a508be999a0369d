//! Cell-grid geometry for the viewer: card rectangles from placements and the
//! clickable regions of the navigation bar.

use ratatui::layout::Rect;
use wrapped_core::{Direction, LOOKAHEAD, NavInput, Placement, placement_for};

/// How far the incoming card starts from its resting place, as a share of the stage width.
const SLIDE_IN_SHARE: f64 = 0.3;

/// Room kept free on the right and bottom so the stacked cards can peek out.
fn stack_reserve(stage: Rect) -> (u16, u16) {
    let deepest = placement_for(LOOKAHEAD, 0);
    let dx = (deepest.offset_x * stage.width as f64).ceil().max(0.0) as u16;
    let dy = (deepest.offset_y * stage.height as f64).ceil().max(0.0) as u16;
    (dx, dy)
}

fn base_card(stage: Rect) -> Rect {
    let (rx, ry) = stack_reserve(stage);
    Rect {
        x: stage.x,
        y: stage.y,
        width: stage.width.saturating_sub(rx),
        height: stage.height.saturating_sub(ry),
    }
}

/// Where a drawn card lands inside `stage`. Rotation and scale have no
/// cell-grid equivalent, so only the offsets move the card.
pub fn card_rect(stage: Rect, placement: &Placement) -> Rect {
    let base = base_card(stage);
    let dx = (placement.offset_x * stage.width as f64).round() as i32;
    let dy = (placement.offset_y * stage.height as f64).round() as i32;
    shift_within(base, dx, dy, stage)
}

/// The active card during a transition: it slides in from the side it came from.
pub fn sliding_card_rect(stage: Rect, direction: Direction, progress: f64) -> Rect {
    let base = base_card(stage);
    let remaining = (1.0 - progress.clamp(0.0, 1.0)) * SLIDE_IN_SHARE * stage.width as f64;
    let dx = match direction {
        Direction::Forward => remaining.round() as i32,
        Direction::Backward => -(remaining.round() as i32),
    };
    shift_within(base, dx, 0, stage)
}

fn shift_within(rect: Rect, dx: i32, dy: i32, bounds: Rect) -> Rect {
    let x = (rect.x as i32 + dx).max(bounds.x as i32);
    let y = (rect.y as i32 + dy).max(bounds.y as i32);
    let right = bounds.x as i32 + bounds.width as i32;
    let bottom = bounds.y as i32 + bounds.height as i32;
    let width = (rect.width as i32).min(right - x).max(0);
    let height = (rect.height as i32).min(bottom - y).max(0);
    Rect {
        x: x as u16,
        y: y as u16,
        width: width as u16,
        height: height as u16,
    }
}

/// 232..=255 is the xterm grey ramp.
pub fn grey_for_opacity(opacity: f64) -> u8 {
    232 + (opacity.clamp(0.0, 1.0) * 23.0).round() as u8
}

pub const PREV_GLYPH: &str = "◀";
pub const NEXT_GLYPH: &str = "▶";

/// Hit regions of the one-line navigation bar, recorded at draw time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavBar {
    pub prev: Rect,
    pub next: Rect,
    pub dots: Vec<Rect>,
}

impl NavBar {
    /// `◀` on the left, `▶` on the right, one dot per slide centred between them.
    /// Nothing is laid out on a zero-sized row, and the dots are left out when
    /// the row is too narrow to hold all of them.
    pub fn layout(area: Rect, slide_count: usize) -> Self {
        if area.is_empty() {
            return Self::default();
        }
        let row = area.y;
        let prev = Rect::new(area.x, row, 3, 1).intersection(area);
        let next_x = (area.x + area.width).saturating_sub(3).max(area.x);
        let next = Rect::new(next_x, row, 3, 1).intersection(area);

        let span = (slide_count * 2).saturating_sub(1);
        let dots = if span <= area.width as usize {
            let start = area.x + (area.width - span as u16) / 2;
            (0..slide_count)
                .map(|i| Rect::new(start + (i as u16) * 2, row, 1, 1))
                .collect()
        } else {
            Vec::new()
        };

        Self { prev, next, dots }
    }

    pub fn hit(&self, column: u16, row: u16) -> Option<NavInput> {
        let inside = |r: &Rect| {
            row >= r.y && row < r.y + r.height && column >= r.x && column < r.x + r.width
        };
        if inside(&self.prev) {
            return Some(NavInput::Previous);
        }
        if inside(&self.next) {
            return Some(NavInput::Next);
        }
        self.dots
            .iter()
            .position(|d| inside(d))
            .map(NavInput::JumpTo)
    }
}
