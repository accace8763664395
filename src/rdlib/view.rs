use std::ops::{Add, Div, Mul};

use rectdraw_domain::{BbF, PtF, TPtF};

/// Scales a coordinate from an axis of size_from to an axis of size_to
pub fn scale_coord<T>(x: T, size_from: T, size_to: T) -> T
where
    T: Mul<Output = T> + Div<Output = T> + Add<Output = T>,
{
    x * size_to / size_from
}

/// Maps between the canvas, whose y-axis points up like a plot axis, and the
/// rectangle on screen the canvas is painted into, whose y-axis points down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasView {
    pub extent: BbF,
    pub screen: BbF,
}

impl CanvasView {
    pub fn new(extent: BbF, screen: BbF) -> Self {
        Self { extent, screen }
    }

    pub fn canvas_pos_2_screen_pos(&self, p: PtF) -> PtF {
        let x = self.screen.x + scale_coord(p.x - self.extent.x, self.extent.w, self.screen.w);
        let y = self.screen.y_max()
            - scale_coord(p.y - self.extent.y, self.extent.h, self.screen.h);
        PtF { x, y }
    }

    pub fn screen_pos_2_canvas_pos(&self, p: PtF) -> PtF {
        let x = self.extent.x + scale_coord(p.x - self.screen.x, self.screen.w, self.extent.w);
        let y = self.extent.y
            + scale_coord(self.screen.y_max() - p.y, self.screen.h, self.extent.h);
        PtF { x, y }
    }

    /// Screen box of a canvas box. The y-flip turns the top of the canvas box
    /// into the top of the screen box.
    pub fn canvas_bb_2_screen_bb(&self, bb: &BbF) -> BbF {
        BbF::from_points(
            self.canvas_pos_2_screen_pos(bb.min()),
            self.canvas_pos_2_screen_pos(bb.max()),
        )
    }

    /// Canvas positions of grid lines along one axis, `axis == 0` is x.
    pub fn grid_ticks(&self, axis: usize, step: TPtF) -> Vec<TPtF> {
        let (lo, hi) = if axis == 0 {
            (self.extent.x, self.extent.x_max())
        } else {
            (self.extent.y, self.extent.y_max())
        };
        if step <= 0.0 || !step.is_finite() {
            return vec![];
        }
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|i| i as TPtF * step).collect()
    }
}

#[cfg(test)]
fn make_view() -> CanvasView {
    CanvasView::new(
        BbF::from_arr(&[0.0, 0.0, 10.0, 10.0]),
        BbF::from_arr(&[50.0, 20.0, 400.0, 200.0]),
    )
}

#[test]
fn test_canvas_screen_roundtrip() {
    let view = make_view();
    let origin = view.canvas_pos_2_screen_pos(PtF { x: 0.0, y: 0.0 });
    assert!(origin.is_close_to((50.0, 220.0).into()));
    let top_right = view.canvas_pos_2_screen_pos(PtF { x: 10.0, y: 10.0 });
    assert!(top_right.is_close_to((450.0, 20.0).into()));
    let p = PtF { x: 2.5, y: 7.25 };
    let back = view.screen_pos_2_canvas_pos(view.canvas_pos_2_screen_pos(p));
    assert!(back.is_close_to(p));
}

#[test]
fn test_bb_to_screen() {
    let view = make_view();
    let bb = BbF::from_arr(&[1.0, 1.0, 3.0, 2.0]);
    let screen_bb = view.canvas_bb_2_screen_bb(&bb);
    assert!(screen_bb.min().is_close_to((90.0, 160.0).into()));
    assert!(screen_bb.max().is_close_to((210.0, 200.0).into()));
    let inside_screen = PtF { x: 100.0, y: 170.0 };
    assert!(screen_bb.contains(inside_screen));
    assert!(bb.contains(view.screen_pos_2_canvas_pos(inside_screen)));
}

#[test]
fn test_grid_ticks() {
    let view = make_view();
    let ticks = view.grid_ticks(0, 1.0);
    assert_eq!(ticks.len(), 11);
    assert_eq!(ticks[0], 0.0);
    assert_eq!(ticks[10], 10.0);
    assert_eq!(view.grid_ticks(1, 2.5), vec![0.0, 2.5, 5.0, 7.5, 10.0]);
    assert!(view.grid_ticks(1, 0.0).is_empty());
}
