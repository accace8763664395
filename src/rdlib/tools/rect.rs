use std::{
    fmt::Write,
    path::{Path, PathBuf},
};

use rand::{rngs::StdRng, Rng, SeedableRng};
use rectdraw_domain::{BbF, PtF, Rgb01, TPtF};
use tracing::{debug, info};

use crate::{
    annotations::{RectAnnotation, Registry},
    cfg::CanvasCfg,
    drawme::{CenterMarker, RectOutline, Stroke, Update, UpdateView, Visual},
    events::{Events, KeyCode},
    export::{write_registry, ExportError},
};

const NAME_PREFIX: &str = "rect_";
const CENTER_MARKER_RADIUS: TPtF = 4.0;
const CENTER_MARKER_COLOR: [u8; 3] = [255, 0, 0];
/// Absorbs rounding of differences like `1.2 - 1.0`
const MIN_SIZE_TOLERANCE: TPtF = 1e-9;
const SUMMARY_EMPTY: &str = "No rectangles\nLeft-click and drag to draw rectangles";

/// A rectangle that is being dragged and not yet part of the registry.
#[derive(Clone, Debug, PartialEq)]
pub struct Draft {
    pub name: String,
    pub anchor: PtF,
    pub color: Rgb01,
    /// `None` until the pointer has moved inside the canvas
    pub extent: Option<BbF>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    Committed(String),
    /// At least one side was below the minimal size
    Discarded,
    /// Released outside the canvas or cancelled
    Abandoned,
    NoDraft,
}

/// Requests of the tool that only the shell can fulfill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ToolTrigger {
    #[default]
    None,
    Save,
}

#[derive(Clone, Debug)]
pub struct RectTool<R = StdRng> {
    registry: Registry,
    draft: Option<Draft>,
    next_id: u64,
    canvas: CanvasCfg,
    rng: R,
    are_perm_annos_outdated: bool,
}

impl RectTool<StdRng> {
    /// Colors are reproducible if a seed is passed.
    pub fn from_cfg(canvas: CanvasCfg, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(canvas, rng)
    }
}

impl<R> RectTool<R>
where
    R: Rng,
{
    pub fn new(canvas: CanvasCfg, rng: R) -> Self {
        Self {
            registry: Registry::new(),
            draft: None,
            next_id: 1,
            canvas,
            rng,
            are_perm_annos_outdated: true,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }
    pub fn canvas(&self) -> &CanvasCfg {
        &self.canvas
    }
    pub fn extent(&self) -> BbF {
        self.canvas.extent()
    }
    fn is_on_canvas(&self, p: PtF) -> bool {
        self.extent().contains(p)
    }
    fn sample_color(&mut self) -> Rgb01 {
        [self.rng.gen(), self.rng.gen(), self.rng.gen()]
    }

    /// Starts a draft at `p` unless `p` is off the canvas. A previous draft is dropped.
    pub fn begin_draw(&mut self, p: PtF) -> bool {
        if !self.is_on_canvas(p) {
            return false;
        }
        let name = format!("{NAME_PREFIX}{}", self.next_id);
        self.next_id += 1;
        let color = self.sample_color();
        if let Some(prev) = self.draft.take() {
            debug!("dropping unfinished draft {}", prev.name);
        }
        debug!("start drawing {name} at {p:?}");
        self.draft = Some(Draft {
            name,
            anchor: p,
            color,
            extent: None,
        });
        true
    }

    /// Moves the free corner of the draft. Off the canvas the draft keeps its last extent.
    pub fn update_draw(&mut self, p: PtF) {
        if !self.is_on_canvas(p) {
            return;
        }
        if let Some(draft) = self.draft.as_mut() {
            draft.extent = Some(BbF::from_points(draft.anchor, p));
        }
    }

    pub fn end_draw(&mut self, p: PtF) -> DrawOutcome {
        if self.draft.is_none() {
            return DrawOutcome::NoDraft;
        }
        if !self.is_on_canvas(p) {
            self.abandon_draft();
            return DrawOutcome::Abandoned;
        }
        let Some(draft) = self.draft.take() else {
            return DrawOutcome::NoDraft;
        };
        let bb = BbF::from_points(draft.anchor, p);
        if !bb
            .shape()
            .is_at_least(self.canvas.min_size - MIN_SIZE_TOLERANCE)
        {
            debug!("discarding {} with too small shape {:?}", draft.name, bb.shape());
            return DrawOutcome::Discarded;
        }
        let anno = RectAnnotation::from_bb(&bb, draft.color);
        info!(
            "added {} with center {:?}, width {}, height {}",
            draft.name, anno.center, anno.width, anno.height
        );
        self.registry.insert(draft.name.clone(), anno);
        self.are_perm_annos_outdated = true;
        DrawOutcome::Committed(draft.name)
    }

    /// Removes the draft and its outline.
    pub fn abandon_draft(&mut self) {
        if let Some(draft) = self.draft.take() {
            debug!("abandoned draft {}", draft.name);
        }
    }

    /// Removes the first annotation in insertion order that contains `p`.
    pub fn delete_at(&mut self, p: PtF) -> Option<String> {
        let name = self.registry.first_containing(p)?.to_string();
        self.registry.remove(&name);
        self.are_perm_annos_outdated = true;
        info!("deleted {name}");
        Some(name)
    }

    pub fn clear_all(&mut self) {
        info!("clearing {} rectangles", self.registry.len());
        self.registry.clear();
        self.are_perm_annos_outdated = true;
    }

    /// Writes all annotations to `path`, see [`write_registry`].
    pub fn export(&self, path: &Path) -> Result<PathBuf, ExportError> {
        write_registry(&self.registry, path)
    }

    pub fn events_tf(&mut self, events: &Events) -> ToolTrigger {
        let mouse_pos = events.mouse_pos_on_canvas;
        if events.pressed(KeyCode::Escape) {
            self.abandon_draft();
        }
        if events.pressed(KeyCode::MouseLeft) {
            if let Some(mp) = mouse_pos {
                self.begin_draw(mp);
            }
        } else if events.held(KeyCode::MouseLeft) {
            if let Some(mp) = mouse_pos {
                self.update_draw(mp);
            }
        }
        if events.released(KeyCode::MouseLeft) {
            match mouse_pos {
                Some(mp) => {
                    self.end_draw(mp);
                }
                None => self.abandon_draft(),
            }
        }
        if events.pressed(KeyCode::MouseRight) {
            if let Some(mp) = mouse_pos {
                self.delete_at(mp);
            }
        }
        if events.held_ctrl() && events.pressed(KeyCode::S) {
            ToolTrigger::Save
        } else {
            ToolTrigger::None
        }
    }

    /// Outline and center marker of each annotation in insertion order.
    pub fn perm_visuals(&self) -> Vec<Visual> {
        self.registry
            .iter()
            .flat_map(|(name, anno)| {
                [
                    Visual::Outline(RectOutline {
                        name: name.to_string(),
                        bb: anno.bb(),
                        outline: Stroke::from_color(anno.color),
                    }),
                    Visual::Center(CenterMarker {
                        name: name.to_string(),
                        center: anno.center_pt(),
                        radius: CENTER_MARKER_RADIUS,
                        color: CENTER_MARKER_COLOR,
                    }),
                ]
            })
            .collect()
    }

    pub fn draft_visual(&self) -> Option<Visual> {
        self.draft.as_ref().and_then(|d| {
            d.extent.map(|bb| {
                Visual::Outline(RectOutline {
                    name: d.name.clone(),
                    bb,
                    outline: Stroke::from_color(d.color).dashed(),
                })
            })
        })
    }

    /// Everything that is drawn on the canvas right now.
    pub fn visuals(&self) -> Vec<Visual> {
        let mut visuals = self.perm_visuals();
        visuals.extend(self.draft_visual());
        visuals
    }

    /// Permanent visuals and summary are only sent when the registry changed since the last call.
    pub fn update_view(&mut self) -> UpdateView {
        let (perm_annos, summary) = if self.are_perm_annos_outdated {
            self.are_perm_annos_outdated = false;
            (
                Update::Yes(self.perm_visuals()),
                Update::Yes(self.summary()),
            )
        } else {
            (Update::No, Update::No)
        };
        UpdateView {
            perm_annos,
            tmp_anno: self.draft_visual(),
            summary,
        }
    }

    pub fn summary(&self) -> String {
        if self.registry.is_empty() {
            return SUMMARY_EMPTY.to_string();
        }
        let mut s = "Current rectangles:\n\n".to_string();
        for (name, anno) in self.registry.iter() {
            // writing to a String does not fail
            let _ = write!(
                s,
                "Name: {name}\nCenter: [{:.2}, {:.2}]\nWidth: {:.2}, Height: {:.2}\nColor: {:?}\n\n",
                anno.center[0], anno.center[1], anno.width, anno.height, anno.color
            );
        }
        s
    }
}

#[cfg(test)]
use {crate::events::Event, rectdraw_domain::floats_close};

#[cfg(test)]
fn make_tool() -> RectTool {
    RectTool::from_cfg(CanvasCfg::default(), Some(7))
}
#[cfg(test)]
fn draw(tool: &mut RectTool, from: (TPtF, TPtF), to: (TPtF, TPtF)) -> DrawOutcome {
    tool.begin_draw(from.into());
    tool.update_draw(to.into());
    tool.end_draw(to.into())
}

#[test]
fn test_commit() {
    let mut tool = make_tool();
    let outcome = draw(&mut tool, (1.0, 1.0), (4.0, 3.0));
    assert_eq!(outcome, DrawOutcome::Committed("rect_1".to_string()));
    let anno = tool.registry().get("rect_1").unwrap();
    assert_eq!(anno.center, [2.5, 2.0]);
    assert_eq!(anno.width, 3.0);
    assert_eq!(anno.height, 2.0);
    assert!(anno.color.iter().all(|c| (0.0..1.0).contains(c)));
    assert!(tool.draft().is_none());
    // dragging towards the origin gives the same box
    draw(&mut tool, (4.0, 3.0), (1.0, 1.0));
    assert_eq!(tool.registry().get("rect_2").unwrap().center, [2.5, 2.0]);
}

#[test]
fn test_discard_degenerate() {
    let mut tool = make_tool();
    let outcome = draw(&mut tool, (5.0, 5.0), (5.1, 5.1));
    assert_eq!(outcome, DrawOutcome::Discarded);
    assert_eq!(draw(&mut tool, (1.0, 1.0), (5.0, 1.1)), DrawOutcome::Discarded);
    assert!(tool.registry().is_empty());
    assert!(tool.visuals().is_empty());
    // discarded drafts consume their names
    assert_eq!(
        draw(&mut tool, (1.0, 1.0), (2.0, 2.0)),
        DrawOutcome::Committed("rect_3".to_string())
    );
}

#[test]
fn test_min_size_is_inclusive() {
    let mut tool = make_tool();
    let outcome = draw(&mut tool, (0.0, 0.0), (0.25, 0.25));
    assert!(matches!(outcome, DrawOutcome::Committed(_)));
    let outcome = draw(&mut tool, (0.0, 0.0), (0.25, 0.15));
    assert_eq!(outcome, DrawOutcome::Discarded);
    let outcome = draw(&mut tool, (0.0, 0.0), (0.2, 0.2));
    assert_eq!(outcome, DrawOutcome::Committed("rect_3".to_string()));
    // 1.2 - 1.0 is 0.19999999999999996 in f64
    let outcome = draw(&mut tool, (1.0, 1.0), (1.2, 1.2));
    assert_eq!(outcome, DrawOutcome::Committed("rect_4".to_string()));
    let anno = tool.registry().get("rect_4").unwrap();
    assert!(floats_close(anno.width, 0.2));
    let outcome = draw(&mut tool, (1.0, 1.0), (1.19, 1.5));
    assert_eq!(outcome, DrawOutcome::Discarded);
}

#[test]
fn test_off_canvas() {
    let mut tool = make_tool();
    assert!(!tool.begin_draw((11.0, 5.0).into()));
    assert!(tool.draft().is_none());
    assert_eq!(tool.end_draw((5.0, 5.0).into()), DrawOutcome::NoDraft);

    assert!(tool.begin_draw((1.0, 1.0).into()));
    tool.update_draw((3.0, 3.0).into());
    tool.update_draw((-1.0, 3.0).into());
    let extent = tool.draft().and_then(|d| d.extent);
    assert_eq!(extent, Some(BbF::from_arr(&[1.0, 1.0, 2.0, 2.0])));
    assert!(tool.draft_visual().is_some());
    assert_eq!(tool.end_draw((12.0, 3.0).into()), DrawOutcome::Abandoned);
    assert!(tool.draft().is_none());
    assert!(tool.visuals().is_empty());
    assert!(tool.registry().is_empty());
}

#[test]
fn test_stalled_draft_can_still_be_committed() {
    let mut tool = make_tool();
    tool.begin_draw((1.0, 1.0).into());
    tool.update_draw((20.0, 20.0).into());
    let outcome = tool.end_draw((3.0, 2.0).into());
    assert_eq!(outcome, DrawOutcome::Committed("rect_1".to_string()));
}

#[test]
fn test_delete_and_clear() {
    let mut tool = make_tool();
    draw(&mut tool, (1.0, 1.0), (4.0, 3.0));
    draw(&mut tool, (2.0, 2.0), (6.0, 6.0));
    draw(&mut tool, (7.0, 7.0), (9.0, 9.0));
    assert_eq!(tool.visuals().len(), 6);
    assert_eq!(tool.delete_at((0.5, 0.5).into()), None);
    // overlapping area, first one in insertion order goes
    assert_eq!(tool.delete_at((3.0, 2.5).into()), Some("rect_1".to_string()));
    assert_eq!(tool.registry().len(), 2);
    assert!(tool.visuals().iter().all(|v| v.name() != "rect_1"));
    assert_eq!(tool.delete_at((3.0, 2.5).into()), Some("rect_2".to_string()));
    tool.clear_all();
    assert!(tool.registry().is_empty());
    assert!(tool.visuals().is_empty());
    draw(&mut tool, (1.0, 1.0), (4.0, 3.0));
    assert_eq!(tool.registry().names().collect::<Vec<_>>(), ["rect_4"]);
}

#[test]
fn test_visuals_follow_registry() {
    let mut tool = make_tool();
    draw(&mut tool, (1.0, 1.0), (4.0, 3.0));
    tool.begin_draw((5.0, 5.0).into());
    assert_eq!(tool.visuals().len(), 2);
    tool.update_draw((6.0, 6.0).into());
    let visuals = tool.visuals();
    assert_eq!(visuals.len(), 3);
    match &visuals[2] {
        Visual::Outline(o) => {
            assert_eq!(o.name, "rect_2");
            assert_eq!(o.outline.style, crate::drawme::LineStyle::Dashed);
        }
        v => panic!("expected draft outline, got {v:?}"),
    }
    match &visuals[1] {
        Visual::Center(c) => assert!(c.center.is_close_to((2.5, 2.0).into())),
        v => panic!("expected center marker, got {v:?}"),
    }
}

#[test]
fn test_update_view_only_sends_changes() {
    let mut tool = make_tool();
    let uv = tool.update_view();
    assert!(matches!(uv.perm_annos, Update::Yes(ref v) if v.is_empty()));
    assert!(matches!(uv.summary, Update::Yes(ref s) if s == SUMMARY_EMPTY));
    let uv = tool.update_view();
    assert!(matches!(uv.perm_annos, Update::No));
    tool.begin_draw((1.0, 1.0).into());
    tool.update_draw((2.0, 2.0).into());
    let uv = tool.update_view();
    assert!(matches!(uv.perm_annos, Update::No));
    assert!(uv.tmp_anno.is_some());
    tool.end_draw((2.0, 2.0).into());
    let uv = tool.update_view();
    assert!(matches!(uv.perm_annos, Update::Yes(ref v) if v.len() == 2));
    assert!(uv.tmp_anno.is_none());
}

#[test]
fn test_summary() {
    let mut tool = RectTool::new(CanvasCfg::default(), StdRng::seed_from_u64(1));
    assert_eq!(tool.summary(), SUMMARY_EMPTY);
    draw(&mut tool, (1.0, 1.0), (4.0, 3.0));
    let color = tool.registry().get("rect_1").unwrap().color;
    let expected = format!(
        "Current rectangles:\n\nName: rect_1\nCenter: [2.50, 2.00]\nWidth: 3.00, Height: 2.00\nColor: {color:?}\n\n"
    );
    assert_eq!(tool.summary(), expected);
}

#[test]
fn test_seeded_colors() {
    let mut tool_1 = make_tool();
    let mut tool_2 = make_tool();
    draw(&mut tool_1, (1.0, 1.0), (4.0, 3.0));
    draw(&mut tool_2, (1.0, 1.0), (4.0, 3.0));
    assert_eq!(tool_1.registry(), tool_2.registry());
}

#[test]
fn test_events_tf() {
    let mut tool = make_tool();
    let press = Events::default()
        .events(vec![
            Event::Pressed(KeyCode::MouseLeft),
            Event::Held(KeyCode::MouseLeft),
        ])
        .mousepos_canvas(Some((1.0, 1.0).into()));
    assert_eq!(tool.events_tf(&press), ToolTrigger::None);
    let drag = Events::default()
        .events(vec![Event::Held(KeyCode::MouseLeft)])
        .mousepos_canvas(Some((3.0, 4.0).into()));
    tool.events_tf(&drag);
    assert_eq!(
        tool.draft().and_then(|d| d.extent),
        Some(BbF::from_arr(&[1.0, 1.0, 2.0, 3.0]))
    );
    let release = Events::default()
        .events(vec![Event::Released(KeyCode::MouseLeft)])
        .mousepos_canvas(Some((3.0, 4.0).into()));
    tool.events_tf(&release);
    assert_eq!(tool.registry().len(), 1);

    // release without known position abandons
    tool.events_tf(&press);
    tool.events_tf(&drag);
    tool.events_tf(&Events::default().events(vec![Event::Released(KeyCode::MouseLeft)]));
    assert!(tool.draft().is_none());
    assert_eq!(tool.registry().len(), 1);

    // escape abandons
    tool.events_tf(&press);
    tool.events_tf(&Events::default().events(vec![Event::Pressed(KeyCode::Escape)]));
    assert!(tool.draft().is_none());

    let right_click = Events::default()
        .events(vec![Event::Pressed(KeyCode::MouseRight)])
        .mousepos_canvas(Some((2.0, 2.0).into()));
    tool.events_tf(&right_click);
    assert!(tool.registry().is_empty());

    let ctrl_s = Events::default().events(vec![
        Event::Held(KeyCode::Ctrl),
        Event::Pressed(KeyCode::S),
    ]);
    assert_eq!(tool.events_tf(&ctrl_s), ToolTrigger::Save);
}

#[test]
fn test_export() -> rectdraw_domain::RdResult<()> {
    let folder = crate::file_util::make_test_folder("rect_tool_export")?;
    let mut tool = make_tool();
    assert_eq!(
        tool.export(&folder.join("x.yaml")),
        Err(ExportError::EmptyRegistry)
    );
    draw(&mut tool, (1.0, 1.0), (4.0, 3.0));
    let written = tool.export(&folder.join("scene.yml"))?;
    crate::defer_file_removal!(&written);
    assert_eq!(written, folder.join("scene.yml"));
    assert!(written.exists());
    // export does not touch the state
    assert_eq!(tool.registry().len(), 1);
    Ok(())
}
