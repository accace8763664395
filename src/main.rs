#![deny(clippy::all)]
#![allow(clippy::cast_possible_truncation)]
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use egui::{
    epaint::{CircleShape, RectShape},
    Align2, Color32, Context, CornerRadius, FontId, Rect, Response, Sense, Shape, Stroke,
    StrokeKind, Style, Ui, Vec2, ViewportBuilder, Visuals,
};
use rdlib::{
    cfg::{self, Cfg},
    result::trace_ok_err,
    scene_fixture::{write_scene_fixture, DEFAULT_ENV_COUNT, DEFAULT_FIXTURE_FILENAME},
    tracing_setup,
    view::CanvasView,
    Events, ExportError, LineStyle, RectTool, ToolTrigger, Update, Visual,
};
use std::{
    ops::Deref,
    panic,
    path::{Path, PathBuf},
};
use tracing::{error, info, warn};

const APP_NAME: &str = "RectDraw";
const TITLE_DEFAULT: &str = "Click and drag to draw rectangles\nRight-click on rectangle to delete";
const CANVAS_MARGIN: f32 = 30.0;

mod detail {
    use egui::{Color32, Pos2, Rect};
    use rectdraw_domain::{BbF, PtF, TPtF};

    pub(super) fn rgb_2_clr(rgb: [u8; 3], alpha: u8) -> Color32 {
        Color32::from_rgba_unmultiplied(rgb[0], rgb[1], rgb[2], alpha)
    }

    pub(super) fn rect_2_bb(rect: &Rect) -> BbF {
        BbF::from_arr(&[
            TPtF::from(rect.min.x),
            TPtF::from(rect.min.y),
            TPtF::from(rect.width()),
            TPtF::from(rect.height()),
        ])
    }

    pub(super) fn pt_2_pos(p: PtF) -> Pos2 {
        Pos2::new(p.x as f32, p.y as f32)
    }

    pub(super) fn pos_2_pt(p: Pos2) -> PtF {
        PtF {
            x: TPtF::from(p.x),
            y: TPtF::from(p.y),
        }
    }

    pub(super) fn bb_2_rect(bb: &BbF) -> Rect {
        Rect::from_min_max(pt_2_pos(bb.min()), pt_2_pos(bb.max()))
    }
}

struct RectDrawApp {
    tool: RectTool,
    cfg: Cfg,
    cfg_path: Option<PathBuf>,
    perm_visuals: Vec<Visual>,
    egui_perm_shapes: Vec<Shape>,
    egui_tmp_shapes: Vec<Shape>,
    summary: String,
    title: String,
    prev_canvas_rect: Option<Rect>,
}

impl RectDrawApp {
    fn new(cfg: Cfg, cfg_path: Option<PathBuf>, seed: Option<u64>) -> Self {
        let seed = seed.or(cfg.color_seed);
        let tool = RectTool::from_cfg(cfg.canvas(), seed);
        let summary = tool.summary();
        Self {
            tool,
            cfg,
            cfg_path,
            perm_visuals: vec![],
            egui_perm_shapes: vec![],
            egui_tmp_shapes: vec![],
            summary,
            title: TITLE_DEFAULT.to_string(),
            prev_canvas_rect: None,
        }
    }

    fn visual_2_shapes(visual: &Visual, view: &CanvasView) -> Vec<Shape> {
        match visual {
            Visual::Outline(o) => {
                let color = detail::rgb_2_clr(o.outline.color, o.outline.alpha);
                let stroke = Stroke::new(o.outline.thickness as f32, color);
                let screen_rect = detail::bb_2_rect(&view.canvas_bb_2_screen_bb(&o.bb));
                match o.outline.style {
                    LineStyle::Solid => vec![Shape::Rect(RectShape::new(
                        screen_rect,
                        CornerRadius::ZERO,
                        Color32::TRANSPARENT,
                        stroke,
                        StrokeKind::Middle,
                    ))],
                    LineStyle::Dashed => {
                        let corners = [
                            screen_rect.left_top(),
                            screen_rect.right_top(),
                            screen_rect.right_bottom(),
                            screen_rect.left_bottom(),
                            screen_rect.left_top(),
                        ];
                        Shape::dashed_line(&corners, stroke, 6.0, 4.0)
                    }
                }
            }
            Visual::Center(c) => {
                let p = detail::pt_2_pos(view.canvas_pos_2_screen_pos(c.center));
                vec![Shape::Circle(CircleShape::filled(
                    p,
                    c.radius as f32,
                    detail::rgb_2_clr(c.color, 255),
                ))]
            }
        }
    }

    fn update_perm_shapes(&mut self, view: &CanvasView) {
        self.egui_perm_shapes = self
            .perm_visuals
            .iter()
            .flat_map(|v| Self::visual_2_shapes(v, view))
            .collect();
    }

    fn grid_shapes(&self, ui: &Ui, view: &CanvasView) -> Vec<Shape> {
        let visuals = ui.visuals();
        let grid_stroke = Stroke::new(0.5, visuals.weak_text_color());
        let text_color = visuals.text_color();
        let extent = view.extent;
        let step = self.tool.canvas().grid_step;
        let mut shapes = vec![];
        ui.fonts(|fonts| {
            for x in view.grid_ticks(0, step) {
                let bottom = detail::pt_2_pos(view.canvas_pos_2_screen_pos((x, extent.y).into()));
                let top =
                    detail::pt_2_pos(view.canvas_pos_2_screen_pos((x, extent.y_max()).into()));
                shapes.push(Shape::line_segment([bottom, top], grid_stroke));
                shapes.push(Shape::text(
                    fonts,
                    bottom + Vec2::new(0.0, 4.0),
                    Align2::CENTER_TOP,
                    format!("{x}"),
                    FontId::monospace(10.0),
                    text_color,
                ));
            }
            for y in view.grid_ticks(1, step) {
                let left = detail::pt_2_pos(view.canvas_pos_2_screen_pos((extent.x, y).into()));
                let right =
                    detail::pt_2_pos(view.canvas_pos_2_screen_pos((extent.x_max(), y).into()));
                shapes.push(Shape::line_segment([left, right], grid_stroke));
                shapes.push(Shape::text(
                    fonts,
                    left - Vec2::new(4.0, 0.0),
                    Align2::RIGHT_CENTER,
                    format!("{y}"),
                    FontId::monospace(10.0),
                    text_color,
                ));
            }
        });
        shapes.push(Shape::Rect(RectShape::new(
            detail::bb_2_rect(&view.screen),
            CornerRadius::ZERO,
            Color32::TRANSPARENT,
            Stroke::new(1.0, text_color),
            StrokeKind::Middle,
        )));
        shapes
    }

    /// Largest area with the aspect ratio of the canvas extent that fits into the panel.
    fn allocate_canvas(&self, ui: &mut Ui) -> Response {
        let available = ui.available_size() - Vec2::splat(2.0 * CANVAS_MARGIN);
        let extent = self.tool.extent();
        let aspect = (extent.w / extent.h) as f32;
        let (w, h) = if available.x / available.y > aspect {
            (available.y * aspect, available.y)
        } else {
            (available.x, available.x / aspect)
        };
        let size = Vec2::new(w.max(1.0), h.max(1.0));
        ui.add_space(CANVAS_MARGIN * 0.5);
        ui.horizontal(|ui| {
            ui.add_space(CANVAS_MARGIN);
            ui.allocate_exact_size(size, Sense::click_and_drag()).1
        })
        .inner
    }

    fn collect_events(&self, ui: &mut Ui, canvas_response: &Response, view: &CanvasView) -> Events {
        let mouse_pos = canvas_response
            .hover_pos()
            .map(|p| view.screen_pos_2_canvas_pos(detail::pos_2_pt(p)));
        let key_events = rdlib::map_key_events(ui);
        let mouse_events = rdlib::map_mouse_events(ui, canvas_response);
        Events::default()
            .events(key_events)
            .events(mouse_events)
            .mousepos_canvas(mouse_pos)
    }

    fn save(&mut self) {
        if self.tool.registry().is_empty() {
            let e = ExportError::EmptyRegistry;
            warn!("{e}");
            self.title = e.to_string();
            return;
        }
        let dialog = rfd::FileDialog::new()
            .set_title("Save rectangles")
            .set_file_name(self.cfg.export_filename())
            .add_filter("YAML", &["yaml", "yml"]);
        let Some(path) = dialog.save_file() else {
            info!("save cancelled");
            return;
        };
        match self.tool.export(&path) {
            Ok(written) => {
                self.title = format!("Rectangles saved to {}", written.display());
            }
            Err(e) => {
                error!("{e}");
                self.title = format!("Save failed: {e}");
            }
        }
    }

    fn toggle_darkmode(&mut self, ctx: &Context) {
        let darkmode = self.cfg.darkmode != Some(true);
        self.cfg.darkmode = Some(darkmode);
        ctx.set_visuals(if darkmode {
            Visuals::dark()
        } else {
            Visuals::light()
        });
        trace_ok_err(cfg::write_cfg(&self.cfg, self.cfg_path.as_deref()));
    }
}

impl eframe::App for RectDrawApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        let mut save_requested = false;
        egui::TopBottomPanel::bottom("buttons").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Clear All").clicked() {
                    self.tool.clear_all();
                }
                if ui.button("Save to YAML").clicked() {
                    save_requested = true;
                }
                ui.separator();
                let mode = if self.cfg.darkmode == Some(true) {
                    "Light mode"
                } else {
                    "Dark mode"
                };
                if ui.button(mode).clicked() {
                    self.toggle_darkmode(ctx);
                }
            });
        });
        egui::SidePanel::right("summary")
            .min_width(220.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.label(egui::RichText::new(&self.summary).monospace());
                });
            });
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(&self.title);
            });
            let canvas_response = self.allocate_canvas(ui);
            let view = CanvasView::new(
                self.tool.extent(),
                detail::rect_2_bb(&canvas_response.rect),
            );
            let events = self.collect_events(ui, &canvas_response, &view);
            if self.tool.events_tf(&events) == ToolTrigger::Save {
                save_requested = true;
            }
            let update_view = self.tool.update_view();
            let is_resized = self.prev_canvas_rect != Some(canvas_response.rect);
            if let Update::Yes(perm_visuals) = update_view.perm_annos {
                self.perm_visuals = perm_visuals;
                self.update_perm_shapes(&view);
            } else if is_resized {
                self.update_perm_shapes(&view);
            }
            self.prev_canvas_rect = Some(canvas_response.rect);
            if let Update::Yes(summary) = update_view.summary {
                self.summary = summary;
            }
            self.egui_tmp_shapes = update_view
                .tmp_anno
                .map(|v| Self::visual_2_shapes(&v, &view))
                .unwrap_or_default();
            let painter = ui.painter();
            painter.add(Shape::Vec(self.grid_shapes(ui, &view)));
            painter.add(Shape::Vec(self.egui_perm_shapes.clone()));
            painter.add(Shape::Vec(self.egui_tmp_shapes.clone()));
        });
        if save_requested {
            self.save();
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Writes randomly sampled simulation environments to a YAML file
    Envs {
        #[arg(short, long, default_value_t = DEFAULT_ENV_COUNT)]
        count: usize,
        #[arg(short, long, default_value = DEFAULT_FIXTURE_FILENAME)]
        out: PathBuf,
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

#[derive(Parser)]
#[command(version, about = "Draw axis-aligned rectangles and export them to YAML")]
struct Cli {
    /// Seed for reproducible rectangle colors
    #[arg(short, long)]
    seed: Option<u64>,
    /// Alternative config file
    #[arg(long)]
    cfg: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

fn run_gui(cfg_path: Option<&Path>, seed: Option<u64>) {
    let cfg = match cfg::read_cfg(cfg_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("could not read cfg due to {e:?}, using default");
            cfg::get_default_cfg()
        }
    };
    let native_options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_title(APP_NAME)
            .with_inner_size([960.0, 720.0]),
        ..Default::default()
    };
    let cfg_path = cfg_path.map(Path::to_path_buf);
    if let Err(e) = eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| {
            let viz = if cfg.darkmode == Some(true) {
                Visuals::dark()
            } else {
                Visuals::light()
            };
            cc.egui_ctx.set_style(Style {
                visuals: viz,
                ..Style::default()
            });
            Ok(Box::new(RectDrawApp::new(cfg, cfg_path, seed)))
        }),
    ) {
        error!("{e:?}");
    }
}

fn main() {
    let _guard_flush_to_logfile = tracing_setup::tracing_setup(&cfg::get_log_folder());
    if let Err(e) = panic::catch_unwind(|| {
        let cli = Cli::parse();
        match cli.command {
            Some(Command::Envs { count, out, seed }) => {
                if let Some(written) = trace_ok_err(write_scene_fixture(&out, count, seed)) {
                    println!("Configuration with {count} environments saved to {written:?}");
                }
            }
            None => run_gui(cli.cfg.as_deref(), cli.seed),
        }
    }) {
        let panic_s = e
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| e.downcast_ref::<&'static str>().map(Deref::deref));
        error!("{:?}", panic_s);
        if let Some(report) = tracing_setup::PANIC_REPORT.with(|r| r.borrow_mut().take()) {
            error!("panicked at {:?}", report.location);
            error!("{:?}", report.backtrace);
        }
    }
}

#[cfg(test)]
use {
    egui::Pos2,
    rectdraw_domain::{BbF, PtF},
};

#[test]
fn test_cli() {
    let cli = Cli::parse_from(["rectdraw", "--seed", "3"]);
    assert_eq!(cli.seed, Some(3));
    assert!(cli.command.is_none());
    let cli = Cli::parse_from(["rectdraw", "envs", "--count", "2", "--out", "a.yaml"]);
    match cli.command {
        Some(Command::Envs { count, out, seed }) => {
            assert_eq!(count, 2);
            assert_eq!(out, PathBuf::from("a.yaml"));
            assert_eq!(seed, None);
        }
        None => panic!("expected envs subcommand"),
    }
}

#[test]
fn test_rect_bb_conversion() {
    let rect = Rect::from_min_max(Pos2::new(10.0, 20.0), Pos2::new(110.0, 70.0));
    let bb = detail::rect_2_bb(&rect);
    assert_eq!(bb, BbF::from_arr(&[10.0, 20.0, 100.0, 50.0]));
    assert_eq!(detail::bb_2_rect(&bb), rect);
    let p: PtF = (1.5, 2.5).into();
    assert_eq!(detail::pos_2_pt(detail::pt_2_pos(p)), p);
}
