mod annotations;
pub mod cfg;
mod drawme;
mod egui_mappers;
mod events;
pub mod export;
pub mod file_util;
pub mod result;
pub mod scene_fixture;
pub mod tools;
pub mod tracing_setup;
pub mod view;
pub use annotations::{RectAnnotation, Registry};
pub use drawme::{
    CenterMarker, LineStyle, RectOutline, Stroke, Update, UpdatePermAnnos, UpdateSummary,
    UpdateView, Visual,
};
pub use egui_mappers::{map_key_events, map_mouse_events};
pub use events::{Event, Events, KeyCode};
pub use export::{write_registry, ExportError};
pub use tools::{DrawOutcome, RectTool, ToolTrigger};
