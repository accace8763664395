mod rect;

pub use rect::{Draft, DrawOutcome, RectTool, ToolTrigger};
