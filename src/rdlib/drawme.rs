use rectdraw_domain::{rgb01_to_u8, BbF, PtF, Rgb01, TPtF};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub thickness: TPtF,
    pub color: [u8; 3],
    pub alpha: u8,
    pub style: LineStyle,
}

impl Stroke {
    pub fn from_color(color: Rgb01) -> Self {
        Stroke {
            thickness: 2.0,
            color: rgb01_to_u8(color),
            alpha: 178,
            style: LineStyle::Solid,
        }
    }
    pub fn dashed(mut self) -> Self {
        self.style = LineStyle::Dashed;
        self
    }
}

/// Outline of an annotation or of the draft, in canvas coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct RectOutline {
    pub name: String,
    pub bb: BbF,
    pub outline: Stroke,
}

/// Marks the center of a committed annotation. The radius is in screen pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct CenterMarker {
    pub name: String,
    pub center: PtF,
    pub radius: TPtF,
    pub color: [u8; 3],
}

#[derive(Clone, Debug, PartialEq)]
pub enum Visual {
    Outline(RectOutline),
    Center(CenterMarker),
}

impl Visual {
    pub fn name(&self) -> &str {
        match self {
            Visual::Outline(o) => &o.name,
            Visual::Center(c) => &c.name,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub enum Update<T> {
    Yes(T),
    #[default]
    No,
}

// permanent annotations
pub type UpdatePermAnnos = Update<Vec<Visual>>;
pub type UpdateSummary = Update<String>;

/// What the shell needs to redraw after the tool has processed a frame of events.
/// The draft outline is sent every frame since it follows the pointer.
#[derive(Clone, Debug, Default)]
pub struct UpdateView {
    pub perm_annos: UpdatePermAnnos,
    pub tmp_anno: Option<Visual>,
    pub summary: UpdateSummary,
}

#[test]
fn test_stroke() {
    let s = Stroke::from_color([1.0, 0.0, 0.5]).dashed();
    assert_eq!(s.color, [255, 0, 128]);
    assert_eq!(s.style, LineStyle::Dashed);
    let v = Visual::Center(CenterMarker {
        name: "rect_1".to_string(),
        center: PtF { x: 0.0, y: 0.0 },
        radius: 4.0,
        color: [255, 0, 0],
    });
    assert_eq!(v.name(), "rect_1");
}
