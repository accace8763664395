use rectdraw_domain::{BbF, PtF, Rgb01, TPtF};
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};

/// A committed rectangle. Geometry is kept in the form it is exported in.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RectAnnotation {
    pub center: [TPtF; 2],
    pub width: TPtF,
    pub height: TPtF,
    pub color: Rgb01,
}

impl RectAnnotation {
    pub fn from_bb(bb: &BbF, color: Rgb01) -> Self {
        Self {
            center: bb.center().into(),
            width: bb.w,
            height: bb.h,
            color,
        }
    }
    pub fn bb(&self) -> BbF {
        BbF::from_arr(&[
            self.center[0] - self.width * 0.5,
            self.center[1] - self.height * 0.5,
            self.width,
            self.height,
        ])
    }
    pub fn center_pt(&self) -> PtF {
        PtF {
            x: self.center[0],
            y: self.center[1],
        }
    }
}

/// Named annotations in insertion order. Serializes as a mapping from name to
/// annotation that keeps this order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Registry {
    entries: Vec<(String, RectAnnotation)>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn get(&self, name: &str) -> Option<&RectAnnotation> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, anno)| anno)
    }
    /// Appends the annotation. An existing entry with the same name is replaced in place.
    pub fn insert(&mut self, name: String, anno: RectAnnotation) {
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = anno;
        } else {
            self.entries.push((name, anno));
        }
    }
    pub fn remove(&mut self, name: &str) -> Option<RectAnnotation> {
        let idx = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(idx).1)
    }
    pub fn clear(&mut self) {
        self.entries.clear();
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RectAnnotation)> {
        self.entries.iter().map(|(n, anno)| (n.as_str(), anno))
    }
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
    /// Name of the first annotation in insertion order whose box contains `pos`.
    pub fn first_containing(&self, pos: PtF) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, anno)| anno.bb().contains(pos))
            .map(|(n, _)| n.as_str())
    }
}

impl Serialize for Registry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, anno) in &self.entries {
            map.serialize_entry(name, anno)?;
        }
        map.end()
    }
}

#[cfg(test)]
pub(crate) fn make_test_anno(x: TPtF, y: TPtF, w: TPtF, h: TPtF) -> RectAnnotation {
    RectAnnotation::from_bb(&BbF::from_arr(&[x, y, w, h]), [0.1, 0.2, 0.3])
}

#[test]
fn test_from_bb() {
    let bb = BbF::from_points((1.0, 1.0).into(), (4.0, 3.0).into());
    let anno = RectAnnotation::from_bb(&bb, [0.5, 0.5, 0.5]);
    assert_eq!(anno.center, [2.5, 2.0]);
    assert_eq!(anno.width, 3.0);
    assert_eq!(anno.height, 2.0);
    assert_eq!(anno.bb(), bb);
}

#[test]
fn test_registry_order_and_removal() {
    let mut reg = Registry::new();
    reg.insert("rect_2".to_string(), make_test_anno(0.0, 0.0, 1.0, 1.0));
    reg.insert("rect_1".to_string(), make_test_anno(5.0, 5.0, 1.0, 1.0));
    reg.insert("rect_3".to_string(), make_test_anno(0.5, 0.5, 2.0, 2.0));
    assert_eq!(reg.names().collect::<Vec<_>>(), ["rect_2", "rect_1", "rect_3"]);
    // overlap of rect_2 and rect_3, the earlier one wins
    assert_eq!(reg.first_containing((0.75, 0.75).into()), Some("rect_2"));
    assert_eq!(reg.first_containing((2.0, 2.0).into()), Some("rect_3"));
    assert_eq!(reg.first_containing((9.0, 0.5).into()), None);
    assert!(reg.remove("rect_2").is_some());
    assert!(reg.remove("rect_2").is_none());
    assert_eq!(reg.first_containing((0.75, 0.75).into()), Some("rect_3"));
    assert_eq!(reg.len(), 2);
    reg.insert("rect_1".to_string(), make_test_anno(7.0, 7.0, 1.0, 1.0));
    assert_eq!(reg.len(), 2);
    assert_eq!(reg.get("rect_1").map(|a| a.center), Some([7.5, 7.5]));
    reg.clear();
    assert!(reg.is_empty());
}
