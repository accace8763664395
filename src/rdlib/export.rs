use std::{
    error::Error,
    ffi::OsString,
    fmt::{self, Display, Formatter},
    fs,
    path::{Path, PathBuf},
};

use rectdraw_domain::{to_rd, RdError, RdResult};
use serde::Serialize;
use tracing::info;

use crate::annotations::Registry;

pub const YAML_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportError {
    /// Nothing to export, no file has been written.
    EmptyRegistry,
    /// Serialization or file system failure at `path`.
    Write { path: PathBuf, reason: String },
}
impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ExportError::EmptyRegistry => write!(f, "No rectangles to save!"),
            ExportError::Write { path, reason } => {
                write!(f, "could not write {path:?} due to {reason}")
            }
        }
    }
}
impl Error for ExportError {}
impl From<ExportError> for RdError {
    fn from(e: ExportError) -> Self {
        RdError::new(e.to_string().as_str())
    }
}

/// Appends `.yaml` unless the file name already ends with a YAML extension,
/// e.g., `scene.txt` becomes `scene.txt.yaml`.
pub fn with_yaml_extension(path: &Path) -> PathBuf {
    let has_yaml_ext = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| {
            let name = name.to_lowercase();
            YAML_EXTENSIONS
                .iter()
                .any(|yaml_ext| name.ends_with(&format!(".{yaml_ext}")))
        })
        == Some(true);
    if has_yaml_ext {
        path.to_path_buf()
    } else {
        let mut p = OsString::from(path.as_os_str());
        p.push(".yaml");
        PathBuf::from(p)
    }
}

pub fn to_yaml_string<T: Serialize>(data: &T) -> RdResult<String> {
    serde_yaml::to_string(data).map_err(to_rd)
}

/// Writes the registry as YAML and returns the path that has actually been written.
pub fn write_registry(registry: &Registry, path: &Path) -> Result<PathBuf, ExportError> {
    if registry.is_empty() {
        return Err(ExportError::EmptyRegistry);
    }
    let path = with_yaml_extension(path);
    let yaml_str = serde_yaml::to_string(registry).map_err(|e| ExportError::Write {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    fs::write(&path, yaml_str).map_err(|e| ExportError::Write {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    info!("rectangle data saved to {path:?}");
    Ok(path)
}

#[cfg(test)]
use crate::{annotations::make_test_anno, defer_file_removal, file_util::make_test_folder};

#[test]
fn test_with_yaml_extension() {
    assert_eq!(with_yaml_extension(Path::new("a.yaml")), Path::new("a.yaml"));
    assert_eq!(with_yaml_extension(Path::new("a.YML")), Path::new("a.YML"));
    assert_eq!(with_yaml_extension(Path::new("dir/a")), Path::new("dir/a.yaml"));
    assert_eq!(
        with_yaml_extension(Path::new("a.txt")),
        Path::new("a.txt.yaml")
    );
    // dot files consisting of the extension only
    assert_eq!(with_yaml_extension(Path::new(".yaml")), Path::new(".yaml"));
    assert_eq!(with_yaml_extension(Path::new("dir/.YML")), Path::new("dir/.YML"));
    assert_eq!(with_yaml_extension(Path::new("ayaml")), Path::new("ayaml.yaml"));
}

#[test]
fn test_empty_registry() -> RdResult<()> {
    let folder = make_test_folder("export_empty")?;
    let path = folder.join("empty.yaml");
    let res = write_registry(&Registry::new(), &path);
    assert_eq!(res, Err(ExportError::EmptyRegistry));
    assert!(!path.exists());
    let rd: RdError = ExportError::EmptyRegistry.into();
    assert_eq!(rd.msg(), "No rectangles to save!");
    Ok(())
}

#[test]
fn test_write_registry() -> RdResult<()> {
    let folder = make_test_folder("export_write")?;
    let mut reg = Registry::new();
    reg.insert("rect_2".to_string(), make_test_anno(1.0, 1.0, 3.0, 2.0));
    reg.insert("rect_1".to_string(), make_test_anno(5.0, 5.0, 1.0, 0.5));
    let written = write_registry(&reg, &folder.join("boxes"))?;
    defer_file_removal!(&written);
    assert_eq!(written, folder.join("boxes.yaml"));
    let s = fs::read_to_string(&written).map_err(to_rd)?;
    assert!(s.find("rect_2:") < s.find("rect_1:"));
    let parsed: serde_yaml::Mapping = serde_yaml::from_str(&s).map_err(to_rd)?;
    let keys = parsed
        .keys()
        .filter_map(|k| k.as_str())
        .collect::<Vec<_>>();
    assert_eq!(keys, ["rect_2", "rect_1"]);
    let rect_2 = &parsed["rect_2"];
    assert_eq!(rect_2["width"].as_f64(), Some(3.0));
    assert_eq!(rect_2["height"].as_f64(), Some(2.0));
    let center = rect_2["center"]
        .as_sequence()
        .map(|s| s.iter().filter_map(|v| v.as_f64()).collect::<Vec<_>>());
    assert_eq!(center, Some(vec![2.5, 2.0]));
    assert_eq!(rect_2["color"].as_sequence().map(|s| s.len()), Some(3));
    Ok(())
}

#[test]
fn test_write_error() {
    let mut reg = Registry::new();
    reg.insert("rect_1".to_string(), make_test_anno(1.0, 1.0, 3.0, 2.0));
    let path = Path::new("/this/folder/does/not/exist/out.yaml");
    match write_registry(&reg, path) {
        Err(ExportError::Write { path: p, reason }) => {
            assert_eq!(p, path);
            assert!(!reason.is_empty());
        }
        other => panic!("expected write error, got {other:?}"),
    }
}
