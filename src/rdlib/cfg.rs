use crate::file_util::{self, DEFAULT_HOMEDIR};
use rectdraw_domain::{rderr, to_rd, BbF, RdError, RdResult, TPtF};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

const CFG_DEFAULT: &str = r#"
    default_export_filename = "rectangles.yaml"
    [canvas]
    x_min = 0.0
    x_max = 10.0
    y_min = 0.0
    y_max = 10.0
    min_size = 0.2
    grid_step = 1.0
    "#;

pub fn get_default_cfg() -> Cfg {
    toml::from_str(CFG_DEFAULT).expect("default config broken")
}

fn get_cfg_path(filename: &str) -> RdResult<PathBuf> {
    Ok(dirs::home_dir()
        .ok_or_else(|| RdError::new("where is your home? cannot load config"))?
        .join(".rectdraw")
        .join(filename))
}

pub fn get_cfg_path_usr() -> RdResult<PathBuf> {
    get_cfg_path("rd_cfg.toml")
}

pub fn get_log_folder() -> PathBuf {
    get_cfg_path_usr()
        .ok()
        .and_then(|p| p.parent().map(|p| p.join("logs")))
        .unwrap_or_else(|| DEFAULT_HOMEDIR.join("logs"))
}

pub fn read_cfg_gen<CFG: Debug + DeserializeOwned + Default>(
    cfg_toml_path: &Path,
) -> RdResult<CFG> {
    if cfg_toml_path.exists() {
        let toml_str = file_util::read_to_string(cfg_toml_path)?;
        toml::from_str(&toml_str).map_err(|e| rderr!("could not parse cfg due to {:?}", e))
    } else {
        warn!("cfg {cfg_toml_path:?} file does not exist. using default cfg");
        Ok(CFG::default())
    }
}

/// Reads the config from `cfg_toml_path` or from the default location in the home folder.
pub fn read_cfg(cfg_toml_path: Option<&Path>) -> RdResult<Cfg> {
    let cfg_toml_path = match cfg_toml_path {
        Some(p) => p.to_path_buf(),
        None => get_cfg_path_usr()?,
    };
    read_cfg_gen::<Cfg>(&cfg_toml_path)
}

pub fn write_cfg_str(cfg_str: &str, p: &Path, log: bool) -> RdResult<()> {
    file_util::write(p, cfg_str)?;
    if log {
        info!("wrote cfg to {p:?}");
    }
    Ok(())
}

pub fn write_cfg(cfg: &Cfg, cfg_toml_path: Option<&Path>) -> RdResult<()> {
    let cfg_path = match cfg_toml_path {
        Some(p) => p.to_path_buf(),
        None => get_cfg_path_usr()?,
    };
    if let Some(cfg_parent) = cfg_path.parent() {
        fs::create_dir_all(cfg_parent).map_err(to_rd)?;
    }
    let cfg_str = toml::to_string_pretty(cfg).map_err(to_rd)?;
    write_cfg_str(&cfg_str, &cfg_path, true)
}

/// The part of the plane the user can draw on and the limits of what is drawn.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct CanvasCfg {
    pub x_min: TPtF,
    pub x_max: TPtF,
    pub y_min: TPtF,
    pub y_max: TPtF,
    /// Drafts with width or height below are discarded
    pub min_size: TPtF,
    pub grid_step: TPtF,
}
impl CanvasCfg {
    pub fn extent(&self) -> BbF {
        BbF::from_points(
            (self.x_min, self.y_min).into(),
            (self.x_max, self.y_max).into(),
        )
    }
    fn is_valid(&self) -> bool {
        let finite = [
            self.x_min,
            self.x_max,
            self.y_min,
            self.y_max,
            self.min_size,
            self.grid_step,
        ]
        .iter()
        .all(|v| v.is_finite());
        finite && self.x_min < self.x_max && self.y_min < self.y_max && self.min_size >= 0.0
    }
}
impl Default for CanvasCfg {
    fn default() -> Self {
        Self {
            x_min: 0.0,
            x_max: 10.0,
            y_min: 0.0,
            y_max: 10.0,
            min_size: 0.2,
            grid_step: 1.0,
        }
    }
}

pub const DEFAULT_EXPORT_FILENAME: &str = "rectangles.yaml";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct Cfg {
    pub darkmode: Option<bool>,
    default_export_filename: Option<String>,
    pub color_seed: Option<u64>,
    // tables go last in toml
    #[serde(default)]
    canvas: CanvasCfg,
}

impl Cfg {
    /// Canvas settings, falls back to the defaults if the configured ones are unusable.
    pub fn canvas(&self) -> CanvasCfg {
        if self.canvas.is_valid() {
            self.canvas
        } else {
            warn!("invalid canvas cfg {:?}, using default", self.canvas);
            CanvasCfg::default()
        }
    }
    pub fn set_canvas(&mut self, canvas: CanvasCfg) {
        self.canvas = canvas;
    }
    pub fn export_filename(&self) -> &str {
        match &self.default_export_filename {
            Some(f) if !f.trim().is_empty() => f.as_str(),
            _ => DEFAULT_EXPORT_FILENAME,
        }
    }
}

#[test]
fn test_default_cfg() {
    let cfg = get_default_cfg();
    assert_eq!(cfg.canvas(), CanvasCfg::default());
    assert_eq!(cfg.export_filename(), DEFAULT_EXPORT_FILENAME);
    assert_eq!(cfg.darkmode, None);
    assert_eq!(cfg.color_seed, None);
    let extent = cfg.canvas().extent();
    assert_eq!(extent, BbF::from_arr(&[0.0, 0.0, 10.0, 10.0]));
}

#[test]
fn test_invalid_canvas_falls_back() {
    let cfg: Cfg = toml::from_str(
        r#"
        [canvas]
        x_min = 5.0
        x_max = 1.0
        y_min = 0.0
        y_max = 10.0
        min_size = 0.2
        grid_step = 1.0
        "#,
    )
    .unwrap();
    assert_eq!(cfg.canvas(), CanvasCfg::default());
    let cfg: Cfg = toml::from_str("default_export_filename = \" \"").unwrap();
    assert_eq!(cfg.export_filename(), DEFAULT_EXPORT_FILENAME);
}

#[test]
fn test_write_read_cfg() -> RdResult<()> {
    let folder = file_util::make_test_folder("cfg_test")?;
    let path = folder.join("rd_cfg.toml");
    crate::defer_file_removal!(&path);
    let mut cfg = get_default_cfg();
    cfg.darkmode = Some(true);
    cfg.color_seed = Some(42);
    cfg.set_canvas(CanvasCfg {
        x_max: 20.0,
        ..CanvasCfg::default()
    });
    write_cfg(&cfg, Some(&path))?;
    let read = read_cfg(Some(&path))?;
    assert_eq!(read, cfg);
    assert_eq!(read.darkmode, Some(true));
    let missing = read_cfg(Some(&folder.join("doesnotexist.toml")))?;
    assert_eq!(missing, Cfg::default());
    Ok(())
}
