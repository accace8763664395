use lazy_static::lazy_static;
use rectdraw_domain::{rderr, RdResult};
use std::{
    fmt::Debug,
    fs, io,
    path::{Path, PathBuf},
};
use tracing::{error, info};

lazy_static! {
    pub static ref DEFAULT_TMPDIR: PathBuf = std::env::temp_dir().join("rectdraw");
}
lazy_static! {
    pub static ref DEFAULT_HOMEDIR: PathBuf = match dirs::home_dir() {
        Some(p) => p.join(".rectdraw"),
        _ => std::env::temp_dir().join("rectdraw"),
    };
}

pub fn read_to_string<P>(p: P) -> RdResult<String>
where
    P: AsRef<Path> + Debug,
{
    fs::read_to_string(&p).map_err(|e| rderr!("could not read {:?} due to {:?}", p, e))
}

pub fn write<P, C>(path: P, contents: C) -> RdResult<()>
where
    P: AsRef<Path> + Debug,
    C: AsRef<[u8]>,
{
    fs::write(&path, contents).map_err(|e| rderr!("could not write to {:?} since {:?}", path, e))
}

pub struct Defer<F: FnMut()> {
    pub func: F,
}
impl<F: FnMut()> Drop for Defer<F> {
    fn drop(&mut self) {
        (self.func)();
    }
}
#[macro_export]
macro_rules! defer {
    ($f:expr) => {
        let _dfr = $crate::file_util::Defer { func: $f };
    };
}
pub fn checked_remove<'a, P: AsRef<Path> + Debug>(
    path: &'a P,
    func: fn(p: &'a P) -> io::Result<()>,
) {
    match func(path) {
        Ok(_) => info!("removed {path:?}"),
        Err(e) => error!("could not remove {path:?} due to {e:?}"),
    }
}
#[macro_export]
macro_rules! defer_file_removal {
    ($path:expr) => {
        let func = || $crate::file_util::checked_remove($path, std::fs::remove_file);
        $crate::defer!(func);
    };
}

/// Creates a fresh folder below [`DEFAULT_TMPDIR`] for tests and returns its path.
pub fn make_test_folder(name: &str) -> RdResult<PathBuf> {
    let folder = DEFAULT_TMPDIR.join(name);
    fs::create_dir_all(&folder)
        .map_err(|e| rderr!("could not create {:?} due to {:?}", folder, e))?;
    Ok(folder)
}

#[test]
fn test_write_read_defer() -> RdResult<()> {
    let folder = make_test_folder("file_util_test")?;
    let p = folder.join("some.txt");
    {
        defer_file_removal!(&p);
        write(&p, "abc")?;
        assert_eq!(read_to_string(&p)?, "abc");
    }
    assert!(!p.exists());
    assert!(read_to_string(&p).is_err());
    Ok(())
}

#[test]
fn test_default_paths() {
    assert!(DEFAULT_TMPDIR.to_str().is_some());
    assert!(DEFAULT_HOMEDIR.ends_with(".rectdraw") || DEFAULT_HOMEDIR.ends_with("rectdraw"));
}
