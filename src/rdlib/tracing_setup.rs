use backtrace::Backtrace;
use std::{cell::RefCell, io, path::Path, sync::Once};
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{
    fmt::{writer::MakeWriterExt, Layer},
    prelude::*,
};

const LOGFILE_PREFIX: &str = "rectdraw.log";

/// Where the last panic of this thread happened, filled by the panic hook.
#[derive(Debug)]
pub struct PanicReport {
    pub location: Option<String>,
    pub backtrace: Backtrace,
}

thread_local! {
    pub static PANIC_REPORT: RefCell<Option<PanicReport>> = const { RefCell::new(None) };
}

fn stdout_level() -> Level {
    if cfg!(feature = "print_debug") {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

fn daily_logfile(log_folder: &Path) -> (NonBlocking, WorkerGuard) {
    tracing_appender::non_blocking(tracing_appender::rolling::daily(
        log_folder,
        LOGFILE_PREFIX,
    ))
}

/// Logs go to stdout and to a daily rolling file in `log_folder`. Keep the
/// returned guard alive in `main`, dropping it flushes the file.
/// # Panics
/// In case a global subscriber has already been set.
pub fn tracing_setup(log_folder: &Path) -> WorkerGuard {
    let (logfile, guard_flush_file) = daily_logfile(log_folder);
    tracing_subscriber::registry()
        .with(
            Layer::new()
                .with_writer(logfile.with_max_level(Level::INFO))
                .compact()
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true),
        )
        .with(
            Layer::new()
                .with_writer(io::stdout.with_max_level(stdout_level()))
                .with_file(true)
                .with_line_number(true),
        )
        .init();
    std::panic::set_hook(Box::new(|info| {
        let report = PanicReport {
            location: info.location().map(|l| format!("{}:{}", l.file(), l.line())),
            backtrace: Backtrace::new(),
        };
        PANIC_REPORT.with(move |r| r.borrow_mut().replace(report));
    }));
    tracing::info!(
        "{LOGFILE_PREFIX} of version {} in {log_folder:?}",
        env!("CARGO_PKG_VERSION")
    );
    guard_flush_file
}

static INIT: Once = Once::new();

pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

#[test]
fn test_init_tracing_twice() {
    init_tracing_for_tests();
    init_tracing_for_tests();
    tracing::debug!("still alive");
    assert!(stdout_level() >= Level::INFO);
    assert!(PANIC_REPORT.with(|r| r.borrow().is_none()));
}
