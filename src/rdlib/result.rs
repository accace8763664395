use std::fmt::Debug;
use tracing::error;

pub fn trace_ok_err<T, E>(x: Result<T, E>) -> Option<T>
where
    E: Debug,
{
    match x {
        Ok(x) => Some(x),
        Err(e) => {
            error!("{e:?}");
            None
        }
    }
}

#[test]
fn test_trace_ok() {
    let ok: Result<u8, &str> = Ok(1);
    assert_eq!(trace_ok_err(ok), Some(1));
    let err: Result<u8, &str> = Err("nope");
    assert_eq!(trace_ok_err(err), None);
}
