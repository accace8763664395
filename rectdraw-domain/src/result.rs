use std::{
    error::Error,
    fmt::{self, Debug, Display, Formatter},
};

/// Error type of Rectdraw. Carries a message and nothing else, the call site
/// decides whether it is worth surfacing to the user.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct RdError {
    msg: String,
}
impl RdError {
    pub fn new(msg: &str) -> RdError {
        RdError {
            msg: msg.to_string(),
        }
    }
    pub fn msg(&self) -> &str {
        &self.msg
    }
}
impl Display for RdError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.msg)
    }
}
impl Error for RdError {}
impl From<&str> for RdError {
    fn from(value: &str) -> Self {
        RdError::new(value)
    }
}
/// Rectdraw's result type with [`RdError`](RdError) as error type.
pub type RdResult<U> = Result<U, RdError>;

/// Creates an [`RdError`](RdError) with a formatted message.
/// ```rust
/// # use std::error::Error;
/// use rectdraw_domain::{rderr, RdError};
/// # fn main() -> Result<(), Box<dyn Error>> {
/// assert_eq!(rderr!("some error {}", 1), RdError::new(format!("some error {}", 1).as_str()));
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! rderr {
    ($s:literal) => {
        $crate::RdError::new(format!($s).as_str())
    };
    ($s:literal, $( $exps:expr ),*) => {
        $crate::RdError::new(format!($s, $($exps,)*).as_str())
    }
}

pub fn to_rd<E: Debug>(e: E) -> RdError {
    rderr!(
        "original error type is '{:?}', error message is '{:?}'",
        std::any::type_name::<E>(),
        e
    )
}

#[test]
fn test_to_rd() {
    let e = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let rd = to_rd(e);
    assert!(rd.msg().contains("original error type"));
    assert!(rd.msg().contains("gone"));
    assert_eq!(RdError::from("x").to_string(), "x");
}
