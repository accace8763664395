mod bb;
mod core;
pub mod result;
pub use self::core::{floats_close, max, min, Calc, Point, PtF, Shape, ShapeF, TPtF};
pub use bb::{BbF, BB};
pub use result::{to_rd, RdError, RdResult};

/// Color with three channels in `[0, 1]`.
pub type Rgb01 = [TPtF; 3];

/// Converts a color with channels in `[0, 1]` to 8 bit channels, clamping out-of-range values.
pub fn rgb01_to_u8(color: Rgb01) -> [u8; 3] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

#[test]
fn test_rgb01_to_u8() {
    assert_eq!(rgb01_to_u8([0.0, 1.0, 0.5]), [0, 255, 128]);
    assert_eq!(rgb01_to_u8([-1.0, 2.0, 0.2]), [0, 255, 51]);
}
