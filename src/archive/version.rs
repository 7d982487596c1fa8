//! Major class-file versions and the naming convention derived from them

use super::Error;

pub const V1_1: u16 = 45;
pub const V1_2: u16 = 46;
pub const V1_7: u16 = 51;
pub const V8: u16 = 52;
pub const V11: u16 = 55;
pub const V16: u16 = 60;
pub const V17: u16 = 61;
pub const V21: u16 = 65;

/// Offset between a Java release number and its class-file major version
/// (release 8 is major 52)
const RELEASE_OFFSET: i32 = 44;

/// Map a Java release number to its class-file major version
pub fn major_for_release(release: i32) -> Result<u16, Error> {
    if release <= 0 {
        return Err(Error::UnsupportedRelease(release));
    }
    if release == 1 {
        return Ok(V1_1);
    }
    Ok((release + RELEASE_OFFSET) as u16)
}

/// Archive classifier derived from the target version
///
/// A negative target is the "never configured" sentinel and gets the
/// generic label.
pub fn classifier(target: i32) -> String {
    if target < 0 {
        String::from("downgraded")
    } else if target == V1_1 as i32 {
        String::from("j1")
    } else {
        format!("j{}", target - RELEASE_OFFSET)
    }
}
