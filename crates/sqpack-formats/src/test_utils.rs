//! Test utilities for format round-trip testing

use crate::SqPackFormat;
use std::fmt::Debug;

/// Verify that a value survives build followed by parse
pub fn test_build_parse<T>(original: &T) -> Result<(), Box<dyn std::error::Error>>
where
    T: SqPackFormat + PartialEq + Debug,
{
    let data = original.build()?;
    let parsed = T::parse(&data)?;

    if original != &parsed {
        return Err(format!(
            "Round-trip verification failed:\nOriginal: {:?}\nParsed: {:?}",
            original, parsed
        )
        .into());
    }

    Ok(())
}
