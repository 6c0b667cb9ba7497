use crate::error::{Error, Result};

/// Monthly price in whole currency units, never negative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price(i32);

impl Price {
    pub fn value(&self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Price {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        if value < 0 {
            return Err(Error::ParsingError("price must be >= 0".into()));
        }
        Ok(Self(value))
    }
}
