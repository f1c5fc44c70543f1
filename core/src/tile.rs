use serde::{Deserialize, Serialize};

use crate::TileValue;

/// One grid cell. Border cells are built non-fillable and never hold a value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    value: Option<TileValue>,
    fillable: bool,
}

impl Tile {
    pub const fn new(fillable: bool) -> Self {
        Self {
            value: None,
            fillable,
        }
    }

    pub const fn value(self) -> Option<TileValue> {
        self.value
    }

    pub const fn is_fillable(self) -> bool {
        self.fillable
    }

    pub const fn is_empty(self) -> bool {
        self.value.is_none()
    }

    /// Whether a placement here would be accepted.
    pub const fn accepts_placement(self) -> bool {
        self.fillable && self.value.is_none()
    }

    pub(crate) fn set(&mut self, value: TileValue) {
        debug_assert!(self.fillable, "non-fillable tiles stay empty");
        self.value = Some(value);
    }

    pub(crate) fn clear(&mut self) {
        self.value = None;
    }
}
