use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Pointer location normalized to `[-1, 1]` on both axes, y pointing up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f32,
    pub y: f32,
}

impl PointerPosition {
    /// Build a position, clamping both coordinates into `[-1, 1]`.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }

    /// Convert a cursor position in viewport pixels (origin top-left) into
    /// normalized coordinates. A zero-sized viewport is treated as 1×1.
    pub fn from_viewport(cursor_x: f64, cursor_y: f64, width: u32, height: u32) -> Self {
        let width = width.max(1) as f64;
        let height = height.max(1) as f64;
        Self::new(
            (-1.0 + 2.0 * cursor_x / width) as f32,
            (1.0 - 2.0 * cursor_y / height) as f32,
        )
    }

    fn to_bits(self) -> u64 {
        ((self.x.to_bits() as u64) << 32) | self.y.to_bits() as u64
    }

    fn from_bits(bits: u64) -> Self {
        Self {
            x: f32::from_bits((bits >> 32) as u32),
            y: f32::from_bits(bits as u32),
        }
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PointerParseError {
    #[error("expected `x,y`, got {0:?}")]
    Format(String),
    #[error("invalid coordinate {0:?}")]
    Coordinate(String),
}

/// Parses `x,y` in normalized coordinates, e.g. `0.5,-0.25`.
impl FromStr for PointerPosition {
    type Err = PointerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| PointerParseError::Format(s.to_string()))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f32>()
                .map_err(|_| PointerParseError::Coordinate(v.trim().to_string()))
        };
        Ok(Self::new(parse(x)?, parse(y)?))
    }
}

/// Latest pointer position, shared between the event thread and the frame
/// loop.
///
/// Both coordinates live in one atomic word, so a reader never sees x from
/// one write and y from another. Last write wins.
#[derive(Debug, Clone, Default)]
pub struct SharedPointer {
    bits: Arc<AtomicU64>,
}

impl SharedPointer {
    pub fn new(initial: PointerPosition) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(initial.to_bits())),
        }
    }

    pub fn store(&self, position: PointerPosition) {
        self.bits.store(position.to_bits(), Ordering::Release);
    }

    pub fn load(&self) -> PointerPosition {
        PointerPosition::from_bits(self.bits.load(Ordering::Acquire))
    }
}
