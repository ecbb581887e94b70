//! Random roll generation.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;
use thiserror::Error;

/// Number of faces on the die.
pub const FACES: u8 = 6;

/// The face that fails a roll.
pub const UNLUCKY_FACE: u8 = 6;

/// Source of die faces.
///
/// Implementations must return a value in `1..=6`.
pub trait Die: Send + Sync {
    fn draw(&self) -> u8;
}

/// A fair six-sided die backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDie;

impl Die for RandomDie {
    fn draw(&self) -> u8 {
        rand::thread_rng().gen_range(1..=FACES)
    }
}

/// A die that replays a fixed sequence of faces, wrapping around at the end.
#[derive(Debug)]
pub struct LoadedDie {
    faces: Vec<u8>,
    cursor: AtomicUsize,
}

impl LoadedDie {
    /// Create a loaded die. Returns `None` if `faces` is empty or holds a
    /// value outside `1..=6`.
    pub fn new(faces: impl Into<Vec<u8>>) -> Option<Self> {
        let faces = faces.into();
        if faces.is_empty() || faces.iter().any(|f| !(1..=FACES).contains(f)) {
            return None;
        }
        Some(Self {
            faces,
            cursor: AtomicUsize::new(0),
        })
    }

    /// A die that always lands on `face`.
    pub fn always(face: u8) -> Option<Self> {
        Self::new(vec![face])
    }
}

impl Die for LoadedDie {
    fn draw(&self) -> u8 {
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.faces[idx % self.faces.len()]
    }
}

/// A successful roll, always in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Roll(u8);

impl Roll {
    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors returned by [`roll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RollError {
    #[error("Unlucky roll: 6 triggered an exception!")]
    Unlucky,

    #[error("die returned face {0}, expected 1 to 6")]
    FaceOutOfRange(u8),
}

impl RollError {
    /// Stable error kind, recorded as `exception.type` on spans.
    pub fn kind(&self) -> &'static str {
        match self {
            RollError::Unlucky => "UnluckyRoll",
            RollError::FaceOutOfRange(_) => "FaceOutOfRange",
        }
    }
}

/// Draw once from `die`. A six fails with [`RollError::Unlucky`]; a face
/// outside `1..=6` fails with [`RollError::FaceOutOfRange`].
pub fn roll(die: &dyn Die) -> Result<Roll, RollError> {
    let face = die.draw();
    if !(1..=FACES).contains(&face) {
        return Err(RollError::FaceOutOfRange(face));
    }
    if face == UNLUCKY_FACE {
        return Err(RollError::Unlucky);
    }
    Ok(Roll(face))
}
