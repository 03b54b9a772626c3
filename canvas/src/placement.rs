//! Non-overlapping placement for newly inserted images.
//!
//! The engine tries, in order: an external hint, a fixed list of strategic
//! slots, a bounded random search, the four corners, and finally a position
//! derived from the insertion index. The first candidate that clears every
//! existing element wins.
//!
//! DESIGN
//! ======
//! Overlap is tested on margin-expanded boxes: both the candidate and each
//! existing box grow by [`PLACEMENT_MARGIN`] on every side, and two boxes
//! collide only when they overlap on both axes. A candidate is tested both as
//! proposed and after aspect adjustment and rounding, so whatever is returned
//! is exactly what was checked.
//!
//! Strategic slots claimed during a session stay claimed until [`PlacementEngine::reset`].

#[cfg(test)]
#[path = "placement_test.rs"]
mod placement_test;

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{
    CANVAS_HEIGHT, CANVAS_WIDTH, CORNER_SIZE, FALLBACK_SIZE, PLACEMENT_MARGIN, RANDOM_ATTEMPTS, RANDOM_MAX_SIZE,
    RANDOM_MIN_SIZE, SAFE_ZONE_BOTTOM, SAFE_ZONE_TOP,
};
use crate::geom::Rect;

/// Strategic slots as `(x, y, width, height)`, spread over the canvas.
pub const PRESET_SLOTS: [(f64, f64, f64, f64); 15] = [
    (100.0, 300.0, 350.0, 350.0),
    (150.0, 700.0, 300.0, 300.0),
    (100.0, 1200.0, 400.0, 400.0),
    (340.0, 400.0, 400.0, 400.0),
    (340.0, 900.0, 350.0, 350.0),
    (340.0, 1400.0, 300.0, 300.0),
    (630.0, 300.0, 350.0, 350.0),
    (680.0, 700.0, 300.0, 300.0),
    (630.0, 1200.0, 400.0, 400.0),
    (200.0, 500.0, 300.0, 300.0),
    (580.0, 500.0, 300.0, 300.0),
    (390.0, 600.0, 300.0, 300.0),
    (100.0, 1000.0, 350.0, 350.0),
    (630.0, 1000.0, 350.0, 350.0),
    (340.0, 1100.0, 400.0, 400.0),
];

/// Gap between the lower corner slots and the bottom edge.
const CORNER_BOTTOM_INSET: f64 = 200.0;

// =============================================================
// Hint
// =============================================================

/// Position suggested by the hint service. Any field may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementHint {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Why a hint was not used.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HintRejection {
    #[error("hint has no {0}")]
    MissingField(&'static str),
    #[error("hint {0} is not a finite number")]
    NonFinite(&'static str),
    #[error("hint size {width}x{height} is not positive")]
    NonPositiveSize { width: f64, height: f64 },
    #[error("hint overlaps existing content")]
    Overlaps,
}

fn require(value: Option<f64>, name: &'static str) -> Result<f64, HintRejection> {
    let v = value.ok_or(HintRejection::MissingField(name))?;
    if v.is_finite() { Ok(v) } else { Err(HintRejection::NonFinite(name)) }
}

/// Validate a hint against the scene and return its aspect-adjusted box.
///
/// # Errors
///
/// Returns a [`HintRejection`] describing the first check that failed.
pub fn validate_hint(hint: &PlacementHint, existing: &[Rect], aspect: f64) -> Result<Rect, HintRejection> {
    let x = require(hint.x, "x")?;
    let y = require(hint.y, "y")?;
    let width = require(hint.width, "width")?;
    let height = require(hint.height, "height")?;
    if width <= 0.0 || height <= 0.0 {
        return Err(HintRejection::NonPositiveSize { width, height });
    }
    fit(Rect::new(x, y, width, height), aspect, existing).ok_or(HintRejection::Overlaps)
}

// =============================================================
// Geometry helpers
// =============================================================

/// Shrink one side of `rect` so that `width / height == aspect`.
///
/// Wide images keep their width, tall and square ones keep their height. The
/// origin never moves. Invalid aspects are treated as square.
#[must_use]
pub fn adjust_for_aspect(rect: Rect, aspect: f64) -> Rect {
    let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
    if aspect > 1.0 {
        Rect { height: rect.width / aspect, ..rect }
    } else {
        Rect { width: rect.height * aspect, ..rect }
    }
}

/// Whether `candidate` collides with any existing box once both are margin-expanded.
#[must_use]
pub fn overlaps_any(candidate: &Rect, existing: &[Rect]) -> bool {
    let grown = candidate.expand(PLACEMENT_MARGIN);
    existing.iter().any(|other| grown.intersects(&other.expand(PLACEMENT_MARGIN)))
}

/// Aspect-adjusted, rounded box for `candidate` if it is clear of `existing`.
fn fit(candidate: Rect, aspect: f64, existing: &[Rect]) -> Option<Rect> {
    let adjusted = adjust_for_aspect(candidate, aspect).rounded();
    if overlaps_any(&candidate, existing) || overlaps_any(&adjusted, existing) {
        None
    } else {
        Some(adjusted)
    }
}

// =============================================================
// Engine
// =============================================================

/// Which step of the cascade produced a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Hint,
    Preset(usize),
    Random,
    Corner(usize),
    Fallback,
}

/// Result of a placement: logical box plus the strategy that chose it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub bounds: Rect,
    pub strategy: Strategy,
}

/// Session-scoped placement state: the random source, the insertion counter,
/// and the strategic slots already handed out.
#[derive(Debug, Clone)]
pub struct PlacementEngine {
    rng: StdRng,
    insertion_count: usize,
    claimed: HashSet<usize>,
}

impl Default for PlacementEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementEngine {
    /// Engine with an OS-seeded random source.
    #[must_use]
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Engine whose random search is reproducible.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self { rng, insertion_count: 0, claimed: HashSet::new() }
    }

    /// Number of placements made since the last reset.
    #[must_use]
    pub fn insertion_count(&self) -> usize {
        self.insertion_count
    }

    /// Whether strategic slot `index` has been handed out.
    #[must_use]
    pub fn is_claimed(&self, index: usize) -> bool {
        self.claimed.contains(&index)
    }

    /// Forget claimed slots and restart the insertion counter.
    pub fn reset(&mut self) {
        self.insertion_count = 0;
        self.claimed.clear();
    }

    /// Place the next image using the session's insertion counter.
    pub fn place(&mut self, existing: &[Rect], hint: Option<&PlacementHint>, aspect: f64) -> Placement {
        let index = self.insertion_count;
        self.place_with_index(existing, hint, aspect, index)
    }

    /// Place an image as if it were insertion number `index`.
    pub fn place_with_index(
        &mut self,
        existing: &[Rect],
        hint: Option<&PlacementHint>,
        aspect: f64,
        index: usize,
    ) -> Placement {
        self.insertion_count += 1;

        if let Some(hint) = hint {
            match validate_hint(hint, existing, aspect) {
                Ok(bounds) => {
                    debug!(?bounds, "placement: hint accepted");
                    return Placement { bounds, strategy: Strategy::Hint };
                }
                Err(reason) => debug!(%reason, "placement: hint rejected"),
            }
        }

        let placement = self
            .try_presets(existing, aspect, index)
            .or_else(|| self.try_random(existing, aspect))
            .or_else(|| try_corners(existing, aspect))
            .unwrap_or_else(|| fallback(aspect, index));
        debug!(strategy = ?placement.strategy, bounds = ?placement.bounds, "placement: chosen");
        placement
    }

    fn try_presets(&mut self, existing: &[Rect], aspect: f64, index: usize) -> Option<Placement> {
        let count = PRESET_SLOTS.len();
        let start = index % count;
        for slot in (0..count).map(|i| (start + i) % count) {
            if self.claimed.contains(&slot) {
                continue;
            }
            let (x, y, w, h) = PRESET_SLOTS[slot];
            if let Some(bounds) = fit(Rect::new(x, y, w, h), aspect, existing) {
                self.claimed.insert(slot);
                return Some(Placement { bounds, strategy: Strategy::Preset(slot) });
            }
        }
        None
    }

    fn try_random(&mut self, existing: &[Rect], aspect: f64) -> Option<Placement> {
        let x_range = PLACEMENT_MARGIN..(CANVAS_WIDTH - RANDOM_MAX_SIZE - PLACEMENT_MARGIN);
        // Largest box still clears both safe zones.
        let y_range = SAFE_ZONE_TOP..(CANVAS_HEIGHT - SAFE_ZONE_BOTTOM - RANDOM_MAX_SIZE);
        for _ in 0..RANDOM_ATTEMPTS {
            let x = self.rng.random_range(x_range.clone());
            let y = self.rng.random_range(y_range.clone());
            let size = self.rng.random_range(RANDOM_MIN_SIZE..RANDOM_MAX_SIZE);
            let candidate = Rect::new(x, y, size, size).rounded();
            if let Some(bounds) = fit(candidate, aspect, existing) {
                return Some(Placement { bounds, strategy: Strategy::Random });
            }
        }
        None
    }
}

fn corner_slots() -> [Rect; 4] {
    let right = CANVAS_WIDTH - CORNER_SIZE - PLACEMENT_MARGIN;
    let bottom = CANVAS_HEIGHT - CORNER_SIZE - CORNER_BOTTOM_INSET;
    [
        Rect::new(PLACEMENT_MARGIN, SAFE_ZONE_TOP, CORNER_SIZE, CORNER_SIZE),
        Rect::new(right, SAFE_ZONE_TOP, CORNER_SIZE, CORNER_SIZE),
        Rect::new(PLACEMENT_MARGIN, bottom, CORNER_SIZE, CORNER_SIZE),
        Rect::new(right, bottom, CORNER_SIZE, CORNER_SIZE),
    ]
}

fn try_corners(existing: &[Rect], aspect: f64) -> Option<Placement> {
    corner_slots().into_iter().enumerate().find_map(|(i, corner)| {
        fit(corner, aspect, existing).map(|bounds| Placement { bounds, strategy: Strategy::Corner(i) })
    })
}

/// Position derived from the insertion index alone. Always succeeds, may overlap.
fn fallback(aspect: f64, index: usize) -> Placement {
    #[allow(clippy::cast_precision_loss)]
    let i = index as f64;
    let x = 200.0 + (i * 150.0) % (CANVAS_WIDTH - 450.0);
    let y = 300.0 + (i * 200.0) % (CANVAS_HEIGHT - 600.0);
    let bounds = adjust_for_aspect(Rect::new(x, y, FALLBACK_SIZE, FALLBACK_SIZE), aspect).rounded();
    Placement { bounds, strategy: Strategy::Fallback }
}
