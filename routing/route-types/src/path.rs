//! Route paths and their geometric transforms.
//!
//! A [`Path`] is an ordered sequence of [`Position`] waypoints. The search
//! engine produces paths through cell corners; the transforms here reshape
//! them for consumers:
//!
//! - [`Path::interpolate`]: densify so consecutive waypoints are at most `step` apart
//! - [`Path::simplify`]: Douglas–Peucker reduction
//! - [`Path::trim`]: drop waypoints from the tail
//! - [`Path::join`]: concatenate with another path
//! - [`Path::mutate_positions`]: rewrite every waypoint in place
//!
//! # Conventions
//!
//! - `trim(n)` removes the **last** `n` waypoints.
//! - `join(other)` drops `other`'s first waypoint when it equals this path's
//!   last one; otherwise both are kept and the gap becomes a straight segment.
//!
//! # Example
//!
//! ```
//! use route_types::Path;
//! use cf_spatial::{EnvironmentId, Position};
//!
//! let world = EnvironmentId::new(0);
//! let path: Path = [(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (2.0, 2.0)]
//!     .into_iter()
//!     .map(|(x, z)| Position::new(world, x, 0.0, z))
//!     .collect();
//!
//! assert_eq!(path.len(), 4);
//! assert!((path.length() - 4.0).abs() < 1e-10);
//!
//! // The collinear middle waypoint goes away
//! let simplified = path.simplify(0.0).unwrap();
//! assert_eq!(simplified.len(), 3);
//! ```

use cf_spatial::{EnvironmentId, Position};

use crate::error::RoutingError;

/// An ordered sequence of waypoints.
///
/// The path owns its waypoints and caches its polyline length.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    /// Waypoints from start to end.
    waypoints: Vec<Position>,
    /// Cached total length.
    length: f64,
}

impl Path {
    /// Most waypoints [`interpolate`](Self::interpolate) will produce.
    pub const MAX_INTERPOLATED_WAYPOINTS: usize = 1 << 24;

    /// Creates a path from waypoints.
    #[must_use]
    pub fn new(waypoints: Vec<Position>) -> Self {
        let length = Self::compute_length(&waypoints);
        Self { waypoints, length }
    }

    /// Creates an empty path.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            waypoints: Vec::new(),
            length: 0.0,
        }
    }

    /// Creates a path with a single waypoint.
    #[must_use]
    pub fn from_single(position: Position) -> Self {
        Self::new(vec![position])
    }

    /// Returns the number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Returns `true` if the path has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Sum of the Euclidean distances between consecutive waypoints.
    ///
    /// Zero for paths with fewer than two waypoints.
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.length
    }

    /// Returns the waypoints as a slice.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.waypoints
    }

    /// The first waypoint.
    #[must_use]
    pub fn start(&self) -> Option<&Position> {
        self.waypoints.first()
    }

    /// The last waypoint.
    #[must_use]
    pub fn end(&self) -> Option<&Position> {
        self.waypoints.last()
    }

    /// Returns the waypoint at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Position> {
        self.waypoints.get(index)
    }

    /// The environment of the first waypoint.
    #[must_use]
    pub fn environment(&self) -> Option<EnvironmentId> {
        self.start().map(|p| p.environment)
    }

    /// Returns an iterator over the waypoints.
    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.waypoints.iter()
    }

    /// Returns an iterator over consecutive waypoint pairs.
    pub fn segments(&self) -> impl Iterator<Item = (&Position, &Position)> {
        self.waypoints.windows(2).map(|w| (&w[0], &w[1]))
    }

    /// Reverses the path in place.
    pub fn reverse(&mut self) {
        self.waypoints.reverse();
    }

    /// Returns a reversed copy of the path.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut path = self.clone();
        path.reverse();
        path
    }

    /// Resamples the path so consecutive waypoints are at most `step` apart.
    ///
    /// Each segment is split into `ceil(len / step)` equal pieces. Every
    /// original waypoint is kept exactly, so the first and last waypoints are
    /// unchanged and the polyline length is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::InvalidStep`] if `step` is not finite and
    /// positive, and [`RoutingError::TooManyWaypoints`] if the result would
    /// exceed [`Path::MAX_INTERPOLATED_WAYPOINTS`].
    ///
    /// # Example
    ///
    /// ```
    /// use route_types::Path;
    /// use cf_spatial::{EnvironmentId, Position};
    ///
    /// let world = EnvironmentId::new(0);
    /// let path = Path::new(vec![
    ///     Position::new(world, 0.0, 0.0, 0.0),
    ///     Position::new(world, 2.0, 0.0, 0.0),
    /// ]);
    ///
    /// let dense = path.interpolate(0.5).unwrap();
    /// assert_eq!(dense.len(), 5);
    /// assert_eq!(dense.end(), path.end());
    /// ```
    pub fn interpolate(&self, step: f64) -> Result<Self, RoutingError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(RoutingError::InvalidStep(step));
        }

        let Some(last) = self.waypoints.last() else {
            return Ok(Self::empty());
        };

        let pieces_of = |a: &Position, b: &Position| (a.distance(b) / step).ceil().max(1.0);
        let total = self.segments().map(|(a, b)| pieces_of(a, b)).sum::<f64>() + 1.0;
        #[allow(clippy::cast_precision_loss)]
        let limit = Self::MAX_INTERPOLATED_WAYPOINTS as f64;
        if total > limit {
            return Err(RoutingError::TooManyWaypoints {
                step,
                limit: Self::MAX_INTERPOLATED_WAYPOINTS,
            });
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let mut waypoints = Vec::with_capacity(total as usize);
        for (a, b) in self.segments() {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let pieces = pieces_of(a, b) as usize;

            waypoints.push(*a);
            for k in 1..pieces {
                #[allow(clippy::cast_precision_loss)]
                let t = k as f64 / pieces as f64;
                waypoints.push(a.interpolate(b, t));
            }
        }
        waypoints.push(*last);

        Ok(Self::new(waypoints))
    }

    /// Removes waypoints that deviate at most `tolerance` from the simplified line.
    ///
    /// Douglas–Peucker reduction: a span keeps its farthest interior waypoint
    /// when that waypoint lies more than `tolerance` from the chord, and is
    /// split there; otherwise every interior waypoint is dropped. The first and
    /// last waypoints are always kept and the count never increases. With
    /// `tolerance = 0` only exactly collinear waypoints are removed.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::InvalidTolerance`] if `tolerance` is negative or
    /// not finite.
    pub fn simplify(&self, tolerance: f64) -> Result<Self, RoutingError> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(RoutingError::InvalidTolerance(tolerance));
        }

        if self.waypoints.len() < 3 {
            return Ok(self.clone());
        }

        let keep = douglas_peucker(&self.waypoints, tolerance);
        let waypoints = self
            .waypoints
            .iter()
            .zip(keep)
            .filter_map(|(p, kept)| kept.then_some(*p))
            .collect();

        Ok(Self::new(waypoints))
    }

    /// Returns a copy with the last `n` waypoints removed.
    ///
    /// Trimming at least [`Path::len`] waypoints yields an empty path.
    ///
    /// # Example
    ///
    /// ```
    /// use route_types::Path;
    /// use cf_spatial::{EnvironmentId, Position};
    ///
    /// let world = EnvironmentId::new(0);
    /// let path: Path = (0..5).map(|x| Position::new(world, f64::from(x), 0.0, 0.0)).collect();
    ///
    /// let trimmed = path.trim(2);
    /// assert_eq!(trimmed.len(), 3);
    /// assert_eq!(trimmed.start(), path.start());
    /// ```
    #[must_use]
    pub fn trim(&self, n: usize) -> Self {
        let keep = self.waypoints.len().saturating_sub(n);
        Self::new(self.waypoints[..keep].to_vec())
    }

    /// Concatenates `other` after this path.
    ///
    /// If this path ends exactly where `other` starts, the shared waypoint
    /// appears once. Otherwise the waypoints are concatenated as-is and the
    /// gap between them counts as a straight segment. Joining with an empty
    /// path returns a copy of the non-empty one.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::EnvironmentMismatch`] if both paths are
    /// non-empty and belong to different environments.
    pub fn join(&self, other: &Self) -> Result<Self, RoutingError> {
        let (Some(end), Some(other_start)) = (self.end(), other.start()) else {
            return Ok(if self.is_empty() {
                other.clone()
            } else {
                self.clone()
            });
        };

        if !end.same_environment(other_start) {
            return Err(RoutingError::EnvironmentMismatch {
                left: end.environment,
                right: other_start.environment,
            });
        }

        let skip = usize::from(end == other_start);
        let mut waypoints = Vec::with_capacity(self.len() + other.len() - skip);
        waypoints.extend_from_slice(&self.waypoints);
        waypoints.extend_from_slice(&other.waypoints[skip..]);

        Ok(Self::new(waypoints))
    }

    /// Applies `mutator` to every waypoint in place and returns `self` for chaining.
    ///
    /// # Example
    ///
    /// ```
    /// use route_types::Path;
    /// use cf_spatial::{EnvironmentId, Position, Vector};
    ///
    /// let world = EnvironmentId::new(0);
    /// let mut path = Path::new(vec![
    ///     Position::new(world, 0.0, 0.0, 0.0),
    ///     Position::new(world, 1.0, 0.0, 0.0),
    /// ]);
    ///
    /// // Lift the route to walk through cell centers
    /// path.mutate_positions(|p| p.offset(&Vector::new(0.5, 0.0, 0.5)))
    ///     .reverse();
    /// assert_eq!(path.start().map(|p| p.x()), Some(1.5));
    /// ```
    pub fn mutate_positions<F>(&mut self, mut mutator: F) -> &mut Self
    where
        F: FnMut(Position) -> Position,
    {
        for waypoint in &mut self.waypoints {
            *waypoint = mutator(*waypoint);
        }
        self.length = Self::compute_length(&self.waypoints);
        self
    }

    /// Computes the total polyline length.
    fn compute_length(waypoints: &[Position]) -> f64 {
        waypoints.windows(2).map(|w| w[0].distance(&w[1])).sum()
    }
}

/// Marks which waypoints survive Douglas–Peucker reduction.
///
/// Uses an explicit work stack of `(first, last)` index spans so long paths
/// cannot exhaust the call stack.
fn douglas_peucker(points: &[Position], tolerance: f64) -> Vec<bool> {
    let mut keep = vec![false; points.len()];
    let last = points.len() - 1;
    keep[0] = true;
    keep[last] = true;

    let mut spans = vec![(0, last)];
    while let Some((first, last)) = spans.pop() {
        if last <= first + 1 {
            continue;
        }

        let (split, deviation) = points[first + 1..last]
            .iter()
            .enumerate()
            .map(|(offset, p)| (first + 1 + offset, p.distance_to_segment(&points[first], &points[last])))
            .fold((first, f64::NEG_INFINITY), |best, candidate| {
                if candidate.1 > best.1 { candidate } else { best }
            });

        if deviation > tolerance {
            keep[split] = true;
            spans.push((split, last));
            spans.push((first, split));
        }
    }

    keep
}

impl FromIterator<Position> for Path {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Path {
    type Item = Position;
    type IntoIter = std::vec::IntoIter<Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.waypoints.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Position;
    type IntoIter = std::slice::Iter<'a, Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.waypoints.iter()
    }
}
