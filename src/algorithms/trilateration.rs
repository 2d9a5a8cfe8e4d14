//! 2D trilateration from anchor distances
//!
//! Each anchor `i` constrains the position to the circle
//! `(x - x_i)^2 + (y - y_i)^2 = d_i^2`. Subtracting the last circle equation from the
//! others removes the quadratic terms and leaves a linear system in `x` and `y`.

use crate::core::{AnchorPoint, DistanceEstimate, Position, DEGENERACY_TOLERANCE, MIN_ANCHORS};
use crate::validation::data::{ensure_count, ensure_finite, ensure_min_count, validate_anchor};
use crate::validation::error::{GeometryIssue, PositioningError, PositioningResult};
use nalgebra::{DMatrix, DVector, Matrix2, Vector2};

/// Linearized trilateration solver
pub struct Trilaterator;

impl Trilaterator {
    /// Solve for the position seen at `distances` from exactly three anchors
    ///
    /// Index `i` of `anchors` must correspond to index `i` of `distances`.
    pub fn solve(
        anchors: &[AnchorPoint; 3],
        distances: &[DistanceEstimate; 3],
    ) -> PositioningResult<Position> {
        Self::validate_inputs(anchors, distances)?;

        let [p1, p2, p3] = anchors;
        let [d1, d2, d3] = distances;

        #[rustfmt::skip]
        let a = Matrix2::new(
            2.0 * (p1.x - p3.x), 2.0 * (p1.y - p3.y),
            2.0 * (p2.x - p3.x), 2.0 * (p2.y - p3.y),
        );
        let b = Vector2::new(
            p1.norm_squared() - p3.norm_squared() - d1 * d1 + d3 * d3,
            p2.norm_squared() - p3.norm_squared() - d2 * d2 + d3 * d3,
        );

        let determinant = a.determinant();
        let scale = a.amax();
        if !(determinant.abs() > DEGENERACY_TOLERANCE * scale * scale) {
            return Err(degenerate(anchors, determinant));
        }

        let inverse = a
            .try_inverse()
            .ok_or_else(|| degenerate(anchors, determinant))?;
        let solution = inverse * b;

        Ok(Position::new(solution.x, solution.y))
    }

    /// Least-squares solve over three or more anchors
    ///
    /// The last anchor is the reference equation. With exactly three anchors the
    /// result matches [`Trilaterator::solve`].
    pub fn solve_least_squares(
        anchors: &[AnchorPoint],
        distances: &[DistanceEstimate],
    ) -> PositioningResult<Position> {
        ensure_min_count("anchors", MIN_ANCHORS, anchors.len())?;
        ensure_count("distances", anchors.len(), distances.len())?;
        Self::validate_inputs(anchors, distances)?;

        let (a, b) = linearize(anchors, distances);
        let a_t = a.transpose();
        let a_t_a = &a_t * &a;

        let determinant = a_t_a.determinant();
        let scale = a_t_a[(0, 0)] * a_t_a[(1, 1)];
        if !(determinant.abs() > DEGENERACY_TOLERANCE * scale) {
            return Err(degenerate(anchors, determinant));
        }

        let inverse = a_t_a
            .try_inverse()
            .ok_or_else(|| degenerate(anchors, determinant))?;
        let solution = inverse * (&a_t * &b);

        Ok(Position::new(solution[0], solution[1]))
    }

    /// Check that an anchor layout admits a unique solution, independent of distances
    pub fn check_geometry(anchors: &[AnchorPoint]) -> PositioningResult<()> {
        ensure_min_count("anchors", MIN_ANCHORS, anchors.len())?;
        for anchor in anchors {
            validate_anchor(anchor)?;
        }

        let zeros = vec![0.0; anchors.len()];
        let (a, _) = linearize(anchors, &zeros);
        let a_t_a = a.transpose() * &a;
        let determinant = a_t_a.determinant();
        let scale = a_t_a[(0, 0)] * a_t_a[(1, 1)];
        if !(determinant.abs() > DEGENERACY_TOLERANCE * scale) {
            return Err(degenerate(anchors, determinant));
        }
        Ok(())
    }

    /// Sum of squared differences between measured and implied distances
    pub fn residual(
        position: &Position,
        anchors: &[AnchorPoint],
        distances: &[DistanceEstimate],
    ) -> f64 {
        anchors
            .iter()
            .zip(distances)
            .map(|(anchor, d)| (position.distance_to(anchor) - d).powi(2))
            .sum()
    }

    fn validate_inputs(
        anchors: &[AnchorPoint],
        distances: &[DistanceEstimate],
    ) -> PositioningResult<()> {
        for anchor in anchors {
            validate_anchor(anchor)?;
        }
        for &d in distances {
            ensure_finite("trilateration", "distance", d)?;
            if d < 0.0 {
                return Err(PositioningError::Domain {
                    operation: "trilateration",
                    reason: format!("distance must be non-negative, got {}", d),
                });
            }
        }
        Ok(())
    }
}

/// Stack the circle differences against the last anchor into `A [x y]^T = b`
fn linearize(
    anchors: &[AnchorPoint],
    distances: &[DistanceEstimate],
) -> (DMatrix<f64>, DVector<f64>) {
    let n = anchors.len();
    let reference = anchors[n - 1];
    let d_ref = distances[n - 1];

    let a = DMatrix::from_fn(n - 1, 2, |row, col| {
        if col == 0 {
            2.0 * (anchors[row].x - reference.x)
        } else {
            2.0 * (anchors[row].y - reference.y)
        }
    });
    let b = DVector::from_fn(n - 1, |row, _| {
        anchors[row].norm_squared() - reference.norm_squared() - distances[row].powi(2)
            + d_ref * d_ref
    });
    (a, b)
}

fn degenerate(anchors: &[AnchorPoint], determinant: f64) -> PositioningError {
    PositioningError::DegenerateGeometry {
        issue: classify(anchors),
        determinant,
    }
}

fn classify(anchors: &[AnchorPoint]) -> GeometryIssue {
    let mut extent: f64 = 0.0;
    let mut closest = f64::INFINITY;
    for (i, a) in anchors.iter().enumerate() {
        for b in &anchors[i + 1..] {
            let d = a.distance_to(b);
            extent = extent.max(d);
            closest = closest.min(d);
        }
    }

    if closest <= DEGENERACY_TOLERANCE.sqrt() * extent {
        GeometryIssue::CoincidentAnchors
    } else {
        GeometryIssue::Collinear
    }
}
