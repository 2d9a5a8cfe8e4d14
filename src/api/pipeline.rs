//! Readings-to-position pipeline
//!
//! Each reading is converted to a distance with the path-loss model and the three
//! distances are handed to the trilateration solver. Reading `i` must belong to
//! anchor `i`; the pipeline does not match identifiers.

use crate::algorithms::{PathLossModel, Trilaterator};
use crate::core::{
    AnchorPoint, DistanceEstimate, PathLossParameters, Position, SignalReading, MIN_ANCHORS,
};
use crate::validation::data::{ensure_count, ensure_min_count, validate_reading};
use crate::validation::error::PositioningResult;
use serde::{Deserialize, Serialize};

/// Per-anchor intermediate values of one estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorRange {
    pub identifier: String,
    pub anchor: AnchorPoint,
    pub rssi_dbm: f64,
    pub distance: DistanceEstimate,
}

/// Position together with the ranges it was computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionEstimate {
    pub position: Position,
    pub ranges: Vec<AnchorRange>,
    /// Sum of squared range residuals at the solved position
    pub residual: f64,
}

/// Stateless RSS positioning pipeline
pub struct PositioningPipeline;

impl PositioningPipeline {
    /// Estimate the device position from exactly three readings and their anchors
    pub fn estimate_position(
        readings: &[SignalReading],
        anchors: &[AnchorPoint],
        params: &PathLossParameters,
    ) -> PositioningResult<Position> {
        Self::estimate_with_details(readings, anchors, params).map(|estimate| estimate.position)
    }

    /// Like [`PositioningPipeline::estimate_position`], keeping the intermediate ranges
    pub fn estimate_with_details(
        readings: &[SignalReading],
        anchors: &[AnchorPoint],
        params: &PathLossParameters,
    ) -> PositioningResult<PositionEstimate> {
        ensure_count("anchors", MIN_ANCHORS, anchors.len())?;
        ensure_count("readings", MIN_ANCHORS, readings.len())?;

        let distances = Self::ranges(readings, params)?;
        let position = Trilaterator::solve(
            &[anchors[0], anchors[1], anchors[2]],
            &[distances[0], distances[1], distances[2]],
        )?;

        Ok(Self::assemble(position, readings, anchors, &distances))
    }

    /// Least-squares estimate over three or more readings, one per anchor
    pub fn estimate_position_least_squares(
        readings: &[SignalReading],
        anchors: &[AnchorPoint],
        params: &PathLossParameters,
    ) -> PositioningResult<PositionEstimate> {
        ensure_min_count("anchors", MIN_ANCHORS, anchors.len())?;
        ensure_count("readings", anchors.len(), readings.len())?;

        let distances = Self::ranges(readings, params)?;
        let position = Trilaterator::solve_least_squares(anchors, &distances)?;

        Ok(Self::assemble(position, readings, anchors, &distances))
    }

    fn ranges(
        readings: &[SignalReading],
        params: &PathLossParameters,
    ) -> PositioningResult<Vec<DistanceEstimate>> {
        for reading in readings {
            validate_reading(reading)?;
        }
        PathLossModel::distances(readings, params)
    }

    fn assemble(
        position: Position,
        readings: &[SignalReading],
        anchors: &[AnchorPoint],
        distances: &[DistanceEstimate],
    ) -> PositionEstimate {
        let ranges = readings
            .iter()
            .zip(anchors)
            .zip(distances)
            .map(|((reading, anchor), &distance)| AnchorRange {
                identifier: reading.identifier().to_string(),
                anchor: *anchor,
                rssi_dbm: reading.rssi_dbm(),
                distance,
            })
            .collect();

        PositionEstimate {
            position,
            ranges,
            residual: Trilaterator::residual(&position, anchors, distances),
        }
    }
}
