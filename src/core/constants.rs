//! Model defaults and numeric tolerances

/// Reference RSS at the reference distance measured for the default deployment (dBm)
pub const DEFAULT_REFERENCE_RSSI_DBM: f64 = -41.4568;

/// Path-loss exponent fitted for the default deployment
pub const DEFAULT_PATH_LOSS_EXPONENT: f64 = 3.6105;

/// Distance at which the reference RSS is defined (distance units)
pub const DEFAULT_REFERENCE_DISTANCE: f64 = 1.0;

/// Known distances used by the default calibration run
pub const DEFAULT_CALIBRATION_DISTANCES: [f64; 10] =
    [1.5, 2.0, 3.0, 3.5, 4.0, 4.5, 5.0, 5.5, 6.0, 6.5];

/// Number of scans averaged per calibration point
pub const DEFAULT_SAMPLES_PER_POINT: u32 = 20;

/// Pause between consecutive scans while sampling (milliseconds)
pub const DEFAULT_SAMPLE_PAUSE_MS: u64 = 20_000;

/// Default anchor coordinates, in the order readings are expected
pub const DEFAULT_ANCHOR_LAYOUT: [(f64, f64); 3] = [(4.5, 4.5), (6.0, 3.5), (1.0, 0.5)];

/// Relative determinant threshold below which a linear system is treated as singular
pub const DEGENERACY_TOLERANCE: f64 = 1e-10;

/// Minimum number of anchors for a 2D fix
pub const MIN_ANCHORS: usize = 3;
