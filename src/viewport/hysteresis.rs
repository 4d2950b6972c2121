//! The recompute gate for region changes.

use crate::config::{HysteresisConfig, Region};

/// Decide whether moving from `settled` to `next` warrants a recompute.
///
/// Regions wider than `max_lon_delta` never do. Otherwise a recompute is due
/// when the latitude span changed by more than `settled / zoom_divisor`, or
/// the center moved by at least a `1 / pan_divisor` share of the settled span
/// on either axis. With nothing settled yet, any region inside the gate
/// triggers.
pub fn should_recompute(
    config: &HysteresisConfig,
    settled: Option<&Region>,
    next: &Region,
) -> bool {
    if next.lon_delta > config.max_lon_delta {
        return false;
    }

    let Some(settled) = settled else {
        return true;
    };

    let zoomed = (next.lat_delta - settled.lat_delta).abs() > settled.lat_delta / config.zoom_divisor;
    let panned_lon =
        (next.center_lon - settled.center_lon).abs() >= settled.lon_delta / config.pan_divisor;
    let panned_lat =
        (next.center_lat - settled.center_lat).abs() >= settled.lat_delta / config.pan_divisor;

    zoomed || panned_lon || panned_lat
}
