//! Intensity ↔ register mapping.

/// LEDC source clock period (40 MHz APB/2).
pub const PWM_CLOCK_CYCLE_NS: u32 = 25;

/// Counter wrap for a PWM frequency: `(1e9 / hz) / cycle_ns`.
///
/// Returns 0 for `hz == 0`.
pub fn wrap_point_of_freq(hz: u32) -> u32 {
    if hz == 0 {
        return 0;
    }
    (1_000_000_000 / hz) / PWM_CLOCK_CYCLE_NS
}

/// Highest register value a device is driven to.
///
/// Above this share of the duty range the output looks saturated, so
/// intensity 100 maps here rather than to the wrap point.
pub fn max_register(wrap_point: u32, sensitivity_percent: u8) -> u32 {
    wrap_point * u32::from(sensitivity_percent) / 100
}

/// Integer affine map of `x` from `[in_min, in_max]` onto `[out_min, out_max]`.
pub fn map_range(x: i64, in_min: i64, in_max: i64, out_min: i64, out_max: i64) -> i64 {
    if in_max == in_min {
        return out_min;
    }
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Register value for an intensity on a device with the given ceiling.
pub fn intensity_to_register(intensity: u8, max_register: u32) -> u32 {
    let mapped = map_range(
        i64::from(intensity),
        0,
        i64::from(super::INTENSITY_MAX),
        0,
        i64::from(max_register),
    );
    mapped.clamp(0, i64::from(max_register)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_for_default_frequency() {
        assert_eq!(wrap_point_of_freq(20_000), 2000);
        assert_eq!(wrap_point_of_freq(1_000_000), 40);
        assert_eq!(wrap_point_of_freq(0), 0);
    }

    #[test]
    fn sensitivity_scales_ceiling() {
        assert_eq!(max_register(2000, 40), 800);
        assert_eq!(max_register(2000, 100), 2000);
    }

    #[test]
    fn intensity_maps_linearly() {
        assert_eq!(intensity_to_register(0, 800), 0);
        assert_eq!(intensity_to_register(75, 800), 600);
        assert_eq!(intensity_to_register(100, 800), 800);
    }

    #[test]
    fn degenerate_input_range_collapses() {
        assert_eq!(map_range(5, 3, 3, 10, 20), 10);
    }
}
