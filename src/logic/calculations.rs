//! Agronomic formulas behind the ET₀ estimate and the irrigation schedule.
//! Depths are millimetres over the root zone unless noted.

/// Hargreaves empirical coefficient
pub const HARGREAVES_COEFFICIENT: f64 = 0.0023;

/// Temperature offset in the Hargreaves equation (°C)
pub const HARGREAVES_TEMP_OFFSET: f64 = 17.8;

/// Fixed extraterrestrial radiation term; not adjusted for latitude or date
pub const EXTRATERRESTRIAL_RADIATION: f64 = 0.0820;

/// Assumed gap between the current reading (taken as T_max) and T_min (°C)
pub const ASSUMED_DIURNAL_RANGE_C: f64 = 2.0;

/// Share of forecast precipitation counted as usable by the crop
pub const EFFECTIVE_RAINFALL_FACTOR: f64 = 0.8;

/// Simplified Hargreaves ET₀ (mm/day) from a single air temperature reading.
///
/// The reading stands in for the daily maximum and the minimum is assumed to
/// be [`ASSUMED_DIURNAL_RANGE_C`] lower, so the square-root term is constant.
pub fn reference_et0(air_temperature_c: f64) -> f64 {
    let t_max = air_temperature_c;
    let t_min = t_max - ASSUMED_DIURNAL_RANGE_C;
    let t_avg = (t_max + t_min) / 2.0;

    HARGREAVES_COEFFICIENT
        * (t_avg + HARGREAVES_TEMP_OFFSET)
        * (t_max - t_min).sqrt()
        * EXTRATERRESTRIAL_RADIATION
}

/// Crop evapotranspiration ETc = ET₀ × Kc (mm/day)
pub fn crop_evapotranspiration(et0_mm_day: f64, kc: f64) -> f64 {
    et0_mm_day * kc
}

/// Effective rainfall Pe (mm)
pub fn effective_rainfall(precipitation_mm: f64) -> f64 {
    precipitation_mm * EFFECTIVE_RAINFALL_FACTOR
}

/// Net irrigation requirement Ir = ETc − Pe; negative when rain covers demand
pub fn net_irrigation(etc_mm_day: f64, effective_rainfall_mm: f64) -> f64 {
    etc_mm_day - effective_rainfall_mm
}

/// Gross irrigation requirement Ig = Ir / efficiency.
/// Callers must reject non-positive efficiencies first.
pub fn gross_irrigation(net_irrigation_mm: f64, irrigation_efficiency: f64) -> f64 {
    net_irrigation_mm / irrigation_efficiency
}

/// Available water capacity AWC from volumetric percentages and root depth (cm)
pub fn available_water_capacity(
    field_capacity: f64,
    wilting_point: f64,
    root_depth_cm: f64,
) -> f64 {
    (field_capacity - wilting_point) * root_depth_cm / 100.0
}

/// Readily available water RAW = p × AWC
pub fn readily_available_water(p_value: f64, available_water_mm: f64) -> f64 {
    p_value * available_water_mm
}

/// Soil moisture deficit SMD below field capacity
pub fn soil_moisture_deficit(field_capacity: f64, soil_moisture: f64, root_depth_cm: f64) -> f64 {
    (field_capacity - soil_moisture) * root_depth_cm / 100.0
}

/// Irrigation interval Ti = RAW / ETc in days, undefined when ETc ≤ 0
pub fn irrigation_interval(readily_available_mm: f64, etc_mm_day: f64) -> Option<f64> {
    if etc_mm_day > 0.0 {
        Some(readily_available_mm / etc_mm_day)
    } else {
        None
    }
}

/// Irrigate once the deficit reaches the readily available water
pub fn irrigation_needed(soil_moisture_deficit_mm: f64, readily_available_mm: f64) -> bool {
    soil_moisture_deficit_mm >= readily_available_mm
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn reference_et0_at_25c() {
        // T_max 25, T_min 23, T_avg 24
        let expected = 0.0023 * 41.8 * 2f64.sqrt() * 0.082;
        let et0 = reference_et0(25.0);
        assert!((et0 - expected).abs() < EPS);
        assert!((et0 - 0.01115).abs() < 1e-4);
    }

    #[test]
    fn reference_et0_sqrt_term_is_constant() {
        // Only the (T_avg + 17.8) factor varies with temperature
        let per_degree = reference_et0(11.0) - reference_et0(10.0);
        let expected = HARGREAVES_COEFFICIENT * 2f64.sqrt() * EXTRATERRESTRIAL_RADIATION;
        assert!((per_degree - expected).abs() < EPS);
    }

    #[test]
    fn reference_et0_negative_below_offset() {
        // T_avg + 17.8 < 0 yields a negative estimate, which is kept as is
        assert!(reference_et0(-20.0) < 0.0);
    }

    #[test]
    fn water_demand_chain() {
        let etc = crop_evapotranspiration(5.0, 1.2);
        assert!((etc - 6.0).abs() < EPS);

        let pe = effective_rainfall(3.0);
        assert!((pe - 2.4).abs() < EPS);

        let ir = net_irrigation(etc, pe);
        assert!((ir - 3.6).abs() < EPS);

        let ig = gross_irrigation(ir, 0.8);
        assert!((ig - 4.5).abs() < EPS);
    }

    #[test]
    fn net_irrigation_negative_when_rain_exceeds_demand() {
        assert!(net_irrigation(1.0, effective_rainfall(5.0)) < 0.0);
    }

    #[test]
    fn soil_water_balance() {
        let awc = available_water_capacity(30.0, 10.0, 100.0);
        assert!((awc - 20.0).abs() < EPS);

        let raw = readily_available_water(0.5, awc);
        assert!((raw - 10.0).abs() < EPS);

        let smd = soil_moisture_deficit(30.0, 18.0, 100.0);
        assert!((smd - 12.0).abs() < EPS);

        assert!(irrigation_needed(smd, raw));
    }

    #[test]
    fn irrigation_needed_at_boundary() {
        assert!(irrigation_needed(10.0, 10.0));
        assert!(!irrigation_needed(9.999, 10.0));
    }

    #[test]
    fn interval_undefined_without_demand() {
        assert_eq!(irrigation_interval(10.0, 0.0), None);
        assert_eq!(irrigation_interval(10.0, -1.0), None);
        let ti = irrigation_interval(10.0, 4.0).unwrap();
        assert!((ti - 2.5).abs() < EPS);
    }
}
