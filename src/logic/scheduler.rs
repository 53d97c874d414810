use super::calculations::{
    available_water_capacity, crop_evapotranspiration, effective_rainfall, gross_irrigation,
    irrigation_interval, irrigation_needed, net_irrigation, readily_available_water,
    soil_moisture_deficit,
};
use crate::error::{IrrigationError, Result};
use crate::models::{CropTable, DerivedClimate, IrrigationResult, ScheduleForm, ScheduleRequest};

/// Turns crop, soil and climate inputs into an irrigation schedule.
/// Holds only the immutable crop table; every calculation is pure.
#[derive(Debug, Clone, Default)]
pub struct IrrigationScheduler {
    crops: CropTable,
}

impl IrrigationScheduler {
    pub fn new(crops: CropTable) -> Self {
        Self { crops }
    }

    /// Validate raw form input, then calculate
    pub fn calculate_form(
        &self,
        form: &ScheduleForm,
        climate: Option<&DerivedClimate>,
    ) -> Result<IrrigationResult> {
        let (request, climate) = form.validate(climate)?;
        self.calculate(&request, &climate)
    }

    pub fn calculate(
        &self,
        request: &ScheduleRequest,
        climate: &DerivedClimate,
    ) -> Result<IrrigationResult> {
        let (growth_stage, kc) = self
            .crops
            .coefficient(&request.crop_type, &request.growth_stage)?;

        let soil = &request.soil;
        if soil.irrigation_efficiency <= 0.0 {
            return Err(IrrigationError::DivisionByZero("irrigation efficiency"));
        }
        for warning in soil.warnings() {
            tracing::warn!("Suspect soil input: {}", warning);
        }

        let etc = crop_evapotranspiration(climate.et0_mm_day, kc);
        let pe = effective_rainfall(climate.precipitation_mm);
        let ir = net_irrigation(etc, pe);
        let ig = gross_irrigation(ir, soil.irrigation_efficiency);
        let awc =
            available_water_capacity(soil.field_capacity, soil.wilting_point, soil.root_depth_cm);
        let raw = readily_available_water(soil.p_value, awc);
        let smd =
            soil_moisture_deficit(soil.field_capacity, soil.soil_moisture, soil.root_depth_cm);
        let ti = irrigation_interval(raw, etc);

        if ti.is_none() {
            tracing::debug!("ETc is {:.4} mm/day; irrigation interval undefined", etc);
        }

        let result = IrrigationResult {
            crop_type: request.crop_type.trim().to_lowercase(),
            growth_stage,
            kc,
            etc_mm_day: etc,
            effective_rainfall_mm: pe,
            net_irrigation_mm: ir,
            gross_irrigation_mm: ig,
            available_water_mm: awc,
            readily_available_mm: raw,
            soil_moisture_deficit_mm: smd,
            interval_days: ti,
            irrigation_needed: irrigation_needed(smd, raw),
        };

        tracing::info!(
            crop = %result.crop_type,
            stage = %result.growth_stage,
            needed = result.irrigation_needed,
            "Irrigation schedule calculated"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GrowthStage, SoilProfile};

    const EPS: f64 = 1e-9;

    fn request(crop: &str, stage: &str) -> ScheduleRequest {
        ScheduleRequest {
            crop_type: crop.into(),
            growth_stage: stage.into(),
            soil: SoilProfile {
                soil_moisture: 18.0,
                field_capacity: 30.0,
                wilting_point: 10.0,
                root_depth_cm: 100.0,
                irrigation_efficiency: 0.8,
                p_value: 0.5,
            },
        }
    }

    fn climate() -> DerivedClimate {
        DerivedClimate {
            et0_mm_day: 5.0,
            precipitation_mm: 3.0,
        }
    }

    #[test]
    fn corn_mid_season_schedule() {
        let scheduler = IrrigationScheduler::default();
        let result = scheduler
            .calculate(&request("corn", "mid-season"), &climate())
            .unwrap();

        assert_eq!(result.growth_stage, GrowthStage::MidSeason);
        assert_eq!(result.kc, 1.2);
        assert!((result.etc_mm_day - 6.0).abs() < EPS);
        assert!((result.effective_rainfall_mm - 2.4).abs() < EPS);
        assert!((result.net_irrigation_mm - 3.6).abs() < EPS);
        assert!((result.gross_irrigation_mm - 4.5).abs() < EPS);
        assert!((result.available_water_mm - 20.0).abs() < EPS);
        assert!((result.readily_available_mm - 10.0).abs() < EPS);
        assert!((result.soil_moisture_deficit_mm - 12.0).abs() < EPS);
        assert!((result.interval_days.unwrap() - 10.0 / 6.0).abs() < EPS);
        assert!(result.irrigation_needed);
    }

    #[test]
    fn kc_independent_of_weather_and_soil() {
        let scheduler = IrrigationScheduler::default();
        let dry = DerivedClimate {
            et0_mm_day: 0.5,
            precipitation_mm: 0.0,
        };
        let mut wet_soil = request("wheat", "late-season");
        wet_soil.soil.soil_moisture = 29.0;

        let a = scheduler
            .calculate(&request("wheat", "late-season"), &climate())
            .unwrap();
        let b = scheduler.calculate(&wet_soil, &dry).unwrap();
        assert_eq!(a.kc, 0.25);
        assert_eq!(b.kc, 0.25);
        assert!(!b.irrigation_needed);
    }

    #[test]
    fn deficit_equal_to_raw_needs_irrigation() {
        let scheduler = IrrigationScheduler::default();
        let mut req = request("soybean", "initial");
        // SMD = (30 - 20) * 100 / 100 = 10 = RAW
        req.soil.soil_moisture = 20.0;
        let result = scheduler.calculate(&req, &climate()).unwrap();
        assert!((result.soil_moisture_deficit_mm - result.readily_available_mm).abs() < EPS);
        assert!(result.irrigation_needed);
    }

    #[test]
    fn repeated_calculation_is_identical() {
        let scheduler = IrrigationScheduler::default();
        let req = request("corn", "development");
        let first = scheduler.calculate(&req, &climate()).unwrap();
        let second = scheduler.calculate(&req, &climate()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn zero_efficiency_rejected() {
        let scheduler = IrrigationScheduler::default();
        let mut req = request("corn", "initial");
        req.soil.irrigation_efficiency = 0.0;
        assert!(matches!(
            scheduler.calculate(&req, &climate()),
            Err(IrrigationError::DivisionByZero("irrigation efficiency"))
        ));
    }

    #[test]
    fn zero_et0_leaves_interval_undefined() {
        let scheduler = IrrigationScheduler::default();
        let still = DerivedClimate {
            et0_mm_day: 0.0,
            precipitation_mm: 0.0,
        };
        let result = scheduler
            .calculate(&request("corn", "initial"), &still)
            .unwrap();
        assert_eq!(result.interval_days, None);
        assert!(result.irrigation_needed);
    }

    #[test]
    fn lookup_failure_before_computation() {
        let scheduler = IrrigationScheduler::default();
        let mut req = request("rice", "mid-season");
        req.soil.irrigation_efficiency = 0.0;
        // Lookup is checked before the efficiency guard
        assert!(matches!(
            scheduler.calculate(&req, &climate()),
            Err(IrrigationError::UnknownCrop(_))
        ));
        assert!(matches!(
            scheduler.calculate(&request("corn", "ripening"), &climate()),
            Err(IrrigationError::UnknownGrowthStage(_))
        ));
    }

    #[test]
    fn form_without_growth_stage_produces_no_result() {
        let scheduler = IrrigationScheduler::default();
        let form = ScheduleForm {
            crop_type: Some("corn".into()),
            growth_stage: None,
            soil_moisture: Some("18".into()),
            field_capacity: Some("30".into()),
            wilting_point: Some("10".into()),
            root_depth: Some("100".into()),
            irrigation_efficiency: Some("0.8".into()),
            p_value: Some("0.5".into()),
        };
        assert!(matches!(
            scheduler.calculate_form(&form, Some(&climate())),
            Err(IrrigationError::IncompleteInput(_))
        ));

        let complete = ScheduleForm {
            growth_stage: Some("mid-season".into()),
            ..form
        };
        let result = scheduler
            .calculate_form(&complete, Some(&climate()))
            .unwrap();
        assert!((result.gross_irrigation_mm - 4.5).abs() < EPS);
    }
}
