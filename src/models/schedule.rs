use super::{DerivedClimate, GrowthStage, SoilProfile};
use crate::error::{IrrigationError, Result};
use serde::{Deserialize, Serialize};

/// Raw scheduler input as typed by the user; blank fields count as missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleForm {
    pub crop_type: Option<String>,
    pub growth_stage: Option<String>,
    pub soil_moisture: Option<String>,
    pub field_capacity: Option<String>,
    pub wilting_point: Option<String>,
    pub root_depth: Option<String>,
    pub irrigation_efficiency: Option<String>,
    pub p_value: Option<String>,
}

/// Validated scheduler input
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRequest {
    pub crop_type: String,
    pub growth_stage: String,
    pub soil: SoilProfile,
}

impl ScheduleForm {
    /// Check that every field is present and numeric, and that weather data
    /// has been fetched. All offending fields are reported together.
    pub fn validate(
        &self,
        climate: Option<&DerivedClimate>,
    ) -> Result<(ScheduleRequest, DerivedClimate)> {
        let mut missing = Vec::new();

        let crop_type = text_field(&self.crop_type, "crop type", &mut missing);
        let growth_stage = text_field(&self.growth_stage, "growth stage", &mut missing);
        let soil_moisture = numeric_field(&self.soil_moisture, "soil moisture", &mut missing);
        let field_capacity = numeric_field(&self.field_capacity, "field capacity", &mut missing);
        let wilting_point = numeric_field(&self.wilting_point, "wilting point", &mut missing);
        let root_depth = numeric_field(&self.root_depth, "root depth", &mut missing);
        let irrigation_efficiency = numeric_field(
            &self.irrigation_efficiency,
            "irrigation efficiency",
            &mut missing,
        );
        let p_value = numeric_field(&self.p_value, "depletion fraction", &mut missing);

        let climate = climate
            .filter(|c| c.et0_mm_day.is_finite() && c.precipitation_mm.is_finite())
            .copied();
        if climate.is_none() {
            missing.push("weather data");
        }

        let (
            Some(crop_type),
            Some(growth_stage),
            Some(soil_moisture),
            Some(field_capacity),
            Some(wilting_point),
            Some(root_depth_cm),
            Some(irrigation_efficiency),
            Some(p_value),
            Some(climate),
        ) = (
            crop_type,
            growth_stage,
            soil_moisture,
            field_capacity,
            wilting_point,
            root_depth,
            irrigation_efficiency,
            p_value,
            climate,
        )
        else {
            return Err(IrrigationError::IncompleteInput(missing));
        };

        let request = ScheduleRequest {
            crop_type,
            growth_stage,
            soil: SoilProfile {
                soil_moisture,
                field_capacity,
                wilting_point,
                root_depth_cm,
                irrigation_efficiency,
                p_value,
            },
        };

        Ok((request, climate))
    }
}

fn text_field(
    value: &Option<String>,
    name: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Some(v.to_string()),
        _ => {
            missing.push(name);
            None
        }
    }
}

fn numeric_field(
    value: &Option<String>,
    name: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<f64> {
    let parsed = value
        .as_deref()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite());
    if parsed.is_none() {
        missing.push(name);
    }
    parsed
}

/// Irrigation schedule for one crop, growth stage and soil state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationResult {
    pub crop_type: String,
    pub growth_stage: GrowthStage,
    pub kc: f64,
    /// Crop evapotranspiration (mm/day)
    pub etc_mm_day: f64,
    /// Effective rainfall (mm)
    pub effective_rainfall_mm: f64,
    /// Net irrigation requirement (mm); negative when rain exceeds demand
    pub net_irrigation_mm: f64,
    /// Gross irrigation requirement (mm)
    pub gross_irrigation_mm: f64,
    /// Available water capacity over the root zone (mm)
    pub available_water_mm: f64,
    /// Readily available water (mm)
    pub readily_available_mm: f64,
    /// Soil moisture deficit (mm)
    pub soil_moisture_deficit_mm: f64,
    /// Days until RAW is depleted; None when ETc is not positive
    pub interval_days: Option<f64>,
    pub irrigation_needed: bool,
}

impl IrrigationResult {
    pub fn summary_lines(&self) -> Vec<(&'static str, String)> {
        let interval = self
            .interval_days
            .map(|t| format!("{:.2} days", t))
            .unwrap_or_else(|| "n/a (no crop water demand)".to_string());

        vec![
            ("Crop Coefficient (Kc)", format!("{:.2}", self.kc)),
            (
                "Crop Evapotranspiration (ETc)",
                format!("{:.2} mm/day", self.etc_mm_day),
            ),
            (
                "Effective Rainfall (Pe)",
                format!("{:.2} mm/day", self.effective_rainfall_mm),
            ),
            (
                "Net Irrigation Requirement (Ir)",
                format!("{:.2} mm/day", self.net_irrigation_mm),
            ),
            (
                "Gross Irrigation Requirement (Ig)",
                format!("{:.2} mm/day", self.gross_irrigation_mm),
            ),
            (
                "Available Water Capacity (AWC)",
                format!("{:.2} mm", self.available_water_mm),
            ),
            (
                "Readily Available Water (RAW)",
                format!("{:.2} mm", self.readily_available_mm),
            ),
            (
                "Soil Moisture Deficit (SMD)",
                format!("{:.2} mm", self.soil_moisture_deficit_mm),
            ),
            ("Irrigation Interval (Ti)", interval),
            (
                "Irrigation Needed Now",
                if self.irrigation_needed { "Yes" } else { "No" }.to_string(),
            ),
        ]
    }
}
