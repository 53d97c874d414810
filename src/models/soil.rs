use serde::{Deserialize, Serialize};

/// Root-zone soil state and irrigation system parameters for one calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilProfile {
    /// Current volumetric soil moisture (%)
    pub soil_moisture: f64,
    /// Volumetric water content at field capacity (%)
    pub field_capacity: f64,
    /// Volumetric water content at the permanent wilting point (%)
    pub wilting_point: f64,
    /// Effective root depth (cm)
    pub root_depth_cm: f64,
    /// Irrigation system application efficiency (0-1)
    pub irrigation_efficiency: f64,
    /// Allowable depletion fraction (0-1)
    pub p_value: f64,
}

impl SoilProfile {
    /// Out-of-range values that still compute but are agronomically suspect
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.irrigation_efficiency > 1.0 {
            warnings.push(format!(
                "irrigation efficiency {} is above 1.0",
                self.irrigation_efficiency
            ));
        }
        if self.p_value <= 0.0 || self.p_value > 1.0 {
            warnings.push(format!(
                "depletion fraction {} is outside (0, 1]",
                self.p_value
            ));
        }
        if self.wilting_point >= self.field_capacity {
            warnings.push(format!(
                "wilting point {}% is not below field capacity {}%",
                self.wilting_point, self.field_capacity
            ));
        }
        if self.root_depth_cm <= 0.0 {
            warnings.push(format!(
                "root depth {} cm is not positive",
                self.root_depth_cm
            ));
        }

        warnings
    }
}
