use crate::error::{IrrigationError, Result};
use crate::models::{CropProfile, CropTable, GrowthStage, ScheduleForm};
use dialoguer::{Input, Select};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_FORECAST_URL: &str = "https://api.met.no/weatherapi/locationforecast/2.0/compact";
const ENV_PREFIX: &str = "IRRISCHED";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub location: Option<LocationConfig>,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub field: FieldConfig,
    /// Extra crop coefficient rows, merged over the built-in table
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub crops: Vec<CropProfile>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeatherConfig {
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    /// Identification string MET Norway requires on every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Forwarding proxy; when set, requests are POSTed as `{url, headers}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_forecast_url() -> String {
    DEFAULT_FORECAST_URL.to_string()
}

fn default_user_agent() -> String {
    format!("irrisched/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            forecast_url: default_forecast_url(),
            user_agent: default_user_agent(),
            proxy_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Values used to pre-fill the calculator form
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FieldConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_moisture: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_capacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wilting_point: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_depth_cm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub irrigation_efficiency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_value: Option<f64>,
}

impl FieldConfig {
    pub fn to_form(&self) -> ScheduleForm {
        let text = |v: Option<f64>| v.map(|v| v.to_string());
        ScheduleForm {
            crop_type: self.crop_type.clone(),
            growth_stage: self.growth_stage.clone(),
            soil_moisture: text(self.soil_moisture),
            field_capacity: text(self.field_capacity),
            wilting_point: text(self.wilting_point),
            root_depth: text(self.root_depth_cm),
            irrigation_efficiency: text(self.irrigation_efficiency),
            p_value: text(self.p_value),
        }
    }
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(IrrigationError::Config(format!(
                "Config file not found at {:?}. Run `irrisched init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| IrrigationError::Config(format!("Failed to read config: {}", e)))?;

        tracing::debug!("Loading configuration from {}", config_path.display());
        Self::from_yaml(&config_str)
    }

    /// Parse YAML text, substituting `${VAR}` placeholders and layering
    /// `IRRISCHED__SECTION__KEY` environment overrides on top
    pub fn from_yaml(content: &str) -> Result<Self> {
        Self::layered(content, Self::environment())
    }

    fn environment() -> ::config::Environment {
        ::config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    fn layered(content: &str, environment: ::config::Environment) -> Result<Self> {
        let content = Self::substitute_env_vars(content);

        let settings = ::config::Config::builder()
            .add_source(::config::File::from_str(&content, ::config::FileFormat::Yaml))
            .add_source(environment)
            .build()
            .map_err(|e| IrrigationError::Config(format!("Failed to parse config: {}", e)))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| IrrigationError::Config(format!("Failed to parse config: {}", e)))?;

        config.crop_table()?;
        Ok(config)
    }

    /// Built-in crop coefficients merged with the configured extras
    pub fn crop_table(&self) -> Result<CropTable> {
        CropTable::with_extra(&self.crops)
            .map_err(|e| IrrigationError::Config(format!("Invalid crop table: {}", e)))
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("irrisched").join("config.yaml");
            if xdg_config.exists() {
                return Ok(xdg_config);
            }
        }

        Self::default_config_path()
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/irrisched/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| IrrigationError::Config("Cannot determine config directory".into()))?
            .join("irrisched");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive(config_override: Option<PathBuf>) -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up irrisched!");
        println!();

        // --- Location ---
        println!("Field Location");
        let latitude: f64 = Input::new()
            .with_prompt("  Latitude")
            .default(41.5868)
            .validate_with(|v: &f64| {
                if (-90.0..=90.0).contains(v) {
                    Ok(())
                } else {
                    Err("latitude must be between -90 and 90")
                }
            })
            .interact_text()
            .map_err(|e| IrrigationError::Config(format!("Input error: {}", e)))?;

        let longitude: f64 = Input::new()
            .with_prompt("  Longitude")
            .default(-93.625)
            .validate_with(|v: &f64| {
                if (-180.0..=180.0).contains(v) {
                    Ok(())
                } else {
                    Err("longitude must be between -180 and 180")
                }
            })
            .interact_text()
            .map_err(|e| IrrigationError::Config(format!("Input error: {}", e)))?;

        println!();

        // --- Weather API ---
        println!("Weather (MET Norway)");
        let contact: String = Input::new()
            .with_prompt("  Contact for User-Agent (email or URL, blank to skip)")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| IrrigationError::Config(format!("Input error: {}", e)))?;

        let proxy_url: String = Input::new()
            .with_prompt("  Forwarding proxy URL (blank for direct requests)")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| IrrigationError::Config(format!("Input error: {}", e)))?;

        println!();

        // --- Field defaults ---
        println!("Field Defaults");
        let crops = CropTable::builtin();
        let crop_names = crops.names();
        let crop_index = Select::new()
            .with_prompt("  Crop")
            .items(&crop_names)
            .default(0)
            .interact()
            .map_err(|e| IrrigationError::Config(format!("Input error: {}", e)))?;

        let stage_labels: Vec<&str> = GrowthStage::all().iter().map(|s| s.label()).collect();
        let stage_index = Select::new()
            .with_prompt("  Growth stage")
            .items(&stage_labels)
            .default(0)
            .interact()
            .map_err(|e| IrrigationError::Config(format!("Input error: {}", e)))?;

        let irrigation_efficiency: f64 = Input::new()
            .with_prompt("  Irrigation efficiency (0-1)")
            .default(0.75)
            .interact_text()
            .map_err(|e| IrrigationError::Config(format!("Input error: {}", e)))?;

        println!();

        let user_agent = if contact.trim().is_empty() {
            default_user_agent()
        } else {
            format!("{} ({})", default_user_agent(), contact.trim())
        };

        let config = Config {
            location: Some(LocationConfig {
                latitude,
                longitude,
            }),
            weather: WeatherConfig {
                user_agent,
                proxy_url: Some(proxy_url.trim().to_string()).filter(|p| !p.is_empty()),
                ..WeatherConfig::default()
            },
            field: FieldConfig {
                crop_type: crop_names.get(crop_index).map(|c| c.to_string()),
                growth_stage: GrowthStage::all()
                    .get(stage_index)
                    .map(|s| s.as_str().to_string()),
                irrigation_efficiency: Some(irrigation_efficiency),
                p_value: Some(0.5),
                ..FieldConfig::default()
            },
            crops: Vec::new(),
        };

        let config_path = match config_override {
            Some(p) => p,
            None => Self::default_config_path()?,
        };
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| IrrigationError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# irrisched Configuration\n# Generated by `irrisched init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        // Find all ${VAR_NAME} patterns and substitute
        let Ok(re) = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") else {
            return result;
        };

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }
}
