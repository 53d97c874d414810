use crate::models::ScheduleForm;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "irrisched",
    version,
    about = "Irrigation scheduling calculator"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Re-run interactive setup
    Init,
    /// Validate config and test the weather connection
    Check,
    /// List crops and their coefficients
    Crops,
    /// Fetch current weather and estimate ET0
    Weather {
        #[command(flatten)]
        location: LocationArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Calculate an irrigation schedule
    Schedule(ScheduleArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct LocationArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ScheduleArgs {
    /// Crop type (see `irrisched crops`)
    #[arg(long)]
    pub crop: Option<String>,

    /// Growth stage: initial, development, mid-season, late-season
    #[arg(long)]
    pub stage: Option<String>,

    /// Current soil moisture (% volumetric)
    #[arg(long)]
    pub soil_moisture: Option<String>,

    /// Field capacity (% volumetric)
    #[arg(long)]
    pub field_capacity: Option<String>,

    /// Wilting point (% volumetric)
    #[arg(long)]
    pub wilting_point: Option<String>,

    /// Root depth (cm)
    #[arg(long)]
    pub root_depth: Option<String>,

    /// Irrigation system efficiency (0-1)
    #[arg(long)]
    pub efficiency: Option<String>,

    /// Allowable depletion fraction (0-1)
    #[arg(long)]
    pub p_value: Option<String>,

    /// Use this ET0 (mm/day) instead of fetching weather
    #[arg(long, requires = "precipitation")]
    pub et0: Option<f64>,

    /// Forecast precipitation (mm) to pair with --et0
    #[arg(long, requires = "et0")]
    pub precipitation: Option<f64>,

    #[command(flatten)]
    pub location: LocationArgs,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl ScheduleArgs {
    /// Flags given on the command line win over the configured field defaults
    pub fn to_form(&self, defaults: ScheduleForm) -> ScheduleForm {
        ScheduleForm {
            crop_type: self.crop.clone().or(defaults.crop_type),
            growth_stage: self.stage.clone().or(defaults.growth_stage),
            soil_moisture: self.soil_moisture.clone().or(defaults.soil_moisture),
            field_capacity: self.field_capacity.clone().or(defaults.field_capacity),
            wilting_point: self.wilting_point.clone().or(defaults.wilting_point),
            root_depth: self.root_depth.clone().or(defaults.root_depth),
            irrigation_efficiency: self.efficiency.clone().or(defaults.irrigation_efficiency),
            p_value: self.p_value.clone().or(defaults.p_value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_schedule_with_climate() {
        let cli = Cli::try_parse_from([
            "irrisched",
            "schedule",
            "--crop",
            "corn",
            "--stage",
            "mid-season",
            "--et0",
            "5.0",
            "--precipitation",
            "3.0",
            "--lat",
            "-33.8688",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Schedule(args)) => {
                assert_eq!(args.crop.as_deref(), Some("corn"));
                assert_eq!(args.et0, Some(5.0));
                assert_eq!(args.location.lat, Some(-33.8688));
                assert!(args.soil_moisture.is_none());
            }
            _ => panic!("expected schedule command"),
        }
    }

    #[test]
    fn et0_requires_precipitation() {
        assert!(Cli::try_parse_from(["irrisched", "schedule", "--et0", "5.0"]).is_err());
    }

    #[test]
    fn flags_override_configured_defaults() {
        let args = ScheduleArgs {
            crop: Some("wheat".into()),
            soil_moisture: Some("21".into()),
            ..ScheduleArgs::default()
        };
        let defaults = ScheduleForm {
            crop_type: Some("corn".into()),
            growth_stage: Some("initial".into()),
            soil_moisture: Some("18".into()),
            ..ScheduleForm::default()
        };

        let form = args.to_form(defaults);
        assert_eq!(form.crop_type.as_deref(), Some("wheat"));
        assert_eq!(form.growth_stage.as_deref(), Some("initial"));
        assert_eq!(form.soil_moisture.as_deref(), Some("21"));
        assert!(form.root_depth.is_none());
    }
}
