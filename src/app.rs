use crate::config::Config;
use crate::error::{IrrigationError, Result};
use crate::logic::IrrigationScheduler;
use crate::models::{DerivedClimate, GrowthStage, IrrigationResult, ScheduleForm, WeatherReport};
use crate::ui::screens::FormField;

pub struct FormState {
    pub focused_field: FormField,
    pub editing: bool,
    pub edit_buffer: String,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            focused_field: FormField::CropType,
            editing: false,
            edit_buffer: String::new(),
        }
    }

    pub fn next_field(&mut self) {
        self.focused_field = self.focused_field.next();
    }

    pub fn prev_field(&mut self) {
        self.focused_field = self.focused_field.prev();
    }

    pub fn start_editing(&mut self, current_value: &str) {
        self.editing = true;
        self.edit_buffer = current_value.to_string();
    }

    pub fn cancel_editing(&mut self) {
        self.editing = false;
        self.edit_buffer.clear();
    }

    pub fn finish_editing(&mut self) -> String {
        self.editing = false;
        std::mem::take(&mut self.edit_buffer)
    }
}

pub struct App {
    pub should_quit: bool,
    pub scheduler: IrrigationScheduler,
    pub crop_names: Vec<String>,

    // Inputs
    pub form: ScheduleForm,
    pub form_state: FormState,
    pub weather: Option<WeatherReport>,

    // Output of the last calculation
    pub result: Option<IrrigationResult>,

    // UI state
    pub status_message: Option<String>,
    pub fetching: bool,
    pub needs_fetch: bool,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let crops = config.crop_table()?;
        let crop_names = crops.names().into_iter().map(String::from).collect();
        let form = config.field.to_form();

        Ok(Self {
            should_quit: false,
            scheduler: IrrigationScheduler::new(crops),
            crop_names,
            form,
            form_state: FormState::new(),
            weather: None,
            result: None,
            status_message: None,
            fetching: false,
            needs_fetch: false,
        })
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
    }

    pub fn request_fetch(&mut self) {
        self.needs_fetch = true;
        self.set_status("Fetching weather data...");
    }

    /// New weather invalidates any schedule computed from the old climate
    pub fn update_weather(&mut self, report: WeatherReport) {
        self.weather = Some(report);
        self.result = None;
        self.set_status("Weather updated - press c to recalculate");
    }

    pub fn weather_failed(&mut self, error: &IrrigationError) {
        self.set_status(&format!("Weather fetch failed: {}", error));
    }

    pub fn climate(&self) -> Option<&DerivedClimate> {
        self.weather.as_ref().map(|w| &w.climate)
    }

    pub fn calculate(&mut self) {
        match self.scheduler.calculate_form(&self.form, self.climate()) {
            Ok(result) => {
                let status = if result.irrigation_needed {
                    format!("Irrigate now: {:.2} mm gross", result.gross_irrigation_mm)
                } else {
                    "No irrigation needed yet".to_string()
                };
                self.result = Some(result);
                self.set_status(&status);
            }
            Err(e) => {
                self.result = None;
                self.set_status(&e.to_string());
            }
        }
    }

    pub fn clear_form(&mut self) {
        self.form = ScheduleForm::default();
        self.form_state.cancel_editing();
        self.result = None;
        self.set_status("Form cleared");
    }

    pub fn crop_options(&self) -> Vec<&str> {
        self.crop_names.iter().map(String::as_str).collect()
    }

    pub fn focused_value(&self) -> &str {
        self.form_state
            .focused_field
            .value(&self.form)
            .unwrap_or_default()
    }

    pub fn start_editing(&mut self) {
        if self.form_state.focused_field.is_select() {
            return;
        }
        let current = self.focused_value().to_string();
        self.form_state.start_editing(&current);
    }

    pub fn finish_editing(&mut self) {
        let value = self.form_state.finish_editing();
        self.set_field(self.form_state.focused_field, Some(value));
    }

    /// Step a select field through its options; text fields are left alone
    pub fn cycle_select(&mut self, forward: bool) {
        let field = self.form_state.focused_field;
        let options: Vec<String> = match field {
            FormField::CropType => self.crop_names.clone(),
            FormField::GrowthStage => GrowthStage::all()
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
            _ => return,
        };
        if options.is_empty() {
            return;
        }

        let current = field.value(&self.form).and_then(|v| match field {
            FormField::GrowthStage => GrowthStage::from_str(v)
                .and_then(|s| options.iter().position(|o| o == s.as_str())),
            _ => options.iter().position(|o| o.eq_ignore_ascii_case(v.trim())),
        });

        let last = options.len() - 1;
        let index = match (current, forward) {
            (None, true) => 0,
            (None, false) => last,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(i), false) => i.checked_sub(1).unwrap_or(last),
        };

        self.set_field(field, options.get(index).cloned());
    }

    fn set_field(&mut self, field: FormField, value: Option<String>) {
        field.set_value(&mut self.form, value);
        self.result = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldConfig;
    use crate::models::{Coordinates, WeatherSample};
    use chrono::Utc;

    fn report(et0: f64, precipitation: f64) -> WeatherReport {
        WeatherReport {
            sample: WeatherSample {
                coordinates: Coordinates::new(41.5868, -93.625).unwrap(),
                forecast_time: None,
                fetched_at: Utc::now(),
                air_temperature_c: 25.0,
                relative_humidity_percent: 50.0,
                wind_speed_ms: 2.0,
                precipitation_mm: precipitation,
            },
            climate: DerivedClimate {
                et0_mm_day: et0,
                precipitation_mm: precipitation,
            },
        }
    }

    fn configured_app() -> App {
        let config = Config {
            field: FieldConfig {
                crop_type: Some("corn".into()),
                growth_stage: Some("mid-season".into()),
                soil_moisture: Some(18.0),
                field_capacity: Some(30.0),
                wilting_point: Some(10.0),
                root_depth_cm: Some(100.0),
                irrigation_efficiency: Some(0.8),
                p_value: Some(0.5),
            },
            ..Config::default()
        };
        App::new(&config).unwrap()
    }

    #[test]
    fn form_prefilled_from_config() {
        let app = configured_app();
        assert_eq!(app.form.crop_type.as_deref(), Some("corn"));
        assert_eq!(app.form.root_depth.as_deref(), Some("100"));
        assert_eq!(app.crop_names, vec!["corn", "soybean", "wheat"]);
    }

    #[test]
    fn calculate_without_weather_reports_incomplete() {
        let mut app = configured_app();
        app.calculate();
        assert!(app.result.is_none());
        assert!(app
            .status_message
            .as_deref()
            .unwrap()
            .starts_with("Please fill in all fields"));
    }

    #[test]
    fn calculate_after_weather_update() {
        let mut app = configured_app();
        app.update_weather(report(5.0, 3.0));
        app.calculate();

        let result = app.result.as_ref().unwrap();
        assert!((result.etc_mm_day - 6.0).abs() < 1e-9);
        assert!(result.irrigation_needed);
        assert!(app.status_message.as_deref().unwrap().starts_with("Irrigate now"));

        // Fresh weather drops the stale schedule
        app.update_weather(report(4.0, 0.0));
        assert!(app.result.is_none());
    }

    #[test]
    fn failed_calculation_clears_previous_result() {
        let mut app = configured_app();
        app.update_weather(report(5.0, 3.0));
        app.calculate();
        assert!(app.result.is_some());

        app.form.irrigation_efficiency = Some("0".into());
        app.calculate();
        assert!(app.result.is_none());
        assert!(app
            .status_message
            .as_deref()
            .unwrap()
            .contains("irrigation efficiency"));
    }

    #[test]
    fn weather_failed_keeps_previous_climate() {
        let mut app = configured_app();
        app.update_weather(report(5.0, 3.0));

        app.weather_failed(&IrrigationError::DataSourceUnavailable(
            "MET Norway returned 503 Service Unavailable".into(),
        ));
        assert!(app
            .status_message
            .as_deref()
            .unwrap()
            .starts_with("Weather fetch failed"));
        assert_eq!(app.climate().map(|c| c.et0_mm_day), Some(5.0));

        app.calculate();
        assert!(app.result.is_some());
    }

    #[test]
    fn cycle_select_wraps_through_options() {
        let mut app = App::new(&Config::default()).unwrap();
        assert!(app.form.crop_type.is_none());

        app.cycle_select(true);
        assert_eq!(app.form.crop_type.as_deref(), Some("corn"));
        app.cycle_select(false);
        assert_eq!(app.form.crop_type.as_deref(), Some("wheat"));

        app.form_state.next_field();
        app.cycle_select(false);
        assert_eq!(app.form.growth_stage.as_deref(), Some("late-season"));
        app.cycle_select(true);
        assert_eq!(app.form.growth_stage.as_deref(), Some("initial"));
    }

    #[test]
    fn editing_text_field() {
        let mut app = configured_app();
        app.form_state.focused_field = FormField::SoilMoisture;

        app.start_editing();
        assert!(app.form_state.editing);
        assert_eq!(app.form_state.edit_buffer, "18");

        app.form_state.edit_buffer = "22.5".into();
        app.finish_editing();
        assert!(!app.form_state.editing);
        assert_eq!(app.form.soil_moisture.as_deref(), Some("22.5"));
    }

    #[test]
    fn select_fields_are_not_text_edited() {
        let mut app = configured_app();
        app.start_editing();
        assert!(!app.form_state.editing);
    }

    #[test]
    fn clear_form_empties_inputs() {
        let mut app = configured_app();
        app.update_weather(report(5.0, 3.0));
        app.clear_form();
        assert_eq!(app.form, ScheduleForm::default());
        assert!(app.weather.is_some());
    }
}
