use crate::models::{GrowthStage, IrrigationResult, ScheduleForm, WeatherReport};
use crate::ui::components::{depletion_gauge, InputWidget, SelectWidget};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    CropType,
    GrowthStage,
    SoilMoisture,
    FieldCapacity,
    WiltingPoint,
    RootDepth,
    IrrigationEfficiency,
    PValue,
}

impl FormField {
    pub fn all() -> &'static [FormField] {
        &[
            FormField::CropType,
            FormField::GrowthStage,
            FormField::SoilMoisture,
            FormField::FieldCapacity,
            FormField::WiltingPoint,
            FormField::RootDepth,
            FormField::IrrigationEfficiency,
            FormField::PValue,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::CropType => "Crop Type",
            FormField::GrowthStage => "Growth Stage",
            FormField::SoilMoisture => "Soil Moisture (%)",
            FormField::FieldCapacity => "Field Capacity (%)",
            FormField::WiltingPoint => "Wilting Point (%)",
            FormField::RootDepth => "Root Depth (cm)",
            FormField::IrrigationEfficiency => "Irrigation Efficiency (0-1)",
            FormField::PValue => "Depletion Fraction p (0-1)",
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            FormField::CropType => "Use ←/→ to choose a crop from the coefficient table",
            FormField::GrowthStage => {
                "Use ←/→ to choose initial, development, mid-season or late-season"
            }
            FormField::SoilMoisture => "Current volumetric soil moisture in the root zone",
            FormField::FieldCapacity => "Volumetric water content the soil holds after drainage",
            FormField::WiltingPoint => {
                "Volumetric water content at which plants can no longer extract water"
            }
            FormField::RootDepth => "Effective rooting depth of the crop in centimetres",
            FormField::IrrigationEfficiency => {
                "Share of applied water reaching the root zone (e.g. 0.75 sprinkler, 0.9 drip)"
            }
            FormField::PValue => {
                "Fraction of available water that can be depleted before stress (typically 0.5)"
            }
        }
    }

    pub fn is_select(&self) -> bool {
        matches!(self, FormField::CropType | FormField::GrowthStage)
    }

    pub fn next(&self) -> Self {
        match self {
            FormField::CropType => FormField::GrowthStage,
            FormField::GrowthStage => FormField::SoilMoisture,
            FormField::SoilMoisture => FormField::FieldCapacity,
            FormField::FieldCapacity => FormField::WiltingPoint,
            FormField::WiltingPoint => FormField::RootDepth,
            FormField::RootDepth => FormField::IrrigationEfficiency,
            FormField::IrrigationEfficiency => FormField::PValue,
            FormField::PValue => FormField::CropType,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            FormField::CropType => FormField::PValue,
            FormField::GrowthStage => FormField::CropType,
            FormField::SoilMoisture => FormField::GrowthStage,
            FormField::FieldCapacity => FormField::SoilMoisture,
            FormField::WiltingPoint => FormField::FieldCapacity,
            FormField::RootDepth => FormField::WiltingPoint,
            FormField::IrrigationEfficiency => FormField::RootDepth,
            FormField::PValue => FormField::IrrigationEfficiency,
        }
    }

    /// Current raw value of this field in the form
    pub fn value<'f>(&self, form: &'f ScheduleForm) -> Option<&'f str> {
        let value = match self {
            FormField::CropType => &form.crop_type,
            FormField::GrowthStage => &form.growth_stage,
            FormField::SoilMoisture => &form.soil_moisture,
            FormField::FieldCapacity => &form.field_capacity,
            FormField::WiltingPoint => &form.wilting_point,
            FormField::RootDepth => &form.root_depth,
            FormField::IrrigationEfficiency => &form.irrigation_efficiency,
            FormField::PValue => &form.p_value,
        };
        value.as_deref()
    }

    pub fn set_value(&self, form: &mut ScheduleForm, value: Option<String>) {
        let slot = match self {
            FormField::CropType => &mut form.crop_type,
            FormField::GrowthStage => &mut form.growth_stage,
            FormField::SoilMoisture => &mut form.soil_moisture,
            FormField::FieldCapacity => &mut form.field_capacity,
            FormField::WiltingPoint => &mut form.wilting_point,
            FormField::RootDepth => &mut form.root_depth,
            FormField::IrrigationEfficiency => &mut form.irrigation_efficiency,
            FormField::PValue => &mut form.p_value,
        };
        *slot = value.filter(|v| !v.trim().is_empty());
    }
}

pub struct CalculatorScreen<'a> {
    pub form: &'a ScheduleForm,
    pub crop_options: &'a [&'a str],
    pub focused_field: FormField,
    pub editing: bool,
    pub edit_buffer: &'a str,
    pub weather: Option<&'a WeatherReport>,
    pub result: Option<&'a IrrigationResult>,
    pub status_message: Option<&'a str>,
    pub fetching: bool,
}

impl<'a> CalculatorScreen<'a> {
    pub fn new(form: &'a ScheduleForm, crop_options: &'a [&'a str]) -> Self {
        Self {
            form,
            crop_options,
            focused_field: FormField::CropType,
            editing: false,
            edit_buffer: "",
            weather: None,
            result: None,
            status_message: None,
            fetching: false,
        }
    }

    pub fn with_focus(mut self, field: FormField) -> Self {
        self.focused_field = field;
        self
    }

    pub fn editing(mut self, editing: bool, buffer: &'a str) -> Self {
        self.editing = editing;
        self.edit_buffer = buffer;
        self
    }

    pub fn with_weather(mut self, weather: Option<&'a WeatherReport>, fetching: bool) -> Self {
        self.weather = weather;
        self.fetching = fetching;
        self
    }

    pub fn with_result(mut self, result: Option<&'a IrrigationResult>) -> Self {
        self.result = result;
        self
    }

    pub fn with_status(mut self, status: Option<&'a str>) -> Self {
        self.status_message = status;
        self
    }
}

impl Widget for CalculatorScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),  // Title
                Constraint::Min(26),    // Form and results
                Constraint::Length(3),  // Help
                Constraint::Length(1),  // Status message
                Constraint::Length(1),  // Nav
            ])
            .split(area);

        let title = Line::from(vec![
            Span::styled("Irrigation Scheduler", Theme::title()),
            Span::styled(" - ET₀ from MET Norway forecast", Theme::dim()),
        ]);
        Paragraph::new(title).render(chunks[0], buf);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);

        self.render_form(body[0], buf);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(9), // Weather
                Constraint::Length(4), // Depletion gauge
                Constraint::Min(12),   // Schedule
            ])
            .split(body[1]);

        self.render_weather(right[0], buf);
        depletion_gauge(self.result).render(right[1], buf);
        self.render_schedule(right[2], buf);

        self.render_help(chunks[2], buf);

        if let Some(status) = self.status_message {
            Paragraph::new(Span::styled(status, Theme::highlight())).render(chunks[3], buf);
        }

        let nav = Line::from(vec![
            Span::styled("[↑↓]", Theme::nav_key()),
            Span::styled("Field ", Theme::nav_label()),
            Span::styled("[←→]", Theme::nav_key()),
            Span::styled("Option ", Theme::nav_label()),
            Span::styled("[Enter]", Theme::nav_key()),
            Span::styled("Edit ", Theme::nav_label()),
            Span::styled("[w]", Theme::nav_key()),
            Span::styled("Weather ", Theme::nav_label()),
            Span::styled("[c]", Theme::nav_key()),
            Span::styled("Calculate ", Theme::nav_label()),
            Span::styled("[x]", Theme::nav_key()),
            Span::styled("Clear ", Theme::nav_label()),
            Span::styled("[q]", Theme::nav_key()),
            Span::styled("Quit", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(chunks[4], buf);
    }
}

impl CalculatorScreen<'_> {
    fn render_form(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Crop & Soil")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let constraints: Vec<Constraint> = FormField::all()
            .iter()
            .map(|_| Constraint::Length(3))
            .collect();

        let field_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        let stage_options: Vec<&str> = GrowthStage::all().iter().map(|s| s.as_str()).collect();

        for (i, field) in FormField::all().iter().enumerate() {
            let is_focused = *field == self.focused_field;
            let value = field.value(self.form);

            match field {
                FormField::CropType => {
                    let selected = value.and_then(|v| {
                        self.crop_options
                            .iter()
                            .position(|c| c.eq_ignore_ascii_case(v.trim()))
                    });
                    SelectWidget::new(field.label(), self.crop_options, selected)
                        .focused(is_focused)
                        .render(field_areas[i], buf);
                }
                FormField::GrowthStage => {
                    let selected = value
                        .and_then(GrowthStage::from_str)
                        .and_then(|s| GrowthStage::all().iter().position(|g| *g == s));
                    SelectWidget::new(field.label(), &stage_options, selected)
                        .focused(is_focused)
                        .render(field_areas[i], buf);
                }
                _ => {
                    let editing = is_focused && self.editing;
                    let shown = if editing {
                        self.edit_buffer
                    } else {
                        value.unwrap_or("")
                    };
                    InputWidget::new(field.label(), shown)
                        .placeholder("required")
                        .focused(is_focused)
                        .editing(editing)
                        .render(field_areas[i], buf);
                }
            }
        }
    }

    fn render_weather(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Weather")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = match (self.weather, self.fetching) {
            (_, true) => vec![Line::from(Span::styled(
                "Fetching forecast...",
                Theme::warning(),
            ))],
            (Some(report), false) => {
                let forecast_time = report
                    .sample
                    .forecast_time
                    .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                let mut lines = vec![Line::from(vec![
                    Span::styled(report.sample.coordinates.to_string(), Theme::normal()),
                    Span::styled(format!(" @ {}", forecast_time), Theme::dim()),
                ])];
                lines.extend(
                    report
                        .summary_lines()
                        .into_iter()
                        .map(|(label, value)| labeled_line(label, value, Theme::normal())),
                );
                lines
            }
            (None, false) => vec![Line::from(Span::styled(
                "No weather data - press [w] to fetch",
                Theme::dim(),
            ))],
        };

        Paragraph::new(lines).render(inner, buf);
    }

    fn render_schedule(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Irrigation Schedule")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let Some(result) = self.result else {
            let hint = Line::from(Span::styled(
                "Fill in every field, fetch weather, then press [c]",
                Theme::dim(),
            ));
            Paragraph::new(hint).render(inner, buf);
            return;
        };

        let mut lines = vec![Line::from(vec![
            Span::styled(result.crop_type.clone(), Theme::header()),
            Span::styled(format!(" ({})", result.growth_stage.label()), Theme::dim()),
        ])];

        for (label, value) in result.summary_lines() {
            let style = match label {
                "Irrigation Needed Now" if result.irrigation_needed => Theme::warning(),
                "Irrigation Needed Now" => Theme::success(),
                "Soil Moisture Deficit (SMD)" => Style::default().fg(Theme::deficit_color(
                    result.soil_moisture_deficit_mm,
                    result.readily_available_mm,
                )),
                _ => Theme::normal(),
            };
            lines.push(labeled_line(label, value, style));
        }

        Paragraph::new(lines).render(inner, buf);
    }

    fn render_help(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.focused_field.label())
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(Span::styled(self.focused_field.help(), Theme::dim()))
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

fn labeled_line(label: &str, value: String, value_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Theme::dim()),
        Span::styled(value, value_style),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_cycle_visits_every_field() {
        let mut field = FormField::CropType;
        for _ in 0..FormField::all().len() {
            field = field.next();
        }
        assert_eq!(field, FormField::CropType);

        for f in FormField::all() {
            assert_eq!(f.next().prev(), *f);
        }
    }

    #[test]
    fn set_value_treats_blank_as_missing() {
        let mut form = ScheduleForm::default();
        FormField::RootDepth.set_value(&mut form, Some("100".into()));
        assert_eq!(FormField::RootDepth.value(&form), Some("100"));

        FormField::RootDepth.set_value(&mut form, Some("  ".into()));
        assert_eq!(form.root_depth, None);
    }

    #[test]
    fn renders_empty_form() {
        let form = ScheduleForm::default();
        let crops = ["corn", "soybean", "wheat"];
        let area = Rect::new(0, 0, 100, 40);
        let mut buf = Buffer::empty(area);

        CalculatorScreen::new(&form, &crops)
            .with_status(Some("Ready"))
            .render(area, &mut buf);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Irrigation Scheduler"));
        assert!(text.contains("-- select --"));
        assert!(text.contains("No weather data"));
    }
}
