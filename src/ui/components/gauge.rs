use crate::models::IrrigationResult;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub struct GaugeWidget<'a> {
    title: &'a str,
    value: Option<f64>,
    unit: &'a str,
    min: f64,
    max: f64,
    thresholds: Vec<(f64, Color)>,
    precision: usize,
}

impl<'a> GaugeWidget<'a> {
    pub fn new(title: &'a str, value: Option<f64>, unit: &'a str) -> Self {
        Self {
            title,
            value,
            unit,
            min: 0.0,
            max: 100.0,
            thresholds: Vec::new(),
            precision: 2,
        }
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn thresholds(mut self, thresholds: Vec<(f64, Color)>) -> Self {
        self.thresholds = thresholds;
        self
    }

    fn get_color(&self, value: f64) -> Color {
        for (threshold, color) in self.thresholds.iter().rev() {
            if value >= *threshold {
                return *color;
            }
        }
        Theme::FG
    }

    fn ratio(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span > 0.0 {
            ((value - self.min) / span).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Widget for GaugeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 || area.width < 10 {
            return;
        }

        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        match self.value {
            Some(value) => {
                let color = self.get_color(value);
                let value_str = format!(
                    "{:.prec$}{} of {:.prec$}{}",
                    value,
                    self.unit,
                    self.max,
                    self.unit,
                    prec = self.precision
                );

                let value_line =
                    Line::from(vec![Span::styled(value_str, Style::default().fg(color))]);
                Paragraph::new(value_line).render(inner, buf);

                if inner.height >= 2 {
                    let bar_area = Rect {
                        x: inner.x,
                        y: inner.y + 1,
                        width: inner.width,
                        height: 1,
                    };

                    let filled = (bar_area.width as f64 * self.ratio(value)) as u16;

                    for x in bar_area.x..bar_area.x + bar_area.width {
                        let ch = if x < bar_area.x + filled {
                            '█'
                        } else {
                            '░'
                        };
                        buf[(x, bar_area.y)].set_char(ch).set_fg(color);
                    }
                }
            }
            None => {
                let na_line = Line::from(vec![Span::styled("N/A", Theme::dim())]);
                Paragraph::new(na_line).render(inner, buf);
            }
        }
    }
}

/// Soil moisture deficit against available water; turns dry once it reaches RAW
pub fn depletion_gauge(result: Option<&IrrigationResult>) -> GaugeWidget<'static> {
    match result {
        Some(r) => GaugeWidget::new(
            "Root Zone Depletion",
            Some(r.soil_moisture_deficit_mm),
            " mm",
        )
        .range(0.0, r.available_water_mm)
        .thresholds(vec![
            (f64::NEG_INFINITY, Theme::MOISTURE_WET),
            (f64::MIN_POSITIVE, Theme::MOISTURE_OK),
            (r.readily_available_mm, Theme::MOISTURE_DRY),
        ]),
        None => GaugeWidget::new("Root Zone Depletion", None, " mm"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GrowthStage;

    fn result(smd: f64) -> IrrigationResult {
        IrrigationResult {
            crop_type: "corn".into(),
            growth_stage: GrowthStage::MidSeason,
            kc: 1.2,
            etc_mm_day: 6.0,
            effective_rainfall_mm: 2.4,
            net_irrigation_mm: 3.6,
            gross_irrigation_mm: 4.5,
            available_water_mm: 20.0,
            readily_available_mm: 10.0,
            soil_moisture_deficit_mm: smd,
            interval_days: Some(10.0 / 6.0),
            irrigation_needed: smd >= 10.0,
        }
    }

    #[test]
    fn depletion_gauge_colors_follow_raw() {
        let r = result(12.0);
        let gauge = depletion_gauge(Some(&r));
        assert_eq!(gauge.get_color(12.0), Theme::MOISTURE_DRY);
        assert_eq!(gauge.get_color(10.0), Theme::MOISTURE_DRY);
        assert_eq!(gauge.get_color(5.0), Theme::MOISTURE_OK);
        assert_eq!(gauge.get_color(-2.0), Theme::MOISTURE_WET);
    }

    #[test]
    fn ratio_clamps_and_handles_empty_range() {
        let r = result(30.0);
        let gauge = depletion_gauge(Some(&r));
        assert_eq!(gauge.ratio(30.0), 1.0);
        assert_eq!(gauge.ratio(5.0), 0.25);

        let flat = GaugeWidget::new("flat", Some(1.0), "").range(0.0, 0.0);
        assert_eq!(flat.ratio(1.0), 0.0);
    }

    #[test]
    fn renders_without_result() {
        let area = Rect::new(0, 0, 30, 4);
        let mut buf = Buffer::empty(area);
        depletion_gauge(None).render(area, &mut buf);
        let text: String = (0..area.width)
            .map(|x| buf[(x, 1)].symbol().to_string())
            .collect();
        assert!(text.contains("N/A"));
    }
}
