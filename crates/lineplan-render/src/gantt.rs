//! SVG Gantt chart rendering for a `Schedule`: one row per production order.

use chrono::NaiveDate;
use svg::node::element::{Group, Line, Rectangle, Text};
use svg::Document;

use lineplan_core::Schedule;

use crate::RenderError;

/// SVG Gantt chart renderer configuration.
#[derive(Clone, Debug)]
pub struct SvgGanttRenderer {
    pub chart_width: u32,
    pub row_height: u32,
    pub label_width: u32,
    pub header_height: u32,
    pub padding: u32,
    pub late_color: String,
    pub on_time_color: String,
    pub background_color: String,
    pub grid_color: String,
    pub text_color: String,
    pub font_family: String,
    pub font_size: u32,
}

impl Default for SvgGanttRenderer {
    fn default() -> Self {
        Self {
            chart_width: 800,
            row_height: 28,
            label_width: 180,
            header_height: 40,
            padding: 20,
            late_color: "#e74c3c".into(),
            on_time_color: "#3498db".into(),
            background_color: "#ffffff".into(),
            grid_color: "#ecf0f1".into(),
            text_color: "#2c3e50".into(),
            font_family: "system-ui, -apple-system, sans-serif".into(),
            font_size: 12,
        }
    }
}

impl SvgGanttRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chart_width(mut self, width: u32) -> Self {
        self.chart_width = width;
        self
    }

    fn total_width(&self) -> u32 {
        self.padding * 2 + self.label_width + self.chart_width
    }

    fn total_height(&self, entry_count: usize) -> u32 {
        self.padding * 2 + self.header_height + (entry_count as u32 * self.row_height)
    }

    fn pixels_per_day(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        let days = (end - start).num_days().max(1) as f64;
        self.chart_width as f64 / days
    }

    fn date_to_x(&self, date: NaiveDate, chart_start: NaiveDate, px_per_day: f64) -> f64 {
        let days = (date - chart_start).num_days() as f64;
        self.padding as f64 + self.label_width as f64 + (days * px_per_day)
    }

    fn render_grid(&self, entry_count: usize) -> Group {
        let mut group = Group::new().set("class", "grid");
        let chart_top = self.padding + self.header_height;
        for i in 0..=entry_count {
            let y = chart_top + (i as u32 * self.row_height);
            let line = Line::new()
                .set("x1", self.padding)
                .set("y1", y)
                .set("x2", self.padding + self.label_width + self.chart_width)
                .set("y2", y)
                .set("stroke", self.grid_color.as_str())
                .set("stroke-width", 1);
            group = group.add(line);
        }
        group
    }

    fn render_row(
        &self,
        entry: &lineplan_core::ScheduleEntry,
        row: usize,
        chart_start: NaiveDate,
        px_per_day: f64,
    ) -> Option<Group> {
        let start = entry.planned_start()?.date_naive();
        let end = entry.planned_end()?.date_naive();

        let mut group = Group::new().set("class", "entry");
        let y = self.padding + self.header_height + (row as u32 * self.row_height);
        let bar_height = (self.row_height as f64 * 0.6) as u32;
        let bar_y = y + (self.row_height - bar_height) / 2;

        let label = Text::new(entry.production_order_id.clone())
            .set("x", self.padding + 8)
            .set("y", y + self.row_height / 2 + 4)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size)
            .set("fill", self.text_color.as_str());
        group = group.add(label);

        let x_start = self.date_to_x(start, chart_start, px_per_day);
        let x_end = self.date_to_x(end, chart_start, px_per_day);
        let bar_width = (x_end - x_start).max(4.0);

        let color = if entry.late { self.late_color.as_str() } else { self.on_time_color.as_str() };
        let bar = Rectangle::new()
            .set("x", x_start)
            .set("y", bar_y)
            .set("width", bar_width)
            .set("height", bar_height)
            .set("rx", 3)
            .set("ry", 3)
            .set("fill", color);
        group = group.add(bar);

        Some(group)
    }

    /// Render `schedule` as a standalone SVG document, one row per entry
    /// ordered as they appear in the schedule.
    pub fn render(&self, schedule: &Schedule) -> Result<String, RenderError> {
        if schedule.entries.is_empty() {
            return Err(RenderError::InvalidData("schedule has no entries to render".into()));
        }

        let chart_start = schedule
            .entries
            .iter()
            .filter_map(|e| e.planned_start())
            .min()
            .ok_or_else(|| RenderError::InvalidData("schedule entries have no phases".into()))?
            .date_naive();
        let chart_end = schedule
            .entries
            .iter()
            .filter_map(|e| e.planned_end())
            .max()
            .ok_or_else(|| RenderError::InvalidData("schedule entries have no phases".into()))?
            .date_naive();

        let entry_count = schedule.entries.len();
        let px_per_day = self.pixels_per_day(chart_start, chart_end);

        let width = self.total_width();
        let height = self.total_height(entry_count);

        let mut document =
            Document::new().set("width", width).set("height", height).set("viewBox", (0, 0, width, height)).set(
                "xmlns",
                "http://www.w3.org/2000/svg",
            );

        let background = Rectangle::new().set("width", "100%").set("height", "100%").set(
            "fill",
            self.background_color.as_str(),
        );
        document = document.add(background);

        let title = Text::new(format!("Schedule #{} ({})", schedule.id, schedule.policy))
            .set("x", self.padding)
            .set("y", self.padding + 15)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size + 4)
            .set("font-weight", "bold")
            .set("fill", self.text_color.as_str());
        document = document.add(title);

        document = document.add(self.render_grid(entry_count));

        for (row, entry) in schedule.entries.iter().enumerate() {
            if let Some(group) = self.render_row(entry, row, chart_start, px_per_day) {
                document = document.add(group);
            }
        }

        let mut output = Vec::new();
        svg::write(&mut output, &document).map_err(|e| RenderError::Format(format!("failed to write SVG: {e}")))?;
        String::from_utf8(output).map_err(|e| RenderError::Format(format!("invalid UTF-8: {e}")))
    }
}
