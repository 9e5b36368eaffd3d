//! Presentation boundary.
//!
//! A [`Renderer`] receives finished figures and text blocks and performs no
//! computation of its own. [`JsonRenderer`] records everything it is handed,
//! which is what an HTTP layer or a snapshot test usually wants.

use serde_json::{json, Value};

use crate::error::Result;
use crate::models::{Block, ChartSpec, Report, Severity};

pub trait Renderer {
    /// Called before the blocks of each report section.
    fn begin_section(&mut self, _title: &str) -> Result<()> {
        Ok(())
    }

    fn render_metric(&mut self, label: &str, value: &str) -> Result<()>;

    fn render_chart(&mut self, chart: &ChartSpec) -> Result<()>;

    fn render_text(&mut self, text: &str, severity: Severity) -> Result<()>;
}

impl Report {
    /// Hand every section and block to `renderer`, in order.
    ///
    /// Recommendations are numbered across the report and rendered as text
    /// whose severity reflects their impact.
    pub fn render(&self, renderer: &mut dyn Renderer) -> Result<()> {
        let mut rec_no = 0;
        for section in &self.sections {
            renderer.begin_section(&section.title)?;
            for block in &section.blocks {
                match block {
                    Block::Metric { label, value } => renderer.render_metric(label, value)?,
                    Block::Chart(chart) => renderer.render_chart(chart)?,
                    Block::Text(text) => renderer.render_text(&text.text, text.severity)?,
                    Block::Recommendation(rec) => {
                        rec_no += 1;
                        let text = format!(
                            "### {}. {}\n**Impact:** {}\n\n{}",
                            rec_no, rec.title, rec.impact, rec.detail
                        );
                        renderer.render_text(&text, rec.impact.severity())?;
                    }
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JsonRenderer
// ---------------------------------------------------------------------------

/// Collects rendered elements as JSON values.
#[derive(Debug, Default)]
pub struct JsonRenderer {
    elements: Vec<Value>,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[Value] {
        &self.elements
    }

    pub fn into_value(self) -> Value {
        Value::Array(self.elements)
    }
}

impl Renderer for JsonRenderer {
    fn begin_section(&mut self, title: &str) -> Result<()> {
        self.elements.push(json!({ "type": "section", "title": title }));
        Ok(())
    }

    fn render_metric(&mut self, label: &str, value: &str) -> Result<()> {
        self.elements
            .push(json!({ "type": "metric", "label": label, "value": value }));
        Ok(())
    }

    fn render_chart(&mut self, chart: &ChartSpec) -> Result<()> {
        let mut value = serde_json::to_value(chart)?;
        if let Value::Object(map) = &mut value {
            map.insert("type".to_string(), json!("chart"));
        }
        self.elements.push(value);
        Ok(())
    }

    fn render_text(&mut self, text: &str, severity: Severity) -> Result<()> {
        self.elements.push(json!({
            "type": "text",
            "text": text,
            "severity": severity,
        }));
        Ok(())
    }
}
