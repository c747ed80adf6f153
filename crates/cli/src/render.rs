//! Presentation of delivered implementor tables.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use eyre::Result;
use implreg_registry::{DescribedLibrary, describe_table};
use implreg_types::ImplementorTable;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented, human readable listing
    Text,
    /// One JSON document per table
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(eyre::eyre!("Unknown output format: {}", other)),
        }
    }
}

#[derive(Debug, Serialize)]
struct RenderedTable<'a> {
    trait_path: Option<&'a str>,
    libraries: Vec<DescribedLibrary>,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    format: OutputFormat,
    base_url: Option<Url>,
    show_markup: bool,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            base_url: None,
            show_markup: false,
        }
    }

    pub fn with_base_url(mut self, base_url: Option<Url>) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_markup(mut self, show_markup: bool) -> Self {
        self.show_markup = show_markup;
        self
    }

    pub fn render(&self, table: &ImplementorTable) -> Result<String> {
        let libraries = describe_table(table, self.base_url.as_ref())?;

        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string(&RenderedTable {
                trait_path: table.trait_path.as_deref(),
                libraries,
            })?),
            OutputFormat::Text => Ok(self.render_text(table, &libraries)),
        }
    }

    pub fn write_table(&self, out: &mut impl Write, table: &ImplementorTable) -> Result<()> {
        writeln!(out, "{}", self.render(table)?)?;
        Ok(())
    }

    fn render_text(&self, table: &ImplementorTable, libraries: &[DescribedLibrary]) -> String {
        let mut text = format!(
            "{} ({} libraries, {} implementors)",
            table.trait_path.as_deref().unwrap_or("<unknown trait>"),
            table.len(),
            table.implementor_count()
        );

        for (described, (_, raw)) in libraries.iter().zip(table.iter()) {
            text.push_str(&format!("\n├─ {}", described.library));
            for (descriptor, implementor) in described.implementors.iter().zip(raw) {
                text.push_str(&format!("\n│  {}", descriptor.text));
                match (descriptor.self_kind, descriptor.self_path.as_deref()) {
                    (Some(kind), Some(path)) => text.push_str(&format!("  [{kind} {path}]")),
                    _ => text.push_str("  [blanket]"),
                }
                if let Some(href) = &descriptor.self_href {
                    text.push_str(&format!("\n│    → {href}"));
                }
                if self.show_markup {
                    text.push_str(&format!("\n│    markup: {implementor}"));
                }
            }
        }

        text
    }
}
