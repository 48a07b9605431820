use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::{ExportError, PageRecord};

/// Output formats for collected records. None of these touch the crawl
/// core; they consume the finished record sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Xml,
    Markdown,
}

impl ExportFormat {
    /// Default output path for this format under `dir`. Markdown gets a
    /// directory of per-page files; the rest get a single file.
    pub fn default_path(&self, dir: &Path) -> std::path::PathBuf {
        match self {
            Self::Csv => dir.join("scraped_data.csv"),
            Self::Json => dir.join("scraped_data.json"),
            Self::Xml => dir.join("scraped_data.xml"),
            Self::Markdown => dir.join("markdown"),
        }
    }
}

/// Writes `records` to `path` in the requested format. A failure here leaves
/// the in-memory records and any previously exported formats intact.
pub fn export(
    records: &[PageRecord],
    format: ExportFormat,
    path: &Path,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Csv => {
            let mut out = BufWriter::new(File::create(path)?);
            write_csv(records, &mut out)?;
            out.flush()?;
        }
        ExportFormat::Json => {
            let mut out = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut out, records)?;
            out.flush()?;
        }
        ExportFormat::Xml => {
            let mut out = BufWriter::new(File::create(path)?);
            write_xml(records, &mut out)?;
            out.flush()?;
        }
        ExportFormat::Markdown => {
            write_markdown_tree(records, path)?;
        }
    }

    info!(?format, path = %path.display(), pages = records.len(), "export written");
    Ok(())
}

/// Header `url,title,content,depth`, RFC 4180 quoting.
fn write_csv<W: Write>(records: &[PageRecord], out: &mut W) -> std::io::Result<()> {
    writeln!(out, "url,title,content,depth")?;
    for record in records {
        writeln!(
            out,
            "{},{},{},{}",
            csv_field(record.url.as_str()),
            csv_field(&record.title),
            csv_field(&record.content),
            record.depth
        )?;
    }
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// `<web_data>` document with one `<page>` element per record. Links are
/// omitted, matching the flat page-centric shape of the other formats.
fn write_xml<W: Write>(records: &[PageRecord], out: &mut W) -> std::io::Result<()> {
    writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(out, "<web_data>")?;
    for record in records {
        writeln!(out, "  <page>")?;
        writeln!(out, "    <url>{}</url>", xml_escape(record.url.as_str()))?;
        writeln!(out, "    <title>{}</title>", xml_escape(&record.title))?;
        writeln!(
            out,
            "    <content>{}</content>",
            xml_escape(&record.content)
        )?;
        writeln!(out, "    <depth>{}</depth>", record.depth)?;
        writeln!(out, "  </page>")?;
    }
    writeln!(out, "</web_data>")?;
    Ok(())
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// One markdown file per record under `dir`, named after the page title.
/// An index prefix keeps colliding titles from overwriting each other.
fn write_markdown_tree(records: &[PageRecord], dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;

    for (i, record) in records.iter().enumerate() {
        let slug: String = sanitize_filename::sanitize(record.title.replace(' ', "_"))
            .chars()
            .take(50)
            .collect();
        let path = dir.join(format!("{:03}_{}.md", i + 1, slug));

        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "# {}\n", record.title)?;
        writeln!(out, "URL: {}", record.url)?;
        writeln!(out, "Depth: {}\n", record.depth)?;
        writeln!(out, "{}", record.content)?;
        out.flush()?;
    }
    Ok(())
}
