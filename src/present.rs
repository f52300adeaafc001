use std::io::{self, Write};

use serde_json::json;

use crate::config::TargetKind;
use crate::pipeline::{Outcome, Report};

/// Receives one report per target, in target order.
pub trait Presenter {
    fn present(&mut self, report: &Report) -> io::Result<()>;

    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn kind_label(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::List => "list",
        TargetKind::Detail => "detail",
    }
}

/// Human-readable blocks, one per target.
pub struct TextPresenter<W: Write> {
    out: W,
}

impl<W: Write> TextPresenter<W> {
    pub fn new(out: W) -> Self {
        TextPresenter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn present(&mut self, report: &Report) -> io::Result<()> {
        writeln!(
            self.out,
            "== {} ({})",
            report.target.url,
            kind_label(report.target.kind)
        )?;
        match &report.outcome {
            Outcome::Entries(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    writeln!(self.out, "{:>3}. {}", i + 1, entry)?;
                }
            }
            Outcome::Fields(fields) => {
                let width = fields.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
                for (name, value) in fields.iter() {
                    let value = if value.is_empty() { "-" } else { value };
                    writeln!(self.out, "  {:<width$} : {}", name, value, width = width)?;
                }
            }
            Outcome::NothingFound => writeln!(self.out, "  nothing found")?,
            Outcome::FetchFailed(e) => writeln!(self.out, "  error: {}", e)?,
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// One JSON object per line.
pub struct JsonPresenter<W: Write> {
    out: W,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        JsonPresenter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn present(&mut self, report: &Report) -> io::Result<()> {
        let url = &report.target.url;
        let kind = kind_label(report.target.kind);
        let value = match &report.outcome {
            Outcome::Entries(entries) => {
                json!({ "url": url, "kind": kind, "status": "ok", "entries": entries })
            }
            Outcome::Fields(fields) => {
                json!({ "url": url, "kind": kind, "status": "ok", "fields": fields })
            }
            Outcome::NothingFound => {
                json!({ "url": url, "kind": kind, "status": "empty", "entries": [] })
            }
            Outcome::FetchFailed(e) => {
                json!({ "url": url, "kind": kind, "status": "error", "error": e.to_string() })
            }
        };
        serde_json::to_writer(&mut self.out, &value)?;
        writeln!(self.out)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
