use std::sync::Arc;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::config::{Settings, Target, TargetKind};
use crate::error::{ConfigError, FetchError};
use crate::fetch::PageFetcher;
use crate::parser::{EntryExtractor, EntryList, Extract, FieldExtractor, FieldResult};
use crate::present::Presenter;

/// What one fetch → extract flow produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Entries(EntryList),
    Fields(FieldResult),
    /// Page fetched, but the list pipeline kept nothing.
    NothingFound,
    FetchFailed(FetchError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub target: Target,
    pub outcome: Outcome,
}

/// Both pipelines, built once from settings and shared by every flow.
#[derive(Debug, Clone, Default)]
pub struct Extractors {
    pub entries: EntryExtractor,
    pub fields: FieldExtractor,
}

impl Extractors {
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        Ok(Extractors {
            entries: settings.entry_extractor(),
            fields: settings.field_extractor()?,
        })
    }

    /// Run the pipeline matching `kind` on an in-memory document.
    pub fn run(&self, kind: TargetKind, doc: &str) -> Outcome {
        match kind {
            TargetKind::List => {
                let entries = self.entries.extract(doc);
                if entries.is_empty() {
                    Outcome::NothingFound
                } else {
                    Outcome::Entries(entries)
                }
            }
            TargetKind::Detail => Outcome::Fields(self.fields.extract(doc)),
        }
    }
}

/// Fetch one target and extract from it. Extraction is skipped on fetch errors.
pub async fn run_target<F: PageFetcher>(
    fetcher: &F,
    extractors: &Extractors,
    target: &Target,
) -> Outcome {
    match fetcher.fetch(&target.url).await {
        Ok(doc) => extractors.run(target.kind, &doc),
        Err(e) => Outcome::FetchFailed(e),
    }
}

/// Run every target as its own task. Reports come back in target order.
///
/// Output is batched: nothing is returned until every flow has finished,
/// so presenting starts only after the slowest fetch.
pub async fn run_targets<F>(
    fetcher: Arc<F>,
    extractors: Arc<Extractors>,
    targets: Vec<Target>,
) -> Result<Vec<Report>>
where
    F: PageFetcher + 'static,
{
    let total = targets.len();
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let (tx, mut rx) = tokio::sync::mpsc::channel::<(usize, Report)>(total.max(1));

    for (idx, target) in targets.into_iter().enumerate() {
        let fetcher = Arc::clone(&fetcher);
        let extractors = Arc::clone(&extractors);
        let tx = tx.clone();

        tokio::spawn(async move {
            let outcome = run_target(fetcher.as_ref(), &extractors, &target).await;
            let _ = tx.send((idx, Report { target, outcome })).await;
        });
    }

    // rx closes once every task has sent
    drop(tx);

    let mut reports = Vec::with_capacity(total);
    while let Some((idx, report)) = rx.recv().await {
        pb.set_message(report.target.url.clone());
        reports.push((idx, report));
        pb.inc(1);
    }
    pb.finish_and_clear();

    if reports.len() < total {
        warn!("{} of {} flows ended without a report", total - reports.len(), total);
    }

    reports.sort_by_key(|(idx, _)| *idx);
    Ok(reports.into_iter().map(|(_, r)| r).collect())
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub ok: usize,
    pub empty: usize,
    pub failed: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.ok + self.empty + self.failed
    }

    pub fn all_failed(&self) -> bool {
        self.failed > 0 && self.failed == self.total()
    }
}

/// Hand every report to the presenter and count outcomes.
pub fn present_all<P: Presenter>(presenter: &mut P, reports: &[Report]) -> Result<Summary> {
    let mut summary = Summary::default();
    for report in reports {
        match &report.outcome {
            Outcome::Entries(_) => summary.ok += 1,
            Outcome::Fields(f) if f.all_empty() => summary.empty += 1,
            Outcome::Fields(_) => summary.ok += 1,
            Outcome::NothingFound => summary.empty += 1,
            Outcome::FetchFailed(_) => summary.failed += 1,
        }
        presenter.present(report)?;
    }
    presenter.finish()?;
    info!(
        "Presented {} targets ({} ok, {} empty, {} failed)",
        summary.total(),
        summary.ok,
        summary.empty,
        summary.failed
    );
    Ok(summary)
}
