//! Annotation of saved marketplace pages.
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use chrono::Utc;
use sedori_engine::{
    decode_page, write_scan_output, AuctionInjector, BatchSearchQueue, DecodedPage,
    DomPanelRenderer, InjectorSession, PageDocument, PageMutation, PanelStyle, ProductContext,
    ProductInjector, QueueItem, ScanOutput, ScanRecord,
};
use sedori_logging::{sedori_debug, sedori_info};
use serde::Serialize;
use tokio::sync::mpsc::unbounded_channel;

use super::Context;
use crate::cli::PageOutputArgs;

#[derive(Debug, Serialize)]
struct PageReport<'a> {
    #[serde(flatten)]
    record: &'a ScanRecord,
    html_path: &'a Path,
    report_path: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    monitor_link: Option<&'a str>,
}

pub async fn scan(
    ctx: &Context,
    file: &Path,
    url: Option<String>,
    append: &[PathBuf],
    append_interval: Duration,
    output: &PageOutputArgs,
) -> Result<()> {
    let page = load_page(file)?;
    let fragments = append
        .iter()
        .map(|path| load_page(path).map(|fragment| fragment.html))
        .collect::<Result<Vec<_>>>()?;

    let session = InjectorSession::new(
        PageDocument::parse(&page.html),
        ctx.searcher(output.relay)?,
        ctx.config.session_settings(),
    );

    let (tx, rx) = unbounded_channel();
    let feeder = async move {
        for markup in fragments {
            if !append_interval.is_zero() {
                tokio::time::sleep(append_interval).await;
            }
            if tx.send(PageMutation::AppendHtml { markup }).is_err() {
                break;
            }
        }
    };
    let (view, ()) = tokio::join!(session.run(rx), feeder);

    let record = ScanRecord {
        source: file.display().to_string(),
        page_kind: "category".into(),
        page_url: url,
        encoding: Some(page.encoding_label),
        scanned_utc: Utc::now().to_rfc3339(),
        scans: view.scans,
        annotated: view.annotated,
        skipped: view.skipped,
        succeeded: view.succeeded,
        failed: view.failed,
        keywords: session.keywords(),
    };
    let written = write_outputs(ctx, file, output, &session.to_html(), &record)?;
    report(ctx, &record, &written, None)
}

pub async fn product(
    ctx: &Context,
    file: &Path,
    url: Option<String>,
    output: &PageOutputArgs,
) -> Result<()> {
    let page = load_page(file)?;
    let mut doc = PageDocument::parse(&page.html);
    let annotation = ProductInjector
        .inject(&mut doc, url.as_deref())
        .with_context(|| format!("could not annotate {}", file.display()))?;
    let links = ctx
        .config
        .dashboard_links()
        .with_context(|| format!("invalid dashboard URL '{}'", ctx.config.dashboard_url))?;

    let doc = Rc::new(RefCell::new(doc));
    let renderer = DomPanelRenderer::new(
        Rc::clone(&doc),
        ctx.config.product_render(),
        PanelStyle::Full(ProductContext {
            asin: annotation.page.asin.clone(),
            product_title: annotation.page.title.clone(),
            links,
        }),
    );
    let queue = BatchSearchQueue::new(
        ctx.config.queue_settings(),
        ctx.searcher(output.relay)?,
        renderer,
    );
    sedori_info!(
        "Searching for ASIN {} with keyword '{}'",
        annotation.page.asin,
        annotation.keyword
    );
    queue.enqueue(QueueItem::new(annotation.keyword.clone(), annotation.panel));
    let summary = queue.drain().await;

    let record = ScanRecord {
        source: file.display().to_string(),
        page_kind: "product".into(),
        page_url: url,
        encoding: Some(page.encoding_label),
        scanned_utc: Utc::now().to_rfc3339(),
        scans: 1,
        annotated: 1,
        skipped: 0,
        succeeded: summary.succeeded,
        failed: summary.failed,
        keywords: vec![annotation.keyword],
    };
    let html = doc.borrow().to_html();
    let written = write_outputs(ctx, file, output, &html, &record)?;
    report(ctx, &record, &written, None)
}

pub fn auction(ctx: &Context, file: &Path, url: &str, output: &PageOutputArgs) -> Result<()> {
    let page = load_page(file)?;
    let mut doc = PageDocument::parse(&page.html);
    let links = ctx
        .config
        .dashboard_links()
        .with_context(|| format!("invalid dashboard URL '{}'", ctx.config.dashboard_url))?;
    let annotation = AuctionInjector::new(links)
        .inject(&mut doc, url)
        .with_context(|| format!("could not annotate {}", file.display()))?;

    let record = ScanRecord {
        source: file.display().to_string(),
        page_kind: "auction".into(),
        page_url: Some(url.to_string()),
        encoding: Some(page.encoding_label),
        scanned_utc: Utc::now().to_rfc3339(),
        scans: 1,
        annotated: 1,
        ..ScanRecord::default()
    };
    let written = write_outputs(ctx, file, output, &doc.to_html(), &record)?;
    report(ctx, &record, &written, Some(annotation.monitor_link.as_str()))
}

fn load_page(path: &Path) -> Result<DecodedPage> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let page = decode_page(&bytes, None)
        .with_context(|| format!("failed to decode {}", path.display()))?;
    sedori_debug!("Decoded {} as {}", path.display(), page.encoding_label);
    Ok(page)
}

fn write_outputs(
    ctx: &Context,
    file: &Path,
    output: &PageOutputArgs,
    html: &str,
    record: &ScanRecord,
) -> Result<ScanOutput> {
    let dir = output
        .output_dir
        .clone()
        .unwrap_or_else(|| ctx.config.output_dir.clone());
    let stem = output.stem.clone().unwrap_or_else(|| default_stem(file));
    write_scan_output(&dir, &stem, html, record)
        .with_context(|| format!("failed to write results to {}", dir.display()))
}

fn default_stem(file: &Path) -> String {
    file.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn report(
    ctx: &Context,
    record: &ScanRecord,
    written: &ScanOutput,
    monitor_link: Option<&str>,
) -> Result<()> {
    let page_report = PageReport {
        record,
        html_path: &written.html_path,
        report_path: &written.report_path,
        monitor_link,
    };
    ctx.emit(&page_report, |r| {
        let mut text = format!(
            "{} page: {} annotated over {} scan(s), {} search(es) ok, {} failed",
            r.record.page_kind,
            r.record.annotated,
            r.record.scans,
            r.record.succeeded,
            r.record.failed
        );
        if !r.record.keywords.is_empty() {
            text.push_str(&format!("\n  keywords: {}", r.record.keywords.join(", ")));
        }
        if let Some(link) = r.monitor_link {
            text.push_str(&format!("\n  monitor:  {link}"));
        }
        text.push_str(&format!("\n  page:     {}", r.html_path.display()));
        text.push_str(&format!("\n  report:   {}", r.report_path.display()));
        text
    })
}
