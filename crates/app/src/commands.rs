use std::str::FromStr;

use anyhow::{bail, Context as _};
use vspheredb_domain::{InventorySummary, ObjectKind, SyncReport};
use vspheredb_infra::config;

use crate::context::AppContext;

fn load_context() -> anyhow::Result<AppContext> {
    let config = config::load().context("failed to load configuration")?;
    AppContext::new(&config)
}

/// `sync [KIND...]`: one pass over the named kinds, or the configured ones.
pub async fn run_sync(args: &[String]) -> anyhow::Result<()> {
    let kinds = parse_kinds(args)?;
    let mut ctx = load_context()?;
    if !kinds.is_empty() {
        ctx.service = ctx.service.with_kinds(&kinds);
    }

    let report = ctx.service.sync_all().await.context("sync pass failed")?;
    print_report(&report);
    Ok(())
}

/// `summary`: stored counts per kind and the last completed pass.
pub async fn run_summary() -> anyhow::Result<()> {
    let ctx = load_context()?;
    let summary = ctx.service.summary().await.context("failed to read inventory summary")?;
    println!("database: {}", ctx.db.path().display());
    print_summary(&summary);
    Ok(())
}

fn parse_kinds(args: &[String]) -> anyhow::Result<Vec<ObjectKind>> {
    let mut kinds = Vec::new();
    for arg in args {
        let Ok(kind) = ObjectKind::from_str(arg) else {
            bail!("unknown object kind '{arg}', expected one of Datastore, HostSystem, VirtualMachine");
        };
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}

fn print_report(report: &SyncReport) {
    for (kind, stats) in &report.kinds {
        println!(
            "{kind}: {} new, {} modified, {} deleted (got {} from API)",
            stats.created, stats.modified, stats.deleted, stats.fetched
        );
    }
    let elapsed = report.finished_at - report.started_at;
    println!("finished in {} ms", elapsed.num_milliseconds());
}

fn print_summary(summary: &InventorySummary) {
    println!("{} ({})", summary.vcenter_name, summary.vcenter_uuid_hex);
    match summary.last_sync_at {
        Some(at) => println!("last sync: {}", at.to_rfc3339()),
        None => println!("last sync: never"),
    }
    for count in &summary.counts {
        println!("{:<16}{:>8}", count.kind.to_string(), count.count);
    }
    println!("{:<16}{:>8}", "total", summary.total());
}
