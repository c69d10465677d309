//! Check command

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use ptcheck_core::{
    validate_batch, BatchOptions, NullSink, OsmPrimitive, PrimitiveId, Report, RuleKind,
};
use serde::Serialize;

use super::load_source;
use crate::output::{to_json, OutputFormat, Table};
use crate::AppContext;

#[derive(Args)]
pub struct CheckArgs {
    /// OSM JSON file (API 0.6 or Overpass output)
    pub file: PathBuf,

    /// Relation id to check, repeatable. Defaults to every route in the file
    #[arg(short = 'r', long = "relation")]
    pub relations: Vec<u64>,

    /// Placement rule: context, incidence, permissive
    #[arg(long)]
    pub rule: Option<String>,

    /// Relations validated in parallel
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Status {
    Passed,
    Failed,
    Error,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Serialize)]
struct CheckResult {
    relation: PrimitiveId,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<Report>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl CheckResult {
    fn new(relation: PrimitiveId, outcome: ptcheck_core::Result<Report>) -> Self {
        match outcome {
            Ok(report) => Self {
                relation,
                status: if report.passed {
                    Status::Passed
                } else {
                    Status::Failed
                },
                report: Some(report),
                error: None,
            },
            Err(e) => Self {
                relation,
                status: Status::Error,
                report: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Returns false when any relation failed or could not be checked
pub async fn run(args: &CheckArgs, ctx: &AppContext) -> anyhow::Result<bool> {
    let source = load_source(&args.file).await?;

    let rule: RuleKind = match &args.rule {
        Some(name) => name.parse()?,
        None => ctx.config.rule,
    };

    let ids: Vec<PrimitiveId> = if args.relations.is_empty() {
        source.route_relations()?.iter().map(|r| r.id()).collect()
    } else {
        args.relations.iter().copied().map(PrimitiveId).collect()
    };

    let mut options = BatchOptions::default().with_rule(rule);
    if let Some(jobs) = args.jobs.or(ctx.config.jobs) {
        options = options.with_jobs(jobs);
    }
    if ctx.verbose == 0 {
        options = options.with_sink(Arc::new(NullSink));
    }

    tracing::info!(
        relations = ids.len(),
        rule = %rule,
        jobs = options.jobs,
        "Checking route relations"
    );

    let cancel = options.cancel.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling remaining checks");
            cancel.cancel();
        }
    });
    let outcomes = validate_batch(ids, source, options).await;
    interrupt.abort();

    let results: Vec<CheckResult> = outcomes
        .into_iter()
        .map(|(id, outcome)| CheckResult::new(id, outcome))
        .collect();

    match ctx.format {
        OutputFormat::Json => println!("{}", to_json(&results)?),
        OutputFormat::Table => print_table(&results, ctx.quiet, args),
    }

    Ok(results.iter().all(|r| r.status == Status::Passed))
}

fn print_table(results: &[CheckResult], quiet: bool, args: &CheckArgs) {
    if results.is_empty() {
        if !quiet {
            println!("No route relations found in {}", args.file.display());
        }
        return;
    }

    if !quiet {
        let mut table = Table::new(["RELATION", "STATUS", "MEMBERS", "ERRORS", "WARNINGS"]);
        for result in results {
            let (members, errors, warnings) = match &result.report {
                Some(r) => (
                    r.stats.members_checked.to_string(),
                    r.errors().count().to_string(),
                    r.warnings().count().to_string(),
                ),
                None => ("-".to_string(), "-".to_string(), "-".to_string()),
            };
            table.push([
                result.relation.to_string(),
                result.status.as_str().to_string(),
                members,
                errors,
                warnings,
            ]);
        }
        print!("{}", table.render());
    }

    for result in results {
        let diagnostics: Vec<String> = match (&result.report, &result.error) {
            (_, Some(error)) => vec![error.clone()],
            (Some(report), None) => report
                .diagnostics
                .iter()
                .filter(|d| !quiet || d.is_error())
                .map(ToString::to_string)
                .collect(),
            (None, None) => Vec::new(),
        };
        if diagnostics.is_empty() {
            continue;
        }
        println!();
        println!("relation {}:", result.relation);
        for line in diagnostics {
            println!("  {}", line);
        }
    }

    if !quiet {
        let count = |status: Status| results.iter().filter(|r| r.status == status).count();
        println!();
        println!(
            "{} passed, {} failed, {} not checked",
            count(Status::Passed),
            count(Status::Failed),
            count(Status::Error)
        );
    }
}
