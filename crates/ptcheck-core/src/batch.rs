//! Validating many route relations at once

use crate::check::{CheckEngine, DiagnosticSink, Report, RuleKind, TracingSink};
use crate::error::{Error, Result};
use crate::primitive::{PrimitiveId, PrimitiveRef, Relation};
use crate::source::PrimitiveSource;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Cooperative cancellation flag, checked between members
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Options for [`validate_batch`]
#[derive(Clone)]
pub struct BatchOptions {
    /// Maximum relations validated at the same time
    pub jobs: usize,
    pub rule: RuleKind,
    pub sink: Arc<dyn DiagnosticSink>,
    pub cancel: CancelToken,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            jobs: default_jobs(),
            rule: RuleKind::default(),
            sink: Arc::new(TracingSink),
            cancel: CancelToken::new(),
        }
    }
}

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl BatchOptions {
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn with_rule(mut self, rule: RuleKind) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Fetch a route relation by id
pub async fn resolve_route<S>(id: PrimitiveId, source: &S) -> Result<Arc<Relation>>
where
    S: PrimitiveSource + ?Sized,
{
    let reference = PrimitiveRef::relation(id);
    source
        .resolve(reference)
        .await?
        .into_relation()
        .ok_or(Error::NotARelation(reference))
}

/// Validate each relation on its own engine, at most `options.jobs` at a
/// time. Results come back in the order of `relations`.
pub async fn validate_batch<S>(
    relations: Vec<PrimitiveId>,
    source: Arc<S>,
    options: BatchOptions,
) -> Vec<(PrimitiveId, Result<Report>)>
where
    S: PrimitiveSource + ?Sized + 'static,
{
    let jobs = options.jobs.max(1);
    let mut results: Vec<Option<Result<Report>>> = relations.iter().map(|_| None).collect();
    let mut set = JoinSet::new();

    tracing::debug!(relations = relations.len(), jobs, "starting batch validation");

    for (index, id) in relations.iter().copied().enumerate() {
        while set.len() >= jobs {
            collect_one(&mut set, &mut results).await;
        }

        let source = Arc::clone(&source);
        let rule = options.rule;
        let sink = Arc::clone(&options.sink);
        let cancel = options.cancel.clone();
        set.spawn(async move {
            let outcome = validate_one(id, source, rule, sink, cancel).await;
            (index, outcome)
        });
    }

    while !set.is_empty() {
        collect_one(&mut set, &mut results).await;
    }

    relations
        .into_iter()
        .zip(results)
        .map(|(id, result)| {
            let result = result.unwrap_or_else(|| {
                Err(Error::Internal(format!("validation of relation {} did not finish", id)))
            });
            (id, result)
        })
        .collect()
}

async fn validate_one<S>(
    id: PrimitiveId,
    source: Arc<S>,
    rule: RuleKind,
    sink: Arc<dyn DiagnosticSink>,
    cancel: CancelToken,
) -> Result<Report>
where
    S: PrimitiveSource + ?Sized,
{
    if cancel.is_cancelled() {
        return Err(Error::Cancelled(id));
    }
    let route = resolve_route(id, source.as_ref()).await?;
    let mut engine = CheckEngine::with_rule(rule.build())
        .with_sink(sink)
        .with_cancel(cancel);
    engine.validate(&route, source.as_ref()).await
}

async fn collect_one(
    set: &mut JoinSet<(usize, Result<Report>)>,
    results: &mut [Option<Result<Report>>],
) {
    match set.join_next().await {
        Some(Ok((index, outcome))) => results[index] = Some(outcome),
        Some(Err(e)) => tracing::error!("validation task failed: {}", e),
        None => {}
    }
}
