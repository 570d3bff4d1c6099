//! Sequences one sync pass for a sprint or a single sprint member and is the
//! only writer of terminal sync states.

use crate::providers::{CredentialCipher, ProviderRegistry, TaskTracker};
use crate::retry::with_retry;
use crate::task_reconciler::TaskReconcileReport;
use crate::time_log_reconciler::{MemberTimeReport, MemberTimeSource};
use crate::{
    Result as SyncResult, SprintLocks, SyncError, SyncMetrics, SyncStatusLedger, TaskReconciler,
    TimeLogReconciler,
};

use retro_config::RetryConfig;
use retro_core::{Sprint, SprintMember, SyncStatus};
use retro_db::{
    RetrospectiveRepository, SprintMemberRepository, SprintRepository, TeamMemberRepository,
};

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use log::{error, info, warn};
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncScope {
    Sprint,
    Member(Uuid),
}

impl SyncScope {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sprint => "sprint",
            Self::Member(_) => "member",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub sprint_id: Uuid,
    pub scope: SyncScope,
    pub tasks: TaskReconcileReport,
    /// Per sprint member that had a time tracker configured.
    pub members: Vec<(Uuid, MemberTimeReport)>,
    pub members_skipped: usize,
}

#[derive(Clone)]
pub struct SyncOrchestrator {
    pool: SqlitePool,
    registry: Arc<ProviderRegistry>,
    cipher: Arc<dyn CredentialCipher>,
    ledger: SyncStatusLedger,
    task_reconciler: TaskReconciler,
    time_log_reconciler: TimeLogReconciler,
    locks: SprintLocks,
    retry: RetryConfig,
    metrics: SyncMetrics,
}

impl SyncOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: SqlitePool,
        registry: Arc<ProviderRegistry>,
        cipher: Arc<dyn CredentialCipher>,
        ledger: SyncStatusLedger,
        task_reconciler: TaskReconciler,
        time_log_reconciler: TimeLogReconciler,
        locks: SprintLocks,
        retry: RetryConfig,
        metrics: SyncMetrics,
    ) -> Self {
        Self {
            pool,
            registry,
            cipher,
            ledger,
            task_reconciler,
            time_log_reconciler,
            locks,
            retry,
            metrics,
        }
    }

    /// Reconciles tasks, then the time logs of every member of the sprint.
    pub async fn sync_sprint(&self, sprint_id: Uuid) -> SyncResult<SyncReport> {
        let sprint = self.load_sprint(sprint_id).await?;
        self.run(sprint, SyncScope::Sprint).await
    }

    /// Reconciles tasks, then the time logs of one sprint member only.
    pub async fn sync_sprint_member(&self, sprint_member_id: Uuid) -> SyncResult<SyncReport> {
        let member = SprintMemberRepository::find_by_id(&self.pool, sprint_member_id)
            .await?
            .ok_or_else(|| SyncError::not_found("SprintMember", sprint_member_id))?;
        let sprint = self.load_sprint(member.sprint_id).await?;
        self.run(sprint, SyncScope::Member(member.id)).await
    }

    async fn load_sprint(&self, sprint_id: Uuid) -> SyncResult<Sprint> {
        SprintRepository::find_by_id(&self.pool, sprint_id)
            .await?
            .ok_or_else(|| SyncError::not_found("Sprint", sprint_id))
    }

    async fn run(&self, sprint: Sprint, scope: SyncScope) -> SyncResult<SyncReport> {
        let _guard = self.locks.acquire(sprint.id).await;
        let started = Instant::now();
        self.metrics.sync_started(scope.as_str());

        if sprint.date_range().is_none() {
            let message = format!("sprint {} has no start or end date", sprint.id);
            warn!("[sprint {}] not synced: {}", sprint.id, message);
            self.ledger
                .append(sprint.id, SyncStatus::NotSynced, Some(message.clone()))
                .await?;
            self.metrics
                .sync_finished(SyncStatus::NotSynced, started.elapsed());
            return Err(SyncError::configuration(message));
        }

        info!("[sprint {}] {} sync started", sprint.id, scope.as_str());
        self.ledger.append(sprint.id, SyncStatus::Syncing, None).await?;

        let report = match self.run_pass(&sprint, scope).await {
            Ok(report) => report,
            Err(e) => return Err(self.record_failure(&sprint, e, started).await),
        };
        if let Err(e) = self.ledger.append(sprint.id, SyncStatus::Synced, None).await {
            return Err(self.record_failure(&sprint, e, started).await);
        }

        self.metrics.sync_finished(SyncStatus::Synced, started.elapsed());
        info!(
            "[sprint {}] synced in {:?}: {} task(s), {} member(s), {} skipped",
            sprint.id,
            started.elapsed(),
            report.tasks.known_keys.len(),
            report.members.len(),
            report.members_skipped
        );
        Ok(report)
    }

    /// Closes a pass that entered `Syncing` with `SyncFailed`. Returns the
    /// error that failed the pass, even if the ledger append also fails.
    async fn record_failure(&self, sprint: &Sprint, e: SyncError, started: Instant) -> SyncError {
        error!("[sprint {}] sync failed: {}", sprint.id, e);
        if let Err(append_err) = self
            .ledger
            .append(sprint.id, SyncStatus::SyncFailed, Some(e.to_string()))
            .await
        {
            error!(
                "[sprint {}] could not record sync failure: {}",
                sprint.id, append_err
            );
        }
        self.metrics
            .sync_finished(SyncStatus::SyncFailed, started.elapsed());
        e
    }

    /// Task reconciliation must finish before any time logs are read: key
    /// resolution depends on the key maps it writes.
    async fn run_pass(&self, sprint: &Sprint, scope: SyncScope) -> SyncResult<SyncReport> {
        let retrospective = RetrospectiveRepository::find_by_id(&self.pool, sprint.retrospective_id)
            .await?
            .ok_or_else(|| SyncError::not_found("Retrospective", sprint.retrospective_id))?;

        let task_tracker = self
            .registry
            .task_tracker(&retrospective.task_tracker_config, self.cipher.as_ref())?;
        with_retry(&self.retry, "validate_config", || task_tracker.validate_config()).await?;

        let tasks = self
            .task_reconciler
            .reconcile(&retrospective, sprint, task_tracker.as_ref(), &self.retry)
            .await?;

        let members = match scope {
            SyncScope::Sprint => SprintMemberRepository::find_by_sprint(&self.pool, sprint.id).await?,
            SyncScope::Member(id) => SprintMemberRepository::find_by_id(&self.pool, id)
                .await?
                .into_iter()
                .collect(),
        };

        let mut known_keys = tasks.known_keys.clone();
        let mut report = SyncReport {
            sprint_id: sprint.id,
            scope,
            tasks,
            members: Vec::new(),
            members_skipped: 0,
        };

        for member in &members {
            match self
                .sync_member_time(sprint, member, task_tracker.as_ref(), &mut known_keys)
                .await?
            {
                Some(time) => report.members.push((member.id, time)),
                None => report.members_skipped += 1,
            }
        }

        Ok(report)
    }

    /// `None` when the member has no time tracker configured.
    async fn sync_member_time(
        &self,
        sprint: &Sprint,
        sprint_member: &SprintMember,
        task_tracker: &dyn TaskTracker,
        known_keys: &mut HashSet<String>,
    ) -> SyncResult<Option<MemberTimeReport>> {
        let team_member = TeamMemberRepository::find_by_id(&self.pool, sprint_member.member_id)
            .await?
            .ok_or_else(|| SyncError::not_found("TeamMember", sprint_member.member_id))?;
        let Some(config) = team_member.time_tracker_config.as_ref() else {
            warn!(
                "[sprint {}] member {} has no time tracker configured, skipped",
                sprint.id, team_member.name
            );
            return Ok(None);
        };

        let time_tracker = self.registry.time_tracker(config, self.cipher.as_ref())?;
        let source = MemberTimeSource {
            sprint_member,
            config,
            time_tracker: time_tracker.as_ref(),
        };
        let report = self
            .time_log_reconciler
            .reconcile_member(sprint, source, task_tracker, known_keys, &self.retry)
            .await?;

        Ok(Some(report))
    }
}
