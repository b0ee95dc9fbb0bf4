use schemashift::simulation::{Draw, OutcomeSource, RandomOutcome, ScriptedOutcome};
use schemashift::{
    ExecutionOutcome, HistoryAggregator, InMemoryStore, MigrationId, MigrationRegistry,
    MigrationStatus, MigrationType, Orchestrator, SimulationConfig, Store,
};
use std::sync::Arc;

struct Harness {
    store: Arc<dyn Store>,
    orchestrator: Orchestrator,
    history: HistoryAggregator,
}

impl Harness {
    fn new(outcomes: impl OutcomeSource + 'static) -> Self {
        let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
        let orchestrator = Orchestrator::new(
            MigrationRegistry::new(Arc::clone(&store)),
            Arc::new(outcomes),
            SimulationConfig::instant(),
        );
        let history = HistoryAggregator::new(Arc::clone(&store));
        Self {
            store,
            orchestrator,
            history,
        }
    }

    async fn create_add_email(&self) -> MigrationId {
        let migration = self
            .orchestrator
            .registry()
            .create(
                "add_email",
                MigrationType::AddField,
                r#"{"collection": "users", "field": "email", "type": "string", "required": true}"#,
            )
            .await
            .unwrap();

        assert_eq!(migration.status, MigrationStatus::Pending);
        assert!(migration.logs.is_empty());
        migration.id
    }
}

#[tokio::test]
async fn test_add_email_execute_and_rollback() {
    let harness = Harness::new(ScriptedOutcome::always(Draw::success()));
    let id = harness.create_add_email().await;
    assert_eq!(id, MigrationId(1));

    let report = harness.orchestrator.execute(id).await.unwrap();
    assert_eq!(report.outcome, ExecutionOutcome::Completed);
    assert_eq!(report.migration.logs.len(), 6);

    let commits = harness.history.commits_for(id).await.unwrap();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].message, "feat: add_email");

    let results = harness.history.validation_results_for(id).await.unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].pre_check && results[0].post_check);

    let report = harness.orchestrator.rollback(id).await.unwrap();
    assert_eq!(report.migration.status, MigrationStatus::Pending);
    assert_eq!(report.migration.logs.len(), 9);

    let commits = harness.history.commits_for(id).await.unwrap();
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].message, "revert: add_email");
    assert_eq!(commits[1].message, "feat: add_email");

    // rollback adds no validation result
    assert_eq!(harness.history.list_validation_results().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_execution_records_negative_result() {
    let harness = Harness::new(ScriptedOutcome::always(Draw::failure()));
    let id = harness.create_add_email().await;

    let report = harness.orchestrator.execute(id).await.unwrap();
    assert_eq!(report.migration.status, MigrationStatus::Failed);

    assert!(harness.history.list_commits().await.unwrap().is_empty());
    let results = harness.history.list_validation_results().await.unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].pre_check);
    assert!(!results[0].post_check);
    assert!(!results[0].warnings.is_empty());

    // no way out of failed in strict mode
    assert!(harness
        .orchestrator
        .rollback(id)
        .await
        .unwrap_err()
        .is_invalid_transition());
    assert!(harness
        .orchestrator
        .execute(id)
        .await
        .unwrap_err()
        .is_invalid_transition());
}

#[tokio::test]
async fn test_random_outcomes_keep_the_contract() {
    let harness = Harness::new(RandomOutcome::seeded(2024, &SimulationConfig::instant()));

    let mut ids = Vec::new();
    for i in 0..20 {
        let migration = harness
            .orchestrator
            .registry()
            .create(&format!("migration_{}", i), MigrationType::CreateIndex, "{}")
            .await
            .unwrap();
        ids.push(migration.id);
    }

    let mut completed = 0;
    for &id in &ids {
        let report = harness.orchestrator.execute(id).await.unwrap();
        assert!(report.migration.status.is_terminal());
        assert_eq!(report.migration.logs.len(), 6);
        assert_eq!(report.commit.is_some(), report.succeeded());
        if report.succeeded() {
            completed += 1;
        }
    }

    assert_eq!(harness.history.list_commits().await.unwrap().len(), completed);
    assert_eq!(
        harness.history.list_validation_results().await.unwrap().len(),
        ids.len()
    );

    let summary = harness.history.summary().await.unwrap();
    assert_eq!(summary.completed, completed);
    assert_eq!(summary.failed, ids.len() - completed);
}

#[tokio::test]
async fn test_history_is_newest_first() {
    let harness = Harness::new(ScriptedOutcome::always(Draw::success()));

    let mut ids = Vec::new();
    for name in ["first", "second", "third"] {
        let migration = harness
            .orchestrator
            .registry()
            .create(name, MigrationType::CreateCollection, r#"{"collection": "c"}"#)
            .await
            .unwrap();
        ids.push(migration.id);
    }

    // run in reverse creation order
    for &id in ids.iter().rev() {
        harness.orchestrator.execute(id).await.unwrap();
    }

    let commits = harness.history.list_commits().await.unwrap();
    let messages: Vec<&str> = commits.iter().map(|c| c.message.as_str()).collect();
    assert_eq!(messages, vec!["feat: first", "feat: second", "feat: third"]);
    assert!(commits.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));

    let results = harness.history.list_validation_results().await.unwrap();
    assert_eq!(results[0].migration_id, ids[0]);
    assert!(results.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));

    assert_eq!(harness.store.list_commits().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_unknown_ids() {
    let harness = Harness::new(ScriptedOutcome::always(Draw::success()));

    assert!(harness
        .orchestrator
        .registry()
        .get(MigrationId(1))
        .await
        .unwrap_err()
        .is_not_found());
    assert!(harness
        .orchestrator
        .execute(MigrationId(1))
        .await
        .unwrap_err()
        .is_not_found());
    assert!(harness
        .orchestrator
        .rollback(MigrationId(1))
        .await
        .unwrap_err()
        .is_not_found());
}
