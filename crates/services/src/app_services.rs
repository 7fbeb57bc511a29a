use std::sync::Arc;

use review_core::model::{Paper, PaperId, Question, ReviewConfig};
use storage::Storage;

use crate::Clock;
use crate::admin_gate::AdminGate;
use crate::config_service::{ConfigService, ConfigSource};
use crate::error::AppServicesError;
use crate::export_service::ExportService;
use crate::response_service::ResponseService;
use crate::settings::ReviewSettings;

/// Assembles the configuration, catalog and services a front end needs.
#[derive(Clone)]
pub struct AppServices {
    config: Arc<ReviewConfig>,
    config_source: ConfigSource,
    questions: Arc<[Question]>,
    responses: Arc<ResponseService>,
    export: Arc<ExportService>,
    admin: Arc<AdminGate>,
}

impl AppServices {
    /// Build services backed by the JSON response document.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Catalog` if the question templates are malformed.
    pub async fn new_json(
        settings: &ReviewSettings,
        clock: Clock,
        admin: AdminGate,
    ) -> Result<Self, AppServicesError> {
        let loaded = ConfigService::new(&settings.config_path).load().await;
        let storage = Storage::json_file(&settings.responses_path);
        Self::from_parts(loaded.config, loaded.source, &storage, clock, admin)
    }

    /// Build services over an already assembled storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Catalog` if the question templates are malformed.
    pub fn from_parts(
        config: ReviewConfig,
        config_source: ConfigSource,
        storage: &Storage,
        clock: Clock,
        admin: AdminGate,
    ) -> Result<Self, AppServicesError> {
        let questions: Arc<[Question]> = config.catalog()?.into();
        tracing::debug!(
            papers = config.papers.len(),
            questions = questions.len(),
            "catalog built"
        );

        Ok(Self {
            config: Arc::new(config),
            config_source,
            questions,
            responses: Arc::new(ResponseService::new(clock, Arc::clone(&storage.responses))),
            export: Arc::new(ExportService::new(clock, Arc::clone(&storage.responses))),
            admin: Arc::new(admin),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    #[must_use]
    pub fn config_source(&self) -> &ConfigSource {
        &self.config_source
    }

    #[must_use]
    pub fn papers(&self) -> &[Paper] {
        &self.config.papers
    }

    #[must_use]
    pub fn paper(&self, id: PaperId) -> Option<&Paper> {
        self.config.paper(id)
    }

    /// The catalog shared by every paper.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn responses(&self) -> Arc<ResponseService> {
        Arc::clone(&self.responses)
    }

    #[must_use]
    pub fn export(&self) -> Arc<ExportService> {
        Arc::clone(&self.export)
    }

    #[must_use]
    pub fn admin(&self) -> Arc<AdminGate> {
        Arc::clone(&self.admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_core::model::QuestionTemplate;
    use review_core::time::fixed_now;

    #[test]
    fn malformed_templates_fail_assembly() {
        let mut config = ReviewConfig::builtin();
        config
            .question_templates
            .insert("broken".into(), vec![QuestionTemplate::default()]);

        let result = AppServices::from_parts(
            config,
            ConfigSource::BuiltinMissing,
            &Storage::in_memory(),
            Clock::fixed(fixed_now()),
            AdminGate::disabled(),
        );
        assert!(matches!(result, Err(AppServicesError::Catalog(_))));
    }

    #[tokio::test]
    async fn json_services_use_configured_paths() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ReviewSettings {
            responses_path: dir.path().join("responses.json"),
            config_path: dir.path().join("missing_config.json"),
        };
        let services =
            AppServices::new_json(&settings, Clock::fixed(fixed_now()), AdminGate::disabled())
                .await
                .unwrap();

        assert_eq!(services.config_source(), &ConfigSource::BuiltinMissing);
        assert_eq!(services.questions().len(), 11);
        assert!(services.paper(PaperId::new(3)).is_some());
        assert!(!services.admin().is_configured());
    }
}
