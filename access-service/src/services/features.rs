use super::error::ServiceError;
use crate::models::{feature_rule, Feature, Project, ProjectState};

/// Decides which features a project can use, based on which integrations it
/// has configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectFeatureResolver;

impl ProjectFeatureResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn is_usable(&self, project: &Project, feature: Feature) -> bool {
        feature_rule(feature)
            .prerequisites
            .iter()
            .all(|integration| project.integrations.has(*integration))
    }

    /// Partition every feature into usable and unusable, in declaration order.
    pub fn resolve(&self, project: &Project) -> ProjectState {
        let (usable_features, unusable_features) = Feature::ALL
            .into_iter()
            .partition(|feature| self.is_usable(project, *feature));

        ProjectState {
            project: project.clone(),
            usable_features,
            unusable_features,
        }
    }

    /// Status first, then required features, then the hold flag.
    pub fn require_functional(&self, project: &Project) -> Result<(), ServiceError> {
        if !project.is_active() {
            tracing::warn!(
                project_id = project.id,
                status = project.status.as_str(),
                "Project is not active"
            );
            return Err(ServiceError::PreconditionFailed(format!(
                "Project {} is not active (status: {})",
                project.id,
                project.status.as_str()
            )));
        }

        if let Some(feature) = Feature::ALL
            .into_iter()
            .find(|feature| feature_rule(*feature).is_required && !self.is_usable(project, *feature))
        {
            tracing::warn!(project_id = project.id, feature = %feature, "Required feature unusable");
            return Err(ServiceError::PreconditionFailed(format!(
                "Required feature {} is not usable",
                feature
            )));
        }

        if project.on_hold {
            tracing::warn!(project_id = project.id, "Project is on hold");
            return Err(ServiceError::Locked(format!("Project {} is on hold", project.id)));
        }

        Ok(())
    }

    /// Fails listing exactly the requested features that are unusable, in the
    /// order they were requested.
    pub fn require_features_functional(
        &self,
        project: &Project,
        features: &[Feature],
    ) -> Result<(), ServiceError> {
        let unusable: Vec<String> = features
            .iter()
            .filter(|feature| !self.is_usable(project, **feature))
            .map(|feature| feature.to_string())
            .collect();

        if unusable.is_empty() {
            return Ok(());
        }

        tracing::warn!(project_id = project.id, features = ?unusable, "Features unusable");
        Err(ServiceError::PreconditionFailed(format!(
            "Features not usable: {}",
            unusable.join(", ")
        )))
    }
}
