//! Access decisions for users, projects and creators.
//!
//! Every check re-validates the caller's token against the token store and
//! reads the requester's live user record; the authority snapshot stored in
//! the token is never consulted.

use std::sync::Arc;

use super::error::ServiceError;
use super::features::ProjectFeatureResolver;
use super::token::{TokenAuthority, ValidationMode};
use crate::models::{
    privilege_rule, AuthContext, Feature, Privilege, Project, ProjectState, SelfAccess,
    TokenMetadata, User, UserId,
};
use crate::store::{ProjectStore, UserStore};

pub struct AccessManager {
    tokens: Arc<TokenAuthority>,
    users: Arc<dyn UserStore>,
    projects: Arc<dyn ProjectStore>,
    features: ProjectFeatureResolver,
    creator_project_id: i64,
}

impl AccessManager {
    pub fn new(
        tokens: Arc<TokenAuthority>,
        users: Arc<dyn UserStore>,
        projects: Arc<dyn ProjectStore>,
        creator_project_id: i64,
    ) -> Self {
        Self {
            tokens,
            users,
            projects,
            features: ProjectFeatureResolver::new(),
            creator_project_id,
        }
    }

    pub fn creator_project_id(&self) -> i64 {
        self.creator_project_id
    }

    /// Resolve `target_id` if the caller may exercise `privilege` on it.
    pub async fn request_user_access(
        &self,
        context: &AuthContext,
        target_id: &UserId,
        privilege: Privilege,
    ) -> Result<User, ServiceError> {
        tracing::debug!(target_id = %target_id, privilege = %privilege, "Requesting user access");

        let token = self.authenticate(context).await?;

        let is_project_creator = self.is_creator_of(target_id.project_id, &token.owner_id).await?;
        let is_super_creator = self.is_super_creator(&token.owner_id).await?;
        if is_project_creator || is_super_creator {
            tracing::debug!(owner_id = %token.owner_id, "User access granted to creator");
            return self.fetch_user(target_id).await;
        }

        let target_project = self.fetch_project(target_id.project_id).await?;
        require_for_auth(
            target_project.id == token.project_id(),
            "Only requests within the same project are allowed",
        )?;

        let requester = self.fetch_user(&token.owner_id).await?;
        if is_self_access_allowed(privilege, &requester, target_id)? {
            tracing::debug!(owner_id = %requester.id, "User access granted to self");
            return Ok(requester);
        }

        if !requester.is_verified() {
            tracing::warn!(owner_id = %requester.id, "Requester is not verified");
            return Err(ServiceError::NotVerified);
        }

        if token.is_static && !self.is_cross_creator_access(&requester, is_super_creator) {
            tracing::debug!(owner_id = %requester.id, "User access granted to static token");
            return self.fetch_user(target_id).await;
        }

        let level = privilege_rule(privilege).level;
        require_for_auth(
            is_privileged_to(&requester, privilege, &target_project),
            &format!("Only {} are authorized", level.group_name()),
        )?;

        let target = self.fetch_user(target_id).await?;
        require_for_auth(
            requester.authority.ordinal() > target.authority.ordinal(),
            &format!("Only {} are authorized", target.authority.next_group_name()),
        )?;

        Ok(target)
    }

    /// Resolve project `target_id` if the caller may exercise `privilege` on it.
    pub async fn request_project_access(
        &self,
        context: &AuthContext,
        target_id: i64,
        privilege: Privilege,
    ) -> Result<Project, ServiceError> {
        tracing::debug!(project_id = target_id, privilege = %privilege, "Requesting project access");

        let token = self.authenticate(context).await?;

        let target_project = self.fetch_project(target_id).await?;
        let is_project_creator = self.is_creator_of(target_id, &token.owner_id).await?;
        let is_super_creator = self.is_super_creator(&token.owner_id).await?;
        if is_project_creator || is_super_creator {
            tracing::debug!(owner_id = %token.owner_id, "Project access granted to creator");
            return Ok(target_project);
        }

        require_for_auth(
            token.project_id() == target_id,
            "Only requests within the same project are allowed",
        )?;

        let requester = self.fetch_user(&token.owner_id).await?;
        if !requester.is_verified() {
            tracing::warn!(owner_id = %requester.id, "Requester is not verified");
            return Err(ServiceError::NotVerified);
        }

        if token.is_static && !self.is_cross_creator_access(&requester, is_super_creator) {
            tracing::debug!(owner_id = %requester.id, "Project access granted to static token");
            return Ok(target_project);
        }

        let level = privilege_rule(privilege).level;
        require_for_auth(
            is_privileged_to(&requester, privilege, &target_project),
            &format!("Only {} are authorized", level.group_name()),
        )?;

        Ok(target_project)
    }

    /// Resolve a creator-project user.
    ///
    /// With `matches_id`, only that user or the super-creator may ask, and
    /// `matches_id` is the user returned.
    pub async fn request_creator(
        &self,
        context: &AuthContext,
        matches_id: Option<&UserId>,
        require_verified: bool,
    ) -> Result<User, ServiceError> {
        tracing::debug!(
            matches_id = ?matches_id.map(|id| id.to_universal()),
            require_verified,
            "Requesting creator access"
        );

        let token = self.authenticate(context).await?;

        require_for_auth(
            token.project_id() == self.creator_project_id,
            "Only requests from creators are allowed",
        )?;

        if let Some(matches_id) = matches_id {
            let is_super_creator = self.is_super_creator(&token.owner_id).await?;
            require_for_auth(
                is_super_creator || *matches_id == token.owner_id,
                &format!("Only requests from {} are allowed", matches_id),
            )?;
        }

        let creator = self
            .fetch_user(matches_id.unwrap_or(&token.owner_id))
            .await?;
        if require_verified && !creator.is_verified() {
            tracing::warn!(owner_id = %creator.id, "Creator is not verified");
            return Err(ServiceError::NotVerified);
        }

        Ok(creator)
    }

    pub async fn request_super_creator(&self, context: &AuthContext) -> Result<User, ServiceError> {
        tracing::debug!("Requesting super creator access");

        let token = self.authenticate(context).await?;

        require_for_auth(
            self.is_super_creator(&token.owner_id).await?,
            "Only requests from super creator are allowed",
        )?;

        self.fetch_user(&token.owner_id).await
    }

    pub async fn fetch_project_state(&self, project_id: i64) -> Result<ProjectState, ServiceError> {
        tracing::debug!(project_id, "Fetching project state");
        let project = self.fetch_project(project_id).await?;
        Ok(self.features.resolve(&project))
    }

    pub async fn require_project_functional(&self, project_id: i64) -> Result<(), ServiceError> {
        tracing::debug!(project_id, "Requiring project functional");
        let project = self.fetch_project(project_id).await?;
        self.features.require_functional(&project)
    }

    pub async fn require_project_features_functional(
        &self,
        project_id: i64,
        features: &[Feature],
    ) -> Result<(), ServiceError> {
        tracing::debug!(project_id, features = ?features, "Requiring project features functional");
        let project = self.fetch_project(project_id).await?;
        self.features.require_features_functional(&project, features)
    }

    /// Deep-validate the caller's token. Token rejections become
    /// `Unauthorized`; store failures propagate as they are.
    async fn authenticate(&self, context: &AuthContext) -> Result<TokenMetadata, ServiceError> {
        if let Some(claims) = context.claims() {
            self.tokens.check_claims(claims).map_err(reject)?;
        }

        self.tokens
            .validate(context.token(), ValidationMode::Deep)
            .await
            .map_err(reject)
    }

    async fn super_creator(&self) -> Result<User, ServiceError> {
        self.projects
            .fetch_creator_of(self.creator_project_id)
            .await?
            .ok_or_else(|| {
                tracing::error!(
                    creator_project_id = self.creator_project_id,
                    "Super creator is not configured"
                );
                ServiceError::Internal(anyhow::anyhow!("Super creator is not configured"))
            })
    }

    async fn is_super_creator(&self, owner_id: &UserId) -> Result<bool, ServiceError> {
        Ok(self.super_creator().await?.id == *owner_id)
    }

    async fn is_creator_of(&self, project_id: i64, owner_id: &UserId) -> Result<bool, ServiceError> {
        let creator = self.projects.fetch_creator_of(project_id).await?;
        Ok(creator.is_some_and(|creator| creator.id == *owner_id))
    }

    /// Creator-project users other than the super-creator lose the static
    /// token bypass.
    fn is_cross_creator_access(&self, requester: &User, is_super_creator: bool) -> bool {
        !is_super_creator && requester.project_id() == self.creator_project_id
    }

    async fn fetch_user(&self, id: &UserId) -> Result<User, ServiceError> {
        Ok(self.users.fetch_by_user_id(id).await?)
    }

    async fn fetch_project(&self, id: i64) -> Result<Project, ServiceError> {
        Ok(self.projects.fetch_by_id(id).await?)
    }
}

fn reject(err: ServiceError) -> ServiceError {
    if err.is_token_rejection() {
        tracing::warn!(reason = %err, "Token rejected");
        ServiceError::Unauthorized(err.to_string())
    } else {
        err
    }
}

fn require_for_auth(condition: bool, message: &str) -> Result<(), ServiceError> {
    if condition {
        return Ok(());
    }
    tracing::warn!(reason = message, "Access denied");
    Err(ServiceError::Unauthorized(message.to_string()))
}

fn is_privileged_to(requester: &User, privilege: Privilege, project: &Project) -> bool {
    if requester.authority.ordinal() >= privilege_rule(privilege).level.ordinal() {
        return true;
    }
    privilege == Privilege::UserSearch && project.anyone_can_search
}

fn is_self_access_allowed(
    privilege: Privilege,
    requester: &User,
    target_id: &UserId,
) -> Result<bool, ServiceError> {
    match privilege_rule(privilege).self_access {
        SelfAccess::Allowed => Ok(requester.id == *target_id),
        SelfAccess::Never => Ok(false),
        SelfAccess::Invalid => Err(ServiceError::InvalidPrivilege {
            privilege,
            reason: match privilege {
                Privilege::ProjectRead | Privilege::ProjectReadBasic | Privilege::ProjectWrite => {
                    "users should not ask for self access on projects"
                }
                _ => "users should not ask for self access on message templates",
            },
        }),
    }
}
