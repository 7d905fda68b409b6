use gate::{require_role, RoleResolver};
use serde_json::Value;
use shared_types::{
    AppError, EmailRow, EmailSequenceRequest, EmailSequenceResponse, FeatureFlags,
    LawyerProfileRow, Lead, LeadSearchRequest, LeadSearchResponse, OutreachUpdateRequest, Session,
    SetVerificationRequest, UserRole,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::client::{eq_filter, BackendClient};
use crate::error_convert::ValidateRequest;
use crate::session::RemoteSessionStore;

/// Admin screens over captured emails, lawyer profiles and the outreach
/// functions.
///
/// Opening the console re-checks the admin role through the same resolver
/// the route gate uses. Table access goes out with the admin's own token so
/// the backend's policies decide the final outcome.
pub struct AdminConsole {
    client: BackendClient,
    sessions: Arc<RemoteSessionStore>,
    flags: FeatureFlags,
    admin: Session,
}

impl AdminConsole {
    pub async fn open(
        client: BackendClient,
        sessions: Arc<RemoteSessionStore>,
        resolver: &dyn RoleResolver,
        flags: FeatureFlags,
    ) -> Result<Self, AppError> {
        let admin = require_role(sessions.as_ref(), resolver, &UserRole::Admin).await?;
        tracing::info!(user_id = admin.user_id(), "Admin console opened");
        Ok(Self {
            client,
            sessions,
            flags,
            admin,
        })
    }

    pub fn admin(&self) -> &Session {
        &self.admin
    }

    /// The access token for outgoing calls, as long as the store still holds
    /// the admin who opened the console.
    fn token(&self) -> Result<String, AppError> {
        let Some(token) = self.sessions.access_token() else {
            return Err(AppError::unauthorized("Session ended"));
        };
        if self.sessions.user_id().as_deref() != self.admin.user_id() {
            tracing::warn!(admin = self.admin.user_id(), "Session changed under the admin console");
            return Err(AppError::unauthorized("Session changed"));
        }
        Ok(token)
    }

    // --- Emails ---

    pub async fn list_emails(&self) -> Result<Vec<EmailRow>, AppError> {
        let token = self.token()?;
        self.client
            .rest_get(
                "emails",
                &[
                    ("select", "*".to_string()),
                    ("order", "created_at.desc".to_string()),
                ],
                Some(token.as_str()),
            )
            .await
    }

    pub async fn delete_email(&self, id: Uuid) -> Result<(), AppError> {
        let token = self.token()?;
        self.client
            .rest_delete("emails", &[eq_filter("id", id)], Some(token.as_str()))
            .await?;
        tracing::info!(%id, "Email deleted");
        Ok(())
    }

    // --- Lawyer profiles ---

    /// Lawyer profiles, newest first, optionally only those with the given
    /// verification state.
    pub async fn list_lawyer_profiles(
        &self,
        verified: Option<bool>,
    ) -> Result<Vec<LawyerProfileRow>, AppError> {
        let token = self.token()?;
        let mut query = vec![
            ("select", "*".to_string()),
            ("order", "created_at.desc".to_string()),
        ];
        if let Some(verified) = verified {
            query.push(eq_filter("is_verified", verified));
        }
        self.client
            .rest_get("lawyer_profiles", &query, Some(token.as_str()))
            .await
    }

    pub async fn set_lawyer_verified(
        &self,
        id: Uuid,
        is_verified: bool,
    ) -> Result<LawyerProfileRow, AppError> {
        let token = self.token()?;
        let mut rows: Vec<LawyerProfileRow> = self
            .client
            .rest_patch(
                "lawyer_profiles",
                &[eq_filter("id", id)],
                &SetVerificationRequest { is_verified },
                Some(token.as_str()),
            )
            .await?;
        let row = rows
            .pop()
            .ok_or_else(|| AppError::not_found(format!("Lawyer profile {id} not found")))?;
        tracing::info!(%id, is_verified, "Lawyer verification updated");
        Ok(row)
    }

    // --- Outreach functions ---

    pub async fn find_leads(&self, req: &LeadSearchRequest) -> Result<Vec<Lead>, AppError> {
        if !self.flags.lead_finder {
            return Err(AppError::forbidden("Lead finder is disabled"));
        }
        req.validate_request()?;
        let token = self.token()?;
        let response: LeadSearchResponse = self
            .client
            .invoke_function("lead-finder", req, Some(token.as_str()))
            .await?;
        tracing::info!(count = response.leads.len(), "Lead search finished");
        Ok(response.leads)
    }

    pub async fn start_email_sequence(
        &self,
        req: &EmailSequenceRequest,
    ) -> Result<EmailSequenceResponse, AppError> {
        if !self.flags.email_sequencer {
            return Err(AppError::forbidden("Email sequencer is disabled"));
        }
        req.validate_request()?;
        let token = self.token()?;
        self.client
            .invoke_function("email-sequencer", req, Some(token.as_str()))
            .await
    }

    /// Record outreach progress. The tracker's reply is passed through as is.
    pub async fn track_outreach(&self, req: &OutreachUpdateRequest) -> Result<Value, AppError> {
        if !self.flags.outreach_tracker {
            return Err(AppError::forbidden("Outreach tracker is disabled"));
        }
        req.validate_request()?;
        let token = self.token()?;
        self.client
            .invoke_function("outreach-tracker", req, Some(token.as_str()))
            .await
    }
}
