//! User administration service — creation and lifecycle orchestration.

use std::collections::HashSet;

use atria_core::command::JsonCommand;
use atria_core::error::AtriaResult;
use atria_core::models::client::Client;
use atria_core::models::office::Office;
use atria_core::models::role::Role;
use atria_core::models::staff::Staff;
use atria_core::models::user::AppUser;
use atria_core::password::PlatformPasswordEncoder;
use atria_core::repository::UserRepository;
use uuid::Uuid;

/// User administration service.
///
/// Generic over the repository and encoder implementations so that this
/// layer has no dependency on the store crate.
pub struct UserService<R: UserRepository, E: PlatformPasswordEncoder> {
    users: R,
    encoder: E,
}

impl<R: UserRepository, E: PlatformPasswordEncoder> UserService<R, E> {
    pub fn new(users: R, encoder: E) -> Self {
        Self { users, encoder }
    }

    /// Create a user from a validated command plus resolved references
    /// and persist it.
    ///
    /// The factory resolves the raw credential (supplied or randomly
    /// generated); it is encoded here, against the new user's id,
    /// before the aggregate is handed to the store.
    pub async fn create_user(
        &self,
        command: &JsonCommand,
        office: Office,
        linked_staff: Option<Staff>,
        all_roles: HashSet<Role>,
        clients: &[Client],
    ) -> AtriaResult<AppUser> {
        let mut user = AppUser::from_command(office, linked_staff, all_roles, clients, command)?;
        user.encode_password_with(&self.encoder)?;

        let saved = self.users.save(user).await?;
        tracing::info!(user_id = %saved.id(), username = %saved.username(), "created user");
        Ok(saved)
    }

    /// Apply a password change carried by `command`, if any.
    ///
    /// A command that encodes to the stored credential is a no-op; a
    /// locked password policy surfaces as an authorization error.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        command: &JsonCommand,
    ) -> AtriaResult<AppUser> {
        let mut user = self.users.get_by_id(user_id).await?;

        let Some(encoded) = user.encoded_password(command, &self.encoder)? else {
            tracing::debug!(user_id = %user_id, "password unchanged");
            return Ok(user);
        };

        user.update_password(encoded)?;
        let saved = self.users.save(user).await?;
        tracing::info!(user_id = %user_id, "password changed");
        Ok(saved)
    }

    /// Soft-delete a user: flags it out of queries and frees its
    /// username for reuse.
    pub async fn soft_delete(&self, user_id: Uuid) -> AtriaResult<AppUser> {
        let mut user = self.users.get_by_id(user_id).await?;
        user.delete()?;

        let saved = self.users.save(user).await?;
        tracing::info!(user_id = %user_id, "soft-deleted user");
        Ok(saved)
    }

    /// Replace a user's role set. An empty set is a no-op.
    pub async fn update_roles(
        &self,
        user_id: Uuid,
        new_roles: HashSet<Role>,
    ) -> AtriaResult<AppUser> {
        let mut user = self.users.get_by_id(user_id).await?;
        user.update_roles(new_roles);

        let saved = self.users.save(user).await?;
        tracing::info!(user_id = %user_id, roles = saved.roles().len(), "updated roles");
        Ok(saved)
    }

    /// Reconcile a user's self-service client allow-list.
    pub async fn set_clients(&self, user_id: Uuid, clients: &[Client]) -> AtriaResult<AppUser> {
        let mut user = self.users.get_by_id(user_id).await?;
        user.set_clients(clients);

        let saved = self.users.save(user).await?;
        tracing::info!(
            user_id = %user_id,
            mappings = saved.client_mappings().len(),
            "updated client mappings"
        );
        Ok(saved)
    }
}
