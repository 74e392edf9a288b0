//! Back-office user aggregate.
//!
//! [`AppUser`] owns identity, credential state, organizational
//! associations (office, optional staff link), the assigned role set,
//! and — for self-service users — the client allow-list. Mutations are
//! narrow methods that enforce their own authorization preconditions;
//! permission queries evaluate the flattened capability set of the
//! assigned roles.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::command::JsonCommand;
use crate::dates;
use crate::error::{AtriaError, AtriaResult};
use crate::models::client::{Client, ClientMapping};
use crate::models::office::Office;
use crate::models::permission::{
    ALL_FUNCTIONS, ALL_FUNCTIONS_READ, BYPASS_LOAN_WRITE_PROTECTION, CHECKER_SUPER_USER,
    REPORTING_SUPER_USER,
};
use crate::models::role::Role;
use crate::models::staff::Staff;
use crate::password::{GENERATED_PASSWORD_LENGTH, PlatformPasswordEncoder, RandomPasswordGenerator};

/// Reserved username of the distinguished system account. It can never
/// be renamed or deleted.
pub const SYSTEM_USER_NAME: &str = "system";

pub const USERNAME_PARAM: &str = "username";
pub const PASSWORD_PARAM: &str = "password";
pub const PASSWORD_ENCODED_PARAM: &str = "passwordEncoded";
pub const EMAIL_PARAM: &str = "email";
pub const FIRSTNAME_PARAM: &str = "firstname";
pub const LASTNAME_PARAM: &str = "lastname";
pub const SEND_PASSWORD_TO_EMAIL_PARAM: &str = "sendPasswordToEmail";
pub const PASSWORD_NEVER_EXPIRES_PARAM: &str = "passwordNeverExpires";
pub const IS_SELF_SERVICE_USER_PARAM: &str = "isSelfServiceUser";
pub const CANNOT_CHANGE_PASSWORD_PARAM: &str = "cannotChangePassword";

/// Three-valued password-change policy.
///
/// `Unset` behaves like `Allowed`; only `Forbidden` blocks password
/// mutation. Kept explicit so an unconfigured account is
/// distinguishable from one deliberately opened up.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PasswordChangePolicy {
    #[default]
    Unset,
    Allowed,
    Forbidden,
}

impl PasswordChangePolicy {
    pub fn is_forbidden(self) -> bool {
        matches!(self, PasswordChangePolicy::Forbidden)
    }
}

/// Capability provider consumed by the access-control middleware.
pub trait GrantedAuthorities {
    /// Flattened set of permission codes across all assigned roles.
    fn granted_authorities(&self) -> BTreeSet<String>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppUser {
    id: Uuid,
    username: String,
    email: String,
    firstname: String,
    lastname: String,
    /// Opaque encoded credential. Encoding is a collaborator concern.
    password: String,
    enabled: bool,
    account_non_expired: bool,
    account_non_locked: bool,
    credentials_non_expired: bool,
    deleted: bool,
    first_time_login_remaining: bool,
    password_never_expires: bool,
    is_self_service_user: bool,
    cannot_change_password: PasswordChangePolicy,
    office: Office,
    staff: Option<Staff>,
    roles: HashSet<Role>,
    client_mappings: BTreeSet<ClientMapping>,
    last_time_password_updated: NaiveDate,
}

impl AppUser {
    /// Build a user from a validated command plus resolved references.
    ///
    /// When the request asks for credential delivery by side channel
    /// (`sendPasswordToEmail`), the supplied password is replaced with a
    /// randomly generated one. All string fields are trimmed, account
    /// flags default to true, and the client allow-list is built eagerly
    /// from `clients` (only meaningful for self-service users).
    pub fn from_command(
        office: Office,
        linked_staff: Option<Staff>,
        all_roles: HashSet<Role>,
        clients: &[Client],
        command: &JsonCommand,
    ) -> AtriaResult<AppUser> {
        let username = command.string_value_of(USERNAME_PARAM);
        if username.is_empty() {
            return Err(AtriaError::Validation {
                message: "username is required".into(),
            });
        }

        let mut password = command.string_value_of(PASSWORD_PARAM);
        if command.boolean_primitive_value_of(SEND_PASSWORD_TO_EMAIL_PARAM) {
            password = RandomPasswordGenerator::new(GENERATED_PASSWORD_LENGTH).generate();
        }
        if password.is_empty() {
            return Err(AtriaError::Validation {
                message: "password is required".into(),
            });
        }

        let password_never_expires = if command.parameter_exists(PASSWORD_NEVER_EXPIRES_PARAM) {
            command.boolean_primitive_value_of(PASSWORD_NEVER_EXPIRES_PARAM)
        } else {
            false
        };

        let is_self_service_user =
            command.boolean_primitive_value_of(IS_SELF_SERVICE_USER_PARAM);

        let cannot_change_password =
            match command.boolean_object_value_of(CANNOT_CHANGE_PASSWORD_PARAM) {
                None => PasswordChangePolicy::Unset,
                Some(true) => PasswordChangePolicy::Forbidden,
                Some(false) => PasswordChangePolicy::Allowed,
            };

        Ok(AppUser {
            id: Uuid::new_v4(),
            username,
            email: command.string_value_of(EMAIL_PARAM),
            firstname: command.string_value_of(FIRSTNAME_PARAM),
            lastname: command.string_value_of(LASTNAME_PARAM),
            password,
            enabled: true,
            account_non_expired: true,
            account_non_locked: true,
            credentials_non_expired: true,
            deleted: false,
            first_time_login_remaining: true,
            password_never_expires,
            is_self_service_user,
            cannot_change_password,
            office,
            staff: linked_staff,
            roles: all_roles,
            client_mappings: Self::client_mappings_from(clients),
            last_time_password_updated: dates::tenant_local_date(),
        })
    }

    fn client_mappings_from(clients: &[Client]) -> BTreeSet<ClientMapping> {
        clients.iter().map(ClientMapping::new).collect()
    }

    // -- credential lifecycle ----------------------------------------

    /// Replace the stored credential with a new encoded value.
    ///
    /// Clears the first-time-login marker and stamps the password-update
    /// date with the current business date.
    pub fn update_password(&mut self, encoded_password: impl Into<String>) -> AtriaResult<()> {
        if self.cannot_change_password.is_forbidden() {
            return Err(AtriaError::unauthorized(
                "Password of this user may not be modified",
            ));
        }

        self.password = encoded_password.into();
        self.first_time_login_remaining = false;
        self.last_time_password_updated = dates::business_local_date();
        Ok(())
    }

    /// Install the encoded form of the credential resolved at creation
    /// time. Creation-time only: does not touch the first-time-login
    /// marker or the password-update stamp. Later changes go through
    /// [`AppUser::update_password`].
    pub fn encode_password_with<E>(&mut self, encoder: &E) -> AtriaResult<()>
    where
        E: PlatformPasswordEncoder + ?Sized,
    {
        self.password = encoder.encode(&self.password, self.id)?;
        Ok(())
    }

    /// Resolve a new encoded password from a command carrying either a
    /// raw `password` or an already-encoded `passwordEncoded` value.
    /// Returns `None` when the command carries no change.
    pub fn encoded_password<E>(
        &self,
        command: &JsonCommand,
        encoder: &E,
    ) -> AtriaResult<Option<String>>
    where
        E: PlatformPasswordEncoder + ?Sized,
    {
        if command.has_parameter(PASSWORD_PARAM) {
            if command.is_change_in_password_parameter(
                PASSWORD_PARAM,
                &self.password,
                encoder,
                self.id,
            )? {
                return command
                    .password_value_of(PASSWORD_PARAM, encoder, self.id)
                    .map(Some);
            }
        } else if command.has_parameter(PASSWORD_ENCODED_PARAM)
            && command.is_change_in_string_parameter(PASSWORD_ENCODED_PARAM, &self.password)
        {
            return Ok(Some(command.string_value_of(PASSWORD_ENCODED_PARAM)));
        }

        Ok(None)
    }

    // -- identity and association mutation ---------------------------

    /// Change the username. The system account keeps its name.
    pub fn rename(&mut self, new_username: impl Into<String>) -> AtriaResult<()> {
        if self.is_system_user() {
            return Err(AtriaError::unauthorized(
                "User name of current system user may not be modified",
            ));
        }

        self.username = new_username.into();
        Ok(())
    }

    pub fn set_email(&mut self, new_value: impl Into<String>) {
        self.email = new_value.into();
    }

    pub fn set_firstname(&mut self, new_value: impl Into<String>) {
        self.firstname = new_value.into();
    }

    pub fn set_lastname(&mut self, new_value: impl Into<String>) {
        self.lastname = new_value.into();
    }

    pub fn change_office(&mut self, new_value: Office) {
        self.office = new_value;
    }

    pub fn change_staff(&mut self, new_value: Option<Staff>) {
        self.staff = new_value;
    }

    pub fn set_password_never_expires(&mut self, new_value: bool) {
        self.password_never_expires = new_value;
    }

    /// Toggle the self-service flag. Turning it off clears the client
    /// allow-list — mappings are only meaningful for self-service users.
    pub fn set_self_service_user(&mut self, new_value: bool) {
        self.is_self_service_user = new_value;
        if !self.is_self_service_user {
            self.client_mappings.clear();
        }
    }

    /// Replace the role set. An empty replacement is a no-op.
    pub fn update_roles(&mut self, new_roles: HashSet<Role>) {
        if !new_roles.is_empty() {
            self.roles = new_roles;
        }
    }

    /// Reconcile the client allow-list against `clients`.
    ///
    /// For self-service users the stale mappings are retained out and the
    /// new ones added, so the set becomes exactly the mappings of
    /// `clients`. For everyone else the list is cleared regardless of
    /// input.
    pub fn set_clients(&mut self, clients: &[Client]) {
        if self.is_self_service_user {
            let new_mappings = Self::client_mappings_from(clients);
            self.client_mappings
                .retain(|mapping| new_mappings.contains(mapping));
            self.client_mappings.extend(new_mappings);
        } else {
            self.client_mappings.clear();
        }
    }

    /// Soft delete: the record stays in place, flagged out of queries,
    /// with the username rewritten to `{id}_DELETED_{username}` so the
    /// original name is freed for reuse while uniqueness is preserved.
    pub fn delete(&mut self) -> AtriaResult<()> {
        if self.is_system_user() {
            return Err(AtriaError::unauthorized(
                "User configured as the system user cannot be deleted",
            ));
        }

        self.deleted = true;
        self.enabled = false;
        self.account_non_expired = false;
        self.first_time_login_remaining = true;
        self.username = format!("{}_DELETED_{}", self.id, self.username);
        self.roles.clear();
        Ok(())
    }

    // -- permission evaluation ---------------------------------------

    fn has_all_functions_permission(&self) -> bool {
        self.roles
            .iter()
            .any(|role| role.has_permission_to(ALL_FUNCTIONS))
    }

    /// Whether any role grants the wildcard or `permission_code` itself.
    pub fn has_permission_to(&self, permission_code: &str) -> bool {
        self.has_all_functions_permission()
            || self
                .roles
                .iter()
                .any(|role| role.has_permission_to(permission_code))
    }

    fn has_not_permission_to(&self, permission_code: &str) -> bool {
        !self.has_permission_to(permission_code)
    }

    /// Whether any role grants `permission_code` explicitly — the
    /// wildcard does not satisfy this check.
    pub fn has_specific_permission_to(&self, permission_code: &str) -> bool {
        self.roles
            .iter()
            .any(|role| role.has_permission_to(permission_code))
    }

    pub fn has_any_permission(&self, permission_codes: &[&str]) -> bool {
        permission_codes
            .iter()
            .any(|code| self.has_permission_to(code))
    }

    pub fn has_not_permission_for_any_of(&self, permission_codes: &[&str]) -> bool {
        !self.has_any_permission(permission_codes)
    }

    pub fn can_not_approve_loan_in_past(&self) -> bool {
        self.has_not_permission_for_any_of(&[ALL_FUNCTIONS, "APPROVEINPAST_LOAN"])
    }

    pub fn can_not_reject_loan_in_past(&self) -> bool {
        self.has_not_permission_for_any_of(&[ALL_FUNCTIONS, "REJECTINPAST_LOAN"])
    }

    pub fn can_not_withdraw_by_client_loan_in_past(&self) -> bool {
        self.has_not_permission_for_any_of(&[ALL_FUNCTIONS, "WITHDRAWINPAST_LOAN"])
    }

    pub fn can_not_disburse_loan_in_past(&self) -> bool {
        self.has_not_permission_for_any_of(&[ALL_FUNCTIONS, "DISBURSEINPAST_LOAN"])
    }

    pub fn can_not_make_repayment_on_loan_in_past(&self) -> bool {
        self.has_not_permission_for_any_of(&[ALL_FUNCTIONS, "REPAYMENTINPAST_LOAN"])
    }

    /// Exempt from loan write-protection rules.
    pub fn is_bypass_user(&self) -> bool {
        self.has_any_permission(&[BYPASS_LOAN_WRITE_PROTECTION])
    }

    pub fn has_not_permission_for_report(&self, report_name: &str) -> bool {
        let read_permission = format!("READ_{report_name}");
        self.has_not_permission_for_any_of(&[
            ALL_FUNCTIONS,
            ALL_FUNCTIONS_READ,
            REPORTING_SUPER_USER,
            read_permission.as_str(),
        ])
    }

    pub fn has_not_permission_for_datatable(&self, datatable: &str, access_type: &str) -> bool {
        let match_permission = format!("{access_type}_{datatable}");

        if access_type.eq_ignore_ascii_case("READ") {
            return self.has_not_permission_for_any_of(&[
                ALL_FUNCTIONS,
                ALL_FUNCTIONS_READ,
                match_permission.as_str(),
            ]);
        }

        self.has_not_permission_for_any_of(&[ALL_FUNCTIONS, match_permission.as_str()])
    }

    pub fn validate_has_read_permission(&self, resource_type: &str) -> AtriaResult<()> {
        self.validate_has_permission("READ", resource_type)
    }

    pub fn validate_has_create_permission(&self, resource_type: &str) -> AtriaResult<()> {
        self.validate_has_permission("CREATE", resource_type)
    }

    pub fn validate_has_update_permission(&self, resource_type: &str) -> AtriaResult<()> {
        self.validate_has_permission("UPDATE", resource_type)
    }

    pub fn validate_has_delete_permission(&self, resource_type: &str) -> AtriaResult<()> {
        self.validate_has_permission("DELETE", resource_type)
    }

    fn validate_has_permission(&self, prefix: &str, resource_type: &str) -> AtriaResult<()> {
        let match_permission = format!("{prefix}_{}", resource_type.to_uppercase());
        if !self.has_not_permission_for_any_of(&[
            ALL_FUNCTIONS,
            ALL_FUNCTIONS_READ,
            match_permission.as_str(),
        ]) {
            return Ok(());
        }

        Err(AtriaError::unauthorized(format!(
            "User has no authority to {prefix} {}s",
            resource_type.to_lowercase()
        )))
    }

    pub fn validate_has_permission_to(&self, function: &str) -> AtriaResult<()> {
        if self.has_not_permission_to(function) {
            return Err(AtriaError::unauthorized(format!(
                "User has no authority to: {function}"
            )));
        }
        Ok(())
    }

    /// Allow-list variant: at least one of `allowed_permissions` must be
    /// held for `function` to proceed.
    pub fn validate_has_permission_to_any_of(
        &self,
        function: &str,
        allowed_permissions: &[&str],
    ) -> AtriaResult<()> {
        if !self.has_any_permission(allowed_permissions) {
            return Err(AtriaError::unauthorized(format!(
                "User has no authority to: {function}"
            )));
        }
        Ok(())
    }

    /// Read check with the self-read exception: reading one's own user
    /// record bypasses the permission check entirely.
    pub fn validate_has_read_permission_on(
        &self,
        function: &str,
        user_id: Uuid,
    ) -> AtriaResult<()> {
        if function.eq_ignore_ascii_case("USER") && self.has_id_of(user_id) {
            return Ok(());
        }
        self.validate_has_read_permission(function)
    }

    pub fn validate_has_checker_permission_to(&self, function: &str) -> AtriaResult<()> {
        let checker_permission = format!("{}_CHECKER", function.to_uppercase());
        if self.has_not_permission_to(CHECKER_SUPER_USER)
            && self.has_not_permission_to(&checker_permission)
        {
            return Err(AtriaError::unauthorized(format!(
                "User has no authority to be a checker for: {function}"
            )));
        }
        Ok(())
    }

    pub fn validate_has_datatable_read_permission(&self, datatable: &str) -> AtriaResult<()> {
        if self.has_not_permission_for_datatable(datatable, "READ") {
            return Err(AtriaError::unauthorized(format!(
                "Not authorised to read datatable: {datatable}"
            )));
        }
        Ok(())
    }

    // -- read-only state ---------------------------------------------

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn has_id_of(&self, user_id: Uuid) -> bool {
        self.id == user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn is_system_user(&self) -> bool {
        self.username == SYSTEM_USER_NAME
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn firstname(&self) -> &str {
        &self.firstname
    }

    pub fn lastname(&self) -> &str {
        &self.lastname
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_not_enabled(&self) -> bool {
        !self.enabled
    }

    pub fn is_account_non_expired(&self) -> bool {
        self.account_non_expired
    }

    pub fn is_account_non_locked(&self) -> bool {
        self.account_non_locked
    }

    pub fn is_credentials_non_expired(&self) -> bool {
        self.credentials_non_expired
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn is_first_time_login_remaining(&self) -> bool {
        self.first_time_login_remaining
    }

    pub fn password_never_expires(&self) -> bool {
        self.password_never_expires
    }

    pub fn is_self_service_user(&self) -> bool {
        self.is_self_service_user
    }

    pub fn password_change_policy(&self) -> PasswordChangePolicy {
        self.cannot_change_password
    }

    pub fn last_time_password_updated(&self) -> NaiveDate {
        self.last_time_password_updated
    }

    pub fn office(&self) -> &Office {
        &self.office
    }

    pub fn staff(&self) -> Option<&Staff> {
        self.staff.as_ref()
    }

    pub fn staff_id(&self) -> Option<Uuid> {
        self.staff.as_ref().map(|staff| staff.id)
    }

    pub fn staff_display_name(&self) -> Option<&str> {
        self.staff.as_ref().map(Staff::display_name)
    }

    pub fn roles(&self) -> &HashSet<Role> {
        &self.roles
    }

    pub fn client_mappings(&self) -> &BTreeSet<ClientMapping> {
        &self.client_mappings
    }

    /// Staff display name when linked and non-blank, otherwise the
    /// person's own name with blank parts elided.
    pub fn display_name(&self) -> String {
        if let Some(staff) = &self.staff
            && !staff.display_name().trim().is_empty()
        {
            return staff.display_name().to_string();
        }

        let firstname = if self.firstname.trim().is_empty() {
            ""
        } else {
            self.firstname.as_str()
        };
        if !self.lastname.trim().is_empty() {
            return format!("{firstname} {}", self.lastname);
        }
        firstname.to_string()
    }
}

impl GrantedAuthorities for AppUser {
    fn granted_authorities(&self) -> BTreeSet<String> {
        self.roles
            .iter()
            .flat_map(|role| role.permission_codes().map(str::to_string))
            .collect()
    }
}
