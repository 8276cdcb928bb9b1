//! Raisers: one constructor per error kind
//!
//! Every kind has an eager form returning the `DomainError` and an async form
//! returning an already-failed future for code that propagates failures as
//! values. Both build the error through the same function, so the rendered
//! envelopes are identical.
//!
//! ```
//! use cb_core::{args, errors::raise};
//!
//! fn find(id: u32) -> Result<(), cb_core::errors::DomainError> {
//!     Err(raise::resource_not_found(args!["Employee", id]).add_context("id", id))
//! }
//! assert_eq!(find(42).unwrap_err().stable_code(), "GEN-NF-001");
//! ```

use std::fmt::Display;
use std::future::{ready, Ready};

use serde_json::Value;

use super::domain_error::{BoxError, ConstraintViolation, DomainError, CAUSE_LABEL};
use super::kind::ErrorKindId;

/// Raw key used for missing employees
pub const EMPLOYEE_NOT_FOUND_KEY: &str = "employee.notfound";
/// Raw key used for duplicate employees
pub const EMPLOYEE_EXISTS_KEY: &str = "employee.alreadyExist";

/// Single-shot failed future delivering a `DomainError`
pub type Failed<T> = Ready<Result<T, DomainError>>;

/// Wrap an error as an already-failed future
pub fn failed<T>(error: DomainError) -> Failed<T> {
    ready(Err(error))
}

/// Error of any kind from its id
pub fn raise(id: ErrorKindId, args: Vec<Value>) -> DomainError {
    DomainError::new(id, args)
}

pub fn raise_async<T>(id: ErrorKindId, args: Vec<Value>) -> Failed<T> {
    failed(raise(id, args))
}

/// Error of kind `id` rendered from an alternative message key
pub fn raise_with_key(id: ErrorKindId, message_key: impl Into<String>, args: Vec<Value>) -> DomainError {
    DomainError::new(id, args).with_message_key(message_key.into())
}

macro_rules! raisers {
    ($($name:ident, $async_name:ident => $id:ident;)+) => {
        $(
            pub fn $name(args: Vec<Value>) -> DomainError {
                raise(ErrorKindId::$id, args)
            }

            pub fn $async_name<T>(args: Vec<Value>) -> Failed<T> {
                failed($name(args))
            }
        )+
    };
}

raisers! {
    system_error, system_error_async => SystemError;
    application_service_error, application_service_error_async => ApplicationService;
    authentication_failed, authentication_failed_async => Authentication;
    bad_request, bad_request_async => BadRequest;
    blocked_profile_request, blocked_profile_request_async => BlockedProfileRequest;
    event_processing_failed, event_processing_failed_async => EventProcessing;
    image_conversion_failed, image_conversion_failed_async => ImageConversion;
    invalid_parameter, invalid_parameter_async => InvalidParameter;
    invalid_input, invalid_input_async => InvalidInput;
    max_login_attempts, max_login_attempts_async => MaxLoginAttempt;
    resource_not_found, resource_not_found_async => ResourceNotFound;
    invalid_password, invalid_password_async => InvalidPassword;
    unauthenticated_request, unauthenticated_request_async => UnauthenticatedRequest;
    unauthorized_access, unauthorized_access_async => UnauthorizedAccess;
    session_expired, session_expired_async => ExpiredSession;
    too_many_requests, too_many_requests_async => TooManyRequests;
    invalid_activation_token, invalid_activation_token_async => InvalidActivationToken;
    invalid_jwt_token, invalid_jwt_token_async => InvalidJwtToken;
    unauthenticated_user, unauthenticated_user_async => UnauthenticatedUser;
    unusual_location, unusual_location_async => UnusualLocation;
    invalid_account, invalid_account_async => InvalidAccount;
    unverified_account, unverified_account_async => UnverifiedAccount;
    account_type_not_found, account_type_not_found_async => AccountTypeNotFound;
    inactive_merchant, inactive_merchant_async => InactiveMerchant;
    inactive_account, inactive_account_async => InactiveAccount;
    inactive_profile, inactive_profile_async => InactiveProfile;
    insufficient_fund, insufficient_fund_async => InsufficientFund;
    max_members_reached, max_members_reached_async => MaxMemberAllowed;
    max_users_reached, max_users_reached_async => MaxUserAllowed;
    member_already_exists, member_already_exists_async => MemberExists;
    merchant_already_exists, merchant_already_exists_async => MerchantExists;
    merchant_not_found, merchant_not_found_async => MerchantNotFound;
    account_not_found, account_not_found_async => AccountNotFound;
    user_already_exists, user_already_exists_async => UserExists;
    user_not_found, user_not_found_async => UserNotFound;
    profile_expired, profile_expired_async => ExpiredProfile;
    profile_disabled, profile_disabled_async => DisabledProfile;
    profile_without_attributes, profile_without_attributes_async => NoAttributesProfile;
    profile_locked, profile_locked_async => LockedProfile;
    profile_unverified, profile_unverified_async => UnverifiedProfile;
    connection_timeout, connection_timeout_async => ConnectionTimeout;
    request_timeout, request_timeout_async => RequestTimeout;
    service_unavailable, service_unavailable_async => ServiceUnavailable;
    invalid_location_token, invalid_location_token_async => InvalidLocationToken;
    resource_already_exists, resource_already_exists_async => ResourceExists;
    resource_conversion_failed, resource_conversion_failed_async => ResourceConversion;
    unsupported_media_type, unsupported_media_type_async => MediaTypeNotSupported;
    response_not_writable, response_not_writable_async => MessageNotWritable;
    media_type_not_acceptable, media_type_not_acceptable_async => MediaTypeNotAcceptable;
    json_parse_error, json_parse_error_async => JsonParse;
    request_not_readable, request_not_readable_async => MessageNotReadable;
}

pub fn employee_not_found(args: Vec<Value>) -> DomainError {
    raise_with_key(ErrorKindId::EmployeeNotFound, EMPLOYEE_NOT_FOUND_KEY, args)
}

pub fn employee_not_found_async<T>(args: Vec<Value>) -> Failed<T> {
    failed(employee_not_found(args))
}

pub fn employee_already_exists(args: Vec<Value>) -> DomainError {
    raise_with_key(ErrorKindId::EmployeeExists, EMPLOYEE_EXISTS_KEY, args)
}

pub fn employee_already_exists_async<T>(args: Vec<Value>) -> Failed<T> {
    failed(employee_already_exists(args))
}

/// One error carrying every violation, in the order supplied
pub fn validation_failed(violations: Vec<ConstraintViolation>) -> DomainError {
    DomainError::of(ErrorKindId::ConstraintViolation).with_violations(violations)
}

pub fn validation_failed_async<T>(violations: Vec<ConstraintViolation>) -> Failed<T> {
    failed(validation_failed(violations))
}

/// Catch-all for unanticipated faults
///
/// `detail` is diagnostic text for logs and the debug message; clients see
/// the localized generic message. The cause is kept both as the error source
/// and as a `cause` context entry.
pub fn application_error(detail: impl Display, cause: Option<BoxError>) -> DomainError {
    let mut error = DomainError::of(ErrorKindId::ApplicationError).add_context("detail", detail.to_string());
    if let Some(cause) = cause {
        error = error.add_context(CAUSE_LABEL, cause.to_string()).with_cause(cause);
    }
    error
}

pub fn application_error_async<T>(detail: impl Display, cause: Option<BoxError>) -> Failed<T> {
    failed(application_error(detail, cause))
}

/// A call to an upstream API failed
///
/// The upstream status is recorded as context; the response status stays 424.
pub fn api_response_error(detail: impl Display, upstream_status: Option<u16>, cause: Option<BoxError>) -> DomainError {
    let mut error = DomainError::of(ErrorKindId::FailedDependency).add_context("detail", detail.to_string());
    if let Some(status) = upstream_status {
        error = error.add_context("upstreamStatus", status);
    }
    if let Some(cause) = cause {
        error = error.add_context(CAUSE_LABEL, cause.to_string()).with_cause(cause);
    }
    error
}

pub fn api_response_error_async<T>(detail: impl Display, upstream_status: Option<u16>, cause: Option<BoxError>) -> Failed<T> {
    failed(api_response_error(detail, upstream_status, cause))
}
