//! Closed catalogue of error kinds
//!
//! Each kind binds an HTTP status, a stable application code and the default
//! message key. Codes are part of the client contract: never reuse or rename
//! one, only append new kinds.

use std::fmt;

/// Static description of one failure category
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ErrorKind {
    pub id: ErrorKindId,
    pub http_status: u16,
    pub stable_code: &'static str,
    pub message_key: &'static str,
}

impl ErrorKind {
    /// 5xx kinds signal faults on our side rather than bad client input
    pub fn is_server_error(&self) -> bool {
        self.http_status >= 500
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stable_code)
    }
}

macro_rules! error_kinds {
    ($($id:ident => ($status:literal, $code:literal, $key:literal)),+ $(,)?) => {
        /// Identifier of a registered error kind
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ErrorKindId {
            $($id),+
        }

        impl ErrorKindId {
            /// Every registered kind, in registry order
            pub const ALL: &'static [ErrorKindId] = &[$(ErrorKindId::$id),+];
        }

        static REGISTRY: &[ErrorKind] = &[
            $(ErrorKind {
                id: ErrorKindId::$id,
                http_status: $status,
                stable_code: $code,
                message_key: $key,
            }),+
        ];
    };
}

error_kinds! {
    SystemError => (500, "SYSTEM-ERR", "sys.def.error"),
    ApplicationError => (500, "APP-DEF-001", "app.def.error"),
    ApplicationService => (422, "APP-SER-001", "app.server.error"),
    Authentication => (401, "AUTH-ERR-001", "auth.error"),
    BadRequest => (400, "BAD-REQ-001", "bad.req.error"),
    BlockedProfileRequest => (429, "BLKD-REQ-001", "blocked.profile.warning"),
    ConstraintViolation => (422, "INV-DATA-001", "data.val.error"),
    EventProcessing => (500, "EVENT-001", "event.error"),
    ImageConversion => (422, "IMG-CONV-001", "img.con.error"),
    InvalidParameter => (400, "INV-PARAM-001", "inv.params.error"),
    InvalidInput => (400, "INV-INPUT-001", "inv.input.error"),
    MaxLoginAttempt => (429, "MAX-LOGIN-ATT-001", "login.attempt.error"),
    ResourceNotFound => (404, "GEN-NF-001", "not.found.error"),
    EmployeeNotFound => (404, "EMP-NF-001", "emp.not.found"),
    InvalidPassword => (400, "INV-PASWD-001", "invalid.password"),
    UnauthenticatedRequest => (401, "UN-AUTH-001", "unath.req.error"),
    UnauthorizedAccess => (403, "UN-ACCESS-001", "unathorized.error"),
    ExpiredSession => (401, "EXP-SESSION-001", "exp.session.error"),
    TooManyRequests => (429, "ILLE_REQ_001", "intrusive.alert.error"),
    InvalidActivationToken => (417, "INV-ATOKEN-001", "activation.token.err"),
    InvalidJwtToken => (401, "INV-JTOKEN-001", "jwt.token.err"),
    UnauthenticatedUser => (401, "USR-UNAUTH-001", "unath.user.err"),
    UnusualLocation => (403, "UN-LOC-001", "unknown.loc.err"),
    InvalidAccount => (403, "INV-ACCT-001", "inv.account.err"),
    UnverifiedAccount => (403, "UNV-ACCT-001", "unverified.acct.err"),
    AccountTypeNotFound => (404, "ACTYP-NF-001", "acct.type.not.found"),
    InactiveMerchant => (403, "NA-M-001", "inactive.merchant.err"),
    InactiveAccount => (403, "NA-ACCT-001", "inactive.acct.err"),
    InactiveProfile => (403, "NA-USR-001", "inactive.profile.err"),
    InsufficientFund => (422, "INS-FUND-001", "ins.fund.err"),
    MaxMemberAllowed => (422, "MAX-MEM-001", "max.member.allowed"),
    MaxUserAllowed => (422, "MAX-USR-001", "max.user.allowed"),
    MemberExists => (409, "MEM-EXIST-001", "member.exist.err"),
    MerchantExists => (409, "M-EXIST-001", "merchant.exist.err"),
    MerchantNotFound => (404, "M-NF-001", "merchant.not.found"),
    AccountNotFound => (404, "ACCT-NF-001", "account.not.found"),
    EmployeeExists => (409, "EMP-EXIST-001", "emp.exist.err"),
    UserExists => (409, "USR-EXIST-001", "user.exist.err"),
    UserNotFound => (404, "USR-NF-001", "user.not.found"),
    ExpiredProfile => (403, "USR-EXP-001", "profile.expired"),
    DisabledProfile => (403, "USR-DIS-001", "profile.disabled"),
    NoAttributesProfile => (403, "USR-NOATTR-001", "profile.noattr"),
    LockedProfile => (423, "USR-LOCK-001", "profile.locked"),
    UnverifiedProfile => (403, "USR-UNV-001", "profile.unverified"),
    ConnectionTimeout => (504, "TIMEOUT-001", "connect.timeout.err"),
    RequestTimeout => (408, "TIMEOUT-002", "request.timeout.err"),
    ServiceUnavailable => (503, "UN-SERV-001", "unavailable.service"),
    InvalidLocationToken => (417, "INV-LOCTOKEN-001", "inv.location.token"),
    ResourceExists => (409, "RSC-EXIST-001", "resource.exist.err"),
    ResourceConversion => (422, "RSC-CONV-001", "resource.conv.err"),
    MediaTypeNotSupported => (415, "HTTP-ERR-0002", "media.type.unsupported"),
    MessageNotWritable => (500, "HTTP-ERR-0003", "request.unwritable"),
    MediaTypeNotAcceptable => (406, "HTTP-ERR-0004", "media.type.unacceptable"),
    JsonParse => (400, "HTTP-ERR-0005", "json.parser.err"),
    MessageNotReadable => (400, "HTTP-ERR-0006", "request.unreadable"),
    FailedDependency => (424, "API-RESP-001", "api.response.err"),
}

impl ErrorKindId {
    /// Registry entry for this id
    pub fn kind(self) -> &'static ErrorKind {
        lookup(self)
    }
}

/// Registry entry for `id`
///
/// The registry is generated from the same list as `ErrorKindId`, so every
/// id has exactly one entry at its discriminant index.
pub fn lookup(id: ErrorKindId) -> &'static ErrorKind {
    let kind = &REGISTRY[id as usize];
    debug_assert_eq!(kind.id, id);
    kind
}

/// Kind registered under a stable code
pub fn lookup_code(stable_code: &str) -> Option<&'static ErrorKind> {
    REGISTRY.iter().find(|kind| kind.stable_code == stable_code)
}

/// All registered kinds
pub fn registry() -> &'static [ErrorKind] {
    REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_id_resolves_to_its_own_entry() {
        assert_eq!(ErrorKindId::ALL.len(), registry().len());
        for &id in ErrorKindId::ALL {
            assert_eq!(lookup(id).id, id);
        }
    }

    #[test]
    fn test_stable_codes_are_unique() {
        let codes: HashSet<_> = registry().iter().map(|kind| kind.stable_code).collect();
        assert_eq!(codes.len(), registry().len());
    }

    #[test]
    fn test_message_keys_are_unique() {
        let keys: HashSet<_> = registry().iter().map(|kind| kind.message_key).collect();
        assert_eq!(keys.len(), registry().len());
    }

    #[test]
    fn test_lookup_code() {
        let kind = lookup_code("EMP-NF-001").unwrap();
        assert_eq!(kind.id, ErrorKindId::EmployeeNotFound);
        assert_eq!(kind.http_status, 404);
        assert!(lookup_code("NOPE-001").is_none());
    }

    #[test]
    fn test_taxonomy_statuses() {
        assert_eq!(ErrorKindId::Authentication.kind().http_status, 401);
        assert_eq!(ErrorKindId::UnauthenticatedUser.kind().http_status, 401);
        assert_eq!(ErrorKindId::ConstraintViolation.kind().http_status, 422);
        assert_eq!(ErrorKindId::ResourceNotFound.kind().http_status, 404);
        assert_eq!(ErrorKindId::ResourceExists.kind().http_status, 409);
        assert_eq!(ErrorKindId::LockedProfile.kind().http_status, 423);
        assert_eq!(ErrorKindId::ExpiredProfile.kind().http_status, 403);
        assert_eq!(ErrorKindId::UnverifiedProfile.kind().http_status, 403);
        assert_eq!(ErrorKindId::DisabledProfile.kind().http_status, 403);
        assert_eq!(ErrorKindId::InvalidActivationToken.kind().http_status, 417);
        assert_eq!(ErrorKindId::InvalidJwtToken.kind().http_status, 401);
        assert_eq!(ErrorKindId::TooManyRequests.kind().http_status, 429);
        assert_eq!(ErrorKindId::FailedDependency.kind().http_status, 424);
        assert_eq!(ErrorKindId::ServiceUnavailable.kind().http_status, 503);
        assert_eq!(ErrorKindId::ApplicationError.kind().http_status, 500);
    }

    #[test]
    fn test_server_error_classification() {
        assert!(ErrorKindId::ApplicationError.kind().is_server_error());
        assert!(!ErrorKindId::ResourceNotFound.kind().is_server_error());
    }
}
