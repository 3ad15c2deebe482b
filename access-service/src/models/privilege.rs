//! Privilege model - named actions and the table of what each one requires.

use serde::{Deserialize, Serialize};

use super::authority::Authority;

/// An action a caller may request on a user or a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Privilege {
    ProjectRead,
    ProjectReadBasic,
    ProjectWrite,
    UserSearch,
    UserReadToken,
    UserReadPushDevice,
    UserReadData,
    UserReadSignupCode,
    UserWriteToken,
    UserWriteData,
    UserWriteSignature,
    UserWritePushDevice,
    UserWriteSignupCode,
    UserWriteAuthority,
    UserWriteVerification,
    UserDeletePushDevice,
    UserDelete,
    MessageTemplateRead,
    MessageTemplateWrite,
    MessageTemplateSend,
}

/// Whether a user may exercise a privilege on their own account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfAccess {
    /// Granted when requester and target are the same user.
    Allowed,
    /// Never granted through self access, even to the acting user.
    Never,
    /// The privilege does not target users; asking is a caller bug.
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrivilegeRule {
    pub privilege: Privilege,
    pub level: Authority,
    pub self_access: SelfAccess,
}

const fn rule(privilege: Privilege, level: Authority, self_access: SelfAccess) -> PrivilegeRule {
    PrivilegeRule {
        privilege,
        level,
        self_access,
    }
}

/// Indexed by `Privilege as usize`; order must match the enum.
pub static PRIVILEGE_RULES: [PrivilegeRule; 20] = [
    rule(Privilege::ProjectRead, Authority::Owner, SelfAccess::Invalid),
    rule(Privilege::ProjectReadBasic, Authority::Default, SelfAccess::Invalid),
    rule(Privilege::ProjectWrite, Authority::Owner, SelfAccess::Invalid),
    rule(Privilege::UserSearch, Authority::Admin, SelfAccess::Allowed),
    rule(Privilege::UserReadToken, Authority::Admin, SelfAccess::Allowed),
    rule(Privilege::UserReadPushDevice, Authority::Admin, SelfAccess::Allowed),
    rule(Privilege::UserReadData, Authority::Moderator, SelfAccess::Allowed),
    rule(Privilege::UserReadSignupCode, Authority::Admin, SelfAccess::Allowed),
    rule(Privilege::UserWriteToken, Authority::Admin, SelfAccess::Allowed),
    rule(Privilege::UserWriteData, Authority::Admin, SelfAccess::Allowed),
    rule(Privilege::UserWriteSignature, Authority::Admin, SelfAccess::Allowed),
    rule(Privilege::UserWritePushDevice, Authority::Admin, SelfAccess::Allowed),
    rule(Privilege::UserWriteSignupCode, Authority::Admin, SelfAccess::Allowed),
    rule(Privilege::UserWriteAuthority, Authority::Owner, SelfAccess::Never),
    rule(Privilege::UserWriteVerification, Authority::Admin, SelfAccess::Never),
    rule(Privilege::UserDeletePushDevice, Authority::Admin, SelfAccess::Allowed),
    rule(Privilege::UserDelete, Authority::Owner, SelfAccess::Allowed),
    rule(Privilege::MessageTemplateRead, Authority::Admin, SelfAccess::Invalid),
    rule(Privilege::MessageTemplateWrite, Authority::Admin, SelfAccess::Invalid),
    rule(Privilege::MessageTemplateSend, Authority::Admin, SelfAccess::Allowed),
];

impl Privilege {
    pub const ALL: [Privilege; 20] = [
        Privilege::ProjectRead,
        Privilege::ProjectReadBasic,
        Privilege::ProjectWrite,
        Privilege::UserSearch,
        Privilege::UserReadToken,
        Privilege::UserReadPushDevice,
        Privilege::UserReadData,
        Privilege::UserReadSignupCode,
        Privilege::UserWriteToken,
        Privilege::UserWriteData,
        Privilege::UserWriteSignature,
        Privilege::UserWritePushDevice,
        Privilege::UserWriteSignupCode,
        Privilege::UserWriteAuthority,
        Privilege::UserWriteVerification,
        Privilege::UserDeletePushDevice,
        Privilege::UserDelete,
        Privilege::MessageTemplateRead,
        Privilege::MessageTemplateWrite,
        Privilege::MessageTemplateSend,
    ];
}

/// Look up the rule for a privilege.
pub fn privilege_rule(privilege: Privilege) -> &'static PrivilegeRule {
    &PRIVILEGE_RULES[privilege as usize]
}

impl std::fmt::Display for Privilege {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
