//! Team member model matching the frontend TeamMember interface.

use serde::{Deserialize, Serialize};

/// A team member who can request leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Name of the department (not its id).
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl TeamMember {
    /// Whether this member's email matches `email`, ignoring case and padding.
    pub fn has_email(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }
}

/// Request body for creating a new team member.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    pub name: String,
    pub email: String,
    pub department: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Request body for editing a team member. All editable fields are replaced.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberUpdate {
    pub name: String,
    pub email: String,
    pub department: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl From<&TeamMember> for MemberUpdate {
    fn from(member: &TeamMember) -> Self {
        Self {
            name: member.name.clone(),
            email: member.email.clone(),
            department: member.department.clone(),
            avatar: member.avatar.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_serializes_camel_case_without_empty_avatar() {
        let member = TeamMember {
            id: "1".to_string(),
            name: "Alice Johnson".to_string(),
            email: "alice@company.com".to_string(),
            department: "Engineering".to_string(),
            avatar: None,
        };

        let value = serde_json::to_value(&member).unwrap();
        assert_eq!(value["department"], "Engineering");
        assert!(value.get("avatar").is_none());
    }

    #[test]
    fn test_has_email_ignores_case_and_whitespace() {
        let member = TeamMember {
            id: "1".to_string(),
            name: "Bob".to_string(),
            email: "Bob@Company.com".to_string(),
            department: "Design".to_string(),
            avatar: None,
        };

        assert!(member.has_email(" bob@company.com "));
        assert!(!member.has_email("bobby@company.com"));
    }
}
