use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/v1/employees`
///
/// Validation messages are message keys, localized when the error envelope
/// is built.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployeeRequest {
    #[validate(length(min = 2, max = 100, message = "validation.name.length"))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(range(min = 18, max = 70, message = "validation.age.range"))]
    pub age: u32,

    #[validate(length(min = 1))]
    pub department: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub email: String,
    pub age: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl Employee {
    pub fn from_request(id: impl Into<String>, request: NewEmployeeRequest) -> Self {
        Self {
            id: id.into(),
            name: request.name,
            email: request.email,
            age: request.age,
            department: request.department,
        }
    }
}
