use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    pub student_id: String,
}

/// Identity fields collected by the customer step, validated and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub student_id: String,
}

impl NewCustomer {
    pub fn new(name: &str, student_id: &str) -> BookingResult<Self> {
        let name = name.trim();
        let student_id = student_id.trim();

        if name.is_empty() {
            return Err(BookingError::validation("Name is required"));
        }
        if student_id.is_empty() {
            return Err(BookingError::validation("Student ID is required"));
        }

        Ok(Self {
            name: name.to_string(),
            student_id: student_id.to_string(),
        })
    }
}

impl From<Customer> for NewCustomer {
    fn from(customer: Customer) -> Self {
        Self {
            name: customer.name,
            student_id: customer.student_id,
        }
    }
}

impl From<&NewCustomer> for Customer {
    fn from(customer: &NewCustomer) -> Self {
        Self {
            id: None,
            name: customer.name.clone(),
            student_id: customer.student_id.clone(),
        }
    }
}
