use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct SupportRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub issue: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SupportTicket {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub issue: String,
    pub created: DateTime<Utc>,
}

impl SupportRequest {
    /// First problem found, in form order
    pub fn validate(&self) -> Result<()> {
        let email = Regex::new(r"^\S+@\S+\.\S+$").map_err(|e| AppError::Custom(e.to_string()))?;
        let problem = if self.name.trim().is_empty() {
            Some("Please enter your name.")
        } else if !email.is_match(&self.email) {
            Some("Please enter a valid email.")
        } else if self.phone.trim().is_empty() {
            Some("Please enter your phone number.")
        } else if self.issue.trim().chars().count() < 10 {
            Some("Please describe your issue (at least 10 characters).")
        } else {
            None
        };
        match problem {
            Some(message) => Err(AppError::Validation(message.to_string())),
            None => Ok(()),
        }
    }

    pub fn into_ticket(self) -> Result<SupportTicket> {
        self.validate()?;
        Ok(SupportTicket {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            issue: self.issue.trim().to_string(),
            created: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SupportRequest {
        SupportRequest {
            name: "Sadia".into(),
            email: "sadia@example.com".into(),
            phone: "01700000000".into(),
            issue: "My bKash payout has not arrived yet".into(),
        }
    }

    fn message(r: SupportRequest) -> String {
        r.validate().unwrap_err().to_string()
    }

    #[test]
    fn valid_request_becomes_ticket() {
        let ticket = request().into_ticket().unwrap();
        assert_eq!(ticket.name, "Sadia");
    }

    #[test]
    fn reports_first_problem() {
        let r = SupportRequest {
            name: " ".into(),
            email: "nope".into(),
            ..request()
        };
        assert_eq!(message(r), "Please enter your name.");
        let r = SupportRequest {
            email: "sadia@example".into(),
            ..request()
        };
        assert_eq!(message(r), "Please enter a valid email.");
        let r = SupportRequest {
            phone: "".into(),
            ..request()
        };
        assert_eq!(message(r), "Please enter your phone number.");
        let r = SupportRequest {
            issue: " too short ".into(),
            ..request()
        };
        assert_eq!(
            message(r),
            "Please describe your issue (at least 10 characters)."
        );
    }
}
