use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::backend::UserProfile;

/// Editable profile fields; absent fields are left alone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.avatar.is_none()
    }

    /// Field-level problems, keyed by field name
    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut errors = HashMap::new();

        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                errors.insert("name".to_string(), "Name cannot be empty".to_string());
            } else if name.chars().count() > 100 {
                errors.insert("name".to_string(), "Name must be at most 100 characters".to_string());
            }
        }
        if let Some(email) = &self.email {
            if !is_plausible_email(email) {
                errors.insert("email".to_string(), "Enter a valid email address".to_string());
            }
        }
        if let Some(phone) = &self.phone {
            let digits = phone.chars().filter(char::is_ascii_digit).count();
            let allowed = phone.chars().all(|c| c.is_ascii_digit() || " +-()".contains(c));
            if !allowed || !(7..=15).contains(&digits) {
                errors.insert("phone".to_string(), "Enter a valid phone number".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(name) = &self.name {
            profile.name = name.trim().to_string();
        }
        if let Some(email) = &self.email {
            profile.email = email.trim().to_string();
        }
        if let Some(phone) = &self.phone {
            profile.phone = Some(phone.trim().to_string());
        }
        if let Some(avatar) = &self.avatar {
            profile.avatar = Some(avatar.clone());
        }
    }
}

impl ProfilePatch {
    /// Undo this patch on `profile`, field by field. A field that has changed
    /// again since the patch was applied keeps its newer value.
    pub fn revert_on(&self, profile: &mut UserProfile, previous: &UserProfile) {
        let mut applied = previous.clone();
        self.apply_to(&mut applied);

        if self.name.is_some() && profile.name == applied.name {
            profile.name = previous.name.clone();
        }
        if self.email.is_some() && profile.email == applied.email {
            profile.email = previous.email.clone();
        }
        if self.phone.is_some() && profile.phone == applied.phone {
            profile.phone = previous.phone.clone();
        }
        if self.avatar.is_some() && profile.avatar == applied.avatar {
            profile.avatar = previous.avatar.clone();
        }
    }
}

pub fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && domain.contains('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}
