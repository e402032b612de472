use tracing::{info, warn};
use validator::Validate;

use crate::database::Stores;
use crate::dto::profile_dto::CreateProfilePayload;
use crate::error::{Error, Result};
use crate::models::profile::{NewProfile, Profile};
use crate::models::user::Actor;

#[derive(Clone)]
pub struct ProfileService {
    stores: Stores,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ProfileService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Creates the caller's applicant profile. Name and email come from the
    /// account, not the payload.
    pub async fn create(&self, actor: &Actor, payload: CreateProfilePayload) -> Result<Profile> {
        if actor.is_admin() {
            warn!(user_id = %actor.user_id, "admin attempted to create a profile");
            return Err(Error::Forbidden(
                "Only students can create a profile.".to_string(),
            ));
        }
        payload.validate()?;
        payload.check_contact()?;

        let user = self
            .stores
            .users
            .find_by_id(actor.user_id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

        let job_preference = payload.job_category();
        let created = self
            .stores
            .profiles
            .insert(NewProfile {
                user_id: user.id,
                name: user.name,
                email: user.email,
                branch: payload.branch.trim().to_string(),
                cgpa: payload.cgpa,
                college_name: payload.college_name.trim().to_string(),
                contact: payload.contact.trim().to_string(),
                backlogs: payload.backlogs,
                resume_url: non_blank(Some(payload.resume)),
                linkedin_link: non_blank(payload.linkedin_link),
                github_link: non_blank(payload.github_link),
                leetcode_link: non_blank(payload.leetcode_link),
                job_preference,
            })
            .await?;
        let Some(profile) = created else {
            return Err(Error::Conflict("Profile already exists".to_string()));
        };

        info!(profile_id = %profile.id, user_id = %actor.user_id, "profile created");
        Ok(profile)
    }

    pub async fn mine(&self, actor: &Actor) -> Result<Profile> {
        self.stores
            .profiles
            .find_by_user(actor.user_id)
            .await?
            .ok_or_else(|| Error::NotFound("No profile found for this user".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::store::{
        MockApplicationStore, MockCompanyStore, MockProfileStore, MockUserStore,
    };
    use crate::models::user::Role;
    use serde_json::json;
    use std::sync::Arc;
    use uuid::Uuid;

    #[test]
    fn admin_cannot_create_profile() {
        let mut profiles = MockProfileStore::new();
        profiles.expect_insert().times(0);
        let service = ProfileService::new(Stores {
            users: Arc::new(MockUserStore::new()),
            profiles: Arc::new(profiles),
            companies: Arc::new(MockCompanyStore::new()),
            applications: Arc::new(MockApplicationStore::new()),
        });
        let admin = Actor {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
        };
        let payload: CreateProfilePayload = serde_json::from_value(json!({
            "branch": "CSE",
            "cgpa": 8.0,
            "collegeName": "Campus Institute",
            "contact": "9876543210",
            "resume": "https://files.test/cv.pdf"
        }))
        .unwrap();

        let result = tokio_test::block_on(service.create(&admin, payload));
        assert!(matches!(result, Err(Error::Forbidden(_))));
    }
}
