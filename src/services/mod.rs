pub mod application_service;
pub mod auth_service;
pub mod company_service;
pub mod eligibility;
pub mod profile_service;
