pub mod audit_service;
pub mod billing_service;
pub mod catalog_service;
pub mod crm_service;
pub mod inquiry_service;
pub mod planning_service;
pub mod support_service;
pub mod user_service;
