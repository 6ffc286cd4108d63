pub mod audit;
pub mod billing;
pub mod catalog;
pub mod crm;
pub mod health;
pub mod inquiries;
pub mod planning;
pub mod support;
pub mod users;
