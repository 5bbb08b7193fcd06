//! Admissions portal toolkit: the applicant intake wizard, the admin collection
//! views, and the HTTP clients that connect both to the portal backend.

pub mod backend;
pub mod config;
pub mod error;
pub mod files;
pub mod telemetry;
pub mod workflows;
