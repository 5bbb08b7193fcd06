//! Admin screens: one generic remote collection view serving contacts,
//! customers, and blog posts, plus CSV export and the contact reply flow.

pub mod backend;
pub mod collection;
pub mod export;
pub mod query;
pub mod reply;
pub mod resource;

#[cfg(test)]
mod tests;

pub use backend::{AdminBackend, HttpAdminBackend};
pub use collection::{RemoteCollection, ViewEvent};
pub use export::{export_csv, ExportError};
pub use query::{ListFilter, ListQuery, PageEnvelope, Pagination, DEFAULT_PAGE_SIZE};
pub use reply::{compose_reply, ContactInbox, ReplyOutcome};
pub use resource::{
    AdminResource, BlogPost, ContactMessage, ContactStatus, Customer, CustomerStatus, PostStatus,
};
