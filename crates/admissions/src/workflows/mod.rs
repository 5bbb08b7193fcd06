pub mod admin;
pub mod email;
pub mod intake;
mod notice;

pub use notice::{Notice, NoticeKind};
