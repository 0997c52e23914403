pub mod certificate;
pub mod notification;
pub mod student;
