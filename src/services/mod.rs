//! Business logic services
//!
//! Services sit between the HTTP handlers and the repositories and own
//! validation, authorization, and cross-entity workflows.

pub mod comment;
pub mod email;
pub mod password;
pub mod post;
pub mod tag;
pub mod user;

pub use comment::{CommentService, CommentServiceError};
pub use email::{ContactForm, EmailService, EmailServiceError, Mailer, SmtpMailer};
pub use post::{PostService, PostServiceError};
pub use tag::{TagService, TagServiceError};
pub use user::{LoginInput, RegisterInput, UserService, UserServiceError};
