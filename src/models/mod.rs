//! Data models
//!
//! This module contains all data structures used throughout the blog backend.
//! Models represent:
//! - Database entities (Post, Comment, Tag, User, Session)
//! - Pagination and input types shared by services and handlers

mod comment;
mod post;
mod session;
mod tag;
mod user;

pub use comment::{Comment, CommentWithAuthor, CreateCommentInput};
pub use post::{
    CreatePostInput, ListParams, PagedResult, Post, UpdatePostInput, DEFAULT_PAGE_SIZE,
};
pub use session::Session;
pub use tag::{slugify, Tag};
pub use user::User;
