// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod comment;
pub mod user;
pub mod video;

pub use comment::Comment;
pub use user::{User, UserCredentials};
pub use video::{Rating, Video};
