// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod comment_hub;
pub mod password;
pub mod storage;

pub use comment_hub::CommentHub;
pub use storage::StorageService;
