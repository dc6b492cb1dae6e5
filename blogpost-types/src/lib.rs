//! # blogpost-types
//!
//! Wire format types for the Blog-Post REST API.
//!
//! This crate provides the foundational types used across all blogpost
//! crates:
//! - [`PostId`] - Identifier type
//! - [`Post`], [`Comment`], [`UserProfile`] - The data model
//! - Request payloads and response envelopes for every endpoint
//! - [`ApiError`] - The normalized remote-failure taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

mod api;
mod error;
mod ids;
mod models;

pub use api::{
    AckResponse, CommentRequest, CommentsResponse, ErrorBody, LikeRequest, LoginRequest,
    LoginResponse, NewPost, PostResponse, PostUpdate, PostsResponse, RegisterRequest,
    RegisterResponse, UserResponse, REGISTER_SUCCESS_MESSAGE,
};
pub use error::ApiError;
pub use ids::PostId;
pub use models::{Comment, Post, UserProfile};
