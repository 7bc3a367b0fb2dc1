//! Content gateway for the headless CMS
//!
//! Everything the site shows comes from a remote, key-authenticated CMS.
//! This module wraps it in a typed client ([`client::MicroCmsClient`]),
//! a transport trait for test doubles ([`client::CmsClient`]), and the
//! gateway operations the pages consume ([`gateway::ContentGateway`]).

pub mod client;
pub mod gateway;
pub mod model;

#[cfg(test)]
pub mod testing;

pub use client::{CmsClient, CmsError, ListQuery, MicroCmsClient, MAX_LIMIT};
pub use gateway::{degrade, ContentGateway, PostPage};
pub use model::{BlogPost, Category, CmsList, SlugEntry, Thumbnail};
