//! Helper functions shared by templates and commands

pub mod date;
pub mod html;
pub mod url;
