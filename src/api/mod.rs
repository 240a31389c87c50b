//! HTTP endpoint handlers

pub mod authorize;
pub mod discovery;
pub mod token;
pub mod userinfo;
