//! Wire-facing types shared between the session client and its front-ends.

pub mod domain;
pub mod error;
pub mod protocol;
