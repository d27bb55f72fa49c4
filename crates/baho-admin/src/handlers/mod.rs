//! Route handlers, one module per area of the panel.
//!
//! Admin handlers take an [`AdminSession`](crate::auth::AdminSession) as
//! their first argument; the vote endpoints are public.

pub mod export;
pub mod login;
pub mod password;
pub mod qr;
pub mod reset;
pub mod staff;
pub mod vote;
