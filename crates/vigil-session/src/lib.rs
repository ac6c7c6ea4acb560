//! vigil-session
//!
//! Assessment session lifecycle. A synchronous state machine over one
//! instrument attempt, the collaborator traits it talks to (instrument
//! catalog, session persistence), and the async [`assessor::Assessor`]
//! that drives collaborator round-trips on a session's behalf.

pub mod assessor;
pub mod catalog;
pub mod error;
pub mod events;
pub mod persistence;
pub mod session;

use std::future::Future;
use std::pin::Pin;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
