pub mod instrument;
pub mod result;
pub mod session;
