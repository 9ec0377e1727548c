pub mod handlers;
pub mod router;

mod tests;
