pub mod feed;
pub mod like;
pub mod post;
pub mod session;
pub mod watch;
mod utils;
