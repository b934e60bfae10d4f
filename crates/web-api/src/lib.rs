pub mod handlers;
pub mod server;

pub use handlers::ApiContext;
pub use server::ApiServer;
