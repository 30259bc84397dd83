pub mod token_client;

pub use token_client::{TokenAndSubdomain, TokenClient, TOKEN_ENDPOINT_PATH};
