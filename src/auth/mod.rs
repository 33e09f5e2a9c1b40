pub mod callback;
pub mod oauth;
pub mod pkce;
pub mod scheme;
