// linkstash auth services
// Services implement the authentication core: credential verification and
// session token issue/validate.

pub mod credential_verifier;
pub mod token_service;
