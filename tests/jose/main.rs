//! End-to-end tests of the JWA facade backed by the aws-lc provider.

use jwa::crypto::jose::JWAFacade;
use jwa::crypto::provider::AwsLcProvider;

mod aead;
mod concurrency;
mod jwk;
mod signing;

fn facade() -> JWAFacade<AwsLcProvider> {
    JWAFacade::new(AwsLcProvider::new())
}
