pub mod context;
pub mod defaults;
pub mod error;
pub mod multi_valued;
pub mod request;

pub use context::{Authorizer, Claims, CognitoAuthenticationType, Identity, RequestContext};
pub use error::FixtureError;
pub use multi_valued::{CaseInsensitive, CaseSensitive, Headers, KeyPolicy, MultiValuedMap, QueryParameters};
pub use request::AwsProxyRequest;
