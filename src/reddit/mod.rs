// Reddit API client — authentication, listing retrieval, normalization.
//
// Built on reqwest against the OAuth API. Each submodule handles one
// area: token acquisition, listing fetches, and the PostSource seam.

pub mod client;
pub mod posts;
pub mod traits;
