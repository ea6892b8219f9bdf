//! Request target reconstruction.

use crate::edge::request::IncomingRequest;

/// Join a URI path and raw query string with a single `?`.
///
/// The query is appended verbatim: no decoding, re-encoding or reordering.
/// An empty query leaves the path untouched.
pub fn reconstruct_path(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        let mut target = String::with_capacity(path.len() + 1 + query.len());
        target.push_str(path);
        target.push('?');
        target.push_str(query);
        target
    }
}

/// Path plus query of a request, with missing parts defaulted.
pub fn request_target(request: &IncomingRequest) -> String {
    reconstruct_path(request.path(), request.query())
}
