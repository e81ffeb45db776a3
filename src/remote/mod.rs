mod listing;
mod transport;

pub use listing::{dqm_file, workflow_dirs};
pub use transport::{CurlTransport, Transport};

/// Append one path segment to a listing URL
pub fn join_url(base: &str, segment: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, segment)
    } else {
        format!("{}/{}", base, segment)
    }
}
