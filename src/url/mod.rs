//! URL handling module for Sumi-Robots
//!
//! This module turns arbitrary request URLs into the site they belong to and
//! the request path that robots.txt rules are matched against.

mod canonicalize;
mod site;

pub use canonicalize::{canonicalize, request_path, IntoRequestUrl};
pub use site::Site;

/// Path of the robots.txt resource at every site root
///
/// A request for exactly this path is always allowed, so a crawler can
/// always fetch the policy document itself.
pub const ROBOTS_TXT_PATH: &str = "/robots.txt";

/// Returns true if the request path is the site's robots.txt resource
pub fn is_robots_txt_path(request_path: &str) -> bool {
    request_path == ROBOTS_TXT_PATH
}
