//! URL helpers for remote endpoint responses

/// Drop everything from the first `?`, removing signed-URL parameters
pub fn strip_query(url: &str) -> &str {
    match url.find('?') {
        Some(index) => &url[..index],
        None => url,
    }
}

/// Join a backend origin and an endpoint path with exactly one slash
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
