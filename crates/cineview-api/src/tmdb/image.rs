//! TMDB image URL resolution.

/// Base URL of the TMDB image CDN.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Size token used when the caller does not ask for one.
pub const DEFAULT_IMAGE_SIZE: &str = "original";

/// Builds a fully-qualified image URL from a TMDB image path.
///
/// `image_id` is the `*_path` value from an API payload (it starts with `/`).
/// An empty id still yields a well-formed URL that resolves to nothing, so
/// callers that may hold a missing image should branch to a placeholder first.
#[must_use]
pub fn image_url(image_id: &str, size: Option<&str>) -> String {
    let size = size.unwrap_or(DEFAULT_IMAGE_SIZE);
    format!("{IMAGE_BASE_URL}{size}{image_id}")
}
