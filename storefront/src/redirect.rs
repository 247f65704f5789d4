//! Redirect-safety validation for the authentication callback flow.
//!
//! After a magic-link or OAuth sign-in, the callback page navigates to a
//! caller-supplied "return to" path. That value arrives from a query
//! parameter or a client-persisted slot and is fully attacker-controllable,
//! so it must never be allowed to name another origin. A permissive check
//! here is an open redirect: a crafted login link whose return parameter
//! points at an attacker origin.

/// Returns a path safe for same-origin navigation, or `default_path`.
///
/// The raw value passes through unchanged (after trimming) only when all of
/// the following hold:
///
/// - non-empty after trimming whitespace
/// - begins with a single `/`
/// - does not begin with `//` (protocol-relative, navigates off-origin)
/// - does not contain `://` (absolute URL with scheme)
/// - does not contain `\` (some browsers normalize backslash to `/`)
///
/// Total function: every input, including absence, maps to an output.
pub fn safe_redirect_path(raw: Option<&str>, default_path: &str) -> String {
    let Some(raw) = raw else {
        return default_path.to_owned();
    };

    let trimmed = raw.trim();

    if trimmed.starts_with('/')
        && !trimmed.starts_with("//")
        && !trimmed.contains("://")
        && !trimmed.contains('\\')
    {
        trimmed.to_owned()
    } else {
        default_path.to_owned()
    }
}

/// Resolves the post-authentication destination.
///
/// The `next` query parameter wins over the persisted redirect slot; an
/// empty value counts as absent. Whatever is chosen still goes through
/// [`safe_redirect_path`], falling back to `/`.
pub fn post_auth_destination(query_next: Option<&str>, stored: Option<&str>) -> String {
    let candidate = query_next
        .filter(|s| !s.trim().is_empty())
        .or_else(|| stored.filter(|s| !s.trim().is_empty()));
    safe_redirect_path(candidate, "/")
}
