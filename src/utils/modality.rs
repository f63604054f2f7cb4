//! Output-modality compatibility checking.

/// Checks whether a server's output modes and a client's accepted output
/// modes are compatible.
///
/// Compatibility holds if either side's set is empty or absent, or if the
/// two sets intersect. Commutative in its two arguments.
///
/// # Example
///
/// ```
/// use a2a_rs::utils::are_modalities_compatible;
///
/// assert!(are_modalities_compatible(&["text/plain".into()], &[]));
/// assert!(are_modalities_compatible(&[], &["text/plain".into()]));
/// assert!(are_modalities_compatible(
///     &["text/plain".into(), "application/json".into()],
///     &["application/json".into()],
/// ));
/// assert!(!are_modalities_compatible(&["text/plain".into()], &["image/png".into()]));
/// ```
pub fn are_modalities_compatible(server_modes: &[String], client_modes: &[String]) -> bool {
    if server_modes.is_empty() || client_modes.is_empty() {
        return true;
    }
    server_modes.iter().any(|m| client_modes.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_either_side_is_compatible() {
        assert!(are_modalities_compatible(&[], &[]));
        assert!(are_modalities_compatible(&["text/plain".to_string()], &[]));
        assert!(are_modalities_compatible(&[], &["text/plain".to_string()]));
    }

    #[test]
    fn intersecting_sets_are_compatible() {
        let server = vec!["text/plain".to_string(), "application/json".to_string()];
        let client = vec!["application/json".to_string()];
        assert!(are_modalities_compatible(&server, &client));
        assert!(are_modalities_compatible(&client, &server));
    }

    #[test]
    fn disjoint_sets_are_incompatible() {
        let server = vec!["text/plain".to_string()];
        let client = vec!["image/png".to_string()];
        assert!(!are_modalities_compatible(&server, &client));
        assert!(!are_modalities_compatible(&client, &server));
    }
}
