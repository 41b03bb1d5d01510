//! Authorization for the sync trigger.

/// A caller may trigger a sync when on the configured allowlist or when
/// holding the Administrator permission in the guild the command came from.
///
/// An empty allowlist does not mean open access: non-admins are denied.
pub fn is_authorized(user_id: u64, is_admin: bool, allowlist: &[u64]) -> bool {
    is_admin || allowlist.contains(&user_id)
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case::allowlisted_user(42, false, vec![7, 42], true)]
    #[case::admin_without_entry(42, true, vec![], true)]
    #[case::admin_and_listed(42, true, vec![42], true)]
    #[case::unknown_user(42, false, vec![7], false)]
    #[case::empty_allowlist_non_admin(42, false, vec![], false)]
    fn authorization_cases(
        #[case] user_id: u64,
        #[case] is_admin: bool,
        #[case] allowlist: Vec<u64>,
        #[case] expected: bool,
    ) {
        assert_eq!(is_authorized(user_id, is_admin, &allowlist), expected);
    }
}
