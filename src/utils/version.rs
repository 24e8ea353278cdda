//! Version information

/// Crate version as recorded in Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_semver_like() {
        assert_eq!(VERSION.split('.').count(), 3);
        assert!(VERSION.split('.').all(|part| part.parse::<u64>().is_ok()));
    }
}
