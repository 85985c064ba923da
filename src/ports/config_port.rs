//! Configuration access port trait.

/// Read-only view over `[section] key = value` settings.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Integer value, or `default` when the key is missing or not an integer.
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
}
