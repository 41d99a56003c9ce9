//! Configuration access port trait.

pub trait ConfigPort {
    /// `Ok(None)` when the key is absent, `Err` when present but not an
    /// unsigned integer.
    fn get_uint(&self, section: &str, key: &str) -> Result<Option<u64>, String>;
}
