//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_uint(&self, section: &str, key: &str) -> Result<Option<u64>, String> {
        self.config.getuint(section, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[sandbox]
max_depth = 40
timeout_ms = 500
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(adapter.get_uint("sandbox", "max_depth"), Ok(Some(40)));
        assert_eq!(adapter.get_uint("sandbox", "timeout_ms"), Ok(Some(500)));
    }

    #[test]
    fn get_uint_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[sandbox]\nmax_depth = 5\n").unwrap();
        assert_eq!(adapter.get_uint("sandbox", "missing"), Ok(None));
        assert_eq!(adapter.get_uint("missing_section", "max_depth"), Ok(None));
    }

    #[test]
    fn get_uint_missing_is_none() {
        let adapter = FileConfigAdapter::from_string("[sandbox]\n").unwrap();
        assert_eq!(adapter.get_uint("sandbox", "max_depth"), Ok(None));
    }

    #[test]
    fn get_uint_rejects_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[sandbox]\nmax_depth = abc\n").unwrap();
        assert!(adapter.get_uint("sandbox", "max_depth").is_err());
    }

    #[test]
    fn get_uint_rejects_negative() {
        let adapter = FileConfigAdapter::from_string("[sandbox]\ntimeout_ms = -5\n").unwrap();
        assert!(adapter.get_uint("sandbox", "timeout_ms").is_err());
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[sandbox]\ntimeout_ms = 250\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_uint("sandbox", "timeout_ms"), Ok(Some(250)));
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }
}
