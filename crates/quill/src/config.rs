//! Interpreter configuration

use std::path::PathBuf;

/// Configuration for an [`Interpreter`](crate::Interpreter).
///
/// Controls the recursion limit and where `import`, `read` and `write`
/// look for files.
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Maximum call depth before a `RecursionError`
    pub max_call_depth: usize,

    /// Directory relative paths and local modules resolve against
    pub working_dir: PathBuf,

    /// Installation library directory searched after `working_dir`
    pub lib_dir: Option<PathBuf>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 1000,
            working_dir: PathBuf::from("."),
            lib_dir: None,
        }
    }
}

impl EvalConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration with a custom call depth limit.
    pub fn with_max_call_depth(max_depth: usize) -> Self {
        Self {
            max_call_depth: max_depth,
            ..Default::default()
        }
    }

    /// Set the working directory.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    /// Set the library directory.
    pub fn lib_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.lib_dir = Some(dir.into());
        self
    }

    /// Resolve a script-supplied path against the working directory.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = PathBuf::from(path);
        if path.is_absolute() {
            path
        } else {
            self.working_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvalConfig::default();
        assert_eq!(config.max_call_depth, 1000);
        assert_eq!(config.working_dir, PathBuf::from("."));
        assert!(config.lib_dir.is_none());
    }

    #[test]
    fn test_builders() {
        let config = EvalConfig::with_max_call_depth(10)
            .working_dir("/tmp/work")
            .lib_dir("/opt/quill/lib");
        assert_eq!(config.max_call_depth, 10);
        assert_eq!(config.resolve("a.txt"), PathBuf::from("/tmp/work/a.txt"));
        assert_eq!(config.lib_dir, Some(PathBuf::from("/opt/quill/lib")));
    }
}
