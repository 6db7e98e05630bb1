use std::ffi::{OsStr, OsString};

/// Sets or clears an environment variable for the duration of a test and
/// restores the previous value on drop, even when an assertion fails.
pub struct EnvGuard {
    key: &'static str,
    previous: Option<OsString>,
}

impl EnvGuard {
    pub fn set(key: &'static str, value: impl AsRef<OsStr>) -> Self {
        let previous = std::env::var_os(key);
        std::env::set_var(key, value);
        Self { key, previous }
    }

    pub fn remove(key: &'static str) -> Self {
        let previous = std::env::var_os(key);
        std::env::remove_var(key);
        Self { key, previous }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.previous {
            Some(value) => std::env::set_var(self.key, value),
            None => std::env::remove_var(self.key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEY: &str = "READER_ENV_GUARD_TEST";

    #[test]
    #[serial]
    fn restores_the_previous_value_after_a_failed_assertion() {
        let _outer = EnvGuard::set(KEY, "before");
        let outcome = std::panic::catch_unwind(|| {
            let _inner = EnvGuard::set(KEY, "during");
            assert_eq!(std::env::var(KEY).unwrap(), "something else");
        });
        assert!(outcome.is_err());
        assert_eq!(std::env::var(KEY).unwrap(), "before");
    }

    #[test]
    #[serial]
    fn removes_a_variable_that_was_unset() {
        let _outer = EnvGuard::remove(KEY);
        {
            let _inner = EnvGuard::set(KEY, "during");
            assert_eq!(std::env::var(KEY).unwrap(), "during");
        }
        assert!(std::env::var_os(KEY).is_none());
    }
}
