/// Bind-time failure: a selector value outside the closed language set.
/// Fatal to the bind call that produced it; callers fall back to the
/// default markup mode instead of retrying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedLanguage {
    pub selector: String,
}

impl std::fmt::Display for UnsupportedLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unsupported language selector: {:?}", self.selector)
    }
}

impl std::error::Error for UnsupportedLanguage {}

/// Recoverable clipboard failure. The editing surfaces stay fully usable;
/// UI glue is expected to surface this as a transient notification and
/// fall back to the OS-level paste gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDenied;

impl std::fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("clipboard access denied")
    }
}

impl std::error::Error for AccessDenied {}
