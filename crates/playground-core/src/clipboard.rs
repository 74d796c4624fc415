/// Contract for the host clipboard, implemented outside the core.
///
/// The core never talks to the OS clipboard directly: it accepts a
/// `PasteCommand` once text is available, regardless of how the text was
/// obtained. On a read failure the calling glue falls back to an OS-level
/// paste gesture delivered through the widget event stream.
pub trait Clipboard {
    /// # Errors
    ///
    /// Returns [`crate::errors::AccessDenied`] when the host refuses
    /// programmatic reads. Recoverable; editing stays usable.
    fn read_text(&self) -> Result<String, crate::errors::AccessDenied>;

    fn write_text(&self, text: &str);
}
