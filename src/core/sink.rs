/// Display options for [`ProgressSink::info`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InfoOptions {
    pub new_line: bool,
}

/// Where progress status lines are shown while a download runs.
///
/// Only the downloader writes to a sink during a call, one update at a time.
pub trait ProgressSink {
    /// Remove the status line currently on display.
    fn clear_line(&mut self);

    fn info(&mut self, message: &str, options: InfoOptions);
}

impl<S: ProgressSink + ?Sized> ProgressSink for Box<S> {
    fn clear_line(&mut self) {
        (**self).clear_line();
    }

    fn info(&mut self, message: &str, options: InfoOptions) {
        (**self).info(message, options);
    }
}
