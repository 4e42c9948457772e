// src/progress.rs
/// Lightweight progress reporting used by long-running operations (crawl/clean/report).
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of items (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one logical unit completes (e.g., a city was crawled).
    fn item_done(&mut self, _label: &str, _count: usize) {}

    /// Called when a unit yields nothing usable (e.g., a page was skipped).
    fn item_failed(&mut self, _label: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Print-style status for the CLI.
#[derive(Default)]
pub struct ConsoleProgress {
    total: usize,
    done: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }

    fn item_done(&mut self, label: &str, count: usize) {
        self.done += 1;
        if self.total > 0 {
            println!("[{}/{}] {label}: {count}", self.done, self.total);
        } else {
            println!("{label}: {count}");
        }
    }

    fn item_failed(&mut self, label: &str) {
        println!("  skipped {label}");
    }

    fn finish(&mut self) {
        if self.total > 0 {
            println!("Done ({}/{})", self.done, self.total);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Progress;

    /// Records every call; lets tests assert on what a user would see.
    #[derive(Default)]
    pub struct RecordingProgress {
        pub lines: Vec<String>,
        pub done: Vec<(String, usize)>,
        pub failed: Vec<String>,
        pub finished: bool,
    }

    impl Progress for RecordingProgress {
        fn log(&mut self, msg: &str) { self.lines.push(msg.to_string()); }
        fn item_done(&mut self, label: &str, count: usize) { self.done.push((label.to_string(), count)); }
        fn item_failed(&mut self, label: &str) { self.failed.push(label.to_string()); }
        fn finish(&mut self) { self.finished = true; }
    }
}
