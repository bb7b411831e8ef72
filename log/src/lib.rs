use std::sync::Mutex;

use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Trace,
    Notify,
    Warning,
    Error,
}

#[macro_export]
macro_rules! notify {
    () => {};

    ($($arg:tt)*) => {{
        $crate::append(format!($($arg)*), $crate::Level::Notify);
    }};
}

#[macro_export]
macro_rules! warning {
    () => {};

    ($($arg:tt)*) => {{
        $crate::append(format!($($arg)*), $crate::Level::Warning);
    }};
}

#[macro_export]
macro_rules! trace {
    () => {};

    ($($arg:tt)*) => {{
        $crate::append(format!($($arg)*), $crate::Level::Trace);
    }};
}

/// Records the line and then panics with it. Reserved for broken internal invariants.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        let line = format!($($arg)*);
        $crate::append(line.clone(), $crate::Level::Error);
        panic!("{line}");
    }};
}

pub static LOGGER: Lazy<Mutex<Logger<300>>> = Lazy::new(|| Mutex::new(Logger::new()));

/// Push a line onto the global logger.
///
/// A poisoned lock is still written to, a panic elsewhere shouldn't silence the log.
pub fn append(line: String, level: Level) {
    let mut logger = LOGGER.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    logger.append(line, level);
}

/// Copy of every line currently held by the global logger, oldest first.
pub fn snapshot() -> Vec<(String, Level)> {
    let logger = LOGGER.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    logger.iter().map(|(line, level)| (line.clone(), *level)).collect()
}

/// Fixed size ring buffer of log lines. Once full, the oldest lines get overwritten.
pub struct Logger<const N: usize> {
    lines: [(String, Level); N],
    head: usize,
    len: usize,
}

impl<const N: usize> Logger<N> {
    pub fn new() -> Self {
        Self {
            lines: std::array::from_fn(|_| (String::new(), Level::Trace)),
            head: 0,
            len: 0,
        }
    }

    pub fn append(&mut self, line: String, level: Level) {
        self.lines[self.head] = (line, level);
        self.head = (self.head + 1) % N;
        self.len = (self.len + 1).min(N);
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn lines(&self) -> (&[(String, Level)], &[(String, Level)]) {
        if self.len < N {
            (&self.lines[0..self.len], &[])
        } else {
            // wrapped around, so we need to return two slices
            let (a, b) = self.lines.split_at(self.head);

            (b, a)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Level)> {
        let (older, newer) = self.lines();
        older.iter().chain(newer)
    }
}

impl<const N: usize> Default for Logger<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_buffer_wraps() {
        let mut logger = Logger::<3>::new();

        for idx in 0..5 {
            logger.append(format!("line {idx}"), Level::Trace);
        }

        let lines: Vec<&str> = logger.iter().map(|(line, _)| line.as_str()).collect();
        assert_eq!(lines, ["line 2", "line 3", "line 4"]);
        assert_eq!(logger.len(), 3);
    }

    #[test]
    fn clear_forgets_everything() {
        let mut logger = Logger::<4>::new();
        logger.append("a".to_string(), Level::Notify);
        logger.append("b".to_string(), Level::Warning);
        logger.clear();

        assert!(logger.is_empty());
        assert_eq!(logger.iter().count(), 0);
    }

    #[test]
    fn macros_reach_the_global_logger() {
        crate::warning!("unique warning {}", 0x1234);

        assert!(snapshot()
            .iter()
            .any(|(line, level)| line == "unique warning 4660" && *level == Level::Warning));
    }

    #[test]
    #[should_panic(expected = "broken invariant 7")]
    fn error_panics() {
        crate::error!("broken invariant {}", 7);
    }
}
