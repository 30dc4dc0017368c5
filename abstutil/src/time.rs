use std::time::Instant;

use crate::{prettyprint_usize, PROGRESS_FREQUENCY_SECONDS};

pub fn elapsed_seconds(since: Instant) -> f64 {
    let dt = since.elapsed();
    (dt.as_secs() as f64) + (f64::from(dt.subsec_nanos()) * 1e-9)
}

pub fn prettyprint_time(seconds: f64) -> String {
    format!("{:.4}s", seconds)
}

struct Progress {
    label: String,
    processed_items: usize,
    total_items: usize,
    started_at: Instant,
    last_printed_at: Instant,
}

impl Progress {
    fn new(label: String, total_items: usize) -> Progress {
        Progress {
            label,
            processed_items: 0,
            total_items,
            started_at: Instant::now(),
            last_printed_at: Instant::now(),
        }
    }

    // Returns when done
    fn next(&mut self) -> Option<(f64, String)> {
        self.processed_items += 1;
        if self.processed_items >= self.total_items {
            if self.processed_items > self.total_items {
                warn!(
                    "{} is too few items for {} progress",
                    prettyprint_usize(self.total_items),
                    self.label
                );
            }
            let elapsed = elapsed_seconds(self.started_at);
            let line = format!(
                "{} ({})... {}",
                self.label,
                prettyprint_usize(self.total_items),
                prettyprint_time(elapsed)
            );
            info!("{}", line);
            return Some((elapsed, line));
        }
        if elapsed_seconds(self.last_printed_at) >= PROGRESS_FREQUENCY_SECONDS {
            self.last_printed_at = Instant::now();
            debug!(
                "{}: {}/{}... {}",
                self.label,
                prettyprint_usize(self.processed_items),
                prettyprint_usize(self.total_items),
                prettyprint_time(elapsed_seconds(self.started_at))
            );
        }
        None
    }
}

enum StackEntry {
    TimerSpan(TimerSpan),
    Progress(Progress),
}

struct TimerSpan {
    name: String,
    started_at: Instant,
    nested_results: Vec<String>,
    nested_time: f64,
}

/// Hierarchial timing of a long-running job. Spans and progress go to the log as they happen; a
/// summary, the notes, and every collected warning are repeated when the Timer is dropped, so the
/// interesting bits don't have to be found by scrolling up.
pub struct Timer {
    results: Vec<String>,
    stack: Vec<StackEntry>,

    outermost_name: String,

    notes: Vec<String>,
    warnings: Vec<String>,
}

impl Timer {
    pub fn new<I: Into<String>>(name: I) -> Timer {
        let name = name.into();
        let mut t = Timer {
            results: Vec::new(),
            stack: Vec::new(),
            outermost_name: name.clone(),
            notes: Vec::new(),
            warnings: Vec::new(),
        };
        t.start(name);
        t
    }

    // TODO Shouldn't use this much.
    pub fn throwaway() -> Timer {
        Timer::new("throwaway")
    }

    /// Log immediately, but also repeat at the end.
    pub fn note<I: Into<String>>(&mut self, line: I) {
        let line = line.into();
        info!("{}", line);
        self.notes.push(line);
    }

    /// Collected quietly and repeated at the end.
    pub fn warn<I: Into<String>>(&mut self, line: I) {
        let line = line.into();
        debug!("{}", line);
        self.warnings.push(line);
    }

    pub fn warnings(&self) -> &Vec<String> {
        &self.warnings
    }

    pub fn start<I: Into<String>>(&mut self, name: I) {
        let name = name.into();
        info!("{}...", name);
        self.stack.push(StackEntry::TimerSpan(TimerSpan {
            name,
            started_at: Instant::now(),
            nested_results: Vec::new(),
            nested_time: 0.0,
        }));
    }

    pub fn stop<I: Into<String>>(&mut self, name: I) {
        let name = name.into();
        let span = match self.stack.pop() {
            Some(StackEntry::TimerSpan(s)) => s,
            Some(StackEntry::Progress(p)) => {
                error!("stop({}) while {} progress is unfinished", name, p.label);
                return;
            }
            None => {
                error!("stop({}) with nothing started", name);
                return;
            }
        };
        if span.name != name {
            error!("stop({}) doesn't match the current span {}", name, span.name);
        }
        let elapsed = elapsed_seconds(span.started_at);
        let line = format!("{} took {}", span.name, prettyprint_time(elapsed));

        let padding = "  ".repeat(self.stack.len());
        match self.stack.last_mut() {
            Some(StackEntry::TimerSpan(ref mut s)) => {
                s.nested_results.push(format!("{}- {}", padding, line));
                s.nested_results.extend(span.nested_results);
                s.nested_time += elapsed;
            }
            _ => {
                self.results.push(format!("{}- {}", padding, line));
                self.results.extend(span.nested_results);
            }
        }

        info!("{}", line);
    }

    pub fn start_iter<I: Into<String>>(&mut self, name: I, total_items: usize) {
        if total_items == 0 {
            return;
        }
        let name = name.into();
        if let Some(StackEntry::Progress(p)) = self.stack.last() {
            error!(
                "Can't start_iter({}) while Progress({}) is top of the stack",
                name, p.label
            );
            return;
        }

        self.stack
            .push(StackEntry::Progress(Progress::new(name, total_items)));
    }

    pub fn next(&mut self) {
        let maybe_result =
            if let Some(StackEntry::Progress(ref mut progress)) = self.stack.last_mut() {
                progress.next()
            } else {
                error!("Can't next() while a TimerSpan is top of the stack");
                None
            };
        if let Some((elapsed, result)) = maybe_result {
            self.stack.pop();
            self.add_result(elapsed, result);
        }
    }

    fn add_result(&mut self, elapsed: f64, line: String) {
        let padding = "  ".repeat(self.stack.len());
        match self.stack.last_mut() {
            Some(StackEntry::TimerSpan(ref mut s)) => {
                s.nested_results.push(format!("{}- {}", padding, line));
                s.nested_time += elapsed;
            }
            _ => {
                self.results.push(format!("{}- {}", padding, line));
            }
        }
    }

    /// Runs the callback over every request on a pool of worker threads. Results come back in the
    /// same order as the requests, no matter which thread finished first.
    pub fn parallelize<I, O, F: Fn(I) -> O>(
        &mut self,
        timer_name: &str,
        requests: Vec<I>,
        cb: F,
    ) -> Vec<O>
    where
        I: Send,
        O: Send,
        F: Send + Clone + Copy,
    {
        let num_requests = requests.len();
        let mut results: Vec<Option<O>> = std::iter::repeat_with(|| None)
            .take(num_requests)
            .collect();
        scoped_threadpool::Pool::new(num_cpus::get() as u32).scoped(|scope| {
            let (tx, rx) = std::sync::mpsc::channel();
            for (idx, req) in requests.into_iter().enumerate() {
                let tx = tx.clone();
                scope.execute(move || {
                    // The receiver outlives every worker
                    let _ = tx.send((idx, cb(req)));
                });
            }
            drop(tx);

            self.start_iter(timer_name, num_requests);
            for (idx, result) in rx.iter() {
                self.next();
                results[idx] = Some(result);
            }
        });
        results.into_iter().flatten().collect()
    }
}

impl std::ops::Drop for Timer {
    fn drop(&mut self) {
        // If we're in the middle of unwinding a panic, don't further blow up.
        if std::thread::panicking() {
            return;
        }

        // Finish any progress or spans that were left hanging.
        while let Some(entry) = self.stack.last() {
            match entry {
                StackEntry::TimerSpan(s) => {
                    let name = s.name.clone();
                    self.stop(name);
                }
                StackEntry::Progress(_) => {
                    self.stack.pop();
                }
            }
        }

        if self.outermost_name == "throwaway" {
            return;
        }

        for line in &self.results {
            info!("{}", line);
        }

        if !self.notes.is_empty() {
            info!("{} notes:", self.notes.len());
            for line in &self.notes {
                info!("{}", line);
            }
        }
        if !self.warnings.is_empty() {
            warn!("{} warnings:", self.warnings.len());
            for line in &self.warnings {
                warn!("{}", line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallelize_keeps_order() {
        let mut timer = Timer::throwaway();
        let offset = 10;
        let results = timer.parallelize("square", (0..100).collect(), |x: usize| x * x + offset);
        assert_eq!(results, (0..100).map(|x| x * x + 10).collect::<Vec<_>>());
    }

    #[test]
    fn warnings_are_kept() {
        let mut timer = Timer::throwaway();
        timer.start("inner");
        timer.warn("something odd");
        timer.stop("inner");
        assert_eq!(timer.warnings(), &vec!["something odd".to_string()]);
    }
}
