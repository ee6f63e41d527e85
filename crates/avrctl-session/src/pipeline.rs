//! Write serialization.
//!
//! At most one line is on its way to the transport at a time. Lines are
//! submitted in the order they were accepted, and a line whose write fails
//! does not stop the ones behind it.

use std::collections::VecDeque;

/// Outcome of completing the in-flight write.
#[derive(Debug)]
pub struct Finished<C> {
    /// Completion handle of the write that just finished.
    pub completion: Option<C>,
    /// Next line to submit, if any were waiting.
    pub next: Option<String>,
}

/// FIFO of outbound lines, each carrying a completion handle `C`.
#[derive(Debug)]
pub struct Pipeline<C> {
    queue: VecDeque<(String, C)>,
    in_flight: Option<C>,
}

impl<C> Default for Pipeline<C> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            in_flight: None,
        }
    }
}

impl<C> Pipeline<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a line. Returns it back when the pipeline was idle and the
    /// caller should submit it now; otherwise it waits its turn.
    pub fn enqueue(&mut self, line: String, completion: C) -> Option<String> {
        if self.in_flight.is_none() {
            self.in_flight = Some(completion);
            Some(line)
        } else {
            self.queue.push_back((line, completion));
            None
        }
    }

    /// Mark the in-flight write as done, successful or not, and promote the
    /// next waiting line.
    pub fn complete(&mut self) -> Finished<C> {
        let completion = self.in_flight.take();
        let next = self.queue.pop_front().map(|(line, next_completion)| {
            self.in_flight = Some(next_completion);
            line
        });
        Finished { completion, next }
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_none() && self.queue.is_empty()
    }

    /// Lines accepted but not yet finished, including the in-flight one.
    pub fn len(&self) -> usize {
        self.queue.len() + usize::from(self.in_flight.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every completion handle, in-flight first.
    pub fn drain(&mut self) -> Vec<C> {
        self.in_flight
            .take()
            .into_iter()
            .chain(self.queue.drain(..).map(|(_, completion)| completion))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_enqueue_submits_immediately() {
        let mut pipeline = Pipeline::new();
        assert!(pipeline.is_idle());
        assert_eq!(pipeline.enqueue("PW?".to_string(), 1), Some("PW?".to_string()));
        assert!(!pipeline.is_idle());
        assert_eq!(pipeline.len(), 1);
    }

    #[test]
    fn busy_enqueue_waits_in_order() {
        let mut pipeline = Pipeline::new();
        pipeline.enqueue("PWON".to_string(), 1);
        assert_eq!(pipeline.enqueue("MUON".to_string(), 2), None);
        assert_eq!(pipeline.enqueue("MV?".to_string(), 3), None);
        assert_eq!(pipeline.len(), 3);

        let first = pipeline.complete();
        assert_eq!(first.completion, Some(1));
        assert_eq!(first.next.as_deref(), Some("MUON"));

        let second = pipeline.complete();
        assert_eq!(second.completion, Some(2));
        assert_eq!(second.next.as_deref(), Some("MV?"));

        let third = pipeline.complete();
        assert_eq!(third.completion, Some(3));
        assert_eq!(third.next, None);
        assert!(pipeline.is_idle());
    }

    #[test]
    fn complete_when_idle_is_harmless() {
        let mut pipeline: Pipeline<u8> = Pipeline::new();
        let finished = pipeline.complete();
        assert!(finished.completion.is_none());
        assert!(finished.next.is_none());
    }

    #[test]
    fn drain_returns_in_flight_first() {
        let mut pipeline = Pipeline::new();
        pipeline.enqueue("A1".to_string(), 'a');
        pipeline.enqueue("B1".to_string(), 'b');
        pipeline.enqueue("C1".to_string(), 'c');

        assert_eq!(pipeline.drain(), vec!['a', 'b', 'c']);
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.enqueue("D1".to_string(), 'd'), Some("D1".to_string()));
    }
}
