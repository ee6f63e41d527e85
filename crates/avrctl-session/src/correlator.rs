//! Matching inbound lines to pending queries.
//!
//! Each tag has its own FIFO of pending queries. A response settles the
//! oldest still-waiting query for its tag and nothing else; responses nobody
//! is waiting for become notifications instead.

use std::collections::{HashMap, VecDeque};

use avrctl_codec::{Codec, Tag, Value};
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

use crate::error::{Result, SessionError};
use crate::event::Event;

/// Identifies one registered query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

pub(crate) type Reply = oneshot::Sender<Result<Value>>;

struct PendingRequest {
    id: RequestId,
    reply: Reply,
}

impl PendingRequest {
    /// A request goes inactive when its caller stops waiting (timeout or
    /// drop closes the receiving end).
    fn is_active(&self) -> bool {
        !self.reply.is_closed()
    }
}

/// Per-tag FIFO queues of pending queries.
#[derive(Default)]
pub struct Correlator {
    queues: HashMap<Tag, VecDeque<PendingRequest>>,
    next_id: u64,
}

impl Correlator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a pending query for `tag` behind any earlier ones.
    ///
    /// Queries whose callers already gave up are dropped from the queue
    /// first, so a tag that is never answered holds at most one of them.
    pub(crate) fn register(&mut self, tag: Tag, reply: Reply) -> RequestId {
        self.next_id += 1;
        let id = RequestId(self.next_id);
        let queue = self.queues.entry(tag).or_default();
        let before = queue.len();
        queue.retain(PendingRequest::is_active);
        if queue.len() < before {
            trace!(%tag, expired = before - queue.len(), "pruned expired queries");
        }
        queue.push_back(PendingRequest { id, reply });
        trace!(%tag, ?id, "registered pending query");
        id
    }

    /// Reject one specific pending query, e.g. when its query line failed to
    /// reach the wire.
    pub(crate) fn reject(&mut self, tag: Tag, id: RequestId, error: SessionError) {
        let Some(queue) = self.queues.get_mut(&tag) else {
            return;
        };
        if let Some(position) = queue.iter().position(|entry| entry.id == id) {
            if let Some(entry) = queue.remove(position) {
                let _ = entry.reply.send(Err(error));
            }
        }
        if queue.is_empty() {
            self.queues.remove(&tag);
        }
    }

    /// Reject every pending query.
    pub(crate) fn drain(&mut self, error: impl Fn() -> SessionError) {
        for (_, queue) in self.queues.drain() {
            for entry in queue {
                let _ = entry.reply.send(Err(error()));
            }
        }
    }

    /// Number of queries for `tag` whose callers are still waiting.
    pub fn pending(&self, tag: Tag) -> usize {
        self.queues
            .get(&tag)
            .map(|queue| queue.iter().filter(|entry| entry.is_active()).count())
            .unwrap_or(0)
    }

    /// Process one inbound line and return the notifications it raises, in
    /// emission order.
    pub fn on_line(&mut self, line: &str) -> Vec<Event> {
        let mut events = vec![Event::RawLine(line.to_string())];
        if line.is_empty() {
            return events;
        }

        let Some((tag, body)) = Tag::split_line(line) else {
            debug!(line, "discarding line without a tag");
            return events;
        };
        events.push(Event::RawTagged {
            tag,
            body: body.to_string(),
        });

        let Some(codec) = Codec::for_tag(tag) else {
            // Unknown tags carry their body verbatim and never count as a
            // change.
            if let Some(Ok(value)) = self.settle(tag, Ok(Value::Raw(body.to_string()))) {
                events.push(Event::Unsolicited { tag, value });
            }
            return events;
        };

        match codec.decode(tag, body) {
            Ok(value) => {
                if !value.is_unset() {
                    events.push(Event::Changed {
                        tag,
                        value: value.clone(),
                    });
                }
                if let Some(Ok(value)) = self.settle(tag, Ok(value)) {
                    events.push(Event::Unsolicited { tag, value });
                }
            }
            Err(err) => {
                warn!(%tag, body, error = %err, "failed to decode response");
                if self
                    .settle(tag, Err(SessionError::Codec(err.clone())))
                    .is_some()
                {
                    events.push(Event::Error(err));
                }
            }
        }
        events
    }

    /// Hand `outcome` to the oldest active query for `tag`.
    ///
    /// Inactive entries ahead of it are discarded. Returns the outcome back
    /// when no active query took it.
    fn settle(&mut self, tag: Tag, mut outcome: Result<Value>) -> Option<Result<Value>> {
        let Some(queue) = self.queues.get_mut(&tag) else {
            return Some(outcome);
        };

        let unclaimed = loop {
            let Some(entry) = queue.pop_front() else {
                break Some(outcome);
            };
            if !entry.is_active() {
                trace!(%tag, id = ?entry.id, "skipping expired query");
                continue;
            }
            match entry.reply.send(outcome) {
                Ok(()) => {
                    trace!(%tag, id = ?entry.id, "settled pending query");
                    break None;
                }
                // The caller gave up between the check and the send.
                Err(returned) => outcome = returned,
            }
        };

        if queue.is_empty() {
            self.queues.remove(&tag);
        }
        unclaimed
    }
}

#[cfg(test)]
mod tests {
    use avrctl_codec::CodecError;

    use super::*;

    fn query(correlator: &mut Correlator, tag: Tag) -> oneshot::Receiver<Result<Value>> {
        let (reply, response) = oneshot::channel();
        correlator.register(tag, reply);
        response
    }

    #[test]
    fn fifo_per_tag() {
        let mut correlator = Correlator::new();
        let mut first = query(&mut correlator, Tag::POWER);
        let mut second = query(&mut correlator, Tag::POWER);
        assert_eq!(correlator.pending(Tag::POWER), 2);

        correlator.on_line("PWON");
        correlator.on_line("PWSTANDBY");

        assert_eq!(first.try_recv().unwrap().unwrap(), Value::Switch(true));
        assert_eq!(second.try_recv().unwrap().unwrap(), Value::Switch(false));
        assert_eq!(correlator.pending(Tag::POWER), 0);
    }

    #[test]
    fn one_response_settles_one_query() {
        let mut correlator = Correlator::new();
        let mut first = query(&mut correlator, Tag::MUTE);
        let mut second = query(&mut correlator, Tag::MUTE);

        let events = correlator.on_line("MUON");
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::Unsolicited { .. })));

        assert_eq!(first.try_recv().unwrap().unwrap(), Value::Switch(true));
        assert!(second.try_recv().is_err());
        assert_eq!(correlator.pending(Tag::MUTE), 1);
    }

    #[test]
    fn tags_are_independent() {
        let mut correlator = Correlator::new();
        let mut power = query(&mut correlator, Tag::POWER);
        let mut volume = query(&mut correlator, Tag::MASTER_VOLUME);

        correlator.on_line("MV415");
        correlator.on_line("PWON");

        assert_eq!(volume.try_recv().unwrap().unwrap(), Value::Level(-38.5));
        assert_eq!(power.try_recv().unwrap().unwrap(), Value::Switch(true));
    }

    #[test]
    fn expired_queries_are_skipped() {
        let mut correlator = Correlator::new();
        let expired = query(&mut correlator, Tag::POWER);
        let mut waiting = query(&mut correlator, Tag::POWER);
        drop(expired);
        assert_eq!(correlator.pending(Tag::POWER), 1);

        let events = correlator.on_line("PWON");

        assert_eq!(waiting.try_recv().unwrap().unwrap(), Value::Switch(true));
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::Unsolicited { .. })));
    }

    #[test]
    fn expired_queries_do_not_accumulate() {
        let mut correlator = Correlator::new();
        let zone = Tag::new("Z2").unwrap();
        for _ in 0..1000 {
            drop(query(&mut correlator, zone));
        }
        assert_eq!(correlator.pending(zone), 0);
        assert_eq!(correlator.queues[&zone].len(), 1);

        let mut waiting = query(&mut correlator, zone);
        assert_eq!(correlator.queues[&zone].len(), 1);
        assert_eq!(correlator.pending(zone), 1);

        correlator.on_line("Z2ON");
        assert_eq!(waiting.try_recv().unwrap().unwrap(), Value::Raw("ON".to_string()));
        assert!(correlator.queues.get(&zone).is_none());
    }

    #[test]
    fn late_response_after_expiry_is_unsolicited() {
        let mut correlator = Correlator::new();
        let expired = query(&mut correlator, Tag::POWER);
        drop(expired);

        let events = correlator.on_line("PWSTANDBY");
        assert_eq!(
            events,
            vec![
                Event::RawLine("PWSTANDBY".to_string()),
                Event::RawTagged {
                    tag: Tag::POWER,
                    body: "STANDBY".to_string()
                },
                Event::Changed {
                    tag: Tag::POWER,
                    value: Value::Switch(false)
                },
                Event::Unsolicited {
                    tag: Tag::POWER,
                    value: Value::Switch(false)
                },
            ]
        );
        assert_eq!(correlator.pending(Tag::POWER), 0);
    }

    #[test]
    fn decode_error_rejects_pending_query() {
        let mut correlator = Correlator::new();
        let mut response = query(&mut correlator, Tag::POWER);

        let events = correlator.on_line("PWMAYBE");

        let err = response.try_recv().unwrap().unwrap_err();
        assert!(matches!(
            err,
            SessionError::Codec(CodecError::MalformedResponse { .. })
        ));
        assert!(!events.iter().any(|event| matches!(event, Event::Error(_))));
    }

    #[test]
    fn decode_error_without_query_is_notified() {
        let mut correlator = Correlator::new();
        let events = correlator.on_line("MVLOUD");

        assert!(matches!(
            events.last(),
            Some(Event::Error(CodecError::MalformedResponse { .. }))
        ));
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::Changed { .. } | Event::Unsolicited { .. })));
    }

    #[test]
    fn null_sentinel_suppresses_change_but_resolves_query() {
        let mut correlator = Correlator::new();
        let events = correlator.on_line("SLPOFF");
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::Changed { .. })));
        assert!(events.contains(&Event::Unsolicited {
            tag: Tag::SLEEP_TIMER,
            value: Value::Unset
        }));

        let mut response = query(&mut correlator, Tag::SLEEP_TIMER);
        correlator.on_line("SLPOFF");
        assert_eq!(response.try_recv().unwrap().unwrap(), Value::Unset);
    }

    #[test]
    fn short_and_empty_lines_only_reach_raw_channel() {
        let mut correlator = Correlator::new();
        assert_eq!(
            correlator.on_line("P"),
            vec![Event::RawLine("P".to_string())]
        );
        assert_eq!(correlator.on_line(""), vec![Event::RawLine(String::new())]);
    }

    #[test]
    fn unknown_tags_are_unsolicited_but_never_changes() {
        let mut correlator = Correlator::new();
        let events = correlator.on_line("Z2ON");
        let zone = Tag::new("Z2").unwrap();
        assert_eq!(
            events,
            vec![
                Event::RawLine("Z2ON".to_string()),
                Event::RawTagged {
                    tag: zone,
                    body: "ON".to_string()
                },
                Event::Unsolicited {
                    tag: zone,
                    value: Value::Raw("ON".to_string())
                },
            ]
        );
    }

    #[test]
    fn unknown_tag_query_receives_raw_body() {
        let mut correlator = Correlator::new();
        let zone = Tag::new("Z2").unwrap();
        let mut response = query(&mut correlator, zone);

        let events = correlator.on_line("Z2OFF");
        assert_eq!(
            response.try_recv().unwrap().unwrap(),
            Value::Raw("OFF".to_string())
        );
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::Unsolicited { .. })));
    }

    #[test]
    fn lowercase_tags_are_normalized() {
        let mut correlator = Correlator::new();
        let mut response = query(&mut correlator, Tag::POWER);
        let events = correlator.on_line("pwON");

        assert_eq!(response.try_recv().unwrap().unwrap(), Value::Switch(true));
        assert!(events.contains(&Event::Changed {
            tag: Tag::POWER,
            value: Value::Switch(true)
        }));
    }

    #[test]
    fn reject_removes_only_the_named_query() {
        let mut correlator = Correlator::new();
        let (reply, mut first) = oneshot::channel();
        let id = correlator.register(Tag::INPUT_SOURCE, reply);
        let mut second = query(&mut correlator, Tag::INPUT_SOURCE);

        correlator.reject(Tag::INPUT_SOURCE, id, SessionError::Closed);
        assert!(matches!(
            first.try_recv().unwrap(),
            Err(SessionError::Closed)
        ));

        correlator.on_line("SITUNER");
        assert_eq!(
            second.try_recv().unwrap().unwrap(),
            Value::Source("TUNER".to_string())
        );
    }

    #[test]
    fn drain_rejects_everything() {
        let mut correlator = Correlator::new();
        let mut power = query(&mut correlator, Tag::POWER);
        let mut mute = query(&mut correlator, Tag::MUTE);

        correlator.drain(|| SessionError::Closed);

        assert!(matches!(power.try_recv().unwrap(), Err(SessionError::Closed)));
        assert!(matches!(mute.try_recv().unwrap(), Err(SessionError::Closed)));
        assert_eq!(correlator.pending(Tag::POWER), 0);
    }
}
