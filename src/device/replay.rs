use super::{
    DeviceError, DeviceErrorCode, LocationProvider, Position, PositionOptions, WatchEvent, WatchId,
};
use chrono::Utc;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::future::{self, Future};
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub options: PositionOptions,
    pub at: Instant,
}

/* A location provider driven by a script instead of a device: one-shot
   requests are answered from a queue (an empty queue answers with a
   timeout) and whatever is pushed through `emit` goes to every live watch.
   Every request is recorded so a caller can inspect what was asked for.
*/
pub struct ReplayLocationProvider {
    supported: bool,
    one_shot: RefCell<VecDeque<Result<Position, DeviceError>>>,
    requests: RefCell<Vec<RecordedRequest>>,
    watches: RefCell<BTreeMap<WatchId, (PositionOptions, UnboundedSender<WatchEvent>)>>,
    cleared: RefCell<Vec<WatchId>>,
    next_watch_id: Cell<u64>,
}

impl ReplayLocationProvider {
    pub fn new() -> Self {
        ReplayLocationProvider {
            supported: true,
            one_shot: RefCell::new(VecDeque::new()),
            requests: RefCell::new(Vec::new()),
            watches: RefCell::new(BTreeMap::new()),
            cleared: RefCell::new(Vec::new()),
            next_watch_id: Cell::new(1),
        }
    }

    /// An environment without any geolocation support.
    pub fn unsupported() -> Self {
        ReplayLocationProvider {
            supported: false,
            ..Self::new()
        }
    }

    pub fn push_fix(&self, result: Result<Position, DeviceError>) {
        self.one_shot.borrow_mut().push_back(result);
    }

    pub fn push_failures(&self, error: DeviceError, count: usize) {
        let mut one_shot = self.one_shot.borrow_mut();
        for _ in 0..count {
            one_shot.push_back(Err(error.clone()));
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    pub fn active_watches(&self) -> Vec<(WatchId, PositionOptions)> {
        self.watches
            .borrow()
            .iter()
            .map(|(id, (options, _))| (*id, *options))
            .collect()
    }

    pub fn cleared_watches(&self) -> Vec<WatchId> {
        self.cleared.borrow().clone()
    }

    /// Delivers `result` to every live watch, returns how many received it.
    pub fn emit(&self, result: Result<Position, DeviceError>) -> usize {
        let result = result.map(|mut position| {
            if position.timestamp_ms.is_none() {
                position.timestamp_ms = Some(Utc::now().timestamp_millis());
            }
            position
        });
        let watches = self.watches.borrow();
        watches
            .iter()
            .filter(|(watch_id, (_, sink))| {
                sink.send(WatchEvent {
                    watch_id: **watch_id,
                    result: result.clone(),
                })
                .is_ok()
            })
            .count()
    }

    pub fn emit_position(&self, latitude: f64, longitude: f64) -> usize {
        self.emit(Ok(Position::new(latitude, longitude)))
    }
}

impl LocationProvider for ReplayLocationProvider {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn get_current_position(
        &self,
        options: PositionOptions,
    ) -> impl Future<Output = Result<Position, DeviceError>> {
        self.requests.borrow_mut().push(RecordedRequest {
            options,
            at: Instant::now(),
        });
        let result = self.one_shot.borrow_mut().pop_front().unwrap_or_else(|| {
            Err(DeviceError::new(
                DeviceErrorCode::Timeout,
                "Timeout expired",
            ))
        });
        future::ready(result)
    }

    fn watch_position(&self, options: PositionOptions, sink: UnboundedSender<WatchEvent>) -> WatchId {
        let watch_id = WatchId(self.next_watch_id.get());
        self.next_watch_id.set(watch_id.0 + 1);
        self.watches.borrow_mut().insert(watch_id, (options, sink));
        watch_id
    }

    fn clear_watch(&self, watch_id: WatchId) {
        if self.watches.borrow_mut().remove(&watch_id).is_some() {
            self.cleared.borrow_mut().push(watch_id);
        } else {
            warn!("[replay] clearing unknown watch {:?}", watch_id);
        }
    }
}
