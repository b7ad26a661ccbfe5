//! In-process observable values — the push-based plumbing behind device properties.
//!
//! A [`Subject`] holds its latest value and a list of observers. Every
//! published value reaches every observer in publish order, and a new
//! observer first receives the latest value, if there is one. Derived
//! observables are built with [`Observable::map`], [`Observable::filter_map`],
//! [`Observable::distinct_until_changed`] and [`Observable::start_with`].
//!
//! Observers run outside the subject's lock. A value published while a
//! delivery is already in progress (from inside an observer, or from another
//! thread) is queued and delivered by the thread that is already delivering.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use tokio::sync::mpsc;
use tokio_stream::Stream;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

enum Delivery<T> {
    Value(T),
    /// Register an observer and hand it the latest value.
    Subscribe(u64, Callback<T>),
}

struct State<T> {
    latest: Option<T>,
    observers: Vec<(u64, Callback<T>)>,
    pending: VecDeque<Delivery<T>>,
    draining: bool,
    next_id: u64,
}

struct Inner<T> {
    state: Mutex<State<T>>,
    /// Link to the source of a derived observable, kept for as long as this one lives.
    upstream: Mutex<Option<Subscription>>,
}

impl<T: Clone + Send + Sync + 'static> Inner<T> {
    fn new(latest: Option<T>) -> Self {
        Self {
            state: Mutex::new(State {
                latest,
                observers: Vec::new(),
                pending: VecDeque::new(),
                draining: false,
                next_id: 0,
            }),
            upstream: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a delivery. Returns `true` when the caller must drain the queue.
    fn enqueue(&self, delivery: Delivery<T>) -> bool {
        let mut state = self.lock();
        state.pending.push_back(delivery);
        !std::mem::replace(&mut state.draining, true)
    }

    fn drain(&self) {
        loop {
            let (value, targets) = {
                let mut state = self.lock();
                match state.pending.pop_front() {
                    None => {
                        state.draining = false;
                        return;
                    }
                    Some(Delivery::Value(value)) => {
                        state.latest = Some(value.clone());
                        let targets: Vec<Callback<T>> =
                            state.observers.iter().map(|(_, cb)| Arc::clone(cb)).collect();
                        (value, targets)
                    }
                    Some(Delivery::Subscribe(id, callback)) => {
                        state.observers.push((id, Arc::clone(&callback)));
                        match state.latest.clone() {
                            Some(value) => (value, vec![callback]),
                            None => continue,
                        }
                    }
                }
            };

            for callback in targets {
                callback(&value);
            }
        }
    }

    fn publish(&self, value: T) {
        if self.enqueue(Delivery::Value(value)) {
            self.drain();
        }
    }

    fn remove(&self, id: u64) {
        let mut state = self.lock();
        state.observers.retain(|(oid, _)| *oid != id);
        state
            .pending
            .retain(|delivery| !matches!(delivery, Delivery::Subscribe(oid, _) if *oid == id));
    }
}

/// Handle to an observer registration. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new(detach: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.detach.is_some())
            .finish()
    }
}

/// Read side of a replay-latest value stream.
///
/// Cloning is cheap; all clones share the same observers and latest value.
pub struct Observable<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Observable<T> {
    /// The most recently delivered value, if any.
    #[must_use]
    pub fn latest(&self) -> Option<T> {
        self.inner.lock().latest.clone()
    }

    /// Register `observer`; it is called with the latest value right away
    /// (when there is one) and then with every later value.
    pub fn subscribe(&self, observer: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = {
            let mut state = self.inner.lock();
            let id = state.next_id;
            state.next_id += 1;
            id
        };
        if self
            .inner
            .enqueue(Delivery::Subscribe(id, Arc::new(observer)))
        {
            self.inner.drain();
        }

        let inner = Arc::clone(&self.inner);
        Subscription::new(move || inner.remove(id))
    }

    /// Subscribe through an async [`Stream`] instead of a callback.
    #[must_use]
    pub fn stream(&self) -> PropertyStream<T> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let subscription = self.subscribe(move |value| {
            // the receiver may already be gone; the subscription is then dropped with it
            let _ = sender.send(value.clone());
        });
        PropertyStream {
            receiver,
            _subscription: subscription,
        }
    }

    /// Observable of `f` applied to every value.
    pub fn map<U, F>(&self, f: F) -> Observable<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        self.derive(None, move |value, out| out.publish(f(value)))
    }

    /// Observable of the values for which `f` returns `Some`.
    pub fn filter_map<U, F>(&self, f: F) -> Observable<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> Option<U> + Send + Sync + 'static,
    {
        self.derive(None, move |value, out| {
            if let Some(mapped) = f(value) {
                out.publish(mapped);
            }
        })
    }

    /// Observable that skips values equal to the previous one.
    #[must_use]
    pub fn distinct_until_changed(&self) -> Observable<T>
    where
        T: PartialEq,
    {
        let last: Mutex<Option<T>> = Mutex::new(None);
        self.derive(None, move |value, out| {
            {
                let mut last = last.lock().unwrap_or_else(PoisonError::into_inner);
                if last.as_ref() == Some(value) {
                    return;
                }
                *last = Some(value.clone());
            }
            out.publish(value.clone());
        })
    }

    /// Observable that holds `initial` until the source produces a value.
    #[must_use]
    pub fn start_with(&self, initial: T) -> Observable<T> {
        self.derive(Some(initial), |value, out| out.publish(value.clone()))
    }

    fn derive<U, F>(&self, initial: Option<U>, forward: F) -> Observable<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T, &Inner<U>) + Send + Sync + 'static,
    {
        let child = Arc::new(Inner::new(initial));
        let weak = Arc::downgrade(&child);
        let subscription = self.subscribe(move |value| {
            if let Some(child) = weak.upgrade() {
                forward(value, &child);
            }
        });
        *child
            .upstream
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(subscription);
        Observable { inner: child }
    }
}

/// Write side of an [`Observable`].
pub struct Subject<T> {
    observable: Observable<T>,
}

impl<T: Clone + Send + Sync + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self {
            observable: Observable {
                inner: Arc::new(Inner::new(None)),
            },
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Subject<T> {
    /// Create a subject with no value yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `value` to every observer and make it the latest value.
    pub fn publish(&self, value: T) {
        self.observable.inner.publish(value);
    }

    /// Queue `value` without delivering it.
    ///
    /// Returns `true` when the caller must follow up with [`Self::flush`].
    /// Lets a caller fix the delivery order while holding its own lock, then
    /// deliver after releasing it.
    pub(crate) fn enqueue(&self, value: T) -> bool {
        self.observable.inner.enqueue(Delivery::Value(value))
    }

    /// Deliver everything queued by [`Self::enqueue`].
    pub(crate) fn flush(&self) {
        self.observable.inner.drain();
    }

    /// Read handle sharing this subject's observers and latest value.
    #[must_use]
    pub fn observable(&self) -> Observable<T> {
        self.observable.clone()
    }
}

/// Async stream of the values of an [`Observable`].
///
/// Values are buffered without bound, so a slow reader sees every value.
pub struct PropertyStream<T> {
    receiver: mpsc::UnboundedReceiver<T>,
    _subscription: Subscription,
}

impl<T> PropertyStream<T> {
    /// Take the next buffered value without waiting.
    pub fn try_next(&mut self) -> Option<T> {
        self.receiver.try_recv().ok()
    }
}

impl<T> Stream for PropertyStream<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.receiver.poll_recv(cx)
    }
}
