//! Property-change notification.
//!
//! A [`Notifier`] holds two lists of handlers: ones that run before a
//! property changes (and see the old and new values) and ones that run after
//! (and see only the property name). Types opt in by implementing
//! [`Observable`], which provides a `set_property` that raises both events
//! only when the value actually changes.
//!
//! # Example
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use sundry::notify::{Observable, Validity};
//!
//! let form = Validity::new();
//! let changes = Arc::new(AtomicUsize::new(0));
//! let seen = Arc::clone(&changes);
//! form.notifier().on_changed(move |e| {
//!     assert_eq!(e.name, "is_valid");
//!     seen.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! assert!(form.set_valid(true));
//! assert!(!form.set_valid(true)); // unchanged, nothing raised
//! assert_eq!(changes.load(Ordering::SeqCst), 1);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Errors raised while building change events.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Parallel name/value lists of different lengths.
    #[error(
        "property names count ({names}) does not match old values count ({old_values}) and new values count ({new_values})"
    )]
    LengthMismatch {
        names: usize,
        old_values: usize,
        new_values: usize,
    },

    /// A value could not be converted to JSON.
    #[error("failed to serialize property value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A command failed with one or more messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error executing command:\n{}", .messages.join("\n"))]
pub struct CommandError {
    pub messages: Vec<String>,
}

impl CommandError {
    pub fn new<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }
}

/// Raised after a property changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyChanged {
    pub name: String,
}

/// Raised before one or more properties change.
///
/// The three lists are parallel: `old_values[i]` and `new_values[i]` belong
/// to `names[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeforeChange {
    names: Vec<String>,
    old_values: Vec<Value>,
    new_values: Vec<Value>,
}

impl BeforeChange {
    /// A change to a single property.
    pub fn single(name: impl Into<String>, old_value: Value, new_value: Value) -> Self {
        Self {
            names: vec![name.into()],
            old_values: vec![old_value],
            new_values: vec![new_value],
        }
    }

    /// A change to several properties at once.
    pub fn many(
        names: Vec<String>,
        old_values: Vec<Value>,
        new_values: Vec<Value>,
    ) -> Result<Self, NotifyError> {
        if names.len() != old_values.len() || names.len() != new_values.len() {
            return Err(NotifyError::LengthMismatch {
                names: names.len(),
                old_values: old_values.len(),
                new_values: new_values.len(),
            });
        }
        Ok(Self {
            names,
            old_values,
            new_values,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn old_values(&self) -> &[Value] {
        &self.old_values
    }

    pub fn new_values(&self) -> &[Value] {
        &self.new_values
    }

    /// `(name, old, new)` for each property.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value, &Value)> {
        self.names
            .iter()
            .zip(&self.old_values)
            .zip(&self.new_values)
            .map(|((name, old), new)| (name.as_str(), old, new))
    }
}

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type ChangedHandler = Arc<dyn Fn(&PropertyChanged) + Send + Sync>;
type BeforeHandler = Arc<dyn Fn(&BeforeChange) + Send + Sync>;

/// Thread-safe registry of change handlers.
///
/// Handlers are invoked outside the registry lock, so a handler may
/// subscribe or unsubscribe without deadlocking.
#[derive(Default)]
pub struct Notifier {
    next_id: AtomicU64,
    changed: RwLock<Vec<(SubscriptionId, ChangedHandler)>>,
    before: RwLock<Vec<(SubscriptionId, BeforeHandler)>>,
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("changed_handlers", &self.changed.read().len())
            .field("before_handlers", &self.before.read().len())
            .finish()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Run `handler` after every property change.
    pub fn on_changed<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&PropertyChanged) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.changed.write().push((id, Arc::new(handler)));
        id
    }

    /// Run `handler` before every property change.
    pub fn on_before_change<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&BeforeChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.before.write().push((id, Arc::new(handler)));
        id
    }

    /// Remove a handler. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut removed = false;
        self.changed.write().retain(|(sid, _)| {
            let keep = *sid != id;
            removed |= !keep;
            keep
        });
        self.before.write().retain(|(sid, _)| {
            let keep = *sid != id;
            removed |= !keep;
            keep
        });
        removed
    }

    /// Number of registered handlers of both kinds.
    pub fn handler_count(&self) -> usize {
        self.changed.read().len() + self.before.read().len()
    }

    /// Notify that `name` changed. True when at least one handler ran.
    pub fn raise_changed(&self, name: &str) -> bool {
        let handlers: Vec<ChangedHandler> =
            self.changed.read().iter().map(|(_, h)| Arc::clone(h)).collect();
        if handlers.is_empty() {
            return false;
        }

        let event = PropertyChanged {
            name: name.to_string(),
        };
        for handler in handlers {
            handler(&event);
        }
        true
    }

    /// Notify that `name` is about to change. True when at least one handler ran.
    pub fn raise_before_change(&self, name: &str, old_value: Value, new_value: Value) -> bool {
        self.dispatch_before(BeforeChange::single(name, old_value, new_value))
    }

    /// [`Notifier::raise_before_change`] for any serializable values.
    pub fn raise_before_change_with<T: Serialize + ?Sized>(
        &self,
        name: &str,
        old_value: &T,
        new_value: &T,
    ) -> Result<bool, NotifyError> {
        let old_value = serde_json::to_value(old_value)?;
        let new_value = serde_json::to_value(new_value)?;
        Ok(self.raise_before_change(name, old_value, new_value))
    }

    /// Notify that several properties are about to change together.
    pub fn raise_before_change_many(
        &self,
        names: Vec<String>,
        old_values: Vec<Value>,
        new_values: Vec<Value>,
    ) -> Result<bool, NotifyError> {
        let event = BeforeChange::many(names, old_values, new_values)?;
        Ok(self.dispatch_before(event))
    }

    fn dispatch_before(&self, event: BeforeChange) -> bool {
        let handlers: Vec<BeforeHandler> =
            self.before.read().iter().map(|(_, h)| Arc::clone(h)).collect();
        if handlers.is_empty() {
            return false;
        }
        for handler in handlers {
            handler(&event);
        }
        true
    }
}

/// A type that announces changes to its properties.
pub trait Observable {
    fn notifier(&self) -> &Notifier;

    /// Store `value` in `slot` if it differs from the current value.
    ///
    /// Raises a before-change event (with JSON snapshots of both values),
    /// updates the slot, then raises a changed event. Returns whether the
    /// value changed. The slot lock is not held while handlers run.
    fn set_property<T>(&self, slot: &Mutex<T>, value: T, name: &str) -> bool
    where
        T: PartialEq + Serialize,
    {
        let old_value = {
            let current = slot.lock();
            if *current == value {
                return false;
            }
            to_json_value(&*current, name)
        };

        self.notifier()
            .raise_before_change(name, old_value, to_json_value(&value, name));
        *slot.lock() = value;
        self.notifier().raise_changed(name);
        true
    }
}

fn to_json_value<T: Serialize>(value: &T, name: &str) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        warn!(property = name, error = %e, "Property value is not representable as JSON");
        Value::Null
    })
}

/// Minimal observable state carrying a validity flag.
#[derive(Debug, Default)]
pub struct Validity {
    notifier: Notifier,
    is_valid: Mutex<bool>,
}

impl Validity {
    /// Start out invalid.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        *self.is_valid.lock()
    }

    /// Update the flag, raising events only when it changes.
    pub fn set_valid(&self, valid: bool) -> bool {
        self.set_property(&self.is_valid, valid, "is_valid")
    }
}

impl Observable for Validity {
    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}
