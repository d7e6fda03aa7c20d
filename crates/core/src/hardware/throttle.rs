//! Per-category notification throttle.
//!
//! Decides whether a notification of a given category may be sent right now,
//! combining the per-category enable flags with a cooldown window. Each
//! category keeps its own last-sent timestamp, so a critical cooldown never
//! suppresses a warning or regular notification.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use crate::alert::NotificationCategory;
use crate::error::CoreError;
use crate::types::Timestamp;

/// Minimum interval between two notifications of the same category.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(30 * 60);

/// When a category's cooldown starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitPolicy {
    /// The cooldown starts as soon as a send is allowed, whether or not the
    /// delivery later succeeds. A failed delivery is not retried inside the
    /// window.
    #[default]
    OnDecision,
    /// The cooldown starts only once the caller reports a successful
    /// delivery through [`NotificationThrottle::record_delivery`].
    ///
    /// Nothing is recorded between the decision and the delivery report, so
    /// two cycles running concurrently can both be allowed to send the same
    /// category.
    OnDelivery,
}

impl FromStr for CommitPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on_decision" | "decision" => Ok(Self::OnDecision),
            "on_delivery" | "delivery" => Ok(Self::OnDelivery),
            other => Err(CoreError::Validation(format!(
                "Unknown notification commit policy '{other}' (expected on_decision or on_delivery)"
            ))),
        }
    }
}

/// Static policy applied by the throttle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottlePolicy {
    pub send_warning: bool,
    pub send_critical: bool,
    pub send_regular: bool,
    pub cooldown: Duration,
    pub commit: CommitPolicy,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            send_warning: true,
            send_critical: true,
            send_regular: true,
            cooldown: DEFAULT_COOLDOWN,
            commit: CommitPolicy::default(),
        }
    }
}

impl ThrottlePolicy {
    /// Whether notifications of `category` are enabled at all.
    pub fn is_enabled(&self, category: NotificationCategory) -> bool {
        match category {
            NotificationCategory::Warning => self.send_warning,
            NotificationCategory::Critical => self.send_critical,
            NotificationCategory::Regular => self.send_regular,
            NotificationCategory::Test => true,
        }
    }
}

/// Tracks the last send per category to suppress repeats within the cooldown.
#[derive(Debug, Default)]
pub struct NotificationThrottle {
    policy: ThrottlePolicy,
    last_sent: HashMap<NotificationCategory, Timestamp>,
}

impl NotificationThrottle {
    pub fn new(policy: ThrottlePolicy) -> Self {
        Self {
            policy,
            last_sent: HashMap::new(),
        }
    }

    pub fn policy(&self) -> &ThrottlePolicy {
        &self.policy
    }

    /// Check if a notification is allowed and, under
    /// [`CommitPolicy::OnDecision`], record it if so.
    ///
    /// Rules in order: test always passes; a disabled category never
    /// passes; a category inside its cooldown does not pass; anything else
    /// passes.
    pub fn should_notify(&mut self, category: NotificationCategory, now: Timestamp) -> bool {
        if category == NotificationCategory::Test {
            return true;
        }
        if !self.policy.is_enabled(category) {
            return false;
        }
        if self.in_cooldown(category, now) {
            return false;
        }
        if self.policy.commit == CommitPolicy::OnDecision {
            self.last_sent.insert(category, now);
        }
        true
    }

    /// Record a confirmed delivery.
    ///
    /// Only has an effect under [`CommitPolicy::OnDelivery`]; under
    /// `OnDecision` the timestamp was already taken by `should_notify`.
    pub fn record_delivery(&mut self, category: NotificationCategory, now: Timestamp) {
        if category == NotificationCategory::Test {
            return;
        }
        if self.policy.commit == CommitPolicy::OnDelivery {
            self.last_sent.insert(category, now);
        }
    }

    /// When `category` was last recorded as sent.
    pub fn last_sent(&self, category: NotificationCategory) -> Option<Timestamp> {
        self.last_sent.get(&category).copied()
    }

    fn in_cooldown(&self, category: NotificationCategory, now: Timestamp) -> bool {
        let Some(last) = self.last_sent.get(&category) else {
            return false;
        };
        let elapsed = now.signed_duration_since(*last);
        match chrono::Duration::from_std(self.policy.cooldown) {
            Ok(cooldown) => elapsed < cooldown,
            // A cooldown too large for chrono is effectively forever.
            Err(_) => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
