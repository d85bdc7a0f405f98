//! Request-generation tokens.
//!
//! Every fetch takes a ticket before it starts. When the response arrives it
//! is only applied if no newer ticket has been issued since, so a slow,
//! outdated response can never overwrite the result of a later request.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

#[derive(Clone, Debug, Default)]
pub struct RequestGeneration {
    latest: Arc<AtomicU64>,
}

/// Proof of which request generation a response belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation; every earlier ticket becomes stale.
    pub fn issue(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Drops every in-flight request without starting a new one.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    pub fn current(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::Mutex;

    use super::*;

    #[test]
    fn only_the_latest_ticket_is_current() {
        let requests = RequestGeneration::new();
        let first = requests.issue();
        assert!(requests.is_current(first));

        let second = requests.issue();
        assert!(!requests.is_current(first));
        assert!(requests.is_current(second));

        requests.invalidate();
        assert!(!requests.is_current(second));
    }

    #[test]
    fn clones_share_the_generation_counter() {
        let requests = RequestGeneration::new();
        let handle = requests.clone();
        let ticket = requests.issue();
        handle.issue();
        assert!(!requests.is_current(ticket));
    }

    #[tokio::test]
    async fn slow_stale_response_does_not_overwrite_newer_one() {
        let requests = RequestGeneration::new();
        let shown = std::sync::Arc::new(Mutex::new(String::from("initial")));

        let slow = {
            let ticket = requests.issue();
            let requests = requests.clone();
            let shown = shown.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(60)).await;
                if requests.is_current(ticket) {
                    *shown.lock().await = "march".to_string();
                }
            })
        };
        let fast = {
            let ticket = requests.issue();
            let requests = requests.clone();
            let shown = shown.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                if requests.is_current(ticket) {
                    *shown.lock().await = "april".to_string();
                }
            })
        };

        fast.await.expect("fast task");
        slow.await.expect("slow task");
        assert_eq!(*shown.lock().await, "april");
    }
}
