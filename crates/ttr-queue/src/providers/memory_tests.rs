//! Tests for in-memory queue provider.

use super::*;
use std::sync::Arc;

fn provider() -> InMemoryProvider {
    InMemoryProvider::default()
}

async fn receive_now(provider: &InMemoryProvider) -> Option<ReceivedMessage> {
    provider.receive_message(Duration::zero()).await.unwrap()
}

// ============================================================================
// Send and Receive
// ============================================================================

mod send_receive {
    use super::*;

    /// Verify a sent message is received with its body and first receive count.
    #[tokio::test]
    async fn test_send_then_receive() {
        let provider = provider();
        let id = provider
            .send_message("30;hello", Duration::zero())
            .await
            .unwrap();

        let message = receive_now(&provider).await.expect("message available");
        assert_eq!(message.message_id, id);
        assert_eq!(message.body, "30;hello");
        assert_eq!(message.approximate_receive_count, 1);
        assert!(message.usable_receipt().is_some());
    }

    /// Verify an empty queue returns none immediately with a zero wait.
    #[tokio::test]
    async fn test_receive_empty_queue() {
        let provider = provider();
        assert!(receive_now(&provider).await.is_none());
    }

    /// Verify messages are delivered oldest first when all are visible.
    #[tokio::test]
    async fn test_delivery_follows_send_order() {
        let provider = provider();
        provider.send_message("1;a", Duration::zero()).await.unwrap();
        provider.send_message("1;b", Duration::zero()).await.unwrap();

        assert_eq!(receive_now(&provider).await.unwrap().body, "1;a");
        assert_eq!(receive_now(&provider).await.unwrap().body, "1;b");
    }

    /// Verify oversized bodies are rejected.
    #[tokio::test]
    async fn test_message_too_large() {
        let provider = provider();
        let body = "x".repeat(ProviderType::InMemory.max_message_size() + 1);

        let result = provider.send_message(&body, Duration::zero()).await;
        assert!(matches!(result, Err(QueueError::MessageTooLarge { .. })));
    }

    /// Verify delays beyond the provider maximum are rejected.
    #[tokio::test]
    async fn test_delay_out_of_range() {
        let provider = provider();

        let result = provider.send_message("1;x", Duration::seconds(901)).await;
        assert!(matches!(
            result,
            Err(QueueError::ValidationError(ValidationError::OutOfRange { .. }))
        ));
        assert_eq!(provider.message_count(), 0);
    }
}

// ============================================================================
// Visibility Timeout
// ============================================================================

mod visibility {
    use super::*;

    /// Verify a received message is hidden from a second receive.
    #[tokio::test(start_paused = true)]
    async fn test_received_message_is_hidden() {
        let provider = provider();
        provider.send_message("30;job", Duration::zero()).await.unwrap();

        let first = receive_now(&provider).await;
        assert!(first.is_some());
        assert!(receive_now(&provider).await.is_none());
    }

    /// Verify an extended visibility window holds until it elapses, then the
    /// message is redelivered with a new handle and a higher receive count.
    #[tokio::test(start_paused = true)]
    async fn test_redelivery_after_visibility_expires() {
        let provider = provider();
        provider.send_message("60;job", Duration::zero()).await.unwrap();

        let first = receive_now(&provider).await.unwrap();
        let first_receipt = first.usable_receipt().unwrap().clone();
        provider
            .change_visibility(&first_receipt, Duration::seconds(60))
            .await
            .unwrap();

        tokio::time::advance(std::time::Duration::from_secs(59)).await;
        assert!(receive_now(&provider).await.is_none());

        tokio::time::advance(std::time::Duration::from_secs(2)).await;
        let second = receive_now(&provider).await.expect("redelivered");
        assert_eq!(second.message_id, first.message_id);
        assert_eq!(second.approximate_receive_count, 2);
        assert_ne!(second.usable_receipt(), Some(&first_receipt));
    }

    /// Verify the stale handle from the first delivery can no longer act.
    #[tokio::test(start_paused = true)]
    async fn test_stale_handle_after_redelivery() {
        let provider = provider();
        provider.send_message("5;job", Duration::zero()).await.unwrap();

        let first = receive_now(&provider).await.unwrap();
        let stale = first.usable_receipt().unwrap().clone();
        provider
            .change_visibility(&stale, Duration::seconds(5))
            .await
            .unwrap();

        tokio::time::advance(std::time::Duration::from_secs(6)).await;
        let second = receive_now(&provider).await.unwrap();

        let result = provider
            .change_visibility(&stale, Duration::seconds(5))
            .await;
        assert!(matches!(result, Err(QueueError::MessageNotFound { .. })));

        assert!(!provider.delete_message(&stale).await.unwrap());
        assert!(provider
            .delete_message(second.usable_receipt().unwrap())
            .await
            .unwrap());
        assert_eq!(provider.message_count(), 0);
    }

    /// Verify the default visibility timeout applies without a visibility change.
    #[tokio::test(start_paused = true)]
    async fn test_default_visibility_timeout() {
        let provider = InMemoryProvider::new(InMemoryConfig {
            default_visibility_timeout_seconds: 10,
        });
        provider.send_message("1;job", Duration::zero()).await.unwrap();

        receive_now(&provider).await.unwrap();
        tokio::time::advance(std::time::Duration::from_secs(10)).await;
        assert!(receive_now(&provider).await.is_some());
    }

    /// Verify unknown receipt handles are reported as not found.
    #[tokio::test]
    async fn test_change_visibility_unknown_handle() {
        let provider = provider();
        let result = provider
            .change_visibility(&ReceiptHandle::new("missing"), Duration::seconds(10))
            .await;
        assert!(matches!(result, Err(QueueError::MessageNotFound { .. })));
    }
}

// ============================================================================
// Delete, Delay and Purge
// ============================================================================

mod lifecycle {
    use super::*;

    /// Verify deletion acknowledges once and removes the message for good.
    #[tokio::test(start_paused = true)]
    async fn test_delete_removes_message() {
        let provider = provider();
        provider.send_message("1;job", Duration::zero()).await.unwrap();
        let message = receive_now(&provider).await.unwrap();
        let receipt = message.usable_receipt().unwrap().clone();

        assert!(provider.delete_message(&receipt).await.unwrap());
        assert!(!provider.delete_message(&receipt).await.unwrap());

        tokio::time::advance(std::time::Duration::from_secs(3600)).await;
        assert!(receive_now(&provider).await.is_none());
    }

    /// Verify delayed messages stay invisible until the delay elapses.
    #[tokio::test(start_paused = true)]
    async fn test_delayed_delivery() {
        let provider = provider();
        provider.send_message("1;later", Duration::seconds(5)).await.unwrap();

        assert!(receive_now(&provider).await.is_none());
        tokio::time::advance(std::time::Duration::from_secs(5)).await;
        assert_eq!(receive_now(&provider).await.unwrap().body, "1;later");
    }

    /// Verify purge removes visible, delayed and in-flight messages.
    #[tokio::test]
    async fn test_purge_clears_everything() {
        let provider = provider();
        provider.send_message("1;a", Duration::zero()).await.unwrap();
        provider.send_message("1;b", Duration::seconds(60)).await.unwrap();
        provider.send_message("1;c", Duration::zero()).await.unwrap();
        receive_now(&provider).await.unwrap();

        provider.purge().await.unwrap();
        assert_eq!(provider.message_count(), 0);
    }
}

// ============================================================================
// Long Polling
// ============================================================================

mod long_polling {
    use super::*;

    /// Verify an empty long poll waits for the full wait time.
    #[tokio::test(start_paused = true)]
    async fn test_long_poll_times_out() {
        let provider = provider();
        let started = Instant::now();

        let result = provider.receive_message(Duration::seconds(3)).await.unwrap();

        assert!(result.is_none());
        assert!(started.elapsed() >= std::time::Duration::from_secs(3));
    }

    /// Verify waits longer than 20 seconds are clamped.
    #[tokio::test(start_paused = true)]
    async fn test_long_poll_wait_is_clamped() {
        let provider = provider();
        let started = Instant::now();

        provider.receive_message(Duration::seconds(60)).await.unwrap();

        assert!(started.elapsed() < std::time::Duration::from_secs(21));
    }

    /// Verify a waiting receive wakes up when a message is sent.
    #[tokio::test(start_paused = true)]
    async fn test_long_poll_wakes_on_send() {
        let provider = Arc::new(provider());
        let receiver = Arc::clone(&provider);

        let waiting =
            tokio::spawn(async move { receiver.receive_message(Duration::seconds(20)).await });

        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
        provider.send_message("1;wake", Duration::zero()).await.unwrap();

        let message = waiting.await.unwrap().unwrap().expect("woken by send");
        assert_eq!(message.body, "1;wake");
    }

    /// Verify a waiting receive picks up a delayed message once it becomes visible.
    #[tokio::test(start_paused = true)]
    async fn test_long_poll_wakes_on_delay_expiry() {
        let provider = provider();
        provider.send_message("1;soon", Duration::seconds(2)).await.unwrap();

        let message = provider
            .receive_message(Duration::seconds(10))
            .await
            .unwrap()
            .expect("visible after delay");
        assert_eq!(message.body, "1;soon");
    }
}
