//! Unit tests for CallContext

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use durastate_domain::CallContext;
    use tokio_util::sync::CancellationToken;

    #[test]
    fn test_background_never_fires() {
        let ctx = CallContext::background();
        assert!(!ctx.is_cancelled());
        assert!(!ctx.is_expired());
        assert!(ctx.deadline().is_none());
    }

    #[test]
    fn test_caller_token_cancels_context() {
        let token = CancellationToken::new();
        let ctx = CallContext::with_cancellation(token.clone());

        token.cancel();

        assert!(ctx.is_cancelled());
    }

    #[test]
    fn test_child_follows_parent() {
        let parent = CallContext::background().timeout(Duration::from_secs(60));
        let child = parent.child();

        assert_eq!(child.deadline(), parent.deadline());
        parent.token().cancel();
        assert!(child.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_expires() {
        let ctx = CallContext::background().timeout(Duration::from_millis(10));
        assert!(!ctx.is_expired());

        tokio::time::advance(Duration::from_millis(11)).await;

        assert!(ctx.is_expired());
    }
}
