use chrono::Utc;

use crate::store::SessionStore;

pub async fn run(store: &SessionStore) {
    tracing::debug!("session_sweep: start");
    let evicted = store.sweep_idle(Utc::now()).await;
    let remaining = store.len().await;
    if evicted > 0 {
        tracing::info!(evicted, remaining, "session_sweep: done");
    } else {
        tracing::debug!(remaining, "session_sweep: nothing to evict");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::deck::StudyState;

    #[tokio::test]
    async fn sweep_keeps_recent_sessions() {
        let store = SessionStore::new(&SessionConfig::default());
        store.create(StudyState::landing()).await.unwrap();
        run(&store).await;
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn sweep_evicts_expired_sessions() {
        let store = SessionStore::new(&SessionConfig {
            idle_ttl_secs: 0,
            max_active: 10,
        });
        store.create(StudyState::landing()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        run(&store).await;
        assert!(store.is_empty().await);
    }
}
