use common::registry::{FragmentRelease, ReleaseReceiver};
use tokio::sync::watch;

/// Drain fragment releases until shutdown, handing each to the fragment
/// store. Releases still queued at shutdown are drained before returning.
///
/// Returns how many releases were handled.
pub async fn run(releases: ReleaseReceiver, mut shutdown_rx: watch::Receiver<()>) -> usize {
    let mut handled = 0;
    loop {
        tokio::select! {
            release = releases.recv_async() => match release {
                Ok(release) => {
                    announce(&release);
                    handled += 1;
                }
                // every registry handle is gone
                Err(_) => return handled,
            },
            _ = shutdown_rx.changed() => break,
        }
    }

    for release in releases.try_iter() {
        announce(&release);
        handled += 1;
    }
    handled
}

// TODO: forward to the fragment store once it exposes a delete endpoint
fn announce(release: &FragmentRelease) {
    for hash in &release.hashes {
        tracing::info!(
            owner = %release.owner,
            sharing_key = %release.sharing_key.fingerprint(),
            fragment = %hash,
            "fragment released"
        );
    }
}

#[cfg(test)]
mod tests {
    use common::prelude::{hash, Registry, RegistryConfig, SecretKey};

    use super::*;

    #[tokio::test]
    async fn test_worker_drains_on_shutdown() {
        let (tx, rx) = flume::unbounded();
        let (shutdown_tx, shutdown_rx) = watch::channel(());
        let sharing_key = SecretKey::generate().public();

        for i in 0..3u8 {
            tx.send(FragmentRelease {
                owner: "alice".to_string(),
                sharing_key,
                hashes: vec![hash(&[i])],
            })
            .unwrap();
        }
        let _ = shutdown_tx.send(());

        assert_eq!(run(rx, shutdown_rx).await, 3);
    }

    #[tokio::test]
    async fn test_worker_stops_when_registry_is_dropped() {
        let (registry, releases) = Registry::with_releases(RegistryConfig::default());
        let (_shutdown_tx, shutdown_rx) = watch::channel(());

        let worker = tokio::spawn(run(releases, shutdown_rx));
        drop(registry);
        assert_eq!(worker.await.unwrap(), 0);
    }
}
