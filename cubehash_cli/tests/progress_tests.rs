#[cfg(test)]
mod progress_tests {
    use cubehash_cli::progress::{
        ChannelProvider, ProgressRenderer, create_progress_infrastructure, format_bytes,
        render_progress,
    };
    use cubehash_core::progress::{ProgressProvider, ProgressUpdate};
    use tokio::sync::mpsc;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1048576), "1.00 MB");
    }

    #[test]
    fn test_progress_renderer_handles_updates() {
        let mut renderer = ProgressRenderer::new("test_file.bin".to_string());

        renderer.handle_update(ProgressUpdate::HashProgress {
            bytes_processed: 512_000,
            total_bytes: 1_000_000,
        });
        renderer.handle_update(ProgressUpdate::Status {
            message: "almost there".to_string(),
        });
        renderer.handle_update(ProgressUpdate::HashProgress {
            bytes_processed: 1_000_000,
            total_bytes: 1_000_000,
        });

        assert_eq!(renderer.updates(), 2);
        renderer.finish();
    }

    #[tokio::test]
    async fn test_named_provider_prefixes_status() {
        let (tx, mut rx) = mpsc::channel(4);
        let provider = ChannelProvider::with_name(tx, "a.bin".to_string());

        provider.report(ProgressUpdate::Status {
            message: "opened".to_string(),
        });

        assert_eq!(
            rx.recv().await,
            Some(ProgressUpdate::Status {
                message: "[a.bin] opened".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_infrastructure_tags_status_with_name() {
        let (provider, mut rx) = create_progress_infrastructure("big.iso".to_string());

        provider.report(ProgressUpdate::Status {
            message: "Hashing 3 bytes with CubeHash rev3/512".to_string(),
        });
        provider.report(ProgressUpdate::HashProgress {
            bytes_processed: 3,
            total_bytes: 3,
        });
        provider.complete();

        assert_eq!(
            rx.recv().await,
            Some(ProgressUpdate::Status {
                message: "[big.iso] Hashing 3 bytes with CubeHash rev3/512".to_string()
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(ProgressUpdate::HashProgress {
                bytes_processed: 3,
                total_bytes: 3
            })
        );
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_complete_closes_channel() {
        let (provider, rx) = create_progress_infrastructure("x".to_string());
        let renderer = tokio::spawn(render_progress(rx, "x".to_string()));

        provider.report(ProgressUpdate::HashProgress {
            bytes_processed: 1,
            total_bytes: 2,
        });
        provider.complete();
        // Reports after completion are dropped
        provider.report(ProgressUpdate::HashProgress {
            bytes_processed: 2,
            total_bytes: 2,
        });

        renderer.await.unwrap();
    }
}
