fn main() {
    println!("Run `cargo test -p e2e` to execute the client/server end-to-end tests.");
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use cmdfiles_client::{
        ClientError, Downloader, Endpoint, RemoteFiles, ScratchArea, TransferOptions,
        UploadReceipt, Uploader,
    };
    use cmdfiles_protocol::constants::CLIENT_MAX_UPLOAD_SIZE;
    use cmdfiles_server::ServerConfig;
    use tokio::sync::mpsc;

    const MIB: usize = 1024 * 1024;

    struct Harness {
        endpoint: Endpoint,
        root: PathBuf,
        scratch: ScratchArea,
        work: PathBuf,
        _tmp: tempfile::TempDir,
    }

    impl Harness {
        async fn start() -> Self {
            Self::start_with(ServerConfig::default().max_upload_size).await
        }

        async fn start_with(max_upload_size: usize) -> Self {
            let tmp = tempfile::tempdir().unwrap();
            let root = tmp.path().join("public");
            let config = ServerConfig {
                port: 0,
                root: root.clone(),
                max_upload_size,
                strict_sequence: false,
            };
            cmdfiles_server::prepare_root(&config).unwrap();

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(cmdfiles_server::serve(listener, config));

            let scratch = ScratchArea::open(tmp.path().join("scratch")).unwrap();
            let work = tmp.path().join("work");
            std::fs::create_dir_all(&work).unwrap();

            Self {
                endpoint: Endpoint::from_base(format!("http://{addr}")),
                root,
                scratch,
                work,
                _tmp: tmp,
            }
        }

        fn uploader(&self, options: TransferOptions) -> Uploader {
            Uploader::new(
                reqwest::Client::new(),
                self.endpoint.clone(),
                self.scratch.clone(),
                options,
            )
        }

        fn downloader(&self) -> Downloader {
            Downloader::new(reqwest::Client::new(), self.endpoint.clone())
        }

        fn remote(&self) -> RemoteFiles {
            RemoteFiles::new(reqwest::Client::new(), self.endpoint.clone())
        }

        fn write_local(&self, name: &str, data: &[u8]) -> PathBuf {
            let path = self.work.join(name);
            std::fs::write(&path, data).unwrap();
            path
        }

        fn work_dir(&self, name: &str) -> String {
            self.work.join(name).to_str().unwrap().to_string()
        }
    }

    fn patterned(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    fn scratch_entries(scratch: &ScratchArea) -> usize {
        std::fs::read_dir(scratch.root()).unwrap().count()
    }

    #[tokio::test]
    async fn large_upload_is_sent_as_three_chunks() {
        let h = Harness::start().await;
        let data = patterned(12 * MIB);
        let src = h.write_local("big.bin", &data);

        let (tx, mut rx) = mpsc::channel::<UploadReceipt>(8);
        let receipts = h
            .uploader(TransferOptions::default())
            .upload(&src, "backups", Some(tx))
            .await
            .unwrap();

        let indices: Vec<u64> = receipts.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert!(receipts.iter().all(|r| r.status == 200 && r.body == "SUCCESS"));
        assert!(receipts.iter().all(|r| r.url.ends_with("/upload/backups")));

        let mut streamed = 0;
        while rx.recv().await.is_some() {
            streamed += 1;
        }
        assert_eq!(streamed, 3);

        let stored = std::fs::read(h.root.join("backups").join("big.bin")).unwrap();
        assert_eq!(stored.len(), data.len());
        assert!(stored == data);

        // Artifacts are removed once sent.
        assert_eq!(scratch_entries(&h.scratch), 0);
    }

    #[tokio::test]
    async fn chunk_boundaries_follow_chunk_size() {
        let h = Harness::start().await;
        let data = patterned(CLIENT_MAX_UPLOAD_SIZE * 2);
        let src = h.write_local("exact.bin", &data);

        let receipts = h
            .uploader(TransferOptions::default())
            .upload(&src, "", None)
            .await
            .unwrap();
        assert_eq!(receipts.len(), 2);
        assert!(std::fs::read(h.root.join("exact.bin")).unwrap() == data);
    }

    #[tokio::test]
    async fn whole_file_upload_is_idempotent() {
        let h = Harness::start().await;
        let src = h.write_local("notes.txt", b"remember the milk");
        let uploader = h.uploader(TransferOptions::default());

        for _ in 0..2 {
            let receipts = uploader.upload(&src, "docs", None).await.unwrap();
            assert_eq!(receipts.len(), 1);
            assert_eq!(receipts[0].index, 0);
            assert_eq!(receipts[0].body, "SUCCESS");
        }

        let stored = std::fs::read(h.root.join("docs").join("notes.txt")).unwrap();
        assert_eq!(stored, b"remember the milk");
    }

    #[tokio::test]
    async fn rejected_chunk_aborts_upload() {
        // Server cap below one client chunk: the first request is refused.
        let h = Harness::start_with(1024).await;
        let src = h.write_local("blob.bin", &patterned(8192));

        let options = TransferOptions {
            chunk_size: 4096,
            threshold: 4096,
            pipeline_depth: 2,
        };
        let err = h.uploader(options).upload(&src, "", None).await.unwrap_err();
        match err {
            ClientError::Status { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, "FILE_TOO_BIG");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!h.root.join("blob.bin").exists());
    }

    #[tokio::test]
    async fn download_round_trip_with_progress() {
        let h = Harness::start().await;
        let data = patterned(6 * MIB);
        std::fs::create_dir_all(h.root.join("media")).unwrap();
        std::fs::write(h.root.join("media").join("clip.mp4"), &data).unwrap();

        let out = h.work_dir("restore");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(Path::new(&out).join("clip.mp4"), b"old local copy").unwrap();

        let (tx, mut rx) = mpsc::channel(16);
        let report = h
            .downloader()
            .download("media/clip.mp4", &out, Some(tx))
            .await
            .unwrap();

        assert_eq!(report.total_bytes, data.len() as u64);
        assert_eq!(report.path, Path::new(&out).join("clip.mp4"));
        assert!(std::fs::read(&report.path).unwrap() == data);

        let mut totals = Vec::new();
        while let Some(progress) = rx.recv().await {
            totals.push(progress.total_bytes);
        }
        // 6 MiB in 2.5 MiB chunks.
        assert_eq!(totals.len(), 3);
        assert!(totals.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(totals.last().copied(), Some(data.len() as u64));
    }

    #[tokio::test]
    async fn download_creates_missing_local_dirs() {
        let h = Harness::start().await;
        std::fs::write(h.root.join("a.txt"), b"abc").unwrap();

        let out = h.work_dir("x/y/z");
        let report = h
            .downloader()
            .with_chunking(2, 1)
            .download("/a.txt", &out, None)
            .await
            .unwrap();
        assert_eq!(report.total_bytes, 3);
        assert_eq!(std::fs::read(&report.path).unwrap(), b"abc");
    }

    #[tokio::test]
    async fn zero_byte_download_creates_empty_file() {
        let h = Harness::start().await;
        std::fs::write(h.root.join("empty.log"), b"").unwrap();

        let out = h.work_dir("dl");
        let report = h.downloader().download("empty.log", &out, None).await.unwrap();
        assert_eq!(report.total_bytes, 0);
        assert!(report.path.is_file());
        assert_eq!(std::fs::metadata(&report.path).unwrap().len(), 0);
    }

    #[tokio::test]
    async fn missing_download_writes_nothing() {
        let h = Harness::start().await;
        let out = h.work_dir("dl");
        std::fs::create_dir_all(&out).unwrap();
        let existing = Path::new(&out).join("ghost.bin");
        std::fs::write(&existing, b"keep me").unwrap();

        let err = h
            .downloader()
            .download("nowhere/ghost.bin", &out, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 404, .. }));
        // Local file untouched because the status is checked first.
        assert_eq!(std::fs::read(&existing).unwrap(), b"keep me");

        let fresh = h.work_dir("fresh");
        assert!(h.downloader().download("missing.bin", &fresh, None).await.is_err());
        assert!(!Path::new(&fresh).join("missing.bin").exists());
    }

    #[tokio::test]
    async fn delete_of_bare_prefix_is_invalid_url() {
        let h = Harness::start().await;
        std::fs::write(h.root.join("keep.txt"), b"x").unwrap();

        let err = h.remote().delete("/").await.unwrap_err();
        match err {
            ClientError::Status { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, "INVALID_URL");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(h.root.join("keep.txt").exists());
    }

    #[tokio::test]
    async fn upload_list_delete_cycle() {
        let h = Harness::start().await;
        let src = h.write_local("report.pdf", b"%PDF-1.7");
        h.uploader(TransferOptions::default())
            .upload(&src, "archive/2024", None)
            .await
            .unwrap();

        let table = h.remote().list("").await.unwrap();
        assert!(table.contains("archive/"));

        let table = h.remote().list("archive/2024").await.unwrap();
        assert!(table.contains("report.pdf"));
        assert!(table.contains("8 B"));

        assert_eq!(h.remote().delete("archive").await.unwrap(), "SUCCESS");
        assert!(!h.root.join("archive").exists());

        let err = h
            .downloader()
            .download("archive/2024/report.pdf", &h.work_dir("dl"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn names_with_spaces_survive_the_url() {
        let h = Harness::start().await;
        let src = h.write_local("my notes.txt", b"spaced");
        h.uploader(TransferOptions::default())
            .upload(&src, "two words", None)
            .await
            .unwrap();
        assert!(h.root.join("two words").join("my notes.txt").is_file());

        let report = h
            .downloader()
            .download("two words/my notes.txt", &h.work_dir("dl"), None)
            .await
            .unwrap();
        assert_eq!(std::fs::read(report.path).unwrap(), b"spaced");
    }
}
