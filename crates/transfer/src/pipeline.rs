//! Bounded reader/writer pipeline.
//!
//! A producer task reads a byte source in fixed-capacity chunks and pushes
//! them onto a bounded channel; the consumer pulls them in FIFO order. The
//! producer blocks once `depth` chunks are in flight, so at most
//! `depth * chunk_size` bytes are buffered regardless of source length.
//!
//! The channel closes exactly once, when the producer drops its sender:
//! after the last chunk at end-of-stream, or right after delivering a read
//! error as the final item. A consumer that gives up early calls
//! [`ChunkPipeline::close`], which makes the producer's next send fail.

use std::io;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Consumer end of a bounded pipeline.
pub struct ChunkPipeline<T> {
    rx: mpsc::Receiver<T>,
}

impl<T> ChunkPipeline<T> {
    /// Waits for the next item. Returns `None` once the producer is done.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Stops the producer. Items already queued can still be drained with
    /// [`recv`](Self::recv); further sends fail.
    pub fn close(&mut self) {
        self.rx.close();
    }
}

/// Creates a bounded pipeline of the given depth (minimum 1).
pub fn channel<T>(depth: usize) -> (mpsc::Sender<T>, ChunkPipeline<T>) {
    let (tx, rx) = mpsc::channel(depth.max(1));
    (tx, ChunkPipeline { rx })
}

/// Spawns a task that drains `source` in chunks of `chunk_size` bytes.
///
/// Every emitted chunk is exactly `chunk_size` bytes except the last, which
/// holds the remainder. An empty source yields no chunks. A read error is
/// emitted as the final `Err` item.
pub fn spawn_reader<R>(
    source: R,
    chunk_size: usize,
    depth: usize,
) -> ChunkPipeline<io::Result<Bytes>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (tx, pipeline) = channel(depth);
    tokio::spawn(read_loop(source, chunk_size.max(1), tx));
    pipeline
}

async fn read_loop<R>(mut source: R, chunk_size: usize, tx: mpsc::Sender<io::Result<Bytes>>)
where
    R: AsyncRead + Unpin,
{
    let mut chunks = 0u64;
    loop {
        match read_full(&mut source, chunk_size).await {
            Ok(chunk) if chunk.is_empty() => break,
            Ok(chunk) => {
                // A short chunk means the source hit end-of-stream.
                let last = chunk.len() < chunk_size;
                chunks += 1;
                if tx.send(Ok(chunk)).await.is_err() {
                    debug!(chunks, "pipeline consumer dropped, stopping reader");
                    return;
                }
                if last {
                    break;
                }
            }
            Err(e) => {
                warn!(chunks, error = %e, "pipeline read failed");
                let _ = tx.send(Err(e)).await;
                return;
            }
        }
    }
    debug!(chunks, "pipeline source exhausted");
}

/// Reads until `capacity` bytes are buffered or the source ends.
///
/// Returns fewer than `capacity` bytes only at end-of-stream.
pub async fn read_full<R>(source: &mut R, capacity: usize) -> io::Result<Bytes>
where
    R: AsyncRead + Unpin,
{
    let mut buf = BytesMut::zeroed(capacity);
    let mut filled = 0;
    while filled < capacity {
        match source.read(&mut buf[filled..]).await {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    buf.truncate(filled);
    Ok(buf.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;

    /// Yields `data` a few bytes per poll, then fails.
    struct FailingReader {
        data: Vec<u8>,
        pos: usize,
        step: usize,
    }

    impl AsyncRead for FailingReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            if self.pos >= self.data.len() {
                return Poll::Ready(Err(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "peer went away",
                )));
            }
            let end = (self.pos + self.step)
                .min(self.data.len())
                .min(self.pos + buf.remaining());
            buf.put_slice(&self.data[self.pos..end]);
            self.pos = end;
            Poll::Ready(Ok(()))
        }
    }

    async fn collect(mut pipeline: ChunkPipeline<io::Result<Bytes>>) -> Vec<io::Result<Bytes>> {
        let mut out = Vec::new();
        while let Some(item) = pipeline.recv().await {
            out.push(item);
        }
        out
    }

    #[tokio::test]
    async fn splits_into_full_chunks_plus_remainder() {
        let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let chunks = collect(spawn_reader(std::io::Cursor::new(data.clone()), 300, 2)).await;

        let lens: Vec<usize> = chunks.iter().map(|c| c.as_ref().unwrap().len()).collect();
        assert_eq!(lens, vec![300, 300, 300, 100]);

        let joined: Vec<u8> = chunks
            .into_iter()
            .flat_map(|c| c.unwrap().to_vec())
            .collect();
        assert_eq!(joined, data);
    }

    #[tokio::test]
    async fn exact_multiple_has_no_empty_tail() {
        let data = vec![7u8; 600];
        let chunks = collect(spawn_reader(std::io::Cursor::new(data), 300, 5)).await;
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.as_ref().unwrap().len() == 300));
    }

    #[tokio::test]
    async fn empty_source_closes_without_chunks() {
        let chunks = collect(spawn_reader(std::io::Cursor::new(Vec::new()), 16, 5)).await;
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn short_reads_are_coalesced() {
        let reader = FailingReader {
            data: vec![1u8; 10],
            pos: 0,
            step: 3,
        };
        let mut pipeline = spawn_reader(reader, 8, 5);

        let first = pipeline.recv().await.unwrap().unwrap();
        assert_eq!(first.len(), 8);
    }

    #[tokio::test]
    async fn read_error_is_last_item() {
        let reader = FailingReader {
            data: vec![9u8; 10],
            pos: 0,
            step: 4,
        };
        let chunks = collect(spawn_reader(reader, 8, 5)).await;

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].as_ref().unwrap().len(), 8);
        let err = chunks[1].as_ref().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    }

    #[tokio::test]
    async fn producer_blocks_when_channel_is_full() {
        let data = vec![0u8; 100];
        let mut pipeline = spawn_reader(std::io::Cursor::new(data), 10, 2);

        // Let the producer run until it fills the channel.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(pipeline.rx.len(), 2);

        let mut received = 0;
        while let Some(chunk) = pipeline.recv().await {
            received += chunk.unwrap().len();
        }
        assert_eq!(received, 100);
    }

    #[tokio::test]
    async fn closes_once_and_stays_closed() {
        let mut pipeline = spawn_reader(std::io::Cursor::new(vec![1u8; 3]), 2, 5);
        assert!(pipeline.recv().await.is_some());
        assert!(pipeline.recv().await.is_some());
        assert!(pipeline.recv().await.is_none());
        assert!(pipeline.recv().await.is_none());
    }

    #[tokio::test]
    async fn read_full_stops_at_eof() {
        let mut cursor = std::io::Cursor::new(b"abc".to_vec());
        let chunk = read_full(&mut cursor, 10).await.unwrap();
        assert_eq!(&chunk[..], b"abc");
        let tail = read_full(&mut cursor, 10).await.unwrap();
        assert!(tail.is_empty());
    }
}
