/// Streaming destination for response bytes.
///
/// The transport invokes [`write`](DataSink::write) once per received
/// chunk, in arrival order, never concurrently. The return value is the
/// number of bytes accepted; anything short of the full chunk aborts the
/// transfer.
pub trait DataSink: Send {
    fn write(&mut self, chunk: &[u8]) -> usize;
}

impl<F> DataSink for F
where
    F: FnMut(&[u8]) -> usize + Send,
{
    fn write(&mut self, chunk: &[u8]) -> usize {
        self(chunk)
    }
}
