use std::io::{self, Read, Seek, SeekFrom};

/// Reader that counts the bytes passing through it.
///
/// Seeking is forwarded untouched, so re-read regions count again.
pub struct CountingReader<R> {
    reader: R,
    count: u64,
}

impl<R> CountingReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, count: 0 }
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}

impl<R: Seek> Seek for CountingReader<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.reader.seek(pos)
    }
}
