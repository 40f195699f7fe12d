#![allow(dead_code)]

use std::io;

/// A writer that starts failing after a fixed number of writes.
#[derive(Default)]
pub struct Writer {
    buf: Vec<u8>,
    writes: usize,
    fail_after: usize,
}

impl Writer {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            writes: 0,
            fail_after: usize::MAX,
        }
    }

    pub fn fail_after(writes: usize) -> Self {
        Self {
            buf: Vec::new(),
            writes: 0,
            fail_after: writes,
        }
    }

    #[track_caller]
    pub fn into_string(self) -> String {
        String::from_utf8(self.buf).unwrap()
    }
}

impl io::Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.writes >= self.fail_after {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe));
        }
        self.writes += 1;
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
