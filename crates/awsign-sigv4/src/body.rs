//! Re-readable request bodies.
//!
//! Signing needs the SHA-256 of the whole payload, and the transport needs the
//! same payload afterwards. [`SignableBody::snapshot`] reads the body exactly
//! once, puts an identical copy back in its place, and returns the bytes that
//! were read so they can be hashed.
//!
//! In-memory bodies are already re-readable and never fail. [`ReaderBody`]
//! wraps an arbitrary [`Read`] and buffers it on the first snapshot.

use std::io::{self, Chain, Cursor, Read};
use std::mem;

use bytes::Bytes;

/// A request body that can be read in full for hashing without being lost.
pub trait SignableBody {
    /// Read the entire remaining body, re-seat an identical copy, and return it.
    ///
    /// After a successful call the body yields exactly the returned bytes when
    /// read from the start.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if a streaming body cannot be drained.
    fn snapshot(&mut self) -> io::Result<Bytes>;
}

impl SignableBody for Bytes {
    fn snapshot(&mut self) -> io::Result<Bytes> {
        Ok(self.clone())
    }
}

impl SignableBody for Vec<u8> {
    fn snapshot(&mut self) -> io::Result<Bytes> {
        Ok(Bytes::copy_from_slice(self))
    }
}

impl SignableBody for String {
    fn snapshot(&mut self) -> io::Result<Bytes> {
        Ok(Bytes::copy_from_slice(self.as_bytes()))
    }
}

impl SignableBody for &'static str {
    fn snapshot(&mut self) -> io::Result<Bytes> {
        let text: &'static str = *self;
        Ok(Bytes::from_static(text.as_bytes()))
    }
}

impl SignableBody for &'static [u8] {
    fn snapshot(&mut self) -> io::Result<Bytes> {
        Ok(Bytes::from_static(*self))
    }
}

impl SignableBody for () {
    fn snapshot(&mut self) -> io::Result<Bytes> {
        Ok(Bytes::new())
    }
}

/// A streaming body backed by any [`Read`] implementation.
///
/// The first [`snapshot`](SignableBody::snapshot) drains the reader into memory
/// and replaces it with a cursor over the drained bytes, so later reads by the
/// transport see the original payload from the start.
///
/// # Examples
///
/// ```
/// use std::io::Read;
///
/// use awsign_sigv4::body::{ReaderBody, SignableBody};
///
/// let mut body = ReaderBody::new(&b"{}"[..]);
/// let hashed = body.snapshot().unwrap();
///
/// let mut sent = Vec::new();
/// body.read_to_end(&mut sent).unwrap();
/// assert_eq!(&hashed[..], &sent[..]);
/// ```
#[derive(Debug)]
pub struct ReaderBody<R> {
    state: ReaderState<R>,
}

/// Bytes pulled out of the reader by a failed snapshot are replayed ahead of
/// the rest of the stream.
#[derive(Debug)]
enum ReaderState<R> {
    Streaming(Chain<Cursor<Bytes>, R>),
    Buffered(Cursor<Bytes>),
}

impl<R: Read> ReaderBody<R> {
    /// Wrap a reader. Nothing is read until the first snapshot or read.
    pub fn new(reader: R) -> Self {
        Self {
            state: ReaderState::Streaming(Cursor::new(Bytes::new()).chain(reader)),
        }
    }

    /// Whether the body has been drained into memory.
    #[must_use]
    pub fn is_buffered(&self) -> bool {
        matches!(self.state, ReaderState::Buffered(_))
    }
}

impl<R: Read> Read for ReaderBody<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.state {
            ReaderState::Streaming(reader) => reader.read(buf),
            ReaderState::Buffered(cursor) => cursor.read(buf),
        }
    }
}

impl<R: Read> SignableBody for ReaderBody<R> {
    fn snapshot(&mut self) -> io::Result<Bytes> {
        let state = mem::replace(&mut self.state, ReaderState::Buffered(Cursor::default()));
        let bytes = match state {
            ReaderState::Streaming(mut stream) => {
                let mut buf = Vec::new();
                if let Err(err) = stream.read_to_end(&mut buf) {
                    // Put back what was read so the body is not left partly consumed.
                    let (_, reader) = stream.into_inner();
                    self.state =
                        ReaderState::Streaming(Cursor::new(Bytes::from(buf)).chain(reader));
                    return Err(err);
                }
                Bytes::from(buf)
            }
            ReaderState::Buffered(cursor) => {
                let position = usize::try_from(cursor.position()).unwrap_or(usize::MAX);
                let buffered = cursor.get_ref();
                buffered.slice(position.min(buffered.len())..)
            }
        };
        self.state = ReaderState::Buffered(Cursor::new(bytes.clone()));
        Ok(bytes)
    }
}
