//! Response body abstraction.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::net::{Shutdown, TcpStream};

/// A readable response body that can be closed.
///
/// `read` must return fewer bytes than requested only at end-of-stream.
/// `close` must be idempotent; the dispatcher calls it exactly once per
/// response, but a body may also be closed by its owner afterwards.
pub trait Body: Read {
    /// Releases the underlying resource.
    fn close(&mut self) -> io::Result<()>;
}

impl Body for &[u8] {
    fn close(&mut self) -> io::Result<()> {
        *self = &[];
        Ok(())
    }
}

impl<T: AsRef<[u8]>> Body for Cursor<T> {
    fn close(&mut self) -> io::Result<()> {
        let end = self.get_ref().as_ref().len() as u64;
        self.set_position(end);
        Ok(())
    }
}

impl Body for io::Empty {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// The descriptor is released on drop.
impl Body for File {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Process stdin is never closed.
impl Body for io::Stdin {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Body for TcpStream {
    fn close(&mut self) -> io::Result<()> {
        match self.shutdown(Shutdown::Read) {
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }
}

/// Buffered bytes not yet read are discarded along with the inner body.
impl<B: Body> Body for BufReader<B> {
    fn close(&mut self) -> io::Result<()> {
        let buffered = self.buffer().len();
        self.consume(buffered);
        self.get_mut().close()
    }
}

impl<B: Body + ?Sized> Body for Box<B> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

impl<B: Body + ?Sized> Body for &mut B {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}
