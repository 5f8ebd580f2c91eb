//! Memory image persistence
//!
//! An image is the raw memory cell sequence: no header, no length prefix.
//! Registers and the ip are not part of it.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{Result, RuntimeError};
use crate::vm::VM;

impl VM {
    /// Write memory verbatim to `sink`
    pub fn save_to<W: Write>(&self, mut sink: W) -> Result<()> {
        sink.write_all(self.memory.as_bytes())?;
        sink.flush()?;
        Ok(())
    }

    /// Reset, then fill memory from `source`.
    ///
    /// The image is read in full before memory is touched; a short image
    /// leaves memory zeroed. Bytes past capacity are ignored.
    pub fn load_from<R: Read>(&mut self, source: R) -> Result<()> {
        self.reset();

        let capacity = self.memory.capacity();
        let mut image = Vec::with_capacity(capacity);
        source.take(capacity as u64).read_to_end(&mut image)?;

        if image.len() < capacity {
            return Err(RuntimeError::TruncatedImage {
                expected: capacity,
                found: image.len(),
            });
        }

        self.memory.write_bytes(0, &image)
    }

    /// Save memory to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.save_to(BufWriter::new(file))?;
        debug!(path = %path.display(), bytes = self.memory.capacity(), "image saved");
        Ok(())
    }

    /// Reset, then load memory from a file.
    ///
    /// A file that cannot be opened leaves the machine untouched.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path)?;
        self.load_from(BufReader::new(file))?;
        debug!(path = %path.display(), bytes = self.memory.capacity(), "image loaded");
        Ok(())
    }
}
