//! Transparent compression for corpus files.
//!
//! Codecs are detected from the file extension first and, for readers, from the
//! stream's magic bytes when the extension is not recognized. Each codec sits
//! behind its own feature flag:
//!
//! - **Gzip** (`.gz`, `.gzip`) via `flate2` (feature: `compression-gzip`)
//! - **Zstd** (`.zst`, `.zstd`) via `zstd` (feature: `compression-zstd`)
//! - **Bzip2** (`.bz2`, `.bzip2`) via `bzip2` (feature: `compression-bzip2`)
//! - **Xz** (`.xz`) via `xz2` (feature: `compression-xz`)
//!
//! Files with no recognized codec pass through a plain buffered reader/writer.
//!
//! ```no_run
//! use ironcorpus::io::compression::{create_writer, open_reader};
//! use std::io::{BufRead, Write};
//! # fn main() -> std::io::Result<()> {
//! let mut w = create_writer("train.tsv.gz")?;
//! w.write_all(b"pos\tgood movie \n")?;
//! w.finish()?;
//!
//! let lines = open_reader("train.tsv.gz")?.lines().count();
//! # Ok(())
//! # }
//! ```
//!
//! [`CorpusWriter::finish`] writes the codec trailer and reports any failure
//! doing so. Dropping an unfinished writer finalizes it too, but errors are
//! lost.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

#[cfg(feature = "compression-bzip2")]
const BZIP2_BLOCK_MAGIC: [u8; 6] = [0x31, 0x41, 0x59, 0x26, 0x53, 0x59];
#[cfg(feature = "compression-bzip2")]
const BZIP2_EOS_MAGIC: [u8; 6] = [0x17, 0x72, 0x45, 0x38, 0x50, 0x90];

/// A built-in compression codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    #[cfg(feature = "compression-gzip")]
    Gzip,
    #[cfg(feature = "compression-zstd")]
    Zstd,
    #[cfg(feature = "compression-bzip2")]
    Bzip2,
    #[cfg(feature = "compression-xz")]
    Xz,
}

impl Codec {
    /// Every codec compiled into this build.
    pub const ENABLED: &'static [Codec] = &[
        #[cfg(feature = "compression-gzip")]
        Codec::Gzip,
        #[cfg(feature = "compression-zstd")]
        Codec::Zstd,
        #[cfg(feature = "compression-bzip2")]
        Codec::Bzip2,
        #[cfg(feature = "compression-xz")]
        Codec::Xz,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            #[cfg(feature = "compression-gzip")]
            Codec::Gzip => "gzip",
            #[cfg(feature = "compression-zstd")]
            Codec::Zstd => "zstd",
            #[cfg(feature = "compression-bzip2")]
            Codec::Bzip2 => "bzip2",
            #[cfg(feature = "compression-xz")]
            Codec::Xz => "xz",
        }
    }

    /// Lowercase extensions, leading dot included.
    #[must_use]
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            #[cfg(feature = "compression-gzip")]
            Codec::Gzip => &[".gz", ".gzip"],
            #[cfg(feature = "compression-zstd")]
            Codec::Zstd => &[".zst", ".zstd"],
            #[cfg(feature = "compression-bzip2")]
            Codec::Bzip2 => &[".bz2", ".bzip2"],
            #[cfg(feature = "compression-xz")]
            Codec::Xz => &[".xz"],
        }
    }

    /// Fixed leading bytes of the codec's stream header.
    ///
    /// For bzip2 this is only the `BZh` prefix; [`Codec::from_magic`] also checks
    /// the block size digit and the first block marker.
    #[must_use]
    pub fn magic_bytes(self) -> &'static [u8] {
        match self {
            #[cfg(feature = "compression-gzip")]
            Codec::Gzip => &[0x1f, 0x8b],
            #[cfg(feature = "compression-zstd")]
            Codec::Zstd => &[0x28, 0xb5, 0x2f, 0xfd],
            #[cfg(feature = "compression-bzip2")]
            Codec::Bzip2 => &[0x42, 0x5a, 0x68],
            #[cfg(feature = "compression-xz")]
            Codec::Xz => &[0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00],
        }
    }

    /// Case-insensitive match on the path's trailing extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Codec> {
        let name = path.as_ref().to_string_lossy().to_lowercase();
        Self::ENABLED
            .iter()
            .copied()
            .find(|c| c.extensions().iter().any(|ext| name.ends_with(ext)))
    }

    /// Match the start of a stream against known signatures.
    ///
    /// Plain text can begin with `BZh`, so bzip2 additionally requires a block
    /// size digit and a block or end-of-stream marker, ten bytes in all.
    #[must_use]
    pub fn from_magic(head: &[u8]) -> Option<Codec> {
        Self::ENABLED.iter().copied().find(|c| c.matches_header(head))
    }

    fn matches_header(self, head: &[u8]) -> bool {
        if !head.starts_with(self.magic_bytes()) {
            return false;
        }
        match self {
            #[cfg(feature = "compression-bzip2")]
            Codec::Bzip2 => {
                head.len() >= 10
                    && (b'1'..=b'9').contains(&head[3])
                    && (head[4..10] == BZIP2_BLOCK_MAGIC || head[4..10] == BZIP2_EOS_MAGIC)
            }
            #[allow(unreachable_patterns)]
            _ => true,
        }
    }

    fn wrap_reader(self, reader: Box<dyn Read>) -> io::Result<Box<dyn Read>> {
        match self {
            #[cfg(feature = "compression-gzip")]
            Codec::Gzip => Ok(Box::new(flate2::read::MultiGzDecoder::new(reader))),
            #[cfg(feature = "compression-zstd")]
            Codec::Zstd => Ok(Box::new(zstd::stream::read::Decoder::new(reader)?)),
            #[cfg(feature = "compression-bzip2")]
            Codec::Bzip2 => Ok(Box::new(bzip2::read::MultiBzDecoder::new(reader))),
            #[cfg(feature = "compression-xz")]
            Codec::Xz => Ok(Box::new(xz2::read::XzDecoder::new_multi_decoder(reader))),
        }
    }

    fn wrap_writer(self, file: File) -> io::Result<Box<dyn Finalize>> {
        match self {
            #[cfg(feature = "compression-gzip")]
            Codec::Gzip => Ok(Box::new(flate2::write::GzEncoder::new(
                file,
                flate2::Compression::default(),
            ))),
            #[cfg(feature = "compression-zstd")]
            Codec::Zstd => Ok(Box::new(zstd::stream::write::Encoder::new(file, 3)?)),
            #[cfg(feature = "compression-bzip2")]
            Codec::Bzip2 => Ok(Box::new(bzip2::write::BzEncoder::new(
                file,
                bzip2::Compression::default(),
            ))),
            #[cfg(feature = "compression-xz")]
            Codec::Xz => Ok(Box::new(xz2::write::XzEncoder::new(file, 6))),
        }
    }
}

/// A destination stream that needs an explicit last step to be complete.
trait Finalize: Write {
    fn finalize(self: Box<Self>) -> io::Result<()>;
}

impl Finalize for File {
    fn finalize(mut self: Box<Self>) -> io::Result<()> {
        self.flush()
    }
}

#[cfg(feature = "compression-gzip")]
impl Finalize for flate2::write::GzEncoder<File> {
    fn finalize(self: Box<Self>) -> io::Result<()> {
        flate2::write::GzEncoder::finish(*self).map(drop)
    }
}

#[cfg(feature = "compression-zstd")]
impl Finalize for zstd::stream::write::Encoder<'static, File> {
    fn finalize(self: Box<Self>) -> io::Result<()> {
        zstd::stream::write::Encoder::finish(*self).map(drop)
    }
}

#[cfg(feature = "compression-bzip2")]
impl Finalize for bzip2::write::BzEncoder<File> {
    fn finalize(self: Box<Self>) -> io::Result<()> {
        bzip2::write::BzEncoder::finish(*self).map(drop)
    }
}

#[cfg(feature = "compression-xz")]
impl Finalize for xz2::write::XzEncoder<File> {
    fn finalize(self: Box<Self>) -> io::Result<()> {
        xz2::write::XzEncoder::finish(*self).map(drop)
    }
}

/// Buffered, possibly compressing corpus output returned by [`create_writer`].
pub struct CorpusWriter {
    inner: Option<BufWriter<Box<dyn Finalize>>>,
}

impl CorpusWriter {
    fn stream(&mut self) -> io::Result<&mut BufWriter<Box<dyn Finalize>>> {
        self.inner
            .as_mut()
            .ok_or_else(|| io::Error::other("corpus writer already finished"))
    }

    /// Flush buffered bytes and write the codec trailer.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from the last buffered write or from finalizing
    /// the compressed stream.
    pub fn finish(mut self) -> io::Result<()> {
        match self.inner.take() {
            Some(buffered) => buffered
                .into_inner()
                .map_err(io::IntoInnerError::into_error)?
                .finalize(),
            None => Ok(()),
        }
    }
}

impl Write for CorpusWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream()?.flush()
    }
}

impl Drop for CorpusWriter {
    fn drop(&mut self) {
        if let Some(buffered) = self.inner.take()
            && let Ok(stream) = buffered.into_inner()
        {
            let _ = stream.finalize();
        }
    }
}

/// Open `path` for buffered line reading, decompressing if a codec is detected.
///
/// # Errors
///
/// Returns the underlying I/O error if the file cannot be opened or the
/// decoder cannot be initialized.
pub fn open_reader(path: impl AsRef<Path>) -> io::Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path)?;

    if let Some(codec) = Codec::from_path(path) {
        let inner = codec.wrap_reader(Box::new(file))?;
        return Ok(Box::new(BufReader::new(inner)));
    }

    let mut buffered = BufReader::new(file);
    let codec = Codec::from_magic(buffered.fill_buf()?);
    match codec {
        Some(codec) => {
            let inner = codec.wrap_reader(Box::new(buffered))?;
            Ok(Box::new(BufReader::new(inner)))
        }
        None => Ok(Box::new(buffered)),
    }
}

/// Create (truncating) `path` for buffered writing, compressing by extension.
///
/// Missing parent directories are created. Call [`CorpusWriter::finish`] once
/// the last line is written.
///
/// # Errors
///
/// Returns the underlying I/O error if the directories or file cannot be
/// created or the encoder cannot be initialized.
pub fn create_writer(path: impl AsRef<Path>) -> io::Result<CorpusWriter> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let stream: Box<dyn Finalize> = match Codec::from_path(path) {
        Some(codec) => codec.wrap_writer(file)?,
        None => Box::new(file),
    };
    Ok(CorpusWriter {
        inner: Some(BufWriter::new(stream)),
    })
}
